use derive_new::new;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Eq, PartialEq, new)]
pub struct FileSpec {
    pub path: PathBuf,
    pub content: String,
}

pub fn write_generated_files(dir: &Path, files_count: usize) -> Vec<FileSpec> {
    use fake::{
        Fake,
        faker::lorem::en::{Word, Words},
    };

    (0..files_count)
        .map(|i| {
            // index prefix keeps generated names unique
            let file_name = format!("{i}-{}.txt", Word().fake::<String>());
            let file_path = dir.join(&file_name);
            let file_content = Words(5..10).fake::<Vec<String>>().join(" ");

            let file_spec = FileSpec::new(file_path, file_content);
            write_file(file_spec.clone());

            file_spec
        })
        .collect::<Vec<_>>()
}

pub fn write_file(file_spec: FileSpec) {
    // make sure the parent directory exists
    if let Some(parent) = file_spec.path.parent() {
        std::fs::create_dir_all(parent)
            .unwrap_or_else(|e| panic!("Failed to create directory {:?}: {}", parent, e));
    }

    std::fs::write(&file_spec.path, &file_spec.content)
        .unwrap_or_else(|e| panic!("Failed to write file {:?}: {}", file_spec.path, e));
}

/// Every file under `dir` outside `.gith`, as `/`-separated relative paths
pub fn list_working_files(dir: &Path) -> BTreeSet<String> {
    walkdir::WalkDir::new(dir)
        .min_depth(1)
        .into_iter()
        .filter_entry(|entry| entry.file_name() != ".gith")
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| {
            entry
                .path()
                .strip_prefix(dir)
                .unwrap_or_else(|e| panic!("Failed to strip prefix of {:?}: {}", entry.path(), e))
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect()
}

pub fn read_to_string(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {:?}: {}", path, e))
}
