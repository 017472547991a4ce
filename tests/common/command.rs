use crate::common::file::{FileSpec, write_file};
use assert_cmd::Command;
use assert_fs::TempDir;
use rstest::fixture;
use std::path::Path;

/// A working directory plus an isolated home directory for the global config
pub struct Sandbox {
    pub dir: TempDir,
    pub home: TempDir,
}

impl Sandbox {
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn run(&self, args: &[&str]) -> Command {
        run_gith_command(self.dir.path(), self.home.path(), args)
    }

    pub fn run_in(&self, dir: &Path, args: &[&str]) -> Command {
        run_gith_command(dir, self.home.path(), args)
    }

    pub fn commit(&self, message: &str) -> Command {
        self.run(&["commit", "-m", message])
    }

    pub fn write(&self, path: &str, content: &str) {
        write_file(FileSpec::new(self.dir.path().join(path), content.to_string()));
    }

    pub fn head_commit(&self) -> String {
        let branch_ref = std::fs::read_to_string(self.dir.path().join(".gith/refs/heads/main"))
            .expect("Failed to read branch ref");

        branch_ref.trim().to_string()
    }
}

#[fixture]
pub fn sandbox() -> Sandbox {
    Sandbox {
        dir: TempDir::new().expect("Failed to create temp dir"),
        home: TempDir::new().expect("Failed to create home dir"),
    }
}

#[fixture]
pub fn init_sandbox(sandbox: Sandbox) -> Sandbox {
    sandbox.run(&["init"]).assert().success();

    sandbox
}

#[fixture]
pub fn committed_sandbox(init_sandbox: Sandbox) -> Sandbox {
    init_sandbox.write("1.txt", "one");
    init_sandbox.write("a/2.txt", "two");
    init_sandbox.write("a/b/3.txt", "three");

    init_sandbox.run(&["add", "."]).assert().success();
    init_sandbox.commit("Initial commit").assert().success();

    init_sandbox
}

pub fn run_gith_command(dir: &Path, home: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("gith").expect("Failed to find gith binary");
    cmd.current_dir(dir)
        .env("HOME", home)
        .env("GITH_AUTHOR_DATE", "1672567200 +0200")
        .env_remove("GITH_TOKEN")
        .env_remove("GITH_LOG")
        .args(args);

    cmd
}
