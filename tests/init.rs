use crate::common::command::{Sandbox, sandbox};
use crate::common::file::read_to_string;
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;

mod common;

#[rstest]
fn init_creates_metadata_layout(sandbox: Sandbox) -> Result<(), Box<dyn std::error::Error>> {
    let metadata_path = sandbox.path().canonicalize()?.join(".gith");

    sandbox
        .run(&["init"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Initialized empty Gith repository in"))
        .stdout(predicate::str::contains(metadata_path.display().to_string()));

    for dir in ["objects", "refs/heads", "refs/tags"] {
        assert!(metadata_path.join(dir).is_dir(), "{dir} should be a directory");
    }
    for file in ["HEAD", "config", "description"] {
        assert!(metadata_path.join(file).is_file(), "{file} should be a file");
    }
    assert_eq!(read_to_string(&metadata_path.join("HEAD")), "ref: refs/heads/main\n");
    assert!(read_to_string(&metadata_path.join("config")).contains("[core]"));

    Ok(())
}

#[rstest]
fn init_at_explicit_path(sandbox: Sandbox) {
    sandbox.run(&["init", "nested/project"]).assert().success();

    assert!(sandbox.path().join("nested/project/.gith/HEAD").is_file());
}

#[rstest]
fn init_twice_reports_reinitialization_and_keeps_head(sandbox: Sandbox) {
    sandbox.run(&["init"]).assert().success();
    std::fs::write(sandbox.path().join(".gith/HEAD"), "ref: refs/heads/feature\n").unwrap();

    sandbox
        .run(&["init"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Reinitialized existing Gith repository in"));

    assert_eq!(
        read_to_string(&sandbox.path().join(".gith/HEAD")),
        "ref: refs/heads/feature\n"
    );
}

#[rstest]
fn commands_outside_repository_fail(sandbox: Sandbox) {
    sandbox
        .run(&["status"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a gith repository"));
}
