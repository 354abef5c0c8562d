use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn treemv_cmd() -> Command {
    let mut cmd = Command::cargo_bin("treemv").unwrap();
    cmd.env_remove("TREEMV_IGNORE").env_remove("RUST_LOG");
    cmd
}

fn create_test_repo(temp: &TempDir) {
    let root = temp.path();

    fs::create_dir_all(root.join("docs/img")).unwrap();
    fs::create_dir_all(root.join("src")).unwrap();

    fs::write(root.join("README.md"), "# notes").unwrap();
    fs::write(root.join("docs/readme.md"), "readme").unwrap();
    fs::write(root.join("docs/img/logo.png"), "png").unwrap();
    fs::write(root.join("src/index.ts"), "export {}").unwrap();
}

#[test]
fn tree_prints_ascii_scaffold() {
    let temp = TempDir::new().unwrap();
    create_test_repo(&temp);

    let output = treemv_cmd().arg("tree").arg(temp.path()).output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let name = temp.path().file_name().unwrap().to_string_lossy();
    let expected = format!(
        concat!(
            "{}\n",
            "|-- README.md\n",
            "|-- docs/\n",
            "|   |-- img/\n",
            "|   |   `-- logo.png\n",
            "|   `-- readme.md\n",
            "`-- src/\n",
            "    `-- index.ts\n",
        ),
        name
    );
    assert_eq!(stdout, expected);
}

#[test]
fn tree_defaults_to_current_directory() {
    let temp = TempDir::new().unwrap();
    create_test_repo(&temp);

    treemv_cmd()
        .arg("tree")
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::starts_with(".\n"))
        .stdout(predicate::str::contains("index.ts"));
}

#[test]
fn tree_honours_ignore_and_hidden_flags() {
    let temp = TempDir::new().unwrap();
    create_test_repo(&temp);
    fs::create_dir_all(temp.path().join(".github")).unwrap();
    fs::write(temp.path().join(".github/ci.yml"), "on: push").unwrap();

    treemv_cmd()
        .args(["tree", "--hide-hidden", "-I", "*.png|src"])
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("readme.md"))
        .stdout(predicate::str::contains(".github").not())
        .stdout(predicate::str::contains("logo.png").not())
        .stdout(predicate::str::contains("src/").not());
}

#[test]
fn tree_ignore_pattern_from_environment() {
    let temp = TempDir::new().unwrap();
    create_test_repo(&temp);

    treemv_cmd()
        .env("TREEMV_IGNORE", "docs")
        .arg("tree")
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("docs/").not())
        .stdout(predicate::str::contains("index.ts"));
}

#[test]
fn tree_json_lists_every_row_with_level() {
    let temp = TempDir::new().unwrap();
    create_test_repo(&temp);

    let output = treemv_cmd()
        .args(["tree", "--json", "--dirs-first"])
        .arg(temp.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let rows: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let rows = rows.as_array().unwrap();
    let paths: Vec<&str> = rows
        .iter()
        .map(|row| row["full_path"].as_str().unwrap())
        .collect();
    assert_eq!(
        paths,
        vec![
            "docs",
            "docs/img",
            "docs/img/logo.png",
            "docs/readme.md",
            "src",
            "src/index.ts",
            "README.md",
        ]
    );
    assert_eq!(rows[2]["level"], 2);
    assert_eq!(rows[2]["kind"], "file");
    assert_eq!(rows[0]["kind"], "directory");
}

#[test]
fn check_reports_new_path_without_changes() {
    let temp = TempDir::new().unwrap();
    create_test_repo(&temp);

    treemv_cmd()
        .arg("check")
        .arg(temp.path())
        .args(["docs", "documentation"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ok: docs -> documentation"));

    assert!(temp.path().join("docs/readme.md").is_file());
}

#[test]
fn check_rejects_invalid_names() {
    let temp = TempDir::new().unwrap();
    create_test_repo(&temp);

    for (name, message) in [
        ("a/b", "name cannot contain separator"),
        ("..", "reserved name"),
        ("src", "name already in use"),
    ] {
        treemv_cmd()
            .arg("check")
            .arg(temp.path())
            .args(["docs", name])
            .assert()
            .failure()
            .stderr(predicate::str::contains(format!("treemv: {message}")));
    }
}

#[test]
fn mv_renames_directory_on_disk() {
    let temp = TempDir::new().unwrap();
    create_test_repo(&temp);

    treemv_cmd()
        .arg("mv")
        .arg(temp.path())
        .args(["docs", "documentation"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "renamed docs -> documentation (2 files)",
        ));

    let root = temp.path();
    assert_eq!(
        fs::read_to_string(root.join("documentation/readme.md")).unwrap(),
        "readme"
    );
    assert!(root.join("documentation/img/logo.png").is_file());
    assert!(!root.join("docs").exists());
    assert!(root.join("src/index.ts").is_file());
}

#[test]
fn mv_handles_empty_directories() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::create_dir_all(root.join("lonely")).unwrap();
    fs::create_dir_all(root.join("docs/empty")).unwrap();
    fs::write(root.join("docs/a.md"), "a").unwrap();

    treemv_cmd()
        .arg("mv")
        .arg(root)
        .args(["lonely", "renamed"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("treemv: no such path: lonely"));
    assert!(root.join("lonely").is_dir());
    assert!(!root.join("renamed").exists());

    treemv_cmd()
        .arg("mv")
        .arg(root)
        .args(["docs", "documentation"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "renamed docs -> documentation (1 files)",
        ));
    assert_eq!(
        fs::read_to_string(root.join("documentation/a.md")).unwrap(),
        "a"
    );
    assert!(!root.join("docs").exists());

    treemv_cmd()
        .args(["tree", "--json"])
        .arg(root)
        .assert()
        .success()
        .stdout(predicate::str::contains("documentation/a.md"))
        .stdout(predicate::str::contains("\"docs").not())
        .stdout(predicate::str::contains("lonely").not());
}

#[test]
fn mv_to_same_name_is_a_no_op() {
    let temp = TempDir::new().unwrap();
    create_test_repo(&temp);

    treemv_cmd()
        .arg("mv")
        .arg(temp.path())
        .args(["docs/readme.md", "readme.md"])
        .assert()
        .success()
        .stdout(predicate::str::contains("unchanged"));
}

#[test]
fn mv_dry_run_leaves_files_alone() {
    let temp = TempDir::new().unwrap();
    create_test_repo(&temp);

    treemv_cmd()
        .args(["mv", "--dry-run"])
        .arg(temp.path())
        .args(["docs", "notes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("docs/img/logo.png -> notes/img/logo.png"))
        .stdout(predicate::str::contains("docs/readme.md -> notes/readme.md"));

    assert!(temp.path().join("docs/readme.md").is_file());
    assert!(!temp.path().join("notes").exists());
}

#[test]
fn mv_unknown_path_fails() {
    let temp = TempDir::new().unwrap();
    create_test_repo(&temp);

    treemv_cmd()
        .arg("mv")
        .arg(temp.path())
        .args(["missing.md", "x.md"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no such path: missing.md"));
}

#[test]
fn move_file_into_directory_and_back_to_root() {
    let temp = TempDir::new().unwrap();
    create_test_repo(&temp);
    let root = temp.path();

    treemv_cmd()
        .arg("move")
        .arg(root)
        .args(["README.md", "docs"])
        .assert()
        .success();
    assert!(root.join("docs/README.md").is_file());
    assert!(!root.join("README.md").exists());

    treemv_cmd()
        .arg("move")
        .arg(root)
        .args(["docs/README.md", "."])
        .assert()
        .success();
    assert!(root.join("README.md").is_file());
}

#[test]
fn move_into_own_subtree_fails() {
    let temp = TempDir::new().unwrap();
    create_test_repo(&temp);

    treemv_cmd()
        .arg("move")
        .arg(temp.path())
        .args(["docs", "docs/img"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "treemv: cannot move a directory into itself",
        ));
    assert!(temp.path().join("docs/img/logo.png").is_file());
}

#[test]
fn error_for_nonexistent_root() {
    let output = treemv_cmd()
        .args(["tree", "/nonexistent/path/that/does/not/exist"])
        .output()
        .unwrap();

    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("treemv:"));
    assert!(stderr.contains("No such file or directory") || stderr.contains("cannot find"));
}

#[test]
fn help_output() {
    treemv_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Rename and move entries of a repository tree",
        ))
        .stdout(predicate::str::contains("Usage:"));
}
