use std::fs;
use std::path::{Path, PathBuf};
use assert_cmd::Command;

use predicates::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

const SETUP_TEMPLATE: &str = "# Hello, {{ Config.name }} at {{ Path }}.
{% if Project.things %}# Things:
{%- for thing in Project.things %}
# • {{ thing }}, {{ thing | upper }}
{%- endfor %}
{% endif -%}
";

fn tfsetup(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("tfsetup"));
    cmd.current_dir(dir).env_remove("RUST_LOG");
    cmd
}

/// Run with formatting off so results do not depend on the host's PATH.
fn tfsetup_plain(dir: &Path, mode: &str) -> Command {
    let mut cmd = tfsetup(dir);
    cmd.args([mode, "--no-format"]);
    cmd
}

fn project_tree() -> (TempDir, PathBuf) {
    let root = TempDir::new().expect("root");
    let shared = root.path().join("ab").join("tfsetup-config");
    let project = root.path().join("ab").join("cd").join("ef");
    fs::create_dir_all(&shared).expect("shared dir");
    fs::create_dir_all(&project).expect("project dir");
    fs::write(shared.join("context.json"), r#"{"name": "Potato"}"#).expect("config context");
    fs::write(shared.join("setup.tmpl"), SETUP_TEMPLATE).expect("setup template");
    fs::write(
        project.join("tfsetup-context.json"),
        r#"{"things": ["a", "b"]}"#,
    )
    .expect("project context");
    (root, project)
}

// ---------------------------------------------------------------------------
// 1. Argument handling
// ---------------------------------------------------------------------------

#[test]
fn version_flag_prints_name_and_version() {
    let tmp = TempDir::new().expect("tmp");
    tfsetup(tmp.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(contains(format!("tfsetup {}", env!("CARGO_PKG_VERSION"))));
}

#[test]
fn a_mode_is_required() {
    let tmp = TempDir::new().expect("tmp");
    tfsetup(tmp.path()).assert().code(2);
    tfsetup(tmp.path())
        .args(["--generate", "--check"])
        .assert()
        .code(2);
}

#[test]
fn min_version_newer_than_binary_fails() {
    let (_root, project) = project_tree();
    tfsetup_plain(&project, "--check")
        .args(["--min-version", "99.0.0"])
        .assert()
        .code(2)
        .stderr(contains(format!(
            "error: this is tfsetup version {}, but at least version 99.0.0 is required",
            env!("CARGO_PKG_VERSION")
        )));
    assert!(!project.join("setup.tf").exists());
}

#[test]
fn min_version_garbage_fails() {
    let tmp = TempDir::new().expect("tmp");
    tfsetup_plain(tmp.path(), "--generate")
        .args(["--min-version", "soon"])
        .assert()
        .code(2)
        .stderr(contains("error: unable to parse soon as version"));
}

#[test]
fn prerelease_min_version_is_accepted() {
    let (_root, project) = project_tree();
    tfsetup_plain(&project, "--generate")
        .args(["--min-version", "1.0.0-rc1"])
        .assert()
        .success()
        .stdout(contains("updated setup.tf"));
}

#[test]
fn satisfied_min_version_runs_normally() {
    let (_root, project) = project_tree();
    tfsetup_plain(&project, "--generate")
        .args(["--min-version", "1.0.0"])
        .assert()
        .success()
        .stdout(contains("updated setup.tf"));
}

// ---------------------------------------------------------------------------
// 2. Generate
// ---------------------------------------------------------------------------

#[test]
fn generate_writes_files_then_reports_current() {
    let (_root, project) = project_tree();
    fs::write(project.join("a.txt.tfsetup.tmpl"), "{{ Config.name }}\n").expect("template");

    tfsetup_plain(&project, "--generate")
        .assert()
        .success()
        .stdout(contains("updated setup.tf").and(contains("updated a.txt")));

    assert_eq!(
        fs::read_to_string(project.join("setup.tf")).expect("setup.tf"),
        "# Hello, Potato at cd/ef.\n# Things:\n# • a, A\n# • b, B\n"
    );
    assert_eq!(fs::read_to_string(project.join("a.txt")).expect("a.txt"), "Potato\n");

    tfsetup_plain(&project, "--generate")
        .assert()
        .success()
        .stdout(predicate::eq("all files are already current\n"));
}

#[test]
fn generate_reports_template_errors_with_exit_2() {
    let (_root, project) = project_tree();
    fs::write(project.join("bad.txt.tfsetup.tmpl"), "{% if %}").expect("template");

    tfsetup_plain(&project, "--generate")
        .assert()
        .code(2)
        .stdout(contains("updated setup.tf"))
        .stderr(contains("error: parse template").and(contains("bad.txt.tfsetup.tmpl")));
    assert!(project.join("setup.tf").exists());
}

#[test]
fn missing_project_context_is_an_error() {
    let tmp = TempDir::new().expect("tmp");
    tfsetup_plain(tmp.path(), "--generate")
        .assert()
        .code(2)
        .stderr(contains("error: read").and(contains("tfsetup-context.json")));
}

#[test]
fn missing_shared_directory_is_an_error() {
    let tmp = TempDir::new().expect("tmp");
    fs::write(tmp.path().join("tfsetup-context.json"), "{}").expect("project context");
    tfsetup_plain(tmp.path(), "--check")
        .assert()
        .code(2)
        .stderr(contains("tfsetup-config not found"));
}

// ---------------------------------------------------------------------------
// 3. Check
// ---------------------------------------------------------------------------

#[test]
fn check_on_fresh_tree_exits_1_and_writes_nothing() {
    let (_root, project) = project_tree();
    tfsetup_plain(&project, "--check")
        .assert()
        .code(1)
        .stderr(contains(
            "some files are out of date; rerun tfsetup --generate and terraform init",
        ));
    assert!(!project.join("setup.tf").exists());
}

#[test]
fn check_after_generate_is_clean() {
    let (_root, project) = project_tree();
    tfsetup_plain(&project, "--generate").assert().success();
    tfsetup_plain(&project, "--check")
        .assert()
        .success()
        .stdout(predicate::eq("{\"message\": \"all files are current\"}\n"));
}

#[test]
fn check_diff_shows_what_generate_would_change() {
    let (_root, project) = project_tree();
    fs::write(project.join("setup.tf"), "# old\n").expect("stale setup.tf");

    tfsetup_plain(&project, "--check")
        .arg("--diff")
        .assert()
        .code(1)
        .stdout(
            contains("--- a/setup.tf")
                .and(contains("-# old"))
                .and(contains("+# Hello, Potato at cd/ef.")),
        );
    assert_eq!(fs::read_to_string(project.join("setup.tf")).expect("setup.tf"), "# old\n");
}

// ---------------------------------------------------------------------------
// 4. Render
// ---------------------------------------------------------------------------

#[test]
fn render_reads_stdin_and_writes_stdout() {
    let (_root, project) = project_tree();
    tfsetup(&project)
        .arg("--render")
        .write_stdin("{{ Config.name | lower }} {{ Project.things | length }} {{ Path }}\n")
        .assert()
        .success()
        .stdout(predicate::eq("potato 2 cd/ef\n"));
    assert!(!project.join("setup.tf").exists());
}

#[test]
fn render_error_exits_2() {
    let (_root, project) = project_tree();
    tfsetup(&project)
        .arg("--render")
        .write_stdin("{{ Project.missing.key }}")
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty())
        .stderr(contains("error: evaluate template stdin"));
}

// ---------------------------------------------------------------------------
// 5. Formatter
// ---------------------------------------------------------------------------

#[test]
fn explicit_missing_formatter_is_rejected() {
    let (_root, project) = project_tree();
    tfsetup(&project)
        .args(["--generate", "--formatter", "tfsetup-no-such-fmt-77aa"])
        .assert()
        .code(2)
        .stderr(contains("formatter tfsetup-no-such-fmt-77aa not found"));
    assert!(!project.join("setup.tf").exists());
}

#[cfg(unix)]
#[test]
fn failing_formatter_warns_and_still_writes() {
    use std::os::unix::fs::PermissionsExt;

    let (root, project) = project_tree();
    let script = root.path().join("badfmt");
    fs::write(&script, "#!/bin/sh\ncat >/dev/null\necho 'Error: nope' >&2\nexit 1\n")
        .expect("script");
    fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).expect("chmod");

    tfsetup(&project)
        .arg("--generate")
        .arg("--formatter")
        .arg(&script)
        .assert()
        .success()
        .stdout(contains("updated setup.tf"))
        .stderr(contains("badfmt fmt: failed; output appended to file"));

    let written = fs::read_to_string(project.join("setup.tf")).expect("setup.tf");
    assert!(written.ends_with("/* --- OUTPUT FROM badfmt fmt ---\nError: nope\n\n*/\n"));
}

#[cfg(unix)]
#[test]
fn formatter_warning_survives_quiet() {
    use std::os::unix::fs::PermissionsExt;

    let (root, project) = project_tree();
    let script = root.path().join("quietfmt");
    fs::write(&script, "#!/bin/sh\ncat >/dev/null\nexit 3\n").expect("script");
    fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).expect("chmod");

    tfsetup(&project)
        .args(["--generate", "-q", "--formatter"])
        .arg(&script)
        .assert()
        .success()
        .stderr(contains("quietfmt fmt: failed; output appended to file"));
}
