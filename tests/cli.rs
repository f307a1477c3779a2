use insta_cmd::get_cargo_bin;
use rstest::rstest;
use std::process::Command;

fn cli() -> Command {
    let mut cmd = Command::new(get_cargo_bin("factory-location"));
    cmd.env("NO_COLOR", "1");
    cmd.env_remove("FACTORY_LOCATION_LOG");
    cmd
}

/// Runs the cli in an empty directory, so no project config is picked up.
fn run(args: &[&str]) -> (bool, String, String) {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    std::fs::write(&config, "").unwrap();
    let output = cli()
        .current_dir(dir.path())
        .arg("--config")
        .arg(&config)
        .args(args)
        .output()
        .unwrap();
    (
        output.status.success(),
        String::from_utf8_lossy(&output.stdout).trim_end().to_owned(),
        String::from_utf8_lossy(&output.stderr).into_owned(),
    )
}

#[test]
fn remotes() {
    let (success, stdout, _) = run(&["remotes", "{https://a.git,https://b.git,https://c.git}"]);
    assert!(success);
    insta::assert_snapshot!(stdout, @r"
    origin https://a.git
    upstream https://b.git
    fork1 https://c.git
    ");
}

#[test]
fn remotes_json() {
    let (success, stdout, _) = run(&["--format", "json", "remotes", "{{origin,https://a.git}}"]);
    assert!(success);
    insta::assert_snapshot!(stdout, @r#"
    [
      {
        "name": "origin",
        "url": "https://a.git"
      }
    ]
    "#);
}

#[test]
fn malformed_remotes_fail() {
    let (success, stdout, stderr) = run(&["remotes", "{{origin}}"]);
    assert!(!success);
    assert!(stdout.is_empty());
    assert!(
        stderr.contains("Malformed remotes provided: {{origin}}"),
        "{stderr}"
    );
}

#[rstest]
#[case(
    &["normalize", "git@github.com:eclipse-che/che-dashboard.git?session_state=X&che-editor=che-incubator/checode/insiders"],
    "git@github.com:eclipse-che/che-dashboard.git?che-editor=che-incubator%2Fchecode%2Finsiders"
)]
#[case(&["branch", "https://github.com/u/p/tree/my-branch"], "my-branch")]
#[case(&["set-branch", "https://github.com/u/p", "my-branch"], "https://github.com/u/p/tree/my-branch")]
#[case(&["set-branch", "https://gitlab.com/u/p/-/tree/main"], "https://gitlab.com/u/p")]
#[case(&["encode-remotes", "upstream=https://b.git"], "{{upstream,https://b.git}}")]
fn prints(#[case] args: &[&str], #[case] expected: &str) {
    let (success, stdout, stderr) = run(args);
    assert!(success, "{stderr}");
    assert_eq!(stdout, expected);
}

#[test]
fn check() {
    let (success, stdout, _) = run(&["check", "--ssh-keys", "git@github.com:a/b.git"]);
    assert!(success);
    insta::assert_snapshot!(stdout, @r"
    http: false
    ssh: true
    valid: success
    ");
}

#[test]
fn unsupported_location_fails() {
    let (success, _, stderr) = run(&["normalize", "dummy.git"]);
    assert!(!success);
    assert!(
        stderr.contains(r#"Unsupported factory location: "dummy.git""#),
        "{stderr}"
    );
}

#[test]
fn configured_transient_params() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("factory-location.toml"),
        "[location]\ntransient_params = [\"token\"]\n",
    )
    .unwrap();
    let output = cli()
        .current_dir(dir.path())
        .args(["normalize", "https://github.com/a/b?token=1&session=2"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim_end(),
        "https://github.com/a/b?session=2"
    );
}

#[test]
fn malformed_config_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("broken.toml");
    std::fs::write(&config, "[location]\nunknown = 1\n").unwrap();
    let output = cli()
        .arg("--config")
        .arg(&config)
        .args(["normalize", "https://github.com/a/b"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to parse config file"));
}

#[test]
fn embedded_config_without_config_files() {
    let dir = tempfile::tempdir().unwrap();
    let output = cli()
        .current_dir(dir.path())
        .env("HOME", dir.path())
        .env("XDG_CONFIG_HOME", dir.path().join("config"))
        .args(["normalize", "https://github.com/a/b?code=1&session_state=2&df=x.yaml"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim_end(),
        "https://github.com/a/b?df=x.yaml"
    );
}

#[test]
fn options_with_limits() {
    let (success, stdout, stderr) = run(&[
        "options",
        "https://dev.azure.com/org/proj/_git/repo?version=GBdev&memoryLimit=512Mi&policies.create=perclick",
    ]);
    assert!(success, "{stderr}");
    insta::assert_snapshot!(stdout, @r"
    location: https://dev.azure.com/org/proj/_git/repo%3Fversion%3DGBdev?memoryLimit=512Mi&policies.create=perclick
    branch: dev
    devfile:
    supported: true
    remotes:
    image:
    temporary storage:
    create new: true
    memory limit: 512Mi
    cpu limit:
    ");
}
