use factory_location::{FactoryLocation, GitRepoOptions, parse_remotes, set_branch_to_location};

fn main() {
    divan::main();
}

const REMOTES: &str = "{https://github.com/eclipse-che/che-dashboard.git,https://github.com/che-incubator/che-dashboard.git,https://github.com/a/che-dashboard.git,https://github.com/b/che-dashboard.git}";

const LOCATION: &str = "git@github.com:eclipse-che/che-dashboard.git?session_state=X&che-editor=che-incubator/checode/insiders";

#[divan::bench]
fn parse_positional_remotes() {
    let remotes = parse_remotes(divan::black_box(REMOTES)).unwrap();
    // a simple sanity check
    assert_eq!(remotes[3].name, "fork2")
}

#[divan::bench]
fn normalize_ssh_location() {
    let location = FactoryLocation::parse(divan::black_box(LOCATION)).unwrap();
    // a simple sanity check
    assert!(location.is_ssh())
}

#[divan::bench]
fn set_branch() {
    let location =
        set_branch_to_location("https://gitlab.com/u/p/-/tree/main", Some("feature/x")).unwrap();
    // a simple sanity check
    assert!(location.ends_with("feature/x"))
}

#[divan::bench]
fn apply_options() {
    let current = GitRepoOptions::from_location(
        "https://github.com/u/p/tree/main?remotes={{test-1,http://test-1.git}}&df=devfile2.yaml",
    )
    .unwrap();
    let new = GitRepoOptions {
        git_branch: Some("dev".to_owned()),
        ..current.clone()
    };
    let applied = new.apply_to_location(&current).unwrap();
    // a simple sanity check
    assert!(applied.location.is_some())
}
