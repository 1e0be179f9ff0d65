mod support;

use predicates::str::contains;

#[test]
fn svctrack_help_works() {
    support::svctrack_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("service-call tracker"));
}

#[test]
fn subcommand_help_works() {
    let subcommands: [&[&str]; 11] = [
        &["init"],
        &["tech", "add"],
        &["tech", "list"],
        &["task", "add"],
        &["task", "list"],
        &["task", "show"],
        &["task", "update"],
        &["task", "done"],
        &["task", "rm"],
        &["report"],
        &["export"],
    ];

    for cmd in subcommands {
        support::svctrack_cmd()
            .args(cmd)
            .arg("--help")
            .assert()
            .success();
    }
}

#[test]
fn init_creates_config_and_data_files() -> Result<(), Box<dyn std::error::Error>> {
    let root = support::TestRoot::new();

    root.cmd()
        .arg("init")
        .assert()
        .success()
        .stdout(contains("svctrack init: initialized"));

    assert!(root.path().join(".svctrack.toml").exists());
    assert!(root.tasks()?.is_empty());
    assert!(root.technicians()?.is_empty());

    root.cmd()
        .arg("init")
        .assert()
        .success()
        .stdout(contains("config already present"));

    Ok(())
}
