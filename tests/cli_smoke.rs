use assert_cmd::Command;
use predicates::prelude::*;

mod support;

fn tdo(home: &support::TestHome) -> Command {
    let mut cmd = Command::cargo_bin("tdo").expect("binary");
    cmd.env("TDO_DATA_DIR", home.path());
    cmd.env_remove("TDO_REMOTE_URL");
    cmd
}

#[test]
fn add_list_done_rm_round_trip() {
    let home = support::TestHome::new();

    tdo(&home)
        .args([
            "add",
            "--id",
            "t1",
            "--title",
            "Write report",
            "--desc",
            "quarterly numbers",
            "--deadline",
            "2999-06-01",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added task"));

    tdo(&home)
        .args(["list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Write report"))
        .stdout(predicate::str::contains("[ ]"));

    tdo(&home)
        .args(["done", "t1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Completed task"));

    tdo(&home)
        .args(["list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[x]"));

    tdo(&home).args(["rm", "t1"]).assert().success();

    tdo(&home)
        .args(["show", "t1"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Task not found"));
}

#[test]
fn json_envelopes_parse() {
    let home = support::TestHome::new();

    tdo(&home)
        .args([
            "add",
            "--id",
            "t1",
            "--title",
            "A",
            "--desc",
            "d",
            "--deadline",
            "2000-01-01",
            "--json",
        ])
        .assert()
        .success();

    let output = tdo(&home)
        .args(["list", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let envelope: serde_json::Value = serde_json::from_slice(&output).expect("json");

    assert_eq!(envelope["schema_version"], "tdo.v1");
    assert_eq!(envelope["command"], "list");
    assert_eq!(envelope["status"], "success");
    assert_eq!(envelope["data"]["count"], 1);
    // Past deadline on an incomplete task: the list refresh marks it overdue.
    assert_eq!(envelope["data"]["tasks"][0]["overdue"], true);
}

#[test]
fn duplicate_id_is_rejected() {
    let home = support::TestHome::new();
    let add = |home: &support::TestHome| {
        let mut cmd = tdo(home);
        cmd.args([
            "add",
            "--id",
            "dup",
            "--title",
            "A",
            "--desc",
            "d",
            "--deadline",
            "2999-01-01",
        ]);
        cmd
    };

    add(&home).assert().success();
    add(&home)
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn filter_persists_between_invocations() {
    let home = support::TestHome::new();

    tdo(&home)
        .args([
            "add", "--id", "t1", "--title", "A", "--desc", "d", "--deadline", "2999-01-01",
        ])
        .assert()
        .success();
    tdo(&home)
        .args([
            "add", "--id", "t2", "--title", "B", "--desc", "d", "--deadline", "2999-01-01",
        ])
        .assert()
        .success();
    tdo(&home).args(["done", "t2"]).assert().success();

    tdo(&home)
        .args(["filter", "completed"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Filter set to completed"));

    tdo(&home)
        .args(["list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("B"))
        .stdout(predicate::str::contains("A").not());
}

#[test]
fn move_reorders_the_list() {
    let home = support::TestHome::new();

    for id in ["t1", "t2", "t3"] {
        tdo(&home)
            .args([
                "add", "--id", id, "--title", id, "--desc", "d", "--deadline", "2999-01-01",
            ])
            .assert()
            .success();
    }

    tdo(&home)
        .args(["move", "t3", "--to", "1"])
        .assert()
        .success();

    let output = tdo(&home)
        .args(["list", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let envelope: serde_json::Value = serde_json::from_slice(&output).expect("json");
    let ids: Vec<&str> = envelope["data"]["tasks"]
        .as_array()
        .expect("tasks")
        .iter()
        .map(|task| task["id"].as_str().expect("id"))
        .collect();
    assert_eq!(ids, ["t3", "t1", "t2"]);
}

#[test]
fn edit_updates_fields() {
    let home = support::TestHome::new();

    tdo(&home)
        .args([
            "add", "--id", "t1", "--title", "Old", "--desc", "d", "--deadline", "2999-01-01",
        ])
        .assert()
        .success();

    tdo(&home)
        .args(["edit", "t1", "--title", "New", "--deadline", "2999-02-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated task"));

    tdo(&home)
        .args(["show", "t1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("New"))
        .stdout(predicate::str::contains("2999-02-01"));

    tdo(&home)
        .args(["edit", "t1"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("nothing to edit"));
}

#[test]
fn fetch_without_endpoint_is_a_user_error() {
    let home = support::TestHome::new();

    tdo(&home)
        .args(["fetch"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("no remote endpoint"));
}

#[test]
fn fetch_against_dead_endpoint_fails_with_operation_error() {
    let home = support::TestHome::new();
    home.write_config("[remote]\nurl = \"http://127.0.0.1:1/api/todos\"\n");

    tdo(&home)
        .args(["fetch"])
        .assert()
        .failure()
        .code(4)
        .stderr(predicate::str::contains("Remote load failed"));
}

#[test]
fn bad_deadline_is_rejected() {
    let home = support::TestHome::new();

    tdo(&home)
        .args([
            "add", "--title", "A", "--desc", "d", "--deadline", "tomorrow",
        ])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("invalid deadline"));
}
