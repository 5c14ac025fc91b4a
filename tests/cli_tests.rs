use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::tempdir;

const TINY: [&str; 6] = ["--width", "1", "--height", "1", "--connect", "1"];

fn connect4() -> Command {
    Command::cargo_bin("connect4").expect("binary exists")
}

fn run_tiny(args: &[&str]) {
    connect4().args(TINY).args(args).assert().success();
}

fn p(path: &Path) -> &str {
    path.to_str().expect("utf-8 path")
}

#[test]
fn print_constants_emits_json() {
    let out = connect4().arg("print-constants").output().expect("run");
    assert!(out.status.success());
    let v: Value = serde_json::from_slice(&out.stdout).expect("json");
    assert_eq!(v["number_of_possible_columns"], 111);
    assert_eq!(v["num_base62_board_digits"], 8);
    assert_eq!(v["num_base256_board_digits"], 6);
}

#[test]
fn solve_prints_root_score() {
    connect4()
        .args(TINY)
        .arg("solve")
        .assert()
        .success()
        .stdout(predicate::str::contains("A wins in 1 ply"));
}

#[test]
fn stdio_sentinels_select_process_streams() {
    connect4()
        .args(TINY)
        .args(["make-initial-node", "STDOUT"])
        .assert()
        .success()
        .stdout("0?0\n");

    connect4()
        .args(TINY)
        .args(["make-nodes", "STDIN", "STDOUT"])
        .write_stdin("0?0\n")
        .assert()
        .success()
        .stdout("1A0\n");
}

#[test]
fn file_pipeline_resolves_the_tiny_game() {
    let td = tempdir().expect("temp dir");
    let gen0 = td.path().join("gen0.txt");
    let gen1 = td.path().join("gen1.txt");
    let edges = td.path().join("edges.txt");
    let child = td.path().join("child.txt");
    let resolved = td.path().join("resolved.txt");
    let table = td.path().join("table.bin");

    run_tiny(&["make-initial-node", p(&gen0)]);
    run_tiny(&["make-nodes", p(&gen0), p(&gen1)]);
    run_tiny(&["make-edges", p(&gen0), p(&edges)]);
    run_tiny(&["make-edges-with-score", p(&edges), p(&gen1), p(&child)]);
    run_tiny(&["make-nodes-with-score", p(&gen0), p(&child), p(&resolved)]);
    run_tiny(&["make-binary-file", p(&resolved), p(&table)]);

    assert_eq!(fs::read_to_string(&gen1).unwrap(), "1A0\n");
    assert_eq!(fs::read_to_string(&edges).unwrap(), "10\n");
    assert_eq!(fs::read_to_string(&child).unwrap(), "0A0\n");
    assert_eq!(fs::read_to_string(&resolved).unwrap(), "0A1\n");
    assert_eq!(fs::read(&table).unwrap(), vec![0x00, 0x41]);
}

#[test]
fn missing_destination_fails_the_pass() {
    let td = tempdir().expect("temp dir");
    let edges = td.path().join("edges.txt");
    let scores = td.path().join("scores.txt");
    let out = td.path().join("out.txt");
    fs::write(&edges, "10\n").unwrap();
    fs::write(&scores, "2B0\n").unwrap();

    connect4()
        .args(TINY)
        .args(["make-edges-with-score", p(&edges), p(&scores), p(&out)])
        .assert()
        .failure()
        .stderr(predicate::str::contains("UnresolvedDestination"));
}

#[test]
fn query_reads_a_solved_table() {
    let td = tempdir().expect("temp dir");
    let table = td.path().join("table.bin");
    run_tiny(&["solve", "--binary-out", p(&table)]);
    assert_eq!(fs::read(&table).unwrap(), vec![0x00, 0x41, 0x01, 0x40]);

    Command::cargo_bin("query")
        .expect("binary exists")
        .args(TINY)
        .args(["--table", p(&table)])
        .assert()
        .success()
        .stdout(predicate::str::contains("Found: A wins in 1 ply"))
        .stdout(predicate::str::contains("Best moves: 1 (A wins in 0 ply)"));
}

#[test]
fn query_plays_interactively_from_stdin() {
    let td = tempdir().expect("temp dir");
    let table = td.path().join("table.bin");
    run_tiny(&["solve", "--binary-out", p(&table)]);

    Command::cargo_bin("query")
        .expect("binary exists")
        .args(TINY)
        .args(["--table", p(&table), "--play"])
        .write_stdin("i\n1\nm\nq\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Current score ...... : A wins in 1 ply"))
        .stdout(predicate::str::contains("Player A has won after 1 moves."))
        .stdout(predicate::str::contains("The game is finished."))
        .stdout(predicate::str::contains("Bye!"));
}

#[test]
fn invalid_geometry_is_rejected() {
    connect4()
        .args(["--width", "8", "--height", "8", "print-constants"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("InvalidRules"));
}
