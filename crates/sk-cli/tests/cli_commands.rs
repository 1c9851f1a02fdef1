//! Integration tests for the `skirmish` binary.

#![allow(deprecated)] // Command::cargo_bin – macro replacement not yet stable

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Write an encounter file into a fresh temp directory.
fn encounter(json: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("encounter.json");
    fs::write(&path, json).unwrap();
    (dir, path)
}

/// A fight the hero cannot lose inside the round cap.
fn lopsided() -> (TempDir, PathBuf) {
    encounter(
        r#"{
    "participants": [
        {
            "name": "Hero",
            "initiative": 20,
            "max_hp": 100,
            "ac": 18,
            "level": 5,
            "ability_scores": {
                "strength": 18, "dexterity": 12, "constitution": 14,
                "intelligence": 10, "wisdom": 10, "charisma": 10
            },
            "equipped_weapon": "greatsword"
        },
        {
            "name": "Rat",
            "is_enemy": true,
            "initiative": 1,
            "max_hp": 1,
            "ac": 1
        }
    ]
}"#,
    )
}

fn skirmish() -> Command {
    Command::cargo_bin("skirmish").unwrap()
}

// ---------------------------------------------------------------------------
// roll
// ---------------------------------------------------------------------------

#[test]
fn roll_shows_die_and_seed() {
    skirmish()
        .args(["roll", "20", "--modifier", "3", "--seed", "7"])
        .assert()
        .success()
        .stdout(predicate::str::contains("d20 [").and(predicate::str::contains("seed=7")));
}

#[test]
fn roll_is_reproducible_with_seed() {
    let first = skirmish().args(["roll", "12", "-s", "99"]).output().unwrap();
    let second = skirmish().args(["roll", "12", "-s", "99"]).output().unwrap();
    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn roll_accepts_negative_modifier() {
    skirmish()
        .args(["roll", "6", "--modifier", "-2", "--seed", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains(" - 2 = "));
}

#[test]
fn roll_rejects_zero_sides() {
    skirmish()
        .args(["roll", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}

#[test]
fn roll_rejects_overflowing_modifier() {
    skirmish()
        .args(["roll", "20", "--modifier", "2147483647", "--seed", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("overflows the total"));
}

// ---------------------------------------------------------------------------
// armaments
// ---------------------------------------------------------------------------

#[test]
fn armaments_lists_weapons_and_spells() {
    skirmish()
        .arg("armaments")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("longsword")
                .and(predicate::str::contains("fire_bolt"))
                .and(predicate::str::contains("unarmed")),
        );
}

#[test]
fn armaments_spells_only() {
    skirmish()
        .args(["armaments", "--spells"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("fire_bolt").and(predicate::str::contains("longsword").not()),
        );
}

#[test]
fn armaments_weapons_only() {
    skirmish()
        .args(["armaments", "--weapons"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("longsword").and(predicate::str::contains("fire_bolt").not()),
        );
}

#[test]
fn armaments_filters_conflict() {
    skirmish()
        .args(["armaments", "--spells", "--weapons"])
        .assert()
        .failure();
}

// ---------------------------------------------------------------------------
// simulate
// ---------------------------------------------------------------------------

#[test]
fn simulate_reports_winner_and_status() {
    let (_dir, path) = lopsided();
    skirmish()
        .args(["simulate", path.to_str().unwrap(), "--seed", "3"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Players win")
                .and(predicate::str::contains("Participant Status"))
                .and(predicate::str::contains("unconscious")),
        );
}

#[test]
fn simulate_verbose_prints_log() {
    let (_dir, path) = lopsided();
    skirmish()
        .args(["simulate", path.to_str().unwrap(), "--verbose"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Combat Log")
                .and(predicate::str::contains("combat started with 2 participants"))
                .and(predicate::str::contains("greatsword")),
        );
}

#[test]
fn simulate_is_reproducible_with_seed() {
    let (_dir, path) = lopsided();
    let path = path.to_str().unwrap();
    let first = skirmish().args(["simulate", path, "-s", "11"]).output().unwrap();
    let second = skirmish().args(["simulate", path, "-s", "11"]).output().unwrap();
    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn simulate_round_cap_without_targets() {
    let (_dir, path) = encounter(
        r#"{
    "config": { "seed": 5 },
    "participants": [
        { "name": "Ghost", "initiative": 10, "max_hp": 5 },
        { "name": "Shade", "is_enemy": true, "initiative": 8, "max_hp": 5 }
    ]
}"#,
    );
    skirmish()
        .args(["simulate", path.to_str().unwrap(), "--rounds", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No winner after 3 rounds"));
}

#[test]
fn simulate_missing_file() {
    skirmish()
        .args(["simulate", "does-not-exist.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot read"));
}

#[test]
fn simulate_malformed_json() {
    let (_dir, path) = encounter("{ not json");
    skirmish()
        .args(["simulate", path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid encounter file"));
}

#[test]
fn simulate_rejects_invalid_participant() {
    let (_dir, path) = encounter(r#"{ "participants": [ { "name": "Nobody", "max_hp": 0 } ] }"#);
    skirmish()
        .args(["simulate", path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("max hp must be at least 1"));
}

#[test]
fn simulate_rejects_unknown_weapon() {
    let (_dir, path) = encounter(
        r#"{ "participants": [ { "name": "Clown", "max_hp": 4, "equipped_weapon": "pie" } ] }"#,
    );
    skirmish()
        .args(["simulate", path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown weapon or spell: pie"));
}

#[test]
fn simulate_rejects_empty_encounter() {
    let (_dir, path) = encounter(r#"{ "participants": [] }"#);
    skirmish()
        .args(["simulate", path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("encounter has no participants"))
        .stdout(predicate::str::contains("win").not());
}
