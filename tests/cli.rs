#![forbid(unsafe_code)]
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn cli(school: &Path) -> Command {
    let mut cmd = Command::cargo_bin("suppleance-cli").unwrap();
    cmd.arg("--school").arg(school);
    cmd
}

fn run(school: &Path, args: &[&str]) {
    cli(school).args(args).assert().success();
}

/// T1 Alice (Maths 6A, lundi P2), T2 Bruno, T3 Chloé ; Alice absente le 2025-10-20.
fn seed(school: &Path) {
    for (id, name) in [("T1", "Alice"), ("T2", "Bruno"), ("T3", "Chloé")] {
        cli(school)
            .args(["add-teacher", "--id", id, "--name", name])
            .assert()
            .success()
            .stdout(predicate::str::contains(id));
    }
    run(school, &["add-class", "--id", "C1", "--name", "6A"]);
    run(school, &["add-subject", "--id", "S1", "--name", "Maths"]);
    run(school, &["assign", "--teacher", "T1", "--subject", "S1", "--class", "C1"]);
    run(
        school,
        &["set-slot", "--class", "C1", "--day", "Monday", "--period", "2", "--subject", "S1"],
    );
    run(
        school,
        &["mark", "--teacher", "Alice", "--status", "absent", "--date", "2025-10-20"],
    );
}

#[test]
fn suggest_prints_report() {
    let dir = tempdir().unwrap();
    let school = dir.path().join("school.json");
    seed(&school);

    cli(&school)
        .args(["suggest", "--date", "2025-10-20"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Substitutions for 2025-10-20"))
        .stdout(predicate::str::contains("Maths – Class 6A | Period 2"))
        .stdout(predicate::str::contains("Bruno is available"))
        .stdout(predicate::str::contains("Chloé is available"))
        .stdout(predicate::str::contains("Alice is available").not());

    cli(&school)
        .args(["absentees", "--date", "2025-10-20"])
        .assert()
        .success()
        .stdout("T1 | Alice\n");

    cli(&school)
        .args(["absentees", "--date", "2025-10-21"])
        .assert()
        .success()
        .stdout("All teachers are present on 2025-10-21.\n");
}

#[test]
fn suggest_exports_csv() {
    let dir = tempdir().unwrap();
    let school = dir.path().join("school.json");
    seed(&school);
    let out = dir.path().join("report.csv");

    cli(&school)
        .args(["suggest", "--date", "2025-10-20", "--teacher", "T1", "--out-csv"])
        .arg(&out)
        .assert()
        .success();
    let csv = fs::read_to_string(&out).unwrap();
    assert!(csv.contains("2025-10-20,T1,Alice,Monday,2,C1,S1,T2,Bruno"));
    assert!(csv.contains("2025-10-20,T1,Alice,Monday,2,C1,S1,T3,Chloé"));
}

#[test]
fn suggest_for_present_teacher_fails() {
    let dir = tempdir().unwrap();
    let school = dir.path().join("school.json");
    seed(&school);

    cli(&school)
        .args(["suggest", "--date", "2025-10-20", "--teacher", "Bruno"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not marked absent"));
}

#[test]
fn invalid_slot_is_rejected() {
    let dir = tempdir().unwrap();
    let school = dir.path().join("school.json");
    seed(&school);

    cli(&school)
        .args(["set-slot", "--class", "C1", "--day", "mon", "--period", "9", "--subject", "S1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("out of range"));
    cli(&school)
        .args(["set-slot", "--class", "C1", "--day", "Funday", "--period", "1", "--subject", "S1"])
        .assert()
        .failure();
}

#[test]
fn check_reports_double_booking() {
    let dir = tempdir().unwrap();
    let school = dir.path().join("school.json");
    seed(&school);

    cli(&school)
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("OK: no conflicts"));

    run(&school, &["add-class", "--id", "C2", "--name", "6B"]);
    run(&school, &["add-subject", "--id", "S2", "--name", "History"]);
    run(&school, &["assign", "--teacher", "T1", "--subject", "S2", "--class", "C2"]);
    run(
        &school,
        &["set-slot", "--class", "C2", "--day", "Monday", "--period", "2", "--subject", "S2"],
    );

    let report = dir.path().join("conflicts.csv");
    cli(&school)
        .arg("check")
        .arg("--report")
        .arg(&report)
        .assert()
        .code(2);
    let csv = fs::read_to_string(&report).unwrap();
    assert!(csv.contains("double_booking,T1,C1;C2,S1;S2,Monday,2"));
}

#[test]
fn timetable_views() {
    let dir = tempdir().unwrap();
    let school = dir.path().join("school.json");
    seed(&school);

    cli(&school)
        .args(["timetable", "--teacher", "Alice"])
        .assert()
        .success()
        .stdout("Monday P2 | Maths – Class 6A | Alice\n");
    cli(&school)
        .args(["timetable", "--teacher", "Bruno"])
        .assert()
        .success()
        .stdout("No timetable data found.\n");
}

#[cfg(feature = "sqlite")]
#[test]
fn suggest_from_database_resolves_teacher_there() {
    let dir = tempdir().unwrap();
    let school = dir.path().join("school.json");
    seed(&school);
    let db = dir.path().join("school.db");

    cli(&school)
        .arg("export-sqlite")
        .arg("--out")
        .arg(&db)
        .assert()
        .success()
        .stdout(predicate::str::contains("exported to"));

    // fichier JSON absent : tout doit venir de la base
    let elsewhere = dir.path().join("elsewhere.json");
    for key in ["T1", "Alice"] {
        cli(&elsewhere)
            .args(["suggest", "--date", "2025-10-20", "--teacher", key, "--db"])
            .arg(&db)
            .assert()
            .success()
            .stdout(predicate::str::contains("Alice (T1)"))
            .stdout(predicate::str::contains("Bruno is available"));
    }
    cli(&elsewhere)
        .args(["absentees", "--date", "2025-10-20", "--db"])
        .arg(&db)
        .assert()
        .success()
        .stdout("T1 | Alice\n");
    cli(&elsewhere)
        .args(["suggest", "--date", "2025-10-20", "--teacher", "Zoé", "--db"])
        .arg(&db)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown teacher: Zoé"));
    assert!(!elsewhere.exists());
}
