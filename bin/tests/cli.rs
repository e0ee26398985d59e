use assert_cmd::prelude::*; // Add methods on commands
use assert_fs::prelude::*;
use predicates::prelude::*; // Used for writing assertions
use std::process::Command; // Run programs

const INSTANCE: &str = "a(a,0.1).a(b,0.2).a(c,0.3).p(x).p(y).p(z).
r(a,x,y).
r(b,z).
cl(neg(y),neg(z)).
cl(c,x).
cl(neg(c),neg(z)).
h(y).
";

#[test]
fn arguments() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("pas-bdd")?;
    cmd.arg("-vvv").arg("file.txt");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Error reading file file.txt"));

    cmd = Command::cargo_bin("pas-bdd")?;
    cmd.arg("-v").arg("-q").arg("file.txt");
    cmd.assert().failure().stderr(predicate::str::contains(
        "cannot be used with",
    ));

    cmd = Command::cargo_bin("pas-bdd")?;
    cmd.arg("--computer").arg("sat").arg("file.txt");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("possible values are bdd, expansion"));

    cmd = Command::cargo_bin("pas-bdd")?;
    cmd.arg("-h");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("--computer"));

    cmd = Command::cargo_bin("pas-bdd")?;
    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("pas-bdd "));
    Ok(())
}

#[test]
fn runs() -> Result<(), Box<dyn std::error::Error>> {
    let file = assert_fs::NamedTempFile::new("instance.pas")?;
    file.write_str(INSTANCE)?;

    let mut cmd = Command::cargo_bin("pas-bdd")?;
    cmd.arg(file.path()).arg("-q").arg("--sp");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("hypothesis: [(y)]"))
        .stdout(predicate::str::contains("SP: [a ¬b ¬c]"))
        .stdout(predicate::str::contains("QS:").not())
        .stdout(predicate::str::contains("dsp:").not());

    cmd = Command::cargo_bin("pas-bdd")?;
    cmd.arg(file.path()).arg("-vv");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("QS: ["))
        .stdout(predicate::str::contains("SP: [a ¬b ¬c]"))
        .stdout(predicate::str::contains("dqs: "))
        .stdout(predicate::str::contains("dsp(normalised): "));

    for computer in ["bdd", "expansion"] {
        cmd = Command::cargo_bin("pas-bdd")?;
        cmd.arg(file.path())
            .arg("--computer")
            .arg(computer)
            .arg("--dqs")
            .arg("--dsp")
            .arg("--json");
        let output = cmd.output()?;
        assert!(output.status.success());
        let report: serde_json::Value = serde_json::from_slice(&output.stdout)?;
        assert!(report.get("qs").is_none());
        assert!(report.get("sp").is_none());
        let value = |key: &str| report[key].as_f64().unwrap();
        assert!((value("dqs") - 0.13).abs() < 1e-9);
        assert!((value("dqs_i") - 0.074).abs() < 1e-9);
        assert!((value("dsp") - 0.056).abs() < 1e-9);
        assert!((value("normalised_dsp") - 0.056 / 0.926).abs() < 1e-9);
    }
    Ok(())
}

#[test]
fn parse_errors() -> Result<(), Box<dyn std::error::Error>> {
    let garbage = assert_fs::NamedTempFile::new("garbage.pas")?;
    garbage.write_str("this is not a knowledge base")?;
    let truncated = assert_fs::NamedTempFile::new("truncated.pas")?;
    truncated.write_str("a(a,0.1).p(x).cl(a,x")?;
    let undeclared = assert_fs::NamedTempFile::new("undeclared.pas")?;
    undeclared.write_str("a(a,0.1).cl(a,x).h(a).")?;
    let invalid = assert_fs::NamedTempFile::new("invalid.pas")?;
    invalid.write_str("a(a,1.5).h(a).")?;

    let mut cmd = Command::cargo_bin("pas-bdd")?;
    cmd.arg(garbage.path());
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Error during parsing"));

    cmd = Command::cargo_bin("pas-bdd")?;
    cmd.arg(truncated.path());
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("cannot continue at"))
        .stderr(predicate::str::contains("cl(a,x"));

    cmd = Command::cargo_bin("pas-bdd")?;
    cmd.arg(undeclared.path());
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("the name `x` has not been declared"));

    cmd = Command::cargo_bin("pas-bdd")?;
    cmd.arg(invalid.path());
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("invalid probability 1.5"));
    Ok(())
}

#[test]
fn dot_export() -> Result<(), Box<dyn std::error::Error>> {
    let temp = assert_fs::TempDir::new()?;
    let file = temp.child("instance.pas");
    file.write_str(INSTANCE)?;
    let dot = temp.child("diagram.dot");

    let mut cmd = Command::cargo_bin("pas-bdd")?;
    cmd.arg(file.path()).arg("--dsp").arg("--dot").arg(dot.path());
    cmd.assert().success();
    dot.assert(predicate::path::exists());
    dot.assert(predicate::str::contains("digraph"));

    let untouched = temp.child("untouched.dot");
    cmd = Command::cargo_bin("pas-bdd")?;
    cmd.arg(file.path())
        .arg("--computer")
        .arg("expansion")
        .arg("--dot")
        .arg(untouched.path());
    cmd.assert()
        .success()
        .stderr(predicate::str::contains("only exported by the bdd evaluator"));
    untouched.assert(predicate::path::missing());
    Ok(())
}
