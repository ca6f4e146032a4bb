//! End-to-end checks for the `spansi` binary.

use assert_cmd::Command;
use predicates::prelude::*;

fn spansi() -> Command {
    Command::cargo_bin("spansi").expect("binary builds")
}

#[test]
fn converts_stdin_to_html() {
    spansi()
        .write_stdin("\x1b[31mred\x1b[0m plain")
        .assert()
        .success()
        .stdout("<span style=\"color:#A00\">red</span> plain");
}

#[test]
fn converts_file_argument() {
    let path = std::env::temp_dir().join("spansi-cli-file-arg.txt");
    std::fs::write(&path, "\x1b[1mbold\x1b[0m").expect("fixture written");
    spansi()
        .arg(&path)
        .assert()
        .success()
        .stdout("<span style=\"font-weight:bold;\">bold</span>");
}

#[test]
fn newline_flag_renders_breaks() {
    spansi()
        .arg("-n")
        .write_stdin("a\nb")
        .assert()
        .success()
        .stdout("a<br/>b");
}

#[test]
fn escape_xml_flag_encodes_entities() {
    spansi()
        .arg("--escape-xml")
        .write_stdin("<b>")
        .assert()
        .success()
        .stdout("&lt;b&gt;");
}

#[test]
fn fg_flag_changes_default_foreground() {
    spansi()
        .args(["--fg", "#ABC"])
        .write_stdin("\x1b[39mx")
        .assert()
        .success()
        .stdout("<span style=\"color:#ABC\">x</span>");
}

#[test]
fn help_short_circuits_before_conversion() {
    spansi()
        .arg("--help")
        .write_stdin("\x1b[31mignored")
        .assert()
        .success()
        .stdout(predicate::str::contains("Convert ANSI terminal output to HTML"));
}

#[test]
fn missing_file_fails_with_context() {
    spansi()
        .arg("definitely-not-here.log")
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot open"));
}
