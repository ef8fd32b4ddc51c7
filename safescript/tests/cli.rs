use std::fs;
use std::path::Path;
use std::process::{Command, Output};

fn safescript(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_safescript"))
        .args(args)
        .current_dir(dir)
        .env_remove("SAFESCRIPT_LOG")
        .env("NO_COLOR", "1")
        .output()
        .expect("spawn safescript")
}

#[test]
fn check_accepts_a_valid_program() {
    let tmp = tempfile::tempdir().unwrap();
    fs::write(
        tmp.path().join("main.ss"),
        "let x: mutable = 0\nlet y: mutable &- x\n",
    )
    .unwrap();

    let out = safescript(tmp.path(), &["check", "main.ss"]);
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    assert!(stdout.contains("ok: main.ss"), "stdout: {stdout}");
}

#[test]
fn check_reports_borrow_errors() {
    let tmp = tempfile::tempdir().unwrap();
    fs::write(
        tmp.path().join("main.ss"),
        "let x: const = 0\nlet y: mutable &- x\n",
    )
    .unwrap();

    let out = safescript(tmp.path(), &["check", "main.ss"]);
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(!out.status.success());
    assert!(
        stderr.contains("cannot borrow immutable object as mutable"),
        "stderr: {stderr}"
    );

    let out = safescript(tmp.path(), &["check", "main.ss", "--no-borrow-check"]);
    assert!(out.status.success());
}

#[test]
fn build_writes_javascript_next_to_the_input() {
    let tmp = tempfile::tempdir().unwrap();
    fs::write(tmp.path().join("main.ss"), "let a = 1\nconsole.log(a)\n").unwrap();

    let out = safescript(tmp.path(), &["build", "main.ss", "--no-preamble"]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let js = fs::read_to_string(tmp.path().join("main.ss.js")).unwrap();
    assert_eq!(js, "let a = __ssdeepcopy(1);\nconsole.log(a);\n");
}

#[test]
fn build_honors_config_out_dir() {
    let tmp = tempfile::tempdir().unwrap();
    fs::write(
        tmp.path().join("safescript.toml"),
        "[build]\nout-dir = \"dist\"\n",
    )
    .unwrap();
    fs::write(tmp.path().join("main.ss"), "let a = 1\n").unwrap();

    let out = safescript(tmp.path(), &["build", "main.ss"]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let js = fs::read_to_string(tmp.path().join("dist").join("main.ss.js")).unwrap();
    assert!(js.starts_with("function __ssdeepcopy("));
}

#[test]
fn fmt_prints_canonical_form() {
    let tmp = tempfile::tempdir().unwrap();
    fs::write(tmp.path().join("main.ss"), "let   x=1;function f( a ){return a}\n").unwrap();

    let out = safescript(tmp.path(), &["fmt", "main.ss"]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(
        String::from_utf8_lossy(&out.stdout),
        "let x: const = 1\nfunction f(a: const): const {\n    return a\n}\n"
    );
}

#[test]
fn parse_errors_fail_the_command() {
    let tmp = tempfile::tempdir().unwrap();
    fs::write(tmp.path().join("main.ss"), "let = 1\n").unwrap();

    let out = safescript(tmp.path(), &["check", "main.ss"]);
    assert!(!out.status.success());
}
