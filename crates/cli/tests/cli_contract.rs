use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

const CARLOS: &str = "3f2504e0-4f89-41d3-9a0c-0305e82c3301";
const ANA: &str = "7c9e6679-7425-40de-944b-e07fc1f90ae7";

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

/// Data dir seeded with the two-comment `artigo-1` document
fn seeded_data_dir() -> tempfile::TempDir {
    let temp = tempfile::tempdir().expect("temp dir should be created");
    let comments_dir = temp.path().join("comments");
    fs::create_dir_all(&comments_dir).expect("comments dir should be created");
    fs::copy(fixture("artigo-1.json"), comments_dir.join("artigo-1.json"))
        .expect("fixture should be copied");
    temp
}

fn bugwave(data_dir: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("bugwave");
    cmd.arg("--data-dir").arg(data_dir).env_remove("BUGWAVE_DATA_DIR");
    cmd
}

fn stdout_of(cmd: &mut assert_cmd::Command) -> String {
    let output = cmd.assert().success().get_output().stdout.clone();
    String::from_utf8(output).expect("stdout should be utf-8")
}

fn list_json(data_dir: &Path) -> Value {
    let stdout = stdout_of(bugwave(data_dir).args(["list", "--document", "artigo-1", "--json"]));
    serde_json::from_str(&stdout).expect("stdout should contain valid json")
}

#[test]
fn version_prints_package_version() {
    cargo_bin_cmd!("bugwave")
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn list_prints_comments_in_order() {
    let data = seeded_data_dir();
    let stdout = stdout_of(bugwave(data.path()).args(["list", "--document", "artigo-1"]));

    insta::assert_snapshot!(stdout.trim_end(), @r"
    3f2504e0-4f89-41d3-9a0c-0305e82c3301  (550.0, 500.0)  Prof. Carlos Santos  16/10/2026 14:30
        Revise esta conclusão, pois ela não aborda completamente os objetivos.
    7c9e6679-7425-40de-944b-e07fc1f90ae7  (120.0, 80.0)  Prof. Ana Lima  15/10/2026 09:05
        Adicione mais referências
        sobre o tema.
    ");
}

#[test]
fn list_of_unknown_document_is_empty() {
    let data = tempfile::tempdir().expect("temp dir should be created");

    bugwave(data.path())
        .args(["list", "--document", "never-saved"])
        .assert()
        .success()
        .stdout(predicate::str::contains("no comments"));
}

#[test]
fn list_filters_by_author_and_text() {
    let data = seeded_data_dir();

    bugwave(data.path())
        .args(["list", "--document", "artigo-1", "--author", "Prof. Ana Lima"])
        .assert()
        .success()
        .stdout(predicate::str::contains(ANA).and(predicate::str::contains(CARLOS).not()));

    bugwave(data.path())
        .args(["list", "--document", "artigo-1", "--search", "CONCLUSÃO"])
        .assert()
        .success()
        .stdout(predicate::str::contains(CARLOS).and(predicate::str::contains(ANA).not()));

    bugwave(data.path())
        .args(["list", "--document", "artigo-1", "--author", "Prof. Ana Lima"])
        .args(["--search", "conclusão"])
        .assert()
        .success()
        .stdout(predicate::str::contains("no comments"));
}

#[test]
fn add_by_reviewer_is_persisted() {
    let data = seeded_data_dir();

    let stdout = stdout_of(bugwave(data.path()).args([
        "add",
        "--document",
        "artigo-1",
        "--role",
        "avaliador",
        "--x",
        "300",
        "--y",
        "42.5",
        "--text",
        "Figura 2 sem legenda",
        "--author",
        "Prof. Carlos Santos",
    ]));
    let id = stdout.trim().to_string();
    assert_eq!(id.len(), 36, "stdout should hold the new comment id");

    let comments = list_json(data.path());
    let comments = comments.as_array().expect("list should be an array");
    assert_eq!(comments.len(), 3);
    let added = &comments[2];
    assert_eq!(added["id"], Value::String(id));
    assert_eq!(added["text"], "Figura 2 sem legenda");
    assert_eq!(added["author"], "Prof. Carlos Santos");
    assert_eq!(added["position"]["x"], 300.0);
    assert_eq!(added["position"]["y"], 42.5);
}

#[test]
fn add_by_student_is_ignored() {
    let data = tempfile::tempdir().expect("temp dir should be created");

    bugwave(data.path())
        .args(["add", "--document", "artigo-2", "--role", "aluno"])
        .args(["--x", "1", "--y", "1", "--text", "oi"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("role cannot author comments"));

    assert!(!data.path().join("comments").join("artigo-2.json").exists());
}

#[test]
fn add_rejects_blank_text_and_negative_positions() {
    let data = seeded_data_dir();

    bugwave(data.path())
        .args(["add", "--document", "artigo-1", "--role", "reviewer"])
        .args(["--x", "1", "--y", "1", "--text", "   "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("comment text is empty"));

    bugwave(data.path())
        .args(["add", "--document", "artigo-1", "--role", "reviewer"])
        .args(["--x", "-5", "--y", "1", "--text", "x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("position must be finite and non-negative"));

    assert_eq!(list_json(data.path()).as_array().map(Vec::len), Some(2));
}

#[test]
fn edit_rewrites_text_only() {
    let data = seeded_data_dir();

    bugwave(data.path())
        .args(["edit", "--document", "artigo-1", "--role", "coordenador", "--id", ANA])
        .args(["--text", "Cite Silva (2020)."])
        .assert()
        .success();

    let comments = list_json(data.path());
    let edited = &comments[1];
    assert_eq!(edited["id"], ANA);
    assert_eq!(edited["text"], "Cite Silva (2020).");
    assert_eq!(edited["author"], "Prof. Ana Lima");
    assert_eq!(edited["position"]["x"], 120.0);
    assert_ne!(edited["timestamp"], "2026-10-15T09:05:00Z");
}

#[test]
fn edit_of_unknown_comment_fails() {
    let data = seeded_data_dir();

    bugwave(data.path())
        .args([
            "edit",
            "--document",
            "artigo-1",
            "--role",
            "avaliador",
            "--id",
            "00000000-0000-4000-8000-000000000000",
            "--text",
            "x",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("comment does not exist"));
}

#[test]
fn delete_removes_the_comment() {
    let data = seeded_data_dir();

    bugwave(data.path())
        .args(["delete", "--document", "artigo-1", "--role", "avaliador", "--id", CARLOS])
        .assert()
        .success();

    let comments = list_json(data.path());
    let ids: Vec<&str> =
        comments.as_array().expect("array").iter().filter_map(|c| c["id"].as_str()).collect();
    assert_eq!(ids, vec![ANA]);
}

#[test]
fn delete_by_student_leaves_the_file_alone() {
    let data = seeded_data_dir();

    bugwave(data.path())
        .args(["delete", "--document", "artigo-1", "--role", "aluno", "--id", CARLOS])
        .assert()
        .failure()
        .stderr(predicate::str::contains("role cannot author comments"));

    assert_eq!(list_json(data.path()).as_array().map(Vec::len), Some(2));
}

#[test]
fn render_shows_actions_for_authors_only() {
    let data = seeded_data_dir();

    let render = |role: &str| -> Value {
        let stdout = stdout_of(bugwave(data.path()).args([
            "render",
            "--document",
            "artigo-1",
            "--role",
            role,
            "--active",
            CARLOS,
        ]));
        serde_json::from_str(&stdout).expect("stdout should contain valid json")
    };

    let reviewer = render("avaliador");
    assert_eq!(reviewer["role"], "author-capable");
    assert_eq!(reviewer["document"]["id"], "artigo-1");
    assert_eq!(reviewer["frame"]["markers"].as_array().map(Vec::len), Some(2));
    assert_eq!(reviewer["frame"]["popup"]["comment_id"], CARLOS);
    assert!(reviewer["frame"]["popup"].get("edit_button").is_some());
    assert!(reviewer["frame"]["editor"].is_null());

    let student = render("aluno");
    assert_eq!(student["role"], "viewer-only");
    assert_eq!(student["frame"]["popup"]["comment_id"], CARLOS);
    assert!(student["frame"]["popup"].get("edit_button").is_none());
}

#[test]
fn render_scene_lists_paint_primitives() {
    let data = seeded_data_dir();

    let stdout = stdout_of(bugwave(data.path()).args([
        "render",
        "--document",
        "artigo-1",
        "--role",
        "aluno",
        "--active",
        ANA,
        "--scene",
    ]));
    let value: Value = serde_json::from_str(&stdout).expect("stdout should contain valid json");

    assert!(value.get("frame").is_none());
    let scene = value["scene"].as_array().expect("scene should be an array");
    // Two markers paint first, then the open card
    assert_eq!(scene[0]["kind"], "circle");
    assert_eq!(scene[1]["kind"], "circle");
    assert_eq!(scene[2]["kind"], "rectangle");
    assert!(scene.iter().any(|p| p["kind"] == "text" && p["content"] == "Prof. Ana Lima"));
}

#[test]
fn render_of_unknown_hover_fails() {
    let data = seeded_data_dir();

    bugwave(data.path())
        .args([
            "render",
            "--document",
            "artigo-1",
            "--role",
            "aluno",
            "--hover",
            "00000000-0000-4000-8000-000000000000",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("comment does not exist"));
}

#[test]
fn data_dir_can_come_from_environment() {
    let data = seeded_data_dir();

    cargo_bin_cmd!("bugwave")
        .args(["list", "--document", "artigo-1"])
        .env("BUGWAVE_DATA_DIR", data.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(CARLOS));
}
