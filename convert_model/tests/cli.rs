use assert_cmd::Command;
use std::fs;
use tempfile::TempDir;

fn temp_workspace() -> TempDir {
    tempfile::tempdir().expect("create tempdir")
}

fn record(class_id: u32, ngram: &[u8], count: u32) -> Vec<u8> {
    let mut buf = vec![];
    buf.extend_from_slice(&class_id.to_le_bytes());
    buf.extend_from_slice(&(ngram.len() as u32).to_le_bytes());
    buf.extend_from_slice(ngram);
    buf.extend_from_slice(&count.to_le_bytes());
    buf
}

#[test]
fn text_to_binary() {
    let workspace = temp_workspace();
    fs::write(
        workspace.path().join("model.txt"),
        "1 the cat 2\n\n0 <s> le 1\nnot a record\n1 the cat 3\n",
    )
    .expect("write text model");

    Command::cargo_bin("convert_model")
        .expect("binary exists")
        .current_dir(workspace.path())
        .args(["--model-in", "model.txt", "--text-in", "--model-out", "model.bin"])
        .assert()
        .success();

    let mut expected = record(0, b"<s> le", 1);
    expected.extend(record(1, b"the cat", 5));
    let written = fs::read(workspace.path().join("model.bin")).expect("read model");
    assert_eq!(expected, written);
}

#[test]
fn merge_binary_shards_and_dump() {
    let workspace = temp_workspace();
    let mut shard1 = record(2, "猫".as_bytes(), 4);
    shard1.extend(record(0, b"ab", 1));
    let shard2 = record(2, "猫".as_bytes(), 6);
    fs::write(workspace.path().join("shard1.bin"), shard1).expect("write shard");
    fs::write(workspace.path().join("shard2.bin"), shard2).expect("write shard");

    Command::cargo_bin("convert_model")
        .expect("binary exists")
        .current_dir(workspace.path())
        .args([
            "--model-in",
            "shard1.bin",
            "--model-in",
            "shard2.bin",
            "--model-out",
            "merged.bin",
            "--dump-text",
            "merged.txt",
        ])
        .assert()
        .success();

    let mut expected = record(0, b"ab", 1);
    expected.extend(record(2, "猫".as_bytes(), 10));
    let written = fs::read(workspace.path().join("merged.bin")).expect("read model");
    assert_eq!(expected, written);

    let text = fs::read_to_string(workspace.path().join("merged.txt")).expect("read text");
    assert_eq!("0 ab 1\n2 猫 10\n", text);
}

#[test]
fn truncated_binary_fails() {
    let workspace = temp_workspace();
    let mut data = record(0, b"abc", 1);
    data.truncate(data.len() - 2);
    fs::write(workspace.path().join("broken.bin"), data).expect("write model");

    Command::cargo_bin("convert_model")
        .expect("binary exists")
        .current_dir(workspace.path())
        .args(["--model-in", "broken.bin", "--model-out", "out.bin"])
        .assert()
        .code(1);
    assert!(!workspace.path().join("out.bin").exists());
}

#[test]
fn missing_input_fails() {
    Command::cargo_bin("convert_model")
        .expect("binary exists")
        .args(["--model-out", "out.bin"])
        .assert()
        .code(1);
}

#[test]
fn dump_of_space_ngram_fails_without_output() {
    let workspace = temp_workspace();
    let mut data = record(0, b"a", 1);
    data.extend(record(0, b" ", 1));
    fs::write(workspace.path().join("model.bin"), data).expect("write model");

    Command::cargo_bin("convert_model")
        .expect("binary exists")
        .current_dir(workspace.path())
        .args(["--model-in", "model.bin", "--model-out", "out.bin", "--dump-text", "out.txt"])
        .assert()
        .code(1);
    assert!(!workspace.path().join("out.bin").exists());
    assert!(!workspace.path().join("out.txt").exists());
}
