use assert_cmd::Command;
use tempfile::tempdir;

const RECORD: &str = "\
開始日時：2024/01/01
手合割：平手
先手：A
後手：B

▲７六歩 △３四歩 ▲２六歩
*居飛車
△８四歩
変化：3手
▲２二角成 △同　銀
";

#[test]
fn test_expands_variations_to_file() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("game.ki2");
    std::fs::write(&input, RECORD).unwrap();

    let assert = Command::cargo_bin("rshogi-ki2").unwrap().arg(&input).assert().success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert!(stdout.contains("指し手: 6個中 6個を解析"), "{stdout}");
    assert!(stdout.contains("合流局面: 0"), "{stdout}");
    assert!(stdout.contains("展開ノード数: 6"), "{stdout}");

    let out = std::fs::read_to_string(dir.path().join("game_expanded.ki2")).unwrap();
    assert!(out.starts_with("開始日時：2024/01/01\n手合割：平手\n先手：A\n後手：B\n\n"), "{out}");
    assert!(out.contains("▲７六歩    △３四歩    ▲２六歩\n*居飛車\n△８四歩\n"), "{out}");
    assert!(out.contains("\n変化：3手\n▲２二角成    △同　銀\n"), "{out}");
    assert!(!dir.path().join("game_expanded.json").exists());
}

#[test]
fn test_json_and_suffix_from_config() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("g.ki2");
    std::fs::write(&input, "▲７六歩 △３四歩\n").unwrap();
    let config = dir.path().join("ki2.toml");
    std::fs::write(&config, "output_suffix = \"_tree\"\nwrite_json = true\n").unwrap();
    let out_dir = dir.path().join("out");

    Command::cargo_bin("rshogi-ki2")
        .unwrap()
        .arg(&input)
        .arg("--config")
        .arg(&config)
        .arg("--output-dir")
        .arg(&out_dir)
        .assert()
        .success();

    assert!(out_dir.join("g_tree.ki2").exists());
    let json = std::fs::read_to_string(out_dir.join("g_tree.json")).unwrap();
    assert!(json.contains("\"usi\": \"7g7f\""), "{json}");
    assert!(json.contains("\"notation\": \"３四歩\""), "{json}");
}

#[test]
fn test_bad_config_fails() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("g.ki2");
    std::fs::write(&input, "▲７六歩\n").unwrap();
    let config = dir.path().join("ki2.toml");
    std::fs::write(&config, "no_such_key = 1\n").unwrap();

    Command::cargo_bin("rshogi-ki2")
        .unwrap()
        .arg(&input)
        .arg("--config")
        .arg(&config)
        .assert()
        .failure();
}

#[test]
fn test_missing_input_fails_but_others_are_written() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("ok.ki2");
    std::fs::write(&input, "▲７六歩\n").unwrap();

    Command::cargo_bin("rshogi-ki2")
        .unwrap()
        .arg(dir.path().join("missing.ki2"))
        .arg(&input)
        .assert()
        .failure();
    assert!(dir.path().join("ok_expanded.ki2").exists());
}
