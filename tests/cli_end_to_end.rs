use std::io::Write;

use assert_cmd::Command;
use predicates::str::contains;
use tempfile::NamedTempFile;

fn input_file(suffix: &str, contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("tmp file");
    file.write_all(contents.as_bytes()).expect("write input");
    file
}

fn kazani() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("kazani"));
    cmd.env_remove("KAZANI_CONFIG_FILE")
        .env_remove("RUST_LOG")
        .env_remove("KAZANI__RENDER__EMOJI_CDN_BASE")
        .env_remove("KAZANI__RENDER__PERMALINK_SYMBOL")
        .env_remove("KAZANI__ASSETS__MANIFEST");
    cmd
}

#[test]
fn render_markup_with_asset_manifest() {
    let post = input_file(".md", "## Hi there\n\n![logo]($logo)\n");
    let assets = input_file(".toml", "[assets]\nlogo = \"/media/logo.png\"\n");

    kazani()
        .arg("render")
        .arg("--assets")
        .arg(assets.path())
        .arg(post.path())
        .assert()
        .success()
        .stdout(contains(
            "<h3 id=\"hi-there\">Hi there<a class=\"permalink\" href=\"#hi-there\">#</a></h3>",
        ))
        .stdout(contains("<img src=\"/media/logo.png\" alt=\"logo\"/>"));
}

#[test]
fn render_infers_structured_content_from_extension() {
    let post = input_file(".json", r#"[{"type":"paragraph","content":"a"}]"#);

    kazani()
        .arg("render")
        .arg(post.path())
        .assert()
        .success()
        .stdout("<p>a</p>\n");
}

#[test]
fn emoji_cdn_override_reaches_the_renderer() {
    let post = input_file(".md", "😀");

    kazani()
        .arg("--emoji-cdn-base")
        .arg("https://cdn.example/emoji")
        .arg("render")
        .arg(post.path())
        .assert()
        .success()
        .stdout(contains("src=\"https://cdn.example/emoji/1f600.svg\""));
}

#[test]
fn convert_prints_structured_ir() {
    let post = input_file(".md", "Hello *you*\n");

    let assert = kazani().arg("convert").arg(post.path()).assert().success();
    let output = String::from_utf8_lossy(&assert.get_output().stdout).into_owned();

    let json: serde_json::Value = serde_json::from_str(&output).expect("stdout is JSON");
    assert_eq!(
        json,
        serde_json::json!([
            {"type": "paragraph", "content": ["Hello ", {"type": "italic", "content": ["you"]}]}
        ])
    );
}

#[test]
fn malformed_structured_content_fails() {
    let post = input_file(".txt", "[{\"type\":\"paragraph\"}]");

    kazani()
        .arg("render")
        .arg("--content-type")
        .arg("structured")
        .arg(post.path())
        .assert()
        .failure()
        .stderr(contains("missing field `content`"));
}

#[test]
fn missing_input_file_fails() {
    kazani()
        .arg("render")
        .arg("/nonexistent/kazani-post.md")
        .assert()
        .failure()
        .stderr(contains("io error"));
}
