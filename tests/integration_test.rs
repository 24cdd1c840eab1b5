/// End-to-end tests: store → responder → block parser, plus the `cortex`
/// binary in one-shot mode.
use std::process::Command;

use cortex_config::Config;
use cortex_core::{classify, detect_language, maybe_infer_title, ChatError, ConversationStore};
use cortex_markdown::parse_blocks;
use cortex_model::{Category, ContentBlock, LanguageTag, TitleState};

fn store() -> ConversationStore {
    ConversationStore::new(&Config::default())
}

// ── Pipeline ──────────────────────────────────────────────────────────────────

#[test]
fn code_question_yields_review_with_tagged_code_block() {
    let mut s = store();
    let code = "public class Foo { public static void main(String[] a) { System.out.println(1); } }";
    assert_eq!(classify(code), Category::Code);
    assert_eq!(detect_language(code), LanguageTag::Java);

    let ex = s.send(code).unwrap();
    assert!(ex.reply.is_code_block());

    let blocks = parse_blocks(ex.reply.content());
    assert_eq!(blocks[0], ContentBlock::Heading2("Code Review Summary".into()));
    assert!(blocks.contains(&ContentBlock::Heading3("What Looks Good".into())));
    let fence = blocks
        .iter()
        .find_map(|b| match b {
            ContentBlock::CodeBlock { language, code } => Some((language.as_str(), code.as_str())),
            _ => None,
        })
        .unwrap();
    assert_eq!(fence.0, "java");
    assert!(fence.1.starts_with("// 1) Validate input parameters"));
    assert!(!fence.1.ends_with('\n'));
}

#[test]
fn error_report_quotes_message_in_untagged_block() {
    let mut s = store();
    let ex = s.send("Got a NullPointerException and the build fails").unwrap();
    assert!(!ex.reply.is_code_block());

    let blocks = parse_blocks(ex.reply.content());
    assert_eq!(blocks[0], ContentBlock::Heading2("Error Diagnosis & Solution".into()));
    assert!(blocks.contains(&ContentBlock::code("", "Got a NullPointerException and the build fails")));
    assert!(blocks
        .iter()
        .any(|b| matches!(b, ContentBlock::Paragraph(p) if p.contains("null check"))));
}

#[test]
fn general_question_gets_guidance_bullets() {
    let mut s = store();
    let ex = s.send("How should I start learning programming?").unwrap();
    let blocks = parse_blocks(ex.reply.content());
    assert!(blocks.iter().any(|b| matches!(b, ContentBlock::Bullet(t) if t.starts_with("**Code Review**"))));
    assert!(blocks.iter().all(|b| !b.is_code()));
}

#[test]
fn title_is_inferred_once_across_the_conversation() {
    let mut s = store();
    s.send("How do I fix a NullPointerException in my loop?").unwrap();
    let first = s.active().title().to_string();
    assert_ne!(first, "New Chat");
    assert!(first.chars().count() <= 28);

    s.send("Completely different topic about databases").unwrap();
    assert_eq!(s.active().title(), first);
    assert_eq!(
        maybe_infer_title(TitleState::AutoTitled, &first, "databases"),
        None
    );
}

#[test]
fn blank_send_changes_nothing() {
    let mut s = store();
    let before: Vec<String> = s.titles().into_iter().map(String::from).collect();
    assert_eq!(s.send(" \t ").unwrap_err(), ChatError::BlankInput);
    assert_eq!(s.active().message_count(), 0);
    assert_eq!(s.titles(), before);
}

#[test]
fn conversations_are_independent() {
    let mut s = store();
    s.send("rust borrow checker").unwrap();
    let first = s.active_id().to_string();
    s.create_conversation();
    s.send("python decorators").unwrap();

    assert_eq!(s.message_count(&first), Some(2));
    assert_eq!(s.active().message_count(), 2);
    assert_eq!(s.titles(), ["Python Decorators", "Rust Borrow Checker"]);
}

#[test]
fn blocks_serialize_as_tagged_json() {
    let blocks = parse_blocks("## Title\n- item\n\n```java\ncode();\n```");
    let json = serde_json::to_value(&blocks).unwrap();
    assert_eq!(json[0]["kind"], "heading2");
    assert_eq!(json[1]["value"], "item");
    assert_eq!(json[2]["kind"], "blank");
    assert_eq!(json[3]["value"]["language"], "java");
}

// ── Binary ────────────────────────────────────────────────────────────────────

fn cortex(dir: &std::path::Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_cortex"));
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env("XDG_CONFIG_HOME", dir.join(".config"))
        .env_remove("RUST_LOG")
        .env_remove("CORTEX_CONFIG");
    cmd
}

#[test]
fn one_shot_json_prints_blocks() {
    let dir = tempfile::tempdir().unwrap();
    let out = cortex(dir.path())
        .args(["--json", "--no-delay", "int x = 1;"])
        .output()
        .unwrap();
    assert!(out.status.success());

    let blocks: Vec<ContentBlock> = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(blocks[0], ContentBlock::Heading2("Code Review Summary".into()));
}

#[test]
fn one_shot_blank_prompt_fails() {
    let dir = tempfile::tempdir().unwrap();
    let out = cortex(dir.path()).args(["--no-delay", "   "]).output().unwrap();
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("Please enter a message"));
}

#[test]
fn show_config_reflects_working_directory_layer() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("cortex.toml"), "[chat]\ntyping_delay_ms = 5\n").unwrap();

    let out = cortex(dir.path()).arg("show-config").output().unwrap();
    assert!(out.status.success());

    let shown: Config = toml::from_str(&String::from_utf8_lossy(&out.stdout)).unwrap();
    assert_eq!(shown.chat.typing_delay_ms, 5);
    assert_eq!(shown.title.max_len, 28);
}
