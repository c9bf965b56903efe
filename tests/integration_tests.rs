//! Integration tests for i18n-manager
//!
//! These tests drive the public library API the way the CLI does: against a
//! temporary properties directory, with scripted confirmations and a mocked
//! translation service.

use std::fs;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

use i18n_manager::audit::Auditor;
use i18n_manager::commands::{self, AddArgs};
use i18n_manager::config::ProviderSettings;
use i18n_manager::confirm::{AutoConfirm, Confirm};
use i18n_manager::i18n::Locale;
use i18n_manager::provider::TranslationProvider;
use i18n_manager::reconcile::{AddOutcome, Reconciler};
use i18n_manager::store::TranslationStore;

// ==================== Test Helpers ====================

/// Answers from a fixed script and counts the questions asked
struct Scripted {
    answers: Vec<bool>,
    asked: usize,
}

impl Scripted {
    fn new(answers: &[bool]) -> Self {
        Self {
            answers: answers.to_vec(),
            asked: 0,
        }
    }
}

impl Confirm for Scripted {
    fn confirm(&mut self, _prompt: &str) -> anyhow::Result<bool> {
        let answer = self.answers.get(self.asked).copied().unwrap_or(false);
        self.asked += 1;
        Ok(answer)
    }
}

fn create_store() -> (TempDir, TranslationStore) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let store = TranslationStore::new(dir.path());
    (dir, store)
}

fn read(store: &TranslationStore, locale: Locale) -> String {
    fs::read_to_string(store.path_for(locale)).unwrap_or_default()
}

fn pairs(entries: &[(&str, &str)]) -> Vec<(String, String)> {
    entries
        .iter()
        .map(|(l, v)| (l.to_string(), v.to_string()))
        .collect()
}

fn create_chat_response(content: &str) -> serde_json::Value {
    serde_json::json!({
        "choices": [
            {
                "index": 0,
                "message": {"role": "assistant", "content": content},
                "finish_reason": "stop"
            }
        ]
    })
}

// ==================== Reconciliation Workflow ====================

#[test]
fn test_full_add_workflow_keeps_locales_consistent() {
    let (_dir, store) = create_store();
    let mut confirm = AutoConfirm(true);

    Reconciler::new(&store, &mut confirm)
        .add_translation(
            "button.save",
            &pairs(&[("en", "Save"), ("zh", "保存"), ("zh_TW", "儲存")]),
        )
        .expect("add");

    assert_eq!(read(&store, Locale::EN), "button.save=Save\n");
    assert_eq!(read(&store, Locale::ZH), "button.save=\\u4fdd\\u5b58\n");
    assert_eq!(read(&store, Locale::ZH_CN), read(&store, Locale::ZH));
    assert_eq!(read(&store, Locale::ZH_TW), "button.save=\\u5132\\u5b58\n");

    let auditor = Auditor::new(&store);
    assert!(auditor.check_missing().unwrap().is_empty());
    assert_eq!(auditor.list_keys().unwrap(), vec!["button.save"]);
}

#[test]
fn test_mirror_tracks_every_zh_write() {
    let (_dir, store) = create_store();
    let mut confirm = AutoConfirm(true);

    for (key, value) in [("a.one", "一"), ("a.two", "二"), ("a.one", "壹")] {
        Reconciler::new(&store, &mut confirm)
            .add_translation(key, &pairs(&[("zh", value)]))
            .unwrap();
    }

    let zh = store.read(Locale::ZH).unwrap();
    let zh_cn = store.read(Locale::ZH_CN).unwrap();
    assert_eq!(zh, zh_cn);
    assert_eq!(zh["a.one"], "\\u58f9");
}

#[test]
fn test_declined_conflict_is_byte_for_byte_noop() {
    let (_dir, store) = create_store();
    let original = "label.save=Save\n# trailing comment, no newline";
    fs::write(store.path_for(Locale::EN), original).unwrap();
    let mut confirm = Scripted::new(&[false]);

    let outcome = Reconciler::new(&store, &mut confirm)
        .add_translation("label.save", &pairs(&[("en", "Save Now")]))
        .unwrap();

    assert_eq!(outcome, AddOutcome::Cancelled);
    assert_eq!(confirm.asked, 1);
    assert_eq!(read(&store, Locale::EN), original);
}

#[test]
fn test_single_prompt_governs_partial_conflicts() {
    let (_dir, store) = create_store();
    fs::write(store.path_for(Locale::EN), "label.save=Save\n").unwrap();
    let mut confirm = Scripted::new(&[false]);

    Reconciler::new(&store, &mut confirm)
        .add_translation(
            "label.save",
            &pairs(&[("en", "Save Now"), ("zh_TW", "儲存")]),
        )
        .unwrap();

    // zh_TW had no conflict, but the declined prompt covers the whole call
    assert_eq!(confirm.asked, 1);
    assert!(store.read(Locale::ZH_TW).unwrap().is_empty());
}

#[test]
fn test_unsupported_locale_does_not_block_others() {
    let (_dir, store) = create_store();
    let mut confirm = AutoConfirm(true);

    let outcome = Reconciler::new(&store, &mut confirm)
        .add_translation(
            "label.save",
            &pairs(&[("en", "Save"), ("fr", "Enregistrer"), ("zh_TW", "儲存")]),
        )
        .unwrap();

    assert_eq!(outcome.changes().len(), 2);
    assert_eq!(read(&store, Locale::EN), "label.save=Save\n");
    assert!(read(&store, Locale::ZH_TW).starts_with("label.save="));
}

#[test]
fn test_repeated_update_is_idempotent() {
    let (_dir, store) = create_store();
    fs::write(store.path_for(Locale::EN), "z.last=Z\na.first=A").unwrap();
    let mut confirm = AutoConfirm(true);

    Reconciler::new(&store, &mut confirm)
        .add_translation("m.middle", &pairs(&[("en", "M")]))
        .unwrap();
    let first = read(&store, Locale::EN);
    Reconciler::new(&store, &mut confirm)
        .add_translation("m.middle", &pairs(&[("en", "M")]))
        .unwrap();
    let second = read(&store, Locale::EN);

    assert_eq!(first, second);
    assert_eq!(first, "a.first=A\nm.middle=M\nz.last=Z\n");
}

#[test]
fn test_written_files_end_with_exactly_one_newline() {
    let (_dir, store) = create_store();
    fs::write(store.path_for(Locale::EN), "a=1").unwrap();
    fs::write(store.path_for(Locale::ZH_TW), "a=1\n\n\n").unwrap();
    let mut confirm = AutoConfirm(true);

    Reconciler::new(&store, &mut confirm)
        .add_translation("b", &pairs(&[("en", "2"), ("zh", "二"), ("zh_TW", "二")]))
        .unwrap();

    for locale in Locale::all() {
        let content = read(&store, locale);
        assert!(content.ends_with('\n'), "{} not newline-terminated", locale);
        assert!(!content.ends_with("\n\n"), "{} has extra newlines", locale);
    }
}

#[test]
fn test_english_backslashes_survive_storage() {
    let (_dir, store) = create_store();
    let mut confirm = AutoConfirm(true);

    Reconciler::new(&store, &mut confirm)
        .add_translation("msg.path", &pairs(&[("en", "Saved to C:\\new\\temp")]))
        .unwrap();
    Reconciler::new(&store, &mut confirm)
        .add_translation("msg.break", &pairs(&[("en", "x\ny")]))
        .unwrap();
    Reconciler::new(&store, &mut confirm)
        .add_translation("msg.literal", &pairs(&[("en", "x\\ny")]))
        .unwrap();

    let auditor = Auditor::new(&store);
    assert_eq!(
        auditor.show_key("msg.path").unwrap(),
        vec![(Locale::EN, "Saved to C:\\new\\temp".to_string())]
    );
    assert_eq!(auditor.show_key("msg.break").unwrap()[0].1, "x\ny");
    assert_eq!(auditor.show_key("msg.literal").unwrap()[0].1, "x\\ny");
}

#[test]
fn test_missing_key_audit_scenario() {
    let (_dir, store) = create_store();
    fs::write(store.path_for(Locale::EN), "a=1\nb=2\n").unwrap();
    fs::write(store.path_for(Locale::ZH), "a=1\n").unwrap();
    fs::write(store.path_for(Locale::ZH_TW), "b=2\n").unwrap();

    let report = Auditor::new(&store).check_missing().unwrap();

    let summary: Vec<_> = report
        .iter()
        .map(|m| (m.locale.code(), m.keys.clone()))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("zh", vec!["b".to_string()]),
            ("zh_TW", vec!["a".to_string()]),
        ]
    );
}

// ==================== Command Workflow ====================

#[test]
fn test_add_command_round_trip_through_list() {
    let (_dir, store) = create_store();
    let args = AddArgs {
        key: "title.home".to_string(),
        en: Some("Home".to_string()),
        zh: Some("首页".to_string()),
        zh_tw: Some("首頁".to_string()),
    };

    commands::run_add(&store, &mut AutoConfirm(true), &args, &mut Vec::new()).unwrap();

    let mut out = Vec::new();
    commands::run_list(&store, Some("title.home"), &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("en: Home"));
    assert!(text.contains("zh: 首页"));
    assert!(text.contains("zh_CN: 首页"));
    assert!(text.contains("zh_TW: 首頁"));
}

#[tokio::test]
async fn test_translate_command_adds_provider_result() {
    let mock_server = MockServer::start().await;
    let payload = r#"{"key": "button.cancel", "translations": {"en": "Cancel", "zh": "取消", "zh_TW": "取消"}, "status": "success"}"#;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(create_chat_response(payload)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let settings = ProviderSettings {
        api_key: String::new(),
        base_url: mock_server.uri(),
        model: "deepseek-chat".to_string(),
    };
    let provider = TranslationProvider::new(&settings, "test-key", Duration::from_secs(5))
        .expect("provider");
    let (_dir, store) = create_store();
    let mut confirm = AutoConfirm(true);
    let mut out = Vec::new();

    let outcome = commands::run_translate(&provider, &store, &mut confirm, "Cancel", None, &mut out)
        .await
        .expect("translate");

    assert_eq!(outcome.map(|o| o.changes().len()), Some(4));
    assert_eq!(read(&store, Locale::EN), "button.cancel=Cancel\n");
    assert_eq!(read(&store, Locale::ZH_CN), "button.cancel=\\u53d6\\u6d88\n");
    assert!(String::from_utf8(out).unwrap().contains("Generated key: button.cancel"));
}

#[tokio::test]
async fn test_translate_command_respects_key_override_and_decline() {
    let mock_server = MockServer::start().await;
    let payload = r#"{"key": "msg.generated", "translations": {"en": "Hi"}}"#;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(create_chat_response(payload)))
        .mount(&mock_server)
        .await;

    let settings = ProviderSettings {
        api_key: String::new(),
        base_url: mock_server.uri(),
        model: "deepseek-chat".to_string(),
    };
    let provider = TranslationProvider::new(&settings, "test-key", Duration::from_secs(5))
        .expect("provider");
    let (_dir, store) = create_store();

    // Declined: nothing written
    let mut out = Vec::new();
    let outcome = commands::run_translate(
        &provider,
        &store,
        &mut Scripted::new(&[false]),
        "Hi",
        Some("msg.custom"),
        &mut out,
    )
    .await
    .unwrap();
    assert!(outcome.is_none());
    assert!(!store.path_for(Locale::EN).exists());
    assert!(String::from_utf8(out)
        .unwrap()
        .contains("Using key: msg.custom (generated: msg.generated)"));

    // Accepted: written under the override key
    commands::run_translate(
        &provider,
        &store,
        &mut AutoConfirm(true),
        "Hi",
        Some("msg.custom"),
        &mut Vec::new(),
    )
    .await
    .unwrap();
    assert_eq!(read(&store, Locale::EN), "msg.custom=Hi\n");
}

#[tokio::test]
async fn test_translate_command_surfaces_provider_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let settings = ProviderSettings {
        api_key: String::new(),
        base_url: mock_server.uri(),
        model: "deepseek-chat".to_string(),
    };
    let provider = TranslationProvider::new(&settings, "test-key", Duration::from_secs(5))
        .expect("provider");
    let (dir, store) = create_store();

    let err = commands::run_translate(
        &provider,
        &store,
        &mut AutoConfirm(true),
        "Hi",
        None,
        &mut Vec::new(),
    )
    .await
    .unwrap_err();

    assert!(err.to_string().contains("503"));
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}
