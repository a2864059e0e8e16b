//! Library-level store scenarios with the mock key-management client.

use cachette::core::format::{self, Format};
use cachette::core::kms::mock::MockKms;
use cachette::core::kms::EncryptionContext;
use cachette::core::store::Store;
use cachette::error::Result;

fn context(pairs: &[(&str, &str)]) -> EncryptionContext {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), Some(v.to_string())))
        .collect()
}

#[test]
fn test_new_store_add_export() {
    let kms = MockKms::new();
    let mut store = Store::new("key-1", EncryptionContext::new());

    store.add(&kms, "s3cr3t", "db_password", "").unwrap();

    let items: Vec<_> = store
        .export_plaintext(&kms)
        .collect::<Result<Vec<_>>>()
        .unwrap();
    assert_eq!(items, vec![("db_password".to_string(), "s3cr3t".to_string())]);
}

#[test]
fn test_full_lifecycle_through_files() {
    let kms = MockKms::new();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".secrets.json");

    // init
    let store = Store::new("alias/app", context(&[("Env", "prod")]));
    store.save_path(&path).unwrap();

    // add, persist, reload
    let mut store = Store::load_path(&path).unwrap();
    store.add(&kms, "postgres://db:5432", "db_url", "primary db").unwrap();
    store.add(&kms, "sk-live-123", "api_key", "").unwrap();
    store.save_path(&path).unwrap();

    // rotate one value through a fresh load
    let mut store = Store::load_path(&path).unwrap();
    store.rotate(&kms, "api_key", "sk-live-456").unwrap();
    store.save_path(&path).unwrap();

    // rotate the master key through a fresh load
    let mut store = Store::load_path(&path).unwrap();
    store.rotate_master_key(&kms, "alias/app-2").unwrap();
    store.save_path(&path).unwrap();

    // everything still decrypts, in insertion order
    let store = Store::load_path(&path).unwrap();
    assert_eq!(store.kms_key_id, "alias/app-2");
    let items: Vec<_> = store
        .export_plaintext(&kms)
        .collect::<Result<Vec<_>>>()
        .unwrap();
    assert_eq!(
        items,
        vec![
            ("db_url".to_string(), "postgres://db:5432".to_string()),
            ("api_key".to_string(), "sk-live-456".to_string()),
        ]
    );
}

#[test]
fn test_export_renders_through_formatters() {
    let kms = MockKms::new();
    let mut store = Store::new("key-1", EncryptionContext::new());
    store.add(&kms, "v1", "first", "").unwrap();
    store.add(&kms, "with 'quote'", "second", "").unwrap();

    let items: Vec<_> = store
        .export_plaintext(&kms)
        .collect::<Result<Vec<_>>>()
        .unwrap();

    let mut bash = Vec::new();
    format::render(Format::Bash, &mut bash, &items).unwrap();
    let bash = String::from_utf8(bash).unwrap();
    assert!(bash.contains("export FIRST='v1'"));
    assert!(bash.contains("export SECOND='with '\\''quote'\\'''"));

    let mut json = Vec::new();
    format::render(Format::Json, &mut json, &items).unwrap();
    let parsed: serde_json::Value = serde_json::from_slice(&json).unwrap();
    assert_eq!(parsed["first"], "v1");
    assert_eq!(parsed["second"], "with 'quote'");
}

#[test]
fn test_stored_file_is_stable_across_load_save() {
    let kms = MockKms::new();
    let mut store = Store::new("key-1", context(&[("B", "2"), ("A", "1")]));
    store.add(&kms, "v", "name", "").unwrap();

    let first = store.save().unwrap();
    let second = Store::load(&first).unwrap().save().unwrap();
    assert_eq!(first, second, "load/save must be byte-stable");
}

#[test]
fn test_decryption_error_surfaces_secret_name() {
    let kms = MockKms::new();
    let mut store = Store::new("key-1", EncryptionContext::new());
    store.add(&kms, "v", "healthy", "").unwrap();

    // Corrupt the stored ciphertext at the base64 payload level.
    let broken = store.save().unwrap();
    let mut store = Store::load(&broken).unwrap();
    store.secrets[0].ciphertext = "CCT1];YQ==;YQ==".to_string();

    let err = store
        .export_plaintext(&kms)
        .collect::<Result<Vec<_>>>()
        .unwrap_err();
    assert!(err.to_string().contains("healthy"));
}
