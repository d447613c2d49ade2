use std::io::Write;

use cardwatch_core::domain::CardwatchError;
use cardwatch_core::AuditConfig;

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

#[test]
fn partial_file_falls_back_to_defaults() {
    let mut file = tempfile::NamedTempFile::new().expect("tempfile");
    writeln!(
        file,
        r#"
system_labels = ["cms", "reader"]
unassigned_requires_eligibility = false

[system_label_ids]
cms = 1
reader = 2
"#
    )
    .expect("write config");

    let config = AuditConfig::from_path(file.path()).expect("load config");
    assert_eq!(config.system_labels, vec!["cms", "reader"]);
    assert_eq!(config.system_label_ids.get("reader"), Some(&2));
    assert!(!config.unassigned_requires_eligibility);
    assert_eq!(config.to_prod_label, "to_prod");
    assert_eq!(config.org_repo_prefixes, vec!["hedgeye-"]);
}

#[test]
fn default_config_survives_a_file_round_trip() {
    let config = AuditConfig::default();
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("cardwatch.toml");
    std::fs::write(&path, toml::to_string(&config).expect("to toml")).expect("write");

    let loaded = AuditConfig::from_path(&path).expect("load config");
    assert_eq!(loaded, config);
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = AuditConfig::from_path(&dir.path().join("nope.toml")).unwrap_err();
    assert!(matches!(err, CardwatchError::Io(_)));
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[test]
fn empty_vocabulary_is_rejected() {
    let err = AuditConfig::from_toml_str("system_labels = []").unwrap_err();
    assert!(matches!(err, CardwatchError::InvalidConfig(_)));
}

#[test]
fn duplicate_system_label_is_rejected() {
    let err = AuditConfig::from_toml_str(r#"system_labels = ["cms", "cms"]"#).unwrap_err();
    assert!(matches!(err, CardwatchError::InvalidConfig(_)));
}

#[test]
fn malformed_toml_is_a_parse_error() {
    let err = AuditConfig::from_toml_str("system_labels = [").unwrap_err();
    assert!(matches!(err, CardwatchError::ConfigParse(_)));
}
