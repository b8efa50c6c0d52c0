use licdesk_license::{ActivationRequest, LicenseKey, LicenseRecord, LicenseStatus};

// ── LicenseKey ───────────────────────────────────────────────────

#[test]
fn parse_trims_whitespace() {
    let key = LicenseKey::parse("  5f0c8a34-d1b2-4e0e-9a51-0d1b7f43c2aa \n").unwrap();
    assert_eq!(key.raw(), "5f0c8a34-d1b2-4e0e-9a51-0d1b7f43c2aa");
    assert_eq!(key.to_string(), key.raw());
}

#[test]
fn parse_rejects_empty() {
    assert!(LicenseKey::parse("").is_err());
    assert!(LicenseKey::parse("   ").is_err());
}

#[test]
fn parse_rejects_inner_whitespace() {
    let err = LicenseKey::parse("abc def").unwrap_err();
    assert!(format!("{err}").contains("whitespace"));
}

#[test]
fn key_serde_is_a_plain_string() {
    let key = LicenseKey::parse("ABC123").unwrap();
    assert_eq!(serde_json::to_string(&key).unwrap(), r#""ABC123""#);
    let parsed: LicenseKey = serde_json::from_str(r#""ABC123""#).unwrap();
    assert_eq!(parsed, key);
}

#[test]
fn key_deserialize_rejects_empty() {
    let result: Result<LicenseKey, _> = serde_json::from_str(r#""""#);
    assert!(result.is_err());
}

// ── LicenseRecord ────────────────────────────────────────────────

#[test]
fn record_from_bare_key_response() {
    let record: LicenseRecord = serde_json::from_str(r#"{"key": "K-1"}"#).unwrap();
    assert_eq!(record.key, "K-1");
    assert_eq!(record.id, None);
    assert_eq!(record.status(), LicenseStatus::NotActivated);
}

#[test]
fn record_from_full_service_response() {
    let record: LicenseRecord = serde_json::from_str(
        r#"{"id": 4, "key": "K-4", "is_active": true, "user_id": 2}"#,
    )
    .unwrap();
    assert_eq!(record.id, Some(4));
    assert_eq!(record.user_id, Some(2));
    assert_eq!(record.status(), LicenseStatus::Active);
}

#[test]
fn record_keeps_service_key_verbatim() {
    let record: LicenseRecord = serde_json::from_str(r#"{"key": "ABCD EFGH", "id": 1}"#).unwrap();
    assert_eq!(record.key, "ABCD EFGH");

    let record: LicenseRecord = serde_json::from_str(r#"{"key": ""}"#).unwrap();
    assert_eq!(record.key, "");
}

#[test]
fn record_requires_key() {
    let result: Result<LicenseRecord, _> = serde_json::from_str(r#"{"id": 4}"#);
    assert!(result.is_err());
}

#[test]
fn record_from_key_is_inactive() {
    let record = LicenseRecord::from_key(LicenseKey::parse("K").unwrap());
    assert!(!record.is_active);
    assert_eq!(record.key, "K");
}

// ── ActivationRequest ────────────────────────────────────────────

#[test]
fn activation_request_shape() {
    let req = ActivationRequest {
        key: LicenseKey::parse("K-9").unwrap(),
        username: "bob".into(),
    };
    assert_eq!(
        serde_json::to_value(&req).unwrap(),
        serde_json::json!({"key": "K-9", "username": "bob"})
    );
}
