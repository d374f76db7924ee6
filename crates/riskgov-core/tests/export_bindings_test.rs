//! Generates TypeScript bindings from Rust types via ts-rs.
//!
//! Run with: cargo test -p riskgov-core export_bindings
//! Generated files appear in riskgov-core/bindings/*.ts

use riskgov_core::models::*;

#[test]
fn export_bindings() {
    // ts-rs export is triggered by the derive macro at compile time.
    // This test validates all wire types are importable and TS-derivable.
    let _ = std::any::type_name::<AppetiteStatement>();
    let _ = std::any::type_name::<AppetiteCategory>();
    let _ = std::any::type_name::<StatementSupersession>();
    let _ = std::any::type_name::<ToleranceMetric>();
    let _ = std::any::type_name::<MetricSupersession>();
    let _ = std::any::type_name::<Thresholds>();
    let _ = std::any::type_name::<ChainValidationResult>();
    let _ = std::any::type_name::<ChainGap>();
    let _ = std::any::type_name::<DimeAssessment>();
    let _ = std::any::type_name::<DeleteCheck>();
    let _ = std::any::type_name::<Organization>();
    let _ = std::any::type_name::<OrganizationSummary>();
    let _ = std::any::type_name::<UserInvitation>();
    let _ = std::any::type_name::<UserProfile>();
    let _ = std::any::type_name::<Regulator>();
    let _ = std::any::type_name::<RegulatorAccess>();
    let _ = std::any::type_name::<RiskCategory>();
    let _ = std::any::type_name::<Division>();
    let _ = std::any::type_name::<Department>();
    let _ = std::any::type_name::<SeedItem>();
    let _ = std::any::type_name::<GenerationLog>();
    let _ = std::any::type_name::<AuditEntry>();
    let _ = std::any::type_name::<SessionContext>();
}

#[test]
fn enums_use_upper_snake_wire_names() {
    assert_eq!(serde_json::to_string(&StatementStatus::Superseded).unwrap(), "\"SUPERSEDED\"");
    assert_eq!(serde_json::to_string(&GapSeverity::Critical).unwrap(), "\"CRITICAL\"");
    assert_eq!(
        serde_json::to_string(&ControlEffectiveness::PartiallyEffective).unwrap(),
        "\"PARTIALLY_EFFECTIVE\""
    );
    assert_eq!(
        serde_json::to_string(&InvitationStatus::Pending).unwrap(),
        "\"PENDING\""
    );
}

#[test]
fn seed_item_optional_fields_default() {
    let item: SeedItem =
        serde_json::from_str(r#"{"code":"KRI-X","item_type":"kri","title":"x"}"#).unwrap();
    assert!(item.category_hints.is_empty());
    assert!(item.industry_tags.is_empty());
    assert_eq!(item.description, "");
}
