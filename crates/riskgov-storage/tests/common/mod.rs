//! Shared builders for storage integration tests.
#![allow(dead_code)]

use chrono::{Duration, NaiveDate, Utc};

use riskgov_core::models::{
    AppetiteCategory, AppetiteLevel, AppetiteStatement, MaterialityType, MetricType,
    NewAppetiteCategory, NewStatement, NewToleranceMetric, Organization, OrganizationStatus,
    Thresholds, ToleranceMetric,
};
use riskgov_core::traits::{IAdminStorage, IAppetiteStorage, IToleranceStorage};
use riskgov_storage::StorageEngine;

pub const ACTOR: &str = "user-admin";

pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

pub fn tomorrow() -> NaiveDate {
    today() + Duration::days(1)
}

pub fn seed_org(engine: &StorageEngine, name: &str) -> String {
    let org = Organization {
        id: riskgov_core::new_id(),
        name: name.to_string(),
        industry: Some("banking".to_string()),
        status: OrganizationStatus::Active,
        created_at: Utc::now(),
    };
    engine.create_organization(&org, ACTOR).unwrap();
    org.id
}

pub fn draft(engine: &StorageEngine, org_id: &str) -> AppetiteStatement {
    engine
        .create_statement(&NewStatement {
            organization_id: org_id.to_string(),
            statement_text: "We accept moderate operational risk.".to_string(),
            effective_from: today(),
            created_by: ACTOR.to_string(),
        })
        .unwrap()
}

pub fn category(engine: &StorageEngine, statement_id: &str, name: &str) -> AppetiteCategory {
    engine
        .create_category(
            &NewAppetiteCategory {
                statement_id: statement_id.to_string(),
                category_name: name.to_string(),
                appetite_level: AppetiteLevel::Moderate,
                rationale: format!("{name} rationale"),
            },
            ACTOR,
        )
        .unwrap()
}

pub fn thresholds_for(metric_type: MetricType) -> Thresholds {
    match metric_type {
        MetricType::Maximum => Thresholds {
            green_max: Some(5.0),
            amber_max: Some(10.0),
            red_min: Some(10.0),
            ..Thresholds::default()
        },
        MetricType::Minimum => Thresholds {
            green_min: Some(95.0),
            amber_min: Some(90.0),
            red_max: Some(90.0),
            ..Thresholds::default()
        },
        MetricType::Range => Thresholds {
            green_min: Some(40.0),
            green_max: Some(60.0),
            amber_min: Some(30.0),
            amber_max: Some(70.0),
            ..Thresholds::default()
        },
        MetricType::Directional => Thresholds::default(),
    }
}

pub fn new_metric(
    org_id: &str,
    category_id: &str,
    metric_type: MetricType,
    kri_id: Option<&str>,
) -> NewToleranceMetric {
    NewToleranceMetric {
        organization_id: org_id.to_string(),
        appetite_category_id: category_id.to_string(),
        name: format!("{metric_type} metric"),
        description: "tracked monthly".to_string(),
        metric_type,
        unit: "%".to_string(),
        materiality_type: MaterialityType::Internal,
        thresholds: thresholds_for(metric_type),
        kri_id: kri_id.map(str::to_string),
        effective_from: today(),
    }
}

pub fn metric(
    engine: &StorageEngine,
    org_id: &str,
    category_id: &str,
    metric_type: MetricType,
    kri_id: Option<&str>,
) -> ToleranceMetric {
    engine
        .create_metric(&new_metric(org_id, category_id, metric_type, kri_id), ACTOR)
        .unwrap()
}
