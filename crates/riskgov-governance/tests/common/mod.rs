//! Shared harness: an in-memory engine behind every governance service.
#![allow(dead_code)]

use std::sync::Arc;

use chrono::{Duration, NaiveDate, Utc};

use riskgov_core::config::GovernanceConfig;
use riskgov_core::models::{
    AppetiteCategory, AppetiteLevel, AppetiteStatement, MaterialityType, MetricType,
    NewRiskCategory, NewToleranceMetric, Organization, OrganizationStatus, Role,
    SessionContext, Thresholds, ToleranceMetric,
};
use riskgov_core::traits::{IAdminStorage, ITaxonomyStorage};
use riskgov_governance::{AppetiteService, CategoryService, ChainValidator, ToleranceService};
use riskgov_storage::StorageEngine;

pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

pub fn tomorrow() -> NaiveDate {
    today() + Duration::days(1)
}

pub struct Harness {
    pub engine: Arc<StorageEngine>,
    pub appetite: AppetiteService,
    pub categories: CategoryService,
    pub tolerance: ToleranceService,
    pub chain: ChainValidator,
    pub org: String,
    /// Secondary admin: edits appetite and tolerance, cannot approve.
    pub editor: SessionContext,
    /// Primary admin: approves and supersedes.
    pub approver: SessionContext,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(GovernanceConfig::default())
    }

    pub fn with_config(config: GovernanceConfig) -> Self {
        let engine = Arc::new(StorageEngine::open_in_memory().unwrap());
        let org = create_org(&engine, "Acme Bank");
        Self {
            appetite: AppetiteService::new(engine.clone(), config),
            categories: CategoryService::new(engine.clone()),
            tolerance: ToleranceService::new(engine.clone()),
            chain: ChainValidator::new(engine.clone()),
            editor: SessionContext::new("user-editor", org.clone(), Role::SecondaryAdmin),
            approver: SessionContext::new("user-approver", org.clone(), Role::PrimaryAdmin),
            org,
            engine,
        }
    }

    pub fn draft(&self, text: &str) -> AppetiteStatement {
        self.appetite
            .create_statement(&self.editor, &self.org, text, today())
            .unwrap()
    }

    pub fn approved(&self, text: &str) -> AppetiteStatement {
        let draft = self.draft(text);
        self.appetite
            .approve_statement(&self.approver, &draft.id)
            .unwrap()
    }

    pub fn category(&self, statement_id: &str, name: &str) -> AppetiteCategory {
        self.categories
            .create_category(&self.editor, statement_id, name, AppetiteLevel::Low, "")
            .unwrap()
    }

    pub fn taxonomy(&self, names: &[&str]) {
        for name in names {
            self.engine
                .create_risk_category(
                    &NewRiskCategory {
                        organization_id: self.org.clone(),
                        name: name.to_string(),
                        parent_id: None,
                        description: String::new(),
                    },
                    "user-editor",
                )
                .unwrap();
        }
    }

    pub fn metric(
        &self,
        category_id: &str,
        metric_type: MetricType,
        kri_id: Option<&str>,
    ) -> ToleranceMetric {
        self.tolerance
            .create_metric(&self.editor, &new_metric(&self.org, category_id, metric_type, kri_id))
            .unwrap()
    }

    pub fn active_metric(&self, category_id: &str) -> ToleranceMetric {
        let metric = self.metric(category_id, MetricType::Maximum, Some("kri-1"));
        self.tolerance
            .activate_metric(&self.editor, &metric.id)
            .unwrap()
    }
}

pub fn create_org(engine: &StorageEngine, name: &str) -> String {
    let org = Organization {
        id: riskgov_core::new_id(),
        name: name.to_string(),
        industry: Some("banking".to_string()),
        status: OrganizationStatus::Active,
        created_at: Utc::now(),
    };
    engine.create_organization(&org, "root").unwrap();
    org.id
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
        description: String::new(),
        metric_type,
        unit: "%".to_string(),
        materiality_type: MaterialityType::Internal,
        thresholds: thresholds_for(metric_type),
        kri_id: kri_id.map(str::to_string),
        effective_from: today(),
    }
}
