use std::collections::HashMap;

use riskgov_core::models::{
    normalize_category_name, AppetiteCategory, AppetiteStatement, ChainGap,
    ChainValidationResult, GapSeverity, RiskCategory, ToleranceMetric,
};

/// Already-fetched rows for one organization.
#[derive(Debug, Clone, Copy)]
pub struct ChainInputs<'a> {
    pub taxonomy: &'a [RiskCategory],
    pub statement: Option<&'a AppetiteStatement>,
    pub appetite: &'a [AppetiteCategory],
    pub metrics: &'a [ToleranceMetric],
}

/// Pure evaluation of the chain. Gaps follow taxonomy order.
pub fn evaluate_chain(inputs: ChainInputs<'_>) -> ChainValidationResult {
    let appetite_by_name: HashMap<String, &AppetiteCategory> = inputs
        .appetite
        .iter()
        .map(|c| (normalize_category_name(&c.category_name), c))
        .collect();

    // (total, active) per appetite category.
    let mut metric_counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for metric in inputs.metrics {
        let entry = metric_counts
            .entry(metric.appetite_category_id.as_str())
            .or_default();
        entry.0 += 1;
        if metric.is_active {
            entry.1 += 1;
        }
    }

    let mut gaps = Vec::new();
    for category in inputs.taxonomy {
        let key = normalize_category_name(&category.name);
        let Some(appetite) = appetite_by_name.get(&key) else {
            gaps.push(ChainGap {
                category_name: category.name.clone(),
                severity: GapSeverity::Critical,
                issue: "No appetite defined".to_string(),
                details: match inputs.statement {
                    Some(s) => format!(
                        "risk category '{}' has no appetite category in statement v{}",
                        category.name, s.version
                    ),
                    None => format!(
                        "risk category '{}' has no appetite: the organization has no appetite statement",
                        category.name
                    ),
                },
            });
            continue;
        };
        match metric_counts.get(appetite.id.as_str()).copied() {
            None | Some((0, _)) => gaps.push(ChainGap {
                category_name: category.name.clone(),
                severity: GapSeverity::High,
                issue: "No tolerance metrics".to_string(),
                details: format!(
                    "appetite '{}' ({}) has no tolerance metric",
                    appetite.category_name, appetite.appetite_level
                ),
            }),
            Some((total, 0)) => gaps.push(ChainGap {
                category_name: category.name.clone(),
                severity: GapSeverity::Medium,
                issue: "No active tolerance metrics".to_string(),
                details: format!(
                    "{total} tolerance metric(s) defined for '{}', none active",
                    appetite.category_name
                ),
            }),
            Some(_) => {}
        }
    }

    ChainValidationResult {
        is_valid: gaps.is_empty(),
        statement_id: inputs.statement.map(|s| s.id.clone()),
        checked_categories: u32::try_from(inputs.taxonomy.len()).unwrap_or(u32::MAX),
        gaps,
    }
}
