use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::errors::{RiskGovError, RiskGovResult};

/// How a tolerance metric's thresholds are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MetricType {
    /// Lower is better: green up to `green_max`, amber up to `amber_max`.
    Maximum,
    /// Higher is better: green from `green_min`, amber from `amber_min`.
    Minimum,
    /// Green inside `[green_min, green_max]`, amber inside `[amber_min, amber_max]`.
    Range,
    /// Trend only, no numeric bands.
    Directional,
}

impl MetricType {
    pub const ALL: [MetricType; 4] = [
        Self::Maximum,
        Self::Minimum,
        Self::Range,
        Self::Directional,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Maximum => "MAXIMUM",
            Self::Minimum => "MINIMUM",
            Self::Range => "RANGE",
            Self::Directional => "DIRECTIONAL",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "MAXIMUM" => Some(Self::Maximum),
            "MINIMUM" => Some(Self::Minimum),
            "RANGE" => Some(Self::Range),
            "DIRECTIONAL" => Some(Self::Directional),
            _ => None,
        }
    }
}

impl fmt::Display for MetricType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a threshold is set internally, by a regulator, or both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MaterialityType {
    Internal,
    External,
    Dual,
}

impl MaterialityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Internal => "INTERNAL",
            Self::External => "EXTERNAL",
            Self::Dual => "DUAL",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "INTERNAL" => Some(Self::Internal),
            "EXTERNAL" => Some(Self::External),
            "DUAL" => Some(Self::Dual),
            _ => None,
        }
    }
}

/// Green/amber/red reading of a measured value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ToleranceStatus {
    Green,
    Amber,
    Red,
}

/// Derived lifecycle of a tolerance metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MetricLifecycle {
    /// Never activated; freely editable and deletable.
    Inactive,
    Active,
    /// Activated at least once and since closed. Retained for audit.
    Historical,
}

/// Threshold bands. Which fields are required depends on [`MetricType`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Thresholds {
    pub green_max: Option<f64>,
    pub amber_max: Option<f64>,
    pub red_min: Option<f64>,
    pub green_min: Option<f64>,
    pub amber_min: Option<f64>,
    pub red_max: Option<f64>,
}

impl Thresholds {
    /// Check that the bands required by `metric_type` are present and ordered.
    pub fn validate(&self, metric_type: MetricType) -> RiskGovResult<()> {
        for (field, value) in self.fields() {
            if let Some(v) = value {
                if !v.is_finite() {
                    return Err(RiskGovError::validation(field, "must be a finite number"));
                }
            }
        }
        match metric_type {
            MetricType::Maximum => self.validate_upper_side(),
            MetricType::Minimum => self.validate_lower_side(),
            MetricType::Range => {
                self.validate_upper_side()?;
                self.validate_lower_side()?;
                let green_min = required(self.green_min, "green_min")?;
                let green_max = required(self.green_max, "green_max")?;
                if green_min > green_max {
                    return Err(RiskGovError::validation(
                        "green_min",
                        "must not exceed green_max",
                    ));
                }
                Ok(())
            }
            MetricType::Directional => Ok(()),
        }
    }

    /// Classify a measured value. `None` for directional metrics or when the
    /// required bands are missing.
    pub fn classify(&self, metric_type: MetricType, value: f64) -> Option<ToleranceStatus> {
        match metric_type {
            MetricType::Maximum => {
                let (green, amber) = (self.green_max?, self.amber_max?);
                Some(if value <= green {
                    ToleranceStatus::Green
                } else if value <= amber {
                    ToleranceStatus::Amber
                } else {
                    ToleranceStatus::Red
                })
            }
            MetricType::Minimum => {
                let (green, amber) = (self.green_min?, self.amber_min?);
                Some(if value >= green {
                    ToleranceStatus::Green
                } else if value >= amber {
                    ToleranceStatus::Amber
                } else {
                    ToleranceStatus::Red
                })
            }
            MetricType::Range => {
                let (g_lo, g_hi) = (self.green_min?, self.green_max?);
                let (a_lo, a_hi) = (self.amber_min?, self.amber_max?);
                Some(if (g_lo..=g_hi).contains(&value) {
                    ToleranceStatus::Green
                } else if (a_lo..=a_hi).contains(&value) {
                    ToleranceStatus::Amber
                } else {
                    ToleranceStatus::Red
                })
            }
            MetricType::Directional => None,
        }
    }

    fn validate_upper_side(&self) -> RiskGovResult<()> {
        let green = required(self.green_max, "green_max")?;
        let amber = required(self.amber_max, "amber_max")?;
        if green > amber {
            return Err(RiskGovError::validation("green_max", "must not exceed amber_max"));
        }
        if let Some(red) = self.red_min {
            if red < amber {
                return Err(RiskGovError::validation("red_min", "must not be below amber_max"));
            }
        }
        Ok(())
    }

    fn validate_lower_side(&self) -> RiskGovResult<()> {
        let green = required(self.green_min, "green_min")?;
        let amber = required(self.amber_min, "amber_min")?;
        if green < amber {
            return Err(RiskGovError::validation("green_min", "must not be below amber_min"));
        }
        if let Some(red) = self.red_max {
            if red > amber {
                return Err(RiskGovError::validation("red_max", "must not exceed amber_min"));
            }
        }
        Ok(())
    }

    fn fields(&self) -> [(&'static str, Option<f64>); 6] {
        [
            ("green_max", self.green_max),
            ("amber_max", self.amber_max),
            ("red_min", self.red_min),
            ("green_min", self.green_min),
            ("amber_min", self.amber_min),
            ("red_max", self.red_max),
        ]
    }
}

fn required(value: Option<f64>, field: &str) -> RiskGovResult<f64> {
    value.ok_or_else(|| RiskGovError::validation(field, "required for this metric type"))
}

/// A quantitative tolerance operationalizing one appetite category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ToleranceMetric {
    pub id: String,
    pub organization_id: String,
    pub appetite_category_id: String,
    pub name: String,
    pub description: String,
    pub metric_type: MetricType,
    pub unit: String,
    pub materiality_type: MaterialityType,
    pub thresholds: Thresholds,
    /// Linked key risk indicator. Required for activation.
    pub kri_id: Option<String>,
    pub is_active: bool,
    /// True until the metric is activated for the first time.
    pub never_activated: bool,
    pub version: u32,
    pub previous_version_id: Option<String>,
    pub effective_from: NaiveDate,
    pub effective_to: Option<NaiveDate>,
    pub activated_by: Option<String>,
    pub activated_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub row_version: i64,
}

impl ToleranceMetric {
    pub fn lifecycle(&self) -> MetricLifecycle {
        if self.is_active {
            MetricLifecycle::Active
        } else if self.never_activated {
            MetricLifecycle::Inactive
        } else {
            MetricLifecycle::Historical
        }
    }

    /// Classify a measured value against this metric's bands.
    pub fn classify(&self, value: f64) -> Option<ToleranceStatus> {
        self.thresholds.classify(self.metric_type, value)
    }
}

/// Input for creating a tolerance metric. Activation state is not part of the
/// input: new metrics always start inactive.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewToleranceMetric {
    pub organization_id: String,
    pub appetite_category_id: String,
    pub name: String,
    pub description: String,
    pub metric_type: MetricType,
    pub unit: String,
    pub materiality_type: MaterialityType,
    pub thresholds: Thresholds,
    pub kri_id: Option<String>,
    pub effective_from: NaiveDate,
}

/// Editable fields of a never-activated metric.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ToleranceMetricEdit {
    pub name: String,
    pub description: String,
    pub metric_type: MetricType,
    pub unit: String,
    pub materiality_type: MaterialityType,
    pub thresholds: Thresholds,
    pub kri_id: Option<String>,
    pub effective_from: NaiveDate,
}

/// Result of the atomic metric supersede procedure.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MetricSupersession {
    pub superseded: ToleranceMetric,
    pub successor: ToleranceMetric,
}
