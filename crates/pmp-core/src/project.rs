use crate::error::{PmpError, Result};
use crate::lookup::{lookup, Lookup};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Artifacts every project must carry before a full compliance validation.
pub const BASELINE_FIELDS: &[&str] = &[
    "charter",
    "wbs",
    "schedule",
    "budget",
    "riskRegister",
    "qualityPlan",
    "communicationPlan",
    "stakeholderRegister",
    "procurementPlan",
];

// ---------------------------------------------------------------------------
// ProjectState
// ---------------------------------------------------------------------------

/// Caller-supplied project record.
///
/// The record is kept as a JSON tree: most of it is only ever checked for
/// presence. The typed accessors below parse and range-check the few parts
/// that feed numeric formulas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectState(Value);

impl ProjectState {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn from_json_str(data: &str) -> Result<Self> {
        Ok(Self(serde_json::from_str(data)?))
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn lookup(&self, path: &str) -> Lookup<'_> {
        lookup(&self.0, path)
    }

    /// Fails with a single `MissingField` naming every absent baseline artifact.
    pub fn require_baseline(&self) -> Result<()> {
        let missing: Vec<&str> = BASELINE_FIELDS
            .iter()
            .copied()
            .filter(|f| !self.lookup(f).is_present())
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(PmpError::missing_fields(missing))
        }
    }

    pub fn budget(&self) -> Result<Budget> {
        let value = self
            .lookup("budget")
            .value()
            .ok_or_else(|| PmpError::MissingField("budget".into()))?;
        Budget::from_value(value, "budget")
    }

    pub fn risks(&self) -> Result<Vec<Risk>> {
        let value = self
            .lookup("riskRegister.risks")
            .value()
            .ok_or_else(|| PmpError::MissingField("riskRegister.risks".into()))?;
        parse_risks(value, "riskRegister.risks")
    }

    pub fn quality_metrics(&self) -> Result<QualityMetrics> {
        let value = self
            .lookup("qualityPlan.metrics")
            .value()
            .ok_or_else(|| PmpError::MissingField("qualityPlan.metrics".into()))?;
        QualityMetrics::from_value(value, "qualityPlan.metrics")
    }
}

// ---------------------------------------------------------------------------
// Budget
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub planned_value: f64,
    pub earned_value: f64,
    pub actual_cost: f64,
    pub total_budget: f64,
}

impl Budget {
    /// Parse an EVM budget object. `prefix` names the object in error messages.
    pub fn from_value(value: &Value, prefix: &str) -> Result<Self> {
        Ok(Self {
            planned_value: non_negative(value, prefix, "plannedValue")?,
            earned_value: non_negative(value, prefix, "earnedValue")?,
            actual_cost: non_negative(value, prefix, "actualCost")?,
            total_budget: non_negative(value, prefix, "totalBudget")?,
        })
    }
}

// ---------------------------------------------------------------------------
// Risk
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskStatus {
    Active,
    Closed,
    /// Any other label, including a missing one. Never counted as active.
    Other(String),
}

impl RiskStatus {
    pub fn from_label(label: &str) -> Self {
        match label {
            "Active" => RiskStatus::Active,
            "Closed" => RiskStatus::Closed,
            other => RiskStatus::Other(other.to_string()),
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, RiskStatus::Active)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Risk {
    pub probability: f64,
    pub impact: f64,
    pub status: RiskStatus,
}

impl Risk {
    pub fn exposure(&self) -> f64 {
        self.probability * self.impact
    }
}

/// Parse a risk list. Every entry is range-checked, closed ones included.
pub fn parse_risks(value: &Value, prefix: &str) -> Result<Vec<Risk>> {
    let items = value.as_array().ok_or_else(|| PmpError::InvalidType {
        field: prefix.to_string(),
        expected: "array",
    })?;

    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let path = format!("{prefix}[{i}]");
            let status = match item.get("status") {
                Some(Value::String(s)) => RiskStatus::from_label(s),
                _ => RiskStatus::Other(String::new()),
            };
            Ok(Risk {
                probability: bounded(item, &path, "probability", 0.0, 1.0)?,
                impact: bounded(item, &path, "impact", 0.0, 1.0)?,
                status,
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// QualityMetrics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityMetrics {
    pub defects: u64,
    pub deliverables: u64,
    pub customer_satisfaction: f64,
    pub processes_followed: u64,
    pub total_processes: u64,
}

impl QualityMetrics {
    /// Zero `deliverables`/`totalProcesses` are accepted here and reported as
    /// `DivisionByZero` when the quality index is computed.
    pub fn from_value(value: &Value, prefix: &str) -> Result<Self> {
        let metrics = Self {
            defects: count(value, prefix, "defects")?,
            deliverables: count(value, prefix, "deliverables")?,
            customer_satisfaction: bounded(value, prefix, "customerSatisfaction", 0.0, 10.0)?,
            processes_followed: count(value, prefix, "processesFollowed")?,
            total_processes: count(value, prefix, "totalProcesses")?,
        };
        if metrics.total_processes > 0 && metrics.processes_followed > metrics.total_processes {
            return Err(PmpError::InvalidRange {
                field: format!("{prefix}.processesFollowed"),
                value: metrics.processes_followed as f64,
                min: 0.0,
                max: metrics.total_processes as f64,
            });
        }
        Ok(metrics)
    }
}

// ---------------------------------------------------------------------------
// Field readers
// ---------------------------------------------------------------------------

fn number(container: &Value, prefix: &str, key: &str) -> Result<f64> {
    let field = format!("{prefix}.{key}");
    match container.get(key) {
        None | Some(Value::Null) => Err(PmpError::MissingField(field)),
        Some(v) => v.as_f64().ok_or(PmpError::InvalidType {
            field,
            expected: "number",
        }),
    }
}

fn bounded(container: &Value, prefix: &str, key: &str, min: f64, max: f64) -> Result<f64> {
    let value = number(container, prefix, key)?;
    if !(min..=max).contains(&value) {
        return Err(PmpError::InvalidRange {
            field: format!("{prefix}.{key}"),
            value,
            min,
            max,
        });
    }
    Ok(value)
}

fn non_negative(container: &Value, prefix: &str, key: &str) -> Result<f64> {
    bounded(container, prefix, key, 0.0, f64::MAX)
}

fn count(container: &Value, prefix: &str, key: &str) -> Result<u64> {
    let value = non_negative(container, prefix, key)?;
    if value.fract() != 0.0 {
        return Err(PmpError::InvalidType {
            field: format!("{prefix}.{key}"),
            expected: "non-negative integer",
        });
    }
    Ok(value as u64)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
