use crate::error::{PmpError, Result};
use crate::lookup::Lookup;
use crate::project::ProjectState;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

// ---------------------------------------------------------------------------
// Requirement tables
// ---------------------------------------------------------------------------

/// One artifact a process group expects to find on the project record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Requirement {
    pub field: &'static str,
    pub description: &'static str,
}

const fn req(field: &'static str, description: &'static str) -> Requirement {
    Requirement { field, description }
}

static INITIATING: [Requirement; 3] = [
    req("charter", "Project Charter"),
    req("stakeholderRegister", "Stakeholder Register"),
    req("assumptionsLog", "Assumptions Log"),
];

static PLANNING: [Requirement; 8] = [
    req("projectManagementPlan", "Project Management Plan"),
    req("wbs", "Work Breakdown Structure"),
    req("schedule", "Project Schedule"),
    req("budget", "Cost Baseline"),
    req("riskRegister", "Risk Register"),
    req("qualityPlan", "Quality Management Plan"),
    req("communicationPlan", "Communications Management Plan"),
    req("procurementPlan", "Procurement Management Plan"),
];

static EXECUTING: [Requirement; 4] = [
    req("teamPerformanceAssessments", "Team Performance Assessments"),
    req("qualityAudits", "Quality Audits"),
    req("changeRequests", "Change Requests Log"),
    req("issueLog", "Issue Log"),
];

static MONITORING_CONTROLLING: [Requirement; 4] = [
    req("performanceReports", "Performance Reports"),
    req("earnedValueReports", "Earned Value Reports"),
    req("riskReports", "Risk Reports"),
    req("qualityControlMeasurements", "Quality Control Measurements"),
];

static CLOSING: [Requirement; 4] = [
    req("finalReport", "Final Project Report"),
    req("lessonsLearned", "Lessons Learned Register"),
    req("closureProcedures", "Project Closure Procedures"),
    req("contractClosures", "Contract Closures"),
];

// ---------------------------------------------------------------------------
// ProcessGroup
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ProcessGroup {
    Initiating,
    Planning,
    Executing,
    #[serde(rename = "Monitoring_Controlling")]
    MonitoringControlling,
    Closing,
}

impl ProcessGroup {
    pub fn all() -> &'static [ProcessGroup] {
        &[
            ProcessGroup::Initiating,
            ProcessGroup::Planning,
            ProcessGroup::Executing,
            ProcessGroup::MonitoringControlling,
            ProcessGroup::Closing,
        ]
    }

    /// Stable key, also used as the map key in status reports.
    pub fn as_str(self) -> &'static str {
        match self {
            ProcessGroup::Initiating => "Initiating",
            ProcessGroup::Planning => "Planning",
            ProcessGroup::Executing => "Executing",
            ProcessGroup::MonitoringControlling => "Monitoring_Controlling",
            ProcessGroup::Closing => "Closing",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            ProcessGroup::MonitoringControlling => "Monitoring & Controlling",
            other => other.as_str(),
        }
    }

    pub fn requirements(self) -> &'static [Requirement] {
        match self {
            ProcessGroup::Initiating => &INITIATING,
            ProcessGroup::Planning => &PLANNING,
            ProcessGroup::Executing => &EXECUTING,
            ProcessGroup::MonitoringControlling => &MONITORING_CONTROLLING,
            ProcessGroup::Closing => &CLOSING,
        }
    }
}

impl fmt::Display for ProcessGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl std::str::FromStr for ProcessGroup {
    type Err = PmpError;

    /// Case-insensitive; separators (`_`, `-`, spaces, `&`) are ignored, so
    /// `Monitoring_Controlling` and `Monitoring & Controlling` both parse.
    fn from_str(s: &str) -> Result<Self> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match key.as_str() {
            "initiating" => Ok(ProcessGroup::Initiating),
            "planning" => Ok(ProcessGroup::Planning),
            "executing" => Ok(ProcessGroup::Executing),
            "monitoringcontrolling" | "monitoringandcontrolling" => {
                Ok(ProcessGroup::MonitoringControlling)
            }
            "closing" => Ok(ProcessGroup::Closing),
            _ => Err(PmpError::UnknownProcessGroup(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessGroupValidation {
    pub process_group: String,
    pub compliant: bool,
    pub missing_items: Vec<String>,
    pub warnings: Vec<String>,
    pub recommendations: Vec<String>,
}

/// Check one process group's checklist against the project record.
///
/// A requirement is missing when its field is absent, null, or an empty array.
pub fn validate(group: ProcessGroup, state: &ProjectState) -> ProcessGroupValidation {
    let mut missing_items = Vec::new();
    let mut warnings = Vec::new();
    let mut recommendations = Vec::new();

    for r in group.requirements() {
        let found = state.lookup(r.field);
        if found.is_filled() {
            continue;
        }
        if let Lookup::Present(Value::Array(_)) = found {
            warnings.push(format!("{} is present but has no entries", r.description));
        }
        missing_items.push(r.description.to_string());
        recommendations.push(format!("Prepare the {} ({})", r.description, r.field));
    }

    ProcessGroupValidation {
        process_group: group.display_name().to_string(),
        compliant: missing_items.is_empty(),
        missing_items,
        warnings,
        recommendations,
    }
}

/// Parse `name` and validate; unknown names are an error, never an empty pass.
pub fn validate_named(name: &str, state: &ProjectState) -> Result<ProcessGroupValidation> {
    let group: ProcessGroup = name.parse()?;
    Ok(validate(group, state))
}

/// Validate all five groups, in lifecycle order.
pub fn validate_all(state: &ProjectState) -> BTreeMap<ProcessGroup, ProcessGroupValidation> {
    ProcessGroup::all()
        .iter()
        .map(|&g| (g, validate(g, state)))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
