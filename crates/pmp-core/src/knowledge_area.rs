use crate::project::ProjectState;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ---------------------------------------------------------------------------
// Area tables
// ---------------------------------------------------------------------------

/// A named status flag reported next to an area's score.
///
/// An indicator reads one of its area's scored fields under the same
/// presence rule as the score: absent or `null` is missing, while `""`, `0`
/// and `false` count as present. Each process flag reads its own process
/// field, so `costControl` follows `costControlProcess` and not
/// `earnedValue`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Indicator {
    pub name: &'static str,
    pub field: &'static str,
    pub when_present: &'static str,
    pub when_missing: &'static str,
}

#[derive(Debug)]
pub struct AreaDefinition {
    /// Field paths scored for completeness. Dotted paths are nested lookups.
    pub fields: &'static [&'static str],
    pub indicators: &'static [Indicator],
}

const COMPLETE: &str = "Complete";
const MISSING: &str = "Missing";
const ACTIVE: &str = "Active";
const NOT_IMPLEMENTED: &str = "Not Implemented";
const NOT_APPLICABLE: &str = "Not Applicable";

const fn planned(name: &'static str, field: &'static str) -> Indicator {
    Indicator { name, field, when_present: COMPLETE, when_missing: MISSING }
}

const fn practiced(name: &'static str, field: &'static str) -> Indicator {
    Indicator { name, field, when_present: ACTIVE, when_missing: NOT_IMPLEMENTED }
}

static INTEGRATION: AreaDefinition = AreaDefinition {
    fields: &["charter", "projectManagementPlan", "changeControlProcess"],
    indicators: &[
        planned("charterStatus", "charter"),
        planned("managementPlanStatus", "projectManagementPlan"),
        practiced("changeControlStatus", "changeControlProcess"),
    ],
};

static SCOPE: AreaDefinition = AreaDefinition {
    fields: &["charter.scope", "wbs", "scopeValidationProcess"],
    indicators: &[
        planned("scopeDefinition", "charter.scope"),
        planned("wbsStatus", "wbs"),
        practiced("scopeValidation", "scopeValidationProcess"),
    ],
};

static SCHEDULE: AreaDefinition = AreaDefinition {
    fields: &["wbs", "schedule", "earnedValue"],
    indicators: &[
        planned("activityDefinition", "wbs"),
        planned("scheduleStatus", "schedule"),
        practiced("scheduleControl", "earnedValue"),
    ],
};

static COST: AreaDefinition = AreaDefinition {
    fields: &["budget", "earnedValue", "costControlProcess"],
    indicators: &[
        planned("budgetPlanning", "budget"),
        practiced("costControl", "costControlProcess"),
        practiced("evmImplementation", "earnedValue"),
    ],
};

static QUALITY: AreaDefinition = AreaDefinition {
    fields: &["qualityPlan", "qualityAudits", "qualityControlMeasurements"],
    indicators: &[
        planned("qualityPlanning", "qualityPlan"),
        practiced("qualityAssurance", "qualityAudits"),
        practiced("qualityControl", "qualityControlMeasurements"),
    ],
};

static RESOURCE: AreaDefinition = AreaDefinition {
    fields: &["resourcePlan", "teamPerformanceAssessments", "resourceUtilizationReports"],
    indicators: &[
        planned("resourcePlanning", "resourcePlan"),
        practiced("teamDevelopment", "teamPerformanceAssessments"),
        practiced("resourceControl", "resourceUtilizationReports"),
    ],
};

static COMMUNICATIONS: AreaDefinition = AreaDefinition {
    fields: &["communicationPlan", "communicationLogs", "performanceReports"],
    indicators: &[
        planned("communicationPlanning", "communicationPlan"),
        practiced("informationDistribution", "communicationLogs"),
        practiced("performanceReporting", "performanceReports"),
    ],
};

static RISK: AreaDefinition = AreaDefinition {
    fields: &["riskManagementPlan", "riskRegister", "riskReports"],
    indicators: &[
        planned("riskPlanning", "riskManagementPlan"),
        planned("riskIdentification", "riskRegister"),
        practiced("riskMonitoring", "riskReports"),
    ],
};

// Procurement is optional on many projects, so absence reads "Not Applicable".
static PROCUREMENT: AreaDefinition = AreaDefinition {
    fields: &["procurementPlan", "vendorContracts"],
    indicators: &[
        Indicator {
            name: "procurementPlanning",
            field: "procurementPlan",
            when_present: COMPLETE,
            when_missing: NOT_APPLICABLE,
        },
        Indicator {
            name: "vendorManagement",
            field: "vendorContracts",
            when_present: ACTIVE,
            when_missing: NOT_APPLICABLE,
        },
    ],
};

static STAKEHOLDER: AreaDefinition = AreaDefinition {
    fields: &["stakeholderRegister", "stakeholderEngagementPlan", "stakeholderFeedback"],
    indicators: &[
        planned("stakeholderIdentification", "stakeholderRegister"),
        planned("engagementPlanning", "stakeholderEngagementPlan"),
        practiced("stakeholderMonitoring", "stakeholderFeedback"),
    ],
};

// ---------------------------------------------------------------------------
// KnowledgeArea
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KnowledgeArea {
    Integration,
    Scope,
    Schedule,
    Cost,
    Quality,
    Resource,
    Communications,
    Risk,
    Procurement,
    Stakeholder,
}

impl KnowledgeArea {
    pub fn all() -> &'static [KnowledgeArea] {
        &[
            KnowledgeArea::Integration,
            KnowledgeArea::Scope,
            KnowledgeArea::Schedule,
            KnowledgeArea::Cost,
            KnowledgeArea::Quality,
            KnowledgeArea::Resource,
            KnowledgeArea::Communications,
            KnowledgeArea::Risk,
            KnowledgeArea::Procurement,
            KnowledgeArea::Stakeholder,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            KnowledgeArea::Integration => "integration",
            KnowledgeArea::Scope => "scope",
            KnowledgeArea::Schedule => "schedule",
            KnowledgeArea::Cost => "cost",
            KnowledgeArea::Quality => "quality",
            KnowledgeArea::Resource => "resource",
            KnowledgeArea::Communications => "communications",
            KnowledgeArea::Risk => "risk",
            KnowledgeArea::Procurement => "procurement",
            KnowledgeArea::Stakeholder => "stakeholder",
        }
    }

    pub fn definition(self) -> &'static AreaDefinition {
        match self {
            KnowledgeArea::Integration => &INTEGRATION,
            KnowledgeArea::Scope => &SCOPE,
            KnowledgeArea::Schedule => &SCHEDULE,
            KnowledgeArea::Cost => &COST,
            KnowledgeArea::Quality => &QUALITY,
            KnowledgeArea::Resource => &RESOURCE,
            KnowledgeArea::Communications => &COMMUNICATIONS,
            KnowledgeArea::Risk => &RISK,
            KnowledgeArea::Procurement => &PROCUREMENT,
            KnowledgeArea::Stakeholder => &STAKEHOLDER,
        }
    }
}

impl fmt::Display for KnowledgeArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for KnowledgeArea {
    type Err = crate::error::PmpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        KnowledgeArea::all()
            .iter()
            .copied()
            .find(|a| a.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| crate::error::PmpError::UnknownKnowledgeArea(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Assessment
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeAreaAssessment {
    /// Percentage of expected fields present, `0..=100`.
    pub score: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub missing_fields: Vec<&'static str>,
    #[serde(flatten)]
    pub indicators: BTreeMap<&'static str, &'static str>,
}

/// Score one knowledge area. A field is complete when it resolves to any
/// non-null value; empty strings and zeros count.
pub fn assess(area: KnowledgeArea, state: &ProjectState) -> KnowledgeAreaAssessment {
    let def = area.definition();
    let missing_fields: Vec<&'static str> = def
        .fields
        .iter()
        .copied()
        .filter(|f| !state.lookup(f).is_present())
        .collect();
    let total = def.fields.len();
    let completed = total - missing_fields.len();
    let score = (100.0 * completed as f64 / total as f64).round() as u32;

    let indicators = def
        .indicators
        .iter()
        .map(|i| {
            let status = if state.lookup(i.field).is_present() {
                i.when_present
            } else {
                i.when_missing
            };
            (i.name, status)
        })
        .collect();

    KnowledgeAreaAssessment {
        score,
        missing_fields,
        indicators,
    }
}

pub fn assess_all(state: &ProjectState) -> BTreeMap<KnowledgeArea, KnowledgeAreaAssessment> {
    KnowledgeArea::all()
        .iter()
        .map(|&a| (a, assess(a, state)))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
