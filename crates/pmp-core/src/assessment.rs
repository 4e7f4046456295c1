//! Composition of the individual engines into the report objects served by
//! the HTTP layer and the CLI.

use crate::compliance::{self, ComplianceInputs, Deduction, Penalty};
use crate::error::Result;
use crate::health::{CostHealth, ScheduleHealth, INSUFFICIENT_DATA};
use crate::knowledge_area::{self, KnowledgeArea, KnowledgeAreaAssessment};
use crate::metrics::{self, EvmReport, QualityIndex};
use crate::process_group::{self, ProcessGroup, ProcessGroupValidation};
use crate::project::{Budget, ProjectState};
use serde::Serialize;
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Report types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthMetrics {
    pub schedule_health: &'static str,
    pub cost_health: &'static str,
    pub risk_exposure: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality_index: Option<QualityIndex>,
    pub evm: EvmReport,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceReport {
    pub validation: ProcessGroupValidation,
    pub health_metrics: HealthMetrics,
    pub compliance_score: u32,
    pub deductions: Vec<Deduction>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<Penalty>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvmAssessment {
    #[serde(flatten)]
    pub evm: EvmReport,
    pub schedule_health: &'static str,
    pub cost_health: &'static str,
}

fn schedule_label(spi: Option<f64>) -> &'static str {
    spi.map(|v| ScheduleHealth::classify(v).label())
        .unwrap_or(INSUFFICIENT_DATA)
}

fn cost_label(cpi: Option<f64>) -> &'static str {
    cpi.map(|v| CostHealth::classify(v).label())
        .unwrap_or(INSUFFICIENT_DATA)
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Full compliance validation of one phase.
///
/// The phase name is checked first, then baseline completeness, then the
/// numeric inputs. Only a zero denominator degrades the report; every other
/// failure is returned to the caller.
pub fn compliance_report(state: &ProjectState, phase: &str) -> Result<ComplianceReport> {
    let group: ProcessGroup = phase.parse()?;
    state.require_baseline()?;

    let budget = state.budget()?;
    let risks = state.risks()?;
    let quality_metrics = state.quality_metrics()?;

    let validation = process_group::validate(group, state);
    let evm = EvmReport::from_budget(&budget);
    let risk_exposure = metrics::risk_exposure(&risks);
    let quality_index = match metrics::quality_index(&quality_metrics, &budget) {
        Ok(q) => Some(q),
        Err(e) if e.is_division_by_zero() => None,
        Err(e) => return Err(e),
    };

    let scored = compliance::score(&ComplianceInputs {
        missing_items: validation.missing_items.len(),
        spi: evm.spi,
        cpi: evm.cpi,
        quality_index: quality_index.map(|q| q.overall_quality),
        risk_exposure,
    });

    Ok(ComplianceReport {
        health_metrics: HealthMetrics {
            schedule_health: schedule_label(evm.spi),
            cost_health: cost_label(evm.cpi),
            risk_exposure,
            quality_index,
            evm,
        },
        validation,
        compliance_score: scored.score,
        deductions: scored.deductions,
        skipped: scored.skipped,
    })
}

/// Checklist results for all five phases.
pub fn process_group_status(
    state: &ProjectState,
) -> BTreeMap<ProcessGroup, ProcessGroupValidation> {
    process_group::validate_all(state)
}

pub fn knowledge_area_report(
    state: &ProjectState,
) -> BTreeMap<KnowledgeArea, KnowledgeAreaAssessment> {
    knowledge_area::assess_all(state)
}

/// One knowledge area, named case-insensitively (`risk`, `Stakeholder`).
pub fn knowledge_area_named(state: &ProjectState, area: &str) -> Result<KnowledgeAreaAssessment> {
    let area: KnowledgeArea = area.parse()?;
    Ok(knowledge_area::assess(area, state))
}

/// EVM figures with their health labels.
pub fn evm_assessment(budget: &Budget) -> EvmAssessment {
    let evm = EvmReport::from_budget(budget);
    EvmAssessment {
        schedule_health: schedule_label(evm.spi),
        cost_health: cost_label(evm.cpi),
        evm,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PmpError;
    use serde_json::{json, Value};

    fn baseline() -> Value {
        json!({
            "charter": { "scope": "Build the portal" },
            "wbs": [{ "id": "1.1" }],
            "schedule": { "start": "2025-01-01" },
            "budget": {
                "plannedValue": 100.0,
                "earnedValue": 95.0,
                "actualCost": 110.0,
                "totalBudget": 200.0
            },
            "riskRegister": {
                "risks": [
                    { "probability": 0.5, "impact": 0.4, "status": "Active" },
                    { "probability": 0.9, "impact": 0.9, "status": "Closed" }
                ]
            },
            "qualityPlan": {
                "metrics": {
                    "defects": 2,
                    "deliverables": 10,
                    "customerSatisfaction": 8.0,
                    "processesFollowed": 9,
                    "totalProcesses": 10
                }
            },
            "communicationPlan": {},
            "stakeholderRegister": ["sponsor"],
            "procurementPlan": {}
        })
    }

    #[test]
    fn planning_report() {
        let report = compliance_report(&ProjectState::new(baseline()), "Planning").unwrap();
        // projectManagementPlan is the only planning artifact left out.
        assert_eq!(report.validation.missing_items, vec!["Project Management Plan"]);
        let h = &report.health_metrics;
        assert_eq!(h.schedule_health, "Minor Delay");
        assert_eq!(h.cost_health, "Significant Overrun");
        assert!((h.risk_exposure - 0.2).abs() < 1e-9);
        assert!(h.quality_index.is_some());
        // 100 - 10 (one missing) - 15 (cpi 0.86)
        assert_eq!(report.compliance_score, 75);
        assert_eq!(report.deductions.len(), 2);
    }

    #[test]
    fn unknown_phase_checked_before_baseline() {
        let err = compliance_report(&ProjectState::new(json!({})), "Retiring").unwrap_err();
        assert!(matches!(err, PmpError::UnknownProcessGroup(_)));
    }

    #[test]
    fn missing_baseline_lists_every_field() {
        let mut state = baseline();
        state.as_object_mut().unwrap().remove("wbs");
        state.as_object_mut().unwrap().remove("procurementPlan");
        let err = compliance_report(&ProjectState::new(state), "Planning").unwrap_err();
        match err {
            PmpError::MissingField(list) => {
                assert!(list.contains("wbs"));
                assert!(list.contains("procurementPlan"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn zero_actual_cost_degrades() {
        let mut state = baseline();
        state["budget"]["actualCost"] = json!(0.0);
        let report = compliance_report(&ProjectState::new(state), "Closing").unwrap();
        assert_eq!(report.health_metrics.cost_health, INSUFFICIENT_DATA);
        assert!(report.health_metrics.evm.cpi.is_none());
        assert_eq!(report.skipped, vec![Penalty::CostPerformance]);
        // four closing artifacts missing
        assert_eq!(report.compliance_score, 60);
    }

    #[test]
    fn zero_planned_value_drops_quality_index() {
        let mut state = baseline();
        state["budget"]["plannedValue"] = json!(0.0);
        let report = compliance_report(&ProjectState::new(state), "Planning").unwrap();
        assert_eq!(report.health_metrics.schedule_health, INSUFFICIENT_DATA);
        assert!(report.health_metrics.quality_index.is_none());
        assert!(report.skipped.contains(&Penalty::QualityIndex));
        let json = serde_json::to_value(&report).unwrap();
        assert!(json["healthMetrics"].get("qualityIndex").is_none());
    }

    #[test]
    fn out_of_range_probability_propagates() {
        let mut state = baseline();
        state["riskRegister"]["risks"][0]["probability"] = json!(1.5);
        let err = compliance_report(&ProjectState::new(state), "Planning").unwrap_err();
        assert!(matches!(err, PmpError::InvalidRange { .. }));
    }

    #[test]
    fn report_json_shape() {
        let report = compliance_report(&ProjectState::new(baseline()), "planning").unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["validation"]["processGroup"], "Planning");
        assert_eq!(json["complianceScore"], 75);
        assert!(json["healthMetrics"]["evm"]["spi"].is_number());
        assert!(json.get("skipped").is_none());
    }

    #[test]
    fn evm_assessment_labels() {
        let a = evm_assessment(&Budget {
            planned_value: 100.0,
            earned_value: 100.0,
            actual_cost: 80.0,
            total_budget: 500.0,
        });
        assert_eq!(a.schedule_health, "On Track");
        assert_eq!(a.cost_health, "Under Budget");
        let json = serde_json::to_value(&a).unwrap();
        assert_eq!(json["cpi"], 1.25);
        assert_eq!(json["scheduleHealth"], "On Track");
    }

    #[test]
    fn status_and_knowledge_cover_everything() {
        let state = ProjectState::new(baseline());
        assert_eq!(process_group_status(&state).len(), 5);
        assert_eq!(knowledge_area_report(&state).len(), 10);
    }

    #[test]
    fn single_knowledge_area_by_name() {
        let state = ProjectState::new(baseline());
        let risk = knowledge_area_named(&state, "Risk").unwrap();
        assert_eq!(risk.score, 33);
        assert_eq!(risk, knowledge_area_report(&state)[&KnowledgeArea::Risk]);

        let err = knowledge_area_named(&state, "finance").unwrap_err();
        assert!(matches!(err, PmpError::UnknownKnowledgeArea(ref n) if n == "finance"));
    }
}
