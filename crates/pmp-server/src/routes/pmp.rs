use axum::extract::State;
use axum::Json;
use serde_json::Value;

use super::ok;
use crate::advisor;
use crate::error::AppError;
use crate::state::AppState;
use crate::validate::{field, is_truthy, Checks, JsonBody};
use pmp_core::assessment;
use pmp_core::metrics;
use pmp_core::project::{parse_risks, Budget};
use pmp_core::{PmpError, ProjectState};

const CHARTER_FIELDS: &[&str] = &["purpose", "objectives", "scope", "stakeholders", "successCriteria"];
const EVM_FIELDS: &[&str] = &["plannedValue", "earnedValue", "actualCost"];

/// Copy of `body` with `key` added, for prompts that need computed figures.
fn with_field(body: &Value, key: &str, value: Value) -> Value {
    let mut out = body.clone();
    if let Some(map) = out.as_object_mut() {
        map.insert(key.to_string(), value);
    }
    out
}

fn project_state(body: &Value) -> Result<ProjectState, AppError> {
    Checks::new(body).object("projectData").finish()?;
    Ok(ProjectState::new(field(body, "projectData").clone()))
}

// ---------------------------------------------------------------------------
// Advisory
// ---------------------------------------------------------------------------

/// POST /api/pmp/analyze-charter
pub async fn analyze_charter(
    State(app): State<AppState>,
    JsonBody(body): JsonBody,
) -> Result<Json<Value>, AppError> {
    Checks::new(&body).object("charterData").finish()?;
    let charter = field(&body, "charterData");
    let missing: Vec<&str> = CHARTER_FIELDS
        .iter()
        .copied()
        .filter(|f| !is_truthy(field(charter, f)))
        .collect();
    if !missing.is_empty() {
        return Err(PmpError::missing_fields(missing).into());
    }
    Ok(ok(advisor::ask(&app, &advisor::CHARTER_REVIEW, &body).await?))
}

/// POST /api/pmp/optimize-wbs
pub async fn optimize_wbs(
    State(app): State<AppState>,
    JsonBody(body): JsonBody,
) -> Result<Json<Value>, AppError> {
    match body.get("wbsData") {
        Some(Value::Array(items)) if !items.is_empty() => {}
        _ => return Err(AppError::bad_request("Invalid WBS structure provided")),
    }
    Ok(ok(advisor::ask(&app, &advisor::WBS_REVIEW, &body).await?))
}

/// POST /api/pmp/analyze-evm: computed indices plus narrative.
///
/// The indices need `totalBudget`; without it only the narrative is returned.
pub async fn analyze_evm(
    State(app): State<AppState>,
    JsonBody(body): JsonBody,
) -> Result<Json<Value>, AppError> {
    Checks::new(&body).object("evmData").finish()?;
    let evm = field(&body, "evmData");
    let missing: Vec<&str> = EVM_FIELDS
        .iter()
        .copied()
        .filter(|f| evm.get(*f).map_or(true, Value::is_null))
        .collect();
    if !missing.is_empty() {
        return Err(PmpError::missing_fields(missing).into());
    }

    let computed = match evm.get("totalBudget") {
        Some(v) if !v.is_null() => {
            let budget = Budget::from_value(evm, "evmData")?;
            Some(assessment::evm_assessment(&budget))
        }
        _ => None,
    };
    tracing::debug!(?computed, "evm computed");

    let input = with_field(&body, "computed", serde_json::to_value(&computed)?);
    let analysis = advisor::ask(&app, &advisor::EVM_REVIEW, &input).await?;
    Ok(ok(serde_json::json!({ "metrics": computed, "analysis": analysis })))
}

/// POST /api/pmp/enhance-risk-management: active exposure plus narrative.
pub async fn enhance_risk_management(
    State(app): State<AppState>,
    JsonBody(body): JsonBody,
) -> Result<Json<Value>, AppError> {
    let Some(risks) = body
        .get("riskRegister")
        .and_then(|r| r.get("risks"))
        .filter(|r| r.is_array())
    else {
        return Err(AppError::bad_request("Invalid risk register structure"));
    };
    let exposure = metrics::risk_exposure(&parse_risks(risks, "riskRegister.risks")?);

    let input = with_field(&body, "riskExposure", exposure.into());
    let analysis = advisor::ask(&app, &advisor::RISK_REVIEW, &input).await?;
    Ok(ok(serde_json::json!({ "riskExposure": exposure, "analysis": analysis })))
}

/// POST /api/pmp/analyze-quality
pub async fn analyze_quality(
    State(app): State<AppState>,
    JsonBody(body): JsonBody,
) -> Result<Json<Value>, AppError> {
    Checks::new(&body).object("qualityData").finish()?;
    Ok(ok(advisor::ask(&app, &advisor::QUALITY_REVIEW, &body).await?))
}

/// POST /api/pmp/enhance-stakeholder-management
pub async fn enhance_stakeholder_management(
    State(app): State<AppState>,
    JsonBody(body): JsonBody,
) -> Result<Json<Value>, AppError> {
    Checks::new(&body).object("stakeholderData").finish()?;
    Ok(ok(advisor::ask(&app, &advisor::STAKEHOLDER_REVIEW, &body).await?))
}

/// POST /api/pmp/optimize-resources
pub async fn optimize_resources(
    State(app): State<AppState>,
    JsonBody(body): JsonBody,
) -> Result<Json<Value>, AppError> {
    Checks::new(&body).object("resourceData").finish()?;
    Ok(ok(advisor::ask(&app, &advisor::RESOURCE_REVIEW, &body).await?))
}

/// POST /api/pmp/coordinate-integration
pub async fn coordinate_integration(
    State(app): State<AppState>,
    JsonBody(body): JsonBody,
) -> Result<Json<Value>, AppError> {
    Checks::new(&body).object("projectData").finish()?;
    Ok(ok(advisor::ask(&app, &advisor::INTEGRATION_REVIEW, &body).await?))
}

// ---------------------------------------------------------------------------
// Deterministic assessments
// ---------------------------------------------------------------------------

/// POST /api/pmp/validate-compliance
pub async fn validate_compliance(JsonBody(body): JsonBody) -> Result<Json<Value>, AppError> {
    Checks::new(&body)
        .object("projectData")
        .string("processGroup", 1, 100)
        .finish()?;
    let state = ProjectState::new(field(&body, "projectData").clone());
    let phase = field(&body, "processGroup").as_str().unwrap_or_default();

    let report = assessment::compliance_report(&state, phase)?;
    tracing::debug!(phase, score = report.compliance_score, "compliance validated");
    Ok(ok(report))
}

/// POST /api/pmp/process-group-status
pub async fn process_group_status(JsonBody(body): JsonBody) -> Result<Json<Value>, AppError> {
    let state = project_state(&body)?;
    Ok(ok(assessment::process_group_status(&state)))
}

/// POST /api/pmp/assess-knowledge-areas
///
/// All ten areas, or just the one named by the optional `area` field.
pub async fn assess_knowledge_areas(JsonBody(body): JsonBody) -> Result<Json<Value>, AppError> {
    let state = project_state(&body)?;
    match body.get("area") {
        None | Some(Value::Null) => Ok(ok(assessment::knowledge_area_report(&state))),
        Some(_) => {
            Checks::new(&body).string("area", 1, 100).finish()?;
            let area = field(&body, "area").as_str().unwrap_or_default();
            Ok(ok(assessment::knowledge_area_named(&state, area)?))
        }
    }
}
