//! Prompt templates for the advisory endpoints and the call that runs them.

use crate::error::AppError;
use crate::state::AppState;
use claude_client::{parse_json_reply, CompletionRequest};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Advice table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyFormat {
    Json,
    Text,
}

/// One advisory request kind. `render` builds the prompt from the request
/// body; `failure` is the only error text a client ever sees.
pub struct Advice {
    pub name: &'static str,
    pub max_tokens: u32,
    pub reply: ReplyFormat,
    pub failure: &'static str,
    pub render: fn(&Value) -> String,
}

/// Shared persona for every advisory call. Per-endpoint instructions live in
/// the rendered prompt.
pub const SYSTEM_PROMPT: &str = "You are a PMP-certified project manager advising a delivery team. \
     Ground every recommendation in PMBOK practice and the figures you are given. \
     When asked for JSON, reply with JSON only.";

fn pretty(v: &Value) -> String {
    serde_json::to_string_pretty(v).unwrap_or_else(|_| v.to_string())
}

fn get<'a>(body: &'a Value, key: &str) -> &'a Value {
    crate::validate::field(body, key)
}

fn text<'a>(body: &'a Value, key: &str) -> &'a str {
    get(body, key).as_str().unwrap_or("")
}

pub static BREAKDOWN_TASK: Advice = Advice {
    name: "breakdown-task",
    max_tokens: 1500,
    reply: ReplyFormat::Json,
    failure: "Failed to breakdown task",
    render: |b: &Value| {
        format!(
            "You are an experienced project manager. Break this task into concrete subtasks.\n\n\
             Task: \"{}\"\nProject context: {}\n\n\
             For each subtask give: name, estimatedHours, skills, dependencies, priority.\n\
             Reply with a JSON array only.",
            text(b, "taskDescription"),
            text(b, "projectContext"),
        )
    },
};

pub static ANALYZE_TIMELINE: Advice = Advice {
    name: "analyze-timeline",
    max_tokens: 1000,
    reply: ReplyFormat::Json,
    failure: "Failed to analyze timeline",
    render: |b: &Value| {
        format!(
            "Predict the delivery timeline for this project.\n\nProject: {}\n\n\
             Reply with a JSON object: completionProbability, projectedDelay (days), \
             riskFactors, recommendations, confidenceLevel (high/medium/low).",
            pretty(get(b, "projectData")),
        )
    },
};

pub static ANALYZE_SCOPE_CHANGE: Advice = Advice {
    name: "analyze-scope-change",
    max_tokens: 1200,
    reply: ReplyFormat::Json,
    failure: "Failed to analyze scope change",
    render: |b: &Value| {
        format!(
            "Assess the impact of a scope change.\n\nOriginal scope: \"{}\"\n\
             Proposed change: \"{}\"\nCurrent status: {}\n\n\
             Cover timeline impact in days, resources, budget, risk level (1-10), \
             alternatives and stakeholder communication. Reply with a JSON object.",
            text(b, "originalScope"),
            text(b, "proposedChange"),
            get(b, "projectData"),
        )
    },
};

pub static ANALYZE_COMMUNICATIONS: Advice = Advice {
    name: "analyze-communications",
    max_tokens: 1000,
    reply: ReplyFormat::Json,
    failure: "Failed to analyze communications",
    render: |b: &Value| {
        format!(
            "Read these team communications for project health signals.\n\n\
             Communications: {}\n\n\
             Report sentiment, stress indicators, collaboration, blockers, engagement \
             per member and suggested interventions. Reply with a JSON object.",
            get(b, "communications"),
        )
    },
};

pub static OPTIMIZE_ALLOCATION: Advice = Advice {
    name: "optimize-allocation",
    max_tokens: 1200,
    reply: ReplyFormat::Json,
    failure: "Failed to optimize resources",
    render: |b: &Value| {
        format!(
            "Propose a resource allocation.\n\nTeam: {}\nRequirements: {}\n\n\
             Cover task assignments, workload balance, skill gaps, training, timeline \
             and risk mitigation. Reply with a JSON object.",
            get(b, "teamData"),
            get(b, "projectRequirements"),
        )
    },
};

pub static PROJECT_QUERY: Advice = Advice {
    name: "query",
    max_tokens: 800,
    reply: ReplyFormat::Text,
    failure: "Failed to process query",
    render: |b: &Value| {
        format!(
            "You are a project management assistant. Answer the question using the \
             project context.\n\nQuestion: \"{}\"\nContext: {}\n\n\
             Be specific and recommend next steps where useful.",
            text(b, "query"),
            get(b, "projectContext"),
        )
    },
};

pub static CHARTER_REVIEW: Advice = Advice {
    name: "analyze-charter",
    max_tokens: 1500,
    reply: ReplyFormat::Json,
    failure: "Failed to analyze project charter",
    render: |b: &Value| {
        format!(
            "Review this project charter against PMBOK expectations.\n\nCharter: {}\n\n\
             Judge completeness, SMART objectives, stakeholder coverage, measurable \
             success criteria, scope boundaries, high-level risks and business case. \
             Reply with a JSON object holding completenessScore (1-10), \
             recommendations, missingElements, riskFlags, stakeholderGaps.",
            pretty(get(b, "charterData")),
        )
    },
};

pub static WBS_REVIEW: Advice = Advice {
    name: "optimize-wbs",
    max_tokens: 1800,
    reply: ReplyFormat::Json,
    failure: "Failed to optimize WBS",
    render: |b: &Value| {
        format!(
            "Review this work breakdown structure.\n\nWBS: {}\nObjectives: {}\n\n\
             Check the 100% rule, exclusive deliverables, decomposition depth, the 8-80 \
             hour work package rule and control accounts. Reply with a JSON object of \
             missingWorkPackages, decompositionChanges, dependencies, controlPoints, \
             riskAreas.",
            pretty(get(b, "wbsData")),
            get(b, "projectObjectives"),
        )
    },
};

pub static EVM_REVIEW: Advice = Advice {
    name: "analyze-evm",
    max_tokens: 1600,
    reply: ReplyFormat::Json,
    failure: "Failed to analyze earned value metrics",
    render: |b: &Value| {
        format!(
            "Interpret these earned value figures.\n\nInputs: {}\nBaseline: {}\n\
             Computed indices: {}\n\n\
             Explain schedule and cost performance, EAC scenarios, threshold breaches \
             and corrective actions. Reply with a JSON object.",
            pretty(get(b, "evmData")),
            get(b, "projectBaseline"),
            get(b, "computed"),
        )
    },
};

pub static RISK_REVIEW: Advice = Advice {
    name: "enhance-risk-management",
    max_tokens: 2000,
    reply: ReplyFormat::Json,
    failure: "Failed to enhance risk management",
    render: |b: &Value| {
        format!(
            "Strengthen this risk register.\n\nRegister: {}\nContext: {}\n\
             Active exposure: {}\n\n\
             Suggest additional risks, validate probability and impact, refine responses \
             (avoid/mitigate/transfer/accept), triggers and contingency plans. \
             Reply with a JSON object.",
            pretty(get(b, "riskRegister")),
            get(b, "projectContext"),
            get(b, "riskExposure"),
        )
    },
};

pub static QUALITY_REVIEW: Advice = Advice {
    name: "analyze-quality",
    max_tokens: 1400,
    reply: ReplyFormat::Json,
    failure: "Failed to analyze quality management",
    render: |b: &Value| {
        format!(
            "Assess quality management.\n\nQuality data: {}\nRequirements: {}\n\n\
             Cover planning gaps, assurance, control metrics, cost of quality and \
             customer satisfaction. Reply with a JSON object.",
            pretty(get(b, "qualityData")),
            get(b, "projectRequirements"),
        )
    },
};

pub static STAKEHOLDER_REVIEW: Advice = Advice {
    name: "enhance-stakeholder-management",
    max_tokens: 1600,
    reply: ReplyFormat::Json,
    failure: "Failed to enhance stakeholder management",
    render: |b: &Value| {
        format!(
            "Improve stakeholder engagement.\n\nStakeholders: {}\nCommunication plan: {}\n\n\
             Cover missing stakeholders, power/interest analysis, engagement strategy \
             and communication changes. Reply with a JSON object.",
            pretty(get(b, "stakeholderData")),
            get(b, "communicationPlan"),
        )
    },
};

pub static RESOURCE_REVIEW: Advice = Advice {
    name: "optimize-resources",
    max_tokens: 1500,
    reply: ReplyFormat::Json,
    failure: "Failed to optimize resource management",
    render: |b: &Value| {
        format!(
            "Optimize resource management.\n\nResources: {}\nSchedule: {}\n\n\
             Cover leveling, skill gaps, team development, conflicts and succession \
             for key people. Reply with a JSON object.",
            pretty(get(b, "resourceData")),
            get(b, "projectSchedule"),
        )
    },
};

pub static INTEGRATION_REVIEW: Advice = Advice {
    name: "coordinate-integration",
    max_tokens: 1700,
    reply: ReplyFormat::Json,
    failure: "Failed to coordinate project integration",
    render: |b: &Value| {
        format!(
            "Coordinate integration management.\n\nProject: {}\nChange requests: {}\n\n\
             Cover plan coherence, change impact, configuration and knowledge \
             management, and closure readiness. Reply with a JSON object.",
            pretty(get(b, "projectData")),
            get(b, "changeRequests"),
        )
    },
};

// ---------------------------------------------------------------------------
// Execution
// ---------------------------------------------------------------------------

/// Render `advice` over `input`, call the model and shape the reply.
///
/// JSON advice yields the parsed value; text advice yields a JSON string.
/// Any client failure is logged and replaced by `advice.failure`.
pub async fn ask(app: &AppState, advice: &Advice, input: &Value) -> Result<Value, AppError> {
    let request = CompletionRequest::new((advice.render)(input))
        .with_system(SYSTEM_PROMPT)
        .with_max_tokens(advice.max_tokens);

    let reply = app.completion.complete(request).await.map_err(|e| {
        tracing::warn!(advice = advice.name, error = %e, "narrative call failed");
        AppError::upstream(advice.failure)
    })?;

    match advice.reply {
        ReplyFormat::Text => Ok(Value::String(reply)),
        ReplyFormat::Json => parse_json_reply(&reply).map_err(|e| {
            tracing::warn!(advice = advice.name, error = %e, "narrative reply was not JSON");
            AppError::upstream(advice.failure)
        }),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
