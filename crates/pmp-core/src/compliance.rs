use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComplianceRules {
    pub base: i64,
    pub points_per_missing_item: i64,
    pub spi_floor: f64,
    pub spi_points: i64,
    pub cpi_floor: f64,
    pub cpi_points: i64,
    pub quality_floor: f64,
    pub quality_points: i64,
    pub risk_ceiling: f64,
    pub risk_points: i64,
}

pub static COMPLIANCE_RULES: ComplianceRules = ComplianceRules {
    base: 100,
    points_per_missing_item: 10,
    spi_floor: 0.9,
    spi_points: 15,
    cpi_floor: 0.9,
    cpi_points: 15,
    quality_floor: 7.0,
    quality_points: 10,
    risk_ceiling: 50.0,
    risk_points: 10,
};

// ---------------------------------------------------------------------------
// Penalty
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Penalty {
    MissingItems,
    SchedulePerformance,
    CostPerformance,
    QualityIndex,
    RiskExposure,
}

// ---------------------------------------------------------------------------
// Deduction
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deduction {
    pub penalty: Penalty,
    pub points: u32,
    pub description: String,
}

// ---------------------------------------------------------------------------
// ComplianceScore
// ---------------------------------------------------------------------------

/// Inputs to the compliance score. `None` means the figure could not be
/// computed; its penalty term is skipped rather than failing the score.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ComplianceInputs {
    pub missing_items: usize,
    pub spi: Option<f64>,
    pub cpi: Option<f64>,
    pub quality_index: Option<f64>,
    pub risk_exposure: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceScore {
    /// Score from 0 to 100.
    pub score: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deductions: Vec<Deduction>,
    /// Penalty terms not evaluated because their input was unavailable.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<Penalty>,
}

pub fn score(inputs: &ComplianceInputs) -> ComplianceScore {
    let rules = &COMPLIANCE_RULES;
    let mut deductions = Vec::new();
    let mut skipped = Vec::new();

    if inputs.missing_items > 0 {
        deductions.push(Deduction {
            penalty: Penalty::MissingItems,
            points: (inputs.missing_items as i64 * rules.points_per_missing_item) as u32,
            description: format!("{} required artifact(s) missing", inputs.missing_items),
        });
    }

    let mut below = |penalty: Penalty, value: Option<f64>, floor: f64, points: i64, what: &str| {
        match value {
            Some(v) if v < floor => deductions.push(Deduction {
                penalty,
                points: points as u32,
                description: format!("{what} {v:.2} is below {floor}"),
            }),
            Some(_) => {}
            None => skipped.push(penalty),
        }
    };
    below(Penalty::SchedulePerformance, inputs.spi, rules.spi_floor, rules.spi_points, "SPI");
    below(Penalty::CostPerformance, inputs.cpi, rules.cpi_floor, rules.cpi_points, "CPI");
    below(
        Penalty::QualityIndex,
        inputs.quality_index,
        rules.quality_floor,
        rules.quality_points,
        "Quality index",
    );

    if inputs.risk_exposure > rules.risk_ceiling {
        deductions.push(Deduction {
            penalty: Penalty::RiskExposure,
            points: rules.risk_points as u32,
            description: format!(
                "Risk exposure {:.2} exceeds {}",
                inputs.risk_exposure, rules.risk_ceiling
            ),
        });
    }

    let total: i64 = deductions.iter().map(|d| d.points as i64).sum();
    let score = (rules.base - total).clamp(0, 100) as u32;

    ComplianceScore {
        score,
        deductions,
        skipped,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mixed_penalties() {
        let s = score(&ComplianceInputs {
            missing_items: 2,
            spi: Some(0.95),
            cpi: Some(0.85),
            quality_index: Some(8.0),
            risk_exposure: 60.0,
        });
        assert_eq!(s.score, 55);
        let penalties: Vec<_> = s.deductions.iter().map(|d| d.penalty).collect();
        assert_eq!(
            penalties,
            vec![Penalty::MissingItems, Penalty::CostPerformance, Penalty::RiskExposure]
        );
        assert_eq!(s.deductions[0].points, 20);
    }

    #[test]
    fn clean_project_scores_100() {
        let s = score(&ComplianceInputs {
            missing_items: 0,
            spi: Some(1.0),
            cpi: Some(1.1),
            quality_index: Some(9.0),
            risk_exposure: 0.4,
        });
        assert_eq!(s.score, 100);
        assert!(s.deductions.is_empty());
        assert!(s.skipped.is_empty());
    }

    #[test]
    fn clamps_at_zero() {
        let s = score(&ComplianceInputs {
            missing_items: 8,
            spi: Some(0.1),
            cpi: Some(0.1),
            quality_index: Some(1.0),
            risk_exposure: 99.0,
        });
        assert_eq!(s.score, 0);
    }

    #[test]
    fn thresholds_are_strict() {
        let s = score(&ComplianceInputs {
            missing_items: 0,
            spi: Some(0.9),
            cpi: Some(0.9),
            quality_index: Some(7.0),
            risk_exposure: 50.0,
        });
        assert_eq!(s.score, 100);
    }

    #[test]
    fn unavailable_indices_are_skipped() {
        let s = score(&ComplianceInputs {
            missing_items: 1,
            spi: None,
            cpi: None,
            quality_index: None,
            risk_exposure: 0.0,
        });
        assert_eq!(s.score, 90);
        assert_eq!(
            s.skipped,
            vec![Penalty::SchedulePerformance, Penalty::CostPerformance, Penalty::QualityIndex]
        );
    }

    #[test]
    fn score_json_shape() {
        let s = score(&ComplianceInputs {
            missing_items: 0,
            spi: Some(0.5),
            ..Default::default()
        });
        let json = serde_json::to_value(&s).unwrap();
        assert_eq!(json["score"], 85);
        assert_eq!(json["deductions"][0]["penalty"], "schedule_performance");
        assert!(json.get("skipped").is_some());
    }

    #[test]
    fn scoring_is_idempotent() {
        let inputs = ComplianceInputs {
            missing_items: 3,
            spi: Some(0.7),
            cpi: None,
            quality_index: Some(6.5),
            risk_exposure: 12.0,
        };
        assert_eq!(score(&inputs), score(&inputs));
    }
}
