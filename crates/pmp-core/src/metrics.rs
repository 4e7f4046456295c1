use crate::error::{PmpError, Result};
use crate::project::{Budget, QualityMetrics, Risk};
use serde::Serialize;

// ---------------------------------------------------------------------------
// Earned value
// ---------------------------------------------------------------------------

fn ratio(numerator: f64, denominator: f64, what: &'static str) -> Result<f64> {
    if denominator == 0.0 {
        return Err(PmpError::DivisionByZero(what));
    }
    Ok(numerator / denominator)
}

/// Schedule performance index, EV / PV.
pub fn spi(b: &Budget) -> Result<f64> {
    ratio(b.earned_value, b.planned_value, "spi")
}

/// Cost performance index, EV / AC.
pub fn cpi(b: &Budget) -> Result<f64> {
    ratio(b.earned_value, b.actual_cost, "cpi")
}

pub fn schedule_variance(b: &Budget) -> f64 {
    b.earned_value - b.planned_value
}

pub fn cost_variance(b: &Budget) -> f64 {
    b.earned_value - b.actual_cost
}

/// Estimate at completion, AC + (BAC - EV) / CPI.
pub fn eac(b: &Budget) -> Result<f64> {
    let cpi = cpi(b)?;
    Ok(b.actual_cost + ratio(b.total_budget - b.earned_value, cpi, "eac")?)
}

/// Estimate to complete, EAC - AC.
pub fn etc(b: &Budget) -> Result<f64> {
    Ok(eac(b)? - b.actual_cost)
}

/// Variance at completion, BAC - EAC.
pub fn vac(b: &Budget) -> Result<f64> {
    Ok(b.total_budget - eac(b)?)
}

/// Every EVM figure for one budget. Figures whose denominator was zero are
/// left out and named in `unavailable`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvmReport {
    pub pv: f64,
    pub ev: f64,
    pub ac: f64,
    pub bac: f64,
    pub sv: f64,
    pub cv: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spi: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpi: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eac: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub etc: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vac: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unavailable: Vec<String>,
}

impl EvmReport {
    pub fn from_budget(b: &Budget) -> Self {
        let mut unavailable = Vec::new();
        let mut keep = |name: &str, r: Result<f64>| match r {
            Ok(v) => Some(v),
            Err(_) => {
                unavailable.push(name.to_string());
                None
            }
        };
        let spi = keep("spi", spi(b));
        let cpi = keep("cpi", cpi(b));
        let eac = keep("eac", eac(b));
        let etc = keep("etc", etc(b));
        let vac = keep("vac", vac(b));

        Self {
            pv: b.planned_value,
            ev: b.earned_value,
            ac: b.actual_cost,
            bac: b.total_budget,
            sv: schedule_variance(b),
            cv: cost_variance(b),
            spi,
            cpi,
            eac,
            etc,
            vac,
            unavailable,
        }
    }
}

// ---------------------------------------------------------------------------
// Risk exposure
// ---------------------------------------------------------------------------

/// Sum of probability x impact over active risks.
pub fn risk_exposure(risks: &[Risk]) -> f64 {
    risks
        .iter()
        .filter(|r| r.status.is_active())
        .map(Risk::exposure)
        .sum()
}

// ---------------------------------------------------------------------------
// Quality index
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualityWeights {
    pub defect_rate: f64,
    pub customer_satisfaction: f64,
    pub process_compliance: f64,
    pub schedule_adherence: f64,
}

pub static QUALITY_WEIGHTS: QualityWeights = QualityWeights {
    defect_rate: 0.3,
    customer_satisfaction: 0.4,
    process_compliance: 0.2,
    schedule_adherence: 0.1,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityIndex {
    /// Defects per deliverable (raw, not normalized).
    pub defect_rate: f64,
    pub customer_satisfaction: f64,
    pub process_compliance: f64,
    /// Weighted score in `[0, 10]`.
    pub overall_quality: f64,
}

/// Weighted quality score. The schedule term reuses SPI, so a zero planned
/// value surfaces here as the same `DivisionByZero`.
pub fn quality_index(m: &QualityMetrics, budget: &Budget) -> Result<QualityIndex> {
    let w = &QUALITY_WEIGHTS;
    let defect_rate = ratio(m.defects as f64, m.deliverables as f64, "defect rate")?;
    let process_compliance = ratio(
        m.processes_followed as f64,
        m.total_processes as f64,
        "process compliance",
    )?;
    let schedule = spi(budget)?.min(1.0);

    let weighted = w.defect_rate * (1.0 - defect_rate).max(0.0)
        + w.customer_satisfaction * (m.customer_satisfaction / 10.0)
        + w.process_compliance * process_compliance
        + w.schedule_adherence * schedule;

    Ok(QualityIndex {
        defect_rate,
        customer_satisfaction: m.customer_satisfaction,
        process_compliance,
        overall_quality: (weighted * 10.0).clamp(0.0, 10.0),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::RiskStatus;

    fn budget(pv: f64, ev: f64, ac: f64, bac: f64) -> Budget {
        Budget {
            planned_value: pv,
            earned_value: ev,
            actual_cost: ac,
            total_budget: bac,
        }
    }

    fn metrics(defects: u64, deliverables: u64, sat: f64, followed: u64, total: u64) -> QualityMetrics {
        QualityMetrics {
            defects,
            deliverables,
            customer_satisfaction: sat,
            processes_followed: followed,
            total_processes: total,
        }
    }

    fn risk(p: f64, i: f64, status: &str) -> Risk {
        Risk {
            probability: p,
            impact: i,
            status: RiskStatus::from_label(status),
        }
    }

    #[test]
    fn evm_indices_are_exact_ratios() {
        let b = budget(200.0, 150.0, 120.0, 1000.0);
        assert_eq!(spi(&b).unwrap(), 150.0 / 200.0);
        assert_eq!(cpi(&b).unwrap(), 150.0 / 120.0);
        assert_eq!(schedule_variance(&b), -50.0);
        assert_eq!(cost_variance(&b), 30.0);
        let cpi = 150.0 / 120.0;
        assert_eq!(eac(&b).unwrap(), 120.0 + (1000.0 - 150.0) / cpi);
        assert_eq!(etc(&b).unwrap(), eac(&b).unwrap() - 120.0);
        assert_eq!(vac(&b).unwrap(), 1000.0 - eac(&b).unwrap());
    }

    #[test]
    fn zero_actual_cost_signals_division_by_zero() {
        let b = budget(100.0, 50.0, 0.0, 1000.0);
        assert!(matches!(cpi(&b), Err(PmpError::DivisionByZero("cpi"))));
        assert!(eac(&b).unwrap_err().is_division_by_zero());
        assert!(etc(&b).unwrap_err().is_division_by_zero());
        assert!(vac(&b).unwrap_err().is_division_by_zero());
        assert_eq!(spi(&b).unwrap(), 0.5);
    }

    #[test]
    fn zero_planned_value_signals_division_by_zero() {
        let b = budget(0.0, 50.0, 40.0, 1000.0);
        assert!(matches!(spi(&b), Err(PmpError::DivisionByZero("spi"))));
        assert!(cpi(&b).is_ok());
    }

    #[test]
    fn zero_cpi_makes_eac_undefined() {
        let b = budget(100.0, 0.0, 40.0, 1000.0);
        assert_eq!(cpi(&b).unwrap(), 0.0);
        assert!(matches!(eac(&b), Err(PmpError::DivisionByZero("eac"))));
    }

    #[test]
    fn report_lists_unavailable_figures() {
        let report = EvmReport::from_budget(&budget(100.0, 50.0, 0.0, 1000.0));
        assert_eq!(report.spi, Some(0.5));
        assert!(report.cpi.is_none());
        assert!(report.eac.is_none());
        assert_eq!(report.unavailable, vec!["cpi", "eac", "etc", "vac"]);

        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("cpi").is_none());
        assert_eq!(json["sv"], -50.0);
    }

    #[test]
    fn report_complete_budget_has_no_unavailable() {
        let report = EvmReport::from_budget(&budget(100.0, 100.0, 100.0, 500.0));
        assert!(report.unavailable.is_empty());
        assert_eq!(report.eac, Some(500.0));
        assert_eq!(report.vac, Some(0.0));
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("unavailable").is_none());
    }

    #[test]
    fn risk_exposure_counts_only_active() {
        let risks = vec![risk(0.5, 0.4, "Active"), risk(0.9, 0.9, "Closed")];
        assert!((risk_exposure(&risks) - 0.2).abs() < 1e-12);
    }

    #[test]
    fn risk_exposure_excludes_unrecognized_status() {
        let risks = vec![risk(0.5, 0.5, "active"), risk(0.3, 0.3, "Mitigated")];
        assert_eq!(risk_exposure(&risks), 0.0);
    }

    #[test]
    fn risk_exposure_empty() {
        assert_eq!(risk_exposure(&[]), 0.0);
    }

    #[test]
    fn quality_index_perfect_project() {
        let q = quality_index(&metrics(0, 10, 10.0, 5, 5), &budget(100.0, 120.0, 100.0, 500.0)).unwrap();
        assert!((q.overall_quality - 10.0).abs() < 1e-9);
        assert!(q.overall_quality <= 10.0);
    }

    #[test]
    fn quality_index_weighted_components() {
        // defects 2/10 -> 0.8, satisfaction 0.8, compliance 0.9, spi 0.9
        let q = quality_index(&metrics(2, 10, 8.0, 9, 10), &budget(100.0, 90.0, 90.0, 500.0)).unwrap();
        let expected = (0.3 * 0.8 + 0.4 * 0.8 + 0.2 * 0.9 + 0.1 * 0.9) * 10.0;
        assert!((q.overall_quality - expected).abs() < 1e-9);
        assert_eq!(q.defect_rate, 0.2);
        assert_eq!(q.process_compliance, 0.9);
    }

    #[test]
    fn quality_index_defect_term_floors_at_zero() {
        let q = quality_index(&metrics(30, 10, 0.0, 0, 10), &budget(100.0, 0.0, 10.0, 500.0)).unwrap();
        assert_eq!(q.overall_quality, 0.0);
    }

    #[test]
    fn quality_index_stays_in_range() {
        let budgets = [
            budget(100.0, 300.0, 10.0, 500.0),
            budget(100.0, 0.0, 10.0, 500.0),
            budget(1.0, 1.0, 1.0, 1.0),
        ];
        for b in &budgets {
            for defects in [0, 1, 5, 50] {
                for sat in [0.0, 3.3, 10.0] {
                    for followed in [0, 3, 7] {
                        let q = quality_index(&metrics(defects, 5, sat, followed, 7), b).unwrap();
                        assert!((0.0..=10.0).contains(&q.overall_quality));
                    }
                }
            }
        }
    }

    #[test]
    fn quality_index_zero_deliverables() {
        let err = quality_index(&metrics(0, 0, 5.0, 1, 1), &budget(1.0, 1.0, 1.0, 1.0)).unwrap_err();
        assert!(matches!(err, PmpError::DivisionByZero("defect rate")));
    }

    #[test]
    fn quality_index_zero_total_processes() {
        let err = quality_index(&metrics(0, 1, 5.0, 0, 0), &budget(1.0, 1.0, 1.0, 1.0)).unwrap_err();
        assert!(matches!(err, PmpError::DivisionByZero("process compliance")));
    }

    #[test]
    fn quality_index_surfaces_spi_failure() {
        let err = quality_index(&metrics(0, 1, 5.0, 1, 1), &budget(0.0, 1.0, 1.0, 1.0)).unwrap_err();
        assert!(matches!(err, PmpError::DivisionByZero("spi")));
    }

    #[test]
    fn calculations_are_idempotent() {
        let b = budget(200.0, 150.0, 120.0, 1000.0);
        assert_eq!(EvmReport::from_budget(&b), EvmReport::from_budget(&b));
        let m = metrics(1, 4, 7.0, 3, 4);
        assert_eq!(quality_index(&m, &b).unwrap(), quality_index(&m, &b).unwrap());
    }
}
