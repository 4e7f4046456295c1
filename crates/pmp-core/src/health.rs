use serde::{Deserialize, Serialize};
use std::fmt;

/// Inclusive lower bounds for the three upper health bands, checked in
/// descending order. Anything below the last bound is the critical band.
pub static HEALTH_THRESHOLDS: [f64; 3] = [1.0, 0.9, 0.8];

/// Label used when the underlying index could not be computed.
pub const INSUFFICIENT_DATA: &str = "Insufficient Data";

fn band(index: f64) -> usize {
    HEALTH_THRESHOLDS
        .iter()
        .position(|&t| index >= t)
        .unwrap_or(HEALTH_THRESHOLDS.len())
}

// ---------------------------------------------------------------------------
// ScheduleHealth
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScheduleHealth {
    #[serde(rename = "On Track")]
    OnTrack,
    #[serde(rename = "Minor Delay")]
    MinorDelay,
    #[serde(rename = "Significant Delay")]
    SignificantDelay,
    #[serde(rename = "Critical Delay")]
    CriticalDelay,
}

impl ScheduleHealth {
    pub fn classify(spi: f64) -> Self {
        match band(spi) {
            0 => ScheduleHealth::OnTrack,
            1 => ScheduleHealth::MinorDelay,
            2 => ScheduleHealth::SignificantDelay,
            _ => ScheduleHealth::CriticalDelay,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ScheduleHealth::OnTrack => "On Track",
            ScheduleHealth::MinorDelay => "Minor Delay",
            ScheduleHealth::SignificantDelay => "Significant Delay",
            ScheduleHealth::CriticalDelay => "Critical Delay",
        }
    }
}

impl fmt::Display for ScheduleHealth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// CostHealth
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CostHealth {
    #[serde(rename = "Under Budget")]
    UnderBudget,
    #[serde(rename = "Minor Overrun")]
    MinorOverrun,
    #[serde(rename = "Significant Overrun")]
    SignificantOverrun,
    #[serde(rename = "Critical Overrun")]
    CriticalOverrun,
}

impl CostHealth {
    pub fn classify(cpi: f64) -> Self {
        match band(cpi) {
            0 => CostHealth::UnderBudget,
            1 => CostHealth::MinorOverrun,
            2 => CostHealth::SignificantOverrun,
            _ => CostHealth::CriticalOverrun,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CostHealth::UnderBudget => "Under Budget",
            CostHealth::MinorOverrun => "Minor Overrun",
            CostHealth::SignificantOverrun => "Significant Overrun",
            CostHealth::CriticalOverrun => "Critical Overrun",
        }
    }
}

impl fmt::Display for CostHealth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schedule_labels() {
        assert_eq!(ScheduleHealth::classify(1.0), ScheduleHealth::OnTrack);
        assert_eq!(ScheduleHealth::classify(0.95), ScheduleHealth::MinorDelay);
        assert_eq!(ScheduleHealth::classify(0.85), ScheduleHealth::SignificantDelay);
        assert_eq!(ScheduleHealth::classify(0.5), ScheduleHealth::CriticalDelay);
        assert_eq!(ScheduleHealth::classify(1.7), ScheduleHealth::OnTrack);
    }

    #[test]
    fn boundaries_resolve_upward() {
        assert_eq!(ScheduleHealth::classify(0.9), ScheduleHealth::MinorDelay);
        assert_eq!(ScheduleHealth::classify(0.8), ScheduleHealth::SignificantDelay);
        assert_eq!(CostHealth::classify(0.9), CostHealth::MinorOverrun);
        assert_eq!(CostHealth::classify(0.8), CostHealth::SignificantOverrun);
        assert_eq!(CostHealth::classify(0.79), CostHealth::CriticalOverrun);
    }

    #[test]
    fn cost_labels() {
        assert_eq!(CostHealth::classify(1.2).label(), "Under Budget");
        assert_eq!(CostHealth::classify(0.95).label(), "Minor Overrun");
        assert_eq!(CostHealth::classify(0.85).label(), "Significant Overrun");
        assert_eq!(CostHealth::classify(0.1).label(), "Critical Overrun");
    }

    #[test]
    fn serializes_as_label() {
        let json = serde_json::to_string(&ScheduleHealth::MinorDelay).unwrap();
        assert_eq!(json, "\"Minor Delay\"");
        assert_eq!(CostHealth::CriticalOverrun.to_string(), "Critical Overrun");
    }
}
