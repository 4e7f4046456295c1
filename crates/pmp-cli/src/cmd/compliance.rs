use super::load_project;
use crate::output::{figure, print_json, print_table, yes_no};
use pmp_core::assessment::{self, ComplianceReport};
use std::path::Path;

pub fn run(file: &Path, phase: &str, json: bool) -> anyhow::Result<()> {
    let state = load_project(file)?;
    let report = assessment::compliance_report(&state, phase)?;

    if json {
        return print_json(&report);
    }
    print_report(&report)
}

fn print_report(report: &ComplianceReport) -> anyhow::Result<()> {
    let v = &report.validation;
    let h = &report.health_metrics;

    println!("Process group:   {}", v.process_group);
    println!("Compliant:       {}", yes_no(v.compliant));
    println!("Score:           {}/100", report.compliance_score);
    println!("Schedule health: {} (SPI {})", h.schedule_health, figure(h.evm.spi));
    println!("Cost health:     {} (CPI {})", h.cost_health, figure(h.evm.cpi));
    println!("Risk exposure:   {:.2}", h.risk_exposure);
    println!(
        "Quality index:   {}",
        figure(h.quality_index.as_ref().map(|q| q.overall_quality))
    );

    if !v.missing_items.is_empty() {
        println!();
        println!("Missing:");
        for item in &v.missing_items {
            println!("  - {item}");
        }
    }

    if !report.deductions.is_empty() {
        println!();
        let rows = report
            .deductions
            .iter()
            .map(|d| vec![format!("-{}", d.points), d.description.clone()])
            .collect();
        print_table(&["POINTS", "REASON"], rows);
    }

    if !report.skipped.is_empty() {
        let names: Vec<String> = report
            .skipped
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect();
        println!();
        println!("Not scored (insufficient data): {}", names.join(", "));
    }
    Ok(())
}
