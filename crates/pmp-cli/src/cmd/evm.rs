use super::load_project;
use crate::output::{figure, print_json, print_table};
use pmp_core::assessment;
use pmp_core::project::Budget;
use std::path::Path;

pub fn run(file: &Path, json: bool) -> anyhow::Result<()> {
    let state = load_project(file)?;
    // A whole project record carries its figures under `budget`.
    let budget = if state.lookup("budget").is_present() {
        state.budget()?
    } else {
        Budget::from_value(state.as_value(), "budget")?
    };
    let report = assessment::evm_assessment(&budget);

    if json {
        return print_json(&report);
    }

    let e = &report.evm;
    let rows = vec![
        vec!["PV".into(), figure(Some(e.pv))],
        vec!["EV".into(), figure(Some(e.ev))],
        vec!["AC".into(), figure(Some(e.ac))],
        vec!["BAC".into(), figure(Some(e.bac))],
        vec!["SV".into(), figure(Some(e.sv))],
        vec!["CV".into(), figure(Some(e.cv))],
        vec!["SPI".into(), figure(e.spi)],
        vec!["CPI".into(), figure(e.cpi)],
        vec!["EAC".into(), figure(e.eac)],
        vec!["ETC".into(), figure(e.etc)],
        vec!["VAC".into(), figure(e.vac)],
    ];
    print_table(&["METRIC", "VALUE"], rows);
    println!();
    println!("Schedule health: {}", report.schedule_health);
    println!("Cost health:     {}", report.cost_health);
    Ok(())
}
