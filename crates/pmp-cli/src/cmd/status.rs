use super::load_project;
use crate::output::{print_json, print_table, yes_no};
use pmp_core::assessment;
use std::path::Path;

pub fn run(file: &Path, json: bool) -> anyhow::Result<()> {
    let state = load_project(file)?;
    let status = assessment::process_group_status(&state);

    if json {
        return print_json(&status);
    }

    let rows = status
        .values()
        .map(|v| {
            vec![
                v.process_group.clone(),
                yes_no(v.compliant).to_string(),
                v.missing_items.join(", "),
            ]
        })
        .collect();
    print_table(&["PROCESS GROUP", "COMPLIANT", "MISSING"], rows);
    Ok(())
}
