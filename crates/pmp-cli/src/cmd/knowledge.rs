use super::load_project;
use crate::output::{print_json, print_table};
use pmp_core::assessment;
use pmp_core::knowledge_area::KnowledgeAreaAssessment;
use std::path::Path;

pub fn run(file: &Path, area: Option<&str>, json: bool) -> anyhow::Result<()> {
    let state = load_project(file)?;

    if let Some(name) = area {
        let assessment = assessment::knowledge_area_named(&state, name)?;
        if json {
            return print_json(&assessment);
        }
        print_table(&["AREA", "SCORE", "MISSING FIELDS"], vec![row(name, &assessment)]);
        if !assessment.indicators.is_empty() {
            println!();
            let rows = assessment
                .indicators
                .iter()
                .map(|(k, v)| vec![k.to_string(), v.to_string()])
                .collect();
            print_table(&["INDICATOR", "STATUS"], rows);
        }
        return Ok(());
    }

    let report = assessment::knowledge_area_report(&state);
    if json {
        return print_json(&report);
    }
    let rows = report
        .iter()
        .map(|(area, a)| row(area.as_str(), a))
        .collect();
    print_table(&["AREA", "SCORE", "MISSING FIELDS"], rows);
    Ok(())
}

fn row(area: &str, a: &KnowledgeAreaAssessment) -> Vec<String> {
    vec![
        area.to_lowercase(),
        format!("{}%", a.score),
        a.missing_fields.join(", "),
    ]
}
