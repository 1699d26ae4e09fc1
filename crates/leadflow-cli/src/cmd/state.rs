use crate::output::{print_json, print_table};
use anyhow::Context;
use leadflow_core::{config::Config, lead::Lead, state::State};
use std::path::Path;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let state = State::load(root).context("failed to load state")?;
    let cfg = Config::load(root).context("failed to load config")?;
    let leads = Lead::list(root).unwrap_or_default();

    if json {
        #[derive(serde::Serialize)]
        struct StageCount<'a> {
            stage: &'a str,
            title: &'a str,
            count: usize,
        }

        #[derive(serde::Serialize)]
        struct StateOutput<'a> {
            project: &'a str,
            stages: Vec<StageCount<'a>>,
            lead_count: usize,
            last_event: Option<&'a leadflow_core::state::HistoryEntry>,
            history: &'a [leadflow_core::state::HistoryEntry],
        }

        let stages: Vec<StageCount> = cfg
            .stages
            .iter()
            .map(|s| StageCount {
                stage: &s.slug,
                title: &s.title,
                count: leads
                    .iter()
                    .filter(|l| !l.archived && l.stage == s.slug)
                    .count(),
            })
            .collect();

        let output = StateOutput {
            project: &state.project,
            stages,
            lead_count: leads.iter().filter(|l| !l.archived).count(),
            last_event: state.last_event(),
            history: &state.history,
        };
        return print_json(&output);
    }

    // -- Human-readable output ------------------------------------------------

    println!("Project: {}", state.project);

    let active = leads.iter().filter(|l| !l.archived).count();
    println!("Leads: {active}");

    if active == 0 {
        println!("\nNo leads yet. Run: leadflow lead add <slug> --name \"...\"");
        return Ok(());
    }

    println!();
    let rows: Vec<Vec<String>> = cfg
        .stages
        .iter()
        .map(|s| {
            let count = leads
                .iter()
                .filter(|l| !l.archived && l.stage == s.slug)
                .count();
            vec![s.slug.clone(), s.title.clone(), count.to_string()]
        })
        .collect();
    print_table(&["STAGE", "TITLE", "LEADS"], rows);

    if !state.history.is_empty() {
        println!("\nRecent activity:");
        for entry in state.history.iter().rev().take(10) {
            let detail = entry.detail.as_deref().unwrap_or("");
            println!("  {} {} {} {}", entry.timestamp, entry.lead, entry.event, detail);
        }
    }

    Ok(())
}
