use crate::output::{print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use leadflow_core::config::{Config, WarnLevel};
use std::path::Path;

// ---------------------------------------------------------------------------
// Subcommand types
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show the effective configuration
    Show,

    /// Validate the configuration and report warnings
    Validate,
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(root: &Path, subcmd: ConfigSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ConfigSubcommand::Show => show(root, json),
        ConfigSubcommand::Validate => validate(root, json),
    }
}

// ---------------------------------------------------------------------------
// show
// ---------------------------------------------------------------------------

fn show(root: &Path, json: bool) -> anyhow::Result<()> {
    let cfg = Config::load(root).context("failed to load config")?;

    if json {
        return print_json(&cfg);
    }

    println!("Project: {}", cfg.project.name);
    println!("\nStages:");
    let rows: Vec<Vec<String>> = cfg
        .stages
        .iter()
        .map(|s| {
            let t = cfg.scoring.thresholds_for(&s.slug);
            vec![
                s.slug.clone(),
                s.title.clone(),
                format!(
                    "{}/{}/{}",
                    t.medium_after_days, t.high_after_days, t.critical_after_days
                ),
                t.decay_per_day.to_string(),
            ]
        })
        .collect();
    print_table(&["STAGE", "TITLE", "THRESHOLDS (M/H/C)", "DECAY/DAY"], rows);
    Ok(())
}

// ---------------------------------------------------------------------------
// validate
// ---------------------------------------------------------------------------

fn validate(root: &Path, json: bool) -> anyhow::Result<()> {
    let cfg = Config::load(root).context("failed to load config")?;
    let warnings = cfg.validate();

    if json {
        return print_json(&warnings);
    }

    if warnings.is_empty() {
        println!("Configuration OK.");
        return Ok(());
    }

    for w in &warnings {
        let level = match w.level {
            WarnLevel::Warning => "warning",
            WarnLevel::Error => "error",
        };
        println!("{level}: {}", w.message);
    }

    if warnings.iter().any(|w| w.level == WarnLevel::Error) {
        anyhow::bail!("configuration has errors");
    }
    Ok(())
}
