use anyhow::Context;
use leadflow_core::workspace;
use std::path::Path;

pub fn run(root: &Path) -> anyhow::Result<()> {
    let project_name = workspace::project_name_from_root(root);

    println!("Initializing leadflow in: {}", root.display());

    let summary = workspace::init(root, &project_name).context("failed to initialize workspace")?;

    let report = |created: bool, file: &str| {
        if created {
            println!("  created: {file}");
        } else {
            println!("  exists:  {file}");
        }
    };
    report(summary.created_config, ".leadflow/config.yaml");
    report(summary.created_state, ".leadflow/state.yaml");

    println!("\nleadflow initialized.");
    println!("Next: leadflow lead add <slug> --name \"...\"");

    Ok(())
}
