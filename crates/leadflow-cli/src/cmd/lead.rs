use crate::output::{print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use leadflow_core::config::Config;
use leadflow_core::lead::Lead;
use leadflow_core::note::NoteFlag;
use leadflow_core::state::{PipelineEvent, State};
use leadflow_core::types::{LeadSource, Priority};
use std::path::Path;

// ---------------------------------------------------------------------------
// Subcommand types
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum LeadSubcommand {
    /// Capture a new lead into the first funnel stage
    Add {
        /// Lead slug
        slug: String,
        /// Display name
        #[arg(long)]
        name: String,
        /// Contact phone
        #[arg(long)]
        phone: Option<String>,
        /// Contact email
        #[arg(long)]
        email: Option<String>,
        /// Where the lead came from (landing, messenger, referral, other)
        #[arg(long, default_value = "other")]
        source: String,
        /// Priority classification (low, medium, high, urgent)
        #[arg(long, default_value = "medium")]
        priority: String,
    },

    /// List all leads
    List,

    /// Show full lead detail
    Show { slug: String },

    /// Move a lead to another pipeline stage
    Move {
        slug: String,
        /// Target stage slug
        stage: String,
    },

    /// Reclassify a lead's priority
    SetPriority {
        slug: String,
        /// New priority (low, medium, high, urgent)
        priority: String,
    },

    /// Attach a note to a lead
    Note {
        slug: String,
        /// Note body
        body: String,
        /// Author name
        #[arg(long)]
        author: Option<String>,
        /// Flag (follow-up, docs, decision, fyi)
        #[arg(long)]
        flag: Option<String>,
    },

    /// Remove a resolved note from a lead
    ResolveNote {
        slug: String,
        /// Note ID (e.g. N1)
        id: String,
    },

    /// Archive a lead (soft delete)
    Archive { slug: String },
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(root: &Path, subcmd: LeadSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        LeadSubcommand::Add {
            slug,
            name,
            phone,
            email,
            source,
            priority,
        } => add(root, &slug, &name, phone, email, &source, &priority, json),
        LeadSubcommand::List => list(root, json),
        LeadSubcommand::Show { slug } => show(root, &slug, json),
        LeadSubcommand::Move { slug, stage } => move_lead(root, &slug, &stage, json),
        LeadSubcommand::SetPriority { slug, priority } => set_priority(root, &slug, &priority),
        LeadSubcommand::Note {
            slug,
            body,
            author,
            flag,
        } => add_note(root, &slug, &body, author, flag),
        LeadSubcommand::ResolveNote { slug, id } => resolve_note(root, &slug, &id),
        LeadSubcommand::Archive { slug } => archive(root, &slug),
    }
}

/// Best-effort activity recording: a failed log write never fails the command.
fn record(root: &Path, lead: &str, event: PipelineEvent, detail: Option<String>) {
    if let Ok(mut state) = State::load(root) {
        state.record(lead, event, detail);
        let _ = state.save(root);
    }
}

// ---------------------------------------------------------------------------
// add
// ---------------------------------------------------------------------------

#[allow(clippy::too_many_arguments)]
fn add(
    root: &Path,
    slug: &str,
    name: &str,
    phone: Option<String>,
    email: Option<String>,
    source: &str,
    priority: &str,
    json: bool,
) -> anyhow::Result<()> {
    let cfg = Config::load(root).context("failed to load config")?;
    let source: LeadSource = source.parse()?;
    let priority: Priority = priority.parse()?;

    let mut lead = Lead::create(root, slug, name, &cfg)?;
    lead.set_source(source);
    lead.set_priority(priority);
    if phone.is_some() || email.is_some() {
        lead.set_contact(phone, email);
    }
    lead.save(root)?;

    record(root, &lead.slug, PipelineEvent::Created, None);

    if json {
        return print_json(&lead);
    }
    println!(
        "Lead added: {} ({}) in stage '{}'",
        lead.slug, lead.name, lead.stage
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// list / show
// ---------------------------------------------------------------------------

fn list(root: &Path, json: bool) -> anyhow::Result<()> {
    let leads = Lead::list(root)?;

    if json {
        return print_json(&leads);
    }

    if leads.is_empty() {
        println!("No leads yet.");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = leads
        .iter()
        .map(|l| {
            vec![
                l.slug.clone(),
                l.name.clone(),
                l.stage.clone(),
                l.priority.to_string(),
                if l.archived { "archived".to_string() } else { String::new() },
            ]
        })
        .collect();
    print_table(&["SLUG", "NAME", "STAGE", "PRIORITY", "STATUS"], rows);
    Ok(())
}

fn show(root: &Path, slug: &str, json: bool) -> anyhow::Result<()> {
    let lead = Lead::load(root, slug)?;

    if json {
        return print_json(&lead);
    }

    println!("{} — {}", lead.slug, lead.name);
    println!("  stage:    {}", lead.stage);
    println!("  priority: {}", lead.priority);
    println!("  source:   {}", lead.source);
    if let Some(ref phone) = lead.phone {
        println!("  phone:    {phone}");
    }
    if let Some(ref email) = lead.email {
        println!("  email:    {email}");
    }
    if let Some(entered) = lead.stage_entered {
        println!("  entered:  {entered}");
    }
    println!("  created:  {}", lead.created_at);
    if lead.archived {
        println!("  archived: yes");
    }

    if !lead.notes.is_empty() {
        println!("\nNotes:");
        for note in &lead.notes {
            let flag = note
                .flag
                .map(|f| format!(" [{f}]"))
                .unwrap_or_default();
            println!("  {}{} {}", note.id, flag, note.body);
        }
    }

    if !lead.stage_history.is_empty() {
        println!("\nStage history:");
        for t in &lead.stage_history {
            match t.exited {
                Some(exited) => println!("  {} ({} -> {})", t.stage, t.entered, exited),
                None => println!("  {} (since {})", t.stage, t.entered),
            }
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// move / set-priority / note / archive
// ---------------------------------------------------------------------------

fn move_lead(root: &Path, slug: &str, stage: &str, json: bool) -> anyhow::Result<()> {
    let cfg = Config::load(root).context("failed to load config")?;
    let mut lead = Lead::load(root, slug)?;
    let from = lead.stage.clone();

    lead.move_to_stage(stage, &cfg)?;
    lead.save(root)?;

    record(
        root,
        &lead.slug,
        PipelineEvent::Moved,
        Some(format!("{} -> {}", from, lead.stage)),
    );

    if json {
        return print_json(&lead);
    }
    println!("Moved {} : {} -> {}", lead.slug, from, lead.stage);
    Ok(())
}

fn set_priority(root: &Path, slug: &str, priority: &str) -> anyhow::Result<()> {
    let priority: Priority = priority.parse()?;
    let mut lead = Lead::load(root, slug)?;
    lead.set_priority(priority);
    lead.save(root)?;

    record(
        root,
        &lead.slug,
        PipelineEvent::PriorityChanged,
        Some(priority.to_string()),
    );

    println!("Priority set: {} = {}", lead.slug, lead.priority);
    Ok(())
}

fn add_note(
    root: &Path,
    slug: &str,
    body: &str,
    author: Option<String>,
    flag: Option<String>,
) -> anyhow::Result<()> {
    let flag = flag.as_deref().map(str::parse::<NoteFlag>).transpose()?;

    let mut lead = Lead::load(root, slug)?;
    let id = lead.add_note(body, flag, author);
    lead.save(root)?;

    record(root, &lead.slug, PipelineEvent::NoteAdded, Some(id.clone()));

    println!("Note {id} added to {}", lead.slug);
    Ok(())
}

fn resolve_note(root: &Path, slug: &str, id: &str) -> anyhow::Result<()> {
    let mut lead = Lead::load(root, slug)?;
    lead.resolve_note(id)?;
    lead.save(root)?;

    println!("Note {id} resolved on {}", lead.slug);
    Ok(())
}

fn archive(root: &Path, slug: &str) -> anyhow::Result<()> {
    let mut lead = Lead::load(root, slug)?;
    lead.archive();
    lead.save(root)?;

    record(root, &lead.slug, PipelineEvent::Archived, None);

    println!("Archived: {}", lead.slug);
    Ok(())
}
