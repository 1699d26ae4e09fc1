use crate::output::{print_json, print_table};
use chrono::Utc;
use leadflow_core::board::{self, Column};
use std::path::Path;

pub fn run(root: &Path, stage: Option<&str>, json: bool) -> anyhow::Result<()> {
    // One evaluation instant for the whole render.
    let now = Utc::now();

    match stage {
        Some(slug) => {
            let column = board::build_column(root, slug, now)?;
            if json {
                return print_json(&column);
            }
            print_column(&column);
        }
        None => {
            let board = board::build_board(root, now)?;
            if json {
                return print_json(&board);
            }
            for column in &board.columns {
                print_column(column);
                println!();
            }
        }
    }

    Ok(())
}

fn print_column(column: &Column) {
    println!("{} ({} leads)", column.title, column.cards.len());

    if column.cards.is_empty() {
        println!("  (empty)");
        return;
    }

    let rows: Vec<Vec<String>> = column
        .cards
        .iter()
        .map(|c| {
            vec![
                c.slug.clone(),
                c.name.clone(),
                c.priority.to_string(),
                format!("{}d", c.score.days_in_stage),
                c.score.score.to_string(),
                c.score.label.to_string(),
            ]
        })
        .collect();
    print_table(&["SLUG", "NAME", "PRIORITY", "IN STAGE", "SCORE", "STATUS"], rows);
}
