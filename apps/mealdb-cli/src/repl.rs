//! Interactive search loop.

use std::io::{BufRead, Write};
use std::time::Duration;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::error;

use mealdb_core::traits::{Embedder, VectorIndex};
use mealdb_retrieval::MealRetriever;

use crate::display::render_outcome;

pub const PROMPT: &str = "Search: ";
pub const GOODBYE: &str = "👋 Goodbye! Happy cooking!";

pub fn is_exit_command(input: &str) -> bool {
    matches!(input.trim().to_lowercase().as_str(), "exit" | "quit" | "q")
}

fn spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        pb.set_style(style);
    }
    pb.set_message("Searching...");
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Run one query and render whatever came back. Failures are rendered too,
/// so a broken backend never ends the session.
pub fn answer<E, V>(retriever: &MealRetriever<E, V>, query: &str) -> String
where
    E: Embedder,
    V: VectorIndex,
{
    let pb = spinner();
    let outcome = retriever.search(query);
    pb.finish_and_clear();
    match outcome {
        Ok(outcome) => render_outcome(query, &outcome),
        Err(e) => {
            error!(error = %e, query, "search failed");
            format!("❌ Search failed: {e}")
        }
    }
}

/// Prompt, read a line, answer it, repeat until an exit word or end of input.
pub fn run<E, V, R, W>(retriever: &MealRetriever<E, V>, mut input: R, mut out: W) -> Result<()>
where
    E: Embedder,
    V: VectorIndex,
    R: BufRead,
    W: Write,
{
    loop {
        write!(out, "{PROMPT}")?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(out, "\n{GOODBYE}")?;
            return Ok(());
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if is_exit_command(line) {
            writeln!(out, "{GOODBYE}")?;
            return Ok(());
        }
        writeln!(out, "{}", answer(retriever, line))?;
    }
}
