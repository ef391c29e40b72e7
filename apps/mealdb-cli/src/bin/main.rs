use std::io;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use mealdb_cli::{display, repl};
use mealdb_core::config::Config;
use mealdb_embed::get_default_embedder;
use mealdb_retrieval::MealRetriever;
use mealdb_vector::LanceMealIndex;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let settings = Config::load()?.settings()?;

    let embedder = get_default_embedder(&settings.embedding, &settings.model_path())
        .with_context(|| format!("loading embedding model from {}", settings.model_path().display()))?;
    let index = LanceMealIndex::open(&settings.lancedb_path(), &settings.data.table).with_context(|| {
        format!(
            "opening table '{}' in {}; has the meal collection been ingested?",
            settings.data.table,
            settings.lancedb_path().display()
        )
    })?;
    info!(table = index.table_name(), "meal index ready");

    let retriever = MealRetriever::new(embedder, index, &settings);

    let args: Vec<String> = std::env::args().skip(1).collect();
    if !args.is_empty() {
        let query = args.join(" ");
        println!("{}", repl::answer(&retriever, &query));
        return Ok(());
    }

    ctrlc::set_handler(|| {
        println!("\n{}", repl::GOODBYE);
        std::process::exit(0);
    })
    .context("installing Ctrl-C handler")?;

    println!("🍲 Meal Search\n==============");
    println!("{}\n", display::HELP);
    repl::run(&retriever, io::stdin().lock(), io::stdout())
}
