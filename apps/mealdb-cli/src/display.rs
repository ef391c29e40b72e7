//! Text rendering for search outcomes.

use mealdb_core::document::MealDocument;
use mealdb_core::types::{RankedMeal, RetrievalOutcome};

pub const WIDTH: usize = 80;

pub const HELP: &str = "Hello! Describe a dish and I'll find recipes for it.\n\
Try 'spicy chicken', '3 vegetarian meals without mushrooms',\n\
'pasta less than 6 ingredients' or 'show 2 desserts'.\n\
Type 'exit' to quit.";
pub const EMPTY_QUERY: &str = "Please enter a food-related term to search for (e.g. 'chicken curry').";
pub const NO_MATCH: &str = "No close match found. Try a different dish, ingredient or cuisine.";
pub const NOTHING_SURVIVED: &str = "No meals matched your criteria. Try relaxing the ingredient filters.";

/// Greedy word wrap counted in chars; words longer than `width` get a line
/// of their own.
pub fn wrap(text: &str, width: usize) -> String {
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut line = String::new();
        let mut used = 0;
        for word in paragraph.split_whitespace() {
            let chars = word.chars().count();
            if used > 0 && used + 1 + chars > width {
                lines.push(std::mem::take(&mut line));
                used = 0;
            }
            if used > 0 { line.push(' '); used += 1; }
            line.push_str(word);
            used += chars;
        }
        lines.push(line);
    }
    lines.join("\n")
}

pub fn render_meal(meal: &RankedMeal) -> String {
    let bar = "=".repeat(50);
    let meta = &meal.hit.candidate.metadata;
    let mut out = String::new();
    out.push_str(&format!("\n{bar}\nRESULT #{}: {}\n{bar}\n", meal.rank, meta.meal_name));
    out.push_str(&format!("Category: {} | Area: {}\n", meta.category, meta.area));
    out.push_str(&format!("Ingredients Count: {}\n", meta.ingredient_count));
    out.push_str(&format!("Similarity: {:.2} ({} confidence)\n", meal.hit.similarity, meal.hit.tier));
    out.push_str(&"-".repeat(50));
    out.push('\n');

    match MealDocument::parse(&meal.hit.candidate.document) {
        Some(doc) => {
            out.push_str(&format!("\n📝 INGREDIENTS:\n{}\n", wrap(&doc.ingredients, WIDTH)));
            out.push_str(&format!("\n🍳 INSTRUCTIONS:\n{}\n", wrap(&doc.instructions, WIDTH)));
        }
        None => {
            tracing::warn!(id = meal.hit.id(), "document does not follow the record layout; showing raw text");
            out.push_str(&format!("\n📄 RAW DETAILS:\n{}\n", meal.hit.candidate.document));
        }
    }
    out.push_str(&format!("\n{bar}\n"));
    out
}

pub fn render_outcome(query: &str, outcome: &RetrievalOutcome) -> String {
    match outcome {
        RetrievalOutcome::Greeting => HELP.to_string(),
        RetrievalOutcome::EmptyQuery => EMPTY_QUERY.to_string(),
        RetrievalOutcome::LowConfidence | RetrievalOutcome::NoMatch => NO_MATCH.to_string(),
        RetrievalOutcome::Success(results) if results.is_empty() => NOTHING_SURVIVED.to_string(),
        RetrievalOutcome::Success(results) => {
            let mut out = format!("\nFound {} relevant recipes for '{}':\n", results.len(), query.trim());
            for meal in results { out.push_str(&render_meal(meal)); }
            out
        }
    }
}
