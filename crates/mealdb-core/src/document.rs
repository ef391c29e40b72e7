//! Reader and writer for the line-prefixed meal record layout stored in the
//! index:
//!
//! ```text
//! Name: Teriyaki Chicken Casserole
//! Category: Chicken
//! Area: Japanese
//! Ingredients: soy sauce, water, brown sugar, ...
//! Instructions: Preheat oven to 350...
//! Total Ingredients: 9
//! ```
//!
//! Fields are located by line prefix, never by position. The instructions
//! block runs to the end of the text.

use std::fmt;

const NAME: &str = "Name:";
const CATEGORY: &str = "Category:";
const AREA: &str = "Area:";
const INGREDIENTS: &str = "Ingredients:";
const INSTRUCTIONS: &str = "Instructions:";
const TOTAL: &str = "Total Ingredients:";

pub const MISSING_INGREDIENTS: &str = "N/A";
pub const MISSING_INSTRUCTIONS: &str = "See details online.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MealDocument {
    pub name: String,
    pub category: Option<String>,
    pub area: Option<String>,
    pub ingredients: String,
    pub instructions: String,
}

fn field<'a>(lines: &[&'a str], prefix: &str) -> Option<&'a str> {
    lines.iter().find_map(|l| l.strip_prefix(prefix)).map(str::trim)
}

impl MealDocument {
    /// Parse a stored record. Returns `None` when the text does not start
    /// with a `Name:` line; callers should then show the raw text.
    pub fn parse(text: &str) -> Option<Self> {
        let lines: Vec<&str> = text.lines().collect();
        let first = lines.iter().find(|l| !l.trim().is_empty())?;
        let name = first.trim_start().strip_prefix(NAME)?.trim().to_string();

        let ingredients = field(&lines, INGREDIENTS)
            .filter(|s| !s.is_empty())
            .unwrap_or(MISSING_INGREDIENTS)
            .to_string();
        let instructions = lines
            .iter()
            .position(|l| l.starts_with(INSTRUCTIONS))
            .map(|start| {
                let block = lines[start..].join("\n");
                block.replacen(INSTRUCTIONS, "", 1).trim().to_string()
            })
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| MISSING_INSTRUCTIONS.to_string());

        Some(Self {
            name,
            category: field(&lines, CATEGORY).map(str::to_string),
            area: field(&lines, AREA).map(str::to_string),
            ingredients,
            instructions,
        })
    }

    /// Comma-separated ingredient list, empty when unknown.
    pub fn ingredient_list(&self) -> Vec<&str> {
        if self.ingredients == MISSING_INGREDIENTS {
            return Vec::new();
        }
        self.ingredients.split(',').map(str::trim).filter(|s| !s.is_empty()).collect()
    }
}

impl fmt::Display for MealDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{NAME} {}", self.name)?;
        writeln!(f, "{CATEGORY} {}", self.category.as_deref().unwrap_or("Unknown"))?;
        writeln!(f, "{AREA} {}", self.area.as_deref().unwrap_or("Unknown"))?;
        writeln!(f, "{INGREDIENTS} {}", self.ingredients)?;
        writeln!(f, "{INSTRUCTIONS} {}", self.instructions)?;
        writeln!(f, "{TOTAL} {}", self.ingredient_list().len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECORD: &str = "Name: Kafteji\nCategory: Vegetarian\nArea: Tunisian\nIngredients: Potatoes, Olive Oil, Eggs\nInstructions: Peel potatoes.\nFry everything.\nTotal Ingredients: 3\n";

    #[test]
    fn parses_by_prefix() {
        let doc = MealDocument::parse(RECORD).expect("conforming record");
        assert_eq!(doc.name, "Kafteji");
        assert_eq!(doc.area.as_deref(), Some("Tunisian"));
        assert_eq!(doc.ingredient_list(), vec!["Potatoes", "Olive Oil", "Eggs"]);
        assert!(doc.instructions.starts_with("Peel potatoes.\nFry everything."));
        // the instructions block runs to end of text
        assert!(doc.instructions.ends_with("Total Ingredients: 3"));
    }

    #[test]
    fn missing_sections_use_placeholders() {
        let doc = MealDocument::parse("Name: Toast\nCategory: Breakfast").expect("conforming");
        assert_eq!(doc.ingredients, MISSING_INGREDIENTS);
        assert_eq!(doc.instructions, MISSING_INSTRUCTIONS);
        assert!(doc.ingredient_list().is_empty());
    }

    #[test]
    fn non_conforming_text_is_rejected() {
        assert!(MealDocument::parse("just some free text\nIngredients: salt").is_none());
        assert!(MealDocument::parse("").is_none());
    }

    #[test]
    fn rendered_layout_parses_back() {
        let doc = MealDocument {
            name: "Pancakes".into(),
            category: Some("Dessert".into()),
            area: None,
            ingredients: "Flour, Eggs, Milk".into(),
            instructions: "Whisk and fry.".into(),
        };
        let text = doc.to_string();
        assert!(text.contains("Area: Unknown\n"));
        assert!(text.ends_with("Total Ingredients: 3\n"));
        let back = MealDocument::parse(&text).expect("parse rendered");
        assert_eq!(back.name, "Pancakes");
        assert_eq!(back.ingredients, "Flour, Eggs, Milk");
    }
}
