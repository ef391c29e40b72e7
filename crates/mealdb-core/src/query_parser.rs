//! Natural-language query parser.
//!
//! Turns free text such as `"3 vegetarian meals without chicken"` into a
//! cleaned semantic query, structured filters, a result count and an intent.
//! Extraction runs as an ordered list of steps over one working string: each
//! step erases what it consumed, so later steps never see it.

use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;
use tracing::debug;

use crate::config::QueryConfig;
use crate::types::{FilterSet, Intent, ParsedQuery};

static EXCLUSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bwithout\s+([^.,;!?]+?)\s*(?:[.,;!?]|\bless\s+than\b|\bshow\s+(?:me\s+)?\d|\bone\s+results?\b|$)")
        .expect("exclusion regex is valid")
});
static MAX_INGREDIENTS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bless\s+than\s+(\d+)\s+ingredients?\b").expect("max-ingredients regex is valid")
});
static ONE_RESULT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bone\s+results?\b(?:\s+only\b)?").expect("one-result regex is valid")
});
static SHOW_N_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bshow\s+(?:me\s+)?(\d+)\b").expect("show-n regex is valid"));
static LEADING_COUNT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(\d+)\s+(?:\S+\s+){0,3}?(results?|meals?|recipes?)\b").expect("leading-count regex is valid")
});

/// Working state threaded through the extraction steps.
#[derive(Debug)]
struct Working {
    text: String,
    filters: FilterSet,
    limit: Option<usize>,
}

type Extraction = fn(&mut Working) -> bool;

/// Order matters: the exclusion phrase is consumed before the ingredient cap,
/// and both before the count rules look for numbers.
const EXTRACTIONS: &[(&str, Extraction)] = &[
    ("exclude_ingredient", extract_exclusion),
    ("max_ingredients", extract_max_ingredients),
    ("result_count", extract_result_count),
];

struct CountMatch {
    limit: usize,
    erase: Vec<Range<usize>>,
}

type CountRule = fn(&str) -> Option<CountMatch>;

/// Priority-ordered; the first rule that matches wins.
const COUNT_RULES: &[(&str, CountRule)] = &[
    ("one_result", one_result),
    ("show_n", show_n),
    ("leading_count", leading_count),
];

#[derive(Debug, Clone)]
pub struct QueryParser {
    greetings: Vec<String>,
    default_limit: usize,
}

impl QueryParser {
    pub fn new(config: &QueryConfig) -> Self {
        let greetings = config.greetings.iter().map(|g| normalize(g)).collect();
        Self { greetings, default_limit: config.default_limit.max(1) }
    }

    /// Parse a raw query. Never fails; the worst case is an empty cleaned
    /// query with the default limit.
    pub fn parse(&self, raw: &str) -> ParsedQuery {
        if self.is_greeting(raw) {
            return ParsedQuery {
                cleaned_text: String::new(),
                filters: FilterSet::default(),
                limit: self.default_limit,
                intent: Intent::Greeting,
            };
        }

        let mut working = Working { text: raw.to_string(), filters: FilterSet::default(), limit: None };
        for (name, step) in EXTRACTIONS {
            if step(&mut working) {
                debug!(step = name, remaining = %working.text, "query extraction matched");
            }
        }

        let cleaned_text = normalize_spacing(&working.text);
        let intent = if cleaned_text.is_empty() { Intent::Empty } else { Intent::Search };
        let parsed = ParsedQuery {
            cleaned_text,
            filters: working.filters,
            limit: working.limit.unwrap_or(self.default_limit),
            intent,
        };
        debug!(?parsed, "parsed query");
        parsed
    }

    fn is_greeting(&self, raw: &str) -> bool {
        let candidate = normalize(raw);
        self.greetings.iter().any(|g| *g == candidate)
    }
}

impl Default for QueryParser {
    fn default() -> Self {
        Self::new(&QueryConfig::default())
    }
}

fn extract_exclusion(w: &mut Working) -> bool {
    let Some(caps) = EXCLUSION_RE.captures(&w.text) else { return false };
    let (Some(whole), Some(phrase)) = (caps.get(0), caps.get(1)) else { return false };
    let value = phrase.as_str().trim();
    if value.is_empty() {
        return false;
    }
    w.filters.exclude_ingredient = Some(value.to_string());
    let span = whole.start()..phrase.end();
    erase(&mut w.text, vec![span]);
    true
}

fn extract_max_ingredients(w: &mut Working) -> bool {
    let Some(caps) = MAX_INGREDIENTS_RE.captures(&w.text) else { return false };
    let (Some(whole), Some(n)) = (caps.get(0), caps.get(1)) else { return false };
    let Ok(max) = n.as_str().parse::<u32>() else { return false };
    w.filters.max_ingredients = Some(max);
    let span = whole.range();
    erase(&mut w.text, vec![span]);
    true
}

fn extract_result_count(w: &mut Working) -> bool {
    for (name, rule) in COUNT_RULES {
        if let Some(found) = rule(&w.text) {
            debug!(rule = name, limit = found.limit, "result count rule fired");
            w.limit = Some(found.limit);
            erase(&mut w.text, found.erase);
            return true;
        }
    }
    false
}

fn one_result(text: &str) -> Option<CountMatch> {
    let m = ONE_RESULT_RE.find(text)?;
    Some(CountMatch { limit: 1, erase: vec![m.range()] })
}

fn show_n(text: &str) -> Option<CountMatch> {
    let caps = SHOW_N_RE.captures(text)?;
    let limit = positive_count(caps.get(1)?.as_str())?;
    Some(CountMatch { limit, erase: vec![caps.get(0)?.range()] })
}

/// A leading number only counts when a result/meal/recipe keyword follows
/// it, so dish names containing numbers are left alone. Descriptive words in
/// between survive; only the number and a `result(s)` keyword are erased.
fn leading_count(text: &str) -> Option<CountMatch> {
    let caps = LEADING_COUNT_RE.captures(text)?;
    let number = caps.get(1)?;
    let keyword = caps.get(2)?;
    let limit = positive_count(number.as_str())?;
    let mut erase = vec![number.range()];
    if keyword.as_str().to_ascii_lowercase().starts_with("result") {
        erase.push(keyword.range());
    }
    Some(CountMatch { limit, erase })
}

fn positive_count(digits: &str) -> Option<usize> {
    digits.parse::<usize>().ok().filter(|n| *n > 0)
}

/// Replace each span with a single space, right to left so earlier offsets stay valid.
fn erase(text: &mut String, mut spans: Vec<Range<usize>>) {
    spans.sort_by_key(|r| std::cmp::Reverse(r.start));
    for span in spans {
        text.replace_range(span, " ");
    }
}

fn normalize(s: &str) -> String {
    normalize_spacing(s).to_lowercase()
}

fn normalize_spacing(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
