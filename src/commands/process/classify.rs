use std::sync::LazyLock;

use regex::Regex;

static LEARNING_OUTCOME_PHRASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)learning\s+outcome").expect("learning outcome phrase regex compiles")
});

static LOS_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^LOS\s+\d+").expect("LOS marker regex compiles"));

static ALL_CAPS_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z0-9\s\-:,\.&/()]+$").expect("all-caps line regex compiles")
});

static NUMBERED_SECTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(Section\s+\d+|\d+\.\d*|[A-Z]\.|[IVX]+\.)\s+")
        .expect("numbered section regex compiles")
});

pub(crate) fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Classifies a trimmed line as a structural heading. Rules are ordered;
/// the first match wins.
pub(crate) fn is_heading(line: &str) -> bool {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.len() < 3 || trimmed.len() > 120 {
        return false;
    }

    if LEARNING_OUTCOME_PHRASE.is_match(trimmed) {
        return true;
    }
    if LOS_MARKER.is_match(trimmed) {
        return true;
    }

    // All-caps title lines, e.g. "RISK AND RETURN OBJECTIVES". Single words
    // are too ambiguous (acronyms, table labels) and are rejected.
    if trimmed.len() < 80
        && ALL_CAPS_LINE.is_match(trimmed)
        && trimmed.split_whitespace().count() >= 2
    {
        return true;
    }

    NUMBERED_SECTION.is_match(trimmed)
}

/// Collects learning-outcome statements: lines following a "learning outcome"
/// trigger line that start with a known action-verb stem. Collection stops at
/// the next heading once at least one outcome has been gathered. The trigger
/// line itself is never collected. Capped at 8.
pub(crate) fn extract_learning_outcomes(text: &str, verbs: &[&str]) -> Vec<String> {
    let mut outcomes = Vec::new();
    let mut in_outcomes = false;

    for line in text.lines().map(str::trim) {
        if LEARNING_OUTCOME_PHRASE.is_match(line) {
            in_outcomes = true;
            continue;
        }
        if !in_outcomes {
            continue;
        }

        if starts_with_outcome_verb(line, verbs) {
            outcomes.push(line.to_string());
        } else if !outcomes.is_empty() && is_heading(line) {
            break;
        }
    }

    outcomes.truncate(8);
    outcomes
}

fn starts_with_outcome_verb(line: &str, verbs: &[&str]) -> bool {
    let lower = line.to_lowercase();
    verbs.iter().any(|verb| lower.starts_with(verb))
}

/// Case-insensitive substring scan against the key-term vocabulary. Results
/// keep the vocabulary's order and casing. Capped at 8.
pub(crate) fn extract_key_terms(text: &str, vocabulary: &[&str]) -> Vec<String> {
    let text_lower = text.to_lowercase();

    vocabulary
        .iter()
        .filter(|term| text_lower.contains(&term.to_lowercase()))
        .take(8)
        .map(|term| term.to_string())
        .collect()
}
