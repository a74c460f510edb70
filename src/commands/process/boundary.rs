use std::sync::LazyLock;

use regex::Regex;

use super::extract::Page;

/// Pages either side of a candidate that contribute to its score.
const WINDOW_RADIUS: usize = 1;
/// Minimum gap between a resolved boundary and the next search start.
const SEARCH_OFFSET: usize = 5;

static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\W+").expect("non-word split regex compiles"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Boundary {
    pub page_index: usize,
    pub resolution: Resolution,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Resolution {
    /// First reading always starts at page 0.
    Anchor,
    /// Windowed search found enough of the title's signal words.
    Matched { score: usize, signal_words: usize },
    /// Signal too weak or absent; position chosen by even division.
    EvenSplit,
}

/// Locates the 0-based start page of each expected reading within a volume.
///
/// A left-to-right greedy scan: each title from the second onward is searched
/// for in a candidate range past the previous boundary, scoring a 3-page
/// window by how many distinct signal words it contains. Earlier pages win
/// score ties (strict greater-than comparison; documented contract). Earlier
/// boundaries are never revisited, so a poor early match can degrade later
/// searches; that is an accepted property of the algorithm.
///
/// The output is always strictly increasing and the same length as `titles`,
/// with the first element 0. Fallback positions are clamped forward where the
/// even-division arithmetic would otherwise regress.
pub(crate) fn detect_reading_boundaries(
    pages: &[Page],
    titles: &[String],
    stop_words: &[&str],
) -> Vec<Boundary> {
    let mut boundaries = vec![Boundary {
        page_index: 0,
        resolution: Resolution::Anchor,
    }];
    if titles.len() <= 1 {
        return boundaries;
    }

    let page_count = pages.len();
    let mut search_from = 0_usize;

    for (index, title) in titles.iter().enumerate().skip(1) {
        let words = signal_words(title, stop_words);
        let floor = boundaries
            .last()
            .map(|boundary| boundary.page_index + 1)
            .unwrap_or(0);

        let boundary = if words.is_empty() {
            let position = (index * page_count) / titles.len();
            Boundary {
                page_index: position.max(floor),
                resolution: Resolution::EvenSplit,
            }
        } else {
            match best_window(pages, search_from, &words) {
                Some((page_index, score)) if score >= accept_threshold(words.len()) => Boundary {
                    page_index,
                    resolution: Resolution::Matched {
                        score,
                        signal_words: words.len(),
                    },
                },
                _ => {
                    // Divide the remaining span evenly among the readings
                    // still unplaced, this one included.
                    let unplaced = titles.len() - index;
                    let span = page_count.saturating_sub(search_from);
                    let position = search_from + span / (unplaced + 1);
                    Boundary {
                        page_index: position.max(floor),
                        resolution: Resolution::EvenSplit,
                    }
                }
            }
        };

        search_from = boundary.page_index + 1;
        boundaries.push(boundary);
    }

    boundaries
}

/// Title tokens that lexically fingerprint a reading's start page: lowercase,
/// at least five characters, not a stop word, deduplicated in order.
pub(crate) fn signal_words(title: &str, stop_words: &[&str]) -> Vec<String> {
    let lower = title.to_lowercase();
    let mut words: Vec<String> = Vec::new();

    for token in NON_WORD.split(&lower) {
        if token.chars().count() < 5 {
            continue;
        }
        if stop_words.contains(&token) {
            continue;
        }
        if words.iter().any(|word| word.as_str() == token) {
            continue;
        }
        words.push(token.to_string());
    }

    words
}

fn accept_threshold(signal_word_count: usize) -> usize {
    (signal_word_count / 2).max(1)
}

/// Scans candidate start pages and returns the earliest maximum-scoring one.
/// The candidate range starts a few pages past the previous boundary and
/// never reaches into the final 10% of the volume.
fn best_window(pages: &[Page], search_from: usize, words: &[String]) -> Option<(usize, usize)> {
    let page_count = pages.len();
    let first_candidate = search_from + SEARCH_OFFSET;
    let last_candidate = first_candidate.max(page_count.saturating_sub(page_count / 10));

    let mut best: Option<(usize, usize)> = None;
    for candidate in first_candidate..=last_candidate {
        let score = window_score(pages, candidate, words);
        if best.map(|(_, best_score)| score > best_score).unwrap_or(true) {
            best = Some((candidate, score));
        }
    }

    best
}

fn window_score(pages: &[Page], center: usize, words: &[String]) -> usize {
    let start = center.saturating_sub(WINDOW_RADIUS);
    if start >= pages.len() {
        return 0;
    }
    let end = (center + WINDOW_RADIUS).min(pages.len() - 1);

    let window = pages[start..=end]
        .iter()
        .map(|page| page.text.to_lowercase())
        .collect::<Vec<String>>()
        .join("\n");

    words.iter().filter(|word| window.contains(word.as_str())).count()
}
