use std::collections::HashMap;

use crate::model::{Curriculum, ReadingMeta, TopicMeta};

use super::boundary::{Resolution, detect_reading_boundaries, signal_words};
use super::chunk::split_into_chunks;
use super::classify::{count_words, extract_key_terms, extract_learning_outcomes, is_heading};
use super::curriculum::apply_stage_updates;
use super::extract::Page;
use super::render::{escape_html, text_to_html};
use super::stages::{
    ReadingContext, build_stages, estimate_minutes, sanitize_reading_id, segment_text, stage_id,
    stage_title,
};
use super::vocab;

fn words(prefix: &str, count: usize) -> String {
    (0..count)
        .map(|index| format!("{prefix}{index}"))
        .collect::<Vec<String>>()
        .join(" ")
}

fn filler_pages(count: usize) -> Vec<Page> {
    (0..count)
        .map(|index| Page {
            number: index + 1,
            text: format!("lorem ipsum dolor sit amet sheet {index}"),
        })
        .collect()
}

fn context(reading_id: &str, reading_title: &str) -> ReadingContext {
    ReadingContext {
        reading_id: reading_id.to_string(),
        topic_id: "t1".to_string(),
        reading_title: reading_title.to_string(),
        topic_title: "Topic One".to_string(),
    }
}

#[test]
fn count_words_handles_empty_and_whitespace_runs() {
    assert_eq!(count_words(""), 0);
    assert_eq!(count_words("   \n\t "), 0);
    assert_eq!(count_words("  alpha\tbeta \n gamma "), 3);
}

#[test]
fn is_heading_accepts_caps_los_and_numbered_sections() {
    assert!(is_heading("RISK AND RETURN OBJECTIVES"));
    assert!(is_heading("LOS 12.a Describe the process"));
    assert!(is_heading("Learning Outcome Statements"));
    assert!(is_heading("Section 3 Asset Allocation"));
    assert!(is_heading("1.2 Equity Valuation"));
    assert!(is_heading("A. Overview of Mandates"));
    assert!(is_heading("IV. Fixed Income"));
}

#[test]
fn is_heading_rejects_prose_and_degenerate_lines() {
    assert!(!is_heading("The quick brown fox jumps."));
    assert!(!is_heading(""));
    assert!(!is_heading("AB"));
    assert!(!is_heading(&"X".repeat(121)));
    // Single all-caps token is too ambiguous to be a heading.
    assert!(!is_heading("GIPS"));
}

#[test]
fn extract_learning_outcomes_collects_verb_lines_until_next_heading() {
    let text = "LEARNING OUTCOME STATEMENTS\n\
                Describe the behavioral biases of individuals.\n\
                Explain how framing affects decisions.\n\
                Some connective sentence without a verb stem.\n\
                Evaluate the resulting portfolio choices.\n\
                MARKET EXPECTATIONS OVERVIEW\n\
                Identify a statement that must not be collected.";

    let outcomes = extract_learning_outcomes(text, vocab::OUTCOME_VERBS);

    assert_eq!(outcomes.len(), 3);
    assert!(outcomes[0].starts_with("Describe"));
    assert!(outcomes[1].starts_with("Explain"));
    assert!(outcomes[2].starts_with("Evaluate"));
}

#[test]
fn extract_learning_outcomes_ignores_text_before_trigger_and_caps_at_eight() {
    let before = "Describe something before the trigger line.";
    let statements = (0..10)
        .map(|index| format!("Analyze scenario number {index} in detail."))
        .collect::<Vec<String>>()
        .join("\n");
    let text = format!("{before}\nLearning outcomes\n{statements}");

    let outcomes = extract_learning_outcomes(&text, vocab::OUTCOME_VERBS);

    assert_eq!(outcomes.len(), 8);
    assert!(outcomes[0].contains("scenario number 0"));
}

#[test]
fn extract_key_terms_preserves_vocabulary_order_and_cap() {
    let text = "GIPS compliance matters; so do tracking error, alpha, and the Sharpe ratio.";
    let terms = extract_key_terms(text, vocab::KEY_TERMS);
    assert_eq!(terms, vec!["sharpe ratio", "tracking error", "alpha", "GIPS"]);

    let dense = "efficient frontier sharpe ratio treynor ratio information ratio \
                 tracking error alpha beta duration convexity";
    let capped = extract_key_terms(dense, vocab::KEY_TERMS);
    assert_eq!(capped.len(), 8);
    assert_eq!(capped.last().map(String::as_str), Some("duration"));
}

#[test]
fn escape_html_neutralizes_metacharacters() {
    assert_eq!(
        escape_html(r#"a<b & "c" > d"#),
        "a&lt;b &amp; &quot;c&quot; &gt; d"
    );

    let escaped = escape_html("<script>\"&\"</script>");
    assert!(!escaped.contains('<'));
    assert!(!escaped.contains('>'));
    assert!(!escaped.contains('"'));
}

#[test]
fn text_to_html_renders_headings_bullets_and_paragraphs() {
    let text = "MARKET STRUCTURE OVERVIEW\n\
                This paragraph has <angle> brackets.\n\
                • first bullet\n\
                - second bullet\n\
                Closing paragraph.";

    let html = text_to_html(text);

    assert_eq!(
        html,
        "<h2>MARKET STRUCTURE OVERVIEW</h2>\
         <p>This paragraph has &lt;angle&gt; brackets.</p>\
         <ul><li>first bullet</li><li>second bullet</li></ul>\
         <p>Closing paragraph.</p>"
    );
}

#[test]
fn text_to_html_closes_trailing_list() {
    let html = text_to_html("A paragraph line first.\n- only bullet");
    assert!(html.ends_with("<li>only bullet</li></ul>"));
}

#[test]
fn text_to_html_short_numbered_lines_classify_as_headings_first() {
    // Heading classification runs before list-marker matching, so a short
    // "1. ..." line lands in the heading branch.
    let html = text_to_html("1. Short numbered line");
    assert_eq!(html, "<h2>1. Short numbered line</h2>");

    // Once the line is too long to be a heading, the numeric marker wins
    // and gets stripped.
    let long_tail = words("item", 30);
    let html = text_to_html(&format!("12. {long_tail}"));
    assert!(html.starts_with("<ul><li>item0 "));
    assert!(html.ends_with("</li></ul>"));
}

#[test]
fn split_into_chunks_drops_undersized_and_keeps_fifty_one_words() {
    assert!(split_into_chunks(&words("w", 30), 2000).is_empty());

    let kept = split_into_chunks(&words("w", 51), 2000);
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].word_count, 51);
}

#[test]
fn split_into_chunks_covers_every_paragraph_exactly_once() {
    let paragraphs: Vec<String> = (0..5).map(|index| words(&format!("p{index}x"), 60)).collect();
    let text = paragraphs.join("\n\n");

    let chunks = split_into_chunks(&text, 100);

    let rejoined: Vec<&str> = chunks
        .iter()
        .flat_map(|chunk| chunk.text.split("\n\n"))
        .collect();
    let expected: Vec<&str> = paragraphs.iter().map(String::as_str).collect();
    assert_eq!(rejoined, expected);
}

#[test]
fn split_into_chunks_keeps_oversized_paragraph_in_underfull_chunk() {
    let text = format!("{}\n\n{}", words("small", 30), words("large", 200));

    let chunks = split_into_chunks(&text, 100);

    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].word_count, 230);
}

#[test]
fn split_into_chunks_splits_on_two_or_more_newlines() {
    let text = format!("{}\n\n\n{}", words("a", 60), words("b", 60));
    let chunks = split_into_chunks(&text, 60);
    assert_eq!(chunks.len(), 2);
}

#[test]
fn signal_words_filter_short_stop_and_duplicate_tokens() {
    let words = signal_words(
        "Introduction to Portfolio Management for Institutional Investors",
        vocab::STOP_WORDS,
    );
    assert_eq!(words, vec!["institutional", "investors"]);

    let deduped = signal_words("Equity, Equity and More Equity", vocab::STOP_WORDS);
    assert_eq!(deduped, vec!["equity"]);
}

#[test]
fn detect_reading_boundaries_single_title_is_page_zero() {
    let boundaries = detect_reading_boundaries(
        &filler_pages(10),
        &["Only Reading".to_string()],
        vocab::STOP_WORDS,
    );
    assert_eq!(boundaries.len(), 1);
    assert_eq!(boundaries[0].page_index, 0);
    assert_eq!(boundaries[0].resolution, Resolution::Anchor);
}

#[test]
fn detect_reading_boundaries_two_page_volume_degenerates_to_even_split() {
    let pages = vec![
        Page {
            number: 1,
            text: "nothing relevant here".to_string(),
        },
        Page {
            number: 2,
            text: "reading b starts on this sheet".to_string(),
        },
    ];
    let titles = vec!["Reading A".to_string(), "Reading B".to_string()];

    let boundaries = detect_reading_boundaries(&pages, &titles, vocab::STOP_WORDS);

    let indices: Vec<usize> = boundaries.iter().map(|b| b.page_index).collect();
    assert_eq!(indices, vec![0, 1]);
}

#[test]
fn detect_reading_boundaries_accepts_earliest_window_covering_the_signal() {
    let mut pages = filler_pages(20);
    pages[6].text = "equity construction techniques derivatives discussion begins".to_string();
    let titles = vec![
        "Opening Reading".to_string(),
        "Equity Construction Techniques Derivatives".to_string(),
    ];

    let boundaries = detect_reading_boundaries(&pages, &titles, vocab::STOP_WORDS);

    // Candidates 5, 6 and 7 all see page 6 through the 3-page window and tie
    // on score; the earliest wins under the strict comparison.
    assert_eq!(boundaries[1].page_index, 5);
    assert_eq!(
        boundaries[1].resolution,
        Resolution::Matched {
            score: 4,
            signal_words: 4
        }
    );
}

#[test]
fn detect_reading_boundaries_falls_back_to_even_division_without_signal() {
    let pages = filler_pages(20);
    let titles = vec![
        "Opening Reading".to_string(),
        "Currency Hedging Strategies".to_string(),
    ];

    let boundaries = detect_reading_boundaries(&pages, &titles, vocab::STOP_WORDS);

    assert_eq!(boundaries[1].page_index, 10);
    assert_eq!(boundaries[1].resolution, Resolution::EvenSplit);
}

#[test]
fn detect_reading_boundaries_divides_remaining_span_across_readings() {
    let pages = filler_pages(30);
    let titles = vec![
        "Opening Reading".to_string(),
        "Currency Hedging Strategies".to_string(),
        "Derivatives Valuation Basics".to_string(),
    ];

    let boundaries = detect_reading_boundaries(&pages, &titles, vocab::STOP_WORDS);

    let indices: Vec<usize> = boundaries.iter().map(|b| b.page_index).collect();
    assert_eq!(indices, vec![0, 10, 20]);
}

#[test]
fn detect_reading_boundaries_is_strictly_increasing_even_without_pages() {
    let titles = vec![
        "Opening Reading".to_string(),
        "Currency Hedging Strategies".to_string(),
        "Derivatives Valuation Basics".to_string(),
    ];

    let boundaries = detect_reading_boundaries(&[], &titles, vocab::STOP_WORDS);

    assert_eq!(boundaries.len(), titles.len());
    assert_eq!(boundaries[0].page_index, 0);
    for pair in boundaries.windows(2) {
        assert!(pair[0].page_index < pair[1].page_index);
    }
}

#[test]
fn detect_reading_boundaries_even_spacing_for_titles_without_signal_words() {
    let pages = filler_pages(20);
    let titles = vec!["Alpha".to_string(), "Beta Cap".to_string()];

    let boundaries = detect_reading_boundaries(&pages, &titles, vocab::STOP_WORDS);

    assert_eq!(boundaries[1].page_index, 10);
    assert_eq!(boundaries[1].resolution, Resolution::EvenSplit);
}

#[test]
fn sanitize_reading_id_maps_unsafe_characters_to_dashes() {
    assert_eq!(sanitize_reading_id("1-1"), "1-1");
    assert_eq!(sanitize_reading_id("1.2a"), "1-2a");
    assert_eq!(sanitize_reading_id("R 7/B"), "R-7-B");
    assert_eq!(stage_id("1.2", 3), "1-2-s3");
}

#[test]
fn estimate_minutes_clamps_to_reading_session_range() {
    assert_eq!(estimate_minutes(120), 5);
    assert_eq!(estimate_minutes(1200), 10);
    assert_eq!(estimate_minutes(2000), 17);
    assert_eq!(estimate_minutes(6000), 30);
}

#[test]
fn stage_title_prefers_short_heading_first_line() {
    let titled = stage_title(
        "ASSET ALLOCATION PROCESS\nbody text follows",
        "Asset Allocation: A Primer",
        1,
    );
    assert_eq!(titled, "ASSET ALLOCATION PROCESS");

    let fallback = stage_title(
        "plain lowercase text starts here",
        "Asset Allocation: A Primer",
        2,
    );
    assert_eq!(fallback, "Asset Allocation — Part 2");
}

#[test]
fn build_stages_links_stage_sequence_both_ways() {
    let text = (0..3)
        .map(|index| words(&format!("s{index}x"), 60))
        .collect::<Vec<String>>()
        .join("\n\n");

    let stages = build_stages(&context("1-1", "Reading One"), &text, 60);

    assert_eq!(stages.len(), 3);
    for (index, stage) in stages.iter().enumerate() {
        assert_eq!(stage.stage_number, index + 1);
        assert_eq!(stage.total_stages, 3);
        assert_eq!(stage.id, format!("1-1-s{}", index + 1));
    }
    assert_eq!(stages[0].prev_stage_id, None);
    assert_eq!(stages[0].next_stage_id.as_deref(), Some("1-1-s2"));
    assert_eq!(stages[1].prev_stage_id.as_deref(), Some("1-1-s1"));
    assert_eq!(stages[1].next_stage_id.as_deref(), Some("1-1-s3"));
    assert_eq!(stages[2].prev_stage_id.as_deref(), Some("1-1-s2"));
    assert_eq!(stages[2].next_stage_id, None);
}

#[test]
fn build_stages_is_deterministic_across_runs() {
    let text = format!(
        "LEARNING OUTCOME STATEMENTS\nDescribe the tracking error budget.\n\n{}",
        words("body", 80)
    );
    let ctx = context("2-1", "Risk Management: Applications");

    let first = build_stages(&ctx, &text, 2000);
    let second = build_stages(&ctx, &text, 2000);

    assert_eq!(first, second);
    assert_eq!(first.len(), 1);
    assert!(first[0].learning_outcomes[0].starts_with("Describe"));
    assert!(first[0].key_terms.contains(&"tracking error".to_string()));
}

#[test]
fn build_stages_empty_text_yields_no_stages() {
    assert!(build_stages(&context("3-1", "Reading"), "", 2000).is_empty());
}

#[test]
fn segment_text_slices_exclusive_of_next_boundary() {
    let pages: Vec<Page> = (1..=5)
        .map(|number| Page {
            number,
            text: format!("p{number}"),
        })
        .collect();

    assert_eq!(segment_text(&pages, 1, 3), "p2\np3");
    assert_eq!(segment_text(&pages, 3, 99), "p4\np5");
    assert_eq!(segment_text(&pages, 4, 4), "");
}

#[test]
fn apply_stage_updates_rewrites_only_processed_readings() {
    let curriculum = Curriculum {
        topics: vec![TopicMeta {
            id: "t1".to_string(),
            title: "Topic One".to_string(),
            color: "#336699".to_string(),
            readings: vec![
                ReadingMeta {
                    id: "1-1".to_string(),
                    title: "Reading One".to_string(),
                    stage_count: 4,
                    stages: vec!["1-1-s1".to_string()],
                },
                ReadingMeta {
                    id: "1-2".to_string(),
                    title: "Reading Two".to_string(),
                    stage_count: 2,
                    stages: vec!["1-2-s1".to_string(), "1-2-s2".to_string()],
                },
            ],
        }],
    };

    let mut updates = HashMap::new();
    updates.insert(
        "1-1".to_string(),
        vec!["1-1-s1".to_string(), "1-1-s2".to_string()],
    );

    let updated = apply_stage_updates(&curriculum, &updates);

    let readings = &updated.topics[0].readings;
    assert_eq!(readings[0].stage_count, 2);
    assert_eq!(readings[0].stages, vec!["1-1-s1", "1-1-s2"]);
    // Untouched reading keeps its prior index entry.
    assert_eq!(readings[1].stage_count, 2);
    assert_eq!(readings[1].stages.len(), 2);
}

#[test]
fn apply_stage_updates_records_zero_stage_readings() {
    let curriculum = Curriculum {
        topics: vec![TopicMeta {
            id: "t1".to_string(),
            title: "Topic One".to_string(),
            color: "#336699".to_string(),
            readings: vec![ReadingMeta {
                id: "1-1".to_string(),
                title: "Reading One".to_string(),
                stage_count: 3,
                stages: vec!["1-1-s1".to_string()],
            }],
        }],
    };

    let mut updates = HashMap::new();
    updates.insert("1-1".to_string(), Vec::new());

    let updated = apply_stage_updates(&curriculum, &updates);

    assert_eq!(updated.topics[0].readings[0].stage_count, 0);
    assert!(updated.topics[0].readings[0].stages.is_empty());
}
