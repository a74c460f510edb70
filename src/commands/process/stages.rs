use std::path::Path;

use anyhow::Result;
use tracing::info;

use crate::model::Stage;
use crate::util::write_json_pretty;

use super::chunk::split_into_chunks;
use super::classify::{extract_key_terms, extract_learning_outcomes, is_heading};
use super::render::text_to_html;
use super::vocab;

const AVG_READING_WPM: f64 = 120.0;
const MIN_STAGE_MINUTES: u32 = 5;
const MAX_STAGE_MINUTES: u32 = 30;

/// Curriculum metadata for one reading, resolved before processing.
#[derive(Debug, Clone)]
pub(crate) struct ReadingContext {
    pub reading_id: String,
    pub topic_id: String,
    pub reading_title: String,
    pub topic_title: String,
}

/// Stage ids must be filesystem- and URL-safe; anything outside
/// ASCII alphanumerics and `-` becomes `-`.
pub(crate) fn sanitize_reading_id(reading_id: &str) -> String {
    reading_id
        .chars()
        .map(|character| {
            if character.is_ascii_alphanumeric() || character == '-' {
                character
            } else {
                '-'
            }
        })
        .collect()
}

pub(crate) fn stage_id(reading_id: &str, stage_number: usize) -> String {
    format!("{}-s{}", sanitize_reading_id(reading_id), stage_number)
}

/// Splits a reading's text into stages and assembles the full stage records,
/// including prev/next sequencing links. Deterministic: identical input text
/// yields identical records.
pub(crate) fn build_stages(
    context: &ReadingContext,
    text: &str,
    target_words: usize,
) -> Vec<Stage> {
    let chunks = split_into_chunks(text, target_words);
    let total_stages = chunks.len();

    chunks
        .into_iter()
        .enumerate()
        .map(|(index, chunk)| {
            let stage_number = index + 1;
            let prev_stage_id = if index > 0 {
                Some(stage_id(&context.reading_id, index))
            } else {
                None
            };
            let next_stage_id = if stage_number < total_stages {
                Some(stage_id(&context.reading_id, stage_number + 1))
            } else {
                None
            };

            Stage {
                id: stage_id(&context.reading_id, stage_number),
                stage_number,
                total_stages,
                reading_id: context.reading_id.clone(),
                topic_id: context.topic_id.clone(),
                title: stage_title(&chunk.text, &context.reading_title, stage_number),
                reading_title: context.reading_title.clone(),
                topic_title: context.topic_title.clone(),
                word_count: chunk.word_count,
                estimated_minutes: estimate_minutes(chunk.word_count),
                content: text_to_html(&chunk.text),
                learning_outcomes: extract_learning_outcomes(&chunk.text, vocab::OUTCOME_VERBS),
                key_terms: extract_key_terms(&chunk.text, vocab::KEY_TERMS),
                prev_stage_id,
                next_stage_id,
            }
        })
        .collect()
}

/// The chunk's own first line when it reads as a short heading, otherwise a
/// title synthesized from the reading title's lead-in.
pub(crate) fn stage_title(chunk_text: &str, reading_title: &str, stage_number: usize) -> String {
    let first_line = chunk_text
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("");

    if is_heading(first_line) && first_line.len() < 80 {
        return first_line.to_string();
    }

    let lead = reading_title
        .split(':')
        .next()
        .unwrap_or(reading_title)
        .trim();
    format!("{lead} — Part {stage_number}")
}

pub(crate) fn estimate_minutes(word_count: usize) -> u32 {
    let minutes = (word_count as f64 / AVG_READING_WPM).round() as u32;
    minutes.clamp(MIN_STAGE_MINUTES, MAX_STAGE_MINUTES)
}

/// Persists stage records, one JSON file per stage keyed by id. Reruns
/// overwrite in place.
pub(crate) fn write_stages(stages_dir: &Path, stages: &[Stage]) -> Result<()> {
    for stage in stages {
        let path = stages_dir.join(format!("{}.json", stage.id));
        write_json_pretty(&path, stage)?;
    }

    if let Some(first) = stages.first() {
        info!(
            reading = %first.reading_id,
            stages = stages.len(),
            words = stages.iter().map(|stage| stage.word_count).sum::<usize>(),
            "wrote stage records"
        );
    }

    Ok(())
}

/// Segment text for reading `r`: pages from its boundary up to (exclusive)
/// the next reading's boundary, joined by newline.
pub(crate) fn segment_text(pages: &[super::extract::Page], start: usize, end: usize) -> String {
    let end = end.min(pages.len());
    if start >= end {
        return String::new();
    }

    pages[start..end]
        .iter()
        .map(|page| page.text.as_str())
        .collect::<Vec<&str>>()
        .join("\n")
}
