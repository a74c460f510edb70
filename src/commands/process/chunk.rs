use std::sync::LazyLock;

use regex::Regex;

use super::classify::count_words;

/// Chunks at or below this word count are dropped, not merged backward.
pub(crate) const MIN_CHUNK_WORDS: usize = 50;

static PARAGRAPH_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{2,}").expect("paragraph break regex compiles"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Chunk {
    pub text: String,
    pub word_count: usize,
}

/// Paragraph-aware greedy bin-packing. Paragraphs are atomic: one that alone
/// exceeds the target still lands wholesale in an under-half-full chunk. A
/// chunk closes only when adding the next paragraph would exceed the target
/// and the chunk is already more than half full.
pub(crate) fn split_into_chunks(text: &str, target_words: usize) -> Vec<Chunk> {
    let paragraphs = PARAGRAPH_BREAK
        .split(text)
        .map(str::trim)
        .filter(|paragraph| !paragraph.is_empty());

    let mut chunks = Vec::new();
    let mut current_text = String::new();
    let mut current_words = 0_usize;

    for paragraph in paragraphs {
        let paragraph_words = count_words(paragraph);

        if current_words + paragraph_words > target_words && current_words > target_words / 2 {
            if !current_text.is_empty() {
                chunks.push(Chunk {
                    text: current_text,
                    word_count: current_words,
                });
            }
            current_text = paragraph.to_string();
            current_words = paragraph_words;
        } else {
            if !current_text.is_empty() {
                current_text.push_str("\n\n");
            }
            current_text.push_str(paragraph);
            current_words += paragraph_words;
        }
    }

    if !current_text.is_empty() {
        chunks.push(Chunk {
            text: current_text,
            word_count: current_words,
        });
    }

    chunks
        .into_iter()
        .filter(|chunk| chunk.word_count > MIN_CHUNK_WORDS)
        .collect()
}
