use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One persisted reading unit, written as `<stages_dir>/<id>.json`.
/// Field names stay camelCase so the reader app consumes the files as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stage {
    pub id: String,
    pub stage_number: usize,
    pub total_stages: usize,
    pub reading_id: String,
    pub topic_id: String,
    pub title: String,
    pub reading_title: String,
    pub topic_title: String,
    pub word_count: usize,
    pub estimated_minutes: u32,
    pub content: String,
    pub learning_outcomes: Vec<String>,
    pub key_terms: Vec<String>,
    pub prev_stage_id: Option<String>,
    pub next_stage_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingMeta {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub stage_count: usize,
    #[serde(default)]
    pub stages: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicMeta {
    pub id: String,
    pub title: String,
    pub color: String,
    pub readings: Vec<ReadingMeta>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Curriculum {
    pub topics: Vec<TopicMeta>,
}

/// Author-edited mapping from source PDFs to curriculum readings.
///
/// `volumes` lists multi-reading PDFs whose internal boundaries must be
/// detected; `direct` maps a reading id straight to a single-reading PDF.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessConfig {
    #[serde(default)]
    pub volumes: Vec<VolumeConfig>,
    #[serde(default)]
    pub direct: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeConfig {
    pub file: String,
    pub readings: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PdfEntry {
    pub filename: String,
    pub size_bytes: u64,
    pub sha256: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PdfInventoryManifest {
    pub manifest_version: u32,
    pub generated_at: String,
    pub source_directory: String,
    pub pdf_count: usize,
    pub pdfs: Vec<PdfEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolVersions {
    pub rustc: Option<String>,
    pub pdftotext: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProcessPaths {
    pub config_path: String,
    pub source_dir: String,
    pub stages_dir: String,
    pub curriculum_path: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ProcessCounts {
    pub volumes_configured: usize,
    pub volumes_processed: usize,
    pub volumes_skipped: usize,
    pub direct_readings_configured: usize,
    pub readings_processed: usize,
    pub readings_skipped: usize,
    pub stages_written: usize,
    pub boundary_fallbacks: usize,
    pub undersized_segments: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProcessRunManifest {
    pub manifest_version: u32,
    pub run_id: String,
    pub status: String,
    pub started_at: String,
    pub completed_at: String,
    pub target_words: usize,
    pub tool_versions: ToolVersions,
    pub paths: ProcessPaths,
    pub counts: ProcessCounts,
    pub warnings: Vec<String>,
}
