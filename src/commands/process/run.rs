use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{info, warn};

use crate::cli::ProcessArgs;
use crate::model::{ProcessConfig, ProcessCounts, ProcessPaths, ProcessRunManifest, VolumeConfig};
use crate::util::{
    ensure_directory, now_utc_string, read_json, utc_compact_string, write_json_pretty,
};

use super::boundary::{Resolution, detect_reading_boundaries};
use super::classify::count_words;
use super::curriculum::{apply_stage_updates, load_curriculum, reading_lookup};
use super::extract::{collect_tool_versions, extract_full_text, extract_pages};
use super::stages::{ReadingContext, build_stages, segment_text, write_stages};
use super::vocab;

const MANIFEST_VERSION: u32 = 1;

/// Segments with fewer words than this almost always indicate a wrong
/// volume-to-reading mapping.
const MIN_SEGMENT_WORDS: usize = 100;

#[derive(Default)]
struct RunState {
    counts: ProcessCounts,
    warnings: Vec<String>,
    /// Reading id -> produced stage ids, applied to the curriculum index
    /// only after the full volume list has been processed.
    updates: HashMap<String, Vec<String>>,
}

impl RunState {
    fn warn_skip_reading(&mut self, message: String) {
        warn!("{message}");
        self.warnings.push(message);
        self.counts.readings_skipped += 1;
    }
}

pub fn run(args: ProcessArgs) -> Result<()> {
    let started_ts = Utc::now();
    let started_at = now_utc_string();
    let run_id = format!("run-{}", utc_compact_string(started_ts));

    info!(
        run_id = %run_id,
        config = %args.config_path.display(),
        source_dir = %args.source_dir.display(),
        "starting stage generation"
    );

    let config: ProcessConfig = read_json(&args.config_path)
        .with_context(|| format!("invalid process config: {}", args.config_path.display()))?;
    let curriculum = load_curriculum(&args.curriculum_path)?;
    let lookup = reading_lookup(&curriculum);

    ensure_directory(&args.stages_dir)?;

    if config.volumes.is_empty() && config.direct.is_empty() {
        warn!(
            config = %args.config_path.display(),
            "config maps no volumes or readings; nothing to do"
        );
    }

    let mut state = RunState::default();
    state.counts.volumes_configured = config.volumes.len();
    state.counts.direct_readings_configured = config.direct.len();

    for volume in &config.volumes {
        if let Err(err) = process_volume(&args, volume, &lookup, &mut state) {
            let message = format!("volume {} failed: {err:#}", volume.file);
            warn!("{message}");
            state.warnings.push(message);
            state.counts.volumes_skipped += 1;
        }
    }

    for (reading_id, filename) in &config.direct {
        process_direct_reading(&args, reading_id, filename, &lookup, &mut state);
    }

    // The index write is the last effect of the run: any fatal failure above
    // leaves the previous curriculum on disk untouched.
    let updated = apply_stage_updates(&curriculum, &state.updates);
    write_json_pretty(&args.curriculum_path, &updated)?;
    info!(
        path = %args.curriculum_path.display(),
        readings_updated = state.updates.len(),
        "curriculum index rewritten"
    );

    info!(
        readings = state.counts.readings_processed,
        stages = state.counts.stages_written,
        "stage generation complete"
    );
    if state.counts.stages_written == 0 {
        warn!(
            "no stages generated; check that PDFs exist under {} and that {} maps them",
            args.source_dir.display(),
            args.config_path.display()
        );
    }

    write_run_manifest(&args, run_id, started_at, state)?;

    Ok(())
}

/// Segmentation mode: one PDF covering several readings, split at detected
/// boundaries. Extraction errors propagate to the caller and abort only this
/// volume.
fn process_volume(
    args: &ProcessArgs,
    volume: &VolumeConfig,
    lookup: &HashMap<String, ReadingContext>,
    state: &mut RunState,
) -> Result<()> {
    let pdf_path = args.source_dir.join(&volume.file);
    if !pdf_path.exists() {
        let message = format!("volume PDF not found, skipping: {}", pdf_path.display());
        warn!("{message}");
        state.warnings.push(message);
        state.counts.volumes_skipped += 1;
        return Ok(());
    }

    let readings = resolve_readings(&volume.readings, lookup, state);
    if readings.is_empty() {
        let message = format!(
            "volume {} maps no known readings; skipping",
            volume.file
        );
        warn!("{message}");
        state.warnings.push(message);
        state.counts.volumes_skipped += 1;
        return Ok(());
    }

    let pages = extract_pages(&pdf_path, args.max_pages_per_doc)?;
    info!(
        volume = %volume.file,
        pages = pages.len(),
        readings = readings.len(),
        "extracted volume"
    );

    let titles: Vec<String> = readings
        .iter()
        .map(|context| context.reading_title.clone())
        .collect();
    let boundaries = detect_reading_boundaries(&pages, &titles, vocab::STOP_WORDS);

    for (boundary, title) in boundaries.iter().zip(&titles) {
        if boundary.resolution == Resolution::EvenSplit {
            let message = format!(
                "weak boundary signal for '{title}' in {}; using even division at page index {}",
                volume.file, boundary.page_index
            );
            warn!("{message}");
            state.warnings.push(message);
            state.counts.boundary_fallbacks += 1;
        }
    }

    for (index, context) in readings.iter().enumerate() {
        let start = boundaries[index].page_index;
        let end = boundaries
            .get(index + 1)
            .map(|boundary| boundary.page_index)
            .unwrap_or(pages.len());
        let segment = segment_text(&pages, start, end);

        if count_words(&segment) < MIN_SEGMENT_WORDS {
            let message = format!(
                "segment for reading {} ({} pages {}..{}) is under {MIN_SEGMENT_WORDS} words; \
                 the volume mapping may be wrong",
                context.reading_id, volume.file, start, end
            );
            warn!("{message}");
            state.warnings.push(message);
            state.counts.undersized_segments += 1;
        }

        produce_stages(args, context, &segment, state)?;
    }

    state.counts.volumes_processed += 1;
    Ok(())
}

/// Direct mode: one PDF per reading, no boundary detection. Extraction
/// failures degrade to empty text so the run keeps going.
fn process_direct_reading(
    args: &ProcessArgs,
    reading_id: &str,
    filename: &str,
    lookup: &HashMap<String, ReadingContext>,
    state: &mut RunState,
) {
    let Some(context) = lookup.get(reading_id) else {
        state.warn_skip_reading(format!(
            "reading {reading_id} not present in curriculum index; skipping"
        ));
        return;
    };

    let pdf_path = args.source_dir.join(filename);
    if !pdf_path.exists() {
        state.warn_skip_reading(format!(
            "PDF for reading {reading_id} not found, skipping: {}",
            pdf_path.display()
        ));
        return;
    }

    let text = match extract_full_text(&pdf_path, args.max_pages_per_doc) {
        Ok(text) => text,
        Err(err) => {
            let message =
                format!("extraction failed for {}, treating as empty: {err:#}", filename);
            warn!("{message}");
            state.warnings.push(message);
            String::new()
        }
    };

    if text.trim().is_empty() {
        let message = format!("no text extracted from {filename} for reading {reading_id}");
        warn!("{message}");
        state.warnings.push(message);
    }

    if let Err(err) = produce_stages(args, context, &text, state) {
        let message = format!("failed to write stages for reading {reading_id}: {err:#}");
        warn!("{message}");
        state.warnings.push(message);
    }
}

fn resolve_readings(
    reading_ids: &[String],
    lookup: &HashMap<String, ReadingContext>,
    state: &mut RunState,
) -> Vec<ReadingContext> {
    let mut resolved = Vec::with_capacity(reading_ids.len());

    for reading_id in reading_ids {
        match lookup.get(reading_id) {
            Some(context) => resolved.push(context.clone()),
            None => state.warn_skip_reading(format!(
                "reading {reading_id} not present in curriculum index; skipping"
            )),
        }
    }

    resolved
}

/// Chunks one reading's text, persists its stage records, and queues the
/// index update. A reading that yields zero stages still gets an update so
/// the index reflects reality.
fn produce_stages(
    args: &ProcessArgs,
    context: &ReadingContext,
    text: &str,
    state: &mut RunState,
) -> Result<()> {
    let stages = build_stages(context, text, args.target_words);
    write_stages(&args.stages_dir, &stages)?;

    let stage_ids: Vec<String> = stages.iter().map(|stage| stage.id.clone()).collect();
    state.counts.stages_written += stage_ids.len();
    state.counts.readings_processed += 1;
    state.updates.insert(context.reading_id.clone(), stage_ids);

    Ok(())
}

fn write_run_manifest(
    args: &ProcessArgs,
    run_id: String,
    started_at: String,
    state: RunState,
) -> Result<()> {
    let manifest_path: PathBuf = args.manifest_dir.join(format!("{run_id}.json"));
    let manifest = ProcessRunManifest {
        manifest_version: MANIFEST_VERSION,
        run_id,
        status: "completed".to_string(),
        started_at,
        completed_at: now_utc_string(),
        target_words: args.target_words,
        tool_versions: collect_tool_versions(),
        paths: ProcessPaths {
            config_path: args.config_path.display().to_string(),
            source_dir: args.source_dir.display().to_string(),
            stages_dir: args.stages_dir.display().to_string(),
            curriculum_path: args.curriculum_path.display().to_string(),
        },
        counts: state.counts,
        warnings: state.warnings,
    };

    write_json_pretty(&manifest_path, &manifest)?;
    info!(path = %manifest_path.display(), "wrote run manifest");

    Ok(())
}
