use std::fs;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::cli::StatusArgs;
use crate::model::Curriculum;
use crate::util::read_json;

pub fn run(args: StatusArgs) -> Result<()> {
    info!(curriculum = %args.curriculum_path.display(), "status requested");

    if !args.curriculum_path.exists() {
        warn!(path = %args.curriculum_path.display(), "curriculum index missing");
        return Ok(());
    }

    let curriculum: Curriculum = read_json(&args.curriculum_path)?;

    let reading_count: usize = curriculum
        .topics
        .iter()
        .map(|topic| topic.readings.len())
        .sum();
    let indexed_stage_count: usize = curriculum
        .topics
        .iter()
        .flat_map(|topic| &topic.readings)
        .map(|reading| reading.stage_count)
        .sum();
    let readings_with_stages = curriculum
        .topics
        .iter()
        .flat_map(|topic| &topic.readings)
        .filter(|reading| reading.stage_count > 0)
        .count();

    info!(
        topics = curriculum.topics.len(),
        readings = reading_count,
        readings_with_stages,
        indexed_stages = indexed_stage_count,
        "curriculum index loaded"
    );

    for topic in &curriculum.topics {
        let stages: usize = topic.readings.iter().map(|reading| reading.stage_count).sum();
        info!(
            topic = %topic.id,
            title = %topic.title,
            readings = topic.readings.len(),
            stages,
            "topic"
        );
    }

    if args.stages_dir.exists() {
        let stage_files = count_stage_files(&args)?;
        info!(
            path = %args.stages_dir.display(),
            stage_files,
            "stage store"
        );
        if stage_files != indexed_stage_count {
            warn!(
                stage_files,
                indexed_stages = indexed_stage_count,
                "stage store and curriculum index disagree; re-run process"
            );
        }
    } else {
        warn!(path = %args.stages_dir.display(), "stage store directory missing");
    }

    Ok(())
}

fn count_stage_files(args: &StatusArgs) -> Result<usize> {
    let entries = fs::read_dir(&args.stages_dir).with_context(|| {
        format!(
            "failed to read stages directory: {}",
            args.stages_dir.display()
        )
    })?;

    let mut count = 0_usize;
    for entry in entries {
        let entry = entry.with_context(|| {
            format!("failed to read dir entry in {}", args.stages_dir.display())
        })?;
        let path = entry.path();
        let is_json = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        if path.is_file() && is_json {
            count += 1;
        }
    }

    Ok(count)
}
