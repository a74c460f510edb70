use std::collections::HashMap;
use std::path::Path;

use anyhow::Result;

use crate::model::{Curriculum, ReadingMeta, TopicMeta};
use crate::util::read_json;

use super::stages::ReadingContext;

/// Reading id -> curriculum metadata, flattened for lookup.
pub(crate) fn reading_lookup(curriculum: &Curriculum) -> HashMap<String, ReadingContext> {
    let mut lookup = HashMap::new();

    for topic in &curriculum.topics {
        for reading in &topic.readings {
            lookup.insert(
                reading.id.clone(),
                ReadingContext {
                    reading_id: reading.id.clone(),
                    topic_id: topic.id.clone(),
                    reading_title: reading.title.clone(),
                    topic_title: topic.title.clone(),
                },
            );
        }
    }

    lookup
}

pub(crate) fn load_curriculum(path: &Path) -> Result<Curriculum> {
    read_json(path)
}

/// Produces a new curriculum with `stageCount`/`stages` replaced for every
/// reading present in `updates`. Readings without an update keep their prior
/// values; no record is mutated in place.
pub(crate) fn apply_stage_updates(
    curriculum: &Curriculum,
    updates: &HashMap<String, Vec<String>>,
) -> Curriculum {
    let topics = curriculum
        .topics
        .iter()
        .map(|topic| TopicMeta {
            id: topic.id.clone(),
            title: topic.title.clone(),
            color: topic.color.clone(),
            readings: topic
                .readings
                .iter()
                .map(|reading| match updates.get(&reading.id) {
                    Some(stage_ids) => ReadingMeta {
                        id: reading.id.clone(),
                        title: reading.title.clone(),
                        stage_count: stage_ids.len(),
                        stages: stage_ids.clone(),
                    },
                    None => reading.clone(),
                })
                .collect(),
        })
        .collect();

    Curriculum { topics }
}
