//! Output shapes consumed by the explorer frontend.
//!
//! Field order here is the serialized key order.

use serde::{Deserialize, Serialize};

use crate::{Mode, TaskType};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub path: String,
    pub language: String,
    pub content: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetFileEntry {
    pub path: String,
    pub language: String,
    pub content: String,
    pub redacted: bool,     // content is blank after trimming
}

/// Summary row for listing without loading the full record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexItem {
    pub id: String,
    pub dataset: String,
    pub mode: Mode,
    pub task_type: TaskType,
    pub commercial: bool,
    pub category: String,
    pub difficulty: String,
    pub title: String,
    pub has_system_message: bool,
    pub context_file_count: usize,
    pub harness_file_count: usize,
    pub target_file_count: usize,
    pub has_reference_text: bool,
    pub solutions_redacted: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordMeta {
    pub id: String,
    pub dataset: String,
    pub mode: Mode,
    pub task_type: TaskType,
    pub commercial: bool,
    pub category: String,
    pub difficulty: String,
    pub title: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpectedOutputs {
    pub target_files: Vec<TargetFileEntry>,
    pub response_text: String,
    pub response_redacted: bool,
}

/// Provenance
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawInfo {
    pub source_file: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FullRecord {
    pub meta: RecordMeta,
    pub prompt: Prompt,
    pub context_files: Vec<FileEntry>,     // sorted by path
    pub harness_files: Vec<FileEntry>,     // sorted by path
    pub expected_outputs: ExpectedOutputs,
    pub raw: RawInfo,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetStats {
    pub record_count: usize,
    pub dataset_count: usize,
    pub modes: Vec<String>,
    pub task_types: Vec<String>,
}

impl DatasetStats {
    /// Aggregate over index items. Sets are sorted for stable output.
    pub fn from_index(items: &[IndexItem]) -> Self {
        use std::collections::BTreeSet;

        let datasets: BTreeSet<&str> = items.iter().map(|i| i.dataset.as_str()).collect();
        let modes: BTreeSet<&str> = items.iter().map(|i| i.mode.as_str()).collect();
        let task_types: BTreeSet<&str> = items.iter().map(|i| i.task_type.as_str()).collect();

        Self {
            record_count: items.len(),
            dataset_count: datasets.len(),
            modes: modes.into_iter().map(str::to_string).collect(),
            task_types: task_types.into_iter().map(str::to_string).collect(),
        }
    }
}
