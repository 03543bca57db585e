use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{CvdpError, Result};

/// Release prefix carried by every published dataset file.
pub const DATASET_PREFIX: &str = "cvdp_v1.0.2_";

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Agentic,
    Nonagentic,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Agentic => "agentic",
            Mode::Nonagentic => "nonagentic",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    CodeComprehension,
    CodeGeneration,
}

impl TaskType {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskType::CodeComprehension => "code_comprehension",
            TaskType::CodeGeneration => "code_generation",
        }
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dataset identity derived from an input filename. Shared by every record in that file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceMeta {
    pub dataset: String,
    pub mode: Mode,
    pub task_type: TaskType,
    pub commercial: bool,
}

/// Ordered: the nonagentic patterns contain the agentic one as a substring.
const PATTERNS: &[(&str, Mode, TaskType)] = &[
    ("nonagentic_code_comprehension", Mode::Nonagentic, TaskType::CodeComprehension),
    ("nonagentic_code_generation", Mode::Nonagentic, TaskType::CodeGeneration),
    ("agentic_code_generation", Mode::Agentic, TaskType::CodeGeneration),
];

pub fn parse_source_meta(file_name: impl AsRef<Path>) -> Result<SourceMeta> {
    let path = file_name.as_ref();
    let display_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned());
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let (mode, task_type) = PATTERNS
        .iter()
        .find(|(pattern, _, _)| stem.contains(pattern))
        .map(|(_, mode, task_type)| (*mode, *task_type))
        .ok_or(CvdpError::UnsupportedDatasetFilename(display_name))?;

    let commercial = stem.contains("commercial") && !stem.contains("no_commercial");
    let dataset = stem.strip_prefix(DATASET_PREFIX).unwrap_or(&stem).to_string();

    Ok(SourceMeta {
        dataset,
        mode,
        task_type,
        commercial,
    })
}
