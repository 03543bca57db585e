use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, info};

use crate::writer::write_json;
use crate::{normalize_record, parse_source_meta, CvdpError, DatasetStats, IndexItem, Result};

pub const RECORDS_DIR: &str = "records";
pub const INDEX_FILE: &str = "index.json";
pub const STATS_FILE: &str = "stats.json";

#[derive(Clone, Debug)]
pub struct BatchSummary {
    pub output_dir: PathBuf,
    pub files_processed: usize,
    pub stats: DatasetStats,
}

/// Per-run state. Ids must be unique across every file of one run.
#[derive(Default)]
struct BatchState {
    seen_ids: HashSet<String>,
    index: Vec<IndexItem>,
}

/// `*.jsonl` regular files in `input_dir`, sorted by name.
fn list_jsonl_files(input_dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(input_dir).map_err(|e| CvdpError::io(input_dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| CvdpError::io(input_dir, e))?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "jsonl") {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

fn process_file(path: &Path, records_dir: &Path, state: &mut BatchState) -> Result<()> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let meta = parse_source_meta(path)?;

    let f = File::open(path).map_err(|e| CvdpError::io(path, e))?;
    let reader = BufReader::new(f);

    // Hash exact line content + newline => stable across line-ending styles
    let mut hasher = blake3::Hasher::new();
    let mut records = 0usize;

    for (i, line) in reader.lines().enumerate() {
        let line_no = i + 1;
        let line = line.map_err(|e| match e.kind() {
            ErrorKind::InvalidData => CvdpError::MalformedInput {
                file: file_name.clone(),
                line: line_no,
                reason: e.to_string(),
            },
            _ => CvdpError::io(path, e),
        })?;

        hasher.update(line.as_bytes());
        hasher.update(b"\n");

        let text = line.trim();
        if text.is_empty() {
            continue;
        }

        let raw: Value = serde_json::from_str(text).map_err(|e| CvdpError::MalformedInput {
            file: file_name.clone(),
            line: line_no,
            reason: e.to_string(),
        })?;
        if !raw.is_object() {
            return Err(CvdpError::MalformedInput {
                file: file_name.clone(),
                line: line_no,
                reason: "expected a JSON object".to_string(),
            });
        }

        let (index_item, full) = normalize_record(&raw, &file_name, &meta).map_err(|e| match e {
            CvdpError::MissingIdentifier { file, .. } => CvdpError::MissingIdentifier { file, line: line_no },
            other => other,
        })?;

        if !state.seen_ids.insert(index_item.id.clone()) {
            return Err(CvdpError::DuplicateIdentifier(index_item.id));
        }

        let record_path = records_dir.join(format!("{}.json", index_item.id));
        write_json(&record_path, &full)?;
        debug!(id = %index_item.id, path = %record_path.display(), "wrote record");

        state.index.push(index_item);
        records += 1;
    }

    let line_hash: [u8; 32] = hasher.finalize().into();
    info!(
        file = %file_name,
        dataset = %meta.dataset,
        mode = %meta.mode,
        task_type = %meta.task_type,
        records,
        line_hash = %hex::encode(line_hash),
        "processed input file"
    );
    Ok(())
}

/// Normalize every `*.jsonl` file in `input_dir` into `output_dir`.
///
/// Writes `records/<id>.json` as records are produced, then `index.json`
/// (sorted by id) and `stats.json`. The first fatal error aborts the run and
/// leaves already written records in place.
pub fn process_all(input_dir: &Path, output_dir: &Path) -> Result<BatchSummary> {
    let files = list_jsonl_files(input_dir)?;
    if files.is_empty() {
        return Err(CvdpError::NoInputFiles(input_dir.to_path_buf()));
    }

    let records_dir = output_dir.join(RECORDS_DIR);
    fs::create_dir_all(&records_dir).map_err(|e| CvdpError::io(&records_dir, e))?;

    let mut state = BatchState::default();
    for path in &files {
        process_file(path, &records_dir, &mut state)?;
    }

    let mut index = state.index;
    index.sort_by(|a, b| a.id.cmp(&b.id));
    write_json(&output_dir.join(INDEX_FILE), &index)?;

    let stats = DatasetStats::from_index(&index);
    write_json(&output_dir.join(STATS_FILE), &stats)?;

    info!(
        records = stats.record_count,
        datasets = stats.dataset_count,
        files = files.len(),
        output = %output_dir.display(),
        "batch complete"
    );

    Ok(BatchSummary {
        output_dir: output_dir.to_path_buf(),
        files_processed: files.len(),
        stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_jsonl_files_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.jsonl", "a.jsonl", "notes.txt", "c.json"] {
            fs::write(dir.path().join(name), "").unwrap();
        }
        fs::create_dir(dir.path().join("nested.jsonl")).unwrap();

        let files = list_jsonl_files(dir.path()).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.jsonl", "b.jsonl"]);
    }

    #[test]
    fn test_missing_input_dir_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = process_all(&dir.path().join("absent"), &dir.path().join("out")).unwrap_err();
        assert!(matches!(err, CvdpError::Io { .. }));
    }
}
