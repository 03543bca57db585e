use serde_json::{Map, Value};

use crate::fields::{list_field, map_field, str_field};
use crate::{
    infer_language, CvdpError, ExpectedOutputs, FileEntry, FullRecord, IndexItem, Mode, Prompt,
    RawInfo, RecordMeta, Result, SourceMeta, TargetFileEntry,
};

const UNKNOWN: &str = "unknown";

static NULL: Value = Value::Null;

/// The parts of a raw record that differ between the two task shapes.
struct Sections<'a> {
    user: &'a str,
    system: &'a str,
    context: &'a Map<String, Value>,
    harness: &'a Map<String, Value>,
    targets: &'a Map<String, Value>,
    response: &'a str,
}

impl<'a> Sections<'a> {
    fn extract(raw: &'a Value, mode: Mode) -> Self {
        match mode {
            Mode::Agentic => Self {
                user: str_field(raw, "prompt"),
                system: str_field(raw, "system_message"),
                context: map_field(raw, "context"),
                harness: map_field(raw, "harness"),
                targets: map_field(raw, "patch"),
                response: "",
            },
            Mode::Nonagentic => {
                let input = raw.get("input").unwrap_or(&NULL);
                let output = raw.get("output").unwrap_or(&NULL);

                // Older exports nest harness files under `files`.
                let harness = match raw.get("harness").and_then(|h| h.get("files")) {
                    Some(Value::Object(files)) => files,
                    _ => map_field(raw, "harness"),
                };

                Self {
                    user: str_field(input, "prompt"),
                    system: "",
                    context: map_field(input, "context"),
                    harness,
                    targets: map_field(output, "context"),
                    response: str_field(output, "response"),
                }
            }
        }
    }
}

/// Human-readable title from an id like `cvdp_agentic_fifo-depth_calc_0004`.
pub fn infer_title(record_id: &str) -> String {
    let parts: Vec<&str> = record_id.split('_').collect();
    if parts.len() >= 4 {
        parts[2..parts.len() - 1].join(" ").replace('-', " ")
    } else {
        record_id.to_string()
    }
}

/// Path-sorted `(path, content)` pairs. Non-string content reads as empty.
fn sorted_files(map: &Map<String, Value>) -> Vec<(&String, &str)> {
    let mut files: Vec<(&String, &str)> = map
        .iter()
        .map(|(path, content)| (path, content.as_str().unwrap_or("")))
        .collect();
    files.sort_by(|a, b| a.0.cmp(b.0));
    files
}

fn normalize_file_map(map: &Map<String, Value>) -> Vec<FileEntry> {
    sorted_files(map)
        .into_iter()
        .map(|(path, content)| FileEntry {
            path: path.clone(),
            language: infer_language(path).to_string(),
            content: content.to_string(),
        })
        .collect()
}

fn normalize_target_map(map: &Map<String, Value>) -> Vec<TargetFileEntry> {
    sorted_files(map)
        .into_iter()
        .map(|(path, content)| TargetFileEntry {
            path: path.clone(),
            language: infer_language(path).to_string(),
            content: content.to_string(),
            redacted: content.trim().is_empty(),
        })
        .collect()
}

fn category_at(categories: &[Value], idx: usize) -> String {
    categories
        .get(idx)
        .and_then(Value::as_str)
        .unwrap_or(UNKNOWN)
        .to_string()
}

/// Map one raw JSONL object onto the unified record shape.
///
/// Field-level irregularities fall back to empty defaults. The only failure is
/// an empty id, reported with `line = 0`; callers fill in the real location.
pub fn normalize_record(
    raw: &Value,
    source_file: &str,
    source_meta: &SourceMeta,
) -> Result<(IndexItem, FullRecord)> {
    let id = str_field(raw, "id");
    if id.is_empty() {
        return Err(CvdpError::MissingIdentifier {
            file: source_file.to_string(),
            line: 0,
        });
    }

    let categories = list_field(raw, "categories");
    let category = category_at(categories, 0);
    let difficulty = category_at(categories, 1);
    let title = infer_title(id);

    let sections = Sections::extract(raw, source_meta.mode);

    let context_files = normalize_file_map(sections.context);
    let harness_files = normalize_file_map(sections.harness);
    let target_files = normalize_target_map(sections.targets);

    let response_redacted = sections.response.trim().is_empty();
    let solutions_redacted = target_files.iter().all(|f| f.redacted) && response_redacted;

    let index_item = IndexItem {
        id: id.to_string(),
        dataset: source_meta.dataset.clone(),
        mode: source_meta.mode,
        task_type: source_meta.task_type,
        commercial: source_meta.commercial,
        category: category.clone(),
        difficulty: difficulty.clone(),
        title: title.clone(),
        has_system_message: !sections.system.trim().is_empty(),
        context_file_count: context_files.len(),
        harness_file_count: harness_files.len(),
        target_file_count: target_files.len(),
        has_reference_text: !response_redacted,
        solutions_redacted,
    };

    let full = FullRecord {
        meta: RecordMeta {
            id: id.to_string(),
            dataset: source_meta.dataset.clone(),
            mode: source_meta.mode,
            task_type: source_meta.task_type,
            commercial: source_meta.commercial,
            category,
            difficulty,
            title,
        },
        prompt: Prompt {
            system: sections.system.to_string(),
            user: sections.user.to_string(),
        },
        context_files,
        harness_files,
        expected_outputs: ExpectedOutputs {
            target_files,
            response_text: sections.response.to_string(),
            response_redacted,
        },
        raw: RawInfo {
            source_file: source_file.to_string(),
        },
    };

    Ok((index_item, full))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TaskType;
    use serde_json::json;

    fn agentic_meta() -> SourceMeta {
        SourceMeta {
            dataset: "agentic_code_generation_no_commercial".into(),
            mode: Mode::Agentic,
            task_type: TaskType::CodeGeneration,
            commercial: false,
        }
    }

    fn nonagentic_meta() -> SourceMeta {
        SourceMeta {
            dataset: "nonagentic_code_comprehension".into(),
            mode: Mode::Nonagentic,
            task_type: TaskType::CodeComprehension,
            commercial: false,
        }
    }

    #[test]
    fn test_infer_title() {
        assert_eq!(infer_title("cvdp_agentic_demo_case_0001"), "demo case");
        assert_eq!(infer_title("cvdp_copilot_fifo-depth_0004"), "fifo depth");
        assert_eq!(infer_title("cvdp_short_id"), "cvdp_short_id");
        assert_eq!(infer_title("plain"), "plain");
    }

    #[test]
    fn test_agentic_redacted_patch() {
        let raw = json!({
            "id": "cvdp_agentic_demo_case_0001",
            "categories": ["cid001", "medium"],
            "system_message": "system text",
            "prompt": "Build rtl module",
            "context": {
                "rtl/demo.sv": "module demo; endmodule",
                "docs/specification.md": "# Spec"
            },
            "patch": { "rtl/demo.sv": "", "rtl/other.sv": "   \n" },
            "harness": { "src/test_runner.py": "print('run')" }
        });

        let (item, full) = normalize_record(&raw, "agentic.jsonl", &agentic_meta()).unwrap();

        assert_eq!(full.prompt.system, "system text");
        assert_eq!(full.prompt.user, "Build rtl module");
        assert_eq!(full.expected_outputs.target_files.len(), 2);
        assert!(full.expected_outputs.target_files.iter().all(|f| f.redacted));
        assert_eq!(full.expected_outputs.response_text, "");
        assert!(full.expected_outputs.response_redacted);
        assert!(item.solutions_redacted);
        assert!(item.has_system_message);
        assert!(!item.has_reference_text);
        assert_eq!(item.category, "cid001");
        assert_eq!(item.difficulty, "medium");
        assert_eq!(item.title, "demo case");
        assert_eq!(item.harness_file_count, 1);
        assert_eq!(full.harness_files[0].language, "python");
        assert_eq!(full.raw.source_file, "agentic.jsonl");
    }

    #[test]
    fn test_agentic_unredacted_patch() {
        let raw = json!({
            "id": "cvdp_agentic_demo_case_0002",
            "patch": { "rtl/demo.sv": "module demo; endmodule" }
        });
        let (item, full) = normalize_record(&raw, "a.jsonl", &agentic_meta()).unwrap();
        assert!(!full.expected_outputs.target_files[0].redacted);
        assert!(!item.solutions_redacted);
    }

    #[test]
    fn test_nonagentic_reference_text() {
        let raw = json!({
            "id": "cvdp_copilot_demo_case_0002",
            "categories": ["cid009", "easy"],
            "system_message": "ignored for nonagentic",
            "input": {
                "prompt": "Explain the section",
                "context": { "verif/tb_demo.sv": "task check; endtask" }
            },
            "output": {
                "response": "The golden model is in task check.",
                "context": {}
            },
            "harness": {}
        });

        let (item, full) = normalize_record(&raw, "n.jsonl", &nonagentic_meta()).unwrap();

        assert_eq!(full.prompt.system, "");
        assert_eq!(full.prompt.user, "Explain the section");
        assert!(!full.expected_outputs.response_redacted);
        assert!(item.has_reference_text);
        assert!(!item.has_system_message);
        assert!(!item.solutions_redacted);
        assert_eq!(item.target_file_count, 0);
        assert_eq!(full.context_files[0].language, "systemverilog");
    }

    #[test]
    fn test_nonagentic_harness_shapes() {
        let nested = json!({
            "id": "cvdp_copilot_x_y_0001",
            "harness": { "files": { "b.py": "b", "a.yml": "a" } }
        });
        let (_, full) = normalize_record(&nested, "n.jsonl", &nonagentic_meta()).unwrap();
        let paths: Vec<&str> = full.harness_files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["a.yml", "b.py"]);

        let flat = json!({
            "id": "cvdp_copilot_x_y_0002",
            "harness": { "run.cmd": "echo", ".env": "A=1" }
        });
        let (_, full) = normalize_record(&flat, "n.jsonl", &nonagentic_meta()).unwrap();
        let langs: Vec<&str> = full.harness_files.iter().map(|f| f.language.as_str()).collect();
        assert_eq!(langs, vec!["bash", "batch"]);
    }

    #[test]
    fn test_context_files_sorted_by_path() {
        let raw = json!({
            "id": "cvdp_agentic_sort_case_0001",
            "context": { "z/last.sv": "", "a/first.md": "", "m/mid.py": "" }
        });
        let (_, full) = normalize_record(&raw, "a.jsonl", &agentic_meta()).unwrap();
        let paths: Vec<&str> = full.context_files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["a/first.md", "m/mid.py", "z/last.sv"]);
    }

    #[test]
    fn test_malformed_fields_degrade_to_defaults() {
        let raw = json!({
            "id": "cvdp_agentic_bad_fields_0001",
            "categories": "cid001",
            "prompt": 42,
            "system_message": null,
            "context": ["not", "a", "map"],
            "patch": { "rtl/x.sv": 7 },
            "harness": "nope"
        });
        let (item, full) = normalize_record(&raw, "a.jsonl", &agentic_meta()).unwrap();
        assert_eq!(item.category, "unknown");
        assert_eq!(item.difficulty, "unknown");
        assert_eq!(full.prompt.user, "");
        assert!(full.context_files.is_empty());
        assert!(full.harness_files.is_empty());
        assert_eq!(full.expected_outputs.target_files[0].content, "");
        assert!(full.expected_outputs.target_files[0].redacted);
    }

    #[test]
    fn test_single_category_leaves_difficulty_unknown() {
        let raw = json!({ "id": "cvdp_agentic_one_cat_0001", "categories": ["cid003"] });
        let (item, _) = normalize_record(&raw, "a.jsonl", &agentic_meta()).unwrap();
        assert_eq!(item.category, "cid003");
        assert_eq!(item.difficulty, "unknown");
    }

    #[test]
    fn test_missing_id() {
        let raw = json!({ "prompt": "no id here" });
        let err = normalize_record(&raw, "a.jsonl", &agentic_meta()).unwrap_err();
        assert!(matches!(err, CvdpError::MissingIdentifier { .. }));

        let numeric = json!({ "id": 17 });
        assert!(normalize_record(&numeric, "a.jsonl", &agentic_meta()).is_err());
    }
}
