use std::path::Path;

/// Extension (lowercase, no dot) -> display language.
const LANGUAGE_BY_EXT: &[(&str, &str)] = &[
    ("sv", "systemverilog"),
    ("v", "systemverilog"),
    ("vh", "systemverilog"),
    ("py", "python"),
    ("md", "markdown"),
    ("yml", "yaml"),
    ("yaml", "yaml"),
    ("tcl", "tcl"),
    ("cmd", "batch"),
    ("txt", "text"),
];

const FALLBACK_LANGUAGE: &str = "text";

/// Infer the display language of an embedded file from its path.
///
/// Dotfiles without a further extension (`.env`, `.gitignore`) are shell
/// configuration and map to `bash`. Anything unrecognised is `text`.
pub fn infer_language(file_path: &str) -> &'static str {
    let name = Path::new(file_path)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(file_path);

    if name.starts_with('.') && name.matches('.').count() == 1 {
        return "bash";
    }

    let ext = match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => ext.to_ascii_lowercase(),
        _ => return FALLBACK_LANGUAGE,
    };

    LANGUAGE_BY_EXT
        .iter()
        .find(|(known, _)| *known == ext)
        .map(|(_, lang)| *lang)
        .unwrap_or(FALLBACK_LANGUAGE)
}
