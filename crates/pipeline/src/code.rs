//! Extraction of source code from a model response, and filename suggestion.

use crate::TargetLanguage;

/// Markdown code fence delimiter.
pub const FENCE: &str = "```";

/// Base name of every suggested output file.
pub const FILENAME_STEM: &str = "generated_code";

/// Extension used when the language is not in [`EXTENSIONS`].
pub const FALLBACK_EXTENSION: &str = ".txt";

/// Language name (lowercase) → file extension.
pub const EXTENSIONS: &[(&str, &str)] = &[
    ("python", ".py"),
    ("javascript", ".js"),
    ("typescript", ".ts"),
    ("java", ".java"),
    ("cpp", ".cpp"),
    ("c++", ".cpp"),
    ("c", ".c"),
    ("c#", ".cs"),
    ("csharp", ".cs"),
    ("go", ".go"),
    ("rust", ".rs"),
    ("ruby", ".rb"),
    ("php", ".php"),
    ("swift", ".swift"),
    ("kotlin", ".kt"),
];

/// Info-string tags that may open a fenced block and are not part of the code.
const KNOWN_TAGS: &[&str] = &[
    "python", "py", "python3", "javascript", "js", "typescript", "ts", "java", "cpp", "c++", "c",
    "cs", "csharp", "c#", "go", "golang", "rust", "rs", "ruby", "rb", "php", "swift", "kotlin",
    "kt", "bash", "sh", "shell",
];

/// Source code pulled out of a model response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedCode {
    /// The code, fenced blocks concatenated in order.
    pub code: String,
    /// Prose before the first fence, trimmed. `None` when there was no fence
    /// or the response opened directly with one.
    pub preamble: Option<String>,
}

/// Extracts code from `response`.
///
/// When the response contains fences it is split on them and every odd
/// segment is a code block. A first line naming a known language (or
/// `language` itself) is dropped, each block is trimmed, and blocks are joined
/// with a blank line. Without fences the whole response is the code, verbatim.
pub fn extract_code(response: &str, language: &TargetLanguage) -> ExtractedCode {
    if !response.contains(FENCE) {
        return ExtractedCode {
            code: response.to_string(),
            preamble: None,
        };
    }

    let parts: Vec<&str> = response.split(FENCE).collect();
    let blocks: Vec<&str> = parts
        .iter()
        .skip(1)
        .step_by(2)
        .map(|block| {
            strip_language_tag(block, language)
                .trim_start_matches(['\n', '\r'])
                .trim_end()
        })
        .filter(|block| !block.is_empty())
        .collect();

    let preamble = parts
        .first()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .map(str::to_string);

    ExtractedCode {
        code: blocks.join("\n\n"),
        preamble,
    }
}

/// Drops the block's first line if it is a language tag.
fn strip_language_tag<'a>(block: &'a str, language: &TargetLanguage) -> &'a str {
    let (first, rest) = block.split_once('\n').unwrap_or((block, ""));
    let tag = first.trim().to_lowercase();
    if tag.is_empty() || KNOWN_TAGS.contains(&tag.as_str()) || tag == language.key() {
        rest
    } else {
        block
    }
}

/// Returns the extension for `language` (case-insensitive), or
/// [`FALLBACK_EXTENSION`].
pub fn extension_for(language: &TargetLanguage) -> &'static str {
    let key = language.key();
    EXTENSIONS
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, ext)| *ext)
        .unwrap_or(FALLBACK_EXTENSION)
}

/// Suggested filename for code in `language`, e.g. `generated_code.py`.
pub fn filename_for(language: &TargetLanguage) -> String {
    format!("{FILENAME_STEM}{}", extension_for(language))
}
