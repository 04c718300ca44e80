//! Writing generated source to disk.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use pipeline::GeneratedCode;
use tracing::info;

/// Writes `code.source_text()` to `target`, or to the suggested filename in
/// the working directory when no target is given. Existing files are
/// overwritten. Returns the path written.
pub fn save_code(code: &GeneratedCode, target: Option<&Path>) -> Result<PathBuf> {
    let path = match target {
        Some(p) if p.is_dir() => p.join(code.filename()),
        Some(p) => p.to_path_buf(),
        None => PathBuf::from(code.filename()),
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    std::fs::write(&path, code.source_text())
        .with_context(|| format!("Failed to write {}", path.display()))?;

    info!(path = %path.display(), bytes = code.source_text().len(), "generated code saved");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> GeneratedCode {
        GeneratedCode::new("print(1 + 2)\n", "generated_code.py", "Adds.")
    }

    #[test]
    fn directory_target_uses_suggested_filename() {
        let dir = tempfile::tempdir().unwrap();
        let written = save_code(&sample(), Some(dir.path())).unwrap();

        assert_eq!(written, dir.path().join("generated_code.py"));
        assert_eq!(std::fs::read_to_string(written).unwrap(), "print(1 + 2)\n");
    }

    #[test]
    fn file_target_is_used_verbatim_and_parents_created() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out").join("sum.py");

        let written = save_code(&sample(), Some(target.as_path())).unwrap();

        assert_eq!(written, target);
        assert!(target.is_file());
    }

    #[test]
    fn existing_file_is_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("sum.py");
        std::fs::write(&target, "old").unwrap();

        save_code(&sample(), Some(target.as_path())).unwrap();
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "print(1 + 2)\n");
    }
}
