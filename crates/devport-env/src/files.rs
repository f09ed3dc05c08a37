//! Small file utilities used by command handlers.

use std::path::Path;

use crate::error::EnvError;

/// Replace every occurrence of `from` with `to` in the file at `path`.
///
/// Literal substitution, no pattern syntax. The file is rewritten in
/// place.
pub fn replace_in_file(path: &Path, from: &str, to: &str) -> Result<(), EnvError> {
    let content = std::fs::read_to_string(path)?;
    std::fs::write(path, content.replace(from, to))?;
    Ok(())
}

/// Read and parse a JSON file.
pub fn read_json(path: &Path) -> Result<serde_json::Value, EnvError> {
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|source| EnvError::Json {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replace_rewrites_all_occurrences() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("package.json");
        std::fs::write(&file, r#"{"name":"old-name","main":"old-name.js"}"#).unwrap();

        replace_in_file(&file, "old-name", "new-name").unwrap();

        let content = std::fs::read_to_string(&file).unwrap();
        assert_eq!(content, r#"{"name":"new-name","main":"new-name.js"}"#);
    }

    #[test]
    fn read_json_parses_object() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("meta.json");
        std::fs::write(&file, r#"{"name":"demo"}"#).unwrap();

        let value = read_json(&file).unwrap();
        assert_eq!(value["name"], "demo");
    }

    #[test]
    fn read_json_rejects_invalid_content() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("broken.json");
        std::fs::write(&file, "not json").unwrap();

        assert!(matches!(read_json(&file), Err(EnvError::Json { .. })));
    }
}
