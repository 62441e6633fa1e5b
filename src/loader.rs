//! Declaration-inventory reader.
//!
//! The inventory is the contract with the external source loader: a JSON
//! array of `SourceFile` records (path, import specifiers, declarations).
//! This module only deserializes; it never parses source code.

use crate::model::SourceFile;
use anyhow::{Context, Result};
use std::path::Path;

/// Read a declaration inventory from a JSON file.
pub fn load_inventory(path: &Path) -> Result<Vec<SourceFile>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read inventory {}", path.display()))?;
    parse_inventory(&text).with_context(|| format!("parse inventory {}", path.display()))
}

pub fn parse_inventory(text: &str) -> Result<Vec<SourceFile>> {
    let files: Vec<SourceFile> = serde_json::from_str(text)?;
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_inventory() {
        let files = parse_inventory(
            r#"[
                {"path": "src/a.ts", "imports": ["./b"]},
                {"path": "src/b.ts"}
            ]"#,
        )
        .unwrap();
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].imports, vec!["./b".to_string()]);
        assert!(files[1].declarations.is_empty());
    }

    #[test]
    fn rejects_malformed_inventory() {
        assert!(parse_inventory("{\"not\": \"an array\"}").is_err());
        assert!(parse_inventory("[{\"imports\": []}]").is_err());
    }
}
