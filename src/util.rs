use std::path::{Component, Path};

/// Render a path with `/` separators, dropping `.` components.
pub fn normalize_path(path: &Path) -> String {
    let mut parts = Vec::new();
    for comp in path.components() {
        match comp {
            Component::Normal(os) => parts.push(os.to_string_lossy().to_string()),
            Component::ParentDir => parts.push("..".to_string()),
            Component::CurDir => {}
            _ => {}
        }
    }
    if parts.is_empty() {
        ".".to_string()
    } else {
        parts.join("/")
    }
}

pub fn truncate_str_bytes(value: &str, max_bytes: usize) -> String {
    if value.len() <= max_bytes {
        return value.to_string();
    }
    let mut end = max_bytes.min(value.len());
    while end > 0 && !value.is_char_boundary(end) {
        end -= 1;
    }
    value[..end].to_string()
}

/// Collapse runs of whitespace to single spaces and cap at 200 bytes.
/// Returns an empty string when nothing printable remains.
pub fn summarize(raw: &str) -> String {
    let mut out = String::new();
    let mut last_space = false;
    for ch in raw.chars() {
        if ch.is_whitespace() {
            if !last_space && !out.is_empty() {
                out.push(' ');
                last_space = true;
            }
        } else {
            out.push(ch);
            last_space = false;
        }
    }
    let trimmed = out.trim();
    truncate_str_bytes(trimmed, 200)
}

/// True when `text` contains `word` delimited by non-identifier characters.
pub fn contains_word(text: &str, word: &str) -> bool {
    count_word(text, word) > 0
}

/// Count identifier-boundary occurrences of `word` in `text`.
pub fn count_word(text: &str, word: &str) -> usize {
    if word.is_empty() {
        return 0;
    }
    let bytes = text.as_bytes();
    let mut count = 0;
    let mut from = 0;
    while let Some(pos) = text[from..].find(word) {
        let start = from + pos;
        let end = start + word.len();
        let before_ok = start == 0 || !is_ident_byte(bytes[start - 1]);
        let after_ok = end == bytes.len() || !is_ident_byte(bytes[end]);
        if before_ok && after_ok {
            count += 1;
        }
        from = start + word.len().max(1);
    }
    count
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn normalize_drops_curdir() {
        assert_eq!(normalize_path(&PathBuf::from("./src/./api/user.ts")), "src/api/user.ts");
        assert_eq!(normalize_path(&PathBuf::from(".")), ".");
    }

    #[test]
    fn summarize_collapses_whitespace() {
        assert_eq!(summarize("  const  x =\n\t1;  "), "const x = 1;");
        assert_eq!(summarize("   \n\t "), "");
    }

    #[test]
    fn summarize_caps_length() {
        let long = "x".repeat(500);
        assert_eq!(summarize(&long).len(), 200);
    }

    #[test]
    fn word_boundaries() {
        assert!(contains_word("import { getUser } from './api'", "getUser"));
        assert!(!contains_word("getUserById(1)", "getUser"));
        assert!(!contains_word("$getUser", "getUser"));
        assert_eq!(count_word("getUser(); getUser()", "getUser"), 2);
    }
}
