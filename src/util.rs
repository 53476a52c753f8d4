// src/util.rs — Small string and path helpers shared across modules

use std::path::Path;

/// Longest prefix of `s` that fits in `max_len` bytes without splitting a
/// UTF-8 character.
pub fn truncate_str(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        return s;
    }
    let end = (0..=max_len).rev().find(|&i| s.is_char_boundary(i)).unwrap_or(0);
    &s[..end]
}

/// File name component of `path`, or the whole string when there is none.
pub fn basename(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}
