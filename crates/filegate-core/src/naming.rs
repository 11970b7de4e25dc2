//! Storage names and display names.
//!
//! The storage name is the backend key of a file: a fresh UUID plus the
//! lower-cased original extension. The display name is derived separately
//! from user input and is never used to address bytes.

use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;
use uuid::Uuid;

const MAX_EXTENSION_LEN: usize = 8;

/// Path separators, control characters and runs of two or more dots.
static UNSAFE_SEQUENCES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[/\\\p{Cc}]|\.{2,}").expect("static pattern"));

static WHITESPACE_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("static pattern"));

/// `base.ext` where ext is 1-8 characters that are neither whitespace nor dots.
static TRAILING_EXTENSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*)\.([^\s.]{1,8})$").expect("static pattern"));

/// Lower-cased extension of the last path component, if it is a plain
/// alphanumeric token of at most 8 characters.
pub fn storage_extension(original_name: &str) -> Option<String> {
    let file_name = original_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(original_name);
    let (base, ext) = file_name.rsplit_once('.')?;
    if base.is_empty()
        || ext.is_empty()
        || ext.len() > MAX_EXTENSION_LEN
        || !ext.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Generate a collision-resistant storage name for an upload.
///
/// Every call yields a new identifier, even for identical input.
pub fn generate_storage_name(original_name: &str) -> String {
    let id = Uuid::new_v4();
    match storage_extension(original_name) {
        Some(ext) => format!("{}.{}", id, ext),
        None => id.to_string(),
    }
}

/// Sanitize a user-supplied file name for display.
///
/// Returns an empty string when no safe name with an extension can be
/// recovered; callers must then suppress the display name entirely.
/// `max_length` counts characters and includes the extension.
pub fn sanitize_display_name(name: &str, max_length: usize) -> String {
    let normalized: String = name.nfc().collect();
    let replaced = UNSAFE_SEQUENCES.replace_all(&normalized, " ");
    let collapsed = WHITESPACE_RUNS.replace_all(&replaced, " ");
    let candidate = collapsed.trim();

    let Some(captures) = TRAILING_EXTENSION.captures(candidate) else {
        return String::new();
    };
    let base = captures.get(1).map_or("", |m| m.as_str()).trim_end();
    let ext = captures.get(2).map_or("", |m| m.as_str());
    if base.is_empty() || ext.is_empty() {
        return String::new();
    }

    let ext_len = ext.chars().count();
    let base_len = base.chars().count();
    if base_len + 1 + ext_len <= max_length {
        return format!("{}.{}", base, ext);
    }

    // Need room for at least one base character, the dot and the extension.
    if max_length < ext_len + 2 {
        return String::new();
    }
    let keep = max_length - ext_len - 1;
    let truncated: String = base.chars().take(keep).collect();
    let truncated = truncated.trim_end();
    if truncated.is_empty() {
        return String::new();
    }
    format!("{}.{}", truncated, ext)
}
