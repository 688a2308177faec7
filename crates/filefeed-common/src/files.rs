//! Upload-directory naming policy
//!
//! File names arrive from untrusted clients; [`sanitize_file_name`] strips
//! path separators and collapses noisy characters, and [`unique_path`] picks
//! a non-colliding path inside the upload directory.

use std::path::{Path, PathBuf};

/// Clean a client-submitted file name.
///
/// Runs of spaces, separators, dashes, and dots in the stem collapse into a
/// single dash; leading and trailing dashes are stripped; the extension is
/// preserved as-is.
///
/// ```
/// use filefeed_common::files::sanitize_file_name;
///
/// assert_eq!(sanitize_file_name("my  report./v2.txt"), "my-report-v2.txt");
/// ```
pub fn sanitize_file_name(name: &str) -> String {
    let (stem, extension) = split_extension(name);

    let mut cleaned = String::with_capacity(stem.len());
    let mut in_run = false;
    for ch in stem.chars() {
        if matches!(ch, ' ' | '/' | '\\' | '-' | '.') {
            if !in_run {
                cleaned.push('-');
            }
            in_run = true;
        } else {
            cleaned.push(ch);
            in_run = false;
        }
    }

    let cleaned = cleaned.replace(":-", ":");
    let cleaned = cleaned.trim_matches('-');

    if cleaned.is_empty() {
        format!("file{}", extension)
    } else {
        format!("{}{}", cleaned, extension)
    }
}

/// Pick a path under `dir` that does not collide with an existing file.
///
/// When `file_name` is taken, an incrementing `_N` suffix is appended to the
/// stem until an unused path is found. The check-then-use window is not
/// atomic across concurrent writers.
pub fn unique_path(dir: &Path, file_name: &str) -> PathBuf {
    let candidate = dir.join(file_name);
    if !candidate.exists() {
        return candidate;
    }

    let (stem, extension) = split_extension(file_name);
    for i in 1u64.. {
        let candidate = dir.join(format!("{}_{}{}", stem, i, extension));
        if !candidate.exists() {
            return candidate;
        }
    }
    unreachable!("suffix counter exhausted")
}

/// Split `name.ext` into `("name", ".ext")`; dotfiles and extensionless
/// names keep an empty extension.
fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) if idx > 0 => name.split_at(idx),
        _ => (name, ""),
    }
}
