//! Path normalization shared by every host.
//!
//! A routing parameter like `users/list`, `/users/list/` or `users//list`
//! names the same procedure. The normalized form has exactly one leading
//! slash, no trailing slash and no empty segments.

/// Canonicalize a routing path.
///
/// Empty input (or input made only of slashes) normalizes to `/`.
pub fn normalize_path(path: &str) -> String {
    let mut normalized = String::with_capacity(path.len() + 1);
    for segment in path.split('/').filter(|s| !s.is_empty()) {
        normalized.push('/');
        normalized.push_str(segment);
    }
    if normalized.is_empty() {
        normalized.push('/');
    }
    normalized
}
