//! Path normalization applied before paths reach the engine.

/// URI scheme prefix accepted on local paths.
pub const FILE_SCHEME: &str = "file://";

/// Strips the `file://` scheme from a user supplied path.
///
/// Paths without the prefix are returned unchanged. Repeated prefixes are all
/// stripped so normalizing twice never changes the result: `file://file:///a`
/// becomes `/a`, not `file:///a` as a single-prefix strip would give.
///
/// # Example
///
/// ```
/// use nativefs_types::normalize_file_path;
///
/// assert_eq!(normalize_file_path("file:///a/b"), "/a/b");
/// assert_eq!(normalize_file_path("/a/b"), "/a/b");
/// assert_eq!(normalize_file_path("file://file:///a"), "/a");
/// ```
#[must_use]
pub fn normalize_file_path(path: &str) -> &str {
    path.trim_start_matches(FILE_SCHEME)
}
