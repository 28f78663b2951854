//! Project-file path gate.

const MARKDOWN_SUFFIX: &str = ".md";

/// True iff `path` is a tracked project file: it starts with the configured
/// folder prefix, ends with the markdown extension, and no path segment is
/// prefixed with an underscore (template/archive subfolders).
///
/// Pure and deterministic; paths are vault-relative with `/` separators.
#[must_use]
pub fn is_project_file(prefix: &str, path: &str) -> bool {
    path.starts_with(prefix)
        && path.ends_with(MARKDOWN_SUFFIX)
        && !path.split('/').any(|segment| segment.starts_with('_'))
}
