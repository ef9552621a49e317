//! Shell-like path expansion for configured paths.

use std::path::{Path, PathBuf};

/// Expands a leading `~` and `$VAR` references.
///
/// Unknown variables are left untouched rather than failing. Blank input
/// yields an empty path.
#[must_use]
pub fn expand(path: &str) -> PathBuf {
    let path = path.trim();

    if path.is_empty() {
        return PathBuf::new();
    }

    let expanded = shellexpand::full(path).unwrap_or_else(|_| shellexpand::tilde(path));
    PathBuf::from(expanded.as_ref())
}

/// Expands `path` and resolves it against `base_dir` if it is still relative.
///
/// Config files use this so that `"source": { "path": "photos" }` means the
/// `photos` directory next to the file.
#[must_use]
pub fn expand_and_resolve(path: &str, base_dir: &Path) -> PathBuf {
    let expanded = expand(path);

    if expanded.as_os_str().is_empty() || expanded.is_absolute() {
        return expanded;
    }

    base_dir.join(expanded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_empty() {
        assert_eq!(expand(""), PathBuf::new());
        assert_eq!(expand("   "), PathBuf::new());
    }

    #[test]
    fn test_expand_absolute_path() {
        assert_eq!(expand("/srv/wallpapers"), PathBuf::from("/srv/wallpapers"));
    }

    #[test]
    fn test_expand_relative_path() {
        assert_eq!(expand("photos/2024"), PathBuf::from("photos/2024"));
    }

    #[test]
    fn test_expand_tilde_path() {
        let result = expand("~/Pictures/wallpaper.png");
        assert!(!result.to_string_lossy().starts_with('~'));
        assert!(result.to_string_lossy().ends_with("Pictures/wallpaper.png"));
    }

    #[test]
    fn test_expand_unknown_variable_is_kept() {
        let result = expand("$CHUNKWALL_TEST_SURELY_UNSET_VAR/x");
        assert!(result.to_string_lossy().ends_with("/x"));
    }

    #[test]
    fn test_expand_and_resolve_relative() {
        let base = PathBuf::from("/home/me/.config/chunkwall");
        assert_eq!(expand_and_resolve("photos", &base), base.join("photos"));
    }

    #[test]
    fn test_expand_and_resolve_absolute() {
        let base = PathBuf::from("/base/dir");
        assert_eq!(expand_and_resolve("/absolute/path", &base), PathBuf::from("/absolute/path"));
    }

    #[test]
    fn test_expand_and_resolve_tilde_ignores_base() {
        let base = PathBuf::from("/base/dir");
        let result = expand_and_resolve("~/Pictures", &base);
        assert!(!result.to_string_lossy().contains("/base/dir"));
        assert!(result.to_string_lossy().ends_with("Pictures"));
    }

    #[test]
    fn test_expand_and_resolve_empty_stays_empty() {
        assert_eq!(expand_and_resolve("", Path::new("/base")), PathBuf::new());
    }
}
