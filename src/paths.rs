//! Small path helpers shared by directory walkers.

use std::path::Path;

/// True when `path` has one of the `allowed` extensions (ASCII case-insensitive).
pub(crate) fn has_extension<S: AsRef<str>>(path: &Path, allowed: &[S]) -> bool {
    let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
        return false;
    };

    allowed
        .iter()
        .any(|allowed_ext| ext.eq_ignore_ascii_case(allowed_ext.as_ref()))
}

/// `path` relative to `root`, with `/` separators on every platform.
pub(crate) fn rel_string(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.to_string_lossy().replace('\\', "/")
}

/// File stem as an owned string; the join key between images and labels.
pub(crate) fn base_name(path: &Path) -> Option<String> {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_match_ignores_case() {
        assert!(has_extension(Path::new("a/B.JPG"), &["jpg", "png"]));
        assert!(has_extension(Path::new("b.Png"), &["jpg", "png"]));
        assert!(!has_extension(Path::new("c.gif"), &["jpg", "png"]));
        assert!(!has_extension(Path::new("README"), &["txt"]));
    }

    #[test]
    fn rel_string_uses_forward_slashes() {
        let root = Path::new("/data/images");
        let path = root.join("task1").join("cat.jpg");
        assert_eq!(rel_string(root, &path), "task1/cat.jpg");
    }

    #[test]
    fn base_name_drops_only_last_extension() {
        assert_eq!(
            base_name(Path::new("x/frame.0001.png")).as_deref(),
            Some("frame.0001")
        );
    }
}
