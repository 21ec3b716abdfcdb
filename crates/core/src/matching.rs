//! Glob evaluation for catalog patterns.
//!
//! A [`PathPattern`] names a literal directory and a filename glob. Evaluating it lists
//! that one directory and keeps the regular files whose names match. Matches are sorted
//! by file name so that "first match" is stable across platforms and runs.

use crate::paths::PathPattern;
use globset::{Glob, GlobMatcher};
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Compiles a filename glob.
pub(crate) fn compile(file_glob: &str) -> Result<GlobMatcher, globset::Error> {
    Ok(Glob::new(file_glob)?.compile_matcher())
}

/// Returns every file matching `pattern` under `workspace_root`.
///
/// A missing or unreadable directory is not an error: it simply has no matches.
pub fn find_matches(workspace_root: &Path, pattern: &PathPattern) -> Vec<PathBuf> {
    let matcher = match compile(pattern.file_glob()) {
        Ok(matcher) => matcher,
        Err(e) => {
            tracing::warn!("invalid glob {}: {}", pattern.file_glob(), e);
            return Vec::new();
        }
    };

    list_matching(&workspace_root.join(pattern.dir()), &matcher)
}

/// Lists the regular files in `dir` whose names match `matcher`, sorted by name.
///
/// An unreadable directory has no matches.
pub(crate) fn list_matching(dir: &Path, matcher: &GlobMatcher) -> Vec<PathBuf> {
    match try_list_matching(dir, matcher) {
        Ok(matches) => matches,
        Err(e) => {
            tracing::debug!("no matches in {}: {}", dir.display(), e);
            Vec::new()
        }
    }
}

/// Like [`list_matching`], but reports why `dir` could not be read.
///
/// Names starting with `.` are skipped, as a shell `*` would skip them.
pub(crate) fn try_list_matching(dir: &Path, matcher: &GlobMatcher) -> io::Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir)?;

    let mut matches: Vec<PathBuf> = entries
        .flatten()
        .filter(|entry| {
            let name = entry.file_name();
            if name.to_string_lossy().starts_with('.') {
                return false;
            }
            matcher.is_match(Path::new(&name)) && entry.path().is_file()
        })
        .map(|entry| entry.path())
        .collect();

    matches.sort();
    Ok(matches)
}

/// Expresses `path` relative to `workspace_root` as a `/`-separated string.
///
/// Returns `None` when `path` is not inside `workspace_root`.
pub fn relative_posix(workspace_root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(workspace_root).ok()?;
    let parts: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    if parts.is_empty() {
        return None;
    }
    Some(parts.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::{FileRole, PatternCatalog};
    use bidsprep_types::PatientId;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"").unwrap();
    }

    #[test]
    fn test_find_matches_filters_by_suffix() {
        let temp = TempDir::new().unwrap();
        let anat = temp.path().join("sub-01/anat");
        touch(&anat.join("sub-01_flair.nii"));
        touch(&anat.join("sub-01_flair.nii.gz"));
        touch(&anat.join("sub-01_T1w.nii.gz"));

        let catalog = PatternCatalog::for_patient(&PatientId::new("sub-01").unwrap());
        let patterns = catalog.patterns(FileRole::Flair);

        let nii = find_matches(temp.path(), &patterns[0]);
        assert_eq!(nii, vec![anat.join("sub-01_flair.nii")]);

        let gz = find_matches(temp.path(), &patterns[1]);
        assert_eq!(gz, vec![anat.join("sub-01_flair.nii.gz")]);
    }

    #[test]
    fn test_find_matches_sorted_and_skips_hidden_and_dirs() {
        let temp = TempDir::new().unwrap();
        let anat = temp.path().join("sub-01/anat");
        touch(&anat.join("b_flair.nii"));
        touch(&anat.join("a_flair.nii"));
        touch(&anat.join(".hidden_flair.nii"));
        fs::create_dir_all(anat.join("dir_flair.nii")).unwrap();

        let catalog = PatternCatalog::for_patient(&PatientId::new("sub-01").unwrap());
        let matches = find_matches(temp.path(), &catalog.patterns(FileRole::Flair)[0]);

        assert_eq!(
            matches,
            vec![anat.join("a_flair.nii"), anat.join("b_flair.nii")]
        );
    }

    #[test]
    fn test_find_matches_missing_dir_is_empty() {
        let temp = TempDir::new().unwrap();
        let catalog = PatternCatalog::for_patient(&PatientId::new("sub-09").unwrap());

        for pattern in catalog.patterns(FileRole::SkullStripped) {
            assert!(find_matches(temp.path(), &pattern).is_empty());
        }
        assert!(find_matches(
            &temp.path().join("missing-root"),
            &catalog.patterns(FileRole::Flair)[0]
        )
        .is_empty());
    }

    #[test]
    fn test_relative_posix() {
        let root = Path::new("/ws");
        assert_eq!(
            relative_posix(root, Path::new("/ws/sub-01/anat/x_flair.nii")).as_deref(),
            Some("sub-01/anat/x_flair.nii")
        );
        assert_eq!(relative_posix(root, Path::new("/other/x.nii")), None);
        assert_eq!(relative_posix(root, root), None);
    }
}
