//! Slug allocation for new posts.

use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum SlugError {
    #[error("Failed to scan {path}: {source}")]
    Scan {
        path: String,
        #[source]
        source: walkdir::Error,
    },

    #[error("No number left after {category}{max}")]
    Exhausted { category: String, max: u64 },
}

static DIGITS_REGEX: OnceLock<Regex> = OnceLock::new();

fn digits_regex() -> &'static Regex {
    DIGITS_REGEX.get_or_init(|| Regex::new(r"[0-9]+").unwrap())
}

/// Return the next free slug for `category` under `base_dir`.
///
/// Looks at immediate subdirectories whose name starts with the category
/// prefix, takes the first run of ASCII digits in each name and returns the
/// prefix followed by the maximum plus one. Names without digits are ignored.
///
/// # Examples
///
/// ```
/// use autoblog_core::slug::next_slug;
///
/// let slug = next_slug("region", std::path::Path::new("/nonexistent/blog/2025")).unwrap();
/// assert_eq!(slug, "region1");
/// ```
pub fn next_slug(category: &str, base_dir: &Path) -> Result<String, SlugError> {
    if !base_dir.exists() {
        return Ok(format!("{}1", category));
    }

    let mut max_num: u64 = 0;

    for entry in WalkDir::new(base_dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|source| SlugError::Scan {
            path: base_dir.display().to_string(),
            source,
        })?;
        if !entry.file_type().is_dir() {
            continue;
        }

        let name = entry.file_name().to_string_lossy();
        if !name.starts_with(category) {
            continue;
        }

        match slug_number(&name) {
            Some(num) => max_num = max_num.max(num),
            None => tracing::debug!("Ignoring {:?}: no number in slug", name),
        }
    }

    let next = max_num.checked_add(1).ok_or_else(|| SlugError::Exhausted {
        category: category.to_string(),
        max: max_num,
    })?;
    Ok(format!("{}{}", category, next))
}

/// First run of digits in a directory name
fn slug_number(name: &str) -> Option<u64> {
    digits_regex()
        .find(name)
        .and_then(|m| m.as_str().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_missing_base_dir() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("2025");
        assert_eq!(next_slug("nisa-start-guide", &missing).unwrap(), "nisa-start-guide1");
    }

    #[test]
    fn test_empty_base_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(next_slug("nisa-start-guide", dir.path()).unwrap(), "nisa-start-guide1");
    }

    #[test]
    fn test_takes_max_plus_one() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["nisa-start-guide3", "nisa-start-guide7", "nisa-start-guideX"] {
            fs::create_dir(dir.path().join(name)).unwrap();
        }

        assert_eq!(next_slug("nisa-start-guide", dir.path()).unwrap(), "nisa-start-guide8");
    }

    #[test]
    fn test_other_categories_and_files_ignored() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("region12")).unwrap();
        fs::create_dir(dir.path().join("mutual-fund2")).unwrap();
        // A plain file with a matching name is not a post directory
        fs::write(dir.path().join("region40"), "").unwrap();

        assert_eq!(next_slug("region", dir.path()).unwrap(), "region13");
        assert_eq!(next_slug("mutual-fund", dir.path()).unwrap(), "mutual-fund3");
        assert_eq!(next_slug("life-plan", dir.path()).unwrap(), "life-plan1");
    }

    #[test]
    fn test_nested_directories_not_scanned() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("region2").join("region99")).unwrap();

        assert_eq!(next_slug("region", dir.path()).unwrap(), "region3");
    }

    #[test]
    fn test_slug_number() {
        assert_eq!(slug_number("region10"), Some(10));
        assert_eq!(slug_number("region-old"), None);
        assert_eq!(slug_number("region5-draft2"), Some(5));
        assert_eq!(slug_number("region٣"), None);
    }

    #[test]
    fn test_number_overflow_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join(format!("region{}", u64::MAX))).unwrap();

        let err = next_slug("region", dir.path()).unwrap_err();
        assert!(matches!(err, SlugError::Exhausted { max: u64::MAX, .. }));
    }
}
