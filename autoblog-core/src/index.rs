//! In-place updates of the category page, the site index and the sitemap.
//!
//! Every artifact is updated by searching for a fixed marker and splicing a
//! pre-rendered fragment next to it. An artifact that is missing, or that
//! lacks its marker, is left alone and reported.

use crate::category::Category;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// New cards go in front of the first existing article comment
pub const CATEGORY_MARKER: &str = "<!-- 記事";
pub const SITEMAP_MARKER: &str = "</urlset>";
pub const SITE_INDEX_FILE: &str = "index.html";

#[derive(Error, Debug)]
pub enum IndexError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Rendered snippets for one post
#[derive(Debug, Clone, Default)]
pub struct IndexFragments {
    pub category_card: String,
    pub index_card: String,
    pub sitemap_entry: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated,
    MissingFile,
    MissingMarker,
}

/// What happened to each artifact during one update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexReport {
    pub category_page: UpdateOutcome,
    pub site_index: UpdateOutcome,
    pub sitemap: UpdateOutcome,
}

impl IndexReport {
    pub fn all_updated(&self) -> bool {
        [self.category_page, self.site_index, self.sitemap]
            .iter()
            .all(|o| *o == UpdateOutcome::Updated)
    }
}

pub struct IndexUpdater {
    blog_dir: PathBuf,
    sitemap_path: PathBuf,
}

impl IndexUpdater {
    pub fn new(blog_dir: impl Into<PathBuf>, sitemap_path: impl Into<PathBuf>) -> Self {
        Self {
            blog_dir: blog_dir.into(),
            sitemap_path: sitemap_path.into(),
        }
    }

    /// Splice `fragments` into the three artifacts for a post in `category`.
    pub fn update(
        &self,
        category: Category,
        fragments: &IndexFragments,
    ) -> Result<IndexReport, IndexError> {
        let category_page = self.blog_dir.join(category.page_file());
        let category_page = splice_file(&category_page, |content| {
            insert_before(content, CATEGORY_MARKER, &fragments.category_card)
        })?;

        let site_index = self.blog_dir.join(SITE_INDEX_FILE);
        let marker = category.index_marker();
        let site_index = splice_file(&site_index, |content| {
            insert_after(content, marker, &format!("\n{}", fragments.index_card))
        })?;

        let sitemap = splice_file(&self.sitemap_path, |content| {
            insert_before(content, SITEMAP_MARKER, &fragments.sitemap_entry)
        })?;

        Ok(IndexReport {
            category_page,
            site_index,
            sitemap,
        })
    }
}

fn splice_file<F>(path: &Path, splice: F) -> Result<UpdateOutcome, IndexError>
where
    F: FnOnce(&str) -> Option<String>,
{
    if !path.is_file() {
        tracing::warn!("{:?} not found; skipping", path);
        return Ok(UpdateOutcome::MissingFile);
    }

    let content = fs::read_to_string(path).map_err(|source| IndexError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let Some(updated) = splice(&content) else {
        tracing::warn!("Insertion marker not found in {:?}; skipping", path);
        return Ok(UpdateOutcome::MissingMarker);
    };

    fs::write(path, updated).map_err(|source| IndexError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!("Updated {:?}", path);

    Ok(UpdateOutcome::Updated)
}

/// Insert `fragment` immediately before the first `marker`.
pub fn insert_before(content: &str, marker: &str, fragment: &str) -> Option<String> {
    let pos = content.find(marker)?;
    let mut out = String::with_capacity(content.len() + fragment.len());
    out.push_str(&content[..pos]);
    out.push_str(fragment);
    out.push_str(&content[pos..]);
    Some(out)
}

/// Insert `fragment` immediately after the first `marker`.
pub fn insert_after(content: &str, marker: &str, fragment: &str) -> Option<String> {
    let pos = content.find(marker)? + marker.len();
    let mut out = String::with_capacity(content.len() + fragment.len());
    out.push_str(&content[..pos]);
    out.push_str(fragment);
    out.push_str(&content[pos..]);
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fragments() -> IndexFragments {
        IndexFragments {
            category_card: "<!-- 記事: region3 -->\n<article>new</article>\n\n".into(),
            index_card: "<a class=\"card\">new</a>\n\n".into(),
            sitemap_entry: "  <url><loc>new</loc></url>\n".into(),
        }
    }

    #[test]
    fn test_insert_before_first_marker_only() {
        let content = "a<!-- 記事: x -->b<!-- 記事: y -->";
        let out = insert_before(content, CATEGORY_MARKER, "NEW").unwrap();
        assert_eq!(out, "aNEW<!-- 記事: x -->b<!-- 記事: y -->");
    }

    #[test]
    fn test_insert_after_marker() {
        let out = insert_after("head<!-- m -->tail", "<!-- m -->", "\ncard").unwrap();
        assert_eq!(out, "head<!-- m -->\ncardtail");
        assert!(insert_after("nothing", "<!-- m -->", "x").is_none());
    }

    #[test]
    fn test_update_all_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let blog = dir.path().join("blog");
        fs::create_dir(&blog).unwrap();
        fs::write(
            blog.join("category-region.html"),
            "<main>\n<!-- 記事: region2 -->\n<article>old</article>\n</main>",
        )
        .unwrap();
        fs::write(
            blog.join("index.html"),
            "<!-- NISA 系（日付降順） -->\n<!-- 投資信託 系 -->\n<a>old</a>",
        )
        .unwrap();
        let sitemap = dir.path().join("sitemap.xml");
        fs::write(&sitemap, "<urlset>\n  <url><loc>old</loc></url>\n</urlset>\n").unwrap();

        let report = IndexUpdater::new(&blog, &sitemap)
            .update(Category::Region, &fragments())
            .unwrap();
        assert!(report.all_updated());

        let page = fs::read_to_string(blog.join("category-region.html")).unwrap();
        assert!(page.find("region3").unwrap() < page.find("region2").unwrap());

        let index = fs::read_to_string(blog.join("index.html")).unwrap();
        assert_eq!(
            index,
            "<!-- NISA 系（日付降順） -->\n<!-- 投資信託 系 -->\n<a class=\"card\">new</a>\n\n\n<a>old</a>"
        );

        let map = fs::read_to_string(&sitemap).unwrap();
        assert!(map.ends_with("  <url><loc>new</loc></url>\n</urlset>\n"));
    }

    #[test]
    fn test_nisa_card_goes_under_nisa_marker() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("index.html"),
            "<!-- NISA 系（日付降順） -->\n<!-- 投資信託 系 -->\n",
        )
        .unwrap();

        IndexUpdater::new(dir.path(), dir.path().join("sitemap.xml"))
            .update(Category::NisaStartGuide, &fragments())
            .unwrap();

        let index = fs::read_to_string(dir.path().join("index.html")).unwrap();
        assert!(index.starts_with("<!-- NISA 系（日付降順） -->\n<a class=\"card\">new</a>"));
    }

    #[test]
    fn test_missing_files_and_markers_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let original = "<html><body>no markers</body></html>";
        fs::write(dir.path().join("category-life-plan.html"), original).unwrap();

        let report = IndexUpdater::new(dir.path(), dir.path().join("sitemap.xml"))
            .update(Category::LifePlan, &fragments())
            .unwrap();

        assert_eq!(report.category_page, UpdateOutcome::MissingMarker);
        assert_eq!(report.site_index, UpdateOutcome::MissingFile);
        assert_eq!(report.sitemap, UpdateOutcome::MissingFile);
        assert!(!report.all_updated());
        assert_eq!(
            fs::read_to_string(dir.path().join("category-life-plan.html")).unwrap(),
            original
        );
        assert!(!dir.path().join("index.html").exists());
    }
}
