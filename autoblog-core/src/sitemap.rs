//! Post discovery for full sitemap regeneration.

use chrono::{DateTime, NaiveDate, Utc};
use scraper::{Html, Selector};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

#[derive(Error, Debug)]
pub enum SitemapError {
    #[error("Failed to scan {path}: {source}")]
    Scan {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A published post as found on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitemapPost {
    pub slug: String,
    pub html_file: String,
    pub image_file: Option<String>,
    pub title: String,
    pub lastmod: NaiveDate,
}

/// Collect every post directory under `year_dir`, sorted by slug.
///
/// A directory counts as a post when it holds at least one `.html` file.
/// A missing `year_dir` yields no posts.
pub fn collect_posts(year_dir: &Path, site_name: &str) -> Result<Vec<SitemapPost>, SitemapError> {
    if !year_dir.is_dir() {
        tracing::warn!("{:?} does not exist; no posts to list", year_dir);
        return Ok(Vec::new());
    }

    let mut posts = Vec::new();
    for entry in list_dir(year_dir)? {
        if !entry.file_type().is_dir() {
            continue;
        }
        if let Some(post) = read_post(entry.path(), site_name)? {
            posts.push(post);
        }
    }

    posts.sort_by(|a, b| a.slug.cmp(&b.slug));
    tracing::debug!("Found {} posts in {:?}", posts.len(), year_dir);
    Ok(posts)
}

fn list_dir(dir: &Path) -> Result<Vec<walkdir::DirEntry>, SitemapError> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|source| SitemapError::Scan {
            path: dir.to_path_buf(),
            source,
        })
}

fn read_post(post_dir: &Path, site_name: &str) -> Result<Option<SitemapPost>, SitemapError> {
    let slug = match post_dir.file_name() {
        Some(name) => name.to_string_lossy().into_owned(),
        None => return Ok(None),
    };

    let files: Vec<String> = list_dir(post_dir)?
        .into_iter()
        .filter(|e| e.file_type().is_file())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();

    let Some(html_file) = files.iter().find(|f| f.ends_with(".html")).cloned() else {
        tracing::debug!("Skipping {:?}: no HTML file", post_dir);
        return Ok(None);
    };
    let image_file = files.iter().find(|f| is_image(f)).cloned();

    let html_path = post_dir.join(&html_file);
    let html = fs::read_to_string(&html_path).map_err(|source| SitemapError::Read {
        path: html_path.clone(),
        source,
    })?;
    let title = extract_title(&html, site_name).unwrap_or_else(|| slug.clone());

    let modified = fs::metadata(&html_path)
        .and_then(|m| m.modified())
        .map_err(|source| SitemapError::Read {
            path: html_path.clone(),
            source,
        })?;
    let lastmod = DateTime::<Utc>::from(modified).date_naive();

    Ok(Some(SitemapPost {
        slug,
        html_file,
        image_file,
        title,
        lastmod,
    }))
}

fn is_image(file_name: &str) -> bool {
    Path::new(file_name)
        .extension()
        .map(|ext| {
            let ext = ext.to_string_lossy().to_lowercase();
            IMAGE_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// Page title with the ` | {site_name}` suffix removed, entities decoded
pub fn extract_title(html: &str, site_name: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("head > title").ok()?;

    let raw = document.select(&selector).next()?.text().collect::<String>();
    let suffix = format!(" | {}", site_name);
    let title = raw.trim().replace(&suffix, "");
    let title = title.trim();
    (!title.is_empty()).then(|| title.to_string())
}
