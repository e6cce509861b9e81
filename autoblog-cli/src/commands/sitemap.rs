//! Sitemap regeneration command.

use anyhow::{Context, Result};
use autoblog_core::{collect_posts, Config};
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};

/// Rebuild sitemap.xml from every post on disk
pub fn regenerate_sitemap(config_path: &Path) -> Result<()> {
    let config = Config::load_or_default(config_path).context("Failed to load configuration")?;
    let today = chrono::Local::now().date_naive();

    let (path, count) = write_sitemap(&config, today)?;
    println!("✓ Wrote {:?} ({} posts)", path, count);
    Ok(())
}

/// Write the sitemap and return its path and the number of posts listed.
pub fn write_sitemap(config: &Config, today: NaiveDate) -> Result<(PathBuf, usize)> {
    let year_dir = config.year_dir();
    tracing::info!("Scanning {:?}", year_dir);

    let posts = collect_posts(&year_dir, &config.site.name).context("Failed to scan posts")?;
    tracing::info!("Found {} posts", posts.len());

    let xml = autoblog_render::render_sitemap(&posts, config, today)
        .context("Failed to render sitemap")?;
    let path = config.sitemap_path();
    fs::write(&path, xml).with_context(|| format!("Failed to write {:?}", path))?;

    Ok((path, posts.len()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_sitemap_replaces_existing() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("autoblog.yml");
        fs::write(&config_path, "paths:\n  year: \"2025\"\n").unwrap();
        let config = Config::from_file(&config_path).unwrap();

        let post_dir = dir.path().join("blog/2025/nisa-start-guide1");
        fs::create_dir_all(&post_dir).unwrap();
        fs::write(
            post_dir.join("nisa-start-guide1.html"),
            "<title>新NISA入門 | 未来投資navi</title>",
        )
        .unwrap();
        fs::write(post_dir.join("nisa-start-guide1-image.jpg"), b"").unwrap();
        fs::write(dir.path().join("sitemap.xml"), "stale").unwrap();

        let today = NaiveDate::from_ymd_opt(2025, 7, 1).unwrap();
        let (path, count) = write_sitemap(&config, today).unwrap();

        assert_eq!(count, 1);
        let xml = fs::read_to_string(path).unwrap();
        assert!(!xml.contains("stale"));
        assert!(xml.contains("/blog/2025/nisa-start-guide1/nisa-start-guide1.html</loc>"));
        assert!(xml.contains("<image:title>新NISA入門</image:title>"));
    }
}
