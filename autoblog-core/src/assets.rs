//! Header image resolution.
//!
//! A post always ends up with an image file at its expected path: a copy of
//! the supplied image, a generated one, or an empty placeholder.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

const CAPTION_MAX_CHARS: usize = 15;
const QUESTION_PREFIX_MAX_CHARS: usize = 20;
const SHORT_SEGMENT_CHARS: usize = 3;

#[derive(Error, Debug)]
pub enum AssetError {
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Rewrites a raw transcript into blog-ready prose.
pub trait TextRewriter {
    fn rewrite(&self, text: &str) -> anyhow::Result<String>;
}

/// Produces header images.
///
/// `Ok(None)` means the service answered without an image payload.
pub trait ImageGenerator {
    fn generate(&self, caption: &str, title: &str) -> anyhow::Result<Option<Vec<u8>>>;
}

/// How the header image was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSource {
    Copied,
    Generated,
    Placeholder,
}

/// Resolves the header image for a post
pub struct AssetResolver<'a> {
    generator: Option<&'a dyn ImageGenerator>,
}

impl<'a> AssetResolver<'a> {
    /// `generator` is `None` when no credential is configured.
    pub fn new(generator: Option<&'a dyn ImageGenerator>) -> Self {
        Self { generator }
    }

    /// Place an image at `dest`.
    ///
    /// Only a failure to write `dest` itself is an error; every problem
    /// with the supplied image or the generator falls back to a placeholder.
    pub fn resolve(
        &self,
        dest: &Path,
        supplied: Option<&Path>,
        title: &str,
    ) -> Result<ImageSource, AssetError> {
        if let Some(src) = supplied {
            if src.is_file() {
                match fs::copy(src, dest) {
                    Ok(_) => {
                        tracing::info!("Copied image {:?} to {:?}", src, dest);
                        return Ok(ImageSource::Copied);
                    }
                    Err(err) => tracing::warn!("Failed to copy {:?}: {}", src, err),
                }
            } else {
                tracing::warn!("Image {:?} not found; generating a header image", src);
            }
        }

        self.generate(dest, title)
    }

    fn generate(&self, dest: &Path, title: &str) -> Result<ImageSource, AssetError> {
        let Some(generator) = self.generator else {
            tracing::warn!("GEMINI_API_KEY not set; writing placeholder image");
            return write_placeholder(dest);
        };

        let caption = caption_for_title(title);
        tracing::info!("Generating header image with caption {:?}", caption);

        match generator.generate(&caption, title) {
            Ok(Some(bytes)) => {
                fs::write(dest, bytes).map_err(|source| AssetError::Write {
                    path: dest.to_path_buf(),
                    source,
                })?;
                tracing::info!("Header image saved to {:?}", dest);
                Ok(ImageSource::Generated)
            }
            Ok(None) => {
                tracing::warn!("No image data in response; writing placeholder");
                write_placeholder(dest)
            }
            Err(err) => {
                tracing::warn!("Image generation failed: {:#}; writing placeholder", err);
                write_placeholder(dest)
            }
        }
    }
}

fn write_placeholder(dest: &Path) -> Result<ImageSource, AssetError> {
    fs::write(dest, b"").map_err(|source| AssetError::Write {
        path: dest.to_path_buf(),
        source,
    })?;
    Ok(ImageSource::Placeholder)
}

/// Reduce a title to a short phrase for the image overlay.
///
/// ```
/// use autoblog_core::assets::caption_for_title;
///
/// assert_eq!(caption_for_title("## 新NISA：始め方ガイド"), "始め方ガイド");
/// assert_eq!(caption_for_title("今から投資すべき？理由を解説"), "今から投資すべき？");
/// ```
pub fn caption_for_title(title: &str) -> String {
    let clean = title.trim_start_matches('#').trim();

    let caption = if clean.contains('：') {
        let parts: Vec<&str> = clean.split('：').collect();
        let last = parts[parts.len() - 1];
        if last.chars().count() > SHORT_SEGMENT_CHARS {
            last.to_string()
        } else {
            parts[0].to_string()
        }
    } else if let Some((prefix, _)) = clean.split_once('？') {
        if prefix.chars().count() < QUESTION_PREFIX_MAX_CHARS {
            format!("{}？", prefix)
        } else {
            take_chars(clean, CAPTION_MAX_CHARS)
        }
    } else {
        clean.to_string()
    };

    take_chars(&caption, CAPTION_MAX_CHARS)
}

fn take_chars(s: &str, n: usize) -> String {
    s.chars().take(n).collect()
}
