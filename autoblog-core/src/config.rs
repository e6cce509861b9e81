//! Configuration parsing and management.

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    ParseError(#[from] serde_yaml::Error),
}

/// Main configuration struct matching the autoblog.yml schema
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub site: SiteConfig,

    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub cta: CtaConfig,

    #[serde(default)]
    pub gemini: GeminiConfig,

    // Internal: path to config file (for relative path resolution)
    #[serde(skip)]
    config_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(default = "default_site_name")]
    pub name: String,

    #[serde(default = "default_site_url")]
    pub url: String,

    #[serde(default = "default_author")]
    pub author: String,

    #[serde(default = "default_twitter")]
    pub twitter: String,

    /// Logo shown in the header bar of each post
    #[serde(default = "default_brand")]
    pub brand: String,

    #[serde(default)]
    pub analytics_id: Option<String>,

    #[serde(default)]
    pub adsense_client: Option<String>,
}

fn default_site_name() -> String {
    String::from("未来投資navi")
}

fn default_site_url() -> String {
    String::from("https://eva-solution.netlify.app")
}

fn default_author() -> String {
    String::from("りょう")
}

fn default_twitter() -> String {
    String::from("@investment_navi")
}

fn default_brand() -> String {
    String::from("eva solution")
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: default_site_name(),
            url: default_site_url(),
            author: default_author(),
            twitter: default_twitter(),
            brand: default_brand(),
            analytics_id: None,
            adsense_client: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Project root: holds sitemap.xml and is the git working tree
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Blog directory relative to the root
    #[serde(default = "default_blog")]
    pub blog: PathBuf,

    /// Year directory under the blog; defaults to the current year
    #[serde(default)]
    pub year: Option<String>,

    /// Reference portrait handed to the image generator, if present
    #[serde(default = "default_reference_image")]
    pub reference_image: Option<PathBuf>,
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_blog() -> PathBuf {
    PathBuf::from("blog")
}

fn default_reference_image() -> Option<PathBuf> {
    Some(PathBuf::from("images/りょう（未来投資navi）.png"))
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            blog: default_blog(),
            year: None,
            reference_image: default_reference_image(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CtaConfig {
    #[serde(default = "default_youtube_url")]
    pub youtube_url: String,

    #[serde(default = "default_line_url")]
    pub line_url: String,
}

fn default_youtube_url() -> String {
    String::from("https://www.youtube.com/@investment_navi")
}

fn default_line_url() -> String {
    String::from("https://lin.ee/FxIOpk1")
}

impl Default for CtaConfig {
    fn default() -> Self {
        Self {
            youtube_url: default_youtube_url(),
            line_url: default_line_url(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    #[serde(default = "default_api_base")]
    pub api_base: String,

    #[serde(default = "default_text_model")]
    pub text_model: String,

    #[serde(default = "default_image_model")]
    pub image_model: String,
}

fn default_api_base() -> String {
    String::from("https://generativelanguage.googleapis.com/v1beta")
}

fn default_text_model() -> String {
    String::from("gemini-2.5-flash")
}

fn default_image_model() -> String {
    String::from("gemini-2.5-flash-image")
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            text_model: default_text_model(),
            image_model: default_image_model(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let mut config: Config = serde_yaml::from_str(&contents)?;

        // Store config file path for relative path resolution
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Load the config file if it exists, otherwise fall back to defaults
    /// rooted at the current directory.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            Self::from_file(path)
        } else {
            tracing::debug!("No config at {:?}; using defaults", path);
            Ok(Self::default())
        }
    }

    /// Project root, resolved relative to the config file
    pub fn root_dir(&self) -> PathBuf {
        self.resolve_path(&self.paths.root)
    }

    /// Blog directory (holds index.html and the category pages)
    pub fn blog_dir(&self) -> PathBuf {
        self.root_dir().join(&self.paths.blog)
    }

    /// Year segment used in post paths and URLs
    pub fn year(&self) -> String {
        self.paths
            .year
            .clone()
            .unwrap_or_else(|| chrono::Local::now().year().to_string())
    }

    /// Directory holding one subdirectory per post
    pub fn year_dir(&self) -> PathBuf {
        self.blog_dir().join(self.year())
    }

    pub fn sitemap_path(&self) -> PathBuf {
        self.root_dir().join("sitemap.xml")
    }

    /// Reference image for generation, resolved against the project root
    pub fn reference_image(&self) -> Option<PathBuf> {
        self.paths
            .reference_image
            .as_ref()
            .map(|p| if p.is_absolute() { p.clone() } else { self.root_dir().join(p) })
    }

    /// Site URL without a trailing slash
    pub fn site_url(&self) -> &str {
        self.site.url.trim_end_matches('/')
    }

    /// Blog path segment as used in URLs ("blog")
    pub fn blog_url_segment(&self) -> String {
        self.paths
            .blog
            .to_string_lossy()
            .replace('\\', "/")
            .trim_matches('/')
            .to_string()
    }

    /// Absolute URL of a file inside a post directory
    pub fn post_file_url(&self, slug: &str, file_name: &str) -> String {
        format!(
            "{}/{}/{}/{}/{}",
            self.site_url(),
            self.blog_url_segment(),
            self.year(),
            slug,
            file_name
        )
    }

    /// Resolve a path relative to the config file location
    fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else if let Some(config_path) = &self.config_path {
            if let Some(parent) = config_path.parent() {
                parent.join(path)
            } else {
                path.to_path_buf()
            }
        } else {
            path.to_path_buf()
        }
    }
}
