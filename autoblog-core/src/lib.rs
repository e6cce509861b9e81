//! # autoblog-core
//!
//! Core library for the autoblog post generator.
//!
//! This crate turns a raw script into a structured post and keeps the static
//! site's listing artifacts in step: classification, slug allocation, body
//! formatting, header image resolution and marker-based index updates.
//! Nothing here talks to the network; remote collaborators plug in through
//! the traits in [`assets`].

pub mod assets;
pub mod category;
pub mod config;
pub mod format;
pub mod index;
pub mod models;
pub mod sitemap;
pub mod slug;

pub use assets::{AssetResolver, ImageGenerator, ImageSource, TextRewriter};
pub use category::Category;
pub use config::Config;
pub use format::{BodyFormatter, FormattedPost};
pub use index::{IndexFragments, IndexReport, IndexUpdater, UpdateOutcome};
pub use models::Post;
pub use sitemap::{collect_posts, SitemapPost};
pub use slug::next_slug;
