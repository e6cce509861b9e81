//! Content model for a generated post.

use crate::category::Category;
use crate::format::FormattedPost;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Suffix appended to the slug for the header image file
pub const IMAGE_SUFFIX: &str = "-image.jpg";

/// One generated post, assembled once per run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub image_name: String,
    pub body_html: String,
    pub published: NaiveDate,
}

impl Post {
    /// Build a post from formatter output.
    ///
    /// An empty title falls back to the slug so the page never renders a
    /// blank heading.
    pub fn new(
        slug: impl Into<String>,
        category: Category,
        formatted: FormattedPost,
        published: NaiveDate,
    ) -> Self {
        let slug = slug.into();
        let body_html = formatted.body_html();
        let title = if formatted.title.trim().is_empty() {
            slug.clone()
        } else {
            formatted.title
        };
        let description = if formatted.description.trim().is_empty() {
            title.clone()
        } else {
            formatted.description
        };

        Self {
            image_name: image_name_for(&slug),
            slug,
            title,
            description,
            category,
            body_html,
            published,
        }
    }

    pub fn html_file(&self) -> String {
        format!("{}.html", self.slug)
    }

    /// `2025-01-31`, used in metadata and the sitemap
    pub fn date_iso(&self) -> String {
        self.published.format("%Y-%m-%d").to_string()
    }

    /// `2025.01.31`, shown to readers
    pub fn date_display(&self) -> String {
        self.published.format("%Y.%m.%d").to_string()
    }
}

pub fn image_name_for(slug: &str) -> String {
    format!("{}{}", slug, IMAGE_SUFFIX)
}
