//! Askama template definitions.

use askama::Template;

/// Full post page
#[derive(Template)]
#[template(path = "post.html")]
pub struct PostTemplate {
    // Page metadata
    pub title: String,
    pub description: String,
    pub category_label: String,
    pub date_iso: String,
    pub date_display: String,

    // Content
    pub body_html: String,
    pub json_ld: String,

    // Site metadata
    pub site_name: String,
    pub author: String,
    pub twitter: String,
    pub brand: String,
    pub analytics_id: Option<String>,
    pub adsense_client: Option<String>,

    // URLs
    pub page_url: String,
    pub image_name: String,
    pub image_url: String,
}

/// Card inserted into a category listing page
#[derive(Template)]
#[template(path = "category_card.html")]
pub struct CategoryCardTemplate {
    pub slug: String,
    pub href: String,
    pub title: String,
    pub description: String,
    pub category_label: String,
    pub date_display: String,
}

/// Card inserted into the blog index
#[derive(Template)]
#[template(path = "index_card.html")]
pub struct IndexCardTemplate {
    pub href: String,
    pub image_src: String,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone)]
pub struct SitemapImage {
    pub loc: String,
    pub title: String,
}

/// One `<url>` element
#[derive(Debug, Clone)]
pub struct SitemapUrl {
    pub loc: String,
    pub lastmod: String,
    pub changefreq: &'static str,
    pub priority: &'static str,
    pub image: Option<SitemapImage>,
}

/// A single `<url>` element, spliced into an existing sitemap
#[derive(Template)]
#[template(path = "sitemap_entry.xml")]
pub struct SitemapEntryTemplate {
    pub url: SitemapUrl,
}

/// A complete sitemap document
#[derive(Template)]
#[template(path = "sitemap.xml")]
pub struct SitemapTemplate {
    pub pages: Vec<SitemapUrl>,
    pub posts: Vec<SitemapUrl>,
}
