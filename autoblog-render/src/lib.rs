//! # autoblog-render
//!
//! Template rendering library for autoblog.
//!
//! This crate turns a [`Post`] into its page and the fragments spliced into
//! the listing artifacts, and renders complete sitemaps. All markup lives in
//! Askama templates; metadata is escaped, the formatted body is not.

pub mod templates;

use askama::Template;
use autoblog_core::index::IndexFragments;
use autoblog_core::sitemap::SitemapPost;
use autoblog_core::{Category, Config, Post};
use chrono::NaiveDate;

pub use templates::{
    CategoryCardTemplate, IndexCardTemplate, PostTemplate, SitemapEntryTemplate, SitemapImage,
    SitemapTemplate, SitemapUrl,
};

/// Render the full HTML page for `post`.
pub fn render_post(post: &Post, config: &Config) -> askama::Result<String> {
    let template = PostTemplate {
        title: post.title.clone(),
        description: post.description.clone(),
        category_label: post.category.label().to_string(),
        date_iso: post.date_iso(),
        date_display: post.date_display(),
        body_html: post.body_html.clone(),
        json_ld: json_ld(post, config),
        site_name: config.site.name.clone(),
        author: config.site.author.clone(),
        twitter: config.site.twitter.clone(),
        brand: config.site.brand.clone(),
        analytics_id: config.site.analytics_id.clone(),
        adsense_client: config.site.adsense_client.clone(),
        page_url: config.post_file_url(&post.slug, &post.html_file()),
        image_name: post.image_name.clone(),
        image_url: config.post_file_url(&post.slug, &post.image_name),
    };
    template.render()
}

/// Render the three snippets that announce `post` in the listing artifacts.
pub fn index_fragments(post: &Post, config: &Config) -> askama::Result<IndexFragments> {
    let post_dir = format!("{}/{}", config.year(), post.slug);

    let category_card = CategoryCardTemplate {
        slug: post.slug.clone(),
        href: format!("{}/{}", post_dir, post.html_file()),
        title: post.title.clone(),
        description: post.description.clone(),
        category_label: post.category.label().to_string(),
        date_display: post.date_display(),
    }
    .render()?;

    let index_card = IndexCardTemplate {
        href: format!("{}/{}", post_dir, post.html_file()),
        image_src: format!("{}/{}", post_dir, post.image_name),
        title: post.title.clone(),
        description: post.description.clone(),
    }
    .render()?;

    let sitemap_entry = SitemapEntryTemplate {
        url: SitemapUrl {
            loc: config.post_file_url(&post.slug, &post.html_file()),
            lastmod: post.date_iso(),
            changefreq: "weekly",
            priority: "0.8",
            image: Some(SitemapImage {
                loc: config.post_file_url(&post.slug, &post.image_name),
                title: post.title.clone(),
            }),
        },
    }
    .render()?;

    Ok(IndexFragments {
        category_card: format!("{}\n\n", category_card.trim_end()),
        index_card: format!("{}\n\n", index_card.trim_end()),
        sitemap_entry: format!("{}\n", sitemap_entry.trim_end()),
    })
}

/// Render a complete sitemap: the fixed site pages followed by every post.
pub fn render_sitemap(
    posts: &[SitemapPost],
    config: &Config,
    today: NaiveDate,
) -> askama::Result<String> {
    let today = today.format("%Y-%m-%d").to_string();
    let site = config.site_url();
    let blog = config.blog_url_segment();

    let mut pages = vec![
        SitemapUrl {
            loc: format!("{}/", site),
            lastmod: today.clone(),
            changefreq: "daily",
            priority: "1.0",
            image: None,
        },
        SitemapUrl {
            loc: format!("{}/{}/", site, blog),
            lastmod: today.clone(),
            changefreq: "daily",
            priority: "0.9",
            image: None,
        },
    ];
    pages.extend(Category::ALL.iter().map(|category| SitemapUrl {
        loc: format!("{}/{}/{}", site, blog, category.page_file()),
        lastmod: today.clone(),
        changefreq: "weekly",
        priority: "0.8",
        image: None,
    }));

    let posts = posts
        .iter()
        .map(|post| SitemapUrl {
            loc: config.post_file_url(&post.slug, &post.html_file),
            lastmod: post.lastmod.format("%Y-%m-%d").to_string(),
            changefreq: "weekly",
            priority: "0.8",
            image: post.image_file.as_ref().map(|file| SitemapImage {
                loc: config.post_file_url(&post.slug, file),
                title: post.title.clone(),
            }),
        })
        .collect();

    let xml = SitemapTemplate { pages, posts }.render()?;
    Ok(format!("{}\n", xml.trim_end()))
}

/// Article structured data, safe to embed in a `<script>` element
fn json_ld(post: &Post, config: &Config) -> String {
    let date = post.date_iso();
    let value = serde_json::json!({
        "@context": "https://schema.org",
        "@type": "Article",
        "headline": post.title,
        "description": post.description,
        "image": config.post_file_url(&post.slug, &post.image_name),
        "author": {
            "@type": "Person",
            "name": config.site.author,
        },
        "publisher": {
            "@type": "Organization",
            "name": config.site.name,
            "logo": {
                "@type": "ImageObject",
                "url": format!("{}/images/logo.png", config.site_url()),
            },
        },
        "datePublished": date,
        "dateModified": date,
        "mainEntityOfPage": {
            "@type": "WebPage",
            "@id": config.post_file_url(&post.slug, &post.html_file()),
        },
    });

    // "</" would close the surrounding <script> element
    serde_json::to_string_pretty(&value)
        .unwrap_or_default()
        .replace("</", "<\\/")
}
