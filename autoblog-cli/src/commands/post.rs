//! Post command implementation.

use crate::gemini::GeminiClient;
use crate::git;
use anyhow::{bail, Context, Result};
use autoblog_core::assets::{AssetResolver, ImageGenerator, ImageSource, TextRewriter};
use autoblog_core::index::{IndexReport, IndexUpdater};
use autoblog_core::{next_slug, BodyFormatter, Category, Config, Post};
use chrono::NaiveDate;
use clap::Args;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Args, Debug, Clone, Default)]
pub struct PostArgs {
    /// Script to turn into a post
    #[arg(value_name = "TEXT_FILE")]
    pub text_file: Option<PathBuf>,

    /// Header image to copy instead of generating one
    #[arg(long)]
    pub image: Option<PathBuf>,

    /// Commit and push the project after generating
    #[arg(long)]
    pub push: bool,

    /// Use this slug instead of allocating the next free one
    #[arg(long)]
    pub slug: Option<String>,

    /// Skip classification and file the post under this category
    #[arg(long, value_parser = parse_category)]
    pub category: Option<Category>,
}

fn parse_category(s: &str) -> Result<Category, String> {
    Category::from_slug(s).ok_or_else(|| {
        let known: Vec<&str> = Category::ALL.iter().map(|c| c.slug()).collect();
        format!("unknown category '{}' (expected one of: {})", s, known.join(", "))
    })
}

/// Remote collaborators; `None` degrades to pass-through or placeholder
#[derive(Default, Clone, Copy)]
pub struct Collaborators<'a> {
    pub rewriter: Option<&'a dyn TextRewriter>,
    pub generator: Option<&'a dyn ImageGenerator>,
}

/// Everything a finished run produced
#[derive(Debug)]
pub struct PostOutcome {
    pub post: Post,
    pub html_path: PathBuf,
    pub image: ImageSource,
    pub report: IndexReport,
}

/// Entry point for `autoblog [post] TEXT_FILE`
pub fn create_post(config_path: &Path, api_key: Option<&str>, args: PostArgs) -> Result<()> {
    let config = Config::load_or_default(config_path).context("Failed to load configuration")?;

    let gemini = match api_key.map(str::trim).filter(|k| !k.is_empty()) {
        Some(key) => Some(GeminiClient::new(key, &config)),
        None => {
            tracing::warn!("GEMINI_API_KEY not set; skipping rewriting and image generation");
            None
        }
    };
    let collaborators = Collaborators {
        rewriter: gemini.as_ref().map(|g| g as &dyn TextRewriter),
        generator: gemini.as_ref().map(|g| g as &dyn ImageGenerator),
    };

    let today = chrono::Local::now().date_naive();
    let outcome = generate_post(&config, collaborators, &args, today)?;

    println!("✓ Generated {:?}", outcome.html_path);
    println!("  - Category: {}", outcome.post.category);
    println!("  - Title: {}", outcome.post.title);
    if !outcome.report.all_updated() {
        println!("  - Some index artifacts were skipped (see warnings)");
    }
    Ok(())
}

/// Run the full pipeline for one script.
pub fn generate_post(
    config: &Config,
    collaborators: Collaborators<'_>,
    args: &PostArgs,
    today: NaiveDate,
) -> Result<PostOutcome> {
    let Some(text_path) = args.text_file.as_deref() else {
        bail!("No input file given; run `autoblog --help` for usage");
    };
    if !text_path.is_file() {
        bail!("File {:?} not found", text_path);
    }

    let raw = fs::read_to_string(text_path)
        .with_context(|| format!("Failed to read {:?}", text_path))?;
    tracing::info!("Processing {:?}", text_path);

    let file_name = text_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let category = args
        .category
        .unwrap_or_else(|| Category::classify(&file_name, &raw));
    tracing::info!("Category: {}", category);

    let year_dir = config.year_dir();
    let slug = match &args.slug {
        Some(slug) => slug.clone(),
        None => next_slug(category.slug(), &year_dir).context("Failed to allocate slug")?,
    };
    tracing::info!("Slug: {}", slug);

    let post_dir = year_dir.join(&slug);
    fs::create_dir_all(&post_dir).with_context(|| format!("Failed to create {:?}", post_dir))?;
    tracing::debug!("Created directory {:?}", post_dir);

    let text = rewrite_or_keep(collaborators.rewriter, &raw);
    let formatted = BodyFormatter::from_config(config).format(&text);
    let post = Post::new(slug, category, formatted, today);
    tracing::info!("Title: {}", post.title);

    let image_path = post_dir.join(&post.image_name);
    let image = AssetResolver::new(collaborators.generator)
        .resolve(&image_path, args.image.as_deref(), &post.title)
        .context("Failed to place header image")?;

    let html =
        autoblog_render::render_post(&post, config).context("Failed to render post template")?;
    let html_path = post_dir.join(post.html_file());
    fs::write(&html_path, html).with_context(|| format!("Failed to write {:?}", html_path))?;
    tracing::info!("Generated HTML: {:?}", html_path);

    let fragments = autoblog_render::index_fragments(&post, config)
        .context("Failed to render index fragments")?;
    let report = IndexUpdater::new(config.blog_dir(), config.sitemap_path())
        .update(category, &fragments)
        .context("Failed to update indexes")?;

    if args.push {
        let message = git::commit_message(&post.title, &post.slug);
        if let Err(err) = git::commit_and_push(&config.root_dir(), &message) {
            tracing::warn!("Git operation failed: {:#}", err);
        }
    }

    Ok(PostOutcome {
        post,
        html_path,
        image,
        report,
    })
}

/// Rewritten text, or the original when rewriting is unavailable or fails
fn rewrite_or_keep(rewriter: Option<&dyn TextRewriter>, raw: &str) -> String {
    let Some(rewriter) = rewriter else {
        return raw.to_string();
    };

    match rewriter.rewrite(raw) {
        Ok(text) if !text.trim().is_empty() => text,
        Ok(_) => {
            tracing::warn!("Rewriter returned nothing; using the original text");
            raw.to_string()
        }
        Err(err) => {
            tracing::warn!("Rewriting failed: {:#}; using the original text", err);
            raw.to_string()
        }
    }
}
