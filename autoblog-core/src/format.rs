//! Transcript to HTML fragment conversion.
//!
//! The input is a narration script, optionally rewritten by an external
//! service. It is prose with light markdown-like markers: `#` heading
//! prefixes, `・` / `- ` list items, `**bold**` spans and `。` sentence ends.
//! The output is a title, a meta description and an ordered list of HTML
//! fragments.

use crate::config::Config;
use regex::Regex;
use std::borrow::Cow;
use std::sync::OnceLock;

const TITLE_LABELS: &[&str] = &["タイトル：", "Title:"];
const DROPPED_PREFIXES: &[&str] = &["OP：", "ED：", "タイトル", "Title:"];
const DESCRIPTION_SKIP_PREFIXES: &[&str] = &["#", "OP", "第", "<"];
const DESCRIPTION_MAX_CHARS: usize = 150;
const GREETING_SCAN_LINES: usize = 20;

static HIGHLIGHT_REGEX: OnceLock<Regex> = OnceLock::new();
static CHAPTER_ONE_REGEX: OnceLock<Regex> = OnceLock::new();

fn highlight_regex() -> &'static Regex {
    HIGHLIGHT_REGEX.get_or_init(|| Regex::new(r"\*\*(.+?)\*\*").unwrap())
}

fn chapter_one_regex() -> &'static Regex {
    // "1章" not preceded by another digit, so 第11章 / 第21章 do not match
    CHAPTER_ONE_REGEX.get_or_init(|| Regex::new(r"(?:^|[^0-9０-９])[1１]章").unwrap())
}

/// Result of formatting one script
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedPost {
    pub title: String,
    pub description: String,
    /// HTML fragments in document order
    pub body: Vec<String>,
}

impl FormattedPost {
    pub fn body_html(&self) -> String {
        self.body.join("\n")
    }
}

/// Converts a script into a [`FormattedPost`].
///
/// Formatting is deterministic: the same input and settings always produce
/// the same fragments.
#[derive(Debug, Clone)]
pub struct BodyFormatter {
    author: String,
    youtube_url: String,
    line_url: String,
}

impl BodyFormatter {
    pub fn new(
        author: impl Into<String>,
        youtube_url: impl Into<String>,
        line_url: impl Into<String>,
    ) -> Self {
        Self {
            author: author.into(),
            youtube_url: youtube_url.into(),
            line_url: line_url.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.site.author.clone(),
            config.cta.youtube_url.clone(),
            config.cta.line_url.clone(),
        )
    }

    /// Format a whole script.
    pub fn format(&self, text: &str) -> FormattedPost {
        let lines: Vec<&str> = text.lines().collect();
        let (title, body_lines) = extract_title(&lines);
        let description = extract_description(&body_lines, &title);
        let body = self.format_body(&body_lines);

        FormattedPost {
            title,
            description,
            body,
        }
    }

    fn format_body(&self, body_lines: &[&str]) -> Vec<String> {
        let mut out = Vec::new();
        let mut in_list = false;
        let mut chapter_cta_emitted = false;

        let author = self.author.trim();
        let has_greeting = !author.is_empty()
            && body_lines
                .iter()
                .take(GREETING_SCAN_LINES)
                .any(|line| line.contains(author));
        if !has_greeting {
            out.push(self.greeting());
        }

        for raw in body_lines {
            let line = raw.trim();

            if line.is_empty() {
                if in_list {
                    out.push("</ul>".to_string());
                    in_list = false;
                }
                continue;
            }

            if DROPPED_PREFIXES.iter().any(|p| line.starts_with(p)) {
                continue;
            }

            if let Some(item) = list_item(line) {
                if !in_list {
                    out.push("<ul>".to_string());
                    in_list = true;
                }
                out.push(format!("<li>{}</li>", highlight(item)));
                continue;
            }

            if in_list {
                out.push("</ul>".to_string());
                in_list = false;
            }

            // Already-marked-up lines from the rewriter pass through untouched
            if line.starts_with('<') && line.ends_with('>') {
                if line.starts_with("<h2") && !chapter_cta_emitted && is_chapter_one(line) {
                    out.push(self.youtube_cta());
                    chapter_cta_emitted = true;
                }
                out.push(line.to_string());
                continue;
            }

            let heading = line.trim_start_matches('#').trim();
            let is_chapter = heading.starts_with('第') && heading.contains('章');
            if is_chapter || line.starts_with("## ") {
                if !chapter_cta_emitted && is_chapter_one(heading) {
                    out.push(self.youtube_cta());
                    chapter_cta_emitted = true;
                }
                out.push(format!("<h2>{}</h2>", heading));
                continue;
            }

            if let Some(h3) = line.strip_prefix("### ") {
                out.push(format!("<h3>{}</h3>", h3.trim()));
                continue;
            }

            let highlighted = highlight(line);
            out.push(format!("<p>{}</p>", break_sentences(&highlighted)));
        }

        if in_list {
            out.push("</ul>".to_string());
        }

        out.push(self.line_cta());
        out
    }

    fn greeting(&self) -> String {
        format!("<p>こんにちは、{}です。</p>", self.author)
    }

    fn youtube_cta(&self) -> String {
        format!(
            concat!(
                "<div class=\"youtube-cta\">\n",
                "<h3>🎥 YouTubeでもっと詳しく解説！</h3>\n",
                "<p>この記事の内容は動画でも詳しく解説しています。<br>\n",
                "「文章だけじゃ不安」という方は、ぜひ動画をご覧ください👇</p>\n",
                "<a href=\"{}\" target=\"_blank\" class=\"youtube-btn\">YouTubeチャンネルを見る</a>\n",
                "</div>"
            ),
            self.youtube_url
        )
    }

    fn line_cta(&self) -> String {
        format!(
            concat!(
                "<div class=\"line-cta\">",
                "<h3>💬「老後資金、どうやって増やせば...？」</h3>",
                "<p>そんなお悩みにお答えするヒントを、LINEで無料配信中！<br>個別相談も承っています。</p>",
                "<a href=\"{}\" target=\"_blank\" class=\"line-btn\">無料LINE登録はこちら</a>",
                "</div>"
            ),
            self.line_url
        )
    }
}

/// Split the title off a script.
///
/// Returns the title and the body lines. Label lines (`タイトル：` / `Title:`)
/// set the title wherever they appear. Otherwise the first non-empty line is
/// the title. Blank lines before the first body line are dropped; after that
/// blank lines are kept since they end list blocks.
pub fn extract_title<'a>(lines: &[&'a str]) -> (String, Vec<&'a str>) {
    let mut title = String::new();
    let mut title_taken = false;
    let mut body = Vec::new();

    for &line in lines {
        if TITLE_LABELS.iter().any(|label| line.starts_with(label)) {
            title = label_value(line).to_string();
            title_taken = true;
            continue;
        }

        // Only the first non-empty line, even when it strips to nothing
        if !title_taken && !line.trim().is_empty() {
            title = line.trim().trim_start_matches('#').trim().to_string();
            title_taken = true;
            continue;
        }

        if body.is_empty() && line.trim().is_empty() {
            continue;
        }

        body.push(line);
    }

    (title, body)
}

/// Text after the last full-width and then the last ASCII colon
fn label_value(line: &str) -> &str {
    let after_wide = line.rsplit('：').next().unwrap_or(line);
    after_wide.rsplit(':').next().unwrap_or(after_wide).trim()
}

/// First plain prose line, clipped to 150 characters plus `...`.
/// Falls back to the title when no such line exists.
pub fn extract_description(body_lines: &[&str], title: &str) -> String {
    body_lines
        .iter()
        .map(|line| line.trim())
        .find(|line| {
            !line.is_empty() && !DESCRIPTION_SKIP_PREFIXES.iter().any(|p| line.starts_with(p))
        })
        .map(|line| {
            let clipped: String = line.chars().take(DESCRIPTION_MAX_CHARS).collect();
            format!("{}...", clipped)
        })
        .unwrap_or_else(|| title.to_string())
}

fn list_item(line: &str) -> Option<&str> {
    line.strip_prefix('・')
        .or_else(|| line.strip_prefix("- "))
        .map(str::trim)
}

fn is_chapter_one(heading: &str) -> bool {
    chapter_one_regex().is_match(heading)
}

/// Convert every `**text**` span into a highlight span.
///
/// ```
/// use autoblog_core::format::highlight;
///
/// assert_eq!(highlight("a **b** c **d**"), r#"a <span class="highlight">b</span> c <span class="highlight">d</span>"#);
/// assert_eq!(highlight("plain"), "plain");
/// ```
pub fn highlight(line: &str) -> Cow<'_, str> {
    highlight_regex().replace_all(line, r#"<span class="highlight">$1</span>"#)
}

/// Split a line into sentences at `。`, ignoring periods inside `「」`.
///
/// Every segment except possibly the last ends with `。`.
pub fn split_sentences(line: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut in_quote = false;

    for ch in line.chars() {
        match ch {
            '「' => in_quote = true,
            '」' => in_quote = false,
            _ => {}
        }

        current.push(ch);

        if ch == '。' && !in_quote {
            segments.push(std::mem::take(&mut current));
        }
    }

    if !current.is_empty() {
        segments.push(current);
    }

    segments
}

/// Join sentences with `<br>`; no break is left at the end of the line.
pub fn break_sentences(line: &str) -> String {
    split_sentences(line).join("<br>")
}
