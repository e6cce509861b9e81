//! Gemini REST client used for text rewriting and header image generation.

use autoblog_core::assets::{ImageGenerator, TextRewriter};
use autoblog_core::Config;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use indoc::formatdoc;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GeminiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Gemini API returned {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Response contained no text")]
    EmptyResponse,

    #[error("Failed to decode image data: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("Failed to read reference image {path}: {source}")]
    ReferenceImage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,

    #[serde(default, alias = "inline_data", skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

impl Part {
    fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            inline_data: None,
        }
    }

    fn image(mime_type: &str, bytes: &[u8]) -> Self {
        Self {
            text: None,
            inline_data: Some(InlineData {
                mime_type: mime_type.to_string(),
                data: STANDARD.encode(bytes),
            }),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    #[serde(alias = "mime_type")]
    mime_type: String,
    data: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Content,
}

impl GenerateContentResponse {
    fn parts(&self) -> &[Part] {
        self.candidates
            .first()
            .map(|c| c.content.parts.as_slice())
            .unwrap_or_default()
    }

    /// Concatenated text of the first candidate
    fn text(&self) -> Option<String> {
        let text: String = self
            .parts()
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        let text = text.trim();
        (!text.is_empty()).then(|| text.to_string())
    }

    /// First inline payload of the first candidate, decoded
    fn image(&self) -> Result<Option<Vec<u8>>, GeminiError> {
        match self.parts().iter().find_map(|p| p.inline_data.as_ref()) {
            Some(inline) => Ok(Some(STANDARD.decode(inline.data.as_bytes())?)),
            None => Ok(None),
        }
    }
}

pub struct GeminiClient {
    http: reqwest::blocking::Client,
    api_key: String,
    api_base: String,
    text_model: String,
    image_model: String,
    reference_image: Option<PathBuf>,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>, config: &Config) -> Self {
        Self {
            http: reqwest::blocking::Client::new(),
            api_key: api_key.into(),
            api_base: config.gemini.api_base.trim_end_matches('/').to_string(),
            text_model: config.gemini.text_model.clone(),
            image_model: config.gemini.image_model.clone(),
            reference_image: config.reference_image(),
        }
    }

    fn endpoint(&self, model: &str) -> String {
        let model = model.strip_prefix("models/").unwrap_or(model);
        format!("{}/models/{}:generateContent", self.api_base, model)
    }

    fn generate_content(
        &self,
        model: &str,
        parts: Vec<Part>,
    ) -> Result<GenerateContentResponse, GeminiError> {
        let request = GenerateContentRequest {
            contents: vec![Content { parts }],
        };

        tracing::debug!("POST {}", self.endpoint(model));
        let response = self
            .http
            .post(self.endpoint(model))
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(GeminiError::Api { status, body });
        }

        Ok(response.json()?)
    }

    fn reference_part(&self) -> Result<Option<Part>, GeminiError> {
        let Some(path) = self.reference_image.as_ref().filter(|p| p.is_file()) else {
            return Ok(None);
        };

        let bytes = std::fs::read(path).map_err(|source| GeminiError::ReferenceImage {
            path: path.clone(),
            source,
        })?;
        let mime = match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("jpg") || ext.eq_ignore_ascii_case("jpeg") => {
                "image/jpeg"
            }
            _ => "image/png",
        };
        Ok(Some(Part::image(mime, &bytes)))
    }
}

impl TextRewriter for GeminiClient {
    fn rewrite(&self, text: &str) -> anyhow::Result<String> {
        let response =
            self.generate_content(&self.text_model, vec![Part::text(rewrite_prompt(text))])?;
        Ok(response.text().ok_or(GeminiError::EmptyResponse)?)
    }
}

impl ImageGenerator for GeminiClient {
    fn generate(&self, caption: &str, title: &str) -> anyhow::Result<Option<Vec<u8>>> {
        let mut parts = vec![Part::text(image_prompt(caption, title))];
        match self.reference_part()? {
            Some(reference) => parts.push(reference),
            None => tracing::debug!("No reference image; generating from the prompt alone"),
        }

        let response = self.generate_content(&self.image_model, parts)?;
        Ok(response.image()?)
    }
}

fn rewrite_prompt(text: &str) -> String {
    formatdoc! {"
        あなたはプロのブログ編集者です。
        以下のYouTube台本（テキスト）を、ブログ記事形式にリライトしてください。

        【編集ルール】
        1. **句読点**: 適切な位置に「、」「。」を入れ、読みやすい日本語にしてください。
        2. **装飾**: 特に重要な結論や強調したい文言は、`<span class=\"highlight\">`と`</span>`で囲ってください。
        3. **構成**: 見出し（h2, h3）を適切に配置し、SEOを意識した構成にしてください。
        4. **結び**: 記事の最後は必ず「それではまた。」で締めくくってください。
        5. **出力形式**: HTMLタグ（h2, h3, p, ul, li, span class=\"highlight\"）を含んだ形式で出力してください。markdown記法（#など）は使用しないでください。
           - タイトル行は `<h1>タイトル</h1>` ではなく、単に `タイトル：〇〇` としてください。
           - 各段落は `<p>` タグで囲ってください。

        【重要】「はい」「承知しました」などの返答は一切不要です。記事の本文のみを出力してください。

        【台本内容】
        {text}
    "}
}

fn image_prompt(caption: &str, title: &str) -> String {
    let clean_title = title.replace("##", "");
    let clean_title = clean_title.trim();
    formatdoc! {"
        あなたは最高品質のAI画像生成モデルです。
        添付された人物画像を元に、ブログのヘッダー画像を生成してください。

        【デザイン要件】
        - スタイル: 高品質なアニメ調。YouTubeのサムネイルのように、クリックしたくなるインパクトのある構成。
        - キャラクター: 添付画像の人物を、自信に満ちた表情で中央または左右に配置。
        - テキスト: 画像内に大きく、太文字で「{caption}」という日本語の文字を入れてください。
          - 日本語の漢字と標準的な日本語ゴシック体を使用し、中国語の簡体字は使用しないこと。
          - 背景に埋もれないよう、白抜きや強いアウトライン（縁取り）を適用すること。
        - 背景: 「{clean_title}」というテーマに沿った、明るくエネルギッシュな背景（上昇チャート、金貨など）。
        - アスペクト比: 16:9 (1200x675px相当)。

        画像データのみを出力してください。
    "}
}
