//! # AI gateway client
//!
//! Thin wrapper around the gateway's OpenAI-compatible chat-completions
//! endpoint. Text mode turns a brief (plus optional seed image and revision
//! feedback) into Telegram post copy; image mode requests image+text
//! modalities and returns the generated poster bytes. Provides token
//! masking for safe logging and maps rate-limit/quota upstream statuses to
//! the core taxonomy.

mod wire;

use async_trait::async_trait;
use base64::Engine;
use telepost_core::{Generator, Result, TelepostError};

use wire::{
    ChatMessage, ChatRequest, ChatResponse, ContentPart, ImageUrl, MessageContent,
};

pub const DEFAULT_BASE_URL: &str = "https://ai.gateway.lovable.dev/v1";
pub const DEFAULT_TEXT_MODEL: &str = "google/gemini-3-flash-preview";
pub const DEFAULT_IMAGE_MODEL: &str = "google/gemini-2.5-flash-image";

const STYLE_DIRECTIVE: &str = "You are an expert social media content creator for Telegram groups. Create engaging, well-structured posts.
Rules:
- Use emojis strategically but don't overdo it
- Keep paragraphs short and punchy
- Include a compelling hook in the first line
- Add relevant hashtags at the end
- Format for Telegram (use bold with **, italics with __)
- Keep it concise but impactful";

/// Masks an API key for safe logging: first 7 chars + "***" + last 4 chars;
/// keys of 11 chars or fewer become "***" entirely.
pub fn mask_token(token: &str) -> String {
    let len = token.len();
    if len <= 11 {
        "***".to_string()
    } else {
        format!("{}***{}", &token[..7], &token[len - 4..])
    }
}

/// Client for the AI gateway. Cheap to clone; holds a shared reqwest client.
#[derive(Clone)]
pub struct AiGatewayClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    text_model: String,
    image_model: String,
}

impl AiGatewayClient {
    /// Builds a client with the default gateway base URL and models.
    pub fn new(api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key,
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
        }
    }

    /// Overrides the base URL (proxies, compatible endpoints, tests).
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Overrides the text and image model identifiers.
    pub fn with_models(mut self, text_model: String, image_model: String) -> Self {
        self.text_model = text_model;
        self.image_model = image_model;
        self
    }

    fn system_prompt(feedback: Option<&str>) -> String {
        match feedback {
            Some(f) => format!(
                "{}\n\nThe user wants these improvements: {}",
                STYLE_DIRECTIVE, f
            ),
            None => STYLE_DIRECTIVE.to_string(),
        }
    }

    fn poster_prompt(post_content: &str, feedback: Option<&str>) -> String {
        let mut prompt = format!(
            "Create a visually striking promotional poster image for this Telegram post:\n\n\
             \"{}\"\n\n\
             Design requirements:\n\
             - Bold, eye-catching typography with the key message\n\
             - Modern, professional design with vibrant colors\n\
             - Clean layout suitable for social media\n\
             - Include a relevant visual element or icon\n\
             - Make it look like a professional social media graphic",
            post_content
        );
        if let Some(f) = feedback {
            prompt.push_str(&format!("\n\nImprove the poster with these changes: {}", f));
        }
        prompt.push_str("\n\nGenerate a high-quality poster image.");
        prompt
    }

    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse> {
        tracing::info!(
            model = %request.model,
            message_count = request.messages.len(),
            api_key = %mask_token(&self.api_key),
            "AI gateway request"
        );

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| TelepostError::Generation(format!("gateway request failed: {}", e)))?;

        let status = response.status();
        match status.as_u16() {
            429 => return Err(TelepostError::RateLimited),
            402 => return Err(TelepostError::QuotaExhausted),
            _ if !status.is_success() => {
                return Err(TelepostError::Generation(format!(
                    "gateway returned status {}",
                    status
                )))
            }
            _ => {}
        }

        response
            .json::<ChatResponse>()
            .await
            .map_err(|e| TelepostError::Generation(format!("invalid gateway response: {}", e)))
    }
}

#[async_trait]
impl Generator for AiGatewayClient {
    async fn generate_post(
        &self,
        input_text: &str,
        input_image_url: Option<&str>,
        feedback: Option<&str>,
    ) -> Result<String> {
        let user_message = match input_image_url {
            Some(url) => ChatMessage {
                role: "user",
                content: MessageContent::Parts(vec![
                    ContentPart::Text {
                        text: if input_text.is_empty() {
                            "Create an engaging Telegram post based on this image.".to_string()
                        } else {
                            input_text.to_string()
                        },
                    },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl {
                            url: url.to_string(),
                        },
                    },
                ]),
            },
            None => ChatMessage {
                role: "user",
                content: MessageContent::Text(format!(
                    "Create an engaging Telegram post about: {}",
                    input_text
                )),
            },
        };

        let request = ChatRequest {
            model: self.text_model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: MessageContent::Text(Self::system_prompt(feedback)),
                },
                user_message,
            ],
            modalities: None,
        };

        let response = self.chat(&request).await?;
        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();

        if content.trim().is_empty() {
            return Err(TelepostError::Generation(
                "gateway returned no text".to_string(),
            ));
        }

        tracing::info!(chars = content.len(), "post text generated");
        Ok(content)
    }

    async fn generate_poster(
        &self,
        post_content: &str,
        feedback: Option<&str>,
    ) -> Result<Vec<u8>> {
        let request = ChatRequest {
            model: self.image_model.clone(),
            messages: vec![ChatMessage {
                role: "user",
                content: MessageContent::Text(Self::poster_prompt(post_content, feedback)),
            }],
            modalities: Some(vec!["image".to_string(), "text".to_string()]),
        };

        let response = self.chat(&request).await?;
        let data_url = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.images.into_iter().next())
            .map(|i| i.image_url.url)
            .ok_or_else(|| TelepostError::Generation("gateway returned no image".to_string()))?;

        // The image arrives as a data URL; everything after "base64," is payload.
        let payload = data_url
            .split_once("base64,")
            .map(|(_, rest)| rest)
            .ok_or_else(|| {
                TelepostError::Generation("gateway image is not a base64 data URL".to_string())
            })?;

        let bytes = base64::engine::general_purpose::STANDARD
            .decode(payload)
            .map_err(|e| TelepostError::Generation(format!("invalid image payload: {}", e)))?;

        tracing::info!(bytes = bytes.len(), "poster image generated");
        Ok(bytes)
    }
}
