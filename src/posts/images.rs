//! 配图生成 - 调用图片生成接口，失败时使用占位图

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use regex::Regex;
use serde_json::{Value, json};
use std::sync::LazyLock;
use std::time::Duration;
use tracing::{info, warn};

use crate::config::ImageConfig;

static NON_SLUG_CHARS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

const MAX_SLUG_LEN: usize = 24;

/// 配图服务：给定描述返回图片URL，从不失败
#[async_trait]
pub trait ImageService: Send + Sync {
    async fn generate_image(&self, description: &str) -> String;
}

/// 将描述转换为URL安全的短关键字
pub fn slug(description: &str) -> String {
    let lowered = description.to_lowercase();
    let replaced = NON_SLUG_CHARS.replace_all(&lowered, "-");
    let trimmed = replaced.trim_matches('-');
    let keyword = if trimmed.is_empty() { "post" } else { trimmed };
    keyword.chars().take(MAX_SLUG_LEN).collect()
}

/// 基于描述的确定性占位图
pub fn placeholder_image_url(description: &str) -> String {
    format!("https://picsum.photos/seed/{}-lg/800/450", slug(description))
}

/// 基于OpenAI images接口的配图生成器
#[derive(Clone)]
pub struct OpenAiImageGenerator {
    config: ImageConfig,
    http: reqwest::Client,
}

impl OpenAiImageGenerator {
    pub fn new(config: ImageConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    async fn request_image(&self, description: &str) -> Result<String> {
        let url = format!(
            "{}/images/generations",
            self.config.api_base_url.trim_end_matches('/')
        );
        let body = json!({
            "model": self.config.model,
            "prompt": description,
            "size": self.config.size,
            "quality": self.config.quality,
            "n": 1,
        });

        let response: Value = self
            .http
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .timeout(Duration::from_secs(self.config.timeout_seconds))
            .send()
            .await
            .context("图片生成请求发送失败")?
            .error_for_status()
            .context("图片服务返回错误状态")?
            .json()
            .await
            .context("图片生成响应解析失败")?;

        response
            .pointer("/data/0/url")
            .and_then(Value::as_str)
            .filter(|url| !url.is_empty())
            .map(str::to_string)
            .ok_or_else(|| anyhow!("图片生成响应中没有URL"))
    }
}

#[async_trait]
impl ImageService for OpenAiImageGenerator {
    async fn generate_image(&self, description: &str) -> String {
        if !self.config.has_credential() {
            return placeholder_image_url(description);
        }

        match self.request_image(description).await {
            Ok(url) => {
                info!("🖼️ 配图生成完成");
                url
            }
            Err(e) => {
                warn!(error = %e, "配图生成失败，使用占位图");
                placeholder_image_url(description)
            }
        }
    }
}
