//! 调研服务 - 为生成prompt提供简短的事实素材

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::ResearchConfig;

/// 单次调研结果最多保留的行数
pub const MAX_SNIPPETS: usize = 3;

/// 调研协作方：给定查询返回尽力而为的文字答复，无法回答时返回空串，从不报错
#[async_trait]
pub trait ResearchCollaborator: Send + Sync {
    async fn brief(&self, query: &str) -> String;
}

/// 将调研答复拆分为非空行，最多保留 [`MAX_SNIPPETS`] 条
pub fn snippets(brief: &str) -> Vec<String> {
    brief
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take(MAX_SNIPPETS)
        .map(str::to_string)
        .collect()
}

/// 基于 Perplexity chat-completions 接口的调研客户端
#[derive(Clone)]
pub struct PerplexityResearcher {
    config: ResearchConfig,
    http: reqwest::Client,
}

impl PerplexityResearcher {
    pub const SYSTEM_PROMPT: &'static str =
        "Provide 3 concise bullet facts with sources about the topic. Return plain text.";

    pub fn new(config: ResearchConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    async fn request_brief(&self, query: &str) -> Result<String> {
        let url = format!(
            "{}/chat/completions",
            self.config.api_base_url.trim_end_matches('/')
        );
        let body = json!({
            "model": self.config.model,
            "messages": [
                {"role": "system", "content": Self::SYSTEM_PROMPT},
                {"role": "user", "content": query},
            ],
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
        });

        let response: Value = self
            .http
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .timeout(Duration::from_secs(self.config.timeout_seconds))
            .send()
            .await
            .context("调研请求发送失败")?
            .error_for_status()
            .context("调研服务返回错误状态")?
            .json()
            .await
            .context("调研响应解析失败")?;

        response
            .pointer("/choices/0/message/content")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| anyhow!("调研响应缺少content字段"))
    }
}

#[async_trait]
impl ResearchCollaborator for PerplexityResearcher {
    async fn brief(&self, query: &str) -> String {
        if !self.config.has_credential() || query.trim().is_empty() {
            return String::new();
        }

        match self.request_brief(query).await {
            Ok(text) => {
                debug!(query, chars = text.len(), "调研完成");
                text
            }
            Err(e) => {
                warn!(query, error = %e, "调研失败，返回空结果");
                String::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snippets_skips_blank_lines_and_caps() {
        let brief = "- fact one\n\n  \n- fact two\n- fact three\n- fact four";
        let result = snippets(brief);

        assert_eq!(result, vec!["- fact one", "- fact two", "- fact three"]);
    }

    #[test]
    fn test_snippets_empty() {
        assert!(snippets("").is_empty());
        assert!(snippets("\n \n").is_empty());
    }

    #[tokio::test]
    async fn test_brief_without_credential_is_empty() {
        let researcher = PerplexityResearcher::new(ResearchConfig {
            api_key: String::new(),
            ..Default::default()
        });

        assert_eq!(researcher.brief("remote work").await, "");
    }

    #[tokio::test]
    async fn test_brief_unreachable_service_is_empty() {
        let researcher = PerplexityResearcher::new(ResearchConfig {
            api_key: "pplx-test".to_string(),
            api_base_url: "http://127.0.0.1:9".to_string(),
            timeout_seconds: 2,
            ..Default::default()
        });

        assert_eq!(researcher.brief("remote work").await, "");
    }
}
