//! 正文改写

use std::sync::Arc;
use tracing::warn;

use crate::generator::prompts::{REGENERATE_SYSTEM_PROMPT, regenerate_prompt};
use crate::llm::client::ModelClient;

/// 无模型时附加在正文后的标记
pub const OFFLINE_REWRITE_SUFFIX: &str = "\n\n(Updated for clarity and brevity.)";

pub struct TextRegenerator {
    model: Option<Arc<dyn ModelClient>>,
    max_tokens: u32,
}

impl TextRegenerator {
    pub fn new(model: Option<Arc<dyn ModelClient>>, max_tokens: u32) -> Self {
        Self { model, max_tokens }
    }

    /// 改写正文，从不失败：模型调用失败或返回空白时保留原文
    pub async fn regenerate(&self, title: &str, text: &str) -> String {
        let Some(model) = &self.model else {
            return format!("{}{}", text, OFFLINE_REWRITE_SUFFIX);
        };

        match model
            .complete(
                REGENERATE_SYSTEM_PROMPT,
                &regenerate_prompt(title, text),
                self.max_tokens,
            )
            .await
        {
            Ok(reply) if !reply.trim().is_empty() => reply.trim().to_string(),
            Ok(_) => text.to_string(),
            Err(e) => {
                warn!(error = %e, "正文改写失败，保留原文");
                text.to_string()
            }
        }
    }
}
