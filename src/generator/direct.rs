//! 直接生成 - 单次模型调用生成创意，失败时回落到离线兜底

use anyhow::{Result, anyhow};
use std::sync::Arc;
use tracing::{info, warn};

use crate::generator::extractor::parse_object;
use crate::generator::prompts::{DIRECT_SYSTEM_PROMPT, direct_prompt};
use crate::generator::stub::StubGenerator;
use crate::llm::client::ModelClient;
use crate::types::idea::IdeaRecord;

/// 直接生成器。`model` 为 `None` 表示未配置模型凭证
pub struct DirectGenerator {
    model: Option<Arc<dyn ModelClient>>,
    stub: Arc<StubGenerator>,
    max_tokens: u32,
}

impl DirectGenerator {
    pub fn new(
        model: Option<Arc<dyn ModelClient>>,
        stub: Arc<StubGenerator>,
        max_tokens: u32,
    ) -> Self {
        Self {
            model,
            stub,
            max_tokens,
        }
    }

    pub fn has_model(&self) -> bool {
        self.model.is_some()
    }

    /// 生成一条创意，从不失败：模型不可用或调用、解析失败时使用离线兜底
    pub async fn generate<S: AsRef<str> + Sync>(
        &self,
        existing_ideas: &[S],
        topic: Option<&str>,
        research_snippets: &[String],
    ) -> IdeaRecord {
        match self.try_generate(existing_ideas, topic, research_snippets).await {
            Ok(record) => record,
            Err(e) => {
                if self.has_model() {
                    warn!(error = %e, "直接生成失败，使用离线兜底");
                }
                self.stub.generate(topic)
            }
        }
    }

    /// 单次模型调用，不含离线兜底
    pub async fn try_generate<S: AsRef<str> + Sync>(
        &self,
        existing_ideas: &[S],
        topic: Option<&str>,
        research_snippets: &[String],
    ) -> Result<IdeaRecord> {
        let model = self
            .model
            .as_ref()
            .ok_or_else(|| anyhow!("未配置模型凭证"))?;

        let prompt = direct_prompt(existing_ideas, topic, research_snippets);
        let reply = model
            .complete(DIRECT_SYSTEM_PROMPT, &prompt, self.max_tokens)
            .await?;

        let object = parse_object(&reply).ok_or_else(|| anyhow!("模型回复不是JSON对象"))?;
        let record = IdeaRecord::from_object_lenient(&object, topic);
        info!(title = %record.title, "✅ 直接生成完成");
        Ok(record)
    }
}
