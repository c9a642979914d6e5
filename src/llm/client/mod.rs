//! LLM客户端 - 提供统一的LLM服务接口

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;

use crate::config::LLMConfig;
use crate::llm::tools::research::AgentToolResearch;

mod providers;
mod react;
mod react_executor;

pub use react::{ReActConfig, ReActResponse};

use providers::ProviderClient;
use react_executor::ReActExecutor;

/// 模型调用能力：一次system + user的补全调用，失败时返回错误
#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn complete(&self, system_prompt: &str, user_prompt: &str, max_tokens: u32)
    -> Result<String>;
}

/// LLM客户端 - 提供统一的LLM服务接口
#[derive(Clone)]
pub struct LLMClient {
    config: LLMConfig,
    client: ProviderClient,
}

impl LLMClient {
    /// 创建新的LLM客户端
    pub fn new(config: LLMConfig) -> Result<Self> {
        let client = ProviderClient::new(&config)
            .with_context(|| format!("无法创建 {} 客户端", config.provider))?;
        Ok(Self { client, config })
    }

    /// 为单次调用加上超时限制，不做重试
    async fn with_timeout<T, Fut>(&self, timeout: Duration, operation: Fut) -> Result<T>
    where
        Fut: Future<Output = Result<T>>,
    {
        match tokio::time::timeout(timeout, operation).await {
            Ok(result) => result,
            Err(_) => Err(anyhow::anyhow!(
                "调用模型服务超时 ({}秒)",
                timeout.as_secs()
            )),
        }
    }

    /// 使用ReAct模式进行带调研工具的多轮对话
    pub async fn prompt_with_research(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        research_tool: &AgentToolResearch,
        react_config: &ReActConfig,
    ) -> Result<ReActResponse> {
        let agent =
            self.client
                .create_agent_with_research(system_prompt, &self.config, research_tool);

        // 每一轮都可能产生一次模型调用，整体超时按轮次放大
        let rounds = react_config.max_iterations.max(1) as u64;
        let timeout = Duration::from_secs(self.config.timeout_seconds.saturating_mul(rounds));

        self.with_timeout(
            timeout,
            ReActExecutor::execute(&agent, user_prompt, react_config),
        )
        .await
    }

    /// 简化的单轮对话方法（不使用工具）
    pub async fn prompt_without_react(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        max_tokens: u32,
    ) -> Result<String> {
        let agent = self
            .client
            .create_agent(system_prompt, &self.config, max_tokens);

        self.with_timeout(
            Duration::from_secs(self.config.timeout_seconds),
            agent.prompt(user_prompt),
        )
        .await
    }
}

#[async_trait]
impl ModelClient for LLMClient {
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        max_tokens: u32,
    ) -> Result<String> {
        self.prompt_without_react(system_prompt, user_prompt, max_tokens)
            .await
    }
}
