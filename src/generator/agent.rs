//! Agent编排 - 借助调研工具的多轮生成策略

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::{AgentConfig, LLMConfig};
use crate::generator::balancer::least_used_category;
use crate::generator::extractor::{AgentOutput, extract_idea};
use crate::generator::prompts::{agent_system_prompt, agent_task_prompt};
use crate::llm::client::{LLMClient, ReActConfig};
use crate::llm::tools::research::AgentToolResearch;
use crate::research::ResearchCollaborator;
use crate::types::idea::IdeaRecord;

/// 可执行一次 system + human 两条消息对话的Agent
#[async_trait]
pub trait IdeaAgent: Send + Sync {
    async fn run(&self, system_prompt: &str, task_prompt: &str) -> Result<AgentOutput>;
}

/// Agent后端工厂。构建失败即视为Agent框架不可用
pub trait AgentBackend: Send + Sync {
    fn build(&self, research: Arc<dyn ResearchCollaborator>) -> Result<Box<dyn IdeaAgent>>;
}

/// 基于rig的Agent后端
pub struct RigAgentBackend {
    llm: LLMConfig,
    enabled: bool,
}

impl RigAgentBackend {
    pub fn new(llm: LLMConfig, agent: &AgentConfig) -> Self {
        Self {
            llm,
            enabled: agent.enabled,
        }
    }
}

impl AgentBackend for RigAgentBackend {
    fn build(&self, research: Arc<dyn ResearchCollaborator>) -> Result<Box<dyn IdeaAgent>> {
        if !self.enabled {
            bail!("Agent模式已禁用");
        }

        let client = LLMClient::new(self.llm.clone())?;
        let react_config = ReActConfig {
            max_iterations: self.llm.max_iterations,
            return_partial_on_max_depth: true,
        };

        Ok(Box::new(RigIdeaAgent {
            client,
            research_tool: AgentToolResearch::new(research),
            react_config,
        }))
    }
}

struct RigIdeaAgent {
    client: LLMClient,
    research_tool: AgentToolResearch,
    react_config: ReActConfig,
}

#[async_trait]
impl IdeaAgent for RigIdeaAgent {
    async fn run(&self, system_prompt: &str, task_prompt: &str) -> Result<AgentOutput> {
        let response = self
            .client
            .prompt_with_research(
                system_prompt,
                task_prompt,
                &self.research_tool,
                &self.react_config,
            )
            .await?;

        if !response.tool_calls_history.is_empty() {
            debug!(tool_calls = ?response.tool_calls_history, "Agent工具调用记录");
        }

        if response.stopped_by_max_depth {
            Ok(AgentOutput::Blocks(response.partial_blocks))
        } else {
            Ok(AgentOutput::Text(response.content))
        }
    }
}

/// Agent编排器：检查前置条件、平衡分类、调用Agent并提取结构化结果
pub struct AgentOrchestrator {
    has_model_credential: bool,
    backend: Arc<dyn AgentBackend>,
    research: Arc<dyn ResearchCollaborator>,
    prior_ideas_limit: usize,
}

impl AgentOrchestrator {
    pub fn new(
        has_model_credential: bool,
        backend: Arc<dyn AgentBackend>,
        research: Arc<dyn ResearchCollaborator>,
        prior_ideas_limit: usize,
    ) -> Self {
        Self {
            has_model_credential,
            backend,
            research,
            prior_ideas_limit,
        }
    }

    /// 任何一步失败都返回错误，由调用方回落到下一层
    pub async fn try_generate(
        &self,
        existing_ideas: &[String],
        topic: Option<&str>,
    ) -> Result<IdeaRecord> {
        if !self.has_model_credential {
            bail!("未配置模型凭证");
        }

        let agent = self
            .backend
            .build(self.research.clone())
            .context("Agent不可用")?;

        let (category, counts) = least_used_category(existing_ideas);
        debug!(%category, %counts, "分类统计");

        let system_prompt = agent_system_prompt();
        let task_prompt =
            agent_task_prompt(existing_ideas, self.prior_ideas_limit, category, topic);

        let output = agent.run(&system_prompt, &task_prompt).await?;
        let record = extract_idea(&output)?;

        info!(%category, title = %record.title, "✅ Agent生成完成");
        Ok(record)
    }
}
