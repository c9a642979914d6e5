//! 创意生成流水线 - Agent → 直接生成 → 离线兜底 的分层回落

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::Config;
use crate::llm::client::{LLMClient, ModelClient};
use crate::research::{PerplexityResearcher, ResearchCollaborator, snippets};
use crate::types::idea::IdeaRecord;

pub mod agent;
pub mod balancer;
pub mod direct;
pub mod extractor;
pub mod prompts;
pub mod regenerate;
pub mod stub;

use agent::{AgentBackend, AgentOrchestrator, RigAgentBackend};
use direct::DirectGenerator;
use regenerate::TextRegenerator;
use stub::StubGenerator;

/// 一次生成请求
#[derive(Debug, Clone, Default)]
pub struct GenerationRequest {
    /// 历史创意，最新的在前
    pub existing_ideas: Vec<String>,
    /// 可选的聚焦话题
    pub topic: Option<String>,
}

impl GenerationRequest {
    pub fn new(existing_ideas: Vec<String>, topic: Option<String>) -> Self {
        Self {
            existing_ideas,
            topic: topic.filter(|t| !t.trim().is_empty()),
        }
    }

    pub fn topic(&self) -> Option<&str> {
        self.topic.as_deref()
    }
}

/// 生成策略的一层：要么产出创意，要么失败交给下一层
#[async_trait]
pub trait IdeaTier: Send + Sync {
    fn name(&self) -> &'static str;

    async fn produce(&self, request: &GenerationRequest) -> Result<IdeaRecord>;
}

/// 第一层：带调研工具的Agent
pub struct AgentTier {
    orchestrator: AgentOrchestrator,
}

#[async_trait]
impl IdeaTier for AgentTier {
    fn name(&self) -> &'static str {
        "agent"
    }

    async fn produce(&self, request: &GenerationRequest) -> Result<IdeaRecord> {
        self.orchestrator
            .try_generate(&request.existing_ideas, request.topic())
            .await
    }
}

/// 第二层：单次模型调用，进入前先就话题做一次调研
pub struct DirectTier {
    direct: Arc<DirectGenerator>,
    research: Arc<dyn ResearchCollaborator>,
}

#[async_trait]
impl IdeaTier for DirectTier {
    fn name(&self) -> &'static str {
        "direct"
    }

    async fn produce(&self, request: &GenerationRequest) -> Result<IdeaRecord> {
        let research_snippets = match request.topic() {
            Some(topic) if self.direct.has_model() => snippets(&self.research.brief(topic).await),
            _ => Vec::new(),
        };

        self.direct
            .try_generate(&request.existing_ideas, request.topic(), &research_snippets)
            .await
    }
}

/// 最后一层：离线兜底，不会失败
pub struct StubTier {
    stub: Arc<StubGenerator>,
}

#[async_trait]
impl IdeaTier for StubTier {
    fn name(&self) -> &'static str {
        "stub"
    }

    async fn produce(&self, request: &GenerationRequest) -> Result<IdeaRecord> {
        Ok(self.stub.generate(request.topic()))
    }
}

/// 流水线的外部依赖，便于测试时替换
pub struct PipelineParts {
    /// 模型调用能力，`None` 表示未配置模型凭证
    pub model: Option<Arc<dyn ModelClient>>,
    pub research: Arc<dyn ResearchCollaborator>,
    pub agent_backend: Arc<dyn AgentBackend>,
    pub stub: Arc<StubGenerator>,
    pub prior_ideas_limit: usize,
    pub direct_max_tokens: u32,
    pub regenerate_max_tokens: u32,
}

/// 创意生成流水线
pub struct IdeaPipeline {
    tiers: Vec<Box<dyn IdeaTier>>,
    stub: Arc<StubGenerator>,
    regenerator: TextRegenerator,
}

impl IdeaPipeline {
    pub fn from_parts(parts: PipelineParts) -> Self {
        let has_model = parts.model.is_some();
        let direct = Arc::new(DirectGenerator::new(
            parts.model.clone(),
            parts.stub.clone(),
            parts.direct_max_tokens,
        ));

        let tiers: Vec<Box<dyn IdeaTier>> = vec![
            Box::new(AgentTier {
                orchestrator: AgentOrchestrator::new(
                    has_model,
                    parts.agent_backend,
                    parts.research.clone(),
                    parts.prior_ideas_limit,
                ),
            }),
            Box::new(DirectTier {
                direct,
                research: parts.research,
            }),
            Box::new(StubTier {
                stub: parts.stub.clone(),
            }),
        ];

        Self {
            tiers,
            stub: parts.stub,
            regenerator: TextRegenerator::new(parts.model, parts.regenerate_max_tokens),
        }
    }

    /// 根据配置组装真实的模型、调研与Agent后端
    pub fn from_config(config: &Config) -> Self {
        let model: Option<Arc<dyn ModelClient>> = if config.llm.has_credential() {
            match LLMClient::new(config.llm.clone()) {
                Ok(client) => Some(Arc::new(client)),
                Err(e) => {
                    warn!(error = %e, "模型客户端创建失败，仅使用离线兜底");
                    None
                }
            }
        } else {
            info!("未配置模型凭证，使用离线兜底生成");
            None
        };

        Self::from_parts(PipelineParts {
            model,
            research: Arc::new(PerplexityResearcher::new(config.research.clone())),
            agent_backend: Arc::new(RigAgentBackend::new(config.llm.clone(), &config.agent)),
            stub: Arc::new(StubGenerator::new()),
            prior_ideas_limit: config.agent.prior_ideas_limit,
            direct_max_tokens: config.llm.direct_max_tokens,
            regenerate_max_tokens: config.llm.regenerate_max_tokens,
        })
    }

    /// 生成一条帖子创意，从不失败
    pub async fn generate_post_idea(
        &self,
        existing_ideas: &[String],
        topic: Option<&str>,
    ) -> IdeaRecord {
        let request = GenerationRequest::new(existing_ideas.to_vec(), topic.map(str::to_string));

        for tier in &self.tiers {
            match tier.produce(&request).await {
                Ok(record) => {
                    info!(tier = tier.name(), "创意生成完成");
                    return record.normalized(request.topic());
                }
                Err(e) => {
                    warn!(tier = tier.name(), error = %e, "生成失败，回落到下一层");
                }
            }
        }

        self.stub.generate(request.topic()).normalized(request.topic())
    }

    /// 正文改写器
    pub fn regenerator(&self) -> &TextRegenerator {
        &self.regenerator
    }
}
