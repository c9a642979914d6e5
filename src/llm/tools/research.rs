//! 调研工具 - 供Agent在生成过程中按需查询事实素材

use rig::tool::Tool;
use schemars::JsonSchema;
use serde::Deserialize;
use std::convert::Infallible;
use std::sync::Arc;
use tracing::debug;

use crate::research::{ResearchCollaborator, snippets};

/// 调研工具，失败时返回空串而不是错误
#[derive(Clone)]
pub struct AgentToolResearch {
    research: Arc<dyn ResearchCollaborator>,
}

/// 调研参数
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ResearchArgs {
    /// 简短的查询（话题或问题）
    pub query: String,
}

impl AgentToolResearch {
    pub fn new(research: Arc<dyn ResearchCollaborator>) -> Self {
        Self { research }
    }

    /// 将调研答复整理为最多3条要点
    pub async fn lookup(&self, query: &str) -> String {
        let brief = self.research.brief(query).await;
        snippets(&brief)
            .iter()
            .map(|line| format!("- {}", line.trim_start_matches(['-', '*', ' '])))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Tool for AgentToolResearch {
    const NAME: &'static str = "research_search";

    type Error = Infallible;
    type Args = ResearchArgs;
    type Output = String;

    async fn definition(&self, _prompt: String) -> rig::completion::ToolDefinition {
        rig::completion::ToolDefinition {
            name: Self::NAME.to_string(),
            description: "Use this to research the topic or clarify concepts with credible sources. Input should be a short query (topic or question). Returns brief bullet facts, or an empty string when nothing was found.".to_string(),
            parameters: serde_json::to_value(schemars::schema_for!(ResearchArgs))
                .unwrap_or_else(|_| serde_json::json!({"type": "object"})),
        }
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        debug!(query = %args.query, "🔧 tool called...research_search");
        Ok(self.lookup(&args.query).await)
    }
}
