//! ReAct执行器 - 负责执行带工具的多轮对话

use anyhow::Result;
use rig::completion::{AssistantContent, Message, PromptError};
use serde_json::{Value, json};
use tracing::{debug, warn};

use super::providers::ProviderAgent;
use super::react::{ReActConfig, ReActResponse};

/// ReAct执行器
pub struct ReActExecutor;

impl ReActExecutor {
    /// 执行ReAct循环逻辑
    pub async fn execute(
        agent: &ProviderAgent,
        user_prompt: &str,
        config: &ReActConfig,
    ) -> Result<ReActResponse> {
        debug!(
            max_iterations = config.max_iterations,
            "♻️ 激活ReAct Agent模式"
        );

        match agent.multi_turn(user_prompt, config.max_iterations).await {
            Ok(response) => {
                debug!("✅ ReAct Agent任务完成");
                Ok(ReActResponse::success(response))
            }
            Err(PromptError::MaxDepthError {
                max_depth,
                chat_history,
                prompt: _,
            }) => {
                warn!(max_depth, "⚠️ 达到最大迭代次数，触发中断");

                if config.return_partial_on_max_depth {
                    let (blocks, tool_calls) = Self::extract_partial_result(&chat_history);
                    Ok(ReActResponse::max_depth_reached(blocks, tool_calls))
                } else {
                    Err(anyhow::anyhow!(
                        "ReAct Agent因达到最大迭代次数({})而未完成任务",
                        max_depth
                    ))
                }
            }
            Err(e) => Err(anyhow::anyhow!("ReAct Agent任务执行失败: {}", e)),
        }
    }

    /// 从聊天历史中提取部分结果：最后一条带文本的助手消息的全部内容块，以及工具调用记录
    fn extract_partial_result(chat_history: &[Message]) -> (Vec<Value>, Vec<String>) {
        let mut tool_calls = Vec::new();

        for msg in chat_history {
            if let Message::Assistant { content, .. } = msg {
                for c in content.iter() {
                    if let AssistantContent::ToolCall(tool_call) = c {
                        tool_calls.push(format!(
                            "{}({})",
                            tool_call.function.name, tool_call.function.arguments
                        ));
                    }
                }
            }
        }

        let blocks = chat_history
            .iter()
            .rev()
            .find_map(|msg| {
                let Message::Assistant { content, .. } = msg else {
                    return None;
                };
                let has_text = content
                    .iter()
                    .any(|c| matches!(c, AssistantContent::Text(text) if !text.text.is_empty()));
                if !has_text {
                    return None;
                }
                Some(content.iter().filter_map(Self::content_to_block).collect())
            })
            .unwrap_or_default();

        (blocks, tool_calls)
    }

    fn content_to_block(content: &AssistantContent) -> Option<Value> {
        match content {
            AssistantContent::Text(text) => Some(json!({"type": "text", "text": text.text})),
            AssistantContent::ToolCall(tool_call) => Some(json!({
                "type": "tool_use",
                "name": tool_call.function.name,
                "input": tool_call.function.arguments,
            })),
            _ => None,
        }
    }
}
