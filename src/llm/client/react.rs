//! ReAct模式的配置与响应类型

use serde_json::Value;

/// ReAct执行配置
#[derive(Debug, Clone)]
pub struct ReActConfig {
    /// 最大迭代次数
    pub max_iterations: usize,
    /// 达到最大迭代次数时是否返回部分结果
    pub return_partial_on_max_depth: bool,
}

impl Default for ReActConfig {
    fn default() -> Self {
        Self {
            max_iterations: 5,
            return_partial_on_max_depth: true,
        }
    }
}

/// ReAct执行结果
#[derive(Debug, Clone)]
pub struct ReActResponse {
    /// Agent最终回复的文本
    pub content: String,
    /// 因达到最大迭代次数中断时，最后一条助手消息的内容块
    pub partial_blocks: Vec<Value>,
    /// 工具调用记录
    pub tool_calls_history: Vec<String>,
    /// 是否因达到最大迭代次数而停止
    pub stopped_by_max_depth: bool,
}

impl ReActResponse {
    pub fn success(content: String) -> Self {
        Self {
            content,
            partial_blocks: Vec::new(),
            tool_calls_history: Vec::new(),
            stopped_by_max_depth: false,
        }
    }

    pub fn max_depth_reached(partial_blocks: Vec<Value>, tool_calls_history: Vec<String>) -> Self {
        Self {
            content: String::new(),
            partial_blocks,
            tool_calls_history,
            stopped_by_max_depth: true,
        }
    }
}
