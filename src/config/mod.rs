use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

/// LLM Provider类型
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub enum LLMProvider {
    #[serde(rename = "anthropic")]
    #[default]
    Anthropic,
    #[serde(rename = "openai")]
    OpenAI,
    #[serde(rename = "deepseek")]
    DeepSeek,
    #[serde(rename = "openrouter")]
    OpenRouter,
}

impl LLMProvider {
    /// 未显式配置API基地址时使用的默认值
    pub fn default_base_url(&self) -> &'static str {
        match self {
            LLMProvider::Anthropic => "https://api.anthropic.com",
            LLMProvider::OpenAI => "https://api.openai.com/v1",
            LLMProvider::DeepSeek => "https://api.deepseek.com",
            LLMProvider::OpenRouter => "https://openrouter.ai/api/v1",
        }
    }
}

impl std::fmt::Display for LLMProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LLMProvider::Anthropic => write!(f, "anthropic"),
            LLMProvider::OpenAI => write!(f, "openai"),
            LLMProvider::DeepSeek => write!(f, "deepseek"),
            LLMProvider::OpenRouter => write!(f, "openrouter"),
        }
    }
}

impl std::str::FromStr for LLMProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "anthropic" => Ok(LLMProvider::Anthropic),
            "openai" => Ok(LLMProvider::OpenAI),
            "deepseek" => Ok(LLMProvider::DeepSeek),
            "openrouter" => Ok(LLMProvider::OpenRouter),
            _ => Err(format!("Unknown provider: {}", s)),
        }
    }
}

/// 应用程序配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct Config {
    /// 数据目录，存放posts.json
    pub data_dir: PathBuf,

    /// LLM模型配置
    pub llm: LLMConfig,

    /// Agent生成策略配置
    pub agent: AgentConfig,

    /// 调研服务配置
    pub research: ResearchConfig,

    /// 图片生成服务配置
    pub image: ImageConfig,

    /// 是否启用详细日志
    pub verbose: bool,
}

/// LLM模型配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct LLMConfig {
    /// LLM Provider类型
    pub provider: LLMProvider,

    /// LLM API KEY，为空时走离线兜底
    pub api_key: String,

    /// LLM API基地址，为空时使用provider默认值
    pub api_base_url: String,

    /// 模型名称
    pub model: String,

    /// Agent模式的最大tokens
    pub agent_max_tokens: u32,

    /// 直接生成模式的最大tokens
    pub direct_max_tokens: u32,

    /// 正文改写的最大tokens
    pub regenerate_max_tokens: u32,

    /// 温度
    pub temperature: f64,

    /// 单次模型调用的超时时间（秒）
    pub timeout_seconds: u64,

    /// Agent最大对话轮次
    pub max_iterations: usize,
}

/// Agent生成策略配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct AgentConfig {
    /// 是否启用带工具的Agent模式
    pub enabled: bool,

    /// 写入prompt的历史创意数量上限
    pub prior_ideas_limit: usize,
}

/// 调研服务配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ResearchConfig {
    /// 调研服务API KEY，为空时调研结果恒为空
    pub api_key: String,

    pub api_base_url: String,

    pub model: String,

    pub max_tokens: u32,

    pub temperature: f64,

    /// 超时时间（秒）
    pub timeout_seconds: u64,
}

/// 图片生成服务配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ImageConfig {
    /// 图片服务API KEY，为空时使用占位图
    pub api_key: String,

    pub api_base_url: String,

    pub model: String,

    pub size: String,

    pub quality: String,

    /// 超时时间（秒）
    pub timeout_seconds: u64,
}

impl Config {
    /// 从文件加载配置
    pub fn from_file(path: &PathBuf) -> Result<Self> {
        let mut file =
            File::open(path).context(format!("Failed to open config file: {:?}", path))?;
        let mut content = String::new();
        file.read_to_string(&mut content)
            .context("Failed to read config file")?;

        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }

    /// 帖子存储文件路径
    pub fn posts_path(&self) -> PathBuf {
        self.data_dir.join("posts.json")
    }
}

impl LLMConfig {
    /// 是否配置了模型凭证
    pub fn has_credential(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    /// 实际使用的API基地址
    pub fn base_url(&self) -> String {
        if self.api_base_url.trim().is_empty() {
            self.provider.default_base_url().to_string()
        } else {
            self.api_base_url.clone()
        }
    }
}

impl ResearchConfig {
    pub fn has_credential(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

impl ImageConfig {
    pub fn has_credential(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

/// 读取第一个非空的环境变量
fn env_first(names: &[&str]) -> String {
    names
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .find(|value| !value.trim().is_empty())
        .unwrap_or_default()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            llm: LLMConfig::default(),
            agent: AgentConfig::default(),
            research: ResearchConfig::default(),
            image: ImageConfig::default(),
            verbose: false,
        }
    }
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            provider: LLMProvider::default(),
            api_key: env_first(&["POSTWRIGHT_LLM_API_KEY", "ANTHROPIC_API_KEY"]),
            api_base_url: String::new(),
            model: String::from("claude-3-5-sonnet-20240620"),
            agent_max_tokens: 700,
            direct_max_tokens: 600,
            regenerate_max_tokens: 400,
            temperature: 0.7,
            timeout_seconds: 20,
            max_iterations: 5,
        }
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            prior_ideas_limit: 50,
        }
    }
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            api_key: env_first(&["PERPLEXITY_API_KEY"]),
            api_base_url: String::from("https://api.perplexity.ai"),
            model: String::from("llama-3.1-sonar-small-128k-online"),
            max_tokens: 300,
            temperature: 0.3,
            timeout_seconds: 15,
        }
    }
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            api_key: env_first(&["OPENAI_API_KEY"]),
            api_base_url: String::from("https://api.openai.com/v1"),
            model: String::from("dall-e-3"),
            size: String::from("1792x1024"),
            quality: String::from("hd"),
            timeout_seconds: 30,
        }
    }
}
