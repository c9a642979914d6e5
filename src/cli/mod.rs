use crate::config::{Config, LLMProvider};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Postwright - 由AI驱动的社交帖子草稿生成器
#[derive(Parser, Debug)]
#[command(name = "postwright")]
#[command(
    about = "Generates social post drafts with a research-assisted agent, falling back to a single model call and finally to offline templates."
)]
#[command(version)]
pub struct Args {
    /// 配置文件路径
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 数据目录，posts.json 保存在此
    #[arg(short, long)]
    pub data_dir: Option<PathBuf>,

    /// 是否启用详细日志
    #[arg(short, long)]
    pub verbose: bool,

    /// LLM Provider (anthropic, openai, deepseek, openrouter)
    #[arg(long)]
    pub llm_provider: Option<String>,

    /// LLM API KEY
    #[arg(long)]
    pub llm_api_key: Option<String>,

    /// 模型名称
    #[arg(long)]
    pub model: Option<String>,

    /// 禁用Agent模式，直接从单次模型调用开始
    #[arg(long)]
    pub no_agent: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// 生成一篇草稿并保存
    Generate {
        #[arg(long)]
        topic: Option<String>,
    },
    /// 只运行生成流水线，不保存
    Idea {
        #[arg(long)]
        topic: Option<String>,
    },
    /// 列出帖子
    List {
        /// draft, validated, posted, deleted
        #[arg(long)]
        status: Option<String>,
    },
    Show {
        id: String,
    },
    /// 修改标题、正文或配图URL
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        text: Option<String>,
        #[arg(long)]
        image_url: Option<String>,
    },
    Validate {
        id: String,
    },
    /// 软删除
    Delete {
        id: String,
    },
    RegenerateImage {
        id: String,
    },
    RegenerateText {
        id: String,
    },
}

impl Args {
    /// 将CLI参数转换为配置
    pub fn into_config(self) -> Result<(Config, Command)> {
        let mut config = if let Some(config_path) = &self.config {
            // 显式指定的配置文件必须可读
            Config::from_file(config_path)
                .with_context(|| format!("无法读取配置文件 {:?}", config_path))?
        } else {
            // 尝试从默认位置加载
            let default_config_path = std::env::current_dir()
                .unwrap_or_else(|_| PathBuf::from("."))
                .join("postwright.toml");

            if default_config_path.exists() {
                Config::from_file(&default_config_path).with_context(|| {
                    format!("无法读取默认配置文件 {:?}", default_config_path)
                })?
            } else {
                Config::default()
            }
        };

        // 覆盖配置文件中的设置
        if let Some(data_dir) = self.data_dir {
            config.data_dir = data_dir;
        }

        if let Some(provider_str) = self.llm_provider {
            match provider_str.parse::<LLMProvider>() {
                Ok(provider) => config.llm.provider = provider,
                Err(_) => eprintln!(
                    "⚠️ 警告: 未知的provider: {}，使用默认provider",
                    provider_str
                ),
            }
        }
        if let Some(llm_api_key) = self.llm_api_key {
            config.llm.api_key = llm_api_key;
        }
        if let Some(model) = self.model {
            config.llm.model = model;
        }
        if self.no_agent {
            config.agent.enabled = false;
        }
        if self.verbose {
            config.verbose = true;
        }

        Ok((config, self.command))
    }
}
