use anyhow::Result;
use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use postwright::cli::{Args, Command};
use postwright::posts::PostService;
use postwright::types::post::{PostStatus, PostUpdate};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let (config, command) = args.into_config()?;

    let level = if config.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .init();

    let service = PostService::from_config(&config);

    match command {
        Command::Generate { topic } => print_json(&service.generate(topic.as_deref()).await?),
        Command::Idea { topic } => {
            let prior_ideas = service.prior_ideas().await;
            let idea = service
                .pipeline()
                .generate_post_idea(&prior_ideas, topic.as_deref())
                .await;
            print_json(&idea)
        }
        Command::List { status } => {
            let status = status
                .map(|s| s.parse::<PostStatus>())
                .transpose()
                .map_err(anyhow::Error::msg)?;
            print_json(&service.list(status).await)
        }
        Command::Show { id } => print_json(&service.get(&id).await?),
        Command::Update {
            id,
            title,
            text,
            image_url,
        } => {
            let patch = PostUpdate {
                title,
                text,
                image_url,
            };
            print_json(&service.update(&id, patch).await?)
        }
        Command::Validate { id } => print_json(&service.validate(&id).await?),
        Command::Delete { id } => print_json(&service.delete(&id).await?),
        Command::RegenerateImage { id } => print_json(&service.regenerate_image(&id).await?),
        Command::RegenerateText { id } => print_json(&service.regenerate_text(&id).await?),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
