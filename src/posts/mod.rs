//! 帖子生命周期 - 生成草稿、编辑、校验、删除、重新生成与发布

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tracing::info;

use crate::config::Config;
use crate::generator::IdeaPipeline;
use crate::types::idea::IdeaRecord;
use crate::types::post::{Post, PostStatus, PostUpdate};

pub mod images;
pub mod store;

pub use images::{ImageService, OpenAiImageGenerator, placeholder_image_url};
pub use store::PostsStore;

#[derive(Debug, thiserror::Error)]
pub enum PostError {
    #[error("post not found: {0}")]
    NotFound(String),

    #[error("post {0} is missing title, text or image url")]
    MissingFields(String),

    #[error("post {0} must be validated before publishing")]
    NotValidated(String),

    #[error("publish failed: {0}")]
    Publish(String),

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

pub type PostResult<T> = std::result::Result<T, PostError>;

/// 发布渠道。返回发布后的帖子链接（如果有）
#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(&self, post: &Post) -> anyhow::Result<Option<String>>;
}

pub struct PostService {
    store: PostsStore,
    pipeline: Arc<IdeaPipeline>,
    images: Arc<dyn ImageService>,
}

impl PostService {
    pub fn new(
        store: PostsStore,
        pipeline: Arc<IdeaPipeline>,
        images: Arc<dyn ImageService>,
    ) -> Self {
        Self {
            store,
            pipeline,
            images,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            PostsStore::new(config.posts_path()),
            Arc::new(IdeaPipeline::from_config(config)),
            Arc::new(OpenAiImageGenerator::new(config.image.clone())),
        )
    }

    pub fn pipeline(&self) -> &IdeaPipeline {
        &self.pipeline
    }

    /// 已存帖子的非空创意，最新的在前
    pub async fn prior_ideas(&self) -> Vec<String> {
        self.store
            .get_all(None)
            .await
            .into_iter()
            .filter_map(|p| p.idea)
            .filter(|idea| !idea.is_empty())
            .collect()
    }

    /// 以已存帖子的创意为历史，生成一篇新草稿并存到最前面
    pub async fn generate(&self, topic: Option<&str>) -> PostResult<Post> {
        let existing_ideas = self.prior_ideas().await;
        let idea = self
            .pipeline
            .generate_post_idea(&existing_ideas, topic)
            .await;
        let image_url = self.images.generate_image(&image_description(&idea)).await;

        let draft = Post::draft(idea, image_url, Utc::now());
        let saved = self.store.upsert(draft).await?;
        info!(id = %saved.id, title = %saved.title, "📝 新草稿已保存");
        Ok(saved)
    }

    pub async fn list(&self, status: Option<PostStatus>) -> Vec<Post> {
        self.store.get_all(status).await
    }

    pub async fn get(&self, id: &str) -> PostResult<Post> {
        self.store
            .get_by_id(id)
            .await
            .ok_or_else(|| PostError::NotFound(id.to_string()))
    }

    pub async fn update(&self, id: &str, patch: PostUpdate) -> PostResult<Post> {
        self.modify(id, |post| patch.apply(post)).await
    }

    pub async fn validate(&self, id: &str) -> PostResult<Post> {
        let post = self.get(id).await?;
        if !post.has_required_fields() {
            return Err(PostError::MissingFields(id.to_string()));
        }

        let now = Utc::now();
        self.modify(id, |post| {
            post.status = PostStatus::Validated;
            post.validated_at = Some(now);
        })
        .await
    }

    /// 软删除，记录保留在存储中
    pub async fn delete(&self, id: &str) -> PostResult<Post> {
        let now = Utc::now();
        self.modify(id, |post| {
            post.status = PostStatus::Deleted;
            post.deleted_at = Some(now);
        })
        .await
    }

    pub async fn regenerate_image(&self, id: &str) -> PostResult<Post> {
        let post = self.get(id).await?;
        let description = match post.image_prompt.as_deref().filter(|p| !p.trim().is_empty()) {
            Some(prompt) => prompt.to_string(),
            None => format!("{} minimal illustration, flat design", post.title),
        };

        let image_url = self.images.generate_image(&description).await;
        self.modify(id, |post| post.image_url = image_url).await
    }

    pub async fn regenerate_text(&self, id: &str) -> PostResult<Post> {
        let post = self.get(id).await?;
        let text = self
            .pipeline
            .regenerator()
            .regenerate(&post.title, &post.text)
            .await;

        self.modify(id, |post| post.text = text).await
    }

    pub async fn publish(&self, id: &str, publisher: &dyn Publisher) -> PostResult<Post> {
        let post = self.get(id).await?;
        if post.status != PostStatus::Validated {
            return Err(PostError::NotValidated(id.to_string()));
        }

        let url = publisher
            .publish(&post)
            .await
            .map_err(|e| PostError::Publish(format!("{:#}", e)))?;

        let now = Utc::now();
        self.modify(id, |post| {
            post.status = PostStatus::Posted;
            post.posted_at = Some(now);
            post.linkedin_post_url = url;
        })
        .await
    }

    /// 修改指定帖子，同时刷新 `updatedAt`
    async fn modify<F>(&self, id: &str, change: F) -> PostResult<Post>
    where
        F: FnOnce(&mut Post),
    {
        self.store
            .update(id, |post| {
                change(post);
                post.updated_at = Utc::now();
            })
            .await?
            .ok_or_else(|| PostError::NotFound(id.to_string()))
    }
}

fn image_description(idea: &IdeaRecord) -> String {
    if idea.image.trim().is_empty() {
        idea.title.clone()
    } else {
        idea.image.clone()
    }
}

// Include tests
#[cfg(test)]
mod tests;
