use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::idea::IdeaRecord;

/// 帖子状态
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    #[default]
    Draft,
    Validated,
    Posted,
    Deleted,
}

impl std::fmt::Display for PostStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PostStatus::Draft => write!(f, "draft"),
            PostStatus::Validated => write!(f, "validated"),
            PostStatus::Posted => write!(f, "posted"),
            PostStatus::Deleted => write!(f, "deleted"),
        }
    }
}

impl std::str::FromStr for PostStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "draft" => Ok(PostStatus::Draft),
            "validated" => Ok(PostStatus::Validated),
            "posted" => Ok(PostStatus::Posted),
            "deleted" => Ok(PostStatus::Deleted),
            _ => Err(format!("Unknown post status: {}", s)),
        }
    }
}

/// 持久化的帖子草稿
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub idea: Option<String>,
    pub title: String,
    pub text: String,
    pub image_url: String,
    #[serde(default)]
    pub image_prompt: Option<String>,
    pub status: PostStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub validated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub posted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub linkedin_post_url: Option<String>,
}

impl Post {
    /// 由生成的创意构造一篇新的草稿
    pub fn draft(idea: IdeaRecord, image_url: String, now: DateTime<Utc>) -> Self {
        let non_blank = |s: String| if s.trim().is_empty() { None } else { Some(s) };

        let title = non_blank(idea.title).unwrap_or_else(|| IdeaRecord::DEFAULT_TITLE.to_string());
        let text = non_blank(idea.text).unwrap_or_else(|| IdeaRecord::DEFAULT_TEXT.to_string());

        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: Some(idea.name),
            idea: Some(idea.idea),
            title,
            text,
            image_url,
            image_prompt: non_blank(idea.image),
            status: PostStatus::Draft,
            created_at: now,
            updated_at: now,
            validated_at: None,
            posted_at: None,
            deleted_at: None,
            linkedin_post_url: None,
        }
    }

    /// 校验发布前必需的字段
    pub fn has_required_fields(&self) -> bool {
        !self.title.trim().is_empty()
            && !self.text.trim().is_empty()
            && !self.image_url.trim().is_empty()
    }
}

/// 帖子的局部更新
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PostUpdate {
    pub title: Option<String>,
    pub text: Option<String>,
    pub image_url: Option<String>,
}

impl PostUpdate {
    pub fn apply(self, post: &mut Post) {
        if let Some(title) = self.title {
            post.title = title;
        }
        if let Some(text) = self.text {
            post.text = text;
        }
        if let Some(image_url) = self.image_url {
            post.image_url = image_url;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_idea() -> IdeaRecord {
        IdeaRecord {
            name: "Field Note".to_string(),
            idea: "Case study: shipping weekly".to_string(),
            title: "Ship weekly".to_string(),
            text: "We shipped every week for a year.".to_string(),
            image: "calendar illustration".to_string(),
        }
    }

    #[test]
    fn test_post_status_roundtrip_names() {
        assert_eq!("validated".parse::<PostStatus>().unwrap(), PostStatus::Validated);
        assert_eq!(PostStatus::Posted.to_string(), "posted");
        assert!("archived".parse::<PostStatus>().is_err());
    }

    #[test]
    fn test_draft_from_idea() {
        let now = Utc::now();
        let post = Post::draft(sample_idea(), "https://img".to_string(), now);

        assert_eq!(post.status, PostStatus::Draft);
        assert_eq!(post.created_at, now);
        assert_eq!(post.updated_at, now);
        assert_eq!(post.image_prompt.as_deref(), Some("calendar illustration"));
        assert!(uuid::Uuid::parse_str(&post.id).is_ok());
        assert!(post.has_required_fields());
    }

    #[test]
    fn test_draft_blank_image_prompt_is_none() {
        let mut idea = sample_idea();
        idea.image = "  ".to_string();
        idea.title = String::new();
        let post = Post::draft(idea, "https://img".to_string(), Utc::now());

        assert!(post.image_prompt.is_none());
        assert_eq!(post.title, "Untitled");
    }

    #[test]
    fn test_post_serializes_camel_case() {
        let post = Post::draft(sample_idea(), "https://img".to_string(), Utc::now());
        let json = serde_json::to_value(&post).unwrap();

        assert!(json.get("imageUrl").is_some());
        assert!(json.get("createdAt").is_some());
        assert_eq!(json["status"], "draft");
    }
}
