use anyhow::Result;
use serde_json::Value;
use std::path::PathBuf;
use tokio::fs;
use tracing::{debug, warn};

use crate::types::post::{Post, PostStatus};

/// 帖子存储，整份列表保存在一个JSON文件中，最新的在前
pub struct PostsStore {
    path: PathBuf,
}

impl PostsStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// 读取全部帖子。文件缺失或无法解析时视为空列表，单条损坏的记录会被跳过
    pub async fn load(&self) -> Vec<Post> {
        if !self.path.exists() {
            return Vec::new();
        }

        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "读取帖子文件失败");
                return Vec::new();
            }
        };

        let entries = match serde_json::from_str::<Vec<Value>>(&content) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "帖子文件格式错误");
                return Vec::new();
            }
        };

        let posts: Vec<Post> = entries
            .into_iter()
            .filter_map(|entry| serde_json::from_value(entry).ok())
            .collect();
        debug!(count = posts.len(), "已加载帖子");
        posts
    }

    /// 整体重写帖子文件
    pub async fn save(&self, posts: &[Post]) -> Result<()> {
        // 确保目录存在
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let mut content = serde_json::to_string_pretty(posts)?;
        content.push('\n');
        fs::write(&self.path, content).await?;
        Ok(())
    }

    pub async fn get_all(&self, status: Option<PostStatus>) -> Vec<Post> {
        let posts = self.load().await;
        match status {
            Some(status) => posts.into_iter().filter(|p| p.status == status).collect(),
            None => posts,
        }
    }

    pub async fn get_by_id(&self, id: &str) -> Option<Post> {
        self.load().await.into_iter().find(|p| p.id == id)
    }

    /// 同id的帖子原位替换，否则插入到最前面
    pub async fn upsert(&self, post: Post) -> Result<Post> {
        let mut posts = self.load().await;
        match posts.iter_mut().find(|p| p.id == post.id) {
            Some(existing) => *existing = post.clone(),
            None => posts.insert(0, post.clone()),
        }
        self.save(&posts).await?;
        Ok(post)
    }

    /// 修改指定帖子并写回，找不到时返回 `None`
    pub async fn update<F>(&self, id: &str, change: F) -> Result<Option<Post>>
    where
        F: FnOnce(&mut Post),
    {
        let mut posts = self.load().await;
        let Some(post) = posts.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };

        change(post);
        let updated = post.clone();
        self.save(&posts).await?;
        Ok(Some(updated))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::idea::IdeaRecord;
    use chrono::Utc;
    use tempfile::TempDir;

    fn post(title: &str) -> Post {
        let idea = IdeaRecord {
            name: "Field Note".to_string(),
            idea: format!("Case study: {}", title),
            title: title.to_string(),
            text: "body".to_string(),
            image: "sketch".to_string(),
        };
        Post::draft(idea, "https://img".to_string(), Utc::now())
    }

    #[tokio::test]
    async fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = PostsStore::new(dir.path().join("posts.json"));

        assert!(store.load().await.is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("posts.json");
        std::fs::write(&path, "not json").unwrap();

        assert!(PostsStore::new(path).load().await.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_entries_are_skipped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("posts.json");
        let good = post("kept");
        let content = serde_json::to_string(&vec![
            serde_json::to_value(&good).unwrap(),
            serde_json::json!({"id": "broken"}),
        ])
        .unwrap();
        std::fs::write(&path, content).unwrap();

        let posts = PostsStore::new(path).load().await;
        assert_eq!(posts, vec![good]);
    }

    #[tokio::test]
    async fn test_upsert_inserts_newest_first_and_replaces() {
        let dir = TempDir::new().unwrap();
        let store = PostsStore::new(dir.path().join("nested").join("posts.json"));

        let first = store.upsert(post("first")).await.unwrap();
        let second = store.upsert(post("second")).await.unwrap();

        let titles: Vec<String> = store.load().await.into_iter().map(|p| p.title).collect();
        assert_eq!(titles, vec!["second", "first"]);

        let mut edited = first.clone();
        edited.title = "first, edited".to_string();
        store.upsert(edited).await.unwrap();

        let posts = store.load().await;
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].id, second.id);
        assert_eq!(posts[1].title, "first, edited");
    }

    #[tokio::test]
    async fn test_update_and_filter_by_status() {
        let dir = TempDir::new().unwrap();
        let store = PostsStore::new(dir.path().join("posts.json"));
        let saved = store.upsert(post("one")).await.unwrap();
        store.upsert(post("two")).await.unwrap();

        let updated = store
            .update(&saved.id, |p| p.status = PostStatus::Validated)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.status, PostStatus::Validated);

        let validated = store.get_all(Some(PostStatus::Validated)).await;
        assert_eq!(validated.len(), 1);
        assert_eq!(validated[0].id, saved.id);
        assert_eq!(store.get_all(None).await.len(), 2);

        assert!(store.update("missing", |_| {}).await.unwrap().is_none());
        assert!(store.get_by_id("missing").await.is_none());
    }
}
