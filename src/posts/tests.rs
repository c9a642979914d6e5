#[cfg(test)]
mod tests {
    use crate::generator::agent::{AgentBackend, IdeaAgent};
    use crate::generator::stub::StubGenerator;
    use crate::generator::{IdeaPipeline, PipelineParts};
    use crate::posts::{ImageService, PostError, PostService, PostsStore, Publisher};
    use crate::research::ResearchCollaborator;
    use crate::types::post::{Post, PostStatus, PostUpdate};
    use anyhow::{Result, bail};
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    struct NoResearch;

    #[async_trait]
    impl ResearchCollaborator for NoResearch {
        async fn brief(&self, _query: &str) -> String {
            String::new()
        }
    }

    struct NoAgent;

    impl AgentBackend for NoAgent {
        fn build(&self, _research: Arc<dyn ResearchCollaborator>) -> Result<Box<dyn IdeaAgent>> {
            bail!("disabled")
        }
    }

    /// 记录描述并返回可预测的URL
    #[derive(Default)]
    struct RecordingImages {
        descriptions: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ImageService for RecordingImages {
        async fn generate_image(&self, description: &str) -> String {
            let mut descriptions = self.descriptions.lock().unwrap();
            descriptions.push(description.to_string());
            format!("https://images.test/{}", descriptions.len())
        }
    }

    struct FixedPublisher {
        url: Option<String>,
        fail: bool,
    }

    #[async_trait]
    impl Publisher for FixedPublisher {
        async fn publish(&self, _post: &Post) -> Result<Option<String>> {
            if self.fail {
                bail!("token expired");
            }
            Ok(self.url.clone())
        }
    }

    fn service(dir: &TempDir) -> (PostService, Arc<RecordingImages>) {
        let pipeline = IdeaPipeline::from_parts(PipelineParts {
            model: None,
            research: Arc::new(NoResearch),
            agent_backend: Arc::new(NoAgent),
            stub: Arc::new(StubGenerator::seeded(5)),
            prior_ideas_limit: 50,
            direct_max_tokens: 600,
            regenerate_max_tokens: 400,
        });
        let images = Arc::new(RecordingImages::default());
        let service = PostService::new(
            PostsStore::new(dir.path().join("posts.json")),
            Arc::new(pipeline),
            images.clone(),
        );
        (service, images)
    }

    #[tokio::test]
    async fn test_generate_stores_draft_at_front() {
        let dir = TempDir::new().unwrap();
        let (service, images) = service(&dir);

        let first = service.generate(Some("Testing")).await.unwrap();
        let second = service.generate(None).await.unwrap();

        assert_eq!(first.status, PostStatus::Draft);
        assert_eq!(first.created_at, first.updated_at);
        assert_eq!(first.image_url, "https://images.test/1");
        assert_eq!(
            first.image_prompt.as_deref(),
            Some("Testing minimal illustration, flat design, high contrast")
        );
        assert_eq!(
            images.descriptions.lock().unwrap()[0],
            "Testing minimal illustration, flat design, high contrast"
        );

        let ids: Vec<String> = service.list(None).await.into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[tokio::test]
    async fn test_unknown_id_is_not_found() {
        let dir = TempDir::new().unwrap();
        let (service, _) = service(&dir);

        assert!(matches!(service.get("nope").await, Err(PostError::NotFound(_))));
        assert!(matches!(service.delete("nope").await, Err(PostError::NotFound(_))));
        assert!(matches!(
            service.update("nope", PostUpdate::default()).await,
            Err(PostError::NotFound(_))
        ));
        assert!(matches!(
            service.regenerate_text("nope").await,
            Err(PostError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_update_applies_patch_and_bumps_timestamp() {
        let dir = TempDir::new().unwrap();
        let (service, _) = service(&dir);
        let post = service.generate(None).await.unwrap();

        let updated = service
            .update(
                &post.id,
                PostUpdate {
                    title: Some("Sharper title".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.title, "Sharper title");
        assert_eq!(updated.text, post.text);
        assert!(updated.updated_at >= post.updated_at);
        assert_eq!(service.get(&post.id).await.unwrap().title, "Sharper title");
    }

    #[tokio::test]
    async fn test_validate_requires_fields() {
        let dir = TempDir::new().unwrap();
        let (service, _) = service(&dir);
        let post = service.generate(None).await.unwrap();

        service
            .update(
                &post.id,
                PostUpdate {
                    image_url: Some("  ".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(matches!(
            service.validate(&post.id).await,
            Err(PostError::MissingFields(_))
        ));

        service
            .update(
                &post.id,
                PostUpdate {
                    image_url: Some("https://img".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let validated = service.validate(&post.id).await.unwrap();
        assert_eq!(validated.status, PostStatus::Validated);
        assert!(validated.validated_at.is_some());
    }

    #[tokio::test]
    async fn test_delete_is_soft() {
        let dir = TempDir::new().unwrap();
        let (service, _) = service(&dir);
        let post = service.generate(None).await.unwrap();

        let deleted = service.delete(&post.id).await.unwrap();

        assert_eq!(deleted.status, PostStatus::Deleted);
        assert!(deleted.deleted_at.is_some());
        assert_eq!(service.list(Some(PostStatus::Deleted)).await.len(), 1);
        assert!(service.list(Some(PostStatus::Draft)).await.is_empty());
    }

    #[tokio::test]
    async fn test_regenerate_image_falls_back_to_title_description() {
        let dir = TempDir::new().unwrap();
        let store = PostsStore::new(dir.path().join("posts.json"));
        let (service, images) = service(&dir);
        let post = service.generate(None).await.unwrap();

        store
            .update(&post.id, |p| {
                p.image_prompt = None;
                p.title = "Ship it".to_string();
            })
            .await
            .unwrap();

        let updated = service.regenerate_image(&post.id).await.unwrap();

        assert_eq!(updated.image_url, "https://images.test/2");
        assert_eq!(
            images.descriptions.lock().unwrap()[1],
            "Ship it minimal illustration, flat design"
        );
    }

    #[tokio::test]
    async fn test_regenerate_text_offline_appends_note() {
        let dir = TempDir::new().unwrap();
        let (service, _) = service(&dir);
        let post = service.generate(None).await.unwrap();

        let updated = service.regenerate_text(&post.id).await.unwrap();

        assert_eq!(
            updated.text,
            format!("{}\n\n(Updated for clarity and brevity.)", post.text)
        );
    }

    #[tokio::test]
    async fn test_publish_requires_validation() {
        let dir = TempDir::new().unwrap();
        let (service, _) = service(&dir);
        let post = service.generate(None).await.unwrap();
        let publisher = FixedPublisher {
            url: Some("https://social.test/p/1".to_string()),
            fail: false,
        };

        assert!(matches!(
            service.publish(&post.id, &publisher).await,
            Err(PostError::NotValidated(_))
        ));

        service.validate(&post.id).await.unwrap();
        let posted = service.publish(&post.id, &publisher).await.unwrap();

        assert_eq!(posted.status, PostStatus::Posted);
        assert!(posted.posted_at.is_some());
        assert_eq!(
            posted.linkedin_post_url.as_deref(),
            Some("https://social.test/p/1")
        );
    }

    #[tokio::test]
    async fn test_publish_failure_leaves_post_validated() {
        let dir = TempDir::new().unwrap();
        let (service, _) = service(&dir);
        let post = service.generate(None).await.unwrap();
        service.validate(&post.id).await.unwrap();

        let publisher = FixedPublisher {
            url: None,
            fail: true,
        };
        assert!(matches!(
            service.publish(&post.id, &publisher).await,
            Err(PostError::Publish(_))
        ));
        assert_eq!(
            service.get(&post.id).await.unwrap().status,
            PostStatus::Validated
        );
    }
}
