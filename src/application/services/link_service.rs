//! Link creation, resolution and maintenance.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::json;
use uuid::Uuid;

use crate::domain::entities::{Link, LinkPatch, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::code_generator::{DEFAULT_CODE_LENGTH, generate_unique_code};
use crate::utils::url_validator::validate_long_url;

/// Bounded retries of the generate-and-insert sequence when a concurrent
/// request persists the same generated code first.
const GENERATED_INSERT_ATTEMPTS: usize = 3;

/// Service for creating and resolving short links.
pub struct LinkService<L: LinkRepository> {
    link_repository: Arc<L>,
}

impl<L: LinkRepository> LinkService<L> {
    pub fn new(link_repository: Arc<L>) -> Self {
        Self { link_repository }
    }

    /// Creates a short link.
    ///
    /// With a custom code the uniqueness oracle is queried exactly once and
    /// a collision fails immediately; generation is never attempted.
    /// Otherwise a code is generated against the repository-backed oracle
    /// and inserted. Two concurrent requests can still both observe a
    /// generated candidate as free; the database unique index decides the
    /// winner and the loser retries the whole sequence, a bounded number of
    /// times.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] for an invalid URL
    /// - [`AppError::Conflict`] when a custom code is taken
    /// - [`AppError::Internal`] when generation retries are exhausted
    pub async fn create_short_link(
        &self,
        long_url: String,
        custom_code: Option<String>,
        expires_at: Option<DateTime<Utc>>,
        owner_ip: Option<String>,
    ) -> Result<Link, AppError> {
        let long_url = validate_long_url(&long_url)?;

        if let Some(custom) = custom_code {
            if self.link_repository.code_exists(&custom).await? {
                return Err(AppError::conflict(
                    "Custom short code already exists",
                    json!({ "code": custom }),
                ));
            }

            return self
                .link_repository
                .create(NewLink {
                    code: custom,
                    long_url,
                    expires_at,
                    owner_ip,
                })
                .await;
        }

        for attempt in 1..=GENERATED_INSERT_ATTEMPTS {
            let oracle = self.link_repository.clone();
            let code = generate_unique_code(
                move |candidate| {
                    let oracle = oracle.clone();
                    async move { oracle.code_exists(&candidate).await }
                },
                DEFAULT_CODE_LENGTH,
            )
            .await?;

            let new_link = NewLink {
                code,
                long_url: long_url.clone(),
                expires_at,
                owner_ip: owner_ip.clone(),
            };

            match self.link_repository.create(new_link).await {
                Err(AppError::Conflict { .. }) => {
                    tracing::warn!(
                        "Generated code lost an insert race (attempt {}/{})",
                        attempt,
                        GENERATED_INSERT_ATTEMPTS
                    );
                }
                other => return other,
            }
        }

        Err(AppError::internal(
            "Short code generation exhausted",
            json!({ "attempts": GENERATED_INSERT_ATTEMPTS }),
        ))
    }

    /// Resolves a short code for redirecting.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] for an unknown code
    /// - [`AppError::Gone`] for an expired link
    pub async fn resolve(&self, code: &str) -> Result<Link, AppError> {
        let link = self
            .link_repository
            .find_by_code(code)
            .await?
            .ok_or_else(|| AppError::not_found("Short link not found", json!({ "code": code })))?;

        if link.is_expired() {
            return Err(AppError::gone("Short URL expired", json!({ "code": code })));
        }

        Ok(link)
    }

    /// Fetches a link by id.
    pub async fn get_link(&self, id: Uuid) -> Result<Link, AppError> {
        self.link_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Short link not found", json!({ "id": id })))
    }

    /// Lists links (newest first) with the total count.
    pub async fn list_links(&self, page: i64, page_size: i64) -> Result<(Vec<Link>, i64), AppError> {
        let links = self.link_repository.list(page, page_size).await?;
        let total = self.link_repository.count().await?;
        Ok((links, total))
    }

    /// Applies a partial update; absent fields keep their stored value.
    pub async fn update_link(&self, id: Uuid, patch: LinkPatch) -> Result<Link, AppError> {
        let patch = LinkPatch {
            long_url: match patch.long_url {
                Some(url) => Some(validate_long_url(&url)?),
                None => None,
            },
            expires_at: patch.expires_at,
        };

        self.link_repository.update(id, patch).await
    }

    /// Deletes a link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] when nothing matched.
    pub async fn delete_link(&self, id: Uuid) -> Result<(), AppError> {
        if self.link_repository.delete(id).await? {
            Ok(())
        } else {
            Err(AppError::not_found(
                "Short link not found",
                json!({ "id": id }),
            ))
        }
    }

    /// Fire-and-forget hit counting for a served redirect.
    pub async fn record_hit(&self, code: &str) {
        if let Err(e) = self.link_repository.record_hit(code).await {
            tracing::error!("Failed to record hit for {}: {}", code, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockLinkRepository;
    use chrono::Duration;

    fn link_with_code(code: &str) -> Link {
        Link {
            id: Uuid::new_v4(),
            code: code.to_string(),
            long_url: "https://example.com/".to_string(),
            created_at: Utc::now(),
            expires_at: None,
            hit_count: 0,
            owner_ip: None,
        }
    }

    #[tokio::test]
    async fn test_create_with_generated_code() {
        let mut repo = MockLinkRepository::new();

        repo.expect_code_exists().times(1).returning(|_| Ok(false));
        repo.expect_create()
            .withf(|new_link| new_link.code.len() == DEFAULT_CODE_LENGTH)
            .times(1)
            .returning(|new_link| {
                let mut link = link_with_code(&new_link.code);
                link.long_url = new_link.long_url;
                Ok(link)
            });

        let service = LinkService::new(Arc::new(repo));
        let link = service
            .create_short_link("https://example.com".to_string(), None, None, None)
            .await
            .unwrap();

        assert_eq!(link.long_url, "https://example.com/");
    }

    #[tokio::test]
    async fn test_create_with_custom_code_queries_oracle_once() {
        let mut repo = MockLinkRepository::new();

        repo.expect_code_exists()
            .withf(|code| code == "my-code")
            .times(1)
            .returning(|_| Ok(false));
        repo.expect_create()
            .withf(|new_link| new_link.code == "my-code")
            .times(1)
            .returning(|new_link| Ok(link_with_code(&new_link.code)));

        let service = LinkService::new(Arc::new(repo));
        let link = service
            .create_short_link(
                "https://example.com".to_string(),
                Some("my-code".to_string()),
                None,
                None,
            )
            .await
            .unwrap();

        assert_eq!(link.code, "my-code");
    }

    #[tokio::test]
    async fn test_custom_code_conflict_fails_without_generation() {
        let mut repo = MockLinkRepository::new();

        repo.expect_code_exists()
            .withf(|code| code == "taken")
            .times(1)
            .returning(|_| Ok(true));
        repo.expect_create().times(0);

        let service = LinkService::new(Arc::new(repo));
        let result = service
            .create_short_link(
                "https://example.com".to_string(),
                Some("taken".to_string()),
                None,
                None,
            )
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_invalid_url_never_touches_storage() {
        let mut repo = MockLinkRepository::new();
        repo.expect_code_exists().times(0);
        repo.expect_create().times(0);

        let service = LinkService::new(Arc::new(repo));
        let result = service
            .create_short_link("not-a-url".to_string(), None, None, None)
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_insert_race_is_retried_then_succeeds() {
        let mut repo = MockLinkRepository::new();

        repo.expect_code_exists().returning(|_| Ok(false));

        let mut attempts = 0;
        repo.expect_create().times(2).returning(move |new_link| {
            attempts += 1;
            if attempts == 1 {
                Err(AppError::conflict("taken", json!({})))
            } else {
                Ok(link_with_code(&new_link.code))
            }
        });

        let service = LinkService::new(Arc::new(repo));
        let result = service
            .create_short_link("https://example.com".to_string(), None, None, None)
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_repeated_insert_conflict_exhausts_generation() {
        let mut repo = MockLinkRepository::new();

        repo.expect_code_exists().returning(|_| Ok(false));
        repo.expect_create()
            .times(GENERATED_INSERT_ATTEMPTS)
            .returning(|_| Err(AppError::conflict("taken", json!({}))));

        let service = LinkService::new(Arc::new(repo));
        let result = service
            .create_short_link("https://example.com".to_string(), None, None, None)
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Internal { .. }));
    }

    #[tokio::test]
    async fn test_resolve_unknown_code_is_not_found() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code().returning(|_| Ok(None));

        let service = LinkService::new(Arc::new(repo));
        let result = service.resolve("nothere").await;

        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_resolve_expired_link_is_gone() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code().returning(|code| {
            let mut link = link_with_code(code);
            link.expires_at = Some(Utc::now() - Duration::hours(1));
            Ok(Some(link))
        });

        let service = LinkService::new(Arc::new(repo));
        let result = service.resolve("old1234").await;

        assert!(matches!(result.unwrap_err(), AppError::Gone { .. }));
    }

    #[tokio::test]
    async fn test_delete_missing_link_is_not_found() {
        let mut repo = MockLinkRepository::new();
        repo.expect_delete().returning(|_| Ok(false));

        let service = LinkService::new(Arc::new(repo));
        let result = service.delete_link(Uuid::new_v4()).await;

        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_update_validates_replacement_url() {
        let mut repo = MockLinkRepository::new();
        repo.expect_update().times(0);

        let service = LinkService::new(Arc::new(repo));
        let result = service
            .update_link(
                Uuid::new_v4(),
                LinkPatch {
                    long_url: Some("javascript:alert(1)".to_string()),
                    expires_at: None,
                },
            )
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Validation { .. }));
    }
}
