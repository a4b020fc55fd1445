// src/services/link.rs - Business logic
use std::sync::Arc;

use async_trait::async_trait;
use validator::Validate;

use crate::errors::AppError;
use crate::models::{Link, ShortenRequest};
use crate::repositories::LinkRepositoryTrait;
use crate::utils::slug::{random_slug, SLUG_LENGTH};

type Result<T> = std::result::Result<T, AppError>;

/// Redraw budget for random slug allocation. The collision probability at
/// 62^6 combinations is negligible, so hitting this cap means the table is
/// close to saturation and the request should fail instead of spinning.
const MAX_SLUG_ATTEMPTS: usize = 10;

#[async_trait]
pub trait LinkServiceTrait {
    async fn shorten(&self, dto: ShortenRequest) -> Result<Link>;
    async fn resolve(&self, slug: &str) -> Result<Link>;
    async fn history(&self) -> Result<Vec<Link>>;
}

pub struct LinkService<T: LinkRepositoryTrait> {
    repository: Arc<T>,
}

impl<T: LinkRepositoryTrait> LinkService<T> {
    pub fn new(repository: Arc<T>) -> Self {
        Self { repository }
    }

    // Draw random slugs until one is free, within the attempt budget.
    // Check-then-insert is not atomic; a concurrent creator can still win
    // the race, in which case the insert itself reports the conflict.
    async fn allocate_slug(&self) -> Result<String> {
        let mut attempts = 0;
        loop {
            let candidate = random_slug(SLUG_LENGTH);
            if self.repository.find_by_slug(&candidate).await?.is_none() {
                return Ok(candidate);
            }

            attempts += 1;
            if attempts >= MAX_SLUG_ATTEMPTS {
                return Err(AppError::Internal(format!(
                    "Failed to allocate a unique slug after {} attempts",
                    MAX_SLUG_ATTEMPTS
                )));
            }
        }
    }
}

#[async_trait]
impl<T: LinkRepositoryTrait + Send + Sync> LinkServiceTrait for LinkService<T> {
    async fn shorten(&self, dto: ShortenRequest) -> Result<Link> {
        dto.validate()?;

        // A requested alias is used verbatim once trimmed; a whitespace-only
        // alias counts as absent
        let slug = match dto.alias.as_deref().map(str::trim) {
            Some(alias) if !alias.is_empty() => {
                if self.repository.find_by_slug(alias).await?.is_some() {
                    return Err(AppError::Conflict(format!(
                        "Alias '{}' is already in use",
                        alias
                    )));
                }
                alias.to_string()
            }
            _ => self.allocate_slug().await?,
        };

        let record = self.repository.create(&slug, &dto.original_url).await?;

        Ok(record)
    }

    async fn resolve(&self, slug: &str) -> Result<Link> {
        self.repository
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No link found for slug '{}'", slug)))
    }

    async fn history(&self) -> Result<Vec<Link>> {
        Ok(self.repository.list_all().await?)
    }
}
