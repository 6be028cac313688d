use crate::domain::model::FetchedResponse;
use crate::utils::error::Result;
use async_trait::async_trait;

/// HTTP GET capability used by the aggregator.
///
/// Implementations fail with `SocialworthError::Transport` on network errors
/// and on non-success statuses.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchedResponse>;
}
