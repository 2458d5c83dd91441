use crate::types::{Credential, UpstreamError};

/// Album catalog trait - one authenticated "which albums does this key own" call
///
/// Implementations make exactly one attempt per call; retry policy belongs to
/// the caller.
#[async_trait::async_trait]
pub trait CatalogClient: Send + Sync {
    async fn list_owned_albums(
        &self,
        base_url: &str,
        credential: &Credential,
    ) -> Result<Vec<String>, UpstreamError>;
}
