use async_trait::async_trait;

use crate::error::FetchError;

/// Fetches image bytes for a `/fetchImage?url=...` route.
///
/// Implementations must treat any non-success response as an error; the bytes
/// returned on success are expected to be an encoded image.
#[async_trait]
pub trait AssetSource: Send + Sync {
    async fn fetch(&self, route: &str) -> Result<Vec<u8>, FetchError>;
}
