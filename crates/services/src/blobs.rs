use std::collections::HashMap;
use std::sync::Arc;

use beast_core::model::ImageHandle;
use beast_core::render::SourceImage;

/// Registry of decoded images addressed by revocable handles.
///
/// Works like an object-url table: every `create` mints a fresh handle and the
/// image stays alive until the owner calls `revoke`.
#[derive(Debug, Default)]
pub struct BlobStore {
    next_id: u64,
    images: HashMap<ImageHandle, Arc<SourceImage>>,
}

impl BlobStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&mut self, image: SourceImage) -> ImageHandle {
        self.next_id += 1;
        let handle = ImageHandle::new(self.next_id);
        self.images.insert(handle, Arc::new(image));
        handle
    }

    #[must_use]
    pub fn get(&self, handle: ImageHandle) -> Option<Arc<SourceImage>> {
        self.images.get(&handle).cloned()
    }

    /// Releases the image. Returns `false` for unknown or already revoked handles.
    pub fn revoke(&mut self, handle: ImageHandle) -> bool {
        self.images.remove(&handle).is_some()
    }

    pub fn revoke_all(&mut self) {
        self.images.clear();
    }

    /// Number of handles that have not been revoked.
    #[must_use]
    pub fn live(&self) -> usize {
        self.images.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    fn pixel() -> SourceImage {
        SourceImage::from_rgba(RgbaImage::new(1, 1))
    }

    #[test]
    fn handles_are_unique_and_revocable() {
        let mut store = BlobStore::new();
        let first = store.create(pixel());
        let second = store.create(pixel());
        assert_ne!(first, second);
        assert_eq!(store.live(), 2);

        assert!(store.revoke(first));
        assert!(!store.revoke(first));
        assert!(store.get(first).is_none());
        assert!(store.get(second).is_some());
        assert_eq!(store.live(), 1);
    }
}
