//! Decoded in-memory image shared between the cache, targets and callbacks.

use std::fmt;
use std::io::Cursor;
use std::sync::Arc;

use image::{DynamicImage, ImageFormat};

/// A decoded image. Cloning is cheap (reference counted), so one fetch result
/// can be handed to the cache and to every waiting target.
#[derive(Clone)]
pub struct Image(Arc<DynamicImage>);

impl Image {
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self(Arc::new(image))
    }

    /// Decode an encoded image (PNG, JPEG, ...), guessing the format from its magic bytes.
    pub fn decode(bytes: &[u8]) -> Result<Self, image::ImageError> {
        image::load_from_memory(bytes).map(Self::from_dynamic)
    }

    /// Encode as PNG (used by the disk cache).
    pub fn encode_png(&self) -> Result<Vec<u8>, image::ImageError> {
        let mut buf = Cursor::new(Vec::new());
        self.0.write_to(&mut buf, ImageFormat::Png)?;
        Ok(buf.into_inner())
    }

    pub fn width(&self) -> u32 {
        self.0.width()
    }

    pub fn height(&self) -> u32 {
        self.0.height()
    }

    pub fn as_dynamic(&self) -> &DynamicImage {
        &self.0
    }

    /// True if both handles point at the same decoded image.
    pub fn ptr_eq(a: &Image, b: &Image) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }
}

impl From<DynamicImage> for Image {
    fn from(image: DynamicImage) -> Self {
        Self::from_dynamic(image)
    }
}

impl fmt::Debug for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Image")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}
