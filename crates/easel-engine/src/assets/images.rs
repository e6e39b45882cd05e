use std::path::Path;

use crate::gpu::{GpuBackend, ResourceId, TextureFilter};

use super::store::Store;
use super::AssetError;

slotmap::new_key_type! {
    /// Handle to an [`Image`] owned by the [`ImageManager`].
    pub struct ImageId;
}

/// Decoded RGBA8 pixels plus the texture they are uploaded to.
///
/// `pixels` is a CPU copy; edits become visible after
/// [`ImageManager::update_pixels`].
#[derive(Debug)]
pub struct Image {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
    pub texture: ResourceId,
}

#[derive(Debug)]
pub struct ImageManager {
    store: Store<ImageId, Image>,
}

impl Default for ImageManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageManager {
    pub fn new() -> Self {
        Self {
            store: Store::new("image"),
        }
    }

    /// Creates an image from raw `width * height * 4` RGBA bytes.
    pub fn create(
        &mut self,
        backend: &mut impl GpuBackend,
        width: u32,
        height: u32,
        pixels: Vec<u8>,
    ) -> Result<ImageId, AssetError> {
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            log::error!("image: {width}x{height} needs {expected} bytes, got {}", pixels.len());
            return Err(AssetError::DataSize {
                expected,
                actual: pixels.len(),
            });
        }

        let texture = backend
            .create_texture(width, height, &pixels, TextureFilter::Linear)
            .inspect_err(|e| log::error!("image: texture creation failed: {e}"))?;

        Ok(self.store.insert(Image {
            width,
            height,
            pixels,
            texture,
        }))
    }

    /// Reads and decodes an image file (PNG, JPEG, BMP, GIF).
    pub fn load(
        &mut self,
        backend: &mut impl GpuBackend,
        path: impl AsRef<Path>,
    ) -> Result<ImageId, AssetError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| {
            log::error!("image: cannot read {}: {source}", path.display());
            AssetError::Io {
                path: path.to_path_buf(),
                source,
            }
        })?;

        let decoded = image::load_from_memory(&bytes).map_err(|source| {
            log::error!("image: cannot decode {}: {source}", path.display());
            AssetError::Decode {
                path: path.to_path_buf(),
                source,
            }
        })?;

        let rgba = decoded.to_rgba8();
        let (width, height) = rgba.dimensions();
        let id = self.create(backend, width, height, rgba.into_raw())?;
        log::debug!("image: loaded {} ({width}x{height})", path.display());
        Ok(id)
    }

    pub fn get(&self, id: ImageId) -> Result<&Image, AssetError> {
        self.store.get(id)
    }

    /// Mutable CPU pixels; call [`update_pixels`](Self::update_pixels) afterwards.
    pub fn pixels_mut(&mut self, id: ImageId) -> Result<&mut [u8], AssetError> {
        Ok(self.store.get_mut(id)?.pixels.as_mut_slice())
    }

    /// Re-uploads the CPU pixels to the image texture.
    pub fn update_pixels(
        &mut self,
        backend: &mut impl GpuBackend,
        id: ImageId,
    ) -> Result<(), AssetError> {
        let image = self.store.get(id)?;
        backend.update_texture(image.texture, &image.pixels)?;
        Ok(())
    }

    pub fn destroy(&mut self, backend: &mut impl GpuBackend, id: ImageId) -> Result<(), AssetError> {
        let image = self.store.remove(id)?;
        backend.release_texture(image.texture);
        Ok(())
    }

    pub fn release_all(&mut self, backend: &mut impl GpuBackend) {
        for image in self.store.drain() {
            backend.release_texture(image.texture);
        }
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpu::{GpuCall, RecordingBackend};

    fn write_png(name: &str, w: u32, h: u32) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("easel-{}-{name}.png", std::process::id()));
        let img = image::RgbaImage::from_pixel(w, h, image::Rgba([255, 0, 0, 255]));
        img.save(&path).unwrap();
        path
    }

    // ── create ────────────────────────────────────────────────────────────

    #[test]
    fn create_uploads_a_texture() {
        let mut b = RecordingBackend::new();
        let mut images = ImageManager::new();
        let id = images.create(&mut b, 2, 1, vec![0; 8]).unwrap();

        let img = images.get(id).unwrap();
        assert_eq!((img.width, img.height), (2, 1));
        assert!(matches!(b.calls()[0], GpuCall::CreateTexture { width: 2, height: 1, .. }));
    }

    #[test]
    fn create_rejects_wrong_length() {
        let mut b = RecordingBackend::new();
        let mut images = ImageManager::new();
        let err = images.create(&mut b, 2, 2, vec![0; 3]).unwrap_err();
        assert!(matches!(err, AssetError::DataSize { expected: 16, actual: 3 }));
        assert!(images.is_empty());
    }

    #[test]
    fn zero_size_surfaces_gpu_error() {
        let mut b = RecordingBackend::new();
        let mut images = ImageManager::new();
        let err = images.create(&mut b, 0, 0, Vec::new()).unwrap_err();
        assert!(matches!(err, AssetError::Gpu(_)));
    }

    // ── load ──────────────────────────────────────────────────────────────

    #[test]
    fn load_decodes_png_to_rgba() {
        let path = write_png("load", 3, 2);
        let mut b = RecordingBackend::new();
        let mut images = ImageManager::new();
        let id = images.load(&mut b, &path).unwrap();
        std::fs::remove_file(&path).ok();

        let img = images.get(id).unwrap();
        assert_eq!((img.width, img.height), (3, 2));
        assert_eq!(&img.pixels[..4], &[255, 0, 0, 255]);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let mut b = RecordingBackend::new();
        let mut images = ImageManager::new();
        let err = images.load(&mut b, "/definitely/not/here.png").unwrap_err();
        assert!(matches!(err, AssetError::Io { .. }));
    }

    #[test]
    fn load_garbage_is_decode_error() {
        let path = std::env::temp_dir().join(format!("easel-{}-garbage.png", std::process::id()));
        std::fs::write(&path, b"not an image").unwrap();
        let mut b = RecordingBackend::new();
        let mut images = ImageManager::new();
        let err = images.load(&mut b, &path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(matches!(err, AssetError::Decode { .. }));
    }

    // ── lifecycle ─────────────────────────────────────────────────────────

    #[test]
    fn destroy_releases_texture_and_invalidates_id() {
        let mut b = RecordingBackend::new();
        let mut images = ImageManager::new();
        let id = images.create(&mut b, 1, 1, vec![0; 4]).unwrap();
        let tex = images.get(id).unwrap().texture;

        images.destroy(&mut b, id).unwrap();
        assert!(b.calls().contains(&GpuCall::ReleaseTexture(tex)));
        assert!(images.get(id).unwrap_err().is_not_found());
        assert!(images.destroy(&mut b, id).is_err());
    }

    #[test]
    fn pixel_edits_reupload() {
        let mut b = RecordingBackend::new();
        let mut images = ImageManager::new();
        let id = images.create(&mut b, 1, 1, vec![0; 4]).unwrap();
        images.pixels_mut(id).unwrap()[3] = 255;
        images.update_pixels(&mut b, id).unwrap();

        let tex = images.get(id).unwrap().texture;
        assert_eq!(b.calls().last(), Some(&GpuCall::UpdateTexture(tex)));
    }

    #[test]
    fn release_all_frees_every_texture() {
        let mut b = RecordingBackend::new();
        let mut images = ImageManager::new();
        images.create(&mut b, 1, 1, vec![0; 4]).unwrap();
        images.create(&mut b, 1, 1, vec![0; 4]).unwrap();
        images.release_all(&mut b);
        assert!(images.is_empty());
        assert_eq!(b.live_textures(), 1);
    }
}
