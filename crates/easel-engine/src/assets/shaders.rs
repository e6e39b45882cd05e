use std::path::Path;

use crate::gpu::{GpuBackend, ResourceId};

use super::store::Store;
use super::AssetError;

slotmap::new_key_type! {
    /// Handle to a [`Shader`] owned by the [`ShaderManager`].
    pub struct ShaderId;
}

/// A compiled WGSL program exposing `vs_main` and `fs_main`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Shader {
    pub resource: ResourceId,
}

#[derive(Debug)]
pub struct ShaderManager {
    store: Store<ShaderId, Shader>,
}

impl Default for ShaderManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ShaderManager {
    pub fn new() -> Self {
        Self {
            store: Store::new("shader"),
        }
    }

    /// Compiles WGSL source. Compile errors are logged and returned.
    pub fn create(&mut self, backend: &mut impl GpuBackend, source: &str) -> Result<ShaderId, AssetError> {
        let resource = backend
            .create_shader(source)
            .inspect_err(|e| log::error!("shader: {e}"))?;
        Ok(self.store.insert(Shader { resource }))
    }

    pub fn load(
        &mut self,
        backend: &mut impl GpuBackend,
        path: impl AsRef<Path>,
    ) -> Result<ShaderId, AssetError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| {
            log::error!("shader: cannot read {}: {source}", path.display());
            AssetError::Io {
                path: path.to_path_buf(),
                source,
            }
        })?;
        self.create(backend, &source)
    }

    pub fn get(&self, id: ShaderId) -> Result<&Shader, AssetError> {
        self.store.get(id)
    }

    pub fn destroy(&mut self, backend: &mut impl GpuBackend, id: ShaderId) -> Result<(), AssetError> {
        let shader = self.store.remove(id)?;
        backend.release_shader(shader.resource);
        Ok(())
    }

    pub fn release_all(&mut self, backend: &mut impl GpuBackend) {
        for shader in self.store.drain() {
            backend.release_shader(shader.resource);
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
    use crate::gpu::{GpuCall, GpuError, RecordingBackend};

    const SRC: &str = "fn vs_main() {} fn fs_main() {}";

    #[test]
    fn compile_error_is_returned_not_stored() {
        let mut b = RecordingBackend::new();
        let mut shaders = ShaderManager::new();
        let err = shaders.create(&mut b, "garbage").unwrap_err();
        assert!(matches!(err, AssetError::Gpu(GpuError::ShaderCompile(_))));
        assert!(shaders.is_empty());
    }

    #[test]
    fn destroy_releases_program() {
        let mut b = RecordingBackend::new();
        let mut shaders = ShaderManager::new();
        let id = shaders.create(&mut b, SRC).unwrap();
        let res = shaders.get(id).unwrap().resource;
        shaders.destroy(&mut b, id).unwrap();
        assert!(b.calls().contains(&GpuCall::ReleaseShader(res)));
        assert!(shaders.get(id).is_err());
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let mut b = RecordingBackend::new();
        let mut shaders = ShaderManager::new();
        let err = shaders.load(&mut b, "/no/such/shader.wgsl").unwrap_err();
        assert!(matches!(err, AssetError::Io { .. }));
    }
}
