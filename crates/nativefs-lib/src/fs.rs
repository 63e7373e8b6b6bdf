//! Filesystem surface of [`NativeFs`].
//!
//! Paths accept plain paths or `file://` URLs. Content-bearing calls convert
//! between the caller's encoding and the engine's base64 transport.

use crate::NativeFs;
use nativefs_types::{
    Capability, DirectoryPaths, FsInfo, HashAlgorithm, IntoEncodingOptions, MkdirOptions,
    ReadDirItem, Result, StatResult, normalize_file_path,
};
use std::path::Path;

fn local(path: &str) -> &Path {
    Path::new(normalize_file_path(path))
}

impl NativeFs {
    /// Creates a directory and its parents.
    ///
    /// # Errors
    ///
    /// Returns the engine's error if the directory cannot be created.
    pub async fn mkdir(&self, path: &str, options: MkdirOptions) -> Result<()> {
        self.engine.mkdir(local(path), options).await
    }

    /// Moves a file.
    ///
    /// # Errors
    ///
    /// Returns the engine's error if the move fails.
    pub async fn move_file(&self, from: &str, to: &str) -> Result<()> {
        self.engine.move_file(local(from), local(to)).await
    }

    /// Copies a file.
    ///
    /// # Errors
    ///
    /// Returns the engine's error if the copy fails.
    pub async fn copy_file(&self, from: &str, to: &str) -> Result<()> {
        self.engine.copy_file(local(from), local(to)).await
    }

    /// Resolves the path of a named resource bundle.
    ///
    /// # Errors
    ///
    /// Returns the engine's error if no such bundle exists.
    pub async fn path_for_bundle(&self, bundle_name: &str) -> Result<String> {
        self.engine.path_for_bundle(bundle_name).await
    }

    /// Reports total and free space of the app's volume.
    ///
    /// # Errors
    ///
    /// Returns the engine's error if the volume cannot be queried.
    pub async fn fs_info(&self) -> Result<FsInfo> {
        self.engine.fs_info().await
    }

    /// Removes a file or a directory tree.
    ///
    /// # Errors
    ///
    /// Returns the engine's error if the path does not exist or cannot be
    /// removed.
    pub async fn unlink(&self, path: &str) -> Result<()> {
        self.engine.unlink(local(path)).await
    }

    /// Returns true if the path exists.
    ///
    /// # Errors
    ///
    /// Returns the engine's error if existence cannot be determined.
    pub async fn exists(&self, path: &str) -> Result<bool> {
        self.engine.exists(local(path)).await
    }

    /// Lists a directory.
    ///
    /// # Errors
    ///
    /// Returns the engine's error if the directory cannot be read.
    pub async fn read_dir(&self, path: &str) -> Result<Vec<ReadDirItem>> {
        self.engine.read_dir(local(path)).await
    }

    /// Lists the entry names of a directory.
    ///
    /// # Errors
    ///
    /// Returns the engine's error if the directory cannot be read.
    pub async fn readdir(&self, path: &str) -> Result<Vec<String>> {
        let items = self.read_dir(path).await?;
        Ok(items.into_iter().map(|item| item.name).collect())
    }

    /// Lists a directory of the asset bundle.
    ///
    /// # Errors
    ///
    /// Returns [`NativeFsError::CapabilityUnsupported`] without calling the
    /// engine if it has no asset bundle.
    ///
    /// [`NativeFsError::CapabilityUnsupported`]: nativefs_types::NativeFsError::CapabilityUnsupported
    pub async fn read_dir_assets(&self, path: &str) -> Result<Vec<ReadDirItem>> {
        self.require(Capability::ReadDirAssets)?;
        self.engine.read_dir_assets(local(path)).await
    }

    /// Returns true if a file exists in the asset bundle.
    ///
    /// # Errors
    ///
    /// Fails with `CapabilityUnsupported` if the engine has no asset bundle.
    pub async fn exists_assets(&self, path: &str) -> Result<bool> {
        self.require(Capability::ExistsAssets)?;
        self.engine.exists_assets(Path::new(path)).await
    }

    /// Stats a path.
    ///
    /// # Errors
    ///
    /// Returns the engine's error if the path cannot be stat'ed.
    pub async fn stat(&self, path: &str) -> Result<StatResult> {
        self.engine.stat(local(path)).await.map(StatResult::from)
    }

    /// Reads a file in the requested encoding (`utf8` by default).
    ///
    /// # Errors
    ///
    /// Returns `InvalidEncoding` for an unknown encoding name before the
    /// engine is called. Otherwise returns the engine's error, or
    /// `MalformedContent` if the bytes are not valid in the requested encoding.
    pub async fn read_file(
        &self,
        path: &str,
        options: impl IntoEncodingOptions,
    ) -> Result<String> {
        let encoding = options.into_encoding_options()?.encoding;
        let transport = self.engine.read_file(local(path)).await?;
        encoding.decode(&transport)
    }

    /// Reads an asset file in the requested encoding.
    ///
    /// # Errors
    ///
    /// Fails with `CapabilityUnsupported` if the engine has no asset bundle,
    /// otherwise as [`NativeFs::read_file`].
    pub async fn read_file_assets(
        &self,
        path: &str,
        options: impl IntoEncodingOptions,
    ) -> Result<String> {
        self.require(Capability::ReadFileAssets)?;
        let encoding = options.into_encoding_options()?.encoding;
        let transport = self.engine.read_file_assets(local(path)).await?;
        encoding.decode(&transport)
    }

    /// Hashes a file, returning the lowercase hex digest.
    ///
    /// The path is handed to the engine as given.
    ///
    /// # Errors
    ///
    /// Returns the engine's error, including `CapabilityUnsupported` for
    /// algorithms it does not implement.
    pub async fn hash(&self, path: &str, algorithm: HashAlgorithm) -> Result<String> {
        self.engine.hash(Path::new(path), algorithm).await
    }

    /// Copies a file out of the asset bundle.
    ///
    /// # Errors
    ///
    /// Fails with `CapabilityUnsupported` if the engine has no asset bundle.
    pub async fn copy_file_assets(&self, from: &str, to: &str) -> Result<()> {
        self.require(Capability::CopyFileAssets)?;
        self.engine.copy_file_assets(local(from), local(to)).await
    }

    /// Writes `contents`, replacing the file.
    ///
    /// Contents are converted before the engine is called, so a conversion
    /// failure leaves the file untouched.
    ///
    /// # Errors
    ///
    /// Returns `InvalidEncoding` for an unknown encoding name,
    /// `MalformedContent` if `contents` cannot be represented in the
    /// encoding, or the engine's error.
    pub async fn write_file(
        &self,
        path: &str,
        contents: &str,
        options: impl IntoEncodingOptions,
    ) -> Result<()> {
        let transport = options.into_encoding_options()?.encoding.encode(contents)?;
        self.engine.write_file(local(path), &transport).await
    }

    /// Appends `contents` to the file, creating it if needed.
    ///
    /// # Errors
    ///
    /// As [`NativeFs::write_file`].
    pub async fn append_file(
        &self,
        path: &str,
        contents: &str,
        options: impl IntoEncodingOptions,
    ) -> Result<()> {
        let transport = options.into_encoding_options()?.encoding.encode(contents)?;
        self.engine.append_file(local(path), &transport).await
    }

    /// Returns the host's well-known directories.
    #[must_use]
    pub fn directory_paths(&self) -> DirectoryPaths {
        self.engine.directory_paths()
    }
}
