//! The contract a host engine fulfils for the bridge.
//!
//! Paths reaching an engine are already normalized and file contents travel
//! as base64 transport strings.

use crate::{
    DirectoryPaths, DownloadRequest, DownloadResult, FsInfo, HashAlgorithm, JobId, MkdirOptions,
    NativeFsError, NativeStat, ReadDirItem, Result, UploadRequest, UploadResult,
};
use async_trait::async_trait;
use std::path::Path;

/// Optional engine capabilities checked before the matching call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Listing directories inside the asset bundle.
    ReadDirAssets,
    /// Checking for files inside the asset bundle.
    ExistsAssets,
    /// Reading files from the asset bundle.
    ReadFileAssets,
    /// Copying files out of the asset bundle.
    CopyFileAssets,
    /// Multipart file uploads.
    UploadFiles,
}

impl Capability {
    /// Returns the name of the operation that needs this capability.
    #[must_use]
    pub const fn operation(&self) -> &'static str {
        match self {
            Self::ReadDirAssets => "readDirAssets",
            Self::ExistsAssets => "existsAssets",
            Self::ReadFileAssets => "readFileAssets",
            Self::CopyFileAssets => "copyFileAssets",
            Self::UploadFiles => "uploadFiles",
        }
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.operation())
    }
}

/// Builds the error returned when `capability` is missing on `engine`.
#[must_use]
pub fn unsupported(engine: &(impl NativeEngine + ?Sized), capability: Capability) -> NativeFsError {
    NativeFsError::CapabilityUnsupported {
        operation: capability.operation(),
        platform: engine.platform().to_string(),
    }
}

/// Native filesystem and transfer engine.
///
/// Optional operations have default implementations that report the
/// capability as unsupported; engines override them together with
/// [`NativeEngine::supports`].
#[async_trait]
pub trait NativeEngine: Send + Sync {
    /// Name of the platform, used in diagnostics.
    fn platform(&self) -> &str;

    /// Returns true if the engine provides `capability`.
    fn supports(&self, capability: Capability) -> bool {
        let _ = capability;
        false
    }

    /// Well-known directories of the platform.
    fn directory_paths(&self) -> DirectoryPaths;

    /// Runs a download to completion, publishing begin/progress events.
    async fn download_file(&self, request: DownloadRequest) -> Result<DownloadResult>;

    /// Runs an upload to completion, publishing begin/progress events.
    async fn upload_files(&self, request: UploadRequest) -> Result<UploadResult> {
        let _ = request;
        Err(unsupported(self, Capability::UploadFiles))
    }

    /// Registers `job_id` before its transfer future is first polled.
    ///
    /// Called synchronously when the job is issued, so a
    /// [`NativeEngine::stop_transfer`] arriving before the transfer starts
    /// still reaches it.
    fn prepare_transfer(&self, job_id: JobId) {
        let _ = job_id;
    }

    /// Asks the engine to stop a running transfer. Best effort.
    fn stop_transfer(&self, job_id: JobId);

    /// Creates a directory and its parents.
    async fn mkdir(&self, path: &Path, options: MkdirOptions) -> Result<()>;

    /// Moves a file.
    async fn move_file(&self, from: &Path, to: &Path) -> Result<()>;

    /// Copies a file.
    async fn copy_file(&self, from: &Path, to: &Path) -> Result<()>;

    /// Resolves the path of a named resource bundle.
    async fn path_for_bundle(&self, bundle_name: &str) -> Result<String>;

    /// Reports filesystem capacity.
    async fn fs_info(&self) -> Result<FsInfo>;

    /// Removes a file or a directory tree.
    async fn unlink(&self, path: &Path) -> Result<()>;

    /// Returns true if the path exists.
    async fn exists(&self, path: &Path) -> Result<bool>;

    /// Lists a directory.
    async fn read_dir(&self, path: &Path) -> Result<Vec<ReadDirItem>>;

    /// Lists a directory inside the asset bundle.
    async fn read_dir_assets(&self, path: &Path) -> Result<Vec<ReadDirItem>> {
        let _ = path;
        Err(unsupported(self, Capability::ReadDirAssets))
    }

    /// Returns true if a file exists inside the asset bundle.
    async fn exists_assets(&self, path: &Path) -> Result<bool> {
        let _ = path;
        Err(unsupported(self, Capability::ExistsAssets))
    }

    /// Stats a path.
    async fn stat(&self, path: &Path) -> Result<NativeStat>;

    /// Reads a file as a base64 transport string.
    async fn read_file(&self, path: &Path) -> Result<String>;

    /// Reads an asset file as a base64 transport string.
    async fn read_file_assets(&self, path: &Path) -> Result<String> {
        let _ = path;
        Err(unsupported(self, Capability::ReadFileAssets))
    }

    /// Hashes a file, returning the lowercase hex digest.
    async fn hash(&self, path: &Path, algorithm: HashAlgorithm) -> Result<String>;

    /// Copies an asset file to a local path.
    async fn copy_file_assets(&self, from: &Path, to: &Path) -> Result<()> {
        let _ = (from, to);
        Err(unsupported(self, Capability::CopyFileAssets))
    }

    /// Writes a base64 transport string to a file, replacing its contents.
    async fn write_file(&self, path: &Path, transport: &str) -> Result<()>;

    /// Appends a base64 transport string to a file.
    async fn append_file(&self, path: &Path, transport: &str) -> Result<()>;
}
