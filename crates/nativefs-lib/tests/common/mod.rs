//! Test doubles shared by the integration tests.

#![allow(dead_code, unreachable_pub)]

use async_trait::async_trait;
use nativefs_lib::{
    Capability, DirectoryPaths, DownloadBegin, DownloadProgress, DownloadRequest, DownloadResult,
    EventBus, EventHandler, FileType, FsInfo, HashAlgorithm, JobId, LocalEventBus, MkdirOptions,
    NativeEngine, NativeFs, NativeFsError, NativeStat, ReadDirItem, Result, SubscriptionToken,
    TransferEvent, UploadBegin, UploadProgress, UploadRequest, UploadResult, decode_transport,
    encode_transport,
};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Bus wrapper counting subscribe and release calls.
#[derive(Debug, Default)]
pub struct SpyBus {
    pub inner: LocalEventBus,
    pub subscribed: AtomicUsize,
    pub released: AtomicUsize,
}

impl SpyBus {
    pub fn subscribed(&self) -> usize {
        self.subscribed.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }
}

impl EventBus for SpyBus {
    fn subscribe(&self, name: &str, handler: EventHandler) -> SubscriptionToken {
        self.subscribed.fetch_add(1, Ordering::SeqCst);
        self.inner.subscribe(name, handler)
    }

    fn release(&self, token: SubscriptionToken) {
        self.released.fetch_add(1, Ordering::SeqCst);
        self.inner.release(token);
    }
}

/// How the stub settles transfers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Succeed,
    Fail,
}

/// In-memory engine that publishes scripted transfer events.
#[derive(Debug)]
pub struct StubEngine {
    pub bus: Arc<SpyBus>,
    pub outcome: Outcome,
    pub uploads: bool,
    pub assets: bool,
    pub downloads: Mutex<Vec<DownloadRequest>>,
    pub upload_requests: Mutex<Vec<UploadRequest>>,
    pub prepared: Mutex<Vec<JobId>>,
    pub stopped: Mutex<Vec<JobId>>,
    pub touched: Mutex<Vec<PathBuf>>,
    pub files: Mutex<BTreeMap<PathBuf, Vec<u8>>>,
}

impl StubEngine {
    pub fn new(bus: Arc<SpyBus>, outcome: Outcome) -> Self {
        Self {
            bus,
            outcome,
            uploads: true,
            assets: false,
            downloads: Mutex::new(Vec::new()),
            upload_requests: Mutex::new(Vec::new()),
            prepared: Mutex::new(Vec::new()),
            stopped: Mutex::new(Vec::new()),
            touched: Mutex::new(Vec::new()),
            files: Mutex::new(BTreeMap::new()),
        }
    }

    pub fn touched(&self) -> Vec<PathBuf> {
        self.touched.lock().unwrap().clone()
    }

    fn touch(&self, path: &Path) {
        self.touched.lock().unwrap().push(path.to_path_buf());
    }

    fn missing(path: &Path) -> NativeFsError {
        NativeFsError::NotFound(path.to_path_buf())
    }
}

/// Builds a bridge over a stub engine, returning all three pieces.
pub fn bridge(outcome: Outcome) -> (Arc<SpyBus>, Arc<StubEngine>, NativeFs) {
    bridge_with(StubEngine::new(Arc::new(SpyBus::default()), outcome))
}

/// Builds a bridge over a preconfigured stub engine.
pub fn bridge_with(engine: StubEngine) -> (Arc<SpyBus>, Arc<StubEngine>, NativeFs) {
    let bus = Arc::clone(&engine.bus);
    let engine = Arc::new(engine);
    let fs = NativeFs::new(engine.clone(), bus.clone());
    (bus, engine, fs)
}

#[async_trait]
impl NativeEngine for StubEngine {
    fn platform(&self) -> &str {
        "stub"
    }

    fn supports(&self, capability: Capability) -> bool {
        match capability {
            Capability::UploadFiles => self.uploads,
            _ => self.assets,
        }
    }

    fn directory_paths(&self) -> DirectoryPaths {
        DirectoryPaths {
            temporary: Some(PathBuf::from("/stub/tmp")),
            ..DirectoryPaths::default()
        }
    }

    async fn download_file(&self, request: DownloadRequest) -> Result<DownloadResult> {
        let job_id = request.job_id;
        self.downloads.lock().unwrap().push(request);

        self.bus.inner.emit(&TransferEvent::DownloadBegin(DownloadBegin {
            job_id,
            status_code: 200,
            content_length: Some(10),
            headers: Default::default(),
        }));
        for bytes_written in [5, 10] {
            self.bus.inner.emit(&TransferEvent::DownloadProgress(DownloadProgress {
                job_id,
                content_length: Some(10),
                bytes_written,
            }));
        }

        match self.outcome {
            Outcome::Succeed => Ok(DownloadResult {
                job_id,
                status_code: 200,
                bytes_written: 10,
            }),
            Outcome::Fail => Err(NativeFsError::Http("connection reset".to_string())),
        }
    }

    async fn upload_files(&self, request: UploadRequest) -> Result<UploadResult> {
        let job_id = request.job_id;
        self.upload_requests.lock().unwrap().push(request);

        self.bus
            .inner
            .emit(&TransferEvent::UploadBegin(UploadBegin { job_id }));
        self.bus
            .inner
            .emit(&TransferEvent::UploadProgress(UploadProgress {
                job_id,
                total_bytes_expected_to_send: 4,
                total_bytes_sent: 4,
            }));

        match self.outcome {
            Outcome::Succeed => Ok(UploadResult {
                job_id,
                status_code: 201,
                headers: Default::default(),
                body: "created".to_string(),
            }),
            Outcome::Fail => Err(NativeFsError::Http("server went away".to_string())),
        }
    }

    fn prepare_transfer(&self, job_id: JobId) {
        self.prepared.lock().unwrap().push(job_id);
    }

    fn stop_transfer(&self, job_id: JobId) {
        self.stopped.lock().unwrap().push(job_id);
    }

    async fn mkdir(&self, path: &Path, _options: MkdirOptions) -> Result<()> {
        self.touch(path);
        Ok(())
    }

    async fn move_file(&self, from: &Path, to: &Path) -> Result<()> {
        self.touch(from);
        self.touch(to);
        let mut files = self.files.lock().unwrap();
        let contents = files.remove(from).ok_or_else(|| Self::missing(from))?;
        files.insert(to.to_path_buf(), contents);
        Ok(())
    }

    async fn copy_file(&self, from: &Path, to: &Path) -> Result<()> {
        self.touch(from);
        self.touch(to);
        let mut files = self.files.lock().unwrap();
        let contents = files.get(from).cloned().ok_or_else(|| Self::missing(from))?;
        files.insert(to.to_path_buf(), contents);
        Ok(())
    }

    async fn path_for_bundle(&self, bundle_name: &str) -> Result<String> {
        Ok(format!("/stub/{bundle_name}.bundle"))
    }

    async fn fs_info(&self) -> Result<FsInfo> {
        Ok(FsInfo {
            total_space: 1024,
            free_space: 512,
        })
    }

    async fn unlink(&self, path: &Path) -> Result<()> {
        self.touch(path);
        self.files
            .lock()
            .unwrap()
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| Self::missing(path))
    }

    async fn exists(&self, path: &Path) -> Result<bool> {
        self.touch(path);
        Ok(self.files.lock().unwrap().contains_key(path))
    }

    async fn read_dir(&self, path: &Path) -> Result<Vec<ReadDirItem>> {
        self.touch(path);
        Ok(self
            .files
            .lock()
            .unwrap()
            .iter()
            .filter(|(file, _)| file.parent() == Some(path))
            .map(|(file, contents)| ReadDirItem {
                name: file
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                path: file.clone(),
                size: contents.len() as u64,
                kind: FileType::Regular,
            })
            .collect())
    }

    async fn read_dir_assets(&self, path: &Path) -> Result<Vec<ReadDirItem>> {
        self.touch(path);
        Ok(Vec::new())
    }

    async fn exists_assets(&self, path: &Path) -> Result<bool> {
        self.touch(path);
        Ok(true)
    }

    async fn stat(&self, path: &Path) -> Result<NativeStat> {
        self.touch(path);
        let files = self.files.lock().unwrap();
        let contents = files.get(path).ok_or_else(|| Self::missing(path))?;
        Ok(NativeStat {
            ctime: 1_700_000_000,
            mtime: 1_700_000_100,
            size: contents.len() as u64,
            mode: 0o644,
            kind: FileType::Regular,
        })
    }

    async fn read_file(&self, path: &Path) -> Result<String> {
        self.touch(path);
        let files = self.files.lock().unwrap();
        let contents = files.get(path).ok_or_else(|| Self::missing(path))?;
        Ok(encode_transport(contents))
    }

    async fn read_file_assets(&self, path: &Path) -> Result<String> {
        self.touch(path);
        Ok(encode_transport(b"asset"))
    }

    async fn hash(&self, path: &Path, algorithm: HashAlgorithm) -> Result<String> {
        self.touch(path);
        Ok(format!("{algorithm}:digest"))
    }

    async fn copy_file_assets(&self, from: &Path, to: &Path) -> Result<()> {
        self.touch(from);
        self.touch(to);
        Ok(())
    }

    async fn write_file(&self, path: &Path, transport: &str) -> Result<()> {
        self.touch(path);
        let bytes = decode_transport(transport)?;
        self.files.lock().unwrap().insert(path.to_path_buf(), bytes);
        Ok(())
    }

    async fn append_file(&self, path: &Path, transport: &str) -> Result<()> {
        self.touch(path);
        let bytes = decode_transport(transport)?;
        self.files
            .lock()
            .unwrap()
            .entry(path.to_path_buf())
            .or_default()
            .extend(bytes);
        Ok(())
    }
}
