//! The local host engine.

use crate::{EngineConfig, dirs, fs, transfer};
use async_trait::async_trait;
use nativefs_jobs::LocalEventBus;
use nativefs_types::{
    Capability, DirectoryPaths, DownloadRequest, DownloadResult, FsInfo, HashAlgorithm, JobId,
    MkdirOptions, NativeEngine, NativeFsError, NativeStat, ReadDirItem, Result, UploadRequest,
    UploadResult, unsupported,
};
use reqwest::Client;
use sha2::{Sha224, Sha256, Sha384, Sha512};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Engine backed by the local filesystem and a reqwest client.
///
/// Transfer events are published on the [`LocalEventBus`] given at
/// construction; share the same bus with the job registry so listeners see
/// them.
pub struct LocalEngine {
    config: EngineConfig,
    client: Client,
    bus: Arc<LocalEventBus>,
    transfers: Mutex<HashMap<JobId, CancellationToken>>,
}

/// Keeps a transfer's cancellation token registered while it runs.
struct TransferGuard<'a> {
    transfers: &'a Mutex<HashMap<JobId, CancellationToken>>,
    job_id: JobId,
    token: CancellationToken,
}

impl Drop for TransferGuard<'_> {
    fn drop(&mut self) {
        self.transfers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.job_id);
    }
}

impl LocalEngine {
    /// Creates an engine publishing transfer events on `bus`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: EngineConfig, bus: Arc<LocalEventBus>) -> Result<Self> {
        let mut builder = Client::builder()
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_nodelay(true)
            .tcp_keepalive(Duration::from_secs(60))
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .gzip(true);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| NativeFsError::Http(e.to_string()))?;

        Ok(Self {
            config,
            client,
            bus,
            transfers: Mutex::new(HashMap::new()),
        })
    }

    /// Creates an engine with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn with_defaults(bus: Arc<LocalEventBus>) -> Result<Self> {
        Self::new(EngineConfig::default(), bus)
    }

    /// Returns the engine configuration.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the bus transfer events are published on.
    #[must_use]
    pub const fn bus(&self) -> &Arc<LocalEventBus> {
        &self.bus
    }

    /// Returns the number of transfers registered and not yet finished.
    #[must_use]
    pub fn active_transfers(&self) -> usize {
        self.transfers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Picks up the token left by `prepare_transfer`, which may already be
    /// cancelled.
    fn track(&self, job_id: JobId) -> TransferGuard<'_> {
        let token = self
            .transfers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(job_id)
            .or_default()
            .clone();
        TransferGuard {
            transfers: &self.transfers,
            job_id,
            token,
        }
    }

    fn asset_path(&self, capability: Capability, path: &Path) -> Result<(PathBuf, PathBuf)> {
        let root = self
            .config
            .assets_dir
            .as_deref()
            .ok_or_else(|| unsupported(self, capability))?;
        let resolved = fs::resolve_within(root, path)?;
        Ok((root.to_path_buf(), resolved))
    }

    fn fs_info_root() -> PathBuf {
        directories::UserDirs::new()
            .map(|u| u.home_dir().to_path_buf())
            .unwrap_or_else(std::env::temp_dir)
    }
}

#[cfg(unix)]
#[allow(clippy::useless_conversion)] // statvfs field widths differ between platforms
async fn volume_info(path: PathBuf) -> Result<FsInfo> {
    tokio::task::spawn_blocking(move || {
        let stat = nix::sys::statvfs::statvfs(&path)
            .map_err(|e| NativeFsError::Native(format!("statvfs failed: {e}")))?;
        let fragment = u64::from(stat.fragment_size());
        Ok(FsInfo {
            total_space: u64::from(stat.blocks()).saturating_mul(fragment),
            free_space: u64::from(stat.blocks_available()).saturating_mul(fragment),
        })
    })
    .await
    .map_err(|e| NativeFsError::Native(format!("statvfs task failed: {e}")))?
}

#[async_trait]
impl NativeEngine for LocalEngine {
    fn platform(&self) -> &str {
        &self.config.platform
    }

    fn supports(&self, capability: Capability) -> bool {
        match capability {
            Capability::UploadFiles => true,
            Capability::ReadDirAssets
            | Capability::ExistsAssets
            | Capability::ReadFileAssets
            | Capability::CopyFileAssets => self.config.assets_dir.is_some(),
        }
    }

    fn directory_paths(&self) -> DirectoryPaths {
        dirs::directory_paths(&self.config)
    }

    async fn download_file(&self, request: DownloadRequest) -> Result<DownloadResult> {
        if request.background {
            debug!(job_id = %request.job_id, "background flag set; transfer runs in process");
        }
        let guard = self.track(request.job_id);
        transfer::download(&self.client, &self.bus, request, guard.token.clone()).await
    }

    async fn upload_files(&self, request: UploadRequest) -> Result<UploadResult> {
        let guard = self.track(request.job_id);
        transfer::upload(
            &self.client,
            Arc::clone(&self.bus),
            request,
            self.config.upload_chunk_size,
            guard.token.clone(),
        )
        .await
    }

    fn prepare_transfer(&self, job_id: JobId) {
        self.transfers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(job_id)
            .or_default();
    }

    fn stop_transfer(&self, job_id: JobId) {
        let transfers = self.transfers.lock().unwrap_or_else(PoisonError::into_inner);
        match transfers.get(&job_id) {
            Some(token) => {
                debug!(%job_id, "stopping transfer");
                token.cancel();
            }
            None => debug!(%job_id, "stop requested for inactive transfer"),
        }
    }

    async fn mkdir(&self, path: &Path, options: MkdirOptions) -> Result<()> {
        if options.exclude_from_backup {
            debug!(path = %path.display(), "exclude_from_backup has no effect on this host");
        }
        fs::mkdir(path).await
    }

    async fn move_file(&self, from: &Path, to: &Path) -> Result<()> {
        fs::move_file(from, to).await
    }

    async fn copy_file(&self, from: &Path, to: &Path) -> Result<()> {
        fs::copy_file(from, to).await
    }

    async fn path_for_bundle(&self, bundle_name: &str) -> Result<String> {
        let base = dirs::directory_paths(&self.config)
            .main_bundle
            .ok_or_else(|| NativeFsError::Native("no bundle directory".to_string()))?;
        let bundle = base.join(format!("{bundle_name}.bundle"));
        if fs::exists(&bundle).await? {
            Ok(bundle.to_string_lossy().into_owned())
        } else {
            Err(NativeFsError::NotFound(bundle))
        }
    }

    #[cfg(unix)]
    async fn fs_info(&self) -> Result<FsInfo> {
        volume_info(Self::fs_info_root()).await
    }

    #[cfg(not(unix))]
    async fn fs_info(&self) -> Result<FsInfo> {
        let _ = Self::fs_info_root();
        Err(NativeFsError::CapabilityUnsupported {
            operation: "getFSInfo",
            platform: self.config.platform.clone(),
        })
    }

    async fn unlink(&self, path: &Path) -> Result<()> {
        fs::unlink(path).await
    }

    async fn exists(&self, path: &Path) -> Result<bool> {
        fs::exists(path).await
    }

    async fn read_dir(&self, path: &Path) -> Result<Vec<ReadDirItem>> {
        fs::read_dir(path).await
    }

    async fn read_dir_assets(&self, path: &Path) -> Result<Vec<ReadDirItem>> {
        let (root, resolved) = self.asset_path(Capability::ReadDirAssets, path)?;
        let mut items = fs::read_dir(&resolved).await?;
        for item in &mut items {
            if let Ok(relative) = item.path.strip_prefix(&root) {
                item.path = relative.to_path_buf();
            }
        }
        Ok(items)
    }

    async fn exists_assets(&self, path: &Path) -> Result<bool> {
        let (_, resolved) = self.asset_path(Capability::ExistsAssets, path)?;
        fs::exists(&resolved).await
    }

    async fn stat(&self, path: &Path) -> Result<NativeStat> {
        fs::stat(path).await
    }

    async fn read_file(&self, path: &Path) -> Result<String> {
        fs::read_file(path).await
    }

    async fn read_file_assets(&self, path: &Path) -> Result<String> {
        let (_, resolved) = self.asset_path(Capability::ReadFileAssets, path)?;
        fs::read_file(&resolved).await
    }

    async fn hash(&self, path: &Path, algorithm: HashAlgorithm) -> Result<String> {
        match algorithm {
            HashAlgorithm::Sha224 => fs::digest_file::<Sha224>(path).await,
            HashAlgorithm::Sha256 => fs::digest_file::<Sha256>(path).await,
            HashAlgorithm::Sha384 => fs::digest_file::<Sha384>(path).await,
            HashAlgorithm::Sha512 => fs::digest_file::<Sha512>(path).await,
            HashAlgorithm::Md5 | HashAlgorithm::Sha1 => Err(NativeFsError::CapabilityUnsupported {
                operation: "hash",
                platform: self.config.platform.clone(),
            }),
        }
    }

    async fn copy_file_assets(&self, from: &Path, to: &Path) -> Result<()> {
        let (_, resolved) = self.asset_path(Capability::CopyFileAssets, from)?;
        fs::copy_file(&resolved, to).await
    }

    async fn write_file(&self, path: &Path, transport: &str) -> Result<()> {
        fs::write_file(path, transport).await
    }

    async fn append_file(&self, path: &Path, transport: &str) -> Result<()> {
        fs::append_file(path, transport).await
    }
}

impl std::fmt::Debug for LocalEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalEngine")
            .field("config", &self.config)
            .field("active_transfers", &self.active_transfers())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nativefs_jobs::EventBus;
    use nativefs_types::{EventKind, TransferEvent, UploadFile, encode_transport};
    use tempfile::TempDir;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::sync::Notify;
    use tokio::task::JoinHandle;

    fn engine(config: EngineConfig) -> (Arc<LocalEventBus>, LocalEngine) {
        let bus = Arc::new(LocalEventBus::new());
        let engine = LocalEngine::new(config, Arc::clone(&bus)).unwrap();
        (bus, engine)
    }

    fn record(bus: &LocalEventBus, kind: EventKind, job_id: JobId) -> Arc<Mutex<Vec<TransferEvent>>> {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        bus.subscribe(
            &kind.event_name(job_id),
            Arc::new(move |event: &TransferEvent| sink.lock().unwrap().push(event.clone())),
        );
        events
    }

    fn http_response(status: &str, body: &[u8]) -> Vec<u8> {
        let mut response = format!(
            "HTTP/1.1 {status}\r\nContent-Length: {}\r\nX-Test: yes\r\nConnection: close\r\n\r\n",
            body.len()
        )
        .into_bytes();
        response.extend_from_slice(body);
        response
    }

    async fn read_request(socket: &mut TcpStream) -> Vec<u8> {
        let mut buffer = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            if let Some(end) = buffer.windows(4).position(|w| w == b"\r\n\r\n") {
                let head = String::from_utf8_lossy(&buffer[..end]).to_ascii_lowercase();
                let length = head
                    .lines()
                    .find_map(|l| l.strip_prefix("content-length:"))
                    .and_then(|v| v.trim().parse::<usize>().ok());
                let complete = match length {
                    Some(length) => buffer.len() >= end + 4 + length,
                    None if head.contains("transfer-encoding: chunked") => {
                        buffer.ends_with(b"0\r\n\r\n")
                    }
                    None => true,
                };
                if complete {
                    return buffer;
                }
            }
            let read = socket.read(&mut chunk).await.unwrap();
            if read == 0 {
                return buffer;
            }
            buffer.extend_from_slice(&chunk[..read]);
        }
    }

    async fn serve_once(response: Vec<u8>) -> (String, JoinHandle<Vec<u8>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let task = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            socket.write_all(&response).await.unwrap();
            let _ = socket.shutdown().await;
            request
        });
        (format!("http://{addr}"), task)
    }

    fn download_request(job_id: u64, from_url: String, to_file: PathBuf) -> DownloadRequest {
        DownloadRequest {
            job_id: JobId::new(job_id),
            from_url,
            to_file,
            headers: HashMap::from([("X-Token".to_string(), "secret".to_string())]),
            background: false,
            progress_divider: 0,
        }
    }

    #[tokio::test]
    async fn test_download_writes_file_and_publishes_events() {
        let temp_dir = TempDir::new().unwrap();
        let to_file = temp_dir.path().join("payload.bin");
        let body = vec![7u8; 1000];
        let (url, server) = serve_once(http_response("200 OK", &body)).await;

        let (bus, engine) = engine(EngineConfig::default());
        let job_id = JobId::new(1);
        let begins = record(&bus, EventKind::DownloadBegin, job_id);
        let progress = record(&bus, EventKind::DownloadProgress, job_id);

        let result = engine
            .download_file(download_request(1, format!("{url}/payload.bin"), to_file.clone()))
            .await
            .unwrap();

        assert_eq!(result.status_code, 200);
        assert_eq!(result.bytes_written, 1000);
        assert_eq!(std::fs::read(&to_file).unwrap(), body);
        assert_eq!(engine.active_transfers(), 0);

        let begins = begins.lock().unwrap();
        assert_eq!(begins.len(), 1);
        match &begins[0] {
            TransferEvent::DownloadBegin(begin) => {
                assert_eq!(begin.status_code, 200);
                assert_eq!(begin.content_length, Some(1000));
                assert_eq!(begin.headers.get("x-test").map(String::as_str), Some("yes"));
            }
            other => panic!("unexpected event: {other:?}"),
        }
        match progress.lock().unwrap().last() {
            Some(TransferEvent::DownloadProgress(last)) => assert_eq!(last.bytes_written, 1000),
            other => panic!("unexpected event: {other:?}"),
        }

        let request = String::from_utf8(server.await.unwrap()).unwrap();
        assert!(request.starts_with("GET /payload.bin"));
        assert!(request.to_ascii_lowercase().contains("x-token: secret"));
    }

    #[tokio::test]
    async fn test_download_non_success_status_resolves() {
        let temp_dir = TempDir::new().unwrap();
        let (url, _server) = serve_once(http_response("404 Not Found", b"nope")).await;
        let (_, engine) = engine(EngineConfig::default());

        let result = engine
            .download_file(download_request(2, url, temp_dir.path().join("missing")))
            .await
            .unwrap();
        assert_eq!(result.status_code, 404);
        assert_eq!(result.bytes_written, 4);
    }

    #[tokio::test]
    async fn test_download_connection_refused() {
        let temp_dir = TempDir::new().unwrap();
        let to_file = temp_dir.path().join("never");
        let (_, engine) = engine(EngineConfig::default());

        let result = engine
            .download_file(download_request(3, "http://127.0.0.1:1/x".to_string(), to_file.clone()))
            .await;
        assert!(matches!(result, Err(NativeFsError::Http(_))));
        assert!(!to_file.exists());
        assert_eq!(engine.active_transfers(), 0);
    }

    #[tokio::test]
    async fn test_stop_transfer_cancels_and_removes_partial_file() {
        let temp_dir = TempDir::new().unwrap();
        let to_file = temp_dir.path().join("large.bin");
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            read_request(&mut socket).await;
            let head = "HTTP/1.1 200 OK\r\nContent-Length: 1000000\r\n\r\n";
            socket.write_all(head.as_bytes()).await.unwrap();
            socket.write_all(&[1u8; 512]).await.unwrap();
            tokio::time::sleep(Duration::from_secs(30)).await;
        });

        let (bus, engine) = engine(EngineConfig::default());
        let engine = Arc::new(engine);
        let job_id = JobId::new(4);
        let began = Arc::new(Notify::new());
        let signal = Arc::clone(&began);
        bus.subscribe(
            &EventKind::DownloadBegin.event_name(job_id),
            Arc::new(move |_: &TransferEvent| signal.notify_one()),
        );

        let runner = Arc::clone(&engine);
        let request = download_request(4, format!("http://{addr}/large.bin"), to_file.clone());
        let task = tokio::spawn(async move { runner.download_file(request).await });

        tokio::time::timeout(Duration::from_secs(5), began.notified())
            .await
            .unwrap();
        assert_eq!(engine.active_transfers(), 1);
        engine.stop_transfer(job_id);

        let result = task.await.unwrap();
        assert!(matches!(result, Err(NativeFsError::Cancelled(id)) if id == job_id));
        assert!(!to_file.exists());
        assert_eq!(engine.active_transfers(), 0);
        server.abort();
    }

    #[tokio::test]
    async fn test_stop_unknown_transfer_is_noop() {
        let (_, engine) = engine(EngineConfig::default());
        engine.stop_transfer(JobId::new(99));
        assert_eq!(engine.active_transfers(), 0);
    }

    #[tokio::test]
    async fn test_stop_before_transfer_starts() {
        let temp_dir = TempDir::new().unwrap();
        let to_file = temp_dir.path().join("early.bin");
        let (url, _server) = serve_once(http_response("200 OK", b"payload")).await;
        let (_, engine) = engine(EngineConfig::default());
        let job_id = JobId::new(7);

        engine.prepare_transfer(job_id);
        assert_eq!(engine.active_transfers(), 1);
        engine.stop_transfer(job_id);

        let result = engine
            .download_file(download_request(7, url, to_file.clone()))
            .await;
        assert!(matches!(result, Err(NativeFsError::Cancelled(id)) if id == job_id));
        assert!(!to_file.exists());
        assert_eq!(engine.active_transfers(), 0);
    }

    #[tokio::test]
    async fn test_upload_streams_file_in_chunks() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("big.bin");
        let contents: Vec<u8> = (0..10_000u32).map(|i| (i % 251) as u8).collect();
        std::fs::write(&file_path, &contents).unwrap();
        let (url, server) = serve_once(http_response("200 OK", b"")).await;

        let (bus, engine) = engine(EngineConfig {
            upload_chunk_size: 1024,
            ..EngineConfig::default()
        });
        let job_id = JobId::new(8);
        let progress = record(&bus, EventKind::UploadProgress, job_id);

        engine
            .upload_files(UploadRequest {
                job_id,
                to_url: url,
                files: vec![UploadFile::new("file", "big.bin", &file_path)],
                headers: HashMap::new(),
                fields: HashMap::new(),
                method: "POST".to_string(),
            })
            .await
            .unwrap();

        let sent: Vec<u64> = progress
            .lock()
            .unwrap()
            .iter()
            .map(|event| match event {
                TransferEvent::UploadProgress(p) => {
                    assert_eq!(p.total_bytes_expected_to_send, 10_000);
                    p.total_bytes_sent
                }
                other => panic!("unexpected event: {other:?}"),
            })
            .collect();
        assert!(sent.len() >= 10, "expected chunked progress, got {sent:?}");
        assert!(sent.windows(2).all(|w| w[1] > w[0]));
        assert!(sent.iter().all(|&s| s <= 10_000));
        assert_eq!(sent.last(), Some(&10_000));

        let request = server.await.unwrap();
        assert!(request.windows(contents.len()).any(|w| w == contents.as_slice()));
    }

    #[tokio::test]
    async fn test_upload_sends_multipart_and_reports_progress() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("a.txt");
        std::fs::write(&file_path, b"hello upload").unwrap();
        let (url, server) = serve_once(http_response("201 Created", b"ok")).await;

        let (bus, engine) = engine(EngineConfig::default());
        let job_id = JobId::new(5);
        let begins = record(&bus, EventKind::UploadBegin, job_id);
        let progress = record(&bus, EventKind::UploadProgress, job_id);

        let result = engine
            .upload_files(UploadRequest {
                job_id,
                to_url: format!("{url}/upload"),
                files: vec![UploadFile::new("file", "a.txt", &file_path).with_filetype("text/plain")],
                headers: HashMap::new(),
                fields: HashMap::from([("note".to_string(), "first".to_string())]),
                method: "put".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(result.status_code, 201);
        assert_eq!(result.body, "ok");
        assert_eq!(begins.lock().unwrap().len(), 1);
        match progress.lock().unwrap().last() {
            Some(TransferEvent::UploadProgress(last)) => {
                assert_eq!(last.total_bytes_expected_to_send, 12);
                assert_eq!(last.total_bytes_sent, 12);
            }
            other => panic!("unexpected event: {other:?}"),
        }

        let request = String::from_utf8_lossy(&server.await.unwrap()).into_owned();
        assert!(request.starts_with("PUT /upload"));
        assert!(request.contains("filename=\"a.txt\""));
        assert!(request.contains("text/plain"));
        assert!(request.contains("hello upload"));
        assert!(request.contains("first"));
    }

    #[tokio::test]
    async fn test_upload_missing_file_fails() {
        let temp_dir = TempDir::new().unwrap();
        let (_, engine) = engine(EngineConfig::default());
        let result = engine
            .upload_files(UploadRequest {
                job_id: JobId::new(6),
                to_url: "http://127.0.0.1:1/upload".to_string(),
                files: vec![UploadFile::new("file", "x", temp_dir.path().join("x"))],
                headers: HashMap::new(),
                fields: HashMap::new(),
                method: "POST".to_string(),
            })
            .await;
        assert!(matches!(result, Err(NativeFsError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_hash_algorithms() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("abc");
        std::fs::write(&path, b"abc").unwrap();
        let (_, engine) = engine(EngineConfig::default());

        let digest = engine.hash(&path, HashAlgorithm::Sha224).await.unwrap();
        assert_eq!(
            digest,
            "23097d223405d8228642a477bda255b32aadbce4bda0b3f7e36c9da7"
        );
        assert!(matches!(
            engine.hash(&path, HashAlgorithm::Md5).await,
            Err(NativeFsError::CapabilityUnsupported { operation: "hash", .. })
        ));
    }

    #[tokio::test]
    async fn test_assets_require_configured_directory() {
        let (_, engine) = engine(EngineConfig::default());
        assert!(!engine.supports(Capability::ReadFileAssets));
        assert!(engine.supports(Capability::UploadFiles));
        assert!(matches!(
            engine.read_file_assets(Path::new("a.txt")).await,
            Err(NativeFsError::CapabilityUnsupported {
                operation: "readFileAssets",
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_assets_served_from_directory() {
        let assets = TempDir::new().unwrap();
        std::fs::create_dir(assets.path().join("img")).unwrap();
        std::fs::write(assets.path().join("img/logo.txt"), b"logo").unwrap();
        let out = TempDir::new().unwrap();

        let (_, engine) = engine(EngineConfig::default().with_assets_dir(assets.path()));
        assert!(engine.supports(Capability::CopyFileAssets));
        assert!(engine.exists_assets(Path::new("img/logo.txt")).await.unwrap());
        assert!(!engine.exists_assets(Path::new("img/none.txt")).await.unwrap());

        let items = engine.read_dir_assets(Path::new("img")).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].path, PathBuf::from("img/logo.txt"));

        assert_eq!(
            engine.read_file_assets(Path::new("img/logo.txt")).await.unwrap(),
            encode_transport(b"logo")
        );
        let copy = out.path().join("logo.txt");
        engine
            .copy_file_assets(Path::new("img/logo.txt"), &copy)
            .await
            .unwrap();
        assert_eq!(std::fs::read(&copy).unwrap(), b"logo");

        assert!(matches!(
            engine.read_file_assets(Path::new("../secret")).await,
            Err(NativeFsError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_path_for_bundle() {
        let bundles = TempDir::new().unwrap();
        std::fs::create_dir(bundles.path().join("Fonts.bundle")).unwrap();
        let (_, engine) = engine(EngineConfig {
            bundle_dir: Some(bundles.path().to_path_buf()),
            ..EngineConfig::default()
        });

        let path = engine.path_for_bundle("Fonts").await.unwrap();
        assert!(path.ends_with("Fonts.bundle"));
        assert!(matches!(
            engine.path_for_bundle("Missing").await,
            Err(NativeFsError::NotFound(_))
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_fs_info() {
        let (_, engine) = engine(EngineConfig::default());
        let info = engine.fs_info().await.unwrap();
        assert!(info.total_space > 0);
        assert!(info.free_space <= info.total_space);
    }
}
