//! Download and upload entry points.

use crate::NativeFs;
use nativefs_jobs::{Job, JobHandle};
use nativefs_types::{
    Capability, DEFAULT_UPLOAD_METHOD, DownloadBegin, DownloadProgress, DownloadRequest,
    DownloadResult, EventHandler, EventKind, NativeFsError, Result, TransferEvent, UploadBegin,
    UploadFile, UploadProgress, UploadRequest, UploadResult, normalize_file_path,
};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Callback for [`DownloadBegin`] events.
pub type DownloadBeginCallback = Arc<dyn Fn(&DownloadBegin) + Send + Sync>;
/// Callback for [`DownloadProgress`] events.
pub type DownloadProgressCallback = Arc<dyn Fn(&DownloadProgress) + Send + Sync>;
/// Callback for [`UploadBegin`] events.
pub type UploadBeginCallback = Arc<dyn Fn(&UploadBegin) + Send + Sync>;
/// Callback for [`UploadProgress`] events.
pub type UploadProgressCallback = Arc<dyn Fn(&UploadProgress) + Send + Sync>;

/// Options for [`NativeFs::download_file`].
#[derive(Clone)]
pub struct DownloadFileOptions {
    from_url: String,
    to_file: String,
    headers: HashMap<String, String>,
    background: bool,
    progress_divider: u32,
    begin: Vec<DownloadBeginCallback>,
    progress: Vec<DownloadProgressCallback>,
}

impl DownloadFileOptions {
    /// Downloads `from_url` into `to_file` (a path or `file://` URL).
    #[must_use]
    pub fn new(from_url: impl Into<String>, to_file: impl Into<String>) -> Self {
        Self {
            from_url: from_url.into(),
            to_file: to_file.into(),
            headers: HashMap::new(),
            background: false,
            progress_divider: 0,
            begin: Vec::new(),
            progress: Vec::new(),
        }
    }

    /// Adds a request header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Replaces the request headers.
    #[must_use]
    pub fn headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers = headers;
        self
    }

    /// Allows the engine to continue the download in the background.
    #[must_use]
    pub const fn background(mut self, background: bool) -> Self {
        self.background = background;
        self
    }

    /// Publishes progress every `divider` percent; 0 publishes every update.
    #[must_use]
    pub const fn progress_divider(mut self, divider: u32) -> Self {
        self.progress_divider = divider;
        self
    }

    /// Calls `callback` once the response headers arrive.
    ///
    /// May be called repeatedly; every callback is registered.
    #[must_use]
    pub fn on_begin(mut self, callback: impl Fn(&DownloadBegin) + Send + Sync + 'static) -> Self {
        self.begin.push(Arc::new(callback));
        self
    }

    /// Calls `callback` as the body is written. Adds to earlier callbacks.
    #[must_use]
    pub fn on_progress(
        mut self,
        callback: impl Fn(&DownloadProgress) + Send + Sync + 'static,
    ) -> Self {
        self.progress.push(Arc::new(callback));
        self
    }

    fn validate(&self) -> Result<()> {
        const OPERATION: &str = "downloadFile";
        if self.from_url.is_empty() {
            return Err(invalid(OPERATION, "from_url"));
        }
        if normalize_file_path(&self.to_file).is_empty() {
            return Err(invalid(OPERATION, "to_file"));
        }
        if !self.headers.keys().all(|name| is_header_name(name)) {
            return Err(invalid(OPERATION, "headers"));
        }
        Ok(())
    }
}

impl std::fmt::Debug for DownloadFileOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DownloadFileOptions")
            .field("from_url", &self.from_url)
            .field("to_file", &self.to_file)
            .field("headers", &self.headers)
            .field("background", &self.background)
            .field("progress_divider", &self.progress_divider)
            .field("on_begin", &self.begin.len())
            .field("on_progress", &self.progress.len())
            .finish()
    }
}

/// Options for [`NativeFs::upload_files`].
#[derive(Clone)]
pub struct UploadFileOptions {
    to_url: String,
    files: Vec<UploadFile>,
    headers: HashMap<String, String>,
    fields: HashMap<String, String>,
    method: Option<String>,
    begin: Vec<UploadBeginCallback>,
    progress: Vec<UploadProgressCallback>,
}

impl UploadFileOptions {
    /// Uploads to `to_url`; attach at least one file.
    #[must_use]
    pub fn new(to_url: impl Into<String>) -> Self {
        Self {
            to_url: to_url.into(),
            files: Vec::new(),
            headers: HashMap::new(),
            fields: HashMap::new(),
            method: None,
            begin: Vec::new(),
            progress: Vec::new(),
        }
    }

    /// Attaches a file.
    #[must_use]
    pub fn file(mut self, file: UploadFile) -> Self {
        self.files.push(file);
        self
    }

    /// Attaches several files.
    #[must_use]
    pub fn files(mut self, files: impl IntoIterator<Item = UploadFile>) -> Self {
        self.files.extend(files);
        self
    }

    /// Adds a request header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Adds a form field.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Sets the HTTP method (`POST` by default).
    #[must_use]
    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    /// Calls `callback` right before the request is sent. Adds to earlier
    /// callbacks.
    #[must_use]
    pub fn on_begin(mut self, callback: impl Fn(&UploadBegin) + Send + Sync + 'static) -> Self {
        self.begin.push(Arc::new(callback));
        self
    }

    /// Calls `callback` as file bytes are sent. Adds to earlier callbacks.
    #[must_use]
    pub fn on_progress(mut self, callback: impl Fn(&UploadProgress) + Send + Sync + 'static) -> Self {
        self.progress.push(Arc::new(callback));
        self
    }

    fn validate(&self) -> Result<()> {
        const OPERATION: &str = "uploadFiles";
        if self.to_url.is_empty() {
            return Err(invalid(OPERATION, "to_url"));
        }
        let file_ok = |f: &UploadFile| {
            !f.name.is_empty()
                && !f.filename.is_empty()
                && !normalize_path_buf(&f.filepath).as_os_str().is_empty()
        };
        if self.files.is_empty() || !self.files.iter().all(file_ok) {
            return Err(invalid(OPERATION, "files"));
        }
        if !self.headers.keys().all(|name| is_header_name(name)) {
            return Err(invalid(OPERATION, "headers"));
        }
        if self.fields.keys().any(String::is_empty) {
            return Err(invalid(OPERATION, "fields"));
        }
        if self.method.as_deref().is_some_and(str::is_empty) {
            return Err(invalid(OPERATION, "method"));
        }
        Ok(())
    }
}

impl std::fmt::Debug for UploadFileOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadFileOptions")
            .field("to_url", &self.to_url)
            .field("files", &self.files)
            .field("headers", &self.headers)
            .field("fields", &self.fields)
            .field("method", &self.method)
            .field("on_begin", &self.begin.len())
            .field("on_progress", &self.progress.len())
            .finish()
    }
}

const fn invalid(operation: &'static str, field: &'static str) -> NativeFsError {
    NativeFsError::InvalidArgument { operation, field }
}

fn is_header_name(name: &str) -> bool {
    !name.is_empty()
        && !name
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || c == ':')
}

fn normalize_path_buf(path: &std::path::Path) -> PathBuf {
    path.to_str()
        .map_or_else(|| path.to_path_buf(), |s| PathBuf::from(normalize_file_path(s)))
}

/// Adapts a typed callback to the bus handler of one event kind.
fn handler<E: 'static>(
    callback: Arc<dyn Fn(&E) + Send + Sync>,
    select: fn(&TransferEvent) -> Option<&E>,
) -> EventHandler {
    Arc::new(move |event: &TransferEvent| {
        if let Some(payload) = select(event) {
            callback(payload);
        }
    })
}

impl NativeFs {
    /// Starts a download and returns a handle to its result.
    ///
    /// Options are validated before a job id is allocated. Callbacks only
    /// see events of this job and are released when it settles.
    ///
    /// # Errors
    ///
    /// Returns [`NativeFsError::InvalidArgument`] if the options are invalid.
    /// Transfer failures surface through the handle as
    /// [`NativeFsError::TransferFailed`].
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    pub fn download_file(&self, options: DownloadFileOptions) -> Result<JobHandle<DownloadResult>> {
        options.validate()?;

        let mut job = self.registry.create_job();
        for callback in options.begin {
            let routed = handler(callback, |e| match e {
                TransferEvent::DownloadBegin(begin) => Some(begin),
                _ => None,
            });
            self.registry.subscribe(&mut job, EventKind::DownloadBegin, routed);
        }
        for callback in options.progress {
            let routed = handler(callback, |e| match e {
                TransferEvent::DownloadProgress(progress) => Some(progress),
                _ => None,
            });
            self.registry.subscribe(&mut job, EventKind::DownloadProgress, routed);
        }

        let request = DownloadRequest {
            job_id: job.id(),
            from_url: options.from_url,
            to_file: PathBuf::from(normalize_file_path(&options.to_file)),
            headers: options.headers,
            background: options.background,
            progress_divider: options.progress_divider,
        };
        info!(
            job_id = %request.job_id,
            url = %request.from_url,
            to = %request.to_file.display(),
            "download started"
        );
        Ok(self.run(job, move |engine| async move { engine.download_file(request).await }))
    }

    /// Starts a multipart upload and returns a handle to its result.
    ///
    /// # Errors
    ///
    /// Returns [`NativeFsError::CapabilityUnsupported`] if the engine cannot
    /// upload, or [`NativeFsError::InvalidArgument`] if the options are
    /// invalid. Both are raised before a job id is allocated.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    pub fn upload_files(&self, options: UploadFileOptions) -> Result<JobHandle<UploadResult>> {
        self.require(Capability::UploadFiles)?;
        options.validate()?;

        let mut job = self.registry.create_job();
        for callback in options.begin {
            let routed = handler(callback, |e| match e {
                TransferEvent::UploadBegin(begin) => Some(begin),
                _ => None,
            });
            self.registry.subscribe(&mut job, EventKind::UploadBegin, routed);
        }
        for callback in options.progress {
            let routed = handler(callback, |e| match e {
                TransferEvent::UploadProgress(progress) => Some(progress),
                _ => None,
            });
            self.registry.subscribe(&mut job, EventKind::UploadProgress, routed);
        }

        let files = options
            .files
            .into_iter()
            .map(|file| UploadFile {
                filepath: normalize_path_buf(&file.filepath),
                ..file
            })
            .collect();
        let request = UploadRequest {
            job_id: job.id(),
            to_url: options.to_url,
            files,
            headers: options.headers,
            fields: options.fields,
            method: options
                .method
                .unwrap_or_else(|| DEFAULT_UPLOAD_METHOD.to_string()),
        };
        info!(
            job_id = %request.job_id,
            url = %request.to_url,
            files = request.files.len(),
            method = %request.method,
            "upload started"
        );
        Ok(self.run(job, move |engine| async move { engine.upload_files(request).await }))
    }

    fn run<T, F, Fut>(&self, job: Job, call: F) -> JobHandle<T>
    where
        T: Send + 'static,
        F: FnOnce(Arc<dyn nativefs_types::NativeEngine>) -> Fut,
        Fut: std::future::Future<Output = Result<T>> + Send + 'static,
    {
        self.engine.prepare_transfer(job.id());
        self.registry.spawn(job, call(Arc::clone(&self.engine)))
    }
}
