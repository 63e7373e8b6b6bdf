//! HTTP downloads and multipart uploads over reqwest.

use crate::fs::io_error;
use crate::progress::ProgressGate;
use bytes::Bytes;
use futures::{StreamExt, TryStreamExt};
use nativefs_jobs::LocalEventBus;
use nativefs_types::{
    DownloadBegin, DownloadProgress, DownloadRequest, DownloadResult, JobId, NativeFsError,
    Result, TransferEvent, UploadBegin, UploadProgress, UploadRequest, UploadResult,
};
use reqwest::header::HeaderMap;
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client, Method, RequestBuilder};
use std::collections::HashMap;
use std::io::ErrorKind;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tokio_util::io::ReaderStream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

fn http_error(err: reqwest::Error) -> NativeFsError {
    NativeFsError::Http(err.to_string())
}

fn with_headers(mut builder: RequestBuilder, headers: &HashMap<String, String>) -> RequestBuilder {
    for (name, value) in headers {
        builder = builder.header(name, value);
    }
    builder
}

/// Flattens response headers, skipping values that are not valid text.
fn header_map(headers: &HeaderMap) -> HashMap<String, String> {
    headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect()
}

/// Downloads `request.from_url` into `request.to_file`.
///
/// The partially written file is removed if the download fails or is
/// cancelled.
pub(crate) async fn download(
    client: &Client,
    bus: &LocalEventBus,
    request: DownloadRequest,
    cancel: CancellationToken,
) -> Result<DownloadResult> {
    let job_id = request.job_id;
    let outcome = tokio::select! {
        biased;
        () = cancel.cancelled() => Err(NativeFsError::Cancelled(job_id)),
        result = run_download(client, bus, &request) => result,
    };

    if outcome.is_err() {
        match tokio::fs::remove_file(&request.to_file).await {
            Ok(()) => debug!(%job_id, path = %request.to_file.display(), "removed partial download"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!(%job_id, error = %e, "failed to remove partial download"),
        }
    }
    outcome
}

async fn run_download(
    client: &Client,
    bus: &LocalEventBus,
    request: &DownloadRequest,
) -> Result<DownloadResult> {
    let job_id = request.job_id;
    let response = with_headers(client.get(&request.from_url), &request.headers)
        .send()
        .await
        .map_err(http_error)?;

    let status_code = response.status().as_u16();
    let content_length = response.content_length();
    bus.emit(&TransferEvent::DownloadBegin(DownloadBegin {
        job_id,
        status_code,
        content_length,
        headers: header_map(response.headers()),
    }));

    let mut file = tokio::fs::File::create(&request.to_file)
        .await
        .map_err(|e| io_error(&request.to_file, e))?;
    let mut gate = ProgressGate::new(request.progress_divider, content_length);
    let mut bytes_written = 0u64;
    let mut body = response.bytes_stream();

    while let Some(chunk) = body.next().await {
        let chunk = chunk.map_err(http_error)?;
        file.write_all(&chunk)
            .await
            .map_err(|e| io_error(&request.to_file, e))?;
        bytes_written += chunk.len() as u64;

        if gate.should_emit(bytes_written) {
            bus.emit(&TransferEvent::DownloadProgress(DownloadProgress {
                job_id,
                content_length,
                bytes_written,
            }));
        }
    }
    file.flush()
        .await
        .map_err(|e| io_error(&request.to_file, e))?;

    Ok(DownloadResult {
        job_id,
        status_code,
        bytes_written,
    })
}

/// Publishes upload progress as body chunks are pulled by the client.
#[derive(Clone)]
struct UploadMeter {
    bus: Arc<LocalEventBus>,
    job_id: JobId,
    total: u64,
    sent: Arc<AtomicU64>,
}

impl UploadMeter {
    fn record(&self, len: usize) {
        let sent = self.sent.fetch_add(len as u64, Ordering::Relaxed) + len as u64;
        self.bus.emit(&TransferEvent::UploadProgress(UploadProgress {
            job_id: self.job_id,
            total_bytes_expected_to_send: self.total,
            total_bytes_sent: sent,
        }));
    }
}

/// Streams `file` in `chunk_size` reads, recording each chunk on `meter`.
fn metered_body(file: File, chunk_size: usize, meter: UploadMeter) -> Body {
    let chunks = ReaderStream::with_capacity(file, chunk_size.max(1));
    Body::wrap_stream(chunks.inspect_ok(move |chunk: &Bytes| meter.record(chunk.len())))
}

/// Sends `request.files` as a multipart form.
pub(crate) async fn upload(
    client: &Client,
    bus: Arc<LocalEventBus>,
    request: UploadRequest,
    chunk_size: usize,
    cancel: CancellationToken,
) -> Result<UploadResult> {
    let job_id = request.job_id;
    tokio::select! {
        biased;
        () = cancel.cancelled() => Err(NativeFsError::Cancelled(job_id)),
        result = run_upload(client, bus, &request, chunk_size) => result,
    }
}

async fn run_upload(
    client: &Client,
    bus: Arc<LocalEventBus>,
    request: &UploadRequest,
    chunk_size: usize,
) -> Result<UploadResult> {
    let job_id = request.job_id;
    let method = Method::from_bytes(request.method.to_ascii_uppercase().as_bytes()).map_err(|_| {
        NativeFsError::InvalidArgument {
            operation: "uploadFiles",
            field: "method",
        }
    })?;

    let mut sources = Vec::with_capacity(request.files.len());
    for upload in &request.files {
        let file = File::open(&upload.filepath)
            .await
            .map_err(|e| io_error(&upload.filepath, e))?;
        let len = file
            .metadata()
            .await
            .map_err(|e| io_error(&upload.filepath, e))?
            .len();
        sources.push((file, len));
    }
    let total = sources.iter().map(|(_, len)| len).sum();

    let meter = UploadMeter {
        bus: Arc::clone(&bus),
        job_id,
        total,
        sent: Arc::new(AtomicU64::new(0)),
    };

    let mut form = Form::new();
    for (name, value) in &request.fields {
        form = form.text(name.clone(), value.clone());
    }
    for (file, (source, len)) in request.files.iter().zip(sources) {
        let mut part = Part::stream_with_length(metered_body(source, chunk_size, meter.clone()), len)
            .file_name(file.filename.clone());
        if let Some(mime) = &file.filetype {
            part = part.mime_str(mime).map_err(|_| NativeFsError::InvalidArgument {
                operation: "uploadFiles",
                field: "files",
            })?;
        }
        form = form.part(file.name.clone(), part);
    }

    bus.emit(&TransferEvent::UploadBegin(UploadBegin { job_id }));
    debug!(%job_id, files = request.files.len(), total, "upload started");

    let response = with_headers(client.request(method, &request.to_url), &request.headers)
        .multipart(form)
        .send()
        .await
        .map_err(http_error)?;

    let status_code = response.status().as_u16();
    let headers = header_map(response.headers());
    let body = response.text().await.map_err(http_error)?;

    Ok(UploadResult {
        job_id,
        status_code,
        headers,
        body,
    })
}
