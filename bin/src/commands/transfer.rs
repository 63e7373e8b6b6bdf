//! Download and upload commands.
//!
//! Transfers run as bridge jobs; progress bars are fed by the job's
//! begin/progress callbacks and Ctrl-C asks the engine to stop the job.

use crate::display::{format_bytes, parse_pairs, set_total, transfer_bar};
use anyhow::{Context, Result, bail};
use nativefs_lib::prelude::*;
use std::path::PathBuf;
use tracing::warn;

/// Arguments of the upload command.
pub(crate) struct UploadArgs {
    pub(crate) url: String,
    pub(crate) files: Vec<PathBuf>,
    pub(crate) name: String,
    pub(crate) filetype: Option<String>,
    pub(crate) fields: Vec<String>,
    pub(crate) headers: Vec<String>,
    pub(crate) method: Option<String>,
}

/// Awaits `handle`, cancelling the job on Ctrl-C.
async fn await_job<T>(fs: &NativeFs, mut handle: JobHandle<T>) -> nativefs_lib::Result<T> {
    let job_id = handle.job_id();
    tokio::select! {
        result = &mut handle => result,
        Ok(()) = tokio::signal::ctrl_c() => {
            warn!(%job_id, "interrupted, cancelling transfer");
            fs.cancel(job_id);
            handle.await
        }
    }
}

/// Download `url` into `output`.
pub(crate) async fn download(
    fs: &NativeFs,
    url: &str,
    output: &str,
    headers: &[String],
    progress_divider: u32,
    background: bool,
    quiet: bool,
) -> Result<()> {
    let headers = parse_pairs(headers, ':')?;
    let pb = transfer_bar(quiet, url.to_string());
    let begin_bar = pb.clone();
    let progress_bar = pb.clone();

    let options = DownloadFileOptions::new(url, output)
        .headers(headers)
        .background(background)
        .progress_divider(progress_divider)
        .on_begin(move |begin| {
            if let Some(total) = begin.content_length {
                set_total(&begin_bar, total);
            }
            begin_bar.set_message(format!("HTTP {}", begin.status_code));
        })
        .on_progress(move |progress| progress_bar.set_position(progress.bytes_written));

    let handle = fs.download_file(options)?;
    let result = await_job(fs, handle)
        .await
        .with_context(|| format!("Download of {url} failed"))?;

    pb.finish_with_message(format!(
        "HTTP {} - {}",
        result.status_code,
        format_bytes(result.bytes_written)
    ));
    if !(200..300).contains(&result.status_code) {
        bail!("Server responded with HTTP {}", result.status_code);
    }
    if !quiet {
        println!(
            "Saved {} to {}",
            format_bytes(result.bytes_written),
            normalize_file_path(output)
        );
    }
    Ok(())
}

/// Upload files as a multipart form.
pub(crate) async fn upload(fs: &NativeFs, args: UploadArgs, quiet: bool) -> Result<()> {
    let mut options = UploadFileOptions::new(&args.url);
    for path in &args.files {
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .with_context(|| format!("Not a file path: {}", path.display()))?;
        let mut file = UploadFile::new(&args.name, filename, path);
        if let Some(filetype) = &args.filetype {
            file = file.with_filetype(filetype);
        }
        options = options.file(file);
    }
    for (name, value) in parse_pairs(&args.fields, '=')? {
        options = options.field(name, value);
    }
    for (name, value) in parse_pairs(&args.headers, ':')? {
        options = options.header(name, value);
    }
    if let Some(method) = args.method {
        options = options.method(method);
    }

    let pb = transfer_bar(quiet, args.url.clone());
    let begin_bar = pb.clone();
    let progress_bar = pb.clone();
    let options = options
        .on_begin(move |_| begin_bar.set_message("sending"))
        .on_progress(move |progress| {
            if progress_bar.length() != Some(progress.total_bytes_expected_to_send) {
                set_total(&progress_bar, progress.total_bytes_expected_to_send);
            }
            progress_bar.set_position(progress.total_bytes_sent);
        });

    let handle = fs.upload_files(options)?;
    let result = await_job(fs, handle)
        .await
        .with_context(|| format!("Upload to {} failed", args.url))?;

    pb.finish_with_message(format!("HTTP {}", result.status_code));
    if !result.body.is_empty() {
        println!("{}", result.body);
    }
    if !(200..300).contains(&result.status_code) {
        bail!("Server responded with HTTP {}", result.status_code);
    }
    Ok(())
}
