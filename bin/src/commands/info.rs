//! Metadata commands: stat, paths and df.

use crate::display::format_bytes;
use anyhow::{Context, Result};
use nativefs_lib::prelude::*;
use std::path::PathBuf;

/// Show file metadata.
pub(crate) async fn stat(fs: &NativeFs, path: &str) -> Result<()> {
    let stat = fs
        .stat(path)
        .await
        .with_context(|| format!("Failed to stat {path}"))?;

    let kind = if stat.is_directory() {
        "directory"
    } else if stat.is_file() {
        "file"
    } else {
        "other"
    };
    println!("Path:      {}", normalize_file_path(path));
    println!("Type:      {kind}");
    println!("Size:      {} ({} bytes)", format_bytes(stat.size), stat.size);
    println!("Mode:      {:o}", stat.mode);
    println!("Created:   {}", stat.ctime.format("%Y-%m-%d %H:%M:%S UTC"));
    println!("Modified:  {}", stat.mtime.format("%Y-%m-%d %H:%M:%S UTC"));
    Ok(())
}

fn print_path(label: &str, path: Option<&PathBuf>) {
    let shown = path.map_or_else(|| "-".to_string(), |p| p.display().to_string());
    println!("{label:<18} {shown}");
}

/// Show well-known directories, or resolve a resource bundle.
pub(crate) async fn paths(fs: &NativeFs, bundle: Option<&str>) -> Result<()> {
    if let Some(name) = bundle {
        let path = fs
            .path_for_bundle(name)
            .await
            .with_context(|| format!("No bundle named {name}"))?;
        println!("{path}");
        return Ok(());
    }

    let paths = fs.directory_paths();
    print_path("Main bundle", paths.main_bundle.as_ref());
    print_path("Caches", paths.caches.as_ref());
    print_path("Document", paths.document.as_ref());
    print_path("External", paths.external.as_ref());
    print_path("External storage", paths.external_storage.as_ref());
    print_path("Temporary", paths.temporary.as_ref());
    print_path("Library", paths.library.as_ref());
    print_path("Pictures", paths.pictures.as_ref());
    Ok(())
}

/// Show filesystem capacity.
pub(crate) async fn df(fs: &NativeFs) -> Result<()> {
    let info = fs.fs_info().await.context("Failed to query filesystem")?;
    let used = info.total_space.saturating_sub(info.free_space);
    println!("Total:  {}", format_bytes(info.total_space));
    println!("Used:   {}", format_bytes(used));
    println!("Free:   {}", format_bytes(info.free_space));
    Ok(())
}
