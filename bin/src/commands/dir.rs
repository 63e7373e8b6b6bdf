//! Directory and path commands.

use crate::display::format_bytes;
use anyhow::{Context, Result};
use nativefs_lib::prelude::*;

/// List a directory.
pub(crate) async fn ls(fs: &NativeFs, path: &str, asset: bool, names: bool) -> Result<()> {
    if names && !asset {
        for name in fs.readdir(path).await.with_context(|| format!("Failed to list {path}"))? {
            println!("{name}");
        }
        return Ok(());
    }

    let items = if asset {
        fs.read_dir_assets(path).await
    } else {
        fs.read_dir(path).await
    }
    .with_context(|| format!("Failed to list {path}"))?;

    for item in items {
        if names {
            println!("{}", item.name);
        } else if item.is_directory() {
            println!("{:>10}  {}/", "-", item.name);
        } else {
            println!("{:>10}  {}", format_bytes(item.size), item.name);
        }
    }
    Ok(())
}

/// Create a directory and its parents.
pub(crate) async fn mkdir(fs: &NativeFs, path: &str, exclude_from_backup: bool) -> Result<()> {
    fs.mkdir(path, MkdirOptions { exclude_from_backup })
        .await
        .with_context(|| format!("Failed to create {path}"))
}

/// Move a file.
pub(crate) async fn mv(fs: &NativeFs, from: &str, to: &str) -> Result<()> {
    fs.move_file(from, to)
        .await
        .with_context(|| format!("Failed to move {from} to {to}"))
}

/// Copy a file, optionally out of the asset bundle.
pub(crate) async fn cp(fs: &NativeFs, from: &str, to: &str, asset: bool) -> Result<()> {
    let copied = if asset {
        fs.copy_file_assets(from, to).await
    } else {
        fs.copy_file(from, to).await
    };
    copied.with_context(|| format!("Failed to copy {from} to {to}"))
}

/// Remove a file or directory tree.
pub(crate) async fn rm(fs: &NativeFs, path: &str) -> Result<()> {
    fs.unlink(path)
        .await
        .with_context(|| format!("Failed to remove {path}"))
}

/// Print whether a path exists.
pub(crate) async fn exists(fs: &NativeFs, path: &str, asset: bool) -> Result<()> {
    let found = if asset {
        fs.exists_assets(path).await
    } else {
        fs.exists(path).await
    }
    .with_context(|| format!("Failed to check {path}"))?;
    println!("{found}");
    Ok(())
}
