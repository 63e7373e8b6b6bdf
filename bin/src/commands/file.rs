//! Content commands: cat, write, append and hash.

use anyhow::{Context, Result};
use nativefs_lib::prelude::*;

/// Print a file in the given encoding.
pub(crate) async fn cat(fs: &NativeFs, path: &str, encoding: Encoding, asset: bool) -> Result<()> {
    let contents = if asset {
        fs.read_file_assets(path, encoding).await
    } else {
        fs.read_file(path, encoding).await
    }
    .with_context(|| format!("Failed to read {path}"))?;

    print!("{contents}");
    if encoding == Encoding::Base64 {
        println!();
    }
    Ok(())
}

/// Write or append `contents` to a file.
pub(crate) async fn write(
    fs: &NativeFs,
    path: &str,
    contents: &str,
    encoding: Encoding,
    append: bool,
) -> Result<()> {
    if append {
        fs.append_file(path, contents, encoding)
            .await
            .with_context(|| format!("Failed to append to {path}"))
    } else {
        fs.write_file(path, contents, encoding)
            .await
            .with_context(|| format!("Failed to write {path}"))
    }
}

/// Print the digest of a file.
pub(crate) async fn hash(fs: &NativeFs, path: &str, algorithm: &str) -> Result<()> {
    let algorithm: HashAlgorithm = algorithm.parse()?;
    let digest = fs
        .hash(path, algorithm)
        .await
        .with_context(|| format!("Failed to hash {path}"))?;
    println!("{digest}  {path}");
    Ok(())
}
