//! Filesystem primitives on top of `tokio::fs`.

use nativefs_types::{
    FileType, NativeFsError, NativeStat, ReadDirItem, Result, decode_transport, encode_transport,
};
use sha2::Digest;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::fs;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

/// Read buffer size used when hashing.
const HASH_BUFFER_SIZE: usize = 64 * 1024;

/// Maps an I/O error on `path` to the bridge error taxonomy.
pub(crate) fn io_error(path: &Path, source: std::io::Error) -> NativeFsError {
    if source.kind() == ErrorKind::NotFound {
        NativeFsError::NotFound(path.to_path_buf())
    } else {
        NativeFsError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Resolves `path` inside `root`, refusing paths that climb out of it.
pub(crate) fn resolve_within(root: &Path, path: &Path) -> Result<PathBuf> {
    let mut resolved = root.to_path_buf();
    for component in path.components() {
        match component {
            Component::Normal(part) => resolved.push(part),
            Component::RootDir | Component::CurDir | Component::Prefix(_) => {}
            Component::ParentDir => return Err(NativeFsError::NotFound(path.to_path_buf())),
        }
    }
    Ok(resolved)
}

fn unix_seconds(time: std::io::Result<SystemTime>) -> i64 {
    time.ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map_or(0, |d| i64::try_from(d.as_secs()).unwrap_or(i64::MAX))
}

#[cfg(unix)]
fn permission_bits(metadata: &std::fs::Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o7777
}

#[cfg(not(unix))]
fn permission_bits(metadata: &std::fs::Metadata) -> u32 {
    if metadata.permissions().readonly() {
        0o444
    } else {
        0o666
    }
}

pub(crate) async fn mkdir(path: &Path) -> Result<()> {
    fs::create_dir_all(path)
        .await
        .map_err(|e| io_error(path, e))
}

pub(crate) async fn move_file(from: &Path, to: &Path) -> Result<()> {
    fs::rename(from, to).await.map_err(|e| io_error(from, e))
}

pub(crate) async fn copy_file(from: &Path, to: &Path) -> Result<()> {
    fs::copy(from, to)
        .await
        .map(|_| ())
        .map_err(|e| io_error(from, e))
}

/// Removes a file, or a directory together with its contents.
pub(crate) async fn unlink(path: &Path) -> Result<()> {
    let metadata = fs::symlink_metadata(path)
        .await
        .map_err(|e| io_error(path, e))?;

    let removed = if metadata.is_dir() {
        fs::remove_dir_all(path).await
    } else {
        fs::remove_file(path).await
    };
    removed.map_err(|e| io_error(path, e))
}

pub(crate) async fn exists(path: &Path) -> Result<bool> {
    fs::try_exists(path).await.map_err(|e| io_error(path, e))
}

/// Lists a directory, sorted by entry name.
pub(crate) async fn read_dir(path: &Path) -> Result<Vec<ReadDirItem>> {
    let mut entries = fs::read_dir(path).await.map_err(|e| io_error(path, e))?;
    let mut items = Vec::new();

    while let Some(entry) = entries.next_entry().await.map_err(|e| io_error(path, e))? {
        let entry_path = entry.path();
        let metadata = entry
            .metadata()
            .await
            .map_err(|e| io_error(&entry_path, e))?;
        items.push(ReadDirItem {
            name: entry.file_name().to_string_lossy().into_owned(),
            path: entry_path,
            size: metadata.len(),
            kind: FileType::from(metadata.file_type()),
        });
    }

    items.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(items)
}

pub(crate) async fn stat(path: &Path) -> Result<NativeStat> {
    let metadata = fs::metadata(path).await.map_err(|e| io_error(path, e))?;
    let mtime = unix_seconds(metadata.modified());
    let ctime = match metadata.created() {
        Ok(created) => unix_seconds(Ok(created)),
        Err(_) => mtime,
    };

    Ok(NativeStat {
        ctime,
        mtime,
        size: metadata.len(),
        mode: permission_bits(&metadata),
        kind: FileType::from(metadata.file_type()),
    })
}

/// Reads a file into a base64 transport string.
pub(crate) async fn read_file(path: &Path) -> Result<String> {
    let metadata = fs::metadata(path).await.map_err(|e| io_error(path, e))?;
    if metadata.is_dir() {
        return Err(io_error(
            path,
            std::io::Error::new(ErrorKind::IsADirectory, "is a directory"),
        ));
    }
    let bytes = fs::read(path).await.map_err(|e| io_error(path, e))?;
    Ok(encode_transport(&bytes))
}

pub(crate) async fn write_file(path: &Path, transport: &str) -> Result<()> {
    let bytes = decode_transport(transport)?;
    fs::write(path, bytes).await.map_err(|e| io_error(path, e))
}

pub(crate) async fn append_file(path: &Path, transport: &str) -> Result<()> {
    let bytes = decode_transport(transport)?;
    let mut file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await
        .map_err(|e| io_error(path, e))?;
    file.write_all(&bytes).await.map_err(|e| io_error(path, e))?;
    file.flush().await.map_err(|e| io_error(path, e))
}

/// Streams a file through digest `D`, returning the lowercase hex digest.
pub(crate) async fn digest_file<D: Digest>(path: &Path) -> Result<String> {
    let mut file = fs::File::open(path).await.map_err(|e| io_error(path, e))?;
    let mut hasher = D::new();
    let mut buffer = vec![0u8; HASH_BUFFER_SIZE];

    loop {
        let read = file
            .read(&mut buffer)
            .await
            .map_err(|e| io_error(path, e))?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }

    Ok(hex::encode(hasher.finalize()))
}
