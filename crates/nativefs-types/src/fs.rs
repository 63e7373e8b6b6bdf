//! Filesystem value types exchanged with the engine.

use crate::NativeFsError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

/// Type of a filesystem entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    /// A regular file.
    Regular,
    /// A directory.
    Directory,
    /// Anything else (symlink target missing, socket, device...).
    #[default]
    Other,
}

impl From<std::fs::FileType> for FileType {
    fn from(file_type: std::fs::FileType) -> Self {
        if file_type.is_file() {
            Self::Regular
        } else if file_type.is_dir() {
            Self::Directory
        } else {
            Self::Other
        }
    }
}

/// An entry returned by directory listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadDirItem {
    /// Entry name.
    pub name: String,
    /// Full path of the entry.
    pub path: PathBuf,
    /// Size in bytes.
    pub size: u64,
    /// Entry type.
    #[serde(rename = "type")]
    pub kind: FileType,
}

impl ReadDirItem {
    /// Returns true if the entry is a regular file.
    #[must_use]
    pub fn is_file(&self) -> bool {
        self.kind == FileType::Regular
    }

    /// Returns true if the entry is a directory.
    #[must_use]
    pub fn is_directory(&self) -> bool {
        self.kind == FileType::Directory
    }
}

/// Raw stat record as reported by the engine, times in Unix seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeStat {
    /// Creation (or status change) time in seconds since the epoch.
    pub ctime: i64,
    /// Modification time in seconds since the epoch.
    pub mtime: i64,
    /// Size in bytes.
    pub size: u64,
    /// Permission bits.
    pub mode: u32,
    /// Entry type.
    #[serde(rename = "type")]
    pub kind: FileType,
}

/// Stat result handed to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatResult {
    /// Creation (or status change) time.
    pub ctime: DateTime<Utc>,
    /// Modification time.
    pub mtime: DateTime<Utc>,
    /// Size in bytes.
    pub size: u64,
    /// Permission bits.
    pub mode: u32,
    /// Entry type.
    #[serde(rename = "type")]
    pub kind: FileType,
}

impl StatResult {
    /// Returns true if the entry is a regular file.
    #[must_use]
    pub fn is_file(&self) -> bool {
        self.kind == FileType::Regular
    }

    /// Returns true if the entry is a directory.
    #[must_use]
    pub fn is_directory(&self) -> bool {
        self.kind == FileType::Directory
    }
}

impl From<NativeStat> for StatResult {
    fn from(stat: NativeStat) -> Self {
        Self {
            ctime: DateTime::from_timestamp(stat.ctime, 0).unwrap_or_default(),
            mtime: DateTime::from_timestamp(stat.mtime, 0).unwrap_or_default(),
            size: stat.size,
            mode: stat.mode,
            kind: stat.kind,
        }
    }
}

/// Capacity of the filesystem holding the app's data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FsInfo {
    /// Total size in bytes.
    pub total_space: u64,
    /// Bytes available to the app.
    pub free_space: u64,
}

/// Options for directory creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MkdirOptions {
    /// Ask the platform to exclude the directory from backups.
    #[serde(default)]
    pub exclude_from_backup: bool,
}

/// Digest algorithm for file hashing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    /// MD5.
    Md5,
    /// SHA-1.
    Sha1,
    /// SHA-224.
    Sha224,
    /// SHA-256.
    Sha256,
    /// SHA-384.
    Sha384,
    /// SHA-512.
    Sha512,
}

impl HashAlgorithm {
    /// Returns the algorithm as a string identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Md5 => "md5",
            Self::Sha1 => "sha1",
            Self::Sha224 => "sha224",
            Self::Sha256 => "sha256",
            Self::Sha384 => "sha384",
            Self::Sha512 => "sha512",
        }
    }
}

impl std::fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for HashAlgorithm {
    type Err = NativeFsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "md5" => Ok(Self::Md5),
            "sha1" => Ok(Self::Sha1),
            "sha224" => Ok(Self::Sha224),
            "sha256" => Ok(Self::Sha256),
            "sha384" => Ok(Self::Sha384),
            "sha512" => Ok(Self::Sha512),
            _ => Err(NativeFsError::InvalidArgument {
                operation: "hash",
                field: "algorithm",
            }),
        }
    }
}

/// Well-known directories exposed by the engine.
///
/// Entries the platform has no equivalent for are `None`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryPaths {
    /// Directory holding the application bundle.
    pub main_bundle: Option<PathBuf>,
    /// Cache directory.
    pub caches: Option<PathBuf>,
    /// User documents directory.
    pub document: Option<PathBuf>,
    /// App-specific external storage directory.
    pub external: Option<PathBuf>,
    /// Shared external storage root.
    pub external_storage: Option<PathBuf>,
    /// Temporary directory.
    pub temporary: Option<PathBuf>,
    /// App library / data directory.
    pub library: Option<PathBuf>,
    /// User pictures directory.
    pub pictures: Option<PathBuf>,
}
