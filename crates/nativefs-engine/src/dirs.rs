//! Well-known directories of the host.

use crate::EngineConfig;
use directories::{ProjectDirs, UserDirs};
use nativefs_types::DirectoryPaths;
use std::path::{Path, PathBuf};

fn executable_dir() -> Option<PathBuf> {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
}

/// Resolves the directory table for `config`.
///
/// Entries the host has no equivalent for are left unset.
pub(crate) fn directory_paths(config: &EngineConfig) -> DirectoryPaths {
    let project = ProjectDirs::from("", "", &config.app_name);
    let user = UserDirs::new();

    DirectoryPaths {
        main_bundle: config.bundle_dir.clone().or_else(executable_dir),
        caches: project.as_ref().map(|p| p.cache_dir().to_path_buf()),
        document: user
            .as_ref()
            .and_then(UserDirs::document_dir)
            .map(Path::to_path_buf),
        external: None,
        external_storage: user.as_ref().map(|u| u.home_dir().to_path_buf()),
        temporary: Some(std::env::temp_dir()),
        library: project.as_ref().map(|p| p.data_dir().to_path_buf()),
        pictures: user
            .as_ref()
            .and_then(UserDirs::picture_dir)
            .map(Path::to_path_buf),
    }
}
