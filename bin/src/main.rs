//! nativefs CLI - job-tracked transfers and file operations.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use nativefs_lib::prelude::*;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

mod commands;
mod display;

use display::EncodingArg;

#[derive(Parser)]
#[command(name = "nativefs")]
#[command(about = "Job-tracked downloads, uploads and file operations", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (suppress progress output)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Directory served as the asset bundle
    #[arg(long, global = true)]
    assets_dir: Option<PathBuf>,

    /// Overall transfer timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Download a URL to a local file
    Download {
        /// Remote URL
        url: String,

        /// Destination path or file:// URL
        output: String,

        /// Extra request header (NAME:VALUE), repeatable
        #[arg(short = 'H', long = "header")]
        headers: Vec<String>,

        /// Report progress every N percent (0 reports every update)
        #[arg(long, default_value = "0")]
        progress_divider: u32,

        /// Allow the engine to continue in the background
        #[arg(long)]
        background: bool,
    },

    /// Upload files as a multipart form
    Upload {
        /// Remote URL
        url: String,

        /// Files to send
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Form field name for the files
        #[arg(long, default_value = "file")]
        name: String,

        /// MIME type of the files
        #[arg(long)]
        filetype: Option<String>,

        /// Extra form field (NAME=VALUE), repeatable
        #[arg(short = 'F', long = "field")]
        fields: Vec<String>,

        /// Extra request header (NAME:VALUE), repeatable
        #[arg(short = 'H', long = "header")]
        headers: Vec<String>,

        /// HTTP method
        #[arg(short = 'X', long)]
        method: Option<String>,
    },

    /// Print a file
    Cat {
        /// Path or file:// URL
        path: String,

        /// Encoding to print the contents in
        #[arg(short, long, value_enum, default_value = "utf8")]
        encoding: EncodingArg,

        /// Read from the asset bundle
        #[arg(long)]
        asset: bool,
    },

    /// Write contents to a file, replacing it
    Write {
        /// Path or file:// URL
        path: String,

        /// Contents to write
        contents: String,

        /// Encoding of the given contents
        #[arg(short, long, value_enum, default_value = "utf8")]
        encoding: EncodingArg,
    },

    /// Append contents to a file
    Append {
        /// Path or file:// URL
        path: String,

        /// Contents to append
        contents: String,

        /// Encoding of the given contents
        #[arg(short, long, value_enum, default_value = "utf8")]
        encoding: EncodingArg,
    },

    /// List a directory
    Ls {
        /// Path or file:// URL
        #[arg(default_value = ".")]
        path: String,

        /// List a directory of the asset bundle
        #[arg(long)]
        asset: bool,

        /// Print names only
        #[arg(short = '1', long)]
        names: bool,
    },

    /// Show file metadata
    Stat {
        /// Path or file:// URL
        path: String,
    },

    /// Hash a file
    Hash {
        /// File path
        path: String,

        /// Algorithm (md5, sha1, sha224, sha256, sha384, sha512)
        #[arg(short, long, default_value = "sha256")]
        algorithm: String,
    },

    /// Create a directory and its parents
    Mkdir {
        /// Path or file:// URL
        path: String,

        /// Mark the directory as excluded from backups
        #[arg(long)]
        exclude_from_backup: bool,
    },

    /// Move a file
    Mv {
        /// Source
        from: String,
        /// Destination
        to: String,
    },

    /// Copy a file
    Cp {
        /// Source
        from: String,
        /// Destination
        to: String,

        /// Copy out of the asset bundle
        #[arg(long)]
        asset: bool,
    },

    /// Remove a file or directory tree
    Rm {
        /// Path or file:// URL
        path: String,
    },

    /// Check whether a path exists
    Exists {
        /// Path or file:// URL
        path: String,

        /// Check the asset bundle
        #[arg(long)]
        asset: bool,
    },

    /// Show well-known directories
    Paths {
        /// Resolve the path of a named resource bundle instead
        #[arg(long)]
        bundle: Option<String>,
    },

    /// Show filesystem capacity
    Df,
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Show help if no command provided
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let config = EngineConfig {
        assets_dir: cli.assets_dir,
        timeout: cli.timeout.map(Duration::from_secs),
        ..EngineConfig::default()
    };
    let fs = NativeFs::local(config).context("Failed to start the local engine")?;

    match command {
        Commands::Download {
            url,
            output,
            headers,
            progress_divider,
            background,
        } => {
            commands::transfer::download(
                &fs,
                &url,
                &output,
                &headers,
                progress_divider,
                background,
                cli.quiet,
            )
            .await
        }
        Commands::Upload {
            url,
            files,
            name,
            filetype,
            fields,
            headers,
            method,
        } => {
            let request = commands::transfer::UploadArgs {
                url,
                files,
                name,
                filetype,
                fields,
                headers,
                method,
            };
            commands::transfer::upload(&fs, request, cli.quiet).await
        }
        Commands::Cat {
            path,
            encoding,
            asset,
        } => commands::file::cat(&fs, &path, encoding.into(), asset).await,
        Commands::Write {
            path,
            contents,
            encoding,
        } => commands::file::write(&fs, &path, &contents, encoding.into(), false).await,
        Commands::Append {
            path,
            contents,
            encoding,
        } => commands::file::write(&fs, &path, &contents, encoding.into(), true).await,
        Commands::Ls { path, asset, names } => commands::dir::ls(&fs, &path, asset, names).await,
        Commands::Stat { path } => commands::info::stat(&fs, &path).await,
        Commands::Hash { path, algorithm } => commands::file::hash(&fs, &path, &algorithm).await,
        Commands::Mkdir {
            path,
            exclude_from_backup,
        } => commands::dir::mkdir(&fs, &path, exclude_from_backup).await,
        Commands::Mv { from, to } => commands::dir::mv(&fs, &from, &to).await,
        Commands::Cp { from, to, asset } => commands::dir::cp(&fs, &from, &to, asset).await,
        Commands::Rm { path } => commands::dir::rm(&fs, &path).await,
        Commands::Exists { path, asset } => commands::dir::exists(&fs, &path, asset).await,
        Commands::Paths { bundle } => commands::info::paths(&fs, bundle.as_deref()).await,
        Commands::Df => commands::info::df(&fs).await,
    }
}
