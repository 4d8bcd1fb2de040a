/*
 * fmr - upload, list, download, and delete LLMariner files
 * github.com/llmariner/files-rs
 *
 * SPDX-FileCopyrightText: 2025-2026 LLMariner Authors
 * SPDX-License-Identifier: Apache-2.0
 */
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use llmfiles::prelude::*;
use tracing::debug;

use crate::output::Output;

pub mod file;

#[derive(Parser, Debug)]
#[command(name = "fmr")]
#[command(author, version, about = "fmr: upload, list, download, and delete LLMariner files", long_about = None)]
pub struct Cli {
    /// API endpoint URL. Default: environment `LLMFILES_URL` or <http://localhost:8080>
    #[arg(short = 'u', long, env = "LLMFILES_URL")]
    pub url: Option<String>,

    /// API key for the Authorization header
    #[arg(short = 'k', long, env = "LLMARINER_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Quiet mode - suppress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (repeat for more: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List files
    #[command(alias = "ls")]
    List {
        /// Only files with this purpose
        #[arg(short, long)]
        purpose: Option<PurposeArg>,

        /// Start the page after this file id
        #[arg(long)]
        after: Option<String>,

        /// Page size (1..=100)
        #[arg(short, long)]
        limit: Option<u32>,

        /// Sort direction by creation time
        #[arg(short, long)]
        order: Option<OrderArg>,

        /// Fetch all pages
        #[arg(short, long)]
        all: bool,
    },

    /// Show file metadata
    Get {
        /// File id
        id: String,
    },

    /// Delete a file
    #[command(alias = "rm")]
    Delete {
        /// File id
        id: String,
    },

    /// Upload a file
    #[command(alias = "up")]
    Upload {
        /// Local file to upload
        path: PathBuf,

        /// Intended use of the file
        #[arg(short, long)]
        purpose: PurposeArg,

        /// Filename to register (default: basename of the local path)
        #[arg(long)]
        filename: Option<String>,
    },

    /// Register a file already present in the object store
    Import {
        /// Object-store path (e.g. "datasets/train.jsonl")
        object_path: String,

        /// Intended use of the file
        #[arg(short, long)]
        purpose: PurposeArg,
    },

    /// Download file content
    #[command(alias = "cat")]
    Content {
        /// File id
        id: String,

        /// Write content to file (default: stdout)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Resolve a file's object-store path
    Path {
        /// File id
        id: String,

        /// Use the internal-plane service instead of the worker plane
        #[arg(long)]
        internal: bool,

        /// Use the pre-rename worker rpc namespace
        #[arg(long, conflicts_with = "internal")]
        legacy: bool,
    },
}

/// Purpose tokens accepted on the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PurposeArg {
    FineTune,
    Assistants,
}

impl PurposeArg {
    pub fn to_purpose(self) -> Purpose {
        match self {
            Self::FineTune => Purpose::FineTune,
            Self::Assistants => Purpose::Assistants,
        }
    }
}

/// Sort directions accepted on the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OrderArg {
    Asc,
    Desc,
}

impl OrderArg {
    pub fn to_order(self) -> SortOrder {
        match self {
            Self::Asc => SortOrder::Asc,
            Self::Desc => SortOrder::Desc,
        }
    }
}

pub struct AppContext {
    pub client: FilesClient,
    pub output: Output,
}

pub async fn run(cli: Cli) -> Result<()> {
    let mut config = ClientConfig::default().app_name(env!("CARGO_BIN_NAME"));
    if let Some(url) = &cli.url {
        config = config.base_url(url.clone());
    }
    if let Some(key) = &cli.api_key {
        config = config.api_key(SecretApiKey::new(key.clone()));
    }
    debug!("using endpoint {}", config.base_url);
    let ctx = AppContext {
        client: FilesClient::with_config(config)?,
        output: Output::new(cli.pretty, cli.quiet),
    };
    file::handle(&ctx, cli.command).await
}
