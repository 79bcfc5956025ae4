//! CLI argument parsing for contentstore

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "cs")]
#[command(author, version, about = "Medical educational content store", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show one entry by exact id
    Get {
        /// Entry id (case-sensitive)
        #[arg(required = true)]
        id: String,

        /// Only show this content level (1-5) of an educational entry
        #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=5))]
        level: Option<u8>,

        /// Print the entry as JSON
        #[arg(long)]
        json: bool,
    },

    /// Case-insensitive substring search
    Search {
        /// Text to look for (empty matches everything)
        query: String,

        /// Maximum results to print
        #[arg(short, long)]
        max_results: Option<usize>,

        /// Print matching entries as JSON
        #[arg(long)]
        json: bool,
    },

    /// List entries in a category (e.g. solid-tumor, paraneoplastic, topic)
    Category {
        #[arg(required = true)]
        category: String,

        /// Print matching entries as JSON
        #[arg(long)]
        json: bool,
    },

    /// List educational entries carrying a tag
    Tag {
        #[arg(required = true)]
        tag: String,
    },

    /// Show cross-references of an entry
    Related {
        #[arg(required = true)]
        id: String,
    },

    /// Print the number of entries
    Count,

    /// List every entry id with its category
    List,

    /// Validate content and print all issues
    Validate {
        /// Fail on warnings too
        #[arg(long)]
        strict: bool,
    },

    /// List builtin catalogs
    Catalogs,
}
