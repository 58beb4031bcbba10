//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// nodestore - a schema-governed JSON document store
#[derive(Parser, Debug)]
#[command(name = "nodestore")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, global = true, default_value = "./nodestore.json")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the data and schema directories
    Init,

    /// Create a document against a schema; content is JSON on stdin
    Create {
        /// Schema to validate against
        schema_id: String,

        /// Use this document id instead of generating one
        #[arg(long)]
        id: Option<String>,
    },

    /// Read a document or one of its nodes
    Get {
        /// Document id
        doc_id: String,

        /// JSON Pointer to the node; omit for the whole document
        #[arg(long, default_value = "")]
        pointer: String,
    },

    /// Replace the node at a pointer; the new value is JSON on stdin
    Set {
        /// Document id
        doc_id: String,

        /// JSON Pointer to the node
        pointer: String,

        /// Version observed by the caller
        #[arg(long)]
        version: u64,
    },

    /// Append to the sequence at a pointer; the value is JSON on stdin
    Append {
        /// Document id
        doc_id: String,

        /// JSON Pointer to the sequence
        pointer: String,

        /// Version observed by the caller
        #[arg(long)]
        version: u64,
    },

    /// Remove the node at a pointer
    Remove {
        /// Document id
        doc_id: String,

        /// JSON Pointer to the node
        pointer: String,

        /// Version observed by the caller
        #[arg(long)]
        version: u64,
    },

    /// List stored documents
    List {
        /// Page size
        #[arg(long, default_value_t = 100)]
        limit: usize,

        /// Page start
        #[arg(long, default_value_t = 0)]
        offset: usize,
    },

    /// Print a resolved schema, or a node of it
    Schema {
        /// Schema id
        schema_id: String,

        /// JSON Pointer into the resolved schema
        #[arg(long, default_value = "")]
        pointer: String,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
