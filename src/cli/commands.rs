//! CLI command implementations
//!
//! Each command loads the config, opens file storage for documents and
//! schemas, runs one service operation, and prints the result. The
//! process holds no state between invocations; the version discipline is
//! the caller's responsibility across commands.

use std::fs;
use std::sync::Arc;

use serde_json::json;

use crate::config::StoreConfig;
use crate::pointer;
use crate::schema::SchemaResolver;
use crate::service::DocumentService;
use crate::storage::FileStorage;
use crate::validation::{StructuralChecker, Validator};

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};
use super::io::{read_value, write_error, write_response};

/// Parses arguments, runs the selected command, and reports the outcome.
///
/// Store failures are printed as JSON error responses; the returned error
/// makes main exit non-zero.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    let config = load_config(&cli)?;

    let outcome = dispatch(&cli.command, &config);
    if let Err(ref e) = outcome {
        write_error(e)?;
    }
    outcome
}

fn load_config(cli: &Cli) -> CliResult<StoreConfig> {
    if cli.config.exists() {
        Ok(StoreConfig::load(&cli.config)?)
    } else {
        Ok(StoreConfig::default())
    }
}

fn dispatch(command: &Command, config: &StoreConfig) -> CliResult<()> {
    match command {
        Command::Init => init(config),
        Command::Schema { schema_id, pointer } => schema(config, schema_id, pointer),
        Command::Create { schema_id, id } => {
            let document = read_value()?;
            let service = open_service(config)?;
            let (doc_id, metadata) = service.create(schema_id, &document, id.as_deref())?;
            write_response(json!({"doc_id": doc_id, "metadata": metadata}))
        }
        Command::Get { doc_id, pointer } => {
            let service = open_service(config)?;
            let (value, version) = service.read(doc_id, pointer)?;
            write_response(json!({"value": value, "version": version}))
        }
        Command::Set {
            doc_id,
            pointer,
            version,
        } => {
            let value = read_value()?;
            let service = open_service(config)?;
            let (value, new_version) = service.update(doc_id, pointer, value, *version)?;
            write_response(json!({"value": value, "version": new_version}))
        }
        Command::Append {
            doc_id,
            pointer,
            version,
        } => {
            let value = read_value()?;
            let service = open_service(config)?;
            let (value, new_version) = service.create_node(doc_id, pointer, value, *version)?;
            write_response(json!({"value": value, "version": new_version}))
        }
        Command::Remove {
            doc_id,
            pointer,
            version,
        } => {
            let service = open_service(config)?;
            let (removed, new_version) = service.delete_node(doc_id, pointer, *version)?;
            write_response(json!({"removed": removed, "version": new_version}))
        }
        Command::List { limit, offset } => {
            let service = open_service(config)?;
            let page = service.list(*limit, *offset)?;
            let count = page.len();
            write_response(json!({"documents": page, "count": count}))
        }
    }
}

/// Creates the data and schema directories named by the config.
fn init(config: &StoreConfig) -> CliResult<()> {
    for dir in [&config.data_dir, &config.schema_dir] {
        fs::create_dir_all(dir)
            .map_err(|e| CliError::io_error(format!("Cannot create {}: {}", dir.display(), e)))?;
    }
    write_response(json!({
        "data_dir": config.data_dir,
        "schema_dir": config.schema_dir
    }))
}

/// Prints a resolved schema, or the node of it a pointer selects.
fn schema(config: &StoreConfig, schema_id: &str, ptr: &str) -> CliResult<()> {
    let schemas = Arc::new(FileStorage::open(&config.schema_dir).map_err(storage_open_error)?);
    let resolver = SchemaResolver::new(schemas);

    let resolved = resolver
        .load(schema_id)
        .map_err(crate::domain::StoreError::from)?;

    let value = if ptr.is_empty() || ptr == "/" {
        resolved
    } else {
        pointer::resolve(&resolved, ptr)
            .map_err(crate::domain::StoreError::from)?
            .clone()
    };

    write_response(json!({"schema_id": schema_id, "schema": value}))
}

fn open_service(config: &StoreConfig) -> CliResult<DocumentService> {
    let documents = Arc::new(FileStorage::open(&config.data_dir).map_err(storage_open_error)?);
    let schemas = Arc::new(FileStorage::open(&config.schema_dir).map_err(storage_open_error)?);

    Ok(DocumentService::new(
        documents,
        SchemaResolver::new(schemas),
        Validator::new(Arc::new(StructuralChecker::new())),
    ))
}

fn storage_open_error(e: crate::storage::StorageError) -> CliError {
    CliError::new("storage_error", e.to_string())
}
