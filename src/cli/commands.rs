//! CLI command implementations
//!
//! Startup sequence for commands that need the type registry:
//! 1. Configuration load and validation
//! 2. Log level applied
//! 3. Struct catalog built (directory, then inline descriptors)
//! 4. Registry and validator constructed
//!
//! Any startup failure is fatal. Once serving, a bad request line produces
//! an error response and processing continues.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::observability::{log_event_with_fields, Event, Logger, Severity};
use crate::options::{AttrOptions, OptionsCodec};
use crate::types::{StructCatalog, StructDescriptor, TypeRegistry};
use crate::validation::{AttributeInput, AttributeValidator, Verdict};

use super::args::Command;
use super::errors::{CliError, CliErrorCode, CliResult};
use super::io::{read_request, read_requests, write_error, write_json, write_response};

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory of struct descriptor files (optional)
    #[serde(default)]
    pub struct_dir: Option<String>,

    /// Inline struct descriptors (optional, default none)
    #[serde(default)]
    pub structs: Vec<StructDescriptor>,

    /// Minimum log level (optional, default "warn")
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            struct_dir: None,
            structs: Vec::new(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> CliResult<()> {
        self.severity()?;

        if matches!(&self.struct_dir, Some(dir) if dir.is_empty()) {
            return Err(CliError::config_error("struct_dir must not be empty"));
        }

        for descriptor in &self.structs {
            descriptor.validate_structure().map_err(|reason| {
                CliError::config_error(format!(
                    "Invalid struct '{}': {}",
                    descriptor.name, reason
                ))
            })?;
        }

        Ok(())
    }

    /// Parsed log level
    pub fn severity(&self) -> CliResult<Severity> {
        self.log_level
            .parse()
            .map_err(|e: String| CliError::config_error(format!("Invalid log_level: {}", e)))
    }

    /// Builds the struct catalog: directory descriptors first, then inline ones.
    pub fn build_catalog(&self) -> CliResult<StructCatalog> {
        let mut catalog = StructCatalog::new();

        if let Some(dir) = &self.struct_dir {
            let loaded = catalog.load_dir(Path::new(dir))?.to_string();
            log_event_with_fields(
                Event::CatalogLoaded,
                &[("struct_dir", dir.as_str()), ("structs", loaded.as_str())],
            );
        }

        for descriptor in &self.structs {
            let name = descriptor.name.clone();
            catalog.register(descriptor.clone())?;
            Logger::trace(Event::StructRegistered, &[("name", name.as_str())]);
        }

        Ok(catalog)
    }
}

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Validate { config } => validate(&config),
        Command::EncodeOptions => encode_options(),
        Command::Structs { config } => structs(&config),
    }
}

/// Validate attribute definitions from stdin
///
/// Reads one JSON attribute input per line and writes one JSON verdict per
/// line to stdout.
pub fn validate(config_path: &Path) -> CliResult<()> {
    let config = boot_config(config_path)?;
    let validator = boot_validator(&config)?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    validate_stream(&validator, stdin.lock(), &mut stdout.lock())
}

/// Encode a JSON options object from stdin into the binary form
pub fn encode_options() -> CliResult<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    encode_stream(&mut stdin.lock(), &mut stdout.lock())
}

/// List registered structures
pub fn structs(config_path: &Path) -> CliResult<()> {
    let config = boot_config(config_path)?;
    let catalog = build_catalog_or_fail(&config)?;

    let stdout = io::stdout();
    write_response(&mut stdout.lock(), &catalog_json(&catalog))
}

fn boot_config(config_path: &Path) -> CliResult<Config> {
    let config = Config::load(config_path)?;
    Logger::set_min_severity(config.severity()?);

    let path = config_path.to_string_lossy();
    log_event_with_fields(Event::ConfigLoaded, &[("path", &*path)]);

    Ok(config)
}

fn build_catalog_or_fail(config: &Config) -> CliResult<StructCatalog> {
    config.build_catalog().map_err(|e| {
        log_event_with_fields(Event::StartupFailed, &[("reason", e.message())]);
        e
    })
}

fn boot_validator(config: &Config) -> CliResult<AttributeValidator> {
    let catalog = build_catalog_or_fail(config)?;
    Ok(AttributeValidator::new(Arc::new(TypeRegistry::new(catalog))))
}

/// Serve validation requests until `reader` is exhausted.
///
/// Bad request lines get an error response; read failures end the loop.
fn validate_stream<R: BufRead, W: Write>(
    validator: &AttributeValidator,
    reader: R,
    writer: &mut W,
) -> CliResult<()> {
    for request in read_requests(reader) {
        let request = match request {
            Ok(request) => request,
            Err(e) if e.code() == &CliErrorCode::InvalidInput => {
                write_error(writer, e.code_str(), e.message())?;
                continue;
            }
            Err(e) => {
                write_error(writer, e.code_str(), e.message())?;
                return Err(e);
            }
        };

        let input: AttributeInput = match serde_json::from_value(request) {
            Ok(input) => input,
            Err(e) => {
                let e = CliError::from(e);
                write_error(writer, e.code_str(), e.message())?;
                continue;
            }
        };

        match validator.validate(&input) {
            Ok(verdict) => write_json(writer, &verdict_json(&verdict))?,
            Err(e) => write_error(writer, e.code(), &e.to_string())?,
        }
    }

    Ok(())
}

fn encode_stream<R: BufRead, W: Write>(reader: &mut R, writer: &mut W) -> CliResult<()> {
    let request = read_request(reader)?;
    let options: AttrOptions = serde_json::from_value(request)?;
    let encoded = STANDARD.encode(OptionsCodec::encode(&options));

    write_response(writer, &json!({ "encoded": encoded }))
}

fn verdict_json(verdict: &Verdict) -> Value {
    match verdict {
        Verdict::Valid(definition) => json!({
            "status": "valid",
            "definition": definition,
        }),
        Verdict::Invalid(errors) => json!({
            "status": "invalid",
            "errors": errors,
        }),
    }
}

fn catalog_json(catalog: &StructCatalog) -> Value {
    let structs: Vec<&StructDescriptor> = catalog
        .names()
        .into_iter()
        .filter_map(|name| catalog.get(name))
        .collect();
    json!({ "structs": structs })
}
