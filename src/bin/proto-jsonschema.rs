//! proto-jsonschema CLI
//!
//! Command-line interface for generating JSON Schemas from protobuf
//! descriptor sets.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde_json::{Map, Value};
use tracing_subscriber::EnvFilter;

use proto_jsonschema::{
    check_pool, load_descriptors_auto, verify_schema, CheckStatus, DescriptorPool,
};

#[derive(Parser)]
#[command(name = "proto-jsonschema")]
#[command(about = "Generate JSON Schemas from protobuf descriptor sets")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace); RUST_LOG overrides
    #[arg(long, short, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the schema of one message, or of every message
    Generate {
        /// Descriptor set source: file path or URL (http:// or https://)
        descriptors: String,

        /// Fully-qualified message name (all messages if omitted)
        #[arg(long, short)]
        message: Option<String>,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,

        /// Verify each generated schema compiles as JSON Schema 2020-12
        #[arg(long)]
        check: bool,
    },

    /// List message names in a descriptor set
    List {
        /// Descriptor set source: file path or URL (http:// or https://)
        descriptors: String,
    },

    /// Generate and verify the schema of every message
    Check {
        /// Descriptor set source: file path or URL (http:// or https://)
        descriptors: String,

        /// Output format: text (default) or json
        #[arg(long, default_value = "text")]
        format: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Generate {
            descriptors,
            message,
            output,
            pretty,
            check,
        } => run_generate(&descriptors, message.as_deref(), output, pretty, check),

        Commands::List { descriptors } => run_list(&descriptors),

        Commands::Check {
            descriptors,
            format,
        } => run_check(&descriptors, &format),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("proto_jsonschema={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load(source: &str) -> Result<DescriptorPool, u8> {
    load_descriptors_auto(source).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })
}

fn run_generate(
    source: &str,
    message: Option<&str>,
    output: Option<PathBuf>,
    pretty: bool,
    check: bool,
) -> Result<(), u8> {
    let pool = load(source)?;

    let generated = match message {
        Some(name) => generate_one(&pool, name, check)?,
        None => {
            let mut all = Map::new();
            for descriptor in pool.messages() {
                let name = descriptor.full_name();
                all.insert(name.to_string(), generate_one(&pool, name, check)?);
            }
            Value::Object(all)
        }
    };

    let json_output = if pretty {
        serde_json::to_string_pretty(&generated)
    } else {
        serde_json::to_string(&generated)
    }
    .map_err(|e| {
        eprintln!("Error serializing output: {}", e);
        2u8
    })?;

    match output {
        Some(path) => {
            std::fs::write(&path, &json_output).map_err(|e| {
                eprintln!("Error writing to {}: {}", path.display(), e);
                3u8
            })?;
        }
        None => {
            println!("{}", json_output);
        }
    }

    Ok(())
}

fn generate_one(pool: &DescriptorPool, name: &str, check: bool) -> Result<Value, u8> {
    let schema = pool.generate_schema(name).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    if check {
        verify_schema(name, &schema).map_err(|e| {
            eprintln!("Error: {}", e);
            1u8
        })?;
    }

    Ok(schema)
}

fn run_list(source: &str) -> Result<(), u8> {
    let pool = load(source)?;
    for message in pool.messages() {
        println!("{}", message.full_name());
    }
    Ok(())
}

fn run_check(source: &str, format: &str) -> Result<(), u8> {
    let pool = load(source)?;
    let report = check_pool(&pool);

    if format == "json" {
        let json_output = serde_json::to_string_pretty(&report).map_err(|e| {
            eprintln!("Error serializing output: {}", e);
            2u8
        })?;
        println!("{}", json_output);
    } else {
        for result in &report.results {
            match result.status {
                CheckStatus::Ok => println!("  \x1b[32m✓\x1b[0m {}", result.message),
                CheckStatus::Error => {
                    println!("  \x1b[31m✗\x1b[0m {}", result.message);
                    if let Some(error) = &result.error {
                        println!("    \x1b[31merror\x1b[0m: {}", error);
                    }
                }
            }
        }

        println!();
        if report.is_ok() {
            println!(
                "\x1b[32m✓ {} messages checked, all passed\x1b[0m",
                report.checked
            );
        } else {
            println!(
                "\x1b[31m✗ {} messages checked: {} passed, {} failed\x1b[0m",
                report.checked, report.passed, report.failed
            );
        }
    }

    if report.is_ok() {
        Ok(())
    } else {
        Err(1)
    }
}

