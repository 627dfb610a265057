/*!
CBOR Tools - A CLI for converting between CBOR and JSON

# Commands

- `inspect`: Decode CBOR and display it as JSON or hex
- `compose`: Parse JSON and emit CBOR, optionally CTAP2 canonical
- `canonical`: Re-encode CBOR in CTAP2 canonical form

# Examples

```bash
# Show a CBOR file as JSON
cbor inspect data.cbor

# Show every item of a CBOR sequence as a JSON text sequence
cbor inspect --sequence stream.cbor

# Convert JSON to CBOR, keeping decimals exact
echo '{"price": 12.50, "qty": 3}' | cbor compose -o data.cbor

# Convert JSON to canonical CBOR with doubles for every number
echo '[0.1, 2]' | cbor compose --canonical --json-options numberconversion=double -

# Canonicalize and show as hex
cbor canonical data.cbor | cbor inspect --format hex -
```
*/

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

mod canonical;
mod compose;
mod inspect;
mod io;

/// A CLI tool for working with CBOR and JSON data
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "A CLI tool for converting between CBOR and JSON",
    long_about = "CBOR Tools converts between CBOR (Concise Binary Object Representation) and JSON.\n\n\
                  Features:\n\
                  - Display CBOR data as JSON or hex\n\
                  - Compose CBOR from JSON with exact decimal numbers\n\
                  - CTAP2 canonical encoding and validation\n\
                  - CBOR sequences and JSON text sequences"
)]
struct Cli {
    /// Diagnostic log level (overrides RUST_LOG)
    #[arg(long, global = true, value_name = "LEVEL")]
    log_level: Option<LevelFilter>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Decode CBOR and display it
    Inspect(inspect::Command),

    /// Convert JSON to CBOR binary
    Compose(compose::Command),

    /// Re-encode CBOR in CTAP2 canonical form
    Canonical(canonical::Command),
}

fn init_logger(log_level: Option<LevelFilter>) {
    let filter = match log_level {
        Some(level) => EnvFilter::default().add_directive(level.into()),
        None => EnvFilter::builder()
            .with_default_directive(LevelFilter::WARN.into())
            .from_env_lossy(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(log_level > Some(LevelFilter::INFO))
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logger(cli.log_level);

    match cli.command {
        Commands::Inspect(args) => args.exec(),
        Commands::Compose(args) => args.exec(),
        Commands::Canonical(args) => args.exec(),
    }
}
