/*!
Inspect command - display CBOR data as JSON or hex
*/

use super::io::{Input, Output};
use cborjson::{EncodeOptions, JsonOptions, decode, json};
use clap::Parser;
use std::io::Write;

/// Inspect and display CBOR data
#[derive(Parser, Debug)]
#[command(about = "Decode CBOR and display it as JSON or hex", long_about = None)]
pub struct Command {
    /// Output format
    #[arg(
        long,
        default_value = "json",
        value_name = "FORMAT",
        help = "Output format: json (lossy for tags and simple values), hex"
    )]
    format: OutputFormat,

    /// CBOR decoder options, e.g. "resolvereferences=true;allowduplicatekeys=true"
    #[arg(long, value_name = "OPTIONS", default_value = "")]
    options: EncodeOptions,

    /// JSON writer options, e.g. "replacesurrogates=true"
    #[arg(long, value_name = "OPTIONS", default_value = "")]
    json_options: JsonOptions,

    /// Treat the input as a CBOR sequence and write a JSON text sequence
    #[arg(short = 's', long)]
    sequence: bool,

    /// Output file (default: stdout)
    #[arg(short = 'o', long)]
    output: Option<Output>,

    /// Input CBOR file (use '-' for stdin)
    input: Input,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    /// JSON text
    Json,
    /// Hexadecimal dump
    Hex,
}

impl Command {
    pub fn exec(self) -> anyhow::Result<()> {
        let data = self.input.read_all()?;
        let output = self.output.unwrap_or_default();

        if self.format == OutputFormat::Hex {
            let mut text = hex::encode(&data);
            if output.is_terminal() {
                text.push('\n');
            }
            return Ok(output.write_all(text.as_bytes())?);
        }

        let items = if self.sequence {
            decode::decode_sequence(&data, &self.options)?
        } else {
            decode::decode(&data, &self.options.with_allow_empty(true))?
                .into_iter()
                .collect()
        };
        tracing::debug!("Decoded {} item(s) from {} bytes", items.len(), data.len());

        let mut w = output.create()?;
        for item in &items {
            if self.sequence {
                w.write_all(b"\x1e")?;
            }
            json::to_writer(item, &mut w, &self.json_options)?;
            w.write_all(b"\n")?;
        }
        w.flush()?;
        Ok(())
    }
}
