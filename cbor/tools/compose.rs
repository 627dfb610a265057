/*!
Compose command - convert JSON to CBOR
*/

use crate::io::{Input, Output};
use cborjson::{EncodeOptions, JsonOptions, canonical, encode, json};
use clap::Parser;

/// Convert JSON text to CBOR binary
#[derive(Parser, Debug)]
#[command(
    about = "Convert JSON to CBOR binary",
    long_about = "Parse JSON text and convert it to CBOR binary.\n\n\
                  Numbers keep their exact decimal value by default (tag 4 decimal fractions);\n\
                  use --json-options numberconversion=double for plain floats.\n\
                  A JSON text sequence (RFC 7464) becomes a CBOR sequence."
)]
pub struct Command {
    /// Emit CTAP2 canonical CBOR
    #[arg(short = 'c', long)]
    canonical: bool,

    /// JSON parser options, e.g. "numberconversion=intorfloat;allowduplicatekeys=true"
    #[arg(long, value_name = "OPTIONS", default_value = "")]
    json_options: JsonOptions,

    /// CBOR encoder options, e.g. "useindeflengthstrings=true"
    #[arg(long, value_name = "OPTIONS", default_value = "")]
    options: EncodeOptions,

    /// Treat the input as a JSON text sequence
    #[arg(short = 's', long)]
    sequence: bool,

    /// Output file (default: stdout)
    #[arg(short = 'o', long)]
    output: Option<Output>,

    /// Input file (use '-' for stdin)
    input: Input,
}

impl Command {
    pub fn exec(self) -> anyhow::Result<()> {
        let reader = self.input.open()?;
        let values = if self.sequence {
            let records = json::sequence_from_reader(reader, &self.json_options)?;
            let skipped = records.iter().filter(|r| r.is_none()).count();
            if skipped != 0 {
                tracing::warn!("Skipped {skipped} truncated record(s)");
            }
            records.into_iter().flatten().collect()
        } else {
            vec![json::from_reader(reader, &self.json_options)?]
        };

        let options = self.options.with_ctap2_canonical(self.canonical);
        let mut data = Vec::new();
        for value in &values {
            let bytes = if options.ctap2_canonical() {
                canonical::encode(value)?
            } else {
                encode::emit_with_options(value, &options)?
            };
            data.extend(bytes);
        }

        self.output.unwrap_or_default().write_all(&data)?;
        Ok(())
    }
}
