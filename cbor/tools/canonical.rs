/*!
Canonical command - re-encode CBOR in CTAP2 canonical form
*/

use crate::io::{Input, Output};
use cborjson::{EncodeOptions, canonical, decode};
use clap::Parser;

/// Re-encode CBOR in CTAP2 canonical form
#[derive(Parser, Debug)]
#[command(
    about = "Re-encode CBOR in CTAP2 canonical form",
    long_about = "Decode CBOR and write it back in CTAP2 canonical form: tags removed, \
                  shortest integer and length encodings, 64-bit floats, map keys sorted.\n\n\
                  With --check, nothing is written and the command fails unless the input \
                  is already canonical."
)]
pub struct Command {
    /// Only verify that the input is already canonical
    #[arg(long)]
    check: bool,

    /// CBOR decoder options, e.g. "resolvereferences=true"
    #[arg(long, value_name = "OPTIONS", default_value = "")]
    options: EncodeOptions,

    /// Output file (default: stdout)
    #[arg(short = 'o', long)]
    output: Option<Output>,

    /// Input CBOR file (use '-' for stdin)
    input: Input,
}

impl Command {
    pub fn exec(self) -> anyhow::Result<()> {
        let data = self.input.read_all()?;

        if self.check {
            decode::decode(&data, &self.options.with_ctap2_canonical(true))?;
            tracing::info!("Input is CTAP2 canonical");
            return Ok(());
        }

        let value = decode::decode(&data, &self.options)?
            .ok_or_else(|| anyhow::anyhow!("Input is empty"))?;
        let canonical = canonical::encode(&value)?;
        if canonical == data {
            tracing::info!("Input was already canonical");
        }

        self.output.unwrap_or_default().write_all(&canonical)?;
        Ok(())
    }
}
