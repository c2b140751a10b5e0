use anyhow::Result;
use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use xs1_rs::{decode_tokens, Decoded, Xs1Decoder};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Decode XS1 instruction words given as hex tokens (e.g. dda6 or 00f0b048)"
)]
struct Opts {
    /// Print one JSON record per token
    #[arg(long)]
    json: bool,
    #[arg(value_name = "TOKEN", required = true)]
    tokens: Vec<String>,
}

#[derive(Serialize)]
struct Record<'a> {
    token: &'a str,
    #[serde(flatten)]
    decoded: Option<Decoded>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let opts = Opts::parse();
    let results = decode_tokens(&Xs1Decoder, &opts.tokens);

    let mut failed = 0usize;
    for (token, result) in opts.tokens.iter().zip(results) {
        if result.is_err() {
            failed += 1;
        }
        if opts.json {
            let (decoded, error) = match result {
                Ok(d) => (Some(d), None),
                Err(e) => (None, Some(e.to_string())),
            };
            println!("{}", serde_json::to_string(&Record { token, decoded, error })?);
        } else {
            match result {
                Ok(d) => println!("{token}: {}", d.mnemonic),
                Err(e) => println!("{token}: <{e}>"),
            }
        }
    }

    anyhow::ensure!(failed == 0, "{failed} of {} tokens did not decode", opts.tokens.len());
    Ok(())
}
