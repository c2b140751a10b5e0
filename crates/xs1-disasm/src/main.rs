use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use std::io::Read;
use std::path::Path;

use xs1_rs::{decode_tokens, Decoded, Decoder, Mnemonic, Words, Xs1Decoder};

mod listing;
mod model;
use listing::{scan, Located, Mode};
use model::{load_raw_bin, read_u8, read_words, Image};

#[derive(Parser, Debug)]
#[command(author, version, about = "XS1 instruction decoder for hex dumps and xobjdump listings", long_about=None)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decode hex or `xobjdump -d` lines, one instruction per line
    Lines {
        /// Input text (default: stdin)
        #[arg(value_name = "FILE")]
        input: Option<String>,
        /// Append SEP and the mnemonic to every instruction line
        #[arg(long, value_name = "SEP", conflicts_with = "substitute")]
        merge: Option<String>,
        /// Replace xobjdump's instruction text, e.g. `ldw (lru6)`, with the mnemonic
        #[arg(long)]
        substitute: bool,
        /// Output format: text or json
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
        /// Stop at the first line that fails to decode
        #[arg(long)]
        strict: bool,
    },
    /// Disassemble a range [start, end) of a raw little-endian image
    Range {
        /// Input binary path
        #[arg(value_name = "BINFILE")]
        input: String,
        /// Start address (hex or dec)
        start: String,
        /// End address (hex or dec, exclusive)
        end: String,
        /// Load address for the binary in target address space
        #[arg(long, default_value_t = 0u32)]
        base: u32,
        /// Skip N bytes at start of file before loading
        #[arg(long, default_value_t = 0usize)]
        skip: usize,
        /// Limit bytes loaded (default: to EOF after --skip)
        #[arg(long)]
        len: Option<usize>,
        /// Show instruction bytes
        #[arg(long)]
        show_bytes: bool,
        /// Write output to file instead of stdout
        #[arg(long, value_name = "FILE")]
        out: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat { Text, Json }

#[derive(Debug, Serialize)]
struct LineOut<'a> {
    line: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    address: Option<u32>,
    token: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    words: Option<Words>,
    #[serde(skip_serializing_if = "Option::is_none")]
    mnemonic: Option<Mnemonic>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn parse_u32(s: &str) -> Result<u32> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Ok(u32::from_str_radix(hex, 16)?)
    } else {
        Ok(s.parse::<u32>()?)
    }
}

fn read_input(input: Option<&str>) -> Result<String> {
    match input {
        Some(path) => std::fs::read_to_string(path).with_context(|| format!("reading {path}")),
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

fn decode_lines(text: &str, mode: &Mode, format: OutputFormat, strict: bool) -> Result<String> {
    let lines: Vec<&str> = text.lines().collect();
    let located: Vec<Option<Located>> = lines.iter().map(|line| scan(line)).collect();
    let tokens: Vec<&str> = located.iter().flatten().map(|l| l.token.as_str()).collect();
    let mut results = decode_tokens(&Xs1Decoder, &tokens).into_iter();

    let mut out = String::new();
    for (idx, (line, located)) in lines.iter().zip(&located).enumerate() {
        let lineno = idx + 1;
        let Some(found) = located else {
            if let (OutputFormat::Text, Some(text)) = (format, mode.render(line, None, None)) {
                out.push_str(&text);
                out.push('\n');
            }
            continue;
        };
        let result = results
            .next()
            .context("decoder returned fewer results than tokens")?;
        if let Err(e) = &result {
            if strict {
                anyhow::bail!("line {lineno}: {e}");
            }
            tracing::warn!(line = lineno, %e, "passing line through undecoded");
        }

        match format {
            OutputFormat::Text => {
                let mnemonic = result.as_ref().ok().map(|d| d.mnemonic);
                if let Some(text) = mode.render(line, Some(found), mnemonic) {
                    out.push_str(&text);
                    out.push('\n');
                }
            }
            OutputFormat::Json => {
                let record = LineOut {
                    line: lineno,
                    address: found.address,
                    token: &found.token,
                    words: found.token.parse().ok(),
                    mnemonic: result.as_ref().ok().map(|d| d.mnemonic),
                    error: result.as_ref().err().map(|e| e.to_string()),
                };
                out.push_str(&serde_json::to_string(&record)?);
                out.push('\n');
            }
        }
    }
    Ok(out)
}

fn disassemble_range(img: &Image, start: u32, end: u32, show_bytes: bool) -> String {
    use std::fmt::Write as _;

    let dec = Xs1Decoder::new();
    let mut pc = start;
    let mut buf = String::new();
    while pc < end {
        let Some(mut words) = read_words(img, pc) else {
            let _ = writeln!(buf, "{pc:#010x}: <oob>");
            break;
        };
        // nothing past `end` belongs to this range
        if pc.wrapping_add(2) >= end {
            words.high = None;
        }
        let (width, text) = match dec.decode(words) {
            Ok(Decoded { mnemonic, width }) => (width.bytes(), mnemonic.to_string()),
            Err(e) => {
                tracing::debug!(pc, %e, "emitting raw word");
                (2, format!(".word {:#06x}", words.low))
            }
        };
        let _ = write!(buf, "{pc:#010x}: ");
        if show_bytes {
            for i in 0..width {
                let _ = write!(buf, "{:02x} ", read_u8(img, pc + i).unwrap_or(0));
            }
            // line up two- and four-byte rows
            if width == 2 {
                buf.push_str("      ");
            }
            buf.push_str("  ");
        }
        let _ = writeln!(buf, "{text}");
        pc = pc.wrapping_add(width);
    }
    buf
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Lines { input, merge, substitute, format, strict } => {
            let mode = match (merge, substitute) {
                (Some(sep), _) => Mode::Merge(sep),
                (None, true) => Mode::Substitute,
                (None, false) => Mode::Plain,
            };
            let text = read_input(input.as_deref())?;
            print!("{}", decode_lines(&text, &mode, format, strict)?);
        }
        Command::Range { input, start, end, base, skip, len, show_bytes, out } => {
            let start = parse_u32(&start)?;
            let end = parse_u32(&end)?;
            anyhow::ensure!(end >= start, "end must be >= start");
            let img = load_raw_bin(Path::new(&input), base, skip, len)?;
            let buf = disassemble_range(&img, start, end, show_bytes);
            if let Some(path) = out { std::fs::write(path, buf)?; } else { print!("{}", buf); }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_u32_hex_and_dec() {
        assert_eq!(parse_u32("0x10").unwrap(), 0x10);
        assert_eq!(parse_u32("16").unwrap(), 16);
        assert!(parse_u32("zz").is_err());
    }

    #[test]
    fn plain_lines_skip_noise_and_bad_tokens() {
        let text = "dd a6\nnot an instruction\n00 f0 00 54\ndd a6 01\n";
        let out = decode_lines(text, &Mode::Plain, OutputFormat::Text, false).unwrap();
        assert_eq!(out, "MKMSK_rus\nSTWSP_lru6\n");
    }

    #[test]
    fn strict_stops_at_first_failure() {
        let text = "dd a6\nff 17\n";
        let err = decode_lines(text, &Mode::Plain, OutputFormat::Text, true).unwrap_err();
        assert!(err.to_string().starts_with("line 2:"), "{err}");
    }

    #[test]
    fn merge_passes_everything_through() {
        let text = "header\ndd a6\nff 17\n";
        let out = decode_lines(text, &Mode::Merge(" # ".into()), OutputFormat::Text, false).unwrap();
        assert_eq!(out, "header\ndd a6 # MKMSK_rus\nff 17\n");
    }

    #[test]
    fn json_records_carry_address_and_error() {
        let text = ".text 0x00010000: dd a6:  mkmsk (rus) r10, 0x20\nff 17\n";
        let out = decode_lines(text, &Mode::Plain, OutputFormat::Json, false).unwrap();
        let records: Vec<serde_json::Value> =
            out.lines().map(|l| serde_json::from_str(l).unwrap()).collect();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["address"], 0x10000);
        assert_eq!(records[0]["mnemonic"], "MKMSK_rus");
        assert_eq!(records[1]["line"], 2);
        assert!(records[1]["error"].as_str().unwrap().contains("invalid encoding"));
    }

    #[test]
    fn range_follows_instruction_widths() {
        // MKMSK_rus, then STWSP_lru6 across two words, then an undecodable word
        let bytes = [0xdd, 0xa6, 0x00, 0xf0, 0x00, 0x54, 0xff, 0x17];
        let img = Image::from_bytes(&bytes, 0x1000, 0, None).unwrap();
        let text = disassemble_range(&img, 0x1000, 0x1008, false);
        assert_eq!(
            text,
            "0x00001000: MKMSK_rus\n0x00001002: STWSP_lru6\n0x00001006: .word 0x17ff\n"
        );
    }

    #[test]
    fn range_does_not_borrow_words_past_end() {
        let bytes = [0x00, 0xf0, 0x00, 0x54];
        let img = Image::from_bytes(&bytes, 0, 0, None).unwrap();
        assert_eq!(disassemble_range(&img, 0, 2, false), "0x00000000: .word 0xf000\n");
    }
}
