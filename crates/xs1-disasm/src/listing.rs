//! Picking instruction bytes out of text: either bare hex (`dd a6`) or
//! `xobjdump -d` listing lines such as
//! `.text 0x00010000: 00 f0 48 b0:  ldw (lru6)  r1, dp[0x8]`.

use std::sync::OnceLock;

use regex::Regex;
use xs1_rs::Mnemonic;

static LINE_PATTERN: OnceLock<Regex> = OnceLock::new();
static NONARCH_PATTERN: OnceLock<Regex> = OnceLock::new();

/// What was found on an instruction line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Located {
    /// Listing address, when the line has an xobjdump prefix.
    pub address: Option<u32>,
    /// Hex digits with whitespace removed; may be malformed.
    pub token: String,
    /// xobjdump's own rendering, e.g. `ldw (lru6)  `, trailing blanks kept.
    pub nonarch: Option<String>,
}

/// Finds the instruction bytes at the start of `line`.
pub fn scan(line: &str) -> Option<Located> {
    let line_pattern = LINE_PATTERN.get_or_init(|| {
        Regex::new(r"(?i)^(?:(?:\.\w*)?\s*0x(?P<addr>[0-9a-f]+):\s*)?(?P<hex>(?:[0-9a-f]{2}\s*){2,4})").unwrap()
    });
    let caps = line_pattern.captures(line)?;
    let token: String = caps["hex"].chars().filter(|c| !c.is_whitespace()).collect();
    let address = caps
        .name("addr")
        .and_then(|m| u32::from_str_radix(m.as_str(), 16).ok());

    let nonarch_pattern = NONARCH_PATTERN.get_or_init(|| {
        Regex::new(r"(?i)^(?:\.\w*)?\s*0x[0-9a-f]+:\s*(?:[0-9a-f]{2}\s*){2,4}:\s*(?P<insn>\w+\s*\(\w+\)\s*)").unwrap()
    });
    let nonarch = nonarch_pattern
        .captures(line)
        .map(|caps| caps["insn"].to_string());

    Some(Located { address, token, nonarch })
}

/// How a decoded line is written back out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// just the mnemonic
    Plain,
    /// the line, a separator, then the mnemonic
    Merge(String),
    /// xobjdump's instruction text replaced by the mnemonic
    Substitute,
}

impl Mode {
    /// Output for one input line. `mnemonic` is `None` when the line had no
    /// instruction or it failed to decode; such lines are dropped in plain
    /// mode and passed through otherwise.
    pub fn render(&self, line: &str, located: Option<&Located>, mnemonic: Option<Mnemonic>) -> Option<String> {
        let Some(mnemonic) = mnemonic else {
            return match self {
                Mode::Plain => None,
                Mode::Merge(_) | Mode::Substitute => Some(line.trim_end().to_string()),
            };
        };
        match self {
            Mode::Plain => Some(mnemonic.to_string()),
            Mode::Merge(sep) => Some(merge(line, sep, mnemonic)),
            Mode::Substitute => match located.and_then(|l| l.nonarch.as_deref()) {
                Some(original) => Some(substitute(line, original, mnemonic)),
                None => {
                    tracing::debug!(line, "no xobjdump instruction text to substitute");
                    Some(line.trim_end().to_string())
                }
            },
        }
    }
}

pub fn merge(line: &str, sep: &str, mnemonic: Mnemonic) -> String {
    format!("{}{sep}{mnemonic}", line.trim_end())
}

/// Replaces the first `original` in `line`, padding the mnemonic to the
/// same width so following columns stay put.
pub fn substitute(line: &str, original: &str, mnemonic: Mnemonic) -> String {
    let width = original.chars().count();
    let replacement = format!("{mnemonic:<width$}");
    line.replacen(original, &replacement, 1).trim_end().to_string()
}
