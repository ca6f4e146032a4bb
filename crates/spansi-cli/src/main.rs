#![forbid(unsafe_code)]

//! Command-line front end for `spansi`.
//!
//! Reads a file (or standard input when none is given), feeds the text
//! through one streaming [`Converter`] chunk by chunk, and writes each HTML
//! fragment verbatim to standard output. All conversion semantics live in
//! the library; this binary only maps flags to [`Options`] and moves bytes.

use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use spansi::{Converter, Options};

/// Convert ANSI terminal output to HTML.
#[derive(Debug, Parser)]
#[command(name = "spansi", version)]
struct Cli {
    /// File to convert; standard input when omitted.
    file: Option<PathBuf>,

    /// Foreground color used for resets.
    #[arg(short = 'f', long = "fg", value_name = "HEX", default_value = "#FFF")]
    foreground: String,

    /// Background color used for resets.
    #[arg(short = 'b', long = "bg", value_name = "HEX", default_value = "#000")]
    background: String,

    /// Convert newline characters to <br/>.
    #[arg(short = 'n', long)]
    newline: bool,

    /// Escape &, <, > and " in text as XML entities.
    #[arg(short = 'x', long = "escape-xml")]
    escape_xml: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Streaming is forced on: the input arrives in arbitrary read-sized
    // chunks and styles must survive the boundaries.
    let mut converter = Converter::new(Options {
        foreground: cli.foreground,
        background: cli.background,
        newline: cli.newline,
        escape_xml: cli.escape_xml,
        stream: true,
        ..Options::default()
    });

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    match cli.file {
        Some(path) => {
            let file =
                File::open(&path).with_context(|| format!("cannot open {}", path.display()))?;
            pump(file, &mut converter, &mut out)?;
        }
        None => pump(io::stdin().lock(), &mut converter, &mut out)?,
    }

    out.flush().context("flush stdout")?;
    Ok(())
}

/// Move the reader through the converter in read-sized chunks, holding back
/// a trailing partial UTF-8 sequence until its continuation bytes arrive.
/// Invalid bytes anywhere else decode lossily right away, so a stray byte
/// cannot stall the rest of the stream.
fn pump(mut reader: impl Read, converter: &mut Converter, out: &mut impl Write) -> Result<()> {
    let mut buf = [0u8; 8192];
    let mut pending: Vec<u8> = Vec::new();

    loop {
        let n = reader.read(&mut buf).context("read input")?;
        if n == 0 {
            break;
        }
        pending.extend_from_slice(&buf[..n]);

        let ready = pending.len() - incomplete_suffix(&pending);
        if ready == 0 {
            continue;
        }
        let tail = pending.split_off(ready);
        let head = std::mem::replace(&mut pending, tail);
        let text = String::from_utf8_lossy(&head);
        out.write_all(converter.convert(&text).as_bytes())
            .context("write output")?;
    }

    // Whatever is left at end of input can no longer be completed; render
    // it lossily rather than dropping it.
    if !pending.is_empty() {
        let text = String::from_utf8_lossy(&pending);
        out.write_all(converter.convert(&text).as_bytes())
            .context("write output")?;
    }

    Ok(())
}

/// Length of a truncated multi-byte UTF-8 sequence at the end of `bytes`,
/// or 0 when the buffer ends on a character boundary or with bytes no
/// continuation could repair.
fn incomplete_suffix(bytes: &[u8]) -> usize {
    let start = bytes.len().saturating_sub(3);
    for i in (start..bytes.len()).rev() {
        let need = match bytes[i] {
            0xC0..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF7 => 4,
            // ASCII, continuation, or invalid lead: keep looking back.
            _ => continue,
        };
        let have = bytes.len() - i;
        return if have < need { have } else { 0 };
    }
    0
}
