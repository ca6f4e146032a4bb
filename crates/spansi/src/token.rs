//! Escape-sequence tokenizer.
//!
//! A rule-priority scanner over the input text. At each position the first
//! matching rule wins, the scan advances past the match, and matching
//! restarts from the new position. The rules, in priority order:
//!
//! 1. backspace run — discarded
//! 2. erase-in-line (`ESC [ 0|1|2 K`) — discarded
//! 3. "set G0 charset" (`ESC [ ( B`) — discarded
//! 4. 24-bit RGB color (`ESC [ 38;2;r;g;b m` / `48;2`) -> [`StyleToken::Rgb`]
//! 5. xterm-256 color (`ESC [ 38;5;N m` / `48;5`) -> [`StyleToken::Xterm256`]
//! 6. newline (`\n`, `\r+\n`, `\r`) -> `Display(-1)` or verbatim text
//! 7. SGR attributes (`ESC [ p;p;... m`) -> one `Display` per parameter
//! 8. erase-in-display (`ESC [ 0..3 J`) — discarded
//! 9. cursor position (`ESC [ row ; col f`) — discarded
//! 10. short CSI-like catch-all — discarded
//! 11. plain text run
//!
//! The catch-all consumes at least the escape byte, so the scanner always
//! makes forward progress; terminal output is noisy and must render
//! best-effort rather than fail.

use memchr::{memchr, memchr3};

/// Which half of the color model an extended-color token targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    Foreground,
    Background,
}

/// A style-affecting token.
///
/// `Copy`, so the streaming sticky record can persist tokens across calls
/// without borrowing the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleToken {
    /// One SGR parameter value, or `-1` for a converted newline.
    Display(i32),
    /// Indexed color from the 256-entry palette.
    Xterm256 { layer: Layer, index: u8 },
    /// Direct 24-bit color. Channels are kept exactly as parsed, unclamped:
    /// a channel above 255 later formats to wide hex.
    Rgb { layer: Layer, channels: [u16; 3] },
}

/// One lexical unit of the input stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    /// A run of characters containing no escape, backspace, or newline.
    Text(&'a str),
    /// A style token (see [`StyleToken`]).
    Style(StyleToken),
}

const ESC: u8 = 0x1b;
const BS: u8 = 0x08;

/// Scan `input` left to right, calling `emit` once per recognized token.
///
/// `newline` selects whether `\n` / `\r` / `\r\n` become `Display(-1)`
/// (rendered as `<br/>`) or pass through as verbatim text. Never fails and
/// never skips input silently except for the discarded control sequences.
pub fn tokenize<'a>(input: &'a str, newline: bool, mut emit: impl FnMut(Token<'a>)) {
    let bytes = input.as_bytes();
    let mut pos = 0;

    while pos < bytes.len() {
        let rest = &bytes[pos..];
        pos += match rest[0] {
            BS => backspace_run(rest),
            ESC => escape(rest, &mut emit),
            b'\n' => {
                line_feed(&input[pos..=pos], newline, &mut emit);
                1
            }
            b'\r' => carriage_return(&input[pos..], newline, &mut emit),
            _ => text_run(&input[pos..], &mut emit),
        };
    }
}

/// Rule 1: a run of backspaces, discarded.
fn backspace_run(b: &[u8]) -> usize {
    let mut i = 1;
    while b.get(i).copied() == Some(BS) {
        i += 1;
    }
    i
}

/// Rules 2–5 and 7–10: everything introduced by the escape byte, tried in
/// priority order. The catch-all at the end always matches.
fn escape<'a>(b: &[u8], emit: &mut impl FnMut(Token<'a>)) -> usize {
    if let Some(len) = erase_in_line(b) {
        return len;
    }
    if let Some(len) = charset(b) {
        return len;
    }
    if let Some(len) = rgb_color(b, emit) {
        return len;
    }
    if let Some(len) = xterm256_color(b, emit) {
        return len;
    }
    if let Some(len) = sgr_attributes(b, emit) {
        return len;
    }
    if let Some(len) = erase_in_display(b) {
        return len;
    }
    if let Some(len) = cursor_position(b) {
        return len;
    }
    catch_all(b)
}

/// Rule 2: `ESC [ [012]? K`.
fn erase_in_line(b: &[u8]) -> Option<usize> {
    if b.get(1).copied() != Some(b'[') {
        return None;
    }
    let mut i = 2;
    if matches!(b.get(i).copied(), Some(b'0'..=b'2')) {
        i += 1;
    }
    (b.get(i).copied() == Some(b'K')).then_some(i + 1)
}

/// Rule 3: `ESC [ ( B`, the bracketed G0-charset form.
fn charset(b: &[u8]) -> Option<usize> {
    (b.get(1).copied() == Some(b'[')
        && b.get(2).copied() == Some(b'(')
        && b.get(3).copied() == Some(b'B'))
    .then_some(4)
}

/// Shared prefix of rules 4 and 5: `ESC [ 3|4 8 ; mode ;`. Returns the
/// layer and the offset just past the second semicolon.
fn extended_prefix(b: &[u8], mode: u8) -> Option<(Layer, usize)> {
    if b.get(1).copied() != Some(b'[') {
        return None;
    }
    let layer = match b.get(2).copied() {
        Some(b'3') => Layer::Foreground,
        Some(b'4') => Layer::Background,
        _ => return None,
    };
    if b.get(3).copied() != Some(b'8')
        || b.get(4).copied() != Some(b';')
        || b.get(5).copied() != Some(mode)
        || b.get(6).copied() != Some(b';')
    {
        return None;
    }
    Some((layer, 7))
}

/// Parse a decimal digit run starting at `i`. Saturates at `u16::MAX`.
fn decimal(b: &[u8], mut i: usize) -> Option<(u16, usize)> {
    let start = i;
    let mut value: u32 = 0;
    while let Some(d @ b'0'..=b'9') = b.get(i).copied() {
        value = value.saturating_mul(10).saturating_add(u32::from(d - b'0'));
        i += 1;
    }
    if i == start {
        return None;
    }
    Some((value.min(u32::from(u16::MAX)) as u16, i))
}

/// Rule 4: `ESC [ 38;2;r;g;b m` and the `48;2` background form.
fn rgb_color<'a>(b: &[u8], emit: &mut impl FnMut(Token<'a>)) -> Option<usize> {
    let (layer, i) = extended_prefix(b, b'2')?;
    let (r, i) = decimal(b, i)?;
    if b.get(i).copied() != Some(b';') {
        return None;
    }
    let (g, i) = decimal(b, i + 1)?;
    if b.get(i).copied() != Some(b';') {
        return None;
    }
    let (blue, i) = decimal(b, i + 1)?;
    if b.get(i).copied() != Some(b'm') {
        return None;
    }
    emit(Token::Style(StyleToken::Rgb {
        layer,
        channels: [r, g, blue],
    }));
    Some(i + 1)
}

/// Rule 5: `ESC [ 38;5;N m` and the `48;5` background form. Indexes above
/// 255 saturate to the top of the palette.
fn xterm256_color<'a>(b: &[u8], emit: &mut impl FnMut(Token<'a>)) -> Option<usize> {
    let (layer, i) = extended_prefix(b, b'5')?;
    let (index, i) = decimal(b, i)?;
    if b.get(i).copied() != Some(b'm') {
        return None;
    }
    emit(Token::Style(StyleToken::Xterm256 {
        layer,
        index: index.min(255) as u8,
    }));
    Some(i + 1)
}

/// Rule 6a: `\n`.
fn line_feed<'a>(text: &'a str, newline: bool, emit: &mut impl FnMut(Token<'a>)) {
    if newline {
        emit(Token::Style(StyleToken::Display(-1)));
    } else {
        emit(Token::Text(text));
    }
}

/// Rules 6b/6c: `\r+\n` collapses to a single break; a lone `\r` is one
/// break of its own. Without the newline option both pass through verbatim.
fn carriage_return<'a>(text: &'a str, newline: bool, emit: &mut impl FnMut(Token<'a>)) -> usize {
    let b = text.as_bytes();
    let mut i = 1;
    while b.get(i).copied() == Some(b'\r') {
        i += 1;
    }
    let len = if b.get(i).copied() == Some(b'\n') { i + 1 } else { 1 };
    if newline {
        emit(Token::Style(StyleToken::Display(-1)));
    } else {
        emit(Token::Text(&text[..len]));
    }
    len
}

/// Rule 7: `ESC [ (param (; param)*)? m`.
///
/// An empty parameter list is an implicit reset and emits `Display(0)`.
/// Empty trailing parameters (`ESC [1;m`) are dropped, matching how
/// terminals treat them as unknowns.
fn sgr_attributes<'a>(b: &[u8], emit: &mut impl FnMut(Token<'a>)) -> Option<usize> {
    if b.get(1).copied() != Some(b'[') {
        return None;
    }
    let mut end = 2;
    while matches!(b.get(end).copied(), Some(b'0'..=b'9' | b';')) {
        end += 1;
    }
    if b.get(end).copied() != Some(b'm') {
        return None;
    }
    let body = &b[2..end];
    if !valid_sgr_body(body) {
        return None;
    }

    if body.is_empty() {
        emit(Token::Style(StyleToken::Display(0)));
    } else {
        for piece in body.split(|&c| c == b';') {
            if piece.is_empty() {
                continue;
            }
            let mut code: i64 = 0;
            for &d in piece {
                code = (code * 10 + i64::from(d - b'0')).min(i64::from(i32::MAX));
            }
            emit(Token::Style(StyleToken::Display(code as i32)));
        }
    }
    Some(end + 1)
}

/// Grammar check for rule 7's parameter body: repeated units of 1–3 digits,
/// each followed by at most one semicolon. Empty bodies are valid (implicit
/// reset); a leading or doubled semicolon is not.
fn valid_sgr_body(body: &[u8]) -> bool {
    let mut i = 0;
    while i < body.len() {
        let start = i;
        while i < body.len() && body[i].is_ascii_digit() && i - start < 3 {
            i += 1;
        }
        if i == start {
            return false;
        }
        if body.get(i).copied() == Some(b';') {
            i += 1;
        }
    }
    true
}

/// Rule 8: `ESC [ [0-3]? J`.
fn erase_in_display(b: &[u8]) -> Option<usize> {
    if b.get(1).copied() != Some(b'[') {
        return None;
    }
    let mut i = 2;
    if matches!(b.get(i).copied(), Some(b'0'..=b'3')) {
        i += 1;
    }
    (b.get(i).copied() == Some(b'J')).then_some(i + 1)
}

/// Rule 9: `ESC [ d{0,3} ; d{0,3} f`.
fn cursor_position(b: &[u8]) -> Option<usize> {
    if b.get(1).copied() != Some(b'[') {
        return None;
    }
    let mut i = 2;
    let mut n = 0;
    while n < 3 && matches!(b.get(i).copied(), Some(b'0'..=b'9')) {
        i += 1;
        n += 1;
    }
    if b.get(i).copied() != Some(b';') {
        return None;
    }
    i += 1;
    n = 0;
    while n < 3 && matches!(b.get(i).copied(), Some(b'0'..=b'9')) {
        i += 1;
        n += 1;
    }
    (b.get(i).copied() == Some(b'f')).then_some(i + 1)
}

/// Rule 10: `ESC [? [0-9;]{0,3}` — absorbs whatever escape noise the other
/// rules rejected. Consumes at least the escape byte, which is what
/// guarantees termination.
fn catch_all(b: &[u8]) -> usize {
    let mut i = 1;
    if b.get(i).copied() == Some(b'[') {
        i += 1;
    }
    let mut n = 0;
    while n < 3 && matches!(b.get(i).copied(), Some(b'0'..=b'9' | b';')) {
        i += 1;
        n += 1;
    }
    i
}

/// Rule 11: a maximal run with no escape, backspace, or newline bytes.
fn text_run<'a>(text: &'a str, emit: &mut impl FnMut(Token<'a>)) -> usize {
    let b = text.as_bytes();
    let stop = match (memchr3(ESC, BS, b'\n', b), memchr(b'\r', b)) {
        (Some(a), Some(c)) => a.min(c),
        (Some(a), None) => a,
        (None, Some(c)) => c,
        (None, None) => b.len(),
    };
    emit(Token::Text(&text[..stop]));
    stop
}
