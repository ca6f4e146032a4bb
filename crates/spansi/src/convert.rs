//! Options and the stateful converter.
//!
//! [`Converter`] owns the style stack and (in streaming mode) the sticky
//! record for one logical stream. Each [`Converter::convert`] call returns a
//! fragment that is tag-balanced on its own: any frames still open when the
//! chunk ends are force-closed, and streaming continuity is handled by
//! reopening the carried styles at the start of the next call.
//!
//! The stack itself is unbounded by design. "Off" codes (22, 23, 24, ...)
//! push counter-declaration frames instead of popping a matching "on" frame,
//! so a long run of toggles with no reset keeps nesting. Only SGR 0 and the
//! end-of-call flush ever pop.

use std::collections::HashMap;

use smallvec::SmallVec;

use crate::palette::{Palette, rgb_hex};
use crate::sticky::StickyRecord;
use crate::token::{Layer, StyleToken, Token, tokenize};

/// Conversion options. Immutable once handed to [`Converter::new`].
#[derive(Debug, Clone)]
pub struct Options {
    /// Hex color emitted for SGR 39 (reset to default foreground).
    pub foreground: String,
    /// Hex color emitted for SGR 49 (reset to default background).
    pub background: String,
    /// Convert newlines (LF, CR, CRLF) to `<br/>`.
    pub newline: bool,
    /// Entity-escape `&`, `<`, `>`, and `"` in text runs.
    pub escape_xml: bool,
    /// Streaming mode: carry active styles across `convert` calls.
    pub stream: bool,
    /// Render each space that follows another space as `&#xa0;`.
    pub space: bool,
    /// When non-zero, render each TAB as this many `&#xa0;` entities.
    pub tabs: u8,
    /// Sparse palette overrides by index; values are emitted verbatim.
    pub colors: HashMap<u8, String>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            foreground: "#FFF".to_string(),
            background: "#000".to_string(),
            newline: false,
            escape_xml: false,
            stream: false,
            space: false,
            tabs: 0,
            colors: HashMap::new(),
        }
    }
}

/// Stateful ANSI → HTML converter.
///
/// One converter owns exactly one style stack and one sticky record for its
/// whole lifetime; use one instance per logical stream. The API takes
/// `&mut self`, which also rules out concurrent use of a single instance.
#[derive(Debug)]
pub struct Converter {
    opts: Options,
    palette: Palette,
    stack: SmallVec<[&'static str; 8]>,
    sticky: StickyRecord,
}

impl Converter {
    /// Build a converter; the palette is computed here, once.
    #[must_use]
    pub fn new(opts: Options) -> Self {
        let palette = Palette::new(&opts.colors);
        Self {
            opts,
            palette,
            stack: SmallVec::new(),
            sticky: StickyRecord::new(),
        }
    }

    /// The options this converter was built with.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.opts
    }

    /// Convert one chunk of input.
    ///
    /// Deterministic given the options and prior instance state. The
    /// returned fragment is always tag-balanced on its own; in streaming
    /// mode, styles still active at the end of this chunk reopen
    /// automatically at the start of the next call.
    pub fn convert(&mut self, input: &str) -> String {
        let mut out = String::with_capacity(input.len() + input.len() / 2);

        // Reopen carried styles before the chunk's own tokens. Replay never
        // re-records; the entries are already in the record.
        let carried: SmallVec<[StyleToken; 8]> = self.sticky.replay().collect();
        for token in carried {
            self.render_style(token, &mut out);
        }

        tokenize(input, self.opts.newline, |token| match token {
            Token::Text(text) => self.render_text(text, &mut out),
            Token::Style(style) => {
                self.render_style(style, &mut out);
                if self.opts.stream {
                    self.sticky.record(style);
                }
            }
        });

        // Every call's own output is self-contained.
        self.close_all(&mut out);

        #[cfg(feature = "tracing")]
        tracing::trace!(
            input_len = input.len(),
            output_len = out.len(),
            carried = self.sticky.len(),
            "chunk converted"
        );

        out
    }

    fn render_text(&self, text: &str, out: &mut String) {
        if !self.opts.escape_xml && !self.opts.space && self.opts.tabs == 0 {
            out.push_str(text);
            return;
        }

        let mut after_space = false;
        for c in text.chars() {
            match c {
                '&' if self.opts.escape_xml => out.push_str("&amp;"),
                '<' if self.opts.escape_xml => out.push_str("&lt;"),
                '>' if self.opts.escape_xml => out.push_str("&gt;"),
                '"' if self.opts.escape_xml => out.push_str("&quot;"),
                '\t' if self.opts.tabs > 0 => {
                    for _ in 0..self.opts.tabs {
                        out.push_str("&#xa0;");
                    }
                }
                ' ' if self.opts.space && after_space => out.push_str("&#xa0;"),
                _ => out.push(c),
            }
            after_space = c == ' ';
        }
    }

    fn render_style(&mut self, token: StyleToken, out: &mut String) {
        match token {
            StyleToken::Display(code) => self.render_display(code, out),
            StyleToken::Xterm256 { layer, index } => {
                let declaration =
                    format!("{}:{}", color_property(layer), self.palette.hex(index));
                self.push_span(&declaration, out);
            }
            StyleToken::Rgb { layer, channels } => {
                let declaration = format!("{}:{}", color_property(layer), rgb_hex(channels));
                self.push_span(&declaration, out);
            }
        }
    }

    /// Dispatch one SGR parameter. Unknown codes fall through untouched:
    /// nothing is emitted and the stack is unchanged.
    fn render_display(&mut self, code: i32, out: &mut String) {
        match code {
            -1 => out.push_str("<br/>"),
            0 => self.close_all(out),
            1 => self.push_span("font-weight:bold;", out),
            2 => self.push_span("font-weight:lighter;", out),
            3 => self.push_span("font-style:italic;", out),
            4 => self.push_span("text-decoration:underline;", out),
            5 => self.push_span("animation:blink 1s linear infinite;", out),
            6 => self.push_span("animation:blink 0.3s linear infinite;", out),
            8 => self.push_span("display:none;", out),
            9 => self.push_span("text-decoration:line-through;", out),
            10 => self.push_span("font-family:initial;", out),
            21 => self.push_span("text-decoration:underline double;", out),
            22 => self.push_span("font-weight:normal;text-decoration:none;font-style:normal;", out),
            23 => self.push_span("font-style:normal;", out),
            24 => self.push_span("text-decoration:none;", out),
            25 => self.push_span("animation:none;", out),
            28 => self.push_span("display:inline;", out),
            29 => self.push_span("text-decoration:none;", out),
            39 => {
                let declaration = format!("color:{}", self.opts.foreground);
                self.push_span(&declaration, out);
            }
            49 => {
                let declaration = format!("background-color:{}", self.opts.background);
                self.push_span(&declaration, out);
            }
            53 => self.push_span("text-decoration:overline;", out),
            55 => self.push_span("text-decoration:none;", out),
            30..=37 => self.push_indexed(Layer::Foreground, (code - 30) as u8, out),
            40..=47 => self.push_indexed(Layer::Background, (code - 40) as u8, out),
            90..=97 => self.push_indexed(Layer::Foreground, (8 + code - 90) as u8, out),
            100..=107 => self.push_indexed(Layer::Background, (8 + code - 100) as u8, out),
            _ => {}
        }
    }

    fn push_indexed(&mut self, layer: Layer, index: u8, out: &mut String) {
        let declaration = format!("{}:{}", color_property(layer), self.palette.hex(index));
        self.push_span(&declaration, out);
    }

    /// Open a `<span>` frame carrying an inline declaration.
    fn push_span(&mut self, declaration: &str, out: &mut String) {
        self.stack.push("span");
        out.push_str("<span style=\"");
        out.push_str(declaration);
        out.push_str("\">");
    }

    /// Close every open frame, most recent first.
    fn close_all(&mut self, out: &mut String) {
        while let Some(tag) = self.stack.pop() {
            out.push_str("</");
            out.push_str(tag);
            out.push('>');
        }
    }
}

const fn color_property(layer: Layer) -> &'static str {
    match layer {
        Layer::Foreground => "color",
        Layer::Background => "background-color",
    }
}
