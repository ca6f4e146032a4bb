#![forbid(unsafe_code)]

//! Streaming ANSI/SGR to HTML converter.
//!
//! `spansi` turns terminal output — SGR style attributes, xterm-256 indexed
//! colors, 24-bit RGB colors, plus the usual cursor/erase noise — into
//! nested HTML `<span>` markup. It is the pure text-transformation core: no
//! I/O, no panics, every input byte sequence converts to something.
//!
//! # Primary responsibilities
//!
//! - **Tokenizer**: rule-priority scanner that classifies runs into text and
//!   style tokens and silently absorbs malformed escape noise.
//! - **Classifier**: SGR parameter → supersession category, deciding which
//!   carried style a new code replaces in streaming mode.
//! - **Palette**: 256-entry index → hex table (16 base + 6×6×6 cube +
//!   grayscale ramp), overridable per index.
//! - **Renderer**: style stack that opens one `<span>` per style token and
//!   closes everything on reset or end of call.
//! - **Sticky record**: insertion-ordered carry of active styles across
//!   chunk boundaries, so each call's output stays well-formed on its own.
//!
//! # Design principles
//!
//! - **No I/O**: callers feed `&str` chunks and write the returned fragments
//!   wherever they like.
//! - **Total**: malformed sequences are consumed, never surfaced; there is
//!   no error path.
//! - **`#![forbid(unsafe_code)]`**: safety enforced at compile time.
//!
//! # Example
//!
//! ```
//! use spansi::{Converter, Options};
//!
//! let mut converter = Converter::new(Options::default());
//! let html = converter.convert("\x1b[1mbold\x1b[0m plain");
//! assert_eq!(html, "<span style=\"font-weight:bold;\">bold</span> plain");
//! ```

pub mod convert;
pub mod palette;
pub mod sgr;
pub mod sticky;
pub mod token;

pub use convert::{Converter, Options};
pub use palette::{Palette, rgb_hex};
pub use sgr::{Category, category_for};
pub use sticky::StickyRecord;
pub use token::{Layer, StyleToken, Token, tokenize};
