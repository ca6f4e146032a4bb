//! SGR parameter classification.
//!
//! Categories decide which previously carried style a new code supersedes
//! in the streaming sticky record. They are deliberately *not* used to pop
//! the style stack: "off" codes push counter-declaration frames instead of
//! closing a matching "on" frame, so only a reset (SGR 0) or the
//! end-of-call flush ever closes anything.

use crate::token::{Layer, StyleToken};

/// Supersession category of an SGR parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// SGR 0: clears every carried style and contributes none itself.
    All,
    Bold,
    Underline,
    Blink,
    Hide,
    Strike,
    ForegroundColor,
    BackgroundColor,
}

/// Classify an SGR parameter value.
///
/// Codes with no category (faint, the "off" family, overline, unknowns)
/// return `None`; their sticky entries accumulate rather than replace.
#[must_use]
pub const fn category_for(code: i32) -> Option<Category> {
    match code {
        0 => Some(Category::All),
        1 => Some(Category::Bold),
        3..=4 => Some(Category::Underline),
        5..=6 => Some(Category::Blink),
        8 => Some(Category::Hide),
        9 => Some(Category::Strike),
        30..=37 | 39 | 90..=97 => Some(Category::ForegroundColor),
        40..=47 | 49 | 100..=107 => Some(Category::BackgroundColor),
        _ => None,
    }
}

impl StyleToken {
    /// The supersession category of this token.
    ///
    /// Extended-color tokens classify by their layer so a later color in
    /// the same layer fully replaces the carried one instead of nesting
    /// with it across chunks.
    #[must_use]
    pub fn category(self) -> Option<Category> {
        match self {
            StyleToken::Display(code) => category_for(code),
            StyleToken::Xterm256 { layer, .. } | StyleToken::Rgb { layer, .. } => {
                Some(match layer {
                    Layer::Foreground => Category::ForegroundColor,
                    Layer::Background => Category::BackgroundColor,
                })
            }
        }
    }
}
