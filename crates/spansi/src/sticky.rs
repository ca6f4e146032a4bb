//! Streaming continuity: the sticky record.
//!
//! In streaming mode a converter must reopen the styles that were logically
//! active when the previous chunk ended. The record is an insertion-ordered
//! list keyed by supersession category: refreshing a category replaces its
//! entry *in place*, so replay order stays acquisition order rather than
//! recency order. Entries with no category (toggle "off" codes and other
//! uncategorized parameters) accumulate, mirroring the unbounded style
//! stack.

use crate::sgr::Category;
use crate::token::StyleToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct StickyEntry {
    token: StyleToken,
    category: Option<Category>,
}

/// Category-indexed, insertion-ordered record of styles carried across
/// chunk boundaries.
#[derive(Debug, Clone, Default)]
pub struct StickyRecord {
    entries: Vec<StickyEntry>,
}

impl StickyRecord {
    /// Create an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one rendered style token into the record.
    ///
    /// A reset clears everything and stores nothing — it contributes no
    /// forward style.
    pub fn record(&mut self, token: StyleToken) {
        match token.category() {
            Some(Category::All) => self.entries.clear(),
            category @ Some(_) => {
                if let Some(entry) = self.entries.iter_mut().find(|e| e.category == category) {
                    entry.token = token;
                } else {
                    self.entries.push(StickyEntry { token, category });
                }
            }
            None => self.entries.push(StickyEntry {
                token,
                category: None,
            }),
        }
    }

    /// The carried tokens, in acquisition order.
    pub fn replay(&self) -> impl Iterator<Item = StyleToken> + '_ {
        self.entries.iter().map(|e| e.token)
    }

    /// Number of carried entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is carried.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::Layer;

    fn tokens(record: &StickyRecord) -> Vec<StyleToken> {
        record.replay().collect()
    }

    #[test]
    fn categorized_entry_is_recorded_once() {
        let mut record = StickyRecord::new();
        record.record(StyleToken::Display(1));
        record.record(StyleToken::Display(1));
        assert_eq!(tokens(&record), vec![StyleToken::Display(1)]);
    }

    #[test]
    fn same_category_replaces_in_place() {
        let mut record = StickyRecord::new();
        record.record(StyleToken::Display(31)); // red foreground
        record.record(StyleToken::Display(1)); // bold
        record.record(StyleToken::Display(32)); // green foreground
        // The refreshed foreground keeps its original slot ahead of bold.
        assert_eq!(
            tokens(&record),
            vec![StyleToken::Display(32), StyleToken::Display(1)]
        );
    }

    #[test]
    fn extended_colors_supersede_basic_colors() {
        let mut record = StickyRecord::new();
        record.record(StyleToken::Display(31));
        record.record(StyleToken::Xterm256 {
            layer: Layer::Foreground,
            index: 196,
        });
        assert_eq!(
            tokens(&record),
            vec![StyleToken::Xterm256 {
                layer: Layer::Foreground,
                index: 196
            }]
        );
    }

    #[test]
    fn foreground_and_background_do_not_collide() {
        let mut record = StickyRecord::new();
        record.record(StyleToken::Display(31));
        record.record(StyleToken::Display(41));
        assert_eq!(record.len(), 2);
    }

    #[test]
    fn reset_clears_and_stores_nothing() {
        let mut record = StickyRecord::new();
        record.record(StyleToken::Display(1));
        record.record(StyleToken::Display(31));
        record.record(StyleToken::Display(0));
        assert!(record.is_empty());
    }

    #[test]
    fn uncategorized_entries_accumulate() {
        let mut record = StickyRecord::new();
        record.record(StyleToken::Display(24)); // underline off
        record.record(StyleToken::Display(24));
        record.record(StyleToken::Display(22)); // weight/decoration reset
        assert_eq!(record.len(), 3);
    }
}
