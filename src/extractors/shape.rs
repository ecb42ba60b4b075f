// src/extractors/shape.rs

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

use super::line_token::LineToken;

// --- Constants ---
/// Window lengths tried when mining for a transaction shape, in tally order.
const SHAPE_LENGTHS: [usize; 3] = [3, 4, 5];

/// A recurring token sequence believed to describe one transaction.
///
/// Always 3 to 5 tokens long, starts with DATE, and contains at least one
/// AMOUNT and one TEXT.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Shape(Vec<LineToken>);

impl Shape {
    /// Returns `None` unless the tokens form a valid transaction shape.
    pub fn new(tokens: &[LineToken]) -> Option<Self> {
        if Self::qualifies(tokens) {
            Some(Self(tokens.to_vec()))
        } else {
            None
        }
    }

    fn qualifies(tokens: &[LineToken]) -> bool {
        SHAPE_LENGTHS.contains(&tokens.len())
            && tokens.first() == Some(&LineToken::Date)
            && tokens.contains(&LineToken::Amount)
            && tokens.contains(&LineToken::Text)
    }

    pub fn tokens(&self) -> &[LineToken] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// First slot holding `token`, if any.
    pub fn position(&self, token: LineToken) -> Option<usize> {
        self.0.iter().position(|&t| t == token)
    }

    pub fn matches(&self, window: &[LineToken]) -> bool {
        self.0.as_slice() == window
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.0.iter().map(|t| t.to_string()).collect();
        write!(f, "({})", names.join(", "))
    }
}

/// Finds the most frequent qualifying window over every offset and every
/// length in 3..=5. Ties go to the candidate tallied last.
pub fn discover_shape(tokens: &[LineToken]) -> Option<Shape> {
    // Counts kept in first-insertion order; the index maps a window to its slot.
    let mut tally: Vec<(&[LineToken], usize)> = Vec::new();
    let mut index: HashMap<&[LineToken], usize> = HashMap::new();

    for len in SHAPE_LENGTHS {
        for window in tokens.windows(len) {
            if !Shape::qualifies(window) {
                continue;
            }
            match index.get(window) {
                Some(&slot) => tally[slot].1 += 1,
                None => {
                    index.insert(window, tally.len());
                    tally.push((window, 1));
                }
            }
        }
    }

    let max_count = tally.iter().map(|&(_, count)| count).max()?;
    let (best, _) = tally
        .iter()
        .rev()
        .find(|&&(_, count)| count == max_count)?;

    tracing::debug!(
        "Evaluated {} candidate shapes, best occurs {} times",
        tally.len(),
        max_count
    );
    Shape::new(best)
}
