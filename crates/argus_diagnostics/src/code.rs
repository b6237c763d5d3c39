//! Rule codes with category prefixes for structured finding identification.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The category of a rule code, determining its prefix letter.
///
/// Each category maps to a single-character prefix used in code display
/// (e.g., `E101` for an error-class rule, `W203` for a warning-class rule).
/// The derived ordering (declaration order, then number) is part of the
/// deterministic finding sort.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub enum Category {
    /// Correctness rules, prefixed with `E`.
    Error,
    /// Suspicious-construct rules, prefixed with `W`.
    Warning,
    /// Style and convention rules, prefixed with `C`.
    Convention,
    /// Engine-produced findings (rule failures), prefixed with `X`.
    Engine,
}

impl Category {
    /// Returns the single-character prefix for this category.
    pub fn prefix(self) -> char {
        match self {
            Category::Error => 'E',
            Category::Warning => 'W',
            Category::Convention => 'C',
            Category::Engine => 'X',
        }
    }
}

/// A structured rule code combining a category prefix and a numeric identifier.
///
/// Displayed as the category prefix followed by a zero-padded 3-digit number,
/// e.g., `E101`, `W203`, `C301`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub struct RuleCode {
    /// The category of this rule.
    pub category: Category,
    /// The numeric identifier within the category.
    pub number: u16,
}

impl RuleCode {
    /// Creates a new rule code.
    pub fn new(category: Category, number: u16) -> Self {
        Self { category, number }
    }
}

impl fmt::Display for RuleCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:03}", self.category.prefix(), self.number)
    }
}
