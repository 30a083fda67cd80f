//! Rule identifiers reported in classifier reasoning, and their display text.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::types::FormulaType;

/// Identifier of a rule that contributed to a formula type decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reason {
    VerticalIsolation,
    HorizontalCentering,
    LargeSize,
    NoTextOnSameLine,
    AlignedWithText,
    SharesBaseline,
    SmallHeight,
    SurroundedByText,
    /// No rule fired; the default side was used.
    InsufficientEvidence,
    /// Both sides collected the same weight; the default side was used.
    TieBreak,
}

impl Reason {
    /// Side this rule votes for, `None` for the bookkeeping entries.
    pub fn side(self) -> Option<FormulaType> {
        match self {
            Reason::VerticalIsolation
            | Reason::HorizontalCentering
            | Reason::LargeSize
            | Reason::NoTextOnSameLine => Some(FormulaType::Display),
            Reason::AlignedWithText
            | Reason::SharesBaseline
            | Reason::SmallHeight
            | Reason::SurroundedByText => Some(FormulaType::Inline),
            Reason::InsufficientEvidence | Reason::TieBreak => None,
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            Reason::VerticalIsolation => "vertically isolated from surrounding text",
            Reason::HorizontalCentering => "horizontally centered on the page",
            Reason::LargeSize => "tall enough to be a block formula",
            Reason::NoTextOnSameLine => "no text on the same line",
            Reason::AlignedWithText => "vertically aligned with a text line",
            Reason::SharesBaseline => "shares its baseline with a text line",
            Reason::SmallHeight => "height comparable to running text",
            Reason::SurroundedByText => "text directly above and below",
            Reason::InsufficientEvidence => "no layout rule applied, using default type",
            Reason::TieBreak => "layout evidence tied, using default type",
        }
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}
