//! Formula layout class and classifier output.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::reason::Reason;

/// Formula layout class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormulaType {
    /// Isolated block, usually centered and vertically separated from prose.
    Display,
    /// Embedded in a line of running text.
    Inline,
}

impl FormulaType {
    pub fn as_str(self) -> &'static str {
        match self {
            FormulaType::Display => "display",
            FormulaType::Inline => "inline",
        }
    }

    /// The other layout class.
    pub fn opposite(self) -> Self {
        match self {
            FormulaType::Display => FormulaType::Inline,
            FormulaType::Inline => FormulaType::Display,
        }
    }

    /// Opening and closing math delimiters for this layout class.
    pub fn delimiters(self) -> (&'static str, &'static str) {
        match self {
            FormulaType::Display => ("$$", "$$"),
            FormulaType::Inline => ("$", "$"),
        }
    }

    /// Wraps recognised LaTeX in the delimiters of this layout class.
    ///
    /// Recogniser output is cleaned first: markdown code fences, `$$`/`$`
    /// and `\[ \]` wrappers already present are removed, so wrapping is
    /// idempotent.
    pub fn wrap(self, latex: &str) -> String {
        let body = strip_delimiters(latex);
        let (open, close) = self.delimiters();
        let mut out = String::with_capacity(body.len() + open.len() + close.len());
        out.push_str(open);
        out.push_str(&body);
        out.push_str(close);
        out
    }
}

/// Extracts the bare LaTeX from recogniser output.
fn strip_delimiters(latex: &str) -> String {
    let trimmed = latex.trim();
    let unfenced = if trimmed.starts_with("```") {
        Cow::Owned(
            trimmed
                .lines()
                .filter(|line| !line.trim().starts_with("```"))
                .collect::<Vec<_>>()
                .join("\n"),
        )
    } else {
        Cow::Borrowed(trimmed)
    };

    let mut body: &str = &unfenced;
    if let Some(inner) = strip_pair(body, "$$", "$$").or_else(|| strip_pair(body, "$", "$")) {
        body = inner;
    }
    if let Some(inner) = strip_pair(body, "\\[", "\\]") {
        body = inner;
    }
    body.trim().to_string()
}

fn strip_pair<'a>(text: &'a str, open: &str, close: &str) -> Option<&'a str> {
    text.strip_prefix(open)?.strip_suffix(close)
}

impl fmt::Display for FormulaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output of the formula type classifier.
///
/// `reasoning` lists the fired rules in evaluation order and is never empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormulaTypeResult {
    #[serde(rename = "type")]
    pub formula_type: FormulaType,
    pub confidence: f64,
    pub reasoning: Vec<Reason>,
}

impl FormulaTypeResult {
    pub fn is_display(&self) -> bool {
        self.formula_type == FormulaType::Display
    }

    pub fn has_reason(&self, reason: Reason) -> bool {
        self.reasoning.contains(&reason)
    }

    /// Human-readable reasoning, in the same order as `reasoning`.
    pub fn reasoning_text(&self) -> Vec<&'static str> {
        self.reasoning.iter().map(|r| r.describe()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_uses_block_or_inline_delimiters() {
        assert_eq!(FormulaType::Display.wrap("E = mc^2"), "$$E = mc^2$$");
        assert_eq!(FormulaType::Inline.wrap(" x_i "), "$x_i$");
    }

    #[test]
    fn wrap_strips_existing_delimiters() {
        assert_eq!(FormulaType::Inline.wrap("$$\\frac{a}{b}$$"), "$\\frac{a}{b}$");
        assert_eq!(FormulaType::Display.wrap("$x$"), "$$x$$");
        let once = FormulaType::Display.wrap("a+b");
        assert_eq!(FormulaType::Display.wrap(&once), once);
    }

    #[test]
    fn wrap_strips_code_fences() {
        assert_eq!(FormulaType::Inline.wrap("```latex\nx^2\n```"), "$x^2$");
        assert_eq!(
            FormulaType::Display.wrap("```\n$$\\sum_i a_i$$\n```"),
            "$$\\sum_i a_i$$"
        );
        assert_eq!(
            FormulaType::Display.wrap("```latex\na \\\\\nb\n```"),
            "$$a \\\\\nb$$"
        );
    }

    #[test]
    fn wrap_strips_bracket_delimiters() {
        assert_eq!(FormulaType::Display.wrap("\\[x^2\\]"), "$$x^2$$");
        assert_eq!(FormulaType::Inline.wrap(" \\[ \\alpha \\] "), "$\\alpha$");
        assert_eq!(FormulaType::Display.wrap("$$\\[y\\]$$"), "$$y$$");
    }

    #[test]
    fn opposite_flips_side() {
        assert_eq!(FormulaType::Display.opposite(), FormulaType::Inline);
        assert_eq!(FormulaType::Inline.opposite(), FormulaType::Display);
    }

    #[test]
    fn reasoning_text_keeps_order() {
        let result = FormulaTypeResult {
            formula_type: FormulaType::Inline,
            confidence: 0.6,
            reasoning: vec![Reason::AlignedWithText, Reason::TieBreak],
        };
        assert_eq!(
            result.reasoning_text(),
            vec![
                "vertically aligned with a text line",
                "layout evidence tied, using default type"
            ]
        );
        assert!(result.has_reason(Reason::TieBreak));
        assert!(!result.is_display());
    }
}
