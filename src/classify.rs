use crate::config::PracticeMode;

/// Placeholder shown while the current item's answer is hidden.
pub const MASK: &str = "????";

/// How an extracted line should be presented during practice.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ItemKind {
    /// Ordinary text, e.g. a spelling word.
    PlainText,
    /// Arithmetic, e.g. "12 + 7" or "7 x 8 = 56".
    Expression,
}

/// Classify a single extracted line.
///
/// A line counts as an [`ItemKind::Expression`] when it contains a digit
/// together with an arithmetic operator. Handwritten multiplication signs
/// usually come out of recognition as the letter `x`, so a lone `x` token or
/// an `x` squeezed between digits counts as an operator too.
pub fn classify(item: &str) -> ItemKind {
    if !item.chars().any(|c| c.is_ascii_digit()) {
        return ItemKind::PlainText;
    }

    let has_operator = item
        .chars()
        .any(|c| matches!(c, '+' | '-' | '*' | '/' | '=' | '×' | '÷'));

    if has_operator || has_times_letter(item) {
        ItemKind::Expression
    } else {
        ItemKind::PlainText
    }
}

fn has_times_letter(item: &str) -> bool {
    if item
        .split_whitespace()
        .any(|tok| tok.eq_ignore_ascii_case("x"))
    {
        return true;
    }

    // "6x7" without spaces
    let chars: Vec<char> = item.chars().collect();
    chars
        .windows(3)
        .any(|w| w[0].is_ascii_digit() && matches!(w[1], 'x' | 'X') && w[2].is_ascii_digit())
}

/// Text to put on screen for `item` given the practice mode and reveal state.
///
/// Spelling practice hides the whole item behind [`MASK`] until revealed.
/// Math practice shows the problem from the start: an equation keeps its
/// left-hand side visible with the answer blanked to `?` until revealed,
/// while anything without a written answer is simply shown in full.
pub fn display_text(item: &str, mode: PracticeMode, revealed: bool) -> String {
    match mode {
        PracticeMode::SpellingBee => {
            if revealed {
                item.to_string()
            } else {
                MASK.to_string()
            }
        }
        PracticeMode::MathGeneral => {
            if revealed {
                return item.to_string();
            }
            match (classify(item), item.split_once('=')) {
                (ItemKind::Expression, Some((lhs, _))) => format!("{} = ?", lhs.trim_end()),
                _ => item.to_string(),
            }
        }
    }
}
