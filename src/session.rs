use crate::wordlist::WordList;
use rand::Rng;
use thiserror::Error;

/// Starting a session requires at least one usable item in the working set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no usable text found; rescan with a sharper, better-lit photo")]
pub struct EmptyInputError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Active,
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceOutcome {
    /// Moved to the next item.
    Advanced,
    /// Was on the last item; the session is now complete.
    Completed,
    /// Already complete; nothing changed.
    AlreadyComplete,
}

/// One run through a fixed list of items.
///
/// The idle state (no scan loaded, or after restart/clear) is the absence of
/// a session: the hosting layer keeps an `Option<PracticeSession>` and drops
/// the value to return to the pre-scan state. While a session exists,
/// `current_index` is always a valid index into `items`, and `items` is never
/// mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PracticeSession {
    items: Vec<String>,
    current_index: usize,
    revealed: bool,
    definition_visible: bool,
    phase: SessionPhase,
}

impl PracticeSession {
    /// Build the working set from a scanned list and begin at the first item.
    ///
    /// The working set is `shuffle?(list)[..max_items]`; the shuffle (when
    /// requested) permutes the full list before truncation. Fails when the
    /// resulting set would be empty.
    pub fn start(
        list: &WordList,
        max_items: usize,
        randomize: bool,
    ) -> Result<Self, EmptyInputError> {
        Self::start_with_rng(list, max_items, randomize, &mut rand::thread_rng())
    }

    pub fn start_with_rng<R: Rng>(
        list: &WordList,
        max_items: usize,
        randomize: bool,
        rng: &mut R,
    ) -> Result<Self, EmptyInputError> {
        if list.is_empty() || max_items == 0 {
            return Err(EmptyInputError);
        }
        Ok(Self {
            items: list.draw(max_items, randomize, rng),
            current_index: 0,
            revealed: false,
            definition_visible: false,
            phase: SessionPhase::Active,
        })
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_item(&self) -> &str {
        &self.items[self.current_index]
    }

    /// 1-based position for display: `(3, 10)` reads "word 3 of 10".
    pub fn progress(&self) -> (usize, usize) {
        (self.current_index + 1, self.items.len())
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_complete(&self) -> bool {
        self.phase == SessionPhase::Complete
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub fn definition_visible(&self) -> bool {
        self.definition_visible
    }

    /// Disclose the current item. Idempotent.
    pub fn reveal(&mut self) {
        self.revealed = true;
    }

    pub fn toggle_definition(&mut self) {
        self.definition_visible = !self.definition_visible;
    }

    /// Move to the next item, strictly sequential, or finish the session when
    /// already on the last one. Reveal and definition visibility reset either
    /// way.
    pub fn advance(&mut self) -> AdvanceOutcome {
        if self.phase == SessionPhase::Complete {
            return AdvanceOutcome::AlreadyComplete;
        }
        self.revealed = false;
        self.definition_visible = false;
        if self.current_index < self.items.len() - 1 {
            self.current_index += 1;
            AdvanceOutcome::Advanced
        } else {
            self.phase = SessionPhase::Complete;
            AdvanceOutcome::Completed
        }
    }
}
