use rand::seq::SliceRandom;
use rand::Rng;

/// Ordered list of practice items produced by one scan.
///
/// Built once from raw extracted lines and never mutated afterwards: entries
/// are trimmed and anything of one character or less is discarded, matching
/// what the extractor promises downstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordList {
    entries: Vec<String>,
}

/// Trim raw lines and drop everything too short to practice.
///
/// A line surviving this filter has at least two characters after trimming;
/// stray OCR artifacts (lone letters, bullet dots, blank lines) do not.
pub fn clean_lines<I, S>(lines: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .map(|line| line.as_ref().trim().to_string())
        .filter(|line| line.chars().count() > 1)
        .collect()
}

impl WordList {
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            entries: clean_lines(lines),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Produce the working set for one session: optionally shuffle the full
    /// list (uniform permutation), then keep the first `max_items` entries.
    ///
    /// Shuffling happens before truncation so that a capped session samples
    /// uniformly from the whole scan; without shuffling the cap takes a
    /// strict prefix in extraction order.
    pub fn draw<R: Rng>(&self, max_items: usize, randomize: bool, rng: &mut R) -> Vec<String> {
        let mut items = self.entries.clone();
        if randomize {
            items.shuffle(rng);
        }
        items.truncate(max_items);
        items
    }
}
