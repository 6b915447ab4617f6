//! Manual tagging: navigation with wraparound plus last-write-wins tags.

use crate::domain::{AssetId, Disposition, Dispositions, TriageError};

/// Result of one `tag` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagOutcome {
    /// Asset that was tagged.
    pub tagged: AssetId,
    /// Disposition it had before.
    pub previous: Disposition,
    /// Index the tagger moved to.
    pub current_index: usize,
    /// Every asset now has a decided disposition.
    pub batch_complete: bool,
}

/// Cursor over a non-empty collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManualTagger {
    len: usize,
    current: usize,
}

impl ManualTagger {
    /// Starts at index 0 over `len` assets. `len` is at least 1 for any
    /// loaded collection; a zero length is clamped to 1.
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self {
            len: len.max(1),
            current: 0,
        }
    }

    /// Index of the asset under review.
    #[must_use]
    pub const fn current_index(&self) -> usize {
        self.current
    }

    /// Identity of the asset under review.
    #[must_use]
    pub const fn current(&self) -> AssetId {
        AssetId::from_index(self.current)
    }

    /// Moves forward, wrapping from the last asset to the first.
    pub fn advance(&mut self) -> usize {
        self.current = (self.current + 1) % self.len;
        self.current
    }

    /// Moves back, wrapping from the first asset to the last.
    pub fn retreat(&mut self) -> usize {
        self.current = (self.current + self.len - 1) % self.len;
        self.current
    }

    /// Tags the current asset, then advances.
    ///
    /// Re-tagging overwrites the earlier value. `batch_complete` is set on
    /// every tag that leaves all assets decided, so a caller that declined
    /// to finish is asked again after the next tag.
    ///
    /// # Errors
    ///
    /// Returns [`TriageError::InvalidTag`] for `Unclassified`, which is not
    /// an operator choice.
    pub fn tag(
        &mut self,
        dispositions: &mut Dispositions,
        disposition: Disposition,
    ) -> Result<TagOutcome, TriageError> {
        if !disposition.is_decided() {
            return Err(TriageError::InvalidTag { disposition });
        }
        let tagged = self.current();
        let previous = dispositions
            .set(tagged, disposition)
            .unwrap_or(Disposition::Unclassified);
        let current_index = self.advance();

        Ok(TagOutcome {
            tagged,
            previous,
            current_index,
            batch_complete: dispositions.all_decided(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_wraps_after_n_steps() {
        let mut tagger = ManualTagger::new(4);
        for _ in 0..4 {
            tagger.advance();
        }
        assert_eq!(tagger.current_index(), 0);
    }

    #[test]
    fn test_retreat_from_zero_goes_to_last() {
        let mut tagger = ManualTagger::new(5);
        assert_eq!(tagger.retreat(), 4);
        assert_eq!(tagger.retreat(), 3);
    }

    #[test]
    fn test_single_asset_stays_put() {
        let mut tagger = ManualTagger::new(1);
        assert_eq!(tagger.advance(), 0);
        assert_eq!(tagger.retreat(), 0);
    }

    #[test]
    fn test_two_asset_session_completes_once() {
        let mut tagger = ManualTagger::new(2);
        let mut dispositions = Dispositions::new(2);

        let first = tagger
            .tag(&mut dispositions, Disposition::Maybe)
            .unwrap_or_else(|e| panic!("{e}"));
        assert!(!first.batch_complete);
        assert_eq!(first.current_index, 1);

        let second = tagger
            .tag(&mut dispositions, Disposition::Discard)
            .unwrap_or_else(|e| panic!("{e}"));
        assert!(second.batch_complete);
        assert_eq!(second.current_index, 0);

        assert_eq!(
            dispositions.get(AssetId::from_index(0)),
            Disposition::Maybe
        );
        assert_eq!(
            dispositions.get(AssetId::from_index(1)),
            Disposition::Discard
        );
    }

    #[test]
    fn test_retag_overwrites() {
        let mut tagger = ManualTagger::new(3);
        let mut dispositions = Dispositions::new(3);
        let _ = tagger.tag(&mut dispositions, Disposition::Keep);
        tagger.retreat();
        let outcome = tagger
            .tag(&mut dispositions, Disposition::Discard)
            .unwrap_or_else(|e| panic!("{e}"));

        assert_eq!(outcome.previous, Disposition::Keep);
        assert_eq!(
            dispositions.get(AssetId::from_index(0)),
            Disposition::Discard
        );
        assert_eq!(dispositions.undecided(), 2);
    }

    #[test]
    fn test_unclassified_tag_rejected() {
        let mut tagger = ManualTagger::new(2);
        let mut dispositions = Dispositions::new(2);
        assert!(tagger
            .tag(&mut dispositions, Disposition::Unclassified)
            .is_err());
        assert_eq!(tagger.current_index(), 0);
    }
}
