use crate::error::SequenceIndexError;

/// Maps a flat sample index onto a `(sequence, frame)` pair over several sequences.
///
/// A sequence of `n` frames contributes `n - 1` samples, one per frame that has a
/// successor, so the index space holds `Σ(n - 1)` samples. Samples are numbered
/// sequence after sequence in table order.
///
/// Example:
///
/// ```
/// use vodata_dataset::SequenceIndex;
///
/// let index = SequenceIndex::build(&[5, 3]).unwrap();
/// assert_eq!(index.len(), 6);
/// assert_eq!(index.resolve(3).unwrap(), (0, 3));
/// assert_eq!(index.resolve(4).unwrap(), (1, 0));
/// assert!(index.resolve(6).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceIndex {
    sizes: Vec<usize>,
    // running total of samples up to and including each sequence
    ends: Vec<usize>,
}

impl SequenceIndex {
    /// Build the index from per-sequence frame counts.
    ///
    /// # Arguments
    ///
    /// * `sizes` - The number of frames of each sequence, in order.
    ///
    /// # Errors
    ///
    /// Returns [`SequenceIndexError::SequenceTooShort`] for a sequence with fewer than
    /// two frames.
    pub fn build(sizes: &[usize]) -> Result<Self, SequenceIndexError> {
        if let Some((ordinal, &size)) = sizes.iter().enumerate().find(|&(_, &s)| s < 2) {
            return Err(SequenceIndexError::SequenceTooShort { ordinal, size });
        }

        let ends = sizes
            .iter()
            .scan(0usize, |total, &size| {
                *total += size - 1;
                Some(*total)
            })
            .collect();

        Ok(Self {
            sizes: sizes.to_vec(),
            ends,
        })
    }

    /// Resolve a global sample index into `(sequence ordinal, local frame)`.
    ///
    /// An index on a sequence boundary belongs to frame 0 of the next sequence. The
    /// returned frame always has a successor in the same sequence.
    ///
    /// # Errors
    ///
    /// Returns [`SequenceIndexError::IndexOutOfRange`] when `index >= self.len()`.
    pub fn resolve(&self, index: usize) -> Result<(usize, usize), SequenceIndexError> {
        let len = self.len();
        if index >= len {
            return Err(SequenceIndexError::IndexOutOfRange { index, len });
        }

        // first sequence whose running total exceeds the index
        let ordinal = self.ends.partition_point(|&end| end <= index);
        let start = self.start_of(ordinal);
        let frame = index - start;

        debug_assert!(ordinal < self.sizes.len());
        debug_assert!(frame + 1 < self.sizes[ordinal]);

        Ok((ordinal, frame))
    }

    /// The global index of `(sequence, frame)`, if that pair is a valid sample.
    pub fn global_index(&self, sequence: usize, frame: usize) -> Option<usize> {
        let size = *self.sizes.get(sequence)?;
        if frame >= size - 1 {
            return None;
        }
        Some(self.start_of(sequence) + frame)
    }

    /// Total number of addressable samples.
    pub fn len(&self) -> usize {
        self.ends.last().copied().unwrap_or(0)
    }

    /// Whether there is no sample at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of sequences in the table.
    pub fn num_sequences(&self) -> usize {
        self.sizes.len()
    }

    /// Frame counts per sequence.
    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }

    fn start_of(&self, ordinal: usize) -> usize {
        match ordinal {
            0 => 0,
            _ => self.ends[ordinal - 1],
        }
    }
}
