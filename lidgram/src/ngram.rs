use crate::errors::{LidgramError, Result};
use crate::granularity::{Granularity, Token};

/// Gets the number of n-gram windows in a padded sequence.
///
/// # Arguments
///
/// * `padded_len` - The length of the padded sequence in tokens.
/// * `n` - The n-gram order.
///
/// # Returns
///
/// `max(0, padded_len - n + 1)`.
pub const fn window_count(padded_len: usize, n: usize) -> usize {
    (padded_len + 1).saturating_sub(n)
}

/// Extracts boundary-padded n-grams at a fixed granularity and order.
#[derive(Debug, Clone, Copy)]
pub struct NgramExtractor {
    granularity: Granularity,
    n: usize,
}

impl NgramExtractor {
    /// Creates a new extractor.
    ///
    /// # Arguments
    ///
    /// * `granularity` - The tokenization granularity.
    /// * `n` - The n-gram order.
    ///
    /// # Errors
    ///
    /// [`LidgramError::InvalidConfig`] will be returned if `n` is zero.
    pub fn new(granularity: Granularity, n: usize) -> Result<Self> {
        if n == 0 {
            return Err(LidgramError::invalid_config("n", "must be at least 1"));
        }
        Ok(Self { granularity, n })
    }

    pub const fn granularity(&self) -> Granularity {
        self.granularity
    }

    pub const fn n(&self) -> usize {
        self.n
    }

    /// Surrounds tokens with `n - 1` start and end sentinels. Unigram extractors add nothing.
    pub fn pad<'a>(&self, tokens: &[Token<'a>]) -> Vec<Token<'a>> {
        let margin = self.n - 1;
        let mut padded = Vec::with_capacity(tokens.len() + margin * 2);
        padded.resize(margin, self.granularity.start_sentinel());
        padded.extend_from_slice(tokens);
        padded.resize(padded.len() + margin, self.granularity.end_sentinel());
        padded
    }

    /// Emits every contiguous window of `n` tokens as canonical bytes, left to right.
    ///
    /// Sequences shorter than `n` yield no n-grams.
    pub fn extract(&self, padded: &[Token]) -> Vec<Vec<u8>> {
        if padded.len() < self.n {
            return vec![];
        }
        padded
            .windows(self.n)
            .map(|window| self.granularity.canonicalize(window))
            .collect()
    }

    /// Tokenizes, pads, and extracts n-grams from a sentence.
    ///
    /// # Examples
    ///
    /// ```
    /// use lidgram::{Granularity, NgramExtractor};
    ///
    /// let extractor = NgramExtractor::new(Granularity::Word, 2).unwrap();
    /// let ngrams = extractor.ngrams("the cat sat");
    /// assert_eq!(4, ngrams.len());
    /// assert_eq!(b"<s> the".to_vec(), ngrams[0]);
    /// assert_eq!(b"sat </s>".to_vec(), ngrams[3]);
    /// ```
    pub fn ngrams(&self, sentence: &str) -> Vec<Vec<u8>> {
        let tokens = self.granularity.tokenize(sentence);
        self.extract(&self.pad(&tokens))
    }
}
