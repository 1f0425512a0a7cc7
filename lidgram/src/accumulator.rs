use hashbrown::HashMap;

use crate::errors::Result;
use crate::model::{Model, ModelRecord};
use crate::ngram::NgramExtractor;

/// Running n-gram counts, keyed by class and then by n-gram bytes.
///
/// Counts are held as `u64` and narrowed to the on-disk `u32` only when drained.
#[derive(Debug, Default)]
pub struct ModelAccumulator {
    counts: HashMap<u32, HashMap<Vec<u8>, u64>>,
    n_windows: u64,
}

impl ModelAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Increments the count of `(class_id, ngram)` by one.
    pub fn add(&mut self, class_id: u32, ngram: &[u8]) {
        let ngrams = self.counts.entry(class_id).or_default();
        if let Some(count) = ngrams.get_mut(ngram) {
            *count += 1;
        } else {
            ngrams.insert(ngram.to_vec(), 1);
        }
        self.n_windows += 1;
    }

    /// Adds `count` occurrences of `(class_id, ngram)`. A zero count creates no key.
    pub fn add_count(&mut self, class_id: u32, ngram: Vec<u8>, count: u64) {
        if count == 0 {
            return;
        }
        *self
            .counts
            .entry(class_id)
            .or_default()
            .entry(ngram)
            .or_insert(0) += count;
        self.n_windows += count;
    }

    /// Counts every n-gram of a sentence.
    ///
    /// # Arguments
    ///
    /// * `class_id` - The class of the sentence.
    /// * `sentence` - A sentence.
    /// * `extractor` - Granularity and order of n-grams.
    ///
    /// # Returns
    ///
    /// The number of n-gram windows counted.
    pub fn add_sentence(
        &mut self,
        class_id: u32,
        sentence: &str,
        extractor: &NgramExtractor,
    ) -> usize {
        let ngrams = extractor.ngrams(sentence);
        for ngram in &ngrams {
            self.add(class_id, ngram);
        }
        ngrams.len()
    }

    pub fn extend_records<I>(&mut self, records: I)
    where
        I: IntoIterator<Item = ModelRecord>,
    {
        for record in records {
            self.add_count(record.class_id, record.ngram, u64::from(record.count));
        }
    }

    /// Sums the counts of another accumulator into this one.
    ///
    /// Merging is associative and commutative, so shards may be combined in any order.
    pub fn merge(&mut self, other: Self) {
        self.n_windows += other.n_windows;
        for (class_id, ngrams) in other.counts {
            match self.counts.get_mut(&class_id) {
                Some(mine) => {
                    for (ngram, count) in ngrams {
                        *mine.entry(ngram).or_insert(0) += count;
                    }
                }
                None => {
                    self.counts.insert(class_id, ngrams);
                }
            }
        }
    }

    /// Gets the count of `(class_id, ngram)`, or zero if it was never added.
    pub fn count(&self, class_id: u32, ngram: &[u8]) -> u64 {
        self.counts
            .get(&class_id)
            .and_then(|ngrams| ngrams.get(ngram))
            .copied()
            .unwrap_or(0)
    }

    /// Gets the sum of all counts of a class.
    pub fn class_total(&self, class_id: u32) -> u64 {
        self.counts
            .get(&class_id)
            .map_or(0, |ngrams| ngrams.values().sum())
    }

    /// Gets the number of distinct `(class_id, ngram)` keys.
    pub fn len(&self) -> usize {
        self.counts.values().map(|ngrams| ngrams.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Gets the total number of windows added so far.
    pub const fn n_windows(&self) -> u64 {
        self.n_windows
    }

    /// Exports the counts as records sorted by `(class_id, ngram)`.
    ///
    /// # Errors
    ///
    /// [`crate::LidgramError::CastError`] will be returned if a count exceeds `u32::MAX`.
    pub fn drain(self) -> Result<Vec<ModelRecord>> {
        let mut classes: Vec<_> = self.counts.into_iter().collect();
        classes.sort_unstable_by_key(|&(class_id, _)| class_id);
        let mut records = Vec::with_capacity(classes.iter().map(|(_, m)| m.len()).sum());
        for (class_id, ngrams) in classes {
            let mut ngrams: Vec<_> = ngrams.into_iter().collect();
            ngrams.sort_unstable();
            for (ngram, count) in ngrams {
                records.push(ModelRecord {
                    class_id,
                    ngram,
                    count: count.try_into()?,
                });
            }
        }
        Ok(records)
    }

    /// Freezes the counts into a [`Model`].
    pub fn into_model(self) -> Result<Model> {
        Ok(Model {
            records: self.drain()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::errors::LidgramError;
    use crate::granularity::Granularity;
    use crate::ngram::window_count;

    #[test]
    fn test_add() {
        let mut acc = ModelAccumulator::new();
        acc.add(0, b"ab");
        acc.add(0, b"ab");
        acc.add(1, b"ab");

        assert_eq!(2, acc.count(0, b"ab"));
        assert_eq!(1, acc.count(1, b"ab"));
        assert_eq!(0, acc.count(2, b"ab"));
        assert_eq!(2, acc.len());
        assert_eq!(3, acc.n_windows());
    }

    #[test]
    fn test_add_sentence_word_bigrams() {
        let e = NgramExtractor::new(Granularity::Word, 2).unwrap();
        let mut acc = ModelAccumulator::new();

        assert_eq!(4, acc.add_sentence(3, "the cat sat", &e));
        for ngram in ["<s> the", "the cat", "cat sat", "sat </s>"] {
            assert_eq!(1, acc.count(3, ngram.as_bytes()));
        }
        assert_eq!(4, acc.len());
    }

    #[test]
    fn test_count_conservation() {
        let corpus = [
            (0, "le chat est noir"),
            (1, "the cat is black"),
            (0, "il pleut"),
            (1, "a"),
            (2, "猫は黒い"),
        ];
        for g in [Granularity::Byte, Granularity::CodePoint, Granularity::Word] {
            for n in 1..5 {
                let e = NgramExtractor::new(g, n).unwrap();
                let mut acc = ModelAccumulator::new();
                let mut expected = [0u64; 3];
                for &(class_id, sentence) in &corpus {
                    acc.add_sentence(class_id, sentence, &e);
                    let padded = e.pad(&g.tokenize(sentence));
                    expected[class_id as usize] += window_count(padded.len(), n) as u64;
                }
                for class_id in 0..3 {
                    assert_eq!(expected[class_id as usize], acc.class_total(class_id));
                }
            }
        }
    }

    #[test]
    fn test_merge_doubles() {
        let e = NgramExtractor::new(Granularity::CodePoint, 3).unwrap();
        let corpus = [(0, "abracadabra"), (1, "hocus pocus"), (0, "abba")];
        let mut once = ModelAccumulator::new();
        let mut twice = ModelAccumulator::new();
        let mut other = ModelAccumulator::new();
        for &(class_id, sentence) in &corpus {
            once.add_sentence(class_id, sentence, &e);
            twice.add_sentence(class_id, sentence, &e);
            other.add_sentence(class_id, sentence, &e);
        }
        twice.merge(other);

        assert_eq!(once.len(), twice.len());
        assert_eq!(once.n_windows() * 2, twice.n_windows());
        let once = once.drain().unwrap();
        let twice = twice.drain().unwrap();
        for (a, b) in once.iter().zip(&twice) {
            assert_eq!(a.class_id(), b.class_id());
            assert_eq!(a.ngram(), b.ngram());
            assert_eq!(a.count() * 2, b.count());
        }
    }

    #[test]
    fn test_merge_commutative() {
        let build = |items: &[(u32, &[u8])]| {
            let mut acc = ModelAccumulator::new();
            for &(class_id, ngram) in items {
                acc.add(class_id, ngram);
            }
            acc
        };
        let a: &[(u32, &[u8])] = &[(0, &b"x"[..]), (1, &b"y"[..]), (0, &b"x"[..])];
        let b: &[(u32, &[u8])] = &[(0, &b"x"[..]), (2, &b"z"[..])];

        let mut ab = build(a);
        ab.merge(build(b));
        let mut ba = build(b);
        ba.merge(build(a));

        assert_eq!(ab.drain().unwrap(), ba.drain().unwrap());
    }

    #[test]
    fn test_drain_sorted() {
        let mut acc = ModelAccumulator::new();
        acc.add(2, b"a");
        acc.add(0, b"b");
        acc.add(0, b"a");
        acc.add(1, b"\xFF");
        acc.add(1, b"\x01");

        let keys: Vec<_> = acc
            .drain()
            .unwrap()
            .into_iter()
            .map(|r| (r.class_id, r.ngram))
            .collect();
        assert_eq!(
            vec![
                (0, b"a".to_vec()),
                (0, b"b".to_vec()),
                (1, vec![0x01]),
                (1, vec![0xFF]),
                (2, b"a".to_vec()),
            ],
            keys
        );
    }

    #[test]
    fn test_zero_count_creates_no_record() {
        let mut acc = ModelAccumulator::new();
        acc.add_count(0, b"a".to_vec(), 0);
        acc.extend_records(vec![
            ModelRecord::new(1, b"b".to_vec(), 0),
            ModelRecord::new(1, b"c".to_vec(), 2),
        ]);

        assert_eq!(1, acc.len());
        assert_eq!(
            vec![ModelRecord::new(1, b"c".to_vec(), 2)],
            acc.drain().unwrap()
        );
    }

    #[test]
    fn test_drain_overflow() {
        let mut acc = ModelAccumulator::new();
        acc.add_count(0, b"a".to_vec(), u64::from(u32::MAX) + 1);

        assert!(matches!(acc.drain(), Err(LidgramError::CastError(_))));
    }
}
