use std::io::BufRead;

#[cfg(feature = "multithreading")]
use std::mem;
#[cfg(feature = "multithreading")]
use std::panic;
#[cfg(feature = "multithreading")]
use std::thread::{self, JoinHandle};

#[cfg(feature = "multithreading")]
use crossbeam_channel::Sender;
use log::{info, warn};

use crate::accumulator::ModelAccumulator;
use crate::corpus::{classify_line, SkipReason};
use crate::errors::Result;
use crate::mapping::LanguageMapping;
use crate::model::Model;
use crate::ngram::NgramExtractor;

#[cfg(feature = "multithreading")]
use crate::errors::LidgramError;

const PROGRESS_INTERVAL: usize = 100_000;

/// Counters collected while reading a corpus.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrainStats {
    /// Number of lines read.
    pub n_lines: usize,

    /// Number of sentences that contributed to the model.
    pub n_sentences: usize,

    /// Number of lines skipped.
    pub n_skipped: usize,

    /// Number of n-gram windows counted.
    pub n_windows: u64,
}

impl TrainStats {
    fn skip(&mut self, reason: &SkipReason) {
        self.n_skipped += 1;
        warn!("line {}: {}; skipping", self.n_lines, reason);
    }
}

/// Trainer.
///
/// # Examples
///
/// ```
/// use lidgram::{Granularity, LanguageMapping, NgramExtractor, Trainer};
///
/// let mapping = LanguageMapping::from_json(r#"{"en": 0, "fr": 1}"#).unwrap();
/// let extractor = NgramExtractor::new(Granularity::Word, 2).unwrap();
/// let mut trainer = Trainer::new(extractor, &mapping);
///
/// let corpus = "en\tthe cat sat\nfr\tle chat\nde\tdie Katze\n";
/// trainer.read_corpus(corpus.as_bytes()).unwrap();
///
/// let (model, stats) = trainer.finish().unwrap();
/// assert_eq!(2, stats.n_sentences);
/// assert_eq!(1, stats.n_skipped);
/// assert_eq!(7, model.len());
///
/// let mut buf = vec![];
/// model.write(&mut buf).unwrap();
/// ```
pub struct Trainer<'a> {
    extractor: NgramExtractor,
    mapping: &'a LanguageMapping,
    accumulator: ModelAccumulator,
    stats: TrainStats,
}

impl<'a> Trainer<'a> {
    /// Creates a new trainer.
    ///
    /// # Arguments
    ///
    /// * `extractor` - Granularity and order of n-grams.
    /// * `mapping` - Language code to class ID mapping.
    pub fn new(extractor: NgramExtractor, mapping: &'a LanguageMapping) -> Self {
        Self {
            extractor,
            mapping,
            accumulator: ModelAccumulator::new(),
            stats: TrainStats::default(),
        }
    }

    /// Counts the n-grams of one sentence whose class is already known.
    ///
    /// Unlike [`Self::push_line()`], this does not touch [`TrainStats::n_lines`] and does not
    /// log a rejected sentence.
    ///
    /// # Returns
    ///
    /// The number of n-gram windows counted, or [`SkipReason::TooShort`] if the sentence has no
    /// n-gram at all.
    pub fn push_sentence(&mut self, class_id: u32, sentence: &str) -> Result<usize, SkipReason> {
        let n_windows = self
            .accumulator
            .add_sentence(class_id, sentence, &self.extractor);
        if n_windows == 0 {
            return Err(SkipReason::TooShort);
        }
        self.stats.n_sentences += 1;
        self.stats.n_windows += n_windows as u64;
        Ok(n_windows)
    }

    /// Adds one line of the training TSV.
    ///
    /// # Returns
    ///
    /// The number of n-gram windows counted, or the reason the line was skipped. Skipped lines
    /// are logged and counted in [`TrainStats::n_skipped`].
    pub fn push_line(&mut self, line: &str) -> Result<usize, SkipReason> {
        self.stats.n_lines += 1;
        let result = classify_line(self.mapping, line)
            .and_then(|(class_id, sentence)| self.push_sentence(class_id, &sentence));
        if let Err(reason) = &result {
            self.stats.skip(reason);
        }
        result
    }

    /// Adds every line of a training TSV.
    ///
    /// # Errors
    ///
    /// I/O errors and invalid UTF-8 are returned as is; malformed lines are skipped.
    pub fn read_corpus<R>(&mut self, rdr: R) -> Result<()>
    where
        R: BufRead,
    {
        for line in rdr.lines() {
            let _ = self.push_line(&line?);
            if self.stats.n_lines % PROGRESS_INTERVAL == 0 {
                info!(
                    "# of sentences: {}, # of records: {}",
                    self.stats.n_sentences,
                    self.accumulator.len()
                );
            }
        }
        Ok(())
    }

    pub const fn stats(&self) -> &TrainStats {
        &self.stats
    }

    /// Gets the number of distinct `(class_id, ngram)` keys counted so far.
    pub fn n_records(&self) -> usize {
        self.accumulator.len()
    }

    /// Freezes the counts into a model.
    ///
    /// # Errors
    ///
    /// [`crate::LidgramError::CastError`] will be returned if a count exceeds `u32::MAX`.
    pub fn finish(self) -> Result<(Model, TrainStats)> {
        Ok((self.accumulator.into_model()?, self.stats))
    }
}

/// Trainer for multithreading.
///
/// Lines are parsed on the calling thread. Sentences are sent in chunks to workers, each owning
/// its own [`ModelAccumulator`]; [`MultithreadTrainer::finish()`] sums them on the calling thread,
/// so the resulting model is identical to the one built by [`Trainer`].
#[cfg(feature = "multithreading")]
#[cfg_attr(docsrs, doc(cfg(feature = "multithreading")))]
pub struct MultithreadTrainer<'a> {
    mapping: &'a LanguageMapping,
    task_tx: Sender<Vec<(u32, String)>>,
    workers: Vec<JoinHandle<ModelAccumulator>>,
    chunk: Vec<(u32, String)>,
    chunk_size: usize,
    stats: TrainStats,
}

#[cfg(feature = "multithreading")]
impl<'a> MultithreadTrainer<'a> {
    /// Creates a multithreading trainer.
    ///
    /// # Arguments
    ///
    /// * `extractor` - Granularity and order of n-grams.
    /// * `mapping` - Language code to class ID mapping.
    /// * `n_threads` - The number of worker threads.
    /// * `chunk_size` - The number of sentences sent to a worker at once.
    ///
    /// # Errors
    ///
    /// [`LidgramError::InvalidConfig`] will be returned if `n_threads` is zero.
    pub fn new(
        extractor: NgramExtractor,
        mapping: &'a LanguageMapping,
        n_threads: usize,
        chunk_size: usize,
    ) -> Result<Self> {
        if n_threads == 0 {
            return Err(LidgramError::invalid_config(
                "n_threads",
                "must be at least 1",
            ));
        }
        let chunk_size = chunk_size.max(1);
        let (task_tx, task_rx) = crossbeam_channel::bounded::<Vec<(u32, String)>>(n_threads * 2);
        let workers = (0..n_threads)
            .map(|_| {
                let task_rx = task_rx.clone();
                thread::spawn(move || {
                    let mut acc = ModelAccumulator::new();
                    for chunk in task_rx {
                        for (class_id, sentence) in chunk {
                            acc.add_sentence(class_id, &sentence, &extractor);
                        }
                    }
                    acc
                })
            })
            .collect();
        Ok(Self {
            mapping,
            task_tx,
            workers,
            chunk: Vec::with_capacity(chunk_size),
            chunk_size,
            stats: TrainStats::default(),
        })
    }

    fn flush(&mut self) {
        if self.chunk.is_empty() {
            return;
        }
        let chunk = mem::replace(&mut self.chunk, Vec::with_capacity(self.chunk_size));
        // Fails only if every worker has panicked; finish() re-raises the panic.
        let _ = self.task_tx.send(chunk);
    }

    /// Adds one line of the training TSV.
    ///
    /// # Returns
    ///
    /// The reason the line was skipped, if any.
    pub fn push_line(&mut self, line: &str) -> Result<(), SkipReason> {
        self.stats.n_lines += 1;
        match classify_line(self.mapping, line) {
            Ok((class_id, sentence)) => {
                self.stats.n_sentences += 1;
                self.chunk.push((class_id, sentence.into_owned()));
                if self.chunk.len() >= self.chunk_size {
                    self.flush();
                }
                Ok(())
            }
            Err(reason) => {
                self.stats.skip(&reason);
                Err(reason)
            }
        }
    }

    /// Adds every line of a training TSV.
    ///
    /// # Errors
    ///
    /// I/O errors and invalid UTF-8 are returned as is; malformed lines are skipped.
    pub fn read_corpus<R>(&mut self, rdr: R) -> Result<()>
    where
        R: BufRead,
    {
        for line in rdr.lines() {
            let _ = self.push_line(&line?);
            if self.stats.n_lines % PROGRESS_INTERVAL == 0 {
                info!("# of sentences: {}", self.stats.n_sentences);
            }
        }
        Ok(())
    }

    /// Gets the counters. [`TrainStats::n_windows`] is only known after [`Self::finish()`].
    pub const fn stats(&self) -> &TrainStats {
        &self.stats
    }

    /// Waits for the workers and merges their counts into a model.
    pub fn finish(mut self) -> Result<(Model, TrainStats)> {
        self.flush();
        let Self {
            task_tx,
            workers,
            mut stats,
            ..
        } = self;
        drop(task_tx);
        let mut acc = ModelAccumulator::new();
        for worker in workers {
            let shard = worker.join().unwrap_or_else(|e| panic::resume_unwind(e));
            acc.merge(shard);
        }
        stats.n_windows = acc.n_windows();
        Ok((acc.into_model()?, stats))
    }
}
