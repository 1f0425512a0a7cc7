#![cfg_attr(docsrs, feature(doc_cfg))]

//! # lidgram
//!
//! lidgram builds frequency-count n-gram models for language identification. Each training
//! sentence is tokenized into bytes, code points, or words, padded with boundary sentinels, and
//! cut into overlapping n-grams whose per-language counts are written as a compact binary stream
//! for a downstream classifier.
//!
//! ## Examples
//!
//! ```no_run
//! use std::fs::File;
//! use std::io::{BufReader, BufWriter};
//!
//! use lidgram::{Granularity, LanguageMapping, NgramExtractor, Trainer};
//!
//! let mapping = LanguageMapping::from_reader(File::open("lang_mapping.json").unwrap()).unwrap();
//! let extractor = NgramExtractor::new(Granularity::CodePoint, 3).unwrap();
//!
//! let mut trainer = Trainer::new(extractor, &mapping);
//! trainer.read_corpus(BufReader::new(File::open("train.tsv").unwrap())).unwrap();
//! let (model, _) = trainer.finish().unwrap();
//!
//! let mut f = BufWriter::new(File::create("model.bin").unwrap());
//! model.write(&mut f).unwrap();
//! ```
//!
//! Parallel counting requires **crate feature** `multithreading`. For more details, see
//! `MultithreadTrainer`.

mod accumulator;
mod corpus;
mod granularity;
mod mapping;
mod model;
mod ngram;
mod text_model;
mod trainer;
mod utils;

pub mod errors;

pub use accumulator::ModelAccumulator;
pub use corpus::{classify_line, CorpusRow, SkipReason};
pub use errors::LidgramError;
pub use granularity::{
    Granularity, Token, BYTE_END, BYTE_START, CODE_POINT_END, CODE_POINT_START, WORD_END,
    WORD_START,
};
pub use mapping::LanguageMapping;
pub use model::{Model, ModelRecord};
pub use ngram::{window_count, NgramExtractor};
pub use text_model::parse_text_line;
pub use trainer::{TrainStats, Trainer};

#[cfg(feature = "multithreading")]
pub use trainer::MultithreadTrainer;
