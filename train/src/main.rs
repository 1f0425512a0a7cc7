use std::fs::{self, File};
use std::io::{prelude::*, BufReader, BufWriter};
use std::path::PathBuf;
use std::process;

use clap::error::ErrorKind;
use clap::Parser;
use env_logger::Env;
use lidgram::{Granularity, LanguageMapping, MultithreadTrainer, NgramExtractor, Trainer};
use log::info;

#[derive(Parser, Debug)]
#[command(about = "A program to build n-gram count models for language identification.")]
struct Args {
    /// A training corpus (TSV: `lang<TAB>sentence` or `id<TAB>lang<TAB>sentence`)
    corpus: PathBuf,

    /// The file to write the binary model to
    model: PathBuf,

    /// The n-gram order
    n: usize,

    /// A JSON file mapping language codes to class IDs
    mapping: PathBuf,

    /// The tokenization granularity. {byte, codepoint, word}
    #[arg(long, default_value = "byte")]
    granularity: Granularity,

    /// Also write the model in the human-readable text format (not available for bytes)
    #[arg(long)]
    text_model: Option<PathBuf>,

    /// The number of counting threads (0 means multithreading will be disabled)
    #[arg(long, default_value = "0")]
    threads: usize,

    /// The number of sentences sent to a counting thread at once
    #[arg(long, default_value = "1000")]
    chunk_size: usize,
}

fn parse_args() -> Args {
    match Args::try_parse() {
        Ok(args) => args,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => e.exit(),
            _ => {
                let _ = e.print();
                process::exit(1);
            }
        },
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = parse_args();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let extractor = NgramExtractor::new(args.granularity, args.n)?;
    if args.text_model.is_some() && args.granularity == Granularity::Byte {
        return Err(
            "--text-model cannot represent byte n-grams; use --granularity codepoint or word".into(),
        );
    }

    info!("Loading language mapping {:?} ...", args.mapping);
    let mapping = LanguageMapping::from_reader(BufReader::new(File::open(&args.mapping)?))?;
    info!("# of languages: {}", mapping.len());

    info!(
        "Counting {}-grams at {} granularity in {:?} ...",
        args.n, args.granularity, args.corpus
    );
    let f = BufReader::new(File::open(&args.corpus)?);
    let (model, stats) = if args.threads == 0 {
        let mut trainer = Trainer::new(extractor, &mapping);
        trainer.read_corpus(f)?;
        trainer.finish()?
    } else {
        let mut trainer =
            MultithreadTrainer::new(extractor, &mapping, args.threads, args.chunk_size)?;
        trainer.read_corpus(f)?;
        trainer.finish()?
    };
    info!(
        "# of lines: {}, # of sentences: {}, # of skipped lines: {}, # of n-grams: {}",
        stats.n_lines, stats.n_sentences, stats.n_skipped, stats.n_windows
    );
    if stats.n_sentences == 0 {
        return Err(format!("no usable training sentence in {:?}", args.corpus).into());
    }

    // Rendered up front so that an unrepresentable n-gram leaves no output behind.
    let text_model = match &args.text_model {
        Some(path) => {
            let mut buf = vec![];
            model.write_text(&mut buf)?;
            Some((path, buf))
        }
        None => None,
    };

    info!("Saving model file...");
    let mut f = BufWriter::new(File::create(&args.model)?);
    let size = model.write(&mut f)?;
    f.flush()?;
    info!(
        "Written binary model to {:?}. Total tuples: {}, {} bytes",
        args.model,
        model.len(),
        size
    );

    if let Some((path, buf)) = text_model {
        fs::write(path, buf)?;
        info!("Written text model to {:?}", path);
    }

    Ok(())
}
