use std::fs::{self, File};
use std::io::{prelude::*, BufReader, BufWriter};
use std::path::PathBuf;
use std::process;

use clap::error::ErrorKind;
use clap::Parser;
use env_logger::Env;
use lidgram::Model;
use log::info;

#[derive(Parser, Debug)]
#[command(
    name = "convert_model",
    about = "A program to convert, merge, and dump n-gram count models."
)]
struct Args {
    /// Input path of the model file. Several inputs are merged by summing their counts
    #[arg(long, required = true)]
    model_in: Vec<PathBuf>,

    /// Read the inputs in the human-readable text format instead of the binary format
    #[arg(long)]
    text_in: bool,

    /// Output path of the binary model file
    #[arg(long)]
    model_out: Option<PathBuf>,

    /// Output path of the model in the human-readable text format
    #[arg(long)]
    dump_text: Option<PathBuf>,
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

    let mut models = vec![];
    for path in &args.model_in {
        info!("Loading model file {path:?} ...");
        let f = BufReader::new(File::open(path)?);
        let model = if args.text_in {
            Model::read_text(f)?
        } else {
            Model::read(f)?
        };
        info!("# of records: {}", model.len());
        models.push(model);
    }
    let model = Model::merge(models)?;
    info!("# of merged records: {}", model.len());

    let text_model = match args.dump_text {
        Some(path) => {
            let mut buf = vec![];
            model.write_text(&mut buf)?;
            Some((path, buf))
        }
        None => None,
    };

    if let Some(path) = args.model_out {
        info!("Saving model file...");
        let mut f = BufWriter::new(File::create(path)?);
        model.write(&mut f)?;
        f.flush()?;
    }

    if let Some((path, buf)) = text_model {
        info!("Saving text model file...");
        fs::write(path, buf)?;
    }

    Ok(())
}
