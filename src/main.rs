use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

mod dijkstra;
mod error;
mod graph;
mod keyed_queue;
mod menu;
mod min_queue;
mod raster;
mod sequence;
mod tree_queue;

use dijkstra::QueueKind;
use menu::{Session, Settings};

#[derive(Parser, Debug)]
#[command(name = "ascii")]
#[command(about = "Load an image and run ASCII, brightness, edge and shortest-path tools on it from a text menu.", long_about = None)]
struct Cli {
    /// Image to load. If omitted, the filename is asked for on stdin.
    #[arg(short, long)]
    image: Option<PathBuf>,

    /// Directory the output text files are written to
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,

    /// Priority queue used for shortest-path distances
    #[arg(short, long, value_enum, default_value_t = QueueKind::Heap)]
    queue: QueueKind,

    /// Brightness shift (levels) used when the prompt is left blank
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    shift: i32,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_default_env()
        .filter_level(match cli.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        })
        .init();

    let stdin = io::stdin();
    let mut input = stdin.lock();

    let path = match cli.image {
        Some(path) => path,
        None => {
            print!("\nEnter the image filename (with extension): ");
            io::stdout().flush()?;
            let mut line = String::new();
            input.read_line(&mut line)?;
            PathBuf::from(line.trim())
        }
    };

    let image = match raster::load(&path) {
        Ok(image) => image,
        Err(err) => {
            println!("\nError loading image!");
            return Err(err).with_context(|| format!("loading {}", path.display()));
        }
    };
    println!("\nImage loaded successfully!");
    println!("\n{}", image.metadata_report());

    let settings = Settings {
        out_dir: cli.out_dir,
        queue: cli.queue,
        default_shift: cli.shift,
    };
    let mut session = Session::new(image, settings, input, io::stdout());
    session.run()
}
