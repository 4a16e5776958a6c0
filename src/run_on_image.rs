use anyhow::{bail, Context, Result};
use clap::Parser;
use csv::Writer;
use std::path::{Path, PathBuf};
use std::time::Instant;

mod dijkstra;
mod error;
mod graph;
mod keyed_queue;
mod min_queue;
mod raster;
mod sequence;
mod tree_queue;

use dijkstra::QueueKind;
use graph::{display_distance, Distance, Graph, UNREACHABLE};

#[derive(Parser, Debug)]
#[command(name = "distances")]
#[command(about = "Build the 4-connected pixel graph of an image and run Dijkstra from one source pixel (intensity-difference weights).", long_about = None)]
struct Cli {
    /// Path to the image file
    #[arg(short, long)]
    image: PathBuf,

    /// Source vertex id (y * width + x)
    #[arg(short, long, allow_hyphen_values = true, conflicts_with_all = ["x", "y"])]
    source: Option<i64>,

    /// Source column, used together with --y
    #[arg(short, long, requires = "y")]
    x: Option<usize>,

    /// Source row, used together with --x
    #[arg(short, long, requires = "x")]
    y: Option<usize>,

    #[arg(short, long, value_enum, default_value_t = QueueKind::Heap)]
    queue: QueueKind,

    /// Output CSV (vertex, x, y, distance). If omitted, prints a summary to stdout.
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Include unreachable vertices in output with infinite distance
    #[arg(long, default_value_t = false)]
    include_unreachable: bool,

    /// Number of timed runs of the query
    #[arg(short, long, default_value_t = 1)]
    runs: usize,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn resolve_source(cli: &Cli, graph: &Graph) -> Result<i64> {
    match (cli.source, cli.x, cli.y) {
        (Some(id), _, _) => Ok(id),
        (None, Some(x), Some(y)) => {
            let v = graph
                .vertex_at(x, y)
                .with_context(|| format!("pixel ({}, {}) outside {}x{} image", x, y, graph.width(), graph.height()))?;
            Ok(v as i64)
        }
        _ => bail!("give a source with --source or with --x and --y"),
    }
}

fn write_csv(path: &Path, graph: &Graph, dist: &[Distance], include_unreachable: bool) -> Result<usize> {
    let mut wtr = Writer::from_path(path).with_context(|| format!("creating CSV {}", path.display()))?;
    wtr.write_record(["vertex", "x", "y", "distance"])?;
    let mut dist_with_idx: Vec<(usize, Distance)> = dist.iter().copied().enumerate().collect();
    dist_with_idx.sort_by_key(|&(v, d)| (d, v));
    let mut written = 0;
    for (v, d) in dist_with_idx {
        if d != UNREACHABLE || include_unreachable {
            let (x, y) = graph.coords(v);
            wtr.write_record(&[v.to_string(), x.to_string(), y.to_string(), display_distance(d)])?;
            written += 1;
        }
    }
    wtr.flush()?;
    Ok(written)
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

    let image = raster::load(&cli.image).with_context(|| format!("loading {}", cli.image.display()))?;
    let graph = Graph::grid(image.width(), image.height())?;
    println!(
        "Graph: {} vertices, {} edges",
        graph.vertex_count(),
        graph.edge_count()
    );

    let source = resolve_source(&cli, &graph)?;

    let mut dist = None;
    let mut duration_millis = Vec::with_capacity(cli.runs);
    for _ in 0..cli.runs.max(1) {
        let now = Instant::now();
        dist = Some(cli.queue.run(&graph, source, image.pixels())?);
        duration_millis.push(now.elapsed().as_secs_f64() * 1000.0);
    }
    let dist = dist.unwrap_or_default();
    if cli.runs > 1 {
        println!("{:?}", duration_millis);
    } else {
        println!("{} s", duration_millis[0] / 1000.0);
    }

    if let Some(out_path) = &cli.out {
        let written = write_csv(out_path, &graph, &dist, cli.include_unreachable)?;
        println!(
            "Wrote distances for {} vertices to {}",
            written,
            out_path.display()
        );
    } else {
        let reachable = dist.iter().filter(|&&d| d != UNREACHABLE).count();
        println!("Vertices: {}", dist.len());
        println!("Reachable from {}: {}", source, reachable);
        if reachable > 0 {
            let maxd = dist.iter().copied().filter(|&d| d != UNREACHABLE).max().unwrap_or(0);
            println!("Max finite distance: {}", maxd);
        }
    }

    Ok(())
}
