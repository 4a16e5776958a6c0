use std::fs::File;
use std::io::{self, BufRead, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use log::{debug, warn};

use crate::dijkstra::QueueKind;
use crate::graph::{display_distance, Graph, UNREACHABLE};
use crate::raster::{write_grid, Raster};

const RULE: &str = "==========================================";

pub const ASCII_FILE: &str = "ascii_art.txt";
pub const EDGE_FILE: &str = "edge_detection_output.txt";
pub const DISTANCE_FILE: &str = "shortest_path_distances.txt";

#[derive(Debug, Clone)]
pub struct Settings {
    pub out_dir: PathBuf,
    pub queue: QueueKind,
    pub default_shift: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Choice {
    Metadata,
    Ascii,
    Brightness,
    Edges,
    Distances,
    About,
    Exit,
}

impl Choice {
    fn parse(input: &str) -> Option<Self> {
        match input.trim().parse::<u32>().ok()? {
            1 => Some(Choice::Metadata),
            2 => Some(Choice::Ascii),
            3 => Some(Choice::Brightness),
            4 => Some(Choice::Edges),
            5 => Some(Choice::Distances),
            6 => Some(Choice::About),
            7 => Some(Choice::Exit),
            _ => None,
        }
    }
}

/// Text menu over one loaded image. Reads choices line by line from `input` until Exit or end of input.
pub struct Session<R, W> {
    image: Raster,
    settings: Settings,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(image: Raster, settings: Settings, input: R, output: W) -> Self {
        Self {
            image,
            settings,
            input,
            output,
        }
    }

    pub fn image(&self) -> &Raster {
        &self.image
    }

    pub fn run(&mut self) -> Result<()> {
        loop {
            self.show_menu()?;
            let Some(line) = self.read_line()? else {
                writeln!(self.output, "\nExiting program...")?;
                return Ok(());
            };

            let choice = match Choice::parse(&line) {
                Some(choice) => choice,
                None => {
                    writeln!(self.output, "\nInvalid choice. Please try again.")?;
                    continue;
                }
            };
            debug!("menu choice {:?}", choice);

            let outcome = match choice {
                Choice::Metadata => self.show_metadata(),
                Choice::Ascii => self.convert_to_ascii(),
                Choice::Brightness => self.adjust_brightness(),
                Choice::Edges => self.detect_edges(),
                Choice::Distances => self.shortest_paths(),
                Choice::About => self.show_about(),
                Choice::Exit => {
                    writeln!(self.output, "\nExiting program...")?;
                    return Ok(());
                }
            };
            if let Err(err) = outcome {
                warn!("{:?} failed: {:#}", choice, err);
                writeln!(self.output, "\nError: {:#}", err)?;
            }
            self.wait_for_user()?;
        }
    }

    fn show_menu(&mut self) -> io::Result<()> {
        writeln!(self.output, "\n{RULE}")?;
        writeln!(self.output, "              MAIN MENU                   ")?;
        writeln!(self.output, "{RULE}")?;
        writeln!(self.output, "1. Display Image Metadata")?;
        writeln!(self.output, "2. Convert Image to ASCII Art")?;
        writeln!(self.output, "3. Adjust Brightness")?;
        writeln!(self.output, "4. Detect Edges")?;
        writeln!(self.output, "5. Shortest-Path Distances")?;
        writeln!(self.output, "6. About the Project")?;
        writeln!(self.output, "7. Exit")?;
        writeln!(self.output, "{RULE}")?;
        write!(self.output, "Enter your choice: ")?;
        self.output.flush()
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn prompt(&mut self, text: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", text)?;
        self.output.flush()?;
        self.read_line()
    }

    fn wait_for_user(&mut self) -> io::Result<()> {
        writeln!(self.output, "\nPress Enter to continue...")?;
        self.output.flush()?;
        self.read_line().map(|_| ())
    }

    pub fn show_metadata(&mut self) -> Result<()> {
        writeln!(self.output, "\n{}", self.image.metadata_report())?;
        Ok(())
    }

    pub fn convert_to_ascii(&mut self) -> Result<()> {
        let path = self.settings.out_dir.join(ASCII_FILE);
        self.image
            .write_ascii(&path)
            .with_context(|| format!("writing {}", path.display()))?;
        writeln!(
            self.output,
            "\nASCII art successfully generated and saved as '{}'!",
            path.display()
        )?;
        Ok(())
    }

    pub fn adjust_brightness(&mut self) -> Result<()> {
        let default = self.settings.default_shift;
        let answer = self.prompt(&format!("\nEnter requested shift in levels (blank for {default}): "))?;
        let requested = match answer.as_deref().map(str::trim) {
            None | Some("") => default,
            Some(text) => text
                .parse::<i32>()
                .with_context(|| format!("'{}' is not a whole number of levels", text))?,
        };
        let applied = self.image.adjust_brightness(requested);
        writeln!(self.output, "\nBrightness adjusted by {} levels.", applied)?;
        Ok(())
    }

    pub fn detect_edges(&mut self) -> Result<()> {
        let path = self.settings.out_dir.join(EDGE_FILE);
        self.image
            .write_edge_map(&path)
            .with_context(|| format!("writing {}", path.display()))?;
        writeln!(
            self.output,
            "\nEdge detection completed. Output saved as '{}'.",
            path.display()
        )?;
        Ok(())
    }

    pub fn shortest_paths(&mut self) -> Result<()> {
        let graph = Graph::grid(self.image.width(), self.image.height())?;
        let last = graph.vertex_count() - 1;
        let answer = self.prompt(&format!("\nEnter the source pixel id (0-{last}): "))?;
        let text = answer.unwrap_or_default();
        let source: i64 = text
            .trim()
            .parse()
            .with_context(|| format!("'{}' is not a pixel id", text.trim()))?;

        let dist = self.settings.queue.run(&graph, source, self.image.pixels())?;

        let path = self.settings.out_dir.join(DISTANCE_FILE);
        let file = File::create(&path).with_context(|| format!("creating {}", path.display()))?;
        let mut out = BufWriter::new(file);
        write_grid(&mut out, graph.width(), dist.iter().map(|&d| display_distance(d)))?;
        out.flush()?;

        let reached: Vec<_> = dist.iter().copied().filter(|&d| d != UNREACHABLE).collect();
        writeln!(
            self.output,
            "\nReached {} of {} pixels from {}; max distance {}.",
            reached.len(),
            dist.len(),
            source,
            reached.iter().max().copied().unwrap_or(0)
        )?;
        writeln!(self.output, "Distances saved as '{}'.", path.display())?;
        Ok(())
    }

    pub fn show_about(&mut self) -> Result<()> {
        writeln!(self.output, "\n{RULE}")?;
        writeln!(self.output, "                ABOUT                     ")?;
        writeln!(self.output, "{RULE}")?;
        writeln!(self.output, "Project Name: Image To ASCII Conversion")?;
        writeln!(self.output, "Features    : ASCII Conversion, Brightness Adjustment,")?;
        writeln!(self.output, "              Edge Detection, and Dijkstra's Shortest Path.")?;
        writeln!(self.output, "{RULE}")?;
        Ok(())
    }
}
