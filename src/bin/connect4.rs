use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use log::info;

use connectq::error::Result as CoreResult;
use connectq::persist::{self, BinaryFormat, BinaryWriter};
use connectq::persist_stream::{
    open_input, open_output, EdgeReader, EdgeWriter, NodeReader, NodeWriter, RecordSink, TextFormat,
};
use connectq::solver::{self, passes};
use connectq::{Game, Rules};

#[derive(Debug, Args)]
struct Geometry {
    /// Board width (number of columns)
    #[arg(long, default_value_t = 7, global = true)]
    width: u8,

    /// Board height (number of rows)
    #[arg(long, default_value_t = 6, global = true)]
    height: u8,

    /// Run length needed to win
    #[arg(long, default_value_t = 4, global = true)]
    connect: u8,
}

#[derive(Debug, Parser)]
#[command(
    name = "connect4",
    about = "Retrograde solver passes for gravity connect-Q games",
    after_help = "Stream arguments accept STDIN / STDOUT. Sort text streams with LC_ALL=C between passes."
)]
struct Cli {
    #[command(flatten)]
    geometry: Geometry,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Write generation 0 (the empty board)
    MakeInitialNode { output: String },
    /// Pass A: successors of every indeterminate node (needs sort -u afterwards)
    MakeNodes { input: String, output: String },
    /// Pass B: destination-first edges out of every indeterminate node
    MakeEdges { input: String, output: String },
    /// Pass C: join sorted edges with the next generation's sorted scores
    MakeEdgesWithScore {
        edges: String,
        nodes: String,
        output: String,
    },
    /// Pass D: resolve sorted nodes from their sorted child scores
    MakeNodesWithScore {
        nodes: String,
        child_scores: String,
        output: String,
    },
    /// Pack a resolved, sorted text node stream into a binary table
    MakeBinaryFile { input: String, output: String },
    /// Rewrite a binary table with legacy score bytes into the current encoding
    UpgradeBinaryFile { input: String, output: String },
    /// Print the geometry-derived constants as JSON
    PrintConstants,
    /// Solve the whole game in memory (small boards only)
    Solve {
        /// Also write every resolved node to this binary table
        #[arg(long)]
        binary_out: Option<PathBuf>,
    },
}

/// Sink wrapper that ticks a spinner as records go by.
struct Ticking<S> {
    inner: S,
    pb: ProgressBar,
    count: u64,
}

impl<S> Ticking<S> {
    fn new(inner: S, label: &str) -> Self {
        let pb = ProgressBar::new_spinner();
        let template = format!("[{{elapsed_precise}}] {label} {{spinner}} {{pos}} records");
        pb.set_style(ProgressStyle::with_template(&template).unwrap_or_else(|_| ProgressStyle::default_spinner()));
        pb.enable_steady_tick(Duration::from_millis(120));
        Self { inner, pb, count: 0 }
    }
}

impl<T, S: RecordSink<T>> RecordSink<T> for Ticking<S> {
    fn push(&mut self, record: T) -> CoreResult<()> {
        self.inner.push(record)?;
        self.count += 1;
        if self.count % 4096 == 0 {
            self.pb.set_position(self.count);
        }
        Ok(())
    }

    fn finish(&mut self) -> CoreResult<()> {
        self.pb.set_position(self.count);
        self.pb.finish_and_clear();
        self.inner.finish()
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let rules = Rules::new(cli.geometry.width, cli.geometry.height, cli.geometry.connect)?;
    let game = Game::new(rules)?;
    let text = TextFormat::from_constants(game.constants());

    match cli.command {
        Command::MakeInitialNode { output } => {
            let sink = NodeWriter::new(open_output(&output)?, text);
            passes::make_initial_node(&game, sink)?;
        }
        Command::MakeNodes { input, output } => {
            let nodes = NodeReader::new(open_input(&input)?, text);
            let sink = Ticking::new(NodeWriter::new(open_output(&output)?, text), "make-nodes");
            passes::expand(&game, nodes, sink)?;
        }
        Command::MakeEdges { input, output } => {
            let nodes = NodeReader::new(open_input(&input)?, text);
            let sink = Ticking::new(EdgeWriter::new(open_output(&output)?, text), "make-edges");
            passes::link(&game, nodes, sink)?;
        }
        Command::MakeEdgesWithScore { edges, nodes, output } => {
            let edges = EdgeReader::new(open_input(&edges)?, text);
            let nodes = NodeReader::new(open_input(&nodes)?, text);
            let sink = Ticking::new(NodeWriter::new(open_output(&output)?, text), "make-edges-with-score");
            passes::backward_fold(edges, nodes, sink)?;
        }
        Command::MakeNodesWithScore {
            nodes,
            child_scores,
            output,
        } => {
            let nodes = NodeReader::new(open_input(&nodes)?, text);
            let children = NodeReader::new(open_input(&child_scores)?, text);
            let sink = Ticking::new(NodeWriter::new(open_output(&output)?, text), "make-nodes-with-score");
            passes::resolve(&game, nodes, children, sink)?;
        }
        Command::MakeBinaryFile { input, output } => {
            let nodes = NodeReader::new(open_input(&input)?, text);
            let stats = persist::export(&game, nodes, open_output(&output)?)?;
            info!("[binary] records={} sha256={}", stats.records, stats.sha256_hex);
        }
        Command::UpgradeBinaryFile { input, output } => {
            let stats = persist::upgrade(&game, open_input(&input)?, open_output(&output)?)?;
            info!("[upgrade] records={} sha256={}", stats.records, stats.sha256_hex);
        }
        Command::PrintConstants => {
            println!("{}", serde_json::to_string_pretty(game.constants())?);
        }
        Command::Solve { binary_out } => {
            let solution = solver::solve_in_memory(&game, true)?;
            for (n, size) in solution.generation_sizes.iter().enumerate() {
                info!("[solve] generation {}: {} nodes", n, size);
            }
            println!("{}", solution.root.score);

            if let Some(path) = binary_out {
                let file = File::create(&path)?;
                let mut writer = BinaryWriter::new(
                    BufWriter::new(file),
                    BinaryFormat::from_constants(game.constants()),
                );
                for record in &solution.nodes {
                    writer.push(record)?;
                }
                let stats = writer.finish()?;
                info!(
                    "[solve] wrote {} records to {} sha256={}",
                    stats.records,
                    path.display(),
                    stats.sha256_hex
                );
            }
        }
    }

    Ok(())
}
