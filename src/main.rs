use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use hoptree::{EventLog, HopTree, HopTreeConfig, RecordingRenderer};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "hoptree", about = "Replay navigation paths through a bounded history tree")]
struct Cli {
    #[command(flatten)]
    tree: TreeArgs,

    /// Log every planner and sequencer decision.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct TreeArgs {
    /// Name every path must start with.
    #[arg(long, default_value = "Root", global = true)]
    root: String,
    /// Number of branch tips remembered at once.
    #[arg(long, default_value_t = 3, global = true)]
    max_leaves: usize,
    /// Keep a single branch; each path replaces the previous one.
    #[arg(long, global = true)]
    breadcrumb: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Apply paths given on the command line, printing the tree after each.
    Replay {
        /// Paths such as `Root/docs/api`.
        #[arg(required = true)]
        paths: Vec<String>,
    },
    /// Apply paths read from a file (one per line, `#` starts a comment).
    Script {
        /// Script file.
        file: PathBuf,
        /// Only print the final tree.
        #[arg(long)]
        quiet: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let config = HopTreeConfig::new(cli.tree.root.as_str())
        .with_max_leaves(cli.tree.max_leaves)
        .with_breadcrumb(cli.tree.breadcrumb);

    match cli.command {
        Commands::Replay { paths } => run_paths(config, paths, false)?,
        Commands::Script { file, quiet } => {
            let paths = read_script(&file)
                .with_context(|| format!("failed to read script {}", file.display()))?;
            run_paths(config, paths, quiet)?
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) -> Result<()> {
    let default = if verbose { "hoptree=debug" } else { "hoptree=info" };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default))
        .context("invalid log filter")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn run_paths(config: HopTreeConfig, paths: Vec<String>, quiet: bool) -> Result<()> {
    let log = EventLog::new();
    let mut tree = HopTree::init(config, RecordingRenderer::immediate())
        .context("failed to initialise history tree")?
        .with_listener(log.clone());

    for (idx, path) in paths.iter().enumerate() {
        tree.set_path(path.as_str())
            .with_context(|| format!("step {}: cannot set path {:?}", idx + 1, path))?;

        if !quiet {
            println!("== {} ({})", path, describe_ledger(&tree));
            print!("{}", tree.renderer().render_text());
        }
    }

    if quiet {
        println!("== {} ({})", tree.current_path_string(), describe_ledger(&tree));
        print!("{}", tree.renderer().render_text());
    }
    println!("path changes announced: {}", log.paths().len());

    Ok(())
}

fn describe_ledger(tree: &HopTree<RecordingRenderer>) -> String {
    let names: Vec<String> = tree
        .ledger()
        .iter()
        .filter_map(|id| tree.registry().resolve(id).map(str::to_string))
        .collect();
    format!("leaves: [{}]", names.join(", "))
}

fn read_script(path: &PathBuf) -> Result<Vec<String>> {
    let reader = BufReader::new(File::open(path)?);
    let mut paths = Vec::new();

    for line in reader.lines() {
        let line = line?;
        let content = line.split('#').next().unwrap_or("").trim();
        if content.is_empty() {
            continue;
        }
        paths.push(content.to_string());
    }

    Ok(paths)
}
