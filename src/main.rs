use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::{debug, info, LevelFilter};
use std::path::PathBuf;
use sufx::input::{self, InputMode, Origin};
use sufx::output;
use sufx::tree::{GeneralizedSuffixTree, TerminatorPolicy};
use sufx::utils::{get_config_path, AppConfig};
use termcolor::StandardStream;

#[derive(Parser)]
#[command(name = "sufx", version)]
#[command(about = "Substring, suffix and prefix queries over text using a generalized suffix tree")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Info output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Debug output
    #[arg(long, global = true)]
    debug: bool,

    /// Trace output (includes per-string builder summaries)
    #[arg(long, global = true)]
    trace: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether a pattern occurs in any input string
    Contains {
        pattern: String,
        #[command(flatten)]
        input: InputArgs,
    },
    /// Check whether text is a suffix of any input string
    Suffix {
        text: String,
        #[command(flatten)]
        input: InputArgs,
    },
    /// List every suffix starting with a prefix
    Prefix {
        prefix: String,
        /// Stop after this many suffixes
        #[arg(short, long)]
        limit: Option<usize>,
        #[command(flatten)]
        input: InputArgs,
    },
    /// List every suffix of every input string
    All {
        /// Stop after this many suffixes
        #[arg(short, long)]
        limit: Option<usize>,
        #[command(flatten)]
        input: InputArgs,
    },
    /// Longest substring shared by all input strings
    Lcs {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Show tree statistics
    Stats {
        /// Print as JSON
        #[arg(long)]
        json: bool,
        #[command(flatten)]
        input: InputArgs,
    },
    /// Print the tree structure
    Dump {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Show the effective configuration
    Config {
        /// Write the effective configuration to the config file
        #[arg(long)]
        save: bool,
    },
}

#[derive(Args)]
struct InputArgs {
    /// Files or directories to read (standard input if none)
    inputs: Vec<PathBuf>,

    /// One string per file instead of one per line
    #[arg(long)]
    files: bool,

    /// Only read files matching this glob (repeatable)
    #[arg(short, long)]
    glob: Vec<String>,

    /// Fold case for input and queries
    #[arg(short, long)]
    ignore_case: bool,

    /// What to do with strings whose last character is not unique
    #[arg(long, value_name = "accept|warn|reject")]
    policy: Option<TerminatorPolicy>,

    /// Release suffix links once all input is added
    #[arg(long)]
    compact: bool,

    /// Hide the progress bar
    #[arg(long)]
    no_progress: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);

    let mut config = AppConfig::load()?;
    if cli.no_color {
        config.color = false;
    }
    let mut stdout = StandardStream::stdout(output::color_choice(config.color));

    match cli.command {
        Commands::Contains { pattern, input } => {
            let (tree, origins) = build_tree(&input, &config)?;
            println!("{}", tree.contains(&pattern));
            let sources = tree.sources_containing(&pattern);
            output::print_sources(&mut stdout, &sources, &origins)?;
        }
        Commands::Suffix { text, input } => {
            let (tree, _) = build_tree(&input, &config)?;
            println!("{}", tree.contains_suffix(&text));
        }
        Commands::Prefix {
            prefix,
            limit,
            input,
        } => {
            let (tree, origins) = build_tree(&input, &config)?;
            let highlight = tree.fold(&prefix).len();
            let printed = output::print_suffixes(
                &mut stdout,
                tree.starting_with(&prefix),
                &origins,
                highlight,
                limit,
            )?;
            info!("{} suffixes start with {:?}", printed, prefix);
        }
        Commands::All { limit, input } => {
            let (tree, origins) = build_tree(&input, &config)?;
            output::print_suffixes(&mut stdout, tree.all(), &origins, 0, limit)?;
        }
        Commands::Lcs { input } => {
            let (tree, _) = build_tree(&input, &config)?;
            match tree.longest_common_substring() {
                Some(common) => println!("{}", common),
                None => info!("no common substring"),
            }
        }
        Commands::Stats { json, input } => {
            let (tree, _) = build_tree(&input, &config)?;
            let stats = tree.stats();
            if json {
                println!("{}", output::stats_json(&stats)?);
            } else {
                output::print_stats(&mut stdout, &stats)?;
            }
        }
        Commands::Dump { input } => {
            let (tree, _) = build_tree(&input, &config)?;
            print!("{}", tree.print());
        }
        Commands::Config { save } => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            if save {
                let path = config.save()?;
                println!("Saved to: {}", path.display());
            } else {
                println!("Config file: {}", get_config_path()?.display());
            }
        }
    }

    Ok(())
}

fn init_logging(cli: &Cli) {
    let level = if cli.trace {
        LevelFilter::Trace
    } else if cli.debug {
        LevelFilter::Debug
    } else if cli.verbose {
        LevelFilter::Info
    } else {
        LevelFilter::Warn
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

/// Read the input and build a tree, returning the origin of each source index
fn build_tree(args: &InputArgs, config: &AppConfig) -> Result<(GeneralizedSuffixTree, Vec<Origin>)> {
    let mode = if args.files {
        InputMode::Files
    } else {
        InputMode::Lines
    };

    let strings = if args.inputs.is_empty() {
        input::read_stdin(mode)?
    } else {
        let paths = input::collect_paths(&args.inputs, &args.glob)?;
        input::read_strings(&paths, mode).context("Failed to read input")?
    };

    let mut tree_config = config.tree.clone();
    if args.ignore_case {
        tree_config.case_insensitive = true;
    }
    if let Some(policy) = args.policy {
        tree_config.terminator_policy = policy;
    }
    if tree_config.initial_capacity == 0 {
        tree_config.initial_capacity = strings.iter().map(|s| s.text.chars().count()).sum();
    }

    let mut tree = GeneralizedSuffixTree::with_config(tree_config);
    let origins = input::add_all(&mut tree, strings, config.progress && !args.no_progress);
    if args.compact {
        tree.compact();
    }

    debug!(
        "built tree over {} strings ({} chars, {} nodes)",
        tree.len(),
        tree.text_len(),
        tree.node_count()
    );
    Ok((tree, origins))
}
