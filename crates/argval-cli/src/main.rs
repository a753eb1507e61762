mod render;

use anyhow::{Context, Result, bail};
use argval::{HelpFormatter, TextWrapper};
use argval_schema::{Document, SpecDocument};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, fmt};

const DEFAULT_SPEC_NAME: &str = "argval.json";

#[derive(Parser)]
#[command(name = "argval")]
#[command(version, about = "Validate argument vectors against a JSON spec", long_about = None)]
#[command(disable_help_subcommand = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a sample spec document
    Init(InitArgs),

    /// Validate arguments against a spec and print the typed result
    Check(CheckArgs),

    /// Route arguments to one command of a multi-command spec
    Dispatch(DispatchArgs),

    /// Render help text for a spec
    Help(HelpArgs),
}

#[derive(Parser)]
struct InitArgs {
    /// Target directory (default: current directory)
    #[arg(value_name = "DIR")]
    dir: Option<PathBuf>,

    /// Replace an existing argval.json
    #[arg(long)]
    force: bool,
}

#[derive(Parser)]
struct CheckArgs {
    /// Spec document
    #[arg(short, long, env = "ARGVAL_SPEC", value_name = "FILE")]
    spec: PathBuf,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Collect unknown tokens instead of rejecting them
    #[arg(long)]
    lenient: bool,

    /// Arguments to validate, after `--`
    #[arg(last = true, value_name = "ARGS")]
    args: Vec<String>,
}

#[derive(Parser)]
struct DispatchArgs {
    /// Multi-command spec document
    #[arg(short, long, env = "ARGVAL_SPEC", value_name = "FILE")]
    spec: PathBuf,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Command name followed by its arguments, after `--`
    #[arg(last = true, value_name = "COMMAND ARGS")]
    args: Vec<String>,
}

#[derive(Parser)]
struct HelpArgs {
    /// Spec document
    #[arg(short, long, env = "ARGVAL_SPEC", value_name = "FILE")]
    spec: PathBuf,

    /// Wrap width
    #[arg(short, long, default_value_t = 80)]
    width: usize,

    /// Show one command of a multi-command spec
    #[arg(short, long, value_name = "NAME")]
    command: Option<String>,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Init(args) => init(args),
        Commands::Check(args) => check(args),
        Commands::Dispatch(args) => dispatch(args),
        Commands::Help(args) => help(args),
    }
}

fn init(args: InitArgs) -> Result<()> {
    let dir = args.dir.unwrap_or_else(|| PathBuf::from("."));
    fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create directory: {}", dir.display()))?;

    let dest = dir.join(DEFAULT_SPEC_NAME);
    if dest.exists() && !args.force {
        bail!("{DEFAULT_SPEC_NAME} already exists in {}", dir.display());
    }

    let mut out = serde_json::to_string_pretty(&SpecDocument::sample())
        .context("failed to serialize sample spec")?;
    out.push('\n');

    let tmp = dest.with_extension("tmp");
    fs::write(&tmp, out.as_bytes())
        .with_context(|| format!("failed to write {}", tmp.display()))?;
    fs::rename(&tmp, &dest)
        .with_context(|| format!("failed to move {} into place", dest.display()))?;

    eprintln!("Created: {}", dest.display());
    eprintln!("\nNext steps:");
    eprintln!("  1. Edit {DEFAULT_SPEC_NAME} to declare your flags, options and arguments");
    eprintln!("  2. Run: argval check --spec {} -- --e utf-8 a.txt", dest.display());
    Ok(())
}

fn check(args: CheckArgs) -> Result<()> {
    let doc = argval_schema::load_file(&args.spec)
        .with_context(|| format!("failed to load spec: {}", args.spec.display()))?;
    let mut validator = doc
        .build()
        .with_context(|| format!("invalid spec: {}", args.spec.display()))?;
    if args.lenient {
        validator.set_strict(false);
    }

    tracing::debug!(args = args.args.len(), "validating");
    let input = validator.parse(&args.args).context("arguments rejected")?;

    if args.json {
        print!("{}", render::json(&input)?);
    } else {
        print!("{}", render::text(&input));
    }
    Ok(())
}

fn dispatch(args: DispatchArgs) -> Result<()> {
    let doc = argval_schema::load_commands_file(&args.spec)
        .with_context(|| format!("failed to load spec: {}", args.spec.display()))?;
    let commands = doc
        .build()
        .with_context(|| format!("invalid spec: {}", args.spec.display()))?;

    let (name, input) = commands.parse(&args.args).context("arguments rejected")?;

    if args.json {
        let result = serde_json::json!({ "command": name, "input": input });
        print!("{}", render::json(&result)?);
    } else {
        println!("command: {name}");
        print!("{}", render::text(&input));
    }
    Ok(())
}

fn help(args: HelpArgs) -> Result<()> {
    let doc = argval_schema::load_document_file(&args.spec)
        .with_context(|| format!("failed to load spec: {}", args.spec.display()))?;
    let wrapper = TextWrapper::new(args.width);
    let fallback = program_name(&args.spec);

    let text = match (doc, args.command) {
        (Document::Single(spec), None) => {
            let validator = spec.build().context("invalid spec")?;
            formatter(&spec.name, &fallback, &spec.summary, wrapper).render(&validator)
        }
        (Document::Single(_), Some(_)) => {
            bail!("{} is not a multi-command spec", args.spec.display())
        }
        (Document::Commands(doc), None) => {
            let commands = doc.build().context("invalid spec")?;
            formatter(&doc.name, &fallback, &doc.summary, wrapper).render_commands(&commands)
        }
        (Document::Commands(doc), Some(raw)) => {
            let command = doc.command(&raw)?;
            let validator = command.spec.build().context("invalid spec")?;
            let program = if doc.name.is_empty() { &fallback } else { &doc.name };
            let name = format!("{program} {}", command.spec.name);
            formatter(&name, &fallback, &command.spec.summary, wrapper).render(&validator)
        }
    };
    print!("{text}");
    Ok(())
}

fn formatter(name: &str, fallback: &str, summary: &str, wrapper: TextWrapper) -> HelpFormatter {
    let name = if name.is_empty() { fallback } else { name };
    HelpFormatter::new(name)
        .with_summary(summary)
        .with_wrapper(wrapper)
}

fn program_name(spec: &Path) -> String {
    spec.file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("argval")
        .to_string()
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
