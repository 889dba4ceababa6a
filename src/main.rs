use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::collections::BTreeSet;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use quizdoc::illustration::{DirectoryIllustrations, IllustrationGenerator, NoIllustrations};
use quizdoc::prompt::{DEFAULT_QUESTIONS, LEVELS, QUESTION_TYPES, QuizRequest};
use quizdoc::quiz::{Question, answer_key, parse, search_questions};
use quizdoc::render::{AnsiOptions, RenderedQuiz, export_to_ansi, render};
use quizdoc::source::read_source_text;
use quizdoc::{ColorDepth, Config, ExportFormat, logging};

#[derive(Parser, Debug)]
#[command(name = "quizdoc", version, about = "Turn generated quiz text into an HTML preview and a formatted .docx")]
struct Cli {
    /// Configuration file (defaults to <config dir>/quizdoc/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse generated quiz text and export it
    Render(RenderArgs),
    /// Compose the generation prompt from objectives and a lesson plan
    Prompt(PromptArgs),
    /// Find questions whose stem, options or notes contain a phrase
    Search(SearchArgs),
    /// Write the default configuration file
    InitConfig,
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// File with the generator's output, or `-` for stdin
    input: PathBuf,

    /// Where to write the .docx document
    #[arg(short, long, default_value = "De_Trac_Nghiem.docx")]
    output: PathBuf,

    /// Also write the HTML preview here
    #[arg(long)]
    html: Option<PathBuf>,

    /// Also write the parsed questions as JSON here
    #[arg(long)]
    json: Option<PathBuf>,

    /// What to print on stdout
    #[arg(long, value_enum, default_value = "ansi")]
    print: ExportFormat,

    /// Color depth for the terminal preview
    #[arg(long, value_enum, default_value = "auto")]
    color_depth: ColorDepth,

    /// Directory with pre-made illustrations named <question number>.png/.jpg
    #[arg(long)]
    illustrations: Option<PathBuf>,

    /// Do not emphasise the correct option
    #[arg(long)]
    no_highlight: bool,

    /// Skip illustrations entirely
    #[arg(long)]
    no_illustrations: bool,

    /// Insert a page break after every N questions
    #[arg(long, value_name = "N")]
    page_break_every: Option<usize>,

    /// Include explanation lines that follow the options
    #[arg(long)]
    notes: bool,

    /// Title printed above the first question
    #[arg(long)]
    title: Option<String>,
}

#[derive(Args, Debug)]
struct SearchArgs {
    /// File with the generator's output, or `-` for stdin
    input: PathBuf,

    /// Phrase to look for (case-insensitive)
    query: String,
}

#[derive(Args, Debug)]
struct PromptArgs {
    /// Learning objectives the questions must cover
    #[arg(long)]
    objectives: String,

    /// Lesson plan (.docx, .txt or .md)
    #[arg(long)]
    source: PathBuf,

    /// Cognitive level (repeatable)
    #[arg(long = "level", default_values_t = [LEVELS[0].to_string(), LEVELS[1].to_string()])]
    levels: Vec<String>,

    /// Question type (repeatable)
    #[arg(long = "type", default_values_t = [QUESTION_TYPES[0].to_string()])]
    types: Vec<String>,

    /// Number of questions (1-30)
    #[arg(long, default_value_t = DEFAULT_QUESTIONS)]
    count: u32,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Command::Render(args) => {
            let config = load_config(cli.config.as_deref())?;
            run_render(&args, config)
        }
        Command::Prompt(args) => run_prompt(&args),
        Command::Search(args) => run_search(&args),
        Command::InitConfig => {
            let path = Config::init_default()?;
            println!("Wrote default configuration to {}", path.display());
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    Ok(config)
}

fn run_render(args: &RenderArgs, mut config: Config) -> Result<()> {
    let raw_text = read_input(&args.input)?;
    let questions = parse(&raw_text);
    if questions.is_empty() {
        warn!("input contains no questions, exporting an empty document");
    }

    let options = &mut config.render;
    if args.no_highlight {
        options.highlight_correct_answer = false;
    }
    if args.no_illustrations {
        options.include_illustrations = false;
    }
    if args.page_break_every.is_some() {
        options.page_break_every_n = args.page_break_every;
    }
    if args.notes {
        options.include_notes = true;
    }
    if args.title.is_some() {
        options.title.clone_from(&args.title);
    }

    let illustrations: Box<dyn IllustrationGenerator> = match &args.illustrations {
        Some(dir) => Box::new(DirectoryIllustrations::new(dir)),
        None => Box::new(NoIllustrations),
    };

    let rendered = render(&questions, &config.render, &config.style, illustrations.as_ref())?;

    // The document is the primary output: failing to write it fails the command
    std::fs::write(&args.output, &rendered.document)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    info!(path = %args.output.display(), "document written");

    if let Some(path) = &args.html {
        write_optional_output(path, rendered.preview.as_bytes(), "HTML preview");
    }
    if let Some(path) = &args.json {
        match serde_json::to_string_pretty(&questions) {
            Ok(json) => write_optional_output(path, json.as_bytes(), "JSON export"),
            Err(e) => warn!(error = %e, "skipping JSON export"),
        }
    }

    print_stdout(args, &config, &questions, &rendered)
}

fn print_stdout(
    args: &RenderArgs,
    config: &Config,
    questions: &[Question],
    rendered: &RenderedQuiz,
) -> Result<()> {
    match args.print {
        ExportFormat::Ansi => {
            let options = AnsiOptions {
                color_depth: args.color_depth.clone(),
                ..AnsiOptions::default()
            };
            print!("{}", export_to_ansi(&rendered.layout, &config.style, &options)?);
        }
        ExportFormat::Html => print!("{}", rendered.preview),
        ExportFormat::Json => println!("{}", serde_json::to_string_pretty(questions)?),
        ExportFormat::Key => {
            for entry in answer_key(questions) {
                match (entry.label, entry.matches_option) {
                    (Some(label), true) => println!("{}. {label}", entry.ordinal),
                    (Some(label), false) => {
                        println!("{}. {label} (không khớp lựa chọn nào)", entry.ordinal);
                    }
                    (None, _) => println!("{}. ?", entry.ordinal),
                }
            }
        }
        ExportFormat::None => {}
    }
    Ok(())
}

/// Secondary outputs are best effort: a failure is logged and skipped
fn write_optional_output(path: &Path, contents: &[u8], what: &str) {
    match std::fs::write(path, contents) {
        Ok(()) => info!(path = %path.display(), "{what} written"),
        Err(e) => warn!(path = %path.display(), error = %e, "skipping {what}"),
    }
}

fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("failed to read stdin")?;
        return Ok(buffer);
    }
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn run_search(args: &SearchArgs) -> Result<()> {
    let questions = parse(&read_input(&args.input)?);
    let hits = search_questions(&questions, &args.query);
    if hits.is_empty() {
        warn!(query = %args.query, "no matches");
    }
    for hit in hits {
        println!("Câu {}: {}", hit.ordinal, hit.text);
    }
    Ok(())
}

fn run_prompt(args: &PromptArgs) -> Result<()> {
    let source_text = read_source_text(&args.source)?;
    let request = QuizRequest {
        objectives: args.objectives.clone(),
        source_text,
        level_tags: args.levels.iter().cloned().collect::<BTreeSet<_>>(),
        question_type_tags: args.types.iter().cloned().collect::<BTreeSet<_>>(),
        question_count: args.count,
    };
    print!("{}", request.compose_prompt()?);
    Ok(())
}
