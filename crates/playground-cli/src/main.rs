//! Command-line front end for the code playground.
//!
//! # Usage
//!
//! ```bash
//! playground list
//! playground show hello_world
//! playground inspect src/main.adb
//! playground check hello_world --file main.adb
//! playground run hello_world --main main.adb -- arg1 arg2
//! ```
//!
//! The service URL and poll interval come from `playground/config.toml` under the platform
//! config directory (see `--config` / `--server`). Set `RUST_LOG=debug` to trace requests and
//! guard decisions.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use crossterm::style::Stylize;
use playground_core::{
    Decoration, DecorationKind, Document, FoldRegion, GuardedBuffer, OutputLine, Position,
    RegionExtractor, Resource, ResourceEditor, RunSummary, TextBuffer, TextRange,
};
use playground_lang::{CommentConfig, MarkerSyntax};
use playground_remote::{
    ClientConfig, Clock, HttpTransport, PollEvent, RunParameters, Session, SystemClock,
    Transport,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(
    name = "playground",
    version,
    about = "Show, check and run code playground examples"
)]
struct Cli {
    /// Config file (defaults to the platform config directory).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Compile service URL, overriding the config file.
    #[arg(long, global = true)]
    server: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the examples the service offers.
    List,
    /// Print an example with its read-only lines highlighted.
    Show {
        /// Example name.
        example: String,
    },
    /// Extract markers from a local file and print the result.
    Inspect {
        /// Source file carrying markers.
        path: PathBuf,
    },
    /// Check an example and stream diagnostics.
    Check(JobArgs),
    /// Build and run an example and stream its output.
    Run(RunArgs),
}

#[derive(Args, Debug)]
struct JobArgs {
    /// Example name.
    example: String,
    /// Local file replacing the resource with the same basename.
    #[arg(long = "file", value_name = "PATH")]
    files: Vec<PathBuf>,
}

#[derive(Args, Debug)]
struct RunArgs {
    #[command(flatten)]
    job: JobArgs,
    /// Main program basename (defaults to the example's).
    #[arg(long)]
    main: Option<String>,
    /// Extra arguments passed to the program.
    #[arg(last = true)]
    args: Vec<String>,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{} {err:#}", "error:".red().bold());
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let mut config = match &cli.config {
        Some(path) => ClientConfig::load_from(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => ClientConfig::load().context("loading config")?,
    };
    if let Some(server) = cli.server {
        config.server_url = server;
    }

    match cli.command {
        Commands::Inspect { path } => inspect(&path),
        Commands::List => {
            let mut transport = HttpTransport::new(&config)?;
            list(&mut transport)
        }
        Commands::Show { example } => {
            let mut transport = HttpTransport::new(&config)?;
            let session = load(&config, &mut transport, &example, &[])?;
            for editor in session.workspace().editors() {
                print_editor(editor);
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Check(job) => {
            let mut transport = HttpTransport::new(&config)?;
            let mut session = load(&config, &mut transport, &job.example, &job.files)?;
            stream(&mut session, &mut transport, RunParameters::check())
        }
        Commands::Run(run) => {
            let mut transport = HttpTransport::new(&config)?;
            let mut session = load(&config, &mut transport, &run.job.example, &run.job.files)?;
            let params = RunParameters::run(run.main).with_args(run.args);
            stream(&mut session, &mut transport, params)
        }
    }
}

fn list(transport: &mut HttpTransport) -> Result<ExitCode> {
    let examples = transport.list_examples().context("listing examples")?;
    for example in examples {
        println!("{} {}", format!("{:<32}", example.name).bold(), example.description);
    }
    Ok(ExitCode::SUCCESS)
}

fn load(
    config: &ClientConfig,
    transport: &mut HttpTransport,
    example: &str,
    overrides: &[PathBuf],
) -> Result<Session> {
    let mut session = Session::new(config);
    session
        .load_example(transport, example)
        .with_context(|| format!("loading example `{example}`"))?;

    if overrides.is_empty() {
        return Ok(session);
    }

    let replacements = overrides
        .iter()
        .map(|path| read_resource(path))
        .collect::<Result<Vec<_>>>()?;
    session
        .workspace_mut()
        .override_resources(replacements)
        .with_context(|| format!("overriding resources of example `{example}`"))?;
    Ok(session)
}

fn read_resource(path: &Path) -> Result<Resource> {
    let basename = path
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("{} has no file name", path.display()))?;
    let contents =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(Resource::new(basename, contents))
}

fn stream(
    session: &mut Session,
    transport: &mut HttpTransport,
    params: RunParameters,
) -> Result<ExitCode> {
    session.start(transport, params).context("starting job")?;

    let mut clock = SystemClock;
    loop {
        if let Some(due) = session.poller().and_then(|p| p.next_due()) {
            clock.sleep_until(due);
        }
        for event in session.poll(transport, clock.now()) {
            print_event(&event);
        }
        if session.poller().is_none_or(|p| p.is_finished()) {
            break;
        }
    }

    for editor in session.workspace().editors() {
        if !editor.diagnostics().is_empty() {
            print_editor(editor);
        }
    }

    let report = session.report();
    if report.error.is_some() {
        return Ok(ExitCode::from(2));
    }
    Ok(match report.summary {
        Some(RunSummary::Success) => ExitCode::SUCCESS,
        Some(RunSummary::ExitStatus(status)) => {
            ExitCode::from(u8::try_from(status).ok().filter(|s| *s != 0).unwrap_or(1))
        }
        _ => ExitCode::from(1),
    })
}

fn print_event(event: &PollEvent) {
    match event {
        PollEvent::Line(OutputLine::Diagnostic(d)) => {
            let location = format!("{}:{}:{}:", d.basename, d.line, d.column + 1);
            println!("{} {}", location.red(), d.message);
        }
        PollEvent::Line(OutputLine::Text(text)) => println!("{text}"),
        PollEvent::Finished(summary) if summary.is_success() => {
            println!("{}", summary.to_string().green().bold());
        }
        PollEvent::Finished(summary) => println!("{}", summary.to_string().red().bold()),
        PollEvent::Failed(err) => eprintln!("{} {err}", "poll failed:".red()),
    }
}

fn inspect(path: &Path) -> Result<ExitCode> {
    let resource = read_resource(path)?;
    let comments =
        CommentConfig::for_basename(&resource.basename).unwrap_or_else(CommentConfig::ada);
    let extractor = RegionExtractor::new(MarkerSyntax::new(comments));

    let (buffer, folds) =
        GuardedBuffer::from_markers(Document::new(&resource.contents), &extractor);
    log::debug!(
        "{}: {} protected ranges, {} folds",
        resource.basename,
        buffer.regions().len(),
        folds.len()
    );
    print_buffer(&resource.basename, &buffer, &folds, &buffer.decorations(), None);
    Ok(ExitCode::SUCCESS)
}

fn print_editor(editor: &ResourceEditor) {
    print_buffer(
        editor.basename(),
        editor.buffer(),
        editor.folds(),
        &editor.decorations(),
        Some(editor.cursor()),
    );
}

fn print_buffer(
    basename: &str,
    buffer: &GuardedBuffer<Document>,
    folds: &[FoldRegion],
    decorations: &[Decoration],
    cursor: Option<Position>,
) {
    println!("{}", format!("== {basename} ==").bold());
    let width = buffer.line_count().to_string().len();
    for line in 0..buffer.line_count() {
        let Some(text) = buffer.line_text(line) else {
            continue;
        };
        if let Some(fold) = folds.iter().find(|f| f.start_line == line) {
            let label = if fold.name.is_empty() { "region" } else { fold.name.as_str() };
            println!("{:>width$}   {}", "", format!("▾ {label}").cyan());
        }

        let span = TextRange::new(
            Position::new(line, 0),
            Position::new(line, text.chars().count()),
        );
        let protected = decorations
            .iter()
            .any(|d| d.kind == DecorationKind::ReadOnly && d.range.intersects(&span));
        let flagged: Vec<&str> = decorations
            .iter()
            .filter(|d| d.kind == DecorationKind::Diagnostic && d.range.start.line == line)
            .filter_map(|d| d.tooltip.as_deref())
            .collect();

        let gutter = if cursor.is_some_and(|c| c.line == line) { '>' } else { ' ' };
        let number = format!("{:>width$}", line + 1);
        if protected {
            println!("{} {gutter}│ {}", number.dark_grey(), text.dark_grey());
        } else {
            println!("{} {gutter}│ {text}", number.dark_grey());
        }
        for message in flagged {
            println!("{:>width$}  {} {}", "", "!".red().bold(), message.red());
        }
    }
    println!();
}
