mod config;
mod test_runner;

use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};
use serde::Serialize;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use guidebook::import::{ImportError, Importer};
use guidebook::manifest::{DossierManifest, GuideManifest};
use guidebook::slugify;
use guideview::render::{render_index, render_section, render_state, render_toc};
use guideview::{
    AnySource, CancellationToken, FileSource, HttpSource, Navigator, Outcome, View, ViewError,
    ViewState, load_document, load_index, load_section, load_toc,
};

use config::{GuideConfig, LogConfig, SourceConfig};

/// Exit code of a view whose section does not exist.
const EXIT_NOT_FOUND: i32 = 2;

/// Environment variable holding a log filter. Wins over the config file.
const LOG_ENV: &str = "GUIDE_LOG";

#[derive(Parser)]
#[command(name = "guide", version, about = "Content Server help-center guides")]
struct Cli {
    /// Config file (defaults to ./guide.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Read documents from this directory
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Fetch documents over HTTP below this URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the sections of a guide
    Sections(ViewArgs),

    /// Show one section, addressed by its slug
    Show(ShowArgs),

    /// Print the table of contents of a guide
    Toc(ViewArgs),

    /// Print the slug of each argument
    Slug(SlugArgs),

    /// Convert a Markdown guide to JSON blocks
    Import(ImportArgs),

    /// List a guide manifest or resolve a dossier entry
    Manifest(ManifestArgs),

    /// Run .test.md fixtures
    Test(TestArgs),
}

#[derive(clap::Args)]
struct ViewArgs {
    /// Guide location (defaults to the configured overview)
    location: Option<String>,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(clap::Args)]
struct ShowArgs {
    slug: String,

    #[command(flatten)]
    view: ViewArgs,
}

#[derive(clap::Args)]
struct SlugArgs {
    #[arg(required = true)]
    text: Vec<String>,
}

#[derive(clap::Args)]
struct ImportArgs {
    /// Markdown guide to convert
    file: PathBuf,

    /// Write the blocks here instead of stdout
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(clap::Args)]
struct ManifestArgs {
    /// Manifest location
    location: String,

    /// Treat the manifest as a dossier manifest and resolve this slug
    #[arg(long)]
    dossier: Option<String>,
}

#[derive(clap::Args)]
struct TestArgs {
    /// Path to a .test.md file or directory containing them
    path: PathBuf,

    /// Run only tests in these categories (subfolder names). Repeatable.
    #[arg(short, long)]
    category: Vec<String>,

    /// List available categories and exit
    #[arg(long)]
    list_categories: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    let mut config = match GuideConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {}", err);
            process::exit(1);
        }
    };
    init_logging(&config.log, cli.no_color);
    config.source.override_with(cli.root, cli.base_url);

    let code = match cli.command {
        Command::Sections(args) => {
            let location = args.location.unwrap_or_else(|| config.source.overview.clone());
            match Session::open(&config.source) {
                Ok(session) => {
                    let outcome = load_index(&session.source, &location, &session.token).await;
                    session.settle(outcome, |state| {
                        present(state, args.json, |out, sections| render_index(out, sections))
                    })
                }
                Err(code) => code,
            }
        }
        Command::Show(args) => {
            let location = args.view.location.unwrap_or_else(|| config.source.overview.clone());
            match Session::open(&config.source) {
                Ok(session) => {
                    let outcome =
                        load_section(&session.source, &location, &args.slug, &session.token).await;
                    session.settle(outcome, |state| {
                        present(state, args.view.json, |out, section| render_section(out, section))
                    })
                }
                Err(code) => code,
            }
        }
        Command::Toc(args) => {
            let location = args.location.unwrap_or_else(|| config.source.overview.clone());
            match Session::open(&config.source) {
                Ok(session) => {
                    let outcome = load_toc(&session.source, &location, &session.token).await;
                    session.settle(outcome, |state| {
                        present(state, args.json, |out, items| render_toc(out, items))
                    })
                }
                Err(code) => code,
            }
        }
        Command::Slug(args) => {
            for text in &args.text {
                println!("{}", slugify(text));
            }
            0
        }
        Command::Import(args) => do_import(&args, cli.no_color),
        Command::Manifest(args) => do_manifest(&config.source, args).await,
        Command::Test(args) => {
            if args.list_categories {
                test_runner::list_categories(&args.path);
                0
            } else {
                test_runner::run_tests(&args.path, cli.no_color, &args.category)
            }
        }
    };
    process::exit(code);
}

fn init_logging(log: &LogConfig, no_color: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(&log.level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(!no_color)
        .with_target(false)
        .init();
}

fn build_source(config: &SourceConfig) -> Result<AnySource, ViewError> {
    match &config.base_url {
        Some(base) => {
            debug!(%base, "using http source");
            Ok(AnySource::Http(HttpSource::new(base.clone(), config.timeout())?))
        }
        None => {
            debug!(root = %config.root.display(), "using file source");
            Ok(AnySource::File(FileSource::new(config.root.clone())))
        }
    }
}

/// Cancel `token` on Ctrl-C.
fn cancel_on_interrupt(token: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            debug!("interrupted");
            token.cancel();
        }
    });
}

/// One mounted view: the source it reads from and the token guarding its load.
struct Session {
    source: AnySource,
    navigator: Navigator,
    token: CancellationToken,
}

impl Session {
    fn open(config: &SourceConfig) -> Result<Self, i32> {
        let source = build_source(config).map_err(|err| {
            eprintln!("error: {}", err);
            1
        })?;
        let mut navigator = Navigator::new();
        let token = navigator.navigate();
        cancel_on_interrupt(token.clone());
        Ok(Session {
            source,
            navigator,
            token,
        })
    }

    /// Commit the load to a view and show it, unless it went stale.
    fn settle<T>(mut self, outcome: Outcome<T>, show: impl FnOnce(&ViewState<T>) -> i32) -> i32 {
        let mut view = View::new(self.token.clone());
        if !view.apply(outcome) {
            debug!("stale result dropped");
            return 1;
        }
        let code = show(view.state());
        self.navigator.leave();
        code
    }
}

/// Print a settled view and map it to an exit code.
fn present<T: Serialize>(
    state: &ViewState<T>,
    json: bool,
    ready: impl FnOnce(&mut dyn Write, &T) -> io::Result<()>,
) -> i32 {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let written = match state {
        ViewState::Ready(value) if json => serde_json::to_writer_pretty(&mut out, value)
            .map_err(io::Error::from)
            .and_then(|()| writeln!(out)),
        _ => render_state(&mut out, state, ready),
    };
    if let Err(err) = written {
        eprintln!("error: cannot write output: {}", err);
        return 1;
    }

    match state {
        ViewState::Ready(_) => 0,
        ViewState::NotFound { .. } => EXIT_NOT_FOUND,
        ViewState::Failed(err) => {
            eprintln!("error: {}", err);
            1
        }
        ViewState::Loading => 1,
    }
}

fn do_import(args: &ImportArgs, no_color: bool) -> i32 {
    let color_choice = if no_color {
        ColorChoice::Never
    } else {
        ColorChoice::Auto
    };

    let source = match std::fs::read_to_string(&args.file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: cannot read '{}': {}", args.file.display(), e);
            return 1;
        }
    };

    let mut files = SimpleFiles::new();
    let file_id = files.add(args.file.display().to_string(), source.clone());
    let writer = StandardStream::stderr(color_choice);
    let config = term::Config::default();

    let imported = match Importer::new(source, file_id).import() {
        Ok(imported) => imported,
        Err(diagnostics) => {
            emit_diagnostics(&writer, &config, &files, &diagnostics);
            return 1;
        }
    };
    emit_diagnostics(&writer, &config, &files, &imported.warnings);

    let json = match serde_json::to_string_pretty(&imported.blocks) {
        Ok(json) => json,
        Err(e) => {
            eprintln!("error: cannot encode blocks: {}", e);
            return 1;
        }
    };
    match &args.out {
        Some(out) => {
            if let Err(e) = std::fs::write(out, json + "\n") {
                eprintln!("error: cannot write '{}': {}", out.display(), e);
                return 1;
            }
            eprintln!(
                "ok: {} blocks written to {}",
                imported.blocks.len(),
                out.display()
            );
        }
        None => println!("{}", json),
    }
    0
}

fn emit_diagnostics(
    writer: &StandardStream,
    config: &term::Config,
    files: &SimpleFiles<String, String>,
    diagnostics: &[ImportError],
) {
    for diag in diagnostics {
        let _ = term::emit_to_write_style(&mut writer.lock(), config, files, &diag.to_diagnostic());
    }
}

async fn do_manifest(config: &SourceConfig, args: ManifestArgs) -> i32 {
    let session = match Session::open(config) {
        Ok(session) => session,
        Err(code) => return code,
    };

    match args.dossier {
        Some(slug) => {
            let outcome: Outcome<DossierManifest> =
                load_document(&session.source, &args.location, &session.token).await;
            session.settle(outcome, |state| {
                with_ready(state, |manifest| match manifest.resolve(&slug) {
                    Some(item) => {
                        if item.slug != slug {
                            warn!(%slug, fallback = %item.slug, "unknown dossier, using the default");
                        }
                        println!("{}\t{}\t{}", item.slug, item.title, item.file);
                        0
                    }
                    None => {
                        eprintln!("error: no dossier '{}' and no default entry", slug);
                        EXIT_NOT_FOUND
                    }
                })
            })
        }
        None => {
            let outcome: Outcome<GuideManifest> =
                load_document(&session.source, &args.location, &session.token).await;
            session.settle(outcome, |state| {
                with_ready(state, |manifest| {
                    println!("{} (v{})", manifest.title, manifest.version);
                    for section in manifest.ordered_sections() {
                        println!("  {}\t{}\t{}", section.id, section.title, section.file);
                    }
                    0
                })
            })
        }
    }
}

fn with_ready<T>(state: &ViewState<T>, ready: impl FnOnce(&T) -> i32) -> i32 {
    match state {
        ViewState::Ready(value) => ready(value),
        ViewState::Failed(err) => {
            eprintln!("error: {}", err);
            1
        }
        ViewState::NotFound { slug } => {
            eprintln!("error: not found: {}", slug);
            EXIT_NOT_FOUND
        }
        ViewState::Loading => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        let mut navigator = Navigator::new();
        let token = navigator.navigate();
        Session {
            source: AnySource::File(FileSource::new(PathBuf::from("."))),
            navigator,
            token,
        }
    }

    #[test]
    fn stale_outcome_is_never_shown() {
        let mut shown = false;
        let code = session().settle(Outcome::<u32>::Stale, |_| {
            shown = true;
            0
        });
        assert_eq!(code, 1);
        assert!(!shown);
    }

    #[test]
    fn result_arriving_after_cancel_is_never_shown() {
        let session = session();
        session.token.cancel();
        let mut shown = false;
        let code = session.settle(Outcome::Commit(ViewState::Ready(7u32)), |_| {
            shown = true;
            0
        });
        assert_eq!(code, 1);
        assert!(!shown);
    }

    #[test]
    fn committed_outcome_is_shown() {
        let code = session().settle(Outcome::Commit(ViewState::Ready(7u32)), |state| {
            match state {
                ViewState::Ready(value) => *value as i32,
                _ => 1,
            }
        });
        assert_eq!(code, 7);
    }
}
