use clap::Parser;
use emolens::client::DEFAULT_SERVER;
use emolens::report;
use emolens::{
    AnalysisOutcome, CandidateFile, Detector, HttpDetector, ImageSource, Presenter, Preview,
    RenderedResult, Session, TerminalPresenter, UploadState,
};
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "emolens")]
#[command(
    author,
    version,
    about = "Send a face to an emotion-detection service and chart the result"
)]
struct Args {
    /// Image to analyze (same as dropping it on the upload area)
    path: Option<PathBuf>,

    /// Pick the image with a file dialog (auto-enabled when no path is given)
    #[arg(long)]
    gui: bool,

    /// Base URL of the detection service
    #[arg(long, env = "EMOLENS_SERVER", default_value = DEFAULT_SERVER)]
    server: String,

    /// Request timeout in seconds (0 waits forever)
    #[arg(long, default_value = "60")]
    timeout: u64,

    /// Declared image type, instead of guessing from the extension
    #[arg(long, value_name = "TYPE")]
    mime: Option<String>,

    /// Write the result to a report file (.html, .json)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write an HTML report into --report-dir
    #[arg(long)]
    report: bool,

    /// Directory for auto-named reports
    #[arg(long, default_value = "emolens-reports")]
    report_dir: PathBuf,

    /// Open the HTML report when done
    #[arg(long)]
    open: bool,

    /// Print all bars at once instead of revealing them one by one
    #[arg(long)]
    no_animate: bool,

    /// Never ask what to do next; exit after one analysis
    #[arg(long)]
    no_prompt: bool,

    /// Show debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Only show results and errors
    #[arg(short, long)]
    quiet: bool,
}

/// What the user wants after a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Choice {
    Analyze,
    Change,
    Quit,
}

fn main() {
    let args = Args::parse();
    init_logging(log_level(args.verbose, args.quiet));
    std::process::exit(run(&args));
}

/// Default filter; `RUST_LOG` still wins
fn log_level(verbose: bool, quiet: bool) -> &'static str {
    if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    }
}

fn init_logging(default_level: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn run(args: &Args) -> i32 {
    let timeout = (args.timeout > 0).then(|| Duration::from_secs(args.timeout));
    let detector = match HttpDetector::with_timeout(&args.server, timeout) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    let stdout = io::stdout();
    let presenter = TerminalPresenter::new(stdout.lock())
        .with_animation(!args.no_animate)
        .with_color(io::stdout().is_terminal())
        .with_spinner(!args.quiet);
    let mut session = Session::new(detector, presenter);

    if !args.quiet {
        eprintln!("\x1b[1mEmolens - Emotion Detector\x1b[0m");
        eprintln!("{}", "─".repeat(62));
        eprintln!("Server: {}\n", args.server);
    }

    let interactive = !args.no_prompt && io::stdin().is_terminal();
    let stdin = io::stdin();
    let mut input = stdin.lock();

    #[cfg(feature = "gui")]
    let picker = (args.gui || args.path.is_none()).then_some(pick_image_gui);
    #[cfg(not(feature = "gui"))]
    let picker: Option<fn() -> Option<PathBuf>> = None;

    drive(args, &mut session, &mut input, interactive, picker)
}

/// Run the select/analyze loop until the user quits or runs out of images.
/// Returns 0 when the last analysis succeeded and 1 otherwise, including
/// when no analysis ran at all.
fn drive<D, P, R, F>(
    args: &Args,
    session: &mut Session<D, P>,
    input: &mut R,
    interactive: bool,
    mut picker: Option<F>,
) -> i32
where
    D: Detector,
    P: Presenter,
    R: BufRead,
    F: FnMut() -> Option<PathBuf>,
{
    let mut pending_path = args.path.clone();
    let mut exit_code = 1;

    loop {
        if session.state() == UploadState::Idle {
            let next = next_image(pending_path.take(), picker.as_mut(), interactive, input);
            let Some((path, source)) = next else {
                break;
            };

            let candidate = match CandidateFile::from_path(&path) {
                Ok(c) => c,
                Err(e) => {
                    eprintln!("Error: cannot read {}: {}", path.display(), e);
                    exit_code = 1;
                    if interactive {
                        continue;
                    }
                    break;
                }
            };
            let candidate = match &args.mime {
                Some(mime) => candidate.with_mime(mime.clone()),
                None => candidate,
            };

            if session.select(candidate, source).is_err() {
                exit_code = 1;
                if interactive {
                    continue;
                }
                break;
            }

            if interactive {
                match ask(input, "[Enter] analyze, [c]hange image, [q]uit") {
                    Choice::Analyze => {}
                    Choice::Change => {
                        session.reset();
                        continue;
                    }
                    Choice::Quit => break,
                }
            }
        }

        match session.analyze() {
            AnalysisOutcome::Rendered(rendered) => {
                exit_code = 0;
                let preview = session.controller().preview().cloned();
                write_reports(args, preview.as_ref(), &rendered);
            }
            AnalysisOutcome::Failed(_) => exit_code = 1,
            AnalysisOutcome::Stale => {}
        }

        if !interactive {
            break;
        }

        let choice = if session.state() == UploadState::ShowingResults {
            ask(input, "[a]nalyze another, [q]uit")
        } else {
            ask(input, "[r]etry, [c]hange image, [q]uit")
        };
        match choice {
            // Still previewing after a failure, so the loop re-sends the same image
            Choice::Analyze if session.state() != UploadState::ShowingResults => {}
            Choice::Analyze | Choice::Change => {
                session.reset();
            }
            Choice::Quit => break,
        }
    }

    exit_code
}

/// Where the next image comes from: the path argument first, then the file
/// dialog, then a typed path.
fn next_image<R, F>(
    pending: Option<PathBuf>,
    picker: Option<&mut F>,
    interactive: bool,
    input: &mut R,
) -> Option<(PathBuf, ImageSource)>
where
    R: BufRead,
    F: FnMut() -> Option<PathBuf>,
{
    if let Some(path) = pending {
        return Some((path, ImageSource::Drop));
    }

    if let Some(pick) = picker {
        let picked = pick();
        if picked.is_none() {
            eprintln!("No image selected.");
        }
        return picked.map(|p| (p, ImageSource::Picker));
    }

    if interactive {
        return read_path(input).map(|p| (p, ImageSource::Drop));
    }

    eprintln!("Usage: emolens <IMAGE>");
    eprintln!("Run 'emolens --help' for more options.");
    None
}

#[cfg(feature = "gui")]
fn pick_image_gui() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title("Select an image to analyze")
        .add_filter("Images", &["jpg", "jpeg", "png", "gif", "webp", "bmp"])
        .add_filter("All files", &["*"])
        .pick_file()
}

fn read_path<R: BufRead>(input: &mut R) -> Option<PathBuf> {
    eprint!("Image path (empty to quit): ");
    let _ = io::stderr().flush();
    let mut line = String::new();
    match input.read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => {
            // Terminals quote dragged-in paths
            let trimmed = line.trim().trim_matches(|c| c == '\'' || c == '"');
            (!trimmed.is_empty()).then(|| PathBuf::from(trimmed))
        }
    }
}

fn ask<R: BufRead>(input: &mut R, question: &str) -> Choice {
    eprint!("{} ", question);
    let _ = io::stderr().flush();
    let mut line = String::new();
    match input.read_line(&mut line) {
        Ok(0) | Err(_) => Choice::Quit,
        Ok(_) => parse_choice(&line),
    }
}

fn parse_choice(answer: &str) -> Choice {
    match answer.trim().to_ascii_lowercase().as_str() {
        "" | "y" | "yes" | "a" | "r" => Choice::Analyze,
        "c" => Choice::Change,
        _ => Choice::Quit,
    }
}

fn write_reports(args: &Args, preview: Option<&Preview>, rendered: &RenderedResult) {
    let mut html_report: Option<PathBuf> = None;

    if let Some(ref output) = args.output {
        match report::generate(output, preview, rendered) {
            Ok(()) => {
                eprintln!("\x1b[90mReport written to {}\x1b[0m", output.display());
                if is_html(output) {
                    html_report = Some(output.clone());
                }
            }
            Err(e) => eprintln!("Failed to write report: {}", e),
        }
    }

    if args.report || (args.open && html_report.is_none()) {
        let path = report::default_report_path(&args.report_dir);
        match report::generate(&path, preview, rendered) {
            Ok(()) => {
                eprintln!("\x1b[90mReport written to {}\x1b[0m", path.display());
                html_report = Some(path);
            }
            Err(e) => eprintln!("Failed to write report: {}", e),
        }
    }

    if args.open {
        if let Some(path) = html_report {
            if let Err(e) = open::that(&path) {
                eprintln!("Failed to open {}: {}", path.display(), e);
            }
        }
    }
}

fn is_html(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| matches!(e.to_ascii_lowercase().as_str(), "html" | "htm"))
        .unwrap_or(false)
}
