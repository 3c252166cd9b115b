use anyhow::{Result, bail};
use clap::Parser;
use std::path::{Path, PathBuf};

use exif_viewer::config::Config;
use exif_viewer::content::ContentRef;
use exif_viewer::permissions::{DENIED_MESSAGE, GateAction, GateOutcome, PlatformVersion};
use exif_viewer::presenter::Line;
use exif_viewer::viewer::Viewer;

#[derive(Parser, Debug)]
#[command(
    name = "exif-viewer",
    version,
    about = "View embedded metadata of a media file — EXIF for images, container tags for audio and video"
)]
struct Cli {
    /// Media file path, or a URI to pass through as-is
    #[arg(value_name = "SOURCE")]
    source: Option<String>,

    /// Path to config file (default: exif-viewer.json next to binary)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write a default exif-viewer.json and exit
    #[arg(long)]
    init: bool,

    /// Assume this platform API level instead of detecting it
    #[arg(long, value_name = "N")]
    api_level: Option<u32>,

    /// Answer the permission request with a denial
    #[arg(long)]
    deny_permissions: bool,

    /// Output lines as JSON
    #[arg(long)]
    json: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    // Handle --init
    if cli.init {
        let config = Config::default();
        let path = cli.config.as_deref();
        config.save(path)?;
        let save_path = match path {
            Some(p) => p.to_path_buf(),
            None => Config::config_path()?,
        };
        println!("Default config written to {}", save_path.display());
        return Ok(());
    }

    let Some(source) = cli.source.as_deref() else {
        bail!("No input file specified. Use --help for usage.");
    };

    let config = Config::load(cli.config.as_deref())?;
    let version = match cli.api_level {
        Some(level) => PlatformVersion::from_api_level(level),
        None => config.platform_version(),
    };
    log::debug!("Platform: {version:?}");

    let mut viewer = Viewer::new(version);

    // No one to prompt here: answer from config / flags
    if let GateAction::Request(missing) = viewer.start()? {
        let grant = config.permissions.auto_grant && !cli.deny_permissions;
        let answers: Vec<_> = missing.iter().map(|p| (*p, grant)).collect();
        if viewer.answer_permissions(&answers)? == GateOutcome::Denied {
            println!("{DENIED_MESSAGE}");
            return Ok(());
        }
    }

    let uri = resolve_source(&mut viewer, source)?;
    viewer.show(&uri);

    if cli.json {
        let output = serde_json::json!({
            "source": source,
            "uri": uri.as_str(),
            "lines": viewer.output().lines(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_output(source, viewer.output().lines());
    }

    Ok(())
}

/// Existing files are registered with the resolver; anything else that looks
/// like a URI is shown as given.
fn resolve_source(viewer: &mut Viewer, source: &str) -> Result<ContentRef> {
    let path = Path::new(source);
    if path.exists() {
        return viewer.grant(path);
    }
    let uri = ContentRef::parse(source);
    if uri.scheme().is_empty() {
        bail!("No such file: {source}");
    }
    Ok(uri)
}

// ANSI color codes
const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const YELLOW: &str = "\x1b[33m";

const LABEL_WIDTH: usize = 22;
/// Value column width before wrapping.
const VAL_WIDTH: usize = 46;

/// Print the output buffer as a table.
fn print_output(source: &str, lines: &[Line]) {
    println!();
    println!("{BOLD}File:{RESET} {source}");
    println!("{DIM}{}{RESET}", "═".repeat(72));

    for line in lines {
        match line {
            Line::Mime { mime_type } => {
                print_row("MIME type", mime_type);
                println!("  {DIM}{}{RESET}", "─".repeat(70));
            }
            Line::Tag { label, value } => print_row(label, value),
            Line::Notice { text } => println!("  {YELLOW}{text}{RESET}"),
        }
    }
    println!();
}

/// Print one metadata entry, continuing long values under the value column.
fn print_row(label: &str, value: &str) {
    for (i, chunk) in wrap_value(value, VAL_WIDTH).iter().enumerate() {
        if i == 0 {
            println!("  {label:<LABEL_WIDTH$} : {chunk}");
        } else {
            println!("  {:pad$}{chunk}", "", pad = LABEL_WIDTH + 3);
        }
    }
}

/// Split a metadata value into chunks of at most `width` characters.
///
/// Breaks after spaces and after the commas separating GPS rationals. A
/// single piece longer than `width` stays whole.
fn wrap_value(value: &str, width: usize) -> Vec<String> {
    let pieces = value
        .split_inclusive([' ', ','])
        .map(str::trim_start)
        .filter(|p| !p.is_empty());

    let mut chunks: Vec<String> = Vec::new();
    for piece in pieces {
        let fits = chunks
            .last()
            .is_some_and(|last| last.chars().count() + piece.trim_end().chars().count() <= width);
        match chunks.last_mut() {
            Some(last) if fits => last.push_str(piece),
            _ => chunks.push(piece.to_string()),
        }
    }

    let mut chunks: Vec<String> = chunks.into_iter().map(|c| c.trim_end().to_string()).collect();
    if chunks.is_empty() {
        chunks.push(String::new());
    }
    chunks
}
