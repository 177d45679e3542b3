//! CLI entry point for gostub

use std::io::{IsTerminal, Write};
use std::path::PathBuf;
use std::process;

use clap::Parser;
use clap::error::ErrorKind;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use gostub::{GeneratorConfig, generate, resolve_header};

#[derive(Parser, Debug)]
#[command(name = "gostub")]
#[command(about = "Generate dependency-only stub files for a Go package")]
#[command(version)]
struct Args {
    /// Source folder of the package to process
    source_pkg: PathBuf,

    /// Folder that will be created with the fake .go files
    dest_folder: PathBuf,

    /// Header of the generated .go files
    #[arg(long, default_value = "", hide_default_value = true)]
    header: String,

    /// Header of the generated .go files (from the content of the file)
    #[arg(long)]
    headerfile: Option<PathBuf>,

    /// Do not fail if destination folder already exists
    #[arg(
        long,
        num_args = 0..=1,
        default_value_t = false,
        default_missing_value = "true",
        action = clap::ArgAction::Set
    )]
    allowdestexists: bool,
}

/// Pick a color choice for stderr diagnostics.
fn stderr_color_choice() -> ColorChoice {
    // Respect NO_COLOR environment variable (https://no-color.org/)
    if std::env::var_os("NO_COLOR").is_some() {
        return ColorChoice::Never;
    }
    // Respect FORCE_COLOR environment variable
    if std::env::var_os("FORCE_COLOR").is_some() {
        return ColorChoice::Always;
    }
    // Respect TERM=dumb
    if std::env::var("TERM").map(|t| t == "dumb").unwrap_or(false) {
        return ColorChoice::Never;
    }
    if std::io::stderr().is_terminal() {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    }
}

/// Print a fatal diagnostic to stderr as `gostub: <error>`.
fn report_fatal(err: &dyn std::fmt::Display) {
    let mut stderr = StandardStream::stderr(stderr_color_choice());
    let _ = stderr.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true));
    let _ = write!(stderr, "gostub: ");
    let _ = stderr.reset();
    let _ = writeln!(stderr, "{err}");
}

fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = e.print();
            return;
        }
        Err(e) => {
            let _ = e.print();
            process::exit(1);
        }
    };

    let header = match resolve_header(&args.header, args.headerfile.as_deref()) {
        Ok(header) => header,
        Err(e) => {
            report_fatal(&e);
            process::exit(1);
        }
    };

    let config = GeneratorConfig {
        source: args.source_pkg,
        dest: args.dest_folder,
        header,
        allow_dest_exists: args.allowdestexists,
    };

    if let Err(e) = generate(&config) {
        report_fatal(&e);
        process::exit(1);
    }
}
