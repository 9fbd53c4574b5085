mod arguments;
mod error;
mod logger;

use std::io;
use std::process::ExitCode;

use clopt::Outcome;

use arguments::{Settings, PROG_NAME};
use error::{DemoError, Result};

fn collect_args() -> Result<Vec<String>> {
    std::env::args_os()
        .map(|arg| {
            arg.into_string()
                .map_err(|arg| DemoError::NonUnicodeArgument(arg.to_string_lossy().into_owned()))
        })
        .collect()
}

fn run() -> Result<ExitCode> {
    let args = collect_args()?;
    let mut argv: Vec<&str> = args.iter().map(String::as_str).collect();

    let settings = Settings::default();
    let ctx = arguments::build_context(&settings)?;

    match ctx.parse(&mut argv) {
        Outcome::Ok => {}
        Outcome::HelpShown | Outcome::VersionShown => return Ok(ExitCode::SUCCESS),
        Outcome::ParseError => return Ok(ExitCode::FAILURE),
    }

    let files = argv.get(1..).unwrap_or_default();
    if files.iter().any(|file| file.is_empty()) {
        eprintln!("{}: Empty file name given.", ctx.name());
        ctx.print_error_usage();
        return Ok(ExitCode::FAILURE);
    }

    let stdout = io::stdout();
    arguments::write_report(&mut stdout.lock(), &settings, files)?;
    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    logger::init_from_env();

    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {}", PROG_NAME, e);
            ExitCode::FAILURE
        }
    }
}
