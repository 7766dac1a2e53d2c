//! scopecheck CLI
//!
//! Command-line interface for the scope analyzer.

use std::io::{self, Read, Write};
use std::process::ExitCode;

use clap::Parser as _;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use scopecheck::config::{Args, Config, Input, OutputFormat};
use scopecheck::{lint_file, CheckError, CheckResult, Lexer, Report};

fn main() -> ExitCode {
    let args = Args::parse();
    let config = Config::from_args(&args);

    init_tracing(&config);
    colored::control::set_override(config.color);

    if config.show_tokens {
        show_tokens(&config)
    } else {
        check(&config)
    }
}

/// Logs go to stderr; `RUST_LOG` wins over `-v`
fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_directive()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn check(config: &Config) -> ExitCode {
    let mut reports = Vec::new();
    let mut io_failed = false;

    for result in collect_reports(&config.inputs) {
        match result {
            Ok(report) => reports.push(report),
            Err(err) => {
                eprintln!("{} {}", "error:".red().bold(), err);
                io_failed = true;
            }
        }
    }

    let printed = match config.format {
        OutputFormat::Text => print_text(&reports),
        OutputFormat::Json => print_json(&reports),
    };
    if let Err(err) = printed {
        eprintln!("{} failed to write output: {}", "error:".red().bold(), err);
        return ExitCode::from(2);
    }

    let errors: usize = reports.iter().map(Report::error_count).sum();
    let warnings: usize = reports.iter().map(Report::warning_count).sum();

    if io_failed {
        ExitCode::from(2)
    } else if errors > 0 || (config.deny_warnings && warnings > 0) {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}

#[cfg(feature = "async-runtime")]
fn collect_reports(inputs: &[Input]) -> Vec<CheckResult<Report>> {
    let paths: Vec<_> = inputs
        .iter()
        .filter_map(|input| match input {
            Input::File(path) => Some(path.clone()),
            Input::Stdin => None,
        })
        .collect();

    // stdin has to be read in order with the files around it
    if paths.len() < 2 || paths.len() != inputs.len() {
        return inputs.iter().map(read_report).collect();
    }

    match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime.block_on(scopecheck::async_runtime::lint_files(paths)),
        Err(err) => {
            tracing::warn!(error = %err, "falling back to sequential checking");
            inputs.iter().map(read_report).collect()
        }
    }
}

#[cfg(not(feature = "async-runtime"))]
fn collect_reports(inputs: &[Input]) -> Vec<CheckResult<Report>> {
    inputs.iter().map(read_report).collect()
}

fn read_report(input: &Input) -> CheckResult<Report> {
    match input {
        Input::File(path) => lint_file(path),
        Input::Stdin => Ok(Report::new(input.display_name(), read_source(input)?)),
    }
}

fn read_source(input: &Input) -> CheckResult<String> {
    match input {
        Input::File(path) => {
            std::fs::read_to_string(path).map_err(|err| CheckError::io_error(path, err))
        }
        Input::Stdin => {
            let mut source = String::new();
            io::stdin()
                .read_to_string(&mut source)
                .map_err(|err| CheckError::io_error(input.display_name(), err))?;
            Ok(source)
        }
    }
}

fn print_text(reports: &[Report]) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    let mut errors = 0;
    let mut warnings = 0;

    for report in reports {
        for diagnostic in &report.diagnostics {
            writeln!(stdout, "{}", diagnostic.render(&report.source, Some(&report.name)))?;
        }
        errors += report.error_count();
        warnings += report.warning_count();
    }

    if errors == 0 && warnings == 0 {
        writeln!(stdout, "{}", "No problems found".green().bold())?;
    } else {
        let summary = format!(
            "{} {}, {} {}",
            errors,
            plural(errors, "error"),
            warnings,
            plural(warnings, "warning")
        );
        let summary = if errors > 0 {
            summary.red().bold()
        } else {
            summary.yellow().bold()
        };
        writeln!(stdout, "{}", summary)?;
    }

    Ok(())
}

fn print_json(reports: &[Report]) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, reports)?;
    writeln!(stdout)
}

fn plural(count: usize, word: &str) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{}s", word)
    }
}

/// Show tokens from lexing each input
fn show_tokens(config: &Config) -> ExitCode {
    let mut code = ExitCode::SUCCESS;

    for input in &config.inputs {
        let name = input.display_name();
        let source = match read_source(input) {
            Ok(source) => source,
            Err(err) => {
                eprintln!("{} {}", "error:".red().bold(), err);
                return ExitCode::from(2);
            }
        };

        let tokens = match Lexer::new(&source).tokenize() {
            Ok(tokens) => tokens,
            Err(err) => {
                eprintln!("{} {}: {}", "error:".red().bold(), name, err);
                code = ExitCode::from(1);
                continue;
            }
        };

        println!("Tokens for '{}':", name);
        println!("{}", "=".repeat(60));

        for (i, token) in tokens.iter().enumerate() {
            println!(
                "{:4}: {:>7} {:24} | {:?}",
                i,
                token.location.start.to_string(),
                token.token_type.to_string(),
                token.lexeme
            );
        }

        println!("{}", "=".repeat(60));
        println!("Total tokens: {}", tokens.len());
    }

    code
}
