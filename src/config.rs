//! Command-line arguments and the configuration resolved from them
//!
//! Flags and environment variables are read once at startup into an
//! immutable `Config`; nothing downstream looks at either again.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Report format on stdout
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    /// `NO_COLOR` only overrides `auto`; an explicit `always` still wins
    pub fn should_colorize(self, no_color: bool, is_terminal: bool) -> bool {
        match self {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => !no_color && is_terminal,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "scopecheck", version)]
#[command(about = "Report undefined names, use-before-declaration and unused bindings in scripts")]
#[command(after_help = r#"EXAMPLES:
  scopecheck app.js
  scopecheck --format json src/*.js
  cat app.js | scopecheck -
  scopecheck --tokens app.js"#)]
pub struct Args {
    /// Files to check ("-" or nothing reads stdin)
    #[arg(value_name = "FILES")]
    pub files: Vec<PathBuf>,

    /// Print the token stream instead of checking
    #[arg(short = 't', long)]
    pub tokens: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// When to color terminal output
    #[arg(long, value_enum, default_value_t = ColorChoice::Auto, value_name = "WHEN")]
    pub color: ColorChoice,

    /// Exit with failure on warnings too
    #[arg(short = 'W', long)]
    pub deny_warnings: bool,

    /// Log more (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// One thing to check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Stdin,
    File(PathBuf),
}

impl Input {
    /// Name shown in reports
    pub fn display_name(&self) -> String {
        match self {
            Input::Stdin => "<stdin>".to_string(),
            Input::File(path) => path.display().to_string(),
        }
    }
}

/// Complete configuration resolved from CLI args and environment
#[derive(Debug, Clone)]
pub struct Config {
    pub inputs: Vec<Input>,
    pub show_tokens: bool,
    pub format: OutputFormat,
    pub color: bool,
    pub deny_warnings: bool,
    pub verbosity: u8,
}

impl Config {
    /// Resolve configuration from parsed args, the environment and the terminal
    pub fn from_args(args: &Args) -> Self {
        let no_color = std::env::var_os("NO_COLOR").is_some_and(|value| !value.is_empty());
        let is_terminal = std::io::IsTerminal::is_terminal(&std::io::stdout());
        Self::resolve(args, no_color, is_terminal)
    }

    /// Resolution with the environment passed in explicitly
    pub fn resolve(args: &Args, no_color: bool, is_terminal: bool) -> Self {
        let inputs = if args.files.is_empty() {
            vec![Input::Stdin]
        } else {
            args.files
                .iter()
                .map(|path| {
                    if path.as_os_str() == "-" {
                        Input::Stdin
                    } else {
                        Input::File(path.clone())
                    }
                })
                .collect()
        };

        Self {
            inputs,
            show_tokens: args.tokens,
            format: args.format,
            color: args.color.should_colorize(no_color, is_terminal),
            deny_warnings: args.deny_warnings,
            verbosity: args.verbose,
        }
    }

    /// Filter directive used when `RUST_LOG` is unset
    pub fn log_directive(&self) -> &'static str {
        match self.verbosity {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    }
}
