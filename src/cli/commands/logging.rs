//! Log verbosity: a repeatable `-v` or a named `--log-level`.

use clap::{builder::PossibleValuesParser, Arg, ArgAction, ArgMatches, Command};
use tracing::Level;

pub const ARG_VERBOSITY: &str = "verbose";
pub const ARG_LOG_LEVEL: &str = "log-level";

const LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_VERBOSITY)
                .short('v')
                .long("verbose")
                .help("More log output on stderr; repeat for more (-vvv)")
                .action(ArgAction::Count)
                .global(true),
        )
        .arg(
            Arg::new(ARG_LOG_LEVEL)
                .long("log-level")
                .help("Log level by name; overrides -v")
                .env("RBAC_CONSOLE_LOG_LEVEL")
                .value_parser(PossibleValuesParser::new(LEVELS))
                .ignore_case(true)
                .global(true),
        )
}

/// Level requested on the command line. `None` keeps the default (errors only).
#[must_use]
pub fn level(matches: &ArgMatches) -> Option<Level> {
    if let Some(name) = matches.get_one::<String>(ARG_LOG_LEVEL) {
        return parse_level(name);
    }
    match matches.get_count(ARG_VERBOSITY) {
        0 => None,
        1 => Some(Level::WARN),
        2 => Some(Level::INFO),
        3 => Some(Level::DEBUG),
        _ => Some(Level::TRACE),
    }
}

fn parse_level(name: &str) -> Option<Level> {
    match name.to_ascii_lowercase().as_str() {
        "error" => Some(Level::ERROR),
        "warn" => Some(Level::WARN),
        "info" => Some(Level::INFO),
        "debug" => Some(Level::DEBUG),
        "trace" => Some(Level::TRACE),
        _ => None,
    }
}
