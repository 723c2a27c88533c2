use clap::{Arg, ArgAction, Command};

pub const ARG_API_URL: &str = "api-url";
pub const ARG_SESSION_FILE: &str = "session-file";
pub const ARG_EPHEMERAL: &str = "ephemeral";
pub const ARG_LANGUAGE: &str = "language";
pub const ARG_TIMEOUT: &str = "timeout";
pub const ARG_JSON: &str = "json";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_API_URL)
                .long("api-url")
                .help("Base URL of the RBAC API")
                .long_help("Base URL of the RBAC API (default: http://localhost:8000/api/v1)")
                .env("RBAC_CONSOLE_API_URL")
                .global(true),
        )
        .arg(
            Arg::new(ARG_SESSION_FILE)
                .long("session-file")
                .help("Where tokens and the language preference are stored")
                .env("RBAC_CONSOLE_SESSION_FILE")
                .global(true),
        )
        .arg(
            Arg::new(ARG_EPHEMERAL)
                .long("ephemeral")
                .help("Keep the session in memory only; nothing is written to disk")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new(ARG_LANGUAGE)
                .long("language")
                .help("Language sent to the API: zh-CN, en, zh-TW")
                .env("RBAC_CONSOLE_LANGUAGE")
                .global(true),
        )
        .arg(
            Arg::new(ARG_TIMEOUT)
                .long("timeout")
                .help("Request timeout in seconds")
                .env("RBAC_CONSOLE_TIMEOUT")
                .value_parser(clap::value_parser!(u64))
                .global(true),
        )
        .arg(
            Arg::new(ARG_JSON)
                .long("json")
                .help("Print JSON instead of tables")
                .action(ArgAction::SetTrue)
                .global(true),
        )
}
