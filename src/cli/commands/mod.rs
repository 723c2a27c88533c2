pub mod auth;
pub mod config;
pub mod departments;
pub mod logging;
pub mod navigation;
pub mod permissions;
pub mod roles;
pub mod users;

use clap::{
    builder::styling::{AnsiColor, Effects, Styles},
    Arg, ArgAction, ColorChoice, Command,
};

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    let command = Command::new("rbac-console")
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommands(auth::subcommands())
        .subcommands(navigation::subcommands())
        .subcommand(users::command())
        .subcommand(roles::command())
        .subcommand(departments::command())
        .subcommand(permissions::command());

    let command = config::with_args(command);
    logging::with_args(command)
}

/// Positional resource id.
pub(crate) fn id_arg() -> Arg {
    Arg::new("id")
        .help("Resource id")
        .required(true)
        .value_parser(clap::value_parser!(u64))
}

/// Optional `true`/`false` flag value.
pub(crate) fn bool_arg(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .long(name)
        .help(help)
        .value_name("BOOL")
        .value_parser(clap::value_parser!(bool))
}

/// Repeatable, comma-separated id list.
pub(crate) fn ids_arg(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .long(name)
        .help(help)
        .value_name("ID")
        .value_delimiter(',')
        .action(ArgAction::Append)
        .value_parser(clap::value_parser!(u64))
}

/// Pagination, search and ordering shared by list commands.
pub(crate) fn with_list_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("page")
                .long("page")
                .help("Page number")
                .default_value("1")
                .value_parser(clap::value_parser!(u32)),
        )
        .arg(
            Arg::new("page-size")
                .long("page-size")
                .help("Results per page")
                .default_value("10")
                .value_parser(clap::value_parser!(u32)),
        )
        .arg(Arg::new("search").long("search").help("Search text"))
        .arg(
            Arg::new("ordering")
                .long("ordering")
                .help("Sort field; prefix with '-' for descending"),
        )
}
