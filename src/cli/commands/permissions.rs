use super::{id_arg, with_list_args};
use clap::{Arg, Command};

#[must_use]
pub fn command() -> Command {
    Command::new("permissions")
        .about("Browse the permission catalogue")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            with_list_args(Command::new("list").about("List permissions"))
                .arg(
                    Arg::new("content-type")
                        .long("content-type")
                        .help("Filter by resource type"),
                )
                .arg(Arg::new("action").long("action").help("Filter by action"))
                .arg(
                    Arg::new("parent")
                        .long("parent")
                        .help("Filter by parent id")
                        .value_parser(clap::value_parser!(u64)),
                ),
        )
        .subcommand(Command::new("get").about("Show a permission").arg(id_arg()))
        .subcommand(Command::new("tree").about("Show the permission hierarchy"))
}
