use super::{bool_arg, id_arg, ids_arg, with_list_args};
use clap::{Arg, ArgAction, Command};

fn with_role_args(command: Command) -> Command {
    command
        .arg(Arg::new("description").long("description").help("Description"))
        .arg(
            Arg::new("sort-order")
                .long("sort-order")
                .help("Position in listings")
                .value_parser(clap::value_parser!(i32)),
        )
        .arg(ids_arg("permission", "Permission ids to assign"))
}

#[must_use]
pub fn command() -> Command {
    Command::new("roles")
        .about("Manage roles and their permissions")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            with_list_args(Command::new("list").about("List roles"))
                .arg(bool_arg("active", "Filter by active flag"))
                .arg(bool_arg("system", "Filter built-in roles")),
        )
        .subcommand(Command::new("get").about("Show a role").arg(id_arg()))
        .subcommand(
            with_role_args(
                Command::new("create")
                    .about("Create a role")
                    .arg(Arg::new("name").long("name").required(true))
                    .arg(Arg::new("code").long("code").required(true)),
            )
            .arg(
                Arg::new("inactive")
                    .long("inactive")
                    .help("Create the role disabled")
                    .action(ArgAction::SetTrue),
            ),
        )
        .subcommand(
            with_role_args(
                Command::new("update")
                    .about("Update a role")
                    .arg(id_arg())
                    .arg(Arg::new("name").long("name"))
                    .arg(Arg::new("code").long("code")),
            )
            .arg(bool_arg("active", "Set the active flag")),
        )
        .subcommand(Command::new("delete").about("Delete a role").arg(id_arg()))
        .subcommand(
            Command::new("permissions")
                .about("List the permissions assigned to a role")
                .arg(id_arg()),
        )
        .subcommand(
            Command::new("grant")
                .about("Add permissions to a role")
                .arg(id_arg())
                .arg(ids_arg("permission", "Permission ids").required(true)),
        )
        .subcommand(
            Command::new("revoke")
                .about("Remove permissions from a role")
                .arg(id_arg())
                .arg(ids_arg("permission", "Permission ids").required(true)),
        )
        .subcommand(
            Command::new("set-permissions")
                .about("Replace all permissions of a role; none clears them")
                .arg(id_arg())
                .arg(ids_arg("permission", "Permission ids")),
        )
}
