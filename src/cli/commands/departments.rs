use super::{bool_arg, id_arg, with_list_args};
use clap::{Arg, ArgAction, Command};

fn with_department_args(command: Command) -> Command {
    command
        .arg(Arg::new("code").long("code").help("Department code"))
        .arg(
            Arg::new("parent")
                .long("parent")
                .help("Parent department id")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new("manager")
                .long("manager")
                .help("Manager user id")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(Arg::new("description").long("description").help("Description"))
        .arg(
            Arg::new("sort-order")
                .long("sort-order")
                .help("Position among siblings")
                .value_parser(clap::value_parser!(i32)),
        )
}

#[must_use]
pub fn command() -> Command {
    Command::new("departments")
        .about("Manage departments")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            with_list_args(Command::new("list").about("List departments"))
                .arg(
                    Arg::new("parent")
                        .long("parent")
                        .help("Filter by parent id")
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(
                    Arg::new("level")
                        .long("level")
                        .help("Filter by depth")
                        .value_parser(clap::value_parser!(u32)),
                )
                .arg(bool_arg("active", "Filter by active flag")),
        )
        .subcommand(Command::new("get").about("Show a department").arg(id_arg()))
        .subcommand(with_department_args(
            Command::new("create")
                .about("Create a department")
                .arg(Arg::new("name").long("name").required(true)),
        ))
        .subcommand(
            with_department_args(
                Command::new("update")
                    .about("Update a department")
                    .arg(id_arg())
                    .arg(Arg::new("name").long("name")),
            )
            .arg(
                Arg::new("root")
                    .long("root")
                    .help("Move the department to the top level")
                    .action(ArgAction::SetTrue)
                    .conflicts_with("parent"),
            )
            .arg(bool_arg("active", "Set the active flag")),
        )
        .subcommand(
            Command::new("delete")
                .about("Delete a department")
                .arg(id_arg()),
        )
        .subcommand(Command::new("tree").about("Show the department hierarchy"))
}
