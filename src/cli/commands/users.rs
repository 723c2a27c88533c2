use super::{bool_arg, id_arg, with_list_args};
use clap::{Arg, ArgAction, Command};

fn with_profile_args(command: Command) -> Command {
    command
        .arg(Arg::new("email").long("email").help("Email address"))
        .arg(Arg::new("phone").long("phone").help("Phone number"))
        .arg(Arg::new("first-name").long("first-name").help("First name"))
        .arg(Arg::new("last-name").long("last-name").help("Last name"))
}

#[must_use]
pub fn command() -> Command {
    Command::new("users")
        .about("Manage users")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            with_list_args(Command::new("list").about("List users"))
                .arg(bool_arg("active", "Filter by active flag"))
                .arg(bool_arg("staff", "Filter by staff flag"))
                .arg(
                    Arg::new("department")
                        .long("department")
                        .help("Filter by department id")
                        .value_parser(clap::value_parser!(u64)),
                ),
        )
        .subcommand(Command::new("get").about("Show a user").arg(id_arg()))
        .subcommand(
            with_profile_args(
                Command::new("create")
                    .about("Create a user")
                    .arg(
                        Arg::new("username")
                            .short('u')
                            .long("username")
                            .required(true),
                    )
                    .arg(
                        Arg::new("password")
                            .short('p')
                            .long("password")
                            .required(true),
                    )
                    .arg(
                        Arg::new("password-confirm")
                            .long("password-confirm")
                            .required(true),
                    ),
            )
            .mut_arg("email", |arg| arg.required(true))
            .arg(
                Arg::new("inactive")
                    .long("inactive")
                    .help("Create the account disabled")
                    .action(ArgAction::SetTrue),
            )
            .arg(
                Arg::new("staff")
                    .long("staff")
                    .help("Grant staff status")
                    .action(ArgAction::SetTrue),
            ),
        )
        .subcommand(
            with_profile_args(Command::new("update").about("Update a user").arg(id_arg()))
                .arg(bool_arg("active", "Set the active flag"))
                .arg(bool_arg("staff", "Set the staff flag"))
                .arg(
                    Arg::new("replace")
                        .long("replace")
                        .help("Send a full update (PUT) instead of a partial one")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(Command::new("delete").about("Delete a user").arg(id_arg()))
        .subcommand(
            Command::new("toggle-active")
                .about("Enable or disable a user")
                .arg(id_arg()),
        )
        .subcommand(Command::new("me").about("Show your own profile"))
        .subcommand(with_profile_args(
            Command::new("update-me").about("Update your own profile"),
        ))
        .subcommand(
            Command::new("avatar")
                .about("Upload an avatar image for your account")
                .arg(Arg::new("file").help("Image file").required(true)),
        )
}
