use clap::{Arg, Command};

#[must_use]
pub fn subcommands() -> Vec<Command> {
    vec![
        Command::new("menu")
            .about("Show the navigation menu available to the signed-in user")
            .arg(
                Arg::new("path")
                    .long("path")
                    .help("Also show the breadcrumb trail for this route"),
            ),
        Command::new("open")
            .about("Check whether a console route can be opened")
            .arg(
                Arg::new("path")
                    .help("Route path, e.g. /system/users")
                    .default_value("/"),
            ),
        Command::new("lang")
            .about("Show or set the language preference")
            .arg(Arg::new("code").help("zh-CN, en or zh-TW")),
    ]
}
