use clap::{Arg, Command};

#[must_use]
pub fn subcommands() -> Vec<Command> {
    vec![
        Command::new("login")
            .about("Sign in and store the session")
            .arg(
                Arg::new("username")
                    .short('u')
                    .long("username")
                    .help("Account username")
                    .env("RBAC_CONSOLE_USERNAME")
                    .required(true),
            )
            .arg(
                Arg::new("password")
                    .short('p')
                    .long("password")
                    .help("Account password")
                    .env("RBAC_CONSOLE_PASSWORD")
                    .hide_env_values(true)
                    .required(true),
            )
            .arg(
                Arg::new("captcha")
                    .long("captcha")
                    .help("Captcha answer, when the backend asks for one"),
            ),
        Command::new("register")
            .about("Create an account and sign in")
            .arg(
                Arg::new("username")
                    .short('u')
                    .long("username")
                    .help("Account username")
                    .required(true),
            )
            .arg(
                Arg::new("password")
                    .short('p')
                    .long("password")
                    .help("Account password")
                    .env("RBAC_CONSOLE_PASSWORD")
                    .hide_env_values(true)
                    .required(true),
            )
            .arg(
                Arg::new("password-confirm")
                    .long("password-confirm")
                    .help("Repeat the password")
                    .required(true),
            )
            .arg(Arg::new("email").long("email").help("Email address")),
        Command::new("logout").about("Sign out and forget the stored session"),
        Command::new("whoami").about("Show the signed-in user, roles and permissions"),
        Command::new("refresh").about("Exchange the refresh token for a new access token"),
        Command::new("captcha").about("Fetch a captcha challenge"),
    ]
}
