use crate::{
    cli::{
        actions::Console,
        globals::GlobalArgs,
        output::{fields, opt, yes_no},
    },
    features::auth::{
        client,
        types::{CurrentUser, LoginRequest, RegisterRequest},
    },
    routes::Route,
};
use anyhow::{bail, Result};
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;

#[derive(Debug)]
pub enum AuthCommand {
    Login {
        username: String,
        password: SecretString,
        captcha: Option<String>,
    },
    Register {
        username: String,
        password: SecretString,
        password_confirm: SecretString,
        email: Option<String>,
    },
    Logout,
    WhoAmI,
    Refresh,
    Captcha,
}

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub command: AuthCommand,
}

/// # Errors
/// Returns an error if the command fails.
pub async fn execute(args: Args) -> Result<()> {
    let mut console = Console::new(&args.globals)?;
    run(&mut console, args.command).await
}

/// # Errors
/// Returns an error if the command fails.
pub async fn run(console: &mut Console, command: AuthCommand) -> Result<()> {
    let output = console.output();

    match command {
        AuthCommand::Login {
            username,
            password,
            captcha,
        } => {
            console.open(Route::Login).await?;
            let request = LoginRequest {
                username,
                password: password.expose_secret().to_string(),
                captcha,
            };
            let result = console.session_mut().login(&request).await.cloned();
            let user = console.track(result)?;
            output.emit(&user, || signed_in_summary(&user))
        }
        AuthCommand::Register {
            username,
            password,
            password_confirm,
            email,
        } => {
            console.open(Route::Register).await?;
            let request = RegisterRequest {
                username,
                password: password.expose_secret().to_string(),
                password_confirm: password_confirm.expose_secret().to_string(),
                email,
            };
            let result = console.session_mut().register(&request).await.cloned();
            let user = console.track(result)?;
            output.emit(&user, || signed_in_summary(&user))
        }
        AuthCommand::Logout => {
            let was_signed_in = console.session().state().refresh.is_some();
            console.session_mut().logout().await?;
            output.emit(&json!({ "signed_out": was_signed_in }), || {
                if was_signed_in {
                    "Signed out".to_string()
                } else {
                    "No stored session".to_string()
                }
            })
        }
        AuthCommand::WhoAmI => {
            console.open(Route::Dashboard).await?;
            let Some(user) = console.session().user().cloned() else {
                bail!("Not signed in. Run `rbac-console login` first.");
            };
            let session = console.session().state();
            let permissions: Vec<&String> = session.permissions.iter().collect();
            let roles: Vec<&String> = session.roles.iter().collect();
            output.emit(&user, || {
                let mut pairs = profile_fields(&user);
                pairs.push(("roles", join_or_dash(&roles)));
                pairs.push(("permissions", join_or_dash(&permissions)));
                fields(&pairs)
            })
        }
        AuthCommand::Refresh => {
            let result = console.session_mut().refresh().await;
            console.track(result)?;
            output.emit(&json!({ "refreshed": true }), || {
                "Access token refreshed".to_string()
            })
        }
        AuthCommand::Captcha => {
            let result = client::captcha(console.api()).await;
            let captcha = console.track(result)?;
            output.emit(&captcha, || {
                fields(&[
                    ("key", captcha.key.clone()),
                    ("image", format!("{} bytes (data URL)", captcha.image.len())),
                ])
            })
        }
    }
}

fn signed_in_summary(user: &CurrentUser) -> String {
    let roles = user.roles.clone().unwrap_or_default();
    if roles.is_empty() {
        format!("Signed in as {}", user.user.username)
    } else {
        format!("Signed in as {} ({})", user.user.username, roles.join(", "))
    }
}

pub(crate) fn profile_fields(user: &CurrentUser) -> Vec<(&'static str, String)> {
    let item = &user.user;
    let department = item.profile.as_ref().and_then(|p| p.department);
    let position = item.profile.as_ref().and_then(|p| p.position.clone());
    vec![
        ("id", item.id.to_string()),
        ("username", item.username.clone()),
        ("name", item.display_name()),
        ("email", item.email.clone()),
        ("phone", opt(item.phone.as_deref())),
        ("active", yes_no(item.is_active)),
        ("staff", yes_no(item.is_staff)),
        ("department", opt(department)),
        ("position", opt(position)),
        ("last login", opt(item.last_login.as_deref())),
        ("joined", item.date_joined.clone()),
    ]
}

fn join_or_dash(items: &[&String]) -> String {
    if items.is_empty() {
        "-".to_string()
    } else {
        items
            .iter()
            .map(|item| item.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
