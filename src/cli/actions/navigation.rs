use crate::{
    cli::{actions::Console, globals::GlobalArgs, output::Table},
    features::{auth::guards::GuardOutcome, i18n},
    routes::{
        menu::{breadcrumbs, menu_config, visible_menu, VisibleItem},
        Route,
    },
};
use anyhow::Result;
use serde_json::json;

#[derive(Debug)]
pub enum NavigationCommand {
    Menu { path: Option<String> },
    Open { path: String },
    Language { code: Option<String> },
}

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub command: NavigationCommand,
}

/// # Errors
/// Returns an error if the command fails.
pub async fn execute(args: Args) -> Result<()> {
    let mut console = Console::new(&args.globals)?;
    run(&mut console, args.command).await
}

/// # Errors
/// Returns an error if the command fails.
pub async fn run(console: &mut Console, command: NavigationCommand) -> Result<()> {
    let output = console.output();
    let language = console.api().language();

    match command {
        NavigationCommand::Menu { path } => {
            console.open(Route::Dashboard).await?;
            let config = menu_config();
            let menu = visible_menu(&config, &console.session().grants(), &language);
            let trail = path
                .as_deref()
                .map(|path| breadcrumbs(&config, path, &language))
                .unwrap_or_default();

            output.emit(&json!({ "menu": menu, "breadcrumbs": trail }), || {
                let mut lines = Vec::new();
                render_menu(&menu, 0, &mut lines);
                if !trail.is_empty() {
                    let titles: Vec<&str> = trail.iter().map(|crumb| crumb.title.as_str()).collect();
                    lines.push(String::new());
                    lines.push(titles.join(" / "));
                }
                lines.join("\n")
            })
        }
        NavigationCommand::Open { path } => {
            let route = Route::from_path(&path);
            if !console.session().state().is_initialized {
                console.session_mut().restore().await;
            }
            let outcome = console.session().check(&route.guard(), route.path());
            let (status, target) = match &outcome {
                GuardOutcome::Allow => ("allow", route.path().to_string()),
                GuardOutcome::RedirectLogin { from } => {
                    ("redirect", format!("{}?from={from}", Route::Login.path()))
                }
                GuardOutcome::Forbidden => ("forbidden", Route::Forbidden.path().to_string()),
                GuardOutcome::Pending(message) => ("pending", (*message).to_string()),
            };
            output.emit(
                &json!({ "route": route.path(), "outcome": status, "target": target }),
                || format!("{}: {status} -> {target}", route.path()),
            )
        }
        NavigationCommand::Language { code } => match code {
            Some(code) => {
                let language = i18n::set_language(console.api().storage().as_ref(), &code)?;
                output.emit(&json!({ "language": language }), || {
                    format!("Language set to {language}")
                })
            }
            None => {
                let mut table = Table::new(&["", "CODE", "LANGUAGE"]);
                for (label, code) in i18n::LANGUAGES {
                    let marker = if code == language { "*" } else { "" };
                    table.row([marker, code, label]);
                }
                output.emit(&json!({ "language": language }), || table.render())
            }
        },
    }
}

fn render_menu(items: &[VisibleItem], depth: usize, lines: &mut Vec<String>) {
    for item in items {
        lines.push(format!("{}{}  {}", "  ".repeat(depth), item.label, item.path));
        render_menu(&item.children, depth + 1, lines);
    }
}
