use crate::{
    cli::{
        actions::{roles::permission_table, users::page_footer, Console},
        globals::GlobalArgs,
        output::{fields, opt, yes_no},
    },
    features::{
        permissions::{client, types::PermissionListParams},
        tree,
    },
    routes::Route,
};
use anyhow::Result;

#[derive(Debug)]
pub enum PermissionCommand {
    List(PermissionListParams),
    Get { id: u64 },
    Tree,
}

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub command: PermissionCommand,
}

/// # Errors
/// Returns an error if the command fails.
pub async fn execute(args: Args) -> Result<()> {
    let mut console = Console::new(&args.globals)?;
    run(&mut console, args.command).await
}

/// # Errors
/// Returns an error if the command fails.
pub async fn run(console: &mut Console, command: PermissionCommand) -> Result<()> {
    let output = console.output();
    console.open(Route::Permissions).await?;

    match command {
        PermissionCommand::List(params) => {
            let result = client::list_permissions(console.api(), &params).await;
            let page = console.track(result)?;
            output.emit(&page, || {
                format!("{}\n\n{}", permission_table(&page.results), page_footer(&page))
            })
        }
        PermissionCommand::Get { id } => {
            let result = client::get_permission(console.api(), id).await;
            let permission = console.track(result)?;
            output.emit(&permission, || {
                fields(&[
                    ("id", permission.id.to_string()),
                    ("name", permission.name.clone()),
                    ("code", permission.code.clone()),
                    ("type", opt(permission.content_type.as_deref())),
                    ("action", opt(permission.action.as_deref())),
                    ("parent", opt(permission.parent_name.as_deref())),
                    ("description", opt(permission.description.as_deref())),
                    ("active", yes_no(permission.is_active)),
                    ("system", yes_no(permission.is_system)),
                ])
            })
        }
        PermissionCommand::Tree => {
            let result = client::permission_tree(console.api()).await;
            let roots = console.track(result)?;
            output.emit(&roots, || tree::render(&roots))
        }
    }
}
