use crate::{
    app_lib::{Notice, Page},
    cli::{
        actions::{auth::profile_fields, Console},
        globals::GlobalArgs,
        output::{fields, opt, yes_no, Table},
    },
    features::{
        auth::authz::Requirement,
        users::{
            client,
            types::{CreateUserRequest, UpdateUserRequest, UserDetail, UserListItem, UserListParams},
        },
    },
    routes::Route,
};
use anyhow::Result;
use serde_json::json;
use std::path::PathBuf;

#[derive(Debug)]
pub enum UserCommand {
    List(UserListParams),
    Get { id: u64 },
    Create(CreateUserRequest),
    Update {
        id: u64,
        request: UpdateUserRequest,
        replace: bool,
    },
    Delete { id: u64 },
    ToggleActive { id: u64 },
    Me,
    UpdateMe(UpdateUserRequest),
    Avatar { file: PathBuf },
}

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub command: UserCommand,
}

/// # Errors
/// Returns an error if the command fails.
pub async fn execute(args: Args) -> Result<()> {
    let mut console = Console::new(&args.globals)?;
    run(&mut console, args.command).await
}

/// # Errors
/// Returns an error if the command fails.
pub async fn run(console: &mut Console, command: UserCommand) -> Result<()> {
    let output = console.output();

    match command {
        UserCommand::List(params) => {
            console.open(Route::Users).await?;
            let result = client::list_users(console.api(), &params).await;
            let page = console.track(result)?;
            output.emit(&page, || user_table(&page))
        }
        UserCommand::Get { id } => {
            console.open(Route::Users).await?;
            let result = client::get_user(console.api(), id).await;
            let user = console.track(result)?;
            output.emit(&user, || detail(&user))
        }
        UserCommand::Create(request) => {
            console.open(Route::Users).await?;
            console.require(&Requirement::permission("user:create"), "create users")?;
            let result = client::create_user(console.api(), &request).await;
            let user = console.track(result)?;
            console.api().notify(Notice::success("User created"));
            output.emit(&user, || detail(&user))
        }
        UserCommand::Update {
            id,
            request,
            replace,
        } => {
            console.open(Route::Users).await?;
            console.require(&Requirement::permission("user:update"), "update users")?;
            let result = if replace {
                client::update_user(console.api(), id, &request).await
            } else {
                client::patch_user(console.api(), id, &request).await
            };
            let user = console.track(result)?;
            console.api().notify(Notice::success("User updated"));
            output.emit(&user, || detail(&user))
        }
        UserCommand::Delete { id } => {
            console.open(Route::Users).await?;
            console.require(&Requirement::permission("user:delete"), "delete users")?;
            let result = client::delete_user(console.api(), id).await;
            console.track(result)?;
            console.api().notify(Notice::success("User deleted"));
            output.emit(&json!({ "deleted": id }), String::new)
        }
        UserCommand::ToggleActive { id } => {
            console.open(Route::Users).await?;
            console.require(&Requirement::permission("user:update"), "update users")?;
            let result = client::toggle_user_active(console.api(), id).await;
            let is_active = console.track(result)?;
            output.emit(&json!({ "id": id, "is_active": is_active }), || {
                if is_active {
                    format!("User {id} enabled")
                } else {
                    format!("User {id} disabled")
                }
            })
        }
        UserCommand::Me => {
            console.open(Route::Dashboard).await?;
            let result = client::current_user(console.api()).await;
            let user = console.track(result)?;
            output.emit(&user, || detail(&user))
        }
        UserCommand::UpdateMe(request) => {
            console.open(Route::Dashboard).await?;
            let result = client::update_current_user(console.api(), &request).await;
            let user = console.track(result)?;
            console.api().notify(Notice::success("Profile updated"));
            output.emit(&user, || detail(&user))
        }
        UserCommand::Avatar { file } => {
            console.open(Route::Dashboard).await?;
            let result = client::upload_avatar(console.api(), &file).await;
            let avatar = console.track(result)?;
            console.api().notify(Notice::success("Avatar uploaded"));
            output.emit(&json!({ "avatar": avatar }), || avatar.clone())
        }
    }
}

fn user_table(page: &Page<UserListItem>) -> String {
    let mut table = Table::new(&["ID", "USERNAME", "NAME", "EMAIL", "ACTIVE", "STAFF", "LAST LOGIN"]);
    for user in &page.results {
        table.row([
            user.id.to_string(),
            user.username.clone(),
            user.display_name(),
            user.email.clone(),
            yes_no(user.is_active),
            yes_no(user.is_staff),
            opt(user.last_login.as_deref()),
        ]);
    }
    format!("{}\n\n{}", table.render(), page_footer(page))
}

fn detail(user: &UserDetail) -> String {
    let mut pairs = profile_fields(user);
    if let Some(roles) = &user.roles {
        pairs.push(("roles", roles.join(", ")));
    }
    fields(&pairs)
}

pub(crate) fn page_footer<T>(page: &Page<T>) -> String {
    let shown = page.results.len();
    match (page.page, page.pages) {
        (Some(current), Some(pages)) => {
            format!("{shown} of {} (page {current}/{pages})", page.count)
        }
        _ => format!("{shown} of {}", page.count),
    }
}
