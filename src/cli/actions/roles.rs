use crate::{
    cli::{
        actions::Console,
        globals::GlobalArgs,
        output::{fields, opt, yes_no, Table},
    },
    features::{
        auth::authz::Requirement,
        permissions::types::Permission,
        roles::{
            client,
            state::RoleStore,
            types::{CreateRoleRequest, Role, RoleListParams, UpdateRoleRequest},
        },
    },
    routes::Route,
};
use anyhow::Result;
use serde_json::json;

#[derive(Debug)]
pub enum RoleCommand {
    List(RoleListParams),
    Get { id: u64 },
    Create(CreateRoleRequest),
    Update { id: u64, request: UpdateRoleRequest },
    Delete { id: u64 },
    Permissions { id: u64 },
    Grant { id: u64, permission_ids: Vec<u64> },
    Revoke { id: u64, permission_ids: Vec<u64> },
    SetPermissions { id: u64, permission_ids: Vec<u64> },
}

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub command: RoleCommand,
}

/// # Errors
/// Returns an error if the command fails.
pub async fn execute(args: Args) -> Result<()> {
    let mut console = Console::new(&args.globals)?;
    run(&mut console, args.command).await
}

/// # Errors
/// Returns an error if the command fails.
pub async fn run(console: &mut Console, command: RoleCommand) -> Result<()> {
    let output = console.output();
    console.open(Route::Roles).await?;
    let mut store = RoleStore::new(console.api().clone());

    match command {
        RoleCommand::List(params) => {
            let result = store.fetch_roles(Some(params)).await;
            console.track(result)?;
            let state = store.state();
            let mut table = Table::new(&["ID", "NAME", "CODE", "ACTIVE", "SYSTEM", "PERMISSIONS", "USERS"]);
            for role in &state.roles {
                table.row([
                    role.id.to_string(),
                    role.name.clone(),
                    role.code.clone(),
                    yes_no(role.is_active),
                    yes_no(role.is_system),
                    opt(role.permissions_count),
                    opt(role.users_count),
                ]);
            }
            output.emit(&json!({ "results": state.roles, "count": state.total }), || {
                format!("{}\n\n{} roles", table.render(), state.total)
            })
        }
        RoleCommand::Get { id } => {
            let result = store.fetch_role(id).await.cloned();
            let role = console.track(result)?;
            output.emit(&role, || detail(&role))
        }
        RoleCommand::Create(request) => {
            console.require(&Requirement::permission("role:create"), "create roles")?;
            let result = store.create_role(&request).await;
            let role = console.track(result)?;
            output.emit(&role, || detail(&role))
        }
        RoleCommand::Update { id, request } => {
            console.require(&Requirement::permission("role:update"), "update roles")?;
            let result = store.update_role(id, &request).await;
            let role = console.track(result)?;
            output.emit(&role, || detail(&role))
        }
        RoleCommand::Delete { id } => {
            console.require(&Requirement::permission("role:delete"), "delete roles")?;
            let result = store.delete_role(id).await;
            console.track(result)?;
            output.emit(&json!({ "deleted": id }), String::new)
        }
        RoleCommand::Permissions { id } => {
            let result = client::role_permissions(console.api(), id).await;
            let permissions = console.track(result)?;
            output.emit(&permissions, || permission_table(&permissions))
        }
        RoleCommand::Grant { id, permission_ids } => {
            console.require(&Requirement::permission("role:update"), "assign permissions")?;
            let result = client::add_role_permissions(console.api(), id, &permission_ids).await;
            let added = console.track(result)?;
            output.emit(&json!({ "added_count": added }), || {
                format!("Added {added} permission(s) to role {id}")
            })
        }
        RoleCommand::Revoke { id, permission_ids } => {
            console.require(&Requirement::permission("role:update"), "assign permissions")?;
            let result = client::remove_role_permissions(console.api(), id, &permission_ids).await;
            let removed = console.track(result)?;
            output.emit(&json!({ "removed_count": removed }), || {
                format!("Removed {removed} permission(s) from role {id}")
            })
        }
        RoleCommand::SetPermissions { id, permission_ids } => {
            console.require(&Requirement::permission("role:update"), "assign permissions")?;
            let result =
                client::replace_role_permissions(console.api(), id, &permission_ids).await;
            let counts = console.track(result)?;
            output.emit(&counts, || {
                format!(
                    "Role {id} now has {} permission(s) (was {})",
                    counts.new_count, counts.old_count
                )
            })
        }
    }
}

fn detail(role: &Role) -> String {
    let mut text = fields(&[
        ("id", role.id.to_string()),
        ("name", role.name.clone()),
        ("code", role.code.clone()),
        ("description", opt(role.description.as_deref())),
        ("sort order", role.sort_order.to_string()),
        ("active", yes_no(role.is_active)),
        ("system", yes_no(role.is_system)),
        ("created", opt(role.created_at.as_deref())),
        ("updated", opt(role.updated_at.as_deref())),
    ]);
    if let Some(permissions) = role.permissions.as_deref().filter(|p| !p.is_empty()) {
        text.push_str("\n\n");
        text.push_str(&permission_table(permissions));
    }
    text
}

pub(crate) fn permission_table(permissions: &[Permission]) -> String {
    let mut table = Table::new(&["ID", "CODE", "NAME", "ACTIVE"]);
    for permission in permissions {
        table.row([
            permission.id.to_string(),
            permission.code.clone(),
            permission.name.clone(),
            yes_no(permission.is_active),
        ]);
    }
    table.render()
}
