use crate::{
    app_lib::Notice,
    cli::{
        actions::{users::page_footer, Console},
        globals::GlobalArgs,
        output::{fields, opt, yes_no, Table},
    },
    features::{
        auth::authz::Requirement,
        departments::{
            client,
            types::{CreateDepartmentRequest, Department, DepartmentListParams, UpdateDepartmentRequest},
        },
        tree,
    },
    routes::Route,
};
use anyhow::Result;
use serde_json::json;

#[derive(Debug)]
pub enum DepartmentCommand {
    List(DepartmentListParams),
    Get { id: u64 },
    Create(CreateDepartmentRequest),
    Update {
        id: u64,
        request: UpdateDepartmentRequest,
    },
    Delete { id: u64 },
    Tree,
}

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub command: DepartmentCommand,
}

/// # Errors
/// Returns an error if the command fails.
pub async fn execute(args: Args) -> Result<()> {
    let mut console = Console::new(&args.globals)?;
    run(&mut console, args.command).await
}

/// # Errors
/// Returns an error if the command fails.
pub async fn run(console: &mut Console, command: DepartmentCommand) -> Result<()> {
    let output = console.output();
    console.open(Route::Departments).await?;

    match command {
        DepartmentCommand::List(params) => {
            let result = client::list_departments(console.api(), &params).await;
            let page = console.track(result)?;
            output.emit(&page, || {
                let mut table = Table::new(&["ID", "NAME", "CODE", "PARENT", "LEVEL", "MANAGER", "ACTIVE"]);
                for department in &page.results {
                    table.row([
                        department.id.to_string(),
                        department.name.clone(),
                        opt(department.code.as_deref()),
                        opt(department.parent_name.as_deref()),
                        department.level.to_string(),
                        opt(department.manager_name.as_deref()),
                        yes_no(department.is_active),
                    ]);
                }
                format!("{}\n\n{}", table.render(), page_footer(&page))
            })
        }
        DepartmentCommand::Get { id } => {
            let result = client::get_department(console.api(), id).await;
            let department = console.track(result)?;
            output.emit(&department, || detail(&department))
        }
        DepartmentCommand::Create(request) => {
            console.require(
                &Requirement::permission("department:create"),
                "create departments",
            )?;
            let result = client::create_department(console.api(), &request).await;
            let department = console.track(result)?;
            console.api().notify(Notice::success("Department created"));
            output.emit(&department, || detail(&department))
        }
        DepartmentCommand::Update { id, request } => {
            console.require(
                &Requirement::permission("department:update"),
                "update departments",
            )?;
            let result = client::patch_department(console.api(), id, &request).await;
            let department = console.track(result)?;
            console.api().notify(Notice::success("Department updated"));
            output.emit(&department, || detail(&department))
        }
        DepartmentCommand::Delete { id } => {
            console.require(
                &Requirement::permission("department:delete"),
                "delete departments",
            )?;
            let result = client::delete_department(console.api(), id).await;
            console.track(result)?;
            console.api().notify(Notice::success("Department deleted"));
            output.emit(&json!({ "deleted": id }), String::new)
        }
        DepartmentCommand::Tree => {
            let result = client::department_tree(console.api()).await;
            let roots = console.track(result)?;
            output.emit(&roots, || tree::render(&roots))
        }
    }
}

fn detail(department: &Department) -> String {
    fields(&[
        ("id", department.id.to_string()),
        ("name", department.name.clone()),
        ("code", opt(department.code.as_deref())),
        ("parent", opt(department.parent_name.as_deref())),
        ("level", department.level.to_string()),
        ("path", opt(department.path.as_deref())),
        ("manager", opt(department.manager_name.as_deref())),
        ("description", opt(department.description.as_deref())),
        ("sort order", department.sort_order.to_string()),
        ("active", yes_no(department.is_active)),
        ("children", opt(department.children_count)),
    ])
}
