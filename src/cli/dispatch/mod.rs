use crate::{
    app_lib::config::ConfigOverrides,
    cli::{
        actions::{
            auth::{self, AuthCommand},
            departments::{self, DepartmentCommand},
            navigation::{self, NavigationCommand},
            permissions::{self, PermissionCommand},
            roles::{self, RoleCommand},
            users::{self, UserCommand},
            Action,
        },
        commands::config,
        globals::GlobalArgs,
    },
    features::{
        departments::types::{CreateDepartmentRequest, DepartmentListParams, UpdateDepartmentRequest},
        permissions::types::PermissionListParams,
        roles::types::{CreateRoleRequest, RoleListParams, UpdateRoleRequest},
        users::types::{CreateUserRequest, UpdateUserRequest, UserListParams},
    },
};
use anyhow::{anyhow, Context, Result};
use clap::ArgMatches;
use secrecy::SecretString;
use std::path::PathBuf;

/// Maps parsed arguments to an [`Action`].
///
/// # Errors
/// Returns an error if a subcommand or a required argument is missing.
pub fn handler(matches: &ArgMatches) -> Result<Action> {
    let globals = global_args(matches);

    let (name, sub_m) = matches
        .subcommand()
        .context("no subcommand given, see --help")?;

    match name {
        "login" | "register" | "logout" | "whoami" | "refresh" | "captcha" => {
            Ok(Action::Auth(auth::Args {
                globals,
                command: auth_command(name, sub_m)?,
            }))
        }
        "menu" | "open" | "lang" => Ok(Action::Navigation(navigation::Args {
            globals,
            command: navigation_command(name, sub_m),
        })),
        "users" => Ok(Action::Users(users::Args {
            globals,
            command: user_command(sub_m)?,
        })),
        "roles" => Ok(Action::Roles(roles::Args {
            globals,
            command: role_command(sub_m)?,
        })),
        "departments" => Ok(Action::Departments(departments::Args {
            globals,
            command: department_command(sub_m)?,
        })),
        "permissions" => Ok(Action::Permissions(permissions::Args {
            globals,
            command: permission_command(sub_m)?,
        })),
        other => Err(anyhow!("unknown command: {other}")),
    }
}

fn global_args(matches: &ArgMatches) -> GlobalArgs {
    GlobalArgs::new(
        ConfigOverrides {
            api_base_url: string(matches, config::ARG_API_URL),
            language: string(matches, config::ARG_LANGUAGE),
            timeout_secs: matches.get_one::<u64>(config::ARG_TIMEOUT).copied(),
            session_file: string(matches, config::ARG_SESSION_FILE),
            ephemeral: matches.get_flag(config::ARG_EPHEMERAL),
        },
        matches.get_flag(config::ARG_JSON),
    )
}

fn auth_command(name: &str, sub_m: &ArgMatches) -> Result<AuthCommand> {
    Ok(match name {
        "login" => AuthCommand::Login {
            username: required(sub_m, "username")?,
            password: secret(sub_m, "password")?,
            captcha: string(sub_m, "captcha"),
        },
        "register" => AuthCommand::Register {
            username: required(sub_m, "username")?,
            password: secret(sub_m, "password")?,
            password_confirm: secret(sub_m, "password-confirm")?,
            email: string(sub_m, "email"),
        },
        "logout" => AuthCommand::Logout,
        "whoami" => AuthCommand::WhoAmI,
        "refresh" => AuthCommand::Refresh,
        _ => AuthCommand::Captcha,
    })
}

fn navigation_command(name: &str, sub_m: &ArgMatches) -> NavigationCommand {
    match name {
        "menu" => NavigationCommand::Menu {
            path: string(sub_m, "path"),
        },
        "open" => NavigationCommand::Open {
            path: string(sub_m, "path").unwrap_or_else(|| "/".to_string()),
        },
        _ => NavigationCommand::Language {
            code: string(sub_m, "code"),
        },
    }
}

fn user_command(matches: &ArgMatches) -> Result<UserCommand> {
    let (name, sub_m) = nested(matches, "users")?;
    Ok(match name {
        "list" => UserCommand::List(UserListParams {
            page: sub_m.get_one::<u32>("page").copied(),
            page_size: sub_m.get_one::<u32>("page-size").copied(),
            search: string(sub_m, "search"),
            is_active: sub_m.get_one::<bool>("active").copied(),
            is_staff: sub_m.get_one::<bool>("staff").copied(),
            department: sub_m.get_one::<u64>("department").copied(),
            ordering: string(sub_m, "ordering"),
        }),
        "get" => UserCommand::Get { id: id(sub_m)? },
        "create" => UserCommand::Create(CreateUserRequest {
            username: required(sub_m, "username")?,
            email: required(sub_m, "email")?,
            password: required(sub_m, "password")?,
            password_confirm: required(sub_m, "password-confirm")?,
            phone: string(sub_m, "phone"),
            first_name: string(sub_m, "first-name"),
            last_name: string(sub_m, "last-name"),
            is_active: sub_m.get_flag("inactive").then_some(false),
            is_staff: sub_m.get_flag("staff").then_some(true),
            profile: None,
        }),
        "update" => UserCommand::Update {
            id: id(sub_m)?,
            request: UpdateUserRequest {
                is_active: sub_m.get_one::<bool>("active").copied(),
                is_staff: sub_m.get_one::<bool>("staff").copied(),
                ..profile_update(sub_m)
            },
            replace: sub_m.get_flag("replace"),
        },
        "delete" => UserCommand::Delete { id: id(sub_m)? },
        "toggle-active" => UserCommand::ToggleActive { id: id(sub_m)? },
        "me" => UserCommand::Me,
        "update-me" => UserCommand::UpdateMe(profile_update(sub_m)),
        "avatar" => UserCommand::Avatar {
            file: PathBuf::from(required(sub_m, "file")?),
        },
        other => return Err(anyhow!("unknown users command: {other}")),
    })
}

fn profile_update(sub_m: &ArgMatches) -> UpdateUserRequest {
    UpdateUserRequest {
        email: string(sub_m, "email"),
        phone: string(sub_m, "phone"),
        first_name: string(sub_m, "first-name"),
        last_name: string(sub_m, "last-name"),
        ..UpdateUserRequest::default()
    }
}

fn role_command(matches: &ArgMatches) -> Result<RoleCommand> {
    let (name, sub_m) = nested(matches, "roles")?;
    Ok(match name {
        "list" => RoleCommand::List(RoleListParams {
            page: sub_m.get_one::<u32>("page").copied(),
            page_size: sub_m.get_one::<u32>("page-size").copied(),
            search: string(sub_m, "search"),
            is_active: sub_m.get_one::<bool>("active").copied(),
            is_system: sub_m.get_one::<bool>("system").copied(),
            ordering: string(sub_m, "ordering"),
        }),
        "get" => RoleCommand::Get { id: id(sub_m)? },
        "create" => RoleCommand::Create(CreateRoleRequest {
            name: required(sub_m, "name")?,
            code: required(sub_m, "code")?,
            description: string(sub_m, "description"),
            sort_order: sub_m.get_one::<i32>("sort-order").copied(),
            is_active: sub_m.get_flag("inactive").then_some(false),
            permission_ids: optional_ids(sub_m, "permission"),
        }),
        "update" => RoleCommand::Update {
            id: id(sub_m)?,
            request: UpdateRoleRequest {
                name: string(sub_m, "name"),
                code: string(sub_m, "code"),
                description: string(sub_m, "description"),
                sort_order: sub_m.get_one::<i32>("sort-order").copied(),
                is_active: sub_m.get_one::<bool>("active").copied(),
                permission_ids: optional_ids(sub_m, "permission"),
            },
        },
        "delete" => RoleCommand::Delete { id: id(sub_m)? },
        "permissions" => RoleCommand::Permissions { id: id(sub_m)? },
        "grant" => RoleCommand::Grant {
            id: id(sub_m)?,
            permission_ids: ids(sub_m, "permission"),
        },
        "revoke" => RoleCommand::Revoke {
            id: id(sub_m)?,
            permission_ids: ids(sub_m, "permission"),
        },
        "set-permissions" => RoleCommand::SetPermissions {
            id: id(sub_m)?,
            permission_ids: ids(sub_m, "permission"),
        },
        other => return Err(anyhow!("unknown roles command: {other}")),
    })
}

fn department_command(matches: &ArgMatches) -> Result<DepartmentCommand> {
    let (name, sub_m) = nested(matches, "departments")?;
    Ok(match name {
        "list" => DepartmentCommand::List(DepartmentListParams {
            page: sub_m.get_one::<u32>("page").copied(),
            page_size: sub_m.get_one::<u32>("page-size").copied(),
            search: string(sub_m, "search"),
            parent: sub_m.get_one::<u64>("parent").copied(),
            level: sub_m.get_one::<u32>("level").copied(),
            is_active: sub_m.get_one::<bool>("active").copied(),
            ordering: string(sub_m, "ordering"),
        }),
        "get" => DepartmentCommand::Get { id: id(sub_m)? },
        "create" => DepartmentCommand::Create(CreateDepartmentRequest {
            name: required(sub_m, "name")?,
            code: string(sub_m, "code"),
            parent: sub_m.get_one::<u64>("parent").copied(),
            manager: sub_m.get_one::<u64>("manager").copied(),
            description: string(sub_m, "description"),
            sort_order: sub_m.get_one::<i32>("sort-order").copied(),
            is_active: None,
        }),
        "update" => {
            // `--root` clears the parent; a missing `--parent` leaves it alone.
            let parent = if sub_m.get_flag("root") {
                Some(None)
            } else {
                sub_m.get_one::<u64>("parent").copied().map(Some)
            };
            DepartmentCommand::Update {
                id: id(sub_m)?,
                request: UpdateDepartmentRequest {
                    name: string(sub_m, "name"),
                    code: string(sub_m, "code"),
                    parent,
                    manager: sub_m.get_one::<u64>("manager").copied().map(Some),
                    description: string(sub_m, "description"),
                    sort_order: sub_m.get_one::<i32>("sort-order").copied(),
                    is_active: sub_m.get_one::<bool>("active").copied(),
                },
            }
        }
        "delete" => DepartmentCommand::Delete { id: id(sub_m)? },
        "tree" => DepartmentCommand::Tree,
        other => return Err(anyhow!("unknown departments command: {other}")),
    })
}

fn permission_command(matches: &ArgMatches) -> Result<PermissionCommand> {
    let (name, sub_m) = nested(matches, "permissions")?;
    Ok(match name {
        "list" => PermissionCommand::List(PermissionListParams {
            page: sub_m.get_one::<u32>("page").copied(),
            page_size: sub_m.get_one::<u32>("page-size").copied(),
            search: string(sub_m, "search"),
            content_type: string(sub_m, "content-type"),
            action: string(sub_m, "action"),
            parent: sub_m.get_one::<u64>("parent").copied(),
            ordering: string(sub_m, "ordering"),
        }),
        "get" => PermissionCommand::Get { id: id(sub_m)? },
        "tree" => PermissionCommand::Tree,
        other => return Err(anyhow!("unknown permissions command: {other}")),
    })
}

fn nested<'a>(matches: &'a ArgMatches, parent: &str) -> Result<(&'a str, &'a ArgMatches)> {
    matches
        .subcommand()
        .with_context(|| format!("missing {parent} subcommand"))
}

fn string(matches: &ArgMatches, name: &str) -> Option<String> {
    matches.get_one::<String>(name).cloned()
}

fn required(matches: &ArgMatches, name: &str) -> Result<String> {
    string(matches, name).ok_or_else(|| anyhow!("missing required argument: --{name}"))
}

fn secret(matches: &ArgMatches, name: &str) -> Result<SecretString> {
    required(matches, name).map(SecretString::from)
}

fn id(matches: &ArgMatches) -> Result<u64> {
    matches
        .get_one::<u64>("id")
        .copied()
        .context("missing required argument: <id>")
}

fn ids(matches: &ArgMatches, name: &str) -> Vec<u64> {
    matches
        .get_many::<u64>(name)
        .map(|values| values.copied().collect())
        .unwrap_or_default()
}

fn optional_ids(matches: &ArgMatches, name: &str) -> Option<Vec<u64>> {
    matches
        .get_many::<u64>(name)
        .map(|values| values.copied().collect())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cli::commands;
    use secrecy::ExposeSecret;

    fn action(args: &[&str]) -> Action {
        let matches = commands::new().get_matches_from(args);
        handler(&matches).unwrap()
    }

    #[test]
    fn test_login_action() {
        temp_env::with_vars(
            [
                ("RBAC_CONSOLE_USERNAME", None::<&str>),
                ("RBAC_CONSOLE_PASSWORD", None),
                ("RBAC_CONSOLE_API_URL", None),
            ],
            || {
                let action = action(&[
                    "rbac-console",
                    "login",
                    "-u",
                    "admin",
                    "-p",
                    "admin123",
                    "--ephemeral",
                ]);
                let Action::Auth(args) = action else {
                    panic!("expected auth action");
                };
                assert!(args.globals.config.ephemeral);
                match args.command {
                    AuthCommand::Login {
                        username,
                        password,
                        captcha,
                    } => {
                        assert_eq!(username, "admin");
                        assert_eq!(password.expose_secret(), "admin123");
                        assert!(captcha.is_none());
                    }
                    other => panic!("unexpected command {other:?}"),
                }
            },
        );
    }

    #[test]
    fn test_global_overrides() {
        temp_env::with_vars(
            [
                ("RBAC_CONSOLE_API_URL", None::<&str>),
                ("RBAC_CONSOLE_LANGUAGE", None),
                ("RBAC_CONSOLE_TIMEOUT", None),
                ("RBAC_CONSOLE_SESSION_FILE", None),
            ],
            || {
                let action = action(&[
                    "rbac-console",
                    "whoami",
                    "--api-url",
                    "http://127.0.0.1:9000/api/v1",
                    "--language",
                    "en",
                    "--timeout",
                    "3",
                    "--json",
                ]);
                let Action::Auth(args) = action else {
                    panic!("expected auth action");
                };
                assert!(args.globals.json);
                assert_eq!(
                    args.globals.config.api_base_url.as_deref(),
                    Some("http://127.0.0.1:9000/api/v1")
                );
                assert_eq!(args.globals.config.language.as_deref(), Some("en"));
                assert_eq!(args.globals.config.timeout_secs, Some(3));
            },
        );
    }

    #[test]
    fn test_open_defaults_to_root() {
        let Action::Navigation(args) = action(&["rbac-console", "open"]) else {
            panic!("expected navigation action");
        };
        assert!(matches!(
            args.command,
            NavigationCommand::Open { ref path } if path == "/"
        ));
    }

    #[test]
    fn test_user_create_flags() {
        let Action::Users(args) = action(&[
            "rbac-console",
            "users",
            "create",
            "-u",
            "carol",
            "-p",
            "secret12",
            "--password-confirm",
            "secret12",
            "--email",
            "carol@example.com",
            "--inactive",
        ]) else {
            panic!("expected users action");
        };
        let UserCommand::Create(request) = args.command else {
            panic!("expected create");
        };
        assert_eq!(request.username, "carol");
        assert_eq!(request.is_active, Some(false));
        assert_eq!(request.is_staff, None);
    }

    #[test]
    fn test_user_update_partial() {
        let Action::Users(args) = action(&[
            "rbac-console",
            "users",
            "update",
            "7",
            "--active",
            "false",
            "--phone",
            "13800000000",
        ]) else {
            panic!("expected users action");
        };
        match args.command {
            UserCommand::Update {
                id,
                request,
                replace,
            } => {
                assert_eq!(id, 7);
                assert!(!replace);
                assert_eq!(request.is_active, Some(false));
                assert_eq!(request.phone.as_deref(), Some("13800000000"));
                assert!(request.email.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_role_set_permissions_may_be_empty() {
        let Action::Roles(args) = action(&["rbac-console", "roles", "set-permissions", "2"]) else {
            panic!("expected roles action");
        };
        assert!(matches!(
            args.command,
            RoleCommand::SetPermissions { id: 2, ref permission_ids } if permission_ids.is_empty()
        ));
    }

    #[test]
    fn test_role_create_without_permissions_omits_them() {
        let Action::Roles(args) = action(&[
            "rbac-console",
            "roles",
            "create",
            "--name",
            "Auditor",
            "--code",
            "auditor",
        ]) else {
            panic!("expected roles action");
        };
        let RoleCommand::Create(request) = args.command else {
            panic!("expected create");
        };
        assert!(request.permission_ids.is_none());
        assert!(request.is_active.is_none());
    }

    #[test]
    fn test_department_update_parent() {
        let Action::Departments(args) =
            action(&["rbac-console", "departments", "update", "4", "--root"])
        else {
            panic!("expected departments action");
        };
        let DepartmentCommand::Update { id, request } = args.command else {
            panic!("expected update");
        };
        assert_eq!(id, 4);
        assert_eq!(request.parent, Some(None));
        assert_eq!(request.manager, None);

        let Action::Departments(args) =
            action(&["rbac-console", "departments", "update", "4", "--parent", "2"])
        else {
            panic!("expected departments action");
        };
        let DepartmentCommand::Update { request, .. } = args.command else {
            panic!("expected update");
        };
        assert_eq!(request.parent, Some(Some(2)));
    }

    #[test]
    fn test_permissions_list_filters() {
        let Action::Permissions(args) = action(&[
            "rbac-console",
            "permissions",
            "list",
            "--content-type",
            "user",
            "--page",
            "2",
        ]) else {
            panic!("expected permissions action");
        };
        let PermissionCommand::List(params) = args.command else {
            panic!("expected list");
        };
        assert_eq!(params.content_type.as_deref(), Some("user"));
        assert_eq!(params.page, Some(2));
        assert_eq!(params.page_size, Some(10));
    }
}
