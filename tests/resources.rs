#![allow(clippy::unwrap_used)]

mod common;

use common::{failed, ok, page, Harness};
use rbac_console::{
    app_lib::{AppError, NoticeLevel},
    features::{
        departments::{client as departments, types::UpdateDepartmentRequest},
        permissions::client as permissions,
        roles::{
            client as roles,
            state::RoleStore,
            types::{RoleListParams, UpdateRoleRequest},
        },
        tree,
        users::{
            client as users,
            types::{UpdateUserRequest, UserListParams},
        },
    },
};
use serde_json::json;
use std::io::Write;
use wiremock::{
    matchers::{body_json, body_string_contains, method, path, query_param},
    Mock, ResponseTemplate,
};

fn role(id: u64, name: &str, code: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "code": code,
        "description": null,
        "sort_order": 0,
        "is_active": true,
        "is_system": false,
        "permissions_count": 2,
        "users_count": 1
    })
}

#[tokio::test]
async fn role_store_pages_with_merged_params() {
    let harness = Harness::start().await;

    Mock::given(method("GET"))
        .and(path("/roles/"))
        .and(query_param("page", "1"))
        .and(query_param("page_size", "10"))
        .and(query_param("search", "adm"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(page(
            json!([role(1, "Admin", "admin")]),
            1,
        ))))
        .expect(1)
        .mount(&harness.server)
        .await;

    let mut store = RoleStore::new(harness.api.clone());
    store
        .fetch_roles(Some(RoleListParams {
            search: Some("adm".to_string()),
            ..RoleListParams::default()
        }))
        .await
        .unwrap();

    let state = store.state();
    assert_eq!(state.total, 1);
    assert_eq!(state.roles[0].code, "admin");
    assert!(!state.loading);
    assert!(state.error.is_none());
}

#[tokio::test]
async fn role_store_mutations_notify_and_update_caches() {
    let harness = Harness::start().await;

    Mock::given(method("GET"))
        .and(path("/roles/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(page(
            json!([role(1, "Admin", "admin"), role(2, "Editor", "editor")]),
            2,
        ))))
        .mount(&harness.server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/roles/2/"))
        .and(body_json(json!({"name": "Writer"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(role(2, "Writer", "editor"))))
        .mount(&harness.server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/roles/1/"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&harness.server)
        .await;

    let mut store = RoleStore::new(harness.api.clone());
    store.fetch_roles(None).await.unwrap();

    let updated = store
        .update_role(
            2,
            &UpdateRoleRequest {
                name: Some("Writer".to_string()),
                ..UpdateRoleRequest::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Writer");
    assert_eq!(store.state().roles[1].name, "Writer");

    store.delete_role(1).await.unwrap();
    assert_eq!(store.state().roles.len(), 1);

    assert_eq!(
        harness.notifier.messages(NoticeLevel::Success),
        vec!["Role updated".to_string(), "Role deleted".to_string()]
    );
}

#[tokio::test]
async fn role_store_reports_business_failures() {
    let harness = Harness::start().await;

    Mock::given(method("DELETE"))
        .and(path("/roles/1/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(failed("E003002", "Role is in use")),
        )
        .mount(&harness.server)
        .await;

    let mut store = RoleStore::new(harness.api.clone());
    let err = store.delete_role(1).await.unwrap_err();
    assert!(matches!(err, AppError::Business(_)));
    assert_eq!(store.state().error.as_deref(), Some("Role is in use"));
    assert_eq!(
        harness.notifier.messages(NoticeLevel::Error),
        vec!["Failed to delete role: Role is in use".to_string()]
    );
}

#[tokio::test]
async fn role_permission_assignment() {
    let harness = Harness::start().await;

    Mock::given(method("POST"))
        .and(path("/roles/3/permissions/add/"))
        .and(body_json(json!({"permission_ids": [1, 2]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!({"added_count": 2}))))
        .mount(&harness.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/roles/3/permissions/replace/"))
        .and(body_json(json!({"permission_ids": []})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(ok(json!({"old_count": 5, "new_count": 0}))),
        )
        .mount(&harness.server)
        .await;

    assert_eq!(
        roles::add_role_permissions(&harness.api, 3, &[1, 2])
            .await
            .unwrap(),
        2
    );
    let replaced = roles::replace_role_permissions(&harness.api, 3, &[])
        .await
        .unwrap();
    assert_eq!((replaced.old_count, replaced.new_count), (5, 0));

    let err = roles::remove_role_permissions(&harness.api, 3, &[])
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn department_tree_and_moves() {
    let harness = Harness::start().await;

    Mock::given(method("GET"))
        .and(path("/departments/tree/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!([
            {
                "id": 1, "name": "Head Office", "code": "HQ", "level": 1,
                "children": [
                    {"id": 2, "name": "R&D", "code": "RD", "parent": 1, "level": 2, "children": []}
                ]
            }
        ]))))
        .mount(&harness.server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/departments/2/"))
        .and(body_json(json!({"parent": null})))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!({
            "id": 2, "name": "R&D", "code": "RD", "parent": null, "level": 1
        }))))
        .expect(1)
        .mount(&harness.server)
        .await;

    let roots = departments::department_tree(&harness.api).await.unwrap();
    assert_eq!(
        tree::render(&roots),
        "Head Office [HQ] #1\n  R&D [RD] #2"
    );
    assert_eq!(tree::subtree_ids(&roots, 1), vec![1, 2]);

    let moved = departments::patch_department(
        &harness.api,
        2,
        &UpdateDepartmentRequest {
            parent: Some(None),
            ..UpdateDepartmentRequest::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(moved.parent, None);

    let err = departments::patch_department(
        &harness.api,
        2,
        &UpdateDepartmentRequest {
            parent: Some(Some(2)),
            ..UpdateDepartmentRequest::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn permission_tree_nests_children() {
    let harness = Harness::start().await;

    Mock::given(method("GET"))
        .and(path("/permissions/tree/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!([
            {
                "id": 1, "name": "Users", "code": "user:*",
                "children": [
                    {"id": 2, "name": "View users", "code": "user:read", "parent": 1},
                    {"id": 3, "name": "Create users", "code": "user:create", "parent": 1}
                ]
            }
        ]))))
        .mount(&harness.server)
        .await;

    let roots = permissions::permission_tree(&harness.api).await.unwrap();
    let codes: Vec<String> = tree::flatten(&roots)
        .into_iter()
        .map(|(_, node)| node.permission.code.clone())
        .collect();
    assert_eq!(codes, vec!["user:*", "user:read", "user:create"]);
}

#[tokio::test]
async fn user_listing_sends_filters() {
    let harness = Harness::start().await;

    Mock::given(method("GET"))
        .and(path("/users/"))
        .and(query_param("is_active", "false"))
        .and(query_param("department", "4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(page(
            json!([common::user(9, "dora", &[], &[])]),
            11,
        ))))
        .expect(1)
        .mount(&harness.server)
        .await;

    let result = users::list_users(
        &harness.api,
        &UserListParams {
            is_active: Some(false),
            department: Some(4),
            ..UserListParams::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(result.count, 11);
    assert_eq!(result.results[0].username, "dora");
}

#[tokio::test]
async fn toggle_active_returns_the_new_flag() {
    let harness = Harness::start().await;

    Mock::given(method("POST"))
        .and(path("/users/5/toggle_active/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!({"is_active": false}))))
        .mount(&harness.server)
        .await;

    assert!(!users::toggle_user_active(&harness.api, 5).await.unwrap());

    let err = users::toggle_user_active(&harness.api, 0).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn avatar_upload_is_multipart() {
    let harness = Harness::start().await;
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("me.png");
    std::fs::File::create(&file)
        .unwrap()
        .write_all(b"fake png bytes")
        .unwrap();

    Mock::given(method("POST"))
        .and(path("/users/upload_avatar/"))
        .and(body_string_contains("name=\"avatar\"; filename=\"me.png\""))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(ok(json!({"avatar": "/media/avatars/me.png"}))),
        )
        .expect(1)
        .mount(&harness.server)
        .await;

    let url = users::upload_avatar(&harness.api, &file).await.unwrap();
    assert_eq!(url, "/media/avatars/me.png");

    let err = users::upload_avatar(&harness.api, &dir.path().join("missing.png"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn own_profile_updates_go_to_update_me() {
    let harness = Harness::start().await;

    Mock::given(method("PATCH"))
        .and(path("/users/update_me/"))
        .and(body_json(json!({"phone": "13800000000"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(ok(common::user(1, "admin", &[], &[]))),
        )
        .expect(1)
        .mount(&harness.server)
        .await;

    let me = users::update_current_user(
        &harness.api,
        &UpdateUserRequest {
            phone: Some("13800000000".to_string()),
            ..UpdateUserRequest::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(me.user.username, "admin");

    let err = users::update_current_user(&harness.api, &UpdateUserRequest::default())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}
