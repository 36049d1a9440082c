mod common;

use std::sync::Arc;

use axum::{Router, http::StatusCode};
use bson::oid::ObjectId;
use serde_json::json;

use common::{MemoryService, Note, request, send, state};
use resource_server::api::controller::{EntityController, EntityControllerOptions};
use resource_server::repos::Widget;
use resource_server::repos::entity::{LAST_MODIFICATION_TIME_FIELD, LAST_MODIFIER_ID_FIELD};

fn widget(name: &str, creator: &str) -> Widget {
    Widget {
        name: name.to_string(),
        creator_id: Some(creator.to_string()),
        ..Default::default()
    }
}

fn widgets_app(service: Arc<MemoryService<Widget>>, options: EntityControllerOptions) -> Router {
    let state = state();
    EntityController::new(service, options)
        .register(Router::new(), &state)
        .with_state(state)
}

fn default_widgets_app(service: Arc<MemoryService<Widget>>) -> Router {
    widgets_app(
        service,
        EntityControllerOptions::new("/widgets").with_all_disabled(false),
    )
}

#[tokio::test]
async fn create_records_caller_as_creator() {
    let service = MemoryService::<Widget>::new();
    let app = default_widgets_app(service.clone());

    let resp = send(
        &app,
        request("POST", "/widgets", Some("token-u1"), Some(json!({ "name": "x" }))),
    )
    .await;

    assert_eq!(resp.status, StatusCode::OK);
    let body = resp.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["creatorId"], "u1");
    assert_eq!(service.items()[0].creator_id.as_deref(), Some("u1"));
}

#[tokio::test]
async fn create_validates_body() {
    let service = MemoryService::<Widget>::new();
    let app = default_widgets_app(service.clone());

    let resp = send(
        &app,
        request("POST", "/widgets", Some("token-u1"), Some(json!({ "name": "" }))),
    )
    .await;

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.json()["error"]["code"], "VALIDATION_FAILED");
    assert!(service.calls().is_empty());
}

#[tokio::test]
async fn malformed_id_never_reaches_backend() {
    let service = MemoryService::<Widget>::new();
    let app = default_widgets_app(service.clone());

    let resp = send(&app, request("GET", "/widgets/abc123xyz", Some("token-u1"), None)).await;

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        resp.json()["error"]["message"],
        "invalid id,id must be bson id format,id:abc123xyz"
    );
    assert!(service.calls().is_empty());
}

#[tokio::test]
async fn foreign_record_looks_like_missing_record() {
    let service = MemoryService::<Widget>::new();
    let owned = service.seed(widget("mine", "u1"));
    let missing = ObjectId::new();
    let app = default_widgets_app(service.clone());

    let foreign = send(
        &app,
        request("GET", &format!("/widgets/{owned}"), Some("token-u2"), None),
    )
    .await;
    let absent = send(
        &app,
        request("GET", &format!("/widgets/{missing}"), Some("token-u2"), None),
    )
    .await;

    assert_eq!(foreign.status, absent.status);
    assert_eq!(foreign.json()["error"]["code"], absent.json()["error"]["code"]);
    assert_eq!(
        foreign.json()["error"]["message"],
        format!("invalid id,id:{owned}")
    );
    assert_eq!(
        absent.json()["error"]["message"],
        format!("invalid id,id:{missing}")
    );

    let own = send(
        &app,
        request("GET", &format!("/widgets/{owned}"), Some("token-u1"), None),
    )
    .await;
    assert_eq!(own.status, StatusCode::OK);
    assert_eq!(own.json()["data"]["name"], "mine");
}

#[tokio::test]
async fn paged_list_is_scoped_to_caller() {
    let service = MemoryService::<Widget>::new();
    service.seed(widget("a", "u1"));
    service.seed(widget("b", "u1"));
    service.seed(widget("c", "u2"));
    let app = default_widgets_app(service.clone());

    let resp = send(
        &app,
        request("GET", "/widgets?page=2&size=1", Some("token-u1"), None),
    )
    .await;

    assert_eq!(resp.status, StatusCode::OK);
    let body = resp.json();
    assert_eq!(body["data"]["total"], 2);
    assert_eq!(body["data"]["list"].as_array().unwrap().len(), 1);
    assert!(
        service
            .filters()
            .iter()
            .all(|f| f.get_str("creatorId").ok() == Some("u1"))
    );
}

#[tokio::test]
async fn anonymous_list_is_unfiltered() {
    let service = MemoryService::<Widget>::new();
    service.seed(widget("a", "u1"));
    service.seed(widget("c", "u2"));
    let app = default_widgets_app(service.clone());

    let resp = send(&app, request("GET", "/widgets", None, None)).await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.json()["data"]["total"], 2);
}

#[tokio::test]
async fn list_all_applies_owner_filter() {
    let service = MemoryService::<Widget>::new();
    service.seed(widget("a", "u1"));
    service.seed(widget("c", "u2"));
    let app = default_widgets_app(service.clone());

    let resp = send(&app, request("GET", "/widgets/all", Some("token-u2"), None)).await;

    let body = resp.json();
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(body["data"]["list"][0]["name"], "c");

    let resp = send(&app, request("GET", "/widgets?all=true", Some("token-u1"), None)).await;
    assert_eq!(resp.json()["data"]["list"][0]["name"], "a");
}

#[tokio::test]
async fn list_filter_hook_runs_after_owner_filter() {
    let service = MemoryService::<Widget>::new();
    service.seed(widget("keep", "u1"));
    service.seed(widget("drop", "u1"));
    let app = widgets_app(
        service.clone(),
        EntityControllerOptions::new("/widgets").with_list_filter(|filter, identity| {
            assert!(identity.is_some());
            assert!(filter.contains_key("creatorId"));
            filter.insert("name", "keep");
        }),
    );

    let resp = send(&app, request("GET", "/widgets", Some("token-u1"), None)).await;
    assert_eq!(resp.json()["data"]["total"], 1);
}

#[tokio::test]
async fn search_skips_owner_filter_unless_enabled() {
    let service = MemoryService::<Widget>::new();
    service.seed(widget("a", "u1"));
    service.seed(widget("c", "u2"));

    let open = default_widgets_app(service.clone());
    let resp = send(
        &open,
        request(
            "POST",
            "/widgets/search",
            Some("token-u1"),
            Some(json!({ "current": 1, "pageSize": 10 })),
        ),
    )
    .await;
    let body = resp.json();
    assert_eq!(body["data"]["total"], 2);
    assert_eq!(body["data"]["current"], 1);
    assert_eq!(body["data"]["pageSize"], 10);

    let scoped = widgets_app(
        service.clone(),
        EntityControllerOptions::new("/widgets").with_filter_current_user(true),
    );
    let resp = send(
        &scoped,
        request(
            "POST",
            "/widgets/search",
            Some("token-u1"),
            Some(json!({ "filter": {} })),
        ),
    )
    .await;
    assert_eq!(resp.json()["data"]["total"], 1);
}

#[tokio::test]
async fn search_rejects_invalid_paging() {
    let service = MemoryService::<Widget>::new();
    let app = default_widgets_app(service.clone());

    let resp = send(
        &app,
        request(
            "POST",
            "/widgets/search",
            None,
            Some(json!({ "current": 0 })),
        ),
    )
    .await;

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert!(service.calls().is_empty());
}

#[tokio::test]
async fn unreachable_page_is_bad_request() {
    let service = MemoryService::<Widget>::new();
    let app = default_widgets_app(service.clone());

    let resp = send(
        &app,
        request("GET", &format!("/widgets?page={}", u64::MAX), Some("token-u1"), None),
    )
    .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.json()["error"]["code"], "INVALID_QUERY");

    let resp = send(
        &app,
        request(
            "POST",
            "/widgets/search",
            Some("token-u1"),
            Some(json!({ "current": u64::MAX, "pageSize": 10 })),
        ),
    )
    .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert!(service.calls().is_empty());
}

#[tokio::test]
async fn update_stamps_tracked_entities() {
    let service = MemoryService::<Widget>::new();
    let id = service.seed(widget("old", "u1"));
    let app = default_widgets_app(service.clone());

    let resp = send(
        &app,
        request(
            "PUT",
            &format!("/widgets/{id}"),
            Some("token-u1"),
            Some(json!({ "name": "new" })),
        ),
    )
    .await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.json(), json!({ "success": true }));

    let (updated_id, fields) = service.last_update().unwrap();
    assert_eq!(updated_id, id);
    assert_eq!(fields.get_str("name").unwrap(), "new");
    assert!(fields.get_datetime(LAST_MODIFICATION_TIME_FIELD).is_ok());
    assert_eq!(fields.get_str(LAST_MODIFIER_ID_FIELD).unwrap(), "u1");
    assert_eq!(service.items()[0].name, "new");
}

#[tokio::test]
async fn update_cannot_rewrite_owner_or_audit_fields() {
    let service = MemoryService::<Widget>::new();
    let id = service.seed(widget("old", "u1"));
    let app = default_widgets_app(service.clone());

    let resp = send(
        &app,
        request(
            "PUT",
            &format!("/widgets/{id}"),
            Some("token-u1"),
            Some(json!({ "name": "new", "creatorId": "u2", "lastModifierId": "u9" })),
        ),
    )
    .await;

    assert_eq!(resp.status, StatusCode::OK);
    let (_, fields) = service.last_update().unwrap();
    assert!(!fields.contains_key("creatorId"));
    assert_eq!(fields.get_str(LAST_MODIFIER_ID_FIELD).unwrap(), "u1");
    assert_eq!(service.items()[0].creator_id.as_deref(), Some("u1"));
}

#[tokio::test]
async fn update_leaves_untracked_entities_alone() {
    let service = MemoryService::<Note>::new();
    let id = service.seed(Note {
        id: None,
        text: "old".into(),
    });
    let state = state();
    let app = EntityController::new(service.clone(), EntityControllerOptions::new("/notes"))
        .register(Router::new(), &state)
        .with_state(state);

    let resp = send(
        &app,
        request(
            "PUT",
            &format!("/notes/{id}"),
            Some("token-u1"),
            Some(json!({ "text": "new" })),
        ),
    )
    .await;

    assert_eq!(resp.status, StatusCode::OK);
    let (_, fields) = service.last_update().unwrap();
    assert_eq!(fields, bson::doc! { "text": "new" });
}

#[tokio::test]
async fn update_of_foreign_record_is_refused() {
    let service = MemoryService::<Widget>::new();
    let id = service.seed(widget("old", "u1"));
    let app = default_widgets_app(service.clone());

    let resp = send(
        &app,
        request(
            "PUT",
            &format!("/widgets/{id}"),
            Some("token-u2"),
            Some(json!({ "name": "stolen" })),
        ),
    )
    .await;

    assert_eq!(resp.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(service.last_update().is_none());
    assert_eq!(service.items()[0].name, "old");
}

#[tokio::test]
async fn delete_removes_own_record() {
    let service = MemoryService::<Widget>::new();
    let id = service.seed(widget("a", "u1"));
    let app = default_widgets_app(service.clone());

    let refused = send(
        &app,
        request("DELETE", &format!("/widgets/{id}"), Some("token-u2"), None),
    )
    .await;
    assert_eq!(refused.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(service.items().len(), 1);

    let resp = send(
        &app,
        request("DELETE", &format!("/widgets/{id}"), Some("token-u1"), None),
    )
    .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(service.items().is_empty());
}

#[tokio::test]
async fn empty_batch_delete_skips_backend() {
    let service = MemoryService::<Widget>::new();
    let app = default_widgets_app(service.clone());

    let resp = send(
        &app,
        request("DELETE", "/widgets", Some("token-u1"), Some(json!({ "ids": [] }))),
    )
    .await;

    assert_eq!(resp.status, StatusCode::OK);
    assert!(!service.calls().contains(&"delete_many"));
}

#[tokio::test]
async fn batch_delete_only_removes_owned_records() {
    let service = MemoryService::<Widget>::new();
    let mine = service.seed(widget("a", "u1"));
    let theirs = service.seed(widget("b", "u2"));
    let app = default_widgets_app(service.clone());

    let resp = send(
        &app,
        request(
            "DELETE",
            "/widgets",
            Some("token-u1"),
            Some(json!({ "ids": [mine.to_hex(), theirs.to_hex()] })),
        ),
    )
    .await;

    assert_eq!(resp.status, StatusCode::OK);
    let left = service.items();
    assert_eq!(left.len(), 1);
    assert_eq!(left[0].id, Some(theirs));
}

#[tokio::test]
async fn batch_delete_rejects_malformed_ids() {
    let service = MemoryService::<Widget>::new();
    let app = default_widgets_app(service.clone());

    let resp = send(
        &app,
        request(
            "DELETE",
            "/widgets",
            Some("token-u1"),
            Some(json!({ "ids": ["nope"] })),
        ),
    )
    .await;

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert!(service.calls().is_empty());
}

#[tokio::test]
async fn disabled_routes_are_not_mounted() {
    let service = MemoryService::<Widget>::new();
    let app = widgets_app(
        service.clone(),
        EntityControllerOptions::new("/widgets")
            .with_all_endpoints_disabled(true)
            .with_get_by_id_disabled(false),
    );

    let resp = send(
        &app,
        request("POST", "/widgets", Some("token-u1"), Some(json!({ "name": "x" }))),
    )
    .await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);

    // with /all unmounted the segment is read as an id
    let resp = send(&app, request("GET", "/widgets/all", Some("token-u1"), None)).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert!(service.calls().is_empty());
}
