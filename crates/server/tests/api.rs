//! End-to-end tests over the in-memory store.
//!
//! Each test builds a fresh router seeded with a small BCA/BBA catalog
//! and drives it through `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use studypoint_common::{
    auth::hash_password,
    config::AppConfig,
    db::models::ResourceKind,
    store::{CatalogStore, MemCatalog, NewResource, NewSubject},
};
use studypoint_server::{create_router, AppState};

const ADMIN_EMAIL: &str = "admin@studypoint.com";
const ADMIN_PASSWORD: &str = "password123";

struct TestApp {
    router: Router,
    state: AppState,
    bca: Uuid,
    bba: Uuid,
}

async fn spawn_app() -> TestApp {
    let mut config = AppConfig::default();
    config.rate_limit.enabled = false;
    spawn_app_with(config).await
}

async fn spawn_app_with(config: AppConfig) -> TestApp {
    let store = Arc::new(MemCatalog::new());
    let (bca, bba) = seed(store.as_ref()).await;

    let shared: Arc<dyn CatalogStore> = store.clone();
    let state = AppState::new(shared, Arc::new(config));
    state.taxonomy.reload(store.as_ref()).await.unwrap();

    TestApp {
        router: create_router(state.clone()),
        state,
        bca,
        bba,
    }
}

async fn seed(store: &dyn CatalogStore) -> (Uuid, Uuid) {
    store
        .create_admin(
            ADMIN_EMAIL.to_string(),
            "Administrator".to_string(),
            hash_password(ADMIN_PASSWORD).unwrap(),
        )
        .await
        .unwrap();

    let bca = store.create_field("BCA".to_string()).await.unwrap();
    let bba = store.create_field("BBA".to_string()).await.unwrap();

    for (semester, name) in [
        (1, "Computer Programming"),
        (3, "Data Structures and Algorithms"),
        (4, "Database Management Systems"),
        (4, "Computer Networks"),
    ] {
        store
            .create_subject(NewSubject {
                name: name.to_string(),
                field_id: bca.id,
                semester,
            })
            .await
            .unwrap();
    }
    store
        .create_subject(NewSubject {
            name: "Principles of Management".to_string(),
            field_id: bba.id,
            semester: 1,
        })
        .await
        .unwrap();

    let bca_resources: [(i16, &str, ResourceKind, &str, &str); 5] = [
        (
            1,
            "Computer Programming",
            ResourceKind::Notes,
            "Introduction to Programming",
            "Comprehensive notes covering C programming basics.",
        ),
        (
            3,
            "Data Structures and Algorithms",
            ResourceKind::Notes,
            "Data Structures Notes",
            "Arrays, linked lists, stacks, queues and trees.",
        ),
        (
            3,
            "Data Structures and Algorithms",
            ResourceKind::Notes,
            "Algorithm Design Handouts",
            "Sorting, searching and complexity analysis.",
        ),
        (
            4,
            "Database Management Systems",
            ResourceKind::Notes,
            "Database Management Systems",
            "Relational model, SQL, normalization, transactions.",
        ),
        (
            4,
            "Computer Networks",
            ResourceKind::Syllabus,
            "Computer Networks Syllabus",
            "Official syllabus with course objectives.",
        ),
    ];
    for (semester, subject, kind, title, description) in bca_resources {
        store
            .create_resource(NewResource {
                title: title.to_string(),
                description: description.to_string(),
                kind,
                subject: subject.to_string(),
                semester,
                field: "BCA".to_string(),
                field_id: Some(bca.id),
                file_url: "#".to_string(),
            })
            .await
            .unwrap();
    }
    store
        .create_resource(NewResource {
            title: "Management Principles Notes".to_string(),
            description: "Planning, organizing, leading and controlling.".to_string(),
            kind: ResourceKind::Notes,
            subject: "Principles of Management".to_string(),
            semester: 1,
            field: "BBA".to_string(),
            field_id: Some(bba.id),
            file_url: "#".to_string(),
        })
        .await
        .unwrap();

    (bca.id, bba.id)
}

async fn send(router: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn login(router: &Router) -> String {
    let (status, body) = send(
        router,
        json_request(
            "POST",
            "/api/auth/login",
            None,
            json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_and_ready_respond() {
    let app = spawn_app().await;

    let (status, body) = send(&app.router, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = send(&app.router, get("/ready")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["store"], "up");
    assert!(body["taxonomy_generation"].as_u64().unwrap() >= 1);
}

#[tokio::test]
async fn login_returns_bearer_token() {
    let app = spawn_app().await;
    let (status, body) = send(
        &app.router,
        json_request(
            "POST",
            "/api/auth/login",
            None,
            json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token_type"], "Bearer");
    assert!(!body["token"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn login_rejects_bad_credentials() {
    let app = spawn_app().await;

    for payload in [
        json!({ "email": ADMIN_EMAIL, "password": "wrong" }),
        json!({ "email": "nobody@studypoint.com", "password": ADMIN_PASSWORD }),
    ] {
        let (status, body) = send(
            &app.router,
            json_request("POST", "/api/auth/login", None, payload),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "INVALID_CREDENTIALS");
    }
}

#[tokio::test]
async fn login_is_rate_limited() {
    let mut config = AppConfig::default();
    config.rate_limit.enabled = true;
    config.rate_limit.login_per_second = 1;
    config.rate_limit.login_burst = 1;
    let app = spawn_app_with(config).await;

    let payload = json!({ "email": ADMIN_EMAIL, "password": "wrong" });
    let (first, _) = send(
        &app.router,
        json_request("POST", "/api/auth/login", None, payload.clone()),
    )
    .await;
    assert_eq!(first, StatusCode::UNAUTHORIZED);

    let (second, body) = send(
        &app.router,
        json_request("POST", "/api/auth/login", None, payload),
    )
    .await;
    assert_eq!(second, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["error"]["code"], "RATE_LIMITED");
}

#[tokio::test]
async fn browse_returns_everything_newest_first() {
    let app = spawn_app().await;
    let (status, body) = send(&app.router, get("/api/resources")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalItems"], 6);
    assert_eq!(body["totalPages"], 1);
    assert_eq!(body["page"], 1);
    // Seeded in order with identical-or-increasing timestamps, so the
    // newest (last-seeded) row comes first.
    assert_eq!(body["items"][0]["title"], "Management Principles Notes");
}

#[tokio::test]
async fn browse_filters_compose_with_and() {
    let app = spawn_app().await;
    let (status, body) = send(&app.router, get("/api/resources?type=Notes&semester=3")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalItems"], 2);
    for item in body["items"].as_array().unwrap() {
        assert_eq!(item["type"], "Notes");
        assert_eq!(item["semester"], 3);
    }
}

#[tokio::test]
async fn browse_field_filter_matches_by_name() {
    let app = spawn_app().await;
    let uri = format!("/api/resources?field={}", app.bba);
    let (status, body) = send(&app.router, get(&uri)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalItems"], 1);
    assert_eq!(body["items"][0]["field"], "BBA");
}

#[tokio::test]
async fn browse_unknown_field_id_leaves_dimension_unapplied() {
    let app = spawn_app().await;
    let uri = format!("/api/resources?field={}", Uuid::new_v4());
    let (status, body) = send(&app.router, get(&uri)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalItems"], 6);
}

#[tokio::test]
async fn browse_search_is_case_insensitive_over_title_and_description() {
    let app = spawn_app().await;

    let (status, body) = send(&app.router, get("/api/resources?q=DATABASE")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalItems"], 1);
    assert_eq!(body["items"][0]["title"], "Database Management Systems");

    // "sorting" only appears in a description.
    let (_, body) = send(&app.router, get("/api/resources?q=sorting")).await;
    assert_eq!(body["totalItems"], 1);
    assert_eq!(body["items"][0]["title"], "Algorithm Design Handouts");
}

#[tokio::test]
async fn browse_resets_subject_invalid_for_selected_field() {
    let app = spawn_app().await;
    // "Principles of Management" belongs to BBA, so under BCA the
    // subject selection is discarded and all BCA rows come back.
    let uri = format!(
        "/api/resources?field={}&subject=Principles%20of%20Management",
        app.bca
    );
    let (status, body) = send(&app.router, get(&uri)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalItems"], 5);
}

#[tokio::test]
async fn browse_pagination_clamps_and_links() {
    let app = spawn_app().await;

    let (status, body) = send(&app.router, get("/api/resources?perPage=4&page=2")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalPages"], 2);
    assert_eq!(body["page"], 2);
    assert_eq!(body["items"].as_array().unwrap().len(), 2);
    assert_eq!(
        body["links"],
        json!([
            { "type": "page", "number": 1 },
            { "type": "page", "number": 2 }
        ])
    );

    // Out-of-range pages clamp instead of erroring.
    let (_, body) = send(&app.router, get("/api/resources?perPage=4&page=99")).await;
    assert_eq!(body["page"], 2);
    let (_, body) = send(&app.router, get("/api/resources?perPage=4&page=0")).await;
    assert_eq!(body["page"], 1);
}

#[tokio::test]
async fn browse_negative_page_clamps_instead_of_erroring() {
    let app = spawn_app().await;

    let (status, body) = send(&app.router, get("/api/resources?page=-1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["page"], 1);
    assert_eq!(body["totalItems"], 6);

    // Negative page size clamps to one item per page.
    let (status, body) = send(&app.router, get("/api/resources?page=-5&perPage=-2")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["page"], 1);
    assert_eq!(body["items"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn malformed_browse_params_return_json_validation_error() {
    let app = spawn_app().await;

    for uri in [
        "/api/resources?semester=abc",
        "/api/resources?type=Podcast",
        "/api/resources?page=notanumber",
    ] {
        let (status, body) = send(&app.router, get(uri)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR", "{uri}");
    }
}

#[tokio::test]
async fn get_resource_returns_404_with_error_body() {
    let app = spawn_app().await;
    let uri = format!("/api/resources/{}", Uuid::new_v4());
    let (status, body) = send(&app.router, get(&uri)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "RESOURCE_NOT_FOUND");
}

#[tokio::test]
async fn unknown_route_returns_json_404() {
    let app = spawn_app().await;
    let (status, body) = send(&app.router, get("/api/nope")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn admin_mutations_require_a_token() {
    let app = spawn_app().await;
    let (status, body) = send(
        &app.router,
        json_request(
            "POST",
            "/api/fields",
            None,
            json!({ "name": "MCA" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn resource_crud_roundtrip() {
    let app = spawn_app().await;
    let token = login(&app.router).await;

    let (status, created) = send(
        &app.router,
        json_request(
            "POST",
            "/api/resources",
            Some(&token),
            json!({
                "title": "Computer Networks Lab Manual",
                "description": "Socket programming exercises.",
                "type": "Notes",
                "subject": "Computer Networks",
                "semester": 4,
                "fieldId": app.bca,
                "fileUrl": "https://files.example.com/cn-lab.pdf"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["field"], "BCA");
    assert!(created["uploadDate"].is_string());
    let id = created["id"].as_str().unwrap().to_string();

    let (status, fetched) = send(&app.router, get(&format!("/api/resources/{id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["title"], "Computer Networks Lab Manual");

    let (status, updated) = send(
        &app.router,
        json_request(
            "PUT",
            &format!("/api/resources/{id}"),
            Some(&token),
            json!({ "title": "Computer Networks Lab Manual v2" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "Computer Networks Lab Manual v2");
    // Partial update leaves everything else alone.
    assert_eq!(updated["uploadDate"], created["uploadDate"]);
    assert_eq!(updated["subject"], "Computer Networks");

    let (status, _) = send(
        &app.router,
        json_request(
            "DELETE",
            &format!("/api/resources/{id}"),
            Some(&token),
            Value::Null,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app.router, get(&format!("/api/resources/{id}"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_resource_rejects_subject_outside_taxonomy() {
    let app = spawn_app().await;
    let token = login(&app.router).await;

    let (status, body) = send(
        &app.router,
        json_request(
            "POST",
            "/api/resources",
            Some(&token),
            json!({
                "title": "Orphan Notes",
                "type": "Notes",
                "subject": "Quantum Gastronomy",
                "semester": 4,
                "fieldId": app.bca
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn delete_field_blocked_while_referenced() {
    let app = spawn_app().await;
    let token = login(&app.router).await;

    let (status, body) = send(
        &app.router,
        json_request(
            "DELETE",
            &format!("/api/fields/{}", app.bca),
            Some(&token),
            Value::Null,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "STILL_REFERENCED");
}

#[tokio::test]
async fn delete_subject_blocked_until_resources_removed() {
    let app = spawn_app().await;
    let token = login(&app.router).await;

    let (_, subjects) = send(
        &app.router,
        get(&format!("/api/subjects?fieldId={}&semester=4", app.bca)),
    )
    .await;
    let networks = subjects
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["name"] == "Computer Networks")
        .unwrap();
    let subject_id = networks["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app.router,
        json_request(
            "DELETE",
            &format!("/api/subjects/{subject_id}"),
            Some(&token),
            Value::Null,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "STILL_REFERENCED");

    // Remove the only resource filed under the subject, then retry.
    let (_, resources) = send(
        &app.router,
        get("/api/resources?q=Computer%20Networks%20Syllabus"),
    )
    .await;
    let resource_id = resources["items"][0]["id"].as_str().unwrap().to_string();
    let (status, _) = send(
        &app.router,
        json_request(
            "DELETE",
            &format!("/api/resources/{resource_id}"),
            Some(&token),
            Value::Null,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(
        &app.router,
        json_request(
            "DELETE",
            &format!("/api/subjects/{subject_id}"),
            Some(&token),
            Value::Null,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn field_mutations_refresh_the_taxonomy() {
    let app = spawn_app().await;
    let token = login(&app.router).await;
    let before = app.state.taxonomy.snapshot().await.generation();

    let (status, field) = send(
        &app.router,
        json_request("POST", "/api/fields", Some(&token), json!({ "name": "MCA" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let field_id = field["id"].as_str().unwrap().to_string();

    let after = app.state.taxonomy.snapshot().await.generation();
    assert!(after > before);

    // The new field is usable immediately: add a subject and a resource
    // under it without restarting anything.
    let (status, _) = send(
        &app.router,
        json_request(
            "POST",
            "/api/subjects",
            Some(&token),
            json!({ "name": "Advanced Databases", "fieldId": field_id, "semester": 1 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(
        &app.router,
        json_request(
            "POST",
            "/api/resources",
            Some(&token),
            json!({
                "title": "Advanced Databases Notes",
                "type": "Notes",
                "subject": "Advanced Databases",
                "semester": 1,
                "fieldId": field_id
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn duplicate_field_name_conflicts() {
    let app = spawn_app().await;
    let token = login(&app.router).await;

    let (status, body) = send(
        &app.router,
        json_request("POST", "/api/fields", Some(&token), json!({ "name": "bca" })),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "CONFLICT");
}

#[tokio::test]
async fn semesters_lists_one_through_eight() {
    let app = spawn_app().await;
    let (status, body) = send(&app.router, get("/api/semesters")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([1, 2, 3, 4, 5, 6, 7, 8]));
}
