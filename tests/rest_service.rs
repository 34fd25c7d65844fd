//! REST service tests against an in-process mock backend.
//!
//! Each test starts its own axum server on an ephemeral port and talks to it
//! over real HTTP through `RestService`.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use storedesk::api::{ApiClient, ApiError, Category, EntityId, EntityService, Product};
use storedesk::error::AppError;

#[derive(Clone, Default)]
struct Db {
    records: Arc<Mutex<Vec<Value>>>,
}

impl Db {
    fn seeded(records: Vec<Value>) -> Self {
        Self {
            records: Arc::new(Mutex::new(records)),
        }
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .position(|r| r["id"].to_string().trim_matches('"') == id)
    }
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "message": "Category not found" })),
    )
        .into_response()
}

async fn list(State(db): State<Db>) -> Json<Value> {
    Json(Value::Array(db.records.lock().unwrap().clone()))
}

async fn create(State(db): State<Db>, Json(mut body): Json<Value>) -> Response {
    let mut records = db.records.lock().unwrap();
    let id = records.len() as i64 + 100;
    body["id"] = json!(id);
    records.push(body.clone());
    (StatusCode::CREATED, Json(body)).into_response()
}

async fn update(
    State(db): State<Db>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let Some(index) = db.position(&id) else {
        return not_found();
    };
    let mut records = db.records.lock().unwrap();
    let mut stored = body;
    stored["id"] = records[index]["id"].clone();
    records[index] = stored.clone();
    Json(stored).into_response()
}

async fn remove(State(db): State<Db>, Path(id): Path<String>) -> Response {
    let Some(index) = db.position(&id) else {
        return not_found();
    };
    db.records.lock().unwrap().remove(index);
    StatusCode::NO_CONTENT.into_response()
}

async fn broken() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "database down" })),
    )
        .into_response()
}

async fn garbage() -> &'static str {
    "this is not json"
}

/// Start a mock backend and return its address.
async fn start_backend(categories: Db, products: Db) -> SocketAddr {
    let app = Router::new()
        .route("/api/categories", get(list).post(create))
        .route("/api/categories/:id", axum::routing::put(update).delete(remove))
        .with_state(categories)
        .route(
            "/api/products",
            get(move || {
                let db = products.clone();
                async move { list(State(db)).await }
            }),
        )
        .route("/api/broken", get(broken))
        .route("/api/garbage", get(garbage));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn seeded_categories() -> Db {
    Db::seeded(vec![
        json!({ "id": 1, "name": "Bags", "description": "Carry things" }),
        json!({ "id": 2, "name": "Hats", "description": "Head wear" }),
    ])
}

async fn client() -> ApiClient {
    let addr = start_backend(seeded_categories(), Db::default()).await;
    ApiClient::with_base_url(&format!("http://{}/api/", addr)).unwrap()
}

#[tokio::test]
async fn test_fetch_all_returns_collection() {
    let service = client().await.service::<Category>("categories");
    let items = service.fetch_all().await.unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0], Category::new(1, "Bags", "Carry things"));
}

#[tokio::test]
async fn test_add_merges_server_assigned_id() {
    let service = client().await.service::<Category>("categories");
    let draft = Category::new(EntityId::default(), "Scarves", "Neck wear");

    let created = service.add(&draft).await.unwrap();
    assert_eq!(created.id, EntityId::Number(102));
    assert_eq!(created.name, "Scarves");
    assert_eq!(created.description, "Neck wear");

    let items = service.fetch_all().await.unwrap();
    assert_eq!(items.len(), 3);
}

#[tokio::test]
async fn test_edit_replaces_record() {
    let service = client().await.service::<Category>("categories");
    let updated = service
        .edit(&EntityId::Number(2), &Category::new(2, "Caps", "Head wear"))
        .await
        .unwrap();
    assert_eq!(updated.name, "Caps");

    let items = service.fetch_all().await.unwrap();
    assert_eq!(items[1].name, "Caps");
}

#[tokio::test]
async fn test_edit_missing_record_is_not_found() {
    let service = client().await.service::<Category>("categories");
    let err = service
        .edit(&EntityId::Number(99), &Category::new(99, "Ghost", ""))
        .await
        .unwrap_err();
    match err {
        ApiError::NotFound(message) => assert_eq!(message, "Category not found"),
        other => panic!("expected not found, got {:?}", other),
    }
}

#[tokio::test]
async fn test_delete_confirms_and_removes() {
    let service = client().await.service::<Category>("categories");
    assert!(service.delete(&EntityId::Number(1)).await.unwrap());

    let items = service.fetch_all().await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].name, "Hats");
}

#[tokio::test]
async fn test_delete_many_reports_each_outcome() {
    let service = client().await.service::<Category>("categories");
    let report = service
        .delete_many(vec![EntityId::Number(1), EntityId::Number(99)])
        .await;

    assert_eq!(report.deleted, vec![EntityId::Number(1)]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, EntityId::Number(99));
    assert!(!report.is_complete());

    // The successful deletion is not rolled back.
    assert_eq!(service.fetch_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_products_use_camel_case_fields() {
    let products = Db::seeded(vec![json!({
        "id": "p-1",
        "productName": "Tote",
        "quantity": 4,
        "price": 12.5,
        "image": null
    })]);
    let addr = start_backend(Db::default(), products).await;
    let client = ApiClient::with_base_url(&format!("http://{}/api", addr)).unwrap();

    let items = client.service::<Product>("products").fetch_all().await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, EntityId::from("p-1"));
    assert_eq!(items[0].product_name, "Tote");
    assert_eq!(items[0].quantity, 4);
}

#[tokio::test]
async fn test_server_error_carries_backend_message() {
    let err = client()
        .await
        .service::<Category>("broken")
        .fetch_all()
        .await
        .unwrap_err();
    match err {
        ApiError::ServerError(message) => assert!(message.contains("database down")),
        other => panic!("expected server error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unparseable_body_is_invalid_response() {
    let err = client()
        .await
        .service::<Category>("garbage")
        .fetch_all()
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_unreachable_backend_is_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = ApiClient::with_base_url(&format!("http://{}/api", addr)).unwrap();
    let err = client
        .service::<Category>("categories")
        .fetch_all()
        .await
        .unwrap_err();
    assert!(err.is_transport());

    let app_err = AppError::from(err);
    assert!(app_err.is_network_failure());
    assert!(app_err.suggested_action().unwrap().contains("--base-url"));
}
