use alumnos_core::db::open_db_in_memory;
use alumnos_server::{serve, AppState};
use reqwest::{Client, StatusCode};
use rusqlite::Connection;
use serde_json::{json, Value};
use tokio::net::TcpListener;

async fn spawn_app() -> String {
    spawn_app_with(open_db_in_memory().unwrap()).await
}

async fn spawn_app_with(conn: Connection) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(serve(listener, AppState::new(conn), std::future::pending()));
    format!("http://{addr}/api/alumnos")
}

fn ana_body() -> Value {
    json!({
        "nombre": "Ana",
        "apellido": "Lopez",
        "id_curso": 2,
        "fecha_nacimiento": "2001-05-01",
        "hace_deportes": 1
    })
}

async fn create(client: &Client, base: &str, body: &Value) -> Value {
    let response = client.post(base).json(body).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    response.json().await.unwrap()
}

#[tokio::test]
async fn post_creates_record_and_echoes_fields() {
    let base = spawn_app().await;
    let client = Client::new();

    let created = create(&client, &base, &ana_body()).await;

    assert!(created["id"].is_i64());
    assert_eq!(created["nombre"], "Ana");
    assert_eq!(created["apellido"], "Lopez");
    assert_eq!(created["id_curso"], 2);
    assert_eq!(created["fecha_nacimiento"], "2001-05-01");
    assert_eq!(created["hace_deportes"], 1);
}

#[tokio::test]
async fn get_by_id_returns_created_record() {
    let base = spawn_app().await;
    let client = Client::new();

    let created = create(&client, &base, &ana_body()).await;
    let response = client
        .get(format!("{base}/{}", created["id"]))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let loaded: Value = response.json().await.unwrap();
    assert_eq!(loaded, created);
}

#[tokio::test]
async fn list_returns_every_record() {
    let base = spawn_app().await;
    let client = Client::new();

    let response = client.get(&base).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.json::<Value>().await.unwrap(), json!([]));

    let first = create(&client, &base, &ana_body()).await;
    let mut other = ana_body();
    other["nombre"] = json!("Bruno");
    let second = create(&client, &base, &other).await;

    let listed: Value = client.get(&base).send().await.unwrap().json().await.unwrap();
    assert_eq!(listed, json!([first, second]));
}

#[tokio::test]
async fn get_non_numeric_id_is_bad_request() {
    let base = spawn_app().await;
    let client = Client::new();

    let response = client.get(format!("{base}/abc")).send().await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "error": "El ID debe ser un número" }));
}

#[tokio::test]
async fn get_missing_id_is_not_found() {
    let base = spawn_app().await;
    let client = Client::new();

    let response = client.get(format!("{base}/9999")).send().await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "error": "Alumno no encontrado" }));
}

#[tokio::test]
async fn post_with_invalid_fields_lists_every_violation() {
    let base = spawn_app().await;
    let client = Client::new();

    let response = client
        .post(&base)
        .json(&json!({ "nombre": "Al", "hace_deportes": true }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    let errors = body["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 5);
    assert_eq!(errors[0], "El nombre debe tener al menos 3 caracteres");
    assert_eq!(errors[4], "El campo hace_deportes debe ser 0 o 1");

    let listed: Value = client.get(&base).send().await.unwrap().json().await.unwrap();
    assert_eq!(listed, json!([]));
}

#[tokio::test]
async fn put_with_bad_sports_flag_is_rejected() {
    let base = spawn_app().await;
    let client = Client::new();

    let created = create(&client, &base, &ana_body()).await;
    let mut body = created.clone();
    body["hace_deportes"] = json!(2);

    let response = client.put(&base).json(&body).send().await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body,
        json!({ "errors": ["El campo hace_deportes debe ser 0 o 1"] })
    );
}

#[tokio::test]
async fn put_replaces_record() {
    let base = spawn_app().await;
    let client = Client::new();

    let created = create(&client, &base, &ana_body()).await;
    let replacement = json!({
        "id": created["id"],
        "nombre": "Carla",
        "apellido": "Gomez",
        "id_curso": 5,
        "fecha_nacimiento": "2000-01-15",
        "hace_deportes": 0
    });

    let response = client.put(&base).json(&replacement).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated: Value = response.json().await.unwrap();
    assert_eq!(updated, replacement);

    let loaded: Value = client
        .get(format!("{base}/{}", created["id"]))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(loaded, replacement);
}

#[tokio::test]
async fn put_without_id_or_unknown_id_fails() {
    let base = spawn_app().await;
    let client = Client::new();

    let response = client.put(&base).json(&ana_body()).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["errors"][0], "El ID es requerido para actualización");

    let mut missing = ana_body();
    missing["id"] = json!(4242);
    let response = client.put(&base).json(&missing).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "error": "Alumno no encontrado" }));
}

#[tokio::test]
async fn delete_confirms_then_record_is_gone() {
    let base = spawn_app().await;
    let client = Client::new();

    let created = create(&client, &base, &ana_body()).await;
    let url = format!("{base}/{}", created["id"]);

    let response = client.delete(&url).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "message": "Alumno eliminado correctamente" }));

    let response = client.get(&url).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = client.delete(&url).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = client.delete(format!("{base}/abc")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_json_body_is_bad_request() {
    let base = spawn_app().await;
    let client = Client::new();

    let response = client
        .post(&base)
        .header("content-type", "application/json")
        .body("{ not json")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn non_utf8_path_id_is_bad_request() {
    let base = spawn_app().await;
    let client = Client::new();

    let response = client.get(format!("{base}/%FF")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "error": "El ID debe ser un número" }));

    let response = client.delete(format!("{base}/%FF")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "error": "El ID debe ser un número" }));
}

#[tokio::test]
async fn cross_origin_requests_are_allowed() {
    let base = spawn_app().await;
    let client = Client::new();

    let response = client
        .get(&base)
        .header("origin", "http://localhost:5173")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["access-control-allow-origin"], "*");

    let response = client
        .request(reqwest::Method::OPTIONS, &base)
        .header("origin", "http://localhost:5173")
        .header("access-control-request-method", "PUT")
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    assert!(response.headers().contains_key("access-control-allow-methods"));
}

#[tokio::test]
async fn store_failure_is_internal_error_with_store_message() {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch("DROP TABLE alumnos;").unwrap();
    let base = spawn_app_with(conn).await;
    let client = Client::new();

    let response = client.get(&base).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "error": "no such table: alumnos" }));

    let response = client.post(&base).json(&ana_body()).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "error": "no such table: alumnos" }));
}
