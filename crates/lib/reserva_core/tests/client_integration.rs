//! Integration tests: run the client against an in-process fake backend.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{NaiveDate, NaiveTime};
use reserva_core::auth::Session;
use reserva_core::client::{ApiClient, ApiError, LoginError};
use reserva_core::config::ClientConfig;
use reserva_core::forms::{ReservationForm, SpaceForm};
use reserva_core::messages;
use reserva_core::models::{ReservationStatus, Space};
use reserva_core::shell::{Shell, Stack};
use reserva_core::store::MemoryStore;
use serde_json::{Value, json};

// =============================================================================
// Fake backend
// =============================================================================

#[derive(Clone, Default)]
struct Backend {
    hits: Arc<AtomicUsize>,
    bodies: Arc<Mutex<Vec<Value>>>,
    auth_headers: Arc<Mutex<Vec<Option<String>>>>,
    paths: Arc<Mutex<Vec<String>>>,
}

impl Backend {
    fn record(&self, path: String, headers: &HeaderMap, body: Option<Value>) {
        self.hits.fetch_add(1, Ordering::SeqCst);
        self.paths.lock().expect("lock").push(path);
        self.auth_headers.lock().expect("lock").push(
            headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
        );
        if let Some(body) = body {
            self.bodies.lock().expect("lock").push(body);
        }
    }

    fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

fn token(payload: Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let body = URL_SAFE_NO_PAD.encode(payload.to_string());
    format!("{header}.{body}.signature")
}

fn valid_token(role: &str) -> String {
    let exp = chrono::Utc::now().timestamp() + 3600;
    token(json!({ "sub": "ana@udea.edu.co", "exp": exp, "id_usuario": 4, "rol": role }))
}

async fn login(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Json<Value>, (StatusCode, &'static str)> {
    backend.record("/auth/login".into(), &headers, Some(body.clone()));
    match (body["correo"].as_str(), body["contrasena"].as_str()) {
        (Some("ana@udea.edu.co"), Some("secreta")) => {
            Ok(Json(json!({ "token": valid_token("ROLE_USER") })))
        }
        (Some("admin@udea.edu.co"), Some("secreta")) => {
            Ok(Json(json!({ "token": valid_token("ROLE_ADMIN") })))
        }
        _ => Err((StatusCode::BAD_REQUEST, "Usuario o contraseña incorrectos")),
    }
}

async fn register(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    backend.record("/auth/register".into(), &headers, Some(body.clone()));
    if body["cedula"] == "duplicada" {
        return (StatusCode::CONFLICT, Json(json!({ "error": "exists" })));
    }
    (StatusCode::CREATED, Json(json!({ "id": 99, "nombre": body["nombre"] })))
}

async fn list_spaces(State(backend): State<Backend>, headers: HeaderMap) -> Json<Value> {
    backend.record("/espacio".into(), &headers, None);
    Json(json!([
        { "id": 1, "nombre": "Cancha A", "descripcion": "Fútbol", "capacidad": 22,
          "ubicacion": "Norte", "deporte": "Fútbol", "activo": true },
        { "id": 2, "nombre": "Piscina", "descripcion": "Cerrada", "capacidad": 30,
          "ubicacion": "Sur", "deporte": "Natación", "activo": false }
    ]))
}

async fn create_space(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> StatusCode {
    backend.record("/espacio".into(), &headers, Some(body));
    StatusCode::CREATED
}

async fn update_space(
    State(backend): State<Backend>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> StatusCode {
    backend.record(format!("/espacio/{id}"), &headers, Some(body));
    StatusCode::OK
}

async fn delete_space(
    State(backend): State<Backend>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> StatusCode {
    backend.record(format!("/espacio/{id}"), &headers, None);
    if id == 404 {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::NO_CONTENT
    }
}

async fn user_reservations(
    State(backend): State<Backend>,
    Path(user_id): Path<i64>,
    headers: HeaderMap,
) -> Json<Value> {
    backend.record(format!("/reserva/usuario/{user_id}"), &headers, None);
    let row = |id: i64, estado: &str| {
        json!({
            "id": id, "usuarioId": user_id, "espacioId": 1, "espacioNombre": "Cancha A",
            "fechaReserva": "2024-06-01", "horaInicio": "08:00:00", "horaFin": "09:00:00",
            "estado": estado
        })
    };
    Json(json!([
        row(1, "CANCELADA"),
        row(2, "ACTIVA"),
        row(3, "CANCELADA"),
        row(4, "ACTIVA")
    ]))
}

async fn cancel_reservation(
    State(backend): State<Backend>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> StatusCode {
    backend.record(format!("/reserva/cancelar/{id}"), &headers, None);
    StatusCode::OK
}

async fn create_reservation(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> StatusCode {
    backend.record("/reserva".into(), &headers, Some(body));
    StatusCode::CREATED
}

fn router(backend: Backend) -> Router {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .route("/espacio", get(list_spaces).post(create_space))
        .route("/espacio/{id}", put(update_space).delete(delete_space))
        .route("/reserva/usuario/{user_id}", get(user_reservations))
        .route("/reserva/cancelar/{id}", put(cancel_reservation))
        .route("/reserva", post(create_reservation))
        .with_state(backend)
}

/// Serve `app` on an ephemeral port and return its base URL.
async fn spawn(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    format!("http://{addr}")
}

fn client(base_url: &str) -> ApiClient {
    let config = ClientConfig::new(base_url).expect("config");
    let session = Session::new(Arc::new(MemoryStore::new()));
    ApiClient::new(config, session).expect("client")
}

async fn fake_backend() -> (Backend, ApiClient) {
    let backend = Backend::default();
    let url = spawn(router(backend.clone())).await;
    (backend, client(&url))
}

fn filled_space_form() -> SpaceForm {
    SpaceForm::new(
        "Cancha de Tenis",
        "Cancha profesional",
        "4",
        "Sector Este",
        "Tenis",
    )
}

// =============================================================================
// Authentication
// =============================================================================

#[tokio::test]
async fn login_stores_token_and_opens_authenticated_stack() {
    let (backend, client) = fake_backend().await;
    let mut shell = Shell::boot(client);
    assert_eq!(shell.stack(), Stack::Unauthenticated);

    shell
        .login("ana@udea.edu.co", "secreta")
        .await
        .expect("login");

    assert_eq!(shell.stack(), Stack::Authenticated);
    let session = shell.client().session();
    assert!(session.is_token_valid());
    assert_eq!(session.user_id(), Some(4));
    assert!(!shell.is_admin());

    let bodies = backend.bodies.lock().expect("lock");
    assert_eq!(
        bodies[0],
        json!({ "correo": "ana@udea.edu.co", "contrasena": "secreta" })
    );
    assert_eq!(backend.auth_headers.lock().expect("lock")[0], None);
}

#[tokio::test]
async fn unverifiable_token_keeps_login_stack() {
    let backend = Backend::default();
    let url = spawn(router(backend.clone())).await;
    let config = ClientConfig::new(&url).expect("config");
    let session =
        Session::new(Arc::new(MemoryStore::new())).with_jwt_secret(Some("s3cret".into()));
    let mut shell = Shell::boot(ApiClient::new(config, session).expect("client"));

    let err = shell
        .login("ana@udea.edu.co", "secreta")
        .await
        .expect_err("unsigned token");

    assert_eq!(err, LoginError::InvalidToken);
    assert_eq!(err.user_message(), messages::LOGIN_FAILED);
    assert_eq!(shell.stack(), Stack::Unauthenticated);
    assert!(!shell.client().session().is_token_valid());
}

#[tokio::test]
async fn wrong_password_surfaces_exact_message() {
    let (_backend, client) = fake_backend().await;
    let err = client
        .login("ana@udea.edu.co", "mala")
        .await
        .expect_err("should fail");
    assert_eq!(err, LoginError::InvalidCredentials);
    assert_eq!(err.user_message(), "Usuario o contraseña incorrectos");
    assert_eq!(client.session().token().expect("token"), None);
}

#[tokio::test]
async fn server_error_surfaces_generic_message() {
    let app = Router::new().route(
        "/auth/login",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    );
    let client = client(&spawn(app).await);

    let err = client
        .login("ana@udea.edu.co", "secreta")
        .await
        .expect_err("should fail");
    assert_eq!(err, LoginError::Server(500));
    assert_eq!(err.to_string(), "Error del servidor: 500");
    assert_eq!(err.user_message(), messages::LOGIN_FAILED);
}

#[tokio::test]
async fn login_without_token_in_body_is_generic() {
    let app = Router::new().route("/auth/login", post(|| async { Json(json!({})) }));
    let client = client(&spawn(app).await);

    let err = client
        .login("ana@udea.edu.co", "secreta")
        .await
        .expect_err("should fail");
    assert_eq!(err, LoginError::Request);
    assert_eq!(err.user_message(), messages::LOGIN_FAILED);
}

#[tokio::test]
async fn unreachable_backend_is_no_response() {
    // Bind then drop to get a port nothing listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);

    let client = client(&format!("http://{addr}"));
    let err = client
        .login("ana@udea.edu.co", "secreta")
        .await
        .expect_err("should fail");
    assert_eq!(err, LoginError::NoResponse);
    assert_eq!(err.user_message(), messages::LOGIN_FAILED);
}

#[tokio::test]
async fn register_sends_user_role() {
    let (backend, client) = fake_backend().await;
    let form = reserva_core::forms::RegisterForm {
        username: "ana".into(),
        document: "1020".into(),
        password: "pw".into(),
        confirm_password: "pw".into(),
    };
    let request = form.validate("udea.edu.co").expect("valid");

    let body = client.register(&request).await.expect("register");
    assert_eq!(body["id"], 99);

    let sent = &backend.bodies.lock().expect("lock")[0];
    assert_eq!(sent["rol"], "USER");
    assert_eq!(sent["correo"], "ana@udea.edu.co");
    assert_eq!(sent["cedula"], "1020");
}

#[tokio::test]
async fn register_failure_has_single_message() {
    let (_backend, client) = fake_backend().await;
    let form = reserva_core::forms::RegisterForm {
        username: "ana".into(),
        document: "duplicada".into(),
        password: "pw".into(),
        confirm_password: "pw".into(),
    };
    let err = client
        .register(&form.validate("udea.edu.co").expect("valid"))
        .await
        .expect_err("should fail");
    assert_eq!(err.to_string(), "Error durante el registro");
    assert_eq!(err.0.status(), Some(409));
}

// =============================================================================
// Spaces
// =============================================================================

#[tokio::test]
async fn list_spaces_sends_bearer_when_logged_in() {
    let (backend, client) = fake_backend().await;
    client
        .login("ana@udea.edu.co", "secreta")
        .await
        .expect("login");

    let spaces = client.list_spaces().await.expect("list");
    assert_eq!(spaces.len(), 2);
    assert_eq!(spaces[1].name, "Piscina");

    let headers = backend.auth_headers.lock().expect("lock");
    let bearer = headers[1].as_deref().expect("authorization header");
    assert!(bearer.starts_with("Bearer "), "got {bearer}");
}

#[tokio::test]
async fn incomplete_space_form_never_hits_the_network() {
    let (backend, client) = fake_backend().await;
    let clears: [fn(&mut SpaceForm); 5] = [
        |f| f.name.clear(),
        |f| f.description.clear(),
        |f| f.set_capacity(""),
        |f| f.location.clear(),
        |f| f.sport.clear(),
    ];
    for clear in clears {
        let mut form = filled_space_form();
        clear(&mut form);
        let err = client.create_space(&form).await.expect_err("should fail");
        assert_eq!(err.to_string(), "Todos los campos son obligatorios.");
    }
    assert_eq!(backend.hits(), 0);

    client
        .create_space(&filled_space_form())
        .await
        .expect("create");
    assert_eq!(backend.hits(), 1);
    let sent = &backend.bodies.lock().expect("lock")[0];
    assert_eq!(sent["capacidad"], 4);
    assert_eq!(sent["activo"], true);
    assert_eq!(sent["nombre"], "Cancha de Tenis");
}

#[tokio::test]
async fn update_and_delete_space() {
    let (backend, client) = fake_backend().await;
    let space = Space {
        id: 7,
        name: "Cancha B".into(),
        description: "d".into(),
        capacity: 10,
        location: "Sur".into(),
        sport: "Voleibol".into(),
        active: false,
    };
    client.update_space(&space).await.expect("update");
    client.delete_space(7).await.expect("delete");

    let err = client.delete_space(404).await.expect_err("missing");
    assert_eq!(err.status(), Some(404));

    let paths = backend.paths.lock().expect("lock");
    assert_eq!(paths.as_slice(), ["/espacio/7", "/espacio/7", "/espacio/404"]);
    let sent = &backend.bodies.lock().expect("lock")[0];
    assert_eq!(sent["id"], 7);
    assert_eq!(sent["activo"], false);
}

// =============================================================================
// Reservations
// =============================================================================

#[tokio::test]
async fn my_reservations_lists_active_first() {
    let (backend, client) = fake_backend().await;
    client
        .login("ana@udea.edu.co", "secreta")
        .await
        .expect("login");

    let reservations = client.my_reservations().await.expect("list");
    let ids: Vec<i64> = reservations.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![2, 4, 1, 3]);
    assert_eq!(reservations[0].status, ReservationStatus::Active);
    assert!(
        backend
            .paths
            .lock()
            .expect("lock")
            .contains(&"/reserva/usuario/4".to_string())
    );
}

#[tokio::test]
async fn my_reservations_requires_session() {
    let (backend, client) = fake_backend().await;
    let err = client.my_reservations().await.expect_err("no session");
    assert!(matches!(err, ApiError::NotAuthenticated));
    assert_eq!(backend.hits(), 0);
}

#[tokio::test]
async fn cancel_reservation_puts_to_cancel_path() {
    let (backend, client) = fake_backend().await;
    client.cancel_reservation(12).await.expect("cancel");
    assert_eq!(
        backend.paths.lock().expect("lock").as_slice(),
        ["/reserva/cancelar/12"]
    );
}

#[tokio::test]
async fn only_active_reservations_can_be_cancelled() {
    let (backend, client) = fake_backend().await;
    client
        .login("ana@udea.edu.co", "secreta")
        .await
        .expect("login");

    let err = client.cancel_my_reservation(3).await.expect_err("cancelled");
    assert_eq!(err.to_string(), "La reserva 3 no está activa");
    let err = client.cancel_my_reservation(77).await.expect_err("unknown");
    assert_eq!(err.to_string(), "No existe la reserva 77");

    client.cancel_my_reservation(2).await.expect("cancel");
    let paths = backend.paths.lock().expect("lock");
    let cancels: Vec<&str> = paths
        .iter()
        .map(String::as_str)
        .filter(|p| p.starts_with("/reserva/cancelar/"))
        .collect();
    assert_eq!(cancels, ["/reserva/cancelar/2"]);
}

#[tokio::test]
async fn create_reservation_uses_session_user() {
    let (backend, client) = fake_backend().await;
    let form = ReservationForm {
        space_id: Some(1),
        date: NaiveDate::from_ymd_opt(2024, 6, 1).expect("date"),
        start: NaiveTime::from_hms_opt(8, 15, 0).expect("time"),
        end: NaiveTime::from_hms_opt(9, 45, 0).expect("time"),
    };

    let err = client.create_reservation(&form).await.expect_err("no user");
    assert_eq!(err.to_string(), "Por favor, complete todos los campos");
    assert_eq!(backend.hits(), 0);

    client
        .login("ana@udea.edu.co", "secreta")
        .await
        .expect("login");
    client.create_reservation(&form).await.expect("create");

    let bodies = backend.bodies.lock().expect("lock");
    let sent = bodies.last().expect("body");
    assert_eq!(
        *sent,
        json!({
            "usuarioId": 4,
            "espacioId": 1,
            "fechaReserva": "2024-06-01",
            "horaInicio": { "hour": 8, "minute": 15, "second": 0, "nano": 0 },
            "horaFin": { "hour": 9, "minute": 45, "second": 0, "nano": 0 }
        })
    );
}

#[tokio::test]
async fn logout_after_login_returns_to_login_stack() {
    let (_backend, client) = fake_backend().await;
    let mut shell = Shell::boot(client);
    shell
        .login("admin@udea.edu.co", "secreta")
        .await
        .expect("login");
    assert!(shell.is_admin());

    shell.logout().expect("logout");
    assert_eq!(shell.stack(), Stack::Unauthenticated);
    assert_eq!(shell.client().session().token().expect("token"), None);
    assert!(!shell.client().session().is_token_valid());
}
