use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode as HttpStatusCode;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use uuid::Uuid;

use migration::MigratorTrait;
use server::routes;
use server::state::AppState;
use server::uploads::ImageStore;
use service::auth::TokenService;
use service::storage::memory::MemoryStore;

struct TestApp {
    base_url: String,
}

async fn serve(state: AppState) -> anyhow::Result<TestApp> {
    let app: Router = routes::build_router(state, routes::build_cors());
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await { eprintln!("server error: {}", e); }
    });

    Ok(TestApp { base_url })
}

fn image_store() -> ImageStore {
    ImageStore::new(format!("target/test-data/{}/images", Uuid::new_v4()), 500_000)
}

async fn start_in_memory() -> anyhow::Result<TestApp> {
    let state = AppState::in_memory(Arc::new(MemoryStore::new()), TokenService::new("test-secret", 3600), image_store());
    serve(state).await
}

/// PostgreSQL-backed server, or `None` when no database is configured.
async fn start_postgres() -> anyhow::Result<Option<TestApp>> {
    if std::env::var("SKIP_DB_TESTS").is_ok() || std::env::var("DATABASE_URL").is_err() {
        eprintln!("DATABASE_URL missing or SKIP_DB_TESTS set; skip postgres e2e");
        return Ok(None);
    }
    let db = models::db::connect().await?;
    if let Err(e) = migration::Migrator::up(&db, None).await { eprintln!("migrations notice: {}", e); }
    let state = AppState::seaorm(db, TokenService::new("test-secret", 3600), image_store());
    Ok(Some(serve(state).await?))
}

fn place_form(title: &str) -> anyhow::Result<Form> {
    let image = Part::bytes(b"\x89PNG\r\n\x1a\nfake".to_vec())
        .file_name("place.png")
        .mime_str("image/png")?;
    Ok(Form::new()
        .text("title", title.to_string())
        .text("description", "A place created end to end")
        .text("address", "1 Network Lane")
        .text("lat", "51.5")
        .text("lng", "-0.12")
        .part("image", image))
}

/// Sign up (multipart, with avatar), log in, create, update, list and delete a place.
async fn full_flow(app: &TestApp) -> anyhow::Result<()> {
    let c = reqwest::Client::new();
    let email = format!("user_{}@example.com", Uuid::new_v4());

    let avatar = Part::bytes(vec![0xff, 0xd8, 0xff]).file_name("me.jpg").mime_str("image/jpeg")?;
    let signup = Form::new()
        .text("name", "Tester")
        .text("email", email.clone())
        .text("password", "secret1")
        .part("image", avatar);
    let res = c.post(format!("{}/api/users/signup", app.base_url)).multipart(signup).send().await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);

    let res = c.post(format!("{}/api/users/login", app.base_url))
        .json(&json!({"email": email, "password": "secret1"}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<Value>().await?;
    let token = body["token"].as_str().unwrap_or_default().to_string();
    let uid = body["userId"].as_str().unwrap_or_default().to_string();

    let res = c.post(format!("{}/api/places", app.base_url))
        .bearer_auth(&token)
        .multipart(place_form("Network Place")?)
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let place = res.json::<Value>().await?["place"].clone();
    let pid = place["id"].as_str().unwrap_or_default().to_string();
    assert_eq!(place["creator"], uid.as_str());

    let res = c.patch(format!("{}/api/places/{}", app.base_url, pid))
        .bearer_auth(&token)
        .json(&json!({"title": "Renamed Place", "description": "Changed over the wire"}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);

    let res = c.get(format!("{}/api/places/user/{}", app.base_url, uid)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["places"][0]["title"], "Renamed Place");

    let res = c.delete(format!("{}/api/places/{}", app.base_url, pid)).bearer_auth(&token).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.json::<Value>().await?["message"], "Deleted place.");

    let res = c.delete(format!("{}/api/places/{}", app.base_url, pid)).bearer_auth(&token).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn e2e_public_health() -> anyhow::Result<()> {
    let app = start_in_memory().await?;
    let res = reqwest::get(format!("{}/health", app.base_url)).await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn e2e_in_memory_full_flow() -> anyhow::Result<()> {
    let app = start_in_memory().await?;
    full_flow(&app).await
}

#[tokio::test]
async fn e2e_postgres_full_flow() -> anyhow::Result<()> {
    let Some(app) = start_postgres().await? else { return Ok(()) };
    full_flow(&app).await
}

#[tokio::test]
async fn e2e_protected_without_token_denied() -> anyhow::Result<()> {
    let app = start_in_memory().await?;
    let res = reqwest::Client::new()
        .post(format!("{}/api/places", app.base_url))
        .multipart(place_form("No token")?)
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::UNAUTHORIZED);
    assert_eq!(res.json::<Value>().await?["message"], "Authentication failed!");
    Ok(())
}

#[tokio::test]
async fn e2e_protected_with_expired_token_unauthorized() -> anyhow::Result<()> {
    let app = start_in_memory().await?;
    let now = unix_now()?;
    let expired = TokenService::new("test-secret", 3600).issue_at(Uuid::new_v4(), "late@example.com", now - 7200)?;
    let res = reqwest::Client::new()
        .delete(format!("{}/api/places/{}", app.base_url, Uuid::new_v4()))
        .bearer_auth(&expired.token)
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::UNAUTHORIZED);
    Ok(())
}

fn unix_now() -> anyhow::Result<i64> {
    Ok(std::time::SystemTime::now().duration_since(std::time::UNIX_EPOCH)?.as_secs() as i64)
}
