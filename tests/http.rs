use archive_ui::favorite::{Phase, Settled};
use archive_ui::models::{EntrySnapshot, FavIntbool, PageSnapshot, SetFavoriteRequest};
use archive_ui::{AppError, Config, FavoriteEndpoint, HttpEndpoint, Page, load_page, persist_page};
use axum::{
    Form, Json, Router,
    extract::State,
    http::StatusCode,
    routing::post,
};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::process::Command;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// In-memory stand-in for the archive's `set-favorite` route.
#[derive(Clone, Default)]
struct FakeArchive {
    favorites: Arc<Mutex<HashMap<String, bool>>>,
    received: Arc<Mutex<Vec<HashMap<String, String>>>>,
}

async fn set_favorite(
    State(archive): State<FakeArchive>,
    Form(form): Form<HashMap<String, String>>,
) -> Json<Value> {
    archive.received.lock().await.push(form.clone());

    let entry_id = form.get("entryId").filter(|id| !id.is_empty());
    let fav = form.get("favIntbool").and_then(|v| v.parse::<u8>().ok());
    let (Some(entry_id), Some(fav)) = (entry_id, fav) else {
        return Json(json!({ "error": "Missing entry id or fav value from data!" }));
    };
    if entry_id == "locked" {
        return Json(json!({ "error": "database is locked" }));
    }

    archive
        .favorites
        .lock()
        .await
        .insert(entry_id.clone(), fav == 0);
    Json(json!({}))
}

async fn broken() -> (StatusCode, &'static str) {
    (StatusCode::INTERNAL_SERVER_ERROR, "boom")
}

async fn spawn_archive() -> (String, FakeArchive) {
    let archive = FakeArchive::default();
    let app = Router::new()
        .route("/entry/set-favorite", post(set_favorite))
        .route("/broken/entry/set-favorite", post(broken))
        .with_state(archive.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind random port");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("fake archive crashed");
    });

    (format!("http://{addr}"), archive)
}

fn snapshot() -> PageSnapshot {
    PageSnapshot {
        entries: vec![
            EntrySnapshot {
                id: "11".into(),
                title: "Tide pools".into(),
                favorite: false,
                selftext: None,
            },
            EntrySnapshot {
                id: "12".into(),
                title: "Cicadas".into(),
                favorite: true,
                selftext: Some("recorded in july".into()),
            },
            EntrySnapshot {
                id: "locked".into(),
                title: "Locked entry".into(),
                favorite: false,
                selftext: None,
            },
        ],
        fav_display: true,
    }
}

fn endpoint(root: &str) -> HttpEndpoint {
    HttpEndpoint::new(root, Duration::from_secs(3)).unwrap()
}

fn unique_page_path() -> std::path::PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!("archive_ui_http_{}_{}.json", std::process::id(), nanos));
    path
}

#[tokio::test]
async fn http_toggle_posts_form_with_pre_click_value() {
    let (root, archive) = spawn_archive().await;
    let mut page = Page::new(snapshot(), &Config::default());

    let settled = page.toggle_favorite("12", &endpoint(&root)).await.unwrap();
    assert_eq!(settled, vec![Settled::Confirmed]);

    let received = archive.received.lock().await;
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].get("entryId").map(String::as_str), Some("12"));
    assert_eq!(received[0].get("favIntbool").map(String::as_str), Some("1"));
    assert_eq!(archive.favorites.lock().await.get("12"), Some(&false));
    assert_eq!(page.is_favorited("12"), Some(false));
    assert_eq!(page.favorite_phase("12"), Phase::Confirmed);
}

#[tokio::test]
async fn http_toggle_twice_matches_server_state() {
    let (root, archive) = spawn_archive().await;
    let endpoint = endpoint(&root);
    let mut page = Page::new(snapshot(), &Config::default());

    page.toggle_favorite("11", &endpoint).await.unwrap();
    assert_eq!(archive.favorites.lock().await.get("11"), Some(&true));
    assert_eq!(page.is_favorited("11"), Some(true));

    page.toggle_favorite("11", &endpoint).await.unwrap();
    assert_eq!(archive.favorites.lock().await.get("11"), Some(&false));
    assert_eq!(page.is_favorited("11"), Some(false));
}

#[tokio::test]
async fn http_error_body_is_not_rolled_back() {
    let (root, _archive) = spawn_archive().await;
    let mut page = Page::new(snapshot(), &Config::default());

    let settled = page.toggle_favorite("locked", &endpoint(&root)).await.unwrap();
    assert_eq!(
        settled,
        vec![Settled::Rejected {
            message: "database is locked".into(),
            rolled_back: false,
        }]
    );
    assert_eq!(page.is_favorited("locked"), Some(true));
    assert_eq!(page.favorite_phase("locked"), Phase::Failed);
}

#[tokio::test]
async fn http_error_body_rolls_back_when_configured() {
    let (root, _archive) = spawn_archive().await;
    let config = Config {
        rollback_on_app_error: true,
        ..Config::default()
    };
    let mut page = Page::new(snapshot(), &config);

    page.toggle_favorite("locked", &endpoint(&root)).await.unwrap();
    assert_eq!(page.is_favorited("locked"), Some(false));
    assert_eq!(page.notices().len(), 1);
}

#[tokio::test]
async fn http_server_failure_rolls_back() {
    let (root, _archive) = spawn_archive().await;
    let mut page = Page::new(snapshot(), &Config::default());

    let settled = page
        .toggle_favorite("11", &endpoint(&format!("{root}/broken")))
        .await
        .unwrap();
    assert!(matches!(settled.as_slice(), [Settled::RolledBack { .. }]));
    assert_eq!(page.is_favorited("11"), Some(false));
    assert_eq!(page.notices().len(), 1);
}

#[tokio::test]
async fn http_unreachable_server_is_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let request = SetFavoriteRequest {
        entry_id: "11".into(),
        fav_intbool: FavIntbool::NOT_FAVORITED,
    };
    let err = endpoint(&format!("http://127.0.0.1:{port}"))
        .set_favorite(&request)
        .await
        .unwrap_err();
    assert!(err.is_transport());
    assert!(matches!(err, AppError::Transport(_)));
}

#[tokio::test]
async fn http_missing_fields_get_error_body() {
    let (root, _archive) = spawn_archive().await;
    let request = SetFavoriteRequest {
        entry_id: String::new(),
        fav_intbool: FavIntbool::NOT_FAVORITED,
    };
    let response = endpoint(&root).set_favorite(&request).await.unwrap();
    assert_eq!(
        response.error.as_deref(),
        Some("Missing entry id or fav value from data!")
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn binary_toggle_persists_page() {
    let (root, archive) = spawn_archive().await;
    let page_path = unique_page_path();
    persist_page(&page_path, &snapshot()).await.unwrap();

    let bin_path = page_path.clone();
    let output = tokio::task::spawn_blocking(move || {
        Command::new(env!("CARGO_BIN_EXE_archive_ui"))
            .args(["toggle", "11"])
            .env("ROOT_URL", root)
            .env("APP_PAGE_PATH", bin_path)
            .env("RUST_LOG", "info")
            .output()
            .expect("failed to run archive_ui")
    })
    .await
    .unwrap();

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("entry 11: favorite saved"), "{stdout}");

    assert_eq!(archive.favorites.lock().await.get("11"), Some(&true));
    let saved = load_page(&page_path).await;
    assert!(saved.entries[0].favorite);
    assert!(saved.entries[1].favorite);

    let _ = std::fs::remove_file(page_path);
}

#[tokio::test(flavor = "multi_thread")]
async fn binary_does_not_persist_refused_favorite() {
    let (root, archive) = spawn_archive().await;
    let page_path = unique_page_path();
    persist_page(&page_path, &snapshot()).await.unwrap();

    let bin_path = page_path.clone();
    let output = tokio::task::spawn_blocking(move || {
        Command::new(env!("CARGO_BIN_EXE_archive_ui"))
            .args(["toggle", "locked"])
            .env("ROOT_URL", root)
            .env("APP_PAGE_PATH", bin_path)
            .output()
            .expect("failed to run archive_ui")
    })
    .await
    .unwrap();

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("entry locked: server error: database is locked"), "{stdout}");

    assert_eq!(archive.favorites.lock().await.get("locked"), None);
    let saved = load_page(&page_path).await;
    assert!(!saved.entries[2].favorite);
    assert!(saved.entries[1].favorite);

    let _ = std::fs::remove_file(page_path);
}

#[test]
fn binary_rejects_unknown_command() {
    let output = Command::new(env!("CARGO_BIN_EXE_archive_ui"))
        .args(["explode"])
        .env("APP_PAGE_PATH", unique_page_path())
        .output()
        .expect("failed to run archive_ui");
    assert_eq!(output.status.code(), Some(2));
}
