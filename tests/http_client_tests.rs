//! HttpLinkApi against an in-process fake of the link API

use actix_web::{App, HttpResponse, HttpServer, web};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use kshort::client::{HttpLinkApi, LinkApi};
use kshort::errors::KshortError;
use kshort::resolver::{RedirectResolver, ResolveOutcome};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ShortenBody {
    original_url: String,
    user_id: String,
}

async fn list(path: web::Path<String>) -> HttpResponse {
    match path.as_str() {
        "user_1" => HttpResponse::Ok().json(json!({
            "urls": [{
                "shortCode": "abc123",
                "originalUrl": "example.com/page",
                "userId": "user_1",
                "createdAt": "2025-01-05T15:04:00Z"
            }]
        })),
        "mixed" => HttpResponse::Ok().json(json!({
            "urls": [
                {
                    "shortCode": "abc123",
                    "originalUrl": "example.com/page",
                    "createdAt": "2025-01-05 15:04:00"
                },
                {
                    "shortCode": "def456",
                    "originalUrl": "example.org",
                    "createdAt": "not a date"
                }
            ]
        })),
        "broken" => HttpResponse::InternalServerError().body("oops"),
        // no `urls` key at all
        _ => HttpResponse::Ok().json(json!({})),
    }
}

async fn shorten(body: web::Json<ShortenBody>) -> HttpResponse {
    if body.user_id.is_empty() {
        return HttpResponse::Unauthorized().json(json!({ "error": "Missing user" }));
    }
    match body.original_url.as_str() {
        "bad" => HttpResponse::BadRequest().json(json!({ "error": "Invalid URL" })),
        "boom" => HttpResponse::InternalServerError().body("not json"),
        _ => HttpResponse::Created().json(json!({ "shortCode": "new123" })),
    }
}

async fn delete(path: web::Path<(String, String)>) -> HttpResponse {
    let (user_id, code) = path.into_inner();
    if user_id == "user_1" && code == "abc 123" {
        HttpResponse::Ok().json(json!({ "message": "deleted" }))
    } else {
        HttpResponse::NotFound().json(json!({ "error": "URL not found" }))
    }
}

async fn lookup(path: web::Path<String>) -> HttpResponse {
    match path.as_str() {
        "abc123" => HttpResponse::Ok().json(json!({ "originalUrl": "example.com/page" })),
        "empty" => HttpResponse::Ok().finish(),
        "blank" => HttpResponse::Ok().json(json!({ "originalUrl": "" })),
        "garbled" => HttpResponse::Ok().body("<html>"),
        _ => HttpResponse::NotFound().json(json!({ "error": "Not found" })),
    }
}

/// Start the fake API on an ephemeral port and return its base URL
fn spawn_fake_api() -> String {
    let server = HttpServer::new(|| {
        App::new()
            // lookup 必须先注册，否则会被 /urls/{user_id}/{code} 吃掉
            .route("/urls/lookup/{code}", web::get().to(lookup))
            .route("/urls/{user_id}", web::get().to(list))
            .route("/urls/{user_id}/{code}", web::delete().to(delete))
            .route("/shorten", web::post().to(shorten))
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .expect("Failed to bind fake API");

    let addr = server.addrs()[0];
    actix_rt::spawn(server.run());
    format!("http://{}", addr)
}

fn client(base_url: &str) -> HttpLinkApi {
    HttpLinkApi::new(base_url, Duration::from_secs(5)).unwrap()
}

#[actix_rt::test]
async fn test_list_links() {
    let api = client(&spawn_fake_api());

    let links = api.list_links("user_1").await.unwrap();
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].short_code, "abc123");
    assert_eq!(links[0].owner_id.as_deref(), Some("user_1"));
    assert!(links[0].created_at.is_some());

    assert!(api.list_links("nobody").await.unwrap().is_empty());
}

#[actix_rt::test]
async fn test_list_links_survives_odd_timestamps() {
    let api = client(&spawn_fake_api());

    let links = api.list_links("mixed").await.unwrap();
    assert_eq!(links.len(), 2);
    assert_eq!(
        links[0].created_at.map(|t| t.to_rfc3339()).as_deref(),
        Some("2025-01-05T15:04:00+00:00")
    );
    assert_eq!(links[1].short_code, "def456");
    assert!(links[1].created_at.is_none());
}

#[actix_rt::test]
async fn test_list_links_non_json_error() {
    let api = client(&spawn_fake_api());

    match api.list_links("broken").await {
        Err(KshortError::Upstream { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "Internal Server Error");
        }
        other => panic!("expected upstream error, got {:?}", other),
    }
}

#[actix_rt::test]
async fn test_create_link() {
    let api = client(&spawn_fake_api());

    assert_eq!(
        api.create_link("https://example.com", "user_1").await.unwrap(),
        "new123"
    );

    match api.create_link("bad", "user_1").await {
        Err(KshortError::Upstream { status, message }) => {
            assert_eq!(status, 400);
            assert_eq!(message, "Invalid URL");
        }
        other => panic!("expected upstream error, got {:?}", other),
    }

    assert!(matches!(
        api.create_link("boom", "user_1").await,
        Err(KshortError::Upstream { status: 500, .. })
    ));
}

#[actix_rt::test]
async fn test_delete_link_encodes_segments() {
    let api = client(&spawn_fake_api());

    api.delete_link("user_1", "abc 123").await.unwrap();
    assert!(matches!(
        api.delete_link("user_1", "missing").await,
        Err(KshortError::Upstream { status: 404, .. })
    ));
}

#[actix_rt::test]
async fn test_lookup_variants() {
    let api = client(&spawn_fake_api());

    assert_eq!(
        api.lookup("abc123").await.unwrap().as_deref(),
        Some("example.com/page")
    );
    assert_eq!(api.lookup("empty").await.unwrap(), None);
    assert_eq!(api.lookup("blank").await.unwrap(), None);
    assert!(matches!(
        api.lookup("garbled").await,
        Err(KshortError::Decode(_))
    ));
    assert!(matches!(
        api.lookup("zzz999").await,
        Err(KshortError::Upstream { status: 404, .. })
    ));
}

#[actix_rt::test]
async fn test_unreachable_api_is_transport_error() {
    // bind then drop to get a port nothing listens on
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let api = client(&format!("http://127.0.0.1:{}", port));

    assert!(matches!(
        api.list_links("user_1").await,
        Err(KshortError::Transport(_))
    ));
}

#[actix_rt::test]
async fn test_resolver_over_http() {
    let base = spawn_fake_api();
    let resolver = RedirectResolver::new(std::sync::Arc::new(client(&base)), Duration::ZERO);

    assert_eq!(
        resolver.resolve("abc123").await,
        ResolveOutcome::Navigate("https://example.com/page".to_string())
    );
    assert_eq!(resolver.resolve("zzz999").await, ResolveOutcome::NotFound);
    assert_eq!(resolver.resolve("empty").await, ResolveOutcome::NotFound);
}
