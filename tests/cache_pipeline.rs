//! End-to-end tests: client → proxy → mock origin, with an in-process store.

use std::time::Duration;

use cache_proxy::cache::{CacheKey, CacheStore, MemoryStore};
use cache_proxy::origin::FALLBACK_BODY;
use cache_proxy::proxy::resolve_url;
use reqwest::header::{CONTENT_TYPE, COOKIE};

mod common;

use common::{client, start_origin, unreachable_addr, wait_for_entries, TestProxy};

#[tokio::test]
async fn test_binary_asset_is_cached_byte_exact() {
    let origin = start_origin("200 OK", &["Content-Type: image/jpeg"], &[0x01, 0x02, 0x03, 0x04]).await;
    let store = MemoryStore::new();
    let proxy = TestProxy::start(&origin.base_url(), &store).await;
    let client = client();

    let first = client.get(proxy.url("/photo.jpg")).send().await.unwrap();
    assert_eq!(first.status(), 200);
    assert_eq!(first.headers()[CONTENT_TYPE], "image/jpeg");
    assert_eq!(&first.bytes().await.unwrap()[..], &[0x01, 0x02, 0x03, 0x04]);
    assert_eq!(origin.hits(), 1);
    assert_eq!(origin.cookies(), vec![None]);

    wait_for_entries(&store, 1).await;

    let second = client.get(proxy.url("/photo.jpg")).send().await.unwrap();
    assert_eq!(second.status(), 200);
    assert_eq!(second.headers()[CONTENT_TYPE], "image/jpeg");
    assert_eq!(&second.bytes().await.unwrap()[..], &[0x01, 0x02, 0x03, 0x04]);
    assert_eq!(origin.hits(), 1, "second request must be served from the store");
}

#[tokio::test]
async fn test_only_allow_listed_cookies_shape_the_key() {
    let origin = start_origin(
        "200 OK",
        &["Content-Type: text/html", "Set-Cookie: JSESSIONID=42", "Cache-Control: no-cache"],
        b"hello",
    )
    .await;
    let store = MemoryStore::new();
    let proxy = TestProxy::start(&origin.base_url(), &store).await;
    let client = client();

    let first = client
        .get(proxy.url("/page"))
        .header(COOKIE, "LANG=en; SESSION=abc")
        .send()
        .await
        .unwrap();
    assert_eq!(first.status(), 200);
    assert!(first.headers().get("set-cookie").is_none());
    assert!(first.headers().get("cache-control").is_none());
    assert_eq!(first.text().await.unwrap(), "hello");
    assert_eq!(origin.cookies(), vec![Some("LANG=en".to_string())]);

    wait_for_entries(&store, 1).await;
    let key = CacheKey::derive(&resolve_url(&origin.base_url(), "/page", &[]), "LANG=en");
    assert!(store.exists(&key).await.unwrap());

    let second = client
        .get(proxy.url("/page"))
        .header(COOKIE, "SESSION=other; LANG=en")
        .send()
        .await
        .unwrap();
    assert_eq!(second.headers()[CONTENT_TYPE], "text/html");
    assert_eq!(second.text().await.unwrap(), "hello");
    assert_eq!(origin.hits(), 1);
}

#[tokio::test]
async fn test_unreachable_origin_serves_fallback() {
    let addr = unreachable_addr().await;
    let store = MemoryStore::new();
    let proxy = TestProxy::start(&format!("http://{}", addr), &store).await;

    let response = client().get(proxy.url("/page")).send().await.unwrap();
    assert_eq!(response.status(), 404);
    assert_eq!(response.text().await.unwrap(), FALLBACK_BODY);

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_origin_error_status_serves_fallback() {
    let origin = start_origin("500 Internal Server Error", &[], b"stack trace").await;
    let store = MemoryStore::new();
    let proxy = TestProxy::start(&origin.base_url(), &store).await;

    let response = client().get(proxy.url("/page")).send().await.unwrap();
    assert_eq!(response.status(), 404);
    assert_eq!(response.text().await.unwrap(), FALLBACK_BODY);
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_robots_txt_bypasses_cache() {
    let origin = start_origin("200 OK", &[], b"origin robots").await;
    let store = MemoryStore::new();
    let proxy = TestProxy::start(&origin.base_url(), &store).await;

    let response = client().get(proxy.url("/robots.txt")).send().await.unwrap();
    assert_eq!(response.status(), 200);
    assert!(response.headers()[CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/plain"));
    assert_eq!(response.text().await.unwrap(), "User-agent: *\nDisallow: /search/");
    assert_eq!(origin.hits(), 0);
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_empty_entry_is_reported_as_corruption() {
    let origin = start_origin("200 OK", &[], b"fresh").await;
    let store = MemoryStore::new();
    let key = CacheKey::derive(&resolve_url(&origin.base_url(), "/page", &[]), "");
    store.set(&key, String::new(), Duration::from_secs(60)).await.unwrap();
    let proxy = TestProxy::start(&origin.base_url(), &store).await;

    let response = client().get(proxy.url("/page")).send().await.unwrap();
    assert_eq!(response.status(), 500);
    assert_eq!(response.text().await.unwrap(), "Cache corruption");
    assert_eq!(origin.hits(), 0);
}

#[tokio::test]
async fn test_query_string_reaches_key_comma_joined() {
    let origin = start_origin("200 OK", &["Content-Type: text/html"], b"results").await;
    let store = MemoryStore::new();
    let proxy = TestProxy::start(&origin.base_url(), &store).await;

    let response = client().get(proxy.url("/search?name=Bach&page=2")).send().await.unwrap();
    assert_eq!(response.text().await.unwrap(), "results");

    wait_for_entries(&store, 1).await;
    let url = format!("{}/search?name=Bach,page=2", origin.base_url());
    assert!(store.exists(&CacheKey::derive(&url, "")).await.unwrap());
}
