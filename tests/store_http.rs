//! HttpStore against a mock json-server.
//!
//! The clients are blocking, so each call runs on a blocking thread while the
//! mock server keeps the async runtime.

use citywx::{CityId, CityPatch, CityStore, Error, HttpStore, NewCity};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn with_store<T: Send + 'static>(
    server: &MockServer,
    f: impl FnOnce(HttpStore) -> T + Send + 'static,
) -> T {
    let url = format!("{}/cities", server.uri());
    tokio::task::spawn_blocking(move || f(HttpStore::new(&url).unwrap()))
        .await
        .unwrap()
}

#[tokio::test]
async fn test_list_all_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cities"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "1", "name": "paris", "temperature": 18, "condition": "cloudy", "humidity": 60},
            {"id": 2, "name": "oslo", "temperature": -1.5, "condition": "snow", "humidity": 85}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let cities = with_store(&server, |store| store.list_all()).await.unwrap();

    assert_eq!(cities.len(), 2);
    assert_eq!(cities[0].name, "paris");
    assert_eq!(cities[0].id, Some(CityId::new("1")));
    assert_eq!(cities[1].id, Some(CityId::new("2")));
    assert_eq!(cities[1].temperature, -1.5);
}

#[tokio::test]
async fn test_list_all_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cities"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = with_store(&server, |store| store.list_all()).await.unwrap_err();
    assert!(matches!(err, Error::StoreUnavailable(_)), "{err:?}");
}

#[tokio::test]
async fn test_list_all_not_a_sequence() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cities"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"cities": []})))
        .mount(&server)
        .await;

    let err = with_store(&server, |store| store.list_all()).await.unwrap_err();
    assert!(matches!(err, Error::StoreUnavailable(_)), "{err:?}");
}

#[tokio::test]
async fn test_list_all_unreachable() {
    // nothing listens on the discard port
    let err = tokio::task::spawn_blocking(|| HttpStore::new("http://127.0.0.1:9/cities").unwrap().list_all())
        .await
        .unwrap()
        .unwrap_err();
    assert!(matches!(err, Error::StoreUnavailable(_)), "{err:?}");
}

#[tokio::test]
async fn test_create_posts_record_without_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/cities"))
        .and(body_json(json!({
            "name": "lyon", "temperature": 12.5, "condition": "Light rain", "humidity": 88
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "f3a9", "name": "lyon", "temperature": 12.5, "condition": "Light rain", "humidity": 88
        })))
        .expect(1)
        .mount(&server)
        .await;

    let created = with_store(&server, |store| {
        store.create(&NewCity {
            name: "lyon".into(),
            temperature: 12.5,
            condition: "Light rain".into(),
            humidity: 88,
        })
    })
    .await
    .unwrap();

    assert_eq!(created.id, Some(CityId::new("f3a9")));
    assert_eq!(created.name, "lyon");
}

#[tokio::test]
async fn test_create_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/cities"))
        .respond_with(ResponseTemplate::new(400))
        .mount(&server)
        .await;

    let err = with_store(&server, |store| {
        store.create(&NewCity {
            name: "lyon".into(),
            temperature: 1.0,
            condition: "Clear".into(),
            humidity: 1,
        })
    })
    .await
    .unwrap_err();
    assert!(matches!(err, Error::StoreWriteError(_)), "{err:?}");
}

#[tokio::test]
async fn test_patch_sends_only_changed_fields() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/cities/1"))
        .and(body_json(json!({"humidity": 75})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "1", "name": "paris", "temperature": 18, "condition": "cloudy", "humidity": 75
        })))
        .expect(1)
        .mount(&server)
        .await;

    let updated = with_store(&server, |store| {
        store.patch(
            &CityId::new("1"),
            &CityPatch {
                humidity: Some(75),
                ..Default::default()
            },
        )
    })
    .await
    .unwrap();

    assert_eq!(updated.humidity, 75);
    assert_eq!(updated.condition, "cloudy");
}

#[tokio::test]
async fn test_patch_unknown_id() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/cities/99"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({})))
        .mount(&server)
        .await;

    let err = with_store(&server, |store| store.patch(&CityId::new("99"), &CityPatch::default()))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::StoreWriteError(_)), "{err:?}");
}

#[tokio::test]
async fn test_delete() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/cities/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/cities/2"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let (first, second) = with_store(&server, |store| {
        (
            store.delete(&CityId::new("1")),
            store.delete(&CityId::new("2")),
        )
    })
    .await;

    assert!(first.is_ok());
    assert!(matches!(second, Err(Error::StoreWriteError(_))));
}

#[tokio::test]
async fn test_writes_unreachable() {
    let (created, patched) = tokio::task::spawn_blocking(|| {
        let store = HttpStore::new("http://127.0.0.1:9/cities").unwrap();
        let created = store.create(&NewCity {
            name: "lyon".into(),
            temperature: 1.0,
            condition: "Clear".into(),
            humidity: 1,
        });
        let patched = store.patch(&CityId::new("1"), &CityPatch::default());
        (created, patched)
    })
    .await
    .unwrap();

    assert!(matches!(created, Err(Error::StoreWriteError(_))), "{created:?}");
    assert!(matches!(patched, Err(Error::StoreWriteError(_))), "{patched:?}");
}

#[tokio::test]
async fn test_write_accepted_with_unreadable_reply() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/cities/1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let err = with_store(&server, |store| {
        store.patch(
            &CityId::new("1"),
            &CityPatch {
                humidity: Some(75),
                ..Default::default()
            },
        )
    })
    .await
    .unwrap_err();

    match err {
        Error::StoreWriteError(detail) => {
            assert!(detail.contains("may have been applied"), "{detail}")
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_item_id_is_one_encoded_segment() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/cities/a%2F..%2Fb%3Fx"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let deleted = with_store(&server, |store| store.delete(&CityId::new("a/../b?x"))).await;
    assert!(deleted.is_ok(), "{deleted:?}");
}

#[test]
fn test_invalid_store_url() {
    assert!(matches!(HttpStore::new("not a url"), Err(Error::Config(_))));
    assert!(matches!(HttpStore::new("mailto:cities@example.com"), Err(Error::Config(_))));
}
