//! Tests for the upload function with a recording storage backend.

mod common;

use axum::http::StatusCode;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use common::{body_json, offline_state, RecordingStorage, Reply, CDN_PREFIX};
use dubsite_api::handlers::upload::{self, NO_FILE_MESSAGE};
use dubsite_api::invocation::Invocation;
use serde_json::{json, Value};

fn post(body: Value) -> Invocation {
    Invocation::new("POST").with_body(body.to_string())
}

#[tokio::test]
async fn missing_file_is_bad_request() {
    let storage = RecordingStorage::new(Reply::Url(None));
    let state = offline_state(storage.clone());

    for body in [json!({}), json!({ "file": "" }), json!({ "file": null, "fileName": "a.mp4" })] {
        let response = upload::handle(&state, post(body)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(&response)["error"], NO_FILE_MESSAGE);
    }

    assert!(storage.uploads().is_empty());
}

#[tokio::test]
async fn unpadded_payload_is_repaired() {
    let storage = RecordingStorage::new(Reply::Url(None));
    let state = offline_state(storage.clone());

    // "Hello" encodes to "SGVsbG8=", sent here without its padding.
    let response = upload::handle(
        &state,
        post(json!({ "file": "SGVsbG8", "fileName": "note.txt", "fileType": "text/plain" })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let uploads = storage.uploads();
    assert_eq!(uploads.len(), 1);
    assert_eq!(uploads[0].bytes, b"Hello");
    assert_eq!(uploads[0].content_type, "text/plain");
    assert!(uploads[0].filename.ends_with(".txt"));
}

#[tokio::test]
async fn data_url_header_is_stripped() {
    let storage = RecordingStorage::new(Reply::Url(None));
    let state = offline_state(storage.clone());
    let payload = format!("data:image/png;base64,{}", STANDARD.encode([0x89, b'P', b'N', b'G']));

    let response = upload::handle(
        &state,
        post(json!({ "file": payload, "fileName": "cover.png", "fileType": "image/png" })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(storage.uploads()[0].bytes, [0x89, b'P', b'N', b'G']);
}

#[tokio::test]
async fn space_mangled_plus_signs_are_restored() {
    let storage = RecordingStorage::new(Reply::Url(None));
    let state = offline_state(storage.clone());
    let bytes = [0xfb, 0xef, 0xbe];
    let encoded = STANDARD.encode(bytes);
    assert_eq!(encoded, "++++");

    let response = upload::handle(&state, post(json!({ "file": "    " }))).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(storage.uploads()[0].bytes, bytes);
}

#[tokio::test]
async fn url_falls_back_to_cdn_prefix() {
    let storage = RecordingStorage::new(Reply::Url(None));
    let state = offline_state(storage.clone());

    let response = upload::handle(
        &state,
        post(json!({ "file": STANDARD.encode(b"episode"), "fileName": "ep1.mkv" })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.header("Access-Control-Allow-Origin"), Some("*"));
    let json = body_json(&response);
    let filename = json["filename"].as_str().unwrap();
    assert!(filename.ends_with(".mkv"));
    assert_eq!(filename, storage.uploads()[0].filename);
    assert_eq!(json["url"], format!("{CDN_PREFIX}/{filename}"));
}

#[tokio::test]
async fn storage_url_is_passed_through() {
    let storage = RecordingStorage::new(Reply::Url(Some("https://files.test/abc".into())));
    let state = offline_state(storage);

    let response = upload::handle(&state, post(json!({ "file": STANDARD.encode(b"x") }))).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(&response)["url"], "https://files.test/abc");
}

#[tokio::test]
async fn defaults_to_mp4_video() {
    let storage = RecordingStorage::new(Reply::Url(None));
    let state = offline_state(storage.clone());

    let response = upload::handle(&state, post(json!({ "file": STANDARD.encode(b"frames") }))).await;

    assert_eq!(response.status(), StatusCode::OK);
    let uploads = storage.uploads();
    assert_eq!(uploads[0].content_type, "video/mp4");
    assert!(uploads[0].filename.ends_with(".mp4"));
}

#[tokio::test]
async fn filenames_are_unique_per_upload() {
    let storage = RecordingStorage::new(Reply::Url(None));
    let state = offline_state(storage.clone());

    for _ in 0..2 {
        let body = json!({ "file": STANDARD.encode(b"same"), "fileName": "same.mp4" });
        upload::handle(&state, post(body)).await;
    }

    let uploads = storage.uploads();
    assert_eq!(uploads.len(), 2);
    assert_ne!(uploads[0].filename, uploads[1].filename);
}

#[tokio::test]
async fn storage_failure_is_upload_failed() {
    let storage = RecordingStorage::new(Reply::Fail(502));
    let state = offline_state(storage.clone());

    let response = upload::handle(&state, post(json!({ "file": STANDARD.encode(b"x") }))).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let error = body_json(&response)["error"].as_str().unwrap().to_string();
    assert!(error.starts_with("Upload failed: "), "got {error}");
    assert!(error.contains("502"));
    assert_eq!(storage.uploads().len(), 1);
}

#[tokio::test]
async fn undecodable_payload_never_reaches_storage() {
    let storage = RecordingStorage::new(Reply::Url(None));
    let state = offline_state(storage.clone());

    let response = upload::handle(&state, post(json!({ "file": "%%%%" }))).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body_json(&response)["error"]
        .as_str()
        .unwrap()
        .starts_with("Upload failed: "));
    assert!(storage.uploads().is_empty());
}

#[tokio::test]
async fn upload_needs_no_admin_password() {
    let storage = RecordingStorage::new(Reply::Url(None));
    let state = offline_state(storage.clone());

    let body = json!({ "file": STANDARD.encode(b"x"), "admin_password": "wrong" });
    let response = upload::handle(&state, post(body)).await;

    assert_eq!(response.status(), StatusCode::OK);
}
