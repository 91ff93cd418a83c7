//! Unit tests for response helpers

use ad_studio::response::{base64, file};

#[test]
fn test_base64_encode_decode() {
    let original = b"Hello, World!";
    let encoded = base64::encode(original);
    let decoded = base64::decode(&encoded).unwrap();

    assert_eq!(original.as_slice(), decoded.as_slice());
}

#[test]
fn test_base64_decode_data_uri() {
    let data_uri = "data:image/png;base64,SGVsbG8sIFdvcmxkIQ==";
    let decoded = base64::decode(data_uri).unwrap();

    assert_eq!(b"Hello, World!", decoded.as_slice());
}

#[test]
fn test_media_type_of() {
    assert_eq!(base64::media_type_of("data:image/png;base64,abc"), Some("image/png"));
    assert_eq!(base64::media_type_of("data:image/jpeg;base64,abc"), Some("image/jpeg"));
    assert_eq!(base64::media_type_of("not a data uri"), None);
}

#[test]
fn test_data_uri_round_trip() {
    let uri = base64::data_uri("image/png", &base64::encode(b"test data"));

    assert!(uri.starts_with("data:image/png;base64,"));
    assert_eq!(base64::decode(&uri).unwrap(), b"test data");
}

#[test]
fn test_extension_for() {
    assert_eq!(file::extension_for("image/jpeg"), "jpg");
    assert_eq!(file::extension_for("image/png"), "png");
}

#[tokio::test]
async fn test_cleanup_removes_only_expired() {
    let dir = tempfile::tempdir().unwrap();
    let handler = file::FileHandler::new(dir.path());
    handler.save_raw(b"old", "png").await.unwrap();

    // Nothing is older than a day
    assert_eq!(handler.cleanup(86400).await.unwrap(), 0);

    tokio::time::sleep(std::time::Duration::from_millis(1100)).await;
    assert_eq!(handler.cleanup(0).await.unwrap(), 1);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}
