//! Upload sequencer tests against a mock HTTP endpoint

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use fms_report::error::Result;
use fms_report::location::{LocationSource, NullSource, StaticSource};
use fms_report::types::{LocationFix, SubmissionDraft, UploadOutcome};
use fms_report::upload::Uploader;
use std::io::Write;
use tempfile::NamedTempFile;
use url::Url;

/// Source that replays the exact same reading forever (stalled GPS)
struct StalledSource(LocationFix);

#[async_trait]
impl LocationSource for StalledSource {
    async fn latest_fix(&self) -> Result<Option<LocationFix>> {
        Ok(Some(self.0))
    }
}

fn photo_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp photo");
    file.write_all(b"jpeg bytes stand-in").expect("write photo");
    file
}

fn draft_with(photo: &NamedTempFile) -> SubmissionDraft {
    SubmissionDraft {
        subject: "Pothole on Main St".to_string(),
        reporter_name: "Jo Bloggs".to_string(),
        reporter_email: "jo@example.com".to_string(),
        photo_path: Some(photo.path().to_path_buf()),
        latitude: Some(51.5),
        longitude: Some(-0.12),
    }
}

fn endpoint(server: &mockito::Server) -> Url {
    Url::parse(&format!("{}/import", server.url())).expect("mock URL")
}

#[tokio::test]
async fn success_body_yields_success_with_submitted_coordinates() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/import")
        .match_header(
            "content-type",
            mockito::Matcher::Regex("^multipart/form-data".to_string()),
        )
        .with_status(200)
        .with_body("SUCCESS")
        .create_async()
        .await;

    let photo = photo_file();
    let uploader = Uploader::with_endpoint(endpoint(&server));
    let source = StaticSource::new(51.5, -0.12, 8.0);

    let outcome = uploader
        .submit(&draft_with(&photo), &source)
        .await
        .expect("submit");

    assert_eq!(
        outcome,
        UploadOutcome::Success {
            latitude: 51.5,
            longitude: -0.12
        }
    );
    mock.assert_async().await;
}

#[tokio::test]
async fn multipart_form_carries_the_report_fields() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/import")
        .match_body(mockito::Matcher::AllOf(vec![
            mockito::Matcher::Regex(r#"name="service""#.to_string()),
            mockito::Matcher::Regex(r#"name="subject""#.to_string()),
            mockito::Matcher::Regex("Pothole on Main St".to_string()),
            mockito::Matcher::Regex(r#"name="name""#.to_string()),
            mockito::Matcher::Regex(r#"name="email""#.to_string()),
            mockito::Matcher::Regex(r#"name="lat""#.to_string()),
            mockito::Matcher::Regex(r#"name="lon""#.to_string()),
            mockito::Matcher::Regex(r#"name="photo""#.to_string()),
            mockito::Matcher::Regex("image/jpeg".to_string()),
        ]))
        .with_status(200)
        .with_body("SUCCESS")
        .create_async()
        .await;

    let photo = photo_file();
    let uploader = Uploader::with_endpoint(endpoint(&server));
    let source = StaticSource::new(51.5, -0.12, 8.0);

    let outcome = uploader
        .submit(&draft_with(&photo), &source)
        .await
        .expect("submit");
    assert!(outcome.is_success());
    mock.assert_async().await;
}

#[tokio::test]
async fn non_success_body_is_rejected_verbatim() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/import")
        .with_status(200)
        .with_body("ERROR: bad email")
        .create_async()
        .await;

    let photo = photo_file();
    let uploader = Uploader::with_endpoint(endpoint(&server));
    let source = StaticSource::new(51.5, -0.12, 8.0);

    let outcome = uploader
        .submit(&draft_with(&photo), &source)
        .await
        .expect("submit");
    assert_eq!(
        outcome,
        UploadOutcome::ServerRejected("ERROR: bad email".to_string())
    );
}

#[tokio::test]
async fn missing_photo_never_touches_the_network() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/import")
        .expect(0)
        .create_async()
        .await;

    let photo = photo_file();
    let mut draft = draft_with(&photo);
    draft.photo_path = Some(photo.path().with_extension("gone"));

    let uploader = Uploader::with_endpoint(endpoint(&server));
    let source = StaticSource::new(51.5, -0.12, 8.0);

    let outcome = uploader.submit(&draft, &source).await.expect("submit");
    assert_eq!(outcome, UploadOutcome::PhotoMissing);
    mock.assert_async().await;
}

#[tokio::test]
async fn unavailable_location_never_touches_the_network() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/import")
        .expect(0)
        .create_async()
        .await;

    let photo = photo_file();
    let uploader = Uploader::with_endpoint(endpoint(&server));

    let outcome = uploader
        .submit(&draft_with(&photo), &NullSource)
        .await
        .expect("submit");
    assert_eq!(outcome, UploadOutcome::LocationUnavailable);
    mock.assert_async().await;
}

#[tokio::test]
async fn inaccurate_fresh_fix_blocks_the_upload() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/import")
        .expect(0)
        .create_async()
        .await;

    let photo = photo_file();
    let uploader = Uploader::with_endpoint(endpoint(&server));
    let source = StaticSource::new(51.5, -0.12, 150.0);

    let outcome = uploader
        .submit(&draft_with(&photo), &source)
        .await
        .expect("submit");
    assert_eq!(outcome, UploadOutcome::LocationInaccurate);
    mock.assert_async().await;
}

#[tokio::test]
async fn stalled_source_fails_the_second_attempt() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/import")
        .with_status(200)
        .with_body("ERROR: out of area")
        .expect(1)
        .create_async()
        .await;

    let photo = photo_file();
    let uploader = Uploader::with_endpoint(endpoint(&server));
    let stalled = StalledSource(LocationFix {
        latitude: 51.5,
        longitude: -0.12,
        accuracy_meters: 8.0,
        timestamp: Utc.timestamp_opt(1_000, 0).unwrap(),
    });

    // First attempt has no previous reading, so it goes through (and the
    // server rejects it, leaving the draft intact for retry).
    let first = uploader
        .submit(&draft_with(&photo), &stalled)
        .await
        .expect("submit");
    assert!(matches!(first, UploadOutcome::ServerRejected(_)));

    // The retry sees the same timestamp again: the source has stalled.
    let second = uploader
        .submit(&draft_with(&photo), &stalled)
        .await
        .expect("submit");
    assert_eq!(second, UploadOutcome::LocationInaccurate);
    mock.assert_async().await;
}

#[tokio::test]
async fn refused_connection_is_a_network_error() {
    let photo = photo_file();
    // Nothing listens on the discard port.
    let uploader =
        Uploader::with_endpoint(Url::parse("http://127.0.0.1:9/import").expect("URL"));
    let source = StaticSource::new(51.5, -0.12, 8.0);

    let outcome = uploader
        .submit(&draft_with(&photo), &source)
        .await
        .expect("submit");
    assert!(matches!(outcome, UploadOutcome::NetworkError(_)));
}
