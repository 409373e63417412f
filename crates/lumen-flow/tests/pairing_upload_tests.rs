mod common;

use common::Harness;
use lumen_core::{MediaStatus, PairingState, UploadEvent, UploadState, DEFAULT_UPLOAD_ATTEMPTS};
use std::sync::atomic::Ordering;

// =============================================================================
// Pairing
// =============================================================================

#[tokio::test]
async fn pairing_success_marks_request_paired() {
    let h = Harness::new();

    h.workflows.pair_device("pk-1".into()).await;

    assert_eq!(h.fakes.node.calls(), vec!["pair_device:pk-1"]);
    h.stores().pairing(|s| {
        assert_eq!(s.requests().len(), 1);
        assert_eq!(s.latest("pk-1").unwrap().state, PairingState::Paired);
    });
    assert!(h.fakes.diagnostics.events().is_empty());
}

#[tokio::test]
async fn pairing_failure_is_recorded_and_logged() {
    let h = Harness::new();
    h.fakes.node.fail_pair.store(true, Ordering::SeqCst);

    h.workflows.pair_device("pk-1".into()).await;

    assert_eq!(
        h.stores().pairing(|s| s.latest("pk-1").unwrap().state),
        PairingState::Error
    );
    let errors = h.fakes.diagnostics.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].0, "Pairing");
}

#[tokio::test]
async fn repeated_pairing_keeps_both_attempts() {
    let h = Harness::new();

    h.workflows.pair_device("pk-1".into()).await;
    h.fakes.node.fail_pair.store(true, Ordering::SeqCst);
    h.workflows.pair_device("pk-1".into()).await;

    h.stores().pairing(|s| {
        assert_eq!(s.requests().len(), 2);
        // The last result settles every entry for the key.
        assert!(s.requests().iter().all(|r| r.state == PairingState::Error));
        assert_eq!(s.stale_updates(), 0);
    });
}

#[tokio::test]
async fn pairing_link_starts_handshake() {
    let h = Harness::new();

    h.workflows
        .pair_from_link("lumen://pair?code=7H2K&key=pk-abc&peerId=Qm1")
        .await;

    assert_eq!(h.fakes.node.calls(), vec!["pair_device:pk-abc"]);
    assert_eq!(
        h.stores().pairing(|s| s.latest("pk-abc").map(|r| r.state)),
        Some(PairingState::Paired)
    );
}

#[tokio::test]
async fn invalid_pairing_link_is_logged() {
    let h = Harness::new();

    h.workflows.pair_from_link("lumen://pair?code=7H2K").await;

    assert!(h.fakes.node.calls().is_empty());
    assert!(h.stores().pairing(|s| s.requests().is_empty()));
    let errors = h.fakes.diagnostics.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].0, "Pairing");
}

// =============================================================================
// Uploads
// =============================================================================

fn queue(h: &Harness, hash: &str) {
    h.workflows.handle_upload(UploadEvent::queued(
        format!("file:///{}.jpg", hash),
        "thread-1",
        hash,
        format!("/remote/{}", hash),
    ));
}

fn fail(h: &Harness, hash: &str) {
    h.workflows.handle_upload(UploadEvent::Failed {
        content_hash: hash.into(),
        error: "network".into(),
    });
}

#[test]
fn upload_progress_then_failure() {
    let h = Harness::new();
    queue(&h, "abc");
    assert_eq!(
        h.stores().uploads(|s| s.media_status("file:///abc.jpg")),
        Some(MediaStatus::Complete)
    );

    h.workflows.handle_upload(UploadEvent::Progress {
        content_hash: "abc".into(),
        raw_progress: 50.0,
    });
    h.stores().uploads(|s| {
        let item = s.get("abc").unwrap();
        assert_eq!(item.state, UploadState::Processing);
        assert_eq!(item.progress, 0.5);
    });

    fail(&h, "abc");
    h.stores().uploads(|s| {
        let item = s.get("abc").unwrap();
        assert_eq!(item.state, UploadState::Error);
        assert_eq!(item.remaining_attempts, 2);
        assert_eq!(item.last_error.as_deref(), Some("network"));
    });
}

#[test]
fn retry_is_refused_unless_failed() {
    let h = Harness::new();
    queue(&h, "abc");
    let revision = h.stores().revision();

    h.workflows.handle_upload(UploadEvent::RetryRequested {
        content_hash: "abc".into(),
    });

    assert_eq!(h.stores().revision(), revision);
    assert_eq!(h.workflows.upload_state("abc"), Some(UploadState::Pending));

    fail(&h, "abc");
    h.workflows.handle_upload(UploadEvent::RetryRequested {
        content_hash: "abc".into(),
    });
    assert_eq!(h.workflows.upload_state("abc"), Some(UploadState::Pending));
}

#[test]
fn exhausted_upload_stays_failed() {
    let h = Harness::new();
    queue(&h, "abc");

    for _ in 0..DEFAULT_UPLOAD_ATTEMPTS {
        fail(&h, "abc");
        h.workflows.handle_upload(UploadEvent::RetryRequested {
            content_hash: "abc".into(),
        });
    }
    assert_eq!(h.workflows.upload_state("abc"), Some(UploadState::Error));

    fail(&h, "abc");
    h.stores().uploads(|s| {
        let item = s.get("abc").unwrap();
        assert_eq!(item.state, UploadState::Error);
        assert_eq!(item.remaining_attempts, 0);
    });
}

#[test]
fn retry_for_unknown_hash_counts_as_stale() {
    let h = Harness::new();
    h.workflows.handle_upload(UploadEvent::RetryRequested {
        content_hash: "ghost".into(),
    });
    assert_eq!(h.stores().uploads(|s| s.stale_updates()), 1);
}

#[test]
fn removed_upload_disappears() {
    let h = Harness::new();
    queue(&h, "abc");
    queue(&h, "def");

    h.workflows.handle_upload(UploadEvent::Removed {
        content_hash: "abc".into(),
    });

    h.stores().uploads(|s| {
        assert_eq!(s.items().len(), 1);
        assert_eq!(s.items()[0].content_hash, "def");
    });
}
