use std::error::Error;
use std::time::Duration;

use voicetrack_core::errors::{TrackerError, TrackerResult};

#[test]
fn test_tracker_error_display() {
    let desync = TrackerError::Desync("leave without join".to_string());
    let collaborator = TrackerError::collaborator("notifier", eyre::eyre!("missing permissions"));
    let timeout = TrackerError::Timeout {
        collaborator: "faction resolver",
        after: Duration::from_secs(2),
    };
    let commit = TrackerError::Commit("unknown faction Foo".to_string());
    let config = TrackerError::Config("tier table is empty".to_string());

    assert_eq!(desync.to_string(), "Session desynchronized: leave without join");
    assert_eq!(collaborator.to_string(), "notifier failed: missing permissions");
    assert_eq!(timeout.to_string(), "faction resolver timed out after 2s");
    assert_eq!(commit.to_string(), "Aggregate commit failed: unknown faction Foo");
    assert_eq!(config.to_string(), "Configuration error: tier table is empty");
}

#[test]
fn test_only_commit_errors_are_fatal() {
    assert!(TrackerError::Commit("overflow".into()).is_fatal());
    assert!(!TrackerError::Desync("x".into()).is_fatal());
    assert!(!TrackerError::collaborator("notifier", eyre::eyre!("x")).is_fatal());
    assert!(
        !TrackerError::Timeout {
            collaborator: "notifier",
            after: Duration::from_millis(5),
        }
        .is_fatal()
    );
}

#[test]
fn test_collaborator_error_keeps_source() {
    let io_error = std::io::Error::new(std::io::ErrorKind::Other, "IO error");
    let error = TrackerError::collaborator("notifier", io_error);

    assert!(error.source().is_some());
    assert!(error.to_string().contains("IO error"));
}

#[test]
fn test_tracker_result() {
    let result: TrackerResult<u64> = Ok(42);
    assert_eq!(result.unwrap(), 42);

    let result: TrackerResult<u64> = Err(TrackerError::Commit("overflow".to_string()));
    assert!(result.is_err());
}
