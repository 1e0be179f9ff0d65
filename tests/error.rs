use std::path::PathBuf;

use serde_json::Value;
use svctrack::error::{exit_codes, Error, JsonError};

#[test]
fn exit_code_user_errors() {
    assert_eq!(
        Error::Validation("task description cannot be empty".to_string()).exit_code(),
        exit_codes::USER_ERROR
    );
    assert_eq!(Error::task_not_found(4).exit_code(), exit_codes::USER_ERROR);
    assert_eq!(
        Error::InvalidArgument("bad input".to_string()).exit_code(),
        exit_codes::USER_ERROR
    );
}

#[test]
fn exit_code_backend_failures() {
    let err = Error::Backend("remote returned 503".to_string());
    assert_eq!(err.exit_code(), exit_codes::OPERATION_FAILED);
    assert!(err.is_backend());

    let err = Error::LockFailed(PathBuf::from("data/tasks.json.lock"));
    assert!(err.is_backend());
    assert!(!Error::task_not_found(1).is_backend());
}

#[test]
fn not_found_message_and_details() {
    let err = Error::task_not_found(12);
    assert_eq!(err.to_string(), "task not found: 12");
    let details = err.details().expect("details");
    assert_eq!(details["kind"], Value::String("task".to_string()));
    assert_eq!(details["id"], Value::from(12));
}

#[test]
fn json_error_includes_details() {
    let err = Error::InvalidConfig("bad config".to_string());
    let json = JsonError::from(&err);
    assert_eq!(json.code, exit_codes::USER_ERROR);
    let details = json.details.expect("details");
    assert_eq!(details["message"], Value::String("bad config".to_string()));
}
