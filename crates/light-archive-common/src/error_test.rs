//! Tests for error module

use crate::error::Error;

#[test]
fn test_is_not_found() {
    let err = Error::NotFound("test".to_string());
    assert!(err.is_not_found());

    let err = Error::ArchiveNotFound("1761901131544-a2mnqr".to_string());
    assert!(err.is_not_found());

    let err = Error::Internal("test".to_string());
    assert!(!err.is_not_found());
}

#[test]
fn test_is_retryable() {
    assert!(Error::Llm("502 Bad Gateway".to_string()).is_retryable());
    assert!(Error::Store("503".to_string()).is_retryable());

    assert!(!Error::NotConfigured("OpenAI").is_retryable());
    assert!(!Error::InvalidParameter("limit".to_string()).is_retryable());
    assert!(!Error::InvalidInput("tags".to_string()).is_retryable());
}

#[test]
fn test_error_display() {
    let err = Error::ArchiveNotFound("abc".to_string());
    assert_eq!(format!("{}", err), "Archive 'abc' not found");

    let err = Error::NotConfigured("Supabase");
    assert_eq!(
        format!("{}", err),
        "Supabase not initialized. Please check environment variables."
    );

    let err = Error::Storage("409 Conflict".to_string());
    assert_eq!(format!("{}", err), "Image upload failed: 409 Conflict");
}
