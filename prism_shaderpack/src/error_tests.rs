//! Unit tests for error.rs
//!
//! Tests the Error variants, their Display text, the io::Error conversion
//! and the prism_err!/prism_bail! macros.

use crate::error::{Error, Result};

// ============================================================================
// ERROR DISPLAY TESTS
// ============================================================================

#[test]
fn test_backend_error_display() {
    let err = Error::BackendError("patcher crashed".to_string());
    assert_eq!(format!("{}", err), "Backend error: patcher crashed");
}

#[test]
fn test_malformed_input_display() {
    let err = Error::MalformedInput("#import <broken".to_string());
    let display = format!("{}", err);
    assert!(display.contains("Malformed input"));
    assert!(display.contains("#import <broken"));
}

#[test]
fn test_invalid_resource_display() {
    let err = Error::InvalidResource("minecraft:missing.glsl".to_string());
    let display = format!("{}", err);
    assert!(display.contains("Invalid resource"));
    assert!(display.contains("minecraft:missing.glsl"));
}

#[test]
fn test_initialization_failed_display() {
    let err = Error::InitializationFailed("Passes requested before derive".to_string());
    assert_eq!(format!("{}", err), "Initialization failed: Passes requested before derive");
}

// ============================================================================
// ERROR TRAIT IMPLEMENTATIONS
// ============================================================================

#[test]
fn test_error_is_std_error() {
    let err = Error::MalformedInput("x".to_string());
    let _: &dyn std::error::Error = &err;
}

#[test]
fn test_error_debug() {
    assert!(format!("{:?}", Error::BackendError("a".to_string())).contains("BackendError"));
    assert!(format!("{:?}", Error::MalformedInput("b".to_string())).contains("MalformedInput"));
    assert!(format!("{:?}", Error::InvalidResource("c".to_string())).contains("InvalidResource"));
    assert!(format!("{:?}", Error::InitializationFailed("d".to_string())).contains("InitializationFailed"));
}

#[test]
fn test_error_clone() {
    let err1 = Error::InvalidResource("shadow factory".to_string());
    let err2 = err1.clone();
    assert_eq!(format!("{}", err1), format!("{}", err2));
}

#[test]
fn test_io_error_converts_to_backend_error() {
    fn read_missing() -> Result<String> {
        let text = std::fs::read_to_string("/nonexistent/prism/shader.glsl")?;
        Ok(text)
    }

    assert!(matches!(read_missing(), Err(Error::BackendError(_))));
}

// ============================================================================
// MACRO TESTS
// ============================================================================

#[test]
fn test_prism_err_builds_variant() {
    let err = crate::prism_err!(Error::InvalidResource, "prism::Test", "Missing {} '{}'", "asset", "a.glsl");
    match err {
        Error::InvalidResource(msg) => assert_eq!(msg, "Missing asset 'a.glsl'"),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_prism_bail_returns_early() {
    fn check(value: u32) -> Result<u32> {
        if value == 0 {
            crate::prism_bail!(Error::MalformedInput, "prism::Test", "Value must be positive");
        }
        Ok(value * 2)
    }

    assert_eq!(check(3).unwrap(), 6);
    match check(0) {
        Err(Error::MalformedInput(msg)) => assert_eq!(msg, "Value must be positive"),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_result_type_alias() {
    let ok: Result<i32> = Ok(42);
    let err: Result<i32> = Err(Error::BackendError("x".to_string()));
    assert_eq!(ok.unwrap(), 42);
    assert!(err.is_err());
}
