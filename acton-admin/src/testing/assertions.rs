//! Assertion helpers for admin responses
//!
//! Admin handlers answer with full HTML pages, HTMX fragments, or a
//! `303 See Other` after a successful change. These helpers keep the tests
//! short.

use axum_test::TestResponse;
use http::StatusCode;

/// Assert that the response has a `Location` header with the expected path
///
/// # Panics
///
/// Panics if the header is missing or has a different value
pub fn assert_location(response: &TestResponse, expected_path: &str) {
    let header = response
        .headers()
        .get(http::header::LOCATION)
        .expect("Location header not found");
    let actual = header.to_str().expect("Invalid Location header value");
    assert_eq!(
        actual, expected_path,
        "Expected Location to be {expected_path}, got {actual}"
    );
}

/// Assert a `303 See Other` redirect to `expected_path`
///
/// # Panics
///
/// Panics on any other status or location
pub fn assert_see_other(response: &TestResponse, expected_path: &str) {
    assert_eq!(
        response.status_code(),
        StatusCode::SEE_OTHER,
        "Expected 303 See Other, got {}",
        response.status_code()
    );
    assert_location(response, expected_path);
}

/// Assert that the body contains `needle`
///
/// # Panics
///
/// Panics if the body does not contain `needle`
pub fn assert_html_contains(response: &TestResponse, needle: &str) {
    let body = response.text();
    assert!(
        body.contains(needle),
        "Expected body to contain '{needle}', got:\n{body}"
    );
}

/// Assert that the body does not contain `needle`
///
/// # Panics
///
/// Panics if the body contains `needle`
pub fn assert_html_not_contains(response: &TestResponse, needle: &str) {
    let body = response.text();
    assert!(
        !body.contains(needle),
        "Expected body not to contain '{needle}', got:\n{body}"
    );
}

/// Assert that the body is an HTMX fragment rather than a full page
///
/// # Panics
///
/// Panics if the body contains the page layout
pub fn assert_fragment(response: &TestResponse) {
    let body = response.text();
    assert!(
        !body.contains("<html"),
        "Expected an HTMX fragment, got a full page:\n{body}"
    );
}
