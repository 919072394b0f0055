//! The 404 page, served for unknown routes and missing records.

use axum::{http::StatusCode, response::Response};

use crate::html::{error_view, render};

/// Route handler for unknown paths.
pub async fn get_404_not_found() -> Response {
    get_404_not_found_response()
}

/// Build the 404 response directly, for handlers that discover a missing
/// resource themselves.
pub fn get_404_not_found_response() -> Response {
    render(
        StatusCode::NOT_FOUND,
        error_view(
            "Page Not Found",
            "404",
            "Something's missing.",
            "Sorry, we can't find that page. You'll find lots to explore on the home page.",
        ),
    )
}
