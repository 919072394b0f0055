//! Defines the template and route handler for the page to display for an
//! internal server error.

use axum::{http::StatusCode, response::Response};

use crate::html::{error_view, render};

/// The user-facing description of an internal server error.
#[derive(Debug)]
pub struct InternalServerErrorPageTemplate<'a> {
    /// What went wrong, in one sentence.
    pub description: &'a str,
    /// What the user or operator can do about it.
    pub fix: &'a str,
}

impl Default for InternalServerErrorPageTemplate<'_> {
    fn default() -> Self {
        Self {
            description: "Sorry, something went wrong.",
            fix: "Try again later or check the server logs",
        }
    }
}

/// Render `template` as a 500 response.
pub fn render_internal_server_error(template: InternalServerErrorPageTemplate) -> Response {
    render(
        StatusCode::INTERNAL_SERVER_ERROR,
        error_view(
            "Internal Server Error",
            "500",
            template.description,
            template.fix,
        ),
    )
}

/// Route handler for the internal server error page.
pub async fn get_internal_server_error_page() -> Response {
    render_internal_server_error(InternalServerErrorPageTemplate::default())
}
