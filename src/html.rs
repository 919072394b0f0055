//! Shared HTML building blocks: the page shell and small helpers used across
//! the views.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use maud::{DOCTYPE, Markup, html};

/// Wrap `markup` in an HTML response with the given status code.
pub fn render(status_code: StatusCode, markup: Markup) -> Response {
    (status_code, Html(markup.into_string())).into_response()
}

/// The page shell shared by every view.
pub fn base(title: &str, content: &Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en"
        {
            head
            {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " - Hisab" }

                script src="https://unpkg.com/htmx.org@2.0.8" {}
                script src="https://unpkg.com/htmx-ext-response-targets@2.0.4" {}

                style
                {
                    r#"
                    body {
                        font-family: system-ui, sans-serif;
                        max-width: 48rem;
                        margin: 0 auto;
                        padding: 1rem;
                        color: #1f2937;
                        background: #f9fafb;
                    }

                    h1, h2 { color: #111827; }

                    form.stacked { display: flex; flex-direction: column; gap: 0.75rem; max-width: 24rem; }
                    form.stacked label { font-size: 0.875rem; font-weight: 600; }
                    form.stacked input {
                        padding: 0.5rem;
                        border: 1px solid #d1d5db;
                        border-radius: 0.25rem;
                    }
                    form.stacked button {
                        padding: 0.5rem;
                        border: none;
                        border-radius: 0.25rem;
                        background: #2563eb;
                        color: white;
                        cursor: pointer;
                    }

                    table { width: 100%; border-collapse: collapse; }
                    th, td { padding: 0.5rem 0.75rem; text-align: left; border-bottom: 1px solid #e5e7eb; }
                    tfoot td { font-weight: 700; }

                    a { color: #2563eb; }
                    button.link {
                        background: none;
                        border: none;
                        padding: 0;
                        color: #dc2626;
                        text-decoration: underline;
                        cursor: pointer;
                        font-size: 1rem;
                    }

                    .alert { padding: 0.75rem 1rem; border-radius: 0.25rem; margin: 0.75rem 0; }
                    .alert-error { background: #fef2f2; color: #991b1b; border: 1px solid #fecaca; }
                    .alert-success { background: #f0fdf4; color: #166534; border: 1px solid #bbf7d0; }
                    .alert p { margin: 0.25rem 0 0 0; }

                    .empty-state { color: #6b7280; font-style: italic; }
                    "#
                }
            }

            body hx-ext="response-targets"
            {
                (content)

                // Error responses from forms are swapped in here.
                div id="alert-container" {}
            }
        }
    }
}

/// A full-page error view with a pointer back to the ledger.
pub fn error_view(title: &str, header: &str, description: &str, fix: &str) -> Markup {
    let content = html!(
        section
        {
            h1 { (header) }

            p { (description) }

            p { (fix) }

            a href="/" { "Back to the ledger" }
        }
    );

    base(title, &content)
}
