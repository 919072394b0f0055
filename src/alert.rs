//! Alert partials for displaying error messages to users.

use maud::{Markup, html};

/// Renders an error alert with a headline and optional details.
#[derive(Debug)]
pub struct AlertTemplate<'a> {
    message: &'a str,
    details: &'a str,
}

impl<'a> AlertTemplate<'a> {
    /// Create a new error alert
    pub fn error(message: &'a str, details: &'a str) -> Self {
        Self { message, details }
    }

    /// Render the alert as an HTML partial.
    pub fn into_markup(self) -> Markup {
        html! {
            div class="alert alert-error" role="alert"
            {
                strong { (self.message) }

                @if !self.details.is_empty()
                {
                    p { (self.details) }
                }
            }
        }
    }
}

#[cfg(test)]
mod alert_tests {
    use super::AlertTemplate;

    #[test]
    fn error_alert_renders_message_and_details() {
        let markup =
            AlertTemplate::error("Missing information", "Please fill in the giver field.")
                .into_markup()
                .into_string();

        assert!(markup.contains("alert-error"));
        assert!(markup.contains("Missing information"));
        assert!(markup.contains("Please fill in the giver field."));
    }

    #[test]
    fn details_are_omitted_when_empty() {
        let markup = AlertTemplate::error("Something went wrong", "")
            .into_markup()
            .into_string();

        assert!(!markup.contains("<p>"));
    }
}
