//! Alert system for displaying success and error messages to users.
//!
//! Alerts are HTML fragments swapped into the `#alert-container` element by
//! htmx, either as the target of a successful request or via
//! `hx-target-error` for failed requests.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

/// Alert message types for styling
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AlertKind {
    Success,
    Error,
}

/// A dismissable message shown in the alert container.
#[derive(Debug, Clone)]
pub struct Alert<'a> {
    pub kind: AlertKind,
    pub message: &'a str,
    pub details: &'a str,
}

impl<'a> Alert<'a> {
    /// Create a new success alert
    pub fn success(message: &'a str, details: &'a str) -> Self {
        Self {
            kind: AlertKind::Success,
            message,
            details,
        }
    }

    /// Create a new error alert
    pub fn error(message: &'a str, details: &'a str) -> Self {
        Self {
            kind: AlertKind::Error,
            message,
            details,
        }
    }

    pub fn into_html(self) -> Markup {
        let style = match self.kind {
            AlertKind::Success => {
                "flex items-start gap-3 p-4 mb-4 text-green-800 rounded-lg \
                bg-green-50 border border-green-300 dark:bg-gray-800 \
                dark:text-green-400 dark:border-green-800"
            }
            AlertKind::Error => {
                "flex items-start gap-3 p-4 mb-4 text-red-800 rounded-lg \
                bg-red-50 border border-red-300 dark:bg-gray-800 \
                dark:text-red-400 dark:border-red-800"
            }
        };

        html!(
            div role="alert" class=(style)
            {
                div class="flex-1"
                {
                    p class="font-medium" { (self.message) }

                    @if !self.details.is_empty() {
                        p class="text-sm" { (self.details) }
                    }
                }

                button
                    type="button"
                    aria-label="Dismiss"
                    class="text-sm font-semibold"
                    onclick="this.closest('[role=alert]').remove()"
                {
                    "✕"
                }
            }
        )
    }

    /// Render the alert as the body of a response with `status`.
    pub fn into_response_with_status(self, status: StatusCode) -> Response {
        (status, self.into_html()).into_response()
    }
}

impl IntoResponse for Alert<'_> {
    fn into_response(self) -> Response {
        self.into_response_with_status(StatusCode::OK)
    }
}

#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, response::IntoResponse};
    use scraper::Selector;

    use crate::test_utils::{assert_valid_html, parse_html_fragment};

    use super::Alert;

    #[tokio::test]
    async fn error_alert_has_message_and_status() {
        let response = Alert::error("Could not delete budget", "The budget could not be found.")
            .into_response_with_status(StatusCode::NOT_FOUND);

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let html = parse_html_fragment(response).await;
        assert_valid_html(&html);
        let text = html
            .select(&Selector::parse("[role=alert]").unwrap())
            .next()
            .expect("No alert found")
            .text()
            .collect::<String>();
        assert!(text.contains("Could not delete budget"));
        assert!(text.contains("The budget could not be found."));
    }

    #[tokio::test]
    async fn success_alert_omits_empty_details() {
        let response = Alert::success("Saved", "").into_response();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_fragment(response).await;
        let paragraphs = html.select(&Selector::parse("p").unwrap()).count();
        assert_eq!(paragraphs, 1, "want only the message paragraph, got {paragraphs}");
    }
}
