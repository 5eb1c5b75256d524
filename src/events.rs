//! Names of the htmx events sent in the `HX-Trigger` header after writes.
//!
//! Partials that show derived data listen for these with
//! `hx-trigger="<event> from:body"` and reload themselves.

use axum_htmx::HxResponseTrigger;

/// Sent after a transaction is created, deleted or has its recurrence changed.
pub const TRANSACTIONS_CHANGED: &str = "transactions-changed";
/// Sent after a budget is created or deleted.
pub const BUDGETS_CHANGED: &str = "budgets-changed";

/// The `hx-trigger` value for a partial that reloads on `event`.
pub fn reload_on(event: &str) -> String {
    format!("{event} from:body")
}

/// The response header that fires `event` on the client.
pub fn trigger(event: &'static str) -> HxResponseTrigger {
    HxResponseTrigger::normal([event])
}

#[cfg(test)]
mod tests {
    use axum::response::IntoResponse;

    use super::{TRANSACTIONS_CHANGED, reload_on, trigger};

    #[test]
    fn reload_listens_on_body() {
        assert_eq!(
            reload_on(TRANSACTIONS_CHANGED),
            "transactions-changed from:body"
        );
    }

    #[test]
    fn trigger_sets_header() {
        let response = (trigger(TRANSACTIONS_CHANGED), ()).into_response();

        assert_eq!(
            response.headers().get("hx-trigger").unwrap(),
            "transactions-changed"
        );
    }
}
