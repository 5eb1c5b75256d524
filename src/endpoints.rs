//! The API endpoints URIs.

/// The root path '/' which redirects to the dashboard page.
pub const ROOT: &str = "/";
/// The page for creating a profile.
pub const ONBOARDING_VIEW: &str = "/onboarding";
/// The page for displaying a profile's income and expense summary.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The partial with the summary cards, chart and category table.
pub const DASHBOARD_SUMMARY: &str = "/dashboard/summary";
/// The page for entering and listing transactions.
pub const TRANSACTIONS_VIEW: &str = "/transactions";
/// The partial listing a profile's transactions.
pub const TRANSACTIONS_LIST: &str = "/transactions/list";
/// The partial with the category options for a transaction kind.
pub const CATEGORY_OPTIONS: &str = "/transactions/categories";
/// The page for managing recurring transactions.
pub const RECURRING_VIEW: &str = "/recurring";
/// The page for setting and tracking monthly budgets.
pub const BUDGETS_VIEW: &str = "/budgets";
/// The partial listing budgets with their usage.
pub const BUDGETS_LIST: &str = "/budgets/list";
/// The page for choosing what to export.
pub const EXPORT_VIEW: &str = "/export";
/// The chat page for the finance assistant.
pub const ASSISTANT_VIEW: &str = "/assistant";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route for creating a profile.
pub const ONBOARDING_API: &str = "/api/onboarding";
/// The route to create transactions.
pub const TRANSACTIONS_API: &str = "/api/transactions";
/// The route to access a single transaction.
pub const TRANSACTION: &str = "/api/transactions/{transaction_id}";
/// The route to mark or unmark a transaction as recurring.
pub const TRANSACTION_RECURRING: &str = "/api/transactions/{transaction_id}/recurring";
/// The route to create budgets.
pub const BUDGETS_API: &str = "/api/budgets";
/// The route to access a single budget.
pub const BUDGET: &str = "/api/budgets/{budget_id}";
/// The route that produces CSV files and printable reports.
pub const EXPORT_API: &str = "/api/export";
/// The route for sending messages to the finance assistant.
pub const ASSISTANT_MESSAGES: &str = "/api/assistant/messages";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/api/budgets/{budget_id}', '{budget_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let mut param_start = None;
    let mut param_end = None;

    for (i, c) in endpoint_path.chars().enumerate() {
        if c == '{' {
            param_start = Some(i);
        } else if param_start.is_some() && c == '}' {
            param_end = Some(i + 1);
            break;
        }
    }

    let param_start = match param_start {
        Some(start) => start,
        None => return endpoint_path.to_string(),
    };

    let param_end = param_end.unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}

// These tests are here so that we know when we call `Uri::from_shared` it will not panic.
#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints;

    use super::format_endpoint;

    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok(), "{uri} is not a valid URI");
    }

    #[test]
    fn endpoints_are_valid_uris() {
        for endpoint in [
            endpoints::ROOT,
            endpoints::ONBOARDING_VIEW,
            endpoints::DASHBOARD_VIEW,
            endpoints::DASHBOARD_SUMMARY,
            endpoints::TRANSACTIONS_VIEW,
            endpoints::TRANSACTIONS_LIST,
            endpoints::CATEGORY_OPTIONS,
            endpoints::RECURRING_VIEW,
            endpoints::BUDGETS_VIEW,
            endpoints::BUDGETS_LIST,
            endpoints::EXPORT_VIEW,
            endpoints::ASSISTANT_VIEW,
            endpoints::INTERNAL_ERROR_VIEW,
            endpoints::STATIC,
            endpoints::ONBOARDING_API,
            endpoints::TRANSACTIONS_API,
            endpoints::TRANSACTION,
            endpoints::TRANSACTION_RECURRING,
            endpoints::BUDGETS_API,
            endpoints::BUDGET,
            endpoints::EXPORT_API,
            endpoints::ASSISTANT_MESSAGES,
        ] {
            assert_endpoint_is_valid_uri(endpoint);
        }
    }

    #[test]
    fn formats_nested_parameter() {
        let formatted_path = format_endpoint(endpoints::TRANSACTION_RECURRING, 3);

        assert_eq!(formatted_path, "/api/transactions/3/recurring");
    }

    #[test]
    fn produces_valid_uri() {
        let formatted_path = format_endpoint("/hello/{world_id}", 1);

        assert_eq!(formatted_path, "/hello/1");
        assert!(formatted_path.parse::<Uri>().is_ok());

        // Parameter with single word should also work.
        let formatted_path = format_endpoint("/hello/{world}", 1);

        assert_eq!(formatted_path, "/hello/1");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }

    #[test]
    fn returns_original_path_with_no_parameter() {
        let formatted_path = format_endpoint("/hello/world", 1);

        assert_eq!(formatted_path, "/hello/world");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }

    #[test]
    fn parameter_in_middle() {
        let formatted_path = format_endpoint("/hello/{world}/bye", 1);

        assert_eq!(formatted_path, "/hello/1/bye");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }
}
