//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router, middleware,
    response::Redirect,
    routing::{delete, get, post},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    assistant::{get_assistant_page, send_message_endpoint},
    budget::{create_budget_endpoint, delete_budget_endpoint, get_budget_list, get_budgets_page},
    dashboard::{get_dashboard_page, get_dashboard_summary},
    endpoints,
    export::{export_endpoint, get_export_page},
    internal_server_error::get_internal_server_error_page,
    not_found::get_404_not_found,
    profile::{create_profile_endpoint, get_onboarding_page, profile_guard, profile_guard_hx},
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, get_category_options,
        get_recurring_page, get_transaction_list, get_transactions_page, mark_recurring_endpoint,
        remove_recurring_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::ONBOARDING_VIEW, get(get_onboarding_page))
        .route(endpoints::ONBOARDING_API, post(create_profile_endpoint))
        .route(endpoints::CATEGORY_OPTIONS, get(get_category_options))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    let protected_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::TRANSACTIONS_VIEW, get(get_transactions_page))
        .route(endpoints::RECURRING_VIEW, get(get_recurring_page))
        .route(endpoints::BUDGETS_VIEW, get(get_budgets_page))
        .route(endpoints::EXPORT_VIEW, get(get_export_page))
        .route(endpoints::EXPORT_API, get(export_endpoint))
        .route(endpoints::ASSISTANT_VIEW, get(get_assistant_page))
        .layer(middleware::from_fn_with_state(state.clone(), profile_guard));

    // Partials and write endpoints are requested by htmx, so they need the
    // HX-Redirect header for redirects to onboarding to work.
    let protected_routes = protected_routes.merge(
        Router::new()
            .route(endpoints::DASHBOARD_SUMMARY, get(get_dashboard_summary))
            .route(endpoints::TRANSACTIONS_LIST, get(get_transaction_list))
            .route(endpoints::BUDGETS_LIST, get(get_budget_list))
            .route(endpoints::TRANSACTIONS_API, post(create_transaction_endpoint))
            .route(endpoints::TRANSACTION, delete(delete_transaction_endpoint))
            .route(
                endpoints::TRANSACTION_RECURRING,
                post(mark_recurring_endpoint).delete(remove_recurring_endpoint),
            )
            .route(endpoints::BUDGETS_API, post(create_budget_endpoint))
            .route(endpoints::BUDGET, delete(delete_budget_endpoint))
            .route(endpoints::ASSISTANT_MESSAGES, post(send_message_endpoint))
            .layer(middleware::from_fn_with_state(state.clone(), profile_guard_hx)),
    );

    protected_routes
        .merge(unprotected_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}
