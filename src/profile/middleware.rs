//! Middleware that requires a profile and redirects to onboarding when there is none.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, FromRequestParts, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{
    AppState, Error, endpoints,
    profile::{ProfileId, cookie::get_profile_id_from_cookie, core::get_profile},
};

/// The state needed for the profile middleware
#[derive(Clone)]
pub struct ProfileState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The database connection for checking that the profile exists.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ProfileState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<ProfileState> for Key {
    fn from_ref(state: &ProfileState) -> Self {
        state.cookie_key.clone()
    }
}

fn profile_exists(profile_id: ProfileId, state: &ProfileState) -> Result<bool, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    match get_profile(profile_id, &connection) {
        Ok(_) => Ok(true),
        Err(Error::NotFound) => Ok(false),
        Err(error) => Err(error),
    }
}

#[inline]
async fn profile_guard_internal(
    state: ProfileState,
    request: Request,
    next: Next,
    get_redirect: impl Fn(&str) -> Response,
) -> Response {
    let (mut parts, body) = request.into_parts();
    let jar = match PrivateCookieJar::from_request_parts(&mut parts, &state).await {
        Ok(jar) => jar,
        Err(err) => {
            tracing::error!("Error getting cookie jar: {err:?}. Redirecting to onboarding.");
            return get_redirect(endpoints::ONBOARDING_VIEW);
        }
    };

    let Ok(profile_id) = get_profile_id_from_cookie(&jar) else {
        return get_redirect(endpoints::ONBOARDING_VIEW);
    };

    match profile_exists(profile_id, &state) {
        Ok(true) => {}
        Ok(false) => {
            tracing::warn!("Cookie refers to missing profile {profile_id}. Redirecting to onboarding.");
            return get_redirect(endpoints::ONBOARDING_VIEW);
        }
        Err(error) => return error.into_response(),
    }

    parts.extensions.insert(profile_id);
    let request = Request::from_parts(parts, body);

    next.run(request).await
}

/// Middleware function that checks for a cookie referring to an existing profile.
///
/// The profile ID is placed into the request and the request executed normally
/// if the cookie is valid, otherwise a redirect to the onboarding page is returned.
///
/// **Note**: Route handlers can use the function argument `Extension(profile_id): Extension<ProfileId>` to receive the profile ID.
pub async fn profile_guard(
    State(state): State<ProfileState>,
    request: Request,
    next: Next,
) -> Response {
    profile_guard_internal(state, request, next, |redirect_url| {
        Redirect::to(redirect_url).into_response()
    })
    .await
}

/// Middleware function that checks for a cookie referring to an existing profile.
///
/// Same as [profile_guard], but redirects with the `HX-Redirect` header so
/// htmx requests navigate to the onboarding page.
pub async fn profile_guard_hx(
    State(state): State<ProfileState>,
    request: Request,
    next: Next,
) -> Response {
    profile_guard_internal(state, request, next, |redirect_url| {
        (HxRedirect(redirect_url.to_owned()), StatusCode::OK).into_response()
    })
    .await
}

#[cfg(test)]
mod profile_guard_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Extension, Router,
        extract::Path,
        http::StatusCode,
        middleware,
        routing::{get, post},
    };
    use axum_extra::extract::{PrivateCookieJar, cookie::Key};
    use axum_test::TestServer;
    use rusqlite::Connection;
    use sha2::Digest;

    use crate::{
        db::initialize,
        endpoints,
        profile::{
            ProfileId,
            cookie::{COOKIE_PROFILE_ID, set_profile_cookie},
            core::{create_profile, test_profile},
        },
    };

    use super::{ProfileState, profile_guard, profile_guard_hx};

    async fn test_handler(Extension(profile_id): Extension<ProfileId>) -> String {
        format!("profile {profile_id}")
    }

    async fn stub_set_cookie_route(
        jar: PrivateCookieJar,
        Path(profile_id): Path<i64>,
    ) -> PrivateCookieJar {
        set_profile_cookie(jar, ProfileId::new(profile_id))
    }

    const TEST_SET_COOKIE_ROUTE: &str = "/set_cookie/{profile_id}";
    const TEST_PROTECTED_ROUTE: &str = "/protected";
    const TEST_API_ROUTE: &str = "/api/protected";

    fn get_test_server() -> (TestServer, ProfileId) {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        let profile = create_profile(test_profile(), &connection).unwrap();

        let hash = sha2::Sha512::digest("nafstenoas");
        let state = ProfileState {
            cookie_key: Key::from(&hash),
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let app = Router::new()
            .route(TEST_PROTECTED_ROUTE, get(test_handler))
            .route_layer(middleware::from_fn_with_state(state.clone(), profile_guard))
            .merge(
                Router::new()
                    .route(TEST_API_ROUTE, post(test_handler))
                    .route_layer(middleware::from_fn_with_state(
                        state.clone(),
                        profile_guard_hx,
                    )),
            )
            .route(TEST_SET_COOKIE_ROUTE, post(stub_set_cookie_route))
            .with_state(state);

        let server = TestServer::new(app);

        (server, profile.id)
    }

    #[tokio::test]
    async fn passes_profile_id_to_handler() {
        let (server, profile_id) = get_test_server();
        let response = server
            .post(&endpoints::format_endpoint(
                TEST_SET_COOKIE_ROUTE,
                profile_id.as_i64(),
            ))
            .await;
        response.assert_status_ok();
        let cookie = response.cookie(COOKIE_PROFILE_ID);

        let response = server.get(TEST_PROTECTED_ROUTE).add_cookie(cookie).await;

        response.assert_status_ok();
        response.assert_text(format!("profile {profile_id}"));
    }

    #[tokio::test]
    async fn redirects_to_onboarding_without_cookie() {
        let (server, _) = get_test_server();

        let response = server.get(TEST_PROTECTED_ROUTE).await;

        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header("location"), endpoints::ONBOARDING_VIEW);
    }

    #[tokio::test]
    async fn redirects_to_onboarding_for_missing_profile() {
        let (server, _) = get_test_server();
        let response = server
            .post(&endpoints::format_endpoint(TEST_SET_COOKIE_ROUTE, 999))
            .await;
        let cookie = response.cookie(COOKIE_PROFILE_ID);

        let response = server.get(TEST_PROTECTED_ROUTE).add_cookie(cookie).await;

        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header("location"), endpoints::ONBOARDING_VIEW);
    }

    #[tokio::test]
    async fn hx_guard_redirects_with_hx_header() {
        let (server, _) = get_test_server();

        let response = server.post(TEST_API_ROUTE).await;

        response.assert_status_ok();
        assert_eq!(response.header("hx-redirect"), endpoints::ONBOARDING_VIEW);
    }
}
