//! Stores the current profile ID in an encrypted cookie.

use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};
use time::{Duration, OffsetDateTime};

use crate::{Error, profile::ProfileId};

pub(crate) const COOKIE_PROFILE_ID: &str = "profile_id";
/// How long the profile cookie lives before onboarding must be repeated.
pub(crate) const PROFILE_COOKIE_DURATION: Duration = Duration::days(365);

/// Add the profile cookie to `jar` and return the updated jar.
pub(crate) fn set_profile_cookie(jar: PrivateCookieJar, profile_id: ProfileId) -> PrivateCookieJar {
    let expiry = OffsetDateTime::now_utc() + PROFILE_COOKIE_DURATION;

    jar.add(
        Cookie::build((COOKIE_PROFILE_ID, profile_id.as_i64().to_string()))
            .expires(expiry)
            .path("/")
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true),
    )
}

/// Read the profile ID from the cookie in `jar`.
///
/// # Errors
/// Returns [Error::ProfileMissing] if the cookie is missing or does not hold an integer.
pub(crate) fn get_profile_id_from_cookie(jar: &PrivateCookieJar) -> Result<ProfileId, Error> {
    let cookie = jar.get(COOKIE_PROFILE_ID).ok_or(Error::ProfileMissing)?;

    cookie
        .value_trimmed()
        .parse()
        .map(ProfileId::new)
        .map_err(|_| Error::ProfileMissing)
}

#[cfg(test)]
mod tests {
    use axum_extra::extract::{
        PrivateCookieJar,
        cookie::{Cookie, Key},
    };
    use sha2::{Digest, Sha512};
    use time::{Duration, OffsetDateTime};

    use crate::{Error, profile::ProfileId};

    use super::{COOKIE_PROFILE_ID, get_profile_id_from_cookie, set_profile_cookie};

    fn get_jar() -> PrivateCookieJar {
        let hash = Sha512::digest(b"foobar");
        let key = Key::from(&hash);

        PrivateCookieJar::new(key)
    }

    #[test]
    fn can_set_and_read_cookie() {
        let profile_id = ProfileId::new(7);

        let jar = set_profile_cookie(get_jar(), profile_id);

        assert_eq!(get_profile_id_from_cookie(&jar), Ok(profile_id));
    }

    #[test]
    fn cookie_expires_in_a_year() {
        let jar = set_profile_cookie(get_jar(), ProfileId::new(1));

        let expiry = jar
            .get(COOKIE_PROFILE_ID)
            .unwrap()
            .expires_datetime()
            .unwrap();
        let want = OffsetDateTime::now_utc() + Duration::days(365);
        assert!((expiry - want).abs() < Duration::seconds(1));
    }

    #[test]
    fn missing_cookie_is_an_error() {
        assert_eq!(
            get_profile_id_from_cookie(&get_jar()),
            Err(Error::ProfileMissing)
        );
    }

    #[test]
    fn garbage_cookie_is_an_error() {
        let jar = get_jar().add(Cookie::new(COOKIE_PROFILE_ID, "not a number"));

        assert_eq!(
            get_profile_id_from_cookie(&jar),
            Err(Error::ProfileMissing)
        );
    }
}
