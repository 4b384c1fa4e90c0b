// =============================================================================
// SEARCH CAPS
// =============================================================================

/// Maximum cities returned by `GET /countries/search`
pub const COUNTRY_SEARCH_CITY_CAP: i64 = 300;

/// Maximum cities returned by `GET /states/search`
pub const STATE_SEARCH_CITY_CAP: i64 = 300;

/// Maximum cities returned by `GET /cities/search`, whatever limit the caller asks for
pub const CITY_SEARCH_CAP: i64 = 200;
