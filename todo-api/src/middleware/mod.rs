/// Middleware modules for the API server
///
/// - `headers`: Default response headers
///
/// Session authentication is wired in `app` since it needs `AppState`.

pub mod headers;
