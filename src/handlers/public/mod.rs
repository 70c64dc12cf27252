// Public handlers: token acquisition endpoints that require no
// authentication.
pub mod auth;
