// Protected handlers: everything here sits behind the bearer-token
// middleware; role checks happen per action through the policy gate.
pub mod auth;
pub mod profiles;
pub mod users;
