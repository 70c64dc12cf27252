pub mod bootstrap;
pub mod manager;
pub mod models;
pub mod profiles;
pub mod sensor;
pub mod users;
