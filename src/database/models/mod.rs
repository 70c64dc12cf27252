pub mod profile;
pub mod sensor;
pub mod user;

pub use profile::Profile;
pub use sensor::SensorRow;
pub use user::User;
