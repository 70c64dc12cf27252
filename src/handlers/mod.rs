pub mod protected;
pub mod public;
pub mod sensor;
