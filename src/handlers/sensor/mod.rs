// Sensor data handlers: CSV upload (per-request credentials) and the
// limited read endpoint.
pub mod data;
pub mod upload;
