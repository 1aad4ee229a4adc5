//! Stripdex Words - phrase normalization service.
//!
//! Turns free-form phrases into ordered keyword stems: lowercase, drop stop
//! words, Snowball-stem, deduplicate. Served over a small internal HTTP
//! surface used by the update and search services.

pub mod config;
mod normalize;
mod routes;

pub use self::config::Config;
pub use self::normalize::normalize;
pub use self::routes::router;
