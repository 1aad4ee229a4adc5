//! Stripdex API - public REST gateway.
//!
//! Multiplexes requests across the backend services and enforces admission
//! control: token auth on mutating routes, a concurrency cap on `/api/search`
//! and a rate limit on `/api/isearch`.

mod aaa;
mod clients;
pub mod config;
mod middleware;
mod ports;
mod rate;
mod routes;

#[cfg(test)]
pub(crate) mod testutil;

pub use self::aaa::Aaa;
pub use self::clients::{SearchClient, UpdateClient, WordsPinger};
pub use self::config::Config;
pub use self::ports::{Pinger, Searcher, Updater};
pub use self::rate::RateLimiter;
pub use self::routes::{router, AppState, RouterOptions};
