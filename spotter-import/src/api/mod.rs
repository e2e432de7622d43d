//! HTTP API handlers for spotter-import

pub mod health;
pub mod import_run;
pub mod needs;

pub use health::health_routes;
pub use import_run::import_routes;
pub use needs::need_routes;
