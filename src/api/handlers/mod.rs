//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod domains;
pub mod health;
pub mod ports;
pub mod server;
pub mod stats;

pub use domains::{add_domain_handler, delete_domain_handler, domain_list_handler};
pub use health::health_handler;
pub use ports::{add_port_handler, delete_port_handler, port_list_handler};
pub use server::{
    reload_handler, restart_handler, start_handler, status_handler, stop_handler,
};
pub use stats::stats_handler;
