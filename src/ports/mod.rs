//! Port traits decoupling the domain from configuration and output formats.

pub mod config_port;
pub mod report_port;
