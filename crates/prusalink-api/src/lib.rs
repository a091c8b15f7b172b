// prusalink-api: Async Rust client for the PrusaLink local printer API

pub mod auth;
pub mod client;
pub mod error;
pub mod job;
pub mod printer;
pub mod transport;
pub mod types;

pub use auth::Auth;
pub use client::PrusaLink;
pub use error::Error;
pub use transport::TransportConfig;
pub use types::{JobInfo, LegacyPrinterStatus, PrinterInfo, PrinterStatus};
