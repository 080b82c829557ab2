// opsdash - IT operations dashboard client
// Library root

pub mod api;
pub mod config;
pub mod error;
pub mod http;
pub mod logging;
pub mod session;
pub mod version;
