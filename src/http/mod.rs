// Backend HTTP plumbing

pub mod client;
pub mod context;
pub mod request;
pub mod resilience;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;
#[cfg(test)]
mod tests;

pub use client::HttpClient;
pub use context::ClientContext;
pub use request::{with_query, OutgoingRequest, RequestOptions};
pub use resilience::RequestPolicy;
pub use transport::{ReqwestTransport, Transport, TransportResponse};
