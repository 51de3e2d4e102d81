//! Wire types and HTTP clients for the Secret Santa gift exchange server.
//!
//! `objects` holds every request/response body and the error taxonomy
//! shared with the server. The typed clients live behind the `client`
//! cargo feature.

pub mod objects;

#[cfg(feature = "client")]
pub mod client;
