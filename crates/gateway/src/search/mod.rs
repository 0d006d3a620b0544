//! Search proxy — forwards log queries to Coralogix and reshapes the
//! results into the gateway's entry layout.

pub mod client;
pub mod map;
pub mod route;

pub use client::CoralogixClient;
