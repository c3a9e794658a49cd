//! # Sente payment server
//!
//! The HTTP face of the Sente wallet service. It is responsible for:
//! * Accepting deposit/withdrawal initiations and handing them to the payment engine.
//! * Serving balances and transaction history.
//! * Hosting the status poll worker that drives in-flight mobile money transactions to their
//!   terminal state.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config] for more information.
//!
//! Authentication is terminated by the session layer in front of this service; handlers read the
//! asserted user id from a request header (see [helpers::AuthenticatedUser]).
pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;

pub mod helpers;
pub mod integrations;
pub mod poll_worker;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
