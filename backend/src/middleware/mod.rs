//! Request middleware shared by every route.
//!
//! The login gate lives with the HTTP adapter in
//! [`crate::inbound::http::access_gate`] because it depends on the session.

pub mod trace;

pub use trace::Trace;
