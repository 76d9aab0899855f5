//! Outbound adapters implementing domain ports.
//!
//! - **json_store**: JSON files for visited places and links, and the
//!   finance seed reader.
//! - **persistence**: PostgreSQL repositories using Diesel.
//! - **oauth**: reqwest client for identity provider token and userinfo
//!   calls.
//!
//! Adapters translate between domain types and infrastructure formats. They
//! contain no business rules.

pub mod json_store;
pub mod oauth;
pub mod persistence;
