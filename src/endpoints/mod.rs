//! Typed endpoint methods on [`Client`](crate::Client).
//!
//! Each method builds a path and query, runs it through
//! [`Client::get`](crate::Client::get) or
//! [`Client::get_raw`](crate::Client::get_raw), and returns the payload.

mod attachments;
mod corporate_actions;
mod disclosures;
mod funds;
mod members;
