//! # kap - client for the KAP public disclosure platform
//!
//! `kap` talks to the REST API through which the KAP platform publishes
//! disclosures, member companies, funds, attachments and corporate action
//! status. It is built on `reqwest` and decodes every payload into typed
//! structs.
//!
//! ## Quick Start
//!
//! ```no_run
//! use kap::{types::FileType, Client};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), kap::Error> {
//!     // Production: exchange an API key for a token once, then reuse it.
//!     let client = Client::builder()
//!         .api_key(std::env::var("MKK_API_KEY").unwrap_or_default())
//!         .base_url("https://apigw.mkk.com.tr")?
//!         .timeout(Duration::from_secs(30))
//!         .build()?;
//!     client.generate_token().await?;
//!
//!     let last = client.last_disclosure_index().await?;
//!     println!("Latest disclosure index: {}", last);
//!
//!     let detail = client.disclosure_detail(1211180, FileType::Data, None).await?;
//!     println!("Sent by {}", detail.sender_title);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Authentication
//!
//! - **Token**: set an API key with [`ClientBuilder::api_key`] and call
//!   [`Client::generate_token`], or supply an existing token with
//!   [`ClientBuilder::token`]. The token is sent verbatim in the
//!   `Authorization` header.
//! - **Basic**: the test environment takes HTTP Basic credentials set with
//!   [`ClientBuilder::basic_auth`]. They win over any token.
//!
//! ## Error Handling
//!
//! Platform errors carry a code that is classified into an [`ErrorKind`]:
//!
//! ```no_run
//! use kap::{Client, Error, ErrorKind};
//!
//! # async fn example() -> Result<(), Error> {
//! # let client = Client::builder().token("t").build()?;
//! match client.funds(None).await {
//!     Ok(funds) => println!("{} funds", funds.len()),
//!     Err(e) if e.kind() == Some(ErrorKind::TokenExpired) => {
//!         client.generate_token().await?;
//!     }
//!     Err(Error::Request(e)) => eprintln!("request failed: {}", e),
//!     Err(e) => eprintln!("api error: {}", e),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Cancellation
//!
//! [`Client::with_cancellation`] and [`Client::with_deadline`] return
//! handles whose requests fail with a request error as soon as the token
//! fires or the deadline passes.

mod auth;
mod client;
pub mod context;
mod download;
mod endpoints;
mod error;
pub mod metadata;
mod response;
pub mod types;

pub use auth::{AuthMode, BasicAuth, Credentials};
pub use client::{Client, ClientBuilder, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
pub use download::Download;
pub use error::{ApiError, Error, ErrorCode, ErrorKind, RequestError, RequestFailure, Result};
pub use response::Response;
pub use tokio_util::sync::CancellationToken;
