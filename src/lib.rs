//! # Verifalia Client
//! Asynchronous wrapper around the Verifalia email validation REST API: submit a batch of addresses as a validation job, poll the job until it completes, then delete it, using [`Client`] and [`ClientBuilder`].
//!
//! ## Job lifecycle
//! Jobs live on the server. [`Client::submit`] creates one, [`Client::poll`] reads its current state (possibly partial, see [`Progress`]), and [`Client::delete`] removes it once it is complete. The client keeps no job state of its own and never polls in the background.
//!
//! ## Runtime requirements
//! Async-only; run inside a Tokio (v1) runtime. HTTP calls use `reqwest`. The crate emits `tracing` events but does not install a subscriber.
//!
//! ## Out of scope
//! Not a validation engine. Syntax, DNS and SMTP checks all happen server-side; this crate only models the API.
//!
//! ## Errors
//! Local failures (empty input, bad configuration, encoding) and transport failures are returned as [`Error`]. Anything the server answers, including 4xx and 5xx, comes back as a [`Response`]: check both the `Result` and [`Response::status_code`].
//!
//! ## Example
//! ```no_run
//! use verifalia_client::Client;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), verifalia_client::Error> {
//!     let client = Client::new("account-sid", "auth-token")?;
//!     let submitted = client.submit(["john.smith@example.com", "foo@example.net"]).await?;
//!     println!("Submitted: {} ({:?})", submitted.status, submitted.unique_id);
//!
//!     if let Some(id) = submitted.unique_id.as_deref() {
//!         let polled = client.poll(id).await?;
//!         if polled.is_completed() {
//!             for entry in polled.data.iter().flat_map(|d| &d.entries) {
//!                 println!("{}: {:?}", entry.input_data, entry.status);
//!             }
//!             client.delete(id).await?;
//!         }
//!     }
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod models;

pub use client::{Client, ClientBuilder};
pub use error::Error;
pub use models::{Data, Entry, Progress, RequestEntry, Response, ValidationRequest};

/// Result type alias for Verifalia operations.
///
/// This is equivalent to `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
