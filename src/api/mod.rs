//! REST client for Gmail-style mail services
//!
//! Split into: mod.rs (error taxonomy + gateway trait), client.rs (HTTP
//! implementation). The store actor only talks through [`MailGateway`],
//! which keeps it testable against an in-memory fake.

mod client;

pub use client::GmailClient;

use std::future::Future;

use crate::model::{Label, MessageBody, ThreadPage};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The token was rejected. Distinct from transport errors because the
    /// UI reacts by showing the login overlay instead of a retryable error.
    #[error("not authorized")]
    Unauthorized,
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("malformed response: {0}")]
    Decode(String),
}

/// The account the token belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub email_address: String,
}

/// Everything the store needs from the mail service.
///
/// Methods are declared in desugared form so the returned futures carry a
/// `Send` bound; implementations can still use plain `async fn`.
pub trait MailGateway: Clone + Send + Sync + 'static {
    /// Cheap call used as the startup auth probe.
    fn fetch_profile(&self) -> impl Future<Output = Result<Profile, ApiError>> + Send;

    /// One page of threads matching `query`, newest first.
    fn list_threads(
        &self,
        query: &str,
        max_results: u32,
    ) -> impl Future<Output = Result<ThreadPage, ApiError>> + Send;

    /// Remove the unread marker from every message in the thread.
    fn mark_thread_read(&self, thread_id: &str)
    -> impl Future<Output = Result<(), ApiError>> + Send;

    fn list_labels(&self) -> impl Future<Output = Result<Vec<Label>, ApiError>> + Send;

    /// Full body of a single message.
    fn fetch_body(
        &self,
        message_id: &str,
    ) -> impl Future<Output = Result<MessageBody, ApiError>> + Send;
}
