//! HTTP implementation of the mail gateway

use std::time::Duration;

use base64::Engine;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::{ApiError, MailGateway, Profile};
use crate::constants::HTTP_TIMEOUT_SECS;
use crate::model::{Label, Message, MessageBody, MessageFlags, Thread, ThreadPage};

/// Client for the Gmail v1 REST surface (or anything wire-compatible).
#[derive(Clone)]
pub struct GmailClient {
    http: Client,
    base_url: String,
    token: String,
}

// === Wire types ===

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProfileResponse {
    email_address: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThreadListResponse {
    #[serde(default)]
    threads: Vec<ThreadStub>,
    next_page_token: Option<String>,
}

#[derive(Deserialize)]
struct ThreadStub {
    id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThreadResponse {
    id: String,
    #[serde(default)]
    messages: Vec<MessageResponse>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MessageResponse {
    id: String,
    thread_id: String,
    #[serde(default)]
    label_ids: Vec<String>,
    #[serde(default)]
    snippet: String,
    /// Epoch milliseconds, sent as a string.
    internal_date: Option<String>,
    payload: Option<PayloadPart>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PayloadPart {
    mime_type: Option<String>,
    #[serde(default)]
    headers: Vec<Header>,
    body: Option<PartBody>,
    #[serde(default)]
    parts: Vec<PayloadPart>,
}

#[derive(Deserialize)]
struct Header {
    name: String,
    value: String,
}

#[derive(Deserialize)]
struct PartBody {
    data: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LabelListResponse {
    #[serde(default)]
    labels: Vec<LabelResponse>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LabelResponse {
    id: String,
    name: String,
    #[serde(default)]
    threads_unread: Option<u32>,
    #[serde(default)]
    label_list_visibility: Option<String>,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct ModifyThreadRequest {
    add_label_ids: Vec<String>,
    remove_label_ids: Vec<String>,
}

impl GmailClient {
    pub fn new(base_url: &str, token: &str) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    /// Map auth rejections before surfacing other HTTP failures.
    fn check(response: Response) -> Result<Response, ApiError> {
        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(ApiError::Unauthorized),
            _ => Ok(response.error_for_status()?),
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let response = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .bearer_auth(&self.token)
            .query(params)
            .send()
            .await?;

        Ok(Self::check(response)?.json().await?)
    }

    async fn fetch_thread(&self, thread_id: &str) -> Result<Thread, ApiError> {
        let response: ThreadResponse = self
            .get_json(
                &format!("/users/me/threads/{}", thread_id),
                &[
                    ("format", "metadata".to_string()),
                    ("metadataHeaders", "Subject".to_string()),
                ],
            )
            .await?;

        let mut messages: Vec<Message> = response
            .messages
            .into_iter()
            .map(convert_message)
            .collect::<Result<_, _>>()?;
        // Oldest first within the thread, the order the model relies on.
        messages.sort_by_key(|m| m.date);

        Ok(Thread {
            id: response.id,
            messages,
        })
    }
}

impl MailGateway for GmailClient {
    async fn fetch_profile(&self) -> Result<Profile, ApiError> {
        let response: ProfileResponse = self.get_json("/users/me/profile", &[]).await?;
        Ok(Profile {
            email_address: response.email_address,
        })
    }

    async fn list_threads(&self, query: &str, max_results: u32) -> Result<ThreadPage, ApiError> {
        let mut params = vec![("maxResults", max_results.to_string())];
        if !query.is_empty() {
            params.push(("q", query.to_string()));
        }

        let listing: ThreadListResponse = self.get_json("/users/me/threads", &params).await?;
        let has_more = listing.next_page_token.is_some();

        // The listing only carries ids; hydrate each thread with headers.
        let mut threads = Vec::with_capacity(listing.threads.len());
        for stub in &listing.threads {
            threads.push(self.fetch_thread(&stub.id).await?);
        }

        Ok(ThreadPage { threads, has_more })
    }

    async fn mark_thread_read(&self, thread_id: &str) -> Result<(), ApiError> {
        let request = ModifyThreadRequest {
            add_label_ids: Vec::new(),
            remove_label_ids: vec!["UNREAD".to_string()],
        };

        let response = self
            .http
            .post(format!(
                "{}/users/me/threads/{}/modify",
                self.base_url, thread_id
            ))
            .bearer_auth(&self.token)
            .json(&request)
            .send()
            .await?;

        Self::check(response)?;
        Ok(())
    }

    async fn list_labels(&self) -> Result<Vec<Label>, ApiError> {
        let listing: LabelListResponse = self.get_json("/users/me/labels", &[]).await?;

        // The list call omits counts; fetch each visible label for them.
        let mut labels = Vec::new();
        for stub in listing.labels {
            if stub.label_list_visibility.as_deref() == Some("labelHide") {
                continue;
            }
            let detail: LabelResponse = self
                .get_json(&format!("/users/me/labels/{}", stub.id), &[])
                .await?;
            labels.push(Label {
                name: detail.name,
                unread_threads: detail.threads_unread.unwrap_or(0),
            });
        }

        Ok(labels)
    }

    async fn fetch_body(&self, message_id: &str) -> Result<MessageBody, ApiError> {
        let response: MessageResponse = self
            .get_json(
                &format!("/users/me/messages/{}", message_id),
                &[("format", "full".to_string())],
            )
            .await?;

        let mut body = MessageBody::default();
        if let Some(ref payload) = response.payload {
            collect_body_parts(payload, &mut body)?;
        }
        Ok(body)
    }
}

fn convert_message(wire: MessageResponse) -> Result<Message, ApiError> {
    let date = match wire.internal_date {
        Some(ref millis) => {
            millis
                .parse::<i64>()
                .map_err(|_| ApiError::Decode(format!("bad internalDate: {}", millis)))?
                / 1000
        }
        None => 0,
    };

    let mut flags = MessageFlags::empty();
    if wire.label_ids.iter().any(|l| l == "UNREAD") {
        flags |= MessageFlags::UNREAD;
    }
    if wire.label_ids.iter().any(|l| l == "STARRED") {
        flags |= MessageFlags::STARRED;
    }

    let header = |name: &str| -> String {
        wire.payload
            .as_ref()
            .and_then(|p| {
                p.headers
                    .iter()
                    .find(|h| h.name.eq_ignore_ascii_case(name))
            })
            .map(|h| h.value.clone())
            .unwrap_or_default()
    };

    Ok(Message {
        id: wire.id,
        thread_id: wire.thread_id,
        subject: header("Subject"),
        from: header("From"),
        snippet: wire.snippet,
        date,
        flags,
    })
}

/// Walk the MIME tree, keeping the first text/plain and text/html parts.
fn collect_body_parts(payload: &PayloadPart, body: &mut MessageBody) -> Result<(), ApiError> {
    let mime = payload.mime_type.as_deref().unwrap_or("");
    if let Some(data) = payload.body.as_ref().and_then(|b| b.data.as_deref()) {
        if mime.starts_with("text/plain") && body.text.is_none() {
            body.text = Some(decode_body_data(data)?);
        } else if mime.starts_with("text/html") && body.html.is_none() {
            body.html = Some(decode_body_data(data)?);
        }
    }
    for part in &payload.parts {
        collect_body_parts(part, body)?;
    }
    Ok(())
}

/// Body data is base64url; some servers pad it, some do not.
fn decode_body_data(data: &str) -> Result<String, ApiError> {
    let bytes = base64::engine::general_purpose::URL_SAFE
        .decode(data)
        .or_else(|_| base64::engine::general_purpose::URL_SAFE_NO_PAD.decode(data))
        .map_err(|e| ApiError::Decode(format!("bad body encoding: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| ApiError::Decode(format!("body is not UTF-8: {}", e)))
}
