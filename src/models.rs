//! Wire types for the email validation endpoints and the response envelope.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body of a job creation call: `{ "entries": [ { "inputData": "..." }, ... ] }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationRequest {
    pub entries: Vec<RequestEntry>,
}

impl ValidationRequest {
    /// Wrap each address as an entry, keeping input order.
    pub fn new<I, S>(emails: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            entries: emails.into_iter().map(RequestEntry::new).collect(),
        }
    }

    /// True when no addresses were supplied.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries in the batch.
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// One address submitted for validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestEntry {
    pub input_data: String,
}

impl RequestEntry {
    pub fn new(input_data: impl Into<String>) -> Self {
        Self {
            input_data: input_data.into(),
        }
    }
}

/// A validation job as reported by the server.
///
/// `unique_id` is required: a body without it is not a job payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Data {
    #[serde(rename = "uniqueID")]
    pub unique_id: String,
    /// Validation engine version tag.
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub submitted_on: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_on: Option<DateTime<Utc>>,
    #[serde(default)]
    pub entries: Vec<Entry>,
    #[serde(default)]
    pub progress: Progress,
}

impl Data {
    /// Whether the server considers the job finished.
    pub fn is_completed(&self) -> bool {
        self.completed_on.is_some() || self.progress.is_complete()
    }
}

/// Completed vs. total entry counters of a job.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    #[serde(default)]
    pub no_of_total_entries: u32,
    #[serde(default)]
    pub no_of_completed_entries: u32,
}

impl Progress {
    /// True once every entry has been processed. A job with no entries reported yet is not complete.
    pub fn is_complete(&self) -> bool {
        self.no_of_total_entries > 0 && self.no_of_completed_entries >= self.no_of_total_entries
    }

    /// Entries still waiting to be processed.
    pub fn remaining(&self) -> u32 {
        self.no_of_total_entries.saturating_sub(self.no_of_completed_entries)
    }
}

/// Validation outcome for a single address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Entry {
    pub input_data: String,
    pub email_address: Option<String>,
    pub email_address_local_part: Option<String>,
    pub email_address_domain_part: Option<String>,
    pub ascii_email_address_domain_part: Option<String>,
    pub has_international_mailbox_name: bool,
    pub has_international_domain_name: bool,
    pub is_disposable_email_address: bool,
    pub is_role_account: bool,
    pub is_free_email_address: bool,
    pub syntax_failure_index: Option<u32>,
    /// Server-side status name, e.g. `Success` or `DomainIsMisconfigured`.
    pub status: Option<String>,
    pub is_success: bool,
    pub is_syntax_failure: bool,
    pub is_dns_failure: bool,
    pub is_smtp_failure: bool,
    pub is_mailbox_failure: bool,
    pub is_timeout_failure: bool,
    pub is_network_failure: bool,
    pub is_catch_all_failure: bool,
    pub completed_on: Option<DateTime<Utc>>,
}

/// Normalized outcome of any API call.
///
/// A `Response` means the exchange happened; whether the job request itself
/// succeeded is told by [`status_code`](Self::status_code).
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status_code: u16,
    /// Status line text, e.g. `202 Accepted`.
    pub status: String,
    /// Follow-up URL from the `Location` header, typically where to poll next.
    pub location: Option<String>,
    /// Mirror of `data.unique_id` when a payload is present.
    pub unique_id: Option<String>,
    pub data: Option<Data>,
}

impl Response {
    pub(crate) fn new(
        status: reqwest::StatusCode,
        location: Option<String>,
        data: Option<Data>,
    ) -> Self {
        let status_text = match status.canonical_reason() {
            Some(reason) => format!("{} {}", status.as_u16(), reason),
            None => status.as_u16().to_string(),
        };

        Self {
            status_code: status.as_u16(),
            status: status_text,
            location,
            unique_id: data.as_ref().map(|d| d.unique_id.clone()),
            data,
        }
    }

    /// True for 2xx status codes.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    /// True when a payload is present and reports the job as finished.
    pub fn is_completed(&self) -> bool {
        self.data.as_ref().is_some_and(Data::is_completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_preserves_order_and_count() {
        let req = ValidationRequest::new(["a@x.com", "b@y.com"]);
        let encoded = serde_json::to_value(&req).unwrap();
        assert_eq!(
            encoded,
            json!({ "entries": [ { "inputData": "a@x.com" }, { "inputData": "b@y.com" } ] })
        );

        let decoded: ValidationRequest = serde_json::from_value(encoded).unwrap();
        assert_eq!(
            decoded.entries,
            vec![RequestEntry::new("a@x.com"), RequestEntry::new("b@y.com")]
        );
    }

    #[test]
    fn minimal_job_payload_decodes() {
        let data: Data = serde_json::from_value(json!({
            "uniqueID": "abc-123",
            "entries": [],
            "progress": { "noOfTotalEntries": 1, "noOfCompletedEntries": 0 }
        }))
        .unwrap();

        assert_eq!(data.unique_id, "abc-123");
        assert_eq!(data.progress.no_of_total_entries, 1);
        assert_eq!(data.progress.remaining(), 1);
        assert!(data.version.is_none());
        assert!(!data.is_completed());
    }

    #[test]
    fn full_job_payload_decodes() {
        let data: Data = serde_json::from_value(json!({
            "uniqueID": "0b5b8e2c-77a5-4fb1-a5b8-c0e7c24e6c8d",
            "version": "v1.1",
            "submittedOn": "2024-03-01T10:00:00.12Z",
            "completedOn": "2024-03-01T10:00:03.5Z",
            "entries": [{
                "inputData": "batman@gmail.com",
                "emailAddress": "batman@gmail.com",
                "emailAddressLocalPart": "batman",
                "emailAddressDomainPart": "gmail.com",
                "asciiEmailAddressDomainPart": "gmail.com",
                "hasInternationalMailboxName": false,
                "hasInternationalDomainName": false,
                "isDisposableEmailAddress": false,
                "isRoleAccount": false,
                "isFreeEmailAddress": true,
                "status": "Success",
                "isSuccess": true,
                "isSyntaxFailure": false,
                "isDnsFailure": false,
                "isSmtpFailure": false,
                "isMailboxFailure": false,
                "isTimeoutFailure": false,
                "isNetworkFailure": false,
                "isCatchAllFailure": false,
                "completedOn": "2024-03-01T10:00:03.1Z"
            }],
            "progress": { "noOfTotalEntries": 1, "noOfCompletedEntries": 1 }
        }))
        .unwrap();

        assert!(data.is_completed());
        assert_eq!(data.version.as_deref(), Some("v1.1"));
        let entry = &data.entries[0];
        assert!(entry.is_success);
        assert!(entry.is_free_email_address);
        assert_eq!(entry.email_address_local_part.as_deref(), Some("batman"));
        assert_eq!(entry.status.as_deref(), Some("Success"));
    }

    #[test]
    fn error_shaped_body_is_not_a_job() {
        let parsed = serde_json::from_value::<Data>(json!({ "message": "Not found" }));
        assert!(parsed.is_err());
    }

    #[test]
    fn progress_with_no_entries_is_not_complete() {
        assert!(!Progress::default().is_complete());
        let done = Progress {
            no_of_total_entries: 2,
            no_of_completed_entries: 2,
        };
        assert!(done.is_complete());
        assert_eq!(done.remaining(), 0);
    }

    #[test]
    fn response_mirrors_unique_id() {
        let data: Data = serde_json::from_value(json!({ "uniqueID": "job-1" })).unwrap();
        let resp = Response::new(reqwest::StatusCode::ACCEPTED, None, Some(data));
        assert_eq!(resp.status_code, 202);
        assert_eq!(resp.status, "202 Accepted");
        assert_eq!(resp.unique_id.as_deref(), Some("job-1"));
        assert!(resp.is_success());

        let empty = Response::new(reqwest::StatusCode::NOT_ACCEPTABLE, None, None);
        assert!(empty.unique_id.is_none());
        assert!(!empty.is_success());
        assert!(!empty.is_completed());
    }
}
