//! Job posting entity and per-item conversion

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

static TAG_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());

/// Remove every `<...>` markup tag from a text, keeping the inner text
pub fn strip_tags(text: &str) -> String {
    TAG_PATTERN.replace_all(text, "").into_owned()
}

/// A job posting as returned by the trial `/trace` endpoint
///
/// Every field except `description` is copied from the listing as is, `null`
/// or otherwise, but must be present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub description: String,
    #[serde(deserialize_with = "present")]
    pub company: Value,
    #[serde(deserialize_with = "present")]
    pub company_url: Value,
    #[serde(deserialize_with = "present")]
    pub created_at: Value,
    #[serde(deserialize_with = "present")]
    pub how_to_apply: Value,
    #[serde(deserialize_with = "present")]
    pub location: Value,
    #[serde(deserialize_with = "present")]
    pub title: Value,
    #[serde(rename = "type", deserialize_with = "present")]
    pub job_type: Value,
    #[serde(deserialize_with = "present")]
    pub url: Value,
}

// A plain `Value` field turns a missing key into `null`; routing it through
// `deserialize_with` makes serde report the key as missing instead.
fn present<'de, D>(deserializer: D) -> Result<Value, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Value::deserialize(deserializer)
}

/// A single listing that could not be turned into a [`Job`]
#[derive(Debug, Clone, Error, PartialEq)]
#[error("Unable to process listing for {company}: {reason}")]
pub struct JobItemError {
    pub company: String,
    pub reason: String,
}

impl Job {
    /// Convert one raw upstream listing, stripping markup from the description
    pub fn from_listing(listing: &Value) -> Result<Self, JobItemError> {
        let company = Self::company_of(listing);
        let fail = |reason: String| JobItemError {
            company: company.clone(),
            reason,
        };

        let mut job: Job =
            serde_json::from_value(listing.clone()).map_err(|e| fail(e.to_string()))?;
        job.description = strip_tags(&job.description);

        Ok(job)
    }

    /// Best-effort company name used for span tags and log lines
    pub fn company_of(listing: &Value) -> String {
        listing
            .get("company")
            .and_then(Value::as_str)
            .unwrap_or("unknown")
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn listing() -> Value {
        json!({
            "id": "abc",
            "description": "<p>Write <b>Python</b> all day</p>",
            "company": "Acme",
            "company_url": null,
            "created_at": "Mon Mar 01 10:00:00 UTC 2021",
            "how_to_apply": "<a href=\"mailto:jobs@acme.test\">mail us</a>",
            "location": "Remote",
            "title": "Backend Engineer",
            "type": "Full Time",
            "url": "https://jobs.example/abc"
        })
    }

    #[test]
    fn test_strip_tags() {
        assert_eq!(strip_tags("<div>a<br/>b</div>"), "ab");
        assert_eq!(strip_tags("no markup"), "no markup");
        assert_eq!(strip_tags("a <unterminated"), "a <unterminated");
    }

    #[test]
    fn test_from_listing_strips_description_only() {
        let job = Job::from_listing(&listing()).unwrap();

        assert_eq!(job.description, "Write Python all day");
        assert_eq!(job.company, "Acme");
        assert_eq!(job.company_url, Value::Null);
        assert_eq!(job.job_type, "Full Time");
        assert!(job.how_to_apply.as_str().unwrap().starts_with("<a"));
    }

    #[test]
    fn test_from_listing_keeps_null_and_non_string_values() {
        let mut raw = listing();
        raw["location"] = Value::Null;
        raw["title"] = json!(7);

        let job = Job::from_listing(&raw).unwrap();
        assert_eq!(job.location, Value::Null);
        assert_eq!(job.title, json!(7));

        let value = serde_json::to_value(&job).unwrap();
        assert!(value.get("location").unwrap().is_null());
    }

    #[test]
    fn test_from_listing_missing_company_url() {
        let mut raw = listing();
        raw.as_object_mut().unwrap().remove("company_url");

        let err = Job::from_listing(&raw).unwrap_err();
        assert!(err.reason.contains("company_url"));
    }

    #[test]
    fn test_from_listing_non_string_description() {
        let mut raw = listing();
        raw["description"] = json!(42);

        assert!(Job::from_listing(&raw).is_err());
    }

    #[test]
    fn test_from_listing_missing_field() {
        let mut raw = listing();
        raw.as_object_mut().unwrap().remove("title");

        let err = Job::from_listing(&raw).unwrap_err();
        assert_eq!(err.company, "Acme");
        assert!(err.reason.contains("title"));
    }

    #[test]
    fn test_from_listing_without_company() {
        let err = Job::from_listing(&json!({"title": 3})).unwrap_err();
        assert_eq!(err.company, "unknown");
    }

    #[test]
    fn test_job_serializes_type_field() {
        let job = Job::from_listing(&listing()).unwrap();
        let value = serde_json::to_value(&job).unwrap();

        assert_eq!(value["type"], "Full Time");
        assert!(value.get("job_type").is_none());
    }
}
