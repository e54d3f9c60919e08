use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::debug;

/// A short link as returned by the link API.
///
/// Non-authoritative: held only for the duration of one rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortLink {
    pub short_code: String,
    pub original_url: String,
    #[serde(default, alias = "userId")]
    pub owner_id: Option<String>,
    /// Unparseable timestamps become `None` instead of failing the whole list
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Naive layouts seen from the API, read as UTC
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Accepts RFC 3339, a naive `YYYY-MM-DD HH:MM:SS` or epoch milliseconds
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let parsed = match &value {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::String(s)) => parse_timestamp(s),
        Some(Value::Number(n)) => n.as_i64().and_then(DateTime::from_timestamp_millis),
        Some(_) => None,
    };

    if parsed.is_none() {
        debug!("Ignoring unrecognised createdAt value: {:?}", value);
    }
    Ok(parsed)
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return Some(t.with_timezone(&Utc));
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|t| t.and_utc())
}

/// `GET /urls/{userId}`
#[derive(Debug, Default, Deserialize)]
pub struct ListResponse {
    #[serde(default)]
    pub urls: Option<Vec<ShortLink>>,
}

/// `POST /shorten` request body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortenRequest<'a> {
    pub original_url: &'a str,
    pub user_id: &'a str,
}

/// `POST /shorten` success body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortenResponse {
    pub short_code: String,
}

/// Error body the API sends with non-2xx statuses
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

/// `GET /urls/lookup/{shortCode}`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupResponse {
    #[serde(default)]
    pub original_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_link_accepts_user_id_alias() {
        let link: ShortLink = serde_json::from_str(
            r#"{"shortCode":"abc123","originalUrl":"example.com","userId":"user_1","createdAt":"2025-01-05T15:04:00Z"}"#,
        )
        .unwrap();

        assert_eq!(link.short_code, "abc123");
        assert_eq!(link.owner_id.as_deref(), Some("user_1"));
        assert!(link.created_at.is_some());
    }

    #[test]
    fn test_short_link_without_optional_fields() {
        let link: ShortLink =
            serde_json::from_str(r#"{"shortCode":"x","originalUrl":"https://a.b"}"#).unwrap();
        assert!(link.owner_id.is_none());
        assert!(link.created_at.is_none());
    }

    #[test]
    fn test_odd_created_at_keeps_the_list() {
        let list: ListResponse = serde_json::from_str(
            r#"{"urls":[
                {"shortCode":"abc123","originalUrl":"example.com","createdAt":"2025-01-05T15:04:00Z"},
                {"shortCode":"def456","originalUrl":"example.org","createdAt":"last tuesday"}
            ]}"#,
        )
        .unwrap();

        let urls = list.urls.unwrap();
        assert_eq!(urls.len(), 2);
        assert!(urls[0].created_at.is_some());
        assert_eq!(urls[1].short_code, "def456");
        assert!(urls[1].created_at.is_none());
    }

    #[test]
    fn test_created_at_alternate_shapes() {
        let expected = "2025-01-05T15:04:00Z".parse::<DateTime<Utc>>().unwrap();

        for created_at in [
            r#""2025-01-05 15:04:00""#,
            r#""2025-01-05T15:04:00""#,
            r#""2025-01-05T16:04:00+01:00""#,
            "1736089440000",
        ] {
            let link: ShortLink = serde_json::from_str(&format!(
                r#"{{"shortCode":"x","originalUrl":"https://a.b","createdAt":{}}}"#,
                created_at
            ))
            .unwrap();
            assert_eq!(link.created_at, Some(expected), "{}", created_at);
        }

        let link: ShortLink = serde_json::from_str(
            r#"{"shortCode":"x","originalUrl":"https://a.b","createdAt":null}"#,
        )
        .unwrap();
        assert!(link.created_at.is_none());
    }

    #[test]
    fn test_list_response_missing_urls() {
        let list: ListResponse = serde_json::from_str("{}").unwrap();
        assert!(list.urls.is_none());
    }

    #[test]
    fn test_shorten_request_is_camel_case() {
        let body = serde_json::to_value(ShortenRequest {
            original_url: "https://example.com",
            user_id: "u1",
        })
        .unwrap();
        assert_eq!(body["originalUrl"], "https://example.com");
        assert_eq!(body["userId"], "u1");
    }
}
