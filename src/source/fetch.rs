use serde_json::Value;
use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("server responded with status {0}")]
    Status(u16),

    #[error("fetch sources must return a string or an object with text")]
    UnsupportedPayload,

    #[error("fetched text is empty")]
    Empty,

    #[error("network support is not compiled in")]
    NetworkDisabled,
}

/// A pluggable, zero-argument producer of practice text. Each call yields a
/// fresh passage.
pub trait TextFetcher: Send + Sync + 'static {
    fn fetch(&self) -> Result<String, FetchError>;

    fn describe(&self) -> String {
        "custom fetcher".to_string()
    }
}

impl<F> TextFetcher for F
where
    F: Fn() -> Result<String, FetchError> + Send + Sync + 'static,
{
    fn fetch(&self) -> Result<String, FetchError> {
        self()
    }
}

/// Picks the text out of a fetched payload: a bare string, or the first of
/// `text`, `fact`, `value` that holds a string.
pub fn normalize_payload(payload: &Value) -> Result<String, FetchError> {
    let text = match payload {
        Value::String(text) => Some(text.as_str()),
        Value::Object(map) => ["text", "fact", "value"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_str)),
        _ => None,
    };
    let text = text.ok_or(FetchError::UnsupportedPayload)?;
    if text.trim().is_empty() {
        return Err(FetchError::Empty);
    }
    Ok(text.to_string())
}

/// JSON bodies go through [`normalize_payload`]; anything that is not JSON
/// is taken as the text itself.
pub fn normalize_body(body: &str) -> Result<String, FetchError> {
    match serde_json::from_str::<Value>(body) {
        Ok(payload) => normalize_payload(&payload),
        Err(_) if body.trim().is_empty() => Err(FetchError::Empty),
        Err(_) => Ok(body.to_string()),
    }
}

/// GETs a URL on every fetch.
#[derive(Clone, Debug)]
pub struct HttpFetcher {
    url: String,
}

impl HttpFetcher {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl TextFetcher for HttpFetcher {
    fn fetch(&self) -> Result<String, FetchError> {
        let body = fetch_url(&self.url)?;
        normalize_body(&body)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

#[cfg(feature = "network")]
pub fn fetch_url(url: &str) -> Result<String, FetchError> {
    let client = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(10))
        .build()
        .map_err(|e| FetchError::Transport(e.to_string()))?;
    let response = client
        .get(url)
        .send()
        .map_err(|e| FetchError::Transport(e.to_string()))?;
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status(status.as_u16()));
    }
    response
        .text()
        .map_err(|e| FetchError::Transport(e.to_string()))
}

#[cfg(not(feature = "network"))]
pub fn fetch_url(_url: &str) -> Result<String, FetchError> {
    Err(FetchError::NetworkDisabled)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_string_payload() {
        assert_eq!(normalize_payload(&json!("a fact")).unwrap(), "a fact");
    }

    #[test]
    fn test_object_payload_field_order() {
        assert_eq!(
            normalize_payload(&json!({"id": 3, "text": "from text"})).unwrap(),
            "from text"
        );
        assert_eq!(
            normalize_payload(&json!({"fact": "from fact", "value": "from value"})).unwrap(),
            "from fact"
        );
        assert_eq!(
            normalize_payload(&json!({"text": 5, "value": "from value"})).unwrap(),
            "from value"
        );
    }

    #[test]
    fn test_unsupported_payloads() {
        for payload in [json!(42), json!(["a"]), json!({"quote": "x"}), json!(null)] {
            assert_eq!(
                normalize_payload(&payload),
                Err(FetchError::UnsupportedPayload)
            );
        }
    }

    #[test]
    fn test_blank_text_is_empty_error() {
        assert_eq!(normalize_payload(&json!({"text": "   "})), Err(FetchError::Empty));
        assert_eq!(normalize_body(""), Err(FetchError::Empty));
    }

    #[test]
    fn test_body_plain_text_passthrough() {
        assert_eq!(normalize_body("just words").unwrap(), "just words");
        assert_eq!(
            normalize_body(r#"{"text": "json words"}"#).unwrap(),
            "json words"
        );
    }

    #[test]
    fn test_closure_is_a_fetcher() {
        let fetcher = || Ok::<_, FetchError>("closure text".to_string());
        assert_eq!(TextFetcher::fetch(&fetcher).unwrap(), "closure text");
        assert_eq!(fetcher.describe(), "custom fetcher");
    }

    #[test]
    fn test_fetch_error_messages() {
        assert_eq!(
            FetchError::Status(503).to_string(),
            "server responded with status 503"
        );
        assert_eq!(
            FetchError::UnsupportedPayload.to_string(),
            "fetch sources must return a string or an object with text"
        );
    }
}
