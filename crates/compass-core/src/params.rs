use serde::{Deserialize, Serialize};
use url::Url;

/// The fixed allow-list of query parameters extracted from the page URL.
/// Everything else in the query string is ignored.
pub const TRACKED_PARAMS: [&str; 8] = [
    "utm_source",
    "utm_medium",
    "utm_campaign",
    "utm_term",
    "utm_content",
    "gclid",
    "fbclid",
    "ref",
];

/// UTM / click-id attribution bag.
///
/// Every key is always present in the serialized event — `null` rather than
/// omitted — so the server-facing schema is stable regardless of which
/// parameters the landing URL actually carried.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UrlParams {
    pub utm_source: Option<String>,
    pub utm_medium: Option<String>,
    pub utm_campaign: Option<String>,
    pub utm_term: Option<String>,
    pub utm_content: Option<String>,
    pub gclid: Option<String>,
    pub fbclid: Option<String>,
    #[serde(rename = "ref")]
    pub ref_param: Option<String>,
}

impl UrlParams {
    /// Extract the allow-listed parameters from a parsed URL.
    ///
    /// Values are percent-decoded by the `url` crate. The first occurrence
    /// of a repeated parameter wins.
    pub fn from_url(url: &Url) -> Self {
        let mut params = Self::default();
        for (key, value) in url.query_pairs() {
            let slot = match key.as_ref() {
                "utm_source" => &mut params.utm_source,
                "utm_medium" => &mut params.utm_medium,
                "utm_campaign" => &mut params.utm_campaign,
                "utm_term" => &mut params.utm_term,
                "utm_content" => &mut params.utm_content,
                "gclid" => &mut params.gclid,
                "fbclid" => &mut params.fbclid,
                "ref" => &mut params.ref_param,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }
        params
    }

    /// Parse `raw` as a URL and extract parameters; an unparseable URL
    /// yields the all-`None` bag rather than an error.
    pub fn from_raw_url(raw: &str) -> Self {
        match Url::parse(raw) {
            Ok(url) => Self::from_url(&url),
            Err(_) => Self::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn absent_params_serialize_as_null_keys() {
        let params = UrlParams::from_raw_url("https://example.com/pricing");
        let value = serde_json::to_value(&params).expect("serialize");
        for key in TRACKED_PARAMS {
            assert_eq!(value[key], Value::Null, "{key} should be a null key");
        }
    }

    #[test]
    fn present_params_are_decoded() {
        let params = UrlParams::from_raw_url(
            "https://example.com/?utm_source=news%20letter&utm_campaign=spring&gclid=abc123",
        );
        assert_eq!(params.utm_source.as_deref(), Some("news letter"));
        assert_eq!(params.utm_campaign.as_deref(), Some("spring"));
        assert_eq!(params.gclid.as_deref(), Some("abc123"));
        assert!(params.utm_medium.is_none());
    }

    #[test]
    fn ref_is_extracted_despite_keyword_name() {
        let params = UrlParams::from_raw_url("https://example.com/?ref=producthunt");
        assert_eq!(params.ref_param.as_deref(), Some("producthunt"));
        let value = serde_json::to_value(&params).expect("serialize");
        assert_eq!(value["ref"], "producthunt");
    }

    #[test]
    fn unlisted_params_are_ignored() {
        let params = UrlParams::from_raw_url("https://example.com/?session_token=secret&utm_term=rust");
        assert_eq!(params.utm_term.as_deref(), Some("rust"));
        let value = serde_json::to_value(&params).expect("serialize");
        assert!(value.get("session_token").is_none());
    }

    #[test]
    fn first_occurrence_of_repeated_param_wins() {
        let params = UrlParams::from_raw_url("https://example.com/?utm_source=a&utm_source=b");
        assert_eq!(params.utm_source.as_deref(), Some("a"));
    }

    #[test]
    fn unparseable_url_yields_empty_bag() {
        let params = UrlParams::from_raw_url("/relative/path?utm_source=x");
        assert_eq!(params, UrlParams::default());
    }
}
