// Best-effort parsing of agent replies
//
// Agents answer in free-form text that usually, but not always, contains a
// JSON object. Parsing never fails outward: the caller supplies a fallback,
// and the result records whether the fallback was used.

use serde::de::DeserializeOwned;
use serde_json::Value;

/// Outcome of parsing an agent reply
#[derive(Debug, Clone, PartialEq)]
pub enum Parsed<T> {
    /// The reply contained a value of the expected shape
    Parsed(T),
    /// The reply was unusable and the caller's fallback was substituted
    Defaulted(T),
}

impl<T> Parsed<T> {
    pub fn is_defaulted(&self) -> bool {
        matches!(self, Parsed::Defaulted(_))
    }

    pub fn value(&self) -> &T {
        match self {
            Parsed::Parsed(v) | Parsed::Defaulted(v) => v,
        }
    }

    pub fn into_inner(self) -> T {
        match self {
            Parsed::Parsed(v) | Parsed::Defaulted(v) => v,
        }
    }
}

/// Parses an agent reply into `T`, substituting `fallback` on failure
///
/// # Example
/// ```
/// use pulse_api::agents::parser::parse_agent_json;
/// use serde::Deserialize;
///
/// #[derive(Debug, Deserialize, PartialEq)]
/// struct Ack { status: String }
///
/// let raw = "Sure! ```json\n{\"status\": \"ok\"}\n```";
/// let parsed = parse_agent_json(raw, Ack { status: "queued".into() });
/// assert!(!parsed.is_defaulted());
/// assert_eq!(parsed.into_inner().status, "ok");
/// ```
pub fn parse_agent_json<T: DeserializeOwned>(raw: &str, fallback: T) -> Parsed<T> {
    match try_parse::<T>(raw) {
        Some(value) => Parsed::Parsed(value),
        None => {
            tracing::debug!(
                target_type = std::any::type_name::<T>(),
                "Agent reply did not match expected shape, using fallback"
            );
            Parsed::Defaulted(fallback)
        }
    }
}

const ENVELOPE_KEYS: [&str; 3] = ["result", "data", "response"];

fn try_parse<T: DeserializeOwned>(raw: &str) -> Option<T> {
    let candidate = extract_json_object(raw).unwrap_or_else(|| raw.trim().to_string());
    let value: Value = serde_json::from_str(&candidate).ok()?;

    if !value.is_object() {
        return None;
    }

    // Some agents wrap their payload in an envelope
    let unwrap_envelope = || {
        ENVELOPE_KEYS
            .iter()
            .filter_map(|key| value.get(*key))
            .filter(|inner| inner.is_object())
            .find_map(|inner| serde_json::from_value::<T>(inner.clone()).ok())
    };

    // A lone envelope key is unwrapped first; shapes whose fields are all
    // optional would otherwise accept the wrapper itself
    let lone_envelope = value
        .as_object()
        .is_some_and(|map| map.len() == 1 && map.keys().all(|k| ENVELOPE_KEYS.contains(&k.as_str())));
    if lone_envelope {
        if let Some(parsed) = unwrap_envelope() {
            return Some(parsed);
        }
    }

    if let Ok(parsed) = serde_json::from_value::<T>(value.clone()) {
        return Some(parsed);
    }

    unwrap_envelope()
}

/// Extracts the first JSON object from text that may contain markdown fences
pub fn extract_json_object(text: &str) -> Option<String> {
    if let Some(start) = text.find("```json") {
        let after_fence = &text[start + 7..];
        if let Some(end) = after_fence.find("```") {
            return Some(after_fence[..end].trim().to_string());
        }
    }
    if let Some(start) = text.find("```") {
        let after_fence = &text[start + 3..];
        // Skip optional language identifier on first line
        let after_lang = match after_fence.find('\n') {
            Some(nl) => &after_fence[nl + 1..],
            None => after_fence,
        };
        if let Some(end) = after_lang.find("```") {
            let content = after_lang[..end].trim();
            if content.starts_with('{') {
                return Some(content.to_string());
            }
        }
    }
    if let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) {
        if start < end {
            return Some(text[start..=end].to_string());
        }
    }
    None
}
