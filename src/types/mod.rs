pub mod article;

pub use article::{
    Byline, Envelope, Headline, Keyword, Meta, Multimedia, PersistedArticle, Person, RawArticle,
    SearchResponse,
};

use serde::{Deserialize, Deserializer};

/// Treats an explicit `null` the same as a missing field.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accepts a string, number, bool, or nested value and keeps it as text.
///
/// The search API is inconsistent about the type of several descriptive
/// fields (`caption`, `credit`, headline variants), so these are decoded
/// leniently instead of failing the whole response.
pub fn deserialize_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum TextFormat {
        String(String),
        Integer(i64),
        Float(f64),
        Bool(bool),
        Other(serde_json::Value),
    }

    Ok(match Option::<TextFormat>::deserialize(deserializer)? {
        None => None,
        Some(TextFormat::String(s)) => Some(s),
        Some(TextFormat::Integer(i)) => Some(i.to_string()),
        Some(TextFormat::Float(f)) => Some(f.to_string()),
        Some(TextFormat::Bool(b)) => Some(b.to_string()),
        Some(TextFormat::Other(serde_json::Value::Null)) => None,
        Some(TextFormat::Other(v)) => Some(v.to_string()),
    })
}
