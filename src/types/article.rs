use serde::{Deserialize, Serialize};

use super::{deserialize_text, null_as_default};

/// Top-level wrapper returned by the article search endpoint.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Envelope {
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(deserialize_with = "null_as_default")]
    pub copyright: String,
    #[serde(deserialize_with = "null_as_default")]
    pub response: SearchResponse,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SearchResponse {
    #[serde(deserialize_with = "null_as_default")]
    pub docs: Vec<RawArticle>,
    #[serde(deserialize_with = "null_as_default")]
    pub meta: Meta,
}

/// Pagination metadata. `hits` is the total across all pages.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Meta {
    pub hits: u64,
    pub offset: u64,
    pub time: u64,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct RawArticle {
    #[serde(rename = "abstract", deserialize_with = "null_as_default")]
    pub abstract_text: String,
    #[serde(deserialize_with = "null_as_default")]
    pub web_url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub snippet: String,
    #[serde(deserialize_with = "null_as_default")]
    pub lead_paragraph: String,
    #[serde(deserialize_with = "null_as_default")]
    pub source: String,
    #[serde(deserialize_with = "null_as_default")]
    pub multimedia: Vec<Multimedia>,
    #[serde(deserialize_with = "null_as_default")]
    pub headline: Headline,
    #[serde(deserialize_with = "null_as_default")]
    pub keywords: Vec<Keyword>,
    #[serde(deserialize_with = "null_as_default")]
    pub pub_date: String,
    #[serde(deserialize_with = "null_as_default")]
    pub document_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub news_desk: String,
    #[serde(deserialize_with = "null_as_default")]
    pub section_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub byline: Byline,
    #[serde(deserialize_with = "null_as_default")]
    pub type_of_material: String,
    #[serde(rename = "_id", deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub word_count: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub uri: String,
    #[serde(deserialize_with = "deserialize_text")]
    pub print_section: Option<String>,
    #[serde(deserialize_with = "deserialize_text")]
    pub print_page: Option<String>,
    #[serde(deserialize_with = "deserialize_text")]
    pub subsection_name: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct Multimedia {
    #[serde(deserialize_with = "null_as_default")]
    pub rank: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub subtype: String,
    #[serde(deserialize_with = "deserialize_text")]
    pub caption: Option<String>,
    #[serde(deserialize_with = "deserialize_text")]
    pub credit: Option<String>,
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub media_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub height: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub width: u32,
    /// Sent alongside `subtype` on some items, usually with the same value.
    #[serde(rename = "subType", deserialize_with = "deserialize_text")]
    pub sub_type: Option<String>,
    #[serde(deserialize_with = "deserialize_text")]
    pub crop_name: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct Headline {
    #[serde(deserialize_with = "null_as_default")]
    pub main: String,
    #[serde(deserialize_with = "deserialize_text")]
    pub kicker: Option<String>,
    #[serde(deserialize_with = "deserialize_text")]
    pub content_kicker: Option<String>,
    #[serde(deserialize_with = "deserialize_text")]
    pub print_headline: Option<String>,
    #[serde(deserialize_with = "deserialize_text")]
    pub name: Option<String>,
    #[serde(deserialize_with = "deserialize_text")]
    pub seo: Option<String>,
    #[serde(deserialize_with = "deserialize_text")]
    pub sub: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct Byline {
    #[serde(deserialize_with = "null_as_default")]
    pub original: String,
    #[serde(deserialize_with = "null_as_default")]
    pub person: Vec<Person>,
    #[serde(deserialize_with = "deserialize_text")]
    pub organization: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct Person {
    #[serde(deserialize_with = "null_as_default")]
    pub firstname: String,
    #[serde(deserialize_with = "deserialize_text")]
    pub middlename: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub lastname: String,
    #[serde(deserialize_with = "deserialize_text")]
    pub qualifier: Option<String>,
    #[serde(deserialize_with = "deserialize_text")]
    pub title: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub role: String,
    #[serde(deserialize_with = "deserialize_text")]
    pub organization: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub rank: i64,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Keyword {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub value: String,
    #[serde(deserialize_with = "null_as_default")]
    pub rank: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub major: String,
}

/// The reduced article shape written to the store and the output file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedArticle {
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub url: String,
    pub title: String,
    pub byline: String,
    pub published: String,
    pub keywords: Vec<Keyword>,
}

impl From<RawArticle> for PersistedArticle {
    fn from(article: RawArticle) -> Self {
        Self {
            abstract_text: article.abstract_text,
            url: article.web_url,
            title: article.headline.main,
            byline: article.byline.original,
            published: article.pub_date,
            keywords: article.keywords,
        }
    }
}
