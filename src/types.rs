//! Wire envelopes returned by the Grokipedia API and the normalized values
//! handed to callers.
//!
//! Envelopes decode leniently: every field may be missing or `null`, and
//! unknown fields are ignored. `normalize` turns them into the public types,
//! whose list fields are plain `Vec`s and therefore always serialize as `[]`.

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub snippet: String,
    #[serde(default)]
    pub relevance_score: f64,
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, Default, PartialEq, Eq)]
pub struct Citation {
    pub id: String,
    pub title: String,
    pub url: String,
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, Default, PartialEq, Eq)]
pub struct Image {
    pub url: String,
    pub caption: String,
    pub description: String,
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub created_at: String,
    pub updated_at: String,
    pub views: u64,
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub title: String,
    pub content: String,
    pub citations: Vec<Citation>,
    pub images: Vec<Image>,
    pub metadata: Metadata,
    pub slug: String,
}

/// Structured payload of the `search_grokipedia` tool.
#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, Default, PartialEq)]
pub struct SearchOutput {
    pub results: Vec<SearchResult>,
}

/// Structured payload of the `get_grokipedia_page` tool.
#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, Default, PartialEq)]
pub struct PageOutput {
    pub title: String,
    pub content: String,
    pub citations: Vec<Citation>,
}

impl From<Page> for PageOutput {
    fn from(page: Page) -> Self {
        PageOutput {
            title: page.title,
            content: page.content,
            citations: page.citations,
        }
    }
}

/// First `limit` slugs in server order.
pub fn slugs(results: &[SearchResult], limit: usize) -> Vec<String> {
    results
        .iter()
        .take(limit)
        .map(|r| r.slug.clone())
        .collect()
}

// =============================================================================
// Raw envelopes
// =============================================================================

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// `{results, total_count}` from `/api/full-text-search`.
#[derive(Deserialize, Debug, Default)]
pub struct SearchEnvelope {
    #[serde(default, deserialize_with = "null_as_default")]
    pub results: Vec<RawSearchResult>,
    #[serde(default)]
    pub total_count: Option<u64>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct RawSearchResult {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub snippet: Option<String>,
    #[serde(default)]
    pub relevance_score: Option<f64>,
}

impl SearchEnvelope {
    pub fn normalize(self) -> Vec<SearchResult> {
        self.results
            .into_iter()
            .map(RawSearchResult::normalize)
            .collect()
    }
}

impl RawSearchResult {
    fn normalize(self) -> SearchResult {
        SearchResult {
            title: self.title.unwrap_or_default(),
            slug: self.slug.unwrap_or_default(),
            snippet: self.snippet.unwrap_or_default(),
            relevance_score: self.relevance_score.unwrap_or(0.0),
        }
    }
}

/// `{page, found}` from `/api/page`.
#[derive(Deserialize, Debug, Default)]
pub struct PageEnvelope {
    #[serde(default)]
    pub page: Option<RawPage>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub found: bool,
}

#[derive(Deserialize, Debug, Default)]
pub struct RawPage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(default)]
    pub citations: Option<Vec<RawCitation>>,
    #[serde(default)]
    pub images: Option<Vec<RawImage>>,
    #[serde(default)]
    pub metadata: Option<RawMetadata>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub slug: String,
}

#[derive(Deserialize, Debug, Default)]
pub struct RawCitation {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
}

#[derive(Deserialize, Debug, Default)]
pub struct RawImage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub caption: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct RawMetadata {
    #[serde(default, deserialize_with = "null_as_default")]
    pub created_at: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub updated_at: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub views: u64,
}

impl RawPage {
    pub fn normalize(self) -> Page {
        let citations = self
            .citations
            .unwrap_or_default()
            .into_iter()
            .map(|c| Citation {
                id: c.id,
                title: c.title,
                url: c.url,
            })
            .collect();
        let images = self
            .images
            .unwrap_or_default()
            .into_iter()
            .map(|i| Image {
                url: i.url,
                caption: i.caption,
                description: i.description,
            })
            .collect();
        let metadata = self
            .metadata
            .map(|m| Metadata {
                created_at: m.created_at,
                updated_at: m.updated_at,
                views: m.views,
            })
            .unwrap_or_default();

        Page {
            title: self.title,
            content: self.content,
            citations,
            images,
            metadata,
            slug: self.slug,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_page_serializes_empty_citations() {
        let json = serde_json::to_string(&Page::default()).unwrap();
        assert!(json.contains(r#""citations":[]"#));
        assert!(json.contains(r#""images":[]"#));
    }

    #[test]
    fn test_zero_outputs_serialize_empty_lists() {
        let json = serde_json::to_string(&SearchOutput::default()).unwrap();
        assert_eq!(json, r#"{"results":[]}"#);

        let json = serde_json::to_string(&PageOutput::default()).unwrap();
        assert_eq!(json, r#"{"title":"","content":"","citations":[]}"#);
    }

    #[test]
    fn test_search_envelope_preserves_order_and_defaults_score() {
        let body = r#"{"results":[
            {"title":"Grok","slug":"Grok","snippet":"AI model","relevanceScore":0.9,"viewCount":"1200"},
            {"title":"Grok 2","slug":"Grok_2","viewCount":37}
        ],"total_count":2}"#;
        let envelope: SearchEnvelope = serde_json::from_str(body).unwrap();
        assert_eq!(envelope.total_count, Some(2));

        let results = envelope.normalize();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].slug, "Grok");
        assert_eq!(results[0].snippet, "AI model");
        assert_eq!(results[0].relevance_score, 0.9);
        assert_eq!(results[1].slug, "Grok_2");
        assert_eq!(results[1].snippet, "");
        assert_eq!(results[1].relevance_score, 0.0);
    }

    #[test]
    fn test_search_envelope_ignores_extra_result_fields() {
        let body = r#"{"results":[{"title":"Grok","slug":"Grok","viewCount":{"total":5},"rank":1}]}"#;
        let results = serde_json::from_str::<SearchEnvelope>(body)
            .unwrap()
            .normalize();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].slug, "Grok");
    }

    #[test]
    fn test_search_envelope_null_or_missing_results() {
        for body in [r#"{"results":null}"#, r#"{}"#, r#"{"total_count":0}"#] {
            let envelope: SearchEnvelope = serde_json::from_str(body).unwrap();
            assert!(envelope.normalize().is_empty(), "body {body}");
        }
    }

    #[test]
    fn test_search_envelope_rejects_non_object() {
        assert!(serde_json::from_str::<SearchEnvelope>("[1,2,3]").is_err());
        assert!(serde_json::from_str::<SearchEnvelope>(r#"{"results":"nope"}"#).is_err());
    }

    #[test]
    fn test_page_envelope_null_citations_become_empty() {
        let body = r#"{"page":{"title":"Grok","content":"Body","citations":null,"images":null,"metadata":null,"slug":"Grok"},"found":true}"#;
        let envelope: PageEnvelope = serde_json::from_str(body).unwrap();
        assert!(envelope.found);

        let page = envelope.page.unwrap().normalize();
        assert_eq!(page.title, "Grok");
        assert!(page.citations.is_empty());
        assert!(page.images.is_empty());
        assert_eq!(page.metadata, Metadata::default());

        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["citations"], serde_json::json!([]));
    }

    #[test]
    fn test_page_envelope_full_shape() {
        let body = r#"{
            "page": {
                "title": "Grok",
                "content": "Grok is a chatbot.",
                "citations": [
                    {"id": "2", "title": "Second", "url": "https://b.example"},
                    {"id": "1", "title": "First", "url": "https://a.example"}
                ],
                "images": [{"url": "https://img.example/g.png", "caption": "Logo", "description": "The logo"}],
                "metadata": {"createdAt": "2025-10-27", "updatedAt": "2025-10-28", "views": 42},
                "slug": "Grok"
            },
            "found": true
        }"#;
        let page = serde_json::from_str::<PageEnvelope>(body)
            .unwrap()
            .page
            .unwrap()
            .normalize();

        // server order is kept, not sorted by id
        assert_eq!(page.citations[0].id, "2");
        assert_eq!(page.citations[1].id, "1");
        assert_eq!(page.images[0].caption, "Logo");
        assert_eq!(page.metadata.created_at, "2025-10-27");
        assert_eq!(page.metadata.views, 42);
    }

    #[test]
    fn test_page_envelope_missing_found_is_false() {
        let envelope: PageEnvelope = serde_json::from_str(r#"{"page":null}"#).unwrap();
        assert!(!envelope.found);
        assert!(envelope.page.is_none());
    }

    #[test]
    fn test_page_output_from_page() {
        let page = Page {
            title: "Grok".into(),
            content: "Body".into(),
            citations: vec![Citation {
                id: "1".into(),
                title: "Ref".into(),
                url: "https://ref.example".into(),
            }],
            ..Page::default()
        };
        let output = PageOutput::from(page);
        assert_eq!(output.title, "Grok");
        assert_eq!(output.citations.len(), 1);
    }

    #[test]
    fn test_slugs_truncates_in_order() {
        let results: Vec<SearchResult> = (1..=7)
            .map(|i| SearchResult {
                title: format!("T{i}"),
                slug: format!("S{i}"),
                ..SearchResult::default()
            })
            .collect();
        assert_eq!(slugs(&results, 5), vec!["S1", "S2", "S3", "S4", "S5"]);
        assert_eq!(slugs(&results, 10).len(), 7);
        assert!(slugs(&[], 5).is_empty());
    }
}
