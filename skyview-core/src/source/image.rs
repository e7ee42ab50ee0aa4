use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use serde::Deserialize;
use serde_json::Value;
use url::Url;

use crate::{error::ImageUnavailable, http::HttpFetcher, model::ImageResult};

use super::{BackgroundSource, ImageStrategy};

pub const DEFAULT_PLACEHOLDER_URL: &str =
    "https://images.unsplash.com/photo-1544413660-299165566b1d?q=80&w=2670&auto=format&fit=crop";

const SEARCH: &str = "search";
const GENERIC_KEYWORDS: &str = "skyline landmarks cityscape downtown";

const WELL_KNOWN_PLACES: &[(&str, &str)] = &[
    ("London", "landmarks Big Ben Tower Bridge"),
    ("Paris", "Eiffel Tower landmarks"),
    ("New York", "Manhattan skyline Times Square"),
    ("Tokyo", "skyline Shibuya"),
    ("Dubai", "skyline Burj Khalifa"),
    ("Sydney", "Opera House Harbour Bridge"),
    ("Rome", "Colosseum landmarks"),
    ("Venice", "canals San Marco"),
    ("Amsterdam", "canals architecture"),
    ("Hong Kong", "Victoria Harbour skyline"),
    ("Singapore", "Marina Bay Sands skyline"),
    ("Barcelona", "Sagrada Familia architecture"),
    ("San Francisco", "Golden Gate Bridge skyline"),
    ("Rio de Janeiro", "Christ the Redeemer Copacabana"),
    ("Las Vegas", "Strip night lights"),
    ("Chicago", "skyline architecture"),
    ("Toronto", "CN Tower skyline"),
    ("Seattle", "Space Needle skyline"),
    ("Bangkok", "temples skyline"),
    ("Istanbul", "Blue Mosque Hagia Sophia"),
];

/// Place name -> iconic landmark search keywords.
#[derive(Debug, Clone)]
pub struct LandmarkTable {
    entries: HashMap<String, String>,
    fallback: String,
}

impl Default for LandmarkTable {
    fn default() -> Self {
        let entries = WELL_KNOWN_PLACES
            .iter()
            .map(|(place, keywords)| (place.to_lowercase(), (*keywords).to_string()))
            .collect();

        Self {
            entries,
            fallback: GENERIC_KEYWORDS.to_string(),
        }
    }
}

impl LandmarkTable {
    pub fn with_entry(mut self, place: &str, keywords: impl Into<String>) -> Self {
        self.entries
            .insert(place.trim().to_lowercase(), keywords.into());
        self
    }

    /// Case-insensitive lookup, generic city keywords otherwise.
    pub fn keywords(&self, place: &str) -> &str {
        self.entries
            .get(&place.trim().to_lowercase())
            .map(String::as_str)
            .unwrap_or(&self.fallback)
    }
}

#[derive(Debug, Clone)]
pub struct ImageSettings {
    /// e.g. `https://api.unsplash.com`
    pub base_url: String,
    pub access_key: Option<String>,
    pub placeholder_url: String,
    /// Page size for the main queries.
    pub per_page: u8,
    pub strategy: ImageStrategy,
    pub landmarks: LandmarkTable,
}

/// Resolves a background photo through an ordered chain of searches.
/// Any failure along the chain ends in the placeholder URL.
#[derive(Debug, Clone)]
pub struct ImageResolver {
    settings: ImageSettings,
    http: HttpFetcher,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pick {
    /// Photo mentioning the condition, else the first one.
    PreferCondition,
    /// Photo mentioning the place or the condition, else nothing.
    RelevantOnly,
    First,
}

#[derive(Debug, Clone, PartialEq)]
struct SearchStep {
    query: String,
    per_page: u8,
    pick: Pick,
}

impl ImageResolver {
    pub fn new(settings: ImageSettings, http: HttpFetcher) -> Self {
        Self { settings, http }
    }

    pub async fn resolve_image(&self, place: &str, condition: &str) -> ImageResult {
        match self.try_resolve(place, condition).await {
            Ok(url) => {
                tracing::info!(place, %url, "background image resolved");
                ImageResult { url }
            }
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    place,
                    "background image unavailable, using placeholder"
                );
                ImageResult {
                    url: self.placeholder_url().to_string(),
                }
            }
        }
    }

    fn placeholder_url(&self) -> &str {
        let configured = self.settings.placeholder_url.trim();
        if configured.is_empty() {
            DEFAULT_PLACEHOLDER_URL
        } else {
            configured
        }
    }

    async fn try_resolve(
        &self,
        place: &str,
        condition: &str,
    ) -> Result<String, ImageUnavailable> {
        let access_key = self
            .settings
            .access_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or(ImageUnavailable::MissingCredential)?;

        for step in self.plan(place, condition) {
            let photos = self.search(access_key, &step).await?;

            if let Some(photo) = choose(&photos, step.pick, place, condition) {
                tracing::debug!(query = %step.query, "photo selected");
                return Ok(normalize_photo_url(&photo.urls.regular)?);
            }

            tracing::debug!(
                query = %step.query,
                results = photos.len(),
                "no usable photo, falling through"
            );
        }

        Err(ImageUnavailable::NoResults)
    }

    fn plan(&self, place: &str, condition: &str) -> Vec<SearchStep> {
        let place = place.trim();
        let per_page = self.settings.per_page.max(1);
        let landmark_query = format!("{place} {}", self.settings.landmarks.keywords(place))
            .trim()
            .to_string();

        match self.settings.strategy {
            ImageStrategy::Landmark => vec![
                SearchStep {
                    query: landmark_query,
                    per_page,
                    pick: Pick::PreferCondition,
                },
                SearchStep {
                    query: format!("{place} city landmark"),
                    per_page: 1,
                    pick: Pick::First,
                },
            ],
            ImageStrategy::Tiered => {
                let mut steps: Vec<SearchStep> = [
                    landmark_query,
                    format!("{place} capital skyline"),
                    format!("{place} scenic landscape"),
                    format!("{place} cityscape architecture"),
                ]
                .into_iter()
                .map(|query| SearchStep {
                    query,
                    per_page,
                    pick: Pick::RelevantOnly,
                })
                .collect();

                steps.push(SearchStep {
                    query: format!("{condition} weather sky").trim().to_string(),
                    per_page,
                    pick: Pick::First,
                });
                steps
            }
        }
    }

    async fn search(
        &self,
        access_key: &str,
        step: &SearchStep,
    ) -> Result<Vec<Photo>, ImageUnavailable> {
        let url = format!(
            "{}/search/photos",
            self.settings.base_url.trim_end_matches('/')
        );
        let request = self
            .http
            .get(&url)
            .header(AUTHORIZATION, format!("Client-ID {access_key}"))
            .query(&[
                ("query", step.query.clone()),
                ("orientation", "landscape".to_string()),
                ("per_page", step.per_page.to_string()),
                ("content_filter", "high".to_string()),
            ]);

        let response: SearchResponse = self.http.send_json(SEARCH, request).await?;
        Ok(photos_from_results(&response.results))
    }
}

#[async_trait]
impl BackgroundSource for ImageResolver {
    async fn resolve_image(&self, place: &str, condition: &str) -> ImageResult {
        ImageResolver::resolve_image(self, place, condition).await
    }
}

/// One malformed result must not hide the usable ones next to it.
fn photos_from_results(results: &[Value]) -> Vec<Photo> {
    results
        .iter()
        .filter_map(|entry| match Photo::deserialize(entry) {
            Ok(photo) => Some(photo),
            Err(err) => {
                tracing::debug!(error = %err, "skipping malformed search result");
                None
            }
        })
        .collect()
}

fn choose<'a>(
    photos: &'a [Photo],
    pick: Pick,
    place: &str,
    condition: &str,
) -> Option<&'a Photo> {
    match pick {
        Pick::First => photos.first(),
        Pick::PreferCondition => photos
            .iter()
            .find(|photo| photo.mentions(condition))
            .or_else(|| photos.first()),
        Pick::RelevantOnly => photos
            .iter()
            .find(|photo| photo.mentions(place) || photo.mentions(condition)),
    }
}

/// Pin quality, width and fit so every background renders the same size.
fn normalize_photo_url(raw: &str) -> Result<String, url::ParseError> {
    let mut url = Url::parse(raw)?;

    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| !matches!(&**key, "q" | "w" | "fit"))
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    url.query_pairs_mut()
        .clear()
        .extend_pairs(kept)
        .append_pair("q", "85")
        .append_pair("w", "1920")
        .append_pair("fit", "crop");

    Ok(url.into())
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct PhotoUrls {
    regular: String,
}

#[derive(Debug, Deserialize)]
struct PhotoTag {
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Photo {
    urls: PhotoUrls,
    description: Option<String>,
    alt_description: Option<String>,
    #[serde(default)]
    tags: Vec<PhotoTag>,
}

impl Photo {
    fn mentions(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return false;
        }

        let contains = |text: &Option<String>| {
            text.as_deref()
                .is_some_and(|text| text.to_lowercase().contains(&term))
        };

        contains(&self.description)
            || contains(&self.alt_description)
            || self.tags.iter().any(|tag| contains(&tag.title))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn resolver(strategy: ImageStrategy) -> ImageResolver {
        ImageResolver::new(
            ImageSettings {
                base_url: "http://localhost".into(),
                access_key: Some("KEY".into()),
                placeholder_url: String::new(),
                per_page: 5,
                strategy,
                landmarks: LandmarkTable::default(),
            },
            HttpFetcher::new().unwrap(),
        )
    }

    fn photo(url: &str, description: Option<&str>, alt: Option<&str>, tags: &[&str]) -> Photo {
        serde_json::from_value(json!({
            "urls": { "regular": url },
            "description": description,
            "alt_description": alt,
            "tags": tags.iter().map(|t| json!({ "title": t })).collect::<Vec<_>>(),
        }))
        .unwrap()
    }

    #[test]
    fn landmark_lookup_is_case_insensitive_with_generic_default() {
        let table = LandmarkTable::default();

        assert_eq!(table.keywords("Paris"), "Eiffel Tower landmarks");
        assert_eq!(table.keywords("new york"), "Manhattan skyline Times Square");
        assert_eq!(table.keywords("Reykjavik"), GENERIC_KEYWORDS);
    }

    #[test]
    fn landmark_table_accepts_extra_entries() {
        let table = LandmarkTable::default().with_entry("Oslo", "Opera House fjord");
        assert_eq!(table.keywords("OSLO"), "Opera House fjord");
    }

    #[test]
    fn landmark_plan_is_primary_then_city_landmark() {
        let steps = resolver(ImageStrategy::Landmark).plan("Paris", "Rain");
        let queries: Vec<&str> = steps.iter().map(|s| s.query.as_str()).collect();

        assert_eq!(
            queries,
            ["Paris Eiffel Tower landmarks", "Paris city landmark"]
        );
        assert_eq!(steps[0].per_page, 5);
        assert_eq!(steps[1].per_page, 1);
    }

    #[test]
    fn tiered_plan_ends_with_condition_query() {
        let steps = resolver(ImageStrategy::Tiered).plan("Lima", "Clear");
        let queries: Vec<&str> = steps.iter().map(|s| s.query.as_str()).collect();

        assert_eq!(
            queries,
            [
                "Lima skyline landmarks cityscape downtown",
                "Lima capital skyline",
                "Lima scenic landscape",
                "Lima cityscape architecture",
                "Clear weather sky",
            ]
        );
        assert!(steps[..4].iter().all(|s| s.pick == Pick::RelevantOnly));
        assert_eq!(steps[4].pick, Pick::First);
    }

    #[test]
    fn prefer_condition_picks_matching_description() {
        let photos = vec![
            photo("https://img/1", Some("sunny square"), None, &[]),
            photo("https://img/2", None, Some("London in the RAIN"), &[]),
        ];

        let chosen = choose(&photos, Pick::PreferCondition, "London", "rain").unwrap();
        assert_eq!(chosen.urls.regular, "https://img/2");
    }

    #[test]
    fn prefer_condition_falls_back_to_first() {
        let photos = vec![
            photo("https://img/1", None, None, &[]),
            photo("https://img/2", Some("night"), None, &[]),
        ];

        let chosen = choose(&photos, Pick::PreferCondition, "London", "Snow").unwrap();
        assert_eq!(chosen.urls.regular, "https://img/1");
    }

    #[test]
    fn relevant_only_uses_tags_and_rejects_unrelated() {
        let unrelated = vec![photo("https://img/1", Some("a cat"), None, &["animal"])];
        let chosen = choose(&unrelated, Pick::RelevantOnly, "Lima", "Clear");
        assert!(chosen.is_none());

        let tagged = vec![
            photo("https://img/1", Some("a cat"), None, &["animal"]),
            photo("https://img/2", None, None, &["peru", "lima"]),
        ];
        let chosen = choose(&tagged, Pick::RelevantOnly, "Lima", "Clear").unwrap();
        assert_eq!(chosen.urls.regular, "https://img/2");
    }

    #[test]
    fn malformed_results_are_skipped() {
        let results = vec![
            json!({ "id": "broken", "urls": null }),
            json!({ "urls": { "regular": "https://img/ok" }, "description": "Big Ben" }),
            json!("not an object"),
        ];

        let photos = photos_from_results(&results);
        assert_eq!(photos.len(), 1);
        assert_eq!(photos[0].urls.regular, "https://img/ok");
    }

    #[test]
    fn empty_term_never_matches() {
        let p = photo("https://img/1", Some("anything"), None, &[]);
        assert!(!p.mentions("  "));
    }

    #[test]
    fn photo_url_quality_width_and_fit_are_pinned() {
        let url = normalize_photo_url(
            "https://images.unsplash.com/photo-1?ixid=abc&q=80&w=1080&fit=max",
        )
        .unwrap();

        assert_eq!(
            url,
            "https://images.unsplash.com/photo-1?ixid=abc&q=85&w=1920&fit=crop"
        );
    }

    #[test]
    fn photo_url_without_query_gains_parameters() {
        let url = normalize_photo_url("https://images.unsplash.com/photo-2").unwrap();
        assert_eq!(
            url,
            "https://images.unsplash.com/photo-2?q=85&w=1920&fit=crop"
        );
    }

    #[test]
    fn invalid_photo_url_is_an_error() {
        assert!(normalize_photo_url("not a url").is_err());
    }

    #[test]
    fn empty_placeholder_setting_uses_builtin() {
        assert_eq!(
            resolver(ImageStrategy::Landmark).placeholder_url(),
            DEFAULT_PLACEHOLDER_URL
        );
    }

    #[tokio::test]
    async fn missing_access_key_resolves_to_placeholder() {
        let mut r = resolver(ImageStrategy::Landmark);
        r.settings.access_key = None;

        let image = r.resolve_image("Paris", "Clear").await;
        assert_eq!(image.url, DEFAULT_PLACEHOLDER_URL);
    }
}
