//! Fuzzy search over a catalog snapshot.
//!
//! A query runs once as typed and, when remapping it through the configured
//! keyboard layout pair changes it, once more as remapped. The two result sets
//! are merged by [`RecordKey`] keeping the better score, sorted, and closed
//! with a single "search the web" hit.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

use crate::catalog::CatalogSnapshot;
use crate::domain::{CatalogRecord, RecordKey};
use crate::search::{KeyboardRemapper, PreparedRecord};

/// Default per-variant result limit.
pub const DEFAULT_RESULT_LIMIT: usize = 50;

/// Default web search prefix for the fallback hit.
pub const DEFAULT_WEB_SEARCH_URL: &str = "https://www.google.com/search?q=";

/// Text appended to the query before it is sent to the web search.
pub const DEFAULT_WEB_SEARCH_SUFFIX: &str = " คอร์ด";

/// Score of the fallback hit when it stays below every match.
///
/// Skim scores can be negative for long gaps, so a search whose lowest match
/// scores at or below this gives the fallback one less than that match.
pub const FALLBACK_SCORE: i64 = 0;

static NEXT_LIST_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of one computed result list.
///
/// Two lists never share an id, even when their hits are equal. Selection
/// resets whenever it observes a new id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListId(u64);

impl ListId {
    fn next() -> Self {
        Self(NEXT_LIST_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// What a hit points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitKind {
    /// A record from the catalog.
    Match,
    /// The synthetic "search the web for this text" entry.
    WebFallback,
}

/// One ranked result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub record: CatalogRecord,
    pub score: i64,
    pub kind: HitKind,
}

impl SearchHit {
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.kind == HitKind::WebFallback
    }
}

/// Ordered, deduplicated search results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedResultList {
    id: ListId,
    hits: Vec<SearchHit>,
}

impl Default for RankedResultList {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl RankedResultList {
    fn new(hits: Vec<SearchHit>) -> Self {
        Self {
            id: ListId::next(),
            hits,
        }
    }

    #[must_use]
    pub const fn id(&self) -> ListId {
        self.id
    }

    #[must_use]
    pub fn hits(&self) -> &[SearchHit] {
        &self.hits
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&SearchHit> {
        self.hits.get(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.hits.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    /// Number of hits that are real catalog records.
    #[must_use]
    pub fn match_count(&self) -> usize {
        self.hits.iter().filter(|h| !h.is_fallback()).count()
    }
}

/// Builds the URL of the fallback web search.
///
/// A template containing `{query}` has it replaced; any other template is
/// treated as a prefix and the encoded query is appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebSearch {
    template: String,
    suffix: String,
}

impl Default for WebSearch {
    fn default() -> Self {
        Self::new(DEFAULT_WEB_SEARCH_URL, DEFAULT_WEB_SEARCH_SUFFIX)
    }
}

impl WebSearch {
    #[must_use]
    pub fn new(template: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            suffix: suffix.into(),
        }
    }

    /// Returns the search URL for `query`.
    ///
    /// # Examples
    ///
    /// ```
    /// use chordsource::search::WebSearch;
    ///
    /// let web = WebSearch::new("https://duckduckgo.com/?q={query}", "");
    /// assert_eq!(web.url("a b"), "https://duckduckgo.com/?q=a%20b");
    /// ```
    #[must_use]
    pub fn url(&self, query: &str) -> String {
        let text = format!("{query}{}", self.suffix);
        let encoded = urlencoding::encode(&text);
        if self.template.contains("{query}") {
            self.template.replace("{query}", &encoded)
        } else {
            format!("{}{encoded}", self.template)
        }
    }

    fn hit(&self, query: &str, score: i64) -> SearchHit {
        SearchHit {
            record: CatalogRecord::new("", query, "", self.url(query)),
            score,
            kind: HitKind::WebFallback,
        }
    }
}

/// Dual-variant fuzzy search engine.
pub struct QueryEngine {
    matcher: SkimMatcherV2,
    remapper: KeyboardRemapper,
    limit: usize,
    web_search: WebSearch,
}

impl fmt::Debug for QueryEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryEngine")
            .field("remapper", &self.remapper)
            .field("limit", &self.limit)
            .field("web_search", &self.web_search)
            .finish_non_exhaustive()
    }
}

impl Default for QueryEngine {
    fn default() -> Self {
        Self::new(KeyboardRemapper::default(), DEFAULT_RESULT_LIMIT, WebSearch::default())
    }
}

impl QueryEngine {
    #[must_use]
    pub fn new(remapper: KeyboardRemapper, limit: usize, web_search: WebSearch) -> Self {
        Self {
            matcher: SkimMatcherV2::default().ignore_case(),
            remapper,
            limit,
            web_search,
        }
    }

    #[must_use]
    pub const fn limit(&self) -> usize {
        self.limit
    }

    #[must_use]
    pub const fn remapper(&self) -> &KeyboardRemapper {
        &self.remapper
    }

    #[must_use]
    pub const fn web_search(&self) -> &WebSearch {
        &self.web_search
    }

    /// Searches `catalog` for `query`.
    ///
    /// An empty query yields an empty list. Any other query yields the merged
    /// matches followed by exactly one fallback hit, even when the catalog is
    /// empty. Equal scores keep catalog order, raw-query hits ahead of hits
    /// only found through the remapped query.
    ///
    /// # Examples
    ///
    /// ```
    /// use chordsource::search::QueryEngine;
    /// use chordsource::{CatalogRecord, CatalogSnapshot};
    ///
    /// let catalog = CatalogSnapshot::new(
    ///     vec![CatalogRecord::new("1", "Yellow", "Coldplay", "https://example.com/1")],
    ///     None,
    /// );
    /// let results = QueryEngine::default().search("yelow", &catalog);
    /// assert_eq!(results.len(), 2);
    /// assert_eq!(results.hits()[0].record.id, "1");
    /// assert!(results.hits()[1].is_fallback());
    /// ```
    #[must_use]
    pub fn search(&self, query: &str, catalog: &CatalogSnapshot) -> RankedResultList {
        if query.is_empty() {
            return RankedResultList::default();
        }

        let _span = tracing::debug_span!("query_search",
            query_len = query.chars().count(),
            record_count = catalog.len(),
            limit = self.limit
        ).entered();

        let raw = query.to_lowercase();
        let primary = self.top_matches(&raw, catalog.records());

        let remapped = self.remapper.remap(query).to_lowercase();
        let alternate = if remapped == raw {
            Vec::new()
        } else {
            tracing::trace!(remapped = %remapped, "running remapped query");
            self.top_matches(&remapped, catalog.records())
        };
        let mut hits = merge(primary, alternate);

        hits.sort_by(|a, b| b.score.cmp(&a.score));
        let match_count = hits.len();
        let fallback_score = hits
            .last()
            .map_or(FALLBACK_SCORE, |lowest| lowest.score.saturating_sub(1).min(FALLBACK_SCORE));
        hits.push(self.web_search.hit(query, fallback_score));

        tracing::debug!(match_count, "search complete");
        RankedResultList::new(hits)
    }

    /// Scores every record against `pattern` and keeps the best `limit`.
    fn top_matches(&self, pattern: &str, records: &[PreparedRecord]) -> Vec<(RecordKey, SearchHit)> {
        let mut scored: Vec<(i64, usize, &PreparedRecord)> = records
            .iter()
            .enumerate()
            .filter_map(|(position, prepared)| {
                self.matcher
                    .fuzzy_match(prepared.index().as_str(), pattern)
                    .map(|score| (score, position, prepared))
            })
            .collect();

        scored.sort_by(|a, b| b.0.cmp(&a.0));
        scored.truncate(self.limit);

        scored
            .into_iter()
            .map(|(score, position, prepared)| {
                let hit = SearchHit {
                    record: prepared.record.clone(),
                    score,
                    kind: HitKind::Match,
                };
                (identity(position, &prepared.record), hit)
            })
            .collect()
    }
}

/// Merge identity of the record at `position` in the snapshot.
///
/// A record with neither id nor url is only ever equal to itself.
fn identity(position: usize, record: &CatalogRecord) -> RecordKey {
    if record.id.is_empty() && record.url.is_empty() {
        RecordKey::Position(position)
    } else {
        record.key()
    }
}

/// Unions two hit lists by record identity. A duplicate keeps the position of
/// its first occurrence and the higher of the two scores.
fn merge(first: Vec<(RecordKey, SearchHit)>, second: Vec<(RecordKey, SearchHit)>) -> Vec<SearchHit> {
    let mut merged: Vec<SearchHit> = Vec::with_capacity(first.len() + second.len());
    let mut seen: HashMap<RecordKey, usize> = HashMap::new();

    for (key, hit) in first.into_iter().chain(second) {
        match seen.get(&key) {
            Some(&at) => {
                if hit.score > merged[at].score {
                    merged[at] = hit;
                }
            }
            None => {
                seen.insert(key, merged.len());
                merged.push(hit);
            }
        }
    }

    merged
}
