//! # Incremental Search
//!
//! Filters a fixed source collection by a query string, after a debounce.
//!
//! `set_query()` only records the query and hands out a [`PendingSearch`]
//! ticket. Whoever owns the timer (see [`crate::core::debounce`]) passes the
//! ticket back to `apply()` once the quiet period is over. Every `set_query`
//! and `clear_search` bumps a generation counter, so a ticket from an earlier
//! keystroke is recognised as stale and dropped.
//!
//! ```text
//! set_query("a")   → ticket #1 ┐
//! set_query("ap")  → ticket #2 │  only #3 matches the current generation
//! set_query("app") → ticket #3 ┘
//! apply(#3) → results for "app"
//! ```
//!
//! Results are stored as indices into the source, so they are always a
//! subset of it and keep its order.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::ops::Range;
use std::time::Duration;

use log::debug;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

// ============================================================================
// Searchable Items
// ============================================================================

/// Exposes named fields of an item as text for matching.
pub trait Searchable {
    /// Text form of `field`, or `None` when the item has no value for it.
    fn field_text(&self, field: &str) -> Option<Cow<'_, str>>;
}

/// Object members by key. `null` and missing members have no value;
/// non-string scalars match against their JSON text.
impl Searchable for serde_json::Value {
    fn field_text(&self, field: &str) -> Option<Cow<'_, str>> {
        match self.get(field)? {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) => Some(Cow::Borrowed(s)),
            other => Some(Cow::Owned(other.to_string())),
        }
    }
}

impl Searchable for BTreeMap<String, String> {
    fn field_text(&self, field: &str) -> Option<Cow<'_, str>> {
        self.get(field).map(|s| Cow::Borrowed(s.as_str()))
    }
}

// ============================================================================
// Options
// ============================================================================

/// Delimiters wrapped around every highlighted match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightMarker {
    pub open: String,
    pub close: String,
}

impl Default for HighlightMarker {
    fn default() -> Self {
        Self {
            open: "**".to_string(),
            close: "**".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchOptions {
    /// Fields that take part in matching. An item matches if any of them does.
    pub fields: Vec<String>,
    pub case_sensitive: bool,
    pub highlight: bool,
    pub marker: HighlightMarker,
    pub debounce: Duration,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            fields: Vec::new(),
            case_sensitive: false,
            highlight: false,
            marker: HighlightMarker::default(),
            debounce: DEFAULT_DEBOUNCE,
        }
    }
}

impl SearchOptions {
    pub fn with_fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }
}

// ============================================================================
// Results
// ============================================================================

/// Highlighted text of one matched field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldHighlight {
    pub field: String,
    /// Field text with every match wrapped in the marker.
    pub text: String,
    /// Byte ranges of the matches in the raw field text.
    pub ranges: Vec<Range<usize>>,
}

/// A result item together with its highlighted fields.
#[derive(Debug, Clone, Copy)]
pub struct Annotated<'a, T> {
    pub item: &'a T,
    pub highlights: &'a [FieldHighlight],
}

impl<'a, T: Searchable> Annotated<'a, T> {
    /// Highlighted text for `field` if it matched, otherwise the raw value.
    pub fn text(&self, field: &str) -> Option<Cow<'a, str>> {
        self.highlights
            .iter()
            .find(|h| h.field == field)
            .map(|h| Cow::Borrowed(h.text.as_str()))
            .or_else(|| self.item.field_text(field))
    }

    /// Match ranges within the raw text of `field`. Empty when it did not match.
    pub fn ranges(&self, field: &str) -> &'a [Range<usize>] {
        self.highlights
            .iter()
            .find(|h| h.field == field)
            .map_or(&[][..], |h| h.ranges.as_slice())
    }
}

/// Ticket for a debounced recomputation. Stale once the query changes again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingSearch {
    generation: u64,
}

impl PendingSearch {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

// ============================================================================
// Engine
// ============================================================================

pub struct SearchEngine<T> {
    source: Vec<T>,
    options: SearchOptions,
    query: String,
    matches: Vec<usize>,
    /// Parallel to `matches`.
    highlights: Vec<Vec<FieldHighlight>>,
    is_searching: bool,
    generation: u64,
}

impl<T: Searchable> SearchEngine<T> {
    pub fn new(source: Vec<T>, options: SearchOptions) -> Self {
        let len = source.len();
        Self {
            source,
            options,
            query: String::new(),
            matches: (0..len).collect(),
            highlights: vec![Vec::new(); len],
            is_searching: false,
            generation: 0,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn is_searching(&self) -> bool {
        self.is_searching
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    pub fn source(&self) -> &[T] {
        &self.source
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Items matched by the last applied search, in source order.
    pub fn results(&self) -> impl Iterator<Item = &T> + '_ {
        self.matches.iter().map(|&idx| &self.source[idx])
    }

    pub fn result_count(&self) -> usize {
        self.matches.len()
    }

    /// Results paired with their highlights. Highlights are empty when
    /// highlighting is off.
    pub fn annotated(&self) -> impl Iterator<Item = Annotated<'_, T>> + '_ {
        self.matches
            .iter()
            .zip(&self.highlights)
            .map(|(&idx, highlights)| Annotated {
                item: &self.source[idx],
                highlights,
            })
    }

    /// What a list should show: the whole source while the query is empty,
    /// the last applied results otherwise.
    pub fn visible_results(&self) -> Vec<&T> {
        if self.query.is_empty() {
            self.source.iter().collect()
        } else {
            self.results().collect()
        }
    }

    /// Like `visible_results`, with highlights attached.
    pub fn visible_annotated(&self) -> Vec<Annotated<'_, T>> {
        if self.query.is_empty() {
            self.source
                .iter()
                .map(|item| Annotated {
                    item,
                    highlights: &[],
                })
                .collect()
        } else {
            self.annotated().collect()
        }
    }

    /// Records the query and returns the ticket to apply after the debounce.
    pub fn set_query(&mut self, text: impl Into<String>) -> PendingSearch {
        self.query = text.into();
        self.is_searching = true;
        self.generation += 1;
        debug!("Query set to {:?} (generation {})", self.query, self.generation);
        PendingSearch {
            generation: self.generation,
        }
    }

    /// Same as [`set_query`](Self::set_query).
    pub fn search(&mut self, text: impl Into<String>) -> PendingSearch {
        self.set_query(text)
    }

    /// Runs the recomputation for `ticket`. Returns false for a stale ticket.
    pub fn apply(&mut self, ticket: PendingSearch) -> bool {
        if ticket.generation != self.generation {
            debug!(
                "Dropping stale search (generation {}, current {})",
                ticket.generation, self.generation
            );
            return false;
        }

        self.recompute();
        self.is_searching = false;
        debug!(
            "Search {:?} matched {} of {} items",
            self.query,
            self.matches.len(),
            self.source.len()
        );
        true
    }

    /// Empties the query and invalidates any pending ticket.
    pub fn clear_search(&mut self) {
        self.query.clear();
        self.generation += 1;
        self.is_searching = false;
        self.matches = (0..self.source.len()).collect();
        self.highlights = vec![Vec::new(); self.source.len()];
    }

    /// Swaps the source collection and re-filters it with the current query.
    pub fn set_source(&mut self, source: Vec<T>) {
        self.source = source;
        self.recompute();
    }

    /// Appends items and filters just those with the current query.
    pub fn extend_source(&mut self, items: impl IntoIterator<Item = T>) {
        let start = self.source.len();
        self.source.extend(items);
        self.filter_from(start);
    }

    fn recompute(&mut self) {
        self.matches.clear();
        self.highlights.clear();
        self.filter_from(0);
    }

    /// Matches `source[start..]` against the query, appending to the results.
    fn filter_from(&mut self, start: usize) {
        let end = self.source.len();
        if self.query.trim().is_empty() {
            self.matches.extend(start..end);
            self.highlights.resize(self.matches.len(), Vec::new());
            return;
        }

        let needle = Needle::new(&self.query, self.options.case_sensitive);
        for (idx, item) in self.source.iter().enumerate().skip(start) {
            let matched = self.options.fields.iter().any(|field| {
                item.field_text(field)
                    .is_some_and(|text| needle.is_in(&text))
            });
            if !matched {
                continue;
            }

            self.matches.push(idx);
            self.highlights.push(if self.options.highlight {
                highlight_fields(item, &self.options, &self.query)
            } else {
                Vec::new()
            });
        }
    }
}

fn highlight_fields<T: Searchable>(
    item: &T,
    options: &SearchOptions,
    query: &str,
) -> Vec<FieldHighlight> {
    options
        .fields
        .iter()
        .filter_map(|field| {
            let text = item.field_text(field)?;
            let ranges = match_ranges(&text, query, options.case_sensitive);
            if ranges.is_empty() {
                return None;
            }
            Some(FieldHighlight {
                field: field.clone(),
                text: wrap_ranges(&text, &ranges, &options.marker),
                ranges,
            })
        })
        .collect()
}

// ============================================================================
// Matching
// ============================================================================

struct Needle {
    text: String,
    case_sensitive: bool,
}

impl Needle {
    fn new(query: &str, case_sensitive: bool) -> Self {
        let text = if case_sensitive {
            query.to_string()
        } else {
            fold(query)
        };
        Self {
            text,
            case_sensitive,
        }
    }

    fn is_in(&self, haystack: &str) -> bool {
        if self.case_sensitive {
            haystack.contains(&self.text)
        } else {
            fold(haystack).contains(&self.text)
        }
    }
}

fn fold(text: &str) -> String {
    text.chars().flat_map(char::to_lowercase).collect()
}

/// Byte ranges of every non-overlapping occurrence of `needle` in `haystack`,
/// scanning left to right.
///
/// Case-insensitive matching runs on the lowercased text and maps each match
/// back onto the original, so callers can slice `haystack` with the ranges.
pub fn find_matches(haystack: &str, needle: &str, case_sensitive: bool) -> Vec<Range<usize>> {
    if needle.is_empty() {
        return Vec::new();
    }
    if case_sensitive {
        return haystack
            .match_indices(needle)
            .map(|(start, m)| start..start + m.len())
            .collect();
    }

    let needle = fold(needle);
    let mut folded = String::with_capacity(haystack.len());
    // Original byte offset for every byte of `folded`
    let mut origin = Vec::with_capacity(haystack.len());
    for (offset, ch) in haystack.char_indices() {
        for lower in ch.to_lowercase() {
            let before = folded.len();
            folded.push(lower);
            origin.extend(std::iter::repeat_n(offset, folded.len() - before));
        }
    }

    folded
        .match_indices(&needle)
        .map(|(start, m)| {
            let end = origin
                .get(start + m.len())
                .copied()
                .unwrap_or(haystack.len());
            origin[start]..end
        })
        .filter(|range| !range.is_empty())
        .collect()
}

/// Wraps every occurrence of `query` in `text` with `marker`.
///
/// Returns `None` when the query is blank or does not occur.
/// `highlight("Banana", "an", false, &default)` gives `B**an****an**a`.
pub fn highlight(
    text: &str,
    query: &str,
    case_sensitive: bool,
    marker: &HighlightMarker,
) -> Option<String> {
    let ranges = match_ranges(text, query, case_sensitive);
    if ranges.is_empty() {
        return None;
    }
    Some(wrap_ranges(text, &ranges, marker))
}

/// `find_matches` with blank queries matching nothing.
fn match_ranges(text: &str, query: &str, case_sensitive: bool) -> Vec<Range<usize>> {
    if query.trim().is_empty() {
        return Vec::new();
    }
    find_matches(text, query, case_sensitive)
}

fn wrap_ranges(text: &str, ranges: &[Range<usize>], marker: &HighlightMarker) -> String {
    let mut out = String::with_capacity(text.len() + ranges.len() * (marker.open.len() + marker.close.len()));
    let mut cursor = 0;
    for range in ranges {
        out.push_str(&text[cursor..range.start]);
        out.push_str(&marker.open);
        out.push_str(&text[range.clone()]);
        out.push_str(&marker.close);
        cursor = range.end;
    }
    out.push_str(&text[cursor..]);
    out
}
