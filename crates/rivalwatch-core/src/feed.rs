//! In-memory feed filtering.
//!
//! The dashboard and CLI fetch one coarse window of articles (the
//! widest selectable time range) and then narrow locally as the user
//! flips filters. [`FilterState`] is the user's current selection,
//! [`FeedView`] the fetched working set. Narrowing never mutates the
//! working set; every [`FeedView::visible`] call recomputes from the
//! full set, so widening a filter again needs no re-fetch as long as
//! the view still [`FeedView::covers`] the requested window.

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, Utc};

use crate::Article;

/// Time window applied when the user has not picked one.
pub const DEFAULT_FILTER_HOURS: i32 = 24;

/// Widest selectable window, and the window coarse fetches use.
pub const COARSE_FETCH_HOURS: i32 = 168;

/// Time ranges the dashboard offers, in hours.
pub const SELECTABLE_HOURS: [i32; 5] = [6, 12, 24, 48, COARSE_FETCH_HOURS];

/// The user's active filter selection.
///
/// Empty competitor or source sets mean "no restriction on that
/// dimension", not "match nothing".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    pub competitors: BTreeSet<String>,
    pub sources: BTreeSet<String>,
    pub hours: i32,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            competitors: BTreeSet::new(),
            sources: BTreeSet::new(),
            hours: DEFAULT_FILTER_HOURS,
        }
    }
}

impl FilterState {
    /// Whether `article` passes every active filter dimension at the
    /// given reference time.
    ///
    /// Competitor filtering is overlap: the article passes when it
    /// carries at least one selected tag. Source filtering is
    /// membership. The time window is inclusive at the cutoff.
    #[must_use]
    pub fn matches(&self, article: &Article, now: DateTime<Utc>) -> bool {
        if !self.competitors.is_empty()
            && !article
                .competitors
                .iter()
                .any(|tag| self.competitors.contains(tag))
        {
            return false;
        }
        if !self.sources.is_empty() && !self.sources.contains(&article.source) {
            return false;
        }
        let cutoff = now - Duration::hours(i64::from(self.hours));
        article.published_at >= cutoff
    }
}

/// A fetched working set of articles plus the window it was fetched
/// over.
#[derive(Debug, Clone)]
pub struct FeedView {
    articles: Vec<Article>,
    fetch_hours: i32,
}

impl FeedView {
    /// Wraps a freshly fetched batch. `fetch_hours` is the time window
    /// the fetch covered; callers narrowing below it never need
    /// another fetch.
    #[must_use]
    pub fn new(articles: Vec<Article>, fetch_hours: i32) -> Self {
        Self {
            articles,
            fetch_hours,
        }
    }

    /// Window this view was fetched over, in hours.
    #[must_use]
    pub fn fetch_hours(&self) -> i32 {
        self.fetch_hours
    }

    /// Number of articles in the working set before filtering.
    #[must_use]
    pub fn total(&self) -> usize {
        self.articles.len()
    }

    /// Whether `filters` can be answered from this view alone. True
    /// when the requested window fits inside the fetched one; a wider
    /// request needs a fresh fetch.
    #[must_use]
    pub fn covers(&self, filters: &FilterState) -> bool {
        filters.hours <= self.fetch_hours
    }

    /// Articles passing `filters`, in the working set's stored order.
    ///
    /// Recomputed from the full working set on every call, so a
    /// narrow-then-widen sequence loses nothing.
    #[must_use]
    pub fn visible<'a>(&'a self, filters: &FilterState, now: DateTime<Utc>) -> Vec<&'a Article> {
        self.articles
            .iter()
            .filter(|article| filters.matches(article, now))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use uuid::Uuid;

    use super::*;

    fn article(source: &str, competitors: &[&str], hours_old: i64) -> Article {
        let now = fixed_now();
        let published = now - Duration::hours(hours_old);
        Article {
            id: Uuid::new_v4(),
            title: format!("{source} article"),
            url: format!("https://example.com/{}", Uuid::new_v4()),
            source: source.to_string(),
            competitors: competitors.iter().map(ToString::to_string).collect(),
            published_at: published,
            scraped_at: published,
            created_at: published,
            summary: None,
            image_url: None,
            author: None,
        }
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn filters(competitors: &[&str], sources: &[&str], hours: i32) -> FilterState {
        FilterState {
            competitors: competitors.iter().map(ToString::to_string).collect(),
            sources: sources.iter().map(ToString::to_string).collect(),
            hours,
        }
    }

    #[test]
    fn default_filters_use_24_hour_window() {
        let state = FilterState::default();
        assert_eq!(state.hours, 24);
        assert!(state.competitors.is_empty());
        assert!(state.sources.is_empty());
    }

    #[test]
    fn default_window_is_selectable() {
        assert!(SELECTABLE_HOURS.contains(&DEFAULT_FILTER_HOURS));
        assert!(SELECTABLE_HOURS.contains(&COARSE_FETCH_HOURS));
    }

    #[test]
    fn empty_filters_pass_everything_inside_window() {
        let state = FilterState::default();
        assert!(state.matches(&article("wire", &[], 2), fixed_now()));
        assert!(state.matches(&article("wire", &["acme"], 23), fixed_now()));
    }

    #[test]
    fn competitor_filter_is_overlap_not_exact_match() {
        let state = filters(&["acme", "globex"], &[], 24);
        assert!(state.matches(&article("wire", &["initech", "acme"], 2), fixed_now()));
        assert!(!state.matches(&article("wire", &["initech"], 2), fixed_now()));
        assert!(!state.matches(&article("wire", &[], 2), fixed_now()));
    }

    #[test]
    fn source_filter_is_membership() {
        let state = filters(&[], &["wire", "blog"], 24);
        assert!(state.matches(&article("blog", &[], 2), fixed_now()));
        assert!(!state.matches(&article("forum", &[], 2), fixed_now()));
    }

    #[test]
    fn window_cutoff_is_inclusive() {
        let state = filters(&[], &[], 24);
        let now = fixed_now();
        let mut on_boundary = article("wire", &[], 0);
        on_boundary.published_at = now - Duration::hours(24);
        assert!(state.matches(&on_boundary, now));

        let mut past_boundary = on_boundary.clone();
        past_boundary.published_at = now - Duration::hours(24) - Duration::seconds(1);
        assert!(!state.matches(&past_boundary, now));
    }

    #[test]
    fn future_publication_dates_pass_the_window() {
        let state = filters(&[], &[], 6);
        assert!(state.matches(&article("wire", &[], -3), fixed_now()));
    }

    #[test]
    fn all_dimensions_must_pass() {
        let state = filters(&["acme"], &["wire"], 24);
        assert!(state.matches(&article("wire", &["acme"], 2), fixed_now()));
        assert!(!state.matches(&article("blog", &["acme"], 2), fixed_now()));
        assert!(!state.matches(&article("wire", &["globex"], 2), fixed_now()));
        assert!(!state.matches(&article("wire", &["acme"], 30), fixed_now()));
    }

    #[test]
    fn visible_preserves_stored_order() {
        let a = article("wire", &["acme"], 1);
        let b = article("blog", &["acme"], 2);
        let c = article("wire", &["globex"], 3);
        let view = FeedView::new(vec![a.clone(), b.clone(), c], COARSE_FETCH_HOURS);

        let shown = view.visible(&filters(&["acme"], &[], 24), fixed_now());
        let ids: Vec<Uuid> = shown.iter().map(|article| article.id).collect();
        assert_eq!(ids, vec![a.id, b.id]);
    }

    #[test]
    fn narrowing_then_widening_restores_articles() {
        let recent = article("wire", &[], 2);
        let older = article("wire", &[], 40);
        let view = FeedView::new(vec![recent.clone(), older.clone()], COARSE_FETCH_HOURS);

        let narrow = filters(&[], &[], 6);
        let wide = filters(&[], &[], 48);
        assert_eq!(view.visible(&narrow, fixed_now()).len(), 1);
        assert_eq!(view.visible(&wide, fixed_now()).len(), 2);
        assert_eq!(view.visible(&narrow, fixed_now()).len(), 1);
        assert_eq!(view.total(), 2);
    }

    #[test]
    fn coarse_view_narrowed_matches_direct_filtering() {
        // Narrowing a 168-hour working set to any tighter selection
        // must show exactly the articles a direct fetch with those
        // filters would return.
        let now = fixed_now();
        let pool = vec![
            article("wire", &["acme"], 1),
            article("wire", &["globex"], 5),
            article("blog", &["acme", "globex"], 10),
            article("blog", &[], 30),
            article("forum", &["initech"], 50),
            article("wire", &["acme"], 100),
            article("forum", &["acme"], 170),
        ];
        let inside_coarse: Vec<Article> = pool
            .iter()
            .filter(|a| a.published_at >= now - Duration::hours(i64::from(COARSE_FETCH_HOURS)))
            .cloned()
            .collect();
        let view = FeedView::new(inside_coarse, COARSE_FETCH_HOURS);

        for state in [
            filters(&[], &[], 6),
            filters(&["acme"], &[], 24),
            filters(&[], &["blog", "forum"], 48),
            filters(&["globex"], &["wire"], 12),
            filters(&["acme"], &["forum"], COARSE_FETCH_HOURS),
        ] {
            assert!(view.covers(&state));
            let narrowed: Vec<Uuid> = view
                .visible(&state, now)
                .iter()
                .map(|article| article.id)
                .collect();
            let direct: Vec<Uuid> = pool
                .iter()
                .filter(|article| state.matches(article, now))
                .map(|article| article.id)
                .collect();
            assert_eq!(narrowed, direct, "divergence for {state:?}");
        }
    }

    #[test]
    fn covers_rejects_windows_wider_than_the_fetch() {
        let view = FeedView::new(Vec::new(), 24);
        assert!(view.covers(&filters(&[], &[], 6)));
        assert!(view.covers(&filters(&[], &[], 24)));
        assert!(!view.covers(&filters(&[], &[], 48)));
    }
}
