//! ``src/model/search_state.rs``
//! ============================================================================
//! # `SearchDebouncer`: raw search input plus its settled filters
//!
//! Keystrokes edit [`SearchInput`] immediately (so the search bar echoes
//! them) while the filters derived from it only settle after the quiet
//! window. A settled change yields one [`SearchIntent`]: `Clear` when every
//! filter is empty, `Search` otherwise. Nothing is emitted before the user
//! has typed, and a burst that ends where it started emits nothing.

use std::time::{Duration, Instant};

use crate::model::movie::MovieFormat;
use crate::model::query::MovieFilters;
use crate::util::debounce::{DebounceConfig, Debounced};

/// Which filter field the search text goes into.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SearchType {
    #[default]
    General,
    Title,
    Actor,
}

impl SearchType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::General => "All",
            Self::Title => "Title",
            Self::Actor => "Actor",
        }
    }

    pub const fn next(self) -> Self {
        match self {
            Self::General => Self::Title,
            Self::Title => Self::Actor,
            Self::Actor => Self::General,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchInput {
    pub text: String,
    pub search_type: SearchType,
    pub format: Option<MovieFormat>,
}

impl SearchInput {
    /// Filters this input asks for. Text is trimmed; blank text sets nothing.
    pub fn filters(&self) -> MovieFilters {
        let text = self.text.trim();
        let text = (!text.is_empty()).then(|| text.to_owned());
        let mut filters = MovieFilters {
            format: self.format,
            ..MovieFilters::default()
        };
        match self.search_type {
            SearchType::General => filters.search = text,
            SearchType::Title => filters.title = text,
            SearchType::Actor => filters.actor = text,
        }
        filters
    }

    pub fn is_empty(&self) -> bool {
        self.filters().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchIntent {
    Clear,
    Search(MovieFilters),
}

#[derive(Debug, Clone)]
pub struct SearchDebouncer {
    input: SearchInput,
    settled: Debounced<MovieFilters>,
}

impl Default for SearchDebouncer {
    fn default() -> Self {
        Self::new(DebounceConfig::search_input())
    }
}

impl SearchDebouncer {
    pub fn new(cfg: DebounceConfig) -> Self {
        Self {
            input: SearchInput::default(),
            settled: Debounced::new(MovieFilters::default(), cfg),
        }
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self::new(DebounceConfig::with_delay(delay))
    }

    pub const fn input(&self) -> &SearchInput {
        &self.input
    }

    pub const fn settled(&self) -> &MovieFilters {
        self.settled.settled()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.settled.deadline()
    }

    pub fn push_char(&mut self, c: char, now: Instant) {
        self.input.text.push(c);
        self.touch(now);
    }

    pub fn pop_char(&mut self, now: Instant) {
        if self.input.text.pop().is_some() {
            self.touch(now);
        }
    }

    pub fn set_text(&mut self, text: impl Into<String>, now: Instant) {
        self.input.text = text.into();
        self.touch(now);
    }

    pub fn cycle_type(&mut self, now: Instant) {
        self.input.search_type = self.input.search_type.next();
        self.touch(now);
    }

    pub fn cycle_format(&mut self, now: Instant) {
        self.input.format = MovieFormat::cycle(self.input.format);
        self.touch(now);
    }

    fn touch(&mut self, now: Instant) {
        self.settled.submit(self.input.filters(), now);
    }

    /// Settle pending input whose window has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<SearchIntent> {
        let filters = self.settled.poll(now)?;
        Some(if filters.is_empty() {
            SearchIntent::Clear
        } else {
            SearchIntent::Search(filters.clone())
        })
    }

    /// Wipe input immediately, bypassing the window. Returns whether the
    /// settled filters were non-empty, i.e. whether a reload is needed.
    pub fn reset(&mut self) -> bool {
        let had_filters = !self.settled.settled().is_empty();
        self.input.text.clear();
        self.input.format = None;
        self.settled.reset(MovieFilters::default());
        had_filters
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(400);

    fn type_str(d: &mut SearchDebouncer, s: &str, start: Instant, gap: Duration) -> Instant {
        let mut t = start;
        for c in s.chars() {
            d.push_char(c, t);
            t += gap;
        }
        t
    }

    #[test]
    fn nothing_emitted_before_typing() {
        let mut d = SearchDebouncer::with_delay(WINDOW);
        let t0 = Instant::now();
        assert_eq!(d.poll(t0 + Duration::from_secs(10)), None);
    }

    #[test]
    fn rapid_keystrokes_emit_one_search_with_final_text() {
        let mut d = SearchDebouncer::with_delay(WINDOW);
        let t0 = Instant::now();
        let last = type_str(&mut d, "matrix", t0, Duration::from_millis(50));

        let mut emitted = Vec::new();
        let mut t = t0;
        while t < last + WINDOW * 2 {
            if let Some(intent) = d.poll(t) {
                emitted.push(intent);
            }
            t += Duration::from_millis(10);
        }

        assert_eq!(emitted.len(), 1);
        match &emitted[0] {
            SearchIntent::Search(f) => assert_eq!(f.search.as_deref(), Some("matrix")),
            other => panic!("unexpected intent {other:?}"),
        }
    }

    #[test]
    fn search_type_routes_text() {
        let mut input = SearchInput {
            text: "  Keanu ".into(),
            search_type: SearchType::Actor,
            format: Some(MovieFormat::Dvd),
        };
        let f = input.filters();
        assert_eq!(f.actor.as_deref(), Some("Keanu"));
        assert!(f.title.is_none() && f.search.is_none());

        input.search_type = SearchType::Title;
        assert_eq!(input.filters().title.as_deref(), Some("Keanu"));
    }

    #[test]
    fn clearing_text_after_search_emits_clear() {
        let mut d = SearchDebouncer::with_delay(WINDOW);
        let t0 = Instant::now();
        d.set_text("alien", t0);
        assert!(matches!(d.poll(t0 + WINDOW), Some(SearchIntent::Search(_))));

        d.set_text("", t0 + WINDOW * 2);
        assert_eq!(d.poll(t0 + WINDOW * 3), Some(SearchIntent::Clear));
    }

    #[test]
    fn whitespace_edit_does_not_reemit() {
        let mut d = SearchDebouncer::with_delay(WINDOW);
        let t0 = Instant::now();
        d.set_text("alien", t0);
        assert!(d.poll(t0 + WINDOW).is_some());

        d.push_char(' ', t0 + WINDOW * 2);
        assert_eq!(d.poll(t0 + WINDOW * 4), None);
    }

    #[test]
    fn format_only_is_a_search() {
        let mut d = SearchDebouncer::with_delay(WINDOW);
        let t0 = Instant::now();
        d.cycle_format(t0);
        assert_eq!(
            d.poll(t0 + WINDOW),
            Some(SearchIntent::Search(MovieFilters {
                format: Some(MovieFormat::Vhs),
                ..MovieFilters::default()
            }))
        );
    }

    #[test]
    fn reset_reports_whether_reload_needed() {
        let mut d = SearchDebouncer::with_delay(WINDOW);
        let t0 = Instant::now();
        assert!(!d.reset());
        d.set_text("x", t0);
        d.poll(t0 + WINDOW);
        assert!(d.reset());
        assert!(d.input().text.is_empty());
        assert_eq!(d.poll(t0 + WINDOW * 5), None);
    }
}
