//! ``src/model/query.rs``
//! ============================================================================
//! # `MovieQuery`: listing parameters and pagination facts
//!
//! A query is always complete: partial updates arrive as a [`QueryPatch`] and
//! are merged onto the previous query. Pagination helpers are pure functions
//! of `(offset, limit, total)`.
//!
//! By convention an empty collection has one (empty) page, so
//! `total_pages(0, limit) == 1` and the current page is 1.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::movie::MovieFormat;

/// Page size used when nothing else is configured.
pub const DEFAULT_LIMIT: u32 = 50;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("Page size must be positive")]
    ZeroLimit,
}

/// Server-side sort column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    Id,
    #[default]
    Title,
    Year,
}

impl SortField {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Title => "title",
            Self::Year => "year",
        }
    }

    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Id => Self::Title,
            Self::Title => Self::Year,
            Self::Year => Self::Id,
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// Wire spelling (`ASC` / `DESC`).
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }

    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional listing filters. Empty strings are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct MovieFilters {
    pub title: Option<String>,
    pub actor: Option<String>,
    pub search: Option<String>,
    pub format: Option<MovieFormat>,
}

impl MovieFilters {
    pub fn is_empty(&self) -> bool {
        blank(&self.title) && blank(&self.actor) && blank(&self.search) && self.format.is_none()
    }

    /// Drop blank text filters so `Some("")` and `None` compare equal.
    #[must_use]
    pub fn normalized(self) -> Self {
        let keep = |v: Option<String>| {
            v.map(|s| s.trim().to_owned())
                .filter(|s| !s.is_empty())
        };
        Self {
            title: keep(self.title),
            actor: keep(self.actor),
            search: keep(self.search),
            format: self.format,
        }
    }
}

fn blank(v: &Option<String>) -> bool {
    v.as_deref().is_none_or(|s| s.trim().is_empty())
}

/// Complete listing parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MovieQuery {
    pub sort: SortField,
    pub order: SortOrder,
    pub limit: u32,
    pub offset: u32,
    pub filters: MovieFilters,
}

impl Default for MovieQuery {
    fn default() -> Self {
        Self {
            sort: SortField::default(),
            order: SortOrder::default(),
            limit: DEFAULT_LIMIT,
            offset: 0,
            filters: MovieFilters::default(),
        }
    }
}

/// Partial query update. `None` keeps the previous value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryPatch {
    pub sort: Option<SortField>,
    pub order: Option<SortOrder>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    pub filters: Option<MovieFilters>,
}

impl MovieQuery {
    /// A fresh query with the given page size.
    pub fn with_limit(limit: u32) -> Result<Self, QueryError> {
        if limit == 0 {
            return Err(QueryError::ZeroLimit);
        }
        Ok(Self {
            limit,
            ..Self::default()
        })
    }

    /// Merge a patch onto this query.
    ///
    /// A change of sort, order, page size or filters puts the result back on
    /// the first page, whatever offset the patch carries.
    pub fn merge(&self, patch: QueryPatch) -> Result<Self, QueryError> {
        if patch.limit == Some(0) {
            return Err(QueryError::ZeroLimit);
        }

        let sort = patch.sort.unwrap_or(self.sort);
        let order = patch.order.unwrap_or(self.order);
        let limit = patch.limit.unwrap_or(self.limit);
        let filters = patch
            .filters
            .map(MovieFilters::normalized)
            .unwrap_or_else(|| self.filters.clone());

        let reset = sort != self.sort
            || order != self.order
            || limit != self.limit
            || filters != self.filters;

        let offset = if reset {
            0
        } else {
            patch.offset.unwrap_or(self.offset)
        };

        Ok(Self {
            sort,
            order,
            limit,
            offset,
            filters,
        })
    }

    #[must_use]
    pub fn sorted_by(&self, sort: SortField) -> Self {
        let mut next = self.clone();
        if sort != self.sort {
            next.sort = sort;
            next.offset = 0;
        }
        next
    }

    #[must_use]
    pub fn ordered(&self, order: SortOrder) -> Self {
        let mut next = self.clone();
        if order != self.order {
            next.order = order;
            next.offset = 0;
        }
        next
    }

    /// Apply search filters starting from the first page.
    #[must_use]
    pub fn searched(&self, filters: MovieFilters) -> Self {
        Self {
            filters: filters.normalized(),
            offset: 0,
            ..self.clone()
        }
    }

    /// Empty filters, first page; sort, order and page size are kept.
    #[must_use]
    pub fn cleared(&self) -> Self {
        Self {
            filters: MovieFilters::default(),
            offset: 0,
            ..self.clone()
        }
    }

    /// The following page, or `None` when there is none.
    pub fn next_page(&self, total: u64) -> Option<Self> {
        has_next(self.offset, self.limit, total).then(|| Self {
            offset: self.offset + self.limit,
            ..self.clone()
        })
    }

    /// The preceding page, or `None` on the first page.
    pub fn prev_page(&self) -> Option<Self> {
        has_prev(self.offset).then(|| Self {
            offset: self.offset.saturating_sub(self.limit),
            ..self.clone()
        })
    }

    /// Only the parameters that are set, in request order.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("sort", self.sort.as_str().to_owned()),
            ("order", self.order.as_str().to_owned()),
            ("limit", self.limit.to_string()),
            ("offset", self.offset.to_string()),
        ];
        let f = &self.filters;
        if let Some(actor) = f.actor.as_deref().filter(|s| !s.is_empty()) {
            params.push(("actor", actor.to_owned()));
        }
        if let Some(title) = f.title.as_deref().filter(|s| !s.is_empty()) {
            params.push(("title", title.to_owned()));
        }
        if let Some(search) = f.search.as_deref().filter(|s| !s.is_empty()) {
            params.push(("search", search.to_owned()));
        }
        if let Some(format) = f.format {
            params.push(("format", format.as_str().to_owned()));
        }
        params
    }

    pub const fn pagination(&self, total: u64) -> Pagination {
        Pagination {
            offset: self.offset,
            limit: self.limit,
            total,
        }
    }
}

/// Derived paging facts for one snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub offset: u32,
    pub limit: u32,
    pub total: u64,
}

impl Pagination {
    pub fn current_page(&self) -> u64 {
        current_page(self.offset, self.limit, self.total)
    }

    pub fn total_pages(&self) -> u64 {
        total_pages(self.total, self.limit)
    }

    pub fn has_next(&self) -> bool {
        has_next(self.offset, self.limit, self.total)
    }

    pub const fn has_prev(&self) -> bool {
        has_prev(self.offset)
    }
}

/// `ceil(total / limit)`, with an empty collection counting as one page.
/// A zero limit is treated as one item per page.
pub fn total_pages(total: u64, limit: u32) -> u64 {
    let limit = u64::from(limit.max(1));
    total.div_ceil(limit).max(1)
}

/// 1-based page of `offset`, clamped into `[1, total_pages]`.
pub fn current_page(offset: u32, limit: u32, total: u64) -> u64 {
    let limit = limit.max(1);
    let raw = u64::from(offset / limit) + 1;
    raw.min(total_pages(total, limit))
}

pub fn has_next(offset: u32, limit: u32, total: u64) -> bool {
    u64::from(offset) + u64::from(limit) < total
}

pub const fn has_prev(offset: u32) -> bool {
    offset > 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_fills_defaults_from_previous() {
        let base = MovieQuery::default();
        let q = base
            .merge(QueryPatch {
                offset: Some(50),
                ..QueryPatch::default()
            })
            .unwrap();
        assert_eq!(q.sort, SortField::Title);
        assert_eq!(q.order, SortOrder::Asc);
        assert_eq!(q.limit, DEFAULT_LIMIT);
        assert_eq!(q.offset, 50);
    }

    #[test]
    fn changing_sort_or_order_resets_offset() {
        let paged = MovieQuery {
            offset: 100,
            ..MovieQuery::default()
        };

        let by_year = paged
            .merge(QueryPatch {
                sort: Some(SortField::Year),
                offset: Some(150),
                ..QueryPatch::default()
            })
            .unwrap();
        assert_eq!(by_year.offset, 0);

        assert_eq!(paged.ordered(SortOrder::Desc).offset, 0);
        assert_eq!(paged.sorted_by(SortField::Id).offset, 0);
        // Same sort is not a change.
        assert_eq!(paged.sorted_by(SortField::Title).offset, 100);
    }

    #[test]
    fn zero_limit_is_rejected() {
        assert_eq!(MovieQuery::with_limit(0), Err(QueryError::ZeroLimit));
        let err = MovieQuery::default().merge(QueryPatch {
            limit: Some(0),
            ..QueryPatch::default()
        });
        assert_eq!(err, Err(QueryError::ZeroLimit));
    }

    #[test]
    fn clearing_keeps_sort_and_order() {
        let q = MovieQuery {
            sort: SortField::Year,
            order: SortOrder::Desc,
            offset: 20,
            limit: 10,
            filters: MovieFilters {
                actor: Some("Keanu".into()),
                ..MovieFilters::default()
            },
        };
        let cleared = q.cleared();
        assert_eq!(cleared.sort, SortField::Year);
        assert_eq!(cleared.order, SortOrder::Desc);
        assert_eq!(cleared.limit, 10);
        assert_eq!(cleared.offset, 0);
        assert!(cleared.filters.is_empty());
    }

    #[test]
    fn pagination_facts() {
        assert!(has_next(0, 10, 11));
        assert!(!has_next(0, 10, 10));
        assert!(!has_prev(0));
        assert!(has_prev(10));

        assert_eq!(total_pages(0, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);

        assert_eq!(current_page(0, 10, 0), 1);
        assert_eq!(current_page(20, 10, 25), 3);
        // Offset past the end after deletions is clamped.
        assert_eq!(current_page(40, 10, 25), 3);
    }

    #[test]
    fn pagination_properties_hold_over_a_grid() {
        for total in 0..40u64 {
            for limit in 1..8u32 {
                for offset in (0..48u32).step_by(limit as usize) {
                    let p = Pagination {
                        offset,
                        limit,
                        total,
                    };
                    assert_eq!(p.has_next(), u64::from(offset + limit) < total);
                    assert_eq!(p.has_prev(), offset > 0);
                    if total > 0 {
                        assert_eq!(p.total_pages(), total.div_ceil(u64::from(limit)));
                        assert!((1..=p.total_pages()).contains(&p.current_page()));
                    }
                }
            }
        }
    }

    #[test]
    fn page_navigation() {
        let q = MovieQuery::with_limit(10).unwrap();
        assert!(q.prev_page().is_none());
        let second = q.next_page(15).unwrap();
        assert_eq!(second.offset, 10);
        assert!(second.next_page(15).is_none());
        assert_eq!(second.prev_page().unwrap().offset, 0);
    }

    #[test]
    fn params_skip_unset_filters() {
        let q = MovieQuery::default().searched(MovieFilters {
            actor: Some("  ".into()),
            search: Some("matrix".into()),
            format: Some(MovieFormat::BluRay),
            ..MovieFilters::default()
        });
        let params = q.to_params();
        assert!(params.contains(&("order", "ASC".to_owned())));
        assert!(params.contains(&("search", "matrix".to_owned())));
        assert!(params.contains(&("format", "Blu-Ray".to_owned())));
        assert!(!params.iter().any(|(k, _)| *k == "actor"));
    }
}
