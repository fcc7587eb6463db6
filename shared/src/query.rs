//! Translation of the list page's filter state into backend query parameters.

use chrono::{NaiveDate, NaiveDateTime, TimeZone};
use chrono_tz::Tz;
use url::form_urlencoded;

use crate::types::SortOrder;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const DEFAULT_SORT_FIELD: &str = "updatedAt";
pub const PROGRESS_FLOOR: u8 = 0;
pub const PROGRESS_CEILING: u8 = 100;
pub const PAGE_SIZE_OPTIONS: &[u32] = &[5, 10, 20, 50];

/// Filter, sort and pagination state of the achievements page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListFilters {
    pub page: u32,
    pub page_size: u32,
    pub search: String,
    /// Empty or `all` means every category.
    pub category: String,
    /// Calendar dates as `YYYY-MM-DD`.
    pub updated_from: Option<String>,
    pub updated_to: Option<String>,
    pub progress_min: u8,
    pub progress_max: u8,
    pub sort_by: String,
    pub order: SortOrder,
}

impl Default for ListFilters {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
            search: String::new(),
            category: String::new(),
            updated_from: None,
            updated_to: None,
            progress_min: PROGRESS_FLOOR,
            progress_max: PROGRESS_CEILING,
            sort_by: DEFAULT_SORT_FIELD.to_string(),
            order: SortOrder::Desc,
        }
    }
}

impl ListFilters {
    /// Applies `change` and drops back to the first page if anything other
    /// than the page number changed.
    pub fn update(&mut self, change: impl FnOnce(&mut ListFilters)) {
        let before = self.clone();
        change(self);
        self.page = self.page.max(1);
        self.page_size = self.page_size.max(1);
        if !self.same_criteria(&before) {
            self.page = DEFAULT_PAGE;
        }
    }

    /// Returns a copy with `change` applied, see [`ListFilters::update`].
    pub fn with(&self, change: impl FnOnce(&mut ListFilters)) -> ListFilters {
        let mut next = self.clone();
        next.update(change);
        next
    }

    pub fn set_page(&mut self, page: u32) {
        self.page = page.max(1);
    }

    pub fn set_page_size(&mut self, page_size: u32) {
        self.update(|f| f.page_size = page_size);
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        let search = search.into();
        self.update(|f| f.search = search);
    }

    pub fn set_category(&mut self, category: impl Into<String>) {
        let category = category.into();
        self.update(|f| f.category = category);
    }

    pub fn set_updated_range(&mut self, from: Option<String>, to: Option<String>) {
        self.update(|f| {
            f.updated_from = from;
            f.updated_to = to;
        });
    }

    /// Bounds given in the wrong order are swapped.
    pub fn set_progress_range(&mut self, min: u8, max: u8) {
        let (min, max) = progress_bounds(min, max);
        self.update(|f| {
            f.progress_min = min;
            f.progress_max = max;
        });
    }

    pub fn set_sort(&mut self, field: impl Into<String>, order: SortOrder) {
        let field = field.into();
        self.update(|f| {
            f.sort_by = field;
            f.order = order;
        });
    }

    /// Clears every filter. Page size is kept.
    pub fn reset(&mut self) {
        *self = ListFilters {
            page_size: self.page_size,
            ..ListFilters::default()
        };
    }

    pub fn category_filter(&self) -> Option<&str> {
        let category = self.category.trim();
        if category.is_empty() || category.eq_ignore_ascii_case("all") {
            None
        } else {
            Some(category)
        }
    }

    fn same_criteria(&self, other: &ListFilters) -> bool {
        self.page_size == other.page_size
            && self.search == other.search
            && self.category == other.category
            && self.updated_from == other.updated_from
            && self.updated_to == other.updated_to
            && self.progress_min == other.progress_min
            && self.progress_max == other.progress_max
            && self.sort_by == other.sort_by
            && self.order == other.order
    }

    /// Reads page state from URL query pairs. Unparseable values fall back
    /// to their defaults.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = ListFilters::default();
        let non_empty = |key: &str| get(key).filter(|v| !v.trim().is_empty());

        Self {
            page: non_empty("page")
                .and_then(|v| v.parse().ok())
                .filter(|&p| p >= 1)
                .unwrap_or(defaults.page),
            page_size: non_empty("limit")
                .and_then(|v| v.parse().ok())
                .filter(|&s| s >= 1)
                .unwrap_or(defaults.page_size),
            search: get("search").unwrap_or_default(),
            category: get("category").unwrap_or_default(),
            updated_from: non_empty("updatedFrom"),
            updated_to: non_empty("updatedTo"),
            progress_min: non_empty("progressMin")
                .and_then(|v| v.parse::<u8>().ok())
                .map(|v| v.min(PROGRESS_CEILING))
                .unwrap_or(defaults.progress_min),
            progress_max: non_empty("progressMax")
                .and_then(|v| v.parse::<u8>().ok())
                .map(|v| v.min(PROGRESS_CEILING))
                .unwrap_or(defaults.progress_max),
            sort_by: non_empty("sortBy").unwrap_or(defaults.sort_by),
            order: non_empty("order")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.order),
        }
    }

    /// URL query pairs for every value that differs from its default.
    pub fn to_url_pairs(&self) -> Vec<(&'static str, String)> {
        let defaults = ListFilters::default();
        let mut pairs = Vec::new();

        if self.page != defaults.page {
            pairs.push(("page", self.page.to_string()));
        }
        if self.page_size != defaults.page_size {
            pairs.push(("limit", self.page_size.to_string()));
        }
        if !self.search.is_empty() {
            pairs.push(("search", self.search.clone()));
        }
        if let Some(category) = self.category_filter() {
            pairs.push(("category", category.to_string()));
        }
        if let Some(from) = &self.updated_from {
            pairs.push(("updatedFrom", from.clone()));
        }
        if let Some(to) = &self.updated_to {
            pairs.push(("updatedTo", to.clone()));
        }
        if self.progress_min != defaults.progress_min {
            pairs.push(("progressMin", self.progress_min.to_string()));
        }
        if self.progress_max != defaults.progress_max {
            pairs.push(("progressMax", self.progress_max.to_string()));
        }
        if self.sort_by != defaults.sort_by {
            pairs.push(("sortBy", self.sort_by.clone()));
        }
        if self.order != defaults.order {
            pairs.push(("order", self.order.to_string()));
        }
        pairs
    }

    pub fn to_url_query(&self) -> String {
        encode_pairs(&self.to_url_pairs())
    }
}

/// Backend list query derived from [`ListFilters`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub page: u32,
    pub per_page: u32,
    pub sort_field: String,
    pub order: SortOrder,
    pub search: Option<String>,
    pub category: Option<String>,
    /// Unix seconds, inclusive.
    pub updated_from: Option<i64>,
    /// Unix seconds, inclusive.
    pub updated_to: Option<i64>,
    pub progress_min: Option<u8>,
    pub progress_max: Option<u8>,
}

impl Default for ListQuery {
    fn default() -> Self {
        ListQuery::from_filters(&ListFilters::default(), chrono_tz::UTC)
    }
}

/// Caps both bounds at 100 and puts them in ascending order.
fn progress_bounds(min: u8, max: u8) -> (u8, u8) {
    let min = min.min(PROGRESS_CEILING);
    let max = max.min(PROGRESS_CEILING);
    if min <= max {
        (min, max)
    } else {
        (max, min)
    }
}

impl ListQuery {
    /// Builds the query, reading calendar dates in `tz`.
    pub fn from_filters(filters: &ListFilters, tz: Tz) -> Self {
        let search = filters.search.trim();
        let (progress_min, progress_max) =
            progress_bounds(filters.progress_min, filters.progress_max);
        let sort_field = filters.sort_by.trim();

        Self {
            page: filters.page.max(1),
            per_page: filters.page_size.max(1),
            sort_field: if sort_field.is_empty() {
                DEFAULT_SORT_FIELD.to_string()
            } else {
                sort_field.to_string()
            },
            order: filters.order,
            search: (!search.is_empty()).then(|| search.to_string()),
            category: filters.category_filter().map(str::to_string),
            updated_from: filters
                .updated_from
                .as_deref()
                .and_then(|date| start_of_day(date, tz)),
            updated_to: filters
                .updated_to
                .as_deref()
                .and_then(|date| end_of_day(date, tz)),
            progress_min: (progress_min != PROGRESS_FLOOR).then_some(progress_min),
            progress_max: (progress_max != PROGRESS_CEILING).then_some(progress_max),
        }
    }

    /// `_sort` value: the bare field for ascending, `-field` for descending.
    pub fn sort_param(&self) -> String {
        match self.order {
            SortOrder::Asc => self.sort_field.clone(),
            SortOrder::Desc => format!("-{}", self.sort_field),
        }
    }

    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("_page", self.page.to_string()),
            ("_per_page", self.per_page.to_string()),
            ("_sort", self.sort_param()),
        ];

        if let Some(search) = &self.search {
            params.push(("title_like", search.clone()));
        }
        if let Some(category) = &self.category {
            params.push(("category", category.clone()));
        }
        if let Some(from) = self.updated_from {
            params.push(("updatedAt_gte", from.to_string()));
        }
        if let Some(to) = self.updated_to {
            params.push(("updatedAt_lte", to.to_string()));
        }
        if let Some(min) = self.progress_min {
            params.push(("progress_gte", min.to_string()));
        }
        if let Some(max) = self.progress_max {
            params.push(("progress_lte", max.to_string()));
        }
        params
    }

    pub fn to_query_string(&self) -> String {
        encode_pairs(&self.to_params())
    }
}

fn encode_pairs(pairs: &[(&'static str, String)]) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in pairs {
        serializer.append_pair(key, value);
    }
    serializer.finish()
}

/// Unix seconds of `00:00:00` on `date` (`YYYY-MM-DD`) in `tz`.
pub fn start_of_day(date: &str, tz: Tz) -> Option<i64> {
    let day = parse_day(date)?;
    local_timestamp(day.and_hms_opt(0, 0, 0)?, tz)
}

/// Unix seconds of `23:59:59` on `date` (`YYYY-MM-DD`) in `tz`.
pub fn end_of_day(date: &str, tz: Tz) -> Option<i64> {
    let day = parse_day(date)?;
    local_timestamp(day.and_hms_opt(23, 59, 59)?, tz)
}

fn parse_day(date: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").ok()
}

fn local_timestamp(naive: NaiveDateTime, tz: Tz) -> Option<i64> {
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|local| local.timestamp())
}
