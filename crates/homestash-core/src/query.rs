//! Item query engine: filtered, sorted, paginated item listings.
//!
//! Raw request parameters are parsed leniently into an [`ItemQuery`]. Sort
//! keys outside the allow-list fall back to `name`, and only the static
//! column names of [`SortKey`] are ever placed into SQL text.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::Item;
use crate::store::InventoryStore;

/// Sentinel meaning "no location restriction"
pub const ALL_LOCATIONS: &str = "all";

/// Columns an item listing may be sorted by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortKey {
    #[default]
    #[serde(rename = "name")]
    Name,
    #[serde(rename = "quantity")]
    Quantity,
    #[serde(rename = "createdAt")]
    CreatedAt,
    #[serde(rename = "updatedAt")]
    UpdatedAt,
}

impl SortKey {
    /// Parse a client-supplied key. Anything not on the allow-list is `Name`.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "name" => SortKey::Name,
            "quantity" => SortKey::Quantity,
            "createdAt" => SortKey::CreatedAt,
            "updatedAt" => SortKey::UpdatedAt,
            _ => SortKey::Name,
        }
    }

    /// Column name in the `items` table
    pub fn column(self) -> &'static str {
        match self {
            SortKey::Name => "name",
            SortKey::Quantity => "quantity",
            SortKey::CreatedAt => "createdAt",
            SortKey::UpdatedAt => "updatedAt",
        }
    }
}

/// Sort direction. Only the exact literal `desc` selects descending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn parse(raw: &str) -> Self {
        if raw == "desc" {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Restriction on `items.location_id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LocationFilter {
    #[default]
    All,
    /// Exact match. Kept as text; SQLite applies numeric affinity when
    /// comparing against the integer column.
    Only(String),
}

impl LocationFilter {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            None => LocationFilter::All,
            Some(ALL_LOCATIONS) => LocationFilter::All,
            Some(value) => LocationFilter::Only(value.to_string()),
        }
    }
}

/// A fully resolved item query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemQuery {
    /// 1-based page number
    pub page: u32,
    /// Page size, always positive
    pub limit: u32,
    pub sort: SortKey,
    pub direction: SortDirection,
    /// Case-insensitive substring matched against name or description
    pub search: Option<String>,
    pub location: LocationFilter,
}

impl Default for ItemQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 10,
            sort: SortKey::Name,
            direction: SortDirection::Asc,
            search: None,
            location: LocationFilter::All,
        }
    }
}

impl ItemQuery {
    /// Number of rows skipped before this page
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }
}

/// Raw query-string parameters of an item listing.
///
/// Everything arrives as text; [`ItemQueryParams::resolve`] applies the
/// defaults and fallbacks.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemQueryParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
    pub search: Option<String>,
    pub location_id: Option<String>,
}

impl ItemQueryParams {
    /// Resolve into an [`ItemQuery`].
    ///
    /// Unparseable or zero `page` becomes 1; unparseable or zero `limit`
    /// becomes `default_limit`. Oversized values saturate: `page` at
    /// `u32::MAX` (an empty page), `limit` at `max_limit`.
    pub fn resolve(&self, default_limit: u32, max_limit: u32) -> ItemQuery {
        let page = parse_positive(self.page.as_deref())
            .map(saturate_u32)
            .unwrap_or(1);
        let limit = parse_positive(self.limit.as_deref())
            .map(saturate_u32)
            .unwrap_or(default_limit)
            .min(max_limit.max(1));
        let search = self
            .search
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        ItemQuery {
            page,
            limit,
            sort: self.sort.as_deref().map(SortKey::parse).unwrap_or_default(),
            direction: self
                .order
                .as_deref()
                .map(SortDirection::parse)
                .unwrap_or_default(),
            search,
            location: LocationFilter::parse(self.location_id.as_deref()),
        }
    }
}

/// A positive decimal count. Digit strings too large for `u64` saturate.
fn parse_positive(raw: Option<&str>) -> Option<u64> {
    let digits = raw?.trim();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let n = digits.parse::<u64>().unwrap_or(u64::MAX);
    (n > 0).then_some(n)
}

fn saturate_u32(n: u64) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

/// One page of an item listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemPage {
    pub items: Vec<Item>,
    /// Matching items across all pages
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u64,
}

/// `ceil(total / limit)`
pub fn total_pages(total: u64, limit: u32) -> u64 {
    if limit == 0 {
        return 0;
    }
    total.div_ceil(u64::from(limit))
}

/// Run an item query: a count with the same filters, then the page itself.
pub fn query_items(store: &dyn InventoryStore, q: &ItemQuery) -> Result<ItemPage> {
    let total = store.count_items(q)?;
    let items = store.list_items(q)?;
    tracing::debug!(
        total,
        page = q.page,
        limit = q.limit,
        returned = items.len(),
        "item query"
    );

    Ok(ItemPage {
        items,
        total,
        page: q.page,
        limit: q.limit,
        total_pages: total_pages(total, q.limit),
    })
}
