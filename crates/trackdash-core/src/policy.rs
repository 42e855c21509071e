// ── Selection & filter policy ──
//
// Pure functions: no I/O, no state. The data session calls these to merge
// load parameters and to reconcile the selected record after a page
// has been installed.

use crate::model::{FilterCriteria, LocationRecord, PageLink, RecordId};
use crate::service::PageQuery;

/// Overrides for one load. `None` means "keep the current value".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadRequest {
    pub filters: Option<FilterCriteria>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// Merge a load request with the session's current parameters.
///
/// An explicit page always wins. Otherwise the current page is kept,
/// unless the filters changed, in which case the load starts at page 1.
pub fn resolve_query(
    current_filters: &FilterCriteria,
    current_page: u32,
    current_limit: u32,
    request: LoadRequest,
) -> PageQuery {
    let filters_changed = request
        .filters
        .as_ref()
        .is_some_and(|f| f != current_filters);
    let filters = request
        .filters
        .unwrap_or_else(|| current_filters.clone());
    let page = request
        .page
        .unwrap_or(if filters_changed { 1 } else { current_page })
        .max(1);
    PageQuery {
        page,
        limit: request.limit.unwrap_or(current_limit),
        filters,
    }
}

/// Selection after `records` replaced the previous set.
///
/// Keeps a selection that is still present; otherwise falls back to the
/// first record in server order, or nothing when the set is empty.
pub fn reconcile_selection(current: Option<RecordId>, records: &[LocationRecord]) -> Option<RecordId> {
    match current {
        Some(id) if records.iter().any(|r| r.id == id) => Some(id),
        _ => records.first().map(|r| r.id),
    }
}

/// Page-number strip: first and last page always shown, `radius` pages
/// either side of `current`, gaps elided.
pub fn page_window(current: u32, total_pages: u32, radius: u32) -> Vec<PageLink> {
    if total_pages == 0 {
        return Vec::new();
    }
    let current = current.clamp(1, total_pages);
    let lo = current.saturating_sub(radius).max(1);
    let hi = current.saturating_add(radius).min(total_pages);

    let mut out = Vec::new();
    if lo > 1 {
        out.push(PageLink::Page(1));
        if lo > 2 {
            out.push(PageLink::Gap);
        }
    }
    out.extend((lo..=hi).map(PageLink::Page));
    if hi < total_pages {
        if hi < total_pages - 1 {
            out.push(PageLink::Gap);
        }
        out.push(PageLink::Page(total_pages));
    }
    out
}
