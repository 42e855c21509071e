//! Location listing: one page of fixes with filters, page strip and
//! optional record detail.

use serde::Serialize;
use tabled::Tabled;

use trackdash_core::{
    DataService, DataSession, FilterCriteria, Ignition, LoadOutcome, LocationRecord, PageLink,
    Pagination, RecordId, SessionState,
};

use crate::cli::{GlobalOpts, LocationsArgs, OutputFormat};
use crate::commands::util;
use crate::config::{self, Connection};
use crate::error::CliError;
use crate::output;

/// Pages shown on each side of the current one in the page strip.
const WINDOW_RADIUS: u32 = 2;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
pub(crate) struct LocationRow {
    #[tabled(rename = " ")]
    marker: &'static str,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Device")]
    device: String,
    #[tabled(rename = "IMEI")]
    imei: String,
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Position")]
    position: String,
    #[tabled(rename = "Speed")]
    speed: String,
    #[tabled(rename = "Ignition")]
    ignition: String,
    #[tabled(rename = "Reason")]
    reason: String,
}

impl LocationRow {
    pub(crate) fn new(r: &LocationRecord, selected: Option<RecordId>, color: bool) -> Self {
        let ignition = r.ignition.to_string();
        Self {
            marker: if selected == Some(r.id) { "▸" } else { "" },
            id: r.id.to_string(),
            device: r.device_label().to_owned(),
            imei: r.imei.clone(),
            time: output::local_time(r.recorded_at()),
            position: format!("{:.5}, {:.5}", r.latitude, r.longitude),
            speed: format!("{:.1} km/h", r.speed),
            ignition: match r.ignition {
                Ignition::On => output::good(&ignition, color),
                Ignition::Off => output::muted(&ignition, color),
            },
            reason: r.reason.clone().unwrap_or_default(),
        }
    }
}

fn record_detail(r: &LocationRecord) -> String {
    let opt = |v: Option<&str>| v.unwrap_or("-").to_owned();
    [
        format!("Record:     {}", r.id),
        format!("Device:     {} ({})", r.device_label(), r.imei),
        format!("Time:       {}", output::local_time(r.recorded_at())),
        format!("Stored:     {}", output::local_time(r.created_at)),
        format!("Latitude:   {:.6}", r.latitude),
        format!("Longitude:  {:.6}", r.longitude),
        format!("Altitude:   {:.1} m", r.altitude),
        format!("Accuracy:   {:.1} m", r.accuracy),
        format!("Bearing:    {:.0}°", r.bearing),
        format!("Speed:      {:.1} km/h", r.speed),
        format!("Ignition:   {}", r.ignition),
        format!("Provider:   {}", opt(r.provider.as_deref())),
        format!("Reason:     {}", opt(r.reason.as_deref())),
    ]
    .join("\n")
}

// ── Footer ──────────────────────────────────────────────────────────

/// "Showing X–Y of Z", or the empty-result message.
pub(crate) fn showing(p: &Pagination) -> String {
    match p.display_range() {
        Some((first, last)) => format!("Showing {first}–{last} of {}", p.total),
        None => "No location records match the current filters".into(),
    }
}

/// Page strip like `‹ 1 … 4 [5] 6 … 12 ›`.
pub(crate) fn page_strip(p: &Pagination) -> String {
    if p.total_pages <= 1 {
        return String::new();
    }
    let mut parts = Vec::new();
    parts.push(if p.has_previous_page { "‹" } else { " " }.to_owned());
    for link in p.window(WINDOW_RADIUS) {
        parts.push(match link {
            PageLink::Page(n) if n == p.current_page => format!("[{n}]"),
            PageLink::Page(n) => n.to_string(),
            PageLink::Gap => "…".into(),
        });
    }
    parts.push(if p.has_next_page { "›" } else { " " }.to_owned());
    parts.join(" ").trim().to_owned()
}

fn filter_summary(f: &FilterCriteria) -> Option<String> {
    if f.is_empty() {
        return None;
    }
    let mut parts = Vec::new();
    if let Some(ref imei) = f.imei {
        parts.push(format!("imei={imei}"));
    }
    if let Some(d) = f.start_date {
        parts.push(format!("from={d}"));
    }
    if let Some(d) = f.end_date {
        parts.push(format!("to={d}"));
    }
    Some(format!("Filters: {}", parts.join(" ")))
}

// ── View ────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct LocationsView<'a> {
    filters: &'a FilterCriteria,
    pagination: &'a Pagination,
    selected: Option<RecordId>,
    records: &'a [LocationRecord],
}

fn render_table(state: &SessionState, color: bool, with_detail: bool) -> String {
    let rows: Vec<LocationRow> = state
        .records
        .iter()
        .map(|r| LocationRow::new(r, state.selected, color))
        .collect();

    let mut sections = Vec::new();
    if !rows.is_empty() {
        sections.push(output::render_table(&rows));
    }
    let mut footer = vec![showing(&state.pagination)];
    let strip = page_strip(&state.pagination);
    if !strip.is_empty() {
        footer.push(format!(
            "Page {} of {}   {strip}",
            state.pagination.current_page, state.pagination.total_pages
        ));
    }
    if let Some(filters) = filter_summary(state.filters()) {
        footer.push(filters);
    }
    sections.push(footer.join("\n"));

    if with_detail {
        if let Some(record) = state.selected_record() {
            sections.push(record_detail(record));
        }
    }
    sections.join("\n\n")
}

/// Render a loaded session in the requested format.
pub(crate) fn render(
    format: &OutputFormat,
    state: &SessionState,
    color: bool,
    with_detail: bool,
) -> String {
    let view = LocationsView {
        filters: state.filters(),
        pagination: &state.pagination,
        selected: state.selected,
        records: &state.records,
    };
    output::render_single(
        format,
        &view,
        |_| render_table(state, color, with_detail),
        |v| {
            v.records
                .iter()
                .map(|r| r.id.to_string())
                .collect::<Vec<_>>()
                .join("\n")
        },
    )
}

// ── Handler ─────────────────────────────────────────────────────────

/// Load page `page` under `criteria`: filters first (page 1), then jump.
pub(crate) async fn load_page<S: DataService>(
    session: &DataSession<S>,
    criteria: FilterCriteria,
    page: u32,
) -> Result<(), CliError> {
    util::expect_applied(session.apply_filters(criteria).await?)?;
    if page == 1 {
        return Ok(());
    }
    match session.change_page(page).await? {
        LoadOutcome::Skipped => {
            let total = session.snapshot().pagination.total_pages;
            Err(CliError::Validation {
                field: "page".into(),
                reason: if total == 0 {
                    "no records match the current filters".into()
                } else {
                    format!("{page} is out of range (1..={total})")
                },
            })
        }
        outcome => util::expect_applied(outcome),
    }
}

pub async fn handle(
    conn: &Connection,
    args: LocationsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let limit = config::page_size(args.limit, &conn.backend)?;
    let session = conn.session(limit);
    let criteria = util::filters(&args.filters);

    let pb = output::spinner("Loading locations…", &global.output, global.quiet);
    let loaded = load_page(&session, criteria, args.page).await;
    pb.finish_and_clear();
    loaded?;

    if let Some(id) = args.select {
        let id = RecordId(id);
        if !session.select_record(id) {
            return Err(CliError::NotFound {
                resource_type: "location record".into(),
                identifier: id.to_string(),
                list_command: "locations".into(),
            });
        }
    }

    let state = session.snapshot();
    let color = output::should_color(&global.color);
    let out = render(&global.output, &state, color, args.select.is_some());
    output::print_output(&out, global.quiet);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn showing_reports_range_of_total() {
        let p = Pagination::from_server(2, 10, 25, 3, 10);
        assert_eq!(showing(&p), "Showing 11–20 of 25");

        let last = Pagination::from_server(3, 10, 25, 3, 5);
        assert_eq!(showing(&last), "Showing 21–25 of 25");
    }

    #[test]
    fn showing_empty_result() {
        let p = Pagination::from_server(1, 10, 0, 0, 0);
        assert_eq!(showing(&p), "No location records match the current filters");
        assert_eq!(page_strip(&p), "");
    }

    #[test]
    fn strip_marks_current_page_and_gaps() {
        let p = Pagination::from_server(6, 10, 200, 20, 10);
        assert_eq!(page_strip(&p), "‹ 1 … 4 5 [6] 7 8 … 20 ›");
    }

    #[test]
    fn strip_on_first_page_has_no_back_arrow() {
        let p = Pagination::from_server(1, 10, 30, 3, 10);
        assert_eq!(page_strip(&p), "[1] 2 3 ›");
    }
}
