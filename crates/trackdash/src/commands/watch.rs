//! Live view: keep one data session open with periodic refresh and print
//! what changes until interrupted.

use std::collections::HashSet;
use std::time::Duration;

use chrono::Local;

use trackdash_config::Config;
use trackdash_core::{LoadPhase, LocationRecord, RecordId, SessionState};

use crate::cli::{GlobalOpts, OutputFormat, WatchArgs};
use crate::commands::{locations, util};
use crate::config::{self, Connection};
use crate::error::CliError;
use crate::output;

const DEFAULT_INTERVAL: Duration = Duration::from_secs(30);

fn interval(args: &WatchArgs, cfg: &Config) -> Duration {
    args.interval
        .map(Duration::from_secs)
        .or_else(|| {
            (cfg.session.refresh_interval_secs > 0)
                .then(|| Duration::from_secs(cfg.session.refresh_interval_secs))
        })
        .unwrap_or(DEFAULT_INTERVAL)
}

/// Records on `state` whose ids were not in `seen`, oldest first as served.
fn fresh_records<'a>(state: &'a SessionState, seen: &HashSet<RecordId>) -> Vec<&'a LocationRecord> {
    state.records.iter().filter(|r| !seen.contains(&r.id)).collect()
}

fn page_ids(state: &SessionState) -> HashSet<RecordId> {
    state.records.iter().map(|r| r.id).collect()
}

/// One line per refresh in table mode.
fn refresh_line(state: &SessionState, fresh: usize) -> String {
    let stamp = Local::now().format("%H:%M:%S");
    let newest = state.records.first().map_or_else(String::new, |r| {
        format!(
            ", newest {} at {} ({:.5}, {:.5})",
            r.device_label(),
            output::local_time(r.recorded_at()),
            r.latitude,
            r.longitude
        )
    });
    format!(
        "[{stamp}] {}; {fresh} new{newest}",
        locations::showing(&state.pagination)
    )
}

pub async fn handle(
    conn: &Connection,
    cfg: &Config,
    args: WatchArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let limit = config::page_size(args.limit, &conn.backend)?;
    let period = interval(&args, cfg);
    let color = output::should_color(&global.color);
    let table = matches!(global.output, OutputFormat::Table);

    let session = conn.session(limit);
    locations::load_page(&session, util::filters(&args.filters), 1).await?;

    let initial = session.snapshot();
    output::print_output(
        &locations::render(&global.output, &initial, color, false),
        global.quiet,
    );
    output::print_status(
        &format!(
            "Refreshing every {}s; press Ctrl-C to stop",
            period.as_secs()
        ),
        global.quiet || !table,
    );

    let mut seen = page_ids(&initial);
    let mut stream = session.stream();
    let refresher = session.spawn_auto_refresh(period);

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            next = stream.changed() => {
                let Some(state) = next else { break };
                match state.phase {
                    LoadPhase::Loaded => {
                        if table {
                            let fresh = fresh_records(&state, &seen);
                            let mut lines = vec![refresh_line(&state, fresh.len())];
                            if !fresh.is_empty() {
                                let rows: Vec<_> = fresh
                                    .iter()
                                    .map(|r| locations::LocationRow::new(r, None, color))
                                    .collect();
                                lines.push(output::render_table(&rows));
                            }
                            output::print_output(&lines.join("\n"), global.quiet);
                        } else {
                            output::print_output(
                                &locations::render(&global.output, &state, color, false),
                                global.quiet,
                            );
                        }
                        seen = page_ids(&state);
                    }
                    LoadPhase::Error => {
                        let message = state.error.as_deref().unwrap_or("refresh failed");
                        eprintln!(
                            "{} {message}; showing last loaded data",
                            output::bad("refresh failed:", color)
                        );
                    }
                    LoadPhase::Idle | LoadPhase::Loading => {}
                }
            }
        }
    }

    session.close();
    if let Err(e) = refresher.await {
        tracing::warn!(error = %e, "auto-refresh task ended abnormally");
    }
    Ok(())
}
