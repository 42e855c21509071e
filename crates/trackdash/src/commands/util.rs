//! Shared helpers for command handlers.

use trackdash_core::{
    ConfigEditor, DataService, FilterCriteria, LoadOutcome, TimerValues, TrackerConfig,
};

use crate::cli::{FilterArgs, TimerArgs};
use crate::error::CliError;

/// Build filter criteria from `--imei/--from/--to`.
pub fn filters(args: &FilterArgs) -> FilterCriteria {
    FilterCriteria {
        imei: args
            .imei
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_owned),
        start_date: args.from,
        end_date: args.to,
    }
}

/// Parse one `FIELD=VALUE` assignment.
pub fn parse_assignment(raw: &str) -> Result<(String, u32), CliError> {
    let (field, value) = raw.split_once('=').ok_or_else(|| CliError::Validation {
        field: "set".into(),
        reason: format!("expected FIELD=VALUE, got '{raw}'"),
    })?;
    let field = field.trim();
    if TimerValues::default().get(field).is_none() {
        return Err(CliError::Validation {
            field: field.into(),
            reason: format!("unknown field; expected one of {}", TimerValues::FIELDS.join(", ")),
        });
    }
    let value = value.trim().parse().map_err(|_| CliError::Validation {
        field: field.into(),
        reason: format!("'{}' is not a non-negative integer", value.trim()),
    })?;
    Ok((field.to_owned(), value))
}

/// Validated `--reset` / `--set` edits, parsed before any request is made.
#[derive(Debug)]
pub struct TimerEdits {
    reset: bool,
    assignments: Vec<(String, u32)>,
}

impl TimerEdits {
    pub fn parse(args: &TimerArgs) -> Result<Self, CliError> {
        let assignments = args
            .assignments
            .iter()
            .map(|a| parse_assignment(a))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            reset: args.reset,
            assignments,
        })
    }

    /// Apply to an editor's form.
    pub fn apply<S: DataService>(&self, editor: &mut ConfigEditor<S>) -> Result<(), CliError> {
        if self.reset {
            editor.set_values(TimerValues::default());
        }
        for (field, value) in &self.assignments {
            editor.set(field, *value)?;
        }
        Ok(())
    }
}

/// Aligned `name  value` lines for a tracker configuration.
pub fn config_detail(cfg: &TrackerConfig) -> String {
    let width = TimerValues::FIELDS
        .iter()
        .map(|f| f.len())
        .max()
        .unwrap_or(0);
    let mut lines: Vec<String> = cfg
        .values
        .iter()
        .map(|(name, value)| format!("{name:<width$}  {value}"))
        .collect();
    if let Some(ref url) = cfg.base_url {
        lines.push(format!("{:<width$}  {url}", "baseUrl"));
    }
    lines.join("\n")
}

/// `name=value` lines, for `--output plain`.
pub fn config_plain(cfg: &TrackerConfig) -> String {
    cfg.values
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Treat a superseded load as a failure: nothing else should race a
/// one-shot command.
pub fn expect_applied(outcome: LoadOutcome) -> Result<(), CliError> {
    match outcome {
        LoadOutcome::Applied => Ok(()),
        other => Err(CliError::Internal(format!(
            "location load did not complete ({other:?})"
        ))),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn assignment_parses_known_field() {
        assert_eq!(
            parse_assignment("gpsTimer=15").unwrap(),
            ("gpsTimer".to_owned(), 15)
        );
        assert_eq!(
            parse_assignment(" stopTimer = 200 ").unwrap(),
            ("stopTimer".to_owned(), 200)
        );
    }

    #[test]
    fn assignment_rejects_bad_input() {
        assert!(matches!(
            parse_assignment("gpsTimer"),
            Err(CliError::Validation { .. })
        ));
        assert!(matches!(
            parse_assignment("warpDrive=1"),
            Err(CliError::Validation { ref field, .. }) if field == "warpDrive"
        ));
        assert!(matches!(
            parse_assignment("gpsTimer=-5"),
            Err(CliError::Validation { ref field, .. }) if field == "gpsTimer"
        ));
    }

    #[test]
    fn edits_fail_fast_on_any_bad_assignment() {
        let args = TimerArgs {
            assignments: vec!["gpsTimer=10".into(), "bogus=1".into()],
            reset: false,
        };
        assert!(TimerEdits::parse(&args).is_err());
    }

    #[test]
    fn blank_imei_means_no_device_filter() {
        let args = FilterArgs {
            imei: Some("   ".into()),
            from: NaiveDate::from_ymd_opt(2024, 6, 1),
            to: None,
        };
        let f = filters(&args);
        assert_eq!(f.imei, None);
        assert_eq!(f.start_date, NaiveDate::from_ymd_opt(2024, 6, 1));
    }

    #[test]
    fn detail_lists_every_field_and_url() {
        let cfg = TrackerConfig {
            id: Some(1),
            values: TimerValues::default(),
            base_url: Some("https://tracking.example.com".into()),
        };
        let out = config_detail(&cfg);
        assert_eq!(out.lines().count(), TimerValues::FIELDS.len() + 1);
        assert!(out.contains("liveStatusUpdateTimer  30"));
        assert!(out.ends_with("https://tracking.example.com"));
    }
}
