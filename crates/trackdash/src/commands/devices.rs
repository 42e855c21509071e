//! Device listing and per-device tracker settings.

use tabled::Tabled;

use trackdash_core::{ConfigEditor, ConfigTarget, DataService, Device};

use crate::cli::{DevicesArgs, DevicesCommand, GlobalOpts, SetDeviceConfigArgs};
use crate::commands::util;
use crate::config::Connection;
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "IMEI")]
    imei: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Phone")]
    phone: String,
    #[tabled(rename = "Fixes")]
    fixes: u64,
    #[tabled(rename = "Settings")]
    settings: String,
}

impl From<&Device> for DeviceRow {
    fn from(d: &Device) -> Self {
        Self {
            imei: d.imei.clone(),
            name: d.name.clone(),
            phone: d.phone.clone().unwrap_or_default(),
            fixes: d.location_count,
            settings: match (&d.config, &d.config_error) {
                (Some(_), _) => "custom".into(),
                (None, Some(_)) => "unreadable".into(),
                (None, None) => "defaults".into(),
            },
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    conn: &Connection,
    args: DevicesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        DevicesCommand::List => {
            let pb = output::spinner("Loading devices…", &global.output, global.quiet);
            let devices = conn.client.fetch_devices().await;
            pb.finish_and_clear();
            let devices = devices?;

            let out = output::render_list(
                &global.output,
                &devices,
                |d| DeviceRow::from(d),
                |d| d.imei.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DevicesCommand::Config { imei } => {
            let mut editor = ConfigEditor::new(conn.client.clone(), ConfigTarget::Device(imei));
            let cfg = editor.load().await?;
            let out = output::render_single(
                &global.output,
                cfg,
                util::config_detail,
                util::config_plain,
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DevicesCommand::SetConfig(set) => set_config(conn, set, global).await,
    }
}

async fn set_config(
    conn: &Connection,
    args: SetDeviceConfigArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let edits = util::TimerEdits::parse(&args.values)?;
    if let Some(ref url) = args.base_url {
        url::Url::parse(url).map_err(|e| CliError::Validation {
            field: "base-url".into(),
            reason: format!("invalid URL '{url}': {e}"),
        })?;
    }

    let mut editor = ConfigEditor::new(
        conn.client.clone(),
        ConfigTarget::Device(args.imei.clone()),
    );
    editor.load().await?;

    edits.apply(&mut editor)?;
    if let Some(url) = args.base_url {
        editor.set_base_url(url)?;
    }

    if !editor.is_dirty() {
        output::print_status(
            &format!("No changes for device {}", args.imei),
            global.quiet,
        );
        return Ok(());
    }

    editor.save().await?;
    output::print_status(
        &format!("Updated settings for device {}", args.imei),
        global.quiet,
    );
    if let Some(cfg) = editor.loaded() {
        let out = output::render_single(
            &global.output,
            cfg,
            util::config_detail,
            util::config_plain,
        );
        output::print_output(&out, global.quiet);
    }
    Ok(())
}
