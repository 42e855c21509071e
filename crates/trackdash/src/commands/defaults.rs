//! Default tracker settings.

use trackdash_core::{ConfigEditor, ConfigTarget};

use crate::cli::{DefaultsArgs, DefaultsCommand, GlobalOpts};
use crate::commands::util;
use crate::config::Connection;
use crate::error::CliError;
use crate::output;

pub async fn handle(
    conn: &Connection,
    args: DefaultsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let mut editor = ConfigEditor::new(conn.client.clone(), ConfigTarget::Defaults);

    match args.command {
        DefaultsCommand::Show => {
            let cfg = editor.load().await?;
            let out = output::render_single(
                &global.output,
                cfg,
                util::config_detail,
                util::config_plain,
            );
            output::print_output(&out, global.quiet);
        }

        DefaultsCommand::Set(values) => {
            let edits = util::TimerEdits::parse(&values)?;
            editor.load().await?;
            edits.apply(&mut editor)?;

            if !editor.is_dirty() {
                output::print_status("No changes to the default settings", global.quiet);
                return Ok(());
            }

            editor.save().await?;
            output::print_status("Updated the default settings", global.quiet);
            if let Some(cfg) = editor.loaded() {
                let out = output::render_single(
                    &global.output,
                    cfg,
                    util::config_detail,
                    util::config_plain,
                );
                output::print_output(&out, global.quiet);
            }
        }
    }
    Ok(())
}
