//! Purpose: Hold top-level CLI command dispatch for `deco-export`.
//! Exports: `dispatch_command`.
//! Role: Keep `main.rs` focused on parse/bootstrap and delegate command execution.
//! Invariants: Every configured slot is processed even when an earlier slot fails.
//! Invariants: Helpers in `main.rs` remain the source of formatting and notice logic.

use super::*;

pub(super) fn dispatch_command(
    command: Command,
    color_mode: ColorMode,
) -> Result<RunOutcome, Error> {
    match command {
        Command::Completion { shell } => {
            let mut cmd = Cli::command();
            clap_complete::aot::generate(shell, &mut cmd, "deco-export", &mut io::stdout());
            Ok(RunOutcome::ok())
        }
        Command::Export {
            save,
            catalog,
            out_dir,
            lang,
            offsets,
        } => {
            let exporter = load_exporter(&catalog, offsets, lang)?;
            let buffer = SaveBuffer::open(&save)?;
            std::fs::create_dir_all(&out_dir).map_err(|err| {
                Error::new(ErrorKind::Io)
                    .with_message("failed to create output directory")
                    .with_path(&out_dir)
                    .with_source(err)
            })?;

            emit_notice(&reminder_notice("export"), color_mode);

            let exports = exporter.export_buffer(&buffer);
            let mut slots = Vec::with_capacity(exports.len());
            for export in &exports {
                if let Some(notice) = slot_notice("export", export) {
                    emit_notice(&notice, color_mode);
                }
                let files = write_slot_files(&exporter, &out_dir, export)?;
                slots.push(slot_json(export, &files));
            }

            emit_json(json!({
                "save": save.display().to_string(),
                "out_dir": out_dir.display().to_string(),
                "slots": slots,
            }));

            let any_exported = exports
                .iter()
                .any(|export| matches!(export.status, SlotStatus::Exported(_)));
            let any_invalid = exports
                .iter()
                .any(|export| matches!(export.status, SlotStatus::Invalid(_)));
            let exit_code = if !any_exported && any_invalid {
                to_exit_code(ErrorKind::Corrupt)
            } else {
                0
            };
            Ok(RunOutcome::with_code(exit_code))
        }
        Command::Inspect {
            save,
            catalog,
            slot,
            all,
            offsets,
        } => {
            let exporter = load_exporter(&catalog, offsets, None)?;
            let buffer = SaveBuffer::open(&save)?;
            let layout = exporter.layout();

            let values = if let Some(slot) = slot {
                let outcome = exporter.decode_slot(&buffer, slot).ok_or_else(|| {
                    Error::new(ErrorKind::Usage)
                        .with_message(format!("slot {slot} is not configured"))
                        .with_hint(format!(
                            "Choose a slot between 1 and {}.",
                            layout.offsets.len()
                        ))
                })?;
                let offset = layout.offsets[slot - 1];
                if let DecodeOutcome::Invalid(issue) = outcome {
                    return Err(issue.into_error(offset).with_path(&save));
                }
                vec![inspect_slot_json(&exporter, slot, offset, &outcome, all)]
            } else {
                layout
                    .offsets
                    .iter()
                    .enumerate()
                    .filter_map(|(idx, &offset)| {
                        let slot = idx + 1;
                        let outcome = exporter.decode_slot(&buffer, slot)?;
                        Some(inspect_slot_json(&exporter, slot, offset, &outcome, all))
                    })
                    .collect()
            };

            emit_json(json!({ "slots": values }));
            Ok(RunOutcome::ok())
        }
    }
}
