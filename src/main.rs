//! Purpose: `deco-export` CLI entry point.
//! Role: Binary crate root; parses args, runs commands, emits JSON on stdout.
//! Invariants: Commands emit a single JSON summary on stdout.
//! Invariants: Non-interactive errors and notices are emitted as JSON on stderr.
//! Invariants: Process exit code is derived from `api::to_exit_code`.
//! Invariants: Per-slot decode failures become notices; only whole-run failures exit non-zero.
#![allow(clippy::result_large_err)]
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use clap::{
    CommandFactory, Parser, Subcommand, ValueEnum, ValueHint, error::ErrorKind as ClapErrorKind,
};
use clap_complete::aot::Shell;
use deco_export::api::{
    Catalog, DecodeOutcome, Error, ErrorKind, Exporter, RegionLayout, SaveBuffer, SlotExport,
    SlotStatus, inventory_json, issue_json, slot_json, to_exit_code,
};
use deco_export::notice::{Notice, notice_json};
use serde_json::{Map, Value, json};
use std::error::Error as StdError;
use tracing_subscriber::EnvFilter;

mod command_dispatch;

#[derive(Copy, Clone, Debug)]
struct RunOutcome {
    exit_code: i32,
}

impl RunOutcome {
    fn ok() -> Self {
        Self { exit_code: 0 }
    }

    fn with_code(exit_code: i32) -> Self {
        Self { exit_code }
    }
}

fn main() {
    let exit_code = match run() {
        Ok(outcome) => outcome.exit_code,
        Err((err, color_mode)) => {
            emit_error(&err, color_mode);
            to_exit_code(err.kind())
        }
    };
    std::process::exit(exit_code);
}

fn run() -> Result<RunOutcome, (Error, ColorMode)> {
    let cli = match Cli::try_parse_from(std::env::args_os()) {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ClapErrorKind::DisplayHelp
            | ClapErrorKind::DisplayVersion
            | ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                err.print().map_err(|io_err| {
                    (
                        Error::new(ErrorKind::Io)
                            .with_message("failed to write help")
                            .with_source(io_err),
                        ColorMode::Auto,
                    )
                })?;
                let exit_code = if matches!(
                    err.kind(),
                    ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
                ) {
                    2
                } else {
                    0
                };
                return Ok(RunOutcome::with_code(exit_code));
            }
            _ => {
                let message = clap_error_summary(&err);
                let hint = clap_error_hint(&err);
                return Err((
                    Error::new(ErrorKind::Usage)
                        .with_message(message)
                        .with_hint(hint),
                    ColorMode::Auto,
                ));
            }
        },
    };

    init_tracing(cli.verbose);
    let color_mode = cli.color;

    command_dispatch::dispatch_command(cli.command, color_mode)
        .map_err(add_io_hint)
        .map_err(|err| (err, color_mode))
}

#[derive(Parser)]
#[command(
    name = "deco-export",
    version,
    about = "Export decoration inventories from decrypted saves to planner formats",
    long_about = None,
    after_help = r#"EXAMPLES
  $ deco-export export save.dec --catalog catalog.json
  $ deco-export export save.dec --catalog catalog.json --lang japanese --out-dir out
  $ deco-export inspect save.dec --catalog catalog.json --slot 1

NOTES
  The save must already be decrypted. Unequip all decorations first;
  equipped decorations are not part of the inventory region."#,
    arg_required_else_help = true
)]
struct Cli {
    #[arg(
        long,
        global = true,
        default_value = "auto",
        value_enum,
        help = "Colorize stderr diagnostics: auto|always|never"
    )]
    color: ColorMode,
    #[arg(long, short, global = true, help = "Log decode details to stderr")]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum ColorMode {
    Auto,
    Always,
    Never,
}

impl ColorMode {
    fn use_color(self, is_tty: bool) -> bool {
        match self {
            ColorMode::Auto => is_tty,
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    #[command(
        about = "Write one file per schema and save slot",
        long_about = r#"Decode every save slot and write each catalog schema's payload.

Slots that are empty or fail validation still get an (empty) file and a notice on stderr."#
    )]
    Export {
        #[arg(help = "Decrypted save file", value_hint = ValueHint::FilePath)]
        save: PathBuf,
        #[arg(long, help = "Catalog JSON with item names and schemas", value_hint = ValueHint::FilePath)]
        catalog: PathBuf,
        #[arg(long, default_value = ".", help = "Directory for output files", value_hint = ValueHint::DirPath)]
        out_dir: PathBuf,
        #[arg(long, help = "Label set for keyed schemas (e.g. japanese)")]
        lang: Option<String>,
        #[arg(long = "offset", help = "Region byte offset; repeat per slot (default: the three save slots)")]
        offsets: Vec<usize>,
    },
    #[command(about = "Print decoded decoration counts per slot")]
    Inspect {
        #[arg(help = "Decrypted save file", value_hint = ValueHint::FilePath)]
        save: PathBuf,
        #[arg(long, help = "Catalog JSON with item names and schemas", value_hint = ValueHint::FilePath)]
        catalog: PathBuf,
        #[arg(long, help = "Only this 1-based slot; an invalid region is an error")]
        slot: Option<usize>,
        #[arg(long, help = "Include unnamed and zero-count items")]
        all: bool,
        #[arg(long = "offset", help = "Region byte offset; repeat per slot (default: the three save slots)")]
        offsets: Vec<usize>,
    },
    #[command(about = "Print a shell completion script")]
    Completion {
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "error" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

fn layout_with_offsets(offsets: Vec<usize>) -> RegionLayout {
    let layout = RegionLayout::default();
    if offsets.is_empty() {
        layout
    } else {
        layout.with_offsets(offsets)
    }
}

/// Maps `--lang` to a label set; any value ending in `japanese` selects `japanese`.
fn normalize_lang(lang: Option<String>) -> Option<String> {
    let lang = lang?.trim().to_string();
    if lang.is_empty() {
        return None;
    }
    if lang.ends_with("japanese") {
        return Some("japanese".to_string());
    }
    Some(lang)
}

fn load_exporter(
    catalog: &Path,
    offsets: Vec<usize>,
    lang: Option<String>,
) -> Result<Exporter, Error> {
    let layout = layout_with_offsets(offsets);
    layout.validate()?;
    let catalog = Catalog::load(catalog, &layout)?;
    Ok(Exporter::new(catalog, layout)?.with_lang(normalize_lang(lang)))
}

fn write_output(path: &Path, contents: &str) -> Result<(), Error> {
    std::fs::write(path, contents).map_err(|err| {
        Error::new(ErrorKind::Io)
            .with_message("failed to write output file")
            .with_path(path)
            .with_source(err)
    })
}

/// Writes every schema file for one slot; non-exported slots get empty files.
fn write_slot_files(
    exporter: &Exporter,
    out_dir: &Path,
    export: &SlotExport,
) -> Result<Vec<String>, Error> {
    let mut files = Vec::new();
    for schema in exporter.catalog().schemas() {
        let name = schema.output_name(export.slot);
        let contents = export
            .payloads()
            .iter()
            .find(|payload| payload.schema == schema.id())
            .map(|payload| format!("{}\n", payload.text))
            .unwrap_or_default();
        let path = out_dir.join(&name);
        write_output(&path, &contents)?;
        tracing::debug!(path = %path.display(), bytes = contents.len(), "output written");
        files.push(name);
    }
    Ok(files)
}

fn slot_notice(cmd: &str, export: &SlotExport) -> Option<Notice> {
    let (kind, message, details) = match &export.status {
        SlotStatus::Exported(_) => return None,
        SlotStatus::Empty => (
            "slot_empty",
            format!("slot {} has no decorations; output left empty", export.slot),
            Map::new(),
        ),
        SlotStatus::Invalid(issue) => {
            let details = match issue_json(issue) {
                Value::Object(map) => map,
                _ => Map::new(),
            };
            (
                "slot_invalid",
                format!("slot {} skipped: {}", export.slot, issue.message()),
                details,
            )
        }
    };
    Some(Notice {
        kind: kind.to_string(),
        time: notice_time_now().unwrap_or_default(),
        cmd: cmd.to_string(),
        slot: Some(export.slot),
        message,
        details,
    })
}

fn reminder_notice(cmd: &str) -> Notice {
    Notice {
        kind: "reminder".to_string(),
        time: notice_time_now().unwrap_or_default(),
        cmd: cmd.to_string(),
        slot: None,
        message: "unequip all decorations before exporting, otherwise counts will be wrong"
            .to_string(),
        details: Map::new(),
    }
}

fn inspect_slot_json(
    exporter: &Exporter,
    slot: usize,
    offset: usize,
    outcome: &DecodeOutcome,
    all: bool,
) -> Value {
    let mut map = Map::new();
    map.insert("slot".to_string(), json!(slot));
    map.insert("offset".to_string(), json!(offset));
    map.insert("status".to_string(), json!(outcome.status_label()));
    match outcome {
        DecodeOutcome::Decoded(table) => {
            map.insert(
                "items".to_string(),
                inventory_json(&exporter.inventory(table, all)),
            );
        }
        DecodeOutcome::Empty => {
            map.insert("items".to_string(), json!([]));
        }
        DecodeOutcome::Invalid(issue) => {
            map.insert("issue".to_string(), issue_json(issue));
        }
    }
    Value::Object(map)
}

fn emit_json(value: Value) {
    let pretty = io::stdout().is_terminal();
    let json = if pretty {
        serde_json::to_string_pretty(&value)
    } else {
        serde_json::to_string(&value)
    }
    .unwrap_or_else(|_| "{\"error\":\"json encode failed\"}".to_string());
    println!("{json}");
}

#[derive(Copy, Clone, Debug)]
enum AnsiColor {
    Red,
    Yellow,
}

fn colorize_label(label: &str, enabled: bool, color: AnsiColor) -> String {
    if !enabled {
        return label.to_string();
    }
    let code = match color {
        AnsiColor::Red => "31",
        AnsiColor::Yellow => "33",
    };
    format!("\x1b[{code}m{label}\x1b[0m")
}

fn emit_error(err: &Error, color_mode: ColorMode) {
    let is_tty = io::stderr().is_terminal();
    if is_tty {
        eprintln!("{}", error_text(err, color_mode.use_color(is_tty)));
        return;
    }

    let value = error_json(err);
    let json = serde_json::to_string(&value).unwrap_or_else(|_| {
        "{\"error\":{\"kind\":\"Internal\",\"message\":\"json encode failed\"}}".to_string()
    });
    eprintln!("{json}");
}

fn notice_time_now() -> Option<String> {
    use time::format_description::well_known::Rfc3339;
    let duration = SystemTime::now().duration_since(UNIX_EPOCH).ok()?;
    let ts = time::OffsetDateTime::from_unix_timestamp_nanos(duration.as_nanos() as i128).ok()?;
    ts.format(&Rfc3339).ok()
}

fn emit_notice(notice: &Notice, color_mode: ColorMode) {
    let is_tty = io::stderr().is_terminal();
    if is_tty {
        let label = colorize_label("notice:", color_mode.use_color(is_tty), AnsiColor::Yellow);
        eprintln!("{label} {}", notice.message);
        return;
    }

    let value = notice_json(notice);
    let json = serde_json::to_string(&value).unwrap_or_else(|_| {
        "{\"notice\":{\"kind\":\"Internal\",\"message\":\"json encode failed\"}}".to_string()
    });
    eprintln!("{json}");
}

fn error_message(err: &Error) -> String {
    if let Some(message) = err.message() {
        return message.to_string();
    }
    match err.kind() {
        ErrorKind::Internal => "internal error".to_string(),
        ErrorKind::Usage => "usage error".to_string(),
        ErrorKind::NotFound => "not found".to_string(),
        ErrorKind::Corrupt => "corrupt data".to_string(),
        ErrorKind::Config => "invalid configuration".to_string(),
        ErrorKind::Io => "i/o error".to_string(),
    }
}

fn error_causes(err: &Error) -> Vec<String> {
    let mut causes = Vec::new();
    let mut cur = err.source();
    while let Some(source) = cur {
        causes.push(source.to_string());
        cur = source.source();
    }
    causes
}

fn error_json(err: &Error) -> Value {
    let mut inner = Map::new();
    inner.insert("kind".to_string(), json!(format!("{:?}", err.kind())));
    inner.insert("message".to_string(), json!(error_message(err)));
    if let Some(hint) = err.hint() {
        inner.insert("hint".to_string(), json!(hint));
    }
    if let Some(path) = err.path() {
        inner.insert("path".to_string(), json!(path.display().to_string()));
    }
    if let Some(offset) = err.offset() {
        inner.insert("offset".to_string(), json!(offset));
    }
    if let Some(index) = err.index() {
        inner.insert("index".to_string(), json!(index));
    }
    let causes = error_causes(err);
    if !causes.is_empty() {
        inner.insert("causes".to_string(), json!(causes));
    }

    let mut outer = Map::new();
    outer.insert("error".to_string(), Value::Object(inner));
    Value::Object(outer)
}

fn error_text(err: &Error, use_color: bool) -> String {
    let mut lines = Vec::new();
    lines.push(format!(
        "{} {}",
        colorize_label("error:", use_color, AnsiColor::Red),
        error_message(err)
    ));

    if let Some(hint) = err.hint() {
        lines.push(format!(
            "{} {hint}",
            colorize_label("hint:", use_color, AnsiColor::Yellow)
        ));
    }
    if let Some(path) = err.path() {
        lines.push(format!(
            "{} {}",
            colorize_label("path:", use_color, AnsiColor::Yellow),
            path.display()
        ));
    }
    if let Some(offset) = err.offset() {
        lines.push(format!(
            "{} {offset}",
            colorize_label("offset:", use_color, AnsiColor::Yellow)
        ));
    }

    let causes = error_causes(err);
    if let Some(cause) = causes.first() {
        lines.push(format!(
            "{} {cause}",
            colorize_label("caused by:", use_color, AnsiColor::Yellow)
        ));
    }

    lines.join("\n")
}

fn add_io_hint(err: Error) -> Error {
    if err.kind() != ErrorKind::Io || err.hint().is_some() {
        return err;
    }
    err.with_hint("Check the path exists and is readable/writable.")
}

fn clap_error_summary(err: &clap::Error) -> String {
    for line in err.to_string().lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Some(rest) = trimmed.strip_prefix("error:") {
            return rest.trim().to_string();
        }
        return trimmed.to_string();
    }
    "invalid arguments".to_string()
}

fn clap_error_hint(err: &clap::Error) -> String {
    let rendered = err.to_string();
    let usage = rendered
        .lines()
        .find_map(|line| line.trim().strip_prefix("Usage: "))
        .map(str::trim);

    let Some(usage) = usage else {
        return "Try `deco-export --help`.".to_string();
    };

    let tokens: Vec<&str> = usage.split_whitespace().collect();
    let Some(pos) = tokens.iter().position(|t| *t == "deco-export") else {
        return "Try `deco-export --help`.".to_string();
    };

    let parts: Vec<&str> = tokens
        .iter()
        .skip(pos + 1)
        .take_while(|token| {
            !(token.starts_with('-') || token.starts_with('<') || token.starts_with('['))
        })
        .copied()
        .collect();

    if parts.is_empty() {
        return "Try `deco-export --help`.".to_string();
    }
    format!("Try `deco-export {} --help`.", parts.join(" "))
}

#[cfg(test)]
mod tests {
    use super::{layout_with_offsets, normalize_lang};
    use deco_export::api::SAVE_SLOT_OFFSETS;

    #[test]
    fn lang_suffix_selects_japanese() {
        assert_eq!(
            normalize_lang(Some("--japanese".to_string())),
            Some("japanese".to_string())
        );
        assert_eq!(normalize_lang(Some("  ".to_string())), None);
        assert_eq!(normalize_lang(Some("en".to_string())), Some("en".to_string()));
        assert_eq!(normalize_lang(None), None);
    }

    #[test]
    fn offsets_default_to_save_slots() {
        assert_eq!(layout_with_offsets(Vec::new()).offsets, SAVE_SLOT_OFFSETS.to_vec());
        assert_eq!(layout_with_offsets(vec![8]).offsets, vec![8]);
    }
}
