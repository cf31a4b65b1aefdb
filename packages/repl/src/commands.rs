//! REPL command parsing and execution.
//!
//! Commands:
//! - `list` - Overview of all eight slots
//! - `show [n]` - Details of the selected slot (or slot n)
//! - `select <n>`, `next`, `prev` - Change the selected slot
//! - `set <field> <value>` - Edit a field of the selected slot
//! - `dump <file>` / `load <file>` - Snapshot files
//! - `apply` / `discard` - Commit or drop the pending draft
//! - `connect <url|memory>`, `disconnect`, `status` - Device session
//! - `help` - Show help
//! - `exit` - Exit the REPL

use std::path::Path;

use nu_ansi_term::{Color, Style};

use outbreak_core::{Axis, Error, FieldKind, Outbreak, OutbreakView, PointKind, SlotIndex};
use outbreak_snapshot::{dump_to_file, load_from_file, Draft, DraftSource};
use outbreak_sync::SpeciesChange;

use crate::context::EditorContext;

/// Result of executing a command
#[derive(Debug)]
pub enum CommandResult {
    /// Command succeeded, optionally with output to display
    Ok { display: Option<String> },
    /// Command failed with an error message
    Error(String),
    /// User requested to exit
    Exit,
    /// Show help
    Help,
}

impl CommandResult {
    fn ok_display(display: impl Into<String>) -> Self {
        CommandResult::Ok {
            display: Some(display.into()),
        }
    }

    fn ok_none() -> Self {
        CommandResult::Ok { display: None }
    }
}

/// Message shown when a device write was refused.
pub const DISCONNECTED: &str = "Device disconnected.";

/// Parse and execute a command
pub fn execute(input: &str, ctx: &mut EditorContext) -> CommandResult {
    let input = input.trim();
    if input.is_empty() {
        return CommandResult::ok_none();
    }

    let mut parts = input.splitn(2, char::is_whitespace);
    let command = parts.next().unwrap_or("");
    let args = parts.next().unwrap_or("").trim();

    match command.to_lowercase().as_str() {
        "help" | "?" => CommandResult::Help,
        "exit" | "quit" | "q" => CommandResult::Exit,
        "list" | "ls" => cmd_list(ctx),
        "show" => cmd_show(args, ctx),
        "select" | "sel" => cmd_select(args, ctx),
        "next" | "n" => cmd_step(true, ctx),
        "prev" | "p" => cmd_step(false, ctx),
        "set" => cmd_set(args, ctx),
        "dump" => cmd_dump(args, ctx),
        "load" => cmd_load(args, ctx),
        "apply" => cmd_apply(ctx),
        "discard" => cmd_discard(ctx),
        "connect" => cmd_connect(args, ctx),
        "disconnect" => cmd_disconnect(ctx),
        "status" => cmd_status(ctx),
        _ => CommandResult::Error(format!(
            "Unknown command: '{}'. Type 'help' for available commands.",
            command
        )),
    }
}

/// Format help text
pub fn format_help() -> String {
    let cmd_style = Style::new().bold().fg(Color::Cyan);
    let arg_style = Style::new().fg(Color::Yellow);
    let desc_style = Style::new().fg(Color::White);

    let mut help = String::new();
    help.push_str(&format!(
        "{}\n\n",
        Style::new().bold().paint("Outbreak Editor Commands")
    ));

    let commands = [
        ("list", "", "Overview of all slots (alias: ls)"),
        ("show", "[n]", "Show the selected slot, or slot n"),
        ("select", "<n>", "Select slot 1-8 (alias: sel)"),
        ("next", "", "Select the next slot (alias: n)"),
        ("prev", "", "Select the previous slot (alias: p)"),
        ("set", "<field> <value>", "Edit a field of the selected slot"),
        ("", "", ""),
        ("dump", "<file>", "Write the selected slot to a snapshot file"),
        ("load", "<file>", "Stage a snapshot file as a draft"),
        ("apply", "", "Commit the pending draft"),
        ("discard", "", "Drop the pending draft"),
        ("", "", ""),
        ("connect", "<url|memory>", "Connect to a device bridge or a simulated device"),
        ("disconnect", "", "Close the device session"),
        ("status", "", "Show session and draft state"),
        ("", "", ""),
        ("help", "", "Show this help message"),
        ("exit", "", "Exit the REPL (alias: quit, q)"),
    ];

    for (cmd, args, desc) in commands {
        if cmd.is_empty() {
            help.push('\n');
        } else {
            help.push_str(&format!(
                "  {:<12} {:<20} {}\n",
                cmd_style.paint(cmd),
                arg_style.paint(args),
                desc_style.paint(desc)
            ));
        }
    }

    help.push_str(&format!("\n{}\n", Style::new().bold().paint("Fields")));
    help.push_str(&format!(
        "  {}\n",
        arg_style.paint("species form max defeated enabled found")
    ));
    help.push_str(&format!(
        "  {}\n",
        arg_style.paint("center.x center.y center.z dummy.x dummy.y dummy.z")
    ));

    help.push_str(&format!(
        "\n{}",
        Style::new()
            .italic()
            .paint("Species are national numbers. Changing species may offer curated defaults; 'apply' takes them, 'discard' keeps the plain change.")
    ));

    help
}

fn cmd_list(ctx: &EditorContext) -> CommandResult {
    let mut output = format!(
        "{}\n",
        Style::new().bold().paint(format!(
            "  {:<5} {:<8} {:<5} {:<10} {:<8} {:<6}",
            "slot", "species", "form", "defeated", "enabled", "found"
        ))
    );

    for record in ctx.store().iter() {
        let view = record.view();
        let marker = if view.slot == ctx.selected() { ">" } else { " " };
        let line = format!(
            "{} {:<5} {:<8} {:<5} {:<10} {:<8} {:<6}",
            marker,
            view.slot.get(),
            ctx.species().to_national(view.species),
            view.form,
            format!("{}/{}", view.num_defeated, view.max_spawns),
            yes_no(view.enabled),
            yes_no(view.found),
        );
        if view.enabled {
            output.push_str(&line);
        } else {
            output.push_str(&Color::DarkGray.paint(line).to_string());
        }
        output.push('\n');
    }

    CommandResult::ok_display(output.trim_end())
}

fn cmd_show(args: &str, ctx: &EditorContext) -> CommandResult {
    let slot = if args.is_empty() {
        ctx.selected()
    } else {
        match parse_slot(args) {
            Ok(slot) => slot,
            Err(result) => return result,
        }
    };

    let mut output = format_record(ctx, ctx.store().slot(slot));
    if slot == ctx.selected() {
        let anchor = match ctx.anchor() {
            Some(point) => point.to_string(),
            None => Color::DarkGray.paint("unset").to_string(),
        };
        output.push_str(&format!("\n  {:<12} {}", "map anchor", anchor));
    }
    if let Some(draft) = ctx.pending() {
        if draft.origin().slot() == slot {
            output.push('\n');
            output.push_str(&format_draft(ctx, draft));
        }
    }

    CommandResult::ok_display(output)
}

fn cmd_select(args: &str, ctx: &mut EditorContext) -> CommandResult {
    if args.is_empty() {
        return CommandResult::Error("Usage: select <1-8>".to_string());
    }
    let slot = match parse_slot(args) {
        Ok(slot) => slot,
        Err(result) => return result,
    };
    match ctx.select(i64::from(slot.get())) {
        Ok(()) => CommandResult::ok_display(format!("Slot {}", ctx.selected())),
        Err(e) => CommandResult::Error(e.to_string()),
    }
}

fn cmd_step(forward: bool, ctx: &mut EditorContext) -> CommandResult {
    if ctx.step(forward) {
        CommandResult::ok_display(format!("Slot {}", ctx.selected()))
    } else {
        CommandResult::Error(format!("Already at slot {}", ctx.selected()))
    }
}

fn cmd_set(args: &str, ctx: &mut EditorContext) -> CommandResult {
    let Some((field, value)) = args.split_once(char::is_whitespace) else {
        return CommandResult::Error(
            "Usage: set <field> <value>. Type 'help' for field names.".to_string(),
        );
    };
    let (field, value) = (field.trim(), value.trim());
    let slot = ctx.selected();

    // center.x, dummy.z, ...
    if let Some((point, axis)) = field.split_once('.') {
        let (kind, axis) = match (parse_point(point), parse_axis(axis)) {
            (Some(kind), Some(axis)) => (kind, axis),
            _ => {
                return CommandResult::Error(
                    Error::UnknownField {
                        name: field.to_string(),
                    }
                    .to_string(),
                )
            }
        };
        let result = ctx.engine().set_coordinate(slot, kind, axis, value);
        return match result {
            Ok(()) => {
                ctx.refresh_anchor();
                show_selected(ctx)
            }
            Err(e @ Error::InvalidCoordinateInput { .. }) => {
                ctx.clear_anchor();
                CommandResult::Error(e.to_string())
            }
            Err(e) => report(e),
        };
    }

    let kind = match field.parse::<FieldKind>() {
        Ok(kind) => kind,
        Err(e) => return CommandResult::Error(e.to_string()),
    };

    let result = match kind {
        FieldKind::Species => return set_species(value, ctx),
        FieldKind::Form => parse_number::<u8>(field, value)
            .and_then(|form| ctx.engine().set_form(slot, form).map_err(report)),
        FieldKind::MaxSpawns => parse_number::<i32>(field, value)
            .and_then(|max| ctx.engine().set_max_spawns(slot, max).map_err(report)),
        FieldKind::NumDefeated => parse_number::<i32>(field, value)
            .and_then(|n| ctx.engine().set_num_defeated(slot, n).map_err(report)),
        FieldKind::Enabled => parse_flag(field, value)
            .and_then(|on| ctx.engine().set_enabled(slot, on).map_err(report)),
        FieldKind::Found => parse_flag(field, value)
            .and_then(|on| ctx.engine().set_found(slot, on).map_err(report)),
        FieldKind::CenterPosition | FieldKind::DummyPosition => {
            return CommandResult::Error(format!(
                "Set one coordinate at a time, e.g. 'set {}.x 120.5'",
                field
            ))
        }
    };

    match result {
        Ok(()) => show_selected(ctx),
        Err(result) => result,
    }
}

fn set_species(value: &str, ctx: &mut EditorContext) -> CommandResult {
    let national = match parse_number::<u16>("species", value) {
        Ok(n) => n,
        Err(result) => return result,
    };
    let Some(species) = ctx.species().to_internal(national) else {
        return CommandResult::Error(format!("Unknown species: {}", national));
    };

    let slot = ctx.selected();
    let catalog = ctx.defaults();
    let outcome = ctx.engine().change_species(slot, species, &*catalog);

    match outcome {
        Ok(SpeciesChange::Committed) => show_selected(ctx),
        Ok(SpeciesChange::DefaultOffered(draft)) => stage_draft(
            ctx,
            draft,
            "Curated defaults exist for this species. 'apply' to use them, 'discard' to change only the species.",
        ),
        Err(e) => report(e),
    }
}

fn cmd_dump(args: &str, ctx: &EditorContext) -> CommandResult {
    if args.is_empty() {
        return CommandResult::Error("Usage: dump <file>".to_string());
    }
    let record = ctx.selected_record();
    match dump_to_file(ctx.codec(), record, Path::new(args)) {
        Ok(()) => CommandResult::ok_display(format!("Wrote slot {} to {}", record.slot(), args)),
        Err(e) => CommandResult::Error(e.to_string()),
    }
}

fn cmd_load(args: &str, ctx: &mut EditorContext) -> CommandResult {
    if args.is_empty() {
        return CommandResult::Error("Usage: load <file>".to_string());
    }
    match load_from_file(ctx.codec(), ctx.selected_record(), Path::new(args)) {
        Ok(draft) => stage_draft(ctx, draft, "'apply' to commit, 'discard' to drop."),
        Err(e) => CommandResult::Error(e.to_string()),
    }
}

fn cmd_apply(ctx: &mut EditorContext) -> CommandResult {
    let Some(draft) = ctx.take_pending() else {
        return CommandResult::Error("No pending draft".to_string());
    };
    let result = ctx.engine().commit(&draft);
    if draft.origin().slot() == ctx.selected() {
        ctx.refresh_anchor();
    }
    match result {
        Ok(()) => CommandResult::ok_display(format!("Applied to slot {}", draft.origin().slot())),
        // Out-of-range values abort before anything changes.
        Err(e @ (Error::InvalidForm { .. } | Error::InvalidValue { .. })) => {
            ctx.stage(draft);
            CommandResult::Error(e.to_string())
        }
        Err(e) => report(e),
    }
}

fn cmd_discard(ctx: &mut EditorContext) -> CommandResult {
    let Some(draft) = ctx.take_pending() else {
        return CommandResult::Error("No pending draft".to_string());
    };
    match draft.source() {
        DraftSource::Defaults { species } => {
            let slot = draft.origin().slot();
            match ctx.engine().set_species(slot, *species) {
                Ok(()) => CommandResult::ok_display(format!(
                    "Discarded defaults; slot {} species set to {}",
                    slot,
                    ctx.species().to_national(*species)
                )),
                Err(e) => report(e),
            }
        }
        _ => CommandResult::ok_display("Discarded draft"),
    }
}

fn cmd_connect(args: &str, ctx: &mut EditorContext) -> CommandResult {
    if args.is_empty() {
        return CommandResult::Error("Usage: connect <url|memory>".to_string());
    }
    match ctx.connect(args) {
        Ok(()) => CommandResult::ok_display(format!(
            "{} {}",
            Color::Green.paint("Connected to"),
            args
        )),
        Err(e) => CommandResult::Error(format!("Failed to connect to '{}': {}", args, e)),
    }
}

fn cmd_disconnect(ctx: &mut EditorContext) -> CommandResult {
    if !ctx.session().is_connected() {
        return CommandResult::ok_display("Not connected");
    }
    ctx.disconnect();
    CommandResult::ok_display("Disconnected")
}

fn cmd_status(ctx: &EditorContext) -> CommandResult {
    let session = match ctx.session().label() {
        Some(label) => format!("{} {}", Color::Green.paint("connected"), label),
        None => Color::Yellow.paint("offline").to_string(),
    };
    let draft = match ctx.pending() {
        Some(draft) => format!(
            "slot {} from {}",
            draft.origin().slot(),
            describe_source(ctx, draft.source())
        ),
        None => "none".to_string(),
    };
    CommandResult::ok_display(format!(
        "  {:<10} {}\n  {:<10} {}\n  {:<10} {}\n  {:<10} {}",
        "session",
        session,
        "selected",
        ctx.selected(),
        "enabled",
        ctx.store().enabled_count(),
        "draft",
        draft
    ))
}

// === Helpers ===

/// Turn an engine error into a command result.
fn report(e: Error) -> CommandResult {
    if e.is_disconnect() {
        CommandResult::Error(format!("{}\n  {}", DISCONNECTED, e))
    } else {
        CommandResult::Error(e.to_string())
    }
}

/// Stage `draft` for `apply`, naming any draft it replaces.
fn stage_draft(ctx: &mut EditorContext, draft: Draft, hint: &str) -> CommandResult {
    let mut output = format_draft(ctx, &draft);
    if let Some(old) = ctx.stage(draft) {
        output.push_str(&format!(
            "\n{}",
            Color::Yellow.paint(format!(
                "Replaced the pending draft for slot {} from {}.",
                old.origin().slot(),
                describe_source(ctx, old.source())
            ))
        ));
    }
    output.push_str(&format!("\n{}", Color::Cyan.paint(hint)));
    CommandResult::ok_display(output)
}

fn show_selected(ctx: &EditorContext) -> CommandResult {
    CommandResult::ok_display(format_record(ctx, ctx.selected_record()))
}

fn parse_slot(text: &str) -> Result<SlotIndex, CommandResult> {
    let text = text.trim();
    let index = text
        .parse::<i64>()
        .map_err(|_| CommandResult::Error(format!("Invalid slot: '{}' (expected 1-8)", text)))?;
    SlotIndex::new(index).map_err(|e| CommandResult::Error(e.to_string()))
}

fn parse_number<T: std::str::FromStr>(field: &str, text: &str) -> Result<T, CommandResult> {
    text.parse::<T>()
        .map_err(|_| CommandResult::Error(format!("Invalid value for {}: '{}'", field, text)))
}

fn parse_flag(field: &str, text: &str) -> Result<bool, CommandResult> {
    match text.to_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Ok(true),
        "false" | "off" | "no" | "0" => Ok(false),
        _ => Err(CommandResult::Error(format!(
            "Invalid value for {}: '{}' (expected true or false)",
            field, text
        ))),
    }
}

fn parse_point(text: &str) -> Option<PointKind> {
    match text.to_lowercase().as_str() {
        "center" | "center_pos" => Some(PointKind::Center),
        "dummy" | "dummy_pos" => Some(PointKind::Dummy),
        _ => None,
    }
}

fn parse_axis(text: &str) -> Option<Axis> {
    Axis::ALL
        .into_iter()
        .find(|axis| axis.name().eq_ignore_ascii_case(text))
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

fn format_point(point: Option<outbreak_core::Point3>) -> String {
    match point {
        Some(point) => point.to_string(),
        None => Color::DarkGray.paint("none").to_string(),
    }
}

fn format_record(ctx: &EditorContext, record: &Outbreak) -> String {
    let OutbreakView {
        slot,
        species,
        form,
        max_spawns,
        num_defeated,
        enabled,
        found,
        center,
        dummy,
    } = record.view();
    let label = Style::new().fg(Color::Cyan);

    let rows = [
        ("species", ctx.species().to_national(species).to_string()),
        ("form", form.to_string()),
        ("max spawns", max_spawns.to_string()),
        ("defeated", num_defeated.to_string()),
        ("enabled", yes_no(enabled).to_string()),
        ("found", yes_no(found).to_string()),
        ("center", format_point(center)),
        ("dummy", format_point(dummy)),
    ];

    let mut output = format!("{}", Style::new().bold().paint(format!("Slot {}", slot)));
    for (name, value) in rows {
        output.push_str(&format!("\n  {} {}", label.paint(format!("{:<12}", name)), value));
    }
    output
}

fn format_draft(ctx: &EditorContext, draft: &Draft) -> String {
    let mut output = format!(
        "{}",
        Style::new().bold().fg(Color::Magenta).paint(format!(
            "Draft for slot {} from {}",
            draft.origin().slot(),
            describe_source(ctx, draft.source())
        ))
    );

    let changed = draft.changed_fields();
    if changed.is_empty() {
        output.push_str("\n  (no changes)");
    }
    for field in changed {
        let before = draft
            .origin()
            .field(field)
            .map(|v| v.to_string())
            .unwrap_or_else(|| "none".to_string());
        let after = draft
            .record()
            .field(field)
            .map(|v| v.to_string())
            .unwrap_or_else(|| "none".to_string());
        output.push_str(&format!(
            "\n  {:<12} {} -> {}",
            field.name(),
            before,
            Color::Yellow.paint(after)
        ));
    }
    output
}

fn describe_source(ctx: &EditorContext, source: &DraftSource) -> String {
    match source {
        DraftSource::Live => "edits".to_string(),
        DraftSource::Snapshot { name } => name.clone(),
        DraftSource::Defaults { species } => {
            format!("defaults for species {}", ctx.species().to_national(*species))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_accept_common_spellings() {
        assert!(matches!(parse_flag("found", "on"), Ok(true)));
        assert!(matches!(parse_flag("found", "FALSE"), Ok(false)));
        assert!(parse_flag("found", "maybe").is_err());
    }

    #[test]
    fn point_and_axis_names() {
        assert_eq!(parse_point("Center"), Some(PointKind::Center));
        assert_eq!(parse_point("dummy_pos"), Some(PointKind::Dummy));
        assert_eq!(parse_point("middle"), None);
        assert_eq!(parse_axis("Y"), Some(Axis::Y));
        assert_eq!(parse_axis("w"), None);
    }

    #[test]
    fn slot_text_must_be_in_range() {
        assert_eq!(parse_slot(" 4 ").unwrap().get(), 4);
        match parse_slot("9") {
            Err(CommandResult::Error(msg)) => assert!(msg.contains("slot index 9")),
            other => panic!("unexpected result: {other:?}"),
        }
        match parse_slot("four") {
            Err(CommandResult::Error(msg)) => {
                assert!(msg.contains("'four'"), "{msg}");
                assert!(!msg.contains("index 0"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
