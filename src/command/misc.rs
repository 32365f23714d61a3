//! Miscellaneous commands

use lexpad::syntax::OverlapMode;
use lexpad::Result;

use super::CommandStatus;
use crate::editor::{EditorState, PromptAction};

/// Send the document to the compile service (F5)
pub fn compile(editor: &mut EditorState) -> Result<CommandStatus> {
    editor.session.compile();
    Ok(CommandStatus::Success)
}

/// Ask for a new compile service URL
pub fn set_compiler_url(editor: &mut EditorState) -> Result<CommandStatus> {
    let current = editor.session.config().compiler_url.clone();
    editor.start_prompt("Compiler URL", PromptAction::CompilerUrl, Some(current));
    Ok(CommandStatus::Success)
}

/// system -> light -> dark -> system
pub fn cycle_theme(editor: &mut EditorState) -> Result<CommandStatus> {
    editor.session.cycle_theme();
    editor.force_redraw();
    Ok(CommandStatus::Success)
}

/// Toggle line numbers display (C-x #)
pub fn toggle_line_numbers(editor: &mut EditorState) -> Result<CommandStatus> {
    let status = if editor.session.toggle_line_numbers() {
        "Line numbers enabled"
    } else {
        "Line numbers disabled"
    };
    editor.force_redraw();
    editor.display.set_message(status);
    Ok(CommandStatus::Success)
}

pub fn toggle_overlap(editor: &mut EditorState) -> Result<CommandStatus> {
    let next = match editor.session.config().overlap {
        OverlapMode::Exclusive => OverlapMode::Layered,
        OverlapMode::Layered => OverlapMode::Exclusive,
    };
    editor.session.set_overlap(next);
    Ok(CommandStatus::Success)
}

/// Redraw the display
pub fn redraw_display(editor: &mut EditorState) -> Result<CommandStatus> {
    editor.force_redraw();
    Ok(CommandStatus::Success)
}

/// List key bindings in the notice panel (F1)
pub fn describe_bindings(editor: &mut EditorState) -> Result<CommandStatus> {
    let mut lines: Vec<String> = Vec::new();
    let mut last_name = "";
    for (key, name) in editor.keytab.all_bindings() {
        if name == last_name {
            if let Some(line) = lines.last_mut() {
                line.push_str(", ");
                line.push_str(&key.display_name());
            }
        } else {
            lines.push(format!("{:<22} {}", name, key.display_name()));
            last_name = name;
        }
    }
    let listing = lines.join("\n");
    editor.session.set_notice(listing);
    editor.force_redraw();
    Ok(CommandStatus::Success)
}

/// Close the find bar or cancel whatever is in progress (C-g)
pub fn abort(editor: &mut EditorState) -> Result<CommandStatus> {
    if editor.session.find().visible {
        editor.session.show_find(false);
        editor.force_redraw();
        return Ok(CommandStatus::Success);
    }
    Ok(CommandStatus::Abort)
}

/// Quit the editor, confirming if there are unsaved changes
pub fn quit(editor: &mut EditorState) -> Result<CommandStatus> {
    if editor.session.document().is_modified() {
        editor.start_prompt(
            "Document modified; really quit? (y/n)",
            PromptAction::ConfirmQuit,
            None,
        );
        return Ok(CommandStatus::Success);
    }
    editor.quit();
    Ok(CommandStatus::Success)
}
