//! Find and replace commands

use lexpad::Result;

use super::CommandStatus;
use crate::editor::{EditorState, PromptAction};

fn found(ok: bool) -> Result<CommandStatus> {
    Ok(if ok {
        CommandStatus::Success
    } else {
        CommandStatus::Failure
    })
}

/// Open the find bar and ask for a query (C-s)
pub fn find(editor: &mut EditorState) -> Result<CommandStatus> {
    let query = &editor.session.find().query.text;
    let default = (!query.is_empty()).then(|| query.clone());
    editor.session.show_find(true);
    editor.force_redraw();
    editor.start_prompt("Find", PromptAction::Find, default);
    Ok(CommandStatus::Success)
}

pub fn find_next(editor: &mut EditorState) -> Result<CommandStatus> {
    found(editor.session.find_step(1))
}

pub fn find_previous(editor: &mut EditorState) -> Result<CommandStatus> {
    found(editor.session.find_step(-1))
}

pub fn toggle_case(editor: &mut EditorState) -> Result<CommandStatus> {
    editor.session.toggle_case_sensitive();
    Ok(CommandStatus::Success)
}

pub fn toggle_whole_word(editor: &mut EditorState) -> Result<CommandStatus> {
    editor.session.toggle_whole_word();
    Ok(CommandStatus::Success)
}

fn replacement_prompt(editor: &mut EditorState, label: &str, action: PromptAction) {
    let replacement = &editor.session.find().replacement;
    let default = (!replacement.is_empty()).then(|| replacement.clone());
    editor.start_prompt(label, action, default);
}

/// Replace the current match (M-r)
pub fn replace_one(editor: &mut EditorState) -> Result<CommandStatus> {
    if editor.session.matcher().current().is_none() {
        editor.session.set_status("No match to replace");
        return Ok(CommandStatus::Failure);
    }
    replacement_prompt(editor, "Replace with", PromptAction::ReplaceOne);
    Ok(CommandStatus::Success)
}

/// Replace every match (M-a)
pub fn replace_all(editor: &mut EditorState) -> Result<CommandStatus> {
    if editor.session.matcher().count() == 0 {
        editor.session.set_status("No matches to replace");
        return Ok(CommandStatus::Failure);
    }
    replacement_prompt(editor, "Replace all with", PromptAction::ReplaceAll);
    Ok(CommandStatus::Success)
}
