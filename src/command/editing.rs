//! Text editing commands

use lexpad::Result;

use super::CommandStatus;
use crate::editor::EditorState;

/// Split the line at the cursor
pub fn newline(editor: &mut EditorState) -> Result<CommandStatus> {
    editor.session.newline();
    Ok(CommandStatus::Success)
}

pub fn insert_tab(editor: &mut EditorState) -> Result<CommandStatus> {
    editor.session.insert_char('\t');
    Ok(CommandStatus::Success)
}

/// Delete the character under the cursor (C-d)
pub fn delete_char_forward(editor: &mut EditorState) -> Result<CommandStatus> {
    if editor.session.delete() {
        Ok(CommandStatus::Success)
    } else {
        Ok(CommandStatus::Failure)
    }
}

/// Delete the character before the cursor (Backspace)
pub fn delete_char_backward(editor: &mut EditorState) -> Result<CommandStatus> {
    if editor.session.backspace() {
        Ok(CommandStatus::Success)
    } else {
        Ok(CommandStatus::Failure)
    }
}

pub fn undo(editor: &mut EditorState) -> Result<CommandStatus> {
    if editor.session.undo() {
        Ok(CommandStatus::Success)
    } else {
        Ok(CommandStatus::Failure)
    }
}

pub fn redo(editor: &mut EditorState) -> Result<CommandStatus> {
    if editor.session.redo() {
        Ok(CommandStatus::Success)
    } else {
        Ok(CommandStatus::Failure)
    }
}
