//! Cursor movement commands

use lexpad::Result;

use super::CommandStatus;
use crate::editor::EditorState;

fn moved(ok: bool) -> Result<CommandStatus> {
    Ok(if ok {
        CommandStatus::Success
    } else {
        CommandStatus::Failure
    })
}

/// Move forward one character
pub fn forward_char(editor: &mut EditorState) -> Result<CommandStatus> {
    moved(editor.session.document_mut().move_right())
}

/// Move backward one character
pub fn backward_char(editor: &mut EditorState) -> Result<CommandStatus> {
    moved(editor.session.document_mut().move_left())
}

/// Move to the next line
pub fn next_line(editor: &mut EditorState) -> Result<CommandStatus> {
    moved(editor.session.document_mut().move_down())
}

/// Move to the previous line
pub fn previous_line(editor: &mut EditorState) -> Result<CommandStatus> {
    moved(editor.session.document_mut().move_up())
}

pub fn beginning_of_line(editor: &mut EditorState) -> Result<CommandStatus> {
    editor.session.document_mut().move_line_start();
    Ok(CommandStatus::Success)
}

pub fn end_of_line(editor: &mut EditorState) -> Result<CommandStatus> {
    editor.session.document_mut().move_line_end();
    Ok(CommandStatus::Success)
}

pub fn beginning_of_buffer(editor: &mut EditorState) -> Result<CommandStatus> {
    editor.session.document_mut().move_text_start();
    Ok(CommandStatus::Success)
}

pub fn end_of_buffer(editor: &mut EditorState) -> Result<CommandStatus> {
    editor.session.document_mut().move_text_end();
    Ok(CommandStatus::Success)
}

/// Scroll down one page (C-v)
pub fn scroll_down(editor: &mut EditorState) -> Result<CommandStatus> {
    let page = editor.display.text_rows().saturating_sub(2).max(1);
    let document = editor.session.document_mut();
    let mut any = false;
    for _ in 0..page {
        if !document.move_down() {
            break;
        }
        any = true;
    }
    moved(any)
}

/// Scroll up one page (M-v)
pub fn scroll_up(editor: &mut EditorState) -> Result<CommandStatus> {
    let page = editor.display.text_rows().saturating_sub(2).max(1);
    let document = editor.session.document_mut();
    let mut any = false;
    for _ in 0..page {
        if !document.move_up() {
            break;
        }
        any = true;
    }
    moved(any)
}
