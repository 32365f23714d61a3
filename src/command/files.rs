//! File and rule set commands

use lexpad::{EditorError, Result};

use super::CommandStatus;
use crate::editor::{EditorState, PromptAction};

/// Start over with an empty document
pub fn new_document(editor: &mut EditorState) -> Result<CommandStatus> {
    editor.session.new_document();
    editor.force_redraw();
    Ok(CommandStatus::Success)
}

/// Find file (open or create)
pub fn find_file(editor: &mut EditorState) -> Result<CommandStatus> {
    editor.start_prompt("Find file", PromptAction::FindFile, None);
    Ok(CommandStatus::Success)
}

/// Save the document, asking for a name if it has none
pub fn save_buffer(editor: &mut EditorState) -> Result<CommandStatus> {
    match editor.session.save() {
        Ok(()) => Ok(CommandStatus::Success),
        Err(EditorError::NoFileName) => {
            editor.start_prompt("Write file", PromptAction::WriteFile, None);
            Ok(CommandStatus::Success)
        }
        Err(e) => {
            editor.report_error(&e);
            Ok(CommandStatus::Failure)
        }
    }
}

/// Save under a new name
pub fn write_file(editor: &mut EditorState) -> Result<CommandStatus> {
    let default = editor
        .session
        .document()
        .path()
        .map(|p| p.display().to_string());
    editor.start_prompt("Write file", PromptAction::WriteFile, default);
    Ok(CommandStatus::Success)
}

/// Load a JSON, XML or TOML rule set
pub fn load_rules(editor: &mut EditorState) -> Result<CommandStatus> {
    editor.start_prompt("Load language", PromptAction::LoadRules, None);
    Ok(CommandStatus::Success)
}

/// Go back to the built-in rule set
pub fn builtin_rules(editor: &mut EditorState) -> Result<CommandStatus> {
    editor.session.use_builtin_rules();
    Ok(CommandStatus::Success)
}
