//! Render state - data structure sent from App layer to UI for rendering
//!
//! The app layer flattens whichever screen is active into generic pieces (a
//! table, a form, a detail card, summary lines) so drawing stays screen-agnostic.

use crate::forms::FormRow;
use crate::messages::ui_events::{InputMode, Overlay, Screen};

/// Row emphasis in tables
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RowTone {
    #[default]
    Normal,
    Warning,
    Muted,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TableView {
    pub title: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub tones: Vec<RowTone>,
    pub selected: Option<usize>,
    pub empty_message: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FormView {
    pub title: String,
    pub rows: Vec<FormRow>,
    pub hint: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DetailView {
    pub title: String,
    pub lines: Vec<(String, String)>,
}

/// One-line input shown above a table (search, scanner, payment)
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InputLine {
    pub label: String,
    pub value: String,
    pub cursor: usize,
    pub active: bool,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct NoticeView {
    pub title: String,
    pub message: String,
    pub can_retry: bool,
}

/// Complete state needed by the UI to render
#[derive(Debug, Clone, Default)]
pub struct RenderState {
    pub screen: Screen,
    pub input_mode: InputMode,
    pub overlay: Overlay,

    // Header / status
    pub user: Option<String>,
    pub status: String,
    pub loading: bool,
    pub key_hints: String,

    // Body
    pub input: Option<InputLine>,
    pub table: Option<TableView>,
    pub form: Option<FormView>,
    pub detail: Option<DetailView>,
    pub summary: Vec<(String, String)>,
    pub preview: Option<String>,

    // Popups
    pub notice: Option<NoticeView>,
    pub confirm: Option<String>,
}
