//! Payloads exchanged between the UI and the server.

use serde::{Deserialize, Serialize};

use crate::model::notice::Notice;
use crate::model::record::Attributes;
use crate::model::session::{Flow, SessionState};

/// A named user action posted to `/api/session/{id}/action`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    Login { code: String },
    Logout,
    /// Edit the table row at `row` (0-based, as last rendered).
    StartEdit { row: usize },
    StartCreate,
    Delete { row: usize },
    Back,
    SelectSuggestion { flow: Flow, address: String },
    Submit { flow: Flow, attributes: Attributes },
}

/// Everything the UI needs to render the current page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionView {
    pub state: SessionState,
    /// Dataset rows, only filled on the table page.
    #[serde(default)]
    pub rows: Vec<Attributes>,
    #[serde(default)]
    pub notices: Vec<Notice>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStarted {
    pub session_id: String,
    pub view: SessionView,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SuggestionsQuery {
    pub q: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestions {
    pub query: String,
    pub suggestions: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actions_are_tagged_by_type() {
        let action: Action =
            serde_json::from_str(r#"{"type":"select_suggestion","flow":"edit","address":"1 A St"}"#)
                .unwrap();
        assert_eq!(
            action,
            Action::SelectSuggestion {
                flow: Flow::Edit,
                address: "1 A St".into()
            }
        );

        let json = serde_json::to_string(&Action::Delete { row: 3 }).unwrap();
        assert_eq!(json, r#"{"type":"delete","row":3}"#);
    }
}
