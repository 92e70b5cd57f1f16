//! Component state for the session view.
//!
//! `view` mirrors the last `SessionView` returned by the server. Everything
//! else is input the user has not submitted yet, reset whenever the server
//! moves the session to a different page or record.

use common::model::record::Attributes;
use common::model::schema::Schema;
use common::model::session::{Flow, Page};
use common::requests::SessionView;

/// Main state container for the `SessionComponent`.
///
/// Fields are `pub` because they are accessed by `view` and `update` modules.
pub struct SessionComponent {
    /// Id issued by `POST /api/session`; `None` until the session is open.
    pub session_id: Option<String>,

    pub schema: Schema,

    /// Last view rendered by the server.
    pub view: SessionView,

    /// Text of the access-code box on the login page.
    pub access_code: String,

    /// Row index picked in the table's row selector.
    pub selected_row: usize,

    /// Values typed or chosen in the open form, keyed by field name.
    pub form_values: Attributes,

    /// Page and record the current `form_values` were seeded for.
    pub form_key: Option<(Page, Option<i64>)>,

    /// Text of the address search box.
    pub search_text: String,

    /// Suggestions answering the current `search_text`.
    pub suggestions: Vec<String>,

    /// An action is in flight; action buttons are disabled.
    pub busy: bool,

    /// Guard to avoid running first-render initialization more than once.
    pub loaded: bool,
}

impl SessionComponent {
    pub fn new() -> Self {
        Self {
            session_id: None,
            schema: Schema::default(),
            view: SessionView::default(),
            access_code: String::new(),
            selected_row: 0,
            form_values: Attributes::new(),
            form_key: None,
            search_text: String::new(),
            suggestions: Vec::new(),
            busy: false,
            loaded: false,
        }
    }

    /// The form flow of the current page, if a form is open.
    pub fn current_flow(&self) -> Option<Flow> {
        match self.view.state.page {
            Page::Create => Some(Flow::Create),
            Page::Edit => Some(Flow::Edit),
            Page::Login | Page::Table => None,
        }
    }

    /// Takes a new view from the server.
    ///
    /// Form values are re-seeded from the schema defaults only when a
    /// different form or record is opened, so a failed submit keeps what the
    /// user entered. The search box follows the pending address whenever the
    /// server resolves a new one.
    pub fn receive(&mut self, view: SessionView) {
        let previous_address = self
            .current_flow()
            .map(|flow| self.view.state.pending(flow).address.clone());
        self.view = view;
        self.busy = false;
        if self.selected_row >= self.view.rows.len() {
            self.selected_row = 0;
        }

        let Some(flow) = self.current_flow() else {
            self.form_key = None;
            self.form_values.clear();
            self.search_text.clear();
            self.suggestions.clear();
            return;
        };

        let key = (self.view.state.page, self.view.state.object_id);
        let address = self.view.state.pending(flow).address.clone();
        if self.form_key != Some(key) {
            self.form_key = Some(key);
            self.form_values = self.schema.defaults(flow, &self.view.state.selected_record);
            self.search_text = address;
            self.suggestions.clear();
        } else if previous_address.as_deref() != Some(address.as_str()) {
            self.search_text = address;
            self.suggestions.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::model::session::{PendingAddress, SessionState, Tier};
    use serde_json::json;

    fn record() -> Attributes {
        let mut record = Attributes::new();
        record.insert("ObjectId".into(), json!(7));
        record.insert("Name".into(), json!("North"));
        record.insert("Address".into(), json!("1 Oak St"));
        record.insert("Showers".into(), json!(1));
        record
    }

    fn edit_view(address: &str) -> SessionView {
        SessionView {
            state: SessionState {
                authenticated: true,
                tier: Some(Tier::Admin),
                page: Page::Edit,
                selected_record: record(),
                object_id: Some(7),
                edit_address: PendingAddress::resolved(address, 1.5, 2.5),
                ..SessionState::default()
            },
            ..SessionView::default()
        }
    }

    #[test]
    fn opening_a_form_seeds_values_and_search() {
        let mut component = SessionComponent::new();
        component.receive(edit_view("1 Oak St"));

        assert_eq!(component.form_values.get("Name"), Some(&json!("North")));
        assert_eq!(component.form_values.get("Showers"), Some(&json!("1")));
        assert_eq!(component.search_text, "1 Oak St");
    }

    #[test]
    fn entered_values_survive_a_rerender_of_the_same_form() {
        let mut component = SessionComponent::new();
        component.receive(edit_view("1 Oak St"));
        component
            .form_values
            .insert("Name".into(), json!("Renamed"));
        component.search_text = "12 Ma".into();

        component.receive(edit_view("1 Oak St"));
        assert_eq!(component.form_values.get("Name"), Some(&json!("Renamed")));
        assert_eq!(component.search_text, "12 Ma");

        component.receive(edit_view("12 Main St"));
        assert_eq!(component.form_values.get("Name"), Some(&json!("Renamed")));
        assert_eq!(component.search_text, "12 Main St");
    }

    #[test]
    fn leaving_the_form_clears_input() {
        let mut component = SessionComponent::new();
        component.receive(edit_view("1 Oak St"));
        component.selected_row = 4;

        component.receive(SessionView::default());
        assert!(component.form_values.is_empty());
        assert!(component.search_text.is_empty());
        assert_eq!(component.selected_row, 0);
        assert_eq!(component.current_flow(), None);
    }
}
