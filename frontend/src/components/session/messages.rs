use common::model::schema::Schema;
use common::model::session::Flow;
use common::requests::{Action, SessionStarted, SessionView, Suggestions};

pub enum Msg {
    SchemaLoaded(Schema),
    SessionOpened(SessionStarted),
    ViewReceived(SessionView),
    RequestFailed(String),
    UpdateAccessCode(String),
    Login,
    /// Closes the server session and starts over on a fresh one.
    Logout,
    Refresh,
    SelectRow(usize),
    /// Posts a named action and renders the view the server returns.
    Perform(Action),
    SetField { name: String, value: String },
    Submit(Flow),
    SearchInput(String),
    SuggestionsReceived(Suggestions),
    PickSuggestion(String),
}
