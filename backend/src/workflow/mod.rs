//! Runs named user actions against one session.
//!
//! Every action follows the same path:
//!
//! 1. `SessionState::authorize` rejects actions that are illegal in the current
//!    state (guests never get past it for writes) before anything is called.
//! 2. The action's outbound calls run: feature layer reads and writes, geocoding.
//! 3. Their outcome becomes an `Event` and `SessionState::apply` produces the
//!    next state, which replaces the old one only if every step succeeded.
//!
//! No failure is fatal: errors become inline notices and leave the session as
//! it was, so the user can correct the input or retry. After each action the
//! view is rendered again; the table page re-reads the whole dataset.
//!
//! Sub-modules:
//! - `access`: the access-code gate.
//! - `table`: editing, creating and deleting from the table page.
//! - `form`: submitting the create and edit forms.
//! - `address`: address suggestions and geocoding of the chosen one.

mod access;
mod address;
mod form;
mod table;

#[cfg(test)]
pub(crate) mod fakes;

pub use access::AccessCodes;

use std::sync::Arc;

use common::model::notice::Notice;
use common::model::schema::Schema;
use common::model::session::{Event, Page, Tier};
use common::requests::{Action, SessionView};
use log::{error, info, warn};

use crate::clients::{
    AddressAutocomplete, EditResult, FeatureQuery, FeatureService, Geocoder, RemoteError,
};
use crate::error::AppError;
use crate::session_controller::state::SessionEntry;

pub struct Workflow {
    schema: Schema,
    access: AccessCodes,
    features: Arc<dyn FeatureService>,
    geocoder: Arc<dyn Geocoder>,
    autocomplete: Arc<dyn AddressAutocomplete>,
}

impl Workflow {
    /// Wires the workflow to its outbound services.
    ///
    /// # Arguments
    /// * `schema` - Field layout of a service-center record.
    /// * `access` - The admin and guest access codes.
    /// * `features` - Reads and writes the hosted dataset.
    /// * `geocoder` - Resolves a picked address to coordinates.
    /// * `autocomplete` - Suggests addresses for partial search text.
    pub fn new(
        schema: Schema,
        access: AccessCodes,
        features: Arc<dyn FeatureService>,
        geocoder: Arc<dyn Geocoder>,
        autocomplete: Arc<dyn AddressAutocomplete>,
    ) -> Self {
        Self {
            schema,
            access,
            features,
            geocoder,
            autocomplete,
        }
    }

    /// The record layout this workflow validates against.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Performs `action` and renders the resulting view.
    ///
    /// Rejected or failed actions leave `entry` untouched and are reported as
    /// error notices on the returned view.
    ///
    /// # Arguments
    /// * `entry` - The caller's session; its state advances only on success.
    /// * `action` - The named action the user took.
    ///
    /// # Returns
    /// The `SessionView` of the page the session is on afterwards.
    pub async fn handle(&self, entry: &mut SessionEntry, action: Action) -> SessionView {
        let notices = match self.perform(entry, action).await {
            Ok(notices) => notices,
            Err(err) => {
                warn!("action rejected on the {} page: {}", entry.state.page, err);
                err.notices()
            }
        };
        self.render(entry, notices).await
    }

    /// Builds the view of the current page, reading the dataset for the table.
    ///
    /// # Arguments
    /// * `entry` - The session to render; its cached rows are refreshed.
    /// * `notices` - Messages to show; a failed read appends its own.
    ///
    /// # Returns
    /// The state, rows and notices the UI draws.
    pub async fn render(&self, entry: &mut SessionEntry, mut notices: Vec<Notice>) -> SessionView {
        if entry.state.page == Page::Table {
            match self.features.query(&FeatureQuery::match_all()).await {
                Ok(rows) => entry.rows = rows,
                Err(err) => {
                    error!("failed to fetch records: {}", err);
                    entry.rows.clear();
                    notices.extend(AppError::Fetch(err).notices());
                }
            }
        } else {
            entry.rows.clear();
        }

        SessionView {
            state: entry.state.clone(),
            rows: entry.rows.clone(),
            notices,
        }
    }

    async fn perform(
        &self,
        entry: &mut SessionEntry,
        action: Action,
    ) -> Result<Vec<Notice>, AppError> {
        entry.state.authorize(&action)?;

        match action {
            Action::Login { code } => self.login(entry, &code),
            Action::Logout => {
                transition(entry, Event::LoggedOut)?;
                Ok(vec![Notice::info("You have been logged out.")])
            }
            Action::StartEdit { row } => self.start_edit(entry, row),
            Action::StartCreate => self.start_create(entry),
            Action::Delete { row } => self.delete(entry, row).await,
            Action::Back => {
                transition(entry, Event::WentBack)?;
                Ok(Vec::new())
            }
            Action::SelectSuggestion { flow, address } => {
                self.select_suggestion(entry, flow, &address).await
            }
            Action::Submit { flow, attributes } => self.submit(entry, flow, &attributes).await,
        }
    }

    fn login(&self, entry: &mut SessionEntry, code: &str) -> Result<Vec<Notice>, AppError> {
        let tier = self
            .access
            .tier_for(code)
            .ok_or(AppError::InvalidAccessCode)?;
        transition(entry, Event::LoggedIn(tier))?;
        info!("session logged in with {:?} access", tier);

        let mut notices = vec![Notice::success("You're logged in!")];
        if tier == Tier::Guest {
            notices.push(Notice::info("Guest access: records are read-only."));
        }
        Ok(notices)
    }
}

/// Replaces the session state with the result of `event`, or leaves it untouched.
fn transition(entry: &mut SessionEntry, event: Event) -> Result<(), AppError> {
    entry.state = entry.state.clone().apply(event)?;
    Ok(())
}

fn write_failed(action: &str, err: RemoteError) -> AppError {
    error!("failed to {}: {}", action, err);
    AppError::WriteFailed {
        action: action.to_string(),
        detail: err.to_string(),
    }
}

/// The single result of a one-feature edit, which must report success.
fn single_success(action: &str, results: Vec<EditResult>) -> Result<EditResult, AppError> {
    let result = results.into_iter().next().ok_or_else(|| AppError::WriteFailed {
        action: action.to_string(),
        detail: "the service returned no result".to_string(),
    })?;
    if result.success {
        Ok(result)
    } else {
        let detail = result.failure_detail();
        error!("failed to {}: {}", action, detail);
        Err(AppError::WriteFailed {
            action: action.to_string(),
            detail,
        })
    }
}
