use common::model::notice::Notice;
use common::model::session::{Event, Flow, Page, PendingAddress, TransitionError};
use common::requests::Suggestions;
use log::debug;

use super::{transition, Workflow};
use crate::error::AppError;
use crate::session_controller::state::SessionEntry;

/// Shorter search text is answered with no suggestions and no outbound call.
pub const MIN_SUGGESTION_CHARS: usize = 3;

impl Workflow {
    /// Address suggestions for the search box of the open form.
    ///
    /// # Arguments
    /// * `entry` - The caller's session; it must be an admin on a form page.
    /// * `text` - What the user has typed so far.
    ///
    /// # Returns
    /// The suggestions tagged with `text`, empty for fewer than
    /// `MIN_SUGGESTION_CHARS` characters, or the access error that refused them.
    pub async fn suggest(&self, entry: &SessionEntry, text: &str) -> Result<Suggestions, AppError> {
        let state = &entry.state;
        if !state.authenticated {
            return Err(TransitionError::NotAuthenticated.into());
        }
        if !state.is_admin() {
            return Err(TransitionError::AdminOnly.into());
        }
        if !matches!(state.page, Page::Edit | Page::Create) {
            return Err(TransitionError::WrongPage { actual: state.page }.into());
        }

        let mut suggestions = Suggestions {
            query: text.to_string(),
            suggestions: Vec::new(),
        };
        if text.chars().count() < MIN_SUGGESTION_CHARS {
            return Ok(suggestions);
        }
        suggestions.suggestions = self
            .autocomplete
            .suggest(text)
            .await
            .map_err(AppError::Suggest)?;
        Ok(suggestions)
    }

    /// Geocodes a picked suggestion into the flow's pending address.
    ///
    /// Picking the placeholder or the address already pending does nothing. A
    /// failed geocode leaves the previous address and coordinates in place.
    pub(super) async fn select_suggestion(
        &self,
        entry: &mut SessionEntry,
        flow: Flow,
        address: &str,
    ) -> Result<Vec<Notice>, AppError> {
        if address.trim().is_empty() || address == entry.state.pending(flow).address {
            debug!("suggestion unchanged, skipping geocode");
            return Ok(Vec::new());
        }

        let coordinates = self
            .geocoder
            .geocode(address)
            .await
            .map_err(AppError::Geocode)?;
        transition(
            entry,
            Event::AddressResolved {
                flow,
                address: PendingAddress::resolved(
                    address,
                    coordinates.latitude,
                    coordinates.longitude,
                ),
            },
        )?;
        Ok(vec![Notice::info(format!("Address set to {address}."))])
    }
}
