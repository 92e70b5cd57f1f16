use common::model::notice::Notice;
use common::model::record::{Attributes, Feature};
use common::model::session::{Event, Flow};
use common::model::validation::prepare_submission;
use log::info;

use super::{single_success, transition, write_failed, Workflow};
use crate::error::AppError;
use crate::session_controller::state::SessionEntry;

impl Workflow {
    /// Validates the entered values and writes one record.
    ///
    /// Nothing is sent when a rule fails. On success an edit stays on the
    /// edit page while a create returns to the table.
    pub(super) async fn submit(
        &self,
        entry: &mut SessionEntry,
        flow: Flow,
        entered: &Attributes,
    ) -> Result<Vec<Notice>, AppError> {
        let attributes = prepare_submission(&self.schema, flow, entered, &entry.state)
            .map_err(AppError::Validation)?;
        let features = [Feature::new(attributes.clone())];

        match flow {
            Flow::Edit => {
                let action = match entry.state.object_id {
                    Some(id) => format!("update record with ObjectId {id}"),
                    None => "update the record".to_string(),
                };
                let results = self
                    .features
                    .update_features(&features)
                    .await
                    .map_err(|err| write_failed(&action, err))?;
                single_success(&action, results)?;

                transition(entry, Event::RecordUpdated(attributes))?;
                info!("updated record {:?}", entry.state.object_id);
                Ok(vec![Notice::success("Entry successfully updated!")])
            }
            Flow::Create => {
                let action = "create the record";
                let results = self
                    .features
                    .add_features(&features)
                    .await
                    .map_err(|err| write_failed(action, err))?;
                let result = single_success(action, results)?;

                transition(entry, Event::RecordCreated)?;
                info!("created record {:?}", result.object_id);
                let text = match result.object_id {
                    Some(id) => format!("Entry successfully created with ObjectId {id}!"),
                    None => "Entry successfully created!".to_string(),
                };
                Ok(vec![Notice::success(text)])
            }
        }
    }
}
