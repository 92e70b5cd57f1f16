use common::model::notice::Notice;
use common::model::record::{object_id, Attributes};
use common::model::session::Event;
use log::info;

use super::{single_success, transition, write_failed, Workflow};
use crate::error::AppError;
use crate::session_controller::state::SessionEntry;

impl Workflow {
    pub(super) fn start_edit(
        &self,
        entry: &mut SessionEntry,
        row: usize,
    ) -> Result<Vec<Notice>, AppError> {
        let record = row_at(entry, row)?.clone();
        transition(entry, Event::EditStarted(record))?;
        Ok(Vec::new())
    }

    pub(super) fn start_create(&self, entry: &mut SessionEntry) -> Result<Vec<Notice>, AppError> {
        transition(entry, Event::CreateStarted)?;
        Ok(Vec::new())
    }

    pub(super) async fn delete(
        &self,
        entry: &mut SessionEntry,
        row: usize,
    ) -> Result<Vec<Notice>, AppError> {
        let id = object_id(row_at(entry, row)?).ok_or(AppError::MissingObjectId(row))?;
        let action = format!("delete record with ObjectId {id}");

        let results = self
            .features
            .delete_features(&[id])
            .await
            .map_err(|err| write_failed(&action, err))?;
        single_success(&action, results)?;

        transition(entry, Event::RecordDeleted(id))?;
        info!("deleted record {}", id);
        Ok(vec![Notice::success(format!(
            "Record with ObjectId {id} deleted."
        ))])
    }
}

/// Row `row` of the table the user last saw.
fn row_at(entry: &SessionEntry, row: usize) -> Result<&Attributes, AppError> {
    entry.rows.get(row).ok_or(AppError::RowOutOfRange {
        row,
        rows: entry.rows.len(),
    })
}
