use super::types::{Absentees, EngineError};
use crate::store::ScheduleStore;
use chrono::NaiveDate;
use tracing::debug;

/// Enseignants marqués absents à `date`, sans doublon, triés par nom.
pub fn find_absentees<S: ScheduleStore + ?Sized>(
    store: &S,
    date: NaiveDate,
) -> Result<Absentees, EngineError> {
    let mut teachers = store.absent_teachers(date)?;
    teachers.sort();
    teachers.dedup_by(|a, b| a.id == b.id);

    debug!(%date, count = teachers.len(), "absentee lookup");
    if teachers.is_empty() {
        return Ok(Absentees::None);
    }
    Ok(Absentees::Found(teachers))
}
