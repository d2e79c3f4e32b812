use super::types::{EngineError, Substitutes};
use crate::calendar::SchoolDay;
use crate::model::{TeacherId, TeacherRef};
use crate::store::ScheduleStore;
use chrono::NaiveDate;
use std::collections::HashSet;
use tracing::debug;

/// Remplaçants possibles pour la période `period` du jour `date`.
///
/// `tous − en cours à (jour, période) − {absent} − absents à date`.
/// Les exclusions sont des ensembles : un enseignant présent plusieurs fois
/// dans une requête n'est retiré qu'une fois.
pub fn eligible_substitutes<S: ScheduleStore + ?Sized>(
    store: &S,
    date: NaiveDate,
    period: u8,
    absent: &TeacherId,
) -> Result<Substitutes, EngineError> {
    let day = SchoolDay::of(date);

    let mut excluded: HashSet<TeacherId> = store
        .teachers_teaching_at(day, period)?
        .into_iter()
        .collect();
    let busy = excluded.len();
    excluded.extend(store.absent_teacher_ids_on(date)?);
    excluded.insert(absent.clone());

    let mut eligible: Vec<TeacherRef> = store
        .all_teachers()?
        .into_iter()
        .filter(|t| !excluded.contains(&t.id))
        .collect();
    eligible.sort();
    eligible.dedup_by(|a, b| a.id == b.id);

    debug!(%date, %day, period, busy, eligible = eligible.len(), "eligible substitutes");
    if eligible.is_empty() {
        return Ok(Substitutes::NoneAvailable);
    }
    Ok(Substitutes::Available(eligible))
}
