use super::types::{EngineError, MissedPeriod, MissedPeriods, NamedRef};
use crate::calendar::{SchoolCalendar, SchoolDay};
use crate::model::{ClassId, SubjectId, TeacherId, TimetableSlot};
use crate::store::ScheduleStore;
use chrono::NaiveDate;
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, warn};

/// Créneaux que `teacher` devait assurer le jour de la semaine de `date`.
///
/// Deux créneaux simultanés dans des classes différentes sont tous deux
/// rapportés : aucune règle ne tranche entre eux.
pub fn resolve_missed_periods<S: ScheduleStore + ?Sized>(
    store: &S,
    calendar: &SchoolCalendar,
    teacher: &TeacherId,
    date: NaiveDate,
) -> Result<MissedPeriods, EngineError> {
    let day = SchoolDay::of(date);
    if !calendar.is_school_day(day) {
        debug!(%date, %day, "not a school day");
        return Ok(MissedPeriods::NoScheduledPeriods);
    }

    // (period, class, subject) : dédoublonne et ordonne en une passe
    let mut keys: BTreeSet<(u8, ClassId, SubjectId)> = BTreeSet::new();
    for pair in store.assignments_for_teacher(teacher)? {
        for TimetableSlot {
            class,
            subject,
            period,
            ..
        } in store.timetable_slots(&pair.class, &pair.subject, day)?
        {
            keys.insert((period, class, subject));
        }
    }

    debug!(teacher = %teacher, %day, count = keys.len(), "missed periods resolved");
    if keys.is_empty() {
        return Ok(MissedPeriods::NoScheduledPeriods);
    }

    let mut class_names: HashMap<ClassId, String> = HashMap::new();
    let mut subject_names: HashMap<SubjectId, String> = HashMap::new();
    let mut out = Vec::with_capacity(keys.len());
    for (period, class, subject) in keys {
        let class_name = match class_names.get(&class) {
            Some(name) => name.clone(),
            None => {
                let name = store
                    .class(&class)?
                    .map_or_else(
                        || {
                            warn!(%class, "class row missing, falling back to id");
                            class.as_str().to_string()
                        },
                        |c| c.name,
                    );
                class_names.insert(class.clone(), name.clone());
                name
            }
        };
        let subject_name = match subject_names.get(&subject) {
            Some(name) => name.clone(),
            None => {
                let name = store
                    .subject(&subject)?
                    .map_or_else(
                        || {
                            warn!(%subject, "subject row missing, falling back to id");
                            subject.as_str().to_string()
                        },
                        |s| s.name,
                    );
                subject_names.insert(subject.clone(), name.clone());
                name
            }
        };
        out.push(MissedPeriod {
            class: NamedRef {
                id: class,
                name: class_name,
            },
            subject: NamedRef {
                id: subject,
                name: subject_name,
            },
            day,
            period,
        });
    }

    Ok(MissedPeriods::Scheduled(out))
}
