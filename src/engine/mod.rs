//! Moteur de suggestion de remplaçants.
//!
//! Trois étapes indépendantes, composées par [`SubstitutionEngine`] :
//! `absents(date) → créneaux manqués(absent, date) → remplaçants(date, période)`.
//! Le moteur ne modifie jamais le stockage et ne garde aucun état entre deux appels.

mod absentees;
mod eligible;
mod missed;
mod types;

pub use absentees::find_absentees;
pub use eligible::eligible_substitutes;
pub use missed::resolve_missed_periods;
pub use types::{
    AbsencePlan, Absentees, EngineError, MissedPeriod, MissedPeriods, NamedRef, PeriodSuggestion,
    PlanOutcome, Substitutes, SubstitutionReport,
};

use crate::calendar::{SchoolCalendar, SchoolDay};
use crate::model::{TeacherId, TeacherRef};
use crate::store::ScheduleStore;
use chrono::NaiveDate;
use tracing::info;

/// Façade : un stockage en lecture + le calendrier scolaire.
#[derive(Debug)]
pub struct SubstitutionEngine<'s, S: ScheduleStore + ?Sized> {
    store: &'s S,
    calendar: SchoolCalendar,
}

impl<'s, S: ScheduleStore + ?Sized> SubstitutionEngine<'s, S> {
    pub fn new(store: &'s S, calendar: SchoolCalendar) -> Result<Self, EngineError> {
        calendar
            .validate()
            .map_err(|e| EngineError::InvalidCalendar(e.to_string()))?;
        Ok(Self { store, calendar })
    }

    pub fn calendar(&self) -> &SchoolCalendar {
        &self.calendar
    }

    pub fn absentees(&self, date: NaiveDate) -> Result<Absentees, EngineError> {
        find_absentees(self.store, date)
    }

    pub fn missed_periods(
        &self,
        teacher: &TeacherId,
        date: NaiveDate,
    ) -> Result<MissedPeriods, EngineError> {
        resolve_missed_periods(self.store, &self.calendar, teacher, date)
    }

    pub fn eligible_substitutes(
        &self,
        date: NaiveDate,
        period: u8,
        absent: &TeacherId,
    ) -> Result<Substitutes, EngineError> {
        eligible_substitutes(self.store, date, period, absent)
    }

    /// Plan pour un absent choisi parmi ceux de `date`.
    pub fn plan_for(&self, teacher: &TeacherId, date: NaiveDate) -> Result<AbsencePlan, EngineError> {
        let absent = match self.absentees(date)? {
            Absentees::Found(list) => list.into_iter().find(|t| &t.id == teacher),
            Absentees::None => None,
        };
        let Some(absent) = absent else {
            return Err(EngineError::NotAbsent(teacher.clone(), date));
        };
        self.plan(absent, date)
    }

    /// Pipeline complet pour une journée.
    pub fn run(&self, date: NaiveDate) -> Result<SubstitutionReport, EngineError> {
        let absentees = match self.absentees(date)? {
            Absentees::None => {
                info!(%date, "no absentees");
                return Ok(SubstitutionReport::NoAbsentees { date });
            }
            Absentees::Found(list) => list,
        };

        let plans = absentees
            .into_iter()
            .map(|teacher| self.plan(teacher, date))
            .collect::<Result<Vec<_>, _>>()?;

        info!(%date, absentees = plans.len(), "substitution report ready");
        Ok(SubstitutionReport::Plans { date, plans })
    }

    fn plan(&self, teacher: TeacherRef, date: NaiveDate) -> Result<AbsencePlan, EngineError> {
        let day = SchoolDay::of(date);
        let outcome = match self.missed_periods(&teacher.id, date)? {
            MissedPeriods::NoScheduledPeriods => PlanOutcome::NoScheduledPeriods,
            MissedPeriods::Scheduled(periods) => {
                // recalcul par période : libre en P1 ne veut pas dire libre en P3
                let suggestions = periods
                    .into_iter()
                    .map(|missed| {
                        let substitutes =
                            self.eligible_substitutes(date, missed.period, &teacher.id)?;
                        Ok(PeriodSuggestion {
                            missed,
                            substitutes,
                        })
                    })
                    .collect::<Result<Vec<_>, EngineError>>()?;
                PlanOutcome::Suggestions(suggestions)
            }
        };
        Ok(AbsencePlan {
            teacher,
            date,
            day,
            outcome,
        })
    }
}
