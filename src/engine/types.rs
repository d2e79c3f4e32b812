use crate::calendar::SchoolDay;
use crate::model::{ClassId, SubjectId, TeacherId, TeacherRef};
use crate::store::StoreError;
use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

/// Résultat de la recherche des absents d'une journée.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "teachers", rename_all = "snake_case")]
pub enum Absentees {
    /// Personne n'est absent : rien à faire.
    None,
    Found(Vec<TeacherRef>),
}

/// Référence (id, nom) vers une classe ou une matière.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedRef<I> {
    pub id: I,
    pub name: String,
}

/// Créneau que l'absent aurait dû assurer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissedPeriod {
    pub class: NamedRef<ClassId>,
    pub subject: NamedRef<SubjectId>,
    pub day: SchoolDay,
    pub period: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "periods", rename_all = "snake_case")]
pub enum MissedPeriods {
    NoScheduledPeriods,
    /// Trié par période croissante.
    Scheduled(Vec<MissedPeriod>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "teachers", rename_all = "snake_case")]
pub enum Substitutes {
    NoneAvailable,
    Available(Vec<TeacherRef>),
}

impl Substitutes {
    pub fn teachers(&self) -> &[TeacherRef] {
        match self {
            Substitutes::NoneAvailable => &[],
            Substitutes::Available(list) => list,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodSuggestion {
    pub missed: MissedPeriod,
    pub substitutes: Substitutes,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "suggestions", rename_all = "snake_case")]
pub enum PlanOutcome {
    NoScheduledPeriods,
    Suggestions(Vec<PeriodSuggestion>),
}

/// Suggestions de remplacement pour un absent donné.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AbsencePlan {
    pub teacher: TeacherRef,
    pub date: NaiveDate,
    pub day: SchoolDay,
    pub outcome: PlanOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SubstitutionReport {
    NoAbsentees {
        date: NaiveDate,
    },
    Plans {
        date: NaiveDate,
        plans: Vec<AbsencePlan>,
    },
}

impl SubstitutionReport {
    pub fn date(&self) -> NaiveDate {
        match self {
            SubstitutionReport::NoAbsentees { date } | SubstitutionReport::Plans { date, .. } => {
                *date
            }
        }
    }
}

#[derive(Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("teacher {0} is not marked absent on {1}")]
    NotAbsent(TeacherId, NaiveDate),
    #[error("invalid calendar: {0}")]
    InvalidCalendar(String),
}
