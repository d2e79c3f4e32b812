use crate::calendar::SchoolDay;
use crate::model::{ClassId, SubjectId, TeacherId};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictKind {
    /// un enseignant a deux créneaux au même (jour, période)
    DoubleBooking,
    /// deux enseignants pour le même couple (matière, classe)
    DuplicateAssignment,
    /// deux matières pour la même classe au même (jour, période)
    DuplicateSlot,
}

impl ConflictKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ConflictKind::DoubleBooking => "double_booking",
            ConflictKind::DuplicateAssignment => "duplicate_assignment",
            ConflictKind::DuplicateSlot => "duplicate_slot",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Conflict {
    pub kind: ConflictKind,
    pub teachers: Vec<TeacherId>,
    pub classes: Vec<ClassId>,
    pub subjects: Vec<SubjectId>,
    pub day: Option<SchoolDay>,
    pub period: Option<u8>,
}

/// Ligne d'emploi du temps affichable (vue enseignant ou vue classe).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimetableEntry {
    pub day: SchoolDay,
    pub period: u8,
    pub class_id: ClassId,
    pub class_name: String,
    pub subject_id: SubjectId,
    pub subject_name: String,
    pub teacher_id: TeacherId,
    pub teacher_name: String,
}

#[derive(Error, Debug)]
pub enum AdminError {
    #[error("name cannot be empty")]
    EmptyName,
    #[error("unknown teacher: {0}")]
    UnknownTeacher(String),
    #[error("unknown class: {0}")]
    UnknownClass(String),
    #[error("unknown subject: {0}")]
    UnknownSubject(String),
    #[error("duplicate id: {0}")]
    DuplicateId(String),
    #[error("subject {subject} is already assigned to a teacher for class {class}")]
    SubjectAlreadyAssigned { subject: SubjectId, class: ClassId },
    #[error("no assignment of subject {subject} for class {class}")]
    UnknownAssignment { subject: SubjectId, class: ClassId },
    #[error("period {period} out of range 1..={max}")]
    PeriodOutOfRange { period: u8, max: u8 },
    #[error("{0} is not a school day")]
    NotASchoolDay(SchoolDay),
    #[error("no timetable slot for class {class} on {day} period {period}")]
    UnknownSlot {
        class: ClassId,
        day: SchoolDay,
        period: u8,
    },
}
