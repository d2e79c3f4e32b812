#![forbid(unsafe_code)]
//! Suppléance : emplois du temps scolaires et suggestions de remplaçants.
//!
//! - Enseignants, classes, matières, affectations, créneaux, présences.
//! - Stockage fichiers (JSON/CSV) ou SQLite (feature `sqlite`).
//! - Moteur sans état : absents du jour → créneaux manqués → enseignants libres.
//! - Le moteur suggère, il n'affecte jamais.

pub mod admin;
pub mod calendar;
pub mod engine;
pub mod io;
pub mod model;
pub mod report;
#[cfg(feature = "sqlite")]
pub mod sqlite;
pub mod storage;
pub mod store;

pub use admin::{AdminError, Conflict, ConflictKind, SchoolAdmin, TimetableEntry};
pub use calendar::{load_calendar_from_file, SchoolCalendar, SchoolDay};
pub use engine::{
    AbsencePlan, Absentees, EngineError, MissedPeriod, MissedPeriods, PeriodSuggestion,
    PlanOutcome, Substitutes, SubstitutionEngine, SubstitutionReport,
};
pub use model::{
    Assignment, AttendanceRecord, AttendanceStatus, ClassId, School, SchoolClass, Subject,
    SubjectId, Teacher, TeacherId, TeacherRef, TimetableSlot,
};
pub use report::{ReportRenderer, TextReport};
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;
pub use storage::{JsonStorage, Storage};
pub use store::{ScheduleStore, StoreError};
