mod conflicts;
mod mutate;
mod types;
mod views;

pub use types::{AdminError, Conflict, ConflictKind, TimetableEntry};

use crate::calendar::{SchoolCalendar, SchoolDay};
use crate::model::{
    Assignment, AttendanceStatus, ClassId, School, SchoolClass, Subject, SubjectId, Teacher,
    TeacherId, TimetableSlot,
};
use chrono::NaiveDate;

/// SchoolAdmin : encapsule un School et applique les règles de saisie
#[derive(Debug, Default)]
pub struct SchoolAdmin {
    school: School,
    calendar: SchoolCalendar,
}

impl SchoolAdmin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_school(school: School, calendar: SchoolCalendar) -> Self {
        Self { school, calendar }
    }

    pub fn school(&self) -> &School {
        &self.school
    }
    pub fn school_mut(&mut self) -> &mut School {
        &mut self.school
    }
    pub fn into_school(self) -> School {
        self.school
    }
    pub fn calendar(&self) -> &SchoolCalendar {
        &self.calendar
    }

    pub fn add_teacher(&mut self, teacher: Teacher) -> Result<TeacherId, AdminError> {
        mutate::add_teacher(self, teacher)
    }

    pub fn rename_teacher(&mut self, id: &TeacherId, name: &str) -> Result<(), AdminError> {
        mutate::rename_teacher(self, id, name)
    }

    pub fn remove_teacher(&mut self, id: &TeacherId) -> Result<Teacher, AdminError> {
        mutate::remove_teacher(self, id)
    }

    pub fn add_class(&mut self, class: SchoolClass) -> Result<ClassId, AdminError> {
        mutate::add_class(self, class)
    }

    pub fn remove_class(&mut self, id: &ClassId) -> Result<SchoolClass, AdminError> {
        mutate::remove_class(self, id)
    }

    pub fn add_subject(&mut self, subject: Subject) -> Result<SubjectId, AdminError> {
        mutate::add_subject(self, subject)
    }

    pub fn remove_subject(&mut self, id: &SubjectId) -> Result<Subject, AdminError> {
        mutate::remove_subject(self, id)
    }

    pub fn assign(
        &mut self,
        teacher: &TeacherId,
        subject: &SubjectId,
        class: &ClassId,
    ) -> Result<(), AdminError> {
        mutate::assign(self, teacher, subject, class)
    }

    pub fn unassign(&mut self, subject: &SubjectId, class: &ClassId) -> Result<Assignment, AdminError> {
        mutate::unassign(self, subject, class)
    }

    pub fn set_slot(
        &mut self,
        class: &ClassId,
        day: SchoolDay,
        period: u8,
        subject: &SubjectId,
    ) -> Result<(), AdminError> {
        mutate::set_slot(self, class, day, period, subject)
    }

    pub fn remove_slot(
        &mut self,
        class: &ClassId,
        day: SchoolDay,
        period: u8,
    ) -> Result<TimetableSlot, AdminError> {
        mutate::remove_slot(self, class, day, period)
    }

    pub fn mark_attendance(
        &mut self,
        teacher: &TeacherId,
        date: NaiveDate,
        status: AttendanceStatus,
    ) -> Result<(), AdminError> {
        mutate::mark_attendance(self, teacher, date, status)
    }

    /// Marque toute une journée d'un coup (formulaire de présence).
    pub fn mark_many<'a, I>(&mut self, date: NaiveDate, statuses: I) -> Result<(), AdminError>
    where
        I: IntoIterator<Item = (&'a TeacherId, AttendanceStatus)>,
    {
        for (teacher, status) in statuses {
            self.mark_attendance(teacher, date, status)?;
        }
        Ok(())
    }

    pub fn detect_conflicts(&self) -> Vec<Conflict> {
        conflicts::detect_conflicts(self)
    }

    pub fn teacher_timetable(&self, teacher: &TeacherId) -> Vec<TimetableEntry> {
        views::teacher_timetable(self, teacher)
    }

    pub fn class_timetable(&self, class: &ClassId) -> Vec<TimetableEntry> {
        views::class_timetable(self, class)
    }
}
