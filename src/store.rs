use crate::calendar::SchoolDay;
use crate::model::{
    AttendanceStatus, ClassId, ClassSubject, School, SchoolClass, Subject, SubjectId, TeacherId,
    TeacherRef, TimetableSlot,
};
use chrono::NaiveDate;
use std::collections::BTreeSet;
use thiserror::Error;

/// Panne d'infrastructure côté stockage, jamais confondue avec un résultat vide.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("schedule store unavailable: {0}")]
    Unavailable(String),
    #[error("corrupt row in schedule store: {0}")]
    Corrupt(String),
}

/// Contrat de lecture du moteur de remplacement.
///
/// Toutes les méthodes sont synchrones et bloquantes. Le moteur enchaîne
/// plusieurs appels sans transaction englobante : un stockage modifié entre
/// deux appels peut donner un résultat incohérent, ce qui est accepté ici.
pub trait ScheduleStore {
    /// Enseignants (distincts) avec un enregistrement `Absent` à cette date.
    fn absent_teachers(&self, date: NaiveDate) -> Result<Vec<TeacherRef>, StoreError>;

    fn assignments_for_teacher(&self, teacher: &TeacherId)
        -> Result<Vec<ClassSubject>, StoreError>;

    fn timetable_slots(
        &self,
        class: &ClassId,
        subject: &SubjectId,
        day: SchoolDay,
    ) -> Result<Vec<TimetableSlot>, StoreError>;

    /// Jointure affectations × emploi du temps sur (classe, matière), filtrée sur (jour, période).
    fn teachers_teaching_at(
        &self,
        day: SchoolDay,
        period: u8,
    ) -> Result<Vec<TeacherId>, StoreError>;

    fn absent_teacher_ids_on(&self, date: NaiveDate) -> Result<Vec<TeacherId>, StoreError>;

    fn all_teachers(&self) -> Result<Vec<TeacherRef>, StoreError>;

    fn class(&self, id: &ClassId) -> Result<Option<SchoolClass>, StoreError>;

    fn subject(&self, id: &SubjectId) -> Result<Option<Subject>, StoreError>;
}

impl ScheduleStore for School {
    fn absent_teachers(&self, date: NaiveDate) -> Result<Vec<TeacherRef>, StoreError> {
        // jointure interne : un enregistrement orphelin est ignoré
        let absent: BTreeSet<TeacherRef> = self
            .attendance
            .iter()
            .filter(|r| r.date == date && r.status == AttendanceStatus::Absent)
            .filter_map(|r| self.find_teacher(&r.teacher))
            .map(|t| t.to_ref())
            .collect();
        Ok(absent.into_iter().collect())
    }

    fn assignments_for_teacher(
        &self,
        teacher: &TeacherId,
    ) -> Result<Vec<ClassSubject>, StoreError> {
        Ok(self
            .assignments
            .iter()
            .filter(|a| &a.teacher == teacher)
            .map(|a| a.class_subject())
            .collect())
    }

    fn timetable_slots(
        &self,
        class: &ClassId,
        subject: &SubjectId,
        day: SchoolDay,
    ) -> Result<Vec<TimetableSlot>, StoreError> {
        let mut slots: Vec<TimetableSlot> = self
            .timetable
            .iter()
            .filter(|s| &s.class == class && &s.subject == subject && s.day == day)
            .cloned()
            .collect();
        slots.sort_by_key(|s| s.period);
        Ok(slots)
    }

    fn teachers_teaching_at(
        &self,
        day: SchoolDay,
        period: u8,
    ) -> Result<Vec<TeacherId>, StoreError> {
        let busy: BTreeSet<TeacherId> = self
            .timetable
            .iter()
            .filter(|s| s.day == day && s.period == period)
            .flat_map(|s| self.assignments.iter().filter(move |a| s.matches(a)))
            .map(|a| a.teacher.clone())
            .collect();
        Ok(busy.into_iter().collect())
    }

    fn absent_teacher_ids_on(&self, date: NaiveDate) -> Result<Vec<TeacherId>, StoreError> {
        let ids: BTreeSet<TeacherId> = self
            .attendance
            .iter()
            .filter(|r| r.date == date && r.status == AttendanceStatus::Absent)
            .map(|r| r.teacher.clone())
            .collect();
        Ok(ids.into_iter().collect())
    }

    fn all_teachers(&self) -> Result<Vec<TeacherRef>, StoreError> {
        let mut all: Vec<TeacherRef> = self.teachers.iter().map(|t| t.to_ref()).collect();
        all.sort();
        Ok(all)
    }

    fn class(&self, id: &ClassId) -> Result<Option<SchoolClass>, StoreError> {
        Ok(self.find_class(id).cloned())
    }

    fn subject(&self, id: &SubjectId) -> Result<Option<Subject>, StoreError> {
        Ok(self.find_subject(id).cloned())
    }
}
