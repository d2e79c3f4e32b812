use super::{types::TimetableEntry, SchoolAdmin};
use crate::model::{Assignment, ClassId, School, TeacherId, TimetableSlot};

pub(super) fn teacher_timetable(admin: &SchoolAdmin, teacher: &TeacherId) -> Vec<TimetableEntry> {
    let school = &admin.school;
    let mut out: Vec<TimetableEntry> = school
        .timetable
        .iter()
        .flat_map(move |s| {
            school
                .assignments
                .iter()
                .filter(move |a| &a.teacher == teacher && s.matches(a))
                .map(move |a| entry(school, s, a))
        })
        .collect();
    sort_entries(&mut out);
    out
}

/// Créneaux sans enseignant affecté exclus, comme une jointure interne.
pub(super) fn class_timetable(admin: &SchoolAdmin, class: &ClassId) -> Vec<TimetableEntry> {
    let school = &admin.school;
    let mut out: Vec<TimetableEntry> = school
        .timetable
        .iter()
        .filter(|s| &s.class == class)
        .flat_map(move |s| {
            school
                .assignments
                .iter()
                .filter(move |a| s.matches(a))
                .map(move |a| entry(school, s, a))
        })
        .collect();
    sort_entries(&mut out);
    out
}

fn sort_entries(entries: &mut [TimetableEntry]) {
    entries.sort_by(|a, b| {
        (a.day.index(), a.period, &a.class_id).cmp(&(b.day.index(), b.period, &b.class_id))
    });
}

fn entry(school: &School, slot: &TimetableSlot, assignment: &Assignment) -> TimetableEntry {
    TimetableEntry {
        day: slot.day,
        period: slot.period,
        class_id: slot.class.clone(),
        class_name: school
            .find_class(&slot.class)
            .map_or_else(|| slot.class.to_string(), |c| c.name.clone()),
        subject_id: slot.subject.clone(),
        subject_name: school
            .find_subject(&slot.subject)
            .map_or_else(|| slot.subject.to_string(), |s| s.name.clone()),
        teacher_id: assignment.teacher.clone(),
        teacher_name: school
            .find_teacher(&assignment.teacher)
            .map_or_else(|| assignment.teacher.to_string(), |t| t.name.clone()),
    }
}
