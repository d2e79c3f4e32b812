use super::{types::Conflict, types::ConflictKind, SchoolAdmin};
use crate::calendar::SchoolDay;
use crate::model::{ClassId, SubjectId, TeacherId};
use std::collections::BTreeMap;

/// Détecte les incohérences que les contraintes d'unicité ne couvrent pas
/// (double réservation d'un enseignant) ou que des données importées à la
/// main ont pu introduire.
pub(super) fn detect_conflicts(admin: &SchoolAdmin) -> Vec<Conflict> {
    let school = &admin.school;
    let mut out = Vec::new();

    let mut by_pair: BTreeMap<(&SubjectId, &ClassId), Vec<&TeacherId>> = BTreeMap::new();
    for a in &school.assignments {
        by_pair
            .entry((&a.subject, &a.class))
            .or_default()
            .push(&a.teacher);
    }
    for ((subject, class), teachers) in &by_pair {
        if teachers.len() > 1 {
            out.push(Conflict {
                kind: ConflictKind::DuplicateAssignment,
                teachers: teachers.iter().map(|t| (*t).clone()).collect(),
                classes: vec![(*class).clone()],
                subjects: vec![(*subject).clone()],
                day: None,
                period: None,
            });
        }
    }

    let mut by_class_slot: BTreeMap<(&ClassId, SchoolDay, u8), Vec<&SubjectId>> = BTreeMap::new();
    for s in &school.timetable {
        by_class_slot
            .entry((&s.class, s.day, s.period))
            .or_default()
            .push(&s.subject);
    }
    for ((class, day, period), subjects) in &by_class_slot {
        if subjects.len() > 1 {
            out.push(Conflict {
                kind: ConflictKind::DuplicateSlot,
                teachers: Vec::new(),
                classes: vec![(*class).clone()],
                subjects: subjects.iter().map(|s| (*s).clone()).collect(),
                day: Some(*day),
                period: Some(*period),
            });
        }
    }

    // (enseignant, jour, période) -> créneaux assurés
    let mut by_teacher_slot: BTreeMap<(&TeacherId, SchoolDay, u8), Vec<(&ClassId, &SubjectId)>> =
        BTreeMap::new();
    for s in &school.timetable {
        for a in school.assignments.iter().filter(|a| s.matches(a)) {
            by_teacher_slot
                .entry((&a.teacher, s.day, s.period))
                .or_default()
                .push((&s.class, &s.subject));
        }
    }
    for ((teacher, day, period), taught) in &by_teacher_slot {
        if taught.len() > 1 {
            out.push(Conflict {
                kind: ConflictKind::DoubleBooking,
                teachers: vec![(*teacher).clone()],
                classes: taught.iter().map(|(c, _)| (*c).clone()).collect(),
                subjects: taught.iter().map(|(_, s)| (*s).clone()).collect(),
                day: Some(*day),
                period: Some(*period),
            });
        }
    }

    out
}
