#![forbid(unsafe_code)]
use chrono::NaiveDate;
use suppleance::{
    admin::{AdminError, ConflictKind},
    calendar::{SchoolCalendar, SchoolDay},
    model::{Assignment, AttendanceStatus, ClassId, SchoolClass, Subject, SubjectId, Teacher},
    SchoolAdmin,
};

fn basic() -> SchoolAdmin {
    let mut s = SchoolAdmin::new();
    s.add_teacher(Teacher::with_id("T1", "Alice")).unwrap();
    s.add_teacher(Teacher::with_id("T2", "Bruno")).unwrap();
    s.add_class(SchoolClass::new("C1", "6A")).unwrap();
    s.add_class(SchoolClass::new("C2", "6B")).unwrap();
    s.add_subject(Subject::new("S1", "Maths")).unwrap();
    s.add_subject(Subject::new("S2", "French")).unwrap();
    s
}

#[test]
fn create_and_assign_basic() {
    let mut s = basic();
    let t1 = s.school().teachers[0].id.clone();
    s.assign(&t1, &SubjectId::new("S1"), &ClassId::new("C1")).unwrap();
    s.set_slot(&ClassId::new("C1"), SchoolDay::Monday, 1, &SubjectId::new("S1"))
        .unwrap();

    let school = s.school();
    assert_eq!(school.assignments.len(), 1);
    assert_eq!(school.timetable.len(), 1);
    assert_eq!(s.teacher_timetable(&t1).len(), 1);
}

#[test]
fn one_teacher_per_subject_and_class() {
    let mut s = basic();
    let (t1, t2) = (s.school().teachers[0].id.clone(), s.school().teachers[1].id.clone());
    let (s1, c1) = (SubjectId::new("S1"), ClassId::new("C1"));
    s.assign(&t1, &s1, &c1).unwrap();
    // réaffecter au même enseignant ne crée pas de doublon
    s.assign(&t1, &s1, &c1).unwrap();
    assert_eq!(s.school().assignments.len(), 1);

    let err = s.assign(&t2, &s1, &c1).unwrap_err();
    assert!(matches!(err, AdminError::SubjectAlreadyAssigned { .. }));

    // même matière, autre classe : autorisé
    s.assign(&t2, &s1, &ClassId::new("C2")).unwrap();
    s.unassign(&s1, &c1).unwrap();
    s.assign(&t2, &s1, &c1).unwrap();
    assert_eq!(s.school().assignments.len(), 2);
}

#[test]
fn set_slot_upserts_and_validates() {
    let mut s = basic();
    let c1 = ClassId::new("C1");
    s.set_slot(&c1, SchoolDay::Monday, 3, &SubjectId::new("S1")).unwrap();
    s.set_slot(&c1, SchoolDay::Monday, 3, &SubjectId::new("S2")).unwrap();
    assert_eq!(s.school().timetable.len(), 1);
    assert_eq!(s.school().timetable[0].subject, SubjectId::new("S2"));

    assert!(matches!(
        s.set_slot(&c1, SchoolDay::Monday, 9, &SubjectId::new("S1")),
        Err(AdminError::PeriodOutOfRange { period: 9, max: 8 })
    ));
    assert!(matches!(
        s.set_slot(&c1, SchoolDay::Monday, 0, &SubjectId::new("S1")),
        Err(AdminError::PeriodOutOfRange { .. })
    ));
    assert!(matches!(
        s.set_slot(&c1, SchoolDay::Sunday, 1, &SubjectId::new("S1")),
        Err(AdminError::NotASchoolDay(SchoolDay::Sunday))
    ));
    assert!(matches!(
        s.set_slot(&ClassId::new("C9"), SchoolDay::Monday, 1, &SubjectId::new("S1")),
        Err(AdminError::UnknownClass(_))
    ));
    assert!(matches!(
        s.remove_slot(&c1, SchoolDay::Tuesday, 3),
        Err(AdminError::UnknownSlot { .. })
    ));
}

#[test]
fn custom_calendar_bounds_periods() {
    let cal = SchoolCalendar {
        school_days: vec![SchoolDay::Monday, SchoolDay::Tuesday],
        periods_per_day: 4,
    };
    let mut s = SchoolAdmin::with_school(basic().into_school(), cal);
    let c1 = ClassId::new("C1");
    assert!(s.set_slot(&c1, SchoolDay::Tuesday, 4, &SubjectId::new("S1")).is_ok());
    assert!(s.set_slot(&c1, SchoolDay::Tuesday, 5, &SubjectId::new("S1")).is_err());
    assert!(s.set_slot(&c1, SchoolDay::Wednesday, 1, &SubjectId::new("S1")).is_err());
}

#[test]
fn attendance_is_one_status_per_day() {
    let mut s = basic();
    let t1 = s.school().teachers[0].id.clone();
    let d = NaiveDate::from_ymd_opt(2025, 10, 20).unwrap();

    // sans enregistrement : présent par défaut
    assert_eq!(s.school().attendance_status(&t1, d), AttendanceStatus::Present);

    s.mark_attendance(&t1, d, AttendanceStatus::Absent).unwrap();
    s.mark_attendance(&t1, d, AttendanceStatus::Absent).unwrap();
    assert_eq!(s.school().attendance.len(), 1);
    assert_eq!(s.school().attendance_status(&t1, d), AttendanceStatus::Absent);

    s.mark_attendance(&t1, d, AttendanceStatus::Present).unwrap();
    assert_eq!(s.school().attendance.len(), 1);
    assert_eq!(s.school().attendance_status(&t1, d), AttendanceStatus::Present);

    let ghost = suppleance::TeacherId::new("nobody");
    assert!(matches!(
        s.mark_attendance(&ghost, d, AttendanceStatus::Absent),
        Err(AdminError::UnknownTeacher(_))
    ));
}

#[test]
fn mark_many_marks_the_whole_day() {
    let mut s = basic();
    let ids: Vec<_> = s.school().teachers.iter().map(|t| t.id.clone()).collect();
    let d = NaiveDate::from_ymd_opt(2025, 10, 21).unwrap();
    s.mark_many(
        d,
        [
            (&ids[0], AttendanceStatus::Absent),
            (&ids[1], AttendanceStatus::Present),
        ],
    )
    .unwrap();
    assert_eq!(s.school().attendance_status(&ids[0], d), AttendanceStatus::Absent);
    assert_eq!(s.school().attendance_status(&ids[1], d), AttendanceStatus::Present);
}

#[test]
fn removals_cascade() {
    let mut s = basic();
    let t1 = s.school().teachers[0].id.clone();
    let d = NaiveDate::from_ymd_opt(2025, 10, 20).unwrap();
    let (s1, c1) = (SubjectId::new("S1"), ClassId::new("C1"));
    s.assign(&t1, &s1, &c1).unwrap();
    s.set_slot(&c1, SchoolDay::Monday, 1, &s1).unwrap();
    s.mark_attendance(&t1, d, AttendanceStatus::Absent).unwrap();

    s.remove_teacher(&t1).unwrap();
    assert!(s.school().assignments.is_empty());
    assert!(s.school().attendance.is_empty());
    // le créneau reste : il ne dépend que de la classe et de la matière
    assert_eq!(s.school().timetable.len(), 1);

    s.remove_subject(&s1).unwrap();
    assert!(s.school().timetable.is_empty());
    assert!(matches!(
        s.remove_class(&ClassId::new("C9")),
        Err(AdminError::UnknownClass(_))
    ));
}

#[test]
fn rejects_duplicates_and_empty_names() {
    let mut s = basic();
    assert!(matches!(
        s.add_teacher(Teacher::with_id("T1", "Autre")),
        Err(AdminError::DuplicateId(_))
    ));
    assert!(matches!(
        s.add_teacher(Teacher::new("  ")),
        Err(AdminError::EmptyName)
    ));
    assert!(matches!(
        s.add_class(SchoolClass::new("C1", "6C")),
        Err(AdminError::DuplicateId(_))
    ));
    let t1 = s.school().teachers[0].id.clone();
    s.rename_teacher(&t1, " Alice Martin ").unwrap();
    assert_eq!(s.school().teachers[0].name, "Alice Martin");
}

#[test]
fn detect_double_booking_conflict() {
    let mut s = basic();
    let t1 = s.school().teachers[0].id.clone();
    let (s1, s2) = (SubjectId::new("S1"), SubjectId::new("S2"));
    let (c1, c2) = (ClassId::new("C1"), ClassId::new("C2"));
    s.assign(&t1, &s1, &c1).unwrap();
    s.assign(&t1, &s2, &c2).unwrap();
    s.set_slot(&c1, SchoolDay::Friday, 4, &s1).unwrap();
    s.set_slot(&c2, SchoolDay::Friday, 4, &s2).unwrap();

    let conflicts = s.detect_conflicts();
    assert_eq!(conflicts.len(), 1);
    let c = &conflicts[0];
    assert_eq!(c.kind, ConflictKind::DoubleBooking);
    assert_eq!(c.teachers, vec![t1]);
    assert_eq!(c.classes, vec![c1, c2]);
    assert_eq!(c.day, Some(SchoolDay::Friday));
    assert_eq!(c.period, Some(4));
}

#[test]
fn detect_constraint_bypass() {
    let mut s = basic();
    {
        // saisie directe, hors API
        let school = s.school_mut();
        for t in ["T1", "T2"] {
            school.assignments.push(Assignment {
                teacher: suppleance::TeacherId::new(t),
                subject: SubjectId::new("S1"),
                class: ClassId::new("C1"),
            });
        }
    }
    let kinds: Vec<ConflictKind> = s.detect_conflicts().iter().map(|c| c.kind).collect();
    assert_eq!(kinds, vec![ConflictKind::DuplicateAssignment]);
}

#[test]
fn views_are_ordered_by_day_then_period() {
    let mut s = basic();
    let t1 = s.school().teachers[0].id.clone();
    let t2 = s.school().teachers[1].id.clone();
    let (s1, s2) = (SubjectId::new("S1"), SubjectId::new("S2"));
    let c1 = ClassId::new("C1");
    s.assign(&t1, &s1, &c1).unwrap();
    s.assign(&t2, &s2, &c1).unwrap();
    s.set_slot(&c1, SchoolDay::Wednesday, 1, &s1).unwrap();
    s.set_slot(&c1, SchoolDay::Monday, 5, &s2).unwrap();
    s.set_slot(&c1, SchoolDay::Monday, 2, &s1).unwrap();
    // créneau sans enseignant : absent des vues
    s.add_subject(Subject::new("S3", "Art")).unwrap();
    s.set_slot(&c1, SchoolDay::Tuesday, 1, &SubjectId::new("S3")).unwrap();

    let class_view: Vec<(SchoolDay, u8, String)> = s
        .class_timetable(&c1)
        .into_iter()
        .map(|e| (e.day, e.period, e.teacher_name))
        .collect();
    assert_eq!(
        class_view,
        vec![
            (SchoolDay::Monday, 2, "Alice".to_string()),
            (SchoolDay::Monday, 5, "Bruno".to_string()),
            (SchoolDay::Wednesday, 1, "Alice".to_string()),
        ]
    );

    let teacher_view = s.teacher_timetable(&t1);
    assert_eq!(teacher_view.len(), 2);
    assert_eq!(teacher_view[0].subject_name, "Maths");
    assert_eq!(teacher_view[1].day, SchoolDay::Wednesday);
}
