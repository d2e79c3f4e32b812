#![forbid(unsafe_code)]
use chrono::NaiveDate;
use insta::assert_snapshot;
use suppleance::{
    calendar::{SchoolCalendar, SchoolDay},
    engine::SubstitutionEngine,
    model::{AttendanceStatus, ClassId, SchoolClass, Subject, SubjectId, Teacher, TeacherId},
    ReportRenderer, SchoolAdmin, TextReport,
};

fn school() -> SchoolAdmin {
    let mut admin = SchoolAdmin::new();
    for (id, name) in [("T1", "Alice"), ("T2", "Bruno"), ("T3", "Chloé"), ("T4", "David")] {
        admin.add_teacher(Teacher::with_id(id, name)).unwrap();
    }
    admin.add_class(SchoolClass::new("C1", "6A")).unwrap();
    admin.add_class(SchoolClass::new("C2", "6B")).unwrap();
    admin.add_subject(Subject::new("S1", "Maths")).unwrap();
    admin.add_subject(Subject::new("S2", "History")).unwrap();

    let (c1, c2) = (ClassId::new("C1"), ClassId::new("C2"));
    let (s1, s2) = (SubjectId::new("S1"), SubjectId::new("S2"));
    admin.assign(&TeacherId::new("T1"), &s1, &c1).unwrap();
    admin.assign(&TeacherId::new("T1"), &s2, &c2).unwrap();
    admin.assign(&TeacherId::new("T2"), &s2, &c1).unwrap();
    admin.assign(&TeacherId::new("T3"), &s1, &c2).unwrap();

    admin.set_slot(&c1, SchoolDay::Monday, 2, &s1).unwrap();
    admin.set_slot(&c2, SchoolDay::Monday, 4, &s2).unwrap();
    admin.set_slot(&c1, SchoolDay::Monday, 4, &s2).unwrap();
    admin.set_slot(&c2, SchoolDay::Monday, 2, &s1).unwrap();
    admin.set_slot(&c1, SchoolDay::Tuesday, 1, &s1).unwrap();
    admin
}

fn render(admin: &SchoolAdmin, date: NaiveDate) -> String {
    let engine = SubstitutionEngine::new(admin.school(), SchoolCalendar::default()).unwrap();
    TextReport.render(&engine.run(date).unwrap())
}

#[test]
fn render_single_absence() {
    let mut admin = school();
    let monday = NaiveDate::from_ymd_opt(2025, 10, 20).unwrap();
    admin
        .mark_attendance(&TeacherId::new("T1"), monday, AttendanceStatus::Absent)
        .unwrap();

    assert_snapshot!(render(&admin, monday), @r###"
Substitutions for 2025-10-20

Alice (T1)
Missed periods:
  Maths – Class 6A | Period 2
  History – Class 6B | Period 4
Suggested substitutes:
  Maths – Class 6A (Period 2)
    Bruno is available
    David is available
  History – Class 6B (Period 4)
    Chloé is available
    David is available
"###);
}

#[test]
fn render_nobody_free_and_idle_absentees() {
    let mut admin = school();
    let tuesday = NaiveDate::from_ymd_opt(2025, 10, 21).unwrap();
    for id in ["T1", "T2", "T3", "T4"] {
        admin
            .mark_attendance(&TeacherId::new(id), tuesday, AttendanceStatus::Absent)
            .unwrap();
    }

    assert_snapshot!(render(&admin, tuesday), @r###"
Substitutions for 2025-10-21

Alice (T1)
Missed periods:
  Maths – Class 6A | Period 1
Suggested substitutes:
  Maths – Class 6A (Period 1)
    No available substitute found for this period.

Bruno (T2)
Bruno had no scheduled periods on Tuesday.

Chloé (T3)
Chloé had no scheduled periods on Tuesday.

David (T4)
David had no scheduled periods on Tuesday.
"###);
}

#[test]
fn render_everyone_present() {
    let admin = school();
    let date = NaiveDate::from_ymd_opt(2025, 10, 22).unwrap();
    assert_eq!(
        render(&admin, date),
        "All teachers are present on 2025-10-22.\n"
    );
}
