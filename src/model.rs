use crate::calendar::SchoolDay;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            pub fn new<S: AsRef<str>>(s: S) -> Self {
                Self(s.as_ref().to_owned())
            }
            pub fn random() -> Self {
                Self(Uuid::new_v4().to_string())
            }
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(
    /// Identifiant fort pour Teacher
    TeacherId
);
string_id!(
    /// Identifiant fort pour SchoolClass (ex. "C101")
    ClassId
);
string_id!(
    /// Identifiant fort pour Subject (ex. "S101")
    SubjectId
);

/// Enseignant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Teacher {
    pub id: TeacherId,
    pub name: String,
}

impl Teacher {
    pub fn new<N: Into<String>>(name: N) -> Self {
        Self {
            id: TeacherId::random(),
            name: name.into(),
        }
    }

    pub fn with_id<I: AsRef<str>, N: Into<String>>(id: I, name: N) -> Self {
        Self {
            id: TeacherId::new(id),
            name: name.into(),
        }
    }

    pub fn to_ref(&self) -> TeacherRef {
        TeacherRef {
            id: self.id.clone(),
            name: self.name.clone(),
        }
    }
}

/// Classe (groupe d'élèves)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchoolClass {
    pub id: ClassId,
    pub name: String,
}

impl SchoolClass {
    pub fn new<I: AsRef<str>, N: Into<String>>(id: I, name: N) -> Self {
        Self {
            id: ClassId::new(id),
            name: name.into(),
        }
    }
}

/// Matière
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: SubjectId,
    pub name: String,
}

impl Subject {
    pub fn new<I: AsRef<str>, N: Into<String>>(id: I, name: N) -> Self {
        Self {
            id: SubjectId::new(id),
            name: name.into(),
        }
    }
}

/// Qui enseigne quelle matière à quelle classe. Unique par (subject, class).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub teacher: TeacherId,
    pub subject: SubjectId,
    pub class: ClassId,
}

impl Assignment {
    pub fn class_subject(&self) -> ClassSubject {
        ClassSubject {
            class: self.class.clone(),
            subject: self.subject.clone(),
        }
    }
}

/// Couple (classe, matière), clé de jointure entre affectations et emploi du temps.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClassSubject {
    pub class: ClassId,
    pub subject: SubjectId,
}

/// Créneau de l'emploi du temps. Unique par (class, day, period).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimetableSlot {
    pub class: ClassId,
    pub subject: SubjectId,
    pub day: SchoolDay,
    pub period: u8,
}

impl TimetableSlot {
    pub fn matches(&self, assignment: &Assignment) -> bool {
        self.class == assignment.class && self.subject == assignment.subject
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttendanceStatus {
    Present,
    Absent,
}

impl AttendanceStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AttendanceStatus::Present => "Present",
            AttendanceStatus::Absent => "Absent",
        }
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AttendanceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "present" | "p" => Ok(AttendanceStatus::Present),
            "absent" | "a" => Ok(AttendanceStatus::Absent),
            other => Err(format!("unknown attendance status: {other}")),
        }
    }
}

/// Présence d'un enseignant pour une journée. Unique par (teacher, date).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub teacher: TeacherId,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
}

/// Projection (id, nom) renvoyée par les requêtes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TeacherRef {
    pub id: TeacherId,
    pub name: String,
}

impl TeacherRef {
    pub fn new<I: AsRef<str>, N: Into<String>>(id: I, name: N) -> Self {
        Self {
            id: TeacherId::new(id),
            name: name.into(),
        }
    }
}

// Tri par nom puis par id : deux homonymes restent dans un ordre stable.
impl Ord for TeacherRef {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.name
            .cmp(&other.name)
            .then_with(|| self.id.cmp(&other.id))
    }
}

impl PartialOrd for TeacherRef {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Établissement complet
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct School {
    #[serde(default)]
    pub teachers: Vec<Teacher>,
    #[serde(default)]
    pub classes: Vec<SchoolClass>,
    #[serde(default)]
    pub subjects: Vec<Subject>,
    #[serde(default)]
    pub assignments: Vec<Assignment>,
    #[serde(default)]
    pub timetable: Vec<TimetableSlot>,
    #[serde(default)]
    pub attendance: Vec<AttendanceRecord>,
}

impl School {
    pub fn find_teacher<'a>(&'a self, id: &TeacherId) -> Option<&'a Teacher> {
        self.teachers.iter().find(|t| &t.id == id)
    }
    /// Recherche par id puis, à défaut, par nom exact.
    pub fn lookup_teacher<'a>(&'a self, key: &str) -> Option<&'a Teacher> {
        self.teachers
            .iter()
            .find(|t| t.id.as_str() == key)
            .or_else(|| self.teachers.iter().find(|t| t.name == key))
    }
    pub fn find_class<'a>(&'a self, id: &ClassId) -> Option<&'a SchoolClass> {
        self.classes.iter().find(|c| &c.id == id)
    }
    pub fn find_subject<'a>(&'a self, id: &SubjectId) -> Option<&'a Subject> {
        self.subjects.iter().find(|s| &s.id == id)
    }
    pub fn find_attendance_mut(
        &mut self,
        teacher: &TeacherId,
        date: NaiveDate,
    ) -> Option<&mut AttendanceRecord> {
        self.attendance
            .iter_mut()
            .find(|r| &r.teacher == teacher && r.date == date)
    }

    /// Statut affiché : sans enregistrement, l'enseignant est réputé présent.
    pub fn attendance_status(&self, teacher: &TeacherId, date: NaiveDate) -> AttendanceStatus {
        self.attendance
            .iter()
            .find(|r| &r.teacher == teacher && r.date == date)
            .map_or(AttendanceStatus::Present, |r| r.status)
    }
}
