//! Stockage relationnel SQLite (feature `sqlite`).
//!
//! Le schéma porte les contraintes d'unicité du modèle :
//! une affectation par (matière, classe), un créneau par (classe, jour, période),
//! un statut par (enseignant, date).

use crate::calendar::SchoolDay;
use crate::model::{
    AttendanceStatus, ClassId, ClassSubject, School, SchoolClass, Subject, SubjectId, TeacherId,
    TeacherRef, TimetableSlot,
};
use crate::store::{ScheduleStore, StoreError};
use anyhow::Context;
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use tracing::debug;

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            // la base répond, mais la ligne ne se décode pas
            e @ (rusqlite::Error::FromSqlConversionFailure(..)
            | rusqlite::Error::IntegralValueOutOfRange(..)
            | rusqlite::Error::InvalidColumnType(..)) => StoreError::Corrupt(e.to_string()),
            e => StoreError::Unavailable(e.to_string()),
        }
    }
}

pub struct SqliteStore {
    connection: Connection,
}

impl SqliteStore {
    pub fn open<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let connection = Connection::open(path)
            .with_context(|| format!("opening sqlite database {}", path.display()))?;
        Self::initialize_schema(&connection)?;
        Ok(Self { connection })
    }

    pub fn open_in_memory() -> anyhow::Result<Self> {
        let connection = Connection::open_in_memory()?;
        Self::initialize_schema(&connection)?;
        Ok(Self { connection })
    }

    fn initialize_schema(connection: &Connection) -> anyhow::Result<()> {
        let ddl = r#"
            PRAGMA foreign_keys = ON;
            CREATE TABLE IF NOT EXISTS teachers (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS classes (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS subjects (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS teacher_subject_class (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                teacher_id TEXT NOT NULL REFERENCES teachers(id) ON DELETE CASCADE,
                subject_id TEXT NOT NULL REFERENCES subjects(id) ON DELETE CASCADE,
                class_id TEXT NOT NULL REFERENCES classes(id) ON DELETE CASCADE,
                UNIQUE(subject_id, class_id)
            );
            CREATE INDEX IF NOT EXISTS idx_tsc_teacher ON teacher_subject_class(teacher_id);
            CREATE TABLE IF NOT EXISTS class_timetable (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                class_id TEXT NOT NULL REFERENCES classes(id) ON DELETE CASCADE,
                subject_id TEXT NOT NULL REFERENCES subjects(id) ON DELETE CASCADE,
                day TEXT NOT NULL,
                period INTEGER NOT NULL CHECK (period >= 1),
                UNIQUE(class_id, day, period)
            );
            CREATE INDEX IF NOT EXISTS idx_timetable_day_period ON class_timetable(day, period);
            CREATE TABLE IF NOT EXISTS teacher_attendance (
                teacher_id TEXT NOT NULL REFERENCES teachers(id) ON DELETE CASCADE,
                date TEXT NOT NULL,
                status TEXT NOT NULL CHECK (status IN ('Present', 'Absent')),
                PRIMARY KEY(teacher_id, date)
            );
        "#;
        connection.execute_batch(ddl)?;
        Ok(())
    }

    /// Remplace tout le contenu par celui de `school`, en une transaction.
    pub fn import_school(&mut self, school: &School) -> anyhow::Result<()> {
        let tx = self.connection.transaction()?;
        for table in [
            "teacher_attendance",
            "class_timetable",
            "teacher_subject_class",
            "subjects",
            "classes",
            "teachers",
        ] {
            tx.execute(&format!("DELETE FROM {table}"), [])?;
        }
        {
            let mut stmt = tx.prepare("INSERT INTO teachers (id, name) VALUES (?1, ?2)")?;
            for t in &school.teachers {
                stmt.execute(params![t.id.as_str(), t.name])?;
            }
            let mut stmt = tx.prepare("INSERT INTO classes (id, name) VALUES (?1, ?2)")?;
            for c in &school.classes {
                stmt.execute(params![c.id.as_str(), c.name])?;
            }
            let mut stmt = tx.prepare("INSERT INTO subjects (id, name) VALUES (?1, ?2)")?;
            for s in &school.subjects {
                stmt.execute(params![s.id.as_str(), s.name])?;
            }
            let mut stmt = tx.prepare(
                "INSERT INTO teacher_subject_class (teacher_id, subject_id, class_id)
                 VALUES (?1, ?2, ?3)",
            )?;
            for a in &school.assignments {
                stmt.execute(params![a.teacher.as_str(), a.subject.as_str(), a.class.as_str()])
                    .with_context(|| {
                        format!("assignment {} / {} / {}", a.teacher, a.subject, a.class)
                    })?;
            }
            let mut stmt = tx.prepare(
                "INSERT INTO class_timetable (class_id, subject_id, day, period)
                 VALUES (?1, ?2, ?3, ?4)",
            )?;
            for s in &school.timetable {
                stmt.execute(params![s.class.as_str(), s.subject.as_str(), s.day.name(), s.period])
                    .with_context(|| format!("timetable slot {} {} {}", s.class, s.day, s.period))?;
            }
            let mut stmt = tx.prepare(
                "INSERT INTO teacher_attendance (teacher_id, date, status) VALUES (?1, ?2, ?3)",
            )?;
            for r in &school.attendance {
                stmt.execute(params![r.teacher.as_str(), r.date.to_string(), r.status.as_str()])
                    .with_context(|| format!("attendance {} {}", r.teacher, r.date))?;
            }
        }
        tx.commit()?;
        debug!(
            teachers = school.teachers.len(),
            slots = school.timetable.len(),
            "school imported into sqlite"
        );
        Ok(())
    }

    fn teacher_refs(&self, sql: &str, date: Option<NaiveDate>) -> Result<Vec<TeacherRef>, StoreError> {
        let mut stmt = self.connection.prepare(sql)?;
        let rows = match date {
            Some(date) => stmt
                .query_map(params![date.to_string()], teacher_ref_row)?
                .collect::<Result<Vec<_>, _>>()?,
            None => stmt
                .query_map([], teacher_ref_row)?
                .collect::<Result<Vec<_>, _>>()?,
        };
        Ok(rows)
    }
}

fn teacher_ref_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<TeacherRef> {
    Ok(TeacherRef {
        id: TeacherId::new(row.get::<_, String>(0)?),
        name: row.get(1)?,
    })
}

fn parse_day(raw: &str) -> Result<SchoolDay, StoreError> {
    raw.parse()
        .map_err(|e: crate::calendar::ParseDayError| StoreError::Corrupt(e.to_string()))
}

impl ScheduleStore for SqliteStore {
    fn absent_teachers(&self, date: NaiveDate) -> Result<Vec<TeacherRef>, StoreError> {
        self.teacher_refs(
            "SELECT DISTINCT t.id, t.name
             FROM teacher_attendance ta
             JOIN teachers t ON ta.teacher_id = t.id
             WHERE ta.status = 'Absent' AND ta.date = ?1
             ORDER BY t.name, t.id",
            Some(date),
        )
    }

    fn assignments_for_teacher(
        &self,
        teacher: &TeacherId,
    ) -> Result<Vec<ClassSubject>, StoreError> {
        let mut stmt = self.connection.prepare(
            "SELECT class_id, subject_id FROM teacher_subject_class
             WHERE teacher_id = ?1 ORDER BY class_id, subject_id",
        )?;
        let rows = stmt
            .query_map(params![teacher.as_str()], |row| {
                Ok(ClassSubject {
                    class: ClassId::new(row.get::<_, String>(0)?),
                    subject: SubjectId::new(row.get::<_, String>(1)?),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn timetable_slots(
        &self,
        class: &ClassId,
        subject: &SubjectId,
        day: SchoolDay,
    ) -> Result<Vec<TimetableSlot>, StoreError> {
        let mut stmt = self.connection.prepare(
            "SELECT period FROM class_timetable
             WHERE class_id = ?1 AND subject_id = ?2 AND day = ?3
             ORDER BY period",
        )?;
        let periods = stmt
            .query_map(params![class.as_str(), subject.as_str(), day.name()], |row| {
                row.get::<_, u8>(0)
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(periods
            .into_iter()
            .map(|period| TimetableSlot {
                class: class.clone(),
                subject: subject.clone(),
                day,
                period,
            })
            .collect())
    }

    fn teachers_teaching_at(
        &self,
        day: SchoolDay,
        period: u8,
    ) -> Result<Vec<TeacherId>, StoreError> {
        let mut stmt = self.connection.prepare(
            "SELECT DISTINCT tsc.teacher_id
             FROM teacher_subject_class tsc
             JOIN class_timetable ct
               ON tsc.class_id = ct.class_id AND tsc.subject_id = ct.subject_id
             WHERE ct.day = ?1 AND ct.period = ?2",
        )?;
        let ids = stmt
            .query_map(params![day.name(), period], |row| {
                row.get::<_, String>(0).map(TeacherId::new)
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ids)
    }

    fn absent_teacher_ids_on(&self, date: NaiveDate) -> Result<Vec<TeacherId>, StoreError> {
        let mut stmt = self.connection.prepare(
            "SELECT DISTINCT teacher_id FROM teacher_attendance
             WHERE date = ?1 AND status = ?2",
        )?;
        let ids = stmt
            .query_map(
                params![date.to_string(), AttendanceStatus::Absent.as_str()],
                |row| row.get::<_, String>(0).map(TeacherId::new),
            )?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ids)
    }

    fn all_teachers(&self) -> Result<Vec<TeacherRef>, StoreError> {
        self.teacher_refs("SELECT id, name FROM teachers ORDER BY name, id", None)
    }

    fn class(&self, id: &ClassId) -> Result<Option<SchoolClass>, StoreError> {
        let name: Option<String> = self
            .connection
            .query_row(
                "SELECT name FROM classes WHERE id = ?1",
                params![id.as_str()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(name.map(|name| SchoolClass {
            id: id.clone(),
            name,
        }))
    }

    fn subject(&self, id: &SubjectId) -> Result<Option<Subject>, StoreError> {
        let name: Option<String> = self
            .connection
            .query_row(
                "SELECT name FROM subjects WHERE id = ?1",
                params![id.as_str()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(name.map(|name| Subject {
            id: id.clone(),
            name,
        }))
    }
}

impl SqliteStore {
    /// Relit l'emploi du temps complet ; sert aux contrôles et aux exports.
    pub fn timetable(&self) -> Result<Vec<TimetableSlot>, StoreError> {
        let mut stmt = self.connection.prepare(
            "SELECT class_id, subject_id, day, period FROM class_timetable
             ORDER BY class_id, day, period",
        )?;
        let raw = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, u8>(3)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        raw.into_iter()
            .map(|(class, subject, day, period)| {
                Ok(TimetableSlot {
                    class: ClassId::new(class),
                    subject: SubjectId::new(subject),
                    day: parse_day(&day)?,
                    period,
                })
            })
            .collect()
    }
}
