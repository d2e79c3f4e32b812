use crate::admin::Conflict;
use crate::calendar::SchoolDay;
use crate::engine::{PlanOutcome, Substitutes, SubstitutionReport};
use crate::model::{
    Assignment, AttendanceRecord, AttendanceStatus, ClassId, SchoolClass, Subject, SubjectId,
    Teacher, TeacherId, TimetableSlot,
};
use anyhow::{bail, Context};
use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use std::fs;
use std::path::Path;

fn field<'r>(rec: &'r StringRecord, idx: usize, name: &str) -> anyhow::Result<&'r str> {
    let value = rec
        .get(idx)
        .with_context(|| format!("missing {name}"))?
        .trim();
    if value.is_empty() {
        bail!("empty {name} (line {})", line_of(rec));
    }
    Ok(value)
}

fn line_of(rec: &StringRecord) -> u64 {
    rec.position().map_or(0, |p| p.line())
}

fn read_records<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<StringRecord>> {
    let path = path.as_ref();
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        out.push(rec?);
    }
    Ok(out)
}

/// Import d'enseignants: header `id,name` (id vide = id aléatoire)
pub fn import_teachers_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<Teacher>> {
    read_records(path)?
        .iter()
        .map(|rec| -> anyhow::Result<Teacher> {
            let name = field(rec, 1, "name")?;
            Ok(match rec.get(0).map(str::trim).filter(|id| !id.is_empty()) {
                Some(id) => Teacher::with_id(id, name),
                None => Teacher::new(name),
            })
        })
        .collect()
}

/// Import de classes: header `id,name`
pub fn import_classes_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<SchoolClass>> {
    read_records(path)?
        .iter()
        .map(|rec| -> anyhow::Result<SchoolClass> {
            Ok(SchoolClass::new(field(rec, 0, "id")?, field(rec, 1, "name")?))
        })
        .collect()
}

/// Import de matières: header `id,name`
pub fn import_subjects_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<Subject>> {
    read_records(path)?
        .iter()
        .map(|rec| -> anyhow::Result<Subject> {
            Ok(Subject::new(field(rec, 0, "id")?, field(rec, 1, "name")?))
        })
        .collect()
}

/// Import d'affectations: header `teacher_id,subject_id,class_id`
pub fn import_assignments_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<Assignment>> {
    read_records(path)?
        .iter()
        .map(|rec| -> anyhow::Result<Assignment> {
            Ok(Assignment {
                teacher: TeacherId::new(field(rec, 0, "teacher_id")?),
                subject: SubjectId::new(field(rec, 1, "subject_id")?),
                class: ClassId::new(field(rec, 2, "class_id")?),
            })
        })
        .collect()
}

/// Import d'emploi du temps: header `class_id,subject_id,day,period`
pub fn import_timetable_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<TimetableSlot>> {
    read_records(path)?
        .iter()
        .map(|rec| -> anyhow::Result<TimetableSlot> {
            let day: SchoolDay = field(rec, 2, "day")?
                .parse()
                .with_context(|| format!("invalid day (line {})", line_of(rec)))?;
            let period: u8 = field(rec, 3, "period")?
                .parse()
                .with_context(|| format!("invalid period (line {})", line_of(rec)))?;
            Ok(TimetableSlot {
                class: ClassId::new(field(rec, 0, "class_id")?),
                subject: SubjectId::new(field(rec, 1, "subject_id")?),
                day,
                period,
            })
        })
        .collect()
}

/// Import de présences: header `teacher_id,date,status` (date `YYYY-MM-DD`, status Present|Absent)
pub fn import_attendance_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<AttendanceRecord>> {
    read_records(path)?
        .iter()
        .map(|rec| -> anyhow::Result<AttendanceRecord> {
            let date = NaiveDate::parse_from_str(field(rec, 1, "date")?, "%Y-%m-%d")
                .with_context(|| format!("invalid date (line {})", line_of(rec)))?;
            let status: AttendanceStatus = field(rec, 2, "status")?
                .parse()
                .map_err(anyhow::Error::msg)?;
            Ok(AttendanceRecord {
                teacher: TeacherId::new(field(rec, 0, "teacher_id")?),
                date,
                status,
            })
        })
        .collect()
}

/// Export JSON du rapport de remplacement (jolie mise en forme)
pub fn export_report_json<P: AsRef<Path>>(path: P, report: &SubstitutionReport) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(report)?;
    fs::write(path, s)?;
    Ok(())
}

/// Export CSV: une ligne par (absent, période, remplaçant), remplaçant vide si personne n'est libre.
pub fn export_report_csv<P: AsRef<Path>>(path: P, report: &SubstitutionReport) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record([
        "date",
        "absent_id",
        "absent_name",
        "day",
        "period",
        "class_id",
        "subject_id",
        "substitute_id",
        "substitute_name",
    ])?;
    if let SubstitutionReport::Plans { date, plans } = report {
        let date = date.to_string();
        for plan in plans {
            let PlanOutcome::Suggestions(suggestions) = &plan.outcome else {
                continue;
            };
            for s in suggestions {
                let period = s.missed.period.to_string();
                let base = [
                    date.as_str(),
                    plan.teacher.id.as_str(),
                    plan.teacher.name.as_str(),
                    s.missed.day.name(),
                    period.as_str(),
                    s.missed.class.id.as_str(),
                    s.missed.subject.id.as_str(),
                ];
                match &s.substitutes {
                    Substitutes::NoneAvailable => {
                        w.write_record(base.iter().copied().chain(["", ""]))?;
                    }
                    Substitutes::Available(list) => {
                        for t in list {
                            w.write_record(
                                base.iter()
                                    .copied()
                                    .chain([t.id.as_str(), t.name.as_str()]),
                            )?;
                        }
                    }
                }
            }
        }
    }
    w.flush()?;
    Ok(())
}

/// Export CSV des incohérences: ids multiples séparés par `;`, jour/période vides si sans objet.
pub fn export_conflicts_csv<P: AsRef<Path>>(path: P, conflicts: &[Conflict]) -> anyhow::Result<()> {
    let path = path.as_ref();
    let mut w = WriterBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    w.write_record(["kind", "teachers", "classes", "subjects", "day", "period"])?;
    for c in conflicts {
        let teachers: Vec<&str> = c.teachers.iter().map(|t| t.as_str()).collect();
        let classes: Vec<&str> = c.classes.iter().map(|t| t.as_str()).collect();
        let subjects: Vec<&str> = c.subjects.iter().map(|t| t.as_str()).collect();
        w.write_record([
            c.kind.as_str().to_string(),
            teachers.join(";"),
            classes.join(";"),
            subjects.join(";"),
            c.day.map(|d| d.to_string()).unwrap_or_default(),
            c.period.map(|p| p.to_string()).unwrap_or_default(),
        ])?;
    }
    w.flush()?;
    Ok(())
}
