use super::{types::AdminError, SchoolAdmin};
use crate::calendar::SchoolDay;
use crate::model::{
    Assignment, AttendanceRecord, AttendanceStatus, ClassId, SchoolClass, Subject, SubjectId,
    Teacher, TeacherId, TimetableSlot,
};
use chrono::NaiveDate;
use tracing::{debug, info};

pub(super) fn add_teacher(admin: &mut SchoolAdmin, teacher: Teacher) -> Result<TeacherId, AdminError> {
    if teacher.name.trim().is_empty() {
        return Err(AdminError::EmptyName);
    }
    if admin.school.find_teacher(&teacher.id).is_some() {
        return Err(AdminError::DuplicateId(teacher.id.to_string()));
    }
    info!(id = %teacher.id, name = %teacher.name, "teacher added");
    let id = teacher.id.clone();
    admin.school.teachers.push(teacher);
    Ok(id)
}

pub(super) fn rename_teacher(
    admin: &mut SchoolAdmin,
    id: &TeacherId,
    name: &str,
) -> Result<(), AdminError> {
    if name.trim().is_empty() {
        return Err(AdminError::EmptyName);
    }
    let teacher = admin
        .school
        .teachers
        .iter_mut()
        .find(|t| &t.id == id)
        .ok_or_else(|| AdminError::UnknownTeacher(id.to_string()))?;
    teacher.name = name.trim().to_string();
    Ok(())
}

/// Supprime l'enseignant, ses affectations et ses présences.
pub(super) fn remove_teacher(admin: &mut SchoolAdmin, id: &TeacherId) -> Result<Teacher, AdminError> {
    let Some(pos) = admin.school.teachers.iter().position(|t| &t.id == id) else {
        return Err(AdminError::UnknownTeacher(id.to_string()));
    };
    let school = &mut admin.school;
    school.assignments.retain(|a| &a.teacher != id);
    school.attendance.retain(|r| &r.teacher != id);
    info!(%id, "teacher removed");
    Ok(school.teachers.remove(pos))
}

pub(super) fn add_class(admin: &mut SchoolAdmin, class: SchoolClass) -> Result<ClassId, AdminError> {
    if class.id.as_str().trim().is_empty() || class.name.trim().is_empty() {
        return Err(AdminError::EmptyName);
    }
    if admin.school.find_class(&class.id).is_some() {
        return Err(AdminError::DuplicateId(class.id.to_string()));
    }
    let id = class.id.clone();
    admin.school.classes.push(class);
    Ok(id)
}

/// Supprime la classe avec ses affectations et ses créneaux.
pub(super) fn remove_class(admin: &mut SchoolAdmin, id: &ClassId) -> Result<SchoolClass, AdminError> {
    let Some(pos) = admin.school.classes.iter().position(|c| &c.id == id) else {
        return Err(AdminError::UnknownClass(id.to_string()));
    };
    let school = &mut admin.school;
    school.assignments.retain(|a| &a.class != id);
    school.timetable.retain(|s| &s.class != id);
    Ok(school.classes.remove(pos))
}

pub(super) fn add_subject(admin: &mut SchoolAdmin, subject: Subject) -> Result<SubjectId, AdminError> {
    if subject.id.as_str().trim().is_empty() || subject.name.trim().is_empty() {
        return Err(AdminError::EmptyName);
    }
    if admin.school.find_subject(&subject.id).is_some() {
        return Err(AdminError::DuplicateId(subject.id.to_string()));
    }
    let id = subject.id.clone();
    admin.school.subjects.push(subject);
    Ok(id)
}

pub(super) fn remove_subject(admin: &mut SchoolAdmin, id: &SubjectId) -> Result<Subject, AdminError> {
    let Some(pos) = admin.school.subjects.iter().position(|s| &s.id == id) else {
        return Err(AdminError::UnknownSubject(id.to_string()));
    };
    let school = &mut admin.school;
    school.assignments.retain(|a| &a.subject != id);
    school.timetable.retain(|s| &s.subject != id);
    Ok(school.subjects.remove(pos))
}

/// Une seule affectation par (matière, classe). Réaffecter au même enseignant est sans effet.
pub(super) fn assign(
    admin: &mut SchoolAdmin,
    teacher: &TeacherId,
    subject: &SubjectId,
    class: &ClassId,
) -> Result<(), AdminError> {
    ensure_teacher(admin, teacher)?;
    ensure_subject(admin, subject)?;
    ensure_class(admin, class)?;

    if let Some(existing) = admin
        .school
        .assignments
        .iter()
        .find(|a| &a.subject == subject && &a.class == class)
    {
        if &existing.teacher == teacher {
            return Ok(());
        }
        return Err(AdminError::SubjectAlreadyAssigned {
            subject: subject.clone(),
            class: class.clone(),
        });
    }

    debug!(%teacher, %subject, %class, "assignment added");
    admin.school.assignments.push(Assignment {
        teacher: teacher.clone(),
        subject: subject.clone(),
        class: class.clone(),
    });
    Ok(())
}

pub(super) fn unassign(
    admin: &mut SchoolAdmin,
    subject: &SubjectId,
    class: &ClassId,
) -> Result<Assignment, AdminError> {
    let Some(pos) = admin
        .school
        .assignments
        .iter()
        .position(|a| &a.subject == subject && &a.class == class)
    else {
        return Err(AdminError::UnknownAssignment {
            subject: subject.clone(),
            class: class.clone(),
        });
    };
    Ok(admin.school.assignments.remove(pos))
}

/// Enregistre ou remplace la matière d'une classe à (jour, période).
pub(super) fn set_slot(
    admin: &mut SchoolAdmin,
    class: &ClassId,
    day: SchoolDay,
    period: u8,
    subject: &SubjectId,
) -> Result<(), AdminError> {
    ensure_class(admin, class)?;
    ensure_subject(admin, subject)?;
    if !admin.calendar.is_school_day(day) {
        return Err(AdminError::NotASchoolDay(day));
    }
    if !admin.calendar.contains_period(period) {
        return Err(AdminError::PeriodOutOfRange {
            period,
            max: admin.calendar.periods_per_day,
        });
    }

    if let Some(slot) = admin
        .school
        .timetable
        .iter_mut()
        .find(|s| &s.class == class && s.day == day && s.period == period)
    {
        debug!(%class, %day, period, from = %slot.subject, to = %subject, "slot updated");
        slot.subject = subject.clone();
        return Ok(());
    }

    admin.school.timetable.push(TimetableSlot {
        class: class.clone(),
        subject: subject.clone(),
        day,
        period,
    });
    Ok(())
}

pub(super) fn remove_slot(
    admin: &mut SchoolAdmin,
    class: &ClassId,
    day: SchoolDay,
    period: u8,
) -> Result<TimetableSlot, AdminError> {
    let Some(pos) = admin
        .school
        .timetable
        .iter()
        .position(|s| &s.class == class && s.day == day && s.period == period)
    else {
        return Err(AdminError::UnknownSlot {
            class: class.clone(),
            day,
            period,
        });
    };
    Ok(admin.school.timetable.remove(pos))
}

/// Un seul statut par (enseignant, date) : un second marquage remplace le premier.
pub(super) fn mark_attendance(
    admin: &mut SchoolAdmin,
    teacher: &TeacherId,
    date: NaiveDate,
    status: AttendanceStatus,
) -> Result<(), AdminError> {
    ensure_teacher(admin, teacher)?;
    if let Some(record) = admin.school.find_attendance_mut(teacher, date) {
        record.status = status;
    } else {
        admin.school.attendance.push(AttendanceRecord {
            teacher: teacher.clone(),
            date,
            status,
        });
    }
    debug!(%teacher, %date, %status, "attendance marked");
    Ok(())
}

fn ensure_teacher(admin: &SchoolAdmin, id: &TeacherId) -> Result<(), AdminError> {
    admin
        .school
        .find_teacher(id)
        .map(|_| ())
        .ok_or_else(|| AdminError::UnknownTeacher(id.to_string()))
}

fn ensure_class(admin: &SchoolAdmin, id: &ClassId) -> Result<(), AdminError> {
    admin
        .school
        .find_class(id)
        .map(|_| ())
        .ok_or_else(|| AdminError::UnknownClass(id.to_string()))
}

fn ensure_subject(admin: &SchoolAdmin, id: &SubjectId) -> Result<(), AdminError> {
    admin
        .school
        .find_subject(id)
        .map(|_| ())
        .ok_or_else(|| AdminError::UnknownSubject(id.to_string()))
}
