#![forbid(unsafe_code)]
use anyhow::{anyhow, bail, Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use suppleance::{
    calendar::{load_calendar_from_file, SchoolCalendar, SchoolDay},
    engine::{Absentees, SubstitutionEngine, SubstitutionReport},
    io,
    model::{AttendanceStatus, ClassId, SchoolClass, Subject, SubjectId, Teacher, TeacherId},
    report::{ReportRenderer, TextReport},
    storage::{JsonStorage, Storage},
    store::ScheduleStore,
    SchoolAdmin,
};
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI de gestion des emplois du temps et des remplacements
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Fichier JSON de l'établissement
    #[arg(long, global = true, default_value = "school.json")]
    school: String,

    /// Calendrier scolaire JSON (jours ouvrés, périodes par jour)
    #[arg(long, global = true)]
    calendar: Option<String>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ImportKind {
    Teachers,
    Classes,
    Subjects,
    Assignments,
    Timetable,
    Attendance,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ajouter un enseignant
    AddTeacher {
        #[arg(long)]
        name: String,
        /// id explicite (sinon aléatoire)
        #[arg(long)]
        id: Option<String>,
    },
    /// Supprimer un enseignant (id ou nom), ses affectations et ses présences
    RemoveTeacher {
        #[arg(long)]
        teacher: String,
    },
    AddClass {
        #[arg(long)]
        id: String,
        #[arg(long)]
        name: String,
    },
    RemoveClass {
        #[arg(long)]
        id: String,
    },
    AddSubject {
        #[arg(long)]
        id: String,
        #[arg(long)]
        name: String,
    },
    RemoveSubject {
        #[arg(long)]
        id: String,
    },
    /// Affecter une matière d'une classe à un enseignant
    Assign {
        #[arg(long)]
        teacher: String,
        #[arg(long)]
        subject: String,
        #[arg(long)]
        class: String,
    },
    Unassign {
        #[arg(long)]
        subject: String,
        #[arg(long)]
        class: String,
    },
    /// Enregistrer (ou remplacer) la matière d'une classe à un créneau
    SetSlot {
        #[arg(long)]
        class: String,
        #[arg(long)]
        day: String,
        #[arg(long)]
        period: u8,
        #[arg(long)]
        subject: String,
    },
    RemoveSlot {
        #[arg(long)]
        class: String,
        #[arg(long)]
        day: String,
        #[arg(long)]
        period: u8,
    },
    /// Marquer la présence d'un enseignant
    Mark {
        #[arg(long)]
        teacher: String,
        /// Present | Absent
        #[arg(long)]
        status: String,
        /// YYYY-MM-DD (défaut : aujourd'hui)
        #[arg(long)]
        date: Option<String>,
    },
    /// Importer des données depuis un CSV
    Import {
        #[arg(long, value_enum)]
        kind: ImportKind,
        #[arg(long)]
        csv: String,
    },
    /// Afficher l'emploi du temps d'un enseignant ou d'une classe
    Timetable {
        #[arg(long, conflicts_with = "class")]
        teacher: Option<String>,
        #[arg(long)]
        class: Option<String>,
    },
    /// Vérifier les incohérences (doubles réservations, doublons)
    Check {
        /// Export CSV des conflits (optionnel)
        #[arg(long)]
        report: Option<String>,
    },
    /// Lister les absents d'une journée
    Absentees {
        #[arg(long)]
        date: Option<String>,
        /// Lire depuis une base SQLite plutôt que le fichier JSON
        #[arg(long)]
        db: Option<String>,
    },
    /// Suggérer des remplaçants
    Suggest {
        #[arg(long)]
        date: Option<String>,
        /// Limiter à un absent (id ou nom)
        #[arg(long)]
        teacher: Option<String>,
        #[arg(long)]
        db: Option<String>,
        #[arg(long)]
        out_json: Option<String>,
        #[arg(long)]
        out_csv: Option<String>,
    },
    /// Copier l'établissement dans une base SQLite
    ExportSqlite {
        #[arg(long)]
        out: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let calendar = match &cli.calendar {
        Some(path) => load_calendar_from_file(path)?,
        None => SchoolCalendar::default(),
    };
    let storage = JsonStorage::open(&cli.school)?;
    let mut admin = SchoolAdmin::with_school(storage.load_or_default()?, calendar.clone());

    let code = match cli.cmd {
        Commands::AddTeacher { name, id } => {
            let teacher = match id {
                Some(id) => Teacher::with_id(id, name.trim()),
                None => Teacher::new(name.trim()),
            };
            let id = admin.add_teacher(teacher)?;
            storage.save(admin.school())?;
            println!("{id}");
            0
        }
        Commands::RemoveTeacher { teacher } => {
            let id = teacher_id(&admin, &teacher)?;
            admin.remove_teacher(&id)?;
            storage.save(admin.school())?;
            0
        }
        Commands::AddClass { id, name } => {
            admin.add_class(SchoolClass::new(id, name))?;
            storage.save(admin.school())?;
            0
        }
        Commands::RemoveClass { id } => {
            admin.remove_class(&ClassId::new(id))?;
            storage.save(admin.school())?;
            0
        }
        Commands::AddSubject { id, name } => {
            admin.add_subject(Subject::new(id, name))?;
            storage.save(admin.school())?;
            0
        }
        Commands::RemoveSubject { id } => {
            admin.remove_subject(&SubjectId::new(id))?;
            storage.save(admin.school())?;
            0
        }
        Commands::Assign {
            teacher,
            subject,
            class,
        } => {
            let id = teacher_id(&admin, &teacher)?;
            admin.assign(&id, &SubjectId::new(subject), &ClassId::new(class))?;
            storage.save(admin.school())?;
            0
        }
        Commands::Unassign { subject, class } => {
            admin.unassign(&SubjectId::new(subject), &ClassId::new(class))?;
            storage.save(admin.school())?;
            0
        }
        Commands::SetSlot {
            class,
            day,
            period,
            subject,
        } => {
            let day: SchoolDay = day.parse()?;
            admin.set_slot(&ClassId::new(class), day, period, &SubjectId::new(subject))?;
            storage.save(admin.school())?;
            0
        }
        Commands::RemoveSlot { class, day, period } => {
            let day: SchoolDay = day.parse()?;
            admin.remove_slot(&ClassId::new(class), day, period)?;
            storage.save(admin.school())?;
            0
        }
        Commands::Mark {
            teacher,
            status,
            date,
        } => {
            let id = teacher_id(&admin, &teacher)?;
            let status: AttendanceStatus = status.parse().map_err(anyhow::Error::msg)?;
            admin.mark_attendance(&id, parse_date(date.as_deref())?, status)?;
            storage.save(admin.school())?;
            0
        }
        Commands::Import { kind, csv } => {
            let count = import(&mut admin, kind, &csv)?;
            storage.save(admin.school())?;
            println!("imported {count} row(s)");
            0
        }
        Commands::Timetable { teacher, class } => {
            let entries = match (teacher, class) {
                (Some(t), _) => admin.teacher_timetable(&teacher_id(&admin, &t)?),
                (None, Some(c)) => admin.class_timetable(&ClassId::new(c)),
                (None, None) => bail!("--teacher ou --class requis"),
            };
            if entries.is_empty() {
                println!("No timetable data found.");
            }
            for e in &entries {
                println!(
                    "{} P{} | {} – Class {} | {}",
                    e.day, e.period, e.subject_name, e.class_name, e.teacher_name
                );
            }
            0
        }
        Commands::Check { report } => {
            let conflicts = admin.detect_conflicts();
            if conflicts.is_empty() {
                println!("OK: no conflicts");
                0
            } else {
                eprintln!("Found {} conflict(s)", conflicts.len());
                if let Some(path) = report {
                    io::export_conflicts_csv(path, &conflicts)?;
                }
                // Code 2 = WARNING/INCOMPLETE
                2
            }
        }
        Commands::Absentees { date, db } => {
            let date = parse_date(date.as_deref())?;
            let db_store = db.as_deref().map(open_db_store).transpose()?;
            let store: &dyn ScheduleStore = match &db_store {
                Some(s) => &**s,
                None => admin.school(),
            };
            let engine = SubstitutionEngine::new(store, calendar)?;
            match engine.absentees(date)? {
                Absentees::None => println!("All teachers are present on {date}."),
                Absentees::Found(list) => {
                    for t in list {
                        println!("{} | {}", t.id, t.name);
                    }
                }
            }
            0
        }
        Commands::Suggest {
            date,
            teacher,
            db,
            out_json,
            out_csv,
        } => {
            let date = parse_date(date.as_deref())?;
            let db_store = db.as_deref().map(open_db_store).transpose()?;
            let store: &dyn ScheduleStore = match &db_store {
                Some(s) => &**s,
                None => admin.school(),
            };
            let engine = SubstitutionEngine::new(store, calendar)?;
            let report = match teacher {
                Some(key) => {
                    let id = store_teacher_id(store, &key)?;
                    let plan = engine.plan_for(&id, date)?;
                    SubstitutionReport::Plans {
                        date,
                        plans: vec![plan],
                    }
                }
                None => engine.run(date)?,
            };
            if let Some(path) = out_json {
                io::export_report_json(path, &report)?;
            }
            if let Some(path) = out_csv {
                io::export_report_csv(path, &report)?;
            }
            print!("{}", TextReport.render(&report));
            0
        }
        Commands::ExportSqlite { out } => {
            export_sqlite(admin.school(), &out)?;
            0
        }
    };

    std::process::exit(code);
}

fn parse_date(raw: Option<&str>) -> Result<NaiveDate> {
    match raw {
        Some(raw) => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
            .with_context(|| format!("invalid date (YYYY-MM-DD): {raw}")),
        None => Ok(Local::now().date_naive()),
    }
}

fn teacher_id(admin: &SchoolAdmin, key: &str) -> Result<TeacherId> {
    admin
        .school()
        .lookup_teacher(key)
        .map(|t| t.id.clone())
        .ok_or_else(|| anyhow!("unknown teacher: {key}"))
}

/// Résout `key` (id puis nom) dans le stockage réellement interrogé.
fn store_teacher_id(store: &dyn ScheduleStore, key: &str) -> Result<TeacherId> {
    let teachers = store.all_teachers()?;
    teachers
        .iter()
        .find(|t| t.id.as_str() == key)
        .or_else(|| teachers.iter().find(|t| t.name == key))
        .map(|t| t.id.clone())
        .ok_or_else(|| anyhow!("unknown teacher: {key}"))
}

fn import(admin: &mut SchoolAdmin, kind: ImportKind, path: &str) -> Result<usize> {
    let count = match kind {
        ImportKind::Teachers => {
            let rows = io::import_teachers_csv(path)?;
            let n = rows.len();
            for t in rows {
                admin.add_teacher(t)?;
            }
            n
        }
        ImportKind::Classes => {
            let rows = io::import_classes_csv(path)?;
            let n = rows.len();
            for c in rows {
                admin.add_class(c)?;
            }
            n
        }
        ImportKind::Subjects => {
            let rows = io::import_subjects_csv(path)?;
            let n = rows.len();
            for s in rows {
                admin.add_subject(s)?;
            }
            n
        }
        ImportKind::Assignments => {
            let rows = io::import_assignments_csv(path)?;
            let n = rows.len();
            for a in rows {
                admin.assign(&a.teacher, &a.subject, &a.class)?;
            }
            n
        }
        ImportKind::Timetable => {
            let rows = io::import_timetable_csv(path)?;
            let n = rows.len();
            for s in rows {
                admin.set_slot(&s.class, s.day, s.period, &s.subject)?;
            }
            n
        }
        ImportKind::Attendance => {
            let rows = io::import_attendance_csv(path)?;
            let n = rows.len();
            for r in rows {
                admin.mark_attendance(&r.teacher, r.date, r.status)?;
            }
            n
        }
    };
    Ok(count)
}

#[cfg(feature = "sqlite")]
fn open_db_store(path: &str) -> Result<Box<dyn ScheduleStore>> {
    Ok(Box::new(suppleance::SqliteStore::open(path)?))
}

#[cfg(not(feature = "sqlite"))]
fn open_db_store(path: &str) -> Result<Box<dyn ScheduleStore>> {
    bail!("built without the `sqlite` feature: cannot open {path}")
}

#[cfg(feature = "sqlite")]
fn export_sqlite(school: &suppleance::School, out: &str) -> Result<()> {
    let mut store = suppleance::SqliteStore::open(out)?;
    store.import_school(school)?;
    println!("exported to {out}");
    Ok(())
}

#[cfg(not(feature = "sqlite"))]
fn export_sqlite(_school: &suppleance::School, out: &str) -> Result<()> {
    bail!("built without the `sqlite` feature: cannot write {out}")
}
