//! Persistance fichier de l'établissement (un seul document JSON).

use crate::model::School;
use anyhow::Context;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

pub trait Storage {
    fn load(&self) -> anyhow::Result<School>;
    /// Remplace le contenu d'un bloc : un lecteur voit l'ancien ou le nouveau, jamais un mélange.
    fn save(&self, school: &School) -> anyhow::Result<()>;
}

pub struct JsonStorage {
    path: PathBuf,
}

impl JsonStorage {
    pub fn open<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        Ok(Self {
            path: path.as_ref().to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Premier lancement : pas encore de fichier, établissement vide.
    pub fn load_or_default(&self) -> anyhow::Result<School> {
        if self.path.exists() {
            return self.load();
        }
        debug!(path = %self.path.display(), "no school file yet");
        Ok(School::default())
    }

    // le fichier temporaire doit être sur le même système de fichiers que la cible
    fn staging_dir(&self) -> &Path {
        self.path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
    }
}

impl Storage for JsonStorage {
    fn load(&self) -> anyhow::Result<School> {
        let file =
            File::open(&self.path).with_context(|| format!("opening {}", self.path.display()))?;
        let school: School = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("{} is not a valid school file", self.path.display()))?;
        debug!(
            path = %self.path.display(),
            teachers = school.teachers.len(),
            slots = school.timetable.len(),
            "school loaded"
        );
        Ok(school)
    }

    fn save(&self, school: &School) -> anyhow::Result<()> {
        let mut staged = NamedTempFile::new_in(self.staging_dir())
            .with_context(|| format!("staging {}", self.path.display()))?;
        {
            let mut out = BufWriter::new(staged.as_file_mut());
            serde_json::to_writer_pretty(&mut out, school)?;
            out.write_all(b"\n")?;
            out.flush()?;
        }
        staged.as_file().sync_all()?;
        staged
            .persist(&self.path)
            .map_err(|e| e.error)
            .with_context(|| format!("replacing {}", self.path.display()))?;
        debug!(path = %self.path.display(), "school saved");
        Ok(())
    }
}
