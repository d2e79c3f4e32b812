use anyhow::{bail, Context, Result};
use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Jour de la semaine tel qu'il est saisi dans l'emploi du temps ("Monday".."Sunday").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SchoolDay {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl SchoolDay {
    pub const ALL: [SchoolDay; 7] = [
        SchoolDay::Monday,
        SchoolDay::Tuesday,
        SchoolDay::Wednesday,
        SchoolDay::Thursday,
        SchoolDay::Friday,
        SchoolDay::Saturday,
        SchoolDay::Sunday,
    ];

    /// Jour de la semaine d'une date.
    pub fn of(date: NaiveDate) -> Self {
        Self::from(date.weekday())
    }

    pub fn name(self) -> &'static str {
        match self {
            SchoolDay::Monday => "Monday",
            SchoolDay::Tuesday => "Tuesday",
            SchoolDay::Wednesday => "Wednesday",
            SchoolDay::Thursday => "Thursday",
            SchoolDay::Friday => "Friday",
            SchoolDay::Saturday => "Saturday",
            SchoolDay::Sunday => "Sunday",
        }
    }

    /// Position chronologique dans la semaine (lundi = 0).
    pub fn index(self) -> u8 {
        Weekday::from(self).num_days_from_monday() as u8
    }
}

impl From<Weekday> for SchoolDay {
    fn from(w: Weekday) -> Self {
        match w {
            Weekday::Mon => SchoolDay::Monday,
            Weekday::Tue => SchoolDay::Tuesday,
            Weekday::Wed => SchoolDay::Wednesday,
            Weekday::Thu => SchoolDay::Thursday,
            Weekday::Fri => SchoolDay::Friday,
            Weekday::Sat => SchoolDay::Saturday,
            Weekday::Sun => SchoolDay::Sunday,
        }
    }
}

impl From<SchoolDay> for Weekday {
    fn from(d: SchoolDay) -> Self {
        match d {
            SchoolDay::Monday => Weekday::Mon,
            SchoolDay::Tuesday => Weekday::Tue,
            SchoolDay::Wednesday => Weekday::Wed,
            SchoolDay::Thursday => Weekday::Thu,
            SchoolDay::Friday => Weekday::Fri,
            SchoolDay::Saturday => Weekday::Sat,
            SchoolDay::Sunday => Weekday::Sun,
        }
    }
}

impl fmt::Display for SchoolDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown day name: {0}")]
pub struct ParseDayError(String);

impl FromStr for SchoolDay {
    type Err = ParseDayError;

    /// Accepte le nom complet ou l'abréviation anglaise, sans tenir compte de la casse.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim().to_ascii_lowercase();
        SchoolDay::ALL
            .into_iter()
            .find(|d| {
                let name = d.name().to_ascii_lowercase();
                raw == name || raw == name[..3]
            })
            .ok_or_else(|| ParseDayError(s.to_string()))
    }
}

/// Configuration du calendrier scolaire : jours ouvrés et nombre de périodes par jour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchoolCalendar {
    #[serde(default = "default_school_days")]
    pub school_days: Vec<SchoolDay>,
    #[serde(default = "default_periods_per_day")]
    pub periods_per_day: u8,
}

fn default_school_days() -> Vec<SchoolDay> {
    SchoolDay::ALL[..6].to_vec()
}

fn default_periods_per_day() -> u8 {
    8
}

impl Default for SchoolCalendar {
    fn default() -> Self {
        Self {
            school_days: default_school_days(),
            periods_per_day: default_periods_per_day(),
        }
    }
}

impl SchoolCalendar {
    pub fn validate(&self) -> Result<()> {
        if self.school_days.is_empty() {
            bail!("calendar must define at least one school day");
        }
        if self.periods_per_day == 0 {
            bail!("periods_per_day must be > 0");
        }
        for (i, day) in self.school_days.iter().enumerate() {
            if self.school_days[i + 1..].contains(day) {
                bail!("school day listed twice: {day}");
            }
        }
        Ok(())
    }

    pub fn is_school_day(&self, day: SchoolDay) -> bool {
        self.school_days.contains(&day)
    }

    /// Les périodes sont numérotées à partir de 1.
    pub fn contains_period(&self, period: u8) -> bool {
        (1..=self.periods_per_day).contains(&period)
    }
}

pub fn load_calendar_from_file<P: AsRef<Path>>(path: P) -> Result<SchoolCalendar> {
    let path = path.as_ref();
    let data = fs::read(path).with_context(|| format!("reading calendar {}", path.display()))?;
    let calendar: SchoolCalendar = serde_json::from_slice(&data)
        .with_context(|| format!("parsing calendar {}", path.display()))?;
    calendar.validate()?;
    Ok(calendar)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_and_short_names() {
        assert_eq!("Monday".parse::<SchoolDay>().unwrap(), SchoolDay::Monday);
        assert_eq!("sat".parse::<SchoolDay>().unwrap(), SchoolDay::Saturday);
        assert_eq!(" THURSDAY ".parse::<SchoolDay>().unwrap(), SchoolDay::Thursday);
        assert!("Mo".parse::<SchoolDay>().is_err());
        assert!("Funday".parse::<SchoolDay>().is_err());
    }

    #[test]
    fn weekday_of_date() {
        // 2025-10-20 est un lundi
        let d = NaiveDate::from_ymd_opt(2025, 10, 20).unwrap();
        assert_eq!(SchoolDay::of(d), SchoolDay::Monday);
        assert_eq!(SchoolDay::of(d.succ_opt().unwrap()).index(), 1);
    }

    #[test]
    fn default_calendar_excludes_sunday() {
        let cal = SchoolCalendar::default();
        assert!(cal.validate().is_ok());
        assert!(cal.is_school_day(SchoolDay::Saturday));
        assert!(!cal.is_school_day(SchoolDay::Sunday));
        assert!(cal.contains_period(8));
        assert!(!cal.contains_period(0));
        assert!(!cal.contains_period(9));
    }

    #[test]
    fn rejects_duplicate_days() {
        let cal = SchoolCalendar {
            school_days: vec![SchoolDay::Monday, SchoolDay::Monday],
            periods_per_day: 6,
        };
        assert!(cal.validate().is_err());
    }

    #[test]
    fn partial_json_uses_defaults() {
        let cal: SchoolCalendar = serde_json::from_str(r#"{"periods_per_day": 6}"#).unwrap();
        assert_eq!(cal.periods_per_day, 6);
        assert_eq!(cal.school_days.len(), 6);
    }
}
