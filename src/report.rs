use crate::engine::{AbsencePlan, PlanOutcome, Substitutes, SubstitutionReport};
use std::fmt::Write;

/// Permet de customiser le rendu du rapport (texte, HTML, etc.).
pub trait ReportRenderer {
    fn render_plan(&self, plan: &AbsencePlan) -> String;

    fn render(&self, report: &SubstitutionReport) -> String;
}

/// Rendu texte brut, une section par absent.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextReport;

impl ReportRenderer for TextReport {
    fn render_plan(&self, plan: &AbsencePlan) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{} ({})", plan.teacher.name, plan.teacher.id);

        let suggestions = match &plan.outcome {
            PlanOutcome::NoScheduledPeriods => {
                let _ = writeln!(
                    out,
                    "{} had no scheduled periods on {}.",
                    plan.teacher.name, plan.day
                );
                return out;
            }
            PlanOutcome::Suggestions(s) => s,
        };

        let _ = writeln!(out, "Missed periods:");
        for s in suggestions {
            let _ = writeln!(
                out,
                "  {} – Class {} | Period {}",
                s.missed.subject.name, s.missed.class.name, s.missed.period
            );
        }
        let _ = writeln!(out, "Suggested substitutes:");
        for s in suggestions {
            let _ = writeln!(
                out,
                "  {} – Class {} (Period {})",
                s.missed.subject.name, s.missed.class.name, s.missed.period
            );
            match &s.substitutes {
                Substitutes::NoneAvailable => {
                    let _ = writeln!(out, "    No available substitute found for this period.");
                }
                Substitutes::Available(list) => {
                    for t in list {
                        let _ = writeln!(out, "    {} is available", t.name);
                    }
                }
            }
        }
        out
    }

    fn render(&self, report: &SubstitutionReport) -> String {
        match report {
            SubstitutionReport::NoAbsentees { date } => {
                format!("All teachers are present on {date}.\n")
            }
            SubstitutionReport::Plans { date, plans } => {
                let mut out = format!("Substitutions for {date}\n");
                for plan in plans {
                    out.push('\n');
                    out.push_str(&self.render_plan(plan));
                }
                out
            }
        }
    }
}
