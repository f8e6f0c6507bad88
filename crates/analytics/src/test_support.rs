use chrono::NaiveDate;
use core_types::Submission;

fn text(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

/// Builds a submission from `DD/MM/YYYY` and plain cells; "" means missing.
pub fn row(
    date: &str,
    document_type: &str,
    project: &str,
    emitter: &str,
    lot: &str,
    indice: &str,
    label: &str,
) -> Submission {
    Submission {
        submitted_on: NaiveDate::parse_from_str(date, "%d/%m/%Y").ok(),
        document_type: text(document_type),
        project: text(project),
        emitter: text(emitter),
        lot: text(lot),
        indice: text(indice),
        label: text(label),
    }
}

pub fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
}

/// A small project: two plans, one note, and an undated plan.
pub fn sample() -> Vec<Submission> {
    vec![
        row("01/01/2023", "PLAN", "Ecole", "ARCHI", "GO", "A", "Plan RDC"),
        row("11/01/2023", "PLAN", "Ecole", "ARCHI", "GO", "B", "Plan RDC"),
        row("05/01/2023", "NOTE", "Ecole", "BET", "CVC", "0", "Note"),
        row("21/01/2023", "PLAN", "Ecole", "ARCHI", "GO", "B", "Plan RDC"),
        row("15/02/2023", "NOTE", "Ecole", "BET", "CVC", "", "Note"),
        row("", "PLAN", "Ecole", "ARCHI", "GO", "C", "Plan R+1"),
    ]
}
