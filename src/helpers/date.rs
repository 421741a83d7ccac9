//! Date helper functions

use chrono::{Datelike, NaiveDateTime};

const MONTHS_PT: [&str; 12] = [
    "janeiro",
    "fevereiro",
    "março",
    "abril",
    "maio",
    "junho",
    "julho",
    "agosto",
    "setembro",
    "outubro",
    "novembro",
    "dezembro",
];

/// Short Brazilian date
///
/// # Examples
/// ```ignore
/// format_date_br(&date) // -> "15/03/2024"
/// ```
pub fn format_date_br(date: &NaiveDateTime) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Long Brazilian date, as shown on post pages
///
/// # Examples
/// ```ignore
/// long_date_br(&date) // -> "15 de março de 2024"
/// ```
pub fn long_date_br(date: &NaiveDateTime) -> String {
    let month = MONTHS_PT[date.month0() as usize];
    format!("{} de {} de {}", date.day(), month, date.year())
}

/// Machine-readable date for `<time datetime>`
pub fn date_xml(date: &NaiveDateTime) -> String {
    date.format("%Y-%m-%dT%H:%M:%S").to_string()
}
