//! Display formatting for query results.

use chrono::NaiveDate;

/// Placeholder shown when a listing states no machine-readable salary.
pub const UNSTATED_SALARY: &str = "A consultar / Variável";

/// Placeholder shown when no application deadline was found.
pub const UNKNOWN_DEADLINE: &str = "Indefinida";

/// Format a value as Brazilian currency: "R$ 1.234,56".
///
/// Zero and negative values render as the unstated placeholder, since 0.0
/// is the "no salary found" sentinel, never a real wage.
pub fn format_brl(value: f64) -> String {
    if value <= 0.0 {
        return UNSTATED_SALARY.to_string();
    }

    let cents = (value * 100.0).round() as i64;
    let whole = cents / 100;
    let frac = cents % 100;

    format!("R$ {},{frac:02}", group_thousands(whole))
}

/// Format a deadline as dd/mm/yyyy, or the unknown placeholder.
pub fn format_deadline(deadline: Option<NaiveDate>) -> String {
    match deadline {
        Some(date) => date.format("%d/%m/%Y").to_string(),
        None => UNKNOWN_DEADLINE.to_string(),
    }
}

fn group_thousands(mut value: i64) -> String {
    let mut groups = Vec::new();
    loop {
        if value < 1000 {
            groups.push(value.to_string());
            break;
        }
        groups.push(format!("{:03}", value % 1000));
        value /= 1000;
    }
    groups.reverse();
    groups.join(".")
}
