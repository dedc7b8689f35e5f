use chrono::{Datelike, NaiveDate};

/// Day names indexed 0 = Monday .. 6 = Sunday, per supported locale. The
/// portal renders these in the customer's own language; anything we do not
/// know falls back to English.
pub fn day_name(day_of_week: i32, locale: &str) -> &'static str {
    const NL: [&str; 7] = ["maandag", "dinsdag", "woensdag", "donderdag", "vrijdag", "zaterdag", "zondag"];
    const EN: [&str; 7] = ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday"];

    let idx = day_of_week.rem_euclid(7) as usize;
    match locale {
        "nl" => NL[idx],
        _ => EN[idx],
    }
}

/// 0 = Monday .. 6 = Sunday for a calendar date.
pub fn weekday_index(date: NaiveDate) -> i32 {
    date.weekday().num_days_from_monday() as i32
}

/// Truncates "HH:MM:SS" (or already-short) times to "HH:MM".
pub fn truncate_to_minutes(time: &str) -> &str {
    if time.len() > 5 { &time[..5] } else { time }
}
