//! Dates covered by a sweep.

use chrono::{Datelike, NaiveDate};

/// Month lengths of the fixed sweep table (February never has 29 days).
const FIXED_MONTH_LENGTHS: [u32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CalendarMode {
    /// Real month lengths, leap days included.
    #[default]
    Gregorian,
    /// Fixed table that skips 29 February, matching older sweep results.
    FixedFebruary,
}

/// Every date from 1 January `from_year` to 31 December `to_year`.
pub fn sweep_dates(from_year: i32, to_year: i32, mode: CalendarMode) -> Vec<NaiveDate> {
    let Some(first) = NaiveDate::from_ymd_opt(from_year, 1, 1) else {
        return Vec::new();
    };

    match mode {
        CalendarMode::Gregorian => first
            .iter_days()
            .take_while(|date| date.year() <= to_year)
            .collect(),
        CalendarMode::FixedFebruary => (from_year..=to_year)
            .flat_map(|year| {
                FIXED_MONTH_LENGTHS
                    .iter()
                    .zip(1u32..)
                    .flat_map(move |(&days, month)| {
                        (1..=days).filter_map(move |day| NaiveDate::from_ymd_opt(year, month, day))
                    })
            })
            .collect(),
    }
}
