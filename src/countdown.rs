//! Days-until-Christmas countdown.

use crate::{Error, Result};
use chrono::{Datelike, NaiveDate, NaiveDateTime, TimeDelta};

/// Words shown before the number.
pub const COUNTDOWN_WORDS: [&str; 3] = ["DAYS", "UNTIL", "XMAS"];

pub const WORD_FONT_SIZE: f32 = 16.0;
pub const NUMBER_FONT_SIZE: f32 = 32.0;

/// Midnight at the start of Dec 25 in `year`, if chrono can represent it.
fn christmas(year: i32) -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(year, 12, 25).map(|d| d.and_time(chrono::NaiveTime::MIN))
}

/// Whole days from `now` until the next Christmas morning, a partial day
/// counting as one.
///
/// Christmas is this year's Dec 25 00:00 unless `now` is strictly past it, so
/// exactly midnight on the 25th gives 0. `None` only past Dec 25 of the last
/// year chrono supports.
pub fn days_until_xmas(now: NaiveDateTime) -> Option<i64> {
    let mut target = christmas(now.year())?;
    if now > target {
        target = christmas(now.year().checked_add(1)?)?;
    }
    let remaining = target - now;
    let days = remaining.num_days();
    if remaining > TimeDelta::days(days) {
        Some(days + 1)
    } else {
        Some(days)
    }
}

/// Which hold a countdown line uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Hold {
    Word,
    Number,
}

/// One text frame of the countdown sequence.
#[derive(Clone, Debug, PartialEq)]
pub struct CountdownLine {
    pub text: String,
    pub size: f32,
    pub hold: Hold,
}

/// The full sequence for `now`: the three words, then the day count.
pub fn countdown_lines(now: NaiveDateTime) -> Result<Vec<CountdownLine>> {
    let days = days_until_xmas(now).ok_or(Error::CalendarOverflow(now))?;
    let mut lines: Vec<CountdownLine> = COUNTDOWN_WORDS
        .iter()
        .map(|word| CountdownLine {
            text: word.to_string(),
            size: WORD_FONT_SIZE,
            hold: Hold::Word,
        })
        .collect();
    lines.push(CountdownLine {
        text: days.to_string(),
        size: NUMBER_FONT_SIZE,
        hold: Hold::Number,
    });
    Ok(lines)
}
