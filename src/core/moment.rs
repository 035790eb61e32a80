//! Moment-style date formatting
//!
//! Daily note names are produced from moment.js display patterns such as
//! `YYYY-MM-DD` or `dddd, MMMM Do`. This module implements the English-locale
//! display tokens on top of chrono. Characters that are not tokens are copied
//! through unchanged, and `[...]` escapes literal text.

use std::sync::OnceLock;

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Timelike};
use regex_lite::{Captures, Regex};

/// Pattern used when the format string is empty
pub const DEFAULT_FORMAT: &str = "YYYY-MM-DDTHH:mm:ssZ";

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const WEEKDAYS: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// First day of the English locale week (Sunday) and the January day that
/// always falls in week 1 (`7 + dow - doy`).
const LOCALE_DOW: i32 = 0;
const LOCALE_DOY: i32 = 6;
const ISO_DOW: i32 = 1;
const ISO_DOY: i32 = 4;

fn localized_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\[[^\[]*\]|\\?(?:LTS|LT|LLLL|LLL|LL|L|llll|lll|ll|l)").unwrap()
    })
}

fn token_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(concat!(
            r"\[[^\[]*\]|\\?(?:",
            r"[Hh]mm(?:ss)?|Mo|M{1,4}|DDDo|Do|D{1,4}|do|d{1,4}|wo|ww?|Wo|WW?|Qo|Q|N{1,5}|",
            r"YYYYYY|YYYYY|YYYY|YY|Y|y{2,4}|yo?|ggggg|gggg|gg|GGGGG|GGGG|GG|",
            r"e|E|a|A|hh?|HH?|kk?|mm?|ss?|",
            r"S{1,9}|x|X|zz?|ZZ?|(?s:.))",
        ))
        .unwrap()
    })
}

/// Format `now` with a moment.js display pattern
pub fn format(now: &DateTime<FixedOffset>, pattern: &str) -> String {
    let pattern = if pattern.is_empty() {
        DEFAULT_FORMAT
    } else {
        pattern
    };

    let expanded = expand_localized(pattern);
    let mut out = String::with_capacity(expanded.len() + 8);
    for token in token_regex().find_iter(&expanded) {
        out.push_str(&format_token(now, token.as_str()));
    }
    out
}

/// Replace the localized shorthands (`L`, `LT`, ...) with their English
/// expansions. Bracketed and backslash-escaped shorthands are kept as written.
fn expand_localized(pattern: &str) -> String {
    localized_regex()
        .replace_all(pattern, |caps: &Captures| {
            let token = &caps[0];
            let expansion = match token {
                "LT" => "h:mm A",
                "LTS" => "h:mm:ss A",
                "L" => "MM/DD/YYYY",
                "LL" => "MMMM D, YYYY",
                "LLL" => "MMMM D, YYYY h:mm A",
                "LLLL" => "dddd, MMMM D, YYYY h:mm A",
                "l" => "M/D/YYYY",
                "ll" => "MMM D, YYYY",
                "lll" => "MMM D, YYYY h:mm A",
                "llll" => "ddd, MMM D, YYYY h:mm A",
                literal => literal,
            };
            expansion.to_string()
        })
        .into_owned()
}

fn format_token(now: &DateTime<FixedOffset>, token: &str) -> String {
    if token.len() >= 2 && token.starts_with('[') && token.ends_with(']') {
        return token[1..token.len() - 1].to_string();
    }
    if token.len() >= 2 && token.starts_with('\\') {
        return token[1..].to_string();
    }

    let date = now.date_naive();
    let year = i64::from(now.year());
    let month = now.month();
    let weekday = now.weekday().num_days_from_sunday();
    let hour = now.hour();

    match token {
        // Year
        "Y" if year <= 9999 => zero_fill(year, 4, false),
        "Y" => format!("+{year}"),
        "YY" => zero_fill(year.rem_euclid(100), 2, false),
        "YYYY" => zero_fill(year, 4, false),
        "YYYYY" => zero_fill(year, 5, false),
        "YYYYYY" => zero_fill(year, 6, true),

        // Era (Anno Domini from year 1, Before Christ counting back from year 0)
        "N" | "NN" | "NNN" | "NNNNN" => (if year >= 1 { "AD" } else { "BC" }).to_string(),
        "NNNN" => (if year >= 1 { "Anno Domini" } else { "Before Christ" }).to_string(),
        "y" => era_year(year).to_string(),
        "yo" => ordinal(era_year(year)),
        "yy" => zero_fill(era_year(year), 2, false),
        "yyy" => zero_fill(era_year(year), 3, false),
        "yyyy" => zero_fill(era_year(year), 4, false),

        // Quarter
        "Q" => quarter(month).to_string(),
        "Qo" => ordinal(i64::from(quarter(month))),

        // Month
        "M" => month.to_string(),
        "Mo" => ordinal(i64::from(month)),
        "MM" => zero_fill(i64::from(month), 2, false),
        "MMM" => MONTHS[month as usize - 1][..3].to_string(),
        "MMMM" => MONTHS[month as usize - 1].to_string(),

        // Day of month and day of year
        "D" => now.day().to_string(),
        "Do" => ordinal(i64::from(now.day())),
        "DD" => zero_fill(i64::from(now.day()), 2, false),
        "DDD" => now.ordinal().to_string(),
        "DDDo" => ordinal(i64::from(now.ordinal())),
        "DDDD" => zero_fill(i64::from(now.ordinal()), 3, false),

        // Day of week
        "d" | "e" => weekday.to_string(),
        "do" => ordinal(i64::from(weekday)),
        "dd" => WEEKDAYS[weekday as usize][..2].to_string(),
        "ddd" => WEEKDAYS[weekday as usize][..3].to_string(),
        "dddd" => WEEKDAYS[weekday as usize].to_string(),
        "E" => now.weekday().number_from_monday().to_string(),

        // Week of year and week-year
        "w" => week_of_year(date, LOCALE_DOW, LOCALE_DOY).0.to_string(),
        "wo" => ordinal(i64::from(week_of_year(date, LOCALE_DOW, LOCALE_DOY).0)),
        "ww" => zero_fill(i64::from(week_of_year(date, LOCALE_DOW, LOCALE_DOY).0), 2, false),
        "W" => week_of_year(date, ISO_DOW, ISO_DOY).0.to_string(),
        "Wo" => ordinal(i64::from(week_of_year(date, ISO_DOW, ISO_DOY).0)),
        "WW" => zero_fill(i64::from(week_of_year(date, ISO_DOW, ISO_DOY).0), 2, false),
        "gg" => {
            let week_year = i64::from(week_of_year(date, LOCALE_DOW, LOCALE_DOY).1);
            zero_fill(week_year.rem_euclid(100), 2, false)
        }
        "gggg" => zero_fill(i64::from(week_of_year(date, LOCALE_DOW, LOCALE_DOY).1), 4, false),
        "ggggg" => zero_fill(i64::from(week_of_year(date, LOCALE_DOW, LOCALE_DOY).1), 5, false),
        "GG" => {
            let week_year = i64::from(week_of_year(date, ISO_DOW, ISO_DOY).1);
            zero_fill(week_year.rem_euclid(100), 2, false)
        }
        "GGGG" => zero_fill(i64::from(week_of_year(date, ISO_DOW, ISO_DOY).1), 4, false),
        "GGGGG" => zero_fill(i64::from(week_of_year(date, ISO_DOW, ISO_DOY).1), 5, false),

        // Time of day
        "H" => hour.to_string(),
        "HH" => zero_fill(i64::from(hour), 2, false),
        "h" => hour12(hour).to_string(),
        "hh" => zero_fill(i64::from(hour12(hour)), 2, false),
        "k" => hour24(hour).to_string(),
        "kk" => zero_fill(i64::from(hour24(hour)), 2, false),
        "hmm" => format!("{}{:02}", hour12(hour), now.minute()),
        "hmmss" => format!("{}{:02}{:02}", hour12(hour), now.minute(), now.second()),
        "Hmm" => format!("{}{:02}", hour, now.minute()),
        "Hmmss" => format!("{}{:02}{:02}", hour, now.minute(), now.second()),
        "m" => now.minute().to_string(),
        "mm" => zero_fill(i64::from(now.minute()), 2, false),
        "s" => now.second().to_string(),
        "ss" => zero_fill(i64::from(now.second()), 2, false),
        "a" => (if hour < 12 { "am" } else { "pm" }).to_string(),
        "A" => (if hour < 12 { "AM" } else { "PM" }).to_string(),
        fraction if fraction.bytes().all(|b| b == b'S') => fractional_seconds(now, fraction.len()),

        // Timestamps and offsets
        "X" => now.timestamp().to_string(),
        "x" => now.timestamp_millis().to_string(),
        "Z" => utc_offset(now, ":"),
        "ZZ" => utc_offset(now, ""),
        "z" | "zz" => String::new(),

        literal => literal.to_string(),
    }
}

fn era_year(year: i64) -> i64 {
    if year >= 1 {
        year
    } else {
        1 - year
    }
}

fn quarter(month: u32) -> u32 {
    (month - 1) / 3 + 1
}

fn hour12(hour: u32) -> u32 {
    match hour % 12 {
        0 => 12,
        h => h,
    }
}

fn hour24(hour: u32) -> u32 {
    if hour == 0 {
        24
    } else {
        hour
    }
}

fn fractional_seconds(now: &DateTime<FixedOffset>, digits: usize) -> String {
    // Leap seconds are reported as nanos >= 1e9
    let nanos = now.nanosecond() % 1_000_000_000;
    let value = nanos / 10u32.pow(9 - digits as u32);
    format!("{value:0digits$}")
}

fn utc_offset(now: &DateTime<FixedOffset>, separator: &str) -> String {
    let seconds = now.offset().local_minus_utc();
    let sign = if seconds < 0 { '-' } else { '+' };
    let minutes = seconds.abs() / 60;
    format!("{sign}{:02}{separator}{:02}", minutes / 60, minutes % 60)
}

fn zero_fill(value: i64, width: usize, force_sign: bool) -> String {
    let sign = if value < 0 {
        "-"
    } else if force_sign {
        "+"
    } else {
        ""
    };
    format!("{sign}{:0width$}", value.unsigned_abs())
}

/// English ordinal: 1st, 2nd, 3rd, 4th, 11th, 12th, 13th, 21st...
fn ordinal(n: i64) -> String {
    let suffix = if (n % 100) / 10 == 1 {
        "th"
    } else {
        match n % 10 {
            1 => "st",
            2 => "nd",
            3 => "rd",
            _ => "th",
        }
    };
    format!("{n}{suffix}")
}

/// Day-of-year offset of the first day of week 1, relative to January 1st
fn first_week_offset(year: i32, dow: i32, doy: i32) -> i32 {
    let fwd = 7 + dow - doy;
    let fwd_weekday = NaiveDate::from_ymd_opt(year, 1, fwd as u32)
        .map(|d| d.weekday().num_days_from_sunday() as i32)
        .unwrap_or(0);
    let fwdlw = (7 + fwd_weekday - dow) % 7;
    -fwdlw + fwd - 1
}

fn days_in_year(year: i32) -> i32 {
    NaiveDate::from_ymd_opt(year, 12, 31)
        .map(|d| d.ordinal() as i32)
        .unwrap_or(365)
}

fn weeks_in_year(year: i32, dow: i32, doy: i32) -> i32 {
    let offset = first_week_offset(year, dow, doy);
    let next_offset = first_week_offset(year + 1, dow, doy);
    (days_in_year(year) - offset + next_offset) / 7
}

/// Week number and week-year of `date` for a week starting on `dow` where
/// January `7 + dow - doy` is always in week 1.
fn week_of_year(date: NaiveDate, dow: i32, doy: i32) -> (i32, i32) {
    let year = date.year();
    let offset = first_week_offset(year, dow, doy);
    let week = (date.ordinal() as i32 - offset - 1).div_euclid(7) + 1;

    if week < 1 {
        let prev = year - 1;
        (week + weeks_in_year(prev, dow, doy), prev)
    } else if week > weeks_in_year(year, dow, doy) {
        (week - weeks_in_year(year, dow, doy), year + 1)
    } else {
        (week, year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(y, m, d, h, min, s)
            .unwrap()
    }

    #[test]
    fn test_iso_date() {
        assert_eq!(format(&at(2024, 3, 5, 0, 0, 0), "YYYY-MM-DD"), "2024-03-05");
        assert_eq!(format(&at(2023, 12, 1, 9, 30, 0), "YYYY-MM-DD"), "2023-12-01");
    }

    #[test]
    fn test_names_and_ordinals() {
        let now = at(2024, 3, 5, 0, 0, 0);
        assert_eq!(format(&now, "dddd, MMMM Do YYYY"), "Tuesday, March 5th 2024");
        assert_eq!(format(&now, "ddd MMM D"), "Tue Mar 5");
        assert_eq!(format(&now, "dd"), "Tu");
        assert_eq!(format(&at(2024, 1, 11, 0, 0, 0), "Do"), "11th");
        assert_eq!(format(&at(2024, 1, 22, 0, 0, 0), "Do"), "22nd");
        assert_eq!(format(&at(2024, 1, 23, 0, 0, 0), "Do"), "23rd");
        assert_eq!(format(&now, "Qo [quarter]"), "1st quarter");
    }

    #[test]
    fn test_time_tokens() {
        let now = at(2024, 3, 5, 0, 7, 9);
        assert_eq!(format(&now, "HH:mm:ss"), "00:07:09");
        assert_eq!(format(&now, "h:mm a"), "12:07 am");
        assert_eq!(format(&now, "k"), "24");
        assert_eq!(format(&at(2024, 3, 5, 15, 4, 0), "hh:mm A"), "03:04 PM");
        assert_eq!(format(&at(2024, 3, 5, 15, 4, 0), "Hmm"), "1504");
    }

    #[test]
    fn test_literals_pass_through() {
        let now = at(2024, 3, 5, 0, 0, 0);
        assert_eq!(format(&now, "[Journal] YYYY"), "Journal 2024");
        assert_eq!(format(&now, "YYYY/MM/DD"), "2024/03/05");
        assert_eq!(format(&now, "\\YYYY YYYY"), "YYYY 2024");
        assert_eq!(format(&now, "_-~"), "_-~");
    }

    #[test]
    fn test_empty_pattern_uses_default() {
        let now = at(2024, 3, 5, 8, 1, 2);
        assert_eq!(format(&now, ""), "2024-03-05T08:01:02+00:00");
    }

    #[test]
    fn test_offsets() {
        let now = FixedOffset::west_opt(5 * 3600 + 30 * 60)
            .unwrap()
            .with_ymd_and_hms(2024, 3, 5, 0, 0, 0)
            .unwrap();
        assert_eq!(format(&now, "Z"), "-05:30");
        assert_eq!(format(&now, "ZZ"), "-0530");
        assert_eq!(format(&now, "z"), "");
    }

    #[test]
    fn test_localized_formats() {
        let now = at(2024, 3, 5, 14, 30, 0);
        assert_eq!(format(&now, "L"), "03/05/2024");
        assert_eq!(format(&now, "LL"), "March 5, 2024");
        assert_eq!(format(&now, "LT"), "2:30 PM");
        assert_eq!(format(&now, "[L] l"), "L 3/5/2024");
    }

    #[test]
    fn test_locale_weeks() {
        // Week 1 is the Sunday-started week containing January 1st
        assert_eq!(format(&at(2024, 3, 5, 0, 0, 0), "w"), "10");
        assert_eq!(format(&at(2021, 1, 1, 0, 0, 0), "w gggg"), "1 2021");
        assert_eq!(format(&at(2024, 12, 30, 0, 0, 0), "wo gggg"), "1st 2025");
    }

    #[test]
    fn test_iso_weeks_match_chrono() {
        let mut date = NaiveDate::from_ymd_opt(2019, 12, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2027, 2, 1).unwrap();
        while date < end {
            let iso = date.iso_week();
            assert_eq!(
                week_of_year(date, ISO_DOW, ISO_DOY),
                (iso.week() as i32, iso.year()),
                "{date}"
            );
            date = date.succ_opt().unwrap();
        }
    }

    #[test]
    fn test_era_tokens() {
        let now = at(2024, 3, 5, 0, 0, 0);
        assert_eq!(format(&now, "yyyy-MM-DD"), "2024-03-05");
        assert_eq!(format(&now, "N NNNN NNNNN"), "AD Anno Domini AD");
        assert_eq!(format(&now, "y yo"), "2024 2024th");
        assert_eq!(format(&at(5, 1, 1, 0, 0, 0), "yyy yy"), "005 05");

        // Year 0 is 1 BC
        let bc = at(0, 6, 1, 0, 0, 0);
        assert_eq!(format(&bc, "y N NNNN"), "1 BC Before Christ");
        assert_eq!(format(&at(-9, 6, 1, 0, 0, 0), "yyyy"), "0010");
    }

    #[test]
    fn test_five_digit_week_years() {
        let now = at(2024, 3, 5, 0, 0, 0);
        assert_eq!(format(&now, "ggggg"), "02024");
        assert_eq!(format(&now, "GGGGG"), "02024");
        assert_eq!(format(&at(2024, 12, 30, 0, 0, 0), "ggggg GGGGG"), "02025 02025");
        assert_eq!(format(&now, "ggg"), "24g");
    }

    #[test]
    fn test_bracket_runs_to_first_closing_before_next_open() {
        let now = at(2024, 3, 5, 0, 0, 0);
        assert_eq!(format(&now, "[a]b]"), "a]b");
        assert_eq!(format(&now, "[x] [y]"), "x y");
        assert_eq!(format(&now, "[MM]] DD"), "MM] 05");
    }

    #[test]
    fn test_escaped_localized_format() {
        let now = at(2024, 3, 5, 14, 30, 0);
        assert_eq!(format(&now, "\\L"), "L");
        assert_eq!(format(&now, "\\LT LT"), "LT 2:30 PM");
    }

    #[test]
    fn test_fractional_seconds() {
        let now = at(2024, 3, 5, 0, 0, 0) + chrono::Duration::milliseconds(123);
        assert_eq!(format(&now, "S"), "1");
        assert_eq!(format(&now, "SSS"), "123");
        assert_eq!(format(&now, "SSSSSS"), "123000");
    }
}
