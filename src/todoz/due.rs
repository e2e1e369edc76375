//! Due times typed on the command line.
//!
//! `todoz add` takes free words; trailing words may describe when the entry
//! falls due:
//!
//! ```text
//! todoz add call the bank 2h              -> in two hours
//! todoz add call the bank in 90m          -> in ninety minutes
//! todoz add call the bank tomorrow        -> tomorrow at 11:00 local time
//! todoz add call the bank 2023-11-18 14:00
//! todoz add call the bank at 2023-11-18 14:00
//! ```
//!
//! The remaining words, joined by single spaces, form the title. A single word
//! is always just a title. Durations use the `1h30m` notation (units `ns`,
//! `us`, `ms`, `s`, `m`, `h`, fractions allowed).
//!
//! Due times are shown in local time with a user-configurable strftime
//! pattern; see [`format_local`].

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Duration, Local, NaiveDateTime, NaiveTime, TimeZone, Utc};
use std::fmt::Write;

const AT_FORMAT: &str = "%Y-%m-%d %H:%M";
pub const DEFAULT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";
const TOMORROW_HOUR: u32 = 11;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timer {
    In(Duration),
    Tomorrow,
    At(NaiveDateTime),
}

impl Timer {
    /// The due time this timer describes, seen from `from` in zone `tz`.
    pub fn resolve<Tz: TimeZone>(&self, from: DateTime<Utc>, tz: &Tz) -> DateTime<Utc> {
        match self {
            Timer::In(duration) => from + *duration,
            Timer::Tomorrow => {
                let today = from.with_timezone(tz).date_naive();
                today
                    .succ_opt()
                    .and_then(|day| {
                        let eleven = NaiveTime::from_hms_opt(TOMORROW_HOUR, 0, 0)?;
                        tz.from_local_datetime(&day.and_time(eleven)).earliest()
                    })
                    .map(|local| local.with_timezone(&Utc))
                    .unwrap_or_else(|| from + Duration::hours(24))
            }
            Timer::At(naive) => tz
                .from_local_datetime(naive)
                .earliest()
                .map(|local| local.with_timezone(&Utc))
                .unwrap_or_else(|| naive.and_utc()),
        }
    }
}

/// Splits command line words into a title and an optional timer.
pub fn parse_timer<S: AsRef<str>>(words: &[S]) -> (String, Option<Timer>) {
    let words: Vec<&str> = words.iter().map(AsRef::as_ref).collect();
    let n = words.len();
    let mut title_len = n;
    let mut timer = None;

    if n >= 2 {
        let last = words[n - 1];
        let before_last = words[n - 2];
        if let Ok(duration) = parse_duration(last) {
            timer = Some(Timer::In(duration));
            title_len = if before_last.eq_ignore_ascii_case("in") { n - 2 } else { n - 1 };
        } else if last.eq_ignore_ascii_case("tomorrow") {
            timer = Some(Timer::Tomorrow);
            title_len = n - 1;
        } else if let Ok(at) = NaiveDateTime::parse_from_str(last, AT_FORMAT) {
            timer = Some(Timer::At(at));
            title_len = if before_last.eq_ignore_ascii_case("at") { n - 2 } else { n - 1 };
        } else if n >= 3 {
            let joined = format!("{} {}", before_last, last);
            if let Ok(at) = NaiveDateTime::parse_from_str(&joined, AT_FORMAT) {
                timer = Some(Timer::At(at));
                title_len = if words[n - 3].eq_ignore_ascii_case("at") { n - 3 } else { n - 2 };
            }
        }
    }

    (words[..title_len].join(" "), timer)
}

/// Parses durations such as `2h`, `1h30m`, `1.5h`, `-10m` or `0`.
pub fn parse_duration(input: &str) -> Result<Duration, String> {
    let invalid = || format!("invalid duration {:?}", input);

    let (negative, mut rest) = match input.as_bytes().first() {
        Some(b'-') => (true, &input[1..]),
        Some(b'+') => (false, &input[1..]),
        _ => (false, input),
    };
    if rest == "0" {
        return Ok(Duration::zero());
    }
    if rest.is_empty() {
        return Err(invalid());
    }

    let mut total_nanos: f64 = 0.0;
    while !rest.is_empty() {
        let number_end = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .ok_or_else(invalid)?;
        let number: f64 = rest[..number_end].parse().map_err(|_| invalid())?;
        rest = &rest[number_end..];

        let unit_end = rest
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(rest.len());
        let unit_nanos = match &rest[..unit_end] {
            "ns" => 1.0,
            "us" | "µs" | "μs" => 1e3,
            "ms" => 1e6,
            "s" => 1e9,
            "m" => 60e9,
            "h" => 3600e9,
            _ => return Err(invalid()),
        };
        rest = &rest[unit_end..];
        total_nanos += number * unit_nanos;
    }

    if !total_nanos.is_finite() || total_nanos > i64::MAX as f64 {
        return Err(invalid());
    }
    let duration = Duration::nanoseconds(total_nanos.round() as i64);
    Ok(if negative { -duration } else { duration })
}

/// Whether chrono can render every specifier in `format`.
pub fn is_valid_time_format(format: &str) -> bool {
    StrftimeItems::new(format).all(|item| !matches!(item, Item::Error))
}

/// `at` in local time, rendered with `time_format`. An unusable pattern falls
/// back to [`DEFAULT_TIME_FORMAT`] instead of failing.
pub fn format_local(at: DateTime<Utc>, time_format: &str) -> String {
    let local = at.with_timezone(&Local);
    let mut out = String::new();
    if write!(out, "{}", local.format(time_format)).is_err() {
        out.clear();
        let _ = write!(out, "{}", local.format(DEFAULT_TIME_FORMAT));
    }
    out
}
