//! Canonical string encodings for the types a data map can coerce.
//!
//! Every encoding is locale independent: numbers never carry grouping
//! separators and always use `.` as the decimal point, booleans are `True` /
//! `False`, UUIDs are 32 lowercase hex digits.

use chrono::{DateTime, FixedOffset, SecondsFormat, TimeDelta, Utc};
use uuid::Uuid;

use crate::value::DataValue;

/// A type that can be read out of a [`DataValue`], either natively or by
/// parsing its canonical string form.
pub trait Coercible: Sized {
    /// Name used in error messages.
    const KIND: &'static str;

    /// Extract a natively stored value of exactly this type.
    fn from_native(value: &DataValue) -> Option<Self>;

    fn to_canonical(&self) -> String;

    fn parse_canonical(text: &str) -> Option<Self>;
}

macro_rules! impl_coercible_number {
    ($t:ty, $variant:ident, $kind:literal) => {
        impl Coercible for $t {
            const KIND: &'static str = $kind;

            fn from_native(value: &DataValue) -> Option<Self> {
                match value {
                    DataValue::$variant(v) => Some(*v),
                    _ => None,
                }
            }

            fn to_canonical(&self) -> String {
                self.to_string()
            }

            fn parse_canonical(text: &str) -> Option<Self> {
                text.trim().parse().ok()
            }
        }
    };
}

impl_coercible_number!(i32, Int, "int");
impl_coercible_number!(i64, Long, "long");

macro_rules! impl_coercible_float {
    ($t:ty, $variant:ident, $kind:literal) => {
        impl Coercible for $t {
            const KIND: &'static str = $kind;

            fn from_native(value: &DataValue) -> Option<Self> {
                match value {
                    DataValue::$variant(v) => Some(*v),
                    _ => None,
                }
            }

            // `Display` already yields the shortest string that parses back to
            // the same value; only infinities need renaming.
            fn to_canonical(&self) -> String {
                if self.is_infinite() {
                    let text = if self.is_sign_positive() { "Infinity" } else { "-Infinity" };
                    text.to_string()
                } else {
                    self.to_string()
                }
            }

            // Out-of-range input parses to an infinity; only the spelled-out
            // forms may produce one.
            fn parse_canonical(text: &str) -> Option<Self> {
                let text = text.trim();
                let value: Self = text.parse().ok()?;
                if value.is_infinite() && !is_infinity_literal(text) {
                    return None;
                }
                Some(value)
            }
        }
    };
}

fn is_infinity_literal(text: &str) -> bool {
    let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text);
    unsigned.eq_ignore_ascii_case("inf") || unsigned.eq_ignore_ascii_case("infinity")
}

impl_coercible_float!(f32, Float, "float");
impl_coercible_float!(f64, Double, "double");

impl Coercible for bool {
    const KIND: &'static str = "bool";

    fn from_native(value: &DataValue) -> Option<Self> {
        match value {
            DataValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    fn to_canonical(&self) -> String {
        let text = if *self { "True" } else { "False" };
        text.to_string()
    }

    fn parse_canonical(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.eq_ignore_ascii_case("true") {
            Some(true)
        } else if text.eq_ignore_ascii_case("false") {
            Some(false)
        } else {
            None
        }
    }
}

impl Coercible for char {
    const KIND: &'static str = "char";

    fn from_native(value: &DataValue) -> Option<Self> {
        match value {
            DataValue::Char(c) => Some(*c),
            _ => None,
        }
    }

    fn to_canonical(&self) -> String {
        self.to_string()
    }

    /// First character of the string; an empty string has none.
    fn parse_canonical(text: &str) -> Option<Self> {
        text.chars().next()
    }
}

impl Coercible for Uuid {
    const KIND: &'static str = "uuid";

    fn from_native(value: &DataValue) -> Option<Self> {
        match value {
            DataValue::Uuid(u) => Some(*u),
            _ => None,
        }
    }

    fn to_canonical(&self) -> String {
        self.simple().to_string()
    }

    /// Accepts the simple, hyphenated, braced and urn forms.
    fn parse_canonical(text: &str) -> Option<Self> {
        Uuid::parse_str(text.trim()).ok()
    }
}

impl Coercible for DateTime<Utc> {
    const KIND: &'static str = "date/time";

    fn from_native(_: &DataValue) -> Option<Self> {
        None
    }

    fn to_canonical(&self) -> String {
        self.to_rfc3339_opts(SecondsFormat::AutoSi, true)
    }

    fn parse_canonical(text: &str) -> Option<Self> {
        DateTime::parse_from_rfc3339(text.trim())
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

impl Coercible for DateTime<FixedOffset> {
    const KIND: &'static str = "date/time offset";

    fn from_native(_: &DataValue) -> Option<Self> {
        None
    }

    fn to_canonical(&self) -> String {
        self.to_rfc3339_opts(SecondsFormat::AutoSi, false)
    }

    fn parse_canonical(text: &str) -> Option<Self> {
        DateTime::parse_from_rfc3339(text.trim()).ok()
    }
}

impl Coercible for TimeDelta {
    const KIND: &'static str = "duration";

    fn from_native(_: &DataValue) -> Option<Self> {
        None
    }

    fn to_canonical(&self) -> String {
        format_duration(*self)
    }

    fn parse_canonical(text: &str) -> Option<Self> {
        parse_duration(text.trim())
    }
}

const SECONDS_PER_DAY: i64 = 86_400;
const NANOS_PER_TICK: u32 = 100;
const FRACTION_DIGITS: usize = 7;

/// `[-][d.]hh:mm:ss[.fffffff]`, with sub-tick precision truncated.
fn format_duration(delta: TimeDelta) -> String {
    let negative = delta < TimeDelta::zero();
    let abs = delta.abs();
    let total_secs = abs.num_seconds();
    let ticks = abs.subsec_nanos().unsigned_abs() / NANOS_PER_TICK;

    let days = total_secs / SECONDS_PER_DAY;
    let rem = total_secs % SECONDS_PER_DAY;
    let (hours, minutes, seconds) = (rem / 3600, rem % 3600 / 60, rem % 60);

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    if days > 0 {
        out.push_str(&format!("{days}."));
    }
    out.push_str(&format!("{hours:02}:{minutes:02}:{seconds:02}"));
    if ticks > 0 {
        out.push_str(&format!(".{ticks:07}"));
    }
    out
}

/// Inverse of [`format_duration`]. Also accepts `hh:mm` and a bare day count.
fn parse_duration(text: &str) -> Option<TimeDelta> {
    let (negative, body) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    if body.is_empty() {
        return None;
    }

    let parts: Vec<&str> = body.split(':').collect();
    let (days, hours, minutes, seconds, ticks) = match parts.as_slice() {
        [days] => (parse_digits(days)?, 0, 0, 0, 0),
        [head, minutes] => {
            let (days, hours) = split_days(head)?;
            (days, hours, parse_digits(minutes)?, 0, 0)
        }
        [head, minutes, tail] => {
            let (days, hours) = split_days(head)?;
            let (seconds, ticks) = split_fraction(tail)?;
            (days, hours, parse_digits(minutes)?, seconds, ticks)
        }
        _ => return None,
    };

    if hours >= 24 || minutes >= 60 || seconds >= 60 {
        return None;
    }

    let total_secs = days
        .checked_mul(SECONDS_PER_DAY)?
        .checked_add(hours * 3600 + minutes * 60 + seconds)?;
    let nanos = u32::try_from(ticks).ok()?.checked_mul(NANOS_PER_TICK)?;
    let delta = TimeDelta::new(total_secs, nanos)?;
    Some(if negative { -delta } else { delta })
}

fn split_days(head: &str) -> Option<(i64, i64)> {
    match head.split_once('.') {
        Some((days, hours)) => Some((parse_digits(days)?, parse_digits(hours)?)),
        None => Some((0, parse_digits(head)?)),
    }
}

fn split_fraction(tail: &str) -> Option<(i64, i64)> {
    match tail.split_once('.') {
        Some((seconds, fraction)) => {
            if fraction.is_empty() || fraction.len() > FRACTION_DIGITS {
                return None;
            }
            let padded = format!("{fraction:0<width$}", width = FRACTION_DIGITS);
            Some((parse_digits(seconds)?, parse_digits(&padded)?))
        }
        None => Some((parse_digits(tail)?, 0)),
    }
}

fn parse_digits(text: &str) -> Option<i64> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn booleans_use_capitalized_words() {
        assert_eq!(true.to_canonical(), "True");
        assert_eq!(false.to_canonical(), "False");
        assert_eq!(bool::parse_canonical("TRUE"), Some(true));
        assert_eq!(bool::parse_canonical(" false "), Some(false));
        assert_eq!(bool::parse_canonical("yes"), None);
        assert_eq!(bool::parse_canonical("1"), None);
    }

    #[test]
    fn numbers_are_plain_and_invariant() {
        assert_eq!(1_234_567_i32.to_canonical(), "1234567");
        assert_eq!((-42_i64).to_canonical(), "-42");
        assert_eq!(1234.5_f64.to_canonical(), "1234.5");
        assert_eq!(0.1_f32.to_canonical(), "0.1");
        assert_eq!(f64::INFINITY.to_canonical(), "Infinity");
        assert_eq!(f64::NEG_INFINITY.to_canonical(), "-Infinity");

        assert_eq!(i32::parse_canonical("+17"), Some(17));
        assert_eq!(i32::parse_canonical(" 17 "), Some(17));
        assert_eq!(i32::parse_canonical("1,000"), None);
        assert_eq!(i32::parse_canonical("2147483648"), None);
        assert_eq!(i64::parse_canonical("2147483648"), Some(2_147_483_648));
        assert_eq!(f64::parse_canonical("1,5"), None);
        assert_eq!(f64::parse_canonical("Infinity"), Some(f64::INFINITY));
        assert_eq!(f64::parse_canonical("-Infinity"), Some(f64::NEG_INFINITY));
    }

    #[test]
    fn float_overflow_is_not_infinity() {
        assert_eq!(f32::parse_canonical("1e40"), None);
        assert_eq!(f32::parse_canonical("-1e40"), None);
        assert_eq!(f64::parse_canonical("1e400"), None);
        assert_eq!(f64::parse_canonical("1e40"), Some(1e40));
        assert_eq!(f32::parse_canonical(f32::MAX.to_canonical().as_str()), Some(f32::MAX));

        assert_eq!(f32::parse_canonical(" inf "), Some(f32::INFINITY));
        assert_eq!(f32::parse_canonical("+Infinity"), Some(f32::INFINITY));
        assert_eq!(f64::parse_canonical("-INF"), Some(f64::NEG_INFINITY));
        assert!(f64::parse_canonical("NaN").is_some_and(f64::is_nan));
    }

    #[test]
    fn uuid_is_32_lowercase_hex_digits() {
        let id = Uuid::parse_str("67E55044-10B1-426F-9247-BB680E5FE0C8").unwrap();
        assert_eq!(id.to_canonical(), "67e5504410b1426f9247bb680e5fe0c8");
        assert_eq!(Uuid::parse_canonical("67e5504410b1426f9247bb680e5fe0c8"), Some(id));
        assert_eq!(Uuid::parse_canonical("{67e55044-10b1-426f-9247-bb680e5fe0c8}"), Some(id));
        assert_eq!(Uuid::parse_canonical("not-a-uuid"), None);
        assert_eq!(Uuid::parse_canonical(""), None);
    }

    #[test]
    fn char_takes_first_character() {
        assert_eq!('é'.to_canonical(), "é");
        assert_eq!(char::parse_canonical("xyz"), Some('x'));
        assert_eq!(char::parse_canonical(""), None);
    }

    #[test]
    fn date_times_use_rfc3339() {
        let utc = Utc.with_ymd_and_hms(2024, 2, 29, 13, 5, 9).unwrap();
        assert_eq!(utc.to_canonical(), "2024-02-29T13:05:09Z");
        assert_eq!(DateTime::<Utc>::parse_canonical("2024-02-29T13:05:09Z"), Some(utc));

        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        let local = offset.with_ymd_and_hms(2024, 2, 29, 15, 5, 9).unwrap();
        assert_eq!(local.to_canonical(), "2024-02-29T15:05:09+02:00");
        assert_eq!(DateTime::<FixedOffset>::parse_canonical(&local.to_canonical()), Some(local));
        // Same instant, so the UTC reading agrees.
        assert_eq!(DateTime::<Utc>::parse_canonical(&local.to_canonical()), Some(utc));

        let precise = utc + TimeDelta::milliseconds(250);
        assert_eq!(precise.to_canonical(), "2024-02-29T13:05:09.250Z");
        assert_eq!(DateTime::<Utc>::parse_canonical(&precise.to_canonical()), Some(precise));
    }

    #[test]
    fn durations_use_constant_form() {
        assert_eq!(TimeDelta::zero().to_canonical(), "00:00:00");
        assert_eq!(TimeDelta::seconds(90).to_canonical(), "00:01:30");
        assert_eq!(
            (TimeDelta::days(1) + TimeDelta::hours(2) + TimeDelta::milliseconds(500)).to_canonical(),
            "1.02:00:00.5000000"
        );
        assert_eq!(TimeDelta::minutes(-5).to_canonical(), "-00:05:00");
        assert_eq!(TimeDelta::nanoseconds(100).to_canonical(), "00:00:00.0000001");
    }

    #[test]
    fn durations_parse_back() {
        assert_eq!(TimeDelta::parse_canonical("00:01:30"), Some(TimeDelta::seconds(90)));
        assert_eq!(
            TimeDelta::parse_canonical("1.02:00:00.5000000"),
            Some(TimeDelta::days(1) + TimeDelta::hours(2) + TimeDelta::milliseconds(500))
        );
        assert_eq!(TimeDelta::parse_canonical("-00:05:00"), Some(TimeDelta::minutes(-5)));
        assert_eq!(TimeDelta::parse_canonical("00:00:01.5"), Some(TimeDelta::milliseconds(1500)));
        assert_eq!(TimeDelta::parse_canonical("3"), Some(TimeDelta::days(3)));
        assert_eq!(TimeDelta::parse_canonical("10:30"), Some(TimeDelta::minutes(630)));
    }

    #[test]
    fn malformed_durations_are_rejected() {
        for bad in ["", "-", "24:00:00", "00:60:00", "00:00:60", "00:00:00.", "00:00:00.12345678", "a:b:c", "1:2:3:4", "+01:00:00"] {
            assert_eq!(TimeDelta::parse_canonical(bad), None, "{bad:?} should not parse");
        }
    }

    #[test]
    fn native_extraction_requires_exact_variant() {
        assert_eq!(i32::from_native(&DataValue::Int(1)), Some(1));
        assert_eq!(i32::from_native(&DataValue::Long(1)), None);
        assert_eq!(f64::from_native(&DataValue::Float(1.0)), None);
        assert_eq!(bool::from_native(&DataValue::String("True".into())), None);
        assert_eq!(DateTime::<Utc>::from_native(&DataValue::Long(0)), None);
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn round_trips<T: Coercible + PartialEq + core::fmt::Debug>(value: T) -> Result<(), TestCaseError> {
            let text = value.to_canonical();
            prop_assert_eq!(T::parse_canonical(&text), Some(value));
            Ok(())
        }

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 1000,
                ..ProptestConfig::default()
            })]

            /// Property: integers survive the canonical string form.
            #[test]
            fn integers_round_trip(i in any::<i32>(), l in any::<i64>()) {
                round_trips(i)?;
                round_trips(l)?;
            }

            /// Property: finite floats survive exactly, not approximately.
            #[test]
            fn floats_round_trip(
                f in any::<f32>().prop_filter("finite", |f| f.is_finite()),
                d in any::<f64>().prop_filter("finite", |d| d.is_finite()),
            ) {
                round_trips(f)?;
                round_trips(d)?;
            }

            #[test]
            fn bools_and_chars_round_trip(b in any::<bool>(), c in any::<char>()) {
                round_trips(b)?;
                round_trips(c)?;
            }

            /// Property: canonical UUIDs are 32 lowercase hex digits and parse back.
            #[test]
            fn uuids_round_trip(bytes in any::<[u8; 16]>()) {
                let id = Uuid::from_bytes(bytes);
                let text = id.to_canonical();
                prop_assert_eq!(text.len(), 32);
                prop_assert!(text.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')));
                round_trips(id)?;
            }

            /// Property: durations at tick precision survive the constant form.
            #[test]
            fn durations_round_trip(ticks in -10_000_000_000_000_000_i64..10_000_000_000_000_000_i64) {
                let delta = TimeDelta::microseconds(ticks / 10) + TimeDelta::nanoseconds((ticks % 10) * 100);
                round_trips(delta)?;
            }
        }
    }
}
