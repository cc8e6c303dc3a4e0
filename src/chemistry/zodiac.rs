//! Category mapping: calendar date -> sign -> element.
//!
//! Twelve signs each cover a fixed month/day span and belong to exactly one
//! of four elements. A date that does not parse yields no sign at all.

use chrono::{DateTime, Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Element {
    Fire,
    Earth,
    Air,
    Water,
}

impl Element {
    pub const ALL: [Element; 4] = [Element::Fire, Element::Earth, Element::Air, Element::Water];

    pub fn index(&self) -> usize {
        match self {
            Element::Fire => 0,
            Element::Earth => 1,
            Element::Air => 2,
            Element::Water => 3,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Element::Fire => "Fire",
            Element::Earth => "Earth",
            Element::Air => "Air",
            Element::Water => "Water",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Sign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

impl Sign {
    /// Zero-based position in the wheel, Aries first.
    pub fn ordinal(&self) -> u32 {
        match self {
            Sign::Aries => 0,
            Sign::Taurus => 1,
            Sign::Gemini => 2,
            Sign::Cancer => 3,
            Sign::Leo => 4,
            Sign::Virgo => 5,
            Sign::Libra => 6,
            Sign::Scorpio => 7,
            Sign::Sagittarius => 8,
            Sign::Capricorn => 9,
            Sign::Aquarius => 10,
            Sign::Pisces => 11,
        }
    }

    pub fn element(&self) -> Element {
        match self {
            Sign::Aries | Sign::Leo | Sign::Sagittarius => Element::Fire,
            Sign::Taurus | Sign::Virgo | Sign::Capricorn => Element::Earth,
            Sign::Gemini | Sign::Libra | Sign::Aquarius => Element::Air,
            Sign::Cancer | Sign::Scorpio | Sign::Pisces => Element::Water,
        }
    }

    /// Midpoint of the sign's 30 degree segment.
    pub fn longitude(&self) -> f64 {
        f64::from(self.ordinal()) * 30.0 + 15.0
    }

    pub fn label(&self) -> &'static str {
        match self {
            Sign::Aries => "Aries",
            Sign::Taurus => "Taurus",
            Sign::Gemini => "Gemini",
            Sign::Cancer => "Cancer",
            Sign::Leo => "Leo",
            Sign::Virgo => "Virgo",
            Sign::Libra => "Libra",
            Sign::Scorpio => "Scorpio",
            Sign::Sagittarius => "Sagittarius",
            Sign::Capricorn => "Capricorn",
            Sign::Aquarius => "Aquarius",
            Sign::Pisces => "Pisces",
        }
    }
}

struct SignSpan {
    sign: Sign,
    start: (u32, u32),
    end: (u32, u32),
}

impl SignSpan {
    fn contains(&self, month_day: (u32, u32)) -> bool {
        if self.start <= self.end {
            month_day >= self.start && month_day <= self.end
        } else {
            // Wraps past December 31st
            month_day >= self.start || month_day <= self.end
        }
    }
}

/// Inclusive (month, day) spans, in wheel order.
const SIGN_TABLE: [SignSpan; 12] = [
    SignSpan { sign: Sign::Aries, start: (3, 21), end: (4, 19) },
    SignSpan { sign: Sign::Taurus, start: (4, 20), end: (5, 20) },
    SignSpan { sign: Sign::Gemini, start: (5, 21), end: (6, 20) },
    SignSpan { sign: Sign::Cancer, start: (6, 21), end: (7, 22) },
    SignSpan { sign: Sign::Leo, start: (7, 23), end: (8, 22) },
    SignSpan { sign: Sign::Virgo, start: (8, 23), end: (9, 22) },
    SignSpan { sign: Sign::Libra, start: (9, 23), end: (10, 22) },
    SignSpan { sign: Sign::Scorpio, start: (10, 23), end: (11, 21) },
    SignSpan { sign: Sign::Sagittarius, start: (11, 22), end: (12, 21) },
    SignSpan { sign: Sign::Capricorn, start: (12, 22), end: (1, 19) },
    SignSpan { sign: Sign::Aquarius, start: (1, 20), end: (2, 18) },
    SignSpan { sign: Sign::Pisces, start: (2, 19), end: (3, 20) },
];

/// Parse a date attribute. Accepts `YYYY-MM-DD`, the same with a `T...`
/// time suffix, and full RFC 3339 timestamps.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.date_naive());
    }
    let date_part = raw.split_once('T').map_or(raw, |(date, _)| date);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

pub fn sign_for_date(date: NaiveDate) -> Sign {
    let month_day = (date.month(), date.day());
    SIGN_TABLE
        .iter()
        .find(|span| span.contains(month_day))
        .map(|span| span.sign)
        // Every valid calendar day falls in exactly one span
        .unwrap_or(Sign::Capricorn)
}

/// Sign for an optional date attribute; None when absent or unparseable.
pub fn sign_for_attribute(raw: Option<&str>) -> Option<Sign> {
    raw.and_then(parse_date).map(sign_for_date)
}
