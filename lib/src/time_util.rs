// Copyright 2024 The Jujutsu Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Provides support for parsing and matching date ranges.

use chrono::DateTime;
use chrono::TimeZone;
use chrono_english::parse_date_string;
use chrono_english::DateError;
use chrono_english::Dialect;
use thiserror::Error;

use crate::source::MillisSinceEpoch;
use crate::source::Timestamp;

/// Error occurred during date pattern parsing.
#[derive(Debug, Error)]
pub enum DatePatternParseError {
    /// Unknown pattern kind is specified.
    #[error(r#"Invalid date pattern kind "{0}:""#)]
    InvalidKind(String),
    /// The range expression has no recognizable bound.
    #[error(r#"Invalid date range "{0}""#)]
    InvalidRange(String),
    /// Failed to parse timestamp.
    #[error(transparent)]
    ParseError(#[from] DateError),
}

/// Represents an range of dates that may be matched against.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum DatePattern {
    /// Represents all dates at or after the given instant.
    AtOrAfter(MillisSinceEpoch),
    /// Represents all dates before, but not including, the given instant.
    Before(MillisSinceEpoch),
}

impl DatePattern {
    /// Parses a string into a DatePattern.
    ///
    /// * `s` is the string to be parsed.
    ///
    /// * `kind` must be either "after" or "before". This determines whether the
    ///   pattern will match dates after or before the parsed date.
    ///
    /// * `now` is the user's current time. Relative dates such as "yesterday"
    ///   are resolved against it, in its time zone.
    pub fn from_str_kind<Tz: TimeZone>(
        s: &str,
        kind: &str,
        now: DateTime<Tz>,
    ) -> Result<DatePattern, DatePatternParseError>
    where
        Tz::Offset: Copy,
    {
        let d = parse_date_string(s.trim(), now, Dialect::Us)
            .map_err(DatePatternParseError::ParseError)?;
        let millis_since_epoch = MillisSinceEpoch(d.timestamp_millis());
        match kind {
            "after" => Ok(DatePattern::AtOrAfter(millis_since_epoch)),
            "before" => Ok(DatePattern::Before(millis_since_epoch)),
            kind => Err(DatePatternParseError::InvalidKind(kind.to_owned())),
        }
    }

    /// Determines whether a given timestamp is matched by the pattern.
    pub fn matches(&self, timestamp: &Timestamp) -> bool {
        match self {
            DatePattern::AtOrAfter(earliest) => *earliest <= timestamp.timestamp,
            DatePattern::Before(latest) => timestamp.timestamp < *latest,
        }
    }
}

/// Conjunction of date patterns. An empty range matches every date.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct DateRange {
    patterns: Vec<DatePattern>,
}

impl DateRange {
    /// Creates a range matching dates accepted by all `patterns`.
    pub fn new(patterns: impl IntoIterator<Item = DatePattern>) -> Self {
        DateRange {
            patterns: patterns.into_iter().collect(),
        }
    }

    /// Parses a range expression.
    ///
    /// Accepted forms are `>DATE` (at or after), `<DATE` (before),
    /// `DATE to DATE`, `after:DATE` and `before:DATE`.
    pub fn parse<Tz: TimeZone>(s: &str, now: DateTime<Tz>) -> Result<Self, DatePatternParseError>
    where
        Tz::Offset: Copy,
    {
        let s = s.trim();
        let patterns = if let Some(date) = s.strip_prefix('>') {
            vec![DatePattern::from_str_kind(date, "after", now)?]
        } else if let Some(date) = s.strip_prefix('<') {
            vec![DatePattern::from_str_kind(date, "before", now)?]
        } else if let Some((earliest, latest)) = s.split_once(" to ") {
            vec![
                DatePattern::from_str_kind(earliest, "after", now.clone())?,
                DatePattern::from_str_kind(latest, "before", now)?,
            ]
        } else if let Some((kind, date)) = s.split_once(':') {
            if !matches!(kind, "after" | "before") {
                return Err(DatePatternParseError::InvalidKind(kind.to_owned()));
            }
            vec![DatePattern::from_str_kind(date, kind, now)?]
        } else {
            return Err(DatePatternParseError::InvalidRange(s.to_owned()));
        };
        Ok(DateRange { patterns })
    }

    /// Returns the patterns making up the range.
    pub fn patterns(&self) -> &[DatePattern] {
        &self.patterns
    }

    /// Determines whether a given timestamp is within the range.
    pub fn matches(&self, timestamp: &Timestamp) -> bool {
        self.patterns
            .iter()
            .all(|pattern| pattern.matches(timestamp))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn millis(rfc3339: &str) -> MillisSinceEpoch {
        MillisSinceEpoch(
            DateTime::parse_from_rfc3339(rfc3339)
                .unwrap()
                .timestamp_millis(),
        )
    }

    fn test_equal<Tz: TimeZone>(now: DateTime<Tz>, expression: &str, should_equal_time: &str)
    where
        Tz::Offset: Copy,
    {
        let expression = DatePattern::from_str_kind(expression, "after", now).unwrap();
        assert_eq!(expression, DatePattern::AtOrAfter(millis(should_equal_time)));
    }

    #[test]
    fn test_date_pattern_parses_dates_without_times_as_the_date_at_local_midnight() {
        let now = DateTime::parse_from_rfc3339("2024-01-01T00:00:00-08:00").unwrap();
        test_equal(now, "2023-03-25", "2023-03-25T08:00:00Z");
        test_equal(now, "3/25/2023", "2023-03-25T08:00:00Z");
    }

    #[test]
    fn test_date_pattern_parses_dates_with_a_specified_offset() {
        let now = DateTime::parse_from_rfc3339("2024-01-01T00:00:00-08:00").unwrap();
        test_equal(
            now,
            "2023-03-25T00:00:00-05:00",
            "2023-03-25T00:00:00-05:00",
        );
    }

    #[test]
    fn test_date_pattern_parses_relative_durations() {
        let now = DateTime::parse_from_rfc3339("2024-01-01T00:00:00-08:00").unwrap();
        test_equal(now, "2 hours ago", "2024-01-01T06:00:00Z");
        test_equal(now, "yesterday", "2023-12-31T08:00:00Z");
    }

    #[test]
    fn test_date_pattern_rejects_unknown_kind() {
        let now = DateTime::parse_from_rfc3339("2024-01-01T00:00:00-08:00").unwrap();
        assert_matches!(
            DatePattern::from_str_kind("2023-03-25", "during", now),
            Err(DatePatternParseError::InvalidKind(kind)) if kind == "during"
        );
    }

    #[test]
    fn test_date_pattern_matches() {
        let pivot = millis("2023-03-25T00:00:00Z");
        let before = Timestamp::from_millis(pivot.0 - 1);
        let at = Timestamp::from_millis(pivot.0);
        assert!(!DatePattern::AtOrAfter(pivot).matches(&before));
        assert!(DatePattern::AtOrAfter(pivot).matches(&at));
        assert!(DatePattern::Before(pivot).matches(&before));
        assert!(!DatePattern::Before(pivot).matches(&at));
    }

    #[test]
    fn test_date_range_parse_forms() {
        let now = DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z").unwrap();
        assert_eq!(
            DateRange::parse(">2023-03-25T00:00:00+00:00", now).unwrap().patterns(),
            [DatePattern::AtOrAfter(millis("2023-03-25T00:00:00Z"))]
        );
        assert_eq!(
            DateRange::parse("<2023-03-25T00:00:00+00:00", now).unwrap().patterns(),
            [DatePattern::Before(millis("2023-03-25T00:00:00Z"))]
        );
        assert_eq!(
            DateRange::parse("2023-03-01T00:00:00+00:00 to 2023-04-01T00:00:00+00:00", now)
                .unwrap()
                .patterns(),
            [
                DatePattern::AtOrAfter(millis("2023-03-01T00:00:00Z")),
                DatePattern::Before(millis("2023-04-01T00:00:00Z")),
            ]
        );
        assert_eq!(
            DateRange::parse("before:2023-03-25", now).unwrap().patterns(),
            [DatePattern::Before(millis("2023-03-25T00:00:00Z"))]
        );
        assert_matches!(
            DateRange::parse("2023-03-25", now),
            Err(DatePatternParseError::InvalidRange(_))
        );
    }

    #[test]
    fn test_date_range_matches_all_bounds() {
        let range = DateRange::new([
            DatePattern::AtOrAfter(millis("2023-03-01T00:00:00Z")),
            DatePattern::Before(millis("2023-04-01T00:00:00Z")),
        ]);
        let inside = Timestamp::from_millis(millis("2023-03-15T12:00:00Z").0);
        let after = Timestamp::from_millis(millis("2023-04-01T00:00:00Z").0);
        let before = Timestamp::from_millis(millis("2023-02-28T00:00:00Z").0);
        assert!(range.matches(&inside));
        // Only the instant matters, not the committer's offset
        let late_local = DateTime::parse_from_rfc3339("2023-04-01T02:00:00+03:00").unwrap();
        assert!(range.matches(&Timestamp::from_datetime(late_local)));
        assert!(!range.matches(&after));
        assert!(!range.matches(&before));
        assert!(DateRange::default().matches(&before));
    }
}
