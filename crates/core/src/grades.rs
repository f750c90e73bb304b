//! Class catalogue and roll-call date validation.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;

use crate::error::CoreError;

/// Class codes accepted by the backend, paired with their display labels.
pub const GRADES: &[(&str, &str)] = &[
    ("Nursery", "Nursery"),
    ("Prep", "Prep"),
    ("1", "Class 1"),
    ("2", "Class 2"),
    ("3", "Class 3"),
    ("4", "Class 4"),
    ("5", "Class 5"),
    ("6", "Class 6"),
    ("7", "Class 7"),
    ("8", "Class 8"),
    ("9", "Class 9"),
    ("10", "Class 10"),
    ("11", "1st Year"),
    ("12", "2nd Year"),
];

/// Class selected when none is given.
pub const DEFAULT_GRADE: Grade = Grade { index: 0 };

/// A validated class code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Grade {
    index: usize,
}

impl Grade {
    /// Backend class code, e.g. `"Nursery"` or `"11"`.
    pub fn code(self) -> &'static str {
        GRADES[self.index].0
    }

    pub fn label(self) -> &'static str {
        GRADES[self.index].1
    }

    pub fn all() -> impl Iterator<Item = Grade> {
        (0..GRADES.len()).map(|index| Grade { index })
    }
}

impl Default for Grade {
    fn default() -> Self {
        DEFAULT_GRADE
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Grade {
    type Err = CoreError;

    /// Accepts either the class code or its label, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        GRADES
            .iter()
            .position(|(code, label)| {
                code.eq_ignore_ascii_case(wanted) || label.eq_ignore_ascii_case(wanted)
            })
            .map(|index| Grade { index })
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid grade '{wanted}'. Must be one of: {}",
                    GRADES
                        .iter()
                        .map(|(code, _)| *code)
                        .collect::<Vec<_>>()
                        .join(", ")
                ))
            })
    }
}

/// Attendance cannot be recorded for a date after `today`.
pub fn validate_attendance_date(date: NaiveDate, today: NaiveDate) -> Result<(), CoreError> {
    if date > today {
        Err(CoreError::Validation(format!(
            "Attendance date {date} is in the future (today is {today})"
        )))
    } else {
        Ok(())
    }
}
