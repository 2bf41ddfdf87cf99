use thiserror::Error;

use crate::DEFAULT_REFERENCE_YEAR;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AgeError {
    #[error("invalid date format: {0:?}")]
    DateFormat(String),
    #[error("invalid release year {year:?}: {reason}")]
    YearParse { year: String, reason: String },
}

/// Years elapsed between a "DD-MM-YYYY" release date and a fixed reference year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgeCalculator {
    reference_year: i32,
}

impl Default for AgeCalculator {
    fn default() -> Self {
        Self::new(DEFAULT_REFERENCE_YEAR)
    }
}

impl AgeCalculator {
    pub fn new(reference_year: i32) -> Self {
        Self { reference_year }
    }

    pub fn reference_year(&self) -> i32 {
        self.reference_year
    }

    /// Only the year component is interpreted; day and month are not validated.
    /// A release year after the reference year yields a negative age.
    pub fn age(&self, release_date: &str) -> Result<i32, AgeError> {
        let components: Vec<&str> = release_date.split('-').collect();
        let [_, _, year] = components.as_slice() else {
            return Err(AgeError::DateFormat(release_date.to_string()));
        };

        let parsed: i32 = year.parse().map_err(|e: std::num::ParseIntError| {
            AgeError::YearParse {
                year: year.to_string(),
                reason: e.to_string(),
            }
        })?;

        let age = self.reference_year - parsed;
        tracing::trace!(release_date, reference_year = self.reference_year, age, "valuation.age");
        Ok(age)
    }
}
