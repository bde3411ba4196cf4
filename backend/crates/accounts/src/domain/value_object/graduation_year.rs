use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};

const MIN_YEAR: i32 = 2000;
const MAX_YEAR: i32 = 2100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GraduationYear(i32);

impl GraduationYear {
    pub fn new(year: i32) -> AppResult<Self> {
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(AppError::bad_request(format!(
                "Graduation year must be between {} and {}",
                MIN_YEAR, MAX_YEAR
            )));
        }
        Ok(Self(year))
    }

    pub fn from_db(year: i32) -> Self {
        Self(year)
    }

    pub fn value(&self) -> i32 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graduation_year_bounds() {
        assert_eq!(GraduationYear::new(2026).unwrap().value(), 2026);
        assert!(GraduationYear::new(2000).is_ok());
        assert!(GraduationYear::new(2100).is_ok());
        assert!(GraduationYear::new(1999).is_err());
        assert!(GraduationYear::new(2101).is_err());
    }
}
