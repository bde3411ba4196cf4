//! Registration Step
//!
//! Progress of a temporary registration session. Step 4 (referral) only reads
//! the session, so no fourth state is ever stored.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(i16)]
pub enum RegistrationStep {
    /// Basic info captured
    Initiated = 1,
    /// College chosen, codes issued
    CollegeSelected = 2,
    /// Both codes accepted, user created
    Verified = 3,
}

impl RegistrationStep {
    #[inline]
    pub const fn number(&self) -> i16 {
        *self as i16
    }

    pub fn from_number(n: i16) -> Option<Self> {
        match n {
            1 => Some(Self::Initiated),
            2 => Some(Self::CollegeSelected),
            3 => Some(Self::Verified),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_numbers() {
        for step in [
            RegistrationStep::Initiated,
            RegistrationStep::CollegeSelected,
            RegistrationStep::Verified,
        ] {
            assert_eq!(RegistrationStep::from_number(step.number()), Some(step));
        }
        assert_eq!(RegistrationStep::from_number(0), None);
        assert_eq!(RegistrationStep::from_number(4), None);
        assert!(RegistrationStep::Initiated < RegistrationStep::Verified);
    }
}
