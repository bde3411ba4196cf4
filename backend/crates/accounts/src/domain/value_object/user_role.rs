use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(i16)]
pub enum UserRole {
    #[default]
    Student = 0,
    CollegeAdmin = 1,
    PlatformAdmin = 2,
}

impl UserRole {
    #[inline]
    pub const fn id(&self) -> i16 {
        *self as i16
    }

    #[inline]
    pub const fn code(&self) -> &'static str {
        use UserRole::*;
        match self {
            Student => "student",
            CollegeAdmin => "college_admin",
            PlatformAdmin => "platform_admin",
        }
    }

    #[inline]
    pub const fn is_platform_admin(&self) -> bool {
        matches!(self, UserRole::PlatformAdmin)
    }

    pub fn from_id(id: i16) -> Option<Self> {
        use UserRole::*;
        match id {
            0 => Some(Student),
            1 => Some(CollegeAdmin),
            2 => Some(PlatformAdmin),
            _ => None,
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        use UserRole::*;
        match code {
            "student" => Some(Student),
            "college_admin" => Some(CollegeAdmin),
            "platform_admin" => Some(PlatformAdmin),
            _ => None,
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_role_ids_round_trip() {
        for role in [UserRole::Student, UserRole::CollegeAdmin, UserRole::PlatformAdmin] {
            assert_eq!(UserRole::from_id(role.id()), Some(role));
            assert_eq!(UserRole::from_code(role.code()), Some(role));
        }
        assert_eq!(UserRole::from_id(9), None);
        assert_eq!(UserRole::from_code("admin"), None);
    }

    #[test]
    fn test_user_role_serde_matches_code() {
        let json = serde_json::to_string(&UserRole::CollegeAdmin).unwrap();
        assert_eq!(json, "\"college_admin\"");
        assert!(UserRole::PlatformAdmin.is_platform_admin());
        assert!(!UserRole::Student.is_platform_admin());
    }
}
