//! College Entity
//!
//! Colleges are managed elsewhere; registration only reads them and bumps
//! `student_count`, and admin verification flips `admin_verified`.

use kernel::id::CollegeId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct College {
    pub college_id: CollegeId,
    pub name: String,
    /// Incremented once per successful registration promotion
    pub student_count: i64,
    /// Set when a college admin for this college is approved
    pub admin_verified: bool,
}

impl College {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            college_id: CollegeId::new(),
            name: name.into(),
            student_count: 0,
            admin_verified: false,
        }
    }
}
