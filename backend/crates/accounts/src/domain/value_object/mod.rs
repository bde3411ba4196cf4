//! Value Object Module

pub mod email;
pub mod graduation_year;
pub mod one_time_code;
pub mod person_name;
pub mod phone_number;
pub mod referral_code;
pub mod registration_step;
pub mod user_role;
