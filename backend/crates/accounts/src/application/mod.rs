//! Application Layer
//!
//! Use cases and application services.

pub mod activity_feed;
pub mod admin_verification;
pub mod apply_referral;
pub mod authorize;
pub mod config;
pub mod dispatch;
mod issue_codes;
pub mod register_start;
pub mod resend_codes;
pub mod select_college;
pub mod sign_in;
pub mod token;
pub mod verify_codes;

// Re-exports
pub use activity_feed::RecentActivityUseCase;
pub use admin_verification::{
    AdminDetailOutput, AdminDetailUseCase, AdminStatsUseCase, DecideAdminInput,
    DecideAdminOutput, DecideAdminUseCase, ListPendingAdminsUseCase, Pagination,
    PendingAdminsOutput,
};
pub use apply_referral::{ApplyReferralInput, ApplyReferralOutput, ApplyReferralUseCase};
pub use authorize::{AuthenticatedUser, AuthorizeAdminUseCase};
pub use config::AccountsConfig;
pub use dispatch::{DeliveryReport, NotificationDispatcher};
pub use register_start::{RegisterStartInput, RegisterStartOutput, RegisterStartUseCase};
pub use resend_codes::{ResendCodesOutput, ResendCodesUseCase};
pub use select_college::{SelectCollegeInput, SelectCollegeOutput, SelectCollegeUseCase};
pub use sign_in::{SignInInput, SignInOutput, SignInUseCase};
pub use verify_codes::{VerifyCodesInput, VerifyCodesOutput, VerifyCodesUseCase};
