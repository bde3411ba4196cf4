//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use kernel::id::{ActivityId, CollegeId, RegistrationSessionId, UserId};

use crate::domain::entity::{
    activity::{Activity, ActivityKind},
    college::College,
    registration_session::RegistrationSession,
    user::User,
};
use crate::domain::repository::{
    AccountsUnitOfWork, ActivityRepository, AdminStats, CollegeRepository, PromotionOutcome,
    RegistrationSessionRepository, UserRepository,
};
use crate::domain::value_object::{
    email::Email, graduation_year::GraduationYear, one_time_code::OneTimeCode,
    person_name::PersonName, phone_number::PhoneNumber, referral_code::ReferralCode,
    registration_step::RegistrationStep, user_role::UserRole,
};
use crate::error::{AccountsError, AccountsResult};

const USERS_EMAIL_KEY: &str = "users_email_key";
const USERS_PHONE_KEY: &str = "users_phone_key";
const USERS_REFERRAL_CODE_KEY: &str = "users_referral_code_key";

const SELECT_USER: &str = r#"
    SELECT
        user_id,
        email,
        phone,
        first_name,
        last_name,
        password_hash,
        user_role,
        college_id,
        graduation_year,
        email_verified,
        phone_verified,
        is_verified,
        referral_code,
        referral_count,
        referred_by,
        is_suspended,
        suspension_reason,
        created_at,
        updated_at
    FROM users
"#;

const SELECT_SESSION: &str = r#"
    SELECT
        session_id,
        step,
        email,
        phone,
        first_name,
        last_name,
        password_hash,
        college_id,
        graduation_year,
        email_code,
        phone_code,
        codes_issued_at_ms,
        email_code_expires_at_ms,
        phone_code_expires_at_ms,
        codes_delivered,
        email_verified,
        phone_verified,
        promoted_user_id,
        expires_at_ms,
        created_at
    FROM registration_sessions
"#;

const SELECT_ACTIVITY: &str = r#"
    SELECT
        activity_id,
        kind,
        user_id,
        college_id,
        message,
        created_at
    FROM activities
"#;

/// PostgreSQL-backed accounts repository
#[derive(Clone)]
pub struct PgAccountsRepository {
    pool: PgPool,
}

impl PgAccountsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Delete registration sessions past their TTL, promoted or not
    pub async fn purge_expired(&self) -> AccountsResult<u64> {
        let now_ms = Utc::now().timestamp_millis();

        let deleted = sqlx::query("DELETE FROM registration_sessions WHERE expires_at_ms <= $1")
            .bind(now_ms)
            .execute(&self.pool)
            .await?
            .rows_affected();

        tracing::info!(sessions_deleted = deleted, "Purged expired registration sessions");

        Ok(deleted)
    }
}

fn violated_constraint(err: &sqlx::Error) -> Option<&str> {
    match err {
        sqlx::Error::Database(db) if db.code().as_deref() == Some("23505") => db.constraint(),
        _ => None,
    }
}

async fn insert_activity(conn: &mut PgConnection, activity: &Activity) -> AccountsResult<()> {
    sqlx::query(
        r#"
        INSERT INTO activities (
            activity_id,
            kind,
            user_id,
            college_id,
            message,
            created_at
        ) VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(activity.activity_id.as_uuid())
    .bind(activity.kind.code())
    .bind(activity.user_id.as_uuid())
    .bind(activity.college_id.map(CollegeId::into_uuid))
    .bind(&activity.message)
    .bind(activity.created_at)
    .execute(conn)
    .await?;

    Ok(())
}

// ============================================================================
// Registration Session Repository Implementation
// ============================================================================

impl RegistrationSessionRepository for PgAccountsRepository {
    async fn create(&self, session: &RegistrationSession) -> AccountsResult<()> {
        sqlx::query(
            r#"
            INSERT INTO registration_sessions (
                session_id,
                step,
                email,
                phone,
                first_name,
                last_name,
                password_hash,
                codes_delivered,
                email_verified,
                phone_verified,
                expires_at_ms,
                created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(session.session_id.as_uuid())
        .bind(session.step.number())
        .bind(session.email.as_str())
        .bind(session.phone.as_str())
        .bind(session.first_name.as_str())
        .bind(session.last_name.as_str())
        .bind(&session.password_hash)
        .bind(session.codes_delivered)
        .bind(session.email_verified)
        .bind(session.phone_verified)
        .bind(session.expires_at_ms)
        .bind(session.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_active(
        &self,
        session_id: &RegistrationSessionId,
    ) -> AccountsResult<Option<RegistrationSession>> {
        let now_ms = Utc::now().timestamp_millis();
        let sql = format!("{SELECT_SESSION} WHERE session_id = $1 AND expires_at_ms > $2");

        let row = sqlx::query_as::<_, RegistrationSessionRow>(&sql)
            .bind(session_id.as_uuid())
            .bind(now_ms)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| r.into_session()).transpose()
    }

    async fn update(&self, session: &RegistrationSession) -> AccountsResult<()> {
        let now_ms = Utc::now().timestamp_millis();

        let updated = sqlx::query(
            r#"
            UPDATE registration_sessions SET
                step = $2,
                college_id = $3,
                graduation_year = $4,
                email_code = $5,
                phone_code = $6,
                codes_issued_at_ms = $7,
                email_code_expires_at_ms = $8,
                phone_code_expires_at_ms = $9,
                codes_delivered = $10,
                email_verified = $11,
                phone_verified = $12
            WHERE session_id = $1
              AND promoted_user_id IS NULL
              AND expires_at_ms > $13
            "#,
        )
        .bind(session.session_id.as_uuid())
        .bind(session.step.number())
        .bind(session.college_id.map(CollegeId::into_uuid))
        .bind(session.graduation_year.map(|y| y.value()))
        .bind(session.email_code.as_ref().map(|c| c.as_str()))
        .bind(session.phone_code.as_ref().map(|c| c.as_str()))
        .bind(session.codes_issued_at_ms)
        .bind(session.email_code_expires_at_ms)
        .bind(session.phone_code_expires_at_ms)
        .bind(session.codes_delivered)
        .bind(session.email_verified)
        .bind(session.phone_verified)
        .bind(now_ms)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if updated == 0 {
            return Err(AccountsError::SessionInvalid);
        }

        Ok(())
    }

    async fn claim_issuance(
        &self,
        session: &RegistrationSession,
        expected_issued_at_ms: Option<i64>,
    ) -> AccountsResult<bool> {
        let now_ms = Utc::now().timestamp_millis();

        // Compare-and-swap on the issuance timestamp; of two requests that
        // passed the cooldown check on the same row, only one matches here
        let claimed = sqlx::query(
            r#"
            UPDATE registration_sessions SET
                step = $2,
                college_id = $3,
                graduation_year = $4,
                email_code = $5,
                phone_code = $6,
                codes_issued_at_ms = $7,
                email_code_expires_at_ms = $8,
                phone_code_expires_at_ms = $9,
                codes_delivered = $10,
                email_verified = $11,
                phone_verified = $12
            WHERE session_id = $1
              AND promoted_user_id IS NULL
              AND expires_at_ms > $13
              AND codes_issued_at_ms IS NOT DISTINCT FROM $14
            "#,
        )
        .bind(session.session_id.as_uuid())
        .bind(session.step.number())
        .bind(session.college_id.map(CollegeId::into_uuid))
        .bind(session.graduation_year.map(|y| y.value()))
        .bind(session.email_code.as_ref().map(|c| c.as_str()))
        .bind(session.phone_code.as_ref().map(|c| c.as_str()))
        .bind(session.codes_issued_at_ms)
        .bind(session.email_code_expires_at_ms)
        .bind(session.phone_code_expires_at_ms)
        .bind(session.codes_delivered)
        .bind(session.email_verified)
        .bind(session.phone_verified)
        .bind(now_ms)
        .bind(expected_issued_at_ms)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(claimed == 1)
    }

    async fn purge_expired(&self) -> AccountsResult<u64> {
        self.purge_expired().await
    }
}

// ============================================================================
// User Repository Implementation
// ============================================================================

impl UserRepository for PgAccountsRepository {
    async fn find_by_id(&self, user_id: &UserId) -> AccountsResult<Option<User>> {
        let sql = format!("{SELECT_USER} WHERE user_id = $1");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(user_id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| r.into_user()).transpose()
    }

    async fn find_by_email(&self, email: &Email) -> AccountsResult<Option<User>> {
        let sql = format!("{SELECT_USER} WHERE email = $1");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(email.as_str())
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| r.into_user()).transpose()
    }

    async fn exists_by_email(&self, email: &Email) -> AccountsResult<bool> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
                .bind(email.as_str())
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    async fn exists_by_phone(&self, phone: &PhoneNumber) -> AccountsResult<bool> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE phone = $1)")
                .bind(phone.as_str())
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    async fn find_by_referral_code(&self, code: &ReferralCode) -> AccountsResult<Option<User>> {
        let sql = format!("{SELECT_USER} WHERE referral_code = $1");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(code.as_str())
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| r.into_user()).transpose()
    }

    async fn list_pending_admins(
        &self,
        offset: i64,
        limit: i64,
    ) -> AccountsResult<(Vec<User>, i64)> {
        let sql = format!(
            "{SELECT_USER} WHERE user_role = $1 AND is_verified = FALSE AND is_suspended = FALSE \
             ORDER BY created_at ASC OFFSET $2 LIMIT $3"
        );
        let rows = sqlx::query_as::<_, UserRow>(&sql)
            .bind(UserRole::CollegeAdmin.id())
            .bind(offset)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM users
            WHERE user_role = $1 AND is_verified = FALSE AND is_suspended = FALSE
            "#,
        )
        .bind(UserRole::CollegeAdmin.id())
        .fetch_one(&self.pool)
        .await?;

        let users = rows
            .into_iter()
            .map(|r| r.into_user())
            .collect::<AccountsResult<Vec<_>>>()?;

        Ok((users, total))
    }

    async fn admin_stats(&self, since: DateTime<Utc>) -> AccountsResult<AdminStats> {
        let row = sqlx::query_as::<_, AdminStatsRow>(
            r#"
            SELECT
                COUNT(*) FILTER (WHERE is_verified = FALSE AND is_suspended = FALSE) AS pending,
                COUNT(*) FILTER (WHERE is_verified = TRUE) AS verified,
                COUNT(*) FILTER (WHERE is_suspended = TRUE) AS rejected,
                COUNT(*) FILTER (WHERE created_at >= $2) AS this_week,
                COUNT(*) AS total,
                (SELECT COUNT(*) FROM colleges WHERE admin_verified = TRUE) AS colleges_with_admins
            FROM users
            WHERE user_role = $1
            "#,
        )
        .bind(UserRole::CollegeAdmin.id())
        .bind(since)
        .fetch_one(&self.pool)
        .await?;

        Ok(AdminStats {
            pending: row.pending,
            verified: row.verified,
            rejected: row.rejected,
            this_week: row.this_week,
            colleges_with_admins: row.colleges_with_admins,
            total: row.total,
        })
    }
}

// ============================================================================
// College Repository Implementation
// ============================================================================

impl CollegeRepository for PgAccountsRepository {
    async fn find_by_id(&self, college_id: &CollegeId) -> AccountsResult<Option<College>> {
        let row = sqlx::query_as::<_, CollegeRow>(
            r#"
            SELECT
                college_id,
                name,
                student_count,
                admin_verified
            FROM colleges
            WHERE college_id = $1
            "#,
        )
        .bind(college_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_college()))
    }
}

// ============================================================================
// Activity Repository Implementation
// ============================================================================

impl ActivityRepository for PgAccountsRepository {
    async fn recent(&self, limit: i64) -> AccountsResult<Vec<Activity>> {
        let sql = format!("{SELECT_ACTIVITY} ORDER BY created_at DESC LIMIT $1");
        let rows = sqlx::query_as::<_, ActivityRow>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(|r| r.into_activity()).collect()
    }

    async fn recent_for_user(
        &self,
        user_id: &UserId,
        limit: i64,
    ) -> AccountsResult<Vec<Activity>> {
        let sql = format!("{SELECT_ACTIVITY} WHERE user_id = $1 ORDER BY created_at DESC LIMIT $2");
        let rows = sqlx::query_as::<_, ActivityRow>(&sql)
            .bind(user_id.as_uuid())
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(|r| r.into_activity()).collect()
    }
}

// ============================================================================
// Unit of Work Implementation
// ============================================================================

impl AccountsUnitOfWork for PgAccountsRepository {
    async fn promote_session(
        &self,
        session: &RegistrationSession,
        user: &User,
        activity: &Activity,
    ) -> AccountsResult<PromotionOutcome> {
        let now_ms = Utc::now().timestamp_millis();
        let mut tx = self.pool.begin().await?;

        // Row lock on the session; a concurrent promotion blocks here and
        // then sees promoted_user_id already set
        let claimed = sqlx::query(
            r#"
            UPDATE registration_sessions SET
                step = $2,
                email_verified = TRUE,
                phone_verified = TRUE,
                promoted_user_id = $3
            WHERE session_id = $1
              AND promoted_user_id IS NULL
              AND expires_at_ms > $4
            "#,
        )
        .bind(session.session_id.as_uuid())
        .bind(RegistrationStep::Verified.number())
        .bind(user.user_id.as_uuid())
        .bind(now_ms)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if claimed == 0 {
            let promoted: Option<Option<Uuid>> = sqlx::query_scalar(
                "SELECT promoted_user_id FROM registration_sessions WHERE session_id = $1",
            )
            .bind(session.session_id.as_uuid())
            .fetch_optional(&mut *tx)
            .await?;

            return Ok(match promoted {
                Some(Some(_)) => PromotionOutcome::AlreadyPromoted,
                _ => PromotionOutcome::SessionExpired,
            });
        }

        let inserted = sqlx::query(
            r#"
            INSERT INTO users (
                user_id,
                email,
                phone,
                first_name,
                last_name,
                password_hash,
                user_role,
                college_id,
                graduation_year,
                email_verified,
                phone_verified,
                is_verified,
                referral_code,
                referral_count,
                referred_by,
                is_suspended,
                suspension_reason,
                created_at,
                updated_at
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                $11, $12, $13, $14, $15, $16, $17, $18, $19
            )
            "#,
        )
        .bind(user.user_id.as_uuid())
        .bind(user.email.as_str())
        .bind(user.phone.as_str())
        .bind(user.first_name.as_str())
        .bind(user.last_name.as_str())
        .bind(&user.password_hash)
        .bind(user.role.id())
        .bind(user.college_id.map(CollegeId::into_uuid))
        .bind(user.graduation_year.map(|y| y.value()))
        .bind(user.email_verified)
        .bind(user.phone_verified)
        .bind(user.is_verified)
        .bind(user.referral_code.as_ref().map(|c| c.as_str()))
        .bind(user.referral_count)
        .bind(user.referred_by.map(UserId::into_uuid))
        .bind(user.is_suspended)
        .bind(user.suspension_reason.as_deref())
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&mut *tx)
        .await;

        // Dropping `tx` on the early returns rolls the claim back
        if let Err(e) = inserted {
            return match violated_constraint(&e) {
                Some(USERS_EMAIL_KEY) => Ok(PromotionOutcome::EmailTaken),
                Some(USERS_PHONE_KEY) => Ok(PromotionOutcome::PhoneTaken),
                Some(USERS_REFERRAL_CODE_KEY) => Ok(PromotionOutcome::ReferralCodeTaken),
                _ => Err(e.into()),
            };
        }

        if let Some(college_id) = &user.college_id {
            sqlx::query(
                "UPDATE colleges SET student_count = student_count + 1 WHERE college_id = $1",
            )
            .bind(college_id.as_uuid())
            .execute(&mut *tx)
            .await?;
        }

        insert_activity(&mut *tx, activity).await?;

        tx.commit().await?;

        Ok(PromotionOutcome::Promoted)
    }

    async fn link_referral(
        &self,
        user_id: &UserId,
        referrer_id: &UserId,
        activity: &Activity,
    ) -> AccountsResult<bool> {
        let mut tx = self.pool.begin().await?;

        let linked = sqlx::query(
            r#"
            UPDATE users SET
                referred_by = $2,
                updated_at = NOW()
            WHERE user_id = $1
              AND referred_by IS NULL
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(referrer_id.as_uuid())
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if linked == 0 {
            return Ok(false);
        }

        sqlx::query(
            r#"
            UPDATE users SET
                referral_count = referral_count + 1,
                updated_at = NOW()
            WHERE user_id = $1
            "#,
        )
        .bind(referrer_id.as_uuid())
        .execute(&mut *tx)
        .await?;

        insert_activity(&mut *tx, activity).await?;

        tx.commit().await?;

        Ok(true)
    }

    async fn record_admin_decision(
        &self,
        user: &User,
        verified_college: Option<&CollegeId>,
        activity: &Activity,
    ) -> AccountsResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            UPDATE users SET
                is_verified = $2,
                is_suspended = $3,
                suspension_reason = $4,
                updated_at = $5
            WHERE user_id = $1
            "#,
        )
        .bind(user.user_id.as_uuid())
        .bind(user.is_verified)
        .bind(user.is_suspended)
        .bind(user.suspension_reason.as_deref())
        .bind(user.updated_at)
        .execute(&mut *tx)
        .await?;

        if let Some(college_id) = verified_college {
            sqlx::query("UPDATE colleges SET admin_verified = TRUE WHERE college_id = $1")
                .bind(college_id.as_uuid())
                .execute(&mut *tx)
                .await?;
        }

        insert_activity(&mut *tx, activity).await?;

        tx.commit().await?;

        Ok(())
    }
}

// ============================================================================
// Row Types for sqlx mapping
// ============================================================================

#[derive(sqlx::FromRow)]
struct RegistrationSessionRow {
    session_id: Uuid,
    step: i16,
    email: String,
    phone: String,
    first_name: String,
    last_name: String,
    password_hash: String,
    college_id: Option<Uuid>,
    graduation_year: Option<i32>,
    email_code: Option<String>,
    phone_code: Option<String>,
    codes_issued_at_ms: Option<i64>,
    email_code_expires_at_ms: Option<i64>,
    phone_code_expires_at_ms: Option<i64>,
    codes_delivered: bool,
    email_verified: bool,
    phone_verified: bool,
    promoted_user_id: Option<Uuid>,
    expires_at_ms: i64,
    created_at: DateTime<Utc>,
}

impl RegistrationSessionRow {
    fn into_session(self) -> AccountsResult<RegistrationSession> {
        let step = RegistrationStep::from_number(self.step)
            .ok_or_else(|| AccountsError::Internal(format!("Invalid step: {}", self.step)))?;

        Ok(RegistrationSession {
            session_id: RegistrationSessionId::from_uuid(self.session_id),
            step,
            email: Email::from_db(self.email),
            phone: PhoneNumber::from_db(self.phone),
            first_name: PersonName::from_db(self.first_name),
            last_name: PersonName::from_db(self.last_name),
            password_hash: self.password_hash,
            college_id: self.college_id.map(CollegeId::from_uuid),
            graduation_year: self.graduation_year.map(GraduationYear::from_db),
            email_code: self.email_code.map(OneTimeCode::from_db),
            phone_code: self.phone_code.map(OneTimeCode::from_db),
            codes_issued_at_ms: self.codes_issued_at_ms,
            email_code_expires_at_ms: self.email_code_expires_at_ms,
            phone_code_expires_at_ms: self.phone_code_expires_at_ms,
            codes_delivered: self.codes_delivered,
            email_verified: self.email_verified,
            phone_verified: self.phone_verified,
            promoted_user_id: self.promoted_user_id.map(UserId::from_uuid),
            expires_at_ms: self.expires_at_ms,
            created_at: self.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    user_id: Uuid,
    email: String,
    phone: String,
    first_name: String,
    last_name: String,
    password_hash: String,
    user_role: i16,
    college_id: Option<Uuid>,
    graduation_year: Option<i32>,
    email_verified: bool,
    phone_verified: bool,
    is_verified: bool,
    referral_code: Option<String>,
    referral_count: i32,
    referred_by: Option<Uuid>,
    is_suspended: bool,
    suspension_reason: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> AccountsResult<User> {
        let role = UserRole::from_id(self.user_role)
            .ok_or_else(|| AccountsError::Internal(format!("Invalid user_role: {}", self.user_role)))?;

        Ok(User {
            user_id: UserId::from_uuid(self.user_id),
            email: Email::from_db(self.email),
            phone: PhoneNumber::from_db(self.phone),
            first_name: PersonName::from_db(self.first_name),
            last_name: PersonName::from_db(self.last_name),
            password_hash: self.password_hash,
            role,
            college_id: self.college_id.map(CollegeId::from_uuid),
            graduation_year: self.graduation_year.map(GraduationYear::from_db),
            email_verified: self.email_verified,
            phone_verified: self.phone_verified,
            is_verified: self.is_verified,
            referral_code: self.referral_code.map(ReferralCode::from_db),
            referral_count: self.referral_count,
            referred_by: self.referred_by.map(UserId::from_uuid),
            is_suspended: self.is_suspended,
            suspension_reason: self.suspension_reason,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct CollegeRow {
    college_id: Uuid,
    name: String,
    student_count: i64,
    admin_verified: bool,
}

impl CollegeRow {
    fn into_college(self) -> College {
        College {
            college_id: CollegeId::from_uuid(self.college_id),
            name: self.name,
            student_count: self.student_count,
            admin_verified: self.admin_verified,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ActivityRow {
    activity_id: Uuid,
    kind: String,
    user_id: Uuid,
    college_id: Option<Uuid>,
    message: String,
    created_at: DateTime<Utc>,
}

impl ActivityRow {
    fn into_activity(self) -> AccountsResult<Activity> {
        let kind = ActivityKind::from_code(&self.kind)
            .ok_or_else(|| AccountsError::Internal(format!("Invalid activity kind: {}", self.kind)))?;

        Ok(Activity {
            activity_id: ActivityId::from_uuid(self.activity_id),
            kind,
            user_id: UserId::from_uuid(self.user_id),
            college_id: self.college_id.map(CollegeId::from_uuid),
            message: self.message,
            created_at: self.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct AdminStatsRow {
    pending: i64,
    verified: i64,
    rejected: i64,
    this_week: i64,
    total: i64,
    colleges_with_admins: i64,
}
