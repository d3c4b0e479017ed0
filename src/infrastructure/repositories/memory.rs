// src/infrastructure/repositories/memory.rs
//! Process-local store backing every repository trait with one lock, so a
//! redemption's check, increment and enrollment insert happen as one step.
use crate::domain::activation::{
    ActivationCode, ActivationCodeId, ActivationCodeRepository, CodeValue, NewActivationCode,
    Redemption,
};
use crate::domain::course::{Course, CourseId, CourseRepository};
use crate::domain::enrollment::{
    Enrollment, EnrollmentId, EnrollmentListCursor, EnrollmentRepository, EnrollmentStatus,
    NewEnrollment,
};
use crate::domain::errors::{AccessError, DomainError, DomainResult};
use crate::domain::session::{
    NewRefreshToken, RefreshTokenRecord, RefreshTokenRepository, TokenHash,
};
use crate::domain::user::{
    Email, LoginIdentifier, NewUser, PasswordHash, PhoneNumber, User, UserId, UserRepository,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

#[derive(Default)]
struct State {
    users: HashMap<UserId, User>,
    courses: HashMap<CourseId, Course>,
    refresh_tokens: HashMap<TokenHash, RefreshTokenRecord>,
    codes: HashMap<ActivationCodeId, ActivationCode>,
    enrollments: HashMap<EnrollmentId, Enrollment>,
}

impl State {
    fn expire_lapsed_pair(&mut self, user_id: UserId, course_id: CourseId, now: DateTime<Utc>) {
        for enrollment in self.enrollments.values_mut() {
            if enrollment.user_id == user_id
                && enrollment.course_id == course_id
                && enrollment.status == EnrollmentStatus::Active
                && enrollment.has_lapsed(now)
            {
                enrollment.status = EnrollmentStatus::Expired;
                enrollment.updated_at = now;
            }
        }
    }

    fn has_active(&self, user_id: UserId, course_id: CourseId, now: DateTime<Utc>) -> bool {
        self.enrollments.values().any(|enrollment| {
            enrollment.user_id == user_id
                && enrollment.course_id == course_id
                && enrollment.is_active(now)
        })
    }

    fn insert_enrollment(&mut self, new: NewEnrollment) -> DomainResult<Enrollment> {
        self.expire_lapsed_pair(new.user_id, new.course_id, new.enrolled_at);
        let blocked = self.enrollments.values().any(|enrollment| {
            enrollment.user_id == new.user_id
                && enrollment.course_id == new.course_id
                && enrollment.status == EnrollmentStatus::Active
        });
        if blocked {
            return Err(AccessError::AlreadyEnrolled.into());
        }

        let enrollment = new.into_enrollment(EnrollmentId(Uuid::new_v4()));
        self.enrollments.insert(enrollment.id, enrollment.clone());
        Ok(enrollment)
    }
}

#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> DomainResult<MutexGuard<'_, State>> {
        self.state
            .lock()
            .map_err(|_| DomainError::Persistence("in-memory store lock poisoned".into()))
    }

    /// Registers a catalog entry. Courses are managed outside this service.
    pub fn seed_course(&self, title: &str, slug: &str) -> DomainResult<Course> {
        let course = Course {
            id: CourseId(Uuid::new_v4()),
            title: title.to_string(),
            slug: slug.to_string(),
        };
        self.lock()?.courses.insert(course.id, course.clone());
        Ok(course)
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn insert(&self, new_user: NewUser) -> DomainResult<User> {
        let mut state = self.lock()?;
        if state.users.values().any(|u| u.email == new_user.email) {
            return Err(DomainError::Conflict("email already registered".into()));
        }
        if state
            .users
            .values()
            .any(|u| u.phone_number == new_user.phone_number)
        {
            return Err(DomainError::Conflict("phone number already registered".into()));
        }

        let user = User {
            id: UserId::generate(),
            email: new_user.email,
            phone_number: new_user.phone_number,
            full_name: new_user.full_name,
            password_hash: new_user.password_hash,
            role: new_user.role,
            is_active: new_user.is_active,
            is_verified: new_user.is_verified,
            created_at: new_user.created_at,
            updated_at: new_user.created_at,
        };
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: UserId) -> DomainResult<Option<User>> {
        Ok(self.lock()?.users.get(&id).cloned())
    }

    async fn find_by_identifier(&self, identifier: &LoginIdentifier) -> DomainResult<Option<User>> {
        let state = self.lock()?;
        let found = state.users.values().find(|user| match identifier {
            LoginIdentifier::Email(email) => &user.email == email,
            LoginIdentifier::Phone(phone) => &user.phone_number == phone,
        });
        Ok(found.cloned())
    }

    async fn email_exists(&self, email: &Email) -> DomainResult<bool> {
        Ok(self.lock()?.users.values().any(|u| &u.email == email))
    }

    async fn phone_exists(&self, phone: &PhoneNumber) -> DomainResult<bool> {
        Ok(self.lock()?.users.values().any(|u| &u.phone_number == phone))
    }

    async fn update_password(
        &self,
        id: UserId,
        password_hash: PasswordHash,
        updated_at: DateTime<Utc>,
    ) -> DomainResult<()> {
        let mut state = self.lock()?;
        let user = state
            .users
            .get_mut(&id)
            .ok_or_else(|| DomainError::NotFound("user not found".into()))?;
        user.password_hash = password_hash;
        user.updated_at = updated_at;
        Ok(())
    }
}

#[async_trait]
impl CourseRepository for InMemoryStore {
    async fn find_by_id(&self, id: CourseId) -> DomainResult<Option<Course>> {
        Ok(self.lock()?.courses.get(&id).cloned())
    }
}

#[async_trait]
impl RefreshTokenRepository for InMemoryStore {
    async fn insert(&self, token: NewRefreshToken) -> DomainResult<RefreshTokenRecord> {
        let mut state = self.lock()?;
        if state.refresh_tokens.contains_key(&token.token_hash) {
            return Err(DomainError::Conflict("refresh token already recorded".into()));
        }
        let record = RefreshTokenRecord {
            id: Uuid::new_v4(),
            user_id: token.user_id,
            token_hash: token.token_hash,
            expires_at: token.expires_at,
            revoked: false,
            created_at: token.created_at,
            updated_at: token.created_at,
        };
        state
            .refresh_tokens
            .insert(record.token_hash.clone(), record.clone());
        Ok(record)
    }

    async fn find_by_hash(&self, hash: &TokenHash) -> DomainResult<Option<RefreshTokenRecord>> {
        Ok(self.lock()?.refresh_tokens.get(hash).cloned())
    }

    async fn revoke(&self, hash: &TokenHash, now: DateTime<Utc>) -> DomainResult<bool> {
        let mut state = self.lock()?;
        match state.refresh_tokens.get_mut(hash) {
            Some(record) if !record.revoked => {
                record.revoked = true;
                record.updated_at = now;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn revoke_all_for_user(&self, user_id: UserId, now: DateTime<Utc>) -> DomainResult<u64> {
        let mut state = self.lock()?;
        let mut revoked = 0;
        for record in state.refresh_tokens.values_mut() {
            if record.user_id == user_id && !record.revoked {
                record.revoked = true;
                record.updated_at = now;
                revoked += 1;
            }
        }
        Ok(revoked)
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> DomainResult<u64> {
        let mut state = self.lock()?;
        let before = state.refresh_tokens.len();
        state.refresh_tokens.retain(|_, record| record.expires_at > now);
        Ok((before - state.refresh_tokens.len()) as u64)
    }
}

#[async_trait]
impl ActivationCodeRepository for InMemoryStore {
    async fn insert(&self, code: NewActivationCode) -> DomainResult<ActivationCode> {
        let mut state = self.lock()?;
        if !state.courses.contains_key(&code.course_id) {
            return Err(DomainError::NotFound("course not found".into()));
        }
        if state.codes.values().any(|c| c.code == code.code) {
            return Err(DomainError::Conflict("activation code already exists".into()));
        }

        let created = ActivationCode {
            id: ActivationCodeId(Uuid::new_v4()),
            code: code.code,
            course_id: code.course_id,
            max_uses: code.max_uses,
            current_uses: 0,
            expires_at: code.expires_at,
            is_active: true,
            created_by: code.created_by,
            note: code.note,
            created_at: code.created_at,
            updated_at: code.created_at,
        };
        state.codes.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_by_code(&self, code: &CodeValue) -> DomainResult<Option<ActivationCode>> {
        Ok(self
            .lock()?
            .codes
            .values()
            .find(|c| &c.code == code)
            .cloned())
    }

    async fn set_active(
        &self,
        id: ActivationCodeId,
        is_active: bool,
        now: DateTime<Utc>,
    ) -> DomainResult<ActivationCode> {
        let mut state = self.lock()?;
        let code = state
            .codes
            .get_mut(&id)
            .ok_or(AccessError::ActivationCodeNotFound)?;
        code.is_active = is_active;
        code.updated_at = now;
        Ok(code.clone())
    }

    async fn list(
        &self,
        course_id: Option<CourseId>,
        limit: u32,
        offset: u64,
    ) -> DomainResult<(Vec<ActivationCode>, u64)> {
        let state = self.lock()?;
        let mut matching: Vec<ActivationCode> = state
            .codes
            .values()
            .filter(|c| course_id.is_none_or(|course_id| c.course_id == course_id))
            .cloned()
            .collect();
        matching.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.0.cmp(&a.id.0))
        });

        let total = matching.len() as u64;
        let offset = usize::try_from(offset).unwrap_or(usize::MAX);
        let items = matching
            .into_iter()
            .skip(offset)
            .take(limit as usize)
            .collect();
        Ok((items, total))
    }

    async fn redeem(&self, redemption: Redemption) -> DomainResult<Enrollment> {
        let mut state = self.lock()?;
        let now = redemption.redeemed_at;

        let code = state
            .codes
            .get(&redemption.code_id)
            .ok_or(AccessError::ActivationCodeNotFound)?;
        code.check_redeemable(now)?;

        state.expire_lapsed_pair(redemption.user_id, redemption.course_id, now);
        if state.has_active(redemption.user_id, redemption.course_id, now) {
            return Err(AccessError::AlreadyEnrolled.into());
        }

        let enrollment = state.insert_enrollment(redemption.new_enrollment())?;
        if let Some(code) = state.codes.get_mut(&redemption.code_id) {
            code.current_uses += 1;
            code.updated_at = now;
        }
        Ok(enrollment)
    }
}

#[async_trait]
impl EnrollmentRepository for InMemoryStore {
    async fn insert(&self, enrollment: NewEnrollment) -> DomainResult<Enrollment> {
        self.lock()?.insert_enrollment(enrollment)
    }

    async fn find_by_id(&self, id: EnrollmentId) -> DomainResult<Option<Enrollment>> {
        Ok(self.lock()?.enrollments.get(&id).cloned())
    }

    async fn is_active(
        &self,
        user_id: UserId,
        course_id: CourseId,
        now: DateTime<Utc>,
    ) -> DomainResult<bool> {
        Ok(self.lock()?.has_active(user_id, course_id, now))
    }

    async fn find_latest(
        &self,
        user_id: UserId,
        course_id: CourseId,
    ) -> DomainResult<Option<Enrollment>> {
        let state = self.lock()?;
        Ok(state
            .enrollments
            .values()
            .filter(|e| e.user_id == user_id && e.course_id == course_id)
            .max_by(|a, b| {
                a.enrolled_at
                    .cmp(&b.enrolled_at)
                    .then_with(|| a.id.0.cmp(&b.id.0))
            })
            .cloned())
    }

    async fn list_for_user(
        &self,
        user_id: UserId,
        limit: u32,
        cursor: Option<EnrollmentListCursor>,
    ) -> DomainResult<(Vec<Enrollment>, Option<EnrollmentListCursor>)> {
        let state = self.lock()?;
        let mut items: Vec<Enrollment> = state
            .enrollments
            .values()
            .filter(|e| e.user_id == user_id)
            .filter(|e| {
                cursor
                    .as_ref()
                    .is_none_or(|c| (e.enrolled_at, e.id.0) < (c.enrolled_at, c.id))
            })
            .cloned()
            .collect();
        items.sort_by(|a, b| (b.enrolled_at, b.id.0).cmp(&(a.enrolled_at, a.id.0)));

        let page_size = limit.max(1) as usize;
        let next = if items.len() > page_size {
            items.truncate(page_size);
            items
                .last()
                .map(|last| EnrollmentListCursor::new(last.enrolled_at, last.id.0))
        } else {
            None
        };
        Ok((items, next))
    }

    async fn cancel(&self, id: EnrollmentId, now: DateTime<Utc>) -> DomainResult<Enrollment> {
        let mut state = self.lock()?;
        let enrollment = state
            .enrollments
            .get_mut(&id)
            .ok_or(AccessError::EnrollmentNotFound)?;
        enrollment.cancel(now)?;
        Ok(enrollment.clone())
    }

    async fn expire_lapsed(&self, now: DateTime<Utc>) -> DomainResult<u64> {
        let mut state = self.lock()?;
        let mut expired = 0;
        for enrollment in state.enrollments.values_mut() {
            if enrollment.status == EnrollmentStatus::Active && enrollment.has_lapsed(now) {
                enrollment.status = EnrollmentStatus::Expired;
                enrollment.updated_at = now;
                expired += 1;
            }
        }
        Ok(expired)
    }
}
