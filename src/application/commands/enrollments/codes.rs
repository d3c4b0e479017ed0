use super::EnrollmentCommandService;
use crate::{
    application::{
        authorization::ensure_can_manage_codes,
        dto::{ActivationCodeDto, AuthenticatedUser},
        error::{ApplicationError, ApplicationResult},
    },
    domain::{
        activation::{ActivationCode, ActivationCodeId, NewActivationCode},
        course::CourseId,
        errors::DomainError,
    },
};
use chrono::{DateTime, Utc};
use uuid::Uuid;

const MAX_CODE_ALLOCATION_ATTEMPTS: usize = 5;
const MAX_NOTE_LENGTH: usize = 500;

pub struct CreateActivationCodeCommand {
    pub course_id: Uuid,
    pub max_uses: Option<u32>,
    pub expires_at: Option<DateTime<Utc>>,
    pub note: Option<String>,
}

pub struct SetActivationCodeActiveCommand {
    pub code_id: Uuid,
    pub is_active: bool,
}

impl EnrollmentCommandService {
    pub async fn create_activation_code(
        &self,
        actor: &AuthenticatedUser,
        command: CreateActivationCodeCommand,
    ) -> ApplicationResult<ActivationCodeDto> {
        ensure_can_manage_codes(actor)?;

        let now = self.clock.now();
        if command.max_uses == Some(0) {
            return Err(ApplicationError::validation("max_uses must be at least 1"));
        }
        if command.expires_at.is_some_and(|expires_at| expires_at <= now) {
            return Err(ApplicationError::validation("expires_at must be in the future"));
        }
        let note = normalize_note(command.note)?;

        let course_id = CourseId(command.course_id);
        if self.courses.find_by_id(course_id).await?.is_none() {
            return Err(ApplicationError::not_found("course not found"));
        }

        let template = NewActivationCode {
            code: self.code_generator.generate(),
            course_id,
            max_uses: command.max_uses,
            expires_at: command.expires_at,
            created_by: actor.id,
            note,
            created_at: now,
        };
        let code = self.insert_with_unique_code(template).await?;
        tracing::info!(
            actor_id = %actor.id,
            code_id = %code.id,
            course_id = %code.course_id,
            "activation code created"
        );

        Ok(ActivationCodeDto::from_code(code, now))
    }

    pub async fn set_activation_code_active(
        &self,
        actor: &AuthenticatedUser,
        command: SetActivationCodeActiveCommand,
    ) -> ApplicationResult<ActivationCodeDto> {
        ensure_can_manage_codes(actor)?;

        let now = self.clock.now();
        let code = self
            .codes
            .set_active(ActivationCodeId(command.code_id), command.is_active, now)
            .await?;
        tracing::info!(
            actor_id = %actor.id,
            code_id = %code.id,
            is_active = code.is_active,
            "activation code toggled"
        );

        Ok(ActivationCodeDto::from_code(code, now))
    }

    async fn insert_with_unique_code(
        &self,
        mut template: NewActivationCode,
    ) -> ApplicationResult<ActivationCode> {
        for attempt in 1..=MAX_CODE_ALLOCATION_ATTEMPTS {
            match self.codes.insert(template.clone()).await {
                Ok(code) => return Ok(code),
                Err(DomainError::Conflict(_)) => {
                    tracing::debug!(attempt, "generated activation code collided, regenerating");
                    template.code = self.code_generator.generate();
                }
                Err(err) => return Err(err.into()),
            }
        }

        Err(ApplicationError::infrastructure(
            "could not allocate a unique activation code",
        ))
    }
}

fn normalize_note(note: Option<String>) -> ApplicationResult<Option<String>> {
    let Some(note) = note else {
        return Ok(None);
    };
    let trimmed = note.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if trimmed.chars().count() > MAX_NOTE_LENGTH {
        return Err(ApplicationError::validation(format!(
            "note must be at most {MAX_NOTE_LENGTH} characters"
        )));
    }
    Ok(Some(trimmed.to_string()))
}
