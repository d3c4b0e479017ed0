// src/application/authorization.rs
use crate::application::{
    dto::AuthenticatedUser,
    error::{ApplicationError, ApplicationResult},
};
use crate::domain::user::Role;

pub(crate) fn ensure_can_manage_codes(actor: &AuthenticatedUser) -> ApplicationResult<()> {
    match actor.role {
        Role::Admin | Role::Instructor => Ok(()),
        Role::Student => Err(ApplicationError::forbidden(
            "managing activation codes requires instructor or admin role",
        )),
    }
}

pub(crate) fn ensure_can_manage_enrollments(actor: &AuthenticatedUser) -> ApplicationResult<()> {
    match actor.role {
        Role::Admin => Ok(()),
        Role::Instructor | Role::Student => Err(ApplicationError::forbidden(
            "managing enrollments requires admin role",
        )),
    }
}
