//! Role gates and row visibility.
//!
//! Every decision here is an exhaustive match on [`Role`], so adding a role is a
//! compile error until each gate says what the new role may do.

use fses_core::AppError;
use fses_models::ids::LecturerId;
use fses_models::users::Role;

use crate::middleware::auth::Caller;

/// A write operation guarded by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Create, update or delete departments, lecturers and students.
    ManageRecords,
    /// Create or update a nomination.
    EditNomination,
    DeleteNomination,
    /// Set or clear `is_locked` on a nomination.
    LockNomination,
}

impl Action {
    pub fn permits(self, role: Role) -> bool {
        match role {
            Role::OfficeAssistant => matches!(self, Action::ManageRecords),
            Role::Supervisor => matches!(self, Action::EditNomination),
            Role::ProgramCoordinator => matches!(
                self,
                Action::EditNomination | Action::DeleteNomination | Action::LockNomination
            ),
            Role::Pgam => true,
        }
    }

    fn denial(self) -> &'static str {
        match self {
            Action::ManageRecords => "Your role cannot modify departments, lecturers or students",
            Action::EditNomination => "Your role cannot create or edit nominations",
            Action::DeleteNomination => "Your role cannot delete nominations",
            Action::LockNomination => "Your role cannot lock or unlock nominations",
        }
    }
}

/// Which nominations a caller may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NominationScope {
    All,
    /// Only nominations whose student is supervised by this lecturer.
    SupervisedBy(LecturerId),
}

impl Caller {
    /// Fails with 403 when the caller's role may not perform `action`.
    /// Anonymous callers only exist when anonymous access is enabled and pass.
    pub fn authorize(&self, action: Action) -> Result<(), AppError> {
        match self {
            Caller::Anonymous => Ok(()),
            Caller::Authenticated(identity) if action.permits(identity.role) => Ok(()),
            Caller::Authenticated(_) => Err(AppError::forbidden(action.denial())),
        }
    }

    pub fn nomination_scope(&self) -> NominationScope {
        let Caller::Authenticated(identity) = self else {
            return NominationScope::All;
        };

        match identity.role {
            // An account with no lecturer record has nothing to narrow by.
            Role::Supervisor => identity
                .lecturer_id
                .map_or(NominationScope::All, NominationScope::SupervisedBy),
            Role::OfficeAssistant | Role::ProgramCoordinator | Role::Pgam => NominationScope::All,
        }
    }
}

impl NominationScope {
    /// Value for the `$n IS NULL OR s.supervisor_id = $n` filter used by the
    /// nomination queries.
    pub fn supervisor_filter(self) -> Option<LecturerId> {
        match self {
            NominationScope::All => None,
            NominationScope::SupervisedBy(id) => Some(id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::auth::Identity;
    use axum::http::StatusCode;
    use fses_models::ids::UserId;
    use uuid::Uuid;

    fn caller(role: Role, lecturer_id: Option<LecturerId>) -> Caller {
        Caller::Authenticated(Identity {
            user_id: UserId(1),
            username: "someone".to_string(),
            role,
            lecturer_id,
            session_id: Uuid::nil(),
        })
    }

    #[test]
    fn test_record_management_gate() {
        assert!(Action::ManageRecords.permits(Role::OfficeAssistant));
        assert!(Action::ManageRecords.permits(Role::Pgam));
        assert!(!Action::ManageRecords.permits(Role::Supervisor));
        assert!(!Action::ManageRecords.permits(Role::ProgramCoordinator));
    }

    #[test]
    fn test_nomination_gates() {
        for role in [Role::Supervisor, Role::ProgramCoordinator, Role::Pgam] {
            assert!(Action::EditNomination.permits(role), "{role} should edit");
        }
        assert!(!Action::EditNomination.permits(Role::OfficeAssistant));

        assert!(Action::DeleteNomination.permits(Role::ProgramCoordinator));
        assert!(!Action::DeleteNomination.permits(Role::Supervisor));

        assert!(Action::LockNomination.permits(Role::Pgam));
        assert!(!Action::LockNomination.permits(Role::Supervisor));
        assert!(!Action::LockNomination.permits(Role::OfficeAssistant));
    }

    #[test]
    fn test_authorize_maps_to_forbidden() {
        let err = caller(Role::Supervisor, None)
            .authorize(Action::ManageRecords)
            .unwrap_err();
        assert_eq!(err.status, StatusCode::FORBIDDEN);

        assert!(Caller::Anonymous.authorize(Action::DeleteNomination).is_ok());
        assert!(caller(Role::Pgam, None).authorize(Action::LockNomination).is_ok());
    }

    #[test]
    fn test_supervisor_scope_narrows_to_own_students() {
        let scope = caller(Role::Supervisor, Some(LecturerId(3))).nomination_scope();
        assert_eq!(scope, NominationScope::SupervisedBy(LecturerId(3)));
        assert_eq!(scope.supervisor_filter(), Some(LecturerId(3)));
    }

    #[test]
    fn test_unlinked_supervisor_sees_all() {
        let scope = caller(Role::Supervisor, None).nomination_scope();
        assert_eq!(scope, NominationScope::All);
    }

    #[test]
    fn test_other_roles_and_anonymous_see_all() {
        for role in [Role::OfficeAssistant, Role::ProgramCoordinator, Role::Pgam] {
            // A lecturer link on a non-supervisor account does not narrow anything.
            assert_eq!(
                caller(role, Some(LecturerId(9))).nomination_scope(),
                NominationScope::All
            );
        }
        assert_eq!(Caller::Anonymous.nomination_scope(), NominationScope::All);
        assert_eq!(NominationScope::All.supervisor_filter(), None);
    }
}
