use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use super::AuthError;
use crate::database::models::{Course, Profile};
use crate::database::ProfileStore;
use crate::types::{ApprovalStatus, Role};

/// Current permission-relevant state for an identity, built from the stored
/// profile at request time. Injected into request extensions by the auth
/// middleware.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorizedUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub approval_status: ApprovalStatus,
    pub department_id: Option<Uuid>,
}

impl From<Profile> for AuthorizedUser {
    fn from(profile: Profile) -> Self {
        Self {
            id: profile.user_id,
            email: profile.email,
            name: profile.name,
            role: profile.role,
            approval_status: profile.approval_status,
            department_id: profile.department_id,
        }
    }
}

impl AuthorizedUser {
    pub fn has_role(&self, allowed: &[Role]) -> bool {
        allowed.contains(&self.role)
    }
}

/// Resolves authority for verified identities and applies the policy checks
#[derive(Clone)]
pub struct AuthorizationGuard {
    store: Arc<dyn ProfileStore>,
    enforce_faculty_gate: bool,
}

impl AuthorizationGuard {
    pub fn new(store: Arc<dyn ProfileStore>, enforce_faculty_gate: bool) -> Self {
        Self {
            store,
            enforce_faculty_gate,
        }
    }

    pub fn store(&self) -> &Arc<dyn ProfileStore> {
        &self.store
    }

    /// Load the profile for `user_id`. A missing profile is `ProfileNotFound`,
    /// a store failure is `Store`; neither ever yields a default authority.
    pub async fn resolve_authority(&self, user_id: Uuid) -> Result<AuthorizedUser, AuthError> {
        let profile = self
            .store
            .profile_by_user_id(user_id)
            .await?
            .ok_or(AuthError::ProfileNotFound(user_id))?;

        Ok(AuthorizedUser::from(profile))
    }

    /// `resolve_authority` plus the per-request faculty gate when enabled
    pub async fn authorize(&self, user_id: Uuid) -> Result<AuthorizedUser, AuthError> {
        let user = self.resolve_authority(user_id).await?;
        if self.enforce_faculty_gate {
            check_faculty_eligibility(user.role, user.approval_status, user.department_id)?;
        }
        Ok(user)
    }
}

/// Allow only callers whose freshly resolved role is in `allowed`
pub fn require_role(user: &AuthorizedUser, allowed: &[Role]) -> Result<(), AuthError> {
    if user.has_role(allowed) {
        Ok(())
    } else {
        Err(AuthError::Forbidden(format!(
            "Role '{}' is not permitted to perform this action",
            user.role
        )))
    }
}

/// Faculty must be approved and assigned to a department. Other roles pass.
pub fn check_faculty_eligibility(
    role: Role,
    status: ApprovalStatus,
    department_id: Option<Uuid>,
) -> Result<(), AuthError> {
    if role != Role::Faculty {
        return Ok(());
    }
    if status != ApprovalStatus::Approved {
        return Err(AuthError::FacultyNotApproved);
    }
    if department_id.is_none() {
        return Err(AuthError::FacultyMissingDepartment);
    }
    Ok(())
}

/// Admin and principal manage every course; faculty only the ones they teach
pub fn ensure_course_staff(user: &AuthorizedUser, course: &Course) -> Result<(), AuthError> {
    match user.role {
        Role::Admin | Role::Principal => Ok(()),
        Role::Faculty if course.faculty_id == Some(user.id) => Ok(()),
        _ => Err(AuthError::Forbidden(format!(
            "Not assigned to course {}",
            course.code
        ))),
    }
}

/// Faculty act only inside their own department
pub fn ensure_same_department(user: &AuthorizedUser, department_id: Uuid) -> Result<(), AuthError> {
    match user.role {
        Role::Faculty if user.department_id != Some(department_id) => Err(AuthError::Forbidden(
            "Department is outside your assignment".to_string(),
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::token::TokenService;
    use crate::testing::MemoryProfileStore;
    use chrono::{Duration, Utc};

    fn profile(role: Role, status: ApprovalStatus, department_id: Option<Uuid>) -> Profile {
        Profile {
            user_id: Uuid::new_v4(),
            email: format!("{}@campus.edu", role),
            name: format!("{} user", role),
            role,
            approval_status: status,
            department_id,
        }
    }

    fn course(faculty_id: Option<Uuid>) -> Course {
        Course {
            id: Uuid::new_v4(),
            code: "CS101".to_string(),
            title: "Intro".to_string(),
            department_id: Uuid::new_v4(),
            faculty_id,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn identity_without_profile_is_not_found() {
        let store = MemoryProfileStore::default();
        let guard = AuthorizationGuard::new(Arc::new(store), true);
        let id = Uuid::new_v4();

        let err = guard.resolve_authority(id).await.unwrap_err();
        assert!(matches!(err, AuthError::ProfileNotFound(missing) if missing == id));
    }

    #[tokio::test]
    async fn orphaned_identity_is_not_found() {
        let store = MemoryProfileStore::default();
        let id = store.insert_orphan("ghost@campus.edu", "pw").await;
        let guard = AuthorizationGuard::new(Arc::new(store), true);

        assert!(matches!(
            guard.resolve_authority(id).await,
            Err(AuthError::ProfileNotFound(_))
        ));
    }

    #[tokio::test]
    async fn require_role_uses_current_profile_not_token_role() {
        let store = Arc::new(MemoryProfileStore::default());
        let admin = profile(Role::Admin, ApprovalStatus::Approved, None);
        let id = admin.user_id;
        store.insert(admin, "pw").await;

        // Token minted while the user was an admin
        let tokens = TokenService::new("test-secret-key-that-is-at-least-32-chars", "campus", Duration::hours(1)).unwrap();
        let stale = tokens.issue(id, "admin@campus.edu", Role::Admin).unwrap();

        // Role downgraded afterwards
        store.set_role(id, Role::Student).await;

        let guard = AuthorizationGuard::new(store.clone(), true);
        let claims = tokens.verify(&stale.token).unwrap();
        assert_eq!(claims.role, Role::Admin);

        let user = guard.resolve_authority(claims.sub).await.unwrap();
        assert_eq!(user.role, Role::Student);
        assert!(matches!(require_role(&user, &[Role::Admin]), Err(AuthError::Forbidden(_))));
    }

    #[tokio::test]
    async fn per_request_gate_blocks_unapproved_faculty() {
        let store = Arc::new(MemoryProfileStore::default());
        let pending = profile(Role::Faculty, ApprovalStatus::Pending, None);
        let id = pending.user_id;
        store.insert(pending, "pw").await;

        let gated = AuthorizationGuard::new(store.clone(), true);
        assert!(matches!(gated.authorize(id).await, Err(AuthError::FacultyNotApproved)));

        let ungated = AuthorizationGuard::new(store, false);
        assert_eq!(ungated.authorize(id).await.unwrap().role, Role::Faculty);
    }

    #[test]
    fn faculty_eligibility() {
        let dept = Some(Uuid::new_v4());
        assert!(check_faculty_eligibility(Role::Faculty, ApprovalStatus::Approved, dept).is_ok());
        assert!(matches!(
            check_faculty_eligibility(Role::Faculty, ApprovalStatus::Pending, dept),
            Err(AuthError::FacultyNotApproved)
        ));
        assert!(matches!(
            check_faculty_eligibility(Role::Faculty, ApprovalStatus::Rejected, dept),
            Err(AuthError::FacultyNotApproved)
        ));
        assert!(matches!(
            check_faculty_eligibility(Role::Faculty, ApprovalStatus::Approved, None),
            Err(AuthError::FacultyMissingDepartment)
        ));
        assert!(check_faculty_eligibility(Role::Student, ApprovalStatus::Pending, None).is_ok());
    }

    #[test]
    fn course_staff() {
        let lecturer = AuthorizedUser::from(profile(Role::Faculty, ApprovalStatus::Approved, Some(Uuid::new_v4())));
        let other = AuthorizedUser::from(profile(Role::Faculty, ApprovalStatus::Approved, Some(Uuid::new_v4())));
        let principal = AuthorizedUser::from(profile(Role::Principal, ApprovalStatus::Approved, None));
        let student = AuthorizedUser::from(profile(Role::Student, ApprovalStatus::Approved, None));
        let owned = course(Some(lecturer.id));

        assert!(ensure_course_staff(&lecturer, &owned).is_ok());
        assert!(ensure_course_staff(&principal, &owned).is_ok());
        assert!(ensure_course_staff(&other, &owned).is_err());
        assert!(ensure_course_staff(&student, &owned).is_err());
        assert!(ensure_course_staff(&lecturer, &course(None)).is_err());
    }

    #[test]
    fn department_scope() {
        let dept = Uuid::new_v4();
        let faculty = AuthorizedUser::from(profile(Role::Faculty, ApprovalStatus::Approved, Some(dept)));
        let admin = AuthorizedUser::from(profile(Role::Admin, ApprovalStatus::Approved, None));

        assert!(ensure_same_department(&faculty, dept).is_ok());
        assert!(ensure_same_department(&faculty, Uuid::new_v4()).is_err());
        assert!(ensure_same_department(&admin, Uuid::new_v4()).is_ok());
    }
}
