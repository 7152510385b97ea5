use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What the session layer knows about the caller before the store is consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSubject {
    pub user_id: Uuid,
    pub is_staff: bool,
}

/// The caller with its roles resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActingIdentity {
    pub user_id: Uuid,
    pub is_admin: bool,
    pub teacher_id: Option<Uuid>,
}

impl ActingIdentity {
    pub fn is_admin(&self) -> bool {
        self.is_admin
    }

    pub fn is_teacher(&self) -> bool {
        self.teacher_id.is_some()
    }

    /// True when the caller is one of the teachers assigned to the group.
    pub fn is_teacher_of(&self, group_teacher_ids: &[Uuid]) -> bool {
        self.teacher_id
            .is_some_and(|teacher_id| group_teacher_ids.contains(&teacher_id))
    }

    /// Admins and teachers run the front desk; anybody else is read-only.
    pub fn is_studio_staff(&self) -> bool {
        self.is_admin || self.is_teacher()
    }
}

/// Attendance for a group may be viewed and recorded by admins and by that group's teachers.
pub fn can_manage_group(identity: &ActingIdentity, group_teacher_ids: &[Uuid]) -> bool {
    identity.is_admin() || identity.is_teacher_of(group_teacher_ids)
}
