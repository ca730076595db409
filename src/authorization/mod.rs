mod extract;

use uuid::Uuid;

/// The identity on whose behalf an access-gated operation runs.
///
/// Resolved once per request and passed by value; nothing in the core
/// re-queries roles mid-operation.
#[derive(Debug, Clone, Copy)]
pub struct Actor {
    pub user_id: Uuid,
    pub role: Role,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Member,
    Manager,
    Superuser,
}

impl Role {
    pub fn resolve(is_manager: bool, is_superuser: bool) -> Role {
        if is_superuser {
            Role::Superuser
        } else if is_manager {
            Role::Manager
        } else {
            Role::Member
        }
    }
}

/// Managers and superusers may see any mailing; everyone else only their own.
pub fn can_access(actor: &Actor, owner: Option<Uuid>) -> bool {
    match actor.role {
        Role::Manager | Role::Superuser => true,
        Role::Member => owner == Some(actor.user_id),
    }
}

/// Triggering follows the same rule as viewing.
pub fn can_trigger(actor: &Actor, owner: Option<Uuid>) -> bool {
    can_access(actor, owner)
}
