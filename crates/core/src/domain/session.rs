use serde::{Deserialize, Serialize};

use crate::domain::entity::OrgId;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Supervisor,
    Dispatcher,
    Accountant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Supervisor => "supervisor",
            Role::Dispatcher => "dispatcher",
            Role::Accountant => "accountant",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "supervisor" => Ok(Role::Supervisor),
            "dispatcher" => Ok(Role::Dispatcher),
            "accountant" => Ok(Role::Accountant),
            other => Err(format!("unknown role `{other}`")),
        }
    }
}

/// Caller identity threaded explicitly into every workflow operation.
/// There is no ambient session lookup; whoever invokes the manager must
/// say who is acting and on behalf of which organization.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: UserId,
    pub org_id: OrgId,
    pub role: Role,
}

impl Session {
    pub fn new(user_id: impl Into<String>, org_id: impl Into<String>, role: Role) -> Self {
        Self { user_id: UserId(user_id.into()), org_id: OrgId(org_id.into()), role }
    }

    /// Only admins and supervisors review edit requests.
    pub fn can_review(&self) -> bool {
        matches!(self.role, Role::Admin | Role::Supervisor)
    }
}

#[cfg(test)]
mod tests {
    use super::{Role, Session};

    #[test]
    fn admins_and_supervisors_can_review() {
        assert!(Session::new("u-1", "org-1", Role::Admin).can_review());
        assert!(Session::new("u-2", "org-1", Role::Supervisor).can_review());
        assert!(!Session::new("u-3", "org-1", Role::Dispatcher).can_review());
        assert!(!Session::new("u-4", "org-1", Role::Accountant).can_review());
    }

    #[test]
    fn role_round_trips_through_from_str() {
        for role in [Role::Admin, Role::Supervisor, Role::Dispatcher, Role::Accountant] {
            assert_eq!(role.as_str().parse::<Role>(), Ok(role));
        }
    }
}
