//! # User Administration
//!
//! Users are stored under `all-users-data` in creation order. The lifecycle
//! uses a single `status` field (`active`, `inactive`, `deleted`); email is
//! unique, compared case-insensitively.

use crate::error::{KontorError, Result};
use crate::record::{InsertOrder, Patch, Record, SoftDelete, UniqueKey};
use crate::store::{stats, Collection, StorageBackend};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

pub const USERS_KEY: &str = "all-users-data";

const USERS: Collection<User> = Collection::new(USERS_KEY, InsertOrder::Append);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Inactive,
    Deleted,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Active => "active",
            UserStatus::Inactive => "inactive",
            UserStatus::Deleted => "deleted",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub role: String,
    pub status: UserStatus,
    pub department: String,
    pub position: String,
    pub join_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login: Option<DateTime<Utc>>,
    pub permissions: Vec<String>,
    pub is_email_verified: bool,
    pub is_phone_verified: bool,
    pub two_factor_enabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p == permission)
    }
}

#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub role: String,
    pub department: String,
    pub position: String,
    pub permissions: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: Option<String>,
    pub department: Option<String>,
    pub position: Option<String>,
    pub permissions: Option<Vec<String>>,
    pub is_email_verified: Option<bool>,
    pub is_phone_verified: Option<bool>,
    pub two_factor_enabled: Option<bool>,
    pub last_login: Option<DateTime<Utc>>,
}

impl Patch<User> for UserPatch {
    fn apply(self, target: &mut User) {
        if let Some(v) = self.first_name {
            target.first_name = v;
        }
        if let Some(v) = self.last_name {
            target.last_name = v;
        }
        if let Some(v) = self.email {
            target.email = v;
        }
        if let Some(v) = self.phone {
            target.phone = v;
        }
        if let Some(v) = self.role {
            target.role = v;
        }
        if let Some(v) = self.department {
            target.department = v;
        }
        if let Some(v) = self.position {
            target.position = v;
        }
        if let Some(v) = self.permissions {
            target.permissions = v;
        }
        if let Some(v) = self.is_email_verified {
            target.is_email_verified = v;
        }
        if let Some(v) = self.is_phone_verified {
            target.is_phone_verified = v;
        }
        if let Some(v) = self.two_factor_enabled {
            target.two_factor_enabled = v;
        }
        if let Some(v) = self.last_login {
            target.last_login = Some(v);
        }
    }
}

impl Record for User {
    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn stamp_created(&mut self, at: DateTime<Utc>) {
        self.created_at = at;
        self.updated_at = at;
    }

    fn stamp_updated(&mut self, at: DateTime<Utc>) {
        self.updated_at = at;
    }

    fn unique_keys(&self) -> Vec<UniqueKey> {
        vec![UniqueKey::folded("email", &self.email)]
    }

    fn search_text(&self) -> Vec<String> {
        vec![
            self.first_name.clone(),
            self.last_name.clone(),
            self.email.clone(),
            self.phone.clone(),
            self.department.clone(),
            self.position.clone(),
        ]
    }
}

impl SoftDelete for User {
    fn is_deleted(&self) -> bool {
        self.status == UserStatus::Deleted
    }

    fn mark_deleted(&mut self, at: DateTime<Utc>) {
        self.status = UserStatus::Deleted;
        self.deleted_at = Some(at);
    }

    fn mark_restored(&mut self) {
        self.status = UserStatus::Active;
        self.deleted_at = None;
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UserStats {
    pub total: usize,
    pub by_status: BTreeMap<String, usize>,
    pub by_role: BTreeMap<String, usize>,
    pub by_department: BTreeMap<String, usize>,
}

pub struct UsersService<'a, B> {
    backend: &'a B,
}

impl<'a, B: StorageBackend> UsersService<'a, B> {
    pub fn new(backend: &'a B) -> Self {
        Self { backend }
    }

    pub fn initialize(&self, seed: &[User]) -> Result<()> {
        USERS.initialize(self.backend, seed)
    }

    pub fn create(&self, input: NewUser) -> Result<User> {
        if input.email.trim().is_empty() {
            return Err(KontorError::Validation("email must not be empty".into()));
        }
        if input.first_name.trim().is_empty() {
            return Err(KontorError::Validation(
                "first name must not be empty".into(),
            ));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4().to_string(),
            first_name: input.first_name,
            last_name: input.last_name,
            email: input.email,
            phone: input.phone,
            role: input.role,
            status: UserStatus::Active,
            department: input.department,
            position: input.position,
            join_date: now,
            last_login: None,
            permissions: input.permissions,
            is_email_verified: false,
            is_phone_verified: false,
            two_factor_enabled: false,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        USERS.create(self.backend, user)
    }

    pub fn get(&self, id: &str) -> Result<User> {
        USERS.get(self.backend, id)
    }

    pub fn update(&self, id: &str, patch: UserPatch) -> Result<User> {
        USERS.update(self.backend, id, patch)
    }

    pub fn delete(&self, id: &str) -> Result<User> {
        USERS.soft_delete(self.backend, id)
    }

    pub fn restore(&self, id: &str) -> Result<User> {
        USERS.restore(self.backend, id)
    }

    pub fn purge(&self, id: &str) -> Result<bool> {
        USERS.permanent_delete(self.backend, id)
    }

    /// Flip active ⇄ inactive. Deleted users are restored, not toggled.
    pub fn toggle_active(&self, id: &str) -> Result<User> {
        let current = USERS.get(self.backend, id)?;
        if current.status == UserStatus::Deleted {
            return Err(KontorError::Validation("cannot toggle a deleted user".into()));
        }
        USERS.modify(self.backend, id, |u| {
            u.status = match u.status {
                UserStatus::Active => UserStatus::Inactive,
                _ => UserStatus::Active,
            };
        })
    }

    pub fn grant_permission(&self, id: &str, permission: &str) -> Result<User> {
        let permission = permission.to_string();
        USERS.modify(self.backend, id, move |u| {
            if !u.permissions.contains(&permission) {
                u.permissions.push(permission);
            }
        })
    }

    pub fn revoke_permission(&self, id: &str, permission: &str) -> Result<User> {
        USERS.modify(self.backend, id, |u| {
            u.permissions.retain(|p| p != permission);
        })
    }

    pub fn record_login(&self, id: &str, at: DateTime<Utc>) -> Result<User> {
        USERS.modify(self.backend, id, move |u| u.last_login = Some(at))
    }

    pub fn list(&self) -> Vec<User> {
        USERS.load_all(self.backend)
    }

    pub fn list_by_status(&self, status: UserStatus) -> Vec<User> {
        USERS
            .load_all(self.backend)
            .into_iter()
            .filter(|u| u.status == status)
            .collect()
    }

    pub fn search(&self, query: &str) -> Vec<User> {
        USERS.search(self.backend, query)
    }

    pub fn stats(&self) -> UserStats {
        let users = USERS.load_all(self.backend);
        UserStats {
            total: users.len(),
            by_status: stats::count_by(&users, |u| u.status.as_str().to_string()),
            by_role: stats::count_by(&users, |u| u.role.clone()),
            by_department: stats::count_by(&users, |u| u.department.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::mem_backend::MemBackend;

    fn jane() -> NewUser {
        NewUser {
            first_name: "Jane".into(),
            last_name: "Doe".into(),
            email: "jane@example.com".into(),
            role: "admin".into(),
            department: "ops".into(),
            ..Default::default()
        }
    }

    #[test]
    fn create_rejects_duplicate_email_case_insensitively() {
        let backend = MemBackend::new();
        let service = UsersService::new(&backend);
        service.create(jane()).unwrap();

        let err = service
            .create(NewUser {
                first_name: "Janet".into(),
                email: "JANE@example.com".into(),
                ..jane()
            })
            .unwrap_err();
        assert!(matches!(
            err,
            KontorError::DuplicateKey { field: "email", .. }
        ));
    }

    #[test]
    fn update_own_email_unchanged_succeeds() {
        let backend = MemBackend::new();
        let service = UsersService::new(&backend);
        let user = service.create(jane()).unwrap();

        let updated = service
            .update(
                &user.id,
                UserPatch {
                    email: Some("jane@example.com".into()),
                    phone: Some("555-0100".into()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.phone, "555-0100");
    }

    #[test]
    fn toggle_cycles_active_and_inactive() {
        let backend = MemBackend::new();
        let service = UsersService::new(&backend);
        let user = service.create(jane()).unwrap();
        assert_eq!(user.status, UserStatus::Active);

        let toggled = service.toggle_active(&user.id).unwrap();
        assert_eq!(toggled.status, UserStatus::Inactive);

        let back = service.toggle_active(&user.id).unwrap();
        assert_eq!(back.status, UserStatus::Active);
    }

    #[test]
    fn delete_then_restore_returns_to_active() {
        let backend = MemBackend::new();
        let service = UsersService::new(&backend);
        let user = service.create(jane()).unwrap();
        service.toggle_active(&user.id).unwrap();

        let deleted = service.delete(&user.id).unwrap();
        assert_eq!(deleted.status, UserStatus::Deleted);
        assert!(deleted.deleted_at.is_some());

        let restored = service.restore(&user.id).unwrap();
        assert_eq!(restored.status, UserStatus::Active);
        assert!(restored.deleted_at.is_none());
    }

    #[test]
    fn permissions_grant_and_revoke() {
        let backend = MemBackend::new();
        let service = UsersService::new(&backend);
        let user = service.create(jane()).unwrap();

        let granted = service.grant_permission(&user.id, "catalog:write").unwrap();
        assert!(granted.has_permission("catalog:write"));

        // Granting twice does not duplicate
        let again = service.grant_permission(&user.id, "catalog:write").unwrap();
        assert_eq!(again.permissions.len(), 1);

        let revoked = service
            .revoke_permission(&user.id, "catalog:write")
            .unwrap();
        assert!(!revoked.has_permission("catalog:write"));
    }

    #[test]
    fn record_login_stamps_last_login() {
        let backend = MemBackend::new();
        let service = UsersService::new(&backend);
        let user = service.create(jane()).unwrap();
        assert!(user.last_login.is_none());

        let at = Utc::now();
        let after = service.record_login(&user.id, at).unwrap();
        assert_eq!(after.last_login, Some(at));
    }

    #[test]
    fn search_matches_name_and_department() {
        let backend = MemBackend::new();
        let service = UsersService::new(&backend);
        service.create(jane()).unwrap();
        service
            .create(NewUser {
                first_name: "Bob".into(),
                email: "bob@example.com".into(),
                department: "warehouse".into(),
                ..jane()
            })
            .unwrap();

        assert_eq!(service.search("jane").len(), 1);
        assert_eq!(service.search("warehouse").len(), 1);
        assert_eq!(service.search("").len(), 2);
    }

    #[test]
    fn stats_per_status_sum_to_total() {
        let backend = MemBackend::new();
        let service = UsersService::new(&backend);
        let a = service.create(jane()).unwrap();
        service
            .create(NewUser {
                email: "b@example.com".into(),
                ..jane()
            })
            .unwrap();
        service.delete(&a.id).unwrap();

        let stats = service.stats();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.by_status.values().sum::<usize>(), stats.total);
        assert_eq!(stats.by_status["deleted"], 1);
        assert_eq!(stats.by_status["active"], 1);
    }

    #[test]
    fn status_serializes_lowercase() {
        let backend = MemBackend::new();
        let service = UsersService::new(&backend);
        service.create(jane()).unwrap();

        let raw = backend.read(USERS_KEY).unwrap().unwrap();
        assert!(raw.contains("\"status\": \"active\""));
        assert!(raw.contains("\"firstName\""));
        assert!(raw.contains("\"isEmailVerified\""));
    }
}
