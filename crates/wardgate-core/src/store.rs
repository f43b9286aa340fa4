// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! The identity store abstraction.
//!
//! The gateway treats user persistence as an external collaborator reached
//! through point lookups. Implementations must be safe to share across
//! request tasks; callers must not hold locks across store calls.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;

use crate::error::{StoreError, StoreResult};
use crate::user::{NewUser, Role, User, UserUpdate};

// =============================================================================
// UserStore
// =============================================================================

/// Lookup and lifecycle operations over user records.
///
/// Lookups return `Option` because absence is an expected outcome; mutating
/// operations return typed `StoreError`s for missing users and uniqueness
/// conflicts.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Finds a user by store id.
    async fn find_by_id(&self, id: i64) -> Option<User>;

    /// Finds a user by exact username.
    async fn find_by_username(&self, username: &str) -> Option<User>;

    /// Finds a user by exact email.
    async fn find_by_email(&self, email: &str) -> Option<User>;

    /// Finds a user by username, falling back to email.
    async fn find_by_username_or_email(&self, subject: &str) -> Option<User> {
        match self.find_by_username(subject).await {
            Some(user) => Some(user),
            None => self.find_by_email(subject).await,
        }
    }

    /// Returns `true` if a user with the given username exists.
    async fn exists_by_username(&self, username: &str) -> bool {
        self.find_by_username(username).await.is_some()
    }

    /// Returns `true` if a user with the given email exists.
    async fn exists_by_email(&self, email: &str) -> bool {
        self.find_by_email(email).await.is_some()
    }

    /// Creates a user, assigning an id and timestamps.
    async fn create(&self, new_user: NewUser) -> StoreResult<User>;

    /// Applies a partial profile update.
    async fn update(&self, id: i64, update: UserUpdate) -> StoreResult<User>;

    /// Changes a user's role.
    async fn update_role(&self, id: i64, role: Role) -> StoreResult<User>;

    /// Activates or deactivates a user.
    async fn set_active(&self, id: i64, active: bool) -> StoreResult<User>;

    /// Removes a user.
    async fn delete(&self, id: i64) -> StoreResult<()>;

    /// Lists all users.
    async fn list(&self) -> Vec<User>;

    /// Lists active users.
    async fn list_active(&self) -> Vec<User> {
        self.list().await.into_iter().filter(|u| u.is_active).collect()
    }

    /// Lists users holding the given role.
    async fn list_by_role(&self, role: Role) -> Vec<User> {
        self.list()
            .await
            .into_iter()
            .filter(|u| u.role == role)
            .collect()
    }

    /// Returns the number of stored users.
    async fn count(&self) -> usize {
        self.list().await.len()
    }
}

// =============================================================================
// MemoryUserStore
// =============================================================================

/// In-memory `UserStore` backed by a concurrent map.
///
/// The reference implementation used by the default binary and by tests.
/// Uniqueness checks for create/update run under a small internal mutex;
/// the lock is never held across an await point.
#[derive(Debug)]
pub struct MemoryUserStore {
    users: DashMap<i64, User>,
    next_id: AtomicI64,
    // Serializes uniqueness check + insert so concurrent registrations
    // cannot both claim the same username or email.
    write_guard: Mutex<()>,
}

impl Default for MemoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryUserStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            users: DashMap::new(),
            next_id: AtomicI64::new(1),
            write_guard: Mutex::new(()),
        }
    }

    /// Returns `true` if the store holds no users.
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    fn scan_username(&self, username: &str) -> Option<User> {
        self.users
            .iter()
            .find(|entry| entry.value().username == username)
            .map(|entry| entry.value().clone())
    }

    fn scan_email(&self, email: &str) -> Option<User> {
        self.users
            .iter()
            .find(|entry| entry.value().email == email)
            .map(|entry| entry.value().clone())
    }

    fn modify<F>(&self, id: i64, apply: F) -> StoreResult<User>
    where
        F: FnOnce(&mut User),
    {
        let mut entry = self
            .users
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found_id(id))?;

        apply(entry.value_mut());
        entry.value_mut().updated_at = Utc::now();
        Ok(entry.value().clone())
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_id(&self, id: i64) -> Option<User> {
        self.users.get(&id).map(|entry| entry.value().clone())
    }

    async fn find_by_username(&self, username: &str) -> Option<User> {
        self.scan_username(username)
    }

    async fn find_by_email(&self, email: &str) -> Option<User> {
        self.scan_email(email)
    }

    async fn create(&self, new_user: NewUser) -> StoreResult<User> {
        let _guard = self.write_guard.lock().unwrap_or_else(|e| e.into_inner());

        if self.scan_username(&new_user.username).is_some() {
            return Err(StoreError::DuplicateUsername(new_user.username));
        }
        if self.scan_email(&new_user.email).is_some() {
            return Err(StoreError::DuplicateEmail(new_user.email));
        }

        let now = Utc::now();
        let user = User {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            username: new_user.username,
            email: new_user.email,
            password_hash: new_user.password_hash,
            full_name: new_user.full_name,
            phone: new_user.phone,
            role: new_user.role,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        self.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, id: i64, update: UserUpdate) -> StoreResult<User> {
        let _guard = self.write_guard.lock().unwrap_or_else(|e| e.into_inner());

        if let Some(ref username) = update.username {
            if self
                .scan_username(username)
                .is_some_and(|existing| existing.id != id)
            {
                return Err(StoreError::DuplicateUsername(username.clone()));
            }
        }
        if let Some(ref email) = update.email {
            if self
                .scan_email(email)
                .is_some_and(|existing| existing.id != id)
            {
                return Err(StoreError::DuplicateEmail(email.clone()));
            }
        }

        self.modify(id, |user| {
            if let Some(username) = update.username {
                user.username = username;
            }
            if let Some(email) = update.email {
                user.email = email;
            }
            if let Some(full_name) = update.full_name {
                user.full_name = Some(full_name);
            }
            if let Some(phone) = update.phone {
                user.phone = Some(phone);
            }
        })
    }

    async fn update_role(&self, id: i64, role: Role) -> StoreResult<User> {
        self.modify(id, |user| user.role = role)
    }

    async fn set_active(&self, id: i64, active: bool) -> StoreResult<User> {
        self.modify(id, |user| user.is_active = active)
    }

    async fn delete(&self, id: i64) -> StoreResult<()> {
        self.users
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| StoreError::not_found_id(id))
    }

    async fn list(&self) -> Vec<User> {
        let mut users: Vec<User> = self
            .users
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        users.sort_by_key(|u| u.id);
        users
    }
}

// =============================================================================
// Tests
// =============================================================================
