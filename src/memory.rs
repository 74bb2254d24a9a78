//! In-memory repositories backing the test suite.
//!
//! Mirrors the Postgres schema closely enough to exercise the stores: unique
//! email and token constraints, active flags, expiry and record ordering.

use std::sync::Mutex;

use axum::async_trait;
use time::{Date, OffsetDateTime};

use crate::auth::repo::{SessionRepo, UserRepo};
use crate::auth::repo_types::{NewSession, NewUser, User, UserSummary};
use crate::db::Insert;
use crate::weight::repo::WeightRepo;
use crate::weight::repo_types::WeightRecord;

#[derive(Debug, Clone)]
struct SessionRow {
    user_id: i64,
    token: String,
    expires_at: OffsetDateTime,
    is_active: bool,
}

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    sessions: Vec<SessionRow>,
    weights: Vec<WeightRecord>,
    next_id: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Default)]
pub struct MemoryRepo {
    tables: Mutex<Tables>,
}

impl MemoryRepo {
    fn tables(&self) -> std::sync::MutexGuard<'_, Tables> {
        self.tables.lock().expect("memory repo poisoned")
    }

    pub fn deactivate_user(&self, user_id: i64) {
        for u in self.tables().users.iter_mut().filter(|u| u.id == user_id) {
            u.is_active = false;
        }
    }

    pub fn last_login(&self, user_id: i64) -> Option<OffsetDateTime> {
        self.tables()
            .users
            .iter()
            .find(|u| u.id == user_id)
            .and_then(|u| u.last_login)
    }

    pub fn session_count(&self) -> usize {
        self.tables().sessions.len()
    }
}

fn newest_first(records: &mut [WeightRecord]) {
    records.sort_by(|a, b| {
        b.date
            .cmp(&a.date)
            .then(b.created_at.cmp(&a.created_at))
            .then(b.id.cmp(&a.id))
    });
}

#[async_trait]
impl UserRepo for MemoryRepo {
    async fn insert_user(&self, user: NewUser) -> anyhow::Result<Insert<i64>> {
        let mut t = self.tables();
        if t.users.iter().any(|u| u.email == user.email) {
            return Ok(Insert::Conflict);
        }
        let id = t.next_id();
        t.users.push(User {
            id,
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            salt: user.salt,
            last_login: None,
            is_active: true,
        });
        Ok(Insert::Created(id))
    }

    async fn find_active_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        Ok(self
            .tables()
            .users
            .iter()
            .find(|u| u.email == email && u.is_active)
            .cloned())
    }

    async fn find_active_by_id(&self, user_id: i64) -> anyhow::Result<Option<UserSummary>> {
        Ok(self
            .tables()
            .users
            .iter()
            .find(|u| u.id == user_id && u.is_active)
            .map(User::summary))
    }

    async fn touch_last_login(&self, user_id: i64, at: OffsetDateTime) -> anyhow::Result<()> {
        for u in self.tables().users.iter_mut().filter(|u| u.id == user_id) {
            u.last_login = Some(at);
        }
        Ok(())
    }
}

#[async_trait]
impl SessionRepo for MemoryRepo {
    async fn insert_session(&self, session: NewSession) -> anyhow::Result<Insert<i64>> {
        let mut t = self.tables();
        if t.sessions.iter().any(|s| s.token == session.token) {
            return Ok(Insert::Conflict);
        }
        let id = t.next_id();
        t.sessions.push(SessionRow {
            user_id: session.user_id,
            token: session.token,
            expires_at: session.expires_at,
            is_active: true,
        });
        Ok(Insert::Created(id))
    }

    async fn find_user_by_token(
        &self,
        token: &str,
        now: OffsetDateTime,
    ) -> anyhow::Result<Option<UserSummary>> {
        let t = self.tables();
        let Some(session) = t
            .sessions
            .iter()
            .find(|s| s.token == token && s.is_active && s.expires_at > now)
        else {
            return Ok(None);
        };
        Ok(t
            .users
            .iter()
            .find(|u| u.id == session.user_id && u.is_active)
            .map(User::summary))
    }

    async fn deactivate(&self, token: &str) -> anyhow::Result<u64> {
        let mut revoked = 0;
        for s in self
            .tables()
            .sessions
            .iter_mut()
            .filter(|s| s.token == token && s.is_active)
        {
            s.is_active = false;
            revoked += 1;
        }
        Ok(revoked)
    }

    async fn purge_expired(&self, now: OffsetDateTime) -> anyhow::Result<u64> {
        let mut t = self.tables();
        let before = t.sessions.len();
        t.sessions.retain(|s| s.is_active && s.expires_at > now);
        Ok((before - t.sessions.len()) as u64)
    }
}

#[async_trait]
impl WeightRepo for MemoryRepo {
    async fn insert_record(&self, user_id: i64, weight: f64, date: Date) -> anyhow::Result<i64> {
        let mut t = self.tables();
        let id = t.next_id();
        t.weights.push(WeightRecord {
            id,
            user_id,
            weight,
            date,
            created_at: OffsetDateTime::now_utc(),
        });
        Ok(id)
    }

    async fn list_by_user(
        &self,
        user_id: i64,
        limit: i64,
        offset: i64,
    ) -> anyhow::Result<Vec<WeightRecord>> {
        let mut rows: Vec<WeightRecord> = self
            .tables()
            .weights
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        newest_first(&mut rows);
        Ok(rows
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn count_by_user(&self, user_id: i64) -> anyhow::Result<i64> {
        Ok(self
            .tables()
            .weights
            .iter()
            .filter(|r| r.user_id == user_id)
            .count() as i64)
    }

    async fn latest_by_user(&self, user_id: i64) -> anyhow::Result<Option<WeightRecord>> {
        Ok(self.list_by_user(user_id, 1, 0).await?.into_iter().next())
    }
}
