use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

use jiff::Timestamp;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{NewUserRecord, StoreError, UserRecord, UserStore};
use crate::utility::tracing_targets::USER_STORE as TRACING_TARGET;

/// Process-local [`UserStore`].
///
/// The email index and the user table live behind the same lock, so the
/// uniqueness check and the insert form one critical section.
#[derive(Debug, Clone, Default)]
pub struct MemoryUserStore {
    inner: Arc<RwLock<MemoryTables>>,
}

#[derive(Debug, Default)]
struct MemoryTables {
    users: HashMap<Uuid, UserRecord>,
    by_email: HashMap<String, Uuid>,
}

impl MemoryUserStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl UserStore for MemoryUserStore {
    async fn create(&self, user: NewUserRecord) -> Result<UserRecord, StoreError> {
        let email_address = user.email_address.trim().to_owned();
        let mut tables = self.inner.write().await;

        let slot = match tables.by_email.entry(email_address.clone()) {
            Entry::Occupied(_) => {
                return Err(StoreError::DuplicateKey {
                    email: email_address,
                });
            }
            Entry::Vacant(slot) => slot,
        };
        slot.insert(user.id);

        let record = UserRecord {
            id: user.id,
            email_address,
            display_name: user.display_name.trim().to_owned(),
            password_hash: user.password_hash,
            is_active: true,
            roles: user.roles,
            created_at: Timestamp::now(),
        };
        tables.users.insert(record.id, record.clone());

        tracing::debug!(
            target: TRACING_TARGET,
            backend = "memory",
            user_id = %record.id,
            "user inserted"
        );

        Ok(record)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        let tables = self.inner.read().await;
        let user = tables
            .by_email
            .get(email.trim())
            .and_then(|id| tables.users.get(id))
            .cloned();
        Ok(user)
    }

    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<UserRecord>, StoreError> {
        let tables = self.inner.read().await;
        Ok(tables.users.get(&user_id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<UserRecord>, StoreError> {
        let tables = self.inner.read().await;
        let mut users: Vec<_> = tables.users.values().cloned().collect();
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(email: &str) -> NewUserRecord {
        NewUserRecord {
            id: Uuid::now_v7(),
            email_address: email.to_owned(),
            display_name: "Test User".to_owned(),
            password_hash: "$argon2id$stub".to_owned(),
            roles: vec!["user".to_owned()],
        }
    }

    #[tokio::test]
    async fn create_then_find() -> anyhow::Result<()> {
        let store = MemoryUserStore::new();
        let created = store.create(new_user("a@x.com")).await?;

        assert!(created.is_active);
        assert_eq!(store.find_by_id(created.id).await?, Some(created.clone()));
        assert_eq!(store.find_by_email("a@x.com").await?, Some(created));
        assert_eq!(store.find_by_email("A@x.com").await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() -> anyhow::Result<()> {
        let store = MemoryUserStore::new();
        store.create(new_user("a@x.com")).await?;

        let result = store.create(new_user(" a@x.com ")).await;
        assert!(matches!(
            result,
            Err(StoreError::DuplicateKey { ref email }) if email == "a@x.com"
        ));
        assert_eq!(store.list_all().await?.len(), 1);
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_creates_admit_one() -> anyhow::Result<()> {
        let store = MemoryUserStore::new();

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.create(new_user("race@x.com")).await })
            })
            .collect();

        let mut created = 0;
        let mut duplicates = 0;
        for handle in handles {
            match handle.await? {
                Ok(_) => created += 1,
                Err(StoreError::DuplicateKey { .. }) => duplicates += 1,
                Err(e) => return Err(e.into()),
            }
        }

        assert_eq!(created, 1);
        assert_eq!(duplicates, 15);
        assert_eq!(store.list_all().await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn list_all_is_oldest_first() -> anyhow::Result<()> {
        let store = MemoryUserStore::new();
        let first = store.create(new_user("first@x.com")).await?;
        let second = store.create(new_user("second@x.com")).await?;

        let ids: Vec<_> = store.list_all().await?.into_iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![first.id, second.id]);
        Ok(())
    }
}
