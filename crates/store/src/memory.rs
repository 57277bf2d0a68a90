use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use chrono::Utc;

use crate::error::StoreError;
use crate::types::{Community, NewCommunity, NewTherapist, NewUser, Therapist, User};
use crate::{RecordId, Storage};

/// One id-keyed table with its own counter.
struct Table<T> {
    name: &'static str,
    rows: RwLock<BTreeMap<RecordId, T>>,
    next_id: AtomicU64,
}

impl<T: Clone> Table<T> {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            rows: RwLock::new(BTreeMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    fn get(&self, id: RecordId) -> Result<Option<T>, StoreError> {
        let guard = self
            .rows
            .read()
            .map_err(|_| StoreError::Poisoned(self.name))?;
        Ok(guard.get(&id).cloned())
    }

    fn all(&self) -> Result<Vec<T>, StoreError> {
        let guard = self
            .rows
            .read()
            .map_err(|_| StoreError::Poisoned(self.name))?;
        Ok(guard.values().cloned().collect())
    }

    fn find(&self, pred: impl Fn(&T) -> bool) -> Result<Option<T>, StoreError> {
        let guard = self
            .rows
            .read()
            .map_err(|_| StoreError::Poisoned(self.name))?;
        Ok(guard.values().find(|row| pred(row)).cloned())
    }

    /// Allocates an id and inserts the row built from it. The write lock is
    /// held across both steps so ids and map order agree.
    fn insert(&self, build: impl FnOnce(RecordId) -> T) -> Result<T, StoreError> {
        let mut guard = self
            .rows
            .write()
            .map_err(|_| StoreError::Poisoned(self.name))?;
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let row = build(id);
        guard.insert(id, row.clone());
        Ok(row)
    }

    fn len(&self) -> Result<usize, StoreError> {
        let guard = self
            .rows
            .read()
            .map_err(|_| StoreError::Poisoned(self.name))?;
        Ok(guard.len())
    }
}

/// Process-local [`Storage`] backend. Cheap to share behind an `Arc`.
pub struct MemStorage {
    users: Table<User>,
    therapists: Table<Therapist>,
    communities: Table<Community>,
}

impl MemStorage {
    /// Empty storage; see [`MemStorage::seeded`] for the demo directory.
    pub fn new() -> Self {
        Self {
            users: Table::new("users"),
            therapists: Table::new("therapists"),
            communities: Table::new("communities"),
        }
    }

    pub fn therapist_count(&self) -> Result<usize, StoreError> {
        self.therapists.len()
    }

    pub fn user_count(&self) -> Result<usize, StoreError> {
        self.users.len()
    }

    pub fn community_count(&self) -> Result<usize, StoreError> {
        self.communities.len()
    }
}

impl Default for MemStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl Storage for MemStorage {
    fn get_therapist(&self, id: RecordId) -> Result<Option<Therapist>, StoreError> {
        self.therapists.get(id)
    }

    fn all_therapists(&self) -> Result<Vec<Therapist>, StoreError> {
        self.therapists.all()
    }

    fn create_therapist(&self, therapist: NewTherapist) -> Result<Therapist, StoreError> {
        let now = Utc::now();
        self.therapists.insert(|id| therapist.into_record(id, now))
    }

    fn therapist_embeddings(&self) -> Result<Vec<(RecordId, Vec<f32>)>, StoreError> {
        let guard = self
            .therapists
            .rows
            .read()
            .map_err(|_| StoreError::Poisoned(self.therapists.name))?;
        Ok(guard
            .values()
            .filter_map(|t| t.vector_embedding.clone().map(|v| (t.id, v)))
            .collect())
    }

    fn get_user(&self, id: RecordId) -> Result<User, StoreError> {
        self.users
            .get(id)?
            .ok_or(StoreError::NotFound { kind: "user", id })
    }

    fn get_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        self.users.find(|u| u.username == username)
    }

    fn all_users(&self) -> Result<Vec<User>, StoreError> {
        self.users.all()
    }

    fn create_user(&self, user: NewUser) -> Result<User, StoreError> {
        let created_at = Utc::now();
        self.users.insert(|id| User {
            id,
            username: user.username,
            email: user.email,
            name: user.name,
            preferences: user.preferences,
            created_at,
        })
    }

    fn get_community(&self, id: RecordId) -> Result<Option<Community>, StoreError> {
        self.communities.get(id)
    }

    fn all_communities(&self) -> Result<Vec<Community>, StoreError> {
        self.communities.all()
    }

    fn create_community(&self, community: NewCommunity) -> Result<Community, StoreError> {
        let created_at = Utc::now();
        self.communities.insert(|id| Community {
            id,
            name: community.name,
            description: community.description,
            moderator_id: community.moderator_id,
            member_count: community.member_count,
            tags: community.tags,
            status: community.status,
            created_at,
        })
    }
}
