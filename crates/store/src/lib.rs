//! # realeader Store
//!
//! In-memory directory backing the matching service: therapists (with their
//! embeddings), users and communities. Nothing is persisted; every process
//! starts from the demo seed.
//!
//! Storage sits behind the [`Storage`] trait so the pipeline and the HTTP
//! layer never name the concrete backend. [`MemStorage`] keeps one
//! `RwLock<BTreeMap>` per table with monotonically increasing ids, so
//! listings come back in insertion order.
//!
//! ```
//! use store::{MemStorage, SeedConfig, Storage};
//!
//! let storage = MemStorage::seeded(&SeedConfig::default()).unwrap();
//! let therapists = storage.all_therapists().unwrap();
//! assert_eq!(therapists.len(), 3);
//! assert_eq!(therapists[0].name, "Dr. Sarah Johnson");
//! ```

mod error;
mod memory;
mod seed;
mod types;

pub use crate::error::StoreError;
pub use crate::memory::MemStorage;
pub use crate::seed::SeedConfig;
pub use crate::types::{
    Community, CommunityStatus, NewCommunity, NewTherapist, NewUser, Therapist, User,
};

/// Id type shared by every table.
pub type RecordId = u64;

/// Directory operations used by the pipeline and the HTTP layer.
pub trait Storage: Send + Sync {
    fn get_therapist(&self, id: RecordId) -> Result<Option<Therapist>, StoreError>;
    fn all_therapists(&self) -> Result<Vec<Therapist>, StoreError>;
    fn create_therapist(&self, therapist: NewTherapist) -> Result<Therapist, StoreError>;

    /// `(id, embedding)` for every therapist that has an embedding.
    fn therapist_embeddings(&self) -> Result<Vec<(RecordId, Vec<f32>)>, StoreError>;

    /// Fails with [`StoreError::NotFound`] when absent.
    fn get_user(&self, id: RecordId) -> Result<User, StoreError>;
    fn get_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;
    fn all_users(&self) -> Result<Vec<User>, StoreError>;
    fn create_user(&self, user: NewUser) -> Result<User, StoreError>;

    fn get_community(&self, id: RecordId) -> Result<Option<Community>, StoreError>;
    fn all_communities(&self) -> Result<Vec<Community>, StoreError>;
    fn create_community(&self, community: NewCommunity) -> Result<Community, StoreError>;
}
