//! Taxonomy cache
//!
//! Single in-process service holding the field/subject/semester
//! enumerations. Loaded once at startup and reloaded explicitly after
//! every admin mutation of fields or subjects; consumers read immutable
//! snapshots instead of re-fetching the taxonomy independently.

use crate::db::models::{Field, Subject};
use crate::errors::Result;
use crate::store::CatalogStore;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Number of academic terms; semesters are numbered 1..=8
pub const SEMESTER_COUNT: i16 = 8;

/// The valid semester numbers
pub fn semesters() -> impl Iterator<Item = i16> {
    1..=SEMESTER_COUNT
}

/// Immutable view of the taxonomy at one point in time
#[derive(Debug, Clone, Default)]
pub struct TaxonomySnapshot {
    fields: Vec<Field>,
    subjects: Vec<Subject>,
    generation: u64,
}

impl TaxonomySnapshot {
    pub fn new(fields: Vec<Field>, subjects: Vec<Subject>, generation: u64) -> Self {
        Self {
            fields,
            subjects,
            generation,
        }
    }

    /// Monotonically increasing reload counter; a snapshot taken before a
    /// reload carries a lower generation than one taken after.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn subjects(&self) -> &[Subject] {
        &self.subjects
    }

    /// Resolve a field id to its display name
    pub fn field_name(&self, id: Uuid) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.id == id)
            .map(|f| f.name.as_str())
    }

    /// Subjects valid under the given (field, semester) pair; an unset
    /// dimension does not narrow the set.
    pub fn subjects_for(&self, field_id: Option<Uuid>, semester: Option<i16>) -> Vec<&Subject> {
        self.subjects
            .iter()
            .filter(|s| field_id.map_or(true, |id| s.field_id == id))
            .filter(|s| semester.map_or(true, |sem| s.semester == sem))
            .collect()
    }

    /// Whether `name` is a valid subject under the given pair
    pub fn contains_subject(&self, field_id: Option<Uuid>, semester: Option<i16>, name: &str) -> bool {
        self.subjects_for(field_id, semester)
            .iter()
            .any(|s| s.name == name)
    }
}

/// Shared taxonomy cache service
pub struct TaxonomyCache {
    snapshot: RwLock<Arc<TaxonomySnapshot>>,
    generation: AtomicU64,
}

impl Default for TaxonomyCache {
    fn default() -> Self {
        Self {
            snapshot: RwLock::new(Arc::new(TaxonomySnapshot::default())),
            generation: AtomicU64::new(0),
        }
    }
}

impl TaxonomyCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current snapshot; cheap, clone of an Arc
    pub async fn snapshot(&self) -> Arc<TaxonomySnapshot> {
        self.snapshot.read().await.clone()
    }

    /// Re-fetch fields and subjects from the store and swap the snapshot in.
    /// Called at startup and after every admin mutation of the taxonomy.
    ///
    /// The write lock is held across the store reads: concurrent reloads
    /// are serialized so a slower one can never install older rows, or a
    /// lower generation, over a newer snapshot.
    pub async fn reload(&self, store: &dyn CatalogStore) -> Result<u64> {
        let mut slot = self.snapshot.write().await;

        let fields = store.list_fields().await?;
        let subjects = store.list_subjects(None, None).await?;

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        *slot = Arc::new(TaxonomySnapshot::new(fields, subjects, generation));
        drop(slot);

        crate::metrics::record_taxonomy_reload();
        tracing::debug!(generation, "Taxonomy cache reloaded");
        Ok(generation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(name: &str) -> Field {
        Field {
            id: Uuid::new_v4(),
            name: name.to_string(),
        }
    }

    fn subject(field_id: Uuid, semester: i16, name: &str) -> Subject {
        Subject {
            id: Uuid::new_v4(),
            name: name.to_string(),
            field_id,
            semester,
        }
    }

    #[test]
    fn test_semester_range() {
        let all: Vec<i16> = semesters().collect();
        assert_eq!(all, vec![1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn test_field_name_resolution() {
        let bca = field("BCA");
        let id = bca.id;
        let snap = TaxonomySnapshot::new(vec![bca], vec![], 1);

        assert_eq!(snap.field_name(id), Some("BCA"));
        assert_eq!(snap.field_name(Uuid::new_v4()), None);
    }

    #[test]
    fn test_subjects_for_scoping() {
        let bca = field("BCA");
        let bba = field("BBA");
        let subjects = vec![
            subject(bca.id, 1, "Computer Programming"),
            subject(bca.id, 3, "Data Structures and Algorithms"),
            subject(bba.id, 1, "Principles of Management"),
        ];
        let snap = TaxonomySnapshot::new(vec![bca.clone(), bba.clone()], subjects, 1);

        assert_eq!(snap.subjects_for(None, None).len(), 3);
        assert_eq!(snap.subjects_for(Some(bca.id), None).len(), 2);
        assert_eq!(snap.subjects_for(Some(bca.id), Some(1)).len(), 1);
        assert_eq!(snap.subjects_for(None, Some(1)).len(), 2);
        assert!(snap.contains_subject(Some(bca.id), Some(3), "Data Structures and Algorithms"));
        assert!(!snap.contains_subject(Some(bba.id), Some(3), "Data Structures and Algorithms"));
    }

    #[tokio::test]
    async fn test_concurrent_reloads_never_regress_generation() {
        use crate::store::{CatalogStore, MemCatalog};

        let store: Arc<dyn CatalogStore> = Arc::new(MemCatalog::new());
        let cache = Arc::new(TaxonomyCache::new());

        let mut handles = Vec::new();
        for _ in 0..16 {
            let store = store.clone();
            let cache = cache.clone();
            handles.push(tokio::spawn(async move {
                cache.reload(store.as_ref()).await.unwrap()
            }));
        }

        let mut generations = Vec::new();
        for handle in handles {
            generations.push(handle.await.unwrap());
        }
        generations.sort_unstable();
        assert_eq!(generations, (1..=16).collect::<Vec<u64>>());

        // The installed snapshot must carry the newest generation.
        assert_eq!(cache.snapshot().await.generation(), 16);
    }
}
