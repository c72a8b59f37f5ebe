use std::path::Path;

use async_trait::async_trait;
use dashmap::DashMap;
use serde::Deserialize;

use crate::model::{CoworkingId, Workplace, WorkplaceId};

/// Read-only workplace/tariff/coworking lookup consumed by the engine.
/// The engine never mutates anything behind this trait.
#[async_trait]
pub trait Directory: Send + Sync {
    /// Resolve workplace ids to full records (tariff included). Ids that do
    /// not resolve are omitted from the result.
    async fn resolve_workplaces(&self, ids: &[WorkplaceId]) -> Vec<Workplace>;

    async fn coworking_exists(&self, id: CoworkingId) -> bool;

    /// All workplace ids belonging to a coworking location.
    async fn workplaces_of(&self, id: CoworkingId) -> Vec<WorkplaceId>;
}

#[derive(Debug, Clone, Deserialize)]
pub struct Coworking {
    pub id: CoworkingId,
    pub name: String,
    pub address: String,
}

/// Seed file format for [`InMemoryDirectory::load`].
#[derive(Debug, Deserialize)]
struct DirectorySeed {
    coworkings: Vec<Coworking>,
    workplaces: Vec<Workplace>,
}

/// Map-backed directory. Production deployments would put a database client
/// behind [`Directory`] instead; this one is loaded from a JSON seed file.
#[derive(Default)]
pub struct InMemoryDirectory {
    coworkings: DashMap<CoworkingId, Coworking>,
    workplaces: DashMap<WorkplaceId, Workplace>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load coworkings and workplaces from a JSON seed file.
    pub fn load(path: &Path) -> std::io::Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let seed: DirectorySeed = serde_json::from_str(&raw)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        let dir = Self::new();
        for c in seed.coworkings {
            dir.add_coworking(c);
        }
        for w in seed.workplaces {
            dir.add_workplace(w);
        }
        Ok(dir)
    }

    pub fn add_coworking(&self, coworking: Coworking) {
        self.coworkings.insert(coworking.id, coworking);
    }

    pub fn add_workplace(&self, workplace: Workplace) {
        self.workplaces.insert(workplace.id, workplace);
    }

    pub fn remove_workplace(&self, id: &WorkplaceId) {
        self.workplaces.remove(id);
    }

    pub fn workplace_count(&self) -> usize {
        self.workplaces.len()
    }
}

#[async_trait]
impl Directory for InMemoryDirectory {
    async fn resolve_workplaces(&self, ids: &[WorkplaceId]) -> Vec<Workplace> {
        ids.iter()
            .filter_map(|id| self.workplaces.get(id).map(|e| e.value().clone()))
            .collect()
    }

    async fn coworking_exists(&self, id: CoworkingId) -> bool {
        self.coworkings.contains_key(&id)
    }

    async fn workplaces_of(&self, id: CoworkingId) -> Vec<WorkplaceId> {
        self.workplaces
            .iter()
            .filter(|e| e.value().coworking_id == id)
            .map(|e| *e.key())
            .collect()
    }
}
