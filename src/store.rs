//! In-memory championship registry with one exclusive lock per championship.

use crate::logic::{generate_championship, GenerateOptions, GenerationSummary};
use crate::models::{Championship, ChampionshipError, ChampionshipId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock, TryLockError};

type Entry = Arc<Mutex<Championship>>;

/// Championships by id. Different championships never share a lock.
#[derive(Debug, Default)]
pub struct ChampionshipStore {
    championships: RwLock<HashMap<ChampionshipId, Entry>>,
}

impl ChampionshipStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a championship and return its id.
    pub fn insert(&self, championship: Championship) -> Result<ChampionshipId, ChampionshipError> {
        let id = championship.id;
        let mut g = self
            .championships
            .write()
            .map_err(|_| ChampionshipError::ConcurrentModification)?;
        g.insert(id, Arc::new(Mutex::new(championship)));
        Ok(id)
    }

    pub fn remove(&self, id: ChampionshipId) -> Result<(), ChampionshipError> {
        let mut g = self
            .championships
            .write()
            .map_err(|_| ChampionshipError::ConcurrentModification)?;
        g.remove(&id)
            .map(|_| ())
            .ok_or(ChampionshipError::ChampionshipNotFound(id))
    }

    fn entry(&self, id: ChampionshipId) -> Result<Entry, ChampionshipError> {
        let g = self
            .championships
            .read()
            .map_err(|_| ChampionshipError::ConcurrentModification)?;
        g.get(&id)
            .cloned()
            .ok_or(ChampionshipError::ChampionshipNotFound(id))
    }

    /// Copy of the current state.
    pub fn snapshot(&self, id: ChampionshipId) -> Result<Championship, ChampionshipError> {
        self.with_championship(id, |t| Ok(t.clone()))
    }

    /// Run `f` while holding the championship's lock (waits for other holders).
    pub fn with_championship<T>(
        &self,
        id: ChampionshipId,
        f: impl FnOnce(&mut Championship) -> Result<T, ChampionshipError>,
    ) -> Result<T, ChampionshipError> {
        let entry = self.entry(id)?;
        let mut guard = entry
            .lock()
            .map_err(|_| ChampionshipError::ConcurrentModification)?;
        f(&mut *guard)
    }

    /// Generate under the championship's lock without waiting for it.
    ///
    /// A caller that finds the lock held gets `ConcurrentModification`; once the
    /// holder is done, later callers see `AlreadyGenerated` unless they force.
    pub fn generate(
        &self,
        id: ChampionshipId,
        options: GenerateOptions,
    ) -> Result<GenerationSummary, ChampionshipError> {
        let entry = self.entry(id)?;
        let mut guard = match entry.try_lock() {
            Ok(guard) => guard,
            Err(TryLockError::WouldBlock) | Err(TryLockError::Poisoned(_)) => {
                log::warn!("Championship {}: generation refused, lock held", id);
                return Err(ChampionshipError::ConcurrentModification);
            }
        };
        generate_championship(&mut *guard, options)
    }

    pub fn len(&self) -> usize {
        self.championships.read().map(|g| g.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
