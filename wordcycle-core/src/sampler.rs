//! Cycle samplers
//!
//! A sampler hands out one entry per call, never repeating a term until every
//! term has been dispensed once. When the cycle runs out the sampler resets
//! inline and draws from the fresh cycle, so a non-empty vocabulary always
//! yields an entry.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, RwLock};

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::CycleError;
use crate::shuffle::ShuffleStack;
use crate::store::SeenStore;
use crate::vocabulary::{Vocabulary, VocabularyEntry, VocabularySource};

/// One dispensed entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Draw {
    pub entry: VocabularyEntry,
    /// Entries still available in the current cycle after this draw.
    pub remaining: usize,
}

#[async_trait]
pub trait CycleSampler: Send + Sync {
    async fn next(&self) -> Result<Draw, CycleError>;

    /// Short backend name for logs and routing.
    fn backend(&self) -> &'static str;
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, CycleError> {
    mutex
        .lock()
        .map_err(|_| CycleError::Internal("sampler lock poisoned".to_string()))
}

/// Re-read the dataset at a cycle boundary. A failed or empty reload keeps
/// the current vocabulary.
fn reload_vocabulary(source: &VocabularySource, current: &Vocabulary) -> Vocabulary {
    match source.load() {
        Ok(fresh) if !fresh.is_empty() => fresh,
        Ok(_) => {
            tracing::warn!(
                path = %source.path().display(),
                "reloaded vocabulary is empty; keeping previous"
            );
            current.clone()
        }
        Err(e) => {
            tracing::warn!("Vocabulary reload failed, keeping previous: {}", e);
            current.clone()
        }
    }
}

// ---------------------------------------------------------------------------
// ShuffleSampler — in-memory shuffled index stack
// ---------------------------------------------------------------------------

struct ShuffleState {
    vocabulary: Vocabulary,
    stack: ShuffleStack<StdRng>,
}

pub struct ShuffleSampler {
    state: Mutex<ShuffleState>,
    reload: Option<VocabularySource>,
}

impl ShuffleSampler {
    pub fn new(vocabulary: Vocabulary) -> Self {
        Self::with_rng(vocabulary, StdRng::from_entropy())
    }

    /// Deterministic construction for tests.
    pub fn with_rng(vocabulary: Vocabulary, rng: StdRng) -> Self {
        let mut stack = ShuffleStack::new(rng);
        stack.initialize(vocabulary.len());
        Self {
            state: Mutex::new(ShuffleState { vocabulary, stack }),
            reload: None,
        }
    }

    /// Re-read `source` each time a cycle completes.
    pub fn with_reload(mut self, source: VocabularySource) -> Self {
        self.reload = Some(source);
        self
    }

    pub fn remaining(&self) -> Result<usize, CycleError> {
        Ok(lock(&self.state)?.stack.remaining())
    }

    /// Pop-and-maybe-reinitialize runs entirely under the state lock.
    fn draw(&self) -> Result<Draw, CycleError> {
        let mut state = lock(&self.state)?;
        if state.vocabulary.is_empty() {
            return Err(CycleError::NoData);
        }

        let index = match state.stack.take_next() {
            Ok(index) => index,
            Err(CycleError::CycleExhausted) => {
                tracing::info!("Cycle complete. Reshuffling...");
                if let Some(source) = &self.reload {
                    state.vocabulary = reload_vocabulary(source, &state.vocabulary);
                }
                let len = state.vocabulary.len();
                state.stack.initialize(len);
                state.stack.take_next()?
            }
            Err(e) => return Err(e),
        };

        let entry = state
            .vocabulary
            .get(index)
            .cloned()
            .ok_or_else(|| CycleError::Internal(format!("index {index} out of range")))?;
        Ok(Draw {
            entry,
            remaining: state.stack.remaining(),
        })
    }
}

#[async_trait]
impl CycleSampler for ShuffleSampler {
    async fn next(&self) -> Result<Draw, CycleError> {
        self.draw()
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

// ---------------------------------------------------------------------------
// SeenSetSampler — explicit seen list in a SeenStore
// ---------------------------------------------------------------------------

/// Read-modify-write over a [`SeenStore`] per draw.
///
/// Not atomic across requests: concurrent draws may read the same seen list,
/// dispense the same term, and overwrite each other's update.
pub struct SeenSetSampler<S> {
    store: S,
    vocabulary: RwLock<Vocabulary>,
    reload: Option<VocabularySource>,
    rng: Mutex<StdRng>,
}

impl<S: SeenStore> SeenSetSampler<S> {
    pub fn new(vocabulary: Vocabulary, store: S) -> Self {
        Self::with_rng(vocabulary, store, StdRng::from_entropy())
    }

    pub fn with_rng(vocabulary: Vocabulary, store: S, rng: StdRng) -> Self {
        Self {
            store,
            vocabulary: RwLock::new(vocabulary),
            reload: None,
            rng: Mutex::new(rng),
        }
    }

    pub fn with_reload(mut self, source: VocabularySource) -> Self {
        self.reload = Some(source);
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn vocabulary(&self) -> Result<Vocabulary, CycleError> {
        self.vocabulary
            .read()
            .map(|v| v.clone())
            .map_err(|_| CycleError::Internal("vocabulary lock poisoned".to_string()))
    }

    fn reset_vocabulary(&self, current: Vocabulary) -> Result<Vocabulary, CycleError> {
        let Some(source) = &self.reload else {
            return Ok(current);
        };
        let fresh = reload_vocabulary(source, &current);
        let mut guard = self
            .vocabulary
            .write()
            .map_err(|_| CycleError::Internal("vocabulary lock poisoned".to_string()))?;
        *guard = fresh.clone();
        Ok(fresh)
    }

    async fn read_seen_or_empty(&self) -> Vec<String> {
        match self.store.read_seen().await {
            Ok(seen) => seen,
            Err(e) => {
                tracing::warn!("Seen-set read failed, assuming fresh cycle: {}", e);
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl<S: SeenStore> CycleSampler for SeenSetSampler<S> {
    async fn next(&self) -> Result<Draw, CycleError> {
        let mut vocabulary = self.vocabulary()?;
        if vocabulary.is_empty() {
            return Err(CycleError::NoData);
        }

        let mut seen = self.read_seen_or_empty().await;

        let mut available: Vec<usize> = {
            let seen_terms: HashSet<&str> = seen.iter().map(String::as_str).collect();
            vocabulary
                .iter()
                .enumerate()
                .filter(|(_, entry)| !seen_terms.contains(entry.term()))
                .map(|(index, _)| index)
                .collect()
        };

        if available.is_empty() {
            tracing::info!(seen = seen.len(), "Cycle complete. Resetting seen-set...");
            seen.clear();
            vocabulary = self.reset_vocabulary(vocabulary)?;
            available = (0..vocabulary.len()).collect();
        }
        if available.is_empty() {
            return Err(CycleError::NoData);
        }

        let pick = {
            let mut rng = lock(&self.rng)?;
            rng.gen_range(0..available.len())
        };
        let entry = vocabulary
            .get(available[pick])
            .cloned()
            .ok_or_else(|| CycleError::Internal(format!("index {} out of range", available[pick])))?;
        let remaining = available.len() - 1;

        seen.push(entry.term().to_string());
        if let Err(e) = self.store.write_seen(&seen).await {
            tracing::warn!(term = entry.term(), "Seen-set write failed: {}", e);
        }

        Ok(Draw { entry, remaining })
    }

    fn backend(&self) -> &'static str {
        "remote"
    }
}
