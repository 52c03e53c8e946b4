//! wordcycle-core — dispense vocabulary entries without repetition.
//!
//! A cycle is one full pass over the vocabulary. Two bookkeeping strategies
//! are provided:
//!
//! - [`ShuffleSampler`]: an in-process shuffled stack of indices still to be
//!   dispensed. Fast, no I/O, lost on restart.
//! - [`SeenSetSampler`]: an explicit list of terms already dispensed, kept in
//!   a [`SeenStore`] (a GitHub Gist in production) and round-tripped on every
//!   draw.
//!
//! The HTTP layer depends only on the [`CycleSampler`] trait.

pub mod error;
pub mod gist;
pub mod sampler;
pub mod shuffle;
pub mod store;
pub mod vocabulary;

pub use error::CycleError;
pub use gist::{GistConfig, GistSeenStore};
pub use sampler::{CycleSampler, Draw, SeenSetSampler, ShuffleSampler};
pub use shuffle::{shuffle_in_place, ShuffleStack};
pub use store::{InMemorySeenStore, SeenStore};
pub use vocabulary::{Vocabulary, VocabularyEntry, VocabularySource};

pub type Result<T> = std::result::Result<T, CycleError>;
