//! Run observers
//!
//! Side-channel hooks invoked by the optimizer at the end of every generation
//! and once at the end of a run. Observers never influence the search.

use std::sync::mpsc::{self, Receiver, Sender};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::diagnostics::{EvolutionResult, GenerationStats};
use crate::genome::allocation::Allocation;
use crate::population::individual::Individual;

/// Population handed out at the end of a generation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenerationSnapshot {
    /// Generation that produced this population (0-based)
    pub generation: usize,
    /// Individuals with their objectives and, when ranked, their rank
    pub individuals: Vec<Individual<Allocation>>,
    /// Summary statistics of the population
    pub stats: GenerationStats,
}

/// Receiver of per-generation snapshots and the final result
pub trait EvolutionObserver {
    /// Called once at the end of every generation, in generation order
    fn on_generation(&mut self, _snapshot: GenerationSnapshot) {}

    /// Called exactly once after the final ranking pass
    fn on_complete(&mut self, _result: &EvolutionResult) {}
}

/// Observer that ignores everything
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl EvolutionObserver for NoopObserver {}

impl<O: EvolutionObserver + ?Sized> EvolutionObserver for &mut O {
    fn on_generation(&mut self, snapshot: GenerationSnapshot) {
        (**self).on_generation(snapshot);
    }

    fn on_complete(&mut self, result: &EvolutionResult) {
        (**self).on_complete(result);
    }
}

/// Event streamed by a [`ChannelObserver`]
#[derive(Clone, Debug, PartialEq)]
pub enum RunEvent {
    /// End of a generation
    Generation(GenerationSnapshot),
    /// End of the run
    Completed(EvolutionResult),
}

/// Observer that forwards events over an unbounded channel
///
/// Sending never blocks the optimizer, and events arrive in the order they
/// were produced. A dropped receiver is logged once and then ignored.
#[derive(Debug)]
pub struct ChannelObserver {
    sender: Sender<RunEvent>,
    disconnected: bool,
}

impl ChannelObserver {
    /// Create an observer and the receiving end of its channel
    pub fn channel() -> (Self, Receiver<RunEvent>) {
        let (sender, receiver) = mpsc::channel();
        (Self::from_sender(sender), receiver)
    }

    /// Wrap an existing sender
    pub fn from_sender(sender: Sender<RunEvent>) -> Self {
        Self {
            sender,
            disconnected: false,
        }
    }

    fn send(&mut self, event: RunEvent) {
        if self.disconnected {
            return;
        }
        if self.sender.send(event).is_err() {
            warn!("run event receiver dropped; further events are discarded");
            self.disconnected = true;
        }
    }
}

impl EvolutionObserver for ChannelObserver {
    fn on_generation(&mut self, snapshot: GenerationSnapshot) {
        self.send(RunEvent::Generation(snapshot));
    }

    fn on_complete(&mut self, result: &EvolutionResult) {
        self.send(RunEvent::Completed(result.clone()));
    }
}
