use std::collections::HashSet;

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::FailurePolicy;
use crate::error::{Result, WiringError};
use crate::topology::{ChannelAssignment, EdgeId, LayoutStore, Socket, Wiring};

/// The last edge of a chain and the next free pixel on its channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainTail {
    pub edge: String,
    pub socket: Socket,
    /// Plugging a new strip into `edge` makes its first pixel this index.
    pub next_pixel: usize,
}

/// Outcome of chain resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChainReport {
    /// Sorted by socket, then pixel.
    pub tails: Vec<ChainTail>,
    /// Relaxation passes run. Edges listed after their source resolve in
    /// the same pass, so this is at most the deepest chain, not equal to it.
    pub passes: usize,
    /// Edges left pending under [`FailurePolicy::SkipAndReport`], sorted.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unresolved: Vec<String>,
}

/// Resolves every [`Wiring::PendingOn`] edge to an absolute channel position.
///
/// Each pass resolves any pending edge whose source is already resolved:
/// it inherits the source's socket and starts right after the source's last
/// pixel. Passes repeat until nothing is pending. A pass that resolves
/// nothing means the remaining chains are cyclic or hang off an unknown or
/// uncontrolled edge.
///
/// Under [`FailurePolicy::SkipAndReport`] those edges stay
/// [`Wiring::PendingOn`] and are listed in [`ChainReport::unresolved`]
/// instead of failing the run.
#[derive(Debug, Default)]
pub struct ResolveChains {
    policy: FailurePolicy,
}

impl ResolveChains {
    /// Creates a new `ResolveChains` operation.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets what happens to chains that cannot be resolved.
    #[must_use]
    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Executes the resolution, rewriting pending edges in the store.
    ///
    /// # Errors
    ///
    /// Under [`FailurePolicy::Abort`], returns [`WiringError::CyclicWiring`]
    /// naming every edge left unresolved.
    pub fn execute(&self, store: &mut LayoutStore) -> Result<ChainReport> {
        let mut pending: Vec<(EdgeId, String)> = store
            .edges()
            .filter_map(|(id, edge)| match &edge.wiring {
                Wiring::PendingOn(source) => Some((id, source.clone())),
                Wiring::Resolved(_) | Wiring::Uncontrolled => None,
            })
            .collect();
        let mut tails: HashSet<EdgeId> = store
            .edges()
            .filter(|(_, edge)| edge.wiring.assignment().is_some())
            .map(|(id, _)| id)
            .collect();

        let mut passes = 0;
        let mut unresolved = Vec::new();
        while !pending.is_empty() {
            passes += 1;
            let before = pending.len();
            let mut next = Vec::new();

            for (id, source) in pending {
                let Some((source_id, assignment)) = downstream_of(store, &source) else {
                    next.push((id, source));
                    continue;
                };
                if !tails.remove(&source_id) {
                    warn!(source = %source, "more than one edge chained from the same source");
                }
                tails.insert(id);
                store.edge_mut(id)?.wiring = Wiring::Resolved(assignment);
            }

            if next.len() == before {
                unresolved = next
                    .iter()
                    .filter_map(|(id, _)| store.edge(*id).ok().map(|e| e.name.clone()))
                    .collect();
                unresolved.sort();
                if self.policy == FailurePolicy::Abort {
                    return Err(WiringError::CyclicWiring { unresolved }.into());
                }
                warn!(edges = ?unresolved, "leaving unresolvable chains unwired");
                break;
            }
            debug!(
                pass = passes,
                resolved = before - next.len(),
                remaining = next.len(),
                "chain resolution pass"
            );
            pending = next;
        }

        let mut tails: Vec<ChainTail> = tails
            .into_iter()
            .filter_map(|id| {
                let edge = store.edge(id).ok()?;
                let assignment = edge.wiring.assignment()?;
                Some(ChainTail {
                    edge: edge.name.clone(),
                    socket: assignment.socket.clone(),
                    next_pixel: assignment.pixel_offset + edge.point_count,
                })
            })
            .collect();
        tails.sort_by(|a, b| {
            (&a.socket, a.next_pixel, &a.edge).cmp(&(&b.socket, b.next_pixel, &b.edge))
        });

        Ok(ChainReport {
            tails,
            passes,
            unresolved,
        })
    }
}

/// Returns the source edge's id and the assignment an edge chained from it
/// receives, if the source is already resolved.
fn downstream_of(store: &LayoutStore, source: &str) -> Option<(EdgeId, ChannelAssignment)> {
    let source_id = store.edge_id(source).ok()?;
    let edge = store.edge(source_id).ok()?;
    let upstream = edge.wiring.assignment()?;
    Some((
        source_id,
        ChannelAssignment {
            socket: upstream.socket.clone(),
            pixel_offset: upstream.pixel_offset + edge.point_count,
        },
    ))
}
