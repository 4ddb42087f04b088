/*!
 * Scheduling Queue
 * Priority-ordered view over the registry with a persistent round-robin cursor
 */

use super::registry::ProcessRegistry;
use super::types::Priority;
use crate::core::types::ProcessId;
use tracing::debug;

/// Sorted visit order, rebuilt lazily when the registry generation moves
///
/// The cursor names a process deferred by budget exhaustion. Next cycle it
/// is visited first within its priority band; higher bands still come
/// before it. A full pass returns the cursor to the head.
#[derive(Debug, Default)]
pub struct SchedulingQueue {
    order: Vec<ProcessId>,
    /// Priority of each entry in `order`, descending
    bands: Vec<Priority>,
    cursor: Option<ProcessId>,
    built_for: Option<u64>,
}

impl SchedulingQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild if the registry changed since the last build
    pub fn sync(&mut self, registry: &ProcessRegistry) {
        if self.built_for == Some(registry.generation()) {
            return;
        }
        self.rebuild(registry);
    }

    fn rebuild(&mut self, registry: &ProcessRegistry) {
        let mut entries: Vec<_> = registry
            .iter()
            .map(|p| (p.priority, p.seq, p.id.clone()))
            .collect();
        // Stable by construction: seq is unique and encodes registration order
        entries.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
        self.bands = entries.iter().map(|(priority, _, _)| *priority).collect();
        self.order = entries.into_iter().map(|(_, _, id)| id).collect();

        if let Some(cursor) = &self.cursor {
            if !self.order.contains(cursor) {
                debug!(cursor = %cursor, "Cursor process gone, resetting to head");
                self.cursor = None;
            }
        }

        self.built_for = Some(registry.generation());
        debug!(processes = self.order.len(), "Scheduling queue rebuilt");
    }

    /// This cycle's visit order
    ///
    /// Only the cursor's priority band is rotated to start at the cursor.
    /// Every other band keeps its sorted position.
    pub fn visit_order(&self) -> Vec<ProcessId> {
        let Some(pos) = self
            .cursor
            .as_ref()
            .and_then(|id| self.order.iter().position(|o| o == id))
        else {
            return self.order.clone();
        };

        let band = self.bands[pos];
        let band_start = self.bands[..pos]
            .iter()
            .rposition(|p| *p != band)
            .map_or(0, |i| i + 1);
        let band_end = self.bands[pos..]
            .iter()
            .position(|p| *p != band)
            .map_or(self.order.len(), |i| pos + i);

        self.order[..band_start]
            .iter()
            .chain(&self.order[pos..band_end])
            .chain(&self.order[band_start..pos])
            .chain(&self.order[band_end..])
            .cloned()
            .collect()
    }

    /// Leave the cursor on a process deferred by budget exhaustion
    pub fn defer_at(&mut self, id: &ProcessId) {
        self.cursor = Some(id.clone());
    }

    /// Every process was visited; next cycle starts from the head
    pub fn complete_pass(&mut self) {
        self.cursor = None;
    }

    #[inline]
    pub fn cursor(&self) -> Option<&ProcessId> {
        self.cursor.as_ref()
    }

    /// Sorted order without rotation
    #[inline]
    pub fn ordered(&self) -> &[ProcessId] {
        &self.order
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
