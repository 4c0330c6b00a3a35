//! Reusable pool of host-owned render entities
//!
//! Handles are a contiguous range starting at `first`. The pool keeps a
//! high-water mark of how many entities the host has ever been asked to show;
//! shrinking (on restart) only hides entities, so the host's widgets are reused
//! by the next run instead of being recreated.

use serde::{Deserialize, Serialize};

use crate::platform::{EntityHandle, RenderAdapter};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityPool {
    first: EntityHandle,
    /// Entities kept visible across a reset
    initial: usize,
    /// Hard upper bound
    max: usize,
    /// High-water mark: entities the host has materialized
    created: usize,
    /// Entities currently in use (visible)
    len: usize,
}

impl EntityPool {
    pub fn new(first: EntityHandle, initial: usize, max: usize) -> Self {
        Self {
            first,
            initial: initial.min(max),
            max,
            created: 0,
            len: 0,
        }
    }

    /// Entities currently in use
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Entities ever shown (visible or hidden)
    pub fn created(&self) -> usize {
        self.created
    }

    pub fn max(&self) -> usize {
        self.max
    }

    /// Handle of entity `index`, if it is in use
    pub fn handle(&self, index: usize) -> Option<EntityHandle> {
        (index < self.len).then(|| EntityHandle(self.first.0 + index as u16))
    }

    /// Grow the in-use set to `n` (clamped to the maximum), showing the new
    /// entities. Never shrinks. Returns the resulting length.
    pub fn ensure_capacity(&mut self, n: usize, render: &mut dyn RenderAdapter) -> usize {
        let n = n.min(self.max);
        if n <= self.len {
            return self.len;
        }
        for i in self.len..n {
            render.set_entity_visible(EntityHandle(self.first.0 + i as u16), true);
        }
        self.len = n;
        self.created = self.created.max(n);
        self.len
    }

    /// Hide everything above the initial count; nothing is freed
    pub fn reset(&mut self, render: &mut dyn RenderAdapter) {
        for i in self.initial..self.created {
            render.set_entity_visible(EntityHandle(self.first.0 + i as u16), false);
        }
        self.len = self.initial.min(self.created);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::headless::HeadlessHost;

    #[test]
    fn test_grows_and_never_shrinks() {
        let mut host = HeadlessHost::new();
        let mut pool = EntityPool::new(EntityHandle(1), 3, 10);
        assert_eq!(pool.ensure_capacity(3, &mut host), 3);
        assert_eq!(host.visible_count(), 3);
        assert_eq!(pool.ensure_capacity(2, &mut host), 3);
        assert_eq!(pool.ensure_capacity(5, &mut host), 5);
        assert!(host.is_visible(EntityHandle(5)));
        assert_eq!(pool.handle(4), Some(EntityHandle(5)));
        assert_eq!(pool.handle(5), None);
    }

    #[test]
    fn test_clamped_to_max() {
        let mut host = HeadlessHost::new();
        let mut pool = EntityPool::new(EntityHandle(0), 3, 4);
        assert_eq!(pool.ensure_capacity(100, &mut host), 4);
        assert_eq!(host.visible_count(), 4);
    }

    #[test]
    fn test_reset_hides_but_keeps_high_water_mark() {
        let mut host = HeadlessHost::new();
        let mut pool = EntityPool::new(EntityHandle(1), 3, 10);
        pool.ensure_capacity(7, &mut host);
        pool.reset(&mut host);

        assert_eq!(pool.len(), 3);
        assert_eq!(pool.created(), 7);
        assert_eq!(host.visible_count(), 3);
        for h in 4..=7 {
            assert!(!host.is_visible(EntityHandle(h)));
        }

        // Regrowing reuses the same handles
        pool.ensure_capacity(5, &mut host);
        assert!(host.is_visible(EntityHandle(5)));
        assert!(!host.is_visible(EntityHandle(6)));
        assert_eq!(pool.created(), 7);
    }
}
