//! Transfer buffer manager: static slots, dynamic overflow and migration

use std::fmt;

use crate::{
    allocators::BlockAllocator,
    buffers::{copy_content, BufferHandle, DynamicTransferBuffer, StaticTransferBuffer, TransferBuffer},
    config::MAX_DYNAMIC_CAPACITY,
    error::{MosaicError, Result},
};

use super::{key::TransferBufferKey, stats::TransferBufferManagerStats};

/// One static slot: inline storage plus the key bound to it, if any
struct StaticSlot<const C: usize> {
    key: Option<TransferBufferKey>,
    buffer: StaticTransferBuffer<C>,
}

impl<const C: usize> StaticSlot<C> {
    fn new() -> Self {
        Self {
            key: None,
            buffer: StaticTransferBuffer::new(),
        }
    }

    fn bind(&mut self, key: TransferBufferKey) {
        self.key = Some(key);
        self.buffer.reset();
    }

    fn unbind(&mut self) {
        self.key = None;
        self.buffer.reset();
    }
}

/// One dynamic binding
struct DynamicEntry<'a, A: BlockAllocator + ?Sized> {
    key: TransferBufferKey,
    buffer: DynamicTransferBuffer<'a, A>,
}

/// Routes transfers to buffers by key
///
/// Holds `S` static slots of `MAX_BUF` bytes and room for `D` dynamic buffers
/// of the same capacity drawing blocks from `allocator`. `create` prefers a
/// free static slot. When `remove` frees a static slot, the oldest dynamic
/// transfer is copied into it and its blocks go back to the pool.
///
/// Dropping the manager drops every dynamic buffer, which returns every block.
/// With `S = 0` and `D = 0` the manager is the size of one `&A`: a thin
/// pointer for a sized allocator, a fat one for `dyn BlockAllocator`.
pub struct TransferBufferManager<
    'a,
    A: BlockAllocator + ?Sized,
    const MAX_BUF: usize,
    const S: usize,
    const D: usize,
> {
    /// Shared block source for dynamic buffers
    allocator: &'a A,
    /// Static slot bank
    statics: [StaticSlot<MAX_BUF>; S],
    /// Dynamic bindings; live entries form a prefix, oldest first
    dynamics: [Option<DynamicEntry<'a, A>>; D],
}

impl<'a, A, const MAX_BUF: usize, const S: usize, const D: usize> TransferBufferManager<'a, A, MAX_BUF, S, D>
where
    A: BlockAllocator + ?Sized,
{
    const FITS_DYNAMIC_CHAIN: () = assert!(
        D == 0 || MAX_BUF <= MAX_DYNAMIC_CAPACITY,
        "MAX_BUF exceeds what a dynamic buffer chain can hold"
    );

    /// Create a manager with every slot free
    pub fn new(allocator: &'a A) -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::FITS_DYNAMIC_CHAIN;

        Self {
            allocator,
            statics: std::array::from_fn(|_| StaticSlot::new()),
            dynamics: std::array::from_fn(|_| None),
        }
    }

    /// Bind a fresh, empty buffer to `key`
    ///
    /// Uses a free static slot if there is one, otherwise a new dynamic buffer
    /// (which acquires no block until written). Fails with
    /// [`MosaicError::KeyExists`] if `key` is bound and with
    /// [`MosaicError::NoCapacity`] if every slot is taken; the latter is
    /// backpressure and leaves the manager unchanged.
    pub fn create(&mut self, key: TransferBufferKey) -> Result<BufferHandle<'_, 'a, A, MAX_BUF>> {
        if self.contains(key) {
            return Err(MosaicError::key_exists(key));
        }

        if let Some(index) = self.statics.iter().position(|slot| slot.key.is_none()) {
            log::debug!("{} bound to static slot {}", key, index);
            let slot = &mut self.statics[index];
            slot.bind(key);
            return Ok(BufferHandle::Static(&mut slot.buffer));
        }

        let allocator = self.allocator;
        if let Some(index) = self.dynamics.iter().position(Option::is_none) {
            log::debug!("{} bound to dynamic buffer {}", key, index);
            let entry = self.dynamics[index].insert(DynamicEntry {
                key,
                buffer: DynamicTransferBuffer::new(allocator, MAX_BUF),
            });
            return Ok(BufferHandle::Dynamic(&mut entry.buffer));
        }

        log::debug!("no buffer available for {}", key);
        Err(MosaicError::no_capacity(S, D))
    }

    /// Look up the buffer bound to `key`
    pub fn access(&mut self, key: TransferBufferKey) -> Option<BufferHandle<'_, 'a, A, MAX_BUF>> {
        if let Some(index) = self.find_static(key) {
            return Some(BufferHandle::Static(&mut self.statics[index].buffer));
        }

        self.dynamics
            .iter_mut()
            .flatten()
            .find(|entry| entry.key == key)
            .map(|entry| BufferHandle::Dynamic(&mut entry.buffer))
    }

    /// Unbind `key` and release its storage; no-op if it is not bound
    ///
    /// Freeing a static slot migrates the oldest dynamic transfer into it.
    pub fn remove(&mut self, key: TransferBufferKey) {
        if let Some(index) = self.find_static(key) {
            log::debug!("{} released static slot {}", key, index);
            self.statics[index].unbind();
            self.migrate_into(index);
        } else if let Some(index) = self.find_dynamic(key) {
            log::debug!("{} released dynamic buffer {}", key, index);
            drop(self.take_dynamic(index));
        }
    }

    /// Check if `key` is bound
    pub fn contains(&self, key: TransferBufferKey) -> bool {
        self.find_static(key).is_some() || self.find_dynamic(key).is_some()
    }

    /// Number of static slots bound to a key
    pub fn static_in_use(&self) -> usize {
        self.statics.iter().filter(|slot| slot.key.is_some()).count()
    }

    /// Number of dynamic buffers bound to a key
    pub fn dynamic_in_use(&self) -> usize {
        self.dynamics.iter().filter(|entry| entry.is_some()).count()
    }

    /// Number of static slots
    pub fn static_capacity(&self) -> usize {
        S
    }

    /// Number of dynamic buffers the manager can hold
    pub fn dynamic_capacity(&self) -> usize {
        D
    }

    /// Bound keys: static slots in slot order, then dynamic buffers oldest first
    pub fn keys(&self) -> impl Iterator<Item = TransferBufferKey> + '_ {
        self.statics
            .iter()
            .filter_map(|slot| slot.key)
            .chain(self.dynamics.iter().flatten().map(|entry| entry.key))
    }

    /// Get current statistics
    pub fn stats(&self) -> TransferBufferManagerStats {
        TransferBufferManagerStats {
            static_in_use: self.static_in_use(),
            static_capacity: S,
            dynamic_in_use: self.dynamic_in_use(),
            dynamic_capacity: D,
        }
    }

    // Private helper methods

    fn find_static(&self, key: TransferBufferKey) -> Option<usize> {
        self.statics.iter().position(|slot| slot.key == Some(key))
    }

    fn find_dynamic(&self, key: TransferBufferKey) -> Option<usize> {
        self.dynamics
            .iter()
            .position(|entry| entry.as_ref().is_some_and(|entry| entry.key == key))
    }

    /// Take a dynamic entry out, keeping live entries a prefix in creation order
    fn take_dynamic(&mut self, index: usize) -> Option<DynamicEntry<'a, A>> {
        let entry = self.dynamics.get_mut(index)?.take();
        self.dynamics[index..].rotate_left(1);
        entry
    }

    /// Move the oldest dynamic transfer into the free static slot `index`
    fn migrate_into(&mut self, index: usize) {
        let Some(entry) = self.take_dynamic(0) else {
            return;
        };

        let slot = &mut self.statics[index];
        slot.bind(entry.key);
        let copied = copy_content(&entry.buffer, &mut slot.buffer);
        debug_assert_eq!(copied, entry.buffer.max_write_pos());

        log::debug!(
            "{} migrated to static slot {} ({} bytes, {} blocks returned)",
            entry.key,
            index,
            copied,
            entry.buffer.num_blocks()
        );
        // `entry` drops here and its blocks go back to the pool
    }
}

impl<A, const MAX_BUF: usize, const S: usize, const D: usize> fmt::Debug for TransferBufferManager<'_, A, MAX_BUF, S, D>
where
    A: BlockAllocator + ?Sized,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransferBufferManager")
            .field("max_buffer_size", &MAX_BUF)
            .field("static_in_use", &self.static_in_use())
            .field("static_capacity", &S)
            .field("dynamic_in_use", &self.dynamic_in_use())
            .field("dynamic_capacity", &D)
            .finish()
    }
}
