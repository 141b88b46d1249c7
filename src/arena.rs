/*!
    bump allocator and named data table

    the arena only moves its cursor forward and never reclaims memory. It is meant to live at a fixed address for the whole program (typically a `static` in a section not zeroed at reset): once initialized, it recognizes itself by its magic word and keeps its state across further [Arena::init] calls, so a warm reboot does not lose the heap.
*/

use core::{
    any::Any,
    ops::Range,
    };
use log::*;
use crate::{
    config,
    error::Error,
    };


/// reference stored in the named data table
pub type NamedRef = &'static (dyn Any + Send + Sync);
/// name of a named data entry, truncated to [config::NAMED_DATA_LEN] bytes
pub type ShortName = heapless::String<{config::NAMED_DATA_LEN}>;

/// monotonic heap over a region of `SIZE` bytes
pub struct Arena<const SIZE: usize> {
    /// address of the arena itself once initialized
    magic: usize,
    /// end of the allocated part of the heap, also the cumulated allocated size
    cursor: usize,
    named: heapless::Vec<NamedData, {config::MAX_NAMED_DATA}>,
    heap: Heap<SIZE>,
}
#[repr(align(4))]
struct Heap<const SIZE: usize>([u8; SIZE]);

struct NamedData {
    name: ShortName,
    data: NamedRef,
}

/// block of heap returned by [Arena::allocate]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Allocation {
    offset: usize,
    size: usize,
}
impl Allocation {
    /// start of the block from the heap start
    pub fn offset(&self) -> usize {self.offset}
    /// size of the block, rounded to [config::ALIGNMENT]
    pub fn size(&self) -> usize {self.size}
    pub fn range(&self) -> Range<usize> {
        self.offset .. self.offset + self.size
    }
}

impl<const SIZE: usize> Arena<SIZE> {
    /// uninitialized arena, [Self::init] must be called once it reached its final address
    pub const fn new() -> Self {
        Self {
            magic: 0,
            cursor: 0,
            named: heapless::Vec::new(),
            heap: Heap([0; SIZE]),
        }
    }
    /// reset the arena, unless it was already initialized at this address
    pub fn init(&mut self) {
        let address = self.address();
        if self.magic == address {
            debug!("arena already initialized, keeping {} allocated bytes", self.cursor);
            return;
        }
        self.cursor = 0;
        self.named.clear();
        self.heap.0.fill(0);
        self.magic = address;
        debug!("arena initialized with {} bytes", SIZE);
    }
    pub fn is_initialized(&self) -> bool {
        self.magic == self.address()
    }
    fn address(&self) -> usize {
        self as *const Self as usize
    }

    /// reserve `size` bytes rounded up to [config::ALIGNMENT]
    pub fn allocate(&mut self, size: usize) -> Result<Allocation, Error> {
        if !self.is_initialized()
            {return Err(Error::InvalidState("arena is not initialized"))}
        if size == 0
            {return Err(Error::InvalidArgument("zero sized allocation"))}
        let rounded = size.checked_next_multiple_of(config::ALIGNMENT)
            .ok_or(Error::OutOfMemory)?;
        let Some(end) = self.cursor.checked_add(rounded).filter(|&end| end <= SIZE)
            else {
                warn!("arena cannot allocate {} bytes, {} remaining", rounded, self.remaining());
                return Err(Error::OutOfMemory);
            };
        let allocation = Allocation {offset: self.cursor, size: rounded};
        self.cursor = end;
        Ok(allocation)
    }
    /// content of an allocated block, `None` if it does not belong to this heap
    pub fn bytes(&self, allocation: Allocation) -> Option<&[u8]> {
        self.heap.0.get(allocation.range())
    }
    pub fn bytes_mut(&mut self, allocation: Allocation) -> Option<&mut [u8]> {
        self.heap.0.get_mut(allocation.range())
    }
    /// cumulated size of all allocations
    pub fn allocated(&self) -> usize {self.cursor}
    pub fn remaining(&self) -> usize {SIZE - self.cursor}
    pub const fn capacity(&self) -> usize {SIZE}

    /**
        append an entry to the named data table

        the name is truncated to [config::NAMED_DATA_LEN] bytes. Names are not deduplicated, the latest entry shadows older ones
    */
    pub fn register_data(&mut self, name: &str, data: NamedRef) -> Result<(), Error> {
        if !self.is_initialized()
            {return Err(Error::InvalidState("arena is not initialized"))}
        let name = short_name(name);
        debug!("register named data '{}'", name);
        self.named.push(NamedData {name, data})
            .map_err(|_| {
                warn!("named data table is full");
                Error::CapacityExceeded
                })
    }
    /// most recent entry with this name (compared after truncation)
    pub fn lookup_data(&self, name: &str) -> Option<NamedRef> {
        if !self.is_initialized()
            {return None}
        let name = short_name(name);
        self.named.iter().rev()
            .find(|entry| entry.name == name)
            .map(|entry| entry.data)
    }
    /// [Self::lookup_data] downcasted to the expected type
    pub fn lookup<T: Any>(&self, name: &str) -> Option<&'static T> {
        self.lookup_data(name)?.downcast_ref()
    }
}

impl<const SIZE: usize> Default for Arena<SIZE> {
    fn default() -> Self {Self::new()}
}

/// longest prefix of `name` fitting a [ShortName], cut on a char boundary
fn short_name(name: &str) -> ShortName {
    let mut short = ShortName::new();
    for c in name.chars() {
        if short.push(c).is_err()
            {break}
    }
    short
}
