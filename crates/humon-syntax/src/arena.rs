use std::marker::PhantomData;
use std::ops::{Index, IndexMut};

/// Smallest capacity an array-backed arena grows to.
const MIN_BLOCK: usize = 16;

pub struct Key<T>(u32, PhantomData<fn() -> T>);

impl<T> std::fmt::Debug for Key<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl<T> std::hash::Hash for Key<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl<T> PartialEq for Key<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<T> Eq for Key<T> {}

impl<T> PartialOrd for Key<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Key<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.cmp(&other.0)
    }
}

impl<T> Clone for Key<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Key<T> {}

impl<T> Key<T> {
    pub const fn new(index: u32) -> Self {
        Self(index, PhantomData)
    }

    pub const fn index(self) -> u32 {
        self.0
    }

    pub const fn to_usize(self) -> usize {
        self.0 as usize
    }
}

impl<T> From<u32> for Key<T> {
    fn from(index: u32) -> Self {
        Self::new(index)
    }
}

#[derive(Debug, PartialEq, Eq, Hash)]
enum Storage<T> {
    Growable(Vec<T>),
    /// Tracks only how many elements would have been appended.
    Counting(usize),
}

/// A growable array addressed by [`Key`].
///
/// Growth doubles the capacity (never below a minimum block) and may move the
/// buffer, so callers keep keys across appends and re-derive references
/// afterwards. A counting arena stores nothing; it measures how many
/// elements a pass would append so the real pass can allocate exactly once.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct Arena<T> {
    storage: Storage<T>,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> IntoIterator for Arena<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.into_vec().into_iter()
    }
}

impl<T> Extend<T> for Arena<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.alloc(item);
        }
    }
}

impl<T> Arena<T> {
    pub const fn new() -> Self {
        Self { storage: Storage::Growable(Vec::new()) }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { storage: Storage::Growable(Vec::with_capacity(capacity)) }
    }

    pub const fn counting() -> Self {
        Self { storage: Storage::Counting(0) }
    }

    pub fn is_counting(&self) -> bool {
        matches!(self.storage, Storage::Counting(_))
    }

    /// Drops every element but keeps the mode and, for array-backed arenas,
    /// the allocation.
    pub fn reset(&mut self) {
        match &mut self.storage {
            Storage::Growable(items) => items.clear(),
            Storage::Counting(count) => *count = 0,
        }
    }

    pub fn alloc(&mut self, value: T) -> Key<T> {
        let idx = self.len() as u32;
        match &mut self.storage {
            Storage::Growable(items) => {
                reserve(items, 1);
                items.push(value);
            }
            Storage::Counting(count) => *count += 1,
        }
        Key::new(idx)
    }

    pub fn len(&self) -> usize {
        match &self.storage {
            Storage::Growable(items) => items.len(),
            Storage::Counting(count) => *count,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        match &self.storage {
            Storage::Growable(items) => items.capacity(),
            Storage::Counting(_) => 0,
        }
    }

    pub fn get(&self, key: Key<T>) -> Option<&T> {
        self.as_slice().get(key.to_usize())
    }

    pub fn get_mut(&mut self, key: Key<T>) -> Option<&mut T> {
        match &mut self.storage {
            Storage::Growable(items) => items.get_mut(key.to_usize()),
            Storage::Counting(_) => None,
        }
    }

    pub fn last_key(&self) -> Option<Key<T>> {
        self.len().checked_sub(1).map(|idx| Key::new(idx as u32))
    }

    pub fn as_slice(&self) -> &[T] {
        match &self.storage {
            Storage::Growable(items) => items,
            Storage::Counting(_) => &[],
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        match &mut self.storage {
            Storage::Growable(items) => items.iter_mut(),
            Storage::Counting(_) => [].iter_mut(),
        }
    }

    pub fn iter_enumerated(&self) -> impl Iterator<Item = (Key<T>, &T)> {
        self.iter().enumerate().map(|(i, item)| (Key::new(i as u32), item))
    }

    pub fn into_vec(self) -> Vec<T> {
        match self.storage {
            Storage::Growable(items) => items,
            Storage::Counting(_) => Vec::new(),
        }
    }
}

impl<T: Default> Arena<T> {
    /// Appends `n` default elements and returns them for filling in.
    ///
    /// A counting arena only advances its count and returns an empty slice.
    pub fn append(&mut self, n: usize) -> &mut [T] {
        match &mut self.storage {
            Storage::Growable(items) => {
                reserve(items, n);
                let start = items.len();
                items.resize_with(start + n, T::default);
                &mut items[start..]
            }
            Storage::Counting(count) => {
                *count += n;
                &mut []
            }
        }
    }
}

impl<T: Copy + Default> Arena<T> {
    pub fn extend_from_slice(&mut self, values: &[T]) {
        let slots = self.append(values.len());
        if !slots.is_empty() {
            slots.copy_from_slice(values);
        }
    }
}

fn reserve<T>(items: &mut Vec<T>, additional: usize) {
    let needed = items.len() + additional;
    if needed <= items.capacity() {
        return;
    }

    let target = needed.next_power_of_two().max(MIN_BLOCK);
    items.reserve_exact(target - items.len());
}

impl<T> Index<Key<T>> for Arena<T> {
    type Output = T;

    #[track_caller]
    fn index(&self, index: Key<T>) -> &Self::Output {
        &self.as_slice()[index.to_usize()]
    }
}

impl<T> IndexMut<Key<T>> for Arena<T> {
    #[track_caller]
    fn index_mut(&mut self, index: Key<T>) -> &mut Self::Output {
        match &mut self.storage {
            Storage::Growable(items) => &mut items[index.to_usize()],
            Storage::Counting(_) => panic!("counting arena has no element {}", index.index()),
        }
    }
}
