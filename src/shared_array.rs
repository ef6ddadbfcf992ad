use std::cell::{Ref, RefMut};
use std::fmt;

use crate::control::Handle;
use crate::error::PointerError;

/// Shared-ownership pointer to a heap slice.
///
/// Same counting discipline as [`SharedPtr`](crate::SharedPtr); the storage is
/// a boxed slice released as a whole. Indexed access is checked against the
/// slice length.
pub struct SharedArray<T> {
    handle: Handle<Box<[T]>>,
    len: usize,
}

impl<T> SharedArray<T> {
    pub fn new(items: impl Into<Box<[T]>>) -> Self {
        let items = items.into();
        let len = items.len();
        SharedArray {
            handle: Handle::new(items),
            len,
        }
    }

    pub fn with_len(len: usize) -> Self
    where
        T: Default,
    {
        Self::new((0..len).map(|_| T::default()).collect::<Vec<_>>())
    }

    pub const fn null() -> Self {
        SharedArray {
            handle: Handle::null(),
            len: 0,
        }
    }

    pub fn is_some(&self) -> bool {
        self.handle.is_some()
    }

    pub fn is_null(&self) -> bool {
        !self.handle.is_some()
    }

    /// Element count; a null handle reports `0`.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn strong_count(&self) -> usize {
        self.handle.strong_count()
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.handle.ptr_eq(&other.handle)
    }

    pub fn get(&self) -> Result<Ref<'_, [T]>, PointerError> {
        let items = self.handle.borrow()?;
        Ok(Ref::map(items, |items| &**items))
    }

    pub fn get_mut(&self) -> Result<RefMut<'_, [T]>, PointerError> {
        let items = self.handle.borrow_mut()?;
        Ok(RefMut::map(items, |items| &mut **items))
    }

    pub fn index(&self, index: usize) -> Result<Ref<'_, T>, PointerError> {
        let len = self.len;
        let items = self.handle.borrow()?;
        Ref::filter_map(items, |items| items.get(index))
            .map_err(|_| PointerError::IndexOutOfBounds { index, len })
    }

    pub fn index_mut(&self, index: usize) -> Result<RefMut<'_, T>, PointerError> {
        let len = self.len;
        let items = self.handle.borrow_mut()?;
        RefMut::filter_map(items, |items| items.get_mut(index))
            .map_err(|_| PointerError::IndexOutOfBounds { index, len })
    }

    pub fn with<R>(&self, f: impl FnOnce(&[T]) -> R) -> Result<R, PointerError> {
        let items = self.get()?;
        Ok(f(&items))
    }

    pub fn with_mut<R>(&self, f: impl FnOnce(&mut [T]) -> R) -> Result<R, PointerError> {
        let mut items = self.get_mut()?;
        Ok(f(&mut items))
    }

    pub fn to_vec(&self) -> Result<Vec<T>, PointerError>
    where
        T: Clone,
    {
        self.with(<[T]>::to_vec)
    }

    pub fn assign(&mut self, other: &Self) {
        self.handle.assign(&other.handle);
        self.len = other.len;
    }

    pub fn reset(&mut self) {
        self.handle.release();
        self.len = 0;
    }
}

impl<T> Clone for SharedArray<T> {
    fn clone(&self) -> Self {
        SharedArray {
            handle: self.handle.clone(),
            len: self.len,
        }
    }

    fn clone_from(&mut self, source: &Self) {
        self.assign(source);
    }
}

impl<T> Default for SharedArray<T> {
    fn default() -> Self {
        Self::null()
    }
}

impl<T> From<Vec<T>> for SharedArray<T> {
    fn from(items: Vec<T>) -> Self {
        Self::new(items)
    }
}

impl<T: fmt::Debug> fmt::Debug for SharedArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.get() {
            Ok(items) => f
                .debug_struct("SharedArray")
                .field("items", &&*items)
                .field("count", &self.strong_count())
                .finish(),
            Err(PointerError::NullDereference) => f.write_str("SharedArray(null)"),
            Err(_) => f
                .debug_struct("SharedArray")
                .field("len", &self.len)
                .field("count", &self.strong_count())
                .finish(),
        }
    }
}
