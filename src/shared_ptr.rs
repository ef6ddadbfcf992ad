use std::cell::{Ref, RefMut};
use std::fmt;

use crate::control::Handle;
use crate::error::PointerError;

/// Shared-ownership pointer to a single heap value.
///
/// Clones share one allocation and one counter. The value is dropped exactly
/// once, when the last handle of the family is dropped, reset, or reassigned.
/// A handle may also be null; every accessor then fails with
/// [`PointerError::NullDereference`].
///
/// ```
/// use shared_pointer::SharedPtr;
///
/// let first = SharedPtr::new(42);
/// let second = first.clone();
/// assert_eq!(first.strong_count(), 2);
/// *second.get_mut().unwrap() += 1;
/// assert_eq!(*first.get().unwrap(), 43);
/// ```
pub struct SharedPtr<T> {
    handle: Handle<T>,
}

impl<T> SharedPtr<T> {
    pub fn new(value: T) -> Self {
        SharedPtr {
            handle: Handle::new(value),
        }
    }

    pub const fn null() -> Self {
        SharedPtr {
            handle: Handle::null(),
        }
    }

    pub fn is_some(&self) -> bool {
        self.handle.is_some()
    }

    pub fn is_null(&self) -> bool {
        !self.handle.is_some()
    }

    /// Number of live handles bound to this handle's allocation, `0` when null.
    pub fn strong_count(&self) -> usize {
        self.handle.strong_count()
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.handle.ptr_eq(&other.handle)
    }

    pub fn get(&self) -> Result<Ref<'_, T>, PointerError> {
        self.handle.borrow()
    }

    pub fn get_mut(&self) -> Result<RefMut<'_, T>, PointerError> {
        self.handle.borrow_mut()
    }

    /// Member access: runs `f` against the pointee.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> Result<R, PointerError> {
        let value = self.get()?;
        Ok(f(&value))
    }

    pub fn with_mut<R>(&self, f: impl FnOnce(&mut T) -> R) -> Result<R, PointerError> {
        let mut value = self.get_mut()?;
        Ok(f(&mut value))
    }

    /// Stores `value` in the shared allocation and returns the previous one.
    pub fn replace(&self, value: T) -> Result<T, PointerError> {
        let mut slot = self.get_mut()?;
        Ok(std::mem::replace(&mut *slot, value))
    }

    /// Rebinds this handle to `other`'s allocation, releasing the current one
    /// if this was its last handle.
    pub fn assign(&mut self, other: &Self) {
        self.handle.assign(&other.handle);
    }

    pub fn reset(&mut self) {
        self.handle.release();
    }
}

impl<T> Clone for SharedPtr<T> {
    fn clone(&self) -> Self {
        SharedPtr {
            handle: self.handle.clone(),
        }
    }

    fn clone_from(&mut self, source: &Self) {
        self.assign(source);
    }
}

impl<T> Default for SharedPtr<T> {
    fn default() -> Self {
        Self::null()
    }
}

impl<T> From<Option<T>> for SharedPtr<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or_else(Self::null, Self::new)
    }
}

impl<T: fmt::Debug> fmt::Debug for SharedPtr<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.get() {
            Ok(value) => f
                .debug_struct("SharedPtr")
                .field("value", &*value)
                .field("count", &self.strong_count())
                .finish(),
            Err(PointerError::NullDereference) => f.write_str("SharedPtr(null)"),
            Err(_) => f
                .debug_struct("SharedPtr")
                .field("value", &format_args!("<borrowed>"))
                .field("count", &self.strong_count())
                .finish(),
        }
    }
}
