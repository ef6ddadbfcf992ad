// Per-allocation control block shared by the scalar and array handles.
//
// Every allocation owns its own counter. Handles bound to different
// allocations never touch each other's count.
use std::cell::{Cell, Ref, RefCell, RefMut};
use std::marker::PhantomData;
use std::ptr::NonNull;

use crate::error::PointerError;

struct ControlBlock<S> {
    count: Cell<usize>,
    storage: RefCell<S>,
}

pub(crate) struct Handle<S> {
    block: Option<NonNull<ControlBlock<S>>>,
    _owns: PhantomData<ControlBlock<S>>,
}

impl<S> Handle<S> {
    pub(crate) fn new(storage: S) -> Self {
        let block = Box::new(ControlBlock {
            count: Cell::new(1),
            storage: RefCell::new(storage),
        });
        let ptr = NonNull::from(Box::leak(block));
        log::trace!("allocated shared block {:p}", ptr);
        Handle {
            block: Some(ptr),
            _owns: PhantomData,
        }
    }

    pub(crate) const fn null() -> Self {
        Handle {
            block: None,
            _owns: PhantomData,
        }
    }

    fn block(&self) -> Option<&ControlBlock<S>> {
        // SAFETY: a bound handle keeps the count above zero, so the block
        // outlives any borrow of `self`.
        self.block.as_ref().map(|ptr| unsafe { ptr.as_ref() })
    }

    pub(crate) fn is_some(&self) -> bool {
        self.block.is_some()
    }

    pub(crate) fn strong_count(&self) -> usize {
        self.block().map_or(0, |block| block.count.get())
    }

    pub(crate) fn ptr_eq(&self, other: &Self) -> bool {
        self.block == other.block
    }

    pub(crate) fn borrow(&self) -> Result<Ref<'_, S>, PointerError> {
        let block = self.block().ok_or(PointerError::NullDereference)?;
        block.storage.try_borrow().map_err(|_| PointerError::Borrowed)
    }

    pub(crate) fn borrow_mut(&self) -> Result<RefMut<'_, S>, PointerError> {
        let block = self.block().ok_or(PointerError::NullDereference)?;
        block
            .storage
            .try_borrow_mut()
            .map_err(|_| PointerError::Borrowed)
    }

    /// Drops this handle's claim first, then binds to `other`'s allocation.
    /// Handles already sharing an allocation are left untouched.
    pub(crate) fn assign(&mut self, other: &Self) {
        if self.ptr_eq(other) {
            return;
        }
        self.release();
        if let Some(block) = other.block() {
            block.count.set(block.count.get() + 1);
            log::trace!(
                "assigned shared block {:p} (count {})",
                block,
                block.count.get()
            );
        }
        self.block = other.block;
    }

    /// Decrements the bound allocation and frees it when this was the last handle.
    /// Leaves `self` null.
    pub(crate) fn release(&mut self) {
        let Some(ptr) = self.block.take() else {
            return;
        };
        // SAFETY: the pointer was bound until the `take` above, so the block is live.
        let block = unsafe { ptr.as_ref() };
        let remaining = block.count.get() - 1;
        block.count.set(remaining);
        if remaining == 0 {
            log::debug!("releasing shared block {:p}", ptr);
            // SAFETY: the count hit zero, so no other handle refers to the block,
            // and it was created by `Box::leak` in `new`.
            drop(unsafe { Box::from_raw(ptr.as_ptr()) });
        }
    }
}

impl<S> Clone for Handle<S> {
    fn clone(&self) -> Self {
        if let Some(block) = self.block() {
            block.count.set(block.count.get() + 1);
            log::trace!("cloned shared block {:p} (count {})", block, block.count.get());
        }
        Handle {
            block: self.block,
            _owns: PhantomData,
        }
    }
}

impl<S> Drop for Handle<S> {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    struct DropCounter(Rc<Cell<usize>>);

    impl Drop for DropCounter {
        fn drop(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    fn counted() -> (Handle<DropCounter>, Rc<Cell<usize>>) {
        let drops = Rc::new(Cell::new(0));
        (Handle::new(DropCounter(Rc::clone(&drops))), drops)
    }

    #[test]
    fn test_new_handle_counts_one() {
        let (handle, drops) = counted();
        assert!(handle.is_some());
        assert_eq!(handle.strong_count(), 1);
        drop(handle);
        assert_eq!(drops.get(), 1);
    }

    #[test]
    fn test_null_handle_has_no_count() {
        let handle: Handle<i32> = Handle::null();
        assert!(!handle.is_some());
        assert_eq!(handle.strong_count(), 0);
        assert_eq!(handle.borrow().err(), Some(PointerError::NullDereference));
        assert_eq!(handle.borrow_mut().err(), Some(PointerError::NullDereference));
    }

    #[test]
    fn test_clone_shares_block() {
        let (first, drops) = counted();
        let second = first.clone();
        assert!(first.ptr_eq(&second));
        assert_eq!(first.strong_count(), 2);
        drop(first);
        assert_eq!(drops.get(), 0);
        assert_eq!(second.strong_count(), 1);
        drop(second);
        assert_eq!(drops.get(), 1);
    }

    #[test]
    fn test_assign_releases_previous_target() {
        let (mut target, old_drops) = counted();
        let (source, new_drops) = counted();
        target.assign(&source);
        assert_eq!(old_drops.get(), 1);
        assert_eq!(new_drops.get(), 0);
        assert_eq!(source.strong_count(), 2);
        drop(source);
        drop(target);
        assert_eq!(new_drops.get(), 1);
    }

    #[test]
    fn test_assign_within_family_is_noop() {
        let (mut first, drops) = counted();
        let second = first.clone();
        first.assign(&second);
        assert_eq!(first.strong_count(), 2);
        assert_eq!(drops.get(), 0);
    }

    #[test]
    fn test_assign_null_then_release_twice() {
        let (mut handle, drops) = counted();
        handle.assign(&Handle::null());
        assert_eq!(drops.get(), 1);
        assert!(!handle.is_some());
        handle.release();
        assert_eq!(drops.get(), 1);
    }

    #[test]
    fn test_conflicting_borrows_are_reported() {
        let handle = Handle::new(5);
        let guard = handle.borrow_mut().unwrap();
        assert_eq!(handle.borrow().err(), Some(PointerError::Borrowed));
        drop(guard);
        assert_eq!(*handle.borrow().unwrap(), 5);
    }
}
