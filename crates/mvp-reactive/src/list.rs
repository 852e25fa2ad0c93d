#![forbid(unsafe_code)]

//! Observable ordered list.

use std::cell::RefCell;
use std::fmt;

use mvp_core::event::{Event, ListenerId};

/// An ordered list that announces additions and removals.
///
/// Every mutating operation takes `&self`, so a list can live inside a
/// shared model and be mutated from handlers. Per-item notifications fire
/// after the item is committed and outside any borrow.
pub struct ReactiveList<T> {
    items: RefCell<Vec<T>>,
    // Reused by `remove_all` so bulk removal does not allocate per call.
    scratch: RefCell<Vec<T>>,
    on_item_added: Event<T>,
    on_item_removed: Event<T>,
}

impl<T: Clone + 'static> Default for ReactiveList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for ReactiveList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.items.borrow().iter()).finish()
    }
}

impl<T: Clone + 'static> ReactiveList<T> {
    /// Create an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::from_vec(Vec::new())
    }

    /// Wrap existing items without announcing them.
    #[must_use]
    pub fn from_vec(items: Vec<T>) -> Self {
        Self {
            items: RefCell::new(items),
            scratch: RefCell::new(Vec::new()),
            on_item_added: Event::new(),
            on_item_removed: Event::new(),
        }
    }

    /// Event fired with every added item.
    #[must_use]
    pub fn on_item_added(&self) -> &Event<T> {
        &self.on_item_added
    }

    /// Event fired with every removed item.
    #[must_use]
    pub fn on_item_removed(&self) -> &Event<T> {
        &self.on_item_removed
    }

    /// Subscribe to additions.
    pub fn subscribe_added(&self, handler: impl Fn(&T) + 'static) -> ListenerId {
        self.on_item_added.add_listener(handler)
    }

    /// Subscribe to removals.
    pub fn subscribe_removed(&self, handler: impl Fn(&T) + 'static) -> ListenerId {
        self.on_item_removed.add_listener(handler)
    }

    /// Append `item`, announcing it unless `silently`.
    pub fn add(&self, item: T, silently: bool) {
        if silently {
            self.items.borrow_mut().push(item);
            return;
        }
        self.items.borrow_mut().push(item.clone());
        self.on_item_added.emit(&item);
    }

    /// Remove the item at `index`, announcing it unless `silently`.
    /// Out-of-range indices return `None`.
    pub fn remove_at(&self, index: usize, silently: bool) -> Option<T> {
        let removed = {
            let mut items = self.items.borrow_mut();
            (index < items.len()).then(|| items.remove(index))
        }?;
        if !silently {
            self.on_item_removed.emit(&removed);
        }
        Some(removed)
    }

    /// Remove the first item matching `pred`.
    pub fn remove_where(&self, pred: impl Fn(&T) -> bool, silently: bool) -> Option<T> {
        let index = self.items.borrow().iter().position(pred)?;
        self.remove_at(index, silently)
    }

    /// Remove every item without notifying anyone.
    pub fn clear(&self) {
        let drained = std::mem::take(&mut *self.items.borrow_mut());
        drop(drained);
    }

    /// Remove every observer of both events.
    pub fn clear_listeners(&self) {
        self.on_item_added.remove_all_listeners();
        self.on_item_removed.remove_all_listeners();
    }

    /// Clone of the item at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<T> {
        self.items.borrow().get(index).cloned()
    }

    /// Replace the item at `index` without notifying. Returns the previous
    /// item, or `None` if out of range.
    pub fn set(&self, index: usize, item: T) -> Option<T> {
        self.items
            .borrow_mut()
            .get_mut(index)
            .map(|slot| std::mem::replace(slot, item))
    }

    /// First item matching `pred`.
    #[must_use]
    pub fn find(&self, pred: impl Fn(&T) -> bool) -> Option<T> {
        self.items.borrow().iter().find(|item| pred(item)).cloned()
    }

    /// Index of the first item matching `pred`.
    #[must_use]
    pub fn find_index(&self, pred: impl Fn(&T) -> bool) -> Option<usize> {
        self.items.borrow().iter().position(pred)
    }

    /// Replace the contents of `out` with every item matching `pred`.
    /// Returns how many matched.
    pub fn find_all(&self, pred: impl Fn(&T) -> bool, out: &mut Vec<T>) -> usize {
        out.clear();
        out.extend(self.items.borrow().iter().filter(|item| pred(item)).cloned());
        out.len()
    }

    /// Sort in place with `compare`, without notifying.
    pub fn sort_by(&self, compare: impl FnMut(&T, &T) -> std::cmp::Ordering) {
        self.items.borrow_mut().sort_by(compare);
    }

    /// Borrow the items as a slice for the duration of `f`.
    pub fn with<R>(&self, f: impl FnOnce(&[T]) -> R) -> R {
        f(&self.items.borrow())
    }

    /// Snapshot of the items.
    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        self.items.borrow().clone()
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    /// Whether the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }
}

impl<T: Clone + PartialEq + 'static> ReactiveList<T> {
    /// Remove the first item equal to `item`. Returns whether one was found.
    pub fn remove(&self, item: &T, silently: bool) -> bool {
        self.remove_where(|candidate| candidate == item, silently)
            .is_some()
    }

    /// Remove every item one at a time, in order. Each removal is committed
    /// before it is announced, so handlers see the list shrinking.
    pub fn remove_all(&self) {
        let mut scratch = self.scratch.take();
        scratch.extend(self.items.borrow().iter().cloned());
        for item in scratch.drain(..) {
            self.remove(&item, false);
        }
        *self.scratch.borrow_mut() = scratch;
    }

    /// Whether an item equal to `item` is present.
    #[must_use]
    pub fn contains(&self, item: &T) -> bool {
        self.items.borrow().contains(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    fn log<T: Clone + 'static>(event: &Event<T>) -> Rc<RefCell<Vec<T>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        event.add_listener(move |v: &T| sink.borrow_mut().push(v.clone()));
        seen
    }

    #[test]
    fn add_and_remove_notify() {
        let list = ReactiveList::new();
        let added = log(list.on_item_added());
        let removed = log(list.on_item_removed());

        list.add("a", false);
        list.add("b", false);
        list.add("c", true);
        assert!(list.remove(&"a", false));
        assert!(!list.remove(&"zz", false));

        assert_eq!(*added.borrow(), vec!["a", "b"]);
        assert_eq!(*removed.borrow(), vec!["a"]);
        assert_eq!(list.to_vec(), vec!["b", "c"]);
    }

    #[test]
    fn remove_all_announces_each_item() {
        let list = ReactiveList::from_vec(vec![1, 2, 3]);
        let removed = log(list.on_item_removed());
        list.remove_all();
        assert!(list.is_empty());
        assert_eq!(*removed.borrow(), vec![1, 2, 3]);

        list.add(4, true);
        list.remove_all();
        assert_eq!(*removed.borrow(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn remove_all_handlers_see_shrinking_list() {
        let list = Rc::new(ReactiveList::from_vec(vec!['a', 'b', 'c']));
        let lengths = Rc::new(RefCell::new(Vec::new()));
        let (target, sink) = (Rc::clone(&list), Rc::clone(&lengths));
        list.subscribe_removed(move |_| sink.borrow_mut().push(target.len()));
        list.remove_all();
        assert_eq!(*lengths.borrow(), vec![2, 1, 0]);
    }

    #[test]
    fn removal_handler_may_add_back() {
        let list = Rc::new(ReactiveList::from_vec(vec![1, 2]));
        let target = Rc::clone(&list);
        list.subscribe_removed(move |v| {
            if *v == 2 {
                target.add(99, true);
            }
        });
        list.remove_all();
        assert_eq!(list.to_vec(), vec![99]);
    }

    #[test]
    fn clear_is_silent() {
        let list = ReactiveList::from_vec(vec![1, 2]);
        let removed = log(list.on_item_removed());
        list.clear();
        assert!(list.is_empty());
        assert!(removed.borrow().is_empty());
    }

    #[test]
    fn queries() {
        let list = ReactiveList::from_vec(vec![5, 3, 8, 3]);
        assert_eq!(list.get(2), Some(8));
        assert_eq!(list.get(9), None);
        assert_eq!(list.find(|v| *v > 4), Some(5));
        assert_eq!(list.find_index(|v| *v == 3), Some(1));
        assert!(list.contains(&8));

        let mut buf = vec![100];
        assert_eq!(list.find_all(|v| *v == 3, &mut buf), 2);
        assert_eq!(buf, vec![3, 3]);

        list.sort_by(|a, b| a.cmp(b));
        assert_eq!(list.to_vec(), vec![3, 3, 5, 8]);
        assert_eq!(list.set(0, 1), Some(3));
        assert_eq!(list.with(|items| items.iter().sum::<i32>()), 17);
    }

    #[test]
    fn remove_at_out_of_range() {
        let list = ReactiveList::from_vec(vec!['x']);
        let removed = log(list.on_item_removed());
        assert_eq!(list.remove_at(3, false), None);
        assert_eq!(list.remove_at(0, false), Some('x'));
        assert_eq!(*removed.borrow(), vec!['x']);
    }
}
