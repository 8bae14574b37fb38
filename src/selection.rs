//! Multi-select selection tracking with synchronous change notification.

use std::collections::HashSet;
use std::hash::Hash;

/// Items added to and removed from the selection by one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionChange<T> {
    pub added: Vec<T>,
    pub removed: Vec<T>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener<T> = Box<dyn FnMut(&SelectionChange<T>)>;

/// Ordered set of selected items.
///
/// Every mutating call emits at most one [`SelectionChange`], and only when
/// the selection actually changed. Listeners run synchronously, in
/// subscription order, before the mutating call returns.
pub struct SelectionModel<T> {
    selected: Vec<T>,
    members: HashSet<T>,
    listeners: Vec<(SubscriptionId, Listener<T>)>,
    next_id: u64,
}

impl<T: Clone + Eq + Hash> Default for SelectionModel<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Eq + Hash> SelectionModel<T> {
    pub fn new() -> Self {
        Self {
            selected: Vec::new(),
            members: HashSet::new(),
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    /// Starts with `initial` selected. No event is emitted.
    pub fn with_selected(initial: impl IntoIterator<Item = T>) -> Self {
        let mut model = Self::new();
        for item in initial {
            model.insert(item);
        }
        model
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&SelectionChange<T>) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns false if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sub, _)| *sub != id);
        self.listeners.len() != before
    }

    pub fn select(&mut self, item: T) {
        if self.insert(item.clone()) {
            self.emit(vec![item], Vec::new());
        }
    }

    pub fn deselect(&mut self, item: &T) {
        if self.remove(item) {
            self.emit(Vec::new(), vec![item.clone()]);
        }
    }

    pub fn toggle(&mut self, item: T) {
        if self.is_selected(&item) {
            self.deselect(&item);
        } else {
            self.select(item);
        }
    }

    pub fn clear(&mut self) {
        if self.selected.is_empty() {
            return;
        }
        self.members.clear();
        let removed = std::mem::take(&mut self.selected);
        self.emit(Vec::new(), removed);
    }

    /// Selects every item not already selected; the event lists only those.
    pub fn select_all<'a>(&mut self, items: impl IntoIterator<Item = &'a T>)
    where
        T: 'a,
    {
        let added: Vec<T> = items
            .into_iter()
            .filter(|item| self.insert((*item).clone()))
            .cloned()
            .collect();
        if !added.is_empty() {
            self.emit(added, Vec::new());
        }
    }

    pub fn deselect_all<'a>(&mut self, items: impl IntoIterator<Item = &'a T>)
    where
        T: 'a,
    {
        let removed: Vec<T> = items
            .into_iter()
            .filter(|item| self.remove(item))
            .cloned()
            .collect();
        if !removed.is_empty() {
            self.emit(Vec::new(), removed);
        }
    }

    /// Replaces the selection with `items`, in their order.
    pub fn set_selection(&mut self, items: impl IntoIterator<Item = T>) {
        let mut next = Vec::new();
        let mut next_members = HashSet::new();
        for item in items {
            if next_members.insert(item.clone()) {
                next.push(item);
            }
        }

        let removed: Vec<T> = self
            .selected
            .iter()
            .filter(|item| !next_members.contains(*item))
            .cloned()
            .collect();
        let added: Vec<T> = next
            .iter()
            .filter(|item| !self.members.contains(*item))
            .cloned()
            .collect();

        self.selected = next;
        self.members = next_members;
        if !added.is_empty() || !removed.is_empty() {
            self.emit(added, removed);
        }
    }

    /// Drops every selected item for which `keep` returns false.
    pub fn retain(&mut self, mut keep: impl FnMut(&T) -> bool) {
        let (kept, removed): (Vec<T>, Vec<T>) = std::mem::take(&mut self.selected)
            .into_iter()
            .partition(|item| keep(item));
        self.selected = kept;
        for item in &removed {
            self.members.remove(item);
        }
        if !removed.is_empty() {
            self.emit(Vec::new(), removed);
        }
    }

    pub fn is_selected(&self, item: &T) -> bool {
        self.members.contains(item)
    }

    /// Current selection, in selection order.
    pub fn selected(&self) -> &[T] {
        &self.selected
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    fn insert(&mut self, item: T) -> bool {
        if self.members.insert(item.clone()) {
            self.selected.push(item);
            true
        } else {
            false
        }
    }

    fn remove(&mut self, item: &T) -> bool {
        if self.members.remove(item) {
            self.selected.retain(|selected| selected != item);
            true
        } else {
            false
        }
    }

    fn emit(&mut self, added: Vec<T>, removed: Vec<T>) {
        let change = SelectionChange { added, removed };
        for (_, listener) in self.listeners.iter_mut() {
            listener(&change);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorded(model: &mut SelectionModel<&'static str>) -> Rc<RefCell<Vec<SelectionChange<&'static str>>>> {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();
        model.subscribe(move |change| sink.borrow_mut().push(change.clone()));
        events
    }

    #[test]
    fn select_emits_once_per_new_item() {
        let mut model = SelectionModel::new();
        let events = recorded(&mut model);

        model.select("a");
        model.select("a");

        assert_eq!(model.selected(), &["a"]);
        assert_eq!(events.borrow().len(), 1);
        assert_eq!(events.borrow()[0].added, vec!["a"]);
        assert!(events.borrow()[0].removed.is_empty());
    }

    #[test]
    fn deselect_missing_item_is_silent() {
        let mut model = SelectionModel::new();
        let events = recorded(&mut model);

        model.deselect(&"x");
        model.select("x");
        model.deselect(&"x");

        let events = events.borrow();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].removed, vec!["x"]);
        assert!(model.is_empty());
    }

    #[test]
    fn replay_matches_set_semantics() {
        let ops: &[(&str, &str)] = &[
            ("select", "a"),
            ("toggle", "b"),
            ("select", "c"),
            ("deselect", "a"),
            ("toggle", "c"),
            ("toggle", "a"),
            ("select", "b"),
            ("deselect", "z"),
            ("toggle", "d"),
        ];
        let mut model = SelectionModel::new();
        let mut expected: Vec<&str> = Vec::new();
        for (op, item) in ops {
            match *op {
                "select" => {
                    model.select(*item);
                    if !expected.contains(item) {
                        expected.push(*item);
                    }
                }
                "deselect" => {
                    model.deselect(item);
                    expected.retain(|e| e != item);
                }
                _ => {
                    model.toggle(*item);
                    if expected.contains(item) {
                        expected.retain(|e| e != item);
                    } else {
                        expected.push(*item);
                    }
                }
            }
        }
        assert_eq!(model.selected(), expected.as_slice());
        assert_eq!(model.selected(), &["b", "a", "d"]);
    }

    #[test]
    fn clear_reports_prior_selection_in_order() {
        let mut model = SelectionModel::new();
        let events = recorded(&mut model);

        model.clear();
        assert!(events.borrow().is_empty());

        model.select("c");
        model.select("a");
        model.select("b");
        events.borrow_mut().clear();

        model.clear();
        let events = events.borrow();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].removed, vec!["c", "a", "b"]);
        assert!(model.is_empty());
        assert!(!model.is_selected(&"a"));
    }

    #[test]
    fn select_all_is_idempotent() {
        let mut model = SelectionModel::with_selected(["b"]);
        let events = recorded(&mut model);
        let items = ["a", "b", "c"];

        model.select_all(&items);
        model.select_all(&items);

        let events = events.borrow();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].added, vec!["a", "c"]);
        assert_eq!(model.selected(), &["b", "a", "c"]);
    }

    #[test]
    fn deselect_all_lists_only_removed_items() {
        let mut model = SelectionModel::with_selected(["a", "b", "c"]);
        let events = recorded(&mut model);

        model.deselect_all(&["c", "x", "a"]);

        assert_eq!(events.borrow()[0].removed, vec!["c", "a"]);
        assert_eq!(model.selected(), &["b"]);
    }

    #[test]
    fn set_selection_reports_diff() {
        let mut model = SelectionModel::with_selected(["a", "b"]);
        let events = recorded(&mut model);

        model.set_selection(["b", "c", "c"]);
        model.set_selection(["b", "c"]);

        let events = events.borrow();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].added, vec!["c"]);
        assert_eq!(events[0].removed, vec!["a"]);
        assert_eq!(model.selected(), &["b", "c"]);
    }

    #[test]
    fn retain_drops_members_in_one_event() {
        let mut model = SelectionModel::with_selected(["a", "b", "c"]);
        let events = recorded(&mut model);

        model.retain(|item| *item == "b");
        model.retain(|_| true);

        assert_eq!(events.borrow().len(), 1);
        assert_eq!(events.borrow()[0].removed, vec!["a", "c"]);
        assert_eq!(model.len(), 1);
    }

    #[test]
    fn listeners_run_in_order_and_can_unsubscribe() {
        let mut model = SelectionModel::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let first = log.clone();
        let second = log.clone();
        let id = model.subscribe(move |_| first.borrow_mut().push(1));
        model.subscribe(move |_| second.borrow_mut().push(2));

        model.select("a");
        assert!(model.unsubscribe(id));
        assert!(!model.unsubscribe(id));
        model.select("b");

        assert_eq!(*log.borrow(), vec![1, 2, 2]);
    }
}
