//! In-memory gateway and item store
//!
//! Both types are cheap handles over shared state: a clone handed to the
//! editor and a clone kept by a test observe the same documents. Saves can be
//! made to fail on demand.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::{PersistenceError, PersistenceResult};
use crate::layout::{ContainerTree, LayoutValidator};
use crate::models::Item;

use super::{ItemStore, LayoutDocument, PersistenceGateway, load_first_valid};

#[derive(Debug, Default)]
struct LayoutState {
    staged: Option<String>,
    committed: Option<String>,
    fail_saves: bool,
    fail_commits: bool,
    save_count: usize,
}

/// Layout gateway that keeps serialized documents in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryPersistence {
    state: Rc<RefCell<LayoutState>>,
    validator: LayoutValidator,
}

impl MemoryPersistence {
    /// Creates an empty gateway validating loads with `validator`.
    #[must_use]
    pub fn new(validator: LayoutValidator) -> Self {
        Self {
            state: Rc::default(),
            validator,
        }
    }

    /// Creates a gateway whose committed copy is `tree`.
    ///
    /// # Errors
    ///
    /// Returns an error if the tree cannot be serialized.
    pub fn with_committed(validator: LayoutValidator, tree: &ContainerTree) -> PersistenceResult<Self> {
        let gateway = Self::new(validator);
        gateway.state.borrow_mut().committed = Some(LayoutDocument::from_tree(tree).to_json()?);
        Ok(gateway)
    }

    /// Makes every following `save_staged` fail (or succeed again).
    pub fn set_fail_saves(&self, fail: bool) {
        self.state.borrow_mut().fail_saves = fail;
    }

    /// Makes every following `commit` fail (or succeed again).
    pub fn set_fail_commits(&self, fail: bool) {
        self.state.borrow_mut().fail_commits = fail;
    }

    /// Replaces the staged document with raw text.
    pub fn set_staged_raw(&self, text: impl Into<String>) {
        self.state.borrow_mut().staged = Some(text.into());
    }

    /// Number of successful `save_staged` calls.
    #[must_use]
    pub fn save_count(&self) -> usize {
        self.state.borrow().save_count
    }

    /// The staged tree, if present and valid.
    #[must_use]
    pub fn staged_tree(&self) -> Option<ContainerTree> {
        let state = self.state.borrow();
        state
            .staged
            .as_deref()
            .and_then(|text| LayoutDocument::decode(text, &self.validator).ok())
    }

    /// The committed tree, if present and valid.
    #[must_use]
    pub fn committed_tree(&self) -> Option<ContainerTree> {
        let state = self.state.borrow();
        state
            .committed
            .as_deref()
            .and_then(|text| LayoutDocument::decode(text, &self.validator).ok())
    }
}

impl PersistenceGateway for MemoryPersistence {
    fn save_staged(&mut self, tree: &ContainerTree) -> PersistenceResult<()> {
        let mut state = self.state.borrow_mut();
        if state.fail_saves {
            return Err(PersistenceError::Injected("save_staged".to_string()));
        }
        state.staged = Some(LayoutDocument::from_tree(tree).to_json()?);
        state.save_count += 1;
        Ok(())
    }

    fn commit(&mut self, tree: &ContainerTree) -> PersistenceResult<()> {
        let mut state = self.state.borrow_mut();
        if state.fail_commits {
            return Err(PersistenceError::Injected("commit".to_string()));
        }
        state.committed = Some(LayoutDocument::from_tree(tree).to_json()?);
        state.staged = None;
        Ok(())
    }

    fn revert(&mut self) -> PersistenceResult<()> {
        self.state.borrow_mut().staged = None;
        Ok(())
    }

    fn load(&self) -> ContainerTree {
        let (staged, committed) = {
            let state = self.state.borrow();
            (state.staged.clone(), state.committed.clone())
        };
        load_first_valid(
            [("staged", Ok(staged)), ("committed", Ok(committed))],
            &self.validator,
        )
    }

    fn has_staged(&self) -> bool {
        self.state.borrow().staged.is_some()
    }
}

#[derive(Debug, Default)]
struct ItemState {
    lists: HashMap<String, Vec<Item>>,
    fail_saves: bool,
    fail_deletes: bool,
}

/// Item store that keeps lists in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryItemStore {
    state: Rc<RefCell<ItemState>>,
}

impl MemoryItemStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the list of `name`.
    pub fn insert(&self, name: impl Into<String>, items: Vec<Item>) {
        self.state.borrow_mut().lists.insert(name.into(), items);
    }

    /// The stored list of `name`, if any.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Vec<Item>> {
        self.state.borrow().lists.get(name).cloned()
    }

    /// Returns true if a list is stored for `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.state.borrow().lists.contains_key(name)
    }

    /// Makes every following save fail (or succeed again).
    pub fn set_fail_saves(&self, fail: bool) {
        self.state.borrow_mut().fail_saves = fail;
    }

    /// Makes every following delete fail (or succeed again).
    pub fn set_fail_deletes(&self, fail: bool) {
        self.state.borrow_mut().fail_deletes = fail;
    }
}

impl ItemStore for MemoryItemStore {
    fn load_items(&self, name: &str) -> PersistenceResult<Vec<Item>> {
        Ok(self.get(name).unwrap_or_default())
    }

    fn save_items(&mut self, name: &str, items: &[Item]) -> PersistenceResult<()> {
        let mut state = self.state.borrow_mut();
        if state.fail_saves {
            return Err(PersistenceError::Injected(format!("save_items({name})")));
        }
        state.lists.insert(name.to_string(), items.to_vec());
        Ok(())
    }

    fn delete_items(&mut self, name: &str) -> PersistenceResult<()> {
        let mut state = self.state.borrow_mut();
        if state.fail_deletes {
            return Err(PersistenceError::Injected(format!("delete_items({name})")));
        }
        state.lists.remove(name);
        Ok(())
    }

    fn rename_items(&mut self, old: &str, new: &str) -> PersistenceResult<()> {
        let mut state = self.state.borrow_mut();
        if state.fail_saves {
            return Err(PersistenceError::Injected(format!("rename_items({old})")));
        }
        if let Some(items) = state.lists.remove(old) {
            state.lists.insert(new.to_string(), items);
        }
        Ok(())
    }
}
