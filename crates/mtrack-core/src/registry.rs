//! Registry mapping user names to their ledgers.

use std::{fmt, sync::Arc};

use tracing::info;

use crate::{
    ledger::Ledger,
    storage::{storage_key, validate_storage_key, LedgerStorage},
    CoreError,
};

/// Owns one [`Ledger`] per registered user, in registration order, and tracks
/// which user is active.
pub struct UserRegistry {
    storage: Arc<dyn LedgerStorage>,
    ledgers: Vec<Ledger>,
    active: Option<usize>,
}

impl UserRegistry {
    pub fn new(storage: Arc<dyn LedgerStorage>) -> Self {
        Self {
            storage,
            ledgers: Vec::new(),
            active: None,
        }
    }

    /// Creates a registry pre-seeded with `names`. Blank and repeated names are skipped.
    pub fn with_users<I, S>(storage: Arc<dyn LedgerStorage>, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut registry = Self::new(storage);
        for name in names {
            let name = name.as_ref().trim();
            if !name.is_empty() {
                registry.select_or_create(name);
            }
        }
        registry
    }

    /// Returns the ledger for `name`, opening and registering it when unknown.
    /// Name matching is exact and case-sensitive.
    pub fn select_or_create(&mut self, name: &str) -> &mut Ledger {
        let index = match self.position(name) {
            Some(index) => index,
            None => self.insert(name),
        };
        &mut self.ledgers[index]
    }

    /// Registers a new user. Empty names, names already registered and names
    /// sharing a record with a registered user are rejected.
    pub fn register(&mut self, name: &str) -> Result<&mut Ledger, CoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CoreError::validation("user name cannot be empty"));
        }
        if self.contains(name) {
            return Err(CoreError::validation(format!(
                "user `{name}` already exists"
            )));
        }
        validate_storage_key(name)?;
        let key = storage_key(name);
        if let Some(existing) = self.names().find(|other| storage_key(other) == key) {
            return Err(CoreError::validation(format!(
                "user `{name}` would share a record with `{existing}`"
            )));
        }
        let index = self.insert(name);
        Ok(&mut self.ledgers[index])
    }

    /// Makes a registered user the active one.
    pub fn select(&mut self, name: &str) -> Result<&mut Ledger, CoreError> {
        let index = self
            .position(name)
            .ok_or_else(|| CoreError::UnknownUser(name.to_string()))?;
        self.active = Some(index);
        info!(user = name, "selected user");
        Ok(&mut self.ledgers[index])
    }

    pub fn active(&self) -> Option<&Ledger> {
        self.active.map(|index| &self.ledgers[index])
    }

    pub fn active_mut(&mut self) -> Result<&mut Ledger, CoreError> {
        match self.active {
            Some(index) => Ok(&mut self.ledgers[index]),
            None => Err(CoreError::NoActiveUser),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Ledger> {
        self.position(name).map(|index| &self.ledgers[index])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Registered user names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.ledgers.iter().map(Ledger::user)
    }

    pub fn ledgers(&self) -> &[Ledger] {
        &self.ledgers
    }

    pub fn len(&self) -> usize {
        self.ledgers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ledgers.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.ledgers.iter().position(|ledger| ledger.user() == name)
    }

    fn insert(&mut self, name: &str) -> usize {
        let ledger = Ledger::open(name, Arc::clone(&self.storage));
        info!(
            user = name,
            transactions = ledger.len(),
            "registered user"
        );
        self.ledgers.push(ledger);
        self.ledgers.len() - 1
    }
}

impl fmt::Debug for UserRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserRegistry")
            .field("users", &self.names().collect::<Vec<_>>())
            .field("active", &self.active().map(Ledger::user))
            .finish_non_exhaustive()
    }
}
