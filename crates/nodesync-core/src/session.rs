//! Comparison session state machine
//!
//! A session waits for the inventories of every expected node, then runs the
//! comparison and the rule matching once on an explicit call.

use std::collections::BTreeMap;
use std::fmt;

use nodesync_meta::{Inventory, SessionSettings};

use crate::actions::AtomicActionRepository;
use crate::comparison::{ComparisonResult, InventoryComparer};
use crate::matching::{MatchReport, SynchronizationRuleMatcher};
use crate::rules::RuleSet;
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Waiting for inventories
    Pending,
    /// Every expected inventory was received
    Ready,
    /// Comparison and matching in progress
    Computing,
    /// Results available
    Done,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Pending => "pending",
            SessionState::Ready => "ready",
            SessionState::Computing => "computing",
            SessionState::Done => "done",
        };
        write!(f, "{name}")
    }
}

/// Results of a completed session run
#[derive(Debug, Clone)]
pub struct SessionOutcome {
    pub comparison: ComparisonResult,
    pub report: MatchReport,
}

#[derive(Debug)]
pub struct ComparisonSession {
    settings: SessionSettings,
    expected: Vec<String>,
    received: BTreeMap<String, Inventory>,
    state: SessionState,
    outcome: Option<SessionOutcome>,
}

impl ComparisonSession {
    pub fn new<I, S>(settings: SessionSettings, expected: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut codes: Vec<String> = Vec::new();
        for code in expected {
            let code = code.into();
            if !codes.contains(&code) {
                codes.push(code);
            }
        }
        Self {
            settings,
            expected: codes,
            received: BTreeMap::new(),
            state: SessionState::Pending,
            outcome: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    /// Expected inventory codes not received yet
    pub fn missing_inventories(&self) -> Vec<&str> {
        self.expected
            .iter()
            .filter(|code| !self.received.contains_key(*code))
            .map(String::as_str)
            .collect()
    }

    /// Store a received inventory
    ///
    /// # Errors
    ///
    /// `UnexpectedInventory` for a code the session does not wait for,
    /// `DuplicateInventoryCode` for a code already received and
    /// `InvalidSessionState` outside the `Pending` state.
    pub fn add_inventory(&mut self, inventory: Inventory) -> Result<SessionState> {
        self.expect_state(SessionState::Pending)?;

        if !self.expected.contains(&inventory.code) {
            return Err(Error::UnexpectedInventory {
                code: inventory.code,
            });
        }
        if self.received.contains_key(&inventory.code) {
            return Err(Error::DuplicateInventoryCode {
                code: inventory.code,
            });
        }

        tracing::debug!(code = %inventory.code, "Inventory received");
        self.received.insert(inventory.code.clone(), inventory);
        if self.missing_inventories().is_empty() {
            self.state = SessionState::Ready;
        }
        Ok(self.state)
    }

    /// Compare the received inventories and match `rules`
    ///
    /// # Errors
    ///
    /// `InvalidSessionState` unless the session is `Ready`. Comparison and
    /// matching errors put the session back to `Ready`.
    pub fn run(&mut self, rules: &RuleSet, repository: &dyn AtomicActionRepository) -> Result<&SessionOutcome> {
        self.expect_state(SessionState::Ready)?;
        self.state = SessionState::Computing;

        match self.compute(rules, repository) {
            Ok(outcome) => {
                self.state = SessionState::Done;
                Ok(&*self.outcome.insert(outcome))
            }
            Err(e) => {
                self.state = SessionState::Ready;
                Err(e)
            }
        }
    }

    pub fn outcome(&self) -> Option<&SessionOutcome> {
        self.outcome.as_ref()
    }

    /// Drop received inventories and results
    pub fn reset(&mut self) {
        self.received.clear();
        self.outcome = None;
        self.state = SessionState::Pending;
    }

    fn compute(&self, rules: &RuleSet, repository: &dyn AtomicActionRepository) -> Result<SessionOutcome> {
        let inventories: Vec<Inventory> = self
            .expected
            .iter()
            .filter_map(|code| self.received.get(code).cloned())
            .collect();
        rules.check_data_parts(&inventories)?;

        let comparison = InventoryComparer::new(self.settings).compare(inventories)?;
        let matcher = SynchronizationRuleMatcher::new(self.settings, &comparison.inventories, repository);
        let report = matcher.make_matches(&comparison.items, rules.rules())?;

        Ok(SessionOutcome { comparison, report })
    }

    fn expect_state(&self, expected: SessionState) -> Result<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(Error::InvalidSessionState {
                expected: expected.to_string(),
                actual: self.state.to_string(),
            })
        }
    }
}
