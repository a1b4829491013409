use crate::core::balance::BalanceSheet;
use crate::core::expense::{Expense, ExpenseError, ExpenseId, ExpenseSet};
use crate::core::participant::ParticipantId;
use crate::optimization::aggregation::compute_balances;
use crate::optimization::simplification::{simplify_debts_with, SettlementConfig, SettlementPlan};
use crate::optimization::summary::GroupSummary;
use log::info;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Errors returned by group mutations. A rejected mutation leaves the
/// group unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GroupError {
    #[error("participant name must not be empty")]
    EmptyName,
    #[error("{0} is already in the group")]
    DuplicateParticipant(ParticipantId),
    #[error("{0} is not in the group")]
    UnknownParticipant(ParticipantId),
    #[error("{0} is involved in existing expenses and cannot be removed.")]
    ParticipantInUse(ParticipantId),
    #[error("expense amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),
    #[error("expense {0} not found")]
    ExpenseNotFound(ExpenseId),
    #[error("expense id {0} is used more than once")]
    DuplicateExpenseId(ExpenseId),
    #[error("expense of {0} would push total group spending out of range")]
    SpendingOverflow(Decimal),
    #[error("no expense ids left")]
    ExpenseIdsExhausted,
    #[error(transparent)]
    InvalidExpense(#[from] ExpenseError),
}

/// An expense as entered, before the group assigns it an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewExpense {
    #[serde(default)]
    pub description: String,
    pub amount: Decimal,
    pub paid_by: ParticipantId,
    pub split_between: Vec<ParticipantId>,
}

impl NewExpense {
    pub fn new(
        description: impl Into<String>,
        amount: Decimal,
        paid_by: impl Into<ParticipantId>,
        split_between: impl IntoIterator<Item = ParticipantId>,
    ) -> Self {
        Self {
            description: description.into(),
            amount,
            paid_by: paid_by.into(),
            split_between: split_between.into_iter().collect(),
        }
    }
}

/// Serialized form of a group: the participant list and the expense list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSnapshot {
    pub participants: Vec<ParticipantId>,
    #[serde(default)]
    pub expenses: ExpenseSet,
}

/// A shared expense group.
///
/// The group is the single owner of the participant list and the expense
/// list. Every mutation is checked so the snapshot handed to the balance
/// and settlement computations always satisfies their preconditions:
///
/// - participant names are non-empty, trimmed and unique;
/// - every expense has a positive amount and a non-empty split;
/// - every payer and split member is a current participant;
/// - a participant cannot leave while any expense references them;
/// - total spending stays within the `Decimal` range, which bounds every
///   balance.
///
/// # Examples
///
/// ```
/// use expense_splitter::core::group::{Group, NewExpense};
/// use rust_decimal_macros::dec;
///
/// let mut group = Group::new();
/// let a = group.add_participant("A").unwrap();
/// let b = group.add_participant("B").unwrap();
///
/// group
///     .add_expense(NewExpense::new("Hotel", dec!(100), a.clone(), [a.clone(), b.clone()]))
///     .unwrap();
///
/// assert_eq!(group.balances().balance(&b), dec!(-50));
/// assert!(group.remove_participant(&b).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct Group {
    participants: Vec<ParticipantId>,
    members: HashSet<ParticipantId>,
    expenses: ExpenseSet,
    total_spending: Decimal,
    /// `None` once the id space is used up.
    next_id: Option<u64>,
}

impl Default for Group {
    fn default() -> Self {
        Self::new()
    }
}

impl Group {
    pub fn new() -> Self {
        Self {
            participants: Vec::new(),
            members: HashSet::new(),
            expenses: ExpenseSet::new(),
            total_spending: Decimal::ZERO,
            next_id: Some(1),
        }
    }

    /// Rebuild a group from a snapshot, applying every registry check.
    ///
    /// Expense ids from the snapshot are kept; new expenses continue after
    /// the largest one. A snapshot holding `u64::MAX` loads, but adding to
    /// it fails with [`GroupError::ExpenseIdsExhausted`].
    pub fn from_snapshot(snapshot: GroupSnapshot) -> Result<Self, GroupError> {
        let mut group = Self::new();
        for participant in snapshot.participants {
            group.add_participant(participant.as_str())?;
        }
        let mut ids = HashSet::new();
        for expense in snapshot.expenses.expenses() {
            if !ids.insert(expense.id()) {
                return Err(GroupError::DuplicateExpenseId(expense.id()));
            }
            group.total_spending =
                group.check_expense(expense.amount(), expense.paid_by(), expense.split_between())?;
            group.expenses.add(expense.clone());
        }
        group.next_id = match group.expenses.max_id() {
            Some(id) => id.0.checked_add(1),
            None => Some(1),
        };
        Ok(group)
    }

    /// Current state as a serializable snapshot.
    pub fn snapshot(&self) -> GroupSnapshot {
        GroupSnapshot {
            participants: self.participants.clone(),
            expenses: self.expenses.clone(),
        }
    }

    /// Add a participant. The name is trimmed first.
    pub fn add_participant(&mut self, name: &str) -> Result<ParticipantId, GroupError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(GroupError::EmptyName);
        }
        let participant = ParticipantId::new(trimmed);
        if self.members.contains(&participant) {
            return Err(GroupError::DuplicateParticipant(participant));
        }
        info!("adding participant {}", participant);
        self.members.insert(participant.clone());
        self.participants.push(participant.clone());
        Ok(participant)
    }

    /// Remove a participant that no expense refers to.
    pub fn remove_participant(&mut self, participant: &ParticipantId) -> Result<(), GroupError> {
        let index = self
            .participants
            .iter()
            .position(|p| p == participant)
            .ok_or_else(|| GroupError::UnknownParticipant(participant.clone()))?;
        if self.expenses.involves(participant) {
            return Err(GroupError::ParticipantInUse(participant.clone()));
        }
        info!("removing participant {}", participant);
        self.participants.remove(index);
        self.members.remove(participant);
        Ok(())
    }

    /// Record an expense and return its newly assigned id.
    pub fn add_expense(&mut self, new_expense: NewExpense) -> Result<ExpenseId, GroupError> {
        let total_spending = self.check_expense(
            new_expense.amount,
            &new_expense.paid_by,
            &new_expense.split_between,
        )?;

        let id = ExpenseId(self.next_id.ok_or(GroupError::ExpenseIdsExhausted)?);
        let expense = Expense::new(
            id,
            new_expense.description,
            new_expense.amount,
            new_expense.paid_by,
            new_expense.split_between,
        )?;
        info!(
            "recording expense {} of {} paid by {}",
            id,
            expense.amount(),
            expense.paid_by()
        );
        self.expenses.add(expense);
        self.total_spending = total_spending;
        self.next_id = id.0.checked_add(1);
        Ok(id)
    }

    /// Delete an expense, returning it.
    pub fn delete_expense(&mut self, id: ExpenseId) -> Result<Expense, GroupError> {
        let removed = self
            .expenses
            .remove(id)
            .ok_or(GroupError::ExpenseNotFound(id))?;
        self.total_spending = self.expenses.total_spending();
        info!("deleted expense {}", id);
        Ok(removed)
    }

    /// Validate an expense against the group and return the total spending
    /// it would bring the group to.
    fn check_expense(
        &self,
        amount: Decimal,
        paid_by: &ParticipantId,
        split_between: &[ParticipantId],
    ) -> Result<Decimal, GroupError> {
        if amount <= Decimal::ZERO {
            return Err(GroupError::NonPositiveAmount(amount));
        }
        for participant in std::iter::once(paid_by).chain(split_between) {
            if !self.members.contains(participant) {
                return Err(GroupError::UnknownParticipant(participant.clone()));
            }
        }
        self.total_spending
            .checked_add(amount)
            .ok_or(GroupError::SpendingOverflow(amount))
    }

    // --- Accessors ---

    pub fn participants(&self) -> &[ParticipantId] {
        &self.participants
    }

    pub fn expenses(&self) -> &[Expense] {
        self.expenses.expenses()
    }

    pub fn expense(&self, id: ExpenseId) -> Option<&Expense> {
        self.expenses.get(id)
    }

    /// Sum of all expense amounts.
    pub fn total_spending(&self) -> Decimal {
        self.total_spending
    }

    /// Whether any expense refers to `participant`.
    pub fn is_involved(&self, participant: &ParticipantId) -> bool {
        self.expenses.involves(participant)
    }

    // --- Derived views ---

    pub fn balances(&self) -> BalanceSheet {
        compute_balances(&self.participants, self.expenses())
    }

    pub fn settlements(&self) -> SettlementPlan {
        self.settlements_with(&SettlementConfig::default())
    }

    pub fn settlements_with(&self, config: &SettlementConfig) -> SettlementPlan {
        simplify_debts_with(&self.balances(), config)
    }

    pub fn summary(&self) -> GroupSummary {
        self.summary_with(&SettlementConfig::default())
    }

    pub fn summary_with(&self, config: &SettlementConfig) -> GroupSummary {
        GroupSummary::new(self.total_spending(), &self.balances(), config)
    }
}
