use crate::core::participant::ParticipantId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Unique identifier of an expense within a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpenseId(pub u64);

impl fmt::Display for ExpenseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Errors raised when an expense record cannot describe a valid split.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpenseError {
    #[error("expense {id} must be split between at least one participant")]
    EmptySplit { id: ExpenseId },
    #[error("expense {id} has negative amount {amount}")]
    NegativeAmount { id: ExpenseId, amount: Decimal },
}

/// A single shared expense.
///
/// `paid_by` fronted the whole `amount`; everyone in `split_between`
/// owes an equal share of it. The payer may or may not be part of the
/// split group.
///
/// An `Expense` always has at least one participant in its split set, so
/// [`Expense::share`] is always defined.
///
/// # Examples
///
/// ```
/// use expense_splitter::core::expense::{Expense, ExpenseId};
/// use expense_splitter::core::participant::ParticipantId;
/// use rust_decimal_macros::dec;
///
/// let dinner = Expense::new(
///     ExpenseId(1),
///     "Dinner",
///     dec!(90),
///     ParticipantId::new("A"),
///     ["A", "B", "C"].map(ParticipantId::new),
/// )
/// .unwrap();
///
/// assert_eq!(dinner.share(), dec!(30));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ExpenseRecord")]
pub struct Expense {
    id: ExpenseId,
    description: String,
    /// Total amount paid. Never negative.
    amount: Decimal,
    paid_by: ParticipantId,
    /// Participants sharing the cost, in declaration order, without duplicates.
    split_between: Vec<ParticipantId>,
}

/// Unvalidated wire form of an [`Expense`].
#[derive(Deserialize)]
struct ExpenseRecord {
    id: ExpenseId,
    #[serde(default)]
    description: String,
    amount: Decimal,
    paid_by: ParticipantId,
    split_between: Vec<ParticipantId>,
}

impl TryFrom<ExpenseRecord> for Expense {
    type Error = ExpenseError;

    fn try_from(record: ExpenseRecord) -> Result<Self, Self::Error> {
        Expense::new(
            record.id,
            record.description,
            record.amount,
            record.paid_by,
            record.split_between,
        )
    }
}

impl Expense {
    /// Create a new expense.
    ///
    /// Repeated names in `split_between` count once. Zero amounts are
    /// accepted here; the group registry is stricter.
    pub fn new(
        id: ExpenseId,
        description: impl Into<String>,
        amount: Decimal,
        paid_by: ParticipantId,
        split_between: impl IntoIterator<Item = ParticipantId>,
    ) -> Result<Self, ExpenseError> {
        if amount < Decimal::ZERO {
            return Err(ExpenseError::NegativeAmount { id, amount });
        }

        let mut members: Vec<ParticipantId> = Vec::new();
        for member in split_between {
            if !members.contains(&member) {
                members.push(member);
            }
        }
        if members.is_empty() {
            return Err(ExpenseError::EmptySplit { id });
        }

        Ok(Self {
            id,
            description: description.into(),
            amount,
            paid_by,
            split_between: members,
        })
    }

    // --- Accessors ---

    pub fn id(&self) -> ExpenseId {
        self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn paid_by(&self) -> &ParticipantId {
        &self.paid_by
    }

    pub fn split_between(&self) -> &[ParticipantId] {
        &self.split_between
    }

    /// Each split member's equal portion of the amount, unrounded.
    pub fn share(&self) -> Decimal {
        self.amount / Decimal::from(self.split_between.len())
    }

    /// Whether `participant` paid for or shares in this expense.
    pub fn involves(&self, participant: &ParticipantId) -> bool {
        &self.paid_by == participant || self.split_between.contains(participant)
    }
}

/// An ordered collection of expenses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpenseSet {
    expenses: Vec<Expense>,
}

impl ExpenseSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, expense: Expense) {
        self.expenses.push(expense);
    }

    /// Remove the expense with the given id, keeping the order of the rest.
    pub fn remove(&mut self, id: ExpenseId) -> Option<Expense> {
        let index = self.expenses.iter().position(|e| e.id() == id)?;
        Some(self.expenses.remove(index))
    }

    pub fn get(&self, id: ExpenseId) -> Option<&Expense> {
        self.expenses.iter().find(|e| e.id() == id)
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn len(&self) -> usize {
        self.expenses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty()
    }

    /// Total group spending: the sum of every expense amount.
    pub fn total_spending(&self) -> Decimal {
        self.expenses
            .iter()
            .fold(Decimal::ZERO, |acc, e| acc.saturating_add(e.amount()))
    }

    /// Whether any expense references `participant` as payer or split member.
    pub fn involves(&self, participant: &ParticipantId) -> bool {
        self.expenses.iter().any(|e| e.involves(participant))
    }

    /// Largest id in use, if any.
    pub fn max_id(&self) -> Option<ExpenseId> {
        self.expenses.iter().map(|e| e.id()).max()
    }
}

impl FromIterator<Expense> for ExpenseSet {
    fn from_iter<T: IntoIterator<Item = Expense>>(iter: T) -> Self {
        Self {
            expenses: iter.into_iter().collect(),
        }
    }
}
