//! Random expense groups for benchmarks and exploratory testing.
//!
//! Amounts are whole cents; split sets are random non-empty subsets of the
//! group, so uneven shares (thirds, sevenths) show up often.

use crate::core::group::{Group, GroupError, NewExpense};
use crate::core::participant::ParticipantId;
use rand::seq::index::sample;
use rand::Rng;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Configuration for generating a random group.
#[derive(Debug, Clone)]
pub struct GroupConfig {
    /// Number of participants.
    pub participant_count: usize,
    /// Number of expenses to record.
    pub expense_count: usize,
    /// Minimum expense amount.
    pub min_amount: Decimal,
    /// Maximum expense amount.
    pub max_amount: Decimal,
}

impl Default for GroupConfig {
    fn default() -> Self {
        Self {
            participant_count: 5,
            expense_count: 20,
            min_amount: dec!(1),
            max_amount: dec!(500),
        }
    }
}

const DESCRIPTIONS: &[&str] = &[
    "Groceries", "Dinner", "Taxi", "Hotel", "Fuel", "Tickets", "Coffee", "Snacks",
];

/// Generate a random group. Every expense passes the registry checks.
pub fn generate_random_group(config: &GroupConfig) -> Result<Group, GroupError> {
    let mut rng = rand::thread_rng();
    let mut group = Group::new();

    let participants: Vec<ParticipantId> = (0..config.participant_count.max(1))
        .map(|i| group.add_participant(&format!("P{:03}", i)))
        .collect::<Result<_, _>>()?;

    // Work in cents so every amount has at most two fractional digits.
    let min_cents = (config.min_amount * dec!(100)).ceil().max(Decimal::ONE);
    let max_cents = (config.max_amount * dec!(100)).floor().max(min_cents);
    let min_cents = min_cents.to_i64().unwrap_or(1);
    let max_cents = max_cents.to_i64().unwrap_or(min_cents).max(min_cents);

    for _ in 0..config.expense_count {
        let cents = rng.gen_range(min_cents..=max_cents);
        let amount = Decimal::new(cents, 2);

        let payer = participants[rng.gen_range(0..participants.len())].clone();
        let split_size = rng.gen_range(1..=participants.len());
        let split = sample(&mut rng, participants.len(), split_size)
            .into_iter()
            .map(|idx| participants[idx].clone());

        let description = DESCRIPTIONS[rng.gen_range(0..DESCRIPTIONS.len())];
        group.add_expense(NewExpense::new(description, amount, payer, split))?;
    }

    Ok(group)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_group_generation() {
        let config = GroupConfig {
            participant_count: 4,
            expense_count: 12,
            ..Default::default()
        };

        let group = generate_random_group(&config).unwrap();
        assert_eq!(group.participants().len(), 4);
        assert_eq!(group.expenses().len(), 12);
        for expense in group.expenses() {
            assert!(expense.amount() >= config.min_amount);
            assert!(expense.amount() <= config.max_amount);
            assert!(expense.amount().scale() <= 2);
        }
    }

    #[test]
    fn test_random_group_settles() {
        let group = generate_random_group(&GroupConfig {
            participant_count: 8,
            expense_count: 40,
            ..Default::default()
        })
        .unwrap();

        let balances = group.balances();
        assert!(balances.total().abs() < dec!(0.000001));

        let nonzero = balances.iter().filter(|(_, b)| !b.is_zero()).count();
        let plan = group.settlements();
        assert!(plan.len() <= nonzero.saturating_sub(1));
    }
}
