use crate::core::balance::BalanceSheet;
use crate::core::participant::ParticipantId;
use log::{debug, warn};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest scale whose tolerance (half a unit) is still representable.
pub const MAX_SCALE: u32 = 27;

/// Rounding settings for settlement amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementConfig {
    /// Number of fractional digits settlement amounts are rounded to.
    pub scale: u32,
}

impl Default for SettlementConfig {
    fn default() -> Self {
        Self { scale: 2 }
    }
}

impl SettlementConfig {
    /// Config rounding to `scale` digits, capped at [`MAX_SCALE`].
    pub fn new(scale: u32) -> Self {
        Self {
            scale: scale.min(MAX_SCALE),
        }
    }

    fn effective_scale(&self) -> u32 {
        self.scale.min(MAX_SCALE)
    }

    /// Half of the smallest unit at this scale (0.005 at scale 2).
    pub fn tolerance(&self) -> Decimal {
        Decimal::new(5, self.effective_scale() + 1)
    }

    /// Whether `amount` would round to zero.
    pub fn is_negligible(&self, amount: Decimal) -> bool {
        amount.abs() < self.tolerance()
    }

    /// Round half away from zero and pad to exactly `scale` digits.
    pub fn round(&self, amount: Decimal) -> Decimal {
        let scale = self.effective_scale();
        let mut rounded = amount.round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(scale);
        rounded
    }
}

/// One proposed payment from a debtor to a creditor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    pub from: ParticipantId,
    pub to: ParticipantId,
    /// Rounded to the configured scale. Always positive.
    pub amount: Decimal,
}

impl fmt::Display for Settlement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} → {}: {}", self.from, self.to, self.amount)
    }
}

/// Ordered list of settlements that clears every balance.
///
/// An empty plan means the group is already settled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SettlementPlan {
    transfers: Vec<Settlement>,
}

impl SettlementPlan {
    pub fn transfers(&self) -> &[Settlement] {
        &self.transfers
    }

    pub fn len(&self) -> usize {
        self.transfers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transfers.is_empty()
    }

    /// Whether nothing needs to be paid.
    pub fn is_settled(&self) -> bool {
        self.transfers.is_empty()
    }

    /// Sum of all settlement amounts.
    pub fn total(&self) -> Decimal {
        self.transfers
            .iter()
            .fold(Decimal::ZERO, |acc, s| acc.saturating_add(s.amount))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Settlement> {
        self.transfers.iter()
    }
}

impl<'a> IntoIterator for &'a SettlementPlan {
    type Item = &'a Settlement;
    type IntoIter = std::slice::Iter<'a, Settlement>;

    fn into_iter(self) -> Self::IntoIter {
        self.transfers.iter()
    }
}

impl fmt::Display for SettlementPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_settled() {
            return writeln!(f, "All balances are settled!");
        }
        for settlement in &self.transfers {
            writeln!(f, "{}", settlement)?;
        }
        Ok(())
    }
}

/// A participant's outstanding amount during matching. Always positive.
struct Position<'a> {
    participant: &'a ParticipantId,
    remaining: Decimal,
}

/// Settle a balance sheet with the default two-digit rounding.
pub fn simplify_debts(balances: &BalanceSheet) -> SettlementPlan {
    simplify_debts_with(balances, &SettlementConfig::default())
}

/// Turn balances into a short list of debtor → creditor payments.
///
/// Greedy two-pointer matching:
///
/// 1. Split participants into creditors (owed money) and debtors (owing
///    money), keeping the sheet's order. Balances that round to zero are
///    already settled and skipped.
/// 2. Pair the current debtor with the current creditor, pay the smaller of
///    the two outstanding amounts, and move past whoever is now cleared
///    (both when they tie).
/// 3. Stop when either side runs out.
///
/// Every payment clears at least one side, so the plan never has more than
/// `non-zero balances − 1` entries. It is not a globally minimal plan, and
/// no amount-based sorting happens: ties and pairings follow sheet order.
/// Leftovers smaller than [`SettlementConfig::tolerance`] are treated as
/// zero instead of producing zero-amount payments.
///
/// # Examples
///
/// ```
/// use expense_splitter::core::balance::BalanceSheet;
/// use expense_splitter::core::participant::ParticipantId;
/// use expense_splitter::optimization::simplification::simplify_debts;
/// use rust_decimal_macros::dec;
///
/// let sheet: BalanceSheet = [
///     (ParticipantId::new("A"), dec!(60)),
///     (ParticipantId::new("B"), dec!(-30)),
///     (ParticipantId::new("C"), dec!(-30)),
/// ]
/// .into_iter()
/// .collect();
///
/// let plan = simplify_debts(&sheet);
/// assert_eq!(plan.len(), 2);
/// assert_eq!(plan.transfers()[0].from, ParticipantId::new("B"));
/// assert_eq!(plan.transfers()[0].amount, dec!(30.00));
/// ```
pub fn simplify_debts_with(balances: &BalanceSheet, config: &SettlementConfig) -> SettlementPlan {
    let mut creditors: Vec<Position<'_>> = Vec::new();
    let mut debtors: Vec<Position<'_>> = Vec::new();

    for (participant, balance) in balances.iter() {
        if config.is_negligible(balance) {
            continue;
        }
        if balance > Decimal::ZERO {
            creditors.push(Position {
                participant,
                remaining: balance,
            });
        } else {
            debtors.push(Position {
                participant,
                remaining: -balance,
            });
        }
    }

    let mut transfers = Vec::with_capacity((creditors.len() + debtors.len()).saturating_sub(1));
    let mut i = 0;
    let mut j = 0;

    while i < debtors.len() && j < creditors.len() {
        let debtor = &mut debtors[i];
        let creditor = &mut creditors[j];
        let pay = debtor.remaining.min(creditor.remaining);

        transfers.push(Settlement {
            from: debtor.participant.clone(),
            to: creditor.participant.clone(),
            amount: config.round(pay),
        });

        debtor.remaining -= pay;
        creditor.remaining -= pay;

        if config.is_negligible(debtor.remaining) {
            i += 1;
        }
        if config.is_negligible(creditor.remaining) {
            j += 1;
        }
    }

    let unmatched: Decimal = debtors[i..]
        .iter()
        .chain(&creditors[j..])
        .fold(Decimal::ZERO, |acc, p| acc.saturating_add(p.remaining));
    if !unmatched.is_zero() {
        warn!(
            "balances do not sum to zero; {} left unmatched after settlement",
            unmatched
        );
    }

    debug!(
        "settled {} creditors and {} debtors with {} transfers",
        creditors.len(),
        debtors.len(),
        transfers.len()
    );
    SettlementPlan { transfers }
}
