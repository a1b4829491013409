use crate::core::balance::BalanceSheet;
use crate::core::expense::Expense;
use crate::core::participant::ParticipantId;
use log::{debug, warn};
use rust_decimal::Decimal;

/// Fold an expense list into each participant's net balance.
///
/// For every participant `p`:
///
/// ```text
/// balance(p) = Σ amount(e) where e.paid_by == p
///            − Σ share(e)  where p ∈ e.split_between
/// ```
///
/// with `share(e) = amount(e) / |split_between(e)|`. A payer who is also
/// in the split group gets both the credit and the debit, so they end up
/// owed everything except their own share.
///
/// The sheet lists participants in the order given, each starting at zero.
/// Shares are kept at full decimal precision; nothing is rounded here.
///
/// Expenses should only reference participants in `participants`. A name
/// that is missing is appended after the declared ones and logged, so the
/// result still balances.
///
/// # Examples
///
/// ```
/// use expense_splitter::core::expense::{Expense, ExpenseId};
/// use expense_splitter::core::participant::ParticipantId;
/// use expense_splitter::optimization::aggregation::compute_balances;
/// use rust_decimal_macros::dec;
///
/// let people = ["A", "B", "C"].map(ParticipantId::new);
/// let dinner = Expense::new(ExpenseId(1), "Dinner", dec!(90), people[0].clone(), people.clone())
///     .unwrap();
///
/// let sheet = compute_balances(&people, &[dinner]);
/// assert_eq!(sheet.balance(&people[0]), dec!(60));
/// assert_eq!(sheet.balance(&people[1]), dec!(-30));
/// ```
pub fn compute_balances(participants: &[ParticipantId], expenses: &[Expense]) -> BalanceSheet {
    let mut sheet = BalanceSheet::with_participants(participants);
    let declared = sheet.len();

    for expense in expenses {
        let share = expense.share();
        post(&mut sheet, expense, expense.paid_by(), expense.amount());
        for member in expense.split_between() {
            post(&mut sheet, expense, member, -share);
        }
    }

    debug!(
        "computed balances for {} participants over {} expenses ({} undeclared)",
        sheet.len(),
        expenses.len(),
        sheet.len() - declared
    );
    sheet
}

fn post(
    sheet: &mut BalanceSheet,
    expense: &Expense,
    participant: &ParticipantId,
    delta: Decimal,
) {
    if sheet.ensure(participant) {
        warn!(
            "expense {} references {} who is not a participant",
            expense.id(),
            participant
        );
    }
    sheet.adjust(participant, delta);
}
