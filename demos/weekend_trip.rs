//! A weekend trip split four ways.
//!
//! Records a handful of shared expenses, prints each participant's
//! balance and the payments that settle the group.

use expense_splitter::core::group::{Group, GroupError, NewExpense};
use rust_decimal_macros::dec;

fn main() -> Result<(), GroupError> {
    println!("╔══════════════════════════════════════════╗");
    println!("║  expense-splitter: Weekend Trip Example  ║");
    println!("╚══════════════════════════════════════════╝\n");

    let mut group = Group::new();
    let asha = group.add_participant("Asha")?;
    let ravi = group.add_participant("Ravi")?;
    let meera = group.add_participant("Meera")?;
    let kiran = group.add_participant("Kiran")?;

    // --- Expenses ---
    println!("━━━ Expenses ━━━\n");

    group.add_expense(NewExpense::new(
        "Hotel",
        dec!(240),
        asha.clone(),
        [asha.clone(), ravi.clone(), meera.clone()],
    ))?;
    group.add_expense(NewExpense::new(
        "Fuel",
        dec!(60),
        ravi.clone(),
        [asha.clone(), ravi.clone(), meera.clone()],
    ))?;
    group.add_expense(NewExpense::new(
        "Dinner",
        dec!(45),
        meera.clone(),
        [meera.clone(), asha.clone()],
    ))?;
    group.add_expense(NewExpense::new(
        "Museum tickets",
        dec!(50),
        kiran.clone(),
        [asha.clone(), ravi.clone(), meera.clone(), kiran.clone()],
    ))?;

    for expense in group.expenses() {
        println!(
            "  {:<16} {:>8}  paid by {:<6} split {}",
            expense.description(),
            expense.amount(),
            expense.paid_by().as_str(),
            expense.split_between().len()
        );
    }
    println!();

    // --- Summary ---
    println!("{}", group.summary());

    // Kiran paid for tickets, so the registry refuses to drop them.
    if let Err(e) = group.remove_participant(&kiran) {
        println!("Cannot remove Kiran: {}", e);
    }

    Ok(())
}
