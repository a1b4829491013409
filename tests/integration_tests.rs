use expense_splitter::core::balance::BalanceSheet;
use expense_splitter::core::expense::{Expense, ExpenseId};
use expense_splitter::core::group::{Group, GroupError, GroupSnapshot, NewExpense};
use expense_splitter::core::participant::ParticipantId;
use expense_splitter::optimization::aggregation::compute_balances;
use expense_splitter::optimization::simplification::simplify_debts;
use expense_splitter::optimization::summary::BalanceStatus;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn people(names: &[&str]) -> Vec<ParticipantId> {
    names.iter().map(|n| ParticipantId::new(*n)).collect()
}

fn expense(id: u64, amount: Decimal, paid_by: &str, split: &[&str]) -> Expense {
    Expense::new(
        ExpenseId(id),
        format!("expense {id}"),
        amount,
        ParticipantId::new(paid_by),
        people(split),
    )
    .unwrap()
}

fn triples(sheet: &BalanceSheet) -> Vec<(String, String, Decimal)> {
    simplify_debts(sheet)
        .iter()
        .map(|s| (s.from.to_string(), s.to.to_string(), s.amount))
        .collect()
}

fn t(from: &str, to: &str, amount: Decimal) -> (String, String, Decimal) {
    (from.to_string(), to.to_string(), amount)
}

#[test]
fn two_people_one_expense() {
    let p = people(&["A", "B"]);
    let sheet = compute_balances(&p, &[expense(1, dec!(100), "A", &["A", "B"])]);

    assert_eq!(sheet.balance(&p[0]), dec!(50));
    assert_eq!(sheet.balance(&p[1]), dec!(-50));
    assert_eq!(triples(&sheet), vec![t("B", "A", dec!(50.00))]);
}

#[test]
fn three_people_one_payer() {
    let p = people(&["A", "B", "C"]);
    let sheet = compute_balances(&p, &[expense(1, dec!(90), "A", &["A", "B", "C"])]);

    assert_eq!(sheet.balance(&p[0]), dec!(60));
    assert_eq!(sheet.balance(&p[1]), dec!(-30));
    assert_eq!(sheet.balance(&p[2]), dec!(-30));
    assert_eq!(
        triples(&sheet),
        vec![t("B", "A", dec!(30.00)), t("C", "A", dec!(30.00))]
    );
}

#[test]
fn single_participant_no_expenses() {
    let p = people(&["A"]);
    let sheet = compute_balances(&p, &[]);

    assert_eq!(sheet.len(), 1);
    assert_eq!(sheet.balance(&p[0]), Decimal::ZERO);
    assert!(simplify_debts(&sheet).is_settled());
}

#[test]
fn uneven_thirds_round_at_the_boundary() {
    let p = people(&["A", "B", "C"]);
    let sheet = compute_balances(&p, &[expense(1, dec!(10), "A", &["A", "B", "C"])]);

    assert_eq!(sheet.balance(&p[0]).round_dp(2), dec!(6.67));
    assert_eq!(sheet.balance(&p[1]).round_dp(2), dec!(-3.33));
    assert_eq!(sheet.balance(&p[2]).round_dp(2), dec!(-3.33));

    let plan = simplify_debts(&sheet);
    assert_eq!(plan.len(), 2);
    assert!((plan.total() - sheet.balance(&p[0])).abs() <= dec!(0.01));
}

/// A weekend trip: several payers, partial splits, one bystander.
#[test]
fn weekend_trip_pipeline() {
    let mut group = Group::new();
    for name in ["Asha", "Ravi", "Meera", "Kiran"] {
        group.add_participant(name).unwrap();
    }
    let [asha, ravi, meera, kiran] = ["Asha", "Ravi", "Meera", "Kiran"].map(ParticipantId::new);

    group
        .add_expense(NewExpense::new(
            "Hotel",
            dec!(240),
            asha.clone(),
            [asha.clone(), ravi.clone(), meera.clone()],
        ))
        .unwrap();
    group
        .add_expense(NewExpense::new(
            "Fuel",
            dec!(60),
            ravi.clone(),
            [asha.clone(), ravi.clone(), meera.clone()],
        ))
        .unwrap();
    group
        .add_expense(NewExpense::new("Dinner", dec!(45), meera.clone(), [meera.clone(), asha.clone()]))
        .unwrap();

    assert_eq!(group.total_spending(), dec!(345));

    // Asha: +240 - 80 - 20 - 22.5 = 117.5
    // Ravi: +60 - 80 - 20 = -40
    // Meera: +45 - 80 - 20 - 22.5 = -77.5
    let balances = group.balances();
    assert_eq!(balances.balance(&asha), dec!(117.5));
    assert_eq!(balances.balance(&ravi), dec!(-40));
    assert_eq!(balances.balance(&meera), dec!(-77.5));
    assert_eq!(balances.balance(&kiran), Decimal::ZERO);
    assert_eq!(balances.total(), Decimal::ZERO);

    let plan = group.settlements();
    let got: Vec<(&str, &str, Decimal)> = plan
        .iter()
        .map(|s| (s.from.as_str(), s.to.as_str(), s.amount))
        .collect();
    assert_eq!(
        got,
        vec![("Ravi", "Asha", dec!(40)), ("Meera", "Asha", dec!(77.5))]
    );

    let summary = group.summary();
    assert_eq!(summary.status_of(&kiran), Some(BalanceStatus::SettledUp));
    assert_eq!(summary.status_of(&meera), Some(BalanceStatus::Owes));

    // Kiran is not involved and may leave; Ravi may not.
    group.remove_participant(&kiran).unwrap();
    assert!(matches!(
        group.remove_participant(&ravi),
        Err(GroupError::ParticipantInUse(_))
    ));
}

#[test]
fn deleting_expenses_updates_derived_views() {
    let mut group = Group::new();
    let a = group.add_participant("A").unwrap();
    let b = group.add_participant("B").unwrap();

    let id = group
        .add_expense(NewExpense::new("Tickets", dec!(30), a.clone(), [b.clone()]))
        .unwrap();
    assert_eq!(group.settlements().len(), 1);

    group.delete_expense(id).unwrap();
    assert!(group.balances().is_settled());
    assert!(group.settlements().is_settled());
    assert!(group.summary().settled);
}

#[test]
fn snapshot_json_round_trip() {
    let json = r#"{
        "participants": ["A", "B", "C"],
        "expenses": [
            { "id": 10, "description": "Groceries", "amount": "72.30", "paid_by": "B", "split_between": ["A", "B", "C"] },
            { "id": 11, "description": "Taxi", "amount": 18, "paid_by": "C", "split_between": ["A"] }
        ]
    }"#;

    let snapshot: GroupSnapshot = serde_json::from_str(json).unwrap();
    let group = Group::from_snapshot(snapshot).unwrap();
    assert_eq!(group.expenses().len(), 2);
    assert_eq!(group.total_spending(), dec!(90.30));

    let again: GroupSnapshot =
        serde_json::from_str(&serde_json::to_string(&group.snapshot()).unwrap()).unwrap();
    let restored = Group::from_snapshot(again).unwrap();
    assert_eq!(restored.balances(), group.balances());
    assert_eq!(restored.settlements(), group.settlements());
}

#[test]
fn summary_serializes() {
    let mut group = Group::new();
    let a = group.add_participant("A").unwrap();
    let b = group.add_participant("B").unwrap();
    group
        .add_expense(NewExpense::new("Rent", dec!(1000), a.clone(), [a, b]))
        .unwrap();

    let json = serde_json::to_value(group.summary()).unwrap();
    assert_eq!(json["total_spending"], "1000.00");
    assert_eq!(json["settlements"][0]["from"], "B");
    assert_eq!(json["settlements"][0]["amount"], "500.00");
    assert_eq!(json["settled"], false);
}

#[test]
fn computations_are_idempotent() {
    let p = people(&["A", "B", "C", "D"]);
    let expenses = vec![
        expense(1, dec!(19.99), "A", &["A", "B", "C", "D"]),
        expense(2, dec!(5.01), "B", &["C", "D"]),
        expense(3, dec!(100), "D", &["A", "B", "C"]),
    ];

    let first = compute_balances(&p, &expenses);
    let second = compute_balances(&p, &expenses);
    assert_eq!(first, second);
    assert_eq!(simplify_debts(&first), simplify_debts(&second));
}
