use crate::core::balance::BalanceSheet;
use crate::core::participant::ParticipantId;
use crate::optimization::simplification::{simplify_debts_with, SettlementConfig, SettlementPlan};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Where a participant stands once their balance is rounded for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BalanceStatus {
    IsOwed,
    Owes,
    SettledUp,
}

/// Rounded balance of one participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantSummary {
    pub participant: ParticipantId,
    pub balance: Decimal,
    pub status: BalanceStatus,
}

/// Display-ready view of a group: spending, balances, and how to settle.
///
/// This is the only place balances get rounded. The settlement plan is
/// computed from the unrounded sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSummary {
    pub total_spending: Decimal,
    pub balances: Vec<ParticipantSummary>,
    pub settlements: SettlementPlan,
    pub settled: bool,
}

impl GroupSummary {
    /// Build the summary for a balance sheet and the group's total spending.
    pub fn new(total_spending: Decimal, sheet: &BalanceSheet, config: &SettlementConfig) -> Self {
        let balances = sheet
            .iter()
            .map(|(participant, balance)| {
                let rounded = config.round(balance);
                let (balance, status) = if rounded.is_zero() {
                    // Drops the sign of values like -0.001.
                    (config.round(Decimal::ZERO), BalanceStatus::SettledUp)
                } else if rounded > Decimal::ZERO {
                    (rounded, BalanceStatus::IsOwed)
                } else {
                    (rounded, BalanceStatus::Owes)
                };
                ParticipantSummary {
                    participant: participant.clone(),
                    balance,
                    status,
                }
            })
            .collect();

        let settlements = simplify_debts_with(sheet, config);
        let settled = settlements.is_settled();

        GroupSummary {
            total_spending: config.round(total_spending),
            balances,
            settlements,
            settled,
        }
    }

    /// Status of one participant, if they are in the summary.
    pub fn status_of(&self, participant: &ParticipantId) -> Option<BalanceStatus> {
        self.balances
            .iter()
            .find(|s| &s.participant == participant)
            .map(|s| s.status)
    }
}

impl std::fmt::Display for GroupSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Balances ===")?;
        writeln!(f, "Total Group Spending: {}", self.total_spending)?;

        writeln!(f, "\nIndividual Balances:")?;
        let width = self
            .balances
            .iter()
            .map(|s| s.participant.as_str().chars().count())
            .max()
            .unwrap_or(0);
        for entry in &self.balances {
            let name = entry.participant.as_str();
            match entry.status {
                BalanceStatus::IsOwed => {
                    writeln!(f, "  {:<width$}  is owed {}", name, entry.balance)?
                }
                BalanceStatus::Owes => {
                    writeln!(f, "  {:<width$}  owes {}", name, entry.balance.abs())?
                }
                BalanceStatus::SettledUp => writeln!(f, "  {:<width$}  settled up", name)?,
            }
        }

        writeln!(f, "\nSuggested Settlements:")?;
        if self.settled {
            writeln!(f, "  All balances are settled!")?;
        } else {
            for settlement in &self.settlements {
                writeln!(f, "  {}", settlement)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::expense::{Expense, ExpenseId};
    use crate::optimization::aggregation::compute_balances;
    use rust_decimal_macros::dec;

    fn p(name: &str) -> ParticipantId {
        ParticipantId::new(name)
    }

    #[test]
    fn test_summary_statuses() {
        let people = [p("A"), p("B"), p("C"), p("D")];
        let dinner = Expense::new(
            ExpenseId(1),
            "Dinner",
            dec!(90),
            p("A"),
            [p("A"), p("B"), p("C")],
        )
        .unwrap();
        let sheet = compute_balances(&people, &[dinner]);
        let summary = GroupSummary::new(dec!(90), &sheet, &SettlementConfig::default());

        assert_eq!(summary.total_spending.to_string(), "90.00");
        assert_eq!(summary.status_of(&p("A")), Some(BalanceStatus::IsOwed));
        assert_eq!(summary.status_of(&p("B")), Some(BalanceStatus::Owes));
        assert_eq!(summary.status_of(&p("D")), Some(BalanceStatus::SettledUp));
        assert_eq!(summary.status_of(&p("Z")), None);
        assert_eq!(summary.balances[0].balance, dec!(60.00));
        assert_eq!(summary.settlements.len(), 2);
        assert!(!summary.settled);
    }

    #[test]
    fn test_rounding_happens_only_here() {
        let people = [p("A"), p("B"), p("C")];
        let taxi = Expense::new(
            ExpenseId(1),
            "Taxi",
            dec!(10),
            p("A"),
            people.clone(),
        )
        .unwrap();
        let sheet = compute_balances(&people, &[taxi]);
        let summary = GroupSummary::new(dec!(10), &sheet, &SettlementConfig::default());

        let shown: Vec<String> = summary.balances.iter().map(|s| s.balance.to_string()).collect();
        assert_eq!(shown, vec!["6.67", "-3.33", "-3.33"]);
    }

    #[test]
    fn test_negative_dust_shows_as_settled() {
        let sheet: BalanceSheet = [(p("A"), dec!(0.001)), (p("B"), dec!(-0.001))]
            .into_iter()
            .collect();
        let summary = GroupSummary::new(Decimal::ZERO, &sheet, &SettlementConfig::default());
        assert!(summary.balances.iter().all(|s| s.status == BalanceStatus::SettledUp));
        assert_eq!(summary.balances[1].balance.to_string(), "0.00");
        assert!(summary.settled);
    }

    #[test]
    fn test_display_report() {
        let sheet: BalanceSheet = [(p("Ann"), dec!(50)), (p("Bo"), dec!(-50)), (p("Cy"), Decimal::ZERO)]
            .into_iter()
            .collect();
        let summary = GroupSummary::new(dec!(100), &sheet, &SettlementConfig::default());
        let text = summary.to_string();

        assert!(text.contains("Total Group Spending: 100.00"));
        assert!(text.contains("  Ann  is owed 50.00"));
        assert!(text.contains("  Bo   owes 50.00"));
        assert!(text.contains("  Cy   settled up"));
        assert!(text.contains("  Bo → Ann: 50.00"));
    }

    #[test]
    fn test_display_all_settled() {
        let sheet = BalanceSheet::with_participants(&[p("Solo")]);
        let summary = GroupSummary::new(Decimal::ZERO, &sheet, &SettlementConfig::default());
        assert!(summary.to_string().contains("All balances are settled!"));
    }

    #[test]
    fn test_summary_json() {
        let sheet: BalanceSheet = [(p("A"), dec!(5)), (p("B"), dec!(-5))].into_iter().collect();
        let summary = GroupSummary::new(dec!(10), &sheet, &SettlementConfig::default());
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["balances"][0]["status"], "IS_OWED");
        assert_eq!(json["balances"][1]["status"], "OWES");
        assert_eq!(json["settled"], false);
        assert_eq!(json["settlements"][0]["amount"], "5.00");
    }
}
