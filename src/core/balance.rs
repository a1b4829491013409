use crate::core::participant::ParticipantId;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;

/// Net position of every participant in a group.
///
/// A positive balance means the participant is owed money (net creditor).
/// A negative balance means the participant owes money (net debtor).
///
/// Entries keep the order in which participants were first inserted, which
/// is the group's declaration order. The settlement algorithm depends on it,
/// so iteration always follows `entries`; `index` only maps a participant to
/// its position for constant-time lookups.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BalanceSheet {
    entries: Vec<(ParticipantId, Decimal)>,
    index: HashMap<ParticipantId, usize>,
}

impl Serialize for BalanceSheet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        entries_serde::serialize(&self.entries, serializer)
    }
}

impl<'de> Deserialize<'de> for BalanceSheet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        entries_serde::deserialize(deserializer).map(|entries| entries.into_iter().collect())
    }
}

/// Serializes entries as a JSON object whose key order follows the sheet.
mod entries_serde {
    use super::*;
    use serde::de::{self, MapAccess, Visitor};
    use serde::ser::SerializeMap;

    pub fn serialize<S: serde::Serializer>(
        entries: &[(ParticipantId, Decimal)],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(entries.len()))?;
        for (participant, balance) in entries {
            map.serialize_entry(participant.as_str(), balance)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<(ParticipantId, Decimal)>, D::Error> {
        struct V;
        impl<'de> Visitor<'de> for V {
            type Value = Vec<(ParticipantId, Decimal)>;
            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a map of participant names to balances")
            }
            fn visit_map<M: MapAccess<'de>>(self, mut access: M) -> Result<Self::Value, M::Error> {
                let mut entries: Vec<(ParticipantId, Decimal)> = Vec::new();
                let mut seen = std::collections::HashSet::new();
                while let Some((name, balance)) = access.next_entry::<String, Decimal>()? {
                    let participant = ParticipantId::new(name);
                    if !seen.insert(participant.clone()) {
                        return Err(de::Error::custom(format!(
                            "duplicate participant: {participant}"
                        )));
                    }
                    entries.push((participant, balance));
                }
                Ok(entries)
            }
        }
        deserializer.deserialize_map(V)
    }
}

impl BalanceSheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sheet with a zero entry for each participant, duplicates skipped.
    pub fn with_participants<'a>(participants: impl IntoIterator<Item = &'a ParticipantId>) -> Self {
        let mut sheet = Self::new();
        for participant in participants {
            sheet.ensure(participant);
        }
        sheet
    }

    /// Make sure `participant` has an entry, appending a zero one if needed.
    /// Returns `true` if an entry was added.
    pub fn ensure(&mut self, participant: &ParticipantId) -> bool {
        if self.contains(participant) {
            return false;
        }
        self.push(participant.clone(), Decimal::ZERO);
        true
    }

    /// Add `delta` to a participant's balance, creating the entry if needed.
    ///
    /// Saturates at the `Decimal` range instead of panicking. A [`Group`]
    /// keeps total spending representable, which bounds every balance, so
    /// sheets built from a group never saturate.
    ///
    /// [`Group`]: crate::core::group::Group
    pub fn adjust(&mut self, participant: &ParticipantId, delta: Decimal) {
        match self.index.get(participant) {
            Some(&i) => {
                let balance = &mut self.entries[i].1;
                *balance = balance.saturating_add(delta);
            }
            None => self.push(participant.clone(), delta),
        }
    }

    fn push(&mut self, participant: ParticipantId, balance: Decimal) {
        self.index.insert(participant.clone(), self.entries.len());
        self.entries.push((participant, balance));
    }

    pub fn contains(&self, participant: &ParticipantId) -> bool {
        self.index.contains_key(participant)
    }

    /// Balance of a participant; zero for unknown participants.
    pub fn balance(&self, participant: &ParticipantId) -> Decimal {
        self.index
            .get(participant)
            .map(|&i| self.entries[i].1)
            .unwrap_or(Decimal::ZERO)
    }

    /// Iterate entries in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&ParticipantId, Decimal)> {
        self.entries.iter().map(|(p, b)| (p, *b))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all balances. Zero for any sheet built from expenses, up to
    /// the last digit of decimal precision when shares do not divide evenly.
    pub fn total(&self) -> Decimal {
        self.entries
            .iter()
            .fold(Decimal::ZERO, |acc, (_, b)| acc.saturating_add(*b))
    }

    /// Sum of positive balances: what creditors are owed in total.
    pub fn total_owed(&self) -> Decimal {
        self.entries
            .iter()
            .map(|(_, b)| *b)
            .filter(|b| *b > Decimal::ZERO)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    /// Whether every balance is exactly zero.
    ///
    /// Uneven shares leave digits far below a cent, so a sheet from real
    /// expenses is often not exactly settled even though it needs no
    /// payment. Use [`is_settled_within`](Self::is_settled_within) with the
    /// settlement tolerance to match what the settlement plan reports.
    pub fn is_settled(&self) -> bool {
        self.entries.iter().all(|(_, b)| b.is_zero())
    }

    /// Whether every balance is smaller in magnitude than `tolerance`.
    pub fn is_settled_within(&self, tolerance: Decimal) -> bool {
        self.entries.iter().all(|(_, b)| b.abs() < tolerance)
    }
}

impl FromIterator<(ParticipantId, Decimal)> for BalanceSheet {
    fn from_iter<T: IntoIterator<Item = (ParticipantId, Decimal)>>(iter: T) -> Self {
        let mut sheet = Self::new();
        for (participant, delta) in iter {
            sheet.adjust(&participant, delta);
        }
        sheet
    }
}
