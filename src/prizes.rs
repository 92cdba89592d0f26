//! Prize pool entries, totals and formatting.

use crate::config::DEFAULT_PRIZE_COUNT;
use crate::error::{Result, StoreError};
use crate::metrics::group_thousands;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PrizeType {
    #[default]
    Jpy,
    Usd,
    Coin,
    Ticket,
    Item,
}

impl PrizeType {
    pub const ALL: [PrizeType; 5] = [
        PrizeType::Usd,
        PrizeType::Jpy,
        PrizeType::Coin,
        PrizeType::Ticket,
        PrizeType::Item,
    ];

    pub fn code(self) -> &'static str {
        match self {
            PrizeType::Jpy => "JPY",
            PrizeType::Usd => "USD",
            PrizeType::Coin => "COIN",
            PrizeType::Ticket => "TICKET",
            PrizeType::Item => "ITEM",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.code() == code)
    }
}

impl fmt::Display for PrizeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A numeric amount, or free text for ITEM prizes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrizeAmount {
    Number(f64),
    Text(String),
}

impl Default for PrizeAmount {
    fn default() -> Self {
        PrizeAmount::Number(0.0)
    }
}

impl PrizeAmount {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            PrizeAmount::Number(n) => Some(*n),
            PrizeAmount::Text(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrizeEntry {
    #[serde(default)]
    pub id: u32,
    #[serde(default)]
    pub position: u32,
    #[serde(rename = "type", default)]
    pub prize_type: PrizeType,
    #[serde(default)]
    pub amount: PrizeAmount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl PrizeEntry {
    fn zero_usd(position: u32) -> Self {
        Self {
            id: position,
            position,
            prize_type: PrizeType::Usd,
            amount: PrizeAmount::Number(0.0),
            description: None,
        }
    }

    /// What the prize board shows for this entry.
    pub fn display_amount(&self) -> String {
        match (&self.amount, self.prize_type) {
            (PrizeAmount::Text(text), _) => text.clone(),
            (PrizeAmount::Number(n), prize_type) => format_prize(*n, prize_type),
        }
    }
}

/// Ranked prize entries; positions are always `1..=len`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<PrizeEntry>", into = "Vec<PrizeEntry>")]
pub struct PrizeList {
    entries: Vec<PrizeEntry>,
}

impl PrizeList {
    pub fn entries(&self) -> &[PrizeEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn push_default(&mut self) {
        let position = self.entries.len() as u32 + 1;
        self.entries.push(PrizeEntry::zero_usd(position));
    }

    /// Remove the entry at `position` and close the gap. The last entry is kept.
    pub fn remove(&mut self, position: u32) -> Result<()> {
        let index = self.index_of(position)?;
        if self.entries.len() <= 1 {
            return Err(StoreError::LastPrize);
        }
        self.entries.remove(index);
        self.renumber();
        Ok(())
    }

    /// Switching to ITEM clears the amount to empty text; switching away resets it to 0.
    pub fn set_type(&mut self, position: u32, prize_type: PrizeType) -> Result<()> {
        let index = self.index_of(position)?;
        let entry = &mut self.entries[index];
        entry.amount = match (prize_type, &entry.amount) {
            (PrizeType::Item, _) => PrizeAmount::Text(String::new()),
            (_, PrizeAmount::Number(n)) => PrizeAmount::Number(*n),
            (_, PrizeAmount::Text(_)) => PrizeAmount::Number(0.0),
        };
        entry.prize_type = prize_type;
        Ok(())
    }

    /// Text amounts are only kept for ITEM prizes; other types parse the text as a number.
    pub fn set_amount(&mut self, position: u32, amount: PrizeAmount) -> Result<()> {
        let index = self.index_of(position)?;
        let entry = &mut self.entries[index];
        entry.amount = match (entry.prize_type, amount) {
            (PrizeType::Item, PrizeAmount::Number(n)) => PrizeAmount::Text(n.to_string()),
            (PrizeType::Item, text) => text,
            (_, PrizeAmount::Text(text)) => {
                PrizeAmount::Number(text.trim().parse::<f64>().unwrap_or(0.0).max(0.0))
            }
            (_, PrizeAmount::Number(n)) => PrizeAmount::Number(n.max(0.0)),
        };
        Ok(())
    }

    pub fn total(&self, prize_type: PrizeType) -> f64 {
        prize_pool_total(&self.entries, prize_type)
    }

    fn index_of(&self, position: u32) -> Result<usize> {
        self.entries
            .iter()
            .position(|p| p.position == position)
            .ok_or(StoreError::PrizeNotFound(position))
    }

    fn renumber(&mut self) {
        for (i, entry) in self.entries.iter_mut().enumerate() {
            entry.position = i as u32 + 1;
            entry.id = entry.position;
        }
    }
}

impl Default for PrizeList {
    fn default() -> Self {
        (1..=DEFAULT_PRIZE_COUNT).map(PrizeEntry::zero_usd).collect::<Vec<_>>().into()
    }
}

impl From<Vec<PrizeEntry>> for PrizeList {
    fn from(entries: Vec<PrizeEntry>) -> Self {
        let mut list = Self { entries };
        list.renumber();
        list
    }
}

impl From<PrizeList> for Vec<PrizeEntry> {
    fn from(list: PrizeList) -> Self {
        list.entries
    }
}

/// Sum of numeric amounts for one prize type. Text amounts never count.
pub fn prize_pool_total(prizes: &[PrizeEntry], prize_type: PrizeType) -> f64 {
    prizes
        .iter()
        .filter(|p| p.prize_type == prize_type)
        .filter_map(|p| p.amount.as_number())
        .sum()
}

/// Most frequent prize type; ties go to the type seen first. JPY for an empty list.
pub fn dominant_prize_type(prizes: &[PrizeEntry]) -> PrizeType {
    let mut counts: Vec<(PrizeType, usize)> = Vec::new();
    for prize in prizes {
        match counts.iter_mut().find(|(t, _)| *t == prize.prize_type) {
            Some((_, count)) => *count += 1,
            None => counts.push((prize.prize_type, 1)),
        }
    }

    let mut dominant = PrizeType::Jpy;
    let mut max_count = 0;
    for (prize_type, count) in counts {
        if count > max_count {
            max_count = count;
            dominant = prize_type;
        }
    }
    dominant
}

pub fn format_prize(amount: f64, prize_type: PrizeType) -> String {
    let number = format_amount(amount);
    match prize_type {
        PrizeType::Usd => format!("${}", number),
        PrizeType::Jpy => format!("¥{}", number),
        PrizeType::Coin => format!("{} COIN", number),
        PrizeType::Item => amount.to_string(),
        PrizeType::Ticket => number,
    }
}

fn format_amount(amount: f64) -> String {
    let amount = if amount.is_finite() { amount.max(0.0) } else { 0.0 };
    let whole = amount.trunc() as u64;
    let cents = ((amount - amount.trunc()) * 100.0).round() as u64;
    match cents {
        0 => group_thousands(whole),
        100 => group_thousands(whole + 1),
        c => format!("{}.{:02}", group_thousands(whole), c),
    }
}

/// `1st`, `2nd`, `3rd`, `4th`, ... `11th`, `12th`, `13th`, `21st`.
pub fn ordinal(position: u32) -> String {
    let suffix = match (position % 10, position % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{}", position, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(prize_type: PrizeType, amount: PrizeAmount) -> PrizeEntry {
        PrizeEntry {
            id: 0,
            position: 0,
            prize_type,
            amount,
            description: None,
        }
    }

    #[test]
    fn totals_skip_other_types_and_text() {
        let prizes = vec![
            entry(PrizeType::Usd, PrizeAmount::Number(500.0)),
            entry(PrizeType::Usd, PrizeAmount::Number(250.0)),
            entry(PrizeType::Jpy, PrizeAmount::Number(10_000.0)),
            entry(PrizeType::Item, PrizeAmount::Text("Trophy".into())),
        ];
        assert_eq!(prize_pool_total(&prizes, PrizeType::Usd), 750.0);
        assert_eq!(prize_pool_total(&prizes, PrizeType::Item), 0.0);
        assert_eq!(dominant_prize_type(&prizes), PrizeType::Usd);
    }

    #[test]
    fn default_list_is_three_usd_entries() {
        let list = PrizeList::default();
        assert_eq!(list.len(), 3);
        assert!(list.entries().iter().all(|p| p.prize_type == PrizeType::Usd));
        assert_eq!(
            list.entries().iter().map(|p| p.position).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn removing_closes_gaps_and_keeps_last() {
        let mut list = PrizeList::default();
        list.remove(2).unwrap();
        assert_eq!(
            list.entries().iter().map(|p| (p.position, p.id)).collect::<Vec<_>>(),
            vec![(1, 1), (2, 2)]
        );
        assert_eq!(list.remove(9), Err(StoreError::PrizeNotFound(9)));
        list.remove(1).unwrap();
        assert_eq!(list.remove(1), Err(StoreError::LastPrize));
    }

    #[test]
    fn switching_to_item_and_back_swaps_amount_kind() {
        let mut list = PrizeList::default();
        list.set_amount(1, PrizeAmount::Number(300.0)).unwrap();
        list.set_type(1, PrizeType::Item).unwrap();
        assert_eq!(list.entries()[0].amount, PrizeAmount::Text(String::new()));
        list.set_amount(1, PrizeAmount::Text("Watch".into())).unwrap();
        assert_eq!(list.entries()[0].display_amount(), "Watch");
        list.set_type(1, PrizeType::Coin).unwrap();
        assert_eq!(list.entries()[0].amount, PrizeAmount::Number(0.0));
    }

    #[test]
    fn numeric_types_parse_text_amounts() {
        let mut list = PrizeList::default();
        list.set_amount(2, PrizeAmount::Text(" 1200 ".into())).unwrap();
        assert_eq!(list.entries()[1].amount, PrizeAmount::Number(1200.0));
        assert_eq!(list.total(PrizeType::Usd), 1200.0);
    }

    #[test]
    fn formats_by_type() {
        assert_eq!(format_prize(1500.0, PrizeType::Usd), "$1,500");
        assert_eq!(format_prize(10000.0, PrizeType::Jpy), "¥10,000");
        assert_eq!(format_prize(250.0, PrizeType::Coin), "250 COIN");
        assert_eq!(format_prize(12.5, PrizeType::Ticket), "12.50");
    }

    #[test]
    fn ordinals() {
        let got: Vec<String> = [1, 2, 3, 4, 11, 12, 13, 21, 22, 101].into_iter().map(ordinal).collect();
        assert_eq!(
            got,
            vec!["1st", "2nd", "3rd", "4th", "11th", "12th", "13th", "21st", "22nd", "101st"]
        );
    }

    #[test]
    fn stored_entries_accept_numbers_and_text() {
        let json = r#"[{"id":7,"position":3,"type":"ITEM","amount":"Trophy"},
                       {"position":1,"type":"USD","amount":100}]"#;
        let list: PrizeList = serde_json::from_str(json).unwrap();
        assert_eq!(list.entries()[0].position, 1);
        assert_eq!(list.entries()[0].amount, PrizeAmount::Text("Trophy".into()));
        assert_eq!(list.entries()[1].amount, PrizeAmount::Number(100.0));
    }
}
