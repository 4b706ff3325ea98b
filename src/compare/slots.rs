use serde::Serialize;
use thiserror::Error;

use crate::product::model::ProductSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Slot {
    First,
    Second,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("slot must be 1 or 2, got {0}")]
pub struct InvalidSlot(pub u8);

impl TryFrom<u8> for Slot {
    type Error = InvalidSlot;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        match n {
            1 => Ok(Self::First),
            2 => Ok(Self::Second),
            other => Err(InvalidSlot(other)),
        }
    }
}

/// The two products picked for a comparison. Either slot may hold any product,
/// including the one already in the other slot.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SelectionSlots {
    first: Option<ProductSummary>,
    second: Option<ProductSummary>,
}

impl SelectionSlots {
    pub fn select(&mut self, slot: Slot, product: ProductSummary) {
        *self.slot_mut(slot) = Some(product);
    }

    pub fn get(&self, slot: Slot) -> Option<&ProductSummary> {
        match slot {
            Slot::First => self.first.as_ref(),
            Slot::Second => self.second.as_ref(),
        }
    }

    pub fn unselect(&mut self, slot: Slot) -> Option<ProductSummary> {
        self.slot_mut(slot).take()
    }

    /// Codes of both selections once both slots are filled.
    pub fn codes(&self) -> Option<(&str, &str)> {
        match (&self.first, &self.second) {
            (Some(a), Some(b)) => Some((a.code.as_str(), b.code.as_str())),
            _ => None,
        }
    }

    fn slot_mut(&mut self, slot: Slot) -> &mut Option<ProductSummary> {
        match slot {
            Slot::First => &mut self.first,
            Slot::Second => &mut self.second,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::summary;

    #[test]
    fn slot_numbers() {
        assert_eq!(Slot::try_from(1), Ok(Slot::First));
        assert_eq!(Slot::try_from(2), Ok(Slot::Second));
        assert_eq!(Slot::try_from(3), Err(InvalidSlot(3)));
    }

    #[test]
    fn select_overwrites_only_its_slot() {
        let mut slots = SelectionSlots::default();
        slots.select(Slot::First, summary("1"));
        slots.select(Slot::Second, summary("2"));
        slots.select(Slot::First, summary("3"));

        assert_eq!(slots.get(Slot::First).map(|p| p.code.as_str()), Some("3"));
        assert_eq!(slots.get(Slot::Second).map(|p| p.code.as_str()), Some("2"));
        assert_eq!(slots.codes(), Some(("3", "2")));
    }

    #[test]
    fn same_product_in_both_slots_is_accepted() {
        let mut slots = SelectionSlots::default();
        slots.select(Slot::First, summary("42"));
        slots.select(Slot::Second, summary("42"));
        assert_eq!(slots.codes(), Some(("42", "42")));
    }

    #[test]
    fn codes_need_both_slots() {
        let mut slots = SelectionSlots::default();
        assert_eq!(slots.codes(), None);
        slots.select(Slot::Second, summary("2"));
        assert_eq!(slots.codes(), None);
        assert_eq!(
            slots.unselect(Slot::Second).map(|p| p.code),
            Some("2".into())
        );
        assert_eq!(slots.get(Slot::Second), None);
    }
}
