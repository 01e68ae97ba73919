//! 52-card deck with a deterministic, seed-reproducible shuffle (§2 Card & Deck).

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::showdown::{decode_card, Card};

/// A shuffled deck. `cards[0]` is the top of the deck (first to be dealt).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// Builds a full 52-card deck shuffled deterministically from `seed`,
    /// matching the teacher's `StdRng::seed_from_u64(seed)` demo convention.
    pub fn shuffled(seed: u64) -> Self {
        let mut cards: Vec<Card> = (1..=52u8).map(decode_card).collect();
        let mut rng = StdRng::seed_from_u64(seed);
        // Fisher-Yates, high to low, so the same seed always yields the same order.
        for i in (1..cards.len()).rev() {
            let j = rng.gen_range(0..=i);
            cards.swap(i, j);
        }
        Self { cards }
    }

    /// Rebuilds a deck from its remaining cards (used when replaying from a snapshot).
    pub fn from_remaining(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    pub fn remaining(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Removes and returns the top card.
    pub fn draw(&mut self) -> Option<Card> {
        if self.cards.is_empty() {
            None
        } else {
            Some(self.cards.remove(0))
        }
    }

    /// Burns one card then deals `n`, per §4.4.3's 4/2/2 rule.
    pub fn burn_and_deal(&mut self, n: usize) -> Vec<Card> {
        self.draw();
        (0..n).filter_map(|_| self.draw()).collect()
    }

    pub fn into_remaining(self) -> Vec<Card> {
        self.cards
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_yields_same_order() {
        let a = Deck::shuffled(42);
        let b = Deck::shuffled(42);
        assert_eq!(a.remaining(), b.remaining());
    }

    #[test]
    fn different_seeds_usually_differ() {
        let a = Deck::shuffled(1);
        let b = Deck::shuffled(2);
        assert_ne!(a.remaining(), b.remaining());
    }

    #[test]
    fn shuffle_contains_all_52_distinct_cards() {
        let d = Deck::shuffled(7);
        assert_eq!(d.len(), 52);
        let mut seen = std::collections::HashSet::new();
        for c in d.remaining() {
            assert!(seen.insert(*c), "duplicate card in deck: {:?}", c);
        }
    }

    #[test]
    fn burn_and_deal_consumes_n_plus_one() {
        let mut d = Deck::shuffled(3);
        let before = d.len();
        let dealt = d.burn_and_deal(3);
        assert_eq!(dealt.len(), 3);
        assert_eq!(d.len(), before - 4);
    }
}
