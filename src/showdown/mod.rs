//! showdown: shared types, constants, helpers for 5-from-7 hand ranking.

use core::cmp::Ordering;
use serde::{Deserialize, Serialize};

pub type Rank = u8; // 2..14 (A=14)
pub type Index = u8; // 1..52 (1-based)

#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Suit {
    Clubs = 0,
    Diamonds = 1,
    Hearts = 2,
    Spades = 3,
}

impl Suit {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn from_u8(value: u8) -> Self {
        match value {
            0 => Suit::Clubs,
            1 => Suit::Diamonds,
            2 => Suit::Hearts,
            3 => Suit::Spades,
            _ => panic!("invalid suit value: {value}"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub rank: Rank, // 2..14
    pub suit: Suit,
}

impl Card {
    pub fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }
}

#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HandCategory {
    HighCard = 0,
    OnePair = 1,
    TwoPair = 2,
    ThreeOfAKind = 3,
    Straight = 4,
    Flush = 5,
    FullHouse = 6,
    FourOfAKind = 7,
    StraightFlush = 8, // Royal is SF with high=14
}

impl HandCategory {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Human-readable label used for `winningRankLabel` (§4.2 step 3).
    pub fn label(self) -> &'static str {
        match self {
            HandCategory::HighCard => "high card",
            HandCategory::OnePair => "one pair",
            HandCategory::TwoPair => "two pair",
            HandCategory::ThreeOfAKind => "three of a kind",
            HandCategory::Straight => "straight",
            HandCategory::Flush => "flush",
            HandCategory::FullHouse => "full house",
            HandCategory::FourOfAKind => "four of a kind",
            HandCategory::StraightFlush => "straight flush",
        }
    }
}

/// Deterministic 1..52 -> Card mapping; 0=C,1=D,2=H,3=S; rank 2..14
#[inline]
pub fn decode_card(i: Index) -> Card {
    assert!((1..=52).contains(&i), "index out of range");
    let j = i - 1; // 0..51
    let suit = Suit::from_u8(j / 13);
    let r0 = j % 13;
    let rank = r0 + 2;
    Card { rank, suit }
}

/// Inverse of `decode_card`: (rank, suit) -> 1..52
#[inline]
pub fn idx_of(rank: Rank, suit: Suit) -> Index {
    assert!((2..=14).contains(&rank));
    13 * suit.as_u8() + (rank - 2) + 1
}

/// Deterministic sort-by-rank-desc, then suit-desc
pub fn sort_desc(cards: &mut [Card]) {
    cards.sort_by(|a, b| match b.rank.cmp(&a.rank) {
        Ordering::Equal => b.suit.cmp(&a.suit),
        o => o,
    });
}

#[inline]
pub fn is_wheel_ranks(r: &[Rank; 5]) -> bool {
    r[0] == 5 && r[1] == 4 && r[2] == 3 && r[3] == 2 && r[4] == 14
}

#[inline]
pub fn is_run_desc_ranks(r: &[Rank; 5]) -> bool {
    r[0] == r[1] + 1 && r[1] == r[2] + 1 && r[2] == r[3] + 1 && r[3] == r[4] + 1
}

pub mod native;

pub use native::{choose_best5_from7, classify_five_and_canonicalize, tiebreak_vector, HandRank};
