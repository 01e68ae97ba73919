use crate::showdown::*;

/// `{categoryOrdinal, tieBreakers[]}` per §4.1. Comparison is strict
/// lexicographic on `(category, tiebreak)`, matching the evaluator's total
/// order requirement (§8 "Evaluator total order").
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct HandRank {
    pub category: HandCategory,
    pub tiebreak: [u8; 5],
}

/// Best 5-card hand (canonical 5 + rank), picked from a 7-card multiset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Best5Hand {
    pub cards: [Card; 5],
    pub rank: HandRank,
}

/// Category-specific tie-break vector from a canonical 5-card hand.
pub fn tiebreak_vector(cat: HandCategory, h: &[Card; 5]) -> [u8; 5] {
    let r = [h[0].rank, h[1].rank, h[2].rank, h[3].rank, h[4].rank];
    match cat {
        HandCategory::StraightFlush | HandCategory::Straight => {
            let high = if is_wheel_ranks(&r) { 5 } else { r[0] };
            [high, 0, 0, 0, 0]
        }
        HandCategory::FourOfAKind => [r[0], r[4], 0, 0, 0],
        HandCategory::FullHouse => [r[0], r[3], 0, 0, 0],
        HandCategory::Flush => [r[0], r[1], r[2], r[3], r[4]],
        HandCategory::ThreeOfAKind => [r[0], r[3], r[4], 0, 0],
        HandCategory::TwoPair => [r[0], r[2], r[4], 0, 0],
        HandCategory::OnePair => [r[0], r[2], r[3], r[4], 0],
        HandCategory::HighCard => [r[0], r[1], r[2], r[3], r[4]],
    }
}

/// Classify any 5 cards and return (category, canonical 5-card layout).
pub fn classify_five_and_canonicalize(h5: [Card; 5]) -> (HandCategory, [Card; 5]) {
    let mut s = h5;
    sort_desc(&mut s);

    let mut cnt = [0u8; 15]; // indexed by rank 2..14
    for c in s.iter() {
        cnt[c.rank as usize] += 1;
    }

    let same_suit = s.iter().all(|c| c.suit == s[0].suit);

    let mut uniq: Vec<Rank> = s.iter().map(|c| c.rank).collect();
    uniq.dedup();

    let (has_straight, straight_ranks): (bool, [Rank; 5]) = if uniq.len() == 5 {
        let r = [uniq[0], uniq[1], uniq[2], uniq[3], uniq[4]];
        if is_run_desc_ranks(&r) {
            (true, r)
        } else {
            let mut set = r;
            set.sort_unstable();
            if set == [2, 3, 4, 5, 14] {
                (true, [5, 4, 3, 2, 14])
            } else {
                (false, [0; 5])
            }
        }
    } else {
        (false, [0; 5])
    };

    if has_straight && same_suit {
        let suit = s[0].suit;
        let k: [Card; 5] = std::array::from_fn(|i| {
            *s.iter()
                .find(|c| c.rank == straight_ranks[i] && c.suit == suit)
                .unwrap()
        });
        return (HandCategory::StraightFlush, k);
    }
    if let Some((x_rank, _)) = (2..=14)
        .rev()
        .map(|r| (r, cnt[r as usize]))
        .find(|&(_r, c)| c == 4)
    {
        let quads: Vec<Card> = s.iter().filter(|c| c.rank == x_rank).cloned().collect();
        let kicker = s.iter().cloned().find(|c| c.rank != x_rank).unwrap();
        return (
            HandCategory::FourOfAKind,
            [quads[0], quads[1], quads[2], quads[3], kicker],
        );
    }
    let trips_ranks: Vec<Rank> = (2..=14).rev().filter(|&r| cnt[r as usize] >= 3).collect();
    if !trips_ranks.is_empty() {
        let t = trips_ranks[0];
        let pair_cands: Vec<Rank> = (2..=14)
            .rev()
            .filter(|&r| r != t && cnt[r as usize] >= 2)
            .collect();
        if !pair_cands.is_empty() {
            let p = pair_cands[0];
            let trips: Vec<Card> = s.iter().filter(|c| c.rank == t).take(3).cloned().collect();
            let pair: Vec<Card> = s.iter().filter(|c| c.rank == p).take(2).cloned().collect();
            return (
                HandCategory::FullHouse,
                [trips[0], trips[1], trips[2], pair[0], pair[1]],
            );
        }
    }
    if same_suit {
        return (HandCategory::Flush, s);
    }
    if has_straight {
        let k: [Card; 5] = std::array::from_fn(|i| {
            s.iter()
                .filter(|c| c.rank == straight_ranks[i])
                .max_by_key(|c| c.suit)
                .cloned()
                .unwrap()
        });
        return (HandCategory::Straight, k);
    }
    if let Some((t, _)) = (2..=14)
        .rev()
        .map(|r| (r, cnt[r as usize]))
        .find(|&(_r, c)| c >= 3)
    {
        let trips: Vec<Card> = s.iter().filter(|c| c.rank == t).take(3).cloned().collect();
        let mut kickers: Vec<Card> = s.iter().filter(|c| c.rank != t).cloned().collect();
        sort_desc(&mut kickers);
        return (
            HandCategory::ThreeOfAKind,
            [trips[0], trips[1], trips[2], kickers[0], kickers[1]],
        );
    }
    let pairs: Vec<Rank> = (2..=14).rev().filter(|&r| cnt[r as usize] >= 2).collect();
    if pairs.len() >= 2 {
        let higher_pair_rank = pairs[0];
        let lower_pair_rank = pairs[1];
        let higher_pair: Vec<Card> = s
            .iter()
            .filter(|c| c.rank == higher_pair_rank)
            .take(2)
            .cloned()
            .collect();
        let lower_pair: Vec<Card> = s
            .iter()
            .filter(|c| c.rank == lower_pair_rank)
            .take(2)
            .cloned()
            .collect();
        let kicker = s
            .iter()
            .cloned()
            .find(|c| c.rank != higher_pair_rank && c.rank != lower_pair_rank)
            .unwrap();
        return (
            HandCategory::TwoPair,
            [
                higher_pair[0],
                higher_pair[1],
                lower_pair[0],
                lower_pair[1],
                kicker,
            ],
        );
    }
    if let Some((p, _)) = (2..=14)
        .rev()
        .map(|r| (r, cnt[r as usize]))
        .find(|&(_r, c)| c >= 2)
    {
        let pair: Vec<Card> = s.iter().filter(|c| c.rank == p).take(2).cloned().collect();
        let mut kickers: Vec<Card> = s.iter().filter(|c| c.rank != p).cloned().collect();
        sort_desc(&mut kickers);
        return (
            HandCategory::OnePair,
            [pair[0], pair[1], kickers[0], kickers[1], kickers[2]],
        );
    }
    (HandCategory::HighCard, s)
}

/// Enumerate all C(7,5)=21 subsets and pick the maximum by `HandRank`.
pub fn choose_best5_from7(seven: [Card; 7]) -> Best5Hand {
    let mut best: Option<Best5Hand> = None;

    for a in 0..=2 {
        for b in (a + 1)..=3 {
            for c in (b + 1)..=4 {
                for d in (c + 1)..=5 {
                    for e in (d + 1)..=6 {
                        let hand5 = [seven[a], seven[b], seven[c], seven[d], seven[e]];
                        let (cat, k5) = classify_five_and_canonicalize(hand5);
                        let tiebreak = tiebreak_vector(cat, &k5);
                        let rank = HandRank {
                            category: cat,
                            tiebreak,
                        };
                        if best.map_or(true, |b: Best5Hand| rank > b.rank) {
                            best = Some(Best5Hand { cards: k5, rank });
                        }
                    }
                }
            }
        }
    }
    best.expect("7 cards always yield at least one 5-card subset")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(rank: Rank, suit: Suit) -> Card {
        Card::new(rank, suit)
    }

    #[test]
    fn ordering_intra_category_straight_flush() {
        let royal = [
            c(14, Suit::Spades),
            c(13, Suit::Spades),
            c(12, Suit::Spades),
            c(11, Suit::Spades),
            c(10, Suit::Spades),
        ];
        let wheel = [
            c(5, Suit::Diamonds),
            c(4, Suit::Diamonds),
            c(3, Suit::Diamonds),
            c(2, Suit::Diamonds),
            c(14, Suit::Diamonds),
        ];
        let (cat_r, k_r) = classify_five_and_canonicalize(royal);
        let (cat_w, k_w) = classify_five_and_canonicalize(wheel);
        assert_eq!(cat_r, HandCategory::StraightFlush);
        assert_eq!(cat_w, HandCategory::StraightFlush);
        let rank_r = HandRank {
            category: cat_r,
            tiebreak: tiebreak_vector(cat_r, &k_r),
        };
        let rank_w = HandRank {
            category: cat_w,
            tiebreak: tiebreak_vector(cat_w, &k_w),
        };
        assert!(rank_r > rank_w, "royal flush beats the wheel");
    }

    #[test]
    fn cross_category_precedence() {
        let quads = [
            c(9, Suit::Clubs),
            c(9, Suit::Diamonds),
            c(9, Suit::Hearts),
            c(9, Suit::Spades),
            c(2, Suit::Clubs),
        ];
        let flush = [
            c(14, Suit::Spades),
            c(12, Suit::Spades),
            c(9, Suit::Spades),
            c(7, Suit::Spades),
            c(2, Suit::Spades),
        ];
        let (cat_q, k_q) = classify_five_and_canonicalize(quads);
        let (cat_f, k_f) = classify_five_and_canonicalize(flush);
        let rank_q = HandRank {
            category: cat_q,
            tiebreak: tiebreak_vector(cat_q, &k_q),
        };
        let rank_f = HandRank {
            category: cat_f,
            tiebreak: tiebreak_vector(cat_f, &k_f),
        };
        assert!(rank_q > rank_f);
    }

    #[test]
    fn tie_equality_across_suits() {
        let fl_s = [
            c(14, Suit::Spades),
            c(12, Suit::Spades),
            c(9, Suit::Spades),
            c(7, Suit::Spades),
            c(2, Suit::Spades),
        ];
        let fl_h = [
            c(14, Suit::Hearts),
            c(12, Suit::Hearts),
            c(9, Suit::Hearts),
            c(7, Suit::Hearts),
            c(2, Suit::Hearts),
        ];
        let (cat_s, k_s) = classify_five_and_canonicalize(fl_s);
        let (cat_h, k_h) = classify_five_and_canonicalize(fl_h);
        let rank_s = HandRank {
            category: cat_s,
            tiebreak: tiebreak_vector(cat_s, &k_s),
        };
        let rank_h = HandRank {
            category: cat_h,
            tiebreak: tiebreak_vector(cat_h, &k_h),
        };
        assert_eq!(rank_s, rank_h);
    }

    #[test]
    fn comparison_is_antisymmetric() {
        let a_rank = HandRank {
            category: HandCategory::HighCard,
            tiebreak: [14, 13, 9, 7, 2],
        };
        let b_rank = HandRank {
            category: HandCategory::HighCard,
            tiebreak: [14, 13, 9, 7, 3],
        };
        assert_eq!(a_rank.cmp(&b_rank).reverse(), b_rank.cmp(&a_rank));
    }

    #[test]
    fn choose_best5_from7_picks_the_nuts() {
        // Board: Ah Kh Qh Jh Th (royal flush on board), hole cards irrelevant.
        let seven = [
            c(14, Suit::Hearts),
            c(13, Suit::Hearts),
            c(12, Suit::Hearts),
            c(11, Suit::Hearts),
            c(10, Suit::Hearts),
            c(2, Suit::Clubs),
            c(3, Suit::Diamonds),
        ];
        let best = choose_best5_from7(seven);
        assert_eq!(best.rank.category, HandCategory::StraightFlush);
        assert_eq!(best.rank.tiebreak[0], 14);
    }

    #[test]
    fn choose_best5_from7_uses_best_five_of_seven() {
        // Board has two pair (AA KK); one hole card makes trip aces.
        let seven = [
            c(14, Suit::Clubs),
            c(14, Suit::Diamonds),
            c(13, Suit::Clubs),
            c(13, Suit::Diamonds),
            c(2, Suit::Hearts),
            c(14, Suit::Hearts),
            c(9, Suit::Spades),
        ];
        let best = choose_best5_from7(seven);
        assert_eq!(best.rank.category, HandCategory::FullHouse);
    }
}
