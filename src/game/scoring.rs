use crate::dealer::NUM_SEATS;
use crate::seating::PlayerOrder;

/// Per-seat score change of a finished game.
///
/// The landlord plays alone against the two farmers: it wins or loses twice the final score
/// while each farmer loses or wins the score once, so the three deltas always sum to zero.
/// The landlord wins when it is the seat that emptied its hand.
pub fn score_deltas(landlord: usize, winner: usize, score: u32) -> [i64; NUM_SEATS] {
    let score = i64::from(score);
    let landlord_delta = if winner == landlord { 2 * score } else { -2 * score };
    let mut deltas = [-landlord_delta / 2; NUM_SEATS];
    deltas[landlord] = landlord_delta;
    deltas
}

/// Re-indexes per-seat deltas by bot.
pub fn deltas_by_bot(seat_deltas: [i64; NUM_SEATS], order: PlayerOrder) -> [i64; NUM_SEATS] {
    let mut by_bot = [0; NUM_SEATS];
    for (seat, delta) in seat_deltas.into_iter().enumerate() {
        by_bot[order.bot_at(seat)] = delta;
    }
    by_bot
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn landlord_wins() {
        assert_eq!(score_deltas(2, 2, 3), [-3, -3, 6]);
    }

    #[test]
    fn farmers_win() {
        assert_eq!(score_deltas(0, 1, 2), [-4, 2, 2]);
        assert_eq!(score_deltas(0, 2, 2), [-4, 2, 2]);
    }

    #[test]
    fn always_zero_sum() {
        for landlord in 0..NUM_SEATS {
            for winner in 0..NUM_SEATS {
                for score in [1, 2, 3, 6, 12, 96, 3 << 14] {
                    let deltas = score_deltas(landlord, winner, score);
                    assert_eq!(deltas.iter().sum::<i64>(), 0);
                }
            }
        }
    }

    #[test]
    fn seat_deltas_follow_the_bots() {
        let order = PlayerOrder::new([2, 0, 1]).unwrap();
        // seat 0 is bot 2, seat 1 is bot 0, seat 2 is bot 1
        assert_eq!(deltas_by_bot([6, -3, -3], order), [-3, -3, 6]);
    }
}
