use rand::Rng;

/* Game is the engine for the bot's simplified blackjack variant.
 * Cards are plain point values from 2 to 11 drawn uniformly, with no suits
 * and no soft hands (an ace is always worth 11). The player draws against
 * a dealer who must keep drawing below a fixed stand threshold.
 */

// A card is just its point value.
pub type Card = u8;

pub const CARD_MIN: Card = 2;
pub const CARD_MAX: Card = 11;

// A hand totalling more than this is bust.
pub const BUST_LIMIT: u32 = 21;

// The dealer draws while strictly below this total.
pub const DEALER_STAND: u32 = 17;

/* Utility Functions */

// Draws one card uniformly from the full value range.
pub fn draw_card<R: Rng>(rng: &mut R) -> Card {
    rng.gen_range(CARD_MIN..=CARD_MAX)
}

// Sums a hand. Totals can exceed the bust limit, the caller decides what
// that means.
pub fn hand_total(hand: &[Card]) -> u32 {
    hand.iter().map(|&card| u32::from(card)).sum()
}

// Result of a finished round, from the player's point of view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Outcome {
    Win,
    Loss,
    Draw,
}

impl Outcome {
    // Signed change to the player's token balance for a given bet.
    pub fn token_delta(&self, bet: i64) -> i64 {
        match self {
            Outcome::Win => bet,
            Outcome::Loss => -bet,
            Outcome::Draw => 0,
        }
    }
}

/* Main structure of Game.
 * One round of blackjack: the wagered amount and both hands.
 * A round starts with two player cards against one dealer card.
 */
#[derive(Clone, Debug, PartialEq)]
pub struct BlackjackGame {
    pub bet: i64,
    pub player: Vec<Card>,
    pub dealer: Vec<Card>,
}

impl BlackjackGame {
    // Deals a fresh round: two cards for the player, one for the dealer.
    pub fn deal<R: Rng>(bet: i64, rng: &mut R) -> Self {
        BlackjackGame {
            bet,
            player: vec![draw_card(rng), draw_card(rng)],
            dealer: vec![draw_card(rng)],
        }
    }

    pub fn player_total(&self) -> u32 {
        hand_total(&self.player)
    }

    pub fn dealer_total(&self) -> u32 {
        hand_total(&self.dealer)
    }

    // Draws one more card for the player and returns it.
    pub fn hit<R: Rng>(&mut self, rng: &mut R) -> Card {
        let card = draw_card(rng);
        self.player.push(card);
        card
    }

    pub fn is_player_bust(&self) -> bool {
        self.player_total() > BUST_LIMIT
    }

    // Plays out the dealer's hand: draw while under the stand threshold.
    pub fn resolve_dealer<R: Rng>(&mut self, rng: &mut R) {
        while self.dealer_total() < DEALER_STAND {
            let card = draw_card(rng);
            self.dealer.push(card);
        }
    }

    /* Compares the finished hands, assuming the player stood in time.
     * A dealer bust is always a win for the player; otherwise the higher
     * total wins and equal totals push.
     */
    pub fn outcome(&self) -> Outcome {
        let player = self.player_total();
        let dealer = self.dealer_total();
        if dealer > BUST_LIMIT || player > dealer {
            Outcome::Win
        } else if player < dealer {
            Outcome::Loss
        } else {
            Outcome::Draw
        }
    }
}
