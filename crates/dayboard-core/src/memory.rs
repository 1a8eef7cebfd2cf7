//! Memory-match break game.
//!
//! Twelve icon pairs are shuffled face down. At most two cards are face up;
//! a pair that does not match stays visible until the next flip (or
//! [`MemoryGame::hide`]) turns it back. Every second card flipped is one move,
//! and the lowest move count of a finished game is kept as the best score.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_pcg::Mcg128Xsl64;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{GameError, PersistenceError};
use crate::storage::ItemDb;

const GAME_KEY: &str = "memory_match_game";
const BEST_KEY: &str = "memory_match_best_score";

pub const ICONS: [&str; 12] = [
    "circle", "square", "triangle", "heart", "star", "diamond", "moon", "sun", "cloud", "flower",
    "leaf", "drop",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub icon: String,
    pub matched: bool,
}

/// Result of turning one card over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum FlipOutcome {
    /// First card of a move.
    Revealed { icon: String },
    /// Second card matched the first.
    Matched { icon: String },
    /// Second card did not match; both stay face up until the next flip.
    Mismatched { first: String, second: String },
    /// The last pair was found.
    Completed { moves: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryGame {
    cards: Vec<Card>,
    face_up: Vec<usize>,
    moves: u32,
}

impl MemoryGame {
    /// A shuffled deck. The same seed always deals the same layout.
    pub fn new(seed: Option<u64>) -> Self {
        let mut rng = match seed {
            Some(seed) => Mcg128Xsl64::seed_from_u64(seed),
            None => Mcg128Xsl64::from_entropy(),
        };
        let mut cards: Vec<Card> = ICONS
            .iter()
            .chain(ICONS.iter())
            .map(|icon| Card {
                icon: icon.to_string(),
                matched: false,
            })
            .collect();
        cards.shuffle(&mut rng);
        Self {
            cards,
            face_up: Vec::new(),
            moves: 0,
        }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn matched_pairs(&self) -> usize {
        self.cards.iter().filter(|c| c.matched).count() / 2
    }

    pub fn is_complete(&self) -> bool {
        self.cards.iter().all(|c| c.matched)
    }

    /// Icons a player can see: matched cards and the ones face up.
    pub fn board(&self) -> Vec<Option<&str>> {
        self.cards
            .iter()
            .enumerate()
            .map(|(i, c)| (c.matched || self.face_up.contains(&i)).then_some(c.icon.as_str()))
            .collect()
    }

    /// Turn a mismatched pair back over.
    pub fn hide(&mut self) {
        self.face_up.clear();
    }

    pub fn flip(&mut self, index: usize) -> Result<FlipOutcome, GameError> {
        if self.is_complete() {
            return Err(GameError::Finished);
        }
        let len = self.cards.len();
        let card = self
            .cards
            .get(index)
            .ok_or(GameError::OutOfRange { index, len })?;
        if card.matched {
            return Err(GameError::AlreadyMatched(index));
        }
        if self.face_up.len() == 2 {
            self.hide();
        }
        if self.face_up.contains(&index) {
            return Err(GameError::AlreadyFaceUp(index));
        }

        self.face_up.push(index);
        let (first, second) = match self.face_up.as_slice() {
            &[first, second] => (first, second),
            _ => {
                return Ok(FlipOutcome::Revealed {
                    icon: self.cards[index].icon.clone(),
                })
            }
        };

        self.moves += 1;
        if self.cards[first].icon != self.cards[second].icon {
            return Ok(FlipOutcome::Mismatched {
                first: self.cards[first].icon.clone(),
                second: self.cards[second].icon.clone(),
            });
        }

        self.cards[first].matched = true;
        self.cards[second].matched = true;
        self.face_up.clear();
        if self.is_complete() {
            debug!(moves = self.moves, "memory game finished");
            return Ok(FlipOutcome::Completed { moves: self.moves });
        }
        Ok(FlipOutcome::Matched {
            icon: self.cards[first].icon.clone(),
        })
    }

    /// The game in progress, if any. An unreadable stored game is dropped.
    pub fn load(db: &ItemDb) -> Result<Option<Self>, PersistenceError> {
        let Some(raw) = db.kv_get(GAME_KEY)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(game) => Ok(Some(game)),
            Err(e) => {
                warn!("discarding stored memory game: {e}");
                Ok(None)
            }
        }
    }

    pub fn save(&self, db: &ItemDb) -> Result<(), PersistenceError> {
        db.kv_set(GAME_KEY, &serde_json::to_string(self)?)
    }
}

/// Fewest moves of any finished game.
pub fn best_score(db: &ItemDb) -> Result<Option<u32>, PersistenceError> {
    Ok(db.kv_get(BEST_KEY)?.and_then(|raw| raw.trim().parse().ok()))
}

/// Keep `moves` if it beats the stored best. Returns whether it did.
pub fn record_score(db: &ItemDb, moves: u32) -> Result<bool, PersistenceError> {
    if best_score(db)?.is_some_and(|best| best <= moves) {
        return Ok(false);
    }
    db.kv_set(BEST_KEY, &moves.to_string())?;
    Ok(true)
}
