//! Collection game rules
//!
//! The game: each player tries to complete a collection by owning at least
//! one item of every mandatory background plus one item with the special
//! fur. Only the highest-scoring item per mandatory background counts
//! toward the final collection score, and a collection without the special
//! fur scores zero.

use crate::item::{Background, Fur, Item};
use crate::numeric::Money;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One slot a player must fill to complete the collection
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Requirement {
    /// Own at least one item with this background
    Background(Background),
    /// Own at least one item with the special fur
    SpecialFur,
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Requirement::Background(bg) => write!(f, "background:{}", bg),
            Requirement::SpecialFur => write!(f, "special-fur"),
        }
    }
}

/// Rule set for one auction game
///
/// Defaults match the standard collection game: three mandatory
/// backgrounds, "Solid Gold" as the special fur, and a starting budget of
/// 50 currency units per player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRules {
    /// Backgrounds every player must cover, in scoring order
    pub mandatory_backgrounds: Vec<Background>,
    /// Fur trait that gates the collection score
    pub special_fur: Fur,
    /// Budget each player starts the auction with
    pub starting_budget: Money,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            mandatory_backgrounds: vec![
                Background::new("Blue"),
                Background::new("Aquamarine"),
                Background::new("Yellow"),
            ],
            special_fur: Fur::new("Solid Gold"),
            starting_budget: Money::from_units(50),
        }
    }
}

impl GameRules {
    /// True when the background is one of the mandatory ones
    pub fn is_mandatory(&self, background: &Background) -> bool {
        self.mandatory_backgrounds.contains(background)
    }

    /// True when the item carries the special fur
    pub fn is_special(&self, item: &Item) -> bool {
        item.fur == self.special_fur
    }

    /// All requirements in a stable order: mandatory backgrounds first,
    /// special fur last
    pub fn requirements(&self) -> impl Iterator<Item = Requirement> + '_ {
        self.mandatory_backgrounds
            .iter()
            .cloned()
            .map(Requirement::Background)
            .chain(std::iter::once(Requirement::SpecialFur))
    }

    /// Number of slots in a complete collection
    pub fn requirement_count(&self) -> usize {
        self.mandatory_backgrounds.len() + 1
    }

    /// True when the item can fill the given requirement
    pub fn satisfies(&self, item: &Item, requirement: &Requirement) -> bool {
        match requirement {
            Requirement::Background(bg) => item.background == *bg,
            Requirement::SpecialFur => self.is_special(item),
        }
    }
}
