//! Item catalog loading
//!
//! The catalog is the full set of auctionable tokens, loaded once before
//! the auction starts and immutable afterwards. Source records either
//! carry a precomputed rarity score or per-trait rarity fractions, in
//! which case the score is derived as the sum of reciprocal rarities:
//! a trait shared by 4% of the collection contributes `1 / 0.04 = 25`.

use crate::errors::CatalogError;
use crate::ids::TokenId;
use crate::item::{Background, Fur, Item};
use crate::numeric::Score;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One raw catalog row as loaded from the source data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRecord {
    /// Token id
    pub id: u64,
    /// Background trait name
    pub background: String,
    /// Fur trait name
    pub fur: String,
    /// Precomputed rarity score, if the source provides one
    #[serde(default)]
    pub total_score: Option<Decimal>,
    /// Per-trait rarity fractions, keyed by trait column name
    ///
    /// Used to derive the score when `total_score` is absent. Each value
    /// is the fraction of the collection sharing the trait and must be
    /// strictly positive.
    #[serde(default)]
    pub attribute_rarities: BTreeMap<String, Decimal>,
}

/// Immutable set of all auctionable items, keyed by token id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    items: BTreeMap<TokenId, Item>,
}

impl Catalog {
    /// Build a catalog from raw records, deriving scores where needed
    pub fn from_records(records: Vec<ItemRecord>) -> Result<Self, CatalogError> {
        let mut items = BTreeMap::new();

        for record in records {
            let token = TokenId::new(record.id);
            if items.contains_key(&token) {
                return Err(CatalogError::DuplicateToken { token });
            }

            let background =
                Background::try_new(record.background).ok_or_else(|| CatalogError::EmptyTrait {
                    token,
                    attribute: "background".to_string(),
                })?;
            let fur = Fur::try_new(record.fur).ok_or_else(|| CatalogError::EmptyTrait {
                token,
                attribute: "fur".to_string(),
            })?;

            let score = match record.total_score {
                Some(value) => {
                    Score::try_new(value).ok_or(CatalogError::NegativeScore { token, value })?
                }
                None => derive_score(token, &record.attribute_rarities)?,
            };

            items.insert(token, Item::new(token, background, fur, score));
        }

        Ok(Self { items })
    }

    /// Look up an item by token id
    pub fn get(&self, token: TokenId) -> Option<&Item> {
        self.items.get(&token)
    }

    /// True when the token exists in the catalog
    pub fn contains(&self, token: TokenId) -> bool {
        self.items.contains_key(&token)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate items in token order
    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    /// Iterate token ids in order
    pub fn tokens(&self) -> impl Iterator<Item = TokenId> + '_ {
        self.items.keys().copied()
    }
}

/// Sum of reciprocal trait rarities
fn derive_score(
    token: TokenId,
    rarities: &BTreeMap<String, Decimal>,
) -> Result<Score, CatalogError> {
    if rarities.is_empty() {
        return Err(CatalogError::MissingScore { token });
    }

    let mut total = Decimal::ZERO;
    for (attribute, &value) in rarities {
        if value <= Decimal::ZERO {
            return Err(CatalogError::NonPositiveRarity {
                token,
                attribute: attribute.clone(),
                value,
            });
        }
        total += Decimal::ONE / value;
    }

    Ok(Score::new(total))
}
