//! Local persistence cache: five independent slots, one per resource
//! collection, each holding the JSON-serialized item array.
//!
//! The cache is a passive mirror of the in-memory store with no lifecycle
//! of its own. It exists so the UI has something to show between process
//! start and the first server response, and when the server is down.

mod storage;

pub use storage::{NoopStorage, SlotStorage, SqliteStorage};

use color_eyre::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::api::types::{Country, Ingredient, Person, Recipe, RecipeIngredient};

/// Cache slot names. The keys are the persisted storage keys; changing
/// them orphans existing caches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
  Recipes,
  People,
  Countries,
  Ingredients,
  RecipeIngredients,
}

impl Slot {
  pub fn key(self) -> &'static str {
    match self {
      Slot::Recipes => "family_recipes",
      Slot::People => "family_people",
      Slot::Countries => "family_countries",
      Slot::Ingredients => "family_ingredients",
      Slot::RecipeIngredients => "family_recipe_ingredients",
    }
  }
}

/// The five collections as last persisted.
#[derive(Debug, Clone, Default)]
pub struct CachedCollections {
  pub recipes: Vec<Recipe>,
  pub people: Vec<Person>,
  pub countries: Vec<Country>,
  pub ingredients: Vec<Ingredient>,
  pub links: Vec<RecipeIngredient>,
}

/// Read every slot. A missing slot yields an empty list; any read or
/// decode failure yields all-empty rather than partially-empty.
pub fn load_all<S: SlotStorage>(storage: &S) -> CachedCollections {
  match try_load_all(storage) {
    Ok(collections) => collections,
    Err(e) => {
      warn!("Failed to load cached collections, starting empty: {e}");
      CachedCollections::default()
    }
  }
}

fn try_load_all<S: SlotStorage>(storage: &S) -> Result<CachedCollections> {
  Ok(CachedCollections {
    recipes: read_slot(storage, Slot::Recipes)?,
    people: read_slot(storage, Slot::People)?,
    countries: read_slot(storage, Slot::Countries)?,
    ingredients: read_slot(storage, Slot::Ingredients)?,
    links: read_slot(storage, Slot::RecipeIngredients)?,
  })
}

fn read_slot<S: SlotStorage, T: DeserializeOwned>(storage: &S, slot: Slot) -> Result<Vec<T>> {
  match storage.read(slot)? {
    Some(json) => Ok(serde_json::from_str(&json)?),
    None => Ok(Vec::new()),
  }
}

/// Serialize one collection into its slot.
pub fn save_slot<S: SlotStorage, T: Serialize>(storage: &S, slot: Slot, items: &[T]) -> Result<()> {
  let json = serde_json::to_string(items)?;
  storage.write(slot, &json)
}
