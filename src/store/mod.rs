//! In-memory resource store.
//!
//! One slice per resource collection. Every async operation against the
//! remote API drives its slice through pending → fulfilled | rejected;
//! `items` is touched only on fulfillment, so a failed call leaves the
//! last good data in place (typically the cache-seeded value during
//! bootstrap).

use crate::api::types::{Country, Id, Ingredient, Person, Recipe, RecipeIngredient};

/// Access to the server-assigned identifier of a stored entity.
pub trait Keyed {
  fn key(&self) -> &Id;
}

/// State for one resource collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Slice<T> {
  /// Entities in server response order; created items are appended.
  pub items: Vec<T>,
  pub loading: bool,
  pub error: Option<String>,
}

impl<T> Default for Slice<T> {
  fn default() -> Self {
    Self {
      items: Vec::new(),
      loading: false,
      error: None,
    }
  }
}

impl<T: Keyed> Slice<T> {
  /// Pending: an operation is in flight.
  pub fn begin(&mut self) {
    self.loading = true;
    self.error = None;
  }

  /// Rejected: record the failure, leave items untouched.
  pub fn fail(&mut self, message: impl Into<String>) {
    self.loading = false;
    self.error = Some(message.into());
  }

  /// Fulfilled fetch-all: replace the collection wholesale.
  pub fn replace_all(&mut self, items: Vec<T>) {
    self.loading = false;
    self.items = items;
  }

  /// Fulfilled create: append the server's representation.
  pub fn append(&mut self, item: T) {
    self.loading = false;
    self.items.push(item);
  }

  /// Fulfilled update: swap in the returned entity. No-op when the id is
  /// not present.
  pub fn replace(&mut self, item: T) {
    self.loading = false;
    if let Some(slot) = self.items.iter_mut().find(|x| x.key() == item.key()) {
      *slot = item;
    }
  }

  /// Fulfilled delete: drop the matching entity, preserving the relative
  /// order of the rest.
  pub fn remove(&mut self, id: &Id) {
    self.loading = false;
    self.items.retain(|x| x.key() != id);
  }

  /// Fulfilled bulk delete: drop everything matching the predicate.
  pub fn remove_matching(&mut self, mut pred: impl FnMut(&T) -> bool) {
    self.loading = false;
    self.items.retain(|x| !pred(x));
  }

  pub fn clear_error(&mut self) {
    self.error = None;
  }

  pub fn get(&self, id: &Id) -> Option<&T> {
    self.items.iter().find(|x| x.key() == id)
  }
}

/// The five resource collections. The worker task owns the canonical
/// value; the UI renders cloned snapshots.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataStore {
  pub recipes: Slice<Recipe>,
  pub people: Slice<Person>,
  pub countries: Slice<Country>,
  pub ingredients: Slice<Ingredient>,
  pub links: Slice<RecipeIngredient>,
}

impl DataStore {
  pub fn clear_errors(&mut self) {
    self.recipes.clear_error();
    self.people.clear_error();
    self.countries.clear_error();
    self.ingredients.clear_error();
    self.links.clear_error();
  }
}

// ============================================================================
// Keyed implementations
// ============================================================================

impl Keyed for Recipe {
  fn key(&self) -> &Id {
    &self.id
  }
}

impl Keyed for Person {
  fn key(&self) -> &Id {
    &self.id
  }
}

impl Keyed for Country {
  fn key(&self) -> &Id {
    &self.id
  }
}

impl Keyed for Ingredient {
  fn key(&self) -> &Id {
    &self.id
  }
}

impl Keyed for RecipeIngredient {
  fn key(&self) -> &Id {
    &self.id
  }
}
