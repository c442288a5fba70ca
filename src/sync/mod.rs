//! Synchronization between the remote API, the in-memory store, and the
//! local cache.
//!
//! Every operation here runs one remote call, applies the matching store
//! transition (pending → fulfilled | rejected), and then mirrors all five
//! collections into the cache. Persistence is best-effort: a cache
//! failure is logged and never fails the user action that triggered it.
//! Operations return `Result` so user-initiated callers can surface the
//! failure; the error message is also recorded on the slice either way.

pub mod worker;

use std::sync::Arc;

use color_eyre::{eyre::eyre, Result};
use futures::future::try_join_all;
use serde::Serialize;
use tracing::warn;

use crate::api::payload::{
  validate, CountryPayload, IngredientPayload, LinkPayload, PersonPayload, RecipeInput,
  RecipePayload,
};
use crate::api::types::{Country, DraftLink, Id, Ingredient, Person, Recipe, RecipeIngredient};
use crate::api::ApiClient;
use crate::cache::{self, Slot, SlotStorage};
use crate::store::DataStore;

/// Orchestrates remote calls, store transitions, and cache persistence.
pub struct Syncer<S: SlotStorage> {
  api: ApiClient,
  storage: Arc<S>,
}

impl<S: SlotStorage> Clone for Syncer<S> {
  fn clone(&self) -> Self {
    Self {
      api: self.api.clone(),
      storage: Arc::clone(&self.storage),
    }
  }
}

impl<S: SlotStorage> Syncer<S> {
  pub fn new(api: ApiClient, storage: S) -> Self {
    Self {
      api,
      storage: Arc::new(storage),
    }
  }

  /// One-shot startup sequence: seed every slice from the cache for
  /// instant display, then refresh everything from the server. Fetch
  /// failures are logged and leave the cache-seeded values in place;
  /// this returns only once all five fetches have settled.
  pub async fn bootstrap(&self, store: &mut DataStore) {
    let cached = cache::load_all(self.storage.as_ref());
    store.recipes.replace_all(cached.recipes);
    store.people.replace_all(cached.people);
    store.countries.replace_all(cached.countries);
    store.ingredients.replace_all(cached.ingredients);
    store.links.replace_all(cached.links);

    self.refresh_all(store).await;
  }

  /// Fetch all five collections concurrently. Each failure is recorded on
  /// its own slice; one collection going wrong does not stop the others.
  pub async fn refresh_all(&self, store: &mut DataStore) {
    store.recipes.begin();
    store.people.begin();
    store.countries.begin();
    store.ingredients.begin();
    store.links.begin();

    let (recipes, people, countries, ingredients, links) = futures::join!(
      self.api.list_recipes(),
      self.api.list_people(),
      self.api.list_countries(),
      self.api.list_ingredients(),
      self.api.list_links(),
    );

    match recipes {
      Ok(items) => store.recipes.replace_all(items),
      Err(e) => {
        warn!("Fetching recipes failed: {e}");
        store.recipes.fail(e.to_string());
      }
    }
    match people {
      Ok(items) => store.people.replace_all(items),
      Err(e) => {
        warn!("Fetching people failed: {e}");
        store.people.fail(e.to_string());
      }
    }
    match countries {
      Ok(items) => store.countries.replace_all(items),
      Err(e) => {
        warn!("Fetching countries failed: {e}");
        store.countries.fail(e.to_string());
      }
    }
    match ingredients {
      Ok(items) => store.ingredients.replace_all(items),
      Err(e) => {
        warn!("Fetching ingredients failed: {e}");
        store.ingredients.fail(e.to_string());
      }
    }
    match links {
      Ok(items) => store.links.replace_all(items),
      Err(e) => {
        warn!("Fetching recipe ingredients failed: {e}");
        store.links.fail(e.to_string());
      }
    }

    self.persist(store);
  }

  /// Mirror all five collections into the cache, unconditionally, even
  /// for slices unrelated to the action that just ran. Failures are
  /// logged and swallowed.
  pub fn persist(&self, store: &DataStore) {
    self.persist_slot(Slot::Recipes, &store.recipes.items);
    self.persist_slot(Slot::People, &store.people.items);
    self.persist_slot(Slot::Countries, &store.countries.items);
    self.persist_slot(Slot::Ingredients, &store.ingredients.items);
    self.persist_slot(Slot::RecipeIngredients, &store.links.items);
  }

  fn persist_slot<T: Serialize>(&self, slot: Slot, items: &[T]) {
    if let Err(e) = cache::save_slot(self.storage.as_ref(), slot, items) {
      warn!("Failed to persist {} slot: {e}", slot.key());
    }
  }

  // --- recipes ---

  pub async fn fetch_recipes(&self, store: &mut DataStore) -> Result<()> {
    store.recipes.begin();
    let out = match self.api.list_recipes().await {
      Ok(items) => {
        store.recipes.replace_all(items);
        Ok(())
      }
      Err(e) => {
        store.recipes.fail(e.to_string());
        Err(e)
      }
    };
    self.persist(store);
    out
  }

  pub async fn create_recipe(&self, store: &mut DataStore, input: &RecipeInput) -> Result<Recipe> {
    if let Some(msg) = input.validate() {
      return Err(eyre!(msg));
    }
    store.recipes.begin();
    let out = match self.api.create_recipe(&input.to_payload()).await {
      Ok(recipe) => {
        store.recipes.append(recipe.clone());
        Ok(recipe)
      }
      Err(e) => {
        store.recipes.fail(e.to_string());
        Err(e)
      }
    };
    self.persist(store);
    out
  }

  pub async fn update_recipe(
    &self,
    store: &mut DataStore,
    id: &Id,
    input: &RecipeInput,
  ) -> Result<Recipe> {
    if let Some(msg) = input.validate() {
      return Err(eyre!(msg));
    }
    store.recipes.begin();
    let out = match self.api.update_recipe(id, &input.to_payload()).await {
      Ok(recipe) => {
        store.recipes.replace(recipe.clone());
        Ok(recipe)
      }
      Err(e) => {
        store.recipes.fail(e.to_string());
        Err(e)
      }
    };
    self.persist(store);
    out
  }

  /// Delete a recipe and, first, every ingredient link that references
  /// it. The backend does not cascade; the client owns this invariant.
  pub async fn delete_recipe(&self, store: &mut DataStore, id: &Id) -> Result<()> {
    self.delete_links_for_recipe(store, id).await?;

    store.recipes.begin();
    let out = match self.api.delete_recipe(id).await {
      Ok(()) => {
        store.recipes.remove(id);
        Ok(())
      }
      Err(e) => {
        store.recipes.fail(e.to_string());
        Err(e)
      }
    };
    self.persist(store);
    out
  }

  /// Mark a recipe as cooked: read the server's current value, add one,
  /// resubmit as an update. Last write wins; there is no atomic
  /// increment.
  pub async fn mark_cooked(&self, store: &mut DataStore, id: &Id) -> Result<Recipe> {
    store.recipes.begin();
    let result = async {
      let mut current = self.api.get_recipe(id).await?;
      current.times_cooked += 1;
      self.api.update_recipe(id, &RecipePayload::from(&current)).await
    }
    .await;

    let out = match result {
      Ok(recipe) => {
        store.recipes.replace(recipe.clone());
        Ok(recipe)
      }
      Err(e) => {
        store.recipes.fail(e.to_string());
        Err(e)
      }
    };
    self.persist(store);
    out
  }

  /// Create a recipe together with the draft ingredient rows accumulated
  /// before it had a server id. Each draft becomes a real link against
  /// the assigned recipe id; draft ids themselves are never sent.
  pub async fn create_recipe_with_links(
    &self,
    store: &mut DataStore,
    input: &RecipeInput,
    drafts: &[DraftLink],
  ) -> Result<Recipe> {
    let recipe = self.create_recipe(store, input).await?;
    for draft in drafts {
      let payload = LinkPayload {
        recipe: recipe.id.clone(),
        ingredient: draft.ingredient.clone(),
        quantity: draft.quantity,
      };
      self.create_link(store, &payload).await?;
    }
    Ok(recipe)
  }

  // --- people ---

  pub async fn fetch_people(&self, store: &mut DataStore) -> Result<()> {
    store.people.begin();
    let out = match self.api.list_people().await {
      Ok(items) => {
        store.people.replace_all(items);
        Ok(())
      }
      Err(e) => {
        store.people.fail(e.to_string());
        Err(e)
      }
    };
    self.persist(store);
    out
  }

  pub async fn create_person(&self, store: &mut DataStore, payload: &PersonPayload) -> Result<Person> {
    if let Some(msg) = validate::required(&payload.first_name, "First name") {
      return Err(eyre!(msg));
    }
    store.people.begin();
    let out = match self.api.create_person(payload).await {
      Ok(person) => {
        store.people.append(person.clone());
        Ok(person)
      }
      Err(e) => {
        store.people.fail(e.to_string());
        Err(e)
      }
    };
    self.persist(store);
    out
  }

  pub async fn update_person(
    &self,
    store: &mut DataStore,
    id: &Id,
    payload: &PersonPayload,
  ) -> Result<Person> {
    store.people.begin();
    let out = match self.api.update_person(id, payload).await {
      Ok(person) => {
        store.people.replace(person.clone());
        Ok(person)
      }
      Err(e) => {
        store.people.fail(e.to_string());
        Err(e)
      }
    };
    self.persist(store);
    out
  }

  pub async fn delete_person(&self, store: &mut DataStore, id: &Id) -> Result<()> {
    store.people.begin();
    let out = match self.api.delete_person(id).await {
      Ok(()) => {
        store.people.remove(id);
        Ok(())
      }
      Err(e) => {
        store.people.fail(e.to_string());
        Err(e)
      }
    };
    self.persist(store);
    out
  }

  // --- countries ---

  pub async fn fetch_countries(&self, store: &mut DataStore) -> Result<()> {
    store.countries.begin();
    let out = match self.api.list_countries().await {
      Ok(items) => {
        store.countries.replace_all(items);
        Ok(())
      }
      Err(e) => {
        store.countries.fail(e.to_string());
        Err(e)
      }
    };
    self.persist(store);
    out
  }

  /// Countries can only be created; the backend has no update or delete.
  pub async fn create_country(
    &self,
    store: &mut DataStore,
    payload: &CountryPayload,
  ) -> Result<Country> {
    if let Some(msg) = validate::required(&payload.name, "Name") {
      return Err(eyre!(msg));
    }
    store.countries.begin();
    let out = match self.api.create_country(payload).await {
      Ok(country) => {
        store.countries.append(country.clone());
        Ok(country)
      }
      Err(e) => {
        store.countries.fail(e.to_string());
        Err(e)
      }
    };
    self.persist(store);
    out
  }

  // --- ingredients ---

  pub async fn fetch_ingredients(&self, store: &mut DataStore) -> Result<()> {
    store.ingredients.begin();
    let out = match self.api.list_ingredients().await {
      Ok(items) => {
        store.ingredients.replace_all(items);
        Ok(())
      }
      Err(e) => {
        store.ingredients.fail(e.to_string());
        Err(e)
      }
    };
    self.persist(store);
    out
  }

  pub async fn create_ingredient(
    &self,
    store: &mut DataStore,
    payload: &IngredientPayload,
  ) -> Result<Ingredient> {
    if let Some(msg) = validate::required(&payload.name, "Name") {
      return Err(eyre!(msg));
    }
    store.ingredients.begin();
    let out = match self.api.create_ingredient(payload).await {
      Ok(ingredient) => {
        store.ingredients.append(ingredient.clone());
        Ok(ingredient)
      }
      Err(e) => {
        store.ingredients.fail(e.to_string());
        Err(e)
      }
    };
    self.persist(store);
    out
  }

  pub async fn update_ingredient(
    &self,
    store: &mut DataStore,
    id: &Id,
    payload: &IngredientPayload,
  ) -> Result<Ingredient> {
    store.ingredients.begin();
    let out = match self.api.update_ingredient(id, payload).await {
      Ok(ingredient) => {
        store.ingredients.replace(ingredient.clone());
        Ok(ingredient)
      }
      Err(e) => {
        store.ingredients.fail(e.to_string());
        Err(e)
      }
    };
    self.persist(store);
    out
  }

  pub async fn delete_ingredient(&self, store: &mut DataStore, id: &Id) -> Result<()> {
    store.ingredients.begin();
    let out = match self.api.delete_ingredient(id).await {
      Ok(()) => {
        store.ingredients.remove(id);
        Ok(())
      }
      Err(e) => {
        store.ingredients.fail(e.to_string());
        Err(e)
      }
    };
    self.persist(store);
    out
  }

  // --- recipe-ingredient links ---

  pub async fn fetch_links(&self, store: &mut DataStore) -> Result<()> {
    store.links.begin();
    let out = match self.api.list_links().await {
      Ok(items) => {
        store.links.replace_all(items);
        Ok(())
      }
      Err(e) => {
        store.links.fail(e.to_string());
        Err(e)
      }
    };
    self.persist(store);
    out
  }

  pub async fn create_link(
    &self,
    store: &mut DataStore,
    payload: &LinkPayload,
  ) -> Result<RecipeIngredient> {
    // Draft ids exist only client-side and must never reach the server.
    if payload.recipe.is_draft() || payload.ingredient.is_draft() {
      return Err(eyre!("Cannot save an ingredient link against a draft id"));
    }
    store.links.begin();
    let out = match self.api.create_link(payload).await {
      Ok(link) => {
        store.links.append(link.clone());
        Ok(link)
      }
      Err(e) => {
        store.links.fail(e.to_string());
        Err(e)
      }
    };
    self.persist(store);
    out
  }

  pub async fn update_link(
    &self,
    store: &mut DataStore,
    id: &Id,
    payload: &LinkPayload,
  ) -> Result<RecipeIngredient> {
    store.links.begin();
    let out = match self.api.update_link(id, payload).await {
      Ok(link) => {
        store.links.replace(link.clone());
        Ok(link)
      }
      Err(e) => {
        store.links.fail(e.to_string());
        Err(e)
      }
    };
    self.persist(store);
    out
  }

  pub async fn delete_link(&self, store: &mut DataStore, id: &Id) -> Result<()> {
    store.links.begin();
    let out = match self.api.delete_link(id).await {
      Ok(()) => {
        store.links.remove(id);
        Ok(())
      }
      Err(e) => {
        store.links.fail(e.to_string());
        Err(e)
      }
    };
    self.persist(store);
    out
  }

  /// Delete every link referencing one recipe. The server is asked for
  /// its current set first, so links created from another session are
  /// removed too, not just the ones this store knows about.
  pub async fn delete_links_for_recipe(&self, store: &mut DataStore, recipe: &Id) -> Result<()> {
    store.links.begin();
    let result: Result<()> = async {
      let linked = self.api.links_for_recipe(recipe).await?;
      try_join_all(linked.iter().map(|l| self.api.delete_link(&l.id))).await?;
      Ok(())
    }
    .await;

    let out = match result {
      Ok(()) => {
        store.links.remove_matching(|l| l.recipe == *recipe);
        Ok(())
      }
      Err(e) => {
        store.links.fail(e.to_string());
        Err(e)
      }
    };
    self.persist(store);
    out
  }
}
