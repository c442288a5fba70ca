//! HTTP client for the recipe archive REST API.

use color_eyre::{eyre::eyre, Result};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::config::Config;

use super::payload::{CountryPayload, IngredientPayload, LinkPayload, PersonPayload, RecipePayload};
use super::types::{Country, Id, Ingredient, Person, Recipe, RecipeIngredient};

/// REST client for the archive backend.
///
/// Every method issues exactly one request and awaits completion or
/// failure; there is no retry, timeout, or cancellation at this layer.
#[derive(Clone)]
pub struct ApiClient {
  http: reqwest::Client,
  base: Url,
}

impl ApiClient {
  pub fn new(config: &Config) -> Result<Self> {
    let base = Url::parse(&config.api.base_url)
      .map_err(|e| eyre!("Invalid API base url {}: {}", config.api.base_url, e))?;

    Ok(Self {
      http: reqwest::Client::new(),
      base,
    })
  }

  /// Build a collection or entity URL. Backend routes all end in a
  /// trailing slash.
  fn endpoint(&self, path: &str) -> Result<Url> {
    let full = format!(
      "{}/{}/",
      self.base.as_str().trim_end_matches('/'),
      path.trim_matches('/')
    );
    Url::parse(&full).map_err(|e| eyre!("Invalid endpoint {}: {}", full, e))
  }

  async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
    let url = self.endpoint(path)?;
    let resp = self
      .http
      .get(url)
      .send()
      .await
      .map_err(|e| eyre!("Request failed: {}", e))?;
    decode(resp).await
  }

  async fn post_json<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
    let url = self.endpoint(path)?;
    let resp = self
      .http
      .post(url)
      .json(body)
      .send()
      .await
      .map_err(|e| eyre!("Request failed: {}", e))?;
    decode(resp).await
  }

  async fn put_json<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
    let url = self.endpoint(path)?;
    let resp = self
      .http
      .put(url)
      .json(body)
      .send()
      .await
      .map_err(|e| eyre!("Request failed: {}", e))?;
    decode(resp).await
  }

  async fn delete(&self, path: &str) -> Result<()> {
    let url = self.endpoint(path)?;
    let resp = self
      .http
      .delete(url)
      .send()
      .await
      .map_err(|e| eyre!("Request failed: {}", e))?;

    let status = resp.status();
    if status.is_success() {
      Ok(())
    } else {
      let body = resp.text().await.unwrap_or_default();
      Err(eyre!(extract_error_message(status, &body)))
    }
  }

  // --- recipes ---

  pub async fn list_recipes(&self) -> Result<Vec<Recipe>> {
    self.get_json("recipes").await
  }

  pub async fn get_recipe(&self, id: &Id) -> Result<Recipe> {
    self.get_json(&format!("recipes/{}", id)).await
  }

  pub async fn create_recipe(&self, payload: &RecipePayload) -> Result<Recipe> {
    self.post_json("recipes", payload).await
  }

  pub async fn update_recipe(&self, id: &Id, payload: &RecipePayload) -> Result<Recipe> {
    self.put_json(&format!("recipes/{}", id), payload).await
  }

  pub async fn delete_recipe(&self, id: &Id) -> Result<()> {
    self.delete(&format!("recipes/{}", id)).await
  }

  // --- people ---

  pub async fn list_people(&self) -> Result<Vec<Person>> {
    self.get_json("people").await
  }

  pub async fn get_person(&self, id: &Id) -> Result<Person> {
    self.get_json(&format!("people/{}", id)).await
  }

  pub async fn create_person(&self, payload: &PersonPayload) -> Result<Person> {
    self.post_json("people", payload).await
  }

  pub async fn update_person(&self, id: &Id, payload: &PersonPayload) -> Result<Person> {
    self.put_json(&format!("people/{}", id), payload).await
  }

  pub async fn delete_person(&self, id: &Id) -> Result<()> {
    self.delete(&format!("people/{}", id)).await
  }

  // --- countries ---
  // The backend exposes no update or delete for countries; the client
  // surface matches.

  pub async fn list_countries(&self) -> Result<Vec<Country>> {
    self.get_json("countries").await
  }

  pub async fn get_country(&self, id: &Id) -> Result<Country> {
    self.get_json(&format!("countries/{}", id)).await
  }

  pub async fn create_country(&self, payload: &CountryPayload) -> Result<Country> {
    self.post_json("countries", payload).await
  }

  // --- ingredients ---

  pub async fn list_ingredients(&self) -> Result<Vec<Ingredient>> {
    self.get_json("ingredients").await
  }

  pub async fn get_ingredient(&self, id: &Id) -> Result<Ingredient> {
    self.get_json(&format!("ingredients/{}", id)).await
  }

  pub async fn create_ingredient(&self, payload: &IngredientPayload) -> Result<Ingredient> {
    self.post_json("ingredients", payload).await
  }

  pub async fn update_ingredient(&self, id: &Id, payload: &IngredientPayload) -> Result<Ingredient> {
    self.put_json(&format!("ingredients/{}", id), payload).await
  }

  pub async fn delete_ingredient(&self, id: &Id) -> Result<()> {
    self.delete(&format!("ingredients/{}", id)).await
  }

  // --- recipe-ingredient links ---

  pub async fn list_links(&self) -> Result<Vec<RecipeIngredient>> {
    self.get_json("recipe-ingredients").await
  }

  pub async fn get_link(&self, id: &Id) -> Result<RecipeIngredient> {
    self.get_json(&format!("recipe-ingredients/{}", id)).await
  }

  pub async fn create_link(&self, payload: &LinkPayload) -> Result<RecipeIngredient> {
    self.post_json("recipe-ingredients", payload).await
  }

  pub async fn update_link(&self, id: &Id, payload: &LinkPayload) -> Result<RecipeIngredient> {
    self.put_json(&format!("recipe-ingredients/{}", id), payload).await
  }

  pub async fn delete_link(&self, id: &Id) -> Result<()> {
    self.delete(&format!("recipe-ingredients/{}", id)).await
  }

  /// All links for one recipe. The backend has no by-recipe filter
  /// endpoint, so this fetches the full collection and filters here.
  /// Fine at family-archive scale; a real limit beyond it.
  pub async fn links_for_recipe(&self, recipe: &Id) -> Result<Vec<RecipeIngredient>> {
    let all = self.list_links().await?;
    Ok(all.into_iter().filter(|l| l.recipe == *recipe).collect())
  }
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T> {
  let status = resp.status();
  if status.is_success() {
    resp
      .json::<T>()
      .await
      .map_err(|e| eyre!("Failed to decode response: {}", e))
  } else {
    let body = resp.text().await.unwrap_or_default();
    Err(eyre!(extract_error_message(status, &body)))
  }
}

/// Pull a human-readable message out of an error response.
///
/// Prefers a JSON `detail` or `message` field, falls back to the raw body
/// text, then to a generic message carrying the status code.
fn extract_error_message(status: StatusCode, body: &str) -> String {
  if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
    for key in ["detail", "message"] {
      if let Some(msg) = value.get(key).and_then(|v| v.as_str()) {
        return msg.to_string();
      }
    }
  }

  let trimmed = body.trim();
  if !trimmed.is_empty() {
    return trimmed.to_string();
  }

  format!("HTTP error: {}", status)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::{ApiConfig, Config};

  fn client(base: &str) -> ApiClient {
    ApiClient::new(&Config {
      api: ApiConfig {
        base_url: base.to_string(),
      },
    })
    .unwrap()
  }

  #[test]
  fn test_endpoints_carry_trailing_slash() {
    let client = client("http://localhost:8000/api");
    assert_eq!(
      client.endpoint("recipes").unwrap().as_str(),
      "http://localhost:8000/api/recipes/"
    );
    assert_eq!(
      client.endpoint("recipes/7").unwrap().as_str(),
      "http://localhost:8000/api/recipes/7/"
    );
  }

  #[test]
  fn test_base_url_trailing_slash_is_tolerated() {
    let client = client("http://localhost:8000/api/");
    assert_eq!(
      client.endpoint("/people/").unwrap().as_str(),
      "http://localhost:8000/api/people/"
    );
  }

  #[test]
  fn test_error_message_prefers_detail_field() {
    assert_eq!(
      extract_error_message(StatusCode::BAD_REQUEST, r#"{"detail": "Title is required"}"#),
      "Title is required"
    );
    assert_eq!(
      extract_error_message(StatusCode::BAD_REQUEST, r#"{"message": "nope"}"#),
      "nope"
    );
  }

  #[test]
  fn test_error_message_falls_back_to_body_text() {
    assert_eq!(
      extract_error_message(StatusCode::BAD_GATEWAY, "upstream unavailable"),
      "upstream unavailable"
    );
    // JSON without a recognized field still reads as raw text.
    assert_eq!(
      extract_error_message(StatusCode::BAD_REQUEST, r#"{"title": ["required"]}"#),
      r#"{"title": ["required"]}"#
    );
  }

  #[test]
  fn test_error_message_generic_fallback() {
    assert_eq!(
      extract_error_message(StatusCode::INTERNAL_SERVER_ERROR, "  "),
      "HTTP error: 500 Internal Server Error"
    );
  }
}
