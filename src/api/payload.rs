//! Outgoing payload shapes and the recipe field-formatting step.
//!
//! The backend expects optional fields to be present-and-null rather than
//! omitted, so payload structs serialize every field (no skip attributes
//! anywhere here).

use chrono::NaiveDate;
use serde::Serialize;

use super::duration::edit_value_to_seconds;
use super::types::{Country, Id, Ingredient, Person, Recipe, RecipeIngredient};

/// Recipe fields as they leave an edit form: free text, not yet typed.
#[derive(Debug, Clone, Default)]
pub struct RecipeInput {
  pub title: String,
  pub description: String,
  pub servings: String,
  /// Whole minutes ("15") or a clock string ("0:15:00").
  pub prep_time: String,
  pub cook_time: String,
  pub total_time: String,
  pub meal_type: String,
  pub cuisine_type: String,
  pub difficulty: String,
  pub source_name: String,
  pub source_url: String,
  pub rating: String,
  pub times_cooked: u32,
  pub person: Option<Id>,
  pub country: Option<Id>,
}

impl RecipeInput {
  /// Apply the wire formatting step: blank optionals become null, numeric
  /// strings parse to numbers, durations convert to seconds.
  pub fn to_payload(&self) -> RecipePayload {
    RecipePayload {
      title: self.title.trim().to_string(),
      description: opt(&self.description),
      servings: self.servings.trim().parse().ok(),
      prep_time: edit_value_to_seconds(&self.prep_time),
      cook_time: edit_value_to_seconds(&self.cook_time),
      total_time: edit_value_to_seconds(&self.total_time),
      meal_type: opt(&self.meal_type),
      cuisine_type: opt(&self.cuisine_type),
      difficulty: opt(&self.difficulty),
      source_name: opt(&self.source_name),
      source_url: opt(&self.source_url),
      rating: self.rating.trim().parse().ok(),
      times_cooked: self.times_cooked,
      person: self.person.clone(),
      country: self.country.clone(),
    }
  }

  /// First validation failure, if any. Mirrors what the edit form checks
  /// before submitting.
  pub fn validate(&self) -> Option<String> {
    validate::required(&self.title, "Title")
      .or_else(|| validate::url(&self.source_url))
      .or_else(|| validate::rating(&self.rating))
      .or_else(|| validate::positive_number(&self.servings, "Servings"))
  }
}

/// Recipe as it goes over the wire on create/update.
#[derive(Debug, Clone, Serialize)]
pub struct RecipePayload {
  pub title: String,
  pub description: Option<String>,
  pub servings: Option<u32>,
  pub prep_time: Option<u32>,
  pub cook_time: Option<u32>,
  pub total_time: Option<u32>,
  pub meal_type: Option<String>,
  pub cuisine_type: Option<String>,
  pub difficulty: Option<String>,
  pub source_name: Option<String>,
  pub source_url: Option<String>,
  pub rating: Option<f64>,
  pub times_cooked: u32,
  pub person: Option<Id>,
  pub country: Option<Id>,
}

impl From<&Recipe> for RecipePayload {
  /// Resubmit a server-fetched recipe unchanged (read-modify-write
  /// updates such as mark-as-cooked).
  fn from(r: &Recipe) -> Self {
    Self {
      title: r.title.clone(),
      description: r.description.clone(),
      servings: r.servings,
      prep_time: r.prep_time,
      cook_time: r.cook_time,
      total_time: r.total_time,
      meal_type: r.meal_type.clone(),
      cuisine_type: r.cuisine_type.clone(),
      difficulty: r.difficulty.clone(),
      source_name: r.source_name.clone(),
      source_url: r.source_url.clone(),
      rating: r.rating,
      times_cooked: r.times_cooked,
      person: r.person.clone(),
      country: r.country.clone(),
    }
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct PersonPayload {
  pub first_name: String,
  pub last_name: Option<String>,
  pub birth_date: Option<NaiveDate>,
  pub death_date: Option<NaiveDate>,
  pub notes: Option<String>,
}

impl From<&Person> for PersonPayload {
  fn from(p: &Person) -> Self {
    Self {
      first_name: p.first_name.clone(),
      last_name: p.last_name.clone(),
      birth_date: p.birth_date,
      death_date: p.death_date,
      notes: p.notes.clone(),
    }
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct CountryPayload {
  pub name: String,
  pub region: Option<String>,
}

impl From<&Country> for CountryPayload {
  fn from(c: &Country) -> Self {
    Self {
      name: c.name.clone(),
      region: c.region.clone(),
    }
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct IngredientPayload {
  pub name: String,
  pub unit: Option<String>,
  pub notes: Option<String>,
}

impl From<&Ingredient> for IngredientPayload {
  fn from(i: &Ingredient) -> Self {
    Self {
      name: i.name.clone(),
      unit: i.unit.clone(),
      notes: i.notes.clone(),
    }
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct LinkPayload {
  pub recipe: Id,
  pub ingredient: Id,
  pub quantity: Option<f64>,
}

impl From<&RecipeIngredient> for LinkPayload {
  fn from(l: &RecipeIngredient) -> Self {
    Self {
      recipe: l.recipe.clone(),
      ingredient: l.ingredient.clone(),
      quantity: l.quantity,
    }
  }
}

fn opt(s: &str) -> Option<String> {
  let trimmed = s.trim();
  if trimmed.is_empty() {
    None
  } else {
    Some(trimmed.to_string())
  }
}

/// Form validation helpers. Each returns None when the value passes;
/// blank input passes every check except `required`.
pub mod validate {
  use chrono::NaiveDate;

  pub fn required(value: &str, field: &str) -> Option<String> {
    if value.trim().is_empty() {
      Some(format!("{} is required", field))
    } else {
      None
    }
  }

  pub fn url(value: &str) -> Option<String> {
    if value.trim().is_empty() {
      return None;
    }
    match url::Url::parse(value.trim()) {
      Ok(_) => None,
      Err(_) => Some("Please enter a valid URL (e.g., https://example.com)".to_string()),
    }
  }

  pub fn date(value: &str) -> Option<String> {
    if value.trim().is_empty() {
      return None;
    }
    match NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d") {
      Ok(_) => None,
      Err(_) => Some("Please enter date in YYYY-MM-DD format".to_string()),
    }
  }

  pub fn rating(value: &str) -> Option<String> {
    if value.trim().is_empty() {
      return None;
    }
    match value.trim().parse::<f64>() {
      Ok(n) if (0.0..=5.0).contains(&n) => None,
      _ => Some("Rating must be a number between 0 and 5".to_string()),
    }
  }

  pub fn positive_number(value: &str, field: &str) -> Option<String> {
    if value.trim().is_empty() {
      return None;
    }
    match value.trim().parse::<f64>() {
      Ok(n) if n > 0.0 => None,
      _ => Some(format!("{} must be a positive number", field)),
    }
  }

  pub fn non_negative_int(value: &str, field: &str) -> Option<String> {
    if value.trim().is_empty() {
      return None;
    }
    match value.trim().parse::<i64>() {
      Ok(n) if n >= 0 => None,
      _ => Some(format!("{} must be a non-negative whole number", field)),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::{json, Value};

  fn sample_input() -> RecipeInput {
    RecipeInput {
      title: "Pierogi".to_string(),
      description: "Grandmother's dumplings".to_string(),
      servings: "4".to_string(),
      prep_time: "45".to_string(),
      cook_time: "0:15:00".to_string(),
      rating: "4.5".to_string(),
      ..Default::default()
    }
  }

  #[test]
  fn test_payload_parses_numbers_and_durations() {
    let payload = sample_input().to_payload();
    assert_eq!(payload.servings, Some(4));
    assert_eq!(payload.prep_time, Some(2700));
    assert_eq!(payload.cook_time, Some(900));
    assert_eq!(payload.total_time, None);
    assert_eq!(payload.rating, Some(4.5));
  }

  #[test]
  fn test_blank_optionals_serialize_as_null() {
    let value = serde_json::to_value(sample_input().to_payload()).unwrap();
    assert_eq!(value["total_time"], Value::Null);
    assert_eq!(value["meal_type"], Value::Null);
    assert_eq!(value["person"], Value::Null);
    // Present keys, not omitted ones.
    assert!(value.as_object().unwrap().contains_key("difficulty"));
  }

  #[test]
  fn test_unparsable_numbers_become_null() {
    let mut input = sample_input();
    input.servings = "a few".to_string();
    input.rating = String::new();
    let payload = input.to_payload();
    assert_eq!(payload.servings, None);
    assert_eq!(payload.rating, None);
  }

  #[test]
  fn test_payload_from_recipe_round_trips_times_cooked() {
    let recipe: crate::api::types::Recipe = serde_json::from_value(json!({
      "id": 9,
      "title": "Goulash",
      "times_cooked": 2,
      "prep_time": 1200,
    }))
    .unwrap();
    let payload = RecipePayload::from(&recipe);
    assert_eq!(payload.times_cooked, 2);
    assert_eq!(payload.prep_time, Some(1200));
  }

  #[test]
  fn test_validate_title_required() {
    let mut input = sample_input();
    input.title = "  ".to_string();
    assert_eq!(input.validate(), Some("Title is required".to_string()));
  }

  #[test]
  fn test_validate_rating_range() {
    let mut input = sample_input();
    input.rating = "7".to_string();
    assert!(input.validate().unwrap().contains("between 0 and 5"));
  }

  #[test]
  fn test_validate_url() {
    assert!(validate::url("not a url").is_some());
    assert!(validate::url("https://example.com/recipe").is_none());
    assert!(validate::url("").is_none());
  }

  #[test]
  fn test_validate_date() {
    assert!(validate::date("1921-03-14").is_none());
    assert!(validate::date("14/03/1921").is_some());
    assert!(validate::date("1921-13-40").is_some());
  }

  #[test]
  fn test_validate_non_negative_int() {
    assert!(validate::non_negative_int("3", "Servings").is_none());
    assert!(validate::non_negative_int("-1", "Servings").is_some());
    assert!(validate::non_negative_int("3.5", "Servings").is_some());
  }
}
