//! Entity types shared by the API client, the store, and the cache.

use chrono::NaiveDate;
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Server-assigned identifier.
///
/// The backend and the UI layer do not agree on whether ids travel as JSON
/// numbers or strings, so every id is normalized to its string form on
/// receipt and compared only in that form. Integer-shaped ids re-serialize
/// as numbers so outgoing payloads match what the server handed out.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Id(String);

impl Id {
  /// Client-only identifier for a draft row that has no server id yet.
  /// Draft ids are never sent to the server.
  pub fn draft(seq: u64) -> Self {
    Id(format!("draft-{}", seq))
  }

  pub fn is_draft(&self) -> bool {
    self.0.starts_with("draft-")
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for Id {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl From<u64> for Id {
  fn from(n: u64) -> Self {
    Id(n.to_string())
  }
}

impl From<&str> for Id {
  fn from(s: &str) -> Self {
    Id(s.to_string())
  }
}

impl From<String> for Id {
  fn from(s: String) -> Self {
    Id(s)
  }
}

impl Serialize for Id {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    match self.0.parse::<u64>() {
      Ok(n) => serializer.serialize_u64(n),
      Err(_) => serializer.serialize_str(&self.0),
    }
  }
}

impl<'de> Deserialize<'de> for Id {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    struct IdVisitor;

    impl Visitor<'_> for IdVisitor {
      type Value = Id;

      fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string or integer identifier")
      }

      fn visit_u64<E: de::Error>(self, v: u64) -> Result<Id, E> {
        Ok(Id(v.to_string()))
      }

      fn visit_i64<E: de::Error>(self, v: i64) -> Result<Id, E> {
        Ok(Id(v.to_string()))
      }

      fn visit_str<E: de::Error>(self, v: &str) -> Result<Id, E> {
        Ok(Id(v.to_string()))
      }
    }

    deserializer.deserialize_any(IdVisitor)
  }
}

/// Meal type choices offered by the backend.
pub const MEAL_TYPES: &[&str] = &["Breakfast", "Lunch", "Dinner", "Snack", "Dessert", "Other"];

/// Difficulty choices offered by the backend.
pub const DIFFICULTIES: &[&str] = &["Easy", "Medium", "Hard"];

/// A recipe. Durations are whole seconds; the wire carries them as
/// integer seconds too.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
  pub id: Id,
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
  #[serde(default)]
  pub times_cooked: u32,
  /// Owner / attribution
  pub person: Option<Id>,
  pub country: Option<Id>,
}

/// A family member that recipes can be attributed to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
  pub id: Id,
  pub first_name: String,
  pub last_name: Option<String>,
  pub birth_date: Option<NaiveDate>,
  pub death_date: Option<NaiveDate>,
  pub notes: Option<String>,
}

impl Person {
  pub fn full_name(&self) -> String {
    match &self.last_name {
      Some(last) => format!("{} {}", self.first_name, last),
      None => self.first_name.clone(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Country {
  pub id: Id,
  pub name: String,
  pub region: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
  pub id: Id,
  pub name: String,
  pub unit: Option<String>,
  pub notes: Option<String>,
}

/// A recipe-to-ingredient link: the many-to-many join with a quantity.
/// Meaningless without both references; deleting a recipe removes its
/// links client-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeIngredient {
  pub id: Id,
  pub recipe: Id,
  pub ingredient: Id,
  pub quantity: Option<f64>,
}

/// An unsaved ingredient row for a recipe that does not exist yet. Carries
/// a draft id so rows can be removed from the form again before saving.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftLink {
  pub id: Id,
  pub ingredient: Id,
  pub quantity: Option<f64>,
}

impl DraftLink {
  pub fn new(seq: u64, ingredient: Id, quantity: Option<f64>) -> Self {
    Self {
      id: Id::draft(seq),
      ingredient,
      quantity,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn test_id_normalizes_numbers_and_strings() {
    let from_number: Id = serde_json::from_value(json!(7)).unwrap();
    let from_string: Id = serde_json::from_value(json!("7")).unwrap();
    assert_eq!(from_number, from_string);
    assert_eq!(from_number.as_str(), "7");
  }

  #[test]
  fn test_integer_id_serializes_as_number() {
    assert_eq!(serde_json::to_value(Id::from(42u64)).unwrap(), json!(42));
    assert_eq!(serde_json::to_value(Id::from("42")).unwrap(), json!(42));
  }

  #[test]
  fn test_non_integer_id_serializes_as_string() {
    let id = Id::draft(3);
    assert!(id.is_draft());
    assert_eq!(serde_json::to_value(&id).unwrap(), json!("draft-3"));
  }

  #[test]
  fn test_recipe_defaults_missing_optionals() {
    let recipe: Recipe =
      serde_json::from_value(json!({"id": 1, "title": "Borscht"})).unwrap();
    assert_eq!(recipe.id, Id::from(1u64));
    assert_eq!(recipe.title, "Borscht");
    assert_eq!(recipe.times_cooked, 0);
    assert!(recipe.prep_time.is_none());
    assert!(recipe.person.is_none());
  }

  #[test]
  fn test_person_dates_round_trip() {
    let person: Person = serde_json::from_value(json!({
      "id": "p1",
      "first_name": "Maria",
      "last_name": "Kovach",
      "birth_date": "1921-03-14",
      "death_date": null,
      "notes": null,
    }))
    .unwrap();
    assert_eq!(person.full_name(), "Maria Kovach");
    assert_eq!(
      person.birth_date,
      Some(NaiveDate::from_ymd_opt(1921, 3, 14).unwrap())
    );

    let value = serde_json::to_value(&person).unwrap();
    assert_eq!(value["birth_date"], json!("1921-03-14"));
  }
}
