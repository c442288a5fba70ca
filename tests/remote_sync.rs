//! End-to-end tests for the synchronization layer against an in-process
//! mock of the archive backend.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

use hearth::api::payload::{LinkPayload, RecipeInput};
use hearth::api::types::{DraftLink, Id, Recipe, RecipeIngredient};
use hearth::api::ApiClient;
use hearth::cache::{self, NoopStorage, Slot, SqliteStorage};
use hearth::config::{ApiConfig, Config};
use hearth::store::DataStore;
use hearth::sync::Syncer;

/// In-memory backend state. Collections hold raw JSON objects so the
/// handlers can echo whatever the client sends, ids attached.
#[derive(Default)]
struct MockDb {
  recipes: Vec<Value>,
  people: Vec<Value>,
  countries: Vec<Value>,
  ingredients: Vec<Value>,
  links: Vec<Value>,
  next_id: u64,
  fail_recipe_list: bool,
}

impl MockDb {
  fn collection(&mut self, name: &str) -> &mut Vec<Value> {
    match name {
      "recipes" => &mut self.recipes,
      "people" => &mut self.people,
      "countries" => &mut self.countries,
      "ingredients" => &mut self.ingredients,
      "recipe-ingredients" => &mut self.links,
      other => panic!("unknown collection {other}"),
    }
  }
}

type Shared = Arc<Mutex<MockDb>>;

async fn list(State(db): State<Shared>, Path(collection): Path<String>) -> Response {
  let mut db = db.lock().unwrap();
  if collection == "recipes" && db.fail_recipe_list {
    return (
      StatusCode::INTERNAL_SERVER_ERROR,
      Json(json!({"detail": "recipes are on fire"})),
    )
      .into_response();
  }
  Json(db.collection(&collection).clone()).into_response()
}

async fn create(
  State(db): State<Shared>,
  Path(collection): Path<String>,
  Json(mut body): Json<Value>,
) -> Response {
  let mut db = db.lock().unwrap();
  db.next_id += 1;
  body["id"] = json!(db.next_id);
  db.collection(&collection).push(body.clone());
  Json(body).into_response()
}

async fn get_one(State(db): State<Shared>, Path((collection, id)): Path<(String, u64)>) -> Response {
  let mut db = db.lock().unwrap();
  match db.collection(&collection).iter().find(|v| v["id"] == json!(id)) {
    Some(found) => Json(found.clone()).into_response(),
    None => (StatusCode::NOT_FOUND, Json(json!({"detail": "Not found."}))).into_response(),
  }
}

async fn update(
  State(db): State<Shared>,
  Path((collection, id)): Path<(String, u64)>,
  Json(mut body): Json<Value>,
) -> Response {
  let mut db = db.lock().unwrap();
  body["id"] = json!(id);
  match db
    .collection(&collection)
    .iter_mut()
    .find(|v| v["id"] == json!(id))
  {
    Some(slot) => {
      *slot = body.clone();
      Json(body).into_response()
    }
    None => (StatusCode::NOT_FOUND, Json(json!({"detail": "Not found."}))).into_response(),
  }
}

async fn remove(State(db): State<Shared>, Path((collection, id)): Path<(String, u64)>) -> Response {
  let mut db = db.lock().unwrap();
  db.collection(&collection).retain(|v| v["id"] != json!(id));
  StatusCode::NO_CONTENT.into_response()
}

async fn serve(db: MockDb) -> (Shared, SocketAddr) {
  let state: Shared = Arc::new(Mutex::new(db));
  let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
  let addr = listener.local_addr().unwrap();

  let router = Router::new()
    .route("/api/{collection}/", get(list).post(create))
    .route(
      "/api/{collection}/{id}/",
      get(get_one).put(update).delete(remove),
    )
    .with_state(state.clone());

  tokio::spawn(async move {
    axum::serve(listener, router).await.unwrap();
  });

  (state, addr)
}

fn client_for(addr: SocketAddr) -> ApiClient {
  let config = Config {
    api: ApiConfig {
      base_url: format!("http://{addr}/api"),
    },
  };
  ApiClient::new(&config).unwrap()
}

fn recipe(value: Value) -> Recipe {
  serde_json::from_value(value).unwrap()
}

#[tokio::test]
async fn bootstrap_loads_server_state_and_fills_cache() {
  let (_state, addr) = serve(MockDb {
    recipes: vec![
      json!({"id": 1, "title": "Borscht", "times_cooked": 2}),
      json!({"id": 2, "title": "Pierogi"}),
    ],
    people: vec![json!({"id": 1, "first_name": "Maria"})],
    ..Default::default()
  })
  .await;

  let dir = tempfile::tempdir().unwrap();
  let cache_path = dir.path().join("cache.db");
  let syncer = Syncer::new(
    client_for(addr),
    SqliteStorage::open_at(&cache_path).unwrap(),
  );

  let mut store = DataStore::default();
  syncer.bootstrap(&mut store).await;

  let titles: Vec<&str> = store.recipes.items.iter().map(|r| r.title.as_str()).collect();
  assert_eq!(titles, ["Borscht", "Pierogi"]);
  assert!(!store.recipes.loading);
  assert!(store.recipes.error.is_none());
  assert_eq!(store.people.items.len(), 1);

  // The cache now mirrors the in-memory state.
  let reopened = SqliteStorage::open_at(&cache_path).unwrap();
  let cached = cache::load_all(&reopened);
  assert_eq!(cached.recipes, store.recipes.items);
  assert_eq!(cached.people, store.people.items);
}

#[tokio::test]
async fn fetch_all_twice_with_unchanged_server_is_idempotent() {
  let (_state, addr) = serve(MockDb {
    recipes: vec![json!({"id": 1, "title": "Borscht"})],
    ..Default::default()
  })
  .await;

  let syncer = Syncer::new(client_for(addr), NoopStorage);
  let mut store = DataStore::default();

  syncer.fetch_recipes(&mut store).await.unwrap();
  let after_first = store.recipes.items.clone();
  syncer.fetch_recipes(&mut store).await.unwrap();

  assert_eq!(store.recipes.items, after_first);
}

#[tokio::test]
async fn rejected_fetch_keeps_items_and_records_error() {
  let (state, addr) = serve(MockDb {
    recipes: vec![json!({"id": 1, "title": "Borscht"})],
    ..Default::default()
  })
  .await;

  let syncer = Syncer::new(client_for(addr), NoopStorage);
  let mut store = DataStore::default();
  syncer.fetch_recipes(&mut store).await.unwrap();
  let before = store.recipes.items.clone();

  state.lock().unwrap().fail_recipe_list = true;
  let result = syncer.fetch_recipes(&mut store).await;

  assert!(result.is_err());
  assert_eq!(store.recipes.items, before);
  assert_eq!(store.recipes.error.as_deref(), Some("recipes are on fire"));
  assert!(!store.recipes.loading);
}

#[tokio::test]
async fn mark_cooked_reads_current_value_then_updates() {
  let (state, addr) = serve(MockDb {
    recipes: vec![json!({"id": 7, "title": "Paprikash", "times_cooked": 2})],
    ..Default::default()
  })
  .await;

  let syncer = Syncer::new(client_for(addr), NoopStorage);
  let mut store = DataStore::default();
  syncer.fetch_recipes(&mut store).await.unwrap();

  let updated = syncer.mark_cooked(&mut store, &Id::from(7u64)).await.unwrap();

  assert_eq!(updated.times_cooked, 3);
  assert_eq!(store.recipes.items[0].times_cooked, 3);
  assert_eq!(state.lock().unwrap().recipes[0]["times_cooked"], json!(3));
}

#[tokio::test]
async fn created_link_is_the_servers_echo_with_assigned_id() {
  let (_state, addr) = serve(MockDb {
    next_id: 100,
    ..Default::default()
  })
  .await;

  let syncer = Syncer::new(client_for(addr), NoopStorage);
  let mut store = DataStore::default();

  let payload = LinkPayload {
    recipe: Id::from(7u64),
    ingredient: Id::from(3u64),
    quantity: Some(1.5),
  };
  syncer.create_link(&mut store, &payload).await.unwrap();

  assert_eq!(
    store.links.items,
    vec![RecipeIngredient {
      id: Id::from(101u64),
      recipe: Id::from(7u64),
      ingredient: Id::from(3u64),
      quantity: Some(1.5),
    }]
  );
}

#[tokio::test]
async fn deleting_a_recipe_cascades_its_links() {
  let (state, addr) = serve(MockDb {
    recipes: vec![
      json!({"id": 1, "title": "Borscht"}),
      json!({"id": 2, "title": "Pierogi"}),
    ],
    links: vec![
      json!({"id": 10, "recipe": 1, "ingredient": 5, "quantity": 2.0}),
      json!({"id": 11, "recipe": 1, "ingredient": 6, "quantity": null}),
      json!({"id": 12, "recipe": 2, "ingredient": 5, "quantity": 1.0}),
    ],
    ..Default::default()
  })
  .await;

  let syncer = Syncer::new(client_for(addr), NoopStorage);
  let mut store = DataStore::default();
  syncer.bootstrap(&mut store).await;

  syncer.delete_recipe(&mut store, &Id::from(1u64)).await.unwrap();

  assert_eq!(store.recipes.items.len(), 1);
  assert_eq!(store.recipes.items[0].title, "Pierogi");
  assert_eq!(store.links.items.len(), 1);
  assert_eq!(store.links.items[0].id, Id::from(12u64));

  let server = state.lock().unwrap();
  assert_eq!(server.recipes.len(), 1);
  assert_eq!(server.links.len(), 1);
  assert_eq!(server.links[0]["id"], json!(12));
}

#[tokio::test]
async fn create_recipe_with_draft_links_uses_the_assigned_id() {
  let (state, addr) = serve(MockDb {
    ingredients: vec![json!({"id": 3, "name": "Flour", "unit": "cup"})],
    ..Default::default()
  })
  .await;

  let syncer = Syncer::new(client_for(addr), NoopStorage);
  let mut store = DataStore::default();
  syncer.bootstrap(&mut store).await;

  let input = RecipeInput {
    title: "Halušky".to_string(),
    prep_time: "25".to_string(),
    ..Default::default()
  };
  let drafts = vec![DraftLink::new(1, Id::from(3u64), Some(2.0))];

  let created = syncer
    .create_recipe_with_links(&mut store, &input, &drafts)
    .await
    .unwrap();

  assert!(!created.id.is_draft());
  assert_eq!(created.prep_time, Some(1500));
  assert_eq!(store.links.items.len(), 1);
  assert_eq!(store.links.items[0].recipe, created.id);
  assert_eq!(store.links.items[0].quantity, Some(2.0));

  let server = state.lock().unwrap();
  assert_eq!(server.links.len(), 1);
  assert_eq!(server.links[0]["recipe"], serde_json::to_value(&created.id).unwrap());
}

#[tokio::test]
async fn bootstrap_without_server_serves_cached_data() {
  let dir = tempfile::tempdir().unwrap();
  let storage = SqliteStorage::open_at(&dir.path().join("cache.db")).unwrap();
  let cached = vec![recipe(json!({"id": 1, "title": "Borscht", "times_cooked": 4}))];
  cache::save_slot(&storage, Slot::Recipes, &cached).unwrap();

  // Nothing is listening here; every fetch fails fast.
  let config = Config {
    api: ApiConfig {
      base_url: "http://127.0.0.1:9/api".to_string(),
    },
  };
  let syncer = Syncer::new(ApiClient::new(&config).unwrap(), storage);

  let mut store = DataStore::default();
  syncer.bootstrap(&mut store).await;

  assert_eq!(store.recipes.items, cached);
  assert!(store.recipes.error.is_some());
  assert!(!store.recipes.loading);
  assert!(store.people.items.is_empty());
  assert!(store.people.error.is_some());
}

#[tokio::test]
async fn invalid_input_is_rejected_before_any_request() {
  // Unroutable endpoint: if validation let this through, the create
  // would fail with a connection error instead of the validation one.
  let config = Config {
    api: ApiConfig {
      base_url: "http://127.0.0.1:9/api".to_string(),
    },
  };
  let syncer = Syncer::new(ApiClient::new(&config).unwrap(), NoopStorage);
  let mut store = DataStore::default();

  let input = RecipeInput::default(); // blank title
  let err = syncer.create_recipe(&mut store, &input).await.unwrap_err();

  assert_eq!(err.to_string(), "Title is required");
  assert!(store.recipes.error.is_none());
  assert!(!store.recipes.loading);
}
