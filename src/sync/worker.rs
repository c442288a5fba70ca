//! Store worker: owns the canonical `DataStore` and services UI actions
//! sequentially, publishing a snapshot after every action settles.
//!
//! The store is mutated only here, one action at a time, so the slices
//! need no locking. Snapshots are whole-store clones; a family archive
//! is small, so cloning is cheap.

use tokio::sync::mpsc;
use tracing::warn;

use crate::api::types::Id;
use crate::cache::SlotStorage;
use crate::event::Event;
use crate::store::DataStore;

use super::Syncer;

/// Actions the UI can request.
#[derive(Debug, Clone)]
pub enum Action {
  RefreshAll,
  MarkCooked(Id),
  DeleteRecipe(Id),
  DeletePerson(Id),
  DeleteIngredient(Id),
  ClearErrors,
}

/// Spawn the worker task. Returns the action sender; the worker stops
/// when every sender is dropped or the event receiver goes away.
pub fn spawn<S: SlotStorage + 'static>(
  mut store: DataStore,
  syncer: Syncer<S>,
  events: mpsc::UnboundedSender<Event>,
) -> mpsc::UnboundedSender<Action> {
  let (tx, mut rx) = mpsc::unbounded_channel();

  tokio::spawn(async move {
    while let Some(action) = rx.recv().await {
      match action {
        Action::RefreshAll => syncer.refresh_all(&mut store).await,
        Action::MarkCooked(id) => {
          if let Err(e) = syncer.mark_cooked(&mut store, &id).await {
            warn!("Mark-cooked failed for recipe {id}: {e}");
          }
        }
        Action::DeleteRecipe(id) => {
          if let Err(e) = syncer.delete_recipe(&mut store, &id).await {
            warn!("Recipe delete failed for {id}: {e}");
          }
        }
        Action::DeletePerson(id) => {
          if let Err(e) = syncer.delete_person(&mut store, &id).await {
            warn!("Person delete failed for {id}: {e}");
          }
        }
        Action::DeleteIngredient(id) => {
          if let Err(e) = syncer.delete_ingredient(&mut store, &id).await {
            warn!("Ingredient delete failed for {id}: {e}");
          }
        }
        Action::ClearErrors => store.clear_errors(),
      }

      if events.send(Event::Store(Box::new(store.clone()))).is_err() {
        break; // UI is gone
      }
    }
  });

  tx
}
