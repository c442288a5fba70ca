use crate::api::types::{Id, Ingredient, Person, Recipe};
use crate::cache::SlotStorage;
use crate::commands::{self, Command};
use crate::config::Config;
use crate::event::{Event, EventHandler};
use crate::store::DataStore;
use crate::sync::worker::{self, Action};
use crate::sync::Syncer;
use crate::ui;
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{
  disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use std::io::stdout;
use std::time::Duration;
use tokio::sync::mpsc;

/// Input mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
  Normal,
  Command,
  Search,
  /// Waiting for y/n on a destructive action
  Confirm,
}

/// View state - selections index into the filtered snapshot
#[derive(Debug)]
pub enum ViewState {
  RecipeList { selected: usize },
  RecipeDetail { id: Id },
  PeopleList { selected: usize },
  PersonDetail { id: Id },
  CountryList { selected: usize },
  IngredientList { selected: usize },
}

impl Default for ViewState {
  fn default() -> Self {
    ViewState::RecipeList { selected: 0 }
  }
}

/// A destructive action awaiting confirmation
#[derive(Debug)]
struct Confirm {
  prompt: String,
  action: Action,
}

/// Main application state
pub struct App<S: SlotStorage> {
  /// Navigation stack - root is always at index 0
  view_stack: Vec<ViewState>,

  /// Current input mode
  mode: Mode,

  /// Command input buffer (after pressing :)
  command_input: String,

  /// Search filter input (after pressing /)
  search_filter: String,

  /// Selected autocomplete suggestion index
  selected_suggestion: usize,

  /// Pending destructive action (Confirm mode)
  pending_confirm: Option<Confirm>,

  /// Application configuration
  config: Config,

  /// Latest store snapshot published by the worker
  store: DataStore,

  /// Synchronization layer, handed to the worker on startup
  syncer: Syncer<S>,

  /// Action sender for the worker, set once the event loop starts
  actions: Option<mpsc::UnboundedSender<Action>>,

  /// Whether to quit
  should_quit: bool,
}

impl<S: SlotStorage + 'static> App<S> {
  pub fn new(config: Config, store: DataStore, syncer: Syncer<S>) -> Self {
    Self {
      view_stack: vec![ViewState::default()],
      mode: Mode::Normal,
      command_input: String::new(),
      search_filter: String::new(),
      selected_suggestion: 0,
      pending_confirm: None,
      config,
      store,
      syncer,
      actions: None,
      should_quit: false,
    }
  }

  pub async fn run(&mut self) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    // Create event handler and hand the canonical store to the worker
    let mut events = EventHandler::new(Duration::from_millis(250));
    self.actions = Some(worker::spawn(
      self.store.clone(),
      self.syncer.clone(),
      events.sender(),
    ));

    // Main loop
    while !self.should_quit {
      // Draw UI
      terminal.draw(|frame| ui::draw(frame, self))?;

      // Handle events
      if let Some(event) = events.next().await {
        self.handle_event(event);
      }
    }

    // Cleanup terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    Ok(())
  }

  fn dispatch(&self, action: Action) {
    if let Some(tx) = &self.actions {
      let _ = tx.send(action);
    }
  }

  fn handle_event(&mut self, event: Event) {
    match event {
      Event::Key(key) => self.handle_key(key),
      Event::Tick => {} // UI refresh happens automatically
      Event::Store(snapshot) => {
        self.store = *snapshot;
      }
    }
  }

  fn handle_key(&mut self, key: KeyEvent) {
    match self.mode {
      Mode::Normal => self.handle_normal_mode_key(key),
      Mode::Command => self.handle_command_mode_key(key),
      Mode::Search => self.handle_search_mode_key(key),
      Mode::Confirm => self.handle_confirm_mode_key(key),
    }
  }

  fn handle_normal_mode_key(&mut self, key: KeyEvent) {
    match key.code {
      // Quit
      KeyCode::Char('q') => {
        if self.view_stack.len() > 1 {
          self.view_stack.pop();
        } else {
          self.should_quit = true;
        }
      }
      KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
        self.should_quit = true;
      }

      // Navigation
      KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
      KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
      KeyCode::Enter => self.enter_selected(),
      KeyCode::Esc => {
        if self.view_stack.len() > 1 {
          self.view_stack.pop();
        } else {
          // At the root, Esc acknowledges a displayed error
          self.dispatch(Action::ClearErrors);
        }
      }

      // Data actions
      KeyCode::Char('r') => self.dispatch(Action::RefreshAll),
      KeyCode::Char('c') => self.mark_selected_cooked(),
      KeyCode::Char('d') => self.request_delete(),

      // Mode switches
      KeyCode::Char(':') => {
        self.mode = Mode::Command;
        self.command_input.clear();
      }
      KeyCode::Char('/') => {
        self.mode = Mode::Search;
        self.search_filter.clear();
      }

      _ => {}
    }
  }

  fn handle_command_mode_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Esc => {
        self.mode = Mode::Normal;
        self.command_input.clear();
        self.selected_suggestion = 0;
      }
      KeyCode::Enter => {
        self.execute_command();
        self.mode = Mode::Normal;
        self.selected_suggestion = 0;
      }
      KeyCode::Tab | KeyCode::Down => {
        let suggestions = commands::get_suggestions(&self.command_input);
        if !suggestions.is_empty() {
          self.selected_suggestion = (self.selected_suggestion + 1) % suggestions.len();
        }
      }
      KeyCode::BackTab | KeyCode::Up => {
        let suggestions = commands::get_suggestions(&self.command_input);
        if !suggestions.is_empty() {
          self.selected_suggestion = if self.selected_suggestion == 0 {
            suggestions.len() - 1
          } else {
            self.selected_suggestion - 1
          };
        }
      }
      KeyCode::Backspace => {
        self.command_input.pop();
        self.selected_suggestion = 0; // Reset selection on input change
      }
      KeyCode::Char(c) => {
        self.command_input.push(c);
        self.selected_suggestion = 0; // Reset selection on input change
      }
      _ => {}
    }
  }

  fn handle_search_mode_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Esc => {
        self.mode = Mode::Normal;
        self.search_filter.clear();
      }
      KeyCode::Enter => {
        // Apply filter and return to normal mode
        self.mode = Mode::Normal;
      }
      KeyCode::Backspace => {
        self.search_filter.pop();
      }
      KeyCode::Char(c) => {
        self.search_filter.push(c);
      }
      _ => {}
    }
  }

  fn handle_confirm_mode_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Char('y') | KeyCode::Char('Y') => {
        if let Some(confirm) = self.pending_confirm.take() {
          self.dispatch(confirm.action);
        }
        self.mode = Mode::Normal;
      }
      _ => {
        self.pending_confirm = None;
        self.mode = Mode::Normal;
      }
    }
  }

  fn execute_command(&mut self) {
    // Get the command to execute - either from selected suggestion or direct input
    let suggestions = commands::get_suggestions(&self.command_input);
    let cmd = if !suggestions.is_empty() && self.selected_suggestion < suggestions.len() {
      suggestions[self.selected_suggestion].name.to_string()
    } else {
      self.command_input.trim().to_lowercase()
    };

    match cmd.as_str() {
      "recipes" => self.set_root(ViewState::RecipeList { selected: 0 }),
      "people" => self.set_root(ViewState::PeopleList { selected: 0 }),
      "countries" => self.set_root(ViewState::CountryList { selected: 0 }),
      "ingredients" => self.set_root(ViewState::IngredientList { selected: 0 }),
      "refresh" => self.dispatch(Action::RefreshAll),
      "quit" => {
        self.should_quit = true;
      }
      _ => {
        // Unknown command
      }
    }
    self.command_input.clear();
  }

  fn set_root(&mut self, view: ViewState) {
    self.view_stack.clear();
    self.view_stack.push(view);
    self.search_filter.clear();
  }

  fn move_selection(&mut self, delta: i32) {
    let len = self.current_list_len();
    if let Some(view) = self.view_stack.last_mut() {
      let selected = match view {
        ViewState::RecipeList { selected }
        | ViewState::PeopleList { selected }
        | ViewState::CountryList { selected }
        | ViewState::IngredientList { selected } => selected,
        _ => return,
      };
      if len > 0 {
        *selected = (*selected as i32 + delta).rem_euclid(len as i32) as usize;
      }
    }
  }

  fn current_list_len(&self) -> usize {
    match self.view_stack.last() {
      Some(ViewState::RecipeList { .. }) => self.filtered_recipes().len(),
      Some(ViewState::PeopleList { .. }) => self.filtered_people().len(),
      Some(ViewState::CountryList { .. }) => self.filtered_countries().len(),
      Some(ViewState::IngredientList { .. }) => self.filtered_ingredients().len(),
      _ => 0,
    }
  }

  fn enter_selected(&mut self) {
    let next = match self.view_stack.last() {
      Some(ViewState::RecipeList { selected }) => self
        .filtered_recipes()
        .get(*selected)
        .map(|r| ViewState::RecipeDetail { id: r.id.clone() }),
      Some(ViewState::PeopleList { selected }) => self
        .filtered_people()
        .get(*selected)
        .map(|p| ViewState::PersonDetail { id: p.id.clone() }),
      _ => None,
    };
    if let Some(view) = next {
      self.view_stack.push(view);
    }
  }

  fn mark_selected_cooked(&mut self) {
    let id = match self.view_stack.last() {
      Some(ViewState::RecipeList { selected }) => {
        self.filtered_recipes().get(*selected).map(|r| r.id.clone())
      }
      Some(ViewState::RecipeDetail { id }) => Some(id.clone()),
      _ => None,
    };
    if let Some(id) = id {
      self.dispatch(Action::MarkCooked(id));
    }
  }

  /// Ask for confirmation before a delete. Countries have no delete
  /// operation, so the country list never reaches this.
  fn request_delete(&mut self) {
    let confirm = match self.view_stack.last() {
      Some(ViewState::RecipeList { selected }) => {
        self.filtered_recipes().get(*selected).map(|r| Confirm {
          prompt: format!("Delete recipe \"{}\" and its ingredients? (y/n)", r.title),
          action: Action::DeleteRecipe(r.id.clone()),
        })
      }
      Some(ViewState::RecipeDetail { id }) => self.store.recipes.get(id).map(|r| Confirm {
        prompt: format!("Delete recipe \"{}\" and its ingredients? (y/n)", r.title),
        action: Action::DeleteRecipe(r.id.clone()),
      }),
      Some(ViewState::PeopleList { selected }) => {
        self.filtered_people().get(*selected).map(|p| Confirm {
          prompt: format!("Delete {}? (y/n)", p.full_name()),
          action: Action::DeletePerson(p.id.clone()),
        })
      }
      Some(ViewState::IngredientList { selected }) => {
        self.filtered_ingredients().get(*selected).map(|i| Confirm {
          prompt: format!("Delete ingredient \"{}\"? (y/n)", i.name),
          action: Action::DeleteIngredient(i.id.clone()),
        })
      }
      _ => None,
    };
    if let Some(confirm) = confirm {
      self.pending_confirm = Some(confirm);
      self.mode = Mode::Confirm;
    }
  }

  // Filtered collections for list views

  pub fn filtered_recipes(&self) -> Vec<&Recipe> {
    self
      .store
      .recipes
      .items
      .iter()
      .filter(|r| matches_filter(&r.title, &self.search_filter))
      .collect()
  }

  pub fn filtered_people(&self) -> Vec<&Person> {
    self
      .store
      .people
      .items
      .iter()
      .filter(|p| matches_filter(&p.full_name(), &self.search_filter))
      .collect()
  }

  pub fn filtered_countries(&self) -> Vec<&crate::api::types::Country> {
    self
      .store
      .countries
      .items
      .iter()
      .filter(|c| matches_filter(&c.name, &self.search_filter))
      .collect()
  }

  pub fn filtered_ingredients(&self) -> Vec<&Ingredient> {
    self
      .store
      .ingredients
      .items
      .iter()
      .filter(|i| matches_filter(&i.name, &self.search_filter))
      .collect()
  }

  // Accessors for UI rendering

  pub fn current_view(&self) -> Option<&ViewState> {
    self.view_stack.last()
  }

  pub fn mode(&self) -> &Mode {
    &self.mode
  }

  pub fn command_input(&self) -> &str {
    &self.command_input
  }

  pub fn search_filter(&self) -> &str {
    &self.search_filter
  }

  pub fn store(&self) -> &DataStore {
    &self.store
  }

  pub fn api_url(&self) -> &str {
    &self.config.api.base_url
  }

  pub fn confirm_prompt(&self) -> Option<&str> {
    self.pending_confirm.as_ref().map(|c| c.prompt.as_str())
  }

  /// Error attached to the slice backing the current view, if any.
  pub fn status_error(&self) -> Option<&str> {
    let slice_error = match self.view_stack.last() {
      Some(ViewState::RecipeList { .. }) | Some(ViewState::RecipeDetail { .. }) => {
        self.store.recipes.error.as_deref()
      }
      Some(ViewState::PeopleList { .. }) | Some(ViewState::PersonDetail { .. }) => {
        self.store.people.error.as_deref()
      }
      Some(ViewState::CountryList { .. }) => self.store.countries.error.as_deref(),
      Some(ViewState::IngredientList { .. }) => self.store.ingredients.error.as_deref(),
      None => None,
    };
    slice_error.or(self.store.links.error.as_deref())
  }

  pub fn autocomplete_suggestions(&self) -> Vec<&'static Command> {
    commands::get_suggestions(&self.command_input)
  }

  pub fn selected_suggestion(&self) -> usize {
    self.selected_suggestion
  }
}

fn matches_filter(haystack: &str, filter: &str) -> bool {
  filter.is_empty() || haystack.to_lowercase().contains(&filter.to_lowercase())
}
