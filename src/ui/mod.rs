mod views;

use crate::app::{App, Mode, ViewState};
use crate::cache::SlotStorage;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Main draw function
pub fn draw<S: SlotStorage + 'static>(frame: &mut Frame, app: &App<S>) {
  let chunks = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Min(1),    // Main content
      Constraint::Length(1), // Status bar
    ])
    .split(frame.area());

  // Draw current view
  match app.current_view() {
    Some(ViewState::RecipeList { selected }) => {
      let recipes = app.filtered_recipes();
      views::recipes::draw_list(
        frame,
        chunks[0],
        &recipes,
        *selected,
        app.store().recipes.loading,
      );
    }
    Some(ViewState::RecipeDetail { id }) => {
      views::recipes::draw_detail(frame, chunks[0], app.store().recipes.get(id), app.store());
    }
    Some(ViewState::PeopleList { selected }) => {
      let people = app.filtered_people();
      views::people::draw_list(
        frame,
        chunks[0],
        &people,
        *selected,
        app.store().people.loading,
      );
    }
    Some(ViewState::PersonDetail { id }) => {
      let person = app.store().people.get(id);
      let recipes: Vec<_> = app
        .store()
        .recipes
        .items
        .iter()
        .filter(|r| r.person.as_ref() == Some(id))
        .collect();
      views::people::draw_detail(frame, chunks[0], person, &recipes);
    }
    Some(ViewState::CountryList { selected }) => {
      let countries = app.filtered_countries();
      views::countries::draw_list(
        frame,
        chunks[0],
        &countries,
        *selected,
        app.store().countries.loading,
      );
    }
    Some(ViewState::IngredientList { selected }) => {
      let ingredients = app.filtered_ingredients();
      views::ingredients::draw_list(
        frame,
        chunks[0],
        &ingredients,
        *selected,
        app.store().ingredients.loading,
      );
    }
    None => {}
  }

  // Draw status bar
  draw_status_bar(frame, chunks[1], app);
}

fn draw_status_bar<S: SlotStorage + 'static>(frame: &mut Frame, area: Rect, app: &App<S>) {
  let (content, style) = match app.mode() {
    Mode::Confirm => (
      app.confirm_prompt().unwrap_or("Confirm? (y/n)").to_string(),
      Style::default().fg(Color::Yellow).bold(),
    ),
    Mode::Command => {
      let names: Vec<String> = app
        .autocomplete_suggestions()
        .iter()
        .enumerate()
        .map(|(i, cmd)| {
          if i == app.selected_suggestion() {
            format!("[{}]", cmd.name)
          } else {
            cmd.name.to_string()
          }
        })
        .collect();
      (
        format!(":{}  {}", app.command_input(), names.join(" ")),
        Style::default().fg(Color::Yellow),
      )
    }
    Mode::Search => (
      format!("/{}", app.search_filter()),
      Style::default().fg(Color::Cyan),
    ),
    Mode::Normal => {
      if let Some(error) = app.status_error() {
        (
          format!("✗ {}  (Esc to clear)", error),
          Style::default().fg(Color::Red),
        )
      } else {
        let hint =
          " :command  /filter  j/k:nav  Enter:open  r:refresh  c:cooked  d:delete  q:back";
        (hint.to_string(), Style::default().fg(Color::DarkGray))
      }
    }
  };

  let paragraph = Paragraph::new(content).style(style);
  frame.render_widget(paragraph, area);
}
