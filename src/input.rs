use std::time::Instant;

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Position, Rect};

use crate::app::{App, Focus};
use crate::manage::Mode;
use crate::models::Entity;
use crate::page::Row;
use crate::player::ModalClick;
use crate::search::SearchClick;
use crate::text::TextInput;
use crate::theme::ThemeController;

// --- Helpers ---

fn hit(area: Option<Rect>, pos: Position) -> bool {
  area.is_some_and(|r| r.contains(pos))
}

/// Classify a click against an open modal's content panel and close control.
fn modal_click(content: Option<Rect>, close: Option<Rect>, pos: Position) -> ModalClick {
  if hit(close, pos) {
    ModalClick::Close
  } else if hit(content, pos) {
    ModalClick::Content
  } else {
    ModalClick::Backdrop
  }
}

/// Shared line-editing keys. Returns `Some(changed)` when the key was consumed.
fn edit_text(input: &mut TextInput, key: &KeyEvent) -> Option<bool> {
  match key.code {
    KeyCode::Backspace => Some(input.backspace()),
    KeyCode::Delete => Some(input.delete()),
    KeyCode::Left => {
      input.left();
      Some(false)
    }
    KeyCode::Right => {
      input.right();
      Some(false)
    }
    KeyCode::Home => {
      input.home();
      Some(false)
    }
    KeyCode::End => {
      input.end();
      Some(false)
    }
    _ => None,
  }
}

// --- Keyboard ---

pub fn handle_key_event(app: &mut App, key: KeyEvent, now: Instant) {
  let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
  if ctrl && key.code == KeyCode::Char('c') {
    app.should_quit = true;
    return;
  }

  if ThemeController::is_toggle_key(&key) {
    app.theme.toggle_theme();
    return;
  }

  if app.manage.is_visible() {
    handle_manage_key(app, key);
    return;
  }

  if app.player.is_visible() {
    handle_player_key(app, key);
    return;
  }

  if ctrl {
    match key.code {
      KeyCode::Char('n') => {
        app.manage.open(Mode::Insert);
        return;
      }
      KeyCode::Char('d') => {
        app.manage.open(Mode::Delete);
        return;
      }
      KeyCode::Char('r') => {
        app.reload_page();
        return;
      }
      _ => {}
    }
  }

  if app.focus == Focus::Results && !app.search.is_visible() {
    app.focus = Focus::Search;
  }

  match app.focus {
    Focus::Page => handle_page_key(app, key),
    Focus::Search => handle_search_key(app, key, now),
    Focus::Results => handle_results_key(app, key),
  }
}

fn handle_page_key(app: &mut App, key: KeyEvent) {
  match key.code {
    KeyCode::Down | KeyCode::Char('j') => app.page.select_next(),
    KeyCode::Up | KeyCode::Char('k') => app.page.select_prev(),
    KeyCode::Home | KeyCode::Char('g') => app.page.select(0),
    KeyCode::End | KeyCode::Char('G') => app.page.select(app.page.rows().len().saturating_sub(1)),
    KeyCode::Enter => app.open_selected_project(),
    KeyCode::Char('/') => app.focus = Focus::Search,
    KeyCode::Esc | KeyCode::Char('q') => app.should_quit = true,
    _ => {}
  }
}

fn handle_search_key(app: &mut App, key: KeyEvent, now: Instant) {
  app.clear_error();
  if let Some(changed) = edit_text(&mut app.search.input, &key) {
    if changed {
      app.on_search_edited(now);
    }
    return;
  }
  match key.code {
    KeyCode::Char(c) if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
      app.search.input.insert(c);
      app.on_search_edited(now);
    }
    KeyCode::Down => {
      if app.search.is_visible() {
        app.focus = Focus::Results;
      }
    }
    KeyCode::Enter => {
      if app.search.is_visible() {
        let nav = app.search.select_highlighted();
        app.navigate(nav);
      }
    }
    KeyCode::Esc => {
      if app.search.is_visible() {
        app.search.hide_results();
      } else {
        app.focus = Focus::Page;
      }
    }
    _ => {}
  }
}

fn handle_results_key(app: &mut App, key: KeyEvent) {
  match key.code {
    KeyCode::Down | KeyCode::Char('j') => app.search.select_next(),
    KeyCode::Up | KeyCode::Char('k') => app.search.select_prev(),
    KeyCode::Enter => {
      let nav = app.search.select_highlighted();
      app.navigate(nav);
    }
    KeyCode::Esc | KeyCode::Char('/') => app.focus = Focus::Search,
    _ => {}
  }
}

fn handle_player_key(app: &mut App, key: KeyEvent) {
  match key.code {
    KeyCode::Esc | KeyCode::Char('q') => app.player.close_player(),
    KeyCode::Enter | KeyCode::Char('o') => app.launch_player(),
    _ => {}
  }
}

fn handle_manage_key(app: &mut App, key: KeyEvent) {
  let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
  let alt = key.modifiers.contains(KeyModifiers::ALT);
  match key.code {
    KeyCode::Esc => app.manage.close(),
    KeyCode::Char('s') if ctrl => app.submit_manage(),
    KeyCode::Right if ctrl => app.manage.next_tab(),
    KeyCode::Left if ctrl => app.manage.prev_tab(),
    KeyCode::Char(c @ '1'..='4') if alt => {
      let idx = c as usize - '1' as usize;
      app.manage.set_entity(Entity::ALL[idx]);
    }
    KeyCode::Tab | KeyCode::Down => app.manage.focus_next(),
    KeyCode::BackTab | KeyCode::Up => app.manage.focus_prev(),
    KeyCode::Enter => {
      if app.manage.is_last_field() {
        app.submit_manage();
      } else {
        app.manage.focus_next();
      }
    }
    KeyCode::Char(c) if !ctrl && !alt => {
      app.manage.push_char(c);
    }
    _ => {
      if let Some(field) = app.manage.focused_mut() {
        edit_text(&mut field.input, &key);
      }
    }
  }
}

// --- Mouse ---

pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent) {
  let pos = Position::new(mouse.column, mouse.row);
  match mouse.kind {
    MouseEventKind::Down(MouseButton::Left) => handle_click(app, pos),
    MouseEventKind::ScrollDown if !app.manage.is_visible() && !app.player.is_visible() => {
      if hit(app.hitboxes.results_box, pos) {
        app.search.select_next();
      } else if hit(app.hitboxes.page, pos) {
        app.page.select_next();
      }
    }
    MouseEventKind::ScrollUp if !app.manage.is_visible() && !app.player.is_visible() => {
      if hit(app.hitboxes.results_box, pos) {
        app.search.select_prev();
      } else if hit(app.hitboxes.page, pos) {
        app.page.select_prev();
      }
    }
    _ => {}
  }
}

fn handle_click(app: &mut App, pos: Position) {
  // Document-level listener runs for every click, before any widget.
  let target = if hit(app.hitboxes.results_box, pos) {
    SearchClick::Results
  } else if hit(app.hitboxes.search_input, pos) {
    SearchClick::Input
  } else {
    SearchClick::Elsewhere
  };
  app.search.on_document_click(target);

  if app.manage.is_visible() {
    handle_manage_click(app, pos);
    return;
  }

  if app.player.is_visible() {
    let click = modal_click(app.hitboxes.player_content, app.hitboxes.player_close, pos);
    app.player.on_click(click);
    return;
  }

  let hb = &app.hitboxes;
  if hit(hb.theme_toggle, pos) {
    app.theme.toggle_theme();
  } else if hit(hb.open_insert, pos) {
    app.manage.open(Mode::Insert);
  } else if hit(hb.open_delete, pos) {
    app.manage.open(Mode::Delete);
  } else if hit(hb.search_input, pos) {
    app.focus = Focus::Search;
  } else if let Some(rows) = hb.results_rows
    && rows.contains(pos)
    && app.search.is_visible()
  {
    let index = app.search.list_state.offset() + (pos.y - rows.y) as usize;
    app.select_result(index);
  } else if let Some(area) = hb.page
    && area.contains(pos)
  {
    let row = app.page.offset() + (pos.y - area.y) as usize;
    app.focus = Focus::Page;
    if row < app.page.rows().len() {
      app.page.select(row);
      if matches!(app.page.rows()[row], Row::Project { .. }) {
        app.open_selected_project();
      }
    }
  }
}

fn handle_manage_click(app: &mut App, pos: Position) {
  let hb = &app.hitboxes;
  let click = modal_click(hb.manage_content, hb.manage_close, pos);
  if click == ModalClick::Content {
    if let Some(&(_, entity)) = hb.manage_tabs.iter().find(|(r, _)| r.contains(pos)) {
      app.manage.set_entity(entity);
    } else if let Some(&(_, index)) = hb.manage_fields.iter().find(|(r, _)| r.contains(pos)) {
      app.manage.focus_field(index);
    } else if hit(hb.manage_submit, pos) {
      app.submit_manage();
    }
    return;
  }
  app.manage.on_click(click);
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::app::tests::make_app;
  use crate::models::{ResultKind, SearchItem};
  use crate::theme::ThemeName;

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  fn ctrl(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
  }

  fn click(column: u16, row: u16) -> MouseEvent {
    MouseEvent { kind: MouseEventKind::Down(MouseButton::Left), column, row, modifiers: KeyModifiers::NONE }
  }

  fn show_results(app: &mut App) {
    let item = SearchItem { id: "A1".into(), kind: ResultKind::Artist, label: "Nova".into(), song_link: None };
    app.search.apply_results(1, vec![item]);
  }

  // --- keyboard ---

  #[test]
  fn ctrl_t_toggles_theme_everywhere() {
    let mut app = make_app();
    assert_eq!(app.theme.current(), ThemeName::Dark);
    handle_key_event(&mut app, ctrl('t'), Instant::now());
    assert_eq!(app.theme.current(), ThemeName::Light);
    app.manage.open(Mode::Insert);
    handle_key_event(&mut app, key(KeyCode::F(2)), Instant::now());
    assert_eq!(app.theme.current(), ThemeName::Dark);
  }

  #[test]
  fn typing_in_search_schedules_query() {
    let mut app = make_app();
    handle_key_event(&mut app, key(KeyCode::Char('/')), Instant::now());
    assert_eq!(app.focus, Focus::Search);
    handle_key_event(&mut app, key(KeyCode::Char('n')), Instant::now());
    assert_eq!(app.search.input.value(), "n");
    assert!(app.search.is_pending());
    handle_key_event(&mut app, key(KeyCode::Backspace), Instant::now());
    assert!(!app.search.is_pending());
  }

  #[test]
  fn enter_in_results_navigates() {
    let mut app = make_app();
    show_results(&mut app);
    app.focus = Focus::Search;
    handle_key_event(&mut app, key(KeyCode::Down), Instant::now());
    assert_eq!(app.focus, Focus::Results);
    handle_key_event(&mut app, key(KeyCode::Enter), Instant::now());
    assert!(!app.search.is_visible());
    assert_eq!(app.focus, Focus::Page);
  }

  #[test]
  fn manage_keys_switch_tabs_and_close() {
    let mut app = make_app();
    handle_key_event(&mut app, ctrl('d'), Instant::now());
    assert!(app.manage.is_visible());
    assert_eq!(app.manage.mode(), Mode::Delete);
    handle_key_event(&mut app, KeyEvent::new(KeyCode::Right, KeyModifiers::CONTROL), Instant::now());
    assert_eq!(app.manage.entity(), Entity::Project);
    handle_key_event(&mut app, KeyEvent::new(KeyCode::Char('4'), KeyModifiers::ALT), Instant::now());
    assert_eq!(app.manage.entity(), Entity::Distributor);
    handle_key_event(&mut app, key(KeyCode::Char('q')), Instant::now());
    assert_eq!(app.manage.fields()[0].input.value(), "q");
    handle_key_event(&mut app, key(KeyCode::Esc), Instant::now());
    assert!(!app.manage.is_visible());
    assert_eq!(app.manage.mode(), Mode::Delete);
  }

  #[test]
  fn enter_advances_manage_fields() {
    let mut app = make_app();
    app.manage.open(Mode::Insert);
    handle_key_event(&mut app, key(KeyCode::Enter), Instant::now());
    assert_eq!(app.manage.focus, 1);
  }

  #[test]
  fn player_escape_closes() {
    let mut app = make_app();
    app.player.open_player("https://youtu.be/abc", None);
    handle_key_event(&mut app, key(KeyCode::Esc), Instant::now());
    assert!(!app.player.is_visible());
    assert_eq!(app.player.frame_src(), "");
  }

  // --- mouse ---

  #[test]
  fn player_backdrop_click_closes_content_click_does_not() {
    let mut app = make_app();
    app.player.open_player("https://youtu.be/abc", None);
    app.hitboxes.player_content = Some(Rect::new(10, 5, 40, 10));
    app.hitboxes.player_close = Some(Rect::new(45, 5, 3, 1));
    handle_mouse_event(&mut app, click(20, 8));
    assert!(app.player.is_visible());
    handle_mouse_event(&mut app, click(1, 1));
    assert!(!app.player.is_visible());
  }

  #[test]
  fn player_close_control_closes() {
    let mut app = make_app();
    app.player.open_player("https://youtu.be/abc", None);
    app.hitboxes.player_content = Some(Rect::new(10, 5, 40, 10));
    app.hitboxes.player_close = Some(Rect::new(45, 5, 3, 1));
    handle_mouse_event(&mut app, click(46, 5));
    assert!(!app.player.is_visible());
  }

  #[test]
  fn outside_click_hides_results_input_click_keeps_them() {
    let mut app = make_app();
    show_results(&mut app);
    app.hitboxes.search_input = Some(Rect::new(0, 20, 40, 3));
    app.hitboxes.results_box = Some(Rect::new(0, 14, 40, 6));
    handle_mouse_event(&mut app, click(5, 21));
    assert!(app.search.is_visible());
    assert_eq!(app.focus, Focus::Search);
    handle_mouse_event(&mut app, click(60, 2));
    assert!(!app.search.is_visible());
  }

  #[test]
  fn clicking_a_result_row_selects_it() {
    let mut app = make_app();
    app.page.select(5);
    show_results(&mut app);
    app.hitboxes.results_box = Some(Rect::new(0, 14, 40, 3));
    app.hitboxes.results_rows = Some(Rect::new(1, 15, 38, 1));
    handle_mouse_event(&mut app, click(5, 15));
    assert!(!app.search.is_visible());
    assert_eq!(app.page.selected, 0);
  }

  #[test]
  fn clicking_a_project_row_opens_player() {
    let mut app = make_app();
    app.hitboxes.page = Some(Rect::new(0, 2, 80, 20));
    // Row 7 is the only project.
    handle_mouse_event(&mut app, click(4, 9));
    assert!(app.player.is_visible());
    assert_eq!(app.player.title(), "First Light");
  }

  #[test]
  fn manage_tab_and_backdrop_clicks() {
    let mut app = make_app();
    app.manage.open(Mode::Insert);
    app.hitboxes.manage_content = Some(Rect::new(10, 2, 60, 20));
    app.hitboxes.manage_close = Some(Rect::new(65, 2, 3, 1));
    app.hitboxes.manage_tabs = vec![(Rect::new(12, 4, 8, 1), Entity::Artist), (Rect::new(21, 4, 9, 1), Entity::Project)];
    handle_mouse_event(&mut app, click(22, 4));
    assert_eq!(app.manage.entity(), Entity::Project);
    assert!(app.manage.is_visible());
    handle_mouse_event(&mut app, click(2, 2));
    assert!(!app.manage.is_visible());
  }

  #[test]
  fn header_buttons_open_manage_modes() {
    let mut app = make_app();
    app.hitboxes.open_delete = Some(Rect::new(50, 0, 10, 1));
    handle_mouse_event(&mut app, click(52, 0));
    assert!(app.manage.is_visible());
    assert_eq!(app.manage.mode(), Mode::Delete);
  }
}
