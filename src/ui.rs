use ratatui::{
  Frame,
  layout::{Alignment, Constraint, Layout, Rect},
  style::{Modifier, Style, Stylize},
  text::{Line, Span},
  widgets::{Block, BorderType, Clear, List, ListItem, Padding, Paragraph},
};
use unicode_width::UnicodeWidthStr;

use crate::app::{App, Focus, Session};
use crate::manage::{FieldKind, MessageClass, Mode};
use crate::models::{Entity, ResultKind};
use crate::page::Row;
use crate::text::truncate_str;
use crate::theme::Theme;

// --- Helpers ---

/// A `width` x `height` rect centered in `area`, clamped to fit.
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
  let width = width.min(area.width);
  let height = height.min(area.height);
  Rect {
    x: area.x + (area.width - width) / 2,
    y: area.y + (area.height - height) / 2,
    width,
    height,
  }
}

/// One-line rect for `text` starting at column `x` of `area`'s first row.
fn span_rect(area: Rect, x: u16, text: &str) -> Rect {
  Rect { x, y: area.y, width: text.width() as u16, height: 1 }.intersection(area)
}

fn rounded_block<'a>(theme: &Theme, border: ratatui::style::Color) -> Block<'a> {
  Block::bordered().border_type(BorderType::Rounded).border_style(Style::default().fg(border)).bg(theme.overlay_bg)
}

/// Draw a `[x]` close control on the top border of `area` and return its rect.
fn render_close(frame: &mut Frame, theme: &Theme, area: Rect) -> Rect {
  let label = "[x]";
  let rect = span_rect(area, area.x + area.width.saturating_sub(label.len() as u16 + 2), label);
  frame.render_widget(Span::styled(label, Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)), rect);
  rect
}

// --- UI Rendering ---

pub fn ui(frame: &mut Frame, app: &mut App) {
  let theme = app.palette();
  app.hitboxes.clear();

  frame.render_widget(Block::default().style(Style::default().bg(theme.bg)), frame.area());

  let [header_area, main_area, status_area, input_area, footer_area] = Layout::vertical([
    Constraint::Length(1),
    Constraint::Min(3),
    Constraint::Length(1),
    Constraint::Length(3),
    Constraint::Length(1),
  ])
  .areas(frame.area());

  render_header(frame, app, header_area);
  render_page(frame, app, main_area);
  render_status(frame, app, status_area);
  render_input(frame, app, input_area);
  render_footer(frame, app, footer_area);

  if app.manage.is_visible() {
    render_manage(frame, app, frame.area());
  } else if app.player.is_visible() {
    render_player(frame, app, frame.area());
  } else if app.search.is_visible() {
    render_results(frame, app, input_area, main_area);
  }

  if app.loader.is_visible() {
    render_loader(frame, theme, frame.area());
  }
}

fn render_header(frame: &mut Frame, app: &mut App, area: Rect) {
  let theme = app.palette();
  let session = match &app.session {
    Session::Anonymous => String::new(),
    Session::SigningIn => "signing in…".to_string(),
    Session::SignedIn(user) => format!("signed in as {}", user),
    Session::Rejected => "signed out".to_string(),
  };
  let left = Line::from(vec![
    Span::styled(" ◆ studio ", Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)),
    Span::styled(session, Style::default().fg(theme.muted)),
  ]);
  frame.render_widget(left, area);

  let toggle = format!("[◐ {}]", theme.name);
  let insert = "[+ Insert]";
  let delete = "[- Delete]";
  let total = (toggle.width() + insert.width() + delete.width() + 4) as u16;
  let mut x = area.x + area.width.saturating_sub(total);

  let button = Style::default().fg(theme.accent);
  let insert_rect = span_rect(area, x, insert);
  frame.render_widget(Span::styled(insert, button), insert_rect);
  x += insert.width() as u16 + 1;
  let delete_rect = span_rect(area, x, delete);
  frame.render_widget(Span::styled(delete, button), delete_rect);
  x += delete.width() as u16 + 2;
  let toggle_rect = span_rect(area, x, &toggle);
  frame.render_widget(Span::styled(toggle.as_str(), Style::default().fg(theme.muted)), toggle_rect);

  app.hitboxes.open_insert = Some(insert_rect);
  app.hitboxes.open_delete = Some(delete_rect);
  app.hitboxes.theme_toggle = Some(toggle_rect);
}

fn render_page(frame: &mut Frame, app: &mut App, area: Rect) {
  let theme = app.palette();
  let focused = app.focus == Focus::Page && !app.manage.is_visible() && !app.player.is_visible();
  let block = Block::bordered()
    .title(" Catalog ")
    .title_style(Style::default().fg(theme.accent).add_modifier(Modifier::BOLD))
    .border_type(BorderType::Rounded)
    .border_style(Style::default().fg(if focused { theme.accent } else { theme.border }))
    .padding(Padding::horizontal(1));
  let inner = block.inner(area);
  frame.render_widget(block, area);
  app.hitboxes.page = Some(inner);

  let height = inner.height as usize;
  let width = inner.width as usize;
  app.page.follow_cursor(height);

  let lines: Vec<Line> = app
    .page
    .rows()
    .iter()
    .enumerate()
    .skip(app.page.offset())
    .take(height)
    .map(|(i, row)| {
      let selected = i == app.page.selected;
      let (fg, bg) = match (selected, focused) {
        (true, true) => (theme.highlight_fg, theme.highlight_bg),
        (true, false) => (theme.fg, theme.stripe_bg),
        _ => (theme.fg, theme.bg),
      };
      let line = match row {
        Row::Header(section) => Line::from(Span::styled(
          format!("▍{}", section.title()),
          Style::default().fg(if selected && focused { fg } else { theme.accent }).add_modifier(Modifier::BOLD),
        )),
        Row::Entry { id, label } => {
          let id_w = id.width();
          let label = truncate_str(label, width.saturating_sub(id_w + 5));
          let gap = width.saturating_sub(label.width() + id_w + 2);
          Line::from(vec![
            Span::styled(format!("  {}", label), Style::default().fg(fg)),
            Span::raw(" ".repeat(gap)),
            Span::styled(id.as_str(), Style::default().fg(if selected && focused { fg } else { theme.muted })),
          ])
        }
        Row::Project { title, song_link, .. } => {
          let mut spans = vec![Span::styled(
            format!("  ▶ {}", truncate_str(title, width.saturating_sub(16))),
            Style::default().fg(fg),
          )];
          if song_link.is_empty() {
            spans.push(Span::styled("  (no link)", Style::default().fg(theme.muted)));
          }
          Line::from(spans)
        }
        Row::Empty => Line::from(Span::styled(
          "  Nothing here yet.",
          Style::default().fg(theme.muted).add_modifier(Modifier::ITALIC),
        )),
      };
      line.bg(bg)
    })
    .collect();

  frame.render_widget(Paragraph::new(lines), inner);
}

fn render_status(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.palette();
  let (text, style) = if let Some(msg) = &app.status_message {
    (format!(" ⏳ {}", msg), Style::default().fg(theme.status))
  } else if let Some(err) = &app.last_error {
    (format!(" ⚠  {}", err), Style::default().fg(theme.error))
  } else if app.searches_in_flight() > 0 {
    (" ⏳ Searching…".to_string(), Style::default().fg(theme.status))
  } else {
    (" Ready".to_string(), Style::default().fg(theme.muted))
  };
  frame.render_widget(Paragraph::new(text).style(style), area);
}

fn render_input(frame: &mut Frame, app: &mut App, area: Rect) {
  let theme = app.palette();
  let active = matches!(app.focus, Focus::Search | Focus::Results);
  let border_color = if active { theme.accent } else { theme.border };
  let input_block = Block::bordered()
    .title(" Search ")
    .title_style(Style::default().fg(border_color))
    .border_type(BorderType::Rounded)
    .border_style(Style::default().fg(border_color))
    .padding(Padding::horizontal(1));

  let inner_w = area.width.saturating_sub(4) as usize;
  let (visible, cursor_col) = app.search.input.visible(inner_w);
  let paragraph = Paragraph::new(visible).style(Style::default().fg(theme.fg)).block(input_block);
  frame.render_widget(paragraph, area);
  app.hitboxes.search_input = Some(area);

  if app.focus == Focus::Search && !app.manage.is_visible() && !app.player.is_visible() {
    frame.set_cursor_position((area.x + 2 + cursor_col as u16, area.y + 1));
  }
}

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.palette();
  let keys: Vec<(&str, &str)> = if app.manage.is_visible() {
    vec![("Tab", "Field"), ("^←/^→", "Entity"), ("^s", "Submit"), ("Esc", "Close")]
  } else if app.player.is_visible() {
    vec![("o", "Open in browser"), ("Esc", "Close")]
  } else {
    match app.focus {
      Focus::Page => vec![
        ("/", "Search"),
        ("Enter", "Play"),
        ("j/k", "Navigate"),
        ("^n", "Insert"),
        ("^d", "Delete"),
        ("^r", "Reload"),
        ("^t", "Theme"),
        ("q", "Quit"),
      ],
      Focus::Search => {
        let mut k = Vec::new();
        if app.search.is_visible() {
          k.push(("↓", "Results"));
          k.push(("Enter", "Select"));
        }
        k.push(("^t", "Theme"));
        k.push(("Esc", "Back"));
        k
      }
      Focus::Results => vec![("Enter", "Select"), ("j/k", "Navigate"), ("Esc", "Back")],
    }
  };

  let spans: Vec<Span> = keys
    .iter()
    .enumerate()
    .flat_map(|(i, (key, action))| {
      let mut s = vec![
        Span::styled(format!(" {} ", key), Style::default().fg(theme.key_fg).bg(theme.key_bg)),
        Span::styled(format!(" {} ", action), Style::default().fg(theme.muted)),
      ];
      if i < keys.len() - 1 {
        s.push(Span::raw("  "));
      }
      s
    })
    .collect();

  frame.render_widget(Line::from(spans), area);
}

// --- Overlays ---

fn render_results(frame: &mut Frame, app: &mut App, input_area: Rect, main_area: Rect) {
  let theme = app.palette();
  let count = app.search.results().len() as u16;
  let height = (count + 2).min(main_area.height).min(12);
  let area = Rect { x: input_area.x, y: input_area.y.saturating_sub(height), width: input_area.width, height };

  let inner_w = area.width.saturating_sub(4) as usize;
  let items: Vec<ListItem> = app
    .search
    .results()
    .iter()
    .map(|item| {
      let kind = match item.kind {
        ResultKind::Other => "",
        _ => item.kind.as_str(),
      };
      let label = truncate_str(&item.label, inner_w.saturating_sub(kind.width() + 2));
      let gap = inner_w.saturating_sub(label.width() + kind.width());
      ListItem::new(Line::from(vec![
        Span::raw(label),
        Span::raw(" ".repeat(gap)),
        Span::styled(kind, Style::default().fg(theme.muted)),
      ]))
    })
    .collect();

  let list = List::new(items)
    .block(rounded_block(theme, theme.accent).title(" Results ").title_style(Style::default().fg(theme.accent)))
    .style(Style::default().fg(theme.fg))
    .highlight_symbol("▶ ")
    .highlight_style(Style::default().fg(theme.highlight_fg).bg(theme.highlight_bg).add_modifier(Modifier::BOLD));

  frame.render_widget(Clear, area);
  frame.render_stateful_widget(list, area, &mut app.search.list_state);
  app.hitboxes.results_box = Some(area);
  app.hitboxes.results_rows = Some(Block::bordered().inner(area));
}

fn render_player(frame: &mut Frame, app: &mut App, area: Rect) {
  let theme = app.palette();
  let panel = centered_rect(area.width.saturating_sub(8).min(90), 9, area);
  let inner_w = panel.width.saturating_sub(4) as usize;

  let title = Line::from(Span::styled(
    format!(" {} ", truncate_str(app.player.title(), inner_w.saturating_sub(6))),
    Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
  ));
  let block = rounded_block(theme, theme.accent).title(title).padding(Padding::horizontal(1));

  let lines = vec![
    Line::from(""),
    Line::from(Span::styled("Embedded player", Style::default().fg(theme.muted))),
    Line::from(Span::styled(
      truncate_str(app.player.frame_src(), inner_w),
      Style::default().fg(theme.status).add_modifier(Modifier::UNDERLINED),
    )),
    Line::from(""),
    Line::from(vec![
      Span::styled(" o ", Style::default().fg(theme.key_fg).bg(theme.key_bg)),
      Span::styled(" Open in browser ", Style::default().fg(theme.muted)),
    ]),
  ];

  frame.render_widget(Clear, panel);
  frame.render_widget(Paragraph::new(lines).style(Style::default().fg(theme.fg)).block(block), panel);
  app.hitboxes.player_content = Some(panel);
  app.hitboxes.player_close = Some(render_close(frame, theme, panel));
}

fn render_manage(frame: &mut Frame, app: &mut App, area: Rect) {
  let theme = app.palette();
  let field_count = app.manage.fields().len() as u16;
  let panel = centered_rect(area.width.saturating_sub(4).min(68), field_count * 2 + 7, area);

  let block = rounded_block(theme, theme.accent)
    .title(Span::styled(format!(" {} ", app.manage.title()), Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)))
    .padding(Padding::horizontal(1));
  let inner = block.inner(panel);
  frame.render_widget(Clear, panel);
  frame.render_widget(block, panel);
  app.hitboxes.manage_content = Some(panel);
  app.hitboxes.manage_close = Some(render_close(frame, theme, panel));

  let [tabs_area, _, fields_area, _, message_area, submit_area] = Layout::vertical([
    Constraint::Length(1),
    Constraint::Length(1),
    Constraint::Length(field_count * 2),
    Constraint::Length(1),
    Constraint::Length(1),
    Constraint::Length(1),
  ])
  .areas(inner);

  // Tabs
  let mut x = tabs_area.x;
  for entity in Entity::ALL {
    let label = format!(" {} ", entity.label());
    let rect = span_rect(tabs_area, x, &label);
    let style = if entity == app.manage.entity() {
      Style::default().fg(theme.highlight_fg).bg(theme.highlight_bg).add_modifier(Modifier::BOLD)
    } else {
      Style::default().fg(theme.muted).bg(theme.stripe_bg)
    };
    frame.render_widget(Span::styled(label.clone(), style), rect);
    app.hitboxes.manage_tabs.push((rect, entity));
    x += label.width() as u16 + 1;
  }

  // Fields
  let inner_w = fields_area.width.saturating_sub(2) as usize;
  let focus = app.manage.focus;
  let mut cursor = None;
  for (index, field) in app.manage.fields_mut().iter_mut().enumerate() {
    let y = fields_area.y + index as u16 * 2;
    let label_rect = Rect { y, height: 1, ..fields_area }.intersection(fields_area);
    let input_rect = Rect { y: y + 1, height: 1, ..fields_area }.intersection(fields_area);
    let focused = index == focus;

    let mut label = vec![Span::styled(
      field.label.clone(),
      Style::default().fg(if focused { theme.accent } else { theme.fg }).add_modifier(Modifier::BOLD),
    )];
    if field.required {
      label.push(Span::styled(" *", Style::default().fg(theme.error)));
    }
    match field.kind {
      FieldKind::Number => label.push(Span::styled("  number", Style::default().fg(theme.muted))),
      FieldKind::TextArea => label.push(Span::styled("  long text", Style::default().fg(theme.muted))),
      FieldKind::Text => {}
    }
    frame.render_widget(Line::from(label), label_rect);

    let (visible, col) = field.input.visible(inner_w);
    let prompt = if focused { theme.accent } else { theme.muted };
    let bg = if focused { theme.stripe_bg } else { theme.overlay_bg };
    let line = Line::from(vec![Span::styled("› ", Style::default().fg(prompt)), Span::raw(visible)]);
    frame.render_widget(Paragraph::new(line).style(Style::default().fg(theme.fg).bg(bg)), input_rect);
    if focused && input_rect.height > 0 {
      cursor = Some((input_rect.x + 2 + col as u16, input_rect.y));
    }
    app.hitboxes.manage_fields.push((Rect { y, height: 2, ..fields_area }.intersection(fields_area), index));
  }

  // Status message
  if let Some(msg) = app.manage.message() {
    let color = match msg.class {
      MessageClass::Ok => theme.ok,
      MessageClass::Err => theme.error,
    };
    frame.render_widget(Paragraph::new(msg.text.as_str()).style(Style::default().fg(color)), message_area);
  } else if app.submit_in_flight() {
    frame.render_widget(Paragraph::new("Sending…").style(Style::default().fg(theme.status)), message_area);
  }

  let submit = match app.manage.mode() {
    Mode::Insert => "[ Insert ]",
    Mode::Delete => "[ Delete ]",
  };
  let submit_rect = span_rect(submit_area, submit_area.x, submit);
  frame.render_widget(
    Span::styled(submit, Style::default().fg(theme.highlight_fg).bg(theme.highlight_bg).add_modifier(Modifier::BOLD)),
    submit_rect,
  );
  app.hitboxes.manage_submit = Some(submit_rect);

  if let Some(pos) = cursor {
    frame.set_cursor_position(pos);
  }
}

fn render_loader(frame: &mut Frame, theme: &Theme, area: Rect) {
  frame.render_widget(Clear, area);
  frame.render_widget(Block::default().style(Style::default().bg(theme.bg)), area);
  let text = vec![
    Line::from(Span::styled("◆ studio", Style::default().fg(theme.accent).add_modifier(Modifier::BOLD))),
    Line::from(""),
    Line::from(Span::styled("Loading…", Style::default().fg(theme.muted))),
  ];
  let rect = centered_rect(area.width, 3, area);
  frame.render_widget(Paragraph::new(text).alignment(Alignment::Center), rect);
}
