use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::info;

// --- Catalog snapshot ---

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogEntry {
  pub id: String,
  #[serde(default)]
  pub label: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectEntry {
  pub id: String,
  #[serde(default)]
  pub title: String,
  #[serde(default)]
  pub song_link: Option<String>,
}

/// Page content supplied from outside, one list per section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Catalog {
  #[serde(default)]
  pub artists: Vec<CatalogEntry>,
  #[serde(default)]
  pub productions: Vec<CatalogEntry>,
  #[serde(default)]
  pub distributors: Vec<CatalogEntry>,
  #[serde(default)]
  pub projects: Vec<ProjectEntry>,
}

impl Catalog {
  pub fn load(path: &Path) -> Result<Self> {
    let content =
      std::fs::read_to_string(path).with_context(|| format!("Failed to read catalog {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid catalog JSON in {}", path.display()))
  }
}

// --- Page layout ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionId {
  Artists,
  Productions,
  Distributors,
  Projects,
}

impl SectionId {
  pub const ALL: [SectionId; 4] = [SectionId::Artists, SectionId::Productions, SectionId::Distributors, SectionId::Projects];

  pub fn title(self) -> &'static str {
    match self {
      SectionId::Artists => "Artists",
      SectionId::Productions => "Productions",
      SectionId::Distributors => "Distributors",
      SectionId::Projects => "Projects",
    }
  }
}

/// One rendered line of the page.
#[derive(Debug, Clone, PartialEq)]
pub enum Row {
  Header(SectionId),
  Entry { id: String, label: String },
  /// An `open-project` control: carries the link and title read at click time.
  Project { id: String, title: String, song_link: String },
  Empty,
}

/// Scrollable catalog page with a row cursor.
pub struct Page {
  source: Option<PathBuf>,
  rows: Vec<Row>,
  offset: usize,
  target: usize,
  pub selected: usize,
}

impl Page {
  pub fn new(source: Option<PathBuf>) -> Self {
    Self { source, rows: build_rows(&Catalog::default()), offset: 0, target: 0, selected: 0 }
  }

  /// (Re)load the catalog from its source. Without a source the page keeps empty sections.
  pub fn reload(&mut self) -> Result<()> {
    let catalog = match self.source {
      Some(ref path) => Catalog::load(path)?,
      None => Catalog::default(),
    };
    self.set_catalog(&catalog);
    info!(rows = self.rows.len(), "page: loaded");
    Ok(())
  }

  pub fn set_catalog(&mut self, catalog: &Catalog) {
    self.rows = build_rows(catalog);
    self.selected = self.selected.min(self.rows.len().saturating_sub(1));
    self.target = self.target.min(self.rows.len().saturating_sub(1));
    self.offset = self.offset.min(self.target);
  }

  pub fn rows(&self) -> &[Row] {
    &self.rows
  }

  pub fn offset(&self) -> usize {
    self.offset
  }

  pub fn section_start(&self, section: SectionId) -> Option<usize> {
    self.rows.iter().position(|r| *r == Row::Header(section))
  }

  /// Smooth-scroll so the section header becomes the first visible row.
  /// A section that is not on the page is ignored.
  pub fn scroll_into_view(&mut self, section: SectionId) {
    if let Some(start) = self.section_start(section) {
      self.target = start;
      self.selected = start;
    }
  }

  /// Advance a pending smooth scroll by one step.
  pub fn tick(&mut self) {
    if self.offset == self.target {
      return;
    }
    let distance = self.offset.abs_diff(self.target);
    let step = (distance / 3).max(1);
    if self.offset < self.target {
      self.offset += step;
    } else {
      self.offset -= step;
    }
  }

  /// Keep the cursor inside a viewport of `height` rows, jumping immediately.
  /// Does nothing while a smooth scroll is still running.
  pub fn follow_cursor(&mut self, height: usize) {
    if height == 0 || self.offset != self.target {
      return;
    }
    if self.selected < self.offset {
      self.offset = self.selected;
    } else if self.selected >= self.offset + height {
      self.offset = self.selected + 1 - height;
    }
    self.target = self.offset;
  }

  pub fn select_next(&mut self) {
    if self.selected + 1 < self.rows.len() {
      self.selected += 1;
    }
  }

  pub fn select_prev(&mut self) {
    self.selected = self.selected.saturating_sub(1);
  }

  pub fn select(&mut self, row: usize) {
    if row < self.rows.len() {
      self.selected = row;
    }
  }

  /// Link and title of the project control under the cursor.
  pub fn selected_project(&self) -> Option<(&str, &str)> {
    match self.rows.get(self.selected)? {
      Row::Project { title, song_link, .. } => Some((song_link.as_str(), title.as_str())),
      _ => None,
    }
  }
}

fn build_rows(catalog: &Catalog) -> Vec<Row> {
  let mut rows = Vec::new();
  for section in SectionId::ALL {
    rows.push(Row::Header(section));
    let before = rows.len();
    match section {
      SectionId::Artists => rows.extend(catalog.artists.iter().map(entry_row)),
      SectionId::Productions => rows.extend(catalog.productions.iter().map(entry_row)),
      SectionId::Distributors => rows.extend(catalog.distributors.iter().map(entry_row)),
      SectionId::Projects => rows.extend(catalog.projects.iter().map(|p| Row::Project {
        id: p.id.clone(),
        title: p.title.clone(),
        song_link: p.song_link.clone().unwrap_or_default(),
      })),
    }
    if rows.len() == before {
      rows.push(Row::Empty);
    }
  }
  rows
}

fn entry_row(entry: &CatalogEntry) -> Row {
  Row::Entry { id: entry.id.clone(), label: entry.label.clone() }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn make_catalog() -> Catalog {
    serde_json::from_str(
      r#"{
        "artists": [{"id": "A1", "label": "Nova"}, {"id": "A2", "label": "Kite"}],
        "productions": [{"id": "PR1", "label": "Blue Room"}],
        "projects": [{"id": "P1", "title": "First Light", "song_link": "https://youtu.be/abc"}]
      }"#,
    )
    .unwrap()
  }

  fn make_page() -> Page {
    let mut page = Page::new(None);
    page.set_catalog(&make_catalog());
    page
  }

  #[test]
  fn sections_appear_in_order_with_placeholders() {
    let page = make_page();
    assert_eq!(page.section_start(SectionId::Artists), Some(0));
    assert_eq!(page.section_start(SectionId::Productions), Some(3));
    assert_eq!(page.section_start(SectionId::Distributors), Some(5));
    assert_eq!(page.rows()[6], Row::Empty);
    assert_eq!(page.section_start(SectionId::Projects), Some(7));
  }

  #[test]
  fn scroll_into_view_reaches_target_smoothly() {
    let mut page = make_page();
    page.scroll_into_view(SectionId::Projects);
    page.tick();
    assert!(page.offset() > 0 && page.offset() < 7);
    for _ in 0..10 {
      page.tick();
    }
    assert_eq!(page.offset(), 7);
    assert_eq!(page.selected, 7);
  }

  #[test]
  fn selected_project_reads_link_and_title() {
    let mut page = make_page();
    page.select(8);
    assert_eq!(page.selected_project(), Some(("https://youtu.be/abc", "First Light")));
    page.select(1);
    assert_eq!(page.selected_project(), None);
  }

  #[test]
  fn follow_cursor_keeps_selection_visible() {
    let mut page = make_page();
    for _ in 0..6 {
      page.select_next();
    }
    page.follow_cursor(3);
    assert_eq!(page.offset(), 4);
    page.select(0);
    page.follow_cursor(3);
    assert_eq!(page.offset(), 0);
  }

  #[test]
  fn missing_catalog_file_is_an_error() {
    let mut page = Page::new(Some(PathBuf::from("/nonexistent/studio/catalog.json")));
    assert!(page.reload().is_err());
    assert_eq!(page.rows().len(), 8);
  }
}
