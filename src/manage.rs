use std::collections::BTreeMap;

use anyhow::Result;
use tracing::{debug, warn};

use crate::models::{ApiReply, Entity};
use crate::player::ModalClick;
use crate::text::TextInput;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
  Insert,
  Delete,
}

impl Mode {
  pub fn title(self) -> &'static str {
    match self {
      Mode::Insert => "Insert new record",
      Mode::Delete => "Delete record",
    }
  }

  fn success_message(self) -> &'static str {
    match self {
      Mode::Insert => "Inserted successfully. Reload to see it in UI.",
      Mode::Delete => "Deleted successfully. Reload to see changes.",
    }
  }

  fn error_fallback(self) -> &'static str {
    match self {
      Mode::Insert => "Error while inserting.",
      Mode::Delete => "Error while deleting.",
    }
  }
}

// --- Form fields ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
  Text,
  /// Accepts digits, sign and decimal point only.
  Number,
  /// Free text, rendered taller.
  TextArea,
}

#[derive(Debug, Clone)]
pub struct FormField {
  pub name: &'static str,
  pub label: String,
  pub required: bool,
  pub kind: FieldKind,
  pub input: TextInput,
}

impl FormField {
  fn new(name: &'static str, label: &str, required: bool, kind: FieldKind) -> Self {
    Self { name, label: label.to_string(), required, kind, input: TextInput::default() }
  }

  fn text(name: &'static str, label: &str) -> Self {
    Self::new(name, label, false, FieldKind::Text)
  }

  fn required(name: &'static str, label: &str) -> Self {
    Self::new(name, label, true, FieldKind::Text)
  }

  fn accepts(&self, c: char) -> bool {
    match self.kind {
      FieldKind::Number => c.is_ascii_digit() || c == '-' || c == '.',
      FieldKind::Text | FieldKind::TextArea => !c.is_control(),
    }
  }
}

/// Field set for one (mode, entity) pair.
pub fn fields_for(mode: Mode, entity: Entity) -> Vec<FormField> {
  if mode == Mode::Delete {
    return vec![FormField::required("id", &format!("ID to delete ({}_id)", entity))];
  }
  match entity {
    Entity::Artist => vec![
      FormField::required("artist_id", "Artist ID"),
      FormField::required("name", "Name"),
      FormField::text("photo_url", "Photo URL"),
      FormField::text("last_project_id", "Last Project ID"),
    ],
    Entity::Project => vec![
      FormField::required("project_id", "Project ID"),
      FormField::text("title", "Title"),
      FormField::text("type", "Type"),
      FormField::text("release_date", "Release Date (YYYY-MM-DD)"),
      FormField::text("song_link", "Song Link (YouTube URL)"),
      FormField::text("album_art", "Album Art URL"),
      FormField::new("description", "Description", false, FieldKind::TextArea),
    ],
    Entity::Production => vec![
      FormField::required("production_id", "Production ID"),
      FormField::required("name", "Name"),
      FormField::text("logo_url", "Logo URL"),
      FormField::new("market_value", "Market Value", false, FieldKind::Number),
      FormField::text("last_project_id", "Last Project ID"),
    ],
    Entity::Distributor => vec![
      FormField::required("distributor_id", "Distributor ID"),
      FormField::required("name", "Name"),
      FormField::text("logo_url", "Logo URL"),
      FormField::new("market_value", "Market Value", false, FieldKind::Number),
      FormField::text("url", "Website URL"),
    ],
  }
}

// --- Status message ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageClass {
  Ok,
  Err,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
  pub text: String,
  pub class: MessageClass,
}

/// A request the modal wants sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
  Insert { entity: Entity, data: BTreeMap<String, String> },
  Delete { entity: Entity, id: String },
}

impl Submission {
  pub fn mode(&self) -> Mode {
    match self {
      Submission::Insert { .. } => Mode::Insert,
      Submission::Delete { .. } => Mode::Delete,
    }
  }
}

// --- Modal ---

/// Tabbed insert/delete form builder.
pub struct ManageModal {
  visible: bool,
  mode: Mode,
  entity: Entity,
  fields: Vec<FormField>,
  pub focus: usize,
  message: Option<StatusMessage>,
}

impl Default for ManageModal {
  fn default() -> Self {
    Self::new()
  }
}

impl ManageModal {
  pub fn new() -> Self {
    Self {
      visible: false,
      mode: Mode::Insert,
      entity: Entity::Artist,
      fields: fields_for(Mode::Insert, Entity::Artist),
      focus: 0,
      message: None,
    }
  }

  pub fn open(&mut self, mode: Mode) {
    self.mode = mode;
    self.message = None;
    self.visible = true;
    self.render_fields();
    debug!(mode = ?mode, entity = %self.entity, "manage: open");
  }

  /// Hide only; mode and entity carry over to the next open.
  pub fn close(&mut self) {
    self.visible = false;
  }

  /// Tab click: switch entity, keep mode.
  pub fn set_entity(&mut self, entity: Entity) {
    self.entity = entity;
    self.render_fields();
  }

  pub fn next_tab(&mut self) {
    let idx = Entity::ALL.iter().position(|e| *e == self.entity).unwrap_or(0);
    self.set_entity(Entity::ALL[(idx + 1) % Entity::ALL.len()]);
  }

  pub fn prev_tab(&mut self) {
    let idx = Entity::ALL.iter().position(|e| *e == self.entity).unwrap_or(0);
    self.set_entity(Entity::ALL[(idx + Entity::ALL.len() - 1) % Entity::ALL.len()]);
  }

  pub fn render_fields(&mut self) {
    self.fields = fields_for(self.mode, self.entity);
    self.focus = 0;
  }

  pub fn on_click(&mut self, click: ModalClick) {
    match click {
      ModalClick::Backdrop | ModalClick::Close => self.close(),
      ModalClick::Content => {}
    }
  }

  // --- Field editing ---

  pub fn focus_next(&mut self) {
    if !self.fields.is_empty() {
      self.focus = (self.focus + 1) % self.fields.len();
    }
  }

  pub fn focus_prev(&mut self) {
    if !self.fields.is_empty() {
      self.focus = if self.focus == 0 { self.fields.len() - 1 } else { self.focus - 1 };
    }
  }

  pub fn focus_field(&mut self, index: usize) {
    if index < self.fields.len() {
      self.focus = index;
    }
  }

  pub fn is_last_field(&self) -> bool {
    self.focus + 1 >= self.fields.len()
  }

  pub fn focused_mut(&mut self) -> Option<&mut FormField> {
    self.fields.get_mut(self.focus)
  }

  /// Type into the focused field. Returns `false` when the field rejects the char.
  pub fn push_char(&mut self, c: char) -> bool {
    let Some(field) = self.focused_mut() else { return false };
    if !field.accepts(c) {
      return false;
    }
    field.input.insert(c);
    true
  }

  /// Set a field's value by name.
  #[cfg(test)]
  pub fn set_value(&mut self, name: &str, value: &str) {
    if let Some(field) = self.fields.iter_mut().find(|f| f.name == name) {
      field.input.set(value);
    }
  }

  // --- Submission ---

  /// Clear the previous message and build the request, if there is one to send.
  pub fn begin_submit(&mut self) -> Option<Submission> {
    self.message = None;
    match self.mode {
      Mode::Delete => {
        let id = self.fields.iter().find(|f| f.name == "id").map(|f| f.input.value().trim()).unwrap_or_default();
        if id.is_empty() {
          return None;
        }
        Some(Submission::Delete { entity: self.entity, id: id.to_string() })
      }
      Mode::Insert => {
        let data = self
          .fields
          .iter()
          .filter(|f| !f.input.is_empty())
          .map(|f| (f.name.to_string(), f.input.value().to_string()))
          .collect();
        Some(Submission::Insert { entity: self.entity, data })
      }
    }
  }

  /// Turn the backend outcome into the status message.
  pub fn finish_submit(&mut self, mode: Mode, outcome: Result<ApiReply>) {
    let message = match outcome {
      Ok(reply) if reply.ok => StatusMessage { text: mode.success_message().to_string(), class: MessageClass::Ok },
      Ok(reply) => StatusMessage {
        text: reply.message.unwrap_or_else(|| mode.error_fallback().to_string()),
        class: MessageClass::Err,
      },
      Err(e) => {
        warn!(err = ?e, "manage: request failed");
        StatusMessage { text: "Request failed.".to_string(), class: MessageClass::Err }
      }
    };
    debug!(text = %message.text, "manage: submission finished");
    self.message = Some(message);
  }

  // --- Accessors ---

  pub fn is_visible(&self) -> bool {
    self.visible
  }

  pub fn mode(&self) -> Mode {
    self.mode
  }

  pub fn entity(&self) -> Entity {
    self.entity
  }

  pub fn title(&self) -> &'static str {
    self.mode.title()
  }

  pub fn fields(&self) -> &[FormField] {
    &self.fields
  }

  pub fn fields_mut(&mut self) -> &mut [FormField] {
    &mut self.fields
  }

  pub fn message(&self) -> Option<&StatusMessage> {
    self.message.as_ref()
  }
}
