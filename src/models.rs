//! Wire types shared by the backend client and the controllers.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// --- Record kinds ---

/// Catalog record kinds that can be inserted or deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Entity {
  Artist,
  Project,
  Production,
  Distributor,
}

impl Entity {
  /// Tab order in the manage modal.
  pub const ALL: [Entity; 4] = [Entity::Artist, Entity::Project, Entity::Production, Entity::Distributor];

  pub fn as_str(self) -> &'static str {
    match self {
      Entity::Artist => "artist",
      Entity::Project => "project",
      Entity::Production => "production",
      Entity::Distributor => "distributor",
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      Entity::Artist => "Artist",
      Entity::Project => "Project",
      Entity::Production => "Production",
      Entity::Distributor => "Distributor",
    }
  }
}

impl fmt::Display for Entity {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

// --- Search ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResultKind {
  Artist,
  Production,
  Distributor,
  Project,
  /// Unknown, missing or non-string `type`: rendered, ignored on selection.
  #[default]
  Other,
}

impl ResultKind {
  pub fn parse(s: &str) -> Self {
    match s {
      "artist" => ResultKind::Artist,
      "production" => ResultKind::Production,
      "distributor" => ResultKind::Distributor,
      "project" => ResultKind::Project,
      _ => ResultKind::Other,
    }
  }

  pub fn as_str(self) -> &'static str {
    match self {
      ResultKind::Artist => "artist",
      ResultKind::Production => "production",
      ResultKind::Distributor => "distributor",
      ResultKind::Project => "project",
      ResultKind::Other => "other",
    }
  }
}

// Rows are decoded field by field from raw JSON so one odd row never fails the response.

/// Strings pass through, numbers are stringified, anything else is empty.
fn lenient_string<'de, D: Deserializer<'de>>(de: D) -> Result<String, D::Error> {
  Ok(match Value::deserialize(de)? {
    Value::String(s) => s,
    Value::Number(n) => n.to_string(),
    _ => String::new(),
  })
}

fn lenient_kind<'de, D: Deserializer<'de>>(de: D) -> Result<ResultKind, D::Error> {
  Ok(Value::deserialize(de)?.as_str().map_or(ResultKind::Other, ResultKind::parse))
}

/// Only a string counts as a link.
fn lenient_link<'de, D: Deserializer<'de>>(de: D) -> Result<Option<String>, D::Error> {
  Ok(match Value::deserialize(de)? {
    Value::String(s) => Some(s),
    _ => None,
  })
}

/// One row of the search dropdown, exactly as the backend sent it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SearchItem {
  #[serde(default, deserialize_with = "lenient_string")]
  pub id: String,
  #[serde(rename = "type", default, deserialize_with = "lenient_kind")]
  pub kind: ResultKind,
  #[serde(default, deserialize_with = "lenient_string")]
  pub label: String,
  #[serde(default, deserialize_with = "lenient_link")]
  pub song_link: Option<String>,
}

impl SearchItem {
  /// The recorded song link, if it is non-empty.
  pub fn link(&self) -> Option<&str> {
    self.song_link.as_deref().filter(|s| !s.is_empty())
  }
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchResponse {
  #[serde(default)]
  results: Option<Vec<SearchItem>>,
}

impl SearchResponse {
  pub fn into_items(self) -> Vec<SearchItem> {
    self.results.unwrap_or_default()
  }
}

// --- Manage ---

#[derive(Debug, Serialize)]
pub struct InsertRequest<'a> {
  pub entity: Entity,
  pub data: &'a BTreeMap<String, String>,
}

#[derive(Debug, Serialize)]
pub struct DeleteRequest<'a> {
  pub entity: Entity,
  pub id: &'a str,
}

/// `{ ok, message? }` reply of the insert/delete endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiReply {
  pub ok: bool,
  pub message: Option<String>,
}

impl ApiReply {
  /// Decode leniently: any JSON shape is accepted, anything but `ok: true` is a failure.
  pub fn from_value(value: &Value) -> Self {
    let ok = value.get("ok").and_then(Value::as_bool).unwrap_or(false);
    let message = value.get("message").and_then(Value::as_str).filter(|s| !s.is_empty()).map(str::to_string);
    Self { ok, message }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  // --- SearchResponse ---

  #[test]
  fn decodes_results_in_order() {
    let json = r#"{"results":[
      {"type":"artist","id":"A1","label":"Nova"},
      {"type":"project","id":"P1","label":"First Light","song_link":"https://youtu.be/x"}
    ]}"#;
    let items = serde_json::from_str::<SearchResponse>(json).unwrap().into_items();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].kind, ResultKind::Artist);
    assert_eq!(items[1].link(), Some("https://youtu.be/x"));
  }

  #[test]
  fn missing_or_null_results_are_empty() {
    assert!(serde_json::from_str::<SearchResponse>("{}").unwrap().into_items().is_empty());
    assert!(serde_json::from_str::<SearchResponse>(r#"{"results":null}"#).unwrap().into_items().is_empty());
  }

  #[test]
  fn null_fields_and_unknown_types_decode() {
    let json = r#"{"results":[{"type":"venue","id":"V1","label":null,"song_link":null}]}"#;
    let items = serde_json::from_str::<SearchResponse>(json).unwrap().into_items();
    assert_eq!(items[0].kind, ResultKind::Other);
    assert_eq!(items[0].label, "");
    assert_eq!(items[0].link(), None);
  }

  #[test]
  fn malformed_rows_decode_alongside_valid_ones() {
    let json = r#"{"results":[
      {"id":"A1","label":"Nova","type":"artist"},
      {"id":"X","label":"Odd"},
      {"id":"Y","label":"Nulled","type":null},
      {"id":7,"label":"Numbered","type":"project","song_link":"https://youtu.be/n"},
      {"id":"Z","label":42,"type":3,"song_link":false}
    ]}"#;
    let items = serde_json::from_str::<SearchResponse>(json).unwrap().into_items();
    assert_eq!(items.len(), 5);
    assert_eq!(items[0].kind, ResultKind::Artist);
    assert_eq!(items[1].kind, ResultKind::Other);
    assert_eq!(items[2].kind, ResultKind::Other);
    assert_eq!(items[3].id, "7");
    assert_eq!(items[3].kind, ResultKind::Project);
    assert_eq!(items[3].link(), Some("https://youtu.be/n"));
    assert_eq!(items[4].label, "42");
    assert_eq!(items[4].kind, ResultKind::Other);
    assert_eq!(items[4].link(), None);
  }

  #[test]
  fn empty_song_link_is_no_link() {
    let item = SearchItem { id: "P".into(), kind: ResultKind::Project, label: "x".into(), song_link: Some(String::new()) };
    assert_eq!(item.link(), None);
  }

  // --- payloads ---

  #[test]
  fn delete_payload_shape() {
    let body = serde_json::to_value(DeleteRequest { entity: Entity::Production, id: "PR9" }).unwrap();
    assert_eq!(body, serde_json::json!({"entity": "production", "id": "PR9"}));
  }

  #[test]
  fn insert_payload_shape() {
    let mut data = BTreeMap::new();
    data.insert("artist_id".to_string(), "A7".to_string());
    let body = serde_json::to_value(InsertRequest { entity: Entity::Artist, data: &data }).unwrap();
    assert_eq!(body, serde_json::json!({"entity": "artist", "data": {"artist_id": "A7"}}));
  }

  // --- ApiReply ---

  #[test]
  fn reply_ok_and_message() {
    assert_eq!(ApiReply::from_value(&serde_json::json!({"ok": true})), ApiReply { ok: true, message: None });
    assert_eq!(
      ApiReply::from_value(&serde_json::json!({"ok": false, "message": "Not found"})),
      ApiReply { ok: false, message: Some("Not found".into()) }
    );
  }

  #[test]
  fn reply_other_shapes_are_failures() {
    assert_eq!(ApiReply::from_value(&serde_json::json!({"error": "x"})), ApiReply::default());
    assert_eq!(ApiReply::from_value(&serde_json::json!([1, 2])), ApiReply::default());
    assert_eq!(ApiReply::from_value(&serde_json::json!({"ok": "yes", "message": ""})), ApiReply::default());
  }
}
