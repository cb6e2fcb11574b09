use reqwest::Url;
use tracing::warn;

use crate::constants::constants;

fn embed_url_for(video_id: &str) -> String {
  let c = constants();
  format!("{}{}{}", c.embed_base, video_id, c.autoplay_query)
}

/// Normalise a raw video link into an embeddable URL with autoplay enabled.
///
/// Short links (`youtu.be/<id>`) and watch links (`?v=<id>`) become canonical
/// embed URLs; existing embed URLs get the autoplay parameter appended.
/// Anything else, including links that fail to parse, comes back unchanged.
pub fn to_embed_url(url: &str) -> String {
  if url.is_empty() {
    return String::new();
  }

  if let Some(rest) = url.split("youtu.be/").nth(1) {
    let id = rest.split(['?', '&']).next().unwrap_or_default();
    return embed_url_for(id);
  }

  match Url::parse(url) {
    Ok(parsed) => {
      if let Some((_, v)) = parsed.query_pairs().find(|(k, _)| k == "v")
        && !v.is_empty()
      {
        return embed_url_for(&v);
      }
      if url.contains("/embed/") {
        return format!("{}{}", url, constants().autoplay_query);
      }
    }
    Err(e) => {
      warn!(url = %url, err = %e, "bad YouTube URL");
    }
  }
  url.to_string()
}
