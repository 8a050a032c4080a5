//! Nonna's post-game commentary
//!
//! A thin client for a text-generation service, invoked once per game-over.
//! Prompt construction and response parsing are plain functions so they can
//! be tested off the browser; only the transport is wasm-specific. Every
//! failure mode maps to a deterministic fallback string - nothing past this
//! boundary ever errors or panics.

use serde_json::{Value, json};

/// End-of-run snapshot sent to the service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommentaryRequest {
    pub score: u64,
    pub wave: u32,
    pub victory: bool,
}

/// Fallback when no API key is configured
pub const MISSING_KEY_FALLBACK: &str =
    "Mamma mia! No API key found. Just imagine I am yelling at you in Italian!";
/// Fallback when the request fails or the response is unusable
pub const SERVICE_FAILURE_FALLBACK: &str = "Eh, the internet... it is broken like your pasta.";
/// Fallback when the service answers with empty text
pub const EMPTY_RESPONSE_FALLBACK: &str = "Mamma mia! I am speechless.";

/// Generation model
const MODEL: &str = "gemini-2.5-flash";
/// LocalStorage key holding the API key (used only in wasm32)
#[allow(dead_code)]
const API_KEY_STORAGE_KEY: &str = "pasta_invaders_api_key";

/// Build the Nonna prompt for a finished run
pub fn build_prompt(req: &CommentaryRequest) -> String {
    let mood = if req.victory {
        "proud but still critical"
    } else {
        "disappointed and dramatic"
    };
    let context = if req.victory {
        format!("The player won wave {} with {} points.", req.wave, req.score)
    } else {
        format!(
            "The player lost at wave {} with only {} points.",
            req.wave, req.score
        )
    };

    format!(
        "You are Nonna, a stereotypical, dramatic, and passionate Italian grandmother.\n\
         {context}\n\
         Give the player a short (max 2 sentences) commentary on their performance in \"Pasta Invaders\".\n\
         Use Italian interjections like \"Mamma mia!\", \"Che disastro!\", \"Bravissimo!\".\n\
         Mood: {mood}.\n\
         If the score is low, roast their cooking skills. If high, say they might earn a meatball."
    )
}

/// JSON body for the generateContent call
pub fn request_body(req: &CommentaryRequest) -> String {
    json!({
        "contents": [{ "parts": [{ "text": build_prompt(req) }] }]
    })
    .to_string()
}

/// Pull the generated text out of a generateContent response. Returns `None`
/// for malformed JSON or empty text.
pub fn extract_text(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let text = value
        .get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .get(0)?
        .get("text")?
        .as_str()?
        .trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

/// Fetch the commentary string for a finished run (WASM).
///
/// Fire-and-forget friendly: always resolves to some displayable string.
#[cfg(target_arch = "wasm32")]
pub async fn fetch_commentary(req: &CommentaryRequest) -> String {
    use wasm_bindgen::{JsCast, JsValue};
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{Request, RequestInit, RequestMode, Response};

    let Some(key) = api_key() else {
        return MISSING_KEY_FALLBACK.to_string();
    };

    let url = format!(
        "https://generativelanguage.googleapis.com/v1beta/models/{MODEL}:generateContent?key={key}"
    );

    let opts = RequestInit::new();
    opts.set_method("POST");
    opts.set_mode(RequestMode::Cors);
    opts.set_body(&JsValue::from_str(&request_body(req)));

    let request = match Request::new_with_str_and_init(&url, &opts) {
        Ok(r) => r,
        Err(e) => {
            log::warn!("commentary request build failed: {e:?}");
            return SERVICE_FAILURE_FALLBACK.to_string();
        }
    };
    let _ = request.headers().set("Content-Type", "application/json");

    let Some(window) = web_sys::window() else {
        return SERVICE_FAILURE_FALLBACK.to_string();
    };

    let response = match JsFuture::from(window.fetch_with_request(&request)).await {
        Ok(v) => v,
        Err(e) => {
            log::warn!("commentary fetch failed: {e:?}");
            return SERVICE_FAILURE_FALLBACK.to_string();
        }
    };
    let response: Response = match response.dyn_into() {
        Ok(r) => r,
        Err(_) => return SERVICE_FAILURE_FALLBACK.to_string(),
    };
    if !response.ok() {
        log::warn!("commentary service returned HTTP {}", response.status());
        return SERVICE_FAILURE_FALLBACK.to_string();
    }

    let body = match response.text().map(JsFuture::from) {
        Ok(fut) => match fut.await {
            Ok(v) => v.as_string().unwrap_or_default(),
            Err(e) => {
                log::warn!("commentary body read failed: {e:?}");
                return SERVICE_FAILURE_FALLBACK.to_string();
            }
        },
        Err(_) => return SERVICE_FAILURE_FALLBACK.to_string(),
    };

    extract_text(&body).unwrap_or_else(|| EMPTY_RESPONSE_FALLBACK.to_string())
}

/// API key from LocalStorage, if configured (WASM only)
#[cfg(target_arch = "wasm32")]
fn api_key() -> Option<String> {
    let storage = web_sys::window().and_then(|w| w.local_storage().ok()).flatten()?;
    let key = storage.get_item(API_KEY_STORAGE_KEY).ok()??;
    if key.is_empty() { None } else { Some(key) }
}

/// Native stub: no transport, behave like a missing credential
#[cfg(not(target_arch = "wasm32"))]
pub async fn fetch_commentary(_req: &CommentaryRequest) -> String {
    MISSING_KEY_FALLBACK.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loss() -> CommentaryRequest {
        CommentaryRequest {
            score: 120,
            wave: 3,
            victory: false,
        }
    }

    #[test]
    fn test_prompt_mentions_run_stats() {
        let prompt = build_prompt(&loss());
        assert!(prompt.contains("lost at wave 3"));
        assert!(prompt.contains("120 points"));
        assert!(prompt.contains("disappointed and dramatic"));
        assert!(prompt.contains("Pasta Invaders"));
    }

    #[test]
    fn test_prompt_mood_flips_on_victory() {
        let prompt = build_prompt(&CommentaryRequest {
            score: 990,
            wave: 5,
            victory: true,
        });
        assert!(prompt.contains("won wave 5"));
        assert!(prompt.contains("proud but still critical"));
    }

    #[test]
    fn test_request_body_is_valid_json() {
        let body = request_body(&loss());
        let value: Value = serde_json::from_str(&body).unwrap();
        let text = value["contents"][0]["parts"][0]["text"].as_str().unwrap();
        assert!(text.contains("Nonna"));
    }

    #[test]
    fn test_extract_text_happy_path() {
        let body = r#"{
            "candidates": [{
                "content": { "parts": [{ "text": " Mamma mia! Bravissimo! " }] }
            }]
        }"#;
        assert_eq!(
            extract_text(body).as_deref(),
            Some("Mamma mia! Bravissimo!")
        );
    }

    #[test]
    fn test_extract_text_rejects_junk() {
        assert_eq!(extract_text("not json"), None);
        assert_eq!(extract_text("{}"), None);
        assert_eq!(
            extract_text(r#"{"candidates":[{"content":{"parts":[{"text":"  "}]}}]}"#),
            None
        );
    }

    #[test]
    fn test_fallbacks_are_distinct() {
        assert_ne!(MISSING_KEY_FALLBACK, SERVICE_FAILURE_FALLBACK);
        assert_ne!(SERVICE_FAILURE_FALLBACK, EMPTY_RESPONSE_FALLBACK);
    }
}
