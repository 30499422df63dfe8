// src/flash.rs

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use serde::{Deserialize, Serialize};

pub const FLASH_COOKIE: &str = "flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashKind {
    Success,
    Error,
}

impl FlashKind {
    /// Bootstrap alert class.
    pub fn alert_class(&self) -> &'static str {
        match self {
            FlashKind::Success => "alert-success",
            FlashKind::Error => "alert-danger",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

fn decode(value: &str) -> Vec<Flash> {
    URL_SAFE_NO_PAD
        .decode(value)
        .ok()
        .and_then(|bytes| serde_json::from_slice(&bytes).ok())
        .unwrap_or_default()
}

fn encode(flashes: &[Flash]) -> String {
    let json = serde_json::to_vec(flashes).unwrap_or_default();
    URL_SAFE_NO_PAD.encode(json)
}

/// Queues a message for the next full page render.
pub fn push(jar: CookieJar, kind: FlashKind, message: impl Into<String>) -> CookieJar {
    let mut flashes = jar
        .get(FLASH_COOKIE)
        .map(|c| decode(c.value()))
        .unwrap_or_default();
    flashes.push(Flash {
        kind,
        message: message.into(),
    });

    let cookie = Cookie::build((FLASH_COOKIE, encode(&flashes)))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();
    jar.add(cookie)
}

/// Drains queued messages and clears the cookie.
pub fn take(jar: CookieJar) -> (CookieJar, Vec<Flash>) {
    match jar.get(FLASH_COOKIE).map(|c| decode(c.value())) {
        Some(flashes) => (jar.remove(Cookie::build(FLASH_COOKIE).path("/")), flashes),
        None => (jar, Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pushed_messages_are_taken_once() {
        let jar = push(CookieJar::new(), FlashKind::Success, "Microsite created successfully!");
        let jar = push(jar, FlashKind::Error, "Something else");

        let (jar, flashes) = take(jar);
        assert_eq!(flashes.len(), 2);
        assert_eq!(flashes[0].kind, FlashKind::Success);
        assert_eq!(flashes[1].message, "Something else");

        let (_, again) = take(jar);
        assert!(again.is_empty());
    }

    #[test]
    fn garbage_cookie_yields_nothing() {
        let jar = CookieJar::new().add(Cookie::new(FLASH_COOKIE, "%%%"));
        let (_, flashes) = take(jar);
        assert!(flashes.is_empty());
    }
}
