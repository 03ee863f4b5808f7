//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Storage (LocalStorage on web, nothing natively)
//! - Haptics (Navigator.vibrate)
//! - Input key mapping

use crate::sim::GameEvent;

/// Read a LocalStorage value (WASM only)
#[cfg(target_arch = "wasm32")]
pub fn storage_get(key: &str) -> Option<String> {
    let storage = web_sys::window()?.local_storage().ok()??;
    storage.get_item(key).ok()?
}

/// Write a LocalStorage value, returning whether it stuck (WASM only)
#[cfg(target_arch = "wasm32")]
pub fn storage_set(key: &str, value: &str) -> bool {
    let storage = web_sys::window()
        .and_then(|w| w.local_storage().ok())
        .flatten();

    match storage {
        Some(storage) => match storage.set_item(key, value) {
            Ok(()) => true,
            Err(_) => {
                log::warn!("LocalStorage rejected write to {key}");
                false
            }
        },
        None => false,
    }
}

#[cfg(target_arch = "wasm32")]
pub fn storage_remove(key: &str) {
    if let Some(storage) = web_sys::window()
        .and_then(|w| w.local_storage().ok())
        .flatten()
    {
        let _ = storage.remove_item(key);
    }
}

/// Native stubs
#[cfg(not(target_arch = "wasm32"))]
pub fn storage_get(_key: &str) -> Option<String> {
    None
}

#[cfg(not(target_arch = "wasm32"))]
pub fn storage_set(_key: &str, _value: &str) -> bool {
    false
}

#[cfg(not(target_arch = "wasm32"))]
pub fn storage_remove(_key: &str) {
    // No-op for native
}

/// Read and parse a JSON value from storage
pub fn load_json<T: serde::de::DeserializeOwned>(key: &str) -> Option<T> {
    let json = storage_get(key)?;
    match serde_json::from_str(&json) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("Ignoring unreadable {key}: {e}");
            None
        }
    }
}

/// Serialize and store a JSON value
pub fn save_json<T: serde::Serialize>(key: &str, value: &T) -> bool {
    match serde_json::to_string(value) {
        Ok(json) => storage_set(key, &json),
        Err(e) => {
            log::warn!("Failed to serialize {key}: {e}");
            false
        }
    }
}

/// Vibration pattern (milliseconds, on/off alternating) for an event
pub fn vibration_pattern(event: &GameEvent) -> Option<&'static [u32]> {
    match event {
        GameEvent::Shoot => Some(&[50]),
        GameEvent::LevelUp { .. } => Some(&[100, 50, 100]),
        GameEvent::GameOver { .. } => Some(&[200, 100, 200]),
        _ => None,
    }
}

/// Buzz the device for an event, if the player allows it
#[cfg(target_arch = "wasm32")]
pub fn vibrate(event: &GameEvent, enabled: bool) {
    if !enabled {
        return;
    }
    let Some(pattern) = vibration_pattern(event) else {
        return;
    };
    let Some(window) = web_sys::window() else {
        return;
    };
    let array = js_sys::Array::new();
    for ms in pattern {
        array.push(&wasm_bindgen::JsValue::from(*ms));
    }
    // Unsupported on desktop Safari; the result is irrelevant either way
    let _ = window.navigator().vibrate_with_pattern(&array);
}

#[cfg(not(target_arch = "wasm32"))]
pub fn vibrate(_event: &GameEvent, _enabled: bool) {}

/// Keyboard codes that fire a pin
pub fn is_shoot_key(code: &str) -> bool {
    matches!(code, "Space" | "Enter" | "NumpadEnter")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::PowerUpKind;

    #[test]
    fn test_vibration_patterns() {
        assert_eq!(vibration_pattern(&GameEvent::Shoot), Some(&[50u32][..]));
        assert_eq!(
            vibration_pattern(&GameEvent::GameOver { final_score: 10 }),
            Some(&[200u32, 100, 200][..])
        );
        assert_eq!(vibration_pattern(&GameEvent::Hit), None);
        assert_eq!(
            vibration_pattern(&GameEvent::PowerUp(PowerUpKind::Slow)),
            None
        );
    }

    #[test]
    fn test_shoot_keys() {
        assert!(is_shoot_key("Space"));
        assert!(!is_shoot_key("KeyA"));
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_native_storage_is_empty() {
        assert!(!storage_set("k", "v"));
        assert_eq!(load_json::<u32>("k"), None);
    }
}
