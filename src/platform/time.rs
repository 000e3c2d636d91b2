//! Wall-clock helpers

/// Today's date for a high score entry
#[cfg(target_arch = "wasm32")]
pub fn today_string() -> String {
    let date = js_sys::Date::new_0();
    format!(
        "{}/{}/{}",
        date.get_month() + 1,
        date.get_date(),
        date.get_full_year()
    )
}

#[cfg(not(target_arch = "wasm32"))]
pub fn today_string() -> String {
    chrono::Local::now().format("%-m/%-d/%Y").to_string()
}

/// Milliseconds since the epoch, used to seed runs
#[cfg(target_arch = "wasm32")]
pub fn now_millis() -> u64 {
    js_sys::Date::now() as u64
}

#[cfg(not(target_arch = "wasm32"))]
pub fn now_millis() -> u64 {
    chrono::Utc::now().timestamp_millis().max(0) as u64
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    #[test]
    fn test_today_string_shape() {
        let today = today_string();
        let parts: Vec<&str> = today.split('/').collect();
        assert_eq!(parts.len(), 3);
        assert!(parts.iter().all(|p| p.parse::<u32>().is_ok()));
    }
}
