//! Print the public view of a stored user record.

use std::path::Path;

use chrono::{DateTime, Utc};
use merchant_account_core::PublicUser;

use super::load_user;

/// Load the record at `path` and render its public view at `now`.
pub fn render(path: &Path, now: DateTime<Utc>) -> Result<String, Box<dyn std::error::Error>> {
    let user = load_user(path)?;
    let view: PublicUser = user.to_safe_view(now);

    tracing::debug!(
        email = %user.email,
        has_expired = view.has_expired,
        is_active = view.is_active,
        "Rendered public view"
    );

    Ok(serde_json::to_string_pretty(&view)?)
}

/// Print the public view of the record at `path` as pretty JSON.
pub fn inspect(path: &Path, now: DateTime<Utc>) -> Result<(), Box<dyn std::error::Error>> {
    let rendered = render(path, now)?;

    #[allow(clippy::print_stdout)]
    {
        println!("{rendered}");
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;
    use serde_json::Value;

    use super::*;

    fn write_record(name: &str, body: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("ma-cli-{}-{name}.json", std::process::id()));
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_render_drops_credential_and_adds_derived_fields() {
        let path = write_record(
            "render",
            r#"{
                "name": "Ada",
                "email": "ada@example.com",
                "salt": "c2FsdA==",
                "hashed_password": "aGFzaA==",
                "subscriptions": [
                    { "start_date": "2024-01-01T00:00:00Z", "duration": 30, "active": true }
                ]
            }"#,
        );

        let now = Utc.with_ymd_and_hms(2024, 2, 5, 0, 0, 0).unwrap();
        let rendered = render(&path, now).unwrap();
        std::fs::remove_file(&path).unwrap();

        let json: Value = serde_json::from_str(&rendered).unwrap();
        assert!(json.get("salt").is_none());
        assert!(json.get("hashed_password").is_none());
        assert_eq!(json["has_expired"], true);
        assert_eq!(json["is_active"], true);
    }

    #[test]
    fn test_render_missing_file() {
        let path = std::env::temp_dir().join("ma-cli-does-not-exist.json");
        assert!(render(&path, Utc::now()).is_err());
    }
}
