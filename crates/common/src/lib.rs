//! Shared plumbing for the places workspace: logging setup, runtime
//! directory checks and the small response types used by every HTTP surface.

pub mod types;
pub mod utils;
pub mod env;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_type_ok() {
        let h = types::Health { status: "ok" };
        assert_eq!(h.status, "ok");
    }

    #[test]
    fn message_serializes_with_message_key() {
        let m = types::Message::new("Deleted place.");
        let v = serde_json::to_value(&m).unwrap();
        assert_eq!(v, serde_json::json!({"message": "Deleted place."}));
    }
}
