//! Defaults used when a client record is provisioned from an identity.

use crate::types::DbId;

/// Company recorded for clients created implicitly on a first order.
pub const UNSPECIFIED_COMPANY: &str = "Unspecified";

/// Full name for a client provisioned from a user account.
///
/// Joins first and last name. When both are blank, falls back to the
/// username, and to `"Client <id>"` when that is blank as well.
pub fn client_display_name(
    first_name: &str,
    last_name: &str,
    username: &str,
    user_id: DbId,
) -> String {
    let joined = [first_name.trim(), last_name.trim()]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    if !joined.is_empty() {
        return joined;
    }

    let username = username.trim();
    if !username.is_empty() {
        return username.to_string();
    }

    format!("Client {user_id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_first_and_last_name() {
        assert_eq!(client_display_name("Juan", "Perez", "client1", 3), "Juan Perez");
    }

    #[test]
    fn single_part_has_no_stray_space() {
        assert_eq!(client_display_name("", "Perez", "client1", 3), "Perez");
        assert_eq!(client_display_name("Juan ", "  ", "client1", 3), "Juan");
    }

    #[test]
    fn blank_names_fall_back_to_username() {
        assert_eq!(client_display_name(" ", "", "client1", 3), "client1");
    }

    #[test]
    fn everything_blank_falls_back_to_id() {
        assert_eq!(client_display_name("", "", "", 3), "Client 3");
    }
}
