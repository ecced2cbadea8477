use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

impl User {
    pub fn new(username: &str, first_name: &str, last_name: &str) -> Self {
        Self {
            username: username.to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
        }
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// `First Last (username)`, or just the username when no name is known.
    pub fn label(&self) -> String {
        let name = self.display_name();
        if name.is_empty() {
            self.username.clone()
        } else {
            format!("{name} ({})", self.username)
        }
    }
}
