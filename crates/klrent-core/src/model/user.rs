use serde::{Deserialize, Serialize};

/// The logged-in portal user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: u64,
    pub name: String,
    pub email: String,
}

impl UserProfile {
    /// First word of the name, for greetings.
    pub fn first_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or(&self.name)
    }
}

/// A customer record created through sign-up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerRecord {
    pub id: u64,
    pub name: String,
    /// CPF or CNPJ digits.
    pub document: String,
    pub message: Option<String>,
}
