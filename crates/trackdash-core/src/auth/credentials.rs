// ── Credential policy ──

use secrecy::{ExposeSecret, SecretString};

/// Decides whether a username/password pair may log in.
pub trait CredentialPolicy: Send + Sync {
    fn verify(&self, username: &str, password: &SecretString) -> bool;
}

/// Fixed allow-list of username/password pairs.
///
/// The default list holds the dashboard's single operator account.
#[derive(Debug, Clone)]
pub struct StaticCredentials {
    users: Vec<(String, SecretString)>,
}

impl StaticCredentials {
    pub const DEFAULT_USERNAME: &'static str = "tw@placentek.com";
    const DEFAULT_PASSWORD: &'static str = "tw@placentek";

    pub fn new(users: impl IntoIterator<Item = (String, SecretString)>) -> Self {
        Self {
            users: users.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl Default for StaticCredentials {
    fn default() -> Self {
        Self::new([(
            Self::DEFAULT_USERNAME.to_owned(),
            SecretString::from(Self::DEFAULT_PASSWORD),
        )])
    }
}

impl CredentialPolicy for StaticCredentials {
    fn verify(&self, username: &str, password: &SecretString) -> bool {
        self.users
            .iter()
            .any(|(u, p)| u == username && p.expose_secret() == password.expose_secret())
    }
}
