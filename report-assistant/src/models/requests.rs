// Request models
//
// Credentials handed to the session provider, and the login form that produces them.

use crate::utils::validation::{require_text, FieldErrors};
use serde::{Deserialize, Serialize};

pub const FIELD_SERVER: &str = "server";
pub const FIELD_DATABASE: &str = "database";
pub const FIELD_USERNAME: &str = "username";
pub const FIELD_PASSWORD: &str = "password";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    #[default]
    Sql,
    Windows,
}

impl AuthMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthMode::Sql => "SQL Server",
            AuthMode::Windows => "Windows",
        }
    }

    pub fn toggle(&self) -> Self {
        match self {
            AuthMode::Sql => AuthMode::Windows,
            AuthMode::Windows => AuthMode::Sql,
        }
    }
}

/// One variant per login mode; each carries exactly the fields its mode requires.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum Credentials {
    Sql {
        server: String,
        database: String,
        username: String,
        password: String,
    },
    Windows {
        /// `DOMAIN\user`
        username: String,
    },
}

// Manual Debug so a stray `{:?}` never prints the password.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credentials::Sql {
                server,
                database,
                username,
                ..
            } => f
                .debug_struct("Sql")
                .field("server", server)
                .field("database", database)
                .field("username", username)
                .field("password", &"***")
                .finish(),
            Credentials::Windows { username } => f
                .debug_struct("Windows")
                .field("username", username)
                .finish(),
        }
    }
}

impl Credentials {
    pub fn mode(&self) -> AuthMode {
        match self {
            Credentials::Sql { .. } => AuthMode::Sql,
            Credentials::Windows { .. } => AuthMode::Windows,
        }
    }

    pub fn username(&self) -> &str {
        match self {
            Credentials::Sql { username, .. } | Credentials::Windows { username } => username,
        }
    }

    /// Connection string a SQL Server login would open. Contains the password; mask
    /// before logging.
    pub fn connection_string(&self) -> String {
        match self {
            Credentials::Sql {
                server,
                database,
                username,
                password,
            } => format!(
                "Server={};Database={};User Id={};Password={};",
                server, database, username, password
            ),
            Credentials::Windows { username } => {
                format!("Integrated Security=true;User Id={};", username)
            }
        }
    }

    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        match self {
            Credentials::Sql {
                server,
                database,
                username,
                password,
            } => {
                require_text(&mut errors, FIELD_SERVER, server, "Server is required");
                require_text(&mut errors, FIELD_DATABASE, database, "Database is required");
                require_text(&mut errors, FIELD_USERNAME, username, "Username is required");
                // passwords are taken verbatim; only emptiness is checked
                if password.is_empty() {
                    errors.add(FIELD_PASSWORD, "Password is required");
                }
            }
            Credentials::Windows { username } => {
                require_text(
                    &mut errors,
                    FIELD_USERNAME,
                    username,
                    "Username is required (domain\\user)",
                );
            }
        }
        errors.into_result(())
    }
}

/// Login screen state. Switching modes starts from a blank form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    mode: AuthMode,
    pub server: String,
    pub database: String,
    pub username: String,
    pub password: String,
    pub show_password: bool,
}

impl LoginForm {
    pub fn mode(&self) -> AuthMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: AuthMode) {
        if mode != self.mode {
            *self = Self {
                mode,
                ..Self::default()
            };
        }
    }

    /// Text shown in the password field.
    pub fn password_display(&self) -> String {
        if self.show_password {
            self.password.clone()
        } else {
            "•".repeat(self.password.chars().count())
        }
    }

    pub fn credentials(&self) -> Credentials {
        match self.mode {
            AuthMode::Sql => Credentials::Sql {
                server: self.server.trim().to_string(),
                database: self.database.trim().to_string(),
                username: self.username.trim().to_string(),
                password: self.password.clone(),
            },
            AuthMode::Windows => Credentials::Windows {
                username: self.username.trim().to_string(),
            },
        }
    }

    /// Validated credentials for the active mode.
    pub fn submit(&self) -> Result<Credentials, FieldErrors> {
        let credentials = self.credentials();
        credentials.validate()?;
        Ok(credentials)
    }
}
