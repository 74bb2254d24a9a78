use serde::{Deserialize, Serialize};

use crate::auth::repo_types::UserSummary;
use crate::error::AppError;

/// Request body for user registration. Fields are optional so that a missing
/// one is reported with our own message instead of a deserializer error.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Registration input that passed boundary validation.
#[derive(Debug)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl RegisterRequest {
    pub fn validate(self) -> Result<Registration, AppError> {
        let (Some(name), Some(email), Some(password)) = (self.name, self.email, self.password)
        else {
            return Err(AppError::validation("Nome, email e senha são obrigatórios"));
        };

        let name = name.trim().to_owned();
        let email = normalize_email(&email);

        if name.chars().count() < 2 {
            return Err(AppError::validation("Nome deve ter pelo menos 2 caracteres"));
        }
        if password.chars().count() < 6 {
            return Err(AppError::validation("Senha deve ter pelo menos 6 caracteres"));
        }
        if !is_valid_email(&email) {
            return Err(AppError::validation("Email inválido"));
        }

        Ok(Registration {
            name,
            email,
            password,
        })
    }
}

impl LoginRequest {
    /// Returns `(email, password)`.
    pub fn validate(self) -> Result<(String, String), AppError> {
        match (self.email, self.password) {
            (Some(email), Some(password)) => Ok((normalize_email(&email), password)),
            _ => Err(AppError::validation("Email e senha são obrigatórios")),
        }
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    email.contains('@') && email.contains('.')
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub success: bool,
    pub message: &'static str,
    pub user_id: i64,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: &'static str,
    pub user: UserSummary,
    pub session_token: String,
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub success: bool,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub success: bool,
    pub user: UserSummary,
}
