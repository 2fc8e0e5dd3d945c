//! Login and registration forms.

use showmaster_core::ValidationError;
use showmaster_core::requests::{LoginRequest, RegisterRequest};
use showmaster_core::types::{Gender, ROLE_ADMIN, ROLE_USER};

/// Raw login input.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    /// Login name
    pub username: String,
    /// Password
    pub password: String,
}

impl std::fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginForm")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

impl LoginForm {
    /// Form with both fields filled.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Both fields are required.
    ///
    /// # Errors
    ///
    /// Returns the first missing field.
    pub fn validate(&self) -> Result<LoginRequest, ValidationError> {
        let username = required("username", &self.username)?;
        if self.password.is_empty() {
            return Err(ValidationError::required("password"));
        }
        Ok(LoginRequest {
            username,
            password: self.password.clone(),
        })
    }
}

/// Raw registration input. Every field is a string as typed.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct RegistrationForm {
    /// Name, also the login username
    pub name: String,
    /// Email address
    pub email: String,
    /// Password
    pub password: String,
    /// Age in years
    pub age: String,
    /// Mobile number
    pub mobile_no: String,
    /// Postal address
    pub address: String,
    /// `MALE`, `FEMALE`, or `OTHER`
    pub gender: String,
    /// `ROLE_USER` or `ROLE_ADMIN`; blank for the server default
    pub role: String,
}

impl std::fmt::Debug for RegistrationForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistrationForm")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

impl RegistrationForm {
    /// Name, email and password are required; the rest is optional but must
    /// parse when present.
    ///
    /// # Errors
    ///
    /// Returns the first missing or malformed field.
    pub fn validate(&self) -> Result<RegisterRequest, ValidationError> {
        let name = required("name", &self.name)?;
        let email_id = required("emailId", &self.email)?;
        if self.password.is_empty() {
            return Err(ValidationError::required("password"));
        }

        let age = optional(&self.age)
            .map(|raw| raw.parse::<u32>().map_err(|_| ValidationError::invalid("age", raw)))
            .transpose()?;
        let gender = optional(&self.gender)
            .map(|raw| raw.parse::<Gender>().map_err(|_| ValidationError::invalid("gender", raw)))
            .transpose()?;
        let roles = optional(&self.role)
            .map(|raw| {
                let role = raw.to_ascii_uppercase();
                if role == ROLE_USER || role == ROLE_ADMIN {
                    Ok(role)
                } else {
                    Err(ValidationError::invalid("roles", raw))
                }
            })
            .transpose()?;

        Ok(RegisterRequest {
            name,
            email_id,
            password: self.password.clone(),
            age,
            mobile_no: optional(&self.mobile_no).map(str::to_string),
            address: optional(&self.address).map(str::to_string),
            gender,
            roles,
        })
    }
}

fn required(field: &str, value: &str) -> Result<String, ValidationError> {
    optional(value)
        .map(str::to_string)
        .ok_or_else(|| ValidationError::required(field))
}

fn optional(value: &str) -> Option<&str> {
    let value = value.trim();
    (!value.is_empty()).then_some(value)
}
