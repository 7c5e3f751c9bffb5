use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Client-side form errors. Each message is shown to the user as-is.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationError {
    #[error("Please fill in all fields")]
    MissingFields,

    #[error("Name must be at least 2 characters")]
    NameTooShort,

    #[error("Please enter a valid email address")]
    InvalidEmail,

    #[error("Password must be at least 6 characters")]
    PasswordTooShort,

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Please select a stream to continue")]
    NoStreamSelected,
}

const MIN_NAME_CHARS: usize = 2;
const MIN_PASSWORD_CHARS: usize = 6;

//
// ─── REGISTRATION ──────────────────────────────────────────────────────────────
//

/// Raw registration form input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationDraft {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Registration input that passed local validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidRegistration {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl RegistrationDraft {
    /// Validate the form before anything is sent to the server.
    ///
    /// # Errors
    ///
    /// Returns the first failing rule: missing fields, short name, email
    /// without `@`, short password, then password/confirm mismatch.
    pub fn validate(&self) -> Result<ValidRegistration, ValidationError> {
        let name = self.name.trim();
        let email = self.email.trim();
        if name.is_empty()
            || email.is_empty()
            || self.password.is_empty()
            || self.confirm_password.is_empty()
        {
            return Err(ValidationError::MissingFields);
        }
        if name.chars().count() < MIN_NAME_CHARS {
            return Err(ValidationError::NameTooShort);
        }
        if !email.contains('@') {
            return Err(ValidationError::InvalidEmail);
        }
        if self.password.chars().count() < MIN_PASSWORD_CHARS {
            return Err(ValidationError::PasswordTooShort);
        }
        if self.password != self.confirm_password {
            return Err(ValidationError::PasswordMismatch);
        }
        Ok(ValidRegistration {
            name: name.to_owned(),
            email: email.to_owned(),
            password: self.password.clone(),
        })
    }
}

//
// ─── LOGIN ─────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginDraft {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidLogin {
    pub email: String,
    pub password: String,
}

impl LoginDraft {
    /// # Errors
    ///
    /// Returns `MissingFields` if either field is blank and `InvalidEmail`
    /// if the email lacks `@`.
    pub fn validate(&self) -> Result<ValidLogin, ValidationError> {
        let email = self.email.trim();
        if email.is_empty() || self.password.is_empty() {
            return Err(ValidationError::MissingFields);
        }
        if !email.contains('@') {
            return Err(ValidationError::InvalidEmail);
        }
        Ok(ValidLogin {
            email: email.to_owned(),
            password: self.password.clone(),
        })
    }
}
