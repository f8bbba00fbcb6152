use std::fmt;

use thiserror::Error;

/// Audience the page copy is written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AudienceMode {
    #[default]
    Reseller,
    Collector,
}

impl AudienceMode {
    pub fn pitch(self) -> &'static str {
        match self {
            AudienceMode::Reseller => "Subscribe and receive a free e-book packed with everything you need to know about finding profitable items to flip.",
            AudienceMode::Collector => "Subscribe and receive a free guide on how to build and maintain your collection, including tips on authentication and preservation.",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionField {
    FirstName,
    LastName,
    Email,
}

impl fmt::Display for SubscriptionField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SubscriptionField::FirstName => "first name",
            SubscriptionField::LastName => "last name",
            SubscriptionField::Email => "email",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubscriptionError {
    #[error("{0} is required")]
    Missing(SubscriptionField),
    #[error("email address is not valid")]
    InvalidEmail,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SubscriptionForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// A validated, trimmed subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscriber {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl SubscriptionForm {
    pub fn set(&mut self, field: SubscriptionField, value: String) {
        match field {
            SubscriptionField::FirstName => self.first_name = value,
            SubscriptionField::LastName => self.last_name = value,
            SubscriptionField::Email => self.email = value,
        }
    }

    pub fn validate(&self) -> Result<Subscriber, SubscriptionError> {
        let first_name = required(&self.first_name, SubscriptionField::FirstName)?;
        let last_name = required(&self.last_name, SubscriptionField::LastName)?;
        let email = required(&self.email, SubscriptionField::Email)?;
        if !looks_like_email(&email) {
            return Err(SubscriptionError::InvalidEmail);
        }
        Ok(Subscriber {
            first_name,
            last_name,
            email,
        })
    }
}

fn required(value: &str, field: SubscriptionField) -> Result<String, SubscriptionError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(SubscriptionError::Missing(field))
    } else {
        Ok(trimmed.to_string())
    }
}

fn looks_like_email(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !value.chars().any(char::is_whitespace)
        }
        None => false,
    }
}
