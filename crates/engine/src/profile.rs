//! Profile form: contact details of the signed-in user.

use api_types::profile::{Profile, ProfileUpdate};
use validator::ValidateEmail;

use crate::form::FieldErrors;

pub const MOBILE_DIGITS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProfileField {
    #[default]
    Mobile,
    Email,
}

impl ProfileField {
    pub const ALL: [ProfileField; 2] = [Self::Mobile, Self::Email];

    pub fn key(self) -> &'static str {
        match self {
            Self::Mobile => "mobile",
            Self::Email => "email",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Mobile => "Mobile",
            Self::Email => "Email",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileDraft {
    /// Display only; the name is not editable.
    pub name: String,
    pub mobile: String,
    pub email: String,
}

impl ProfileDraft {
    pub fn from_profile(profile: &Profile) -> Self {
        Self {
            name: profile.name.clone(),
            mobile: profile.mobile.clone(),
            email: profile.email.clone(),
        }
    }

    pub fn field(&self, field: ProfileField) -> &str {
        match field {
            ProfileField::Mobile => &self.mobile,
            ProfileField::Email => &self.email,
        }
    }

    pub fn set_field(&mut self, field: ProfileField, value: &str) {
        match field {
            ProfileField::Mobile => self.mobile = value.to_string(),
            ProfileField::Email => self.email = value.to_string(),
        }
    }

    pub fn check_field(&self, field: ProfileField) -> Option<&'static str> {
        match field {
            ProfileField::Mobile => check_mobile(&self.mobile),
            ProfileField::Email => check_email(&self.email),
        }
    }

    pub fn validate(&self) -> Result<ProfileUpdate, FieldErrors> {
        let mut errors = FieldErrors::new();
        for field in ProfileField::ALL {
            if let Some(message) = self.check_field(field) {
                errors.insert(field.key(), message);
            }
        }
        errors.into_result(|| ProfileUpdate {
            mobile: self.mobile.trim().to_string(),
            email: self.email.trim().to_string(),
        })
    }

    /// Whether the editable fields differ from `original`.
    pub fn is_dirty(&self, original: &ProfileDraft) -> bool {
        self.mobile != original.mobile || self.email != original.email
    }
}

fn check_mobile(value: &str) -> Option<&'static str> {
    let value = value.trim();
    if value.is_empty() {
        Some("Mobile number is required")
    } else if value.len() != MOBILE_DIGITS || !value.bytes().all(|b| b.is_ascii_digit()) {
        Some("Please enter a valid 10-digit mobile number")
    } else {
        None
    }
}

fn check_email(value: &str) -> Option<&'static str> {
    let value = value.trim().to_string();
    if value.is_empty() {
        Some("Email is required")
    } else if !value.validate_email() {
        Some("Please enter a valid email address")
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(mobile: &str, email: &str) -> ProfileDraft {
        ProfileDraft {
            name: "Asha".to_string(),
            mobile: mobile.to_string(),
            email: email.to_string(),
        }
    }

    #[test]
    fn valid_profile_builds_update() {
        let update = draft(" 9876543210 ", "asha@example.com").validate().unwrap();
        assert_eq!(update.mobile, "9876543210");
        assert_eq!(update.email, "asha@example.com");
    }

    #[test]
    fn mobile_must_have_ten_digits() {
        for mobile in ["98765", "98765432101", "98765-4321", "abcdefghij"] {
            let errors = draft(mobile, "asha@example.com").validate().unwrap_err();
            assert_eq!(
                errors.get("mobile"),
                Some("Please enter a valid 10-digit mobile number"),
                "{mobile}"
            );
        }
        let errors = draft("", "asha@example.com").validate().unwrap_err();
        assert_eq!(errors.get("mobile"), Some("Mobile number is required"));
    }

    #[test]
    fn email_is_checked() {
        let errors = draft("9876543210", " ").validate().unwrap_err();
        assert_eq!(errors.get("email"), Some("Email is required"));

        let errors = draft("9876543210", "asha@").validate().unwrap_err();
        assert_eq!(errors.get("email"), Some("Please enter a valid email address"));
    }

    #[test]
    fn dirty_ignores_name() {
        let original = draft("9876543210", "asha@example.com");
        let mut edited = original.clone();
        edited.name = "Someone".to_string();
        assert!(!edited.is_dirty(&original));
        edited.set_field(ProfileField::Email, "asha@example.org");
        assert!(edited.is_dirty(&original));
    }
}
