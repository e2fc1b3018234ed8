use api_types::profile::Profile;
use engine::{
    form::FieldErrors,
    profile::{MOBILE_DIGITS, ProfileDraft, ProfileField},
};

use crate::{client::ClientError, ui::keymap::AppAction};

use super::{App, AppEvent};

#[derive(Debug)]
pub enum ProfileEvent {
    Loaded(Result<Profile, ClientError>),
    Saved(Result<(), ClientError>),
}

/// Settings screen: the profile form.
#[derive(Debug, Default)]
pub struct ProfileState {
    /// Last values loaded from or saved to the server.
    pub original: Option<ProfileDraft>,
    pub draft: ProfileDraft,
    pub focus: ProfileField,
    pub errors: FieldErrors,
    pub loading: bool,
    pub saving: bool,
}

impl ProfileState {
    pub fn is_dirty(&self) -> bool {
        self.original
            .as_ref()
            .is_some_and(|original| self.draft.is_dirty(original))
    }

    fn move_focus(&mut self) {
        self.focus = match self.focus {
            ProfileField::Mobile => ProfileField::Email,
            ProfileField::Email => ProfileField::Mobile,
        };
    }

    fn edit_focused(&mut self, edit: impl FnOnce(&mut String)) {
        let mut value = self.draft.field(self.focus).to_string();
        edit(&mut value);
        if self.focus == ProfileField::Mobile {
            value.retain(|ch| ch.is_ascii_digit());
            value.truncate(MOBILE_DIGITS);
        }
        self.draft.set_field(self.focus, &value);

        let key = self.focus.key();
        if self.errors.get(key).is_some() {
            match self.draft.check_field(self.focus) {
                Some(message) => self.errors.insert(key, message),
                None => self.errors.remove(key),
            }
        }
    }
}

impl App {
    /// Loads the profile the first time the settings screen opens.
    pub(super) fn load_profile_once(&mut self) {
        let profile = &mut self.state.profile;
        if profile.original.is_some() || profile.loading {
            return;
        }
        profile.loading = true;
        let client = self.client.clone();
        self.spawn(async move { AppEvent::Profile(ProfileEvent::Loaded(client.profile().await)) });
    }

    pub(super) fn profile_key(&mut self, action: AppAction) {
        let profile = &mut self.state.profile;
        if profile.loading || profile.saving {
            return;
        }
        match action {
            AppAction::NextField | AppAction::PrevField | AppAction::Up | AppAction::Down => {
                profile.move_focus();
            }
            AppAction::Input(ch) => profile.edit_focused(|value| value.push(ch)),
            AppAction::Backspace => profile.edit_focused(|value| {
                value.pop();
            }),
            AppAction::Submit | AppAction::Save => self.submit_profile(),
            _ => {}
        }
    }

    fn submit_profile(&mut self) {
        let profile = &mut self.state.profile;
        if profile.original.is_none() {
            return;
        }
        if !profile.is_dirty() {
            self.state.info("No changes to save");
            return;
        }
        match profile.draft.validate() {
            Err(errors) => {
                if let Some(field) = ProfileField::ALL
                    .into_iter()
                    .find(|field| errors.first().is_some_and(|e| e.field == field.key()))
                {
                    profile.focus = field;
                }
                profile.errors = errors;
                self.state.error("Please fix the errors in the form");
            }
            Ok(body) => {
                profile.errors = FieldErrors::new();
                profile.saving = true;
                let client = self.client.clone();
                self.spawn(async move {
                    AppEvent::Profile(ProfileEvent::Saved(client.update_profile(&body).await))
                });
            }
        }
    }

    pub(super) fn on_profile_event(&mut self, event: ProfileEvent) {
        let profile = &mut self.state.profile;
        match event {
            ProfileEvent::Loaded(result) => {
                profile.loading = false;
                match result {
                    Ok(data) => {
                        let draft = ProfileDraft::from_profile(&data);
                        profile.draft = draft.clone();
                        profile.original = Some(draft);
                    }
                    Err(err) => {
                        tracing::warn!("failed to load profile: {err}");
                        self.state.error("Failed to load profile data");
                    }
                }
            }
            ProfileEvent::Saved(result) => {
                profile.saving = false;
                match result {
                    Ok(()) => {
                        profile.original = Some(profile.draft.clone());
                        self.state.success("Profile updated successfully");
                    }
                    Err(err) => {
                        if let Some(errors) = err.field_errors() {
                            profile.errors.replace_with_server(errors);
                        }
                        self.state
                            .error(err.user_message("Failed to update profile"));
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        app::{Section, ToastLevel},
        config::AppConfig,
    };

    fn loaded() -> ProfileState {
        let draft = ProfileDraft {
            name: "Asha".to_string(),
            mobile: "9876543210".to_string(),
            email: "asha@example.com".to_string(),
        };
        ProfileState {
            original: Some(draft.clone()),
            draft,
            ..ProfileState::default()
        }
    }

    #[test]
    fn mobile_accepts_only_ten_digits() {
        let mut state = loaded();
        state.draft.mobile.clear();
        for ch in "98a7654321099".chars() {
            state.edit_focused(|value| value.push(ch));
        }
        assert_eq!(state.draft.mobile, "9876543210");
    }

    #[test]
    fn untouched_profile_is_clean() {
        let mut state = loaded();
        assert!(!state.is_dirty());
        state.focus = ProfileField::Email;
        state.edit_focused(|value| value.push('m'));
        assert!(state.is_dirty());
    }

    #[test]
    fn fixed_error_clears_while_typing() {
        let mut state = loaded();
        state.focus = ProfileField::Email;
        state.draft.email = "asha@".to_string();
        state.errors.insert("email", "Please enter a valid email address");
        for ch in "example.com".chars() {
            state.edit_focused(|value| value.push(ch));
        }
        assert_eq!(state.errors.get("email"), None);
    }

    #[test]
    fn invalid_submit_focuses_field_and_raises_toast() {
        let config = AppConfig {
            state_path: std::env::temp_dir()
                .join(format!("quotedesk_profile_{}", std::process::id()))
                .join("state.json")
                .to_string_lossy()
                .into_owned(),
            ..AppConfig::default()
        };
        let mut app = App::new(config).unwrap();
        app.state.section = Section::Settings;
        app.state.profile = loaded();
        app.state.profile.focus = ProfileField::Email;
        app.state.profile.draft.mobile = "98765".to_string();

        app.profile_key(AppAction::Save);

        let profile = &app.state.profile;
        assert!(!profile.saving);
        assert_eq!(profile.focus, ProfileField::Mobile);
        assert_eq!(
            profile.errors.get("mobile"),
            Some("Please enter a valid 10-digit mobile number")
        );
        let toast = app.state.toast.as_ref().unwrap();
        assert_eq!(toast.level, ToastLevel::Error);
        assert_eq!(toast.message, "Please fix the errors in the form");
    }
}
