use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::model::{Form, FormRole, SubmitEvent};

const DEFAULT_LOGIN_FORM: &str = "form-login";
const DEFAULT_VIEW_USERS_FORM: &str = "form-viewUsers";
const DEFAULT_NOTIFICATION_REGION: &str = "info";
const DEFAULT_USER_LIST_REGION: &str = "userList";

#[derive(Error, Debug)]
pub enum PageError {
    #[error("Failed to read page definition: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse page definition: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Duplicate form id: {0}")]
    DuplicateForm(String),

    #[error("Unknown form: {0}")]
    UnknownForm(String),
}

/// The forms and regions of a page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    #[serde(default = "default_login_form")]
    pub login_form: String,
    #[serde(default = "default_view_users_form")]
    pub view_users_form: String,
    #[serde(default = "default_notification_region")]
    pub notification_region: String,
    #[serde(default = "default_user_list_region")]
    pub user_list_region: String,
    #[serde(default)]
    pub forms: Vec<Form>,
}

fn default_login_form() -> String {
    DEFAULT_LOGIN_FORM.to_string()
}

fn default_view_users_form() -> String {
    DEFAULT_VIEW_USERS_FORM.to_string()
}

fn default_notification_region() -> String {
    DEFAULT_NOTIFICATION_REGION.to_string()
}

fn default_user_list_region() -> String {
    DEFAULT_USER_LIST_REGION.to_string()
}

impl Default for Page {
    fn default() -> Self {
        Self {
            login_form: default_login_form(),
            view_users_form: default_view_users_form(),
            notification_region: default_notification_region(),
            user_list_region: default_user_list_region(),
            forms: Vec::new(),
        }
    }
}

impl Page {
    /// Load and validate a page definition from a JSON file.
    pub fn load(path: &Path) -> Result<Self, PageError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    pub fn from_json(json: &str) -> Result<Self, PageError> {
        let page: Page = serde_json::from_str(json)?;
        page.validate()?;
        Ok(page)
    }

    fn validate(&self) -> Result<(), PageError> {
        let mut seen = HashSet::new();
        for id in self.forms.iter().filter_map(|f| f.id.as_deref()) {
            if !seen.insert(id) {
                return Err(PageError::DuplicateForm(id.to_string()));
            }
        }
        Ok(())
    }

    pub fn with_form(mut self, form: Form) -> Self {
        self.forms.push(form);
        self
    }

    pub fn form(&self, id: &str) -> Option<&Form> {
        self.forms.iter().find(|f| f.id.as_deref() == Some(id))
    }

    /// Role of a form on this page, decided by its id.
    pub fn role_of(&self, form: &Form) -> FormRole {
        match form.id.as_deref() {
            Some(id) if id == self.login_form => FormRole::Login,
            Some(id) if id == self.view_users_form => FormRole::ViewUsers,
            _ => FormRole::Generic,
        }
    }

    /// Build a submit event for the form with the given id, applying field
    /// overrides on top of the declared values.
    pub fn submit_event(
        &self,
        id: &str,
        overrides: &[(String, String)],
    ) -> Result<SubmitEvent, PageError> {
        let mut form = self
            .form(id)
            .cloned()
            .ok_or_else(|| PageError::UnknownForm(id.to_string()))?;
        for (name, value) in overrides {
            form.set_field(name, value);
        }
        let role = self.role_of(&form);
        Ok(SubmitEvent::new(form, role))
    }
}

// ============================================================================
// Tests
// ============================================================================
