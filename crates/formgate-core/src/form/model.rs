use serde::{Deserialize, Serialize};
use url::form_urlencoded;

/// HTTP verb taken from a form's `method` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormMethod {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
}

impl FormMethod {
    /// Parse a `method` attribute. Matching is case-insensitive; missing or
    /// unknown values fall back to GET the way browsers do.
    pub fn from_attr(attr: Option<&str>) -> Self {
        match attr.map(|s| s.trim().to_ascii_uppercase()).as_deref() {
            Some("POST") => FormMethod::Post,
            Some("PUT") => FormMethod::Put,
            Some("PATCH") => FormMethod::Patch,
            Some("DELETE") => FormMethod::Delete,
            Some("HEAD") => FormMethod::Head,
            _ => FormMethod::Get,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FormMethod::Get => "GET",
            FormMethod::Post => "POST",
            FormMethod::Put => "PUT",
            FormMethod::Patch => "PATCH",
            FormMethod::Delete => "DELETE",
            FormMethod::Head => "HEAD",
        }
    }

    /// Whether the serialized fields travel in the query string instead of the body.
    pub fn uses_query(&self) -> bool {
        matches!(self, FormMethod::Get | FormMethod::Head)
    }
}

impl std::fmt::Display for FormMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single named input value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    #[serde(default)]
    pub value: String,
}

impl Field {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A form as declared on the page. `method` is kept as the raw attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Form {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub fields: Vec<Field>,
}

impl Form {
    pub fn new(method: &str, action: impl Into<String>) -> Self {
        Self {
            id: None,
            method: Some(method.to_string()),
            action: action.into(),
            fields: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push(Field::new(name, value));
        self
    }

    pub fn method(&self) -> FormMethod {
        FormMethod::from_attr(self.method.as_deref())
    }

    /// Set a field value, replacing the first field with the same name or
    /// appending a new one.
    pub fn set_field(&mut self, name: &str, value: &str) {
        match self.fields.iter_mut().find(|f| f.name == name) {
            Some(field) => field.value = value.to_string(),
            None => self.fields.push(Field::new(name, value)),
        }
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f.name == name)
    }

    /// Fields serialized as `application/x-www-form-urlencoded`, in declaration order.
    pub fn encoded_fields(&self) -> String {
        encode_fields(&self.fields)
    }
}

/// Serialize fields as `application/x-www-form-urlencoded`.
pub fn encode_fields(fields: &[Field]) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for field in fields {
        serializer.append_pair(&field.name, &field.value);
    }
    serializer.finish()
}

/// Which submit behavior a form gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormRole {
    /// Authorized request, fixed success banner.
    Generic,
    /// Unauthorized request; the response body becomes the stored credential.
    Login,
    /// Authorized request; the response body is rendered into the user list.
    ViewUsers,
}

impl FormRole {
    pub fn sends_credential(&self) -> bool {
        !matches!(self, FormRole::Login)
    }

    pub fn label(&self) -> &'static str {
        match self {
            FormRole::Generic => "generic",
            FormRole::Login => "login",
            FormRole::ViewUsers => "view-users",
        }
    }
}

/// A submission about to be handled. Handlers always call `prevent_default`
/// so the submission never turns into a navigation.
#[derive(Debug, Clone)]
pub struct SubmitEvent {
    pub form: Form,
    pub role: FormRole,
    default_prevented: bool,
}

impl SubmitEvent {
    pub fn new(form: Form, role: FormRole) -> Self {
        Self {
            form,
            role,
            default_prevented: false,
        }
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

// ============================================================================
// Tests
// ============================================================================
