use url::Url;

use crate::form::{Form, FormMethod};

/// Content type for serialized form fields
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=UTF-8";

/// A request ready to hand to a `Transport`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedRequest {
    pub method: FormMethod,
    pub url: Url,
    /// Value of the `Authorization` header; `None` means no header at all.
    pub authorization: Option<String>,
    /// Urlencoded fields for non-query methods.
    pub body: Option<String>,
}

impl PreparedRequest {
    /// Build a request from a form. A relative `action` is resolved against `base`.
    pub fn from_form(
        form: &Form,
        base: Option<&Url>,
        authorization: Option<String>,
    ) -> Result<Self, url::ParseError> {
        let method = form.method();
        let mut url = resolve_action(&form.action, base)?;
        let encoded = form.encoded_fields();

        let body = if method.uses_query() {
            if !encoded.is_empty() {
                let query = match url.query() {
                    Some(existing) if !existing.is_empty() => format!("{}&{}", existing, encoded),
                    _ => encoded,
                };
                url.set_query(Some(&query));
            }
            None
        } else {
            Some(encoded)
        };

        Ok(Self {
            method,
            url,
            authorization,
            body,
        })
    }
}

/// Resolve a form action to an absolute URL.
pub fn resolve_action(action: &str, base: Option<&Url>) -> Result<Url, url::ParseError> {
    match Url::parse(action) {
        Ok(url) => Ok(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => match base {
            Some(base) => base.join(action),
            None => Err(url::ParseError::RelativeUrlWithoutBase),
        },
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://admin.example.com/panel/").unwrap()
    }

    #[test]
    fn test_post_fields_go_in_body() {
        let form = Form::new("post", "/users/add")
            .with_field("username", "bob")
            .with_field("password", "pw");
        let request = PreparedRequest::from_form(&form, Some(&base()), None).unwrap();
        assert_eq!(request.method, FormMethod::Post);
        assert_eq!(request.url.as_str(), "https://admin.example.com/users/add");
        assert_eq!(request.body.as_deref(), Some("username=bob&password=pw"));
        assert_eq!(request.authorization, None);
    }

    #[test]
    fn test_get_fields_go_in_query() {
        let form = Form::new("get", "https://api.example.com/users").with_field("q", "a b");
        let request = PreparedRequest::from_form(&form, None, Some("tok".into())).unwrap();
        assert_eq!(request.url.as_str(), "https://api.example.com/users?q=a+b");
        assert_eq!(request.body, None);
        assert_eq!(request.authorization.as_deref(), Some("tok"));
    }

    #[test]
    fn test_get_appends_to_existing_query() {
        let form = Form::new("get", "/users?page=2").with_field("q", "x");
        let request = PreparedRequest::from_form(&form, Some(&base()), None).unwrap();
        assert_eq!(
            request.url.as_str(),
            "https://admin.example.com/users?page=2&q=x"
        );
    }

    #[test]
    fn test_get_without_fields_leaves_url_alone() {
        let form = Form::new("get", "/users");
        let request = PreparedRequest::from_form(&form, Some(&base()), None).unwrap();
        assert_eq!(request.url.as_str(), "https://admin.example.com/users");
    }

    #[test]
    fn test_relative_action_resolves_against_base_path() {
        let form = Form::new("post", "groups/add");
        let request = PreparedRequest::from_form(&form, Some(&base()), None).unwrap();
        assert_eq!(
            request.url.as_str(),
            "https://admin.example.com/panel/groups/add"
        );
    }

    #[test]
    fn test_empty_action_targets_base() {
        let form = Form::new("post", "");
        let request = PreparedRequest::from_form(&form, Some(&base()), None).unwrap();
        assert_eq!(request.url, base());
    }

    #[test]
    fn test_relative_action_without_base_fails() {
        let form = Form::new("post", "/login");
        assert_eq!(
            PreparedRequest::from_form(&form, None, None).unwrap_err(),
            url::ParseError::RelativeUrlWithoutBase
        );
    }

    #[test]
    fn test_post_without_fields_sends_empty_body() {
        let form = Form::new("post", "/logout");
        let request = PreparedRequest::from_form(&form, Some(&base()), None).unwrap();
        assert_eq!(request.body.as_deref(), Some(""));
    }
}
