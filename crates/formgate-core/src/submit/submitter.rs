use std::sync::Arc;

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use url::Url;

use super::SubmitError;
use crate::auth::CredentialStore;
use crate::form::{Form, FormRole, SubmitEvent};
use crate::http::{PreparedRequest, RawResponse, Transport};
use crate::notify::{Banner, Markup, MarkupRegion, Notifier, RenderPolicy};

const GENERIC_SUCCESS_MESSAGE: &str = "Success doing what you tried to do";
const LOGIN_SUCCESS_MESSAGE: &str = "Successfully authorized!";
const DEFAULT_USER_LIST_REGION: &str = "userList";

/// Fixed success texts. The response body never appears in a success banner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Messages {
    pub generic_success: String,
    pub login_success: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            generic_success: GENERIC_SUCCESS_MESSAGE.to_string(),
            login_success: LOGIN_SUCCESS_MESSAGE.to_string(),
        }
    }
}

/// What a handled submission did to the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A success banner was shown.
    Notified(Banner),
    /// The user list was replaced with new markup.
    Rendered(Markup),
    /// The request failed and an error banner was shown.
    Failed(Banner),
}

impl SubmitOutcome {
    pub fn banner(&self) -> Option<&Banner> {
        match self {
            SubmitOutcome::Notified(banner) | SubmitOutcome::Failed(banner) => Some(banner),
            SubmitOutcome::Rendered(_) => None,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, SubmitOutcome::Failed(_))
    }
}

/// Turns submit events into HTTP requests and reports the result.
///
/// Cheap to share behind an `Arc`; the notifier and user-list region are
/// themselves shared handles, so clones of them observe this submitter's
/// updates.
pub struct FormSubmitter {
    transport: Arc<dyn Transport>,
    credentials: Arc<dyn CredentialStore>,
    notifier: Notifier,
    user_list: MarkupRegion,
    base_url: Option<Url>,
    messages: Messages,
    render_policy: RenderPolicy,
}

impl FormSubmitter {
    pub fn new(transport: Arc<dyn Transport>, credentials: Arc<dyn CredentialStore>) -> Self {
        Self {
            transport,
            credentials,
            notifier: Notifier::default(),
            user_list: MarkupRegion::new(DEFAULT_USER_LIST_REGION),
            base_url: None,
            messages: Messages::default(),
            render_policy: RenderPolicy::default(),
        }
    }

    /// Base URL that relative form actions resolve against.
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = Some(base_url);
        self
    }

    pub fn with_notifier(mut self, notifier: Notifier) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_user_list(mut self, user_list: MarkupRegion) -> Self {
        self.user_list = user_list;
        self
    }

    pub fn with_messages(mut self, messages: Messages) -> Self {
        self.messages = messages;
        self
    }

    pub fn with_render_policy(mut self, policy: RenderPolicy) -> Self {
        self.render_policy = policy;
        self
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn user_list(&self) -> &MarkupRegion {
        &self.user_list
    }

    pub fn credentials(&self) -> &Arc<dyn CredentialStore> {
        &self.credentials
    }

    /// Handle one submission. The default action is always prevented.
    pub async fn handle(&self, event: &mut SubmitEvent) -> SubmitOutcome {
        event.prevent_default();
        match event.role {
            FormRole::Generic => self.submit_generic(&event.form).await,
            FormRole::Login => self.submit_login(&event.form).await,
            FormRole::ViewUsers => self.submit_view_users(&event.form).await,
        }
    }

    /// Handle several submissions concurrently. Their effects land in
    /// whatever order the responses arrive; the returned outcomes follow
    /// the input order.
    pub async fn submit_all(&self, events: &mut [SubmitEvent]) -> Vec<SubmitOutcome> {
        join_all(events.iter_mut().map(|event| self.handle(event))).await
    }

    async fn submit_generic(&self, form: &Form) -> SubmitOutcome {
        match self.send(form, FormRole::Generic).await {
            Ok(_) => SubmitOutcome::Notified(self.notifier.success(&self.messages.generic_success)),
            Err(e) => self.fail(form, e),
        }
    }

    async fn submit_login(&self, form: &Form) -> SubmitOutcome {
        let response = match self.send(form, FormRole::Login).await {
            Ok(response) => response,
            Err(e) => return self.fail(form, e),
        };

        // The whole body is the token, stored as received
        if let Err(e) = self.credentials.store(&response.body) {
            return self.fail(form, e.into());
        }
        info!(backend = self.credentials.backend(), "Stored credential from login response");
        SubmitOutcome::Notified(self.notifier.success(&self.messages.login_success))
    }

    async fn submit_view_users(&self, form: &Form) -> SubmitOutcome {
        match self.send(form, FormRole::ViewUsers).await {
            Ok(response) => {
                let markup = Markup::heading(&response.body, self.render_policy);
                self.user_list.set(markup.clone());
                SubmitOutcome::Rendered(markup)
            }
            Err(e) => self.fail(form, e),
        }
    }

    async fn send(&self, form: &Form, role: FormRole) -> Result<RawResponse, SubmitError> {
        let authorized = role.sends_credential();
        // Read at send time, so a login that completes later does not affect
        // a request already built
        let authorization = authorized.then(|| self.current_credential());
        let request = PreparedRequest::from_form(form, self.base_url.as_ref(), authorization)?;
        debug!(
            method = %request.method,
            url = %request.url,
            authorized,
            "Submitting form"
        );

        let response = self.transport.send(request).await?;
        if response.is_success() {
            Ok(response)
        } else {
            Err(SubmitError::from_status(response.status, &response.body))
        }
    }

    /// Current credential, or an empty value when none is stored. The server
    /// decides what to do with a missing credential.
    fn current_credential(&self) -> String {
        match self.credentials.load() {
            Ok(Some(token)) => token,
            Ok(None) => String::new(),
            Err(e) => {
                warn!(error = %e, "Failed to read credential, sending empty Authorization");
                String::new()
            }
        }
    }

    fn fail(&self, form: &Form, error: SubmitError) -> SubmitOutcome {
        warn!(
            action = %form.action,
            status = ?error.status(),
            error = %error,
            "Form submission failed"
        );
        SubmitOutcome::Failed(self.notifier.error(error.banner_text()))
    }
}

// ============================================================================
// Tests
// ============================================================================
