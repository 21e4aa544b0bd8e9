//! Core library for formgate.
//!
//! formgate turns form submissions into asynchronous HTTP requests, attaches
//! a stored credential to authorized requests, stores the credential returned
//! by a login form, and reports every outcome through a single banner.
//!
//! - `form`: form definitions, roles, and the page that hosts them
//! - `auth`: credential stores (keychain, file, memory)
//! - `http`: request preparation and the transport seam
//! - `notify`: the single-slot banner and the user-list region
//! - `submit`: the `FormSubmitter` tying it all together
//! - `config`: user configuration and environment overrides

pub mod auth;
pub mod config;
pub mod form;
pub mod http;
pub mod notify;
pub mod submit;
pub mod utils;

pub use auth::{CredentialStore, FileStore, KeyringStore, MemoryStore, StoreError};
pub use config::{Config, CredentialBackend, IgnoredOverride};
pub use form::{Field, Form, FormMethod, FormRole, Page, PageError, SubmitEvent};
pub use http::{PreparedRequest, RawResponse, ReqwestTransport, Transport, TransportError};
pub use notify::{Banner, BannerKind, BannerTiming, Markup, MarkupRegion, Notifier, RenderPolicy, Visibility};
pub use submit::{FormSubmitter, Messages, SubmitError, SubmitOutcome};
