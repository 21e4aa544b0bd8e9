//! Form definitions and the page that hosts them.
//!
//! A `Page` stands in for the document: it lists every form, names the two
//! specialized forms (login and view-users), and names the regions used for
//! notifications and the rendered user list.

pub mod model;
pub mod page;

pub use model::{encode_fields, Field, Form, FormMethod, FormRole, SubmitEvent};
pub use page::{Page, PageError};
