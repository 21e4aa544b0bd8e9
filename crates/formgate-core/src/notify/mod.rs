//! User feedback surfaces.
//!
//! - `Notifier`: the one shared banner. Every `show` replaces whatever was
//!   there before; nothing is queued.
//! - `MarkupRegion`: a single-slot region holding rendered markup, used for
//!   the user list.

pub mod banner;
pub mod region;

pub use banner::{Banner, BannerKind, BannerTiming, Notifier, Visibility};
pub use region::{Markup, MarkupRegion, RenderPolicy};
