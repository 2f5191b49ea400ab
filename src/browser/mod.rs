//! Browser Driver Adapter: the one seam through which the rest of the
//! crate talks to a real Chromium instance.

pub mod driver;
pub mod fake;
pub mod js_scripts;

pub use driver::{BrowserDriver, ClickStrategy, ElementHandle, RealSession, Session};
pub use fake::{FakeContainer, FakeGallery, FakeGalleryTuning};
