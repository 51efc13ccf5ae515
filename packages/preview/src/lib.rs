//! # Autoletter Preview
//!
//! Turns an editor body into what a recipient would see: `{{name}}` tokens
//! replaced with sample values, then everything outside a small allow-list of
//! markup stripped.
//!
//! ```rust
//! use autoletter_preview::{render_preview, SampleValues};
//!
//! let html = render_preview("<p onclick=\"x()\">Hi {{firstName}}</p>", &SampleValues::default()).unwrap();
//! assert_eq!(html, "<p>Hi John</p>");
//! ```

mod compiler;
mod error;
mod sanitizer;
mod substitute;

pub use compiler::{render_page, render_preview, Envelope, PageOptions};
pub use error::PreviewError;
pub use sanitizer::{sanitize, SanitizePolicy, SanitizeReport, Sanitizer};
pub use substitute::{substitute, SampleValues, UNSUBSCRIBE_URL};

#[cfg(test)]
mod tests;
