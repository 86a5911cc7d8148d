//! Format implementations
//!
//! | format     | parse | serialize | extensions        |
//! |------------|-------|-----------|-------------------|
//! | `markdown` | yes   | yes       | `md`, `markdown`  |
//! | `html`     | no    | yes       | `html`, `htm`     |
//! | `tree`     | no    | yes       |                   |
//! | `json`     | yes   | yes       | `json`            |

pub mod html;
pub mod json;
pub mod markdown;
pub mod tree;

pub use html::HtmlFormat;
pub use json::JsonFormat;
pub use markdown::MarkdownFormat;
pub use tree::TreeFormat;
