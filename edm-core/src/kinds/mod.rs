//! Built-in node kinds
//!
//! Each submodule is a self-contained plugin: it defines its kind
//! identifiers, payload types and constructors, and a `register` function
//! that binds its spec, output behaviors, payload codec and importers.
//! Nothing outside a plugin matches on its kinds, so adding a kind means
//! adding a module and one line to [`register_defaults`].
//!
//! | kind             | flow   | children               | payload       |
//! |------------------|--------|------------------------|---------------|
//! | `document`       | block  | blocks                 |               |
//! | `fragment`       | (none) | anything               |               |
//! | `paragraph`      | block  | inlines                |               |
//! | `plain`          | block  | inlines                |               |
//! | `heading`        | block  | inlines                | level         |
//! | `bullet_list`    | block  | `list_item`            | marker, tight |
//! | `ordered_list`   | block  | `list_item`            | start, tight  |
//! | `list_item`      | block  | blocks                 |               |
//! | `block_quote`    | block  | blocks                 |               |
//! | `code_block`     | block  | none                   | info, literal |
//! | `thematic_break` | block  | none                   |               |
//! | `text`           | inline | none                   | string        |
//! | `hard_break`     | inline | none                   |               |
//! | `emph`           | inline | inlines                |               |
//! | `strong`         | inline | inlines                |               |
//! | `strike`         | inline | inlines                |               |
//! | `code`           | inline | none                   | literal       |
//! | `link`, `image`  | inline | inlines                | url, title    |

pub mod block;
pub mod code;
pub mod document;
pub mod emphasis;
pub mod heading;
pub mod link;
pub mod list;
pub mod paragraph;
pub mod text;

use crate::error::EdmError;
use crate::registry::KindRegistry;

/// Registers every built-in kind.
pub fn register_defaults(registry: &mut KindRegistry) -> Result<(), EdmError> {
    document::register(registry)?;
    text::register(registry)?;
    emphasis::register(registry)?;
    code::register(registry)?;
    link::register(registry)?;
    paragraph::register(registry)?;
    heading::register(registry)?;
    list::register(registry)?;
    block::register(registry)?;
    Ok(())
}
