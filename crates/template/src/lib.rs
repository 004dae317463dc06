//! # sqlweave-template: SQL template compilation
//!
//! Compiles a SQL-like template string - escaped delimiters, named
//! placeholders, and free-form `#...#` timestamp literals - into a
//! reusable plan of literal segments and placeholder resolutions, then
//! evaluates that plan against a binding context to produce one
//! well-formed statement string.
//!
//! Template syntax:
//!
//! - `{name}` - plain placeholder, spliced without quoting
//! - `${name}` - string placeholder, wrapped in single quotes
//! - `#{name}` - timestamp placeholder, wrapped in `#`; the binding must
//!   be a timestamp value
//! - `#...#` - timestamp literal, normalized in place to
//!   `MM/DD/YYYY[ HH:MM:SS[ PM]]` (malformed literals pass through
//!   unchanged)
//! - `{{`, `}}`, `$$`, `##` - one literal occurrence of the character
//!
//! ```
//! use sqlweave_template::{interpolate, Bindings};
//!
//! let bindings = Bindings::new().with("id", 7i64).with("name", "ada");
//! let sql = interpolate(
//!     "UPDATE users SET name = ${name} WHERE id = {id}",
//!     &bindings,
//! )
//! .unwrap();
//! assert_eq!(sql, "UPDATE users SET name = 'ada' WHERE id = 7");
//! ```
//!
//! The engine does not validate SQL and guarantees no injection safety
//! beyond the literal quote wrappers; plain placeholders in particular
//! splice the bound value's text verbatim.

pub mod error;
pub mod parse;
pub mod plan;

// Re-export the public surface (the core value model ships with the
// engine so callers need only one crate)
pub use error::{ParseError, ParseErrorKind, ResolveError, TemplateError};
pub use parse::{compile, normalize_timestamp};
pub use plan::{CompiledPlan, PlaceholderKind, Segment};
pub use sqlweave_core::{Bindings, Context, Value};

/// Compile then resolve in one call.
///
/// Use [`compile`] directly when the same template is resolved against
/// many binding sets; the plan is parsed once and reusable.
pub fn interpolate<C: Context + ?Sized>(
    template: &str,
    bindings: &C,
) -> Result<String, TemplateError> {
    let plan = compile(template)?;
    let statement = plan.resolve(bindings)?;
    Ok(statement)
}
