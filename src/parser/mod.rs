//! Review fragment → record building blocks.
//!
//! `extract` pulls raw tuples out of the captured page; the other modules are
//! pure functions over strings combined by `ReviewRecord::from_parts`.

pub mod dates;
pub mod extract;
pub mod hours;
pub mod language;
pub mod region;
pub mod sanitize;
