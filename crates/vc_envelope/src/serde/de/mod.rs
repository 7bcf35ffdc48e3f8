// -----------------------------------------------------------------------------
// Modules

mod driver;
mod field;
mod list_visitor;
mod map_visitor;
mod set_visitor;

// -----------------------------------------------------------------------------
// Exports

pub use driver::EnvelopeSeed;

use driver::NestedSeed;

/// Upper bound of the capacity reserved from a sequence size hint.
///
/// Size hints come from untrusted input.
const MAX_PREALLOCATION: usize = 4096;
