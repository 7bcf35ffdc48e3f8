// -----------------------------------------------------------------------------
// Modules

mod driver;
mod list_serializer;
mod map_serializer;
mod set_serializer;

// -----------------------------------------------------------------------------
// Exports

pub use driver::EnvelopeSerializer;

use driver::EnvelopeRef;
