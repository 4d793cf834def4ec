// ============================================================================
// Customer Domain
// ============================================================================
//
// - Value objects (PhoneNumber)
// - Commands (RegisterCustomer, parsed from CustomerPayload)
// - Errors (CustomerError enum)
// - Command Handler (CustomerCommandHandler)
//
// ============================================================================

pub mod value_objects;
pub mod commands;
pub mod errors;
pub mod command_handler;

// Re-export for convenience
pub use commands::*;
pub use errors::*;
pub use command_handler::*;
