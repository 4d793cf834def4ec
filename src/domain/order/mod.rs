// ============================================================================
// Order Domain
// ============================================================================
//
// - Commands (PlaceOrder, parsed from OrderPayload)
// - Errors (OrderError enum)
// - Command Handler (OrderCommandHandler: the order placement flow)
//
// ============================================================================

pub mod commands;
pub mod errors;
pub mod command_handler;

// Re-export for convenience
pub use commands::*;
pub use errors::*;
pub use command_handler::*;
