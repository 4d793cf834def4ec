// ============================================================================
// Domain Layer - Business Logic
// ============================================================================
//
// Each entity has its own subdirectory with:
// - Commands (validated input, parsed from request payloads)
// - Errors
// - Command handler (validate -> resolve -> persist -> side effects)
//
// HTTP and storage details stay outside this layer.
//
// ============================================================================

pub mod customer;
pub mod order;
