use crate::store::StoreError;

// ============================================================================
// Customer Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum CustomerError {
    #[error("Name, code, and number are required")]
    MissingFields,

    /// Store write failed and was rolled back; detail stays in the source
    #[error("Could not save customer")]
    Persistence(#[source] StoreError),
}
