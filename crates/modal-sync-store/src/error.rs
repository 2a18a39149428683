#![forbid(unsafe_code)]

use crate::ModalId;

/// Errors raised by modal state access.
///
/// Redundant or out-of-order operations (opening an open modal, closing a
/// closed one, updating a removed one) are not errors; they are no-ops.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModalError {
    /// State was read for an id that has no record, i.e. a unit was rendered
    /// without going through `define`/`register`.
    #[error("modal \"{id}\" not found")]
    UnboundModalAccess { id: ModalId },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_names_the_id() {
        let err = ModalError::UnboundModalAccess {
            id: ModalId::from("modal::2a"),
        };
        assert_eq!(err.to_string(), "modal \"modal::2a\" not found");
    }
}
