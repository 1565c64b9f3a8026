//! Rental status transitions.
//!
//! reservation -> active | cancelled
//! active      -> completed | cancelled
//! completed and cancelled are terminal.

use super::DomainError;
use crate::models::RentalStatus;

pub fn can_transition(from: RentalStatus, to: RentalStatus) -> bool {
    use RentalStatus::*;
    matches!(
        (from, to),
        (Reservation, Active) | (Reservation, Cancelled) | (Active, Completed) | (Active, Cancelled)
    )
}

pub fn transition(from: RentalStatus, to: RentalStatus) -> Result<RentalStatus, DomainError> {
    if can_transition(from, to) {
        Ok(to)
    } else {
        Err(DomainError::InvalidState(format!(
            "rental cannot move from {} to {}",
            from, to
        )))
    }
}

/// Initial status accepted on creation.
pub fn validate_initial(status: RentalStatus) -> Result<RentalStatus, DomainError> {
    match status {
        RentalStatus::Reservation | RentalStatus::Active => Ok(status),
        other => Err(DomainError::InvalidInput(format!(
            "a rental cannot be created as {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use RentalStatus::*;

    const ALL: [RentalStatus; 4] = [Reservation, Active, Completed, Cancelled];

    #[test]
    fn test_allowed_transitions() {
        assert_eq!(transition(Reservation, Active).unwrap(), Active);
        assert_eq!(transition(Reservation, Cancelled).unwrap(), Cancelled);
        assert_eq!(transition(Active, Completed).unwrap(), Completed);
        assert_eq!(transition(Active, Cancelled).unwrap(), Cancelled);
    }

    #[test]
    fn test_terminal_statuses_do_not_move() {
        for from in [Completed, Cancelled] {
            for to in ALL {
                assert!(!can_transition(from, to));
            }
        }
    }

    #[test]
    fn test_rejected_transition_is_invalid_state() {
        assert!(matches!(
            transition(Reservation, Completed),
            Err(DomainError::InvalidState(_))
        ));
        assert!(matches!(
            transition(Active, Reservation),
            Err(DomainError::InvalidState(_))
        ));
    }

    #[test]
    fn test_initial_status() {
        assert!(validate_initial(Reservation).is_ok());
        assert!(validate_initial(Active).is_ok());
        assert!(matches!(
            validate_initial(Completed),
            Err(DomainError::InvalidInput(_))
        ));
    }
}
