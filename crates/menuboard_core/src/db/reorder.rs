//! Position arithmetic for ordered menu rows.
//!
//! Positions are sparse integers. Appends take `max + 1`, deletes leave gaps,
//! and a move swaps the positions of two adjacent rows.

use crate::error::AppError;
use crate::models::item::MoveDirection;

/// Position for a row appended after `max_existing`.
///
/// # Errors
/// Returns [`AppError::StorageMessage`] if the position space is exhausted.
pub fn next_position(max_existing: Option<u32>) -> Result<u32, AppError> {
    match max_existing {
        None => Ok(0),
        Some(max) => max
            .checked_add(1)
            .ok_or_else(|| AppError::StorageMessage("Item position overflow".to_string())),
    }
}

/// Index of the neighbour that `index` swaps with when moved in `direction`.
///
/// # Errors
/// Returns [`AppError::InvalidMove`] when the row is already at that edge.
pub fn swap_partner(len: usize, index: usize, direction: MoveDirection) -> Result<usize, AppError> {
    let partner = match direction {
        MoveDirection::Up => index.checked_sub(1),
        MoveDirection::Down => index.checked_add(1).filter(|next| *next < len),
    };
    partner.ok_or_else(|| AppError::InvalidMove("Cannot move item further.".to_string()))
}

#[cfg(test)]
mod tests {
    use super::{next_position, swap_partner};
    use crate::error::AppError;
    use crate::models::item::MoveDirection;

    #[test]
    fn next_position_starts_at_zero_and_follows_max() {
        assert_eq!(next_position(None).unwrap(), 0);
        assert_eq!(next_position(Some(0)).unwrap(), 1);
        assert_eq!(next_position(Some(7)).unwrap(), 8);
        assert!(next_position(Some(u32::MAX)).is_err());
    }

    #[test]
    fn edges_cannot_move_outward() {
        assert!(matches!(
            swap_partner(3, 0, MoveDirection::Up),
            Err(AppError::InvalidMove(_))
        ));
        assert!(matches!(
            swap_partner(3, 2, MoveDirection::Down),
            Err(AppError::InvalidMove(_))
        ));
        assert!(matches!(
            swap_partner(1, 0, MoveDirection::Down),
            Err(AppError::InvalidMove(_))
        ));
    }

    #[test]
    fn interior_rows_pair_with_adjacent_neighbour() {
        assert_eq!(swap_partner(3, 1, MoveDirection::Up).unwrap(), 0);
        assert_eq!(swap_partner(3, 1, MoveDirection::Down).unwrap(), 2);
        assert_eq!(swap_partner(3, 2, MoveDirection::Up).unwrap(), 1);
    }
}
