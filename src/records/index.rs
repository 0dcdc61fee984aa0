//! Python-style index resolution.
//!
//! Non-negative indices address a position directly; negative indices count
//! from the end (`-1` is the last element). Resolution only guards against
//! underflow. The upper bound is checked separately by whoever needs an
//! existing element.

use crate::error::{Result, StorageError};

/// Resolve `index` against a sequence of `len` elements.
///
/// Fails with `OutOfRange` when a negative index reaches past the front.
pub fn resolve(index: i64, len: usize) -> Result<usize> {
    if index >= 0 {
        return usize::try_from(index).map_err(|_| StorageError::OutOfRange { index, len });
    }

    let back = index.unsigned_abs();
    match usize::try_from(back) {
        Ok(back) if back <= len => Ok(len - back),
        _ => Err(StorageError::OutOfRange { index, len }),
    }
}

/// Resolve a subscription start index.
///
/// Same rule as [`resolve`], except that position 0 is valid even on an
/// empty sequence. Every other position must hold an element. Failures are
/// reported as `InvalidArgument`.
pub fn resolve_start(index: i64, len: usize) -> Result<usize> {
    let position = resolve(index, len).map_err(|_| invalid_start(index))?;

    if position != 0 && position >= len {
        return Err(invalid_start(index));
    }

    Ok(position)
}

fn invalid_start(index: i64) -> StorageError {
    StorageError::InvalidArgument(format!("invalid start index {}", index))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_negative_is_identity() {
        assert_eq!(resolve(0, 3).unwrap(), 0);
        assert_eq!(resolve(2, 3).unwrap(), 2);
        // Upper bound is not checked here.
        assert_eq!(resolve(7, 3).unwrap(), 7);
    }

    #[test]
    fn test_negative_counts_from_end() {
        assert_eq!(resolve(-1, 3).unwrap(), 2);
        assert_eq!(resolve(-2, 3).unwrap(), 1);
        assert_eq!(resolve(-3, 3).unwrap(), 0);
    }

    #[test]
    fn test_negative_underflow() {
        assert!(matches!(
            resolve(-4, 3),
            Err(StorageError::OutOfRange { index: -4, len: 3 })
        ));
        assert!(matches!(resolve(-1, 0), Err(StorageError::OutOfRange { .. })));
        assert!(matches!(resolve(i64::MIN, 10), Err(StorageError::OutOfRange { .. })));
    }

    #[test]
    fn test_start_zero_always_valid() {
        assert_eq!(resolve_start(0, 0).unwrap(), 0);
        assert_eq!(resolve_start(0, 5).unwrap(), 0);
    }

    #[test]
    fn test_start_bounds() {
        assert_eq!(resolve_start(2, 3).unwrap(), 2);
        assert_eq!(resolve_start(-1, 3).unwrap(), 2);
        assert_eq!(resolve_start(-3, 3).unwrap(), 0);

        assert!(matches!(resolve_start(3, 3), Err(StorageError::InvalidArgument(_))));
        assert!(matches!(resolve_start(1, 0), Err(StorageError::InvalidArgument(_))));
        assert!(matches!(resolve_start(-1, 0), Err(StorageError::InvalidArgument(_))));
        assert!(matches!(resolve_start(-4, 3), Err(StorageError::InvalidArgument(_))));
    }
}
