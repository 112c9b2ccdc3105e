//! Collection sizing and emptiness helpers.

use crate::TextError;

/// Capacity that holds `size` entries under a 0.75 load factor without rehashing.
///
/// # Errors
/// [`TextError::InvalidArgument`] when `size` exceeds `i32::MAX`.
pub fn map_capacity(size: usize) -> Result<usize, TextError> {
    if size > i32::MAX as usize {
        return Err(TextError::invalid(format!("size {size} is too large")));
    }
    let initial = (size as f32 / 0.75 + 1.0) as usize;
    Ok((initial + 1).next_power_of_two())
}

#[must_use]
pub fn is_empty<T>(items: Option<&[T]>) -> bool {
    items.is_none_or(<[T]>::is_empty)
}

#[must_use]
pub fn is_not_empty<T>(items: Option<&[T]>) -> bool {
    !is_empty(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_capacity() {
        assert_eq!(map_capacity(0).unwrap(), 2);
        assert_eq!(map_capacity(1).unwrap(), 4);
        assert_eq!(map_capacity(12).unwrap(), 32);
        assert_eq!(map_capacity(100).unwrap(), 256);
        assert!(map_capacity(i32::MAX as usize + 1).is_err());
    }

    #[test]
    fn test_emptiness() {
        assert!(is_empty::<u8>(None));
        assert!(is_empty::<u8>(Some(&[])));
        assert!(is_not_empty(Some(&[1, 2][..])));
    }
}
