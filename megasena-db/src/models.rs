use anyhow::{Result, bail};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Highest number that can be drawn.
pub const POOL_SIZE: u8 = 60;
/// Numbers per draw.
pub const PICK_COUNT: usize = 6;
/// Numbers up to this value count as "low".
pub const LOW_MAX: u8 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draw {
    pub draw_number: u32,
    pub draw_date: NaiveDate,
    pub numbers: [u8; PICK_COUNT],
}

impl Draw {
    pub fn new(draw_number: u32, draw_date: NaiveDate, numbers: [u8; PICK_COUNT]) -> Self {
        Self {
            draw_number,
            draw_date,
            numbers,
        }
    }

    /// A draw takes part in analysis only when its six numbers are in range and distinct.
    pub fn is_valid(&self) -> bool {
        validate_numbers(&self.numbers).is_ok()
    }

    pub fn sorted_numbers(&self) -> [u8; PICK_COUNT] {
        let mut numbers = self.numbers;
        numbers.sort_unstable();
        numbers
    }

    pub fn sum(&self) -> u32 {
        self.numbers.iter().map(|&n| u32::from(n)).sum()
    }
}

pub fn is_in_pool(n: u8) -> bool {
    (1..=POOL_SIZE).contains(&n)
}

pub fn validate_numbers(numbers: &[u8]) -> Result<()> {
    if numbers.len() != PICK_COUNT {
        bail!("Expected {} numbers, got {}", PICK_COUNT, numbers.len());
    }
    for &n in numbers {
        if !is_in_pool(n) {
            bail!("Number {} out of range (1-{})", n, POOL_SIZE);
        }
    }
    for i in 0..numbers.len() {
        for j in (i + 1)..numbers.len() {
            if numbers[i] == numbers[j] {
                bail!("Duplicate number: {}", numbers[i]);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 25).unwrap()
    }

    #[test]
    fn test_validate_numbers_ok() {
        assert!(validate_numbers(&[1, 2, 3, 4, 5, 6]).is_ok());
        assert!(validate_numbers(&[60, 59, 58, 57, 56, 55]).is_ok());
    }

    #[test]
    fn test_validate_numbers_out_of_range() {
        assert!(validate_numbers(&[0, 2, 3, 4, 5, 6]).is_err());
        assert!(validate_numbers(&[1, 2, 3, 4, 5, 61]).is_err());
    }

    #[test]
    fn test_validate_numbers_duplicates() {
        assert!(validate_numbers(&[7, 7, 3, 4, 5, 6]).is_err());
    }

    #[test]
    fn test_validate_numbers_wrong_length() {
        assert!(validate_numbers(&[1, 2, 3, 4, 5]).is_err());
        assert!(validate_numbers(&[1, 2, 3, 4, 5, 6, 7]).is_err());
    }

    #[test]
    fn test_draw_is_valid() {
        assert!(Draw::new(1, date(), [4, 12, 23, 34, 45, 58]).is_valid());
        assert!(!Draw::new(2, date(), [4, 4, 23, 34, 45, 58]).is_valid());
        assert!(!Draw::new(3, date(), [0, 12, 23, 34, 45, 58]).is_valid());
    }

    #[test]
    fn test_sorted_numbers_and_sum() {
        let draw = Draw::new(2800, date(), [58, 4, 45, 12, 34, 23]);
        assert_eq!(draw.sorted_numbers(), [4, 12, 23, 34, 45, 58]);
        assert_eq!(draw.sum(), 176);
    }
}
