use std::collections::HashMap;

/// Shannon entropy (base 2) of the values in `numbers`.
pub fn entropy(numbers: &[u8]) -> f64 {
    if numbers.is_empty() {
        return 0.0;
    }
    let mut counts: HashMap<u8, usize> = HashMap::new();
    for &n in numbers {
        *counts.entry(n).or_insert(0) += 1;
    }
    let total = numbers.len() as f64;
    counts
        .values()
        .map(|&c| {
            let p = c as f64 / total;
            -p * p.log2()
        })
        .sum()
}

/// Population variance.
pub fn variance(numbers: &[u8]) -> f64 {
    if numbers.is_empty() {
        return 0.0;
    }
    let len = numbers.len() as f64;
    let mean = numbers.iter().map(|&n| n as f64).sum::<f64>() / len;
    numbers.iter().map(|&n| (n as f64 - mean).powi(2)).sum::<f64>() / len
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entropy_of_distinct_numbers() {
        let h = entropy(&[4, 12, 23, 34, 45, 58]);
        assert!((h - 6f64.log2()).abs() < 1e-12);
    }

    #[test]
    fn test_entropy_edge_cases() {
        assert_eq!(entropy(&[]), 0.0);
        assert_eq!(entropy(&[7, 7, 7]), 0.0);
        assert!((entropy(&[1, 1, 2, 2]) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_variance() {
        assert_eq!(variance(&[]), 0.0);
        assert_eq!(variance(&[5, 5, 5]), 0.0);
        // mean 3.5, squared deviations 6.25 + 2.25 + 0.25 (twice) / 6
        assert!((variance(&[1, 2, 3, 4, 5, 6]) - 35.0 / 12.0).abs() < 1e-12);
    }
}
