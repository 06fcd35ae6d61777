//! Small numeric and string exercises.

use std::num::ParseIntError;

pub const INTERVAL: (f64, f64) = (1.0, 50.0);

pub fn min_of_three(a: f64, b: f64, c: f64) -> f64 {
    a.min(b).min(c)
}

/// Pairs every number with whether it lies in the closed [`INTERVAL`].
pub fn in_interval(numbers: &[f64]) -> Vec<(f64, bool)> {
    let (low, high) = INTERVAL;
    numbers
        .iter()
        .map(|&n| (n, (low..=high).contains(&n)))
        .collect()
}

/// Rows `i * m` for `i` in `1..=10`.
pub fn multiplication_table(m: f64) -> Vec<(u32, f64)> {
    (1..=10).map(|i| (i, f64::from(i) * m)).collect()
}

/// Sum and count of whitespace-separated integers.
pub fn sum_and_count(input: &str) -> Result<(i64, usize), ParseIntError> {
    let numbers = input
        .split_whitespace()
        .map(str::parse::<i64>)
        .collect::<Result<Vec<_>, _>>()?;
    Ok((numbers.iter().sum(), numbers.len()))
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Replaced {
    pub text: String,
    pub replacements: usize,
    pub characters: usize,
}

/// Replaces `a` with `o` and `A` with `O`.
pub fn replace_a_with_o(input: &str) -> Replaced {
    let mut replacements = 0;
    let text = input
        .chars()
        .map(|ch| match ch {
            'a' => {
                replacements += 1;
                'o'
            }
            'A' => {
                replacements += 1;
                'O'
            }
            other => other,
        })
        .collect();

    Replaced {
        text,
        replacements,
        characters: input.chars().count(),
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MaxAndOdd {
    pub max: i64,
    /// Position of the first occurrence of `max`.
    pub index: usize,
    /// Odd elements, largest first.
    pub odd_desc: Vec<i64>,
}

/// `None` for an empty slice.
pub fn max_and_odd(values: &[i64]) -> Option<MaxAndOdd> {
    let (index, &max) = values
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, &i64)>, (i, v)| match best {
            Some((_, b)) if b >= v => best,
            _ => Some((i, v)),
        })?;

    let mut odd_desc: Vec<i64> = values.iter().copied().filter(|v| v % 2 != 0).collect();
    odd_desc.sort_unstable_by(|a, b| b.cmp(a));

    Some(MaxAndOdd {
        max,
        index,
        odd_desc,
    })
}
