/// Decides whether two already normalized outputs agree.
pub trait Comparison: Send + Sync {
    fn equal(&self, actual: &str, expected: &str) -> bool;
}

impl<F> Comparison for F
where
    F: Fn(&str, &str) -> bool + Send + Sync,
{
    fn equal(&self, actual: &str, expected: &str) -> bool {
        self(actual, expected)
    }
}

/// Default comparison: plain string equality.
pub fn exact_match(actual: &str, expected: &str) -> bool {
    actual == expected
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_comparison() {
        let case_insensitive = |a: &str, b: &str| a.eq_ignore_ascii_case(b);

        assert!(case_insensitive.equal("YES", "yes"));
        assert!(!exact_match.equal("YES", "yes"));
    }
}
