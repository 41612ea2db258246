//! How many shares to redeem.

use alloy::primitives::U256;

/// Shares to redeem given the holder's balance and the vault's ceiling.
///
/// Exact integer `min`: never exceeds either input and, `U256` being
/// unsigned, never negative.
pub fn shares_to_redeem(balance: U256, max_redeemable: U256) -> U256 {
    balance.min(max_redeemable)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_takes_the_smaller_value() {
        assert_eq!(shares_to_redeem(U256::from(500), U256::from(300)), U256::from(300));
        assert_eq!(shares_to_redeem(U256::from(300), U256::from(500)), U256::from(300));
    }

    #[test]
    fn test_tie_uses_shared_value() {
        assert_eq!(shares_to_redeem(U256::from(42), U256::from(42)), U256::from(42));
    }

    #[test]
    fn test_zero_when_either_side_is_zero() {
        assert!(shares_to_redeem(U256::ZERO, U256::from(10)).is_zero());
        assert!(shares_to_redeem(U256::from(10), U256::ZERO).is_zero());
    }

    #[test]
    fn test_exact_at_full_width() {
        let big = U256::MAX - U256::from(1);
        assert_eq!(shares_to_redeem(U256::MAX, big), big);
        assert!(shares_to_redeem(U256::MAX, big) <= U256::MAX);
    }
}
