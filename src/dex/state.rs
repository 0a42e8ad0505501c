use bigdecimal::BigDecimal;
use ethers::types::{Address, U256};
use num_bigint::{BigInt, BigUint};
use num_traits::ToPrimitive;
use std::str::FromStr;

/// Which side of the pool holds the token being priced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseSide {
    Token0,
    Token1,
    /// Neither token matches; the pool is probably misconfigured.
    Absent,
}

/// Immutable snapshot of an Algebra (Quickswap V3) pool read at one instant.
#[derive(Clone, Debug)]
pub struct PoolSnapshot {
    pub address: Address,
    pub token0: Address,
    pub token1: Address,
    pub token0_decimals: u8,
    pub token1_decimals: u8,
    /// sqrt(token1/token0) in Q64.96, first field of `globalState()`.
    pub sqrt_price_x96: U256,
    /// In-range liquidity, `None` when the pool didn't answer `liquidity()`.
    pub liquidity: Option<u128>,
}

impl PoolSnapshot {
    /// Human-unit price of token0 in token1.
    pub fn token1_per_token0(&self) -> f64 {
        price_from_sqrt_x96(
            self.sqrt_price_x96,
            self.token0_decimals,
            self.token1_decimals,
        )
    }

    pub fn base_side(&self, base: Address) -> BaseSide {
        if self.token0 == base {
            BaseSide::Token0
        } else if self.token1 == base {
            BaseSide::Token1
        } else {
            BaseSide::Absent
        }
    }

    /// Quote units paid for one base token.
    ///
    /// When the base token isn't in the pool this assumes it is token1.
    pub fn quote_per_base(&self, base: Address) -> f64 {
        let price = self.token1_per_token0();
        match self.base_side(base) {
            BaseSide::Token0 => price,
            BaseSide::Token1 | BaseSide::Absent => invert(price),
        }
    }
}

/// `1/x`, or `0` for a zero price.
pub fn invert(price: f64) -> f64 {
    if price == 0.0 { 0.0 } else { 1.0 / price }
}

/// Convert `sqrtPriceX96` to a decimal-adjusted token1-per-token0 price.
///
/// The square of a uint160 overflows 256 bits, so the arithmetic is done on
/// big integers and only the final value is narrowed to `f64`.
pub fn price_from_sqrt_x96(sqrt_price_x96: U256, decimals0: u8, decimals1: u8) -> f64 {
    let sqrt = BigUint::from_str(&sqrt_price_x96.to_string()).unwrap_or_default();
    let numerator = BigDecimal::from(BigInt::from(sqrt.pow(2u32)));
    let denominator = BigDecimal::from(BigInt::from(BigUint::from(1u8) << 192u32));
    let raw = numerator / denominator;
    let exponent = decimals0 as i64 - decimals1 as i64;
    // BigDecimal::new(1, -e) == 10^e
    let adjusted = raw * BigDecimal::new(BigInt::from(1u8), -exponent);
    adjusted.to_f64().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const Q96: u128 = 1 << 96;

    fn snapshot(token0: Address, token1: Address, sqrt: U256, d0: u8, d1: u8) -> PoolSnapshot {
        PoolSnapshot {
            address: Address::zero(),
            token0,
            token1,
            token0_decimals: d0,
            token1_decimals: d1,
            sqrt_price_x96: sqrt,
            liquidity: Some(1),
        }
    }

    #[test]
    fn unit_sqrt_is_price_one() {
        assert!((price_from_sqrt_x96(U256::from(Q96), 18, 18) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn zero_sqrt_is_zero_price() {
        assert_eq!(price_from_sqrt_x96(U256::zero(), 18, 6), 0.0);
    }

    #[test]
    fn decimals_shift_the_price() {
        // raw ratio 1 with 18 vs 6 decimals is 1e12 token1 per token0
        let p = price_from_sqrt_x96(U256::from(Q96), 18, 6);
        assert!((p / 1e12 - 1.0).abs() < 1e-12);
        let p = price_from_sqrt_x96(U256::from(Q96), 6, 18);
        assert!((p * 1e12 - 1.0).abs() < 1e-12);
    }

    #[test]
    fn large_sqrt_does_not_overflow() {
        // 2^159, close to the uint160 ceiling; raw price is 2^126
        let sqrt = U256::one() << 159;
        let p = price_from_sqrt_x96(sqrt, 18, 18);
        assert!((p / 2f64.powi(126) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn orientation_follows_base_token() {
        let sht = Address::from_low_u64_be(1);
        let usdc = Address::from_low_u64_be(2);
        // sqrt = 2 * Q96 => raw token1/token0 = 4
        let sqrt = U256::from(Q96) * U256::from(2u8);

        let sht_first = snapshot(sht, usdc, sqrt, 18, 18);
        assert_eq!(sht_first.base_side(sht), BaseSide::Token0);
        assert!((sht_first.quote_per_base(sht) - 4.0).abs() < 1e-12);

        let sht_second = snapshot(usdc, sht, sqrt, 18, 18);
        assert_eq!(sht_second.base_side(sht), BaseSide::Token1);
        assert!((sht_second.quote_per_base(sht) - 0.25).abs() < 1e-12);

        let unrelated = Address::from_low_u64_be(9);
        assert_eq!(sht_second.base_side(unrelated), BaseSide::Absent);
    }

    #[test]
    fn invert_guards_zero() {
        assert_eq!(invert(0.0), 0.0);
        assert_eq!(invert(4.0), 0.25);
    }
}
