use crate::dex::state::PoolSnapshot;
use crate::errors::Result;
use ethers::{
    contract::abigen,
    providers::{Http, Middleware, Provider},
    types::{Address, U256},
};
use std::sync::Arc;
use tracing::warn;

abigen!(
    AlgebraPool,
    r"[
        function globalState() view returns (uint160 price, int24 tick, uint16 fee, uint16 timepointIndex, uint8 communityFeeToken0, uint8 communityFeeToken1, bool unlocked)
        function token0() view returns (address)
        function token1() view returns (address)
        function liquidity() view returns (uint128)
    ]",
);

abigen!(
    Erc20,
    r"[
        function decimals() view returns (uint8)
        function symbol() view returns (string)
    ]",
);

/// Read-only access to Algebra pools and ERC-20 metadata over one RPC endpoint.
#[derive(Clone)]
pub struct PoolClient {
    provider: Arc<Provider<Http>>,
}

impl PoolClient {
    pub fn new(rpc_url: &str) -> Result<Self> {
        let provider = Arc::new(Provider::<Http>::try_from(rpc_url)?);
        Ok(Self { provider })
    }

    /// Chain id of the connected node; doubles as a connectivity check.
    pub async fn chain_id(&self) -> Result<U256> {
        Ok(self.provider.get_chainid().await?)
    }

    /// `(symbol, decimals)` of an ERC-20 token.
    pub async fn token_info(&self, token: Address) -> Result<(String, u8)> {
        let erc20 = Erc20::new(token, self.provider.clone());
        let symbol = erc20.symbol().call().await?;
        let decimals = erc20.decimals().call().await?;
        Ok((symbol, decimals))
    }

    pub async fn token_decimals(&self, token: Address) -> Result<u8> {
        let erc20 = Erc20::new(token, self.provider.clone());
        Ok(erc20.decimals().call().await?)
    }

    /// Read price, tokens, decimals and liquidity of a pool.
    ///
    /// A failing `liquidity()` call is tolerated and leaves `liquidity` empty.
    pub async fn snapshot(&self, pool_addr: Address) -> Result<PoolSnapshot> {
        let pool = AlgebraPool::new(pool_addr, self.provider.clone());
        let (sqrt_price_x96, _tick, _fee, _timepoint, _cf0, _cf1, _unlocked) =
            pool.global_state().call().await?;
        let token0 = pool.token_0().call().await?;
        let token1 = pool.token_1().call().await?;
        let token0_decimals = self.token_decimals(token0).await?;
        let token1_decimals = self.token_decimals(token1).await?;

        let liquidity = match pool.liquidity().call().await {
            Ok(l) => Some(l),
            Err(e) => {
                warn!(pool = ?pool_addr, error = %e, "[DEX] liquidity() not available");
                None
            }
        };

        Ok(PoolSnapshot {
            address: pool_addr,
            token0,
            token1,
            token0_decimals,
            token1_decimals,
            sqrt_price_x96,
            liquidity,
        })
    }
}
