use crate::domain::fees::{self, DEFAULT_FEE_PERCENT, FeeSplit};
use crate::domain::settlement::Network;
use crate::error::Result;
use rust_decimal::Decimal;

/// USDC token deployment on Base mainnet.
pub const USDC_ADDRESS_MAINNET: &str = "0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913";
/// USDC token deployment on Base Sepolia.
pub const USDC_ADDRESS_TESTNET: &str = "0x036CbD53842c5426634e7929541eC2318f3dCF7e";

pub const CHAIN_ID_MAINNET: u64 = 8453;
pub const CHAIN_ID_TESTNET: u64 = 84532;

/// Default wallet receiving the platform's fee share.
pub const PLATFORM_WALLET: &str = "0x4C1f5Ede1bD8c5b2D0f8f7aE38d6bbE7c5a9d301";

/// Injected chain-level settlement configuration.
///
/// These values are deployment parameters of the escrow contract; the
/// settlement core consumes them and never derives them.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainConfig {
    pub network: Network,
    pub chain_id: u64,
    pub usdc_address: String,
    pub platform_wallet: String,
    pub fee_percent: Decimal,
}

impl ChainConfig {
    pub fn new(network: Network, platform_wallet: impl Into<String>) -> Self {
        let (chain_id, usdc_address) = match network {
            Network::Mainnet => (CHAIN_ID_MAINNET, USDC_ADDRESS_MAINNET),
            Network::Testnet => (CHAIN_ID_TESTNET, USDC_ADDRESS_TESTNET),
        };
        Self {
            network,
            chain_id,
            usdc_address: usdc_address.to_string(),
            platform_wallet: platform_wallet.into(),
            fee_percent: DEFAULT_FEE_PERCENT,
        }
    }

    /// Overrides the fee percentage; must match the escrow contract's
    /// `platformFeePercent()` on the configured chain.
    pub fn with_fee_percent(mut self, fee_percent: Decimal) -> Self {
        self.fee_percent = fee_percent;
        self
    }

    pub fn fee_split(&self, amount: Decimal) -> Result<FeeSplit> {
        fees::split(amount, self.fee_percent)
    }
}
