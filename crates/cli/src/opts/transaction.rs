use alloy_primitives::{
    U256,
    utils::{ParseUnits, parse_units},
};
use clap::Parser;

/// Parses a gas price given in wei or with a unit suffix, e.g. `1gwei` or `0.5 gwei`.
pub fn parse_gas_price(value: &str) -> Result<u128, String> {
    let value = value.trim();
    if value.is_empty() {
        return Err("Gas price must not be empty".to_string());
    }
    let price = if let Some(hex) = value.strip_prefix("0x") {
        U256::from_str_radix(hex, 16).map_err(|e| format!("Invalid hex value: {e}"))?
    } else {
        let unit_start =
            value.find(|c: char| c.is_ascii_alphabetic()).unwrap_or(value.len());
        let (amount, unit) = value.split_at(unit_start);
        let unit = if unit.is_empty() { "wei" } else { unit };
        let parsed: ParseUnits =
            parse_units(amount.trim(), unit).map_err(|e| format!("Invalid gas price {value:?}: {e}"))?;
        parsed.into()
    };
    price.try_into().map_err(|_| format!("Gas price {value:?} is too large"))
}

#[derive(Clone, Debug, Default, Parser)]
#[command(next_help_heading = "Transaction options")]
pub struct TransactionOpts {
    /// Gas limit for the deployment transaction.
    #[arg(long, env = "ETH_GAS_LIMIT")]
    pub gas_limit: Option<u64>,

    /// Gas price for legacy transactions, or max fee per gas for EIP1559 transactions, either
    /// specified in wei, or as a string with a unit type.
    ///
    /// Examples: 1ether, 10gwei, 0.01ether
    #[arg(long, env = "ETH_GAS_PRICE", value_parser = parse_gas_price, value_name = "PRICE")]
    pub gas_price: Option<u128>,

    /// Max priority fee per gas for EIP1559 transactions.
    #[arg(
        long,
        env = "ETH_PRIORITY_GAS_PRICE",
        value_parser = parse_gas_price,
        value_name = "PRICE"
    )]
    pub priority_gas_price: Option<u128>,

    /// Nonce for the deployment transaction.
    #[arg(long)]
    pub nonce: Option<u64>,

    /// Send a legacy transaction instead of an EIP1559 transaction.
    ///
    /// This is automatically enabled for common networks without EIP1559.
    #[arg(long)]
    pub legacy: bool,
}
