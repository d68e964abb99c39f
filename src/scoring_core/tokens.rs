//! Static token precision table

/// Decimal exponent used when a symbol is missing or unknown
pub const DEFAULT_DECIMALS: u32 = 18;

const TOKEN_DECIMALS: [(&str, u32); 8] = [
    ("USDC", 6),
    ("USDT", 6),
    ("DAI", 18),
    ("WETH", 18),
    ("WMATIC", 18),
    ("WBTC", 8),
    ("AAVE", 18),
    ("LINK", 18),
];

/// Resolve the decimal exponent for an asset symbol.
///
/// Lookup is exact (case-sensitive); anything not in the table gets
/// [`DEFAULT_DECIMALS`].
pub fn decimals_for(symbol: Option<&str>) -> u32 {
    symbol
        .and_then(|s| {
            TOKEN_DECIMALS
                .iter()
                .find(|(known, _)| *known == s)
                .map(|(_, decimals)| *decimals)
        })
        .unwrap_or(DEFAULT_DECIMALS)
}
