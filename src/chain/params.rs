//! Network parameters for the Index Chain main, test and regression networks.

/// Unix timestamp of the Index Chain genesis block.
pub const GENESIS_BLOCK_TIME: i64 = 1414776286;

/// Address and p2p constants for one Index Chain network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainParams {
    /// p2p message start (network magic).
    pub net_magic: u32,
    /// Base58check version byte for pay-to-pubkey-hash addresses.
    pub pubkey_hash_prefix: u8,
    /// Base58check version byte for pay-to-script-hash addresses.
    pub script_hash_prefix: u8,
}

/// Mainnet parameters.
pub const MAINNET_PARAMS: ChainParams = ChainParams {
    net_magic: 0xe3d9fef1,
    pubkey_hash_prefix: 0x52,
    script_hash_prefix: 0x07,
};

/// Testnet parameters.
pub const TESTNET_PARAMS: ChainParams = ChainParams {
    net_magic: 0xcffcbeea,
    pubkey_hash_prefix: 0x41,
    script_hash_prefix: 0xb2,
};

/// Regtest parameters. Address prefixes follow the upstream regression net.
pub const REGTEST_PARAMS: ChainParams = ChainParams {
    net_magic: 0xfabfb5da,
    pubkey_hash_prefix: 0x6f,
    script_hash_prefix: 0xc4,
};

/// Returns the parameters for the named network.
///
/// Accepts `"test"` and `"regtest"`; anything else selects mainnet.
pub fn chain_params(chain: &str) -> &'static ChainParams {
    match chain {
        "test" => &TESTNET_PARAMS,
        "regtest" => &REGTEST_PARAMS,
        _ => &MAINNET_PARAMS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_selection() {
        assert_eq!(chain_params("test"), &TESTNET_PARAMS);
        assert_eq!(chain_params("regtest"), &REGTEST_PARAMS);
        assert_eq!(chain_params("main"), &MAINNET_PARAMS);
        assert_eq!(chain_params(""), &MAINNET_PARAMS);
    }

    #[test]
    fn networks_are_distinct() {
        assert_ne!(MAINNET_PARAMS.net_magic, TESTNET_PARAMS.net_magic);
        assert_ne!(MAINNET_PARAMS.net_magic, REGTEST_PARAMS.net_magic);
    }
}
