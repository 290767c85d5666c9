//! Output-script to address resolution.
//!
//! Four reserved Index Chain opcodes are checked against the first script
//! byte before anything else; a script starting with one of them resolves to
//! a fixed label and is never treated as a standard script. Everything else
//! goes through generic script classification.

use bitcoin::base58;
use bitcoin::hashes::Hash;
use bitcoin::script::Instruction;
use bitcoin::Script;

use crate::chain::error::ParseError;
use crate::chain::params::ChainParams;

/// First script byte of a zerocoin mint output.
pub const OP_ZEROCOIN_MINT: u8 = 0xc1;
/// First script byte of a zerocoin spend output.
pub const OP_ZEROCOIN_SPEND: u8 = 0xc2;
/// First script byte of a sigma mint output.
pub const OP_SIGMA_MINT: u8 = 0xc3;
/// First script byte of a sigma spend output.
pub const OP_SIGMA_SPEND: u8 = 0xc4;

/// Addresses resolved from one output script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptAddresses {
    /// Zero or more address strings (or a symbolic label).
    pub addresses: Vec<String>,
    /// Whether the indexing layer may treat the strings as queryable
    /// addresses. False for labels and unclassifiable scripts.
    pub searchable: bool,
}

impl ScriptAddresses {
    fn label(label: &str) -> Self {
        ScriptAddresses {
            addresses: vec![label.to_string()],
            searchable: false,
        }
    }

    fn none() -> Self {
        ScriptAddresses {
            addresses: Vec::new(),
            searchable: false,
        }
    }
}

/// Resolves an output script (address descriptor) to addresses.
///
/// The four reserved opcodes take absolute precedence: a script whose first
/// byte is one of them yields its label even if the remaining bytes would
/// parse as a valid standard script. Empty and non-reserved scripts delegate
/// to generic resolution.
pub fn addresses_from_script(
    script: &[u8],
    params: &ChainParams,
) -> Result<ScriptAddresses, ParseError> {
    if let Some(&op) = script.first() {
        match op {
            OP_ZEROCOIN_MINT => return Ok(ScriptAddresses::label("Zeromint")),
            OP_ZEROCOIN_SPEND => return Ok(ScriptAddresses::label("Zerospend")),
            OP_SIGMA_MINT => return Ok(ScriptAddresses::label("Sigmamint")),
            OP_SIGMA_SPEND => return Ok(ScriptAddresses::label("Sigmaspend")),
            _ => {}
        }
    }
    output_script_to_addresses(script, params)
}

/// Generic script classification with the chain's base58 prefixes.
fn output_script_to_addresses(
    script_bytes: &[u8],
    params: &ChainParams,
) -> Result<ScriptAddresses, ParseError> {
    let script = Script::from_bytes(script_bytes);

    if script.is_p2pkh() {
        // OP_DUP OP_HASH160 <20> OP_EQUALVERIFY OP_CHECKSIG
        return Ok(ScriptAddresses {
            addresses: vec![base58_address(
                params.pubkey_hash_prefix,
                &script_bytes[3..23],
            )],
            searchable: true,
        });
    }
    if script.is_p2sh() {
        // OP_HASH160 <20> OP_EQUAL
        return Ok(ScriptAddresses {
            addresses: vec![base58_address(
                params.script_hash_prefix,
                &script_bytes[2..22],
            )],
            searchable: true,
        });
    }
    if script.is_p2pk() {
        // Report the p2pkh address of the pubkey, as the generic resolver does.
        return Ok(match script.p2pk_public_key() {
            Some(pubkey) => ScriptAddresses {
                addresses: vec![base58_address(
                    params.pubkey_hash_prefix,
                    pubkey.pubkey_hash().as_byte_array(),
                )],
                searchable: true,
            },
            None => ScriptAddresses::none(),
        });
    }
    if script.is_op_return() {
        return Ok(ScriptAddresses::label(&op_return_label(script)));
    }

    Ok(ScriptAddresses::none())
}

fn base58_address(version: u8, payload: &[u8]) -> String {
    let mut data = Vec::with_capacity(payload.len() + 1);
    data.push(version);
    data.extend_from_slice(payload);
    base58::encode_check(&data)
}

/// Formats an OP_RETURN script as a display label, printable data in
/// parentheses and anything else as hex.
fn op_return_label(script: &Script) -> String {
    let mut instructions = script.instructions();
    instructions.next(); // OP_RETURN itself
    match instructions.next() {
        Some(Ok(Instruction::PushBytes(push))) if !push.is_empty() => {
            let data = push.as_bytes();
            if data.iter().all(|b| (0x20..0x7f).contains(b)) {
                format!("OP_RETURN ({})", String::from_utf8_lossy(data))
            } else {
                format!("OP_RETURN {}", hex::encode(data))
            }
        }
        _ => "OP_RETURN".to_string(),
    }
}
