//! Transaction model, privacy-spend normalization and JSON import.
//!
//! [`Tx`] is the shape the indexing pipeline consumes. It is produced from
//! two entry points: conversion from a wire-decoded [`bitcoin::Transaction`]
//! during raw block parsing, and [`tx_from_json`] for verbose transaction
//! JSON returned by a node's API. Both paths end in
//! [`normalize_privacy_spends`].

use bitcoin::{Amount, Denomination, OutPoint, Transaction};
use serde::{Deserialize, Deserializer, Serialize};

use crate::chain::error::ParseError;

/// Reserved previous-transaction-id marking a zerocoin/sigma spend input.
///
/// 68 zero characters, deliberately longer than the 64 hex characters of a
/// real txid so it can never collide with one.
pub const SPEND_TXID: &str =
    "00000000000000000000000000000000000000000000000000000000000000000000";

/// The kind of a transaction input, derived from its stored fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// Spends a real previous output.
    Normal,
    /// Block-reward input with no previous output.
    Coinbase,
    /// Zerocoin/sigma spend carrying the [`SPEND_TXID`] sentinel.
    PrivacySpend,
}

/// Signature script of a transaction input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptSig {
    /// Hex-encoded script bytes.
    #[serde(default)]
    pub hex: String,
}

/// Transaction input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vin {
    /// Coinbase payload; empty for inputs spending a real previous output.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub coinbase: String,
    /// Previous transaction id; empty for coinbase inputs.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub txid: String,
    /// Index of the spent output in the previous transaction.
    #[serde(default)]
    pub vout: u32,
    /// Signature script.
    #[serde(default, rename = "scriptSig")]
    pub script_sig: ScriptSig,
    /// Input sequence number.
    #[serde(default)]
    pub sequence: u32,
}

impl Vin {
    /// Classifies this input after normalization.
    pub fn kind(&self) -> InputKind {
        if self.coinbase == SPEND_TXID {
            InputKind::PrivacySpend
        } else if !self.coinbase.is_empty() {
            InputKind::Coinbase
        } else {
            InputKind::Normal
        }
    }
}

/// Output script of a transaction output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptPubKey {
    /// Hex-encoded script bytes (the address descriptor).
    #[serde(default)]
    pub hex: String,
    /// Addresses resolved from the script, when known.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub addresses: Vec<String>,
}

/// Transaction output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vout {
    /// Output amount in satoshis.
    #[serde(skip)]
    pub value_sat: u64,
    /// Decimal amount as received in JSON. Transient: [`tx_from_json`]
    /// converts it into [`Vout::value_sat`] and clears it.
    #[serde(
        default,
        rename = "value",
        deserialize_with = "deserialize_decimal",
        skip_serializing
    )]
    pub json_value: String,
    /// Output index within the transaction.
    #[serde(default)]
    pub n: u32,
    /// Output script.
    #[serde(default, rename = "scriptPubKey")]
    pub script_pub_key: ScriptPubKey,
}

/// One Index Chain transaction in the shape the indexer consumes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tx {
    /// Raw transaction hex, when available.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub hex: String,
    /// Transaction id (display order hex).
    #[serde(default)]
    pub txid: String,
    /// Transaction version.
    #[serde(default)]
    pub version: i32,
    /// Lock time.
    #[serde(default)]
    pub locktime: u32,
    /// Inputs.
    #[serde(default)]
    pub vin: Vec<Vin>,
    /// Outputs.
    #[serde(default)]
    pub vout: Vec<Vout>,
}

impl Tx {
    /// Converts a wire-decoded transaction into the indexer shape.
    ///
    /// Coinbase inputs (null previous output) carry their signature script in
    /// the `coinbase` field the way a node's verbose JSON does.
    pub fn from_raw(raw: &Transaction) -> Self {
        let vin = raw
            .input
            .iter()
            .map(|input| {
                if input.previous_output == OutPoint::null() {
                    Vin {
                        coinbase: hex::encode(input.script_sig.as_bytes()),
                        sequence: input.sequence.to_consensus_u32(),
                        ..Vin::default()
                    }
                } else {
                    Vin {
                        coinbase: String::new(),
                        txid: input.previous_output.txid.to_string(),
                        vout: input.previous_output.vout,
                        script_sig: ScriptSig {
                            hex: hex::encode(input.script_sig.as_bytes()),
                        },
                        sequence: input.sequence.to_consensus_u32(),
                    }
                }
            })
            .collect();
        let vout = raw
            .output
            .iter()
            .enumerate()
            .map(|(n, output)| Vout {
                value_sat: output.value.to_sat(),
                json_value: String::new(),
                n: n as u32,
                script_pub_key: ScriptPubKey {
                    hex: hex::encode(output.script_pubkey.as_bytes()),
                    addresses: Vec::new(),
                },
            })
            .collect();
        Tx {
            hex: hex::encode(bitcoin::consensus::serialize(raw)),
            txid: raw.compute_txid().to_string(),
            version: raw.version.0,
            locktime: raw.lock_time.to_consensus_u32(),
            vin,
            vout,
        }
    }
}

/// Rewrites zerocoin/sigma spend inputs into a coinbase-shaped form.
///
/// Every input whose txid equals [`SPEND_TXID`] has the sentinel moved into
/// its coinbase field, its txid cleared and its vout and sequence zeroed.
/// All other inputs are untouched, which also makes the pass idempotent.
pub fn normalize_privacy_spends(tx: &mut Tx) {
    for vin in &mut tx.vin {
        if vin.txid == SPEND_TXID {
            vin.coinbase = std::mem::take(&mut vin.txid);
            vin.vout = 0;
            vin.sequence = 0;
        }
    }
}

/// Parses a verbose transaction JSON document into a [`Tx`].
///
/// Output amounts arrive as decimal coin values (JSON numbers or strings);
/// each is converted to integer satoshis and the transient decimal field is
/// cleared. Privacy-spend inputs are normalized before returning.
pub fn tx_from_json(msg: &str) -> Result<Tx, ParseError> {
    let mut tx: Tx = serde_json::from_str(msg)?;
    for vout in &mut tx.vout {
        vout.value_sat = parse_decimal_amount(&vout.json_value)?;
        vout.json_value.clear();
    }
    normalize_privacy_spends(&mut tx);
    Ok(tx)
}

/// Converts a decimal coin amount (8 decimal places) to satoshis.
fn parse_decimal_amount(value: &str) -> Result<u64, ParseError> {
    Ok(Amount::from_str_in(value, Denomination::Bitcoin)?.to_sat())
}

/// Captures a JSON number or string amount as its decimal string form.
fn deserialize_decimal<'de, D: Deserializer<'de>>(de: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum DecimalLike {
        Num(serde_json::Number),
        Str(String),
    }

    Ok(match DecimalLike::deserialize(de)? {
        DecimalLike::Num(n) => n.to_string(),
        DecimalLike::Str(s) => s,
    })
}
