//! Block header and full-block parsing.
//!
//! Index Chain headers are the 80-byte Bitcoin header followed, for
//! proof-of-stake blocks only, by a CompactSize-prefixed block signature.
//! A proof-of-stake block is signalled by `nonce == 0`.

use bitcoin::block::Header;
use bitcoin::consensus::Decodable;
use bitcoin::Transaction;
use tracing::debug;

use crate::chain::error::ParseError;
use crate::chain::transaction::{normalize_privacy_spends, Tx};
use crate::chain::utils::{read_bytes, CompactSize};

// Caps the tx-count preallocation against absurd declared counts.
const MIN_TX_SIZE: usize = 60;

/// A block header together with its proof-of-stake signature, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PosBlockHeader {
    /// The fixed 80-byte Bitcoin header.
    pub header: Header,
    /// Block signature; present exactly when the header is proof-of-stake.
    pub pos_signature: Option<Vec<u8>>,
}

impl PosBlockHeader {
    /// Whether this header belongs to a proof-of-stake block.
    pub fn is_proof_of_stake(&self) -> bool {
        self.header.nonce == 0
    }
}

/// A parsed block in the shape the indexing pipeline consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// Size of the raw block in bytes.
    pub size: usize,
    /// Block timestamp, unix seconds, taken from the header.
    pub time: i64,
    /// Transactions in block order, already normalized.
    pub txs: Vec<Tx>,
}

/// Parses one block header, advancing `data` past it.
///
/// Reads the fixed Bitcoin header; when its nonce is zero, also reads the
/// CompactSize-prefixed block signature that proof-of-stake blocks carry.
/// For any other nonce value no trailer bytes are consumed.
pub fn parse_block_header(data: &mut &[u8]) -> Result<PosBlockHeader, ParseError> {
    let header = Header::consensus_decode(data)?;
    let pos_signature = if header.nonce == 0 {
        let sig_len = CompactSize::read(data)?;
        Some(read_bytes(
            data,
            sig_len as usize,
            "PosBlockHeader::pos_signature",
        )?)
    } else {
        None
    };
    Ok(PosBlockHeader {
        header,
        pos_signature,
    })
}

/// Parses a raw block buffer into a [`Block`].
///
/// Decodes the header, the transaction count and that many witness-aware
/// transactions, normalizing each one. Any decode error aborts the whole
/// parse; no partial block is returned.
pub fn parse_full_block(data: &[u8]) -> Result<Block, ParseError> {
    let mut rest = data;

    let header = parse_block_header(&mut rest)?;

    let tx_count = CompactSize::read(&mut rest)?;
    let mut txs = Vec::with_capacity((tx_count as usize).min(rest.len() / MIN_TX_SIZE + 1));
    for _ in 0..tx_count {
        let raw = Transaction::consensus_decode_from_finite_reader(&mut rest)?;
        let mut tx = Tx::from_raw(&raw);
        normalize_privacy_spends(&mut tx);
        txs.push(tx);
    }

    debug!(
        size = data.len(),
        txs = txs.len(),
        pos = header.is_proof_of_stake(),
        "parsed block"
    );

    Ok(Block {
        size: data.len(),
        time: i64::from(header.header.time),
        txs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitcoin::absolute::LockTime;
    use bitcoin::block::Version;
    use bitcoin::hashes::Hash;
    use bitcoin::transaction::Version as TxVersion;
    use bitcoin::{
        Amount, BlockHash, CompactTarget, OutPoint, ScriptBuf, Sequence, Transaction, TxIn,
        TxMerkleNode, TxOut, Txid, Witness,
    };

    fn header_bytes(nonce: u32, time: u32) -> Vec<u8> {
        let header = Header {
            version: Version::from_consensus(2),
            prev_blockhash: BlockHash::all_zeros(),
            merkle_root: TxMerkleNode::all_zeros(),
            time,
            bits: CompactTarget::from_consensus(0x1e0f_fff0),
            nonce,
        };
        bitcoin::consensus::serialize(&header)
    }

    fn sample_tx() -> Transaction {
        Transaction {
            version: TxVersion::ONE,
            lock_time: LockTime::ZERO,
            input: vec![TxIn {
                previous_output: OutPoint {
                    txid: Txid::from_byte_array([0x11; 32]),
                    vout: 2,
                },
                script_sig: ScriptBuf::from_bytes(vec![0x51]),
                sequence: Sequence::MAX,
                witness: Witness::new(),
            }],
            output: vec![TxOut {
                value: Amount::from_sat(5_000),
                script_pubkey: ScriptBuf::from_bytes(vec![0x6a]),
            }],
        }
    }

    #[test]
    fn pow_header_consumes_exactly_80_bytes() {
        let mut bytes = header_bytes(7, 1_414_776_286);
        // Trailer-shaped junk after the header must not be consumed.
        bytes.extend_from_slice(&[0x03, 0xaa, 0xbb, 0xcc]);

        let mut rest: &[u8] = &bytes;
        let header = parse_block_header(&mut rest).unwrap();

        assert_eq!(bytes.len() - rest.len(), 80);
        assert_eq!(rest, &[0x03, 0xaa, 0xbb, 0xcc]);
        assert!(!header.is_proof_of_stake());
        assert_eq!(header.pos_signature, None);
    }

    #[test]
    fn pos_header_consumes_signature_trailer() {
        let mut bytes = header_bytes(0, 1_544_443_200);
        bytes.push(3);
        bytes.extend_from_slice(&[0xde, 0xad, 0xbe]);
        bytes.push(0xff); // one byte past the trailer

        let mut rest: &[u8] = &bytes;
        let header = parse_block_header(&mut rest).unwrap();

        assert_eq!(bytes.len() - rest.len(), 80 + 1 + 3);
        assert_eq!(rest, &[0xff]);
        assert!(header.is_proof_of_stake());
        assert_eq!(header.pos_signature, Some(vec![0xde, 0xad, 0xbe]));
    }

    #[test]
    fn pos_header_truncated_trailer_fails() {
        let mut bytes = header_bytes(0, 1_544_443_200);
        bytes.push(5);
        bytes.extend_from_slice(&[0xde, 0xad]);

        let mut rest: &[u8] = &bytes;
        let err = parse_block_header(&mut rest).unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedEof { expected: 5, .. }));
    }

    #[test]
    fn truncated_fixed_header_fails() {
        let bytes = header_bytes(7, 1_414_776_286);
        let mut rest: &[u8] = &bytes[..79];
        assert!(parse_block_header(&mut rest).is_err());
    }

    #[test]
    fn empty_pos_block_is_85_bytes() {
        let time = 1_544_443_200;
        let mut bytes = header_bytes(0, time);
        bytes.push(3);
        bytes.extend_from_slice(&[0x01, 0x02, 0x03]);
        bytes.push(0); // transaction count

        let block = parse_full_block(&bytes).unwrap();
        assert_eq!(block.size, 85);
        assert_eq!(block.time, i64::from(time));
        assert!(block.txs.is_empty());
    }

    #[test]
    fn block_with_one_transaction() {
        let tx = sample_tx();
        let mut bytes = header_bytes(7, 1_414_776_286);
        bytes.push(1);
        bytes.extend_from_slice(&bitcoin::consensus::serialize(&tx));

        let block = parse_full_block(&bytes).unwrap();
        assert_eq!(block.size, bytes.len());
        assert_eq!(block.txs.len(), 1);

        let parsed = &block.txs[0];
        assert_eq!(parsed.txid, tx.compute_txid().to_string());
        assert_eq!(parsed.vin[0].txid, tx.input[0].previous_output.txid.to_string());
        assert_eq!(parsed.vin[0].vout, 2);
        assert_eq!(parsed.vout[0].value_sat, 5_000);
        assert_eq!(parsed.vout[0].script_pub_key.hex, "6a");
    }

    #[test]
    fn missing_transaction_fails_whole_block() {
        let mut bytes = header_bytes(7, 1_414_776_286);
        bytes.push(1); // declares one transaction, none follows
        assert!(parse_full_block(&bytes).is_err());
    }

    #[test]
    fn coinbase_input_lands_in_coinbase_field() {
        let mut tx = sample_tx();
        tx.input[0].previous_output = OutPoint::null();
        tx.input[0].script_sig = ScriptBuf::from_bytes(vec![0x04, 0xff, 0xff, 0x00, 0x1d]);

        let mut bytes = header_bytes(7, 1_414_776_286);
        bytes.push(1);
        bytes.extend_from_slice(&bitcoin::consensus::serialize(&tx));

        let block = parse_full_block(&bytes).unwrap();
        let vin = &block.txs[0].vin[0];
        assert_eq!(vin.coinbase, "04ffff001d");
        assert_eq!(vin.txid, "");
    }
}
