//! Block and transaction parsing for the Index Chain indexer.
//!
//! Index Chain is a Bitcoin-derived ledger whose wire format differs from
//! vanilla Bitcoin in three places: proof-of-stake block headers carry a
//! variable-length signature trailer, zerocoin/sigma privacy spends use a
//! sentinel previous-transaction-id instead of a real previous output, and a
//! small set of output scripts begin with reserved opcodes that resolve to
//! symbolic labels rather than addresses. Everything that is plain Bitcoin
//! (headers, compact sizes, witness-aware transactions, script
//! classification, amounts) is delegated to the `bitcoin` crate.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod chain;
