//! Minimal ABI word handling.
//!
//! Event data payloads and call arguments are sequences of 32-byte
//! big-endian words; addresses occupy the low 20 bytes of their word.
//! Dynamic `bytes` arguments are encoded head/tail: the head word holds the
//! byte offset of the tail, the tail holds a length word followed by the
//! payload padded to a word boundary.

use alloy_primitives::{keccak256, Address, B256, U256};

pub const WORD: usize = 32;

/// First four bytes of the keccak-256 hash of a function signature.
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

/// Read word `index` of an ABI data payload as a uint256. `None` when the
/// payload is too short.
pub fn word_u256(data: &[u8], index: usize) -> Option<U256> {
    let start = index.checked_mul(WORD)?;
    let end = start.checked_add(WORD)?;
    data.get(start..end).map(U256::from_be_slice)
}

/// Read word `index` as an address (low 20 bytes of the word).
pub fn word_address(data: &[u8], index: usize) -> Option<Address> {
    let start = index.checked_mul(WORD)?;
    let end = start.checked_add(WORD)?;
    data.get(start + 12..end).map(Address::from_slice)
}

/// An indexed address parameter: the low 20 bytes of the topic.
pub fn topic_address(topic: B256) -> Address {
    Address::from_slice(&topic[12..])
}

/// An indexed numeric parameter: the topic as a big-endian integer.
pub fn topic_u256(topic: B256) -> U256 {
    U256::from_be_slice(topic.as_slice())
}

enum Arg {
    Word(B256),
    Bytes(Vec<u8>),
}

/// Builds selector-prefixed calldata from static words and dynamic bytes.
pub struct CallEncoder {
    selector: [u8; 4],
    args: Vec<Arg>,
}

impl CallEncoder {
    pub fn new(signature: &str) -> Self {
        Self {
            selector: selector(signature),
            args: Vec::new(),
        }
    }

    pub fn address(mut self, value: Address) -> Self {
        self.args.push(Arg::Word(value.into_word()));
        self
    }

    pub fn uint(mut self, value: U256) -> Self {
        self.args.push(Arg::Word(B256::from(value.to_be_bytes::<32>())));
        self
    }

    pub fn bytes(mut self, value: Vec<u8>) -> Self {
        self.args.push(Arg::Bytes(value));
        self
    }

    pub fn encode(self) -> Vec<u8> {
        let head_len = self.args.len() * WORD;
        let mut head = Vec::with_capacity(head_len);
        let mut tail: Vec<u8> = Vec::new();

        for arg in &self.args {
            match arg {
                Arg::Word(w) => head.extend_from_slice(w.as_slice()),
                Arg::Bytes(b) => {
                    let offset = U256::from(head_len + tail.len());
                    head.extend_from_slice(&offset.to_be_bytes::<32>());
                    tail.extend_from_slice(&U256::from(b.len()).to_be_bytes::<32>());
                    tail.extend_from_slice(b);
                    let pad = (WORD - b.len() % WORD) % WORD;
                    tail.extend(std::iter::repeat(0u8).take(pad));
                }
            }
        }

        let mut out = Vec::with_capacity(4 + head_len + tail.len());
        out.extend_from_slice(&self.selector);
        out.extend_from_slice(&head);
        out.extend_from_slice(&tail);
        out
    }
}
