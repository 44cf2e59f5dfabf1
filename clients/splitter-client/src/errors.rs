use solana_sdk::{pubkey::Pubkey, signature::Signature};
use thiserror::Error;

/// Opaque error handed back by the connection or wallet collaborator
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub type Result<T, E = SplitterError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum SplitterError {
    #[error("Invalid vault input: {0}")]
    Validation(#[from] ValidationError),

    #[error("Program config {0} not found; the program has not been initialized")]
    ConfigUnavailable(Pubkey),

    #[error("Authority info {0} not found after initialization")]
    AuthorityInfoUnavailable(Pubkey),

    #[error("Recipient {address} is owned by {owner}, not the system program")]
    InvalidRecipient { address: Pubkey, owner: Pubkey },

    #[error("Encoding failed: {0}")]
    Encoding(String),

    #[error("Record truncated: needed {needed} bytes, {available} available")]
    TruncatedRecord { needed: usize, available: usize },

    #[error("Account discriminator does not match {expected}")]
    DiscriminatorMismatch { expected: &'static str },

    #[error("Vault index {index} is stale (authority counter is now {current}); recompute and retry")]
    IndexConflict { index: u64, current: u64 },

    #[error("Vault creation {signature} was submitted but not confirmed; check ledger state for {vault} before retrying")]
    CreationUnconfirmed {
        signature: Signature,
        vault: Pubkey,
        index: u64,
        #[source]
        source: Option<BoxError>,
    },

    #[error("Transaction {0} was not confirmed")]
    TransactionNotConfirmed(Signature),

    #[error("No off-curve address found for seeds within 256 bump attempts")]
    DerivationExhausted,

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Wallet failed to sign: {0}")]
    Wallet(#[source] BoxError),

    #[error(transparent)]
    Network(BoxError),
}

/// Local input rule that a vault creation request broke
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Recipient count must be between 1 and 10, got {0}")]
    InvalidRecipientCount(usize),

    #[error("Recipient percentages must sum to 100, got {0}")]
    InvalidSplitTotal(u64),

    #[error("Recipient percentage must be between 0 and 100, got {0}")]
    InvalidPercentage(u32),

    #[error("Duplicate recipient address {0}")]
    DuplicateRecipient(String),

    #[error("Recipient address {0:?} is not a valid public key")]
    InvalidAddress(String),

    #[error("Vault name is {0} bytes, longer than the record allows")]
    NameTooLong(usize),
}

/// Codec failure for a single buffer; never fatal for a batch
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("Record truncated: needed {needed} bytes, {available} available")]
    Truncated { needed: usize, available: usize },

    #[error("Account discriminator does not match {expected}")]
    DiscriminatorMismatch { expected: &'static str },

    #[error("Recipient address {0:?} is not a valid public key")]
    InvalidAddress(String),

    #[error("Percentage {0} does not fit in 16 bits")]
    PercentageOverflow(u32),

    #[error("Field {0} is not valid UTF-8")]
    InvalidUtf8(&'static str),

    #[error("Field {field} has {len} elements, more than a u32 length prefix holds")]
    LengthOverflow { field: &'static str, len: usize },
}

impl From<CodecError> for SplitterError {
    fn from(e: CodecError) -> Self {
        match e {
            CodecError::Truncated { needed, available } => {
                SplitterError::TruncatedRecord { needed, available }
            }
            CodecError::DiscriminatorMismatch { expected } => {
                SplitterError::DiscriminatorMismatch { expected }
            }
            other => SplitterError::Encoding(other.to_string()),
        }
    }
}
