use std::fmt;

use solana_sdk::pubkey::Pubkey;

/// Global program configuration (single instance)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Admin allowed to change fees and treasury
    pub admin: Pubkey,
    /// Fee charged on vault creation, in lamports
    pub creation_fee: u64,
    /// Fee charged on deposit, in lamports
    pub deposit_fee: u64,
    /// Fee charged on vault update, in lamports
    pub update_fee: u64,
    /// Wallet that receives fees
    pub treasury: Pubkey,
    pub bump: u8,
}

/// Per-authority vault counter
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthorityInfo {
    pub authority: Pubkey,
    /// Number of vaults this authority has created; also the next vault index
    pub splitters_amount: u64,
    pub bump: u8,
}

/// Recipient as stored on-chain
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Recipient {
    pub address: Pubkey,
    /// Whole percent, 0-100
    pub percentage: u16,
}

/// Recipient as entered by the caller, before parsing
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecipientInput {
    /// Base58 address; surrounding whitespace is ignored
    pub address: String,
    pub percentage: u32,
}

impl RecipientInput {
    pub fn new(address: impl Into<String>, percentage: u32) -> Self {
        Self {
            address: address.into(),
            percentage,
        }
    }
}

impl From<&Recipient> for RecipientInput {
    fn from(recipient: &Recipient) -> Self {
        Self::new(recipient.address.to_string(), recipient.percentage as u32)
    }
}

/// Width of the percentage field in a stored recipient entry
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VaultFormat {
    /// u16 percentages, optional trailing name
    Current,
    /// u8 percentages, written by early program versions
    Legacy,
}

impl VaultFormat {
    pub fn percentage_width(self) -> usize {
        match self {
            VaultFormat::Current => 2,
            VaultFormat::Legacy => 1,
        }
    }

    /// Bytes taken by one recipient entry
    pub fn entry_len(self) -> usize {
        32 + self.percentage_width()
    }
}

impl fmt::Display for VaultFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VaultFormat::Current => write!(f, "current (u16 percentages)"),
            VaultFormat::Legacy => write!(f, "legacy (u8 percentages)"),
        }
    }
}

/// Splitter vault record, decoded
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Vault {
    /// The vault's own PDA
    pub address: Pubkey,
    pub config: Pubkey,
    pub authority: Pubkey,
    /// Creation order per authority, starting at 0
    pub index: u64,
    pub recipients: Vec<Recipient>,
    pub mutable: bool,
    pub bump: u8,
    /// Empty when the record predates names
    pub name: String,
    /// Layout the record was decoded with
    pub format: VaultFormat,
    /// Set when both percentage widths produced a consistent record
    pub format_ambiguous: bool,
}

impl Vault {
    pub fn total_percentage(&self) -> u32 {
        self.recipients.iter().map(|r| r.percentage as u32).sum()
    }
}
