use solana_sdk::pubkey::Pubkey;

/// Program id of the deployed revenue splitter
pub const DEFAULT_PROGRAM_ID: Pubkey = solana_sdk::pubkey!("7SSiszqhzQ5hMKoJe2nXQGqEY9995ppBcPqEECNtQM48");

// PDA seed tags (part of the cross-version contract, never change)
pub const CONFIG_SEED: &[u8] = b"config";
pub const AUTHORITY_INFO_SEED: &[u8] = b"authority_info";
pub const SPLITTER_SEED: &[u8] = b"splitter";

// Recipient limits
pub const MIN_RECIPIENTS: usize = 1;
pub const MAX_RECIPIENTS: usize = 10;
pub const MAX_PERCENTAGE: u32 = 100;
pub const REQUIRED_SPLIT_TOTAL: u32 = 100;

// Anchor account discriminators (first 8 bytes of sha256("account:<Name>"))
pub const CONFIG_DISCRIMINATOR: [u8; 8] = [0x9b, 0x0c, 0xaa, 0xe0, 0x1e, 0xfa, 0xcc, 0x82];
pub const AUTHORITY_INFO_DISCRIMINATOR: [u8; 8] = [0xf1, 0x32, 0x34, 0xd8, 0x3a, 0x7e, 0xb2, 0x7b];
pub const SPLITTER_DISCRIMINATOR: [u8; 8] = [0xbb, 0xb1, 0x93, 0xb6, 0x2c, 0x9b, 0x82, 0xca];

// Anchor instruction discriminators (first 8 bytes of sha256("global:<name>"))
pub const DISCRIMINATOR_CREATE_AUTHORITY_INFO: [u8; 8] = [0x40, 0x69, 0x9a, 0x01, 0x26, 0x24, 0xad, 0xc1];
pub const DISCRIMINATOR_CREATE_SPLITTER: [u8; 8] = [0xab, 0x2e, 0xa3, 0x12, 0x1d, 0x14, 0x52, 0x9d];

pub const DISCRIMINATOR_LEN: usize = 8;

// Config: discriminator (8) + admin (32) + 3 fees (24) + treasury (32) + bump (1)
pub const CONFIG_SIZE: usize = 8 + 32 + 8 * 3 + 32 + 1; // 105 bytes

// AuthorityInfo: discriminator (8) + authority (32) + splitters_amount (8) + bump (1)
pub const AUTHORITY_INFO_SIZE: usize = 8 + 32 + 8 + 1; // 49 bytes

// Splitter fixed prefix:
// - discriminator: 8
// - config: 32
// - authority: 32
// - index: 8
// - recipient count: 4
pub const SPLITTER_CONFIG_OFFSET: usize = 8;
pub const SPLITTER_AUTHORITY_OFFSET: usize = 8 + 32;
pub const SPLITTER_INDEX_OFFSET: usize = 8 + 32 + 32;
pub const SPLITTER_RECIPIENTS_OFFSET: usize = 8 + 32 + 32 + 8 + 4; // 84 bytes

/// mutable (1) + bump (1), always present after the recipient entries
pub const SPLITTER_FLAGS_LEN: usize = 2;

/// Rent-exempt minimum for a zero-data system account
pub const DEFAULT_RECIPIENT_FUNDING_LAMPORTS: u64 = 890_880;

/// Longest vault name, in UTF-8 bytes, the splitter account has room for
pub const MAX_NAME_LEN: usize = 64;
