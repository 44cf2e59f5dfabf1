//! Program-derived addresses for splitter records
//!
//! All derivations are pure and go through the runtime's canonical bump search
//! (bump 255 downwards), so the results match what the program validates on-chain.

use solana_sdk::pubkey::Pubkey;

use crate::{
    constants::{AUTHORITY_INFO_SEED, CONFIG_SEED, SPLITTER_SEED},
    errors::{Result, SplitterError},
};

/// Off-curve address plus the bump that forced it off the curve
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ProgramAddress {
    pub address: Pubkey,
    pub bump: u8,
}

impl From<ProgramAddress> for Pubkey {
    fn from(pda: ProgramAddress) -> Self {
        pda.address
    }
}

/// Derive a program address from raw seeds
///
/// Fails with `DerivationExhausted` instead of looping when no bump yields an
/// off-curve point.
pub fn derive(program_id: &Pubkey, seeds: &[&[u8]]) -> Result<ProgramAddress> {
    Pubkey::try_find_program_address(seeds, program_id)
        .map(|(address, bump)| ProgramAddress { address, bump })
        .ok_or(SplitterError::DerivationExhausted)
}

/// Vault index seed. Always little-endian: the program reads `index.to_le_bytes()`.
pub fn index_seed(index: u64) -> [u8; 8] {
    index.to_le_bytes()
}

/// Derive the singleton config PDA
pub fn config_address(program_id: &Pubkey) -> Result<ProgramAddress> {
    derive(program_id, &[CONFIG_SEED])
}

/// Derive the per-authority counter PDA
pub fn authority_info_address(
    program_id: &Pubkey,
    config: &Pubkey,
    authority: &Pubkey,
) -> Result<ProgramAddress> {
    derive(
        program_id,
        &[AUTHORITY_INFO_SEED, config.as_ref(), authority.as_ref()],
    )
}

/// Derive the vault (splitter) PDA for the `index`-th vault of `authority`
pub fn vault_address(
    program_id: &Pubkey,
    config: &Pubkey,
    authority: &Pubkey,
    index: u64,
) -> Result<ProgramAddress> {
    derive(
        program_id,
        &[
            SPLITTER_SEED,
            config.as_ref(),
            authority.as_ref(),
            &index_seed(index),
        ],
    )
}
