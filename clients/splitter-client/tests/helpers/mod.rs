//! Test helpers for splitter client integration tests
//!
//! `MockLedger` stands in for the RPC connection and executes the splitter
//! program's instructions against an in-memory account map.

#![allow(dead_code)]

pub mod ledger;

pub use accounts::*;
pub use ledger::*;
pub use serialization::*;
pub use wallet::*;

use solana_sdk::pubkey::Pubkey;
use splitter_client::{
    constants::{DEFAULT_PROGRAM_ID, DEFAULT_RECIPIENT_FUNDING_LAMPORTS},
    pda, VaultOrchestrator, WalletSigner,
};

pub const PROGRAM_ID: Pubkey = DEFAULT_PROGRAM_ID;

pub const CREATION_FEE: u64 = 10_000_000;
pub const AUTHORITY_LAMPORTS: u64 = 100_000_000_000;

/// Ledger with an initialized program config and a funded authority wallet
pub fn setup_ledger() -> (MockLedger, KeypairWallet) {
    let ledger = MockLedger::new(PROGRAM_ID);
    let wallet = KeypairWallet::new();

    let (config, config_bump) = {
        let pda = pda::config_address(&PROGRAM_ID).unwrap();
        (pda.address, pda.bump)
    };
    let treasury = Pubkey::new_unique();

    ledger.set_account(
        config,
        program_account(
            1_000_000,
            serialize_config(Pubkey::new_unique(), CREATION_FEE, 0, 0, treasury, config_bump),
            PROGRAM_ID,
        ),
    );
    ledger.set_account(treasury, system_account(1_000_000));
    ledger.set_account(wallet.authority(), system_account(AUTHORITY_LAMPORTS));

    (ledger, wallet)
}

/// Orchestrator over a borrowed ledger
pub fn orchestrator<'a>(
    ledger: &'a MockLedger,
    wallet: &KeypairWallet,
) -> VaultOrchestrator<&'a MockLedger, KeypairWallet> {
    VaultOrchestrator::new(
        ledger,
        wallet.clone(),
        PROGRAM_ID,
        DEFAULT_RECIPIENT_FUNDING_LAMPORTS,
    )
}
