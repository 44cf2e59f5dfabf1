//! Capabilities the client borrows from its host: a ledger connection and a wallet
//!
//! Transport, endpoint selection, retries and timeouts all live behind these
//! traits. Every error they return is passed through unchanged.

use solana_sdk::{
    account::Account, hash::Hash, pubkey::Pubkey, signature::Signature,
    transaction::Transaction,
};

use crate::errors::BoxError;

/// Server-side filter for program account scans
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AccountFilter {
    /// Account data at `offset` equals `bytes`
    Memcmp { offset: usize, bytes: Vec<u8> },
}

impl AccountFilter {
    pub fn memcmp(offset: usize, bytes: impl Into<Vec<u8>>) -> Self {
        AccountFilter::Memcmp {
            offset,
            bytes: bytes.into(),
        }
    }

    /// Evaluate the filter locally
    pub fn matches(&self, data: &[u8]) -> bool {
        match self {
            AccountFilter::Memcmp { offset, bytes } => offset
                .checked_add(bytes.len())
                .and_then(|end| data.get(*offset..end))
                .is_some_and(|window| window == bytes.as_slice()),
        }
    }
}

/// Read and submit access to the ledger
pub trait SplitterConnection {
    /// `None` when no account exists at `address`
    async fn get_account(&self, address: &Pubkey) -> Result<Option<Account>, BoxError>;

    /// All accounts owned by `program_id` matching every filter, in no particular order
    async fn get_program_accounts(
        &self,
        program_id: &Pubkey,
        filters: &[AccountFilter],
    ) -> Result<Vec<(Pubkey, Account)>, BoxError>;

    async fn get_latest_blockhash(&self) -> Result<Hash, BoxError>;

    async fn send_transaction(&self, transaction: &Transaction) -> Result<Signature, BoxError>;

    /// `Ok(false)` when the transaction expired or failed instead of confirming
    async fn confirm_transaction(&self, signature: &Signature) -> Result<bool, BoxError>;
}

impl<T: SplitterConnection> SplitterConnection for &T {
    async fn get_account(&self, address: &Pubkey) -> Result<Option<Account>, BoxError> {
        (**self).get_account(address).await
    }

    async fn get_program_accounts(
        &self,
        program_id: &Pubkey,
        filters: &[AccountFilter],
    ) -> Result<Vec<(Pubkey, Account)>, BoxError> {
        (**self).get_program_accounts(program_id, filters).await
    }

    async fn get_latest_blockhash(&self) -> Result<Hash, BoxError> {
        (**self).get_latest_blockhash().await
    }

    async fn send_transaction(&self, transaction: &Transaction) -> Result<Signature, BoxError> {
        (**self).send_transaction(transaction).await
    }

    async fn confirm_transaction(&self, signature: &Signature) -> Result<bool, BoxError> {
        (**self).confirm_transaction(signature).await
    }
}

/// The connected wallet: the current authority and its signing capability
pub trait WalletSigner {
    fn authority(&self) -> Pubkey;

    async fn sign_transaction(&self, transaction: Transaction) -> Result<Transaction, BoxError>;
}
