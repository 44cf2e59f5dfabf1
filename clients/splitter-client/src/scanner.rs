use solana_sdk::pubkey::Pubkey;

use crate::{
    codec::AccountRecord,
    constants::{SPLITTER_AUTHORITY_OFFSET, SPLITTER_DISCRIMINATOR},
    errors::{Result, SplitterError},
    rpc::{AccountFilter, SplitterConnection},
    state::Vault,
};

/// Vaults found by a scan, plus how many candidates could not be decoded
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// Ascending by index
    pub vaults: Vec<Vault>,
    pub skipped: usize,
}

/// Enumerates the vaults of an authority straight from program accounts
pub struct VaultScanner<C> {
    connection: C,
    program_id: Pubkey,
}

impl<C: SplitterConnection> VaultScanner<C> {
    pub fn new(connection: C, program_id: Pubkey) -> Self {
        Self {
            connection,
            program_id,
        }
    }

    /// Splitter discriminator at 0, authority at its fixed offset
    pub fn filters_for(authority: &Pubkey) -> Vec<AccountFilter> {
        vec![
            AccountFilter::memcmp(0, SPLITTER_DISCRIMINATOR),
            AccountFilter::memcmp(SPLITTER_AUTHORITY_OFFSET, authority.to_bytes()),
        ]
    }

    /// Decode every vault owned by `authority`
    ///
    /// Records that fail to decode are logged and counted, never fatal.
    /// Only a failed fetch aborts the scan.
    pub async fn list_for_authority(&self, authority: &Pubkey) -> Result<ScanReport> {
        let candidates = self
            .connection
            .get_program_accounts(&self.program_id, &Self::filters_for(authority))
            .await
            .map_err(SplitterError::Network)?;

        let mut report = ScanReport::default();

        for (address, account) in candidates {
            match Vault::try_from_account_data(&address, &account.data) {
                Ok(vault) if vault.authority == *authority => report.vaults.push(vault),
                Ok(vault) => {
                    log::warn!(
                        "Skipping splitter {}: authority {} does not match {}",
                        address,
                        vault.authority,
                        authority
                    );
                    report.skipped += 1;
                }
                Err(e) => {
                    log::warn!("Skipping splitter {}: {}", address, e);
                    report.skipped += 1;
                }
            }
        }

        report.vaults.sort_by_key(|vault| vault.index);

        log::debug!(
            "Found {} vault(s) for {}, skipped {}",
            report.vaults.len(),
            authority,
            report.skipped
        );

        Ok(report)
    }
}
