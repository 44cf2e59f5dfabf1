//! Vault creation workflow and single-record reads
//!
//! `create_vault` runs five steps, each awaiting the previous:
//! 1. validate input locally
//! 2. load config, ensure the authority's counter record exists
//! 3. ensure every recipient is an existing system-owned wallet
//! 4. read the authority counter fresh and derive the vault address
//! 5. submit `create_splitter` and wait for confirmation
//!
//! Steps 1-4 only mutate ledger state after re-checking it, so the whole call
//! can be re-run after a failure there. Step 5 is never retried here.

use solana_sdk::{
    instruction::Instruction, message::Message, pubkey::Pubkey, signature::Signature,
    system_program, transaction::Transaction,
};

use crate::{
    codec::{AccountRecord, CreateSplitterArgs},
    config::ClientConfig,
    errors::{BoxError, Result, SplitterError},
    instructions::{build_create_authority_info, build_create_splitter, build_funding_transfers},
    pda::{self, ProgramAddress},
    rpc::{SplitterConnection, WalletSigner},
    scanner::{ScanReport, VaultScanner},
    state::{AuthorityInfo, Config, Recipient, RecipientInput, Vault},
    validation::validate_vault_request,
};

/// Outcome of a confirmed vault creation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VaultReceipt {
    pub signature: Signature,
    pub vault: Pubkey,
    pub index: u64,
}

pub struct VaultOrchestrator<C, W> {
    connection: C,
    wallet: W,
    program_id: Pubkey,
    recipient_funding_lamports: u64,
}

impl<C: SplitterConnection, W: WalletSigner> VaultOrchestrator<C, W> {
    pub fn new(connection: C, wallet: W, program_id: Pubkey, recipient_funding_lamports: u64) -> Self {
        Self {
            connection,
            wallet,
            program_id,
            recipient_funding_lamports,
        }
    }

    pub fn from_config(connection: C, wallet: W, config: &ClientConfig) -> Result<Self> {
        Ok(Self::new(
            connection,
            wallet,
            config.program_id()?,
            config.recipient_funding_lamports,
        ))
    }

    pub fn program_id(&self) -> &Pubkey {
        &self.program_id
    }

    pub fn authority(&self) -> Pubkey {
        self.wallet.authority()
    }

    pub fn connection(&self) -> &C {
        &self.connection
    }

    /// Create a vault for the connected authority
    pub async fn create_vault(
        &self,
        recipients: &[RecipientInput],
        mutable: bool,
        name: &str,
    ) -> Result<VaultReceipt> {
        // 1. Validate before any network activity
        let recipients = validate_vault_request(recipients, name)?;
        let args = CreateSplitterArgs {
            recipients,
            mutable,
            name: name.to_string(),
        };
        args.encode()?;

        // 2. Prerequisites
        let config_pda = pda::config_address(&self.program_id)?;
        let config = self.fetch_config().await?;
        let authority_info = self.ensure_authority_info().await?;

        // 3. Recipients must exist before the instruction can reference them
        self.ensure_recipients(&args.recipients).await?;

        // 4. Fresh counter read; never reuse one from earlier in the flow
        let (index, vault) = self.next_vault_address().await?;

        log::debug!(
            "Creating vault {} (index {}) for {}",
            vault.address,
            index,
            self.authority()
        );

        // 5. Submit; not idempotent past this point
        let authority = self.authority();
        let instruction = build_create_splitter(
            &self.program_id,
            vault.address,
            authority,
            authority_info,
            config.treasury,
            config_pda.address,
            &args,
        )?;

        let transaction = self.signed_transaction(&[instruction]).await?;

        let signature = match self.connection.send_transaction(&transaction).await {
            Ok(signature) => signature,
            Err(e) => return Err(self.classify_rejected_creation(index, e).await),
        };

        match self.connection.confirm_transaction(&signature).await {
            Ok(true) => Ok(VaultReceipt {
                signature,
                vault: vault.address,
                index,
            }),
            Ok(false) => Err(SplitterError::CreationUnconfirmed {
                signature,
                vault: vault.address,
                index,
                source: None,
            }),
            Err(e) => Err(SplitterError::CreationUnconfirmed {
                signature,
                vault: vault.address,
                index,
                source: Some(e),
            }),
        }
    }

    /// Fetch the singleton config
    pub async fn fetch_config(&self) -> Result<Config> {
        let address = pda::config_address(&self.program_id)?.address;
        self.fetch_record::<Config>(&address)
            .await?
            .ok_or(SplitterError::ConfigUnavailable(address))
    }

    /// Fetch the connected authority's counter record; always a fresh read
    pub async fn fetch_authority_info(&self) -> Result<Option<AuthorityInfo>> {
        let address = self.authority_info_address()?;
        self.fetch_record::<AuthorityInfo>(&address).await
    }

    /// Create the authority's counter record unless it already exists
    ///
    /// A failed creation is returned as-is: a concurrent initialization may
    /// already have landed, and blind retries could pay fees twice.
    pub async fn ensure_authority_info(&self) -> Result<Pubkey> {
        let config = pda::config_address(&self.program_id)?.address;
        let authority = self.authority();
        let address = pda::authority_info_address(&self.program_id, &config, &authority)?.address;

        if self.connection.get_account(&address).await.map_err(SplitterError::Network)?.is_some() {
            return Ok(address);
        }

        log::debug!("Initializing authority info {} for {}", address, authority);

        let instruction =
            build_create_authority_info(&self.program_id, address, authority, config, authority);
        self.send_and_confirm(&[instruction]).await?;

        Ok(address)
    }

    /// Fund every recipient wallet that does not exist yet, in one transaction
    ///
    /// Returns the wallets that were funded. Existing accounts must be owned by
    /// the system program.
    pub async fn ensure_recipients(&self, recipients: &[Recipient]) -> Result<Vec<Pubkey>> {
        let mut missing = Vec::new();

        for recipient in recipients {
            let account = self
                .connection
                .get_account(&recipient.address)
                .await
                .map_err(SplitterError::Network)?;

            match account {
                None => {
                    #[cfg(feature = "verbose")]
                    log::debug!("Recipient {} missing, will fund", recipient.address);

                    missing.push(recipient.address);
                }
                Some(account) if account.owner != system_program::id() => {
                    return Err(SplitterError::InvalidRecipient {
                        address: recipient.address,
                        owner: account.owner,
                    });
                }
                Some(_) => {}
            }
        }

        if !missing.is_empty() {
            log::debug!("Funding {} missing recipient(s)", missing.len());

            let transfers = build_funding_transfers(
                &self.authority(),
                &missing,
                self.recipient_funding_lamports,
            );
            self.send_and_confirm(&transfers).await?;
        }

        Ok(missing)
    }

    /// Index and address the next vault of the connected authority will get
    pub async fn next_vault_address(&self) -> Result<(u64, ProgramAddress)> {
        let config = pda::config_address(&self.program_id)?.address;
        let authority_info = self
            .fetch_authority_info()
            .await?
            .ok_or(SplitterError::AuthorityInfoUnavailable(self.authority_info_address()?))?;

        let index = authority_info.splitters_amount;
        let vault = pda::vault_address(&self.program_id, &config, &self.authority(), index)?;

        Ok((index, vault))
    }

    /// Fetch and decode a single vault; `None` if no account exists
    pub async fn fetch_vault(&self, address: &Pubkey) -> Result<Option<Vault>> {
        self.fetch_record::<Vault>(address).await
    }

    /// All vaults of the connected authority, in creation order
    pub async fn list_my_vaults(&self) -> Result<ScanReport> {
        VaultScanner::new(&self.connection, self.program_id)
            .list_for_authority(&self.authority())
            .await
    }

    fn authority_info_address(&self) -> Result<Pubkey> {
        let config = pda::config_address(&self.program_id)?.address;
        Ok(pda::authority_info_address(&self.program_id, &config, &self.authority())?.address)
    }

    async fn fetch_record<T: AccountRecord>(&self, address: &Pubkey) -> Result<Option<T>> {
        let account = self
            .connection
            .get_account(address)
            .await
            .map_err(SplitterError::Network)?;

        match account {
            Some(account) => Ok(Some(T::try_from_account_data(address, &account.data)?)),
            None => Ok(None),
        }
    }

    async fn signed_transaction(&self, instructions: &[Instruction]) -> Result<Transaction> {
        let blockhash = self
            .connection
            .get_latest_blockhash()
            .await
            .map_err(SplitterError::Network)?;

        let message = Message::new_with_blockhash(instructions, Some(&self.authority()), &blockhash);

        self.wallet
            .sign_transaction(Transaction::new_unsigned(message))
            .await
            .map_err(SplitterError::Wallet)
    }

    async fn send_and_confirm(&self, instructions: &[Instruction]) -> Result<Signature> {
        let transaction = self.signed_transaction(instructions).await?;

        let signature = self
            .connection
            .send_transaction(&transaction)
            .await
            .map_err(SplitterError::Network)?;

        let confirmed = self
            .connection
            .confirm_transaction(&signature)
            .await
            .map_err(SplitterError::Network)?;

        if !confirmed {
            return Err(SplitterError::TransactionNotConfirmed(signature));
        }
        Ok(signature)
    }

    /// A rejected creation is an index conflict if the counter moved past our index
    async fn classify_rejected_creation(&self, index: u64, error: BoxError) -> SplitterError {
        match self.fetch_authority_info().await {
            Ok(Some(info)) if info.splitters_amount > index => {
                log::debug!(
                    "Vault index {} went stale, counter is now {}",
                    index,
                    info.splitters_amount
                );
                SplitterError::IndexConflict {
                    index,
                    current: info.splitters_amount,
                }
            }
            _ => SplitterError::Network(error),
        }
    }
}
