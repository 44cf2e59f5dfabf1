//! In-memory ledger implementing `SplitterConnection`
//!
//! Executes system transfers and the splitter program's `create_authority_info`
//! and `create_splitter` instructions. A transaction either applies in full or
//! is rejected with no state change, like the runtime.

use std::{
    cell::RefCell,
    collections::{HashMap, HashSet},
};

use solana_sdk::{
    account::Account, hash::Hash, pubkey::Pubkey, signature::Signature, system_program,
    transaction::Transaction,
};
use splitter_client::{
    codec::{decode_authority_info, decode_config, CreateSplitterArgs},
    constants::{DISCRIMINATOR_CREATE_AUTHORITY_INFO, DISCRIMINATOR_CREATE_SPLITTER},
    pda, AccountFilter, AccountRecord, AuthorityInfo, BoxError, SplitterConnection,
};

use super::{
    accounts::{program_account, system_account},
    serialization::{serialize_authority_info, serialize_splitter},
};

/// Which connection capability was invoked
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Call {
    GetAccount,
    GetProgramAccounts,
    GetLatestBlockhash,
    SendTransaction,
    ConfirmTransaction,
}

/// Instruction kinds the ledger has executed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Executed {
    Transfer,
    CreateAuthorityInfo,
    CreateSplitter,
}

#[derive(Default)]
struct LedgerState {
    accounts: HashMap<Pubkey, Account>,
    calls: Vec<Call>,
    executed: Vec<Executed>,
    transactions: Vec<Transaction>,
    landed: HashSet<Signature>,
    /// Returned by scans regardless of filters
    unfiltered: Vec<(Pubkey, Account)>,
    /// Another client's creation lands just before ours
    race_next_splitter: bool,
    /// Reject the next creation with this message, changing nothing
    reject_next_splitter: Option<String>,
    /// Forced result for the next confirmation
    next_confirmation: Option<Result<bool, String>>,
}

pub struct MockLedger {
    program_id: Pubkey,
    state: RefCell<LedgerState>,
}

impl MockLedger {
    pub fn new(program_id: Pubkey) -> Self {
        Self {
            program_id,
            state: RefCell::new(LedgerState::default()),
        }
    }

    pub fn set_account(&self, address: Pubkey, account: Account) {
        self.state.borrow_mut().accounts.insert(address, account);
    }

    pub fn account(&self, address: &Pubkey) -> Option<Account> {
        self.state.borrow().accounts.get(address).cloned()
    }

    /// Add an account that scans return even if it fails the filters
    pub fn add_unfiltered(&self, address: Pubkey, account: Account) {
        self.state.borrow_mut().unfiltered.push((address, account));
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.borrow().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.state.borrow().calls.len()
    }

    pub fn executed(&self) -> Vec<Executed> {
        self.state.borrow().executed.clone()
    }

    pub fn executed_count(&self, kind: Executed) -> usize {
        self.state.borrow().executed.iter().filter(|e| **e == kind).count()
    }

    pub fn transactions(&self) -> Vec<Transaction> {
        self.state.borrow().transactions.clone()
    }

    pub fn race_next_splitter(&self) {
        self.state.borrow_mut().race_next_splitter = true;
    }

    pub fn reject_next_splitter(&self, message: &str) {
        self.state.borrow_mut().reject_next_splitter = Some(message.to_string());
    }

    pub fn set_next_confirmation(&self, result: Result<bool, String>) {
        self.state.borrow_mut().next_confirmation = Some(result);
    }

    fn record(&self, call: Call) {
        self.state.borrow_mut().calls.push(call);
    }

    /// Execute every instruction against a scratch copy, commit only if all succeed
    fn execute(&self, transaction: &Transaction) -> Result<Vec<Executed>, String> {
        let mut state = self.state.borrow_mut();
        let mut accounts = state.accounts.clone();
        let mut executed = Vec::new();

        if state.race_next_splitter
            && transaction.message.instructions.iter().any(|ix| {
                ix.data.starts_with(&DISCRIMINATOR_CREATE_SPLITTER)
            })
        {
            state.race_next_splitter = false;
            bump_all_counters(&mut accounts, &self.program_id);
            state.accounts = accounts.clone();
        }

        let keys = &transaction.message.account_keys;
        for ix in &transaction.message.instructions {
            let program = keys[ix.program_id_index as usize];
            let metas: Vec<Pubkey> = ix.accounts.iter().map(|i| keys[*i as usize]).collect();

            if program == system_program::id() {
                transfer(&mut accounts, &metas, &ix.data)?;
                executed.push(Executed::Transfer);
            } else if program != self.program_id {
                return Err(format!("unknown program {program}"));
            } else if ix.data == DISCRIMINATOR_CREATE_AUTHORITY_INFO {
                self.create_authority_info(&mut accounts, &metas)?;
                executed.push(Executed::CreateAuthorityInfo);
            } else if ix.data.starts_with(&DISCRIMINATOR_CREATE_SPLITTER) {
                if let Some(message) = state.reject_next_splitter.take() {
                    return Err(message);
                }
                self.create_splitter(&mut accounts, &metas, &ix.data[8..])?;
                executed.push(Executed::CreateSplitter);
            } else {
                return Err("unknown instruction".to_string());
            }
        }

        state.accounts = accounts;
        state.executed.extend_from_slice(&executed);
        Ok(executed)
    }

    fn create_authority_info(
        &self,
        accounts: &mut HashMap<Pubkey, Account>,
        metas: &[Pubkey],
    ) -> Result<(), String> {
        let (info, config, authority) = (metas[0], metas[2], metas[3]);

        let expected = pda::authority_info_address(&self.program_id, &config, &authority)
            .map_err(|e| e.to_string())?;
        if info != expected.address {
            return Err("ConstraintSeeds: authority_info".to_string());
        }
        if accounts.contains_key(&info) {
            return Err(format!("account {info} already in use"));
        }

        accounts.insert(
            info,
            program_account(
                1_000_000,
                serialize_authority_info(authority, 0, expected.bump),
                self.program_id,
            ),
        );
        Ok(())
    }

    fn create_splitter(
        &self,
        accounts: &mut HashMap<Pubkey, Account>,
        metas: &[Pubkey],
        args: &[u8],
    ) -> Result<(), String> {
        let (splitter, authority, info, treasury, config) =
            (metas[0], metas[1], metas[2], metas[3], metas[4]);
        let args = CreateSplitterArgs::decode(args).map_err(|e| e.to_string())?;

        let info_account = accounts
            .get(&info)
            .ok_or("AccountNotInitialized: authority_info")?;
        let counter = decode_authority_info(&info_account.data).map_err(|e| e.to_string())?;

        let expected = pda::vault_address(
            &self.program_id,
            &config,
            &authority,
            counter.splitters_amount,
        )
        .map_err(|e| e.to_string())?;
        if splitter != expected.address {
            return Err("ConstraintSeeds: splitter".to_string());
        }
        if accounts.contains_key(&splitter) {
            return Err(format!("account {splitter} already in use"));
        }

        for (i, recipient) in args.recipients.iter().enumerate() {
            if metas.get(6 + i) != Some(&recipient.address) {
                return Err("recipient accounts out of order".to_string());
            }
            if !accounts.contains_key(&recipient.address) {
                return Err(format!("recipient {} does not exist", recipient.address));
            }
        }

        let fee = accounts
            .get(&config)
            .map(|a| decode_config(&a.data))
            .ok_or("AccountNotInitialized: config")?
            .map_err(|e| e.to_string())?
            .creation_fee;
        debit(accounts, &authority, fee)?;
        credit(accounts, &treasury, fee);

        accounts.insert(
            splitter,
            program_account(
                1_000_000,
                serialize_splitter(
                    config,
                    authority,
                    counter.splitters_amount,
                    &args.recipients,
                    args.mutable,
                    expected.bump,
                    &args.name,
                ),
                self.program_id,
            ),
        );
        accounts.insert(
            info,
            program_account(
                1_000_000,
                serialize_authority_info(authority, counter.splitters_amount + 1, counter.bump),
                self.program_id,
            ),
        );
        Ok(())
    }
}

/// Advance every authority counter, as if another creation had landed first
fn bump_all_counters(accounts: &mut HashMap<Pubkey, Account>, program_id: &Pubkey) {
    for (address, account) in accounts.iter_mut() {
        if account.owner != *program_id {
            continue;
        }
        if let Ok(info) = AuthorityInfo::try_from_account_data(address, &account.data) {
            account.data =
                serialize_authority_info(info.authority, info.splitters_amount + 1, info.bump);
        }
    }
}

fn transfer(
    accounts: &mut HashMap<Pubkey, Account>,
    metas: &[Pubkey],
    data: &[u8],
) -> Result<(), String> {
    // SystemInstruction::Transfer: u32 variant 2, u64 lamports
    if data.len() != 12 || data[..4] != [2, 0, 0, 0] {
        return Err("unsupported system instruction".to_string());
    }
    let mut lamports = [0u8; 8];
    lamports.copy_from_slice(&data[4..12]);
    let lamports = u64::from_le_bytes(lamports);

    debit(accounts, &metas[0], lamports)?;
    credit(accounts, &metas[1], lamports);
    Ok(())
}

fn debit(accounts: &mut HashMap<Pubkey, Account>, from: &Pubkey, lamports: u64) -> Result<(), String> {
    let account = accounts.get_mut(from).ok_or(format!("payer {from} does not exist"))?;
    account.lamports = account
        .lamports
        .checked_sub(lamports)
        .ok_or(format!("insufficient lamports in {from}"))?;
    Ok(())
}

fn credit(accounts: &mut HashMap<Pubkey, Account>, to: &Pubkey, lamports: u64) {
    accounts
        .entry(*to)
        .or_insert_with(|| system_account(0))
        .lamports += lamports;
}

impl SplitterConnection for MockLedger {
    async fn get_account(&self, address: &Pubkey) -> Result<Option<Account>, BoxError> {
        self.record(Call::GetAccount);
        Ok(self.account(address))
    }

    async fn get_program_accounts(
        &self,
        program_id: &Pubkey,
        filters: &[AccountFilter],
    ) -> Result<Vec<(Pubkey, Account)>, BoxError> {
        self.record(Call::GetProgramAccounts);
        let state = self.state.borrow();

        let mut matched: Vec<(Pubkey, Account)> = state
            .accounts
            .iter()
            .filter(|(_, account)| account.owner == *program_id)
            .filter(|(_, account)| filters.iter().all(|f| f.matches(&account.data)))
            .map(|(address, account)| (*address, account.clone()))
            .collect();
        matched.extend(state.unfiltered.iter().cloned());

        Ok(matched)
    }

    async fn get_latest_blockhash(&self) -> Result<Hash, BoxError> {
        self.record(Call::GetLatestBlockhash);
        Ok(Hash::new_unique())
    }

    async fn send_transaction(&self, transaction: &Transaction) -> Result<Signature, BoxError> {
        self.record(Call::SendTransaction);

        if !transaction.is_signed() {
            return Err("transaction is not signed".into());
        }
        self.state.borrow_mut().transactions.push(transaction.clone());

        self.execute(transaction)?;

        let signature = transaction.signatures[0];
        self.state.borrow_mut().landed.insert(signature);
        Ok(signature)
    }

    async fn confirm_transaction(&self, signature: &Signature) -> Result<bool, BoxError> {
        self.record(Call::ConfirmTransaction);

        let mut state = self.state.borrow_mut();
        match state.next_confirmation.take() {
            Some(Ok(confirmed)) => Ok(confirmed),
            Some(Err(message)) => Err(message.into()),
            None => Ok(state.landed.contains(signature)),
        }
    }
}
