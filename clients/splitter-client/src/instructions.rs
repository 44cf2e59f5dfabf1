//! Instruction builders for the splitter program
//!
//! Account order must match the program's account contexts exactly.

use solana_sdk::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
    system_instruction, system_program,
};

use crate::{
    codec::CreateSplitterArgs,
    constants::{DISCRIMINATOR_CREATE_AUTHORITY_INFO, DISCRIMINATOR_CREATE_SPLITTER},
    errors::CodecError,
};

/// Build create_authority_info instruction
///
/// Accounts:
/// 0. authority_info (writable) - PDA to initialize
/// 1. payer (writable, signer)
/// 2. config (readonly)
/// 3. authority (signer)
/// 4. system_program
pub fn build_create_authority_info(
    program_id: &Pubkey,
    authority_info: Pubkey,
    payer: Pubkey,
    config: Pubkey,
    authority: Pubkey,
) -> Instruction {
    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(authority_info, false),
            AccountMeta::new(payer, true),
            AccountMeta::new_readonly(config, false),
            AccountMeta::new_readonly(authority, true),
            AccountMeta::new_readonly(system_program::id(), false),
        ],
        data: DISCRIMINATOR_CREATE_AUTHORITY_INFO.to_vec(),
    }
}

/// Build create_splitter instruction
///
/// Accounts:
/// 0. splitter (writable) - PDA to initialize
/// 1. authority (writable, signer) - pays rent and the creation fee
/// 2. authority_info (writable) - counter advanced by the program
/// 3. treasury (writable) - receives the creation fee
/// 4. config (readonly)
/// 5. system_program
/// remaining_accounts: recipient wallets, in recipient order
pub fn build_create_splitter(
    program_id: &Pubkey,
    splitter: Pubkey,
    authority: Pubkey,
    authority_info: Pubkey,
    treasury: Pubkey,
    config: Pubkey,
    args: &CreateSplitterArgs,
) -> Result<Instruction, CodecError> {
    let encoded = args.encode()?;

    let mut data = Vec::with_capacity(8 + encoded.len());
    data.extend_from_slice(&DISCRIMINATOR_CREATE_SPLITTER);
    data.extend_from_slice(&encoded);

    let mut accounts = vec![
        AccountMeta::new(splitter, false),
        AccountMeta::new(authority, true),
        AccountMeta::new(authority_info, false),
        AccountMeta::new(treasury, false),
        AccountMeta::new_readonly(config, false),
        AccountMeta::new_readonly(system_program::id(), false),
    ];

    // Add recipient wallets as remaining_accounts
    for recipient in &args.recipients {
        accounts.push(AccountMeta::new_readonly(recipient.address, false));
    }

    Ok(Instruction {
        program_id: *program_id,
        accounts,
        data,
    })
}

/// One system transfer per missing recipient, all paid by `payer`
pub fn build_funding_transfers(
    payer: &Pubkey,
    recipients: &[Pubkey],
    lamports: u64,
) -> Vec<Instruction> {
    recipients
        .iter()
        .map(|recipient| system_instruction::transfer(payer, recipient, lamports))
        .collect()
}
