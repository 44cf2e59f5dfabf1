//! Byte codec for splitter instruction arguments and account records
//!
//! Instruction arguments are written in the program's borsh layout. Account
//! records are read with a bounds-checked cursor; every read past the end of a
//! buffer is a `CodecError::Truncated`, never a panic.
//!
//! Splitter records exist in two layouts that carry no version tag:
//! - current: u16 percentages, optional trailing name
//! - legacy: u8 percentages, no name
//!
//! The decoder tries the current layout first and falls back to the legacy one.
//! A layout is accepted only if it fits the buffer and yields a record the
//! program could have written (known mutability byte, shares summing to 100).
//! When the legacy reading wins but the buffer could also be a current record
//! cut short, the vault is flagged `format_ambiguous`.

use std::str::FromStr;

use solana_sdk::pubkey::Pubkey;

use crate::{
    constants::{
        AUTHORITY_INFO_DISCRIMINATOR, CONFIG_DISCRIMINATOR, DISCRIMINATOR_LEN, MAX_RECIPIENTS,
        MIN_RECIPIENTS, REQUIRED_SPLIT_TOTAL, SPLITTER_DISCRIMINATOR, SPLITTER_FLAGS_LEN,
    },
    errors::CodecError,
    state::{AuthorityInfo, Config, Recipient, RecipientInput, Vault, VaultFormat},
};

/// Arguments of the `create_splitter` instruction
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreateSplitterArgs {
    pub recipients: Vec<Recipient>,
    pub mutable: bool,
    pub name: String,
}

impl CreateSplitterArgs {
    /// Parse caller input into typed arguments
    pub fn from_inputs(
        inputs: &[RecipientInput],
        mutable: bool,
        name: impl Into<String>,
    ) -> Result<Self, CodecError> {
        let recipients = inputs
            .iter()
            .map(|input| {
                let address = parse_address(&input.address)?;
                let percentage = u16::try_from(input.percentage)
                    .map_err(|_| CodecError::PercentageOverflow(input.percentage))?;
                Ok(Recipient {
                    address,
                    percentage,
                })
            })
            .collect::<Result<Vec<_>, CodecError>>()?;

        Ok(Self {
            recipients,
            mutable,
            name: name.into(),
        })
    }

    /// Serialize without the instruction discriminator
    ///
    /// Layout:
    /// - 4 bytes: recipient count (u32 LE)
    /// - per recipient: 32 bytes address + 2 bytes percentage (u16 LE)
    /// - 1 byte: mutable
    /// - 4 bytes: name length (u32 LE) + UTF-8 name
    pub fn encode(&self) -> Result<Vec<u8>, CodecError> {
        let count = length_prefix("recipients", self.recipients.len())?;
        let name_len = length_prefix("name", self.name.len())?;

        let mut data =
            Vec::with_capacity(4 + self.recipients.len() * 34 + 1 + 4 + self.name.len());

        data.extend_from_slice(&count.to_le_bytes());
        for recipient in &self.recipients {
            data.extend_from_slice(recipient.address.as_ref());
            data.extend_from_slice(&recipient.percentage.to_le_bytes());
        }

        data.push(self.mutable as u8);

        data.extend_from_slice(&name_len.to_le_bytes());
        data.extend_from_slice(self.name.as_bytes());

        Ok(data)
    }

    /// Inverse of [`CreateSplitterArgs::encode`]
    pub fn decode(data: &[u8]) -> Result<Self, CodecError> {
        let mut cur = ByteCursor::new(data);

        let count = cur.read_u32()? as usize;
        cur.require(count.saturating_mul(VaultFormat::Current.entry_len()))?;

        let mut recipients = Vec::with_capacity(count);
        for _ in 0..count {
            recipients.push(Recipient {
                address: cur.read_pubkey()?,
                percentage: cur.read_u16()?,
            });
        }

        let mutable = cur.read_bool()?;
        let name = cur.read_string("name")?;

        Ok(Self {
            recipients,
            mutable,
            name,
        })
    }
}

/// Encode `create_splitter` arguments straight from caller input
pub fn encode_create_splitter_args(
    inputs: &[RecipientInput],
    mutable: bool,
    name: &str,
) -> Result<Vec<u8>, CodecError> {
    CreateSplitterArgs::from_inputs(inputs, mutable, name)?.encode()
}

pub fn decode_create_splitter_args(data: &[u8]) -> Result<CreateSplitterArgs, CodecError> {
    CreateSplitterArgs::decode(data)
}

/// Parse a base58 address, ignoring surrounding whitespace
pub fn parse_address(address: &str) -> Result<Pubkey, CodecError> {
    Pubkey::from_str(address.trim()).map_err(|_| CodecError::InvalidAddress(address.to_string()))
}

fn length_prefix(field: &'static str, len: usize) -> Result<u32, CodecError> {
    u32::try_from(len).map_err(|_| CodecError::LengthOverflow { field, len })
}

/// An account type the program owns, recognised by its discriminator
pub trait AccountRecord: Sized {
    const DISCRIMINATOR: [u8; 8];
    const NAME: &'static str;

    /// Decode the fields following the discriminator
    fn decode_fields(address: &Pubkey, data: &[u8]) -> Result<Self, CodecError>;

    /// Verify the discriminator, then decode
    fn try_from_account_data(address: &Pubkey, data: &[u8]) -> Result<Self, CodecError> {
        check_discriminator(data, &Self::DISCRIMINATOR, Self::NAME)?;
        Self::decode_fields(address, data)
    }
}

/// Compare the 8-byte prefix of `data` against `expected`
pub fn check_discriminator(
    data: &[u8],
    expected: &[u8; 8],
    name: &'static str,
) -> Result<(), CodecError> {
    let prefix = data.get(..DISCRIMINATOR_LEN).ok_or(CodecError::Truncated {
        needed: DISCRIMINATOR_LEN,
        available: data.len(),
    })?;

    if prefix != expected {
        return Err(CodecError::DiscriminatorMismatch { expected: name });
    }
    Ok(())
}

impl AccountRecord for Config {
    const DISCRIMINATOR: [u8; 8] = CONFIG_DISCRIMINATOR;
    const NAME: &'static str = "Config";

    fn decode_fields(_address: &Pubkey, data: &[u8]) -> Result<Self, CodecError> {
        decode_config(data)
    }
}

impl AccountRecord for AuthorityInfo {
    const DISCRIMINATOR: [u8; 8] = AUTHORITY_INFO_DISCRIMINATOR;
    const NAME: &'static str = "AuthorityInfo";

    fn decode_fields(_address: &Pubkey, data: &[u8]) -> Result<Self, CodecError> {
        decode_authority_info(data)
    }
}

impl AccountRecord for Vault {
    const DISCRIMINATOR: [u8; 8] = SPLITTER_DISCRIMINATOR;
    const NAME: &'static str = "Splitter";

    fn decode_fields(address: &Pubkey, data: &[u8]) -> Result<Self, CodecError> {
        decode_vault(address, data)
    }
}

/// Decode a Config account (discriminator skipped, not checked)
pub fn decode_config(data: &[u8]) -> Result<Config, CodecError> {
    let mut cur = ByteCursor::new(data);
    cur.skip(DISCRIMINATOR_LEN)?;

    Ok(Config {
        admin: cur.read_pubkey()?,
        creation_fee: cur.read_u64()?,
        deposit_fee: cur.read_u64()?,
        update_fee: cur.read_u64()?,
        treasury: cur.read_pubkey()?,
        bump: cur.read_u8()?,
    })
}

/// Decode an AuthorityInfo account (discriminator skipped, not checked)
pub fn decode_authority_info(data: &[u8]) -> Result<AuthorityInfo, CodecError> {
    let mut cur = ByteCursor::new(data);
    cur.skip(DISCRIMINATOR_LEN)?;

    Ok(AuthorityInfo {
        authority: cur.read_pubkey()?,
        splitters_amount: cur.read_u64()?,
        bump: cur.read_u8()?,
    })
}

/// Recipient entries and trailing fields of a splitter record
struct SplitterBody {
    recipients: Vec<Recipient>,
    mutable: bool,
    bump: u8,
    name: String,
}

/// Decode a Splitter account (discriminator skipped, not checked)
///
/// `address` is the account's own address, carried into the result.
pub fn decode_vault(address: &Pubkey, data: &[u8]) -> Result<Vault, CodecError> {
    let mut cur = ByteCursor::new(data);
    cur.skip(DISCRIMINATOR_LEN)?;

    let config = cur.read_pubkey()?;
    let authority = cur.read_pubkey()?;
    let index = cur.read_u64()?;
    let count = cur.read_u32()? as usize;

    let current = probe_splitter_body(cur.clone(), count, VaultFormat::Current);
    let legacy = probe_splitter_body(cur.clone(), count, VaultFormat::Legacy);

    let (format, body, format_ambiguous) = match (current, legacy) {
        (Probe::Decoded(body), legacy) => {
            (VaultFormat::Current, body, matches!(legacy, Probe::Decoded(_)))
        }
        // Entries and flags matched, so this is a current record with a damaged name
        (Probe::NameFailed(e), _) => return Err(e),
        // Current entries are all there but its flags are cut off: the legacy
        // reading may be a truncated current record
        (Probe::EntriesOnly(_), Probe::Decoded(body)) => (VaultFormat::Legacy, body, true),
        (Probe::Mismatch(_), Probe::Decoded(body)) => (VaultFormat::Legacy, body, false),
        (Probe::EntriesOnly(e) | Probe::Mismatch(e), _) => return Err(e),
    };

    if format_ambiguous {
        log::warn!(
            "Splitter {} fits both percentage widths, decoded as {}",
            address,
            format
        );
    }

    Ok(Vault {
        address: *address,
        config,
        authority,
        index,
        recipients: body.recipients,
        mutable: body.mutable,
        bump: body.bump,
        name: body.name,
        format,
        format_ambiguous,
    })
}

/// How far one percentage width got through the recipient section
enum Probe {
    Decoded(SplitterBody),
    /// Entries fit and sum to 100, then the buffer ends before the flag bytes
    EntriesOnly(CodecError),
    /// Entries and flags are consistent, the trailing name is not
    NameFailed(CodecError),
    Mismatch(CodecError),
}

fn probe_splitter_body(mut cur: ByteCursor<'_>, count: usize, format: VaultFormat) -> Probe {
    let recipients = match read_entries(&mut cur, count, format) {
        Ok(recipients) => recipients,
        Err(e) => return Probe::Mismatch(e),
    };

    let [mutable, bump] = match cur.take_array::<SPLITTER_FLAGS_LEN>() {
        Ok(flags) => flags,
        Err(e) => return Probe::EntriesOnly(e),
    };
    let mutable = match mutable {
        0 => false,
        1 => true,
        _ => return Probe::Mismatch(cur.inconsistent()),
    };

    let name = match format {
        VaultFormat::Current => match read_optional_name(&mut cur) {
            Ok(name) => name,
            Err(e) => return Probe::NameFailed(e),
        },
        VaultFormat::Legacy => String::new(),
    };

    Probe::Decoded(SplitterBody {
        recipients,
        mutable,
        bump,
        name,
    })
}

/// Recipient entries at the given width; must be 1-10 entries summing to 100
fn read_entries(
    cur: &mut ByteCursor<'_>,
    count: usize,
    format: VaultFormat,
) -> Result<Vec<Recipient>, CodecError> {
    // All entries must fit before anything is read
    let span = count.checked_mul(format.entry_len()).unwrap_or(usize::MAX);
    cur.require(span)?;

    let mut recipients = Vec::with_capacity(count);
    for _ in 0..count {
        let address = cur.read_pubkey()?;
        let percentage = match format {
            VaultFormat::Current => cur.read_u16()?,
            VaultFormat::Legacy => cur.read_u8()? as u16,
        };
        recipients.push(Recipient {
            address,
            percentage,
        });
    }

    let total: u32 = recipients.iter().map(|r| r.percentage as u32).sum();
    if !(MIN_RECIPIENTS..=MAX_RECIPIENTS).contains(&count) || total != REQUIRED_SPLIT_TOTAL {
        return Err(cur.inconsistent());
    }
    Ok(recipients)
}

/// Trailing name: absent or zero padding reads as empty, a partial field is truncation
fn read_optional_name(cur: &mut ByteCursor<'_>) -> Result<String, CodecError> {
    let rest = cur.rest();
    if rest.len() < 4 {
        if rest.iter().all(|b| *b == 0) {
            return Ok(String::new());
        }
        return Err(CodecError::Truncated {
            needed: cur.position() + 4,
            available: cur.len(),
        });
    }
    cur.read_string("name")
}

/// Bounds-checked read cursor over account or instruction data
#[derive(Clone)]
struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn len(&self) -> usize {
        self.data.len()
    }

    fn position(&self) -> usize {
        self.pos
    }

    fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    fn rest(&self) -> &'a [u8] {
        self.data.get(self.pos..).unwrap_or(&[])
    }

    /// Fail unless `n` more bytes are available
    fn require(&self, n: usize) -> Result<(), CodecError> {
        if n > self.remaining() {
            return Err(CodecError::Truncated {
                needed: self.pos.saturating_add(n),
                available: self.data.len(),
            });
        }
        Ok(())
    }

    /// A layout that fits the buffer but not the record's invariants.
    /// Reported as truncation: the layout does not describe this buffer.
    fn inconsistent(&self) -> CodecError {
        CodecError::Truncated {
            needed: self.data.len() + 1,
            available: self.data.len(),
        }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], CodecError> {
        self.require(n)?;
        let bytes = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    fn take_array<const N: usize>(&mut self) -> Result<[u8; N], CodecError> {
        let mut buf = [0u8; N];
        buf.copy_from_slice(self.take(N)?);
        Ok(buf)
    }

    fn skip(&mut self, n: usize) -> Result<(), CodecError> {
        self.take(n).map(|_| ())
    }

    fn read_u8(&mut self) -> Result<u8, CodecError> {
        Ok(self.take_array::<1>()?[0])
    }

    fn read_bool(&mut self) -> Result<bool, CodecError> {
        Ok(self.read_u8()? != 0)
    }

    fn read_u16(&mut self) -> Result<u16, CodecError> {
        Ok(u16::from_le_bytes(self.take_array()?))
    }

    fn read_u32(&mut self) -> Result<u32, CodecError> {
        Ok(u32::from_le_bytes(self.take_array()?))
    }

    fn read_u64(&mut self) -> Result<u64, CodecError> {
        Ok(u64::from_le_bytes(self.take_array()?))
    }

    fn read_pubkey(&mut self) -> Result<Pubkey, CodecError> {
        Ok(Pubkey::new_from_array(self.take_array()?))
    }

    /// u32 length prefix followed by UTF-8 bytes
    fn read_string(&mut self, field: &'static str) -> Result<String, CodecError> {
        let len = self.read_u32()? as usize;
        let bytes = self.take(len)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| CodecError::InvalidUtf8(field))
    }
}
