use std::collections::HashSet;

use crate::{
    codec::parse_address,
    constants::{MAX_NAME_LEN, MAX_PERCENTAGE, MAX_RECIPIENTS, MIN_RECIPIENTS, REQUIRED_SPLIT_TOTAL},
    errors::ValidationError,
    state::{Recipient, RecipientInput},
};

/// Check a vault creation request locally, before any network activity
///
/// Returns the parsed recipients in input order.
pub fn validate_vault_request(
    inputs: &[RecipientInput],
    name: &str,
) -> Result<Vec<Recipient>, ValidationError> {
    let recipient_count = inputs.len();

    // Validate recipient count
    if !(MIN_RECIPIENTS..=MAX_RECIPIENTS).contains(&recipient_count) {
        return Err(ValidationError::InvalidRecipientCount(recipient_count));
    }

    // Validate each percentage before summing so the total cannot overflow
    if let Some(bad) = inputs.iter().find(|r| r.percentage > MAX_PERCENTAGE) {
        return Err(ValidationError::InvalidPercentage(bad.percentage));
    }

    let total: u64 = inputs.iter().map(|r| r.percentage as u64).sum();
    if total != REQUIRED_SPLIT_TOTAL as u64 {
        return Err(ValidationError::InvalidSplitTotal(total));
    }

    // Duplicates compare trimmed text as entered, without case folding
    let mut seen = HashSet::with_capacity(recipient_count);
    for input in inputs {
        let trimmed = input.address.trim();
        if !seen.insert(trimmed) {
            return Err(ValidationError::DuplicateRecipient(trimmed.to_string()));
        }
    }

    if name.len() > MAX_NAME_LEN {
        return Err(ValidationError::NameTooLong(name.len()));
    }

    inputs
        .iter()
        .map(|input| {
            let address = parse_address(&input.address)
                .map_err(|_| ValidationError::InvalidAddress(input.address.clone()))?;
            Ok(Recipient {
                address,
                // Bounded by MAX_PERCENTAGE above
                percentage: input.percentage as u16,
            })
        })
        .collect()
}
