//! Funds and ownership bookkeeping.
//!
//! These are plain functions over the board's player and slot storage. They
//! do no locking of their own; the room holds the board lock around every
//! call. Each fallible function validates everything first and mutates
//! only once the whole operation is known to succeed.

use crate::{CardId, GameError, Player, PlayerId, Slot};

fn ensure_non_negative(amount: i64) -> Result<(), GameError> {
    if amount < 0 {
        return Err(GameError::InvalidAmount(amount));
    }
    Ok(())
}

/// Checks that `player` could pay `amount` right now.
pub fn ensure_funds(player: &Player, amount: i64) -> Result<(), GameError> {
    ensure_non_negative(amount)?;
    if player.balance < amount {
        return Err(GameError::InsufficientFunds {
            needed: amount,
            available: player.balance,
        });
    }
    Ok(())
}

/// Bank pays the player.
pub fn credit(player: &mut Player, amount: i64) {
    player.balance += amount.max(0);
}

/// Player pays the bank.
pub fn debit(player: &mut Player, amount: i64) -> Result<(), GameError> {
    ensure_funds(player, amount)?;
    player.balance -= amount;
    Ok(())
}

/// Player at index `from` pays the player at index `to`.
pub fn transfer(
    players: &mut [Player],
    from: usize,
    to: usize,
    amount: i64,
) -> Result<(), GameError> {
    ensure_funds(&players[from], amount)?;
    if from == to {
        return Ok(());
    }
    players[from].balance -= amount;
    players[to].balance += amount;
    Ok(())
}

/// Checks that every id names a property owned by `owner`.
pub fn check_properties(
    slots: &[Slot],
    owner: PlayerId,
    ids: &[usize],
) -> Result<(), GameError> {
    for &id in ids {
        let property = slots
            .get(id)
            .and_then(Slot::as_property)
            .ok_or(GameError::NoSuchAsset)?;
        if !property.is_owned_by(owner) {
            return Err(GameError::NotOwner);
        }
    }
    Ok(())
}

/// Hands every listed property from `from` to `to`, or none of them.
pub fn move_properties(
    slots: &mut [Slot],
    from: PlayerId,
    to: PlayerId,
    ids: &[usize],
) -> Result<(), GameError> {
    check_properties(slots, from, ids)?;
    for &id in ids {
        if let Some(property) = slots[id].as_property_mut() {
            property.owner = Some(to);
        }
    }
    Ok(())
}

/// Checks that `player` holds every listed card, counting duplicates.
pub fn check_cards(player: &Player, ids: &[CardId]) -> Result<(), GameError> {
    let mut remaining = player.inventory.clone();
    for id in ids {
        let pos = remaining
            .iter()
            .position(|held| held == id)
            .ok_or(GameError::NotOwner)?;
        remaining.swap_remove(pos);
    }
    Ok(())
}

/// Hands every listed card from the player at `from` to the player at `to`,
/// or none of them.
pub fn move_cards(
    players: &mut [Player],
    from: usize,
    to: usize,
    ids: &[CardId],
) -> Result<(), GameError> {
    check_cards(&players[from], ids)?;
    if from == to {
        return Ok(());
    }
    for id in ids {
        if let Some(pos) = players[from].inventory.iter().position(|held| held == id) {
            players[from].inventory.remove(pos);
            players[to].inventory.push(*id);
        }
    }
    Ok(())
}
