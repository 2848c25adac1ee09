//! Byte-level decoding of Pool and Position accounts
//!
//! Layout: 8-byte account discriminator, then fields in declaration order at
//! fixed widths, all little-endian. Buffers shorter than the record size are
//! rejected; trailing bytes are ignored.

use anchor_lang::prelude::Pubkey;
use anchor_lang::Discriminator;
use shadow_lend::health::bps_to_percent;
use shadow_lend::state::{Pool, Position, ENCRYPTED_VALUE_LEN};

use crate::error::{ClientError, ClientResult};

const DISCRIMINATOR_LEN: usize = 8;

/// Bounds-checked little-endian reader over an account buffer
struct Reader<'a> {
    account: &'static str,
    data: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    fn new(
        account: &'static str,
        data: &'a [u8],
        min_len: usize,
        discriminator: &[u8],
    ) -> ClientResult<Self> {
        if data.len() < min_len {
            return Err(ClientError::MalformedAccount {
                account,
                reason: format!("buffer is {} bytes, need {}", data.len(), min_len),
            });
        }
        if &data[..DISCRIMINATOR_LEN] != discriminator {
            return Err(ClientError::MalformedAccount {
                account,
                reason: "discriminator mismatch".to_string(),
            });
        }
        Ok(Self {
            account,
            data,
            offset: DISCRIMINATOR_LEN,
        })
    }

    fn take<const N: usize>(&mut self) -> ClientResult<[u8; N]> {
        let end = self.offset + N;
        let bytes = self
            .data
            .get(self.offset..end)
            .ok_or_else(|| ClientError::MalformedAccount {
                account: self.account,
                reason: format!("truncated at offset {}", self.offset),
            })?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        self.offset = end;
        Ok(out)
    }

    fn pubkey(&mut self) -> ClientResult<Pubkey> {
        Ok(Pubkey::new_from_array(self.take::<32>()?))
    }

    fn u16(&mut self) -> ClientResult<u16> {
        Ok(u16::from_le_bytes(self.take::<2>()?))
    }

    fn u64(&mut self) -> ClientResult<u64> {
        Ok(u64::from_le_bytes(self.take::<8>()?))
    }

    fn i64(&mut self) -> ClientResult<i64> {
        Ok(i64::from_le_bytes(self.take::<8>()?))
    }

    fn u8(&mut self) -> ClientResult<u8> {
        Ok(self.take::<1>()?[0])
    }

    fn bool(&mut self) -> ClientResult<bool> {
        match self.u8()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(ClientError::MalformedAccount {
                account: self.account,
                reason: format!("invalid bool byte {} at offset {}", other, self.offset - 1),
            }),
        }
    }
}

pub fn decode_pool(data: &[u8]) -> ClientResult<Pool> {
    let mut r = Reader::new("Pool", data, Pool::SIZE, Pool::DISCRIMINATOR)?;
    let pool = Pool {
        authority: r.pubkey()?,
        collateral_mint: r.pubkey()?,
        borrow_mint: r.pubkey()?,
        ltv_ratio: r.u16()?,
        interest_rate: r.u16()?,
        liquidation_threshold: r.u16()?,
        total_deposits: r.u64()?,
        total_borrows: r.u64()?,
        active_positions: r.u64()?,
        bump: r.u8()?,
        is_active: r.bool()?,
    };
    tracing::debug!(ltv = pool.ltv_ratio, positions = pool.active_positions, "decoded pool");
    Ok(pool)
}

pub fn encode_pool(pool: &Pool) -> Vec<u8> {
    let mut data = Vec::with_capacity(Pool::SIZE);
    data.extend_from_slice(Pool::DISCRIMINATOR);
    data.extend_from_slice(pool.authority.as_ref());
    data.extend_from_slice(pool.collateral_mint.as_ref());
    data.extend_from_slice(pool.borrow_mint.as_ref());
    data.extend_from_slice(&pool.ltv_ratio.to_le_bytes());
    data.extend_from_slice(&pool.interest_rate.to_le_bytes());
    data.extend_from_slice(&pool.liquidation_threshold.to_le_bytes());
    data.extend_from_slice(&pool.total_deposits.to_le_bytes());
    data.extend_from_slice(&pool.total_borrows.to_le_bytes());
    data.extend_from_slice(&pool.active_positions.to_le_bytes());
    data.push(pool.bump);
    data.push(pool.is_active as u8);
    data
}

pub fn decode_position(data: &[u8]) -> ClientResult<Position> {
    let mut r = Reader::new("Position", data, Position::SIZE, Position::DISCRIMINATOR)?;
    let position = Position {
        owner: r.pubkey()?,
        pool: r.pubkey()?,
        encrypted_collateral: r.take::<ENCRYPTED_VALUE_LEN>()?,
        encrypted_debt: r.take::<ENCRYPTED_VALUE_LEN>()?,
        last_update: r.i64()?,
        is_active: r.bool()?,
        bump: r.u8()?,
    };
    tracing::debug!(owner = %position.owner, "decoded position");
    Ok(position)
}

pub fn encode_position(position: &Position) -> Vec<u8> {
    let mut data = Vec::with_capacity(Position::SIZE);
    data.extend_from_slice(Position::DISCRIMINATOR);
    data.extend_from_slice(position.owner.as_ref());
    data.extend_from_slice(position.pool.as_ref());
    data.extend_from_slice(&position.encrypted_collateral);
    data.extend_from_slice(&position.encrypted_debt);
    data.extend_from_slice(&position.last_update.to_le_bytes());
    data.push(position.is_active as u8);
    data.push(position.bump);
    data
}

/// Public aggregates derived from the pool account
#[derive(Clone, Debug, PartialEq)]
pub struct ProtocolStats {
    pub total_value_locked: u64,
    pub total_borrowed: u64,
    pub active_loans: u64,
    /// Percentages for display
    pub ltv_ratio: f64,
    pub interest_rate: f64,
    pub liquidation_threshold: f64,
}

impl From<&Pool> for ProtocolStats {
    fn from(pool: &Pool) -> Self {
        Self {
            total_value_locked: pool.total_deposits,
            total_borrowed: pool.total_borrows,
            active_loans: pool.active_positions,
            ltv_ratio: bps_to_percent(pool.ltv_ratio),
            interest_rate: bps_to_percent(pool.interest_rate),
            liquidation_threshold: bps_to_percent(pool.liquidation_threshold),
        }
    }
}
