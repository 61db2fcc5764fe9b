// Copyright 2022-2023 Futureverse Corporation Limited
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
// You may obtain a copy of the License at the root of this project source code

use codec::{Decode, Encode, MaxEncodedLen};
use scale_info::TypeInfo;
use sp_arithmetic::helpers_128bit::multiply_by_rational_with_rounding;
use sp_runtime::{traits::Zero, ArithmeticError, Rounding, RuntimeDebug};

pub type AssetId = u32;
pub type Balance = u128;

/// Microseconds since the unix epoch
pub type Timestamp = u64;

/// Fixed point scale applied to `acc_reward_per_share`.
///
/// The accumulator is a `u128`, so a pool may only hold as much remaining reward as still fits
/// once scaled. See `PoolInfo::ensure_accumulator_headroom`.
pub const ACC_REWARD_PRECISION: u128 = 1_000_000_000_000;

/// The (stake asset, reward asset) pair a registry of pools is keyed by.
#[derive(
	Clone, Copy, Encode, Decode, PartialEq, Eq, PartialOrd, Ord, RuntimeDebug, TypeInfo, MaxEncodedLen,
)]
pub struct AssetPair {
	pub stake_asset_id: AssetId,
	pub reward_asset_id: AssetId,
}

impl AssetPair {
	pub fn new(stake_asset_id: AssetId, reward_asset_id: AssetId) -> Self {
		Self { stake_asset_id, reward_asset_id }
	}
}

/// Per asset pair bookkeeping, created with the first pool of the pair.
#[derive(Clone, Default, Encode, Decode, PartialEq, RuntimeDebug, TypeInfo, MaxEncodedLen)]
pub struct RegistryInfo<PoolId> {
	/// Id handed to the next pool created for this pair
	pub next_pool_id: PoolId,
	/// Number of pools currently alive in this pair
	pub pool_count: u32,
}

/// The two custody accounts every pool owns.
#[derive(Clone, Copy, Encode, Decode, PartialEq, Eq, RuntimeDebug, TypeInfo, MaxEncodedLen)]
pub enum Vault {
	Stake,
	Reward,
}

/// Lifecycle stage of a pool, derived from its ledger and the current time.
#[derive(Clone, Copy, Encode, Decode, PartialEq, Eq, RuntimeDebug, TypeInfo, MaxEncodedLen)]
pub enum PoolStatus {
	/// Reward window still open
	Active,
	/// Window closed but stake or undistributed reward is still held
	Exhausted,
	/// Window closed with nothing staked and nothing left to distribute
	Empty,
}

/// Financial ledger of a single reward pool.
#[derive(Clone, Encode, Decode, PartialEq, RuntimeDebug, TypeInfo, MaxEncodedLen)]
pub struct PoolInfo<AccountId> {
	pub authority: AccountId,
	pub start_time: Timestamp,
	pub end_time: Timestamp,
	/// Reward not yet folded into `acc_reward_per_share`
	pub reward_remaining: Balance,
	pub total_staked: Balance,
	pub last_update_time: Timestamp,
	/// Cumulative reward per staked unit, scaled by `ACC_REWARD_PRECISION`
	pub acc_reward_per_share: u128,
}

impl<AccountId> PoolInfo<AccountId> {
	pub fn new(
		authority: AccountId,
		now: Timestamp,
		end_time: Timestamp,
		reward_amount: Balance,
	) -> Self {
		Self {
			authority,
			start_time: now,
			end_time,
			reward_remaining: reward_amount,
			total_staked: Zero::zero(),
			last_update_time: now,
			acc_reward_per_share: Zero::zero(),
		}
	}

	/// Advance the accumulator to `now`.
	///
	/// The reward released over the elapsed interval is its share of `reward_remaining` in
	/// proportion to the time left until `end_time`, so any change to the remaining reward or to
	/// the window only affects accrual from this point on. While nothing is staked the clock
	/// moves forward but the reward stays in `reward_remaining`.
	///
	/// Returns the amount of reward folded into the accumulator.
	pub fn accrue(&mut self, now: Timestamp) -> Result<Balance, ArithmeticError> {
		if now <= self.last_update_time || self.last_update_time >= self.end_time {
			return Ok(Zero::zero())
		}

		if self.total_staked.is_zero() {
			self.last_update_time = now;
			return Ok(Zero::zero())
		}

		let accrue_until = now.min(self.end_time);
		let duration = accrue_until - self.last_update_time;
		let time_remaining = self.end_time - self.last_update_time;

		let duration_reward = multiply_by_rational_with_rounding(
			duration.into(),
			self.reward_remaining,
			time_remaining.into(),
			Rounding::Down,
		)
		.ok_or(ArithmeticError::Overflow)?;

		let acc_increase = multiply_by_rational_with_rounding(
			duration_reward,
			ACC_REWARD_PRECISION,
			self.total_staked,
			Rounding::Down,
		)
		.ok_or(ArithmeticError::Overflow)?;

		self.acc_reward_per_share =
			self.acc_reward_per_share.checked_add(acc_increase).ok_or(ArithmeticError::Overflow)?;
		self.reward_remaining =
			self.reward_remaining.checked_sub(duration_reward).ok_or(ArithmeticError::Underflow)?;
		self.last_update_time = accrue_until;

		Ok(duration_reward)
	}

	/// Reward owed to `position` since its last checkpoint. Only meaningful once the pool has
	/// been accrued to the current time.
	pub fn pending_reward(&self, position: &UserPosition) -> Result<Balance, ArithmeticError> {
		let acc_delta = self
			.acc_reward_per_share
			.checked_sub(position.last_acc_reward_per_share)
			.ok_or(ArithmeticError::Underflow)?;

		multiply_by_rational_with_rounding(
			position.amount_staked,
			acc_delta,
			ACC_REWARD_PRECISION,
			Rounding::Down,
		)
		.ok_or(ArithmeticError::Overflow)
	}

	/// The accumulator can absorb the whole remaining reward without overflowing.
	///
	/// Each accrual adds at most `reward * ACC_REWARD_PRECISION / total_staked` and stake is
	/// counted in whole units, so releasing everything that remains raises the accumulator by
	/// at most `reward_remaining * ACC_REWARD_PRECISION`.
	pub fn ensure_accumulator_headroom(&self) -> Result<(), ArithmeticError> {
		self.reward_remaining
			.checked_mul(ACC_REWARD_PRECISION)
			.and_then(|scaled| scaled.checked_add(self.acc_reward_per_share))
			.map(|_| ())
			.ok_or(ArithmeticError::Overflow)
	}

	pub fn status(&self, now: Timestamp) -> PoolStatus {
		if now < self.end_time {
			PoolStatus::Active
		} else if self.total_staked.is_zero() && self.reward_remaining.is_zero() {
			PoolStatus::Empty
		} else {
			PoolStatus::Exhausted
		}
	}
}

/// An account's stake in a pool and its reward checkpoint.
#[derive(Clone, Default, Encode, Decode, PartialEq, RuntimeDebug, TypeInfo, MaxEncodedLen)]
pub struct UserPosition {
	pub amount_staked: Balance,
	/// `acc_reward_per_share` at the last settlement
	pub last_acc_reward_per_share: u128,
}

impl UserPosition {
	pub fn new(acc_reward_per_share: u128) -> Self {
		Self { amount_staked: Zero::zero(), last_acc_reward_per_share: acc_reward_per_share }
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const DAY: Timestamp = 86_400_000_000;
	const START: Timestamp = 1_000_000;

	fn pool(reward: Balance, days: u64) -> PoolInfo<u64> {
		PoolInfo::new(1, START, START + days * DAY, reward)
	}

	#[test]
	fn accrue_is_noop_before_time_advances() {
		let mut pool = pool(1_000, 30);
		pool.total_staked = 10;
		let before = pool.clone();

		assert_eq!(pool.accrue(START), Ok(0));
		assert_eq!(pool.accrue(START - 1), Ok(0));
		assert_eq!(pool, before);
	}

	#[test]
	fn accrue_is_noop_once_fully_accrued() {
		let mut pool = pool(1_000, 30);
		pool.total_staked = 10;
		assert_eq!(pool.accrue(START + 31 * DAY), Ok(1_000));
		assert_eq!(pool.last_update_time, pool.end_time);
		let before = pool.clone();

		assert_eq!(pool.accrue(START + 40 * DAY), Ok(0));
		assert_eq!(pool, before);
	}

	#[test]
	fn accrue_without_stakers_keeps_reward() {
		let mut pool = pool(2_000_000_000_000, 30);

		assert_eq!(pool.accrue(START + 10 * DAY), Ok(0));
		assert_eq!(pool.last_update_time, START + 10 * DAY);
		assert_eq!(pool.reward_remaining, 2_000_000_000_000);
		assert_eq!(pool.acc_reward_per_share, 0);

		// the whole reward is spread over the rest of the window
		pool.total_staked = 100;
		assert_eq!(pool.accrue(START + 30 * DAY), Ok(2_000_000_000_000));
		assert_eq!(pool.reward_remaining, 0);
	}

	#[test]
	fn accrue_one_second_of_thirty_days() {
		let mut pool = pool(2_000_000_000_000, 30);
		pool.total_staked = 100;

		assert_eq!(pool.accrue(START + 1_000_000), Ok(771_604));
		assert_eq!(pool.acc_reward_per_share, 7_716_040_000_000_000);
		assert_eq!(pool.reward_remaining, 2_000_000_000_000 - 771_604);
		assert_eq!(pool.last_update_time, START + 1_000_000);

		let position = UserPosition { amount_staked: 100, last_acc_reward_per_share: 0 };
		assert_eq!(pool.pending_reward(&position), Ok(771_604));
	}

	#[test]
	fn accrue_caps_at_end_time() {
		let mut pool = pool(1_000_000, 1);
		pool.total_staked = 3;

		assert_eq!(pool.accrue(START + 2 * DAY), Ok(1_000_000));
		assert_eq!(pool.last_update_time, START + DAY);
		// 1_000_000 * 1e12 / 3, truncated
		assert_eq!(pool.acc_reward_per_share, 333_333_333_333_333_333);
	}

	#[test]
	fn accumulator_never_decreases_and_loss_is_bounded() {
		let reward = 987_654_321_987;
		let mut pool = pool(reward, 7);
		pool.total_staked = 7_777;

		let mut accrued = 0;
		let mut steps = 0;
		let mut now = START;
		while now < START + 8 * DAY {
			now += 3_333_333_333;
			let before = pool.acc_reward_per_share;
			accrued += pool.accrue(now).unwrap();
			steps += 1;
			assert!(pool.acc_reward_per_share >= before);
		}

		assert_eq!(accrued, reward);
		assert_eq!(pool.reward_remaining, 0);

		let position = UserPosition { amount_staked: 7_777, last_acc_reward_per_share: 0 };
		let paid = pool.pending_reward(&position).unwrap();
		assert!(paid <= reward);
		assert!(reward - paid <= steps);
	}

	#[test]
	fn pending_reward_uses_checkpoint() {
		let mut pool = pool(1_000, 30);
		pool.acc_reward_per_share = 5 * ACC_REWARD_PRECISION;

		let position = UserPosition { amount_staked: 10, last_acc_reward_per_share: 2 * ACC_REWARD_PRECISION };
		assert_eq!(pool.pending_reward(&position), Ok(30));

		let fresh = UserPosition::new(pool.acc_reward_per_share);
		assert_eq!(pool.pending_reward(&fresh), Ok(0));

		let ahead = UserPosition { amount_staked: 1, last_acc_reward_per_share: 6 * ACC_REWARD_PRECISION };
		assert_eq!(pool.pending_reward(&ahead), Err(ArithmeticError::Underflow));
	}

	#[test]
	fn headroom_covers_a_single_unit_of_stake() {
		let max_reward = u128::MAX / ACC_REWARD_PRECISION;
		let mut full = pool(max_reward, 1);
		assert_eq!(full.ensure_accumulator_headroom(), Ok(()));

		// all of it lands on one staked unit
		full.total_staked = 1;
		assert_eq!(full.accrue(START + DAY), Ok(max_reward));
		assert_eq!(full.acc_reward_per_share, max_reward * ACC_REWARD_PRECISION);
		assert_eq!(full.ensure_accumulator_headroom(), Ok(()));

		full.reward_remaining = 1;
		assert_eq!(full.ensure_accumulator_headroom(), Err(ArithmeticError::Overflow));
		assert_eq!(pool(max_reward + 1, 1).ensure_accumulator_headroom(), Err(ArithmeticError::Overflow));
	}

	#[test]
	fn status_follows_window_and_balances() {
		let mut pool = pool(1_000, 1);
		assert_eq!(pool.status(START), PoolStatus::Active);
		assert_eq!(pool.status(START + DAY), PoolStatus::Exhausted);

		pool.reward_remaining = 0;
		assert_eq!(pool.status(START + DAY), PoolStatus::Empty);

		pool.total_staked = 1;
		assert_eq!(pool.status(START + DAY), PoolStatus::Exhausted);
	}
}
