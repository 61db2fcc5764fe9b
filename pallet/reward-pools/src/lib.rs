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

//! # Pallet Reward Pools
//!
//! Time bounded staking pools. An authority funds a pool with a reward asset and a closing
//! time; holders of the stake asset lock it in the pool and earn the reward pro rata to their
//! stake for as long as it is locked.
//!
//! Accrual is lazy. Each pool carries `acc_reward_per_share`, the reward earned by one staked
//! unit since the pool was created, and every position stores the value it last settled at.
//! Any call touching a pool first advances the accumulator to the current time, so settling a
//! position is O(1) no matter how many other accounts are staked.
//!
//! Pools are grouped by their (stake asset, reward asset) pair; ids are allocated per pair.
#![cfg_attr(not(feature = "std"), no_std)]

pub use pallet::*;

#[cfg(feature = "runtime-benchmarks")]
use frame_support::traits::fungibles::Create;
use frame_support::{
	pallet_prelude::*,
	traits::{
		fungibles::{Inspect, Mutate},
		tokens::Preservation,
		UnixTime,
	},
	transactional, PalletId,
};
use frame_system::pallet_prelude::*;
use sp_io::hashing::blake2_256;
use sp_runtime::{
	traits::{AccountIdConversion, AtLeast32BitUnsigned, CheckedAdd, One, SaturatedConversion, Zero},
	ArithmeticError, DispatchError,
};

#[cfg(feature = "runtime-benchmarks")]
mod benchmarking;
#[cfg(test)]
mod mock;

pub mod types;
pub use types::*;

pub mod weights;
pub use weights::WeightInfo;

/// The logging target for this pallet
pub(crate) const LOG_TARGET: &str = "reward-pools";

/// The current storage version.
const STORAGE_VERSION: StorageVersion = StorageVersion::new(0);

pub type PoolInfoOf<T> = PoolInfo<<T as frame_system::Config>::AccountId>;

#[frame_support::pallet]
pub mod pallet {
	use super::*;

	#[pallet::pallet]
	#[pallet::storage_version(STORAGE_VERSION)]
	pub struct Pallet<T>(_);

	#[pallet::config]
	pub trait Config: frame_system::Config {
		/// The system event type
		type RuntimeEvent: From<Event<Self>> + IsType<<Self as frame_system::Config>::RuntimeEvent>;

		/// This pallet's Id, used for deriving the pool vault accounts
		#[pallet::constant]
		type PalletId: Get<PalletId>;

		/// Identifies a pool within its asset pair
		type PoolId: Parameter + Member + AtLeast32BitUnsigned + Default + Copy + MaxEncodedLen;

		/// Custody of both the stake and the reward assets
		#[cfg(not(feature = "runtime-benchmarks"))]
		type MultiCurrency: Inspect<Self::AccountId, AssetId = AssetId, Balance = Balance>
			+ Mutate<Self::AccountId>;

		/// Custody of both the stake and the reward assets - for benchmarking to create assets
		#[cfg(feature = "runtime-benchmarks")]
		type MultiCurrency: Inspect<Self::AccountId, AssetId = AssetId, Balance = Balance>
			+ Mutate<Self::AccountId>
			+ Create<Self::AccountId>;

		/// Wall clock the reward schedule runs on
		type UnixTime: UnixTime;

		/// Origin allowed to pause and resume the pallet
		type ApproveOrigin: EnsureOrigin<Self::RuntimeOrigin>;

		/// Shortest reward window in microseconds
		#[pallet::constant]
		type MinDuration: Get<u64>;

		/// Longest reward window in microseconds
		#[pallet::constant]
		type MaxDuration: Get<u64>;

		/// Interface to access weight values
		type WeightInfo: WeightInfo;
	}

	/// Pool registry of each asset pair, created with the first pool of the pair
	#[pallet::storage]
	pub type Registries<T: Config> = StorageMap<_, Twox64Concat, AssetPair, RegistryInfo<T::PoolId>>;

	#[pallet::storage]
	pub type Pools<T: Config> =
		StorageDoubleMap<_, Twox64Concat, AssetPair, Twox64Concat, T::PoolId, PoolInfoOf<T>>;

	/// Stake and reward checkpoint of an account in a pool. Never removed, a fully withdrawn
	/// position stays at zero stake.
	#[pallet::storage]
	pub type UserPositions<T: Config> = StorageNMap<
		_,
		(
			NMapKey<Blake2_128Concat, T::AccountId>,
			NMapKey<Twox64Concat, AssetPair>,
			NMapKey<Twox64Concat, T::PoolId>,
		),
		UserPosition,
	>;

	/// When set every pool operation is rejected
	#[pallet::storage]
	pub type Paused<T> = StorageValue<_, bool, ValueQuery>;

	#[pallet::event]
	#[pallet::generate_deposit(pub(super) fn deposit_event)]
	pub enum Event<T: Config> {
		/// First pool of an asset pair was created
		RegistryCreated { asset_pair: AssetPair },
		/// A pool was created and funded
		PoolCreated {
			asset_pair: AssetPair,
			pool_id: T::PoolId,
			authority: T::AccountId,
			start_time: Timestamp,
			end_time: Timestamp,
			reward_amount: Balance,
			acc_reward_per_share: u128,
		},
		/// Stake was added to a pool, `reward_amount` is the reward settled on the way
		Deposited {
			asset_pair: AssetPair,
			pool_id: T::PoolId,
			who: T::AccountId,
			deposit_amount: Balance,
			reward_amount: Balance,
			amount_staked: Balance,
			total_amount_staked: Balance,
			reward_remaining: Balance,
			acc_reward_per_share: u128,
		},
		/// Stake was removed from a pool, `reward_amount` is the reward settled on the way
		Withdrawn {
			asset_pair: AssetPair,
			pool_id: T::PoolId,
			who: T::AccountId,
			withdraw_amount: Balance,
			reward_amount: Balance,
			amount_staked: Balance,
			total_amount_staked: Balance,
			reward_remaining: Balance,
			acc_reward_per_share: u128,
		},
		/// Pending reward was paid out
		RewardClaimed {
			asset_pair: AssetPair,
			pool_id: T::PoolId,
			who: T::AccountId,
			reward_amount: Balance,
			reward_remaining: Balance,
			acc_reward_per_share: u128,
		},
		/// The authority changed the reward or the window of a pool
		PoolModified {
			asset_pair: AssetPair,
			pool_id: T::PoolId,
			authority: T::AccountId,
			start_time: Timestamp,
			end_time: Timestamp,
			reward_remaining: Balance,
			total_amount_staked: Balance,
			acc_reward_per_share: u128,
		},
		/// Management of a pool was handed over
		AuthorityModified {
			asset_pair: AssetPair,
			pool_id: T::PoolId,
			old_authority: T::AccountId,
			new_authority: T::AccountId,
			acc_reward_per_share: u128,
		},
		/// An empty pool was removed, the rounding residue went back to the authority
		PoolDeleted {
			asset_pair: AssetPair,
			pool_id: T::PoolId,
			authority: T::AccountId,
			residual_reward: Balance,
		},
		/// Pool operations were paused or resumed
		PausedSet { paused: bool },
	}

	#[pallet::error]
	pub enum Error<T> {
		/// Reward window is outside the allowed bounds or already over
		InvalidDuration,
		/// Pool does not exist
		PoolDoesNotExist,
		/// Deposit amount must be positive
		InvalidDepositAmount,
		/// Withdraw amount must be positive and no more than the staked amount
		InvalidWithdrawAmount,
		/// Account has no position in this pool
		UserPositionNotFound,
		/// Caller is not the pool authority
		NotAuthorized,
		/// Reward must be positive and a decrease can't exceed the remaining reward
		InvalidReward,
		/// Pool still has stake or reward, or its window is not over yet
		CannotDeletePool,
		/// Reward vault holds less than the pool still owes
		InternalInvariantViolation,
		/// Reward calculation overflow
		RewardCalculationOverflow,
		/// Exceeds max pool id
		NoAvailablePoolId,
		/// Pool operations are paused
		PalletPaused,
	}

	#[pallet::hooks]
	impl<T: Config> Hooks<BlockNumberFor<T>> for Pallet<T> {
		#[cfg(feature = "try-runtime")]
		fn try_state(_n: BlockNumberFor<T>) -> Result<(), sp_runtime::TryRuntimeError> {
			Self::do_try_state().map_err(Into::into)
		}
	}

	#[pallet::call]
	impl<T: Config> Pallet<T> {
		/// Create a reward pool for a stake/reward asset pair and fund it.
		///
		/// Parameters:
		/// - `origin`: The account creating the pool, it becomes the pool authority.
		/// - `stake_asset_id`: The asset stakers lock in the pool.
		/// - `reward_asset_id`: The asset paid out as reward.
		/// - `reward_amount`: Reward moved from the caller into the pool.
		/// - `end_time`: Closing time of the reward window, in microseconds.
		///
		/// Restrictions:
		/// - `reward_amount` must be positive and small enough for the accumulator to absorb.
		/// - `end_time - now` must lie within `[MinDuration, MaxDuration]`.
		///
		/// On top of `reward_amount` the caller funds the reward vault with the reward asset's
		/// minimum balance. It keeps the vault alive while the pool exists and is returned on
		/// deletion.
		///
		/// Emits `PoolCreated`, preceded by `RegistryCreated` for the first pool of a pair.
		#[pallet::call_index(0)]
		#[pallet::weight(T::WeightInfo::create_pool())]
		#[transactional]
		pub fn create_pool(
			origin: OriginFor<T>,
			stake_asset_id: AssetId,
			reward_asset_id: AssetId,
			reward_amount: Balance,
			end_time: Timestamp,
		) -> DispatchResult {
			let who = ensure_signed(origin)?;
			Self::ensure_not_paused()?;

			let now = Self::now();
			ensure!(!reward_amount.is_zero(), Error::<T>::InvalidReward);
			Self::ensure_valid_duration(now, end_time)?;

			let asset_pair = AssetPair::new(stake_asset_id, reward_asset_id);
			let existing_registry = Registries::<T>::get(asset_pair);
			let registry_created = existing_registry.is_none();
			let mut registry = existing_registry.unwrap_or_default();

			let pool_id = registry.next_pool_id;
			registry.next_pool_id =
				pool_id.checked_add(&One::one()).ok_or(Error::<T>::NoAvailablePoolId)?;
			registry.pool_count = registry.pool_count.saturating_add(1);

			let pool = PoolInfo::new(who.clone(), now, end_time, reward_amount);
			pool.ensure_accumulator_headroom().map_err(|_| Error::<T>::InvalidReward)?;

			let vault_funding = reward_amount
				.checked_add(T::MultiCurrency::minimum_balance(reward_asset_id))
				.ok_or(ArithmeticError::Overflow)?;
			T::MultiCurrency::transfer(
				reward_asset_id,
				&who,
				&Self::vault_account(asset_pair, pool_id, Vault::Reward),
				vault_funding,
				Preservation::Expendable,
			)?;
			Self::ensure_reward_backed(asset_pair, pool_id, &pool)?;

			Registries::<T>::insert(asset_pair, registry);
			Pools::<T>::insert(asset_pair, pool_id, &pool);

			if registry_created {
				Self::deposit_event(Event::RegistryCreated { asset_pair });
			}
			Self::deposit_event(Event::PoolCreated {
				asset_pair,
				pool_id,
				authority: who,
				start_time: pool.start_time,
				end_time: pool.end_time,
				reward_amount,
				acc_reward_per_share: pool.acc_reward_per_share,
			});
			Ok(())
		}

		/// Lock stake asset in a pool.
		///
		/// A first deposit opens a position checkpointed at the current accumulator, so it earns
		/// nothing from before it joined. Later deposits pay out the pending reward first.
		///
		/// The resulting stake must reach the stake asset's minimum balance.
		///
		/// Emits `Deposited`.
		#[pallet::call_index(1)]
		#[pallet::weight(T::WeightInfo::deposit())]
		#[transactional]
		pub fn deposit(
			origin: OriginFor<T>,
			stake_asset_id: AssetId,
			reward_asset_id: AssetId,
			pool_id: T::PoolId,
			amount: Balance,
		) -> DispatchResult {
			let who = ensure_signed(origin)?;
			Self::ensure_not_paused()?;
			ensure!(!amount.is_zero(), Error::<T>::InvalidDepositAmount);

			let asset_pair = AssetPair::new(stake_asset_id, reward_asset_id);
			let mut pool =
				Pools::<T>::get(asset_pair, pool_id).ok_or(Error::<T>::PoolDoesNotExist)?;
			Self::update_pool(asset_pair, pool_id, &mut pool, Self::now())?;

			let (mut position, reward_amount) =
				match UserPositions::<T>::get((&who, asset_pair, pool_id)) {
					Some(mut position) => {
						let reward = Self::settle(&who, asset_pair, pool_id, &pool, &mut position)?;
						(position, reward)
					},
					None => (UserPosition::new(pool.acc_reward_per_share), Zero::zero()),
				};

			position.amount_staked =
				position.amount_staked.checked_add(amount).ok_or(ArithmeticError::Overflow)?;
			pool.total_staked = pool.total_staked.checked_add(amount).ok_or(ArithmeticError::Overflow)?;
			ensure!(
				position.amount_staked >= T::MultiCurrency::minimum_balance(stake_asset_id),
				Error::<T>::InvalidDepositAmount
			);

			T::MultiCurrency::transfer(
				stake_asset_id,
				&who,
				&Self::vault_account(asset_pair, pool_id, Vault::Stake),
				amount,
				Preservation::Expendable,
			)?;
			Self::ensure_stake_backed(asset_pair, pool_id, &pool)?;
			Self::ensure_reward_backed(asset_pair, pool_id, &pool)?;

			Pools::<T>::insert(asset_pair, pool_id, &pool);
			UserPositions::<T>::insert((&who, asset_pair, pool_id), &position);

			Self::deposit_event(Event::Deposited {
				asset_pair,
				pool_id,
				who,
				deposit_amount: amount,
				reward_amount,
				amount_staked: position.amount_staked,
				total_amount_staked: pool.total_staked,
				reward_remaining: pool.reward_remaining,
				acc_reward_per_share: pool.acc_reward_per_share,
			});
			Ok(())
		}

		/// Unlock stake asset from a pool, paying out the pending reward.
		///
		/// The position is kept even when its stake drops to zero. A partial withdrawal must
		/// leave at least the stake asset's minimum balance staked.
		///
		/// Emits `Withdrawn`.
		#[pallet::call_index(2)]
		#[pallet::weight(T::WeightInfo::withdraw())]
		#[transactional]
		pub fn withdraw(
			origin: OriginFor<T>,
			stake_asset_id: AssetId,
			reward_asset_id: AssetId,
			pool_id: T::PoolId,
			amount: Balance,
		) -> DispatchResult {
			let who = ensure_signed(origin)?;
			Self::ensure_not_paused()?;
			ensure!(!amount.is_zero(), Error::<T>::InvalidWithdrawAmount);

			let asset_pair = AssetPair::new(stake_asset_id, reward_asset_id);
			let mut pool =
				Pools::<T>::get(asset_pair, pool_id).ok_or(Error::<T>::PoolDoesNotExist)?;
			let mut position = UserPositions::<T>::get((&who, asset_pair, pool_id))
				.ok_or(Error::<T>::UserPositionNotFound)?;
			ensure!(position.amount_staked >= amount, Error::<T>::InvalidWithdrawAmount);
			let amount_left = position.amount_staked - amount;
			ensure!(
				amount_left.is_zero() ||
					amount_left >= T::MultiCurrency::minimum_balance(stake_asset_id),
				Error::<T>::InvalidWithdrawAmount
			);

			Self::update_pool(asset_pair, pool_id, &mut pool, Self::now())?;
			let reward_amount = Self::settle(&who, asset_pair, pool_id, &pool, &mut position)?;

			position.amount_staked = amount_left;
			pool.total_staked =
				pool.total_staked.checked_sub(amount).ok_or(ArithmeticError::Underflow)?;

			// the last staker out takes any stray balance below the minimum with them
			Self::transfer_from_vault(
				stake_asset_id,
				&Self::vault_account(asset_pair, pool_id, Vault::Stake),
				&who,
				amount,
				pool.total_staked.is_zero(),
			)?;
			Self::ensure_stake_backed(asset_pair, pool_id, &pool)?;
			Self::ensure_reward_backed(asset_pair, pool_id, &pool)?;

			Pools::<T>::insert(asset_pair, pool_id, &pool);
			UserPositions::<T>::insert((&who, asset_pair, pool_id), &position);

			Self::deposit_event(Event::Withdrawn {
				asset_pair,
				pool_id,
				who,
				withdraw_amount: amount,
				reward_amount,
				amount_staked: position.amount_staked,
				total_amount_staked: pool.total_staked,
				reward_remaining: pool.reward_remaining,
				acc_reward_per_share: pool.acc_reward_per_share,
			});
			Ok(())
		}

		/// Pay out the reward earned by the caller's position. Stake is left untouched.
		///
		/// Emits `RewardClaimed`.
		#[pallet::call_index(3)]
		#[pallet::weight(T::WeightInfo::claim())]
		#[transactional]
		pub fn claim(
			origin: OriginFor<T>,
			stake_asset_id: AssetId,
			reward_asset_id: AssetId,
			pool_id: T::PoolId,
		) -> DispatchResult {
			let who = ensure_signed(origin)?;
			Self::ensure_not_paused()?;

			let asset_pair = AssetPair::new(stake_asset_id, reward_asset_id);
			let mut pool =
				Pools::<T>::get(asset_pair, pool_id).ok_or(Error::<T>::PoolDoesNotExist)?;
			let mut position = UserPositions::<T>::get((&who, asset_pair, pool_id))
				.ok_or(Error::<T>::UserPositionNotFound)?;

			Self::update_pool(asset_pair, pool_id, &mut pool, Self::now())?;
			let reward_amount = Self::settle(&who, asset_pair, pool_id, &pool, &mut position)?;
			Self::ensure_reward_backed(asset_pair, pool_id, &pool)?;

			Pools::<T>::insert(asset_pair, pool_id, &pool);
			UserPositions::<T>::insert((&who, asset_pair, pool_id), &position);

			Self::deposit_event(Event::RewardClaimed {
				asset_pair,
				pool_id,
				who,
				reward_amount,
				reward_remaining: pool.reward_remaining,
				acc_reward_per_share: pool.acc_reward_per_share,
			});
			Ok(())
		}

		/// Change the remaining reward and/or the reward window of a pool.
		///
		/// The pool is accrued to the current time first, so the change only affects reward
		/// released from now on.
		///
		/// Parameters:
		/// - `reward_delta`: Reward to add (`reward_increase`) or take back from the pool.
		/// - `time_delta`: Microseconds to add to (`time_increase`) or cut from `end_time`.
		///
		/// Restrictions:
		/// - Only the pool authority may call.
		/// - Taking back more than the remaining reward fails. Taking back all of it sets
		///   `end_time` to now.
		/// - The remaining reward must stay small enough for the accumulator to absorb.
		/// - Extending a window that is already over restarts it as `[now, now + time_delta]`.
		/// - Shortening must leave `end_time` in the future.
		/// - With reward left `end_time` must be in the future, and an open window must stay
		///   within `[MinDuration, MaxDuration]` from now.
		///
		/// Emits `PoolModified`.
		#[pallet::call_index(4)]
		#[pallet::weight(T::WeightInfo::modify_pool())]
		#[transactional]
		pub fn modify_pool(
			origin: OriginFor<T>,
			stake_asset_id: AssetId,
			reward_asset_id: AssetId,
			pool_id: T::PoolId,
			reward_delta: Balance,
			reward_increase: bool,
			time_delta: u64,
			time_increase: bool,
		) -> DispatchResult {
			let who = ensure_signed(origin)?;
			Self::ensure_not_paused()?;

			let asset_pair = AssetPair::new(stake_asset_id, reward_asset_id);
			let mut pool =
				Pools::<T>::get(asset_pair, pool_id).ok_or(Error::<T>::PoolDoesNotExist)?;
			Self::ensure_pool_authority(&who, &pool)?;

			let now = Self::now();
			Self::update_pool(asset_pair, pool_id, &mut pool, now)?;

			if !reward_delta.is_zero() {
				let reward_vault = Self::vault_account(asset_pair, pool_id, Vault::Reward);
				if reward_increase {
					T::MultiCurrency::transfer(
						reward_asset_id,
						&who,
						&reward_vault,
						reward_delta,
						Preservation::Expendable,
					)?;
					pool.reward_remaining = pool
						.reward_remaining
						.checked_add(reward_delta)
						.ok_or(ArithmeticError::Overflow)?;
				} else {
					ensure!(reward_delta <= pool.reward_remaining, Error::<T>::InvalidReward);
					Self::transfer_from_vault(reward_asset_id, &reward_vault, &who, reward_delta, false)?;
					pool.reward_remaining -= reward_delta;
					if pool.reward_remaining.is_zero() {
						pool.end_time = now;
					}
				}
			}

			if !time_delta.is_zero() {
				if time_increase {
					if pool.end_time <= now {
						pool.start_time = now;
						pool.last_update_time = now;
						pool.end_time =
							now.checked_add(time_delta).ok_or(Error::<T>::InvalidDuration)?;
					} else {
						pool.end_time = pool
							.end_time
							.checked_add(time_delta)
							.ok_or(Error::<T>::InvalidDuration)?;
					}
				} else {
					let end_time =
						pool.end_time.checked_sub(time_delta).ok_or(Error::<T>::InvalidDuration)?;
					ensure!(end_time > now, Error::<T>::InvalidDuration);
					pool.end_time = end_time;
				}
			}

			if !pool.reward_remaining.is_zero() {
				ensure!(pool.end_time > now, Error::<T>::InvalidDuration);
			}
			if pool.end_time > now {
				Self::ensure_valid_duration(now, pool.end_time)?;
			}
			pool.ensure_accumulator_headroom().map_err(|_| Error::<T>::InvalidReward)?;
			Self::ensure_reward_backed(asset_pair, pool_id, &pool)?;

			Pools::<T>::insert(asset_pair, pool_id, &pool);

			Self::deposit_event(Event::PoolModified {
				asset_pair,
				pool_id,
				authority: who,
				start_time: pool.start_time,
				end_time: pool.end_time,
				reward_remaining: pool.reward_remaining,
				total_amount_staked: pool.total_staked,
				acc_reward_per_share: pool.acc_reward_per_share,
			});
			Ok(())
		}

		/// Hand management of a pool over to `new_authority`.
		///
		/// Emits `AuthorityModified`.
		#[pallet::call_index(5)]
		#[pallet::weight(T::WeightInfo::modify_authority())]
		#[transactional]
		pub fn modify_authority(
			origin: OriginFor<T>,
			stake_asset_id: AssetId,
			reward_asset_id: AssetId,
			pool_id: T::PoolId,
			new_authority: T::AccountId,
		) -> DispatchResult {
			let who = ensure_signed(origin)?;
			Self::ensure_not_paused()?;

			let asset_pair = AssetPair::new(stake_asset_id, reward_asset_id);
			let mut pool =
				Pools::<T>::get(asset_pair, pool_id).ok_or(Error::<T>::PoolDoesNotExist)?;
			Self::ensure_pool_authority(&who, &pool)?;

			Self::update_pool(asset_pair, pool_id, &mut pool, Self::now())?;
			let old_authority = sp_std::mem::replace(&mut pool.authority, new_authority.clone());

			Pools::<T>::insert(asset_pair, pool_id, &pool);

			Self::deposit_event(Event::AuthorityModified {
				asset_pair,
				pool_id,
				old_authority,
				new_authority,
				acc_reward_per_share: pool.acc_reward_per_share,
			});
			Ok(())
		}

		/// Remove a pool that has nothing left to pay out.
		///
		/// Requires the window to be over with no stake and no remaining reward. Whatever the
		/// reward vault still holds (rounding residue and the minimum balance funded at creation)
		/// is returned to the authority.
		///
		/// Emits `PoolDeleted`.
		#[pallet::call_index(6)]
		#[pallet::weight(T::WeightInfo::delete_empty_pool())]
		#[transactional]
		pub fn delete_empty_pool(
			origin: OriginFor<T>,
			stake_asset_id: AssetId,
			reward_asset_id: AssetId,
			pool_id: T::PoolId,
		) -> DispatchResult {
			let who = ensure_signed(origin)?;
			Self::ensure_not_paused()?;

			let asset_pair = AssetPair::new(stake_asset_id, reward_asset_id);
			let mut pool =
				Pools::<T>::get(asset_pair, pool_id).ok_or(Error::<T>::PoolDoesNotExist)?;
			Self::ensure_pool_authority(&who, &pool)?;

			let now = Self::now();
			Self::update_pool(asset_pair, pool_id, &mut pool, now)?;
			ensure!(pool.status(now) == PoolStatus::Empty, Error::<T>::CannotDeletePool);

			let reward_vault = Self::vault_account(asset_pair, pool_id, Vault::Reward);
			let residual_reward = T::MultiCurrency::balance(reward_asset_id, &reward_vault);
			if !residual_reward.is_zero() {
				Self::transfer_from_vault(reward_asset_id, &reward_vault, &who, residual_reward, true)?;
			}

			Pools::<T>::remove(asset_pair, pool_id);
			Registries::<T>::mutate(asset_pair, |registry| {
				if let Some(registry) = registry {
					registry.pool_count = registry.pool_count.saturating_sub(1);
				}
			});

			Self::deposit_event(Event::PoolDeleted {
				asset_pair,
				pool_id,
				authority: who,
				residual_reward,
			});
			Ok(())
		}

		/// Pause or resume every pool operation.
		#[pallet::call_index(7)]
		#[pallet::weight(T::WeightInfo::set_paused())]
		pub fn set_paused(origin: OriginFor<T>, paused: bool) -> DispatchResult {
			T::ApproveOrigin::ensure_origin(origin)?;

			Paused::<T>::put(paused);

			Self::deposit_event(Event::PausedSet { paused });
			Ok(())
		}
	}

	impl<T: Config> Pallet<T> {
		/// Current time in microseconds
		pub fn now() -> Timestamp {
			T::UnixTime::now().as_micros().saturated_into::<Timestamp>()
		}

		/// Generate a unique, deterministic vault account for one side of a pool
		pub fn vault_account(asset_pair: AssetPair, pool_id: T::PoolId, vault: Vault) -> T::AccountId {
			let account_id: T::AccountId = T::PalletId::get().into_account_truncating();
			let entropy =
				(T::PalletId::get().0, account_id, asset_pair, pool_id, vault).using_encoded(blake2_256);
			T::AccountId::decode(&mut &entropy[..])
				.expect("Created account ID is always valid; qed")
		}

		/// Reward a claim on `pool_id` would pay `who` right now.
		pub fn pending_reward(
			who: &T::AccountId,
			stake_asset_id: AssetId,
			reward_asset_id: AssetId,
			pool_id: T::PoolId,
		) -> Result<Balance, DispatchError> {
			let asset_pair = AssetPair::new(stake_asset_id, reward_asset_id);
			let mut pool =
				Pools::<T>::get(asset_pair, pool_id).ok_or(Error::<T>::PoolDoesNotExist)?;
			let position = UserPositions::<T>::get((who, asset_pair, pool_id))
				.ok_or(Error::<T>::UserPositionNotFound)?;

			pool.accrue(Self::now()).map_err(|_| Error::<T>::RewardCalculationOverflow)?;
			Ok(pool.pending_reward(&position).map_err(|_| Error::<T>::RewardCalculationOverflow)?)
		}

		pub fn pool_status(
			stake_asset_id: AssetId,
			reward_asset_id: AssetId,
			pool_id: T::PoolId,
		) -> Option<PoolStatus> {
			Pools::<T>::get(AssetPair::new(stake_asset_id, reward_asset_id), pool_id)
				.map(|pool| pool.status(Self::now()))
		}

		pub fn pool_info(
			stake_asset_id: AssetId,
			reward_asset_id: AssetId,
			pool_id: T::PoolId,
		) -> Option<PoolInfoOf<T>> {
			Pools::<T>::get(AssetPair::new(stake_asset_id, reward_asset_id), pool_id)
		}

		fn ensure_not_paused() -> DispatchResult {
			ensure!(!Paused::<T>::get(), Error::<T>::PalletPaused);
			Ok(())
		}

		fn ensure_pool_authority(who: &T::AccountId, pool: &PoolInfoOf<T>) -> DispatchResult {
			ensure!(&pool.authority == who, Error::<T>::NotAuthorized);
			Ok(())
		}

		/// `end_time` must be ahead of `now` by a window within the configured bounds
		fn ensure_valid_duration(now: Timestamp, end_time: Timestamp) -> DispatchResult {
			ensure!(end_time > now, Error::<T>::InvalidDuration);
			let duration = end_time - now;
			ensure!(
				duration >= T::MinDuration::get() && duration <= T::MaxDuration::get(),
				Error::<T>::InvalidDuration
			);
			Ok(())
		}

		/// Advance the pool accumulator to `now` and re-check the reward backing.
		fn update_pool(
			asset_pair: AssetPair,
			pool_id: T::PoolId,
			pool: &mut PoolInfoOf<T>,
			now: Timestamp,
		) -> DispatchResult {
			let accrued =
				pool.accrue(now).map_err(|_| Error::<T>::RewardCalculationOverflow)?;
			log::debug!(
				target: LOG_TARGET,
				"pool {:?} {:?}: accrued {} reward, acc_reward_per_share {}, reward_remaining {}",
				asset_pair,
				pool_id,
				accrued,
				pool.acc_reward_per_share,
				pool.reward_remaining,
			);
			Self::ensure_reward_backed(asset_pair, pool_id, pool)
		}

		/// Pay `amount` out of a pool vault.
		///
		/// The vault is kept above the asset's minimum balance unless `reap` is set. Only a
		/// payment that leaves nothing owed behind may reap it, since a reaped account hands its
		/// sub-minimum remainder to the payee.
		fn transfer_from_vault(
			asset_id: AssetId,
			vault: &T::AccountId,
			dest: &T::AccountId,
			amount: Balance,
			reap: bool,
		) -> DispatchResult {
			let preservation = if reap { Preservation::Expendable } else { Preservation::Preserve };
			T::MultiCurrency::transfer(asset_id, vault, dest, amount, preservation)?;
			Ok(())
		}

		/// The stake vault must hold at least what the pool's positions have staked.
		fn ensure_stake_backed(
			asset_pair: AssetPair,
			pool_id: T::PoolId,
			pool: &PoolInfoOf<T>,
		) -> DispatchResult {
			let stake_vault = Self::vault_account(asset_pair, pool_id, Vault::Stake);
			let stake_balance = T::MultiCurrency::balance(asset_pair.stake_asset_id, &stake_vault);
			if stake_balance < pool.total_staked {
				log::error!(
					target: LOG_TARGET,
					"pool {:?} {:?}: stake vault holds {} but {} is staked",
					asset_pair,
					pool_id,
					stake_balance,
					pool.total_staked,
				);
				return Err(Error::<T>::InternalInvariantViolation.into())
			}
			Ok(())
		}

		/// The reward vault must hold at least what the pool has yet to release.
		fn ensure_reward_backed(
			asset_pair: AssetPair,
			pool_id: T::PoolId,
			pool: &PoolInfoOf<T>,
		) -> DispatchResult {
			let reward_vault = Self::vault_account(asset_pair, pool_id, Vault::Reward);
			let reward_balance = T::MultiCurrency::balance(asset_pair.reward_asset_id, &reward_vault);
			if reward_balance < pool.reward_remaining {
				log::error!(
					target: LOG_TARGET,
					"pool {:?} {:?}: reward vault holds {} but {} is still owed",
					asset_pair,
					pool_id,
					reward_balance,
					pool.reward_remaining,
				);
				return Err(Error::<T>::InternalInvariantViolation.into())
			}
			Ok(())
		}

		/// Pay `position` its pending reward and checkpoint it at the current accumulator.
		/// The pool must already be accrued to the current time.
		fn settle(
			who: &T::AccountId,
			asset_pair: AssetPair,
			pool_id: T::PoolId,
			pool: &PoolInfoOf<T>,
			position: &mut UserPosition,
		) -> Result<Balance, DispatchError> {
			let reward =
				pool.pending_reward(position).map_err(|_| Error::<T>::RewardCalculationOverflow)?;
			if !reward.is_zero() {
				Self::transfer_from_vault(
					asset_pair.reward_asset_id,
					&Self::vault_account(asset_pair, pool_id, Vault::Reward),
					who,
					reward,
					false,
				)?;
				log::debug!(
					target: LOG_TARGET,
					"pool {:?} {:?}: settled {} reward to {:?}",
					asset_pair,
					pool_id,
					reward,
					who,
				);
			}
			position.last_acc_reward_per_share = pool.acc_reward_per_share;
			Ok(reward)
		}

		/// Check the ledger of every pool against its positions and vaults.
		#[cfg(any(feature = "try-runtime", test))]
		pub fn do_try_state() -> Result<(), &'static str> {
			use sp_std::collections::btree_map::BTreeMap;

			let mut staked: BTreeMap<(AssetPair, T::PoolId), Balance> = BTreeMap::new();
			for ((_, asset_pair, pool_id), position) in UserPositions::<T>::iter() {
				let total = staked.entry((asset_pair, pool_id)).or_default();
				*total = total.saturating_add(position.amount_staked);
			}

			for (asset_pair, pool_id, pool) in Pools::<T>::iter() {
				let positions_staked = staked.get(&(asset_pair, pool_id)).copied().unwrap_or_default();
				ensure!(pool.total_staked == positions_staked, "pool stake differs from its positions");

				Self::ensure_stake_backed(asset_pair, pool_id, &pool)
					.map_err(|_| "stake vault holds less than the pool stake")?;
				Self::ensure_reward_backed(asset_pair, pool_id, &pool)
					.map_err(|_| "reward vault holds less than the remaining reward")?;
				ensure!(pool.last_update_time <= Self::now(), "pool updated in the future");
			}
			Ok(())
		}
	}
}
