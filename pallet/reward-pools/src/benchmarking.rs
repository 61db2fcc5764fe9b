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

use super::*;
use crate::Pallet as RewardPools;
use frame_benchmarking::{account as bench_account, benchmarks, impl_benchmark_test_suite};
use frame_support::assert_ok;
use frame_system::RawOrigin;

const STAKE_ASSET_ID: AssetId = 1_000;
const REWARD_ASSET_ID: AssetId = 1_001;
const REWARD: Balance = 1_000_000_000_000;

/// Global incrementing ID for generating unique accounts
static mut ACCOUNT_ID: u32 = 0;

/// Helper function to get a unique account by incrementing a global counter
pub fn account<T: Config>() -> T::AccountId {
	unsafe {
		let id = ACCOUNT_ID;
		ACCOUNT_ID += 1;
		bench_account("", id, 0)
	}
}

/// Create the stake and reward assets and fund `who` with both
fn setup_assets<T: Config>(who: &T::AccountId) {
	let admin = bench_account::<T::AccountId>("admin", 0, 0);
	for asset_id in [STAKE_ASSET_ID, REWARD_ASSET_ID] {
		if !T::MultiCurrency::asset_exists(asset_id) {
			assert_ok!(T::MultiCurrency::create(asset_id, admin.clone(), true, 1));
		}
		assert_ok!(T::MultiCurrency::mint_into(asset_id, who, 10 * REWARD));
	}
}

/// Create a funded pool owned by `authority`, returning its id
fn setup_pool<T: Config>(authority: &T::AccountId) -> T::PoolId {
	setup_assets::<T>(authority);
	let pool_id = Registries::<T>::get(AssetPair::new(STAKE_ASSET_ID, REWARD_ASSET_ID))
		.map(|registry| registry.next_pool_id)
		.unwrap_or_default();
	let end_time = RewardPools::<T>::now() + T::MinDuration::get();
	assert_ok!(RewardPools::<T>::create_pool(
		RawOrigin::Signed(authority.clone()).into(),
		STAKE_ASSET_ID,
		REWARD_ASSET_ID,
		REWARD,
		end_time,
	));
	pool_id
}

/// Stake `amount` into the pool, backdating the pool clock so the next call accrues reward
fn setup_position<T: Config>(who: &T::AccountId, pool_id: T::PoolId, amount: Balance) {
	setup_assets::<T>(who);
	assert_ok!(RewardPools::<T>::deposit(
		RawOrigin::Signed(who.clone()).into(),
		STAKE_ASSET_ID,
		REWARD_ASSET_ID,
		pool_id,
		amount,
	));
	Pools::<T>::mutate(AssetPair::new(STAKE_ASSET_ID, REWARD_ASSET_ID), pool_id, |pool| {
		if let Some(pool) = pool {
			pool.last_update_time = pool.last_update_time.saturating_sub(1_000_000);
		}
	});
}

benchmarks! {
	create_pool {
		let creator = account::<T>();
		setup_assets::<T>(&creator);
		let end_time = RewardPools::<T>::now() + T::MinDuration::get();
	}: _(RawOrigin::Signed(creator), STAKE_ASSET_ID, REWARD_ASSET_ID, REWARD, end_time)
	verify {
		assert!(Pools::<T>::get(AssetPair::new(STAKE_ASSET_ID, REWARD_ASSET_ID), T::PoolId::default()).is_some());
	}

	deposit {
		let authority = account::<T>();
		let pool_id = setup_pool::<T>(&authority);
		let user = account::<T>();
		setup_position::<T>(&user, pool_id, 100);
	}: _(RawOrigin::Signed(user.clone()), STAKE_ASSET_ID, REWARD_ASSET_ID, pool_id, 100)
	verify {
		let position = UserPositions::<T>::get((&user, AssetPair::new(STAKE_ASSET_ID, REWARD_ASSET_ID), pool_id));
		assert_eq!(position.map(|position| position.amount_staked), Some(200));
	}

	withdraw {
		let authority = account::<T>();
		let pool_id = setup_pool::<T>(&authority);
		let user = account::<T>();
		setup_position::<T>(&user, pool_id, 100);
	}: _(RawOrigin::Signed(user.clone()), STAKE_ASSET_ID, REWARD_ASSET_ID, pool_id, 100)
	verify {
		let position = UserPositions::<T>::get((&user, AssetPair::new(STAKE_ASSET_ID, REWARD_ASSET_ID), pool_id));
		assert_eq!(position.map(|position| position.amount_staked), Some(0));
	}

	claim {
		let authority = account::<T>();
		let pool_id = setup_pool::<T>(&authority);
		let user = account::<T>();
		setup_position::<T>(&user, pool_id, 100);
	}: _(RawOrigin::Signed(user.clone()), STAKE_ASSET_ID, REWARD_ASSET_ID, pool_id)
	verify {
		let pool = Pools::<T>::get(AssetPair::new(STAKE_ASSET_ID, REWARD_ASSET_ID), pool_id).unwrap();
		let position = UserPositions::<T>::get((&user, AssetPair::new(STAKE_ASSET_ID, REWARD_ASSET_ID), pool_id)).unwrap();
		assert_eq!(position.last_acc_reward_per_share, pool.acc_reward_per_share);
	}

	modify_pool {
		let authority = account::<T>();
		let pool_id = setup_pool::<T>(&authority);
		let user = account::<T>();
		setup_position::<T>(&user, pool_id, 100);
	}: _(RawOrigin::Signed(authority), STAKE_ASSET_ID, REWARD_ASSET_ID, pool_id, REWARD, true, T::MinDuration::get(), true)
	verify {
		let pool = Pools::<T>::get(AssetPair::new(STAKE_ASSET_ID, REWARD_ASSET_ID), pool_id).unwrap();
		assert!(pool.reward_remaining > REWARD);
	}

	modify_authority {
		let authority = account::<T>();
		let pool_id = setup_pool::<T>(&authority);
		let new_authority = account::<T>();
	}: _(RawOrigin::Signed(authority), STAKE_ASSET_ID, REWARD_ASSET_ID, pool_id, new_authority.clone())
	verify {
		let pool = Pools::<T>::get(AssetPair::new(STAKE_ASSET_ID, REWARD_ASSET_ID), pool_id).unwrap();
		assert_eq!(pool.authority, new_authority);
	}

	delete_empty_pool {
		let authority = account::<T>();
		let pool_id = setup_pool::<T>(&authority);
		// drain the reward, which also closes the window
		assert_ok!(RewardPools::<T>::modify_pool(
			RawOrigin::Signed(authority.clone()).into(),
			STAKE_ASSET_ID,
			REWARD_ASSET_ID,
			pool_id,
			REWARD,
			false,
			0,
			false,
		));
	}: _(RawOrigin::Signed(authority), STAKE_ASSET_ID, REWARD_ASSET_ID, pool_id)
	verify {
		assert!(Pools::<T>::get(AssetPair::new(STAKE_ASSET_ID, REWARD_ASSET_ID), pool_id).is_none());
	}

	set_paused {
	}: _(RawOrigin::Root, true)
	verify {
		assert!(Paused::<T>::get());
	}
}

impl_benchmark_test_suite!(RewardPools, crate::mock::TestExt::default().build(), crate::mock::Test,);
