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

//! Weights for pallet_reward_pools
//!
//! Hand-estimated placeholders. Storage access counts follow each call's code path and the
//! base weights have not been measured. Regenerate before use on a live chain with:
//!
//! ./target/release/seed benchmark pallet --chain=dev --steps=50 --repeat=20
//! --pallet=pallet_reward_pools --extrinsic=* --execution=wasm --wasm-execution=compiled
//! --heap-pages=4096 --output ./pallet/reward-pools/src/weights.rs

#![cfg_attr(rustfmt, rustfmt_skip)]
#![allow(unused_parens)]
#![allow(unused_imports)]

use frame_support::{traits::Get, weights::{Weight, constants::RocksDbWeight}};
use sp_std::marker::PhantomData;

/// Weight functions needed for pallet_reward_pools.
pub trait WeightInfo {
	fn create_pool() -> Weight;
	fn deposit() -> Weight;
	fn withdraw() -> Weight;
	fn claim() -> Weight;
	fn modify_pool() -> Weight;
	fn modify_authority() -> Weight;
	fn delete_empty_pool() -> Weight;
	fn set_paused() -> Weight;
}

/// Placeholder weights for pallet_reward_pools, pending a benchmark run.
pub struct SubstrateWeight<T>(PhantomData<T>);
impl<T: frame_system::Config> WeightInfo for SubstrateWeight<T> {
	// Storage: RewardPools Paused (r:1 w:0)
	// Storage: Timestamp Now (r:1 w:0)
	// Storage: RewardPools Registries (r:1 w:1)
	// Storage: Assets Asset (r:1 w:1)
	// Storage: Assets Account (r:2 w:2)
	// Storage: System Account (r:1 w:1)
	// Storage: RewardPools Pools (r:0 w:1)
	fn create_pool() -> Weight {
		Weight::from_all(71_260_000 as u64)
			.saturating_add(T::DbWeight::get().reads(7 as u64))
			.saturating_add(T::DbWeight::get().writes(6 as u64))
	}
	// Storage: RewardPools Paused (r:1 w:0)
	// Storage: RewardPools Pools (r:1 w:1)
	// Storage: Timestamp Now (r:1 w:0)
	// Storage: Assets Account (r:4 w:4)
	// Storage: RewardPools UserPositions (r:1 w:1)
	// Storage: Assets Asset (r:2 w:2)
	// Storage: System Account (r:1 w:1)
	fn deposit() -> Weight {
		Weight::from_all(104_530_000 as u64)
			.saturating_add(T::DbWeight::get().reads(11 as u64))
			.saturating_add(T::DbWeight::get().writes(9 as u64))
	}
	// Storage: RewardPools Paused (r:1 w:0)
	// Storage: RewardPools Pools (r:1 w:1)
	// Storage: RewardPools UserPositions (r:1 w:1)
	// Storage: Timestamp Now (r:1 w:0)
	// Storage: Assets Account (r:4 w:4)
	// Storage: Assets Asset (r:2 w:2)
	fn withdraw() -> Weight {
		Weight::from_all(98_870_000 as u64)
			.saturating_add(T::DbWeight::get().reads(10 as u64))
			.saturating_add(T::DbWeight::get().writes(8 as u64))
	}
	// Storage: RewardPools Paused (r:1 w:0)
	// Storage: RewardPools Pools (r:1 w:1)
	// Storage: RewardPools UserPositions (r:1 w:1)
	// Storage: Timestamp Now (r:1 w:0)
	// Storage: Assets Account (r:2 w:2)
	// Storage: Assets Asset (r:1 w:1)
	fn claim() -> Weight {
		Weight::from_all(76_410_000 as u64)
			.saturating_add(T::DbWeight::get().reads(7 as u64))
			.saturating_add(T::DbWeight::get().writes(5 as u64))
	}
	// Storage: RewardPools Paused (r:1 w:0)
	// Storage: RewardPools Pools (r:1 w:1)
	// Storage: Timestamp Now (r:1 w:0)
	// Storage: Assets Account (r:2 w:2)
	// Storage: Assets Asset (r:1 w:1)
	fn modify_pool() -> Weight {
		Weight::from_all(69_050_000 as u64)
			.saturating_add(T::DbWeight::get().reads(6 as u64))
			.saturating_add(T::DbWeight::get().writes(4 as u64))
	}
	// Storage: RewardPools Paused (r:1 w:0)
	// Storage: RewardPools Pools (r:1 w:1)
	// Storage: Timestamp Now (r:1 w:0)
	// Storage: Assets Account (r:1 w:0)
	fn modify_authority() -> Weight {
		Weight::from_all(38_120_000 as u64)
			.saturating_add(T::DbWeight::get().reads(4 as u64))
			.saturating_add(T::DbWeight::get().writes(1 as u64))
	}
	// Storage: RewardPools Paused (r:1 w:0)
	// Storage: RewardPools Pools (r:1 w:1)
	// Storage: Timestamp Now (r:1 w:0)
	// Storage: Assets Account (r:2 w:2)
	// Storage: Assets Asset (r:1 w:1)
	// Storage: RewardPools Registries (r:1 w:1)
	fn delete_empty_pool() -> Weight {
		Weight::from_all(66_730_000 as u64)
			.saturating_add(T::DbWeight::get().reads(7 as u64))
			.saturating_add(T::DbWeight::get().writes(5 as u64))
	}
	// Storage: RewardPools Paused (r:0 w:1)
	fn set_paused() -> Weight {
		Weight::from_all(14_200_000 as u64)
			.saturating_add(T::DbWeight::get().writes(1 as u64))
	}
}

// For backwards compatibility and tests
impl WeightInfo for () {
	fn create_pool() -> Weight {
		Weight::from_all(71_260_000 as u64)
			.saturating_add(RocksDbWeight::get().reads(7 as u64))
			.saturating_add(RocksDbWeight::get().writes(6 as u64))
	}
	fn deposit() -> Weight {
		Weight::from_all(104_530_000 as u64)
			.saturating_add(RocksDbWeight::get().reads(11 as u64))
			.saturating_add(RocksDbWeight::get().writes(9 as u64))
	}
	fn withdraw() -> Weight {
		Weight::from_all(98_870_000 as u64)
			.saturating_add(RocksDbWeight::get().reads(10 as u64))
			.saturating_add(RocksDbWeight::get().writes(8 as u64))
	}
	fn claim() -> Weight {
		Weight::from_all(76_410_000 as u64)
			.saturating_add(RocksDbWeight::get().reads(7 as u64))
			.saturating_add(RocksDbWeight::get().writes(5 as u64))
	}
	fn modify_pool() -> Weight {
		Weight::from_all(69_050_000 as u64)
			.saturating_add(RocksDbWeight::get().reads(6 as u64))
			.saturating_add(RocksDbWeight::get().writes(4 as u64))
	}
	fn modify_authority() -> Weight {
		Weight::from_all(38_120_000 as u64)
			.saturating_add(RocksDbWeight::get().reads(4 as u64))
			.saturating_add(RocksDbWeight::get().writes(1 as u64))
	}
	fn delete_empty_pool() -> Weight {
		Weight::from_all(66_730_000 as u64)
			.saturating_add(RocksDbWeight::get().reads(7 as u64))
			.saturating_add(RocksDbWeight::get().writes(5 as u64))
	}
	fn set_paused() -> Weight {
		Weight::from_all(14_200_000 as u64)
			.saturating_add(RocksDbWeight::get().writes(1 as u64))
	}
}
