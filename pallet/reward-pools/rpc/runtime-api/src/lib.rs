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

//! Runtime API definition for the reward pools pallet.

#![cfg_attr(not(feature = "std"), no_std)]

use codec::Codec;
use pallet_reward_pools::{AssetId, Balance, PoolInfo, PoolStatus};
use sp_runtime::DispatchError;

sp_api::decl_runtime_apis! {
	/// The RPC API to query reward pools
	pub trait RewardPoolsApi<AccountId, PoolId> where
		AccountId: Codec,
		PoolId: Codec,
	{
		/// Returns the reward `who` could claim from the pool right now
		fn pending_reward(
			who: AccountId,
			stake_asset_id: AssetId,
			reward_asset_id: AssetId,
			pool_id: PoolId,
		) -> Result<Balance, DispatchError>;

		/// Returns the lifecycle stage of the pool, `None` if it does not exist
		fn pool_status(
			stake_asset_id: AssetId,
			reward_asset_id: AssetId,
			pool_id: PoolId,
		) -> Option<PoolStatus>;

		/// Returns the ledger of the pool as last written
		fn pool_info(
			stake_asset_id: AssetId,
			reward_asset_id: AssetId,
			pool_id: PoolId,
		) -> Option<PoolInfo<AccountId>>;
	}
}
