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
use crate::{self as pallet_reward_pools};
use frame_support::{construct_runtime, parameter_types, traits::Everything, PalletId};
use frame_system::EnsureRoot;
use sp_core::H256;
use sp_runtime::{
	traits::{BlakeTwo256, IdentityLookup},
	BuildStorage,
};

pub type AccountId = u64;

construct_runtime!(
	pub enum Test {
		System: frame_system,
		Timestamp: pallet_timestamp,
		Balances: pallet_balances,
		Assets: pallet_assets,
		RewardPools: pallet_reward_pools,
	}
);

parameter_types! {
	pub const BlockHashCount: u64 = 250;
}

impl frame_system::Config for Test {
	type Block = frame_system::mocking::MockBlock<Test>;
	type BlockWeights = ();
	type BlockLength = ();
	type BaseCallFilter = Everything;
	type RuntimeOrigin = RuntimeOrigin;
	type Nonce = u32;
	type RuntimeCall = RuntimeCall;
	type Hash = H256;
	type Hashing = BlakeTwo256;
	type AccountId = AccountId;
	type Lookup = IdentityLookup<Self::AccountId>;
	type BlockHashCount = BlockHashCount;
	type RuntimeEvent = RuntimeEvent;
	type DbWeight = ();
	type Version = ();
	type PalletInfo = PalletInfo;
	type AccountData = pallet_balances::AccountData<Balance>;
	type OnNewAccount = ();
	type OnKilledAccount = ();
	type SystemWeightInfo = ();
	type SS58Prefix = ();
	type OnSetCode = ();
	type MaxConsumers = frame_support::traits::ConstU32<16>;
}

parameter_types! {
	pub const MinimumPeriod: u64 = 5;
}

impl pallet_timestamp::Config for Test {
	type Moment = u64;
	type OnTimestampSet = ();
	type MinimumPeriod = MinimumPeriod;
	type WeightInfo = ();
}

parameter_types! {
	pub const MaxReserves: u32 = 50;
	pub const ExistentialDeposit: u128 = 1;
}

impl pallet_balances::Config for Test {
	type Balance = Balance;
	type RuntimeEvent = RuntimeEvent;
	type RuntimeHoldReason = ();
	type FreezeIdentifier = ();
	type DustRemoval = ();
	type ExistentialDeposit = ExistentialDeposit;
	type AccountStore = System;
	type MaxLocks = ();
	type WeightInfo = ();
	type MaxReserves = MaxReserves;
	type ReserveIdentifier = [u8; 8];
	type MaxHolds = sp_core::ConstU32<0>;
	type MaxFreezes = sp_core::ConstU32<0>;
}

parameter_types! {
	pub const AssetDeposit: Balance = 1_000_000;
	pub const AssetAccountDeposit: Balance = 16;
	pub const ApprovalDeposit: Balance = 1;
	pub const AssetsStringLimit: u32 = 50;
	pub const MetadataDepositBase: Balance = 68;
	pub const MetadataDepositPerByte: Balance = 1;
	pub const RemoveItemsLimit: u32 = 100;
}

impl pallet_assets::Config for Test {
	type RuntimeEvent = RuntimeEvent;
	type Balance = Balance;
	type AssetId = AssetId;
	type Currency = Balances;
	type ForceOrigin = EnsureRoot<AccountId>;
	type AssetDeposit = AssetDeposit;
	type MetadataDepositBase = MetadataDepositBase;
	type MetadataDepositPerByte = MetadataDepositPerByte;
	type ApprovalDeposit = ApprovalDeposit;
	type StringLimit = AssetsStringLimit;
	type Freezer = ();
	type Extra = ();
	type WeightInfo = ();
	type AssetAccountDeposit = AssetAccountDeposit;
	type RemoveItemsLimit = RemoveItemsLimit;
	type AssetIdParameter = AssetId;
	type CreateOrigin = frame_system::EnsureNever<AccountId>;
	type CallbackHandle = ();
	pallet_assets::runtime_benchmarks_enabled! {
		type BenchmarkHelper = ();
	}
}

/// One day in microseconds
pub const DAY: u64 = 86_400_000_000;

parameter_types! {
	pub const RewardPoolsPalletId: PalletId = PalletId(*b"rwdpools");
	pub const MinDuration: u64 = DAY;
	pub const MaxDuration: u64 = 365 * DAY;
}

impl Config for Test {
	type RuntimeEvent = RuntimeEvent;
	type PalletId = RewardPoolsPalletId;
	type PoolId = u32;
	type MultiCurrency = Assets;
	type UnixTime = Timestamp;
	type ApproveOrigin = EnsureRoot<AccountId>;
	type MinDuration = MinDuration;
	type MaxDuration = MaxDuration;
	type WeightInfo = ();
}

pub const STAKE_ASSET_ID: AssetId = 1;
pub const REWARD_ASSET_ID: AssetId = 2;
/// Asset whose accounts are reaped below `DUST_MIN_BALANCE`
pub const DUST_ASSET_ID: AssetId = 3;
pub const DUST_MIN_BALANCE: Balance = 10;

/// Genesis wall clock in milliseconds
pub const GENESIS_TIME_MS: u64 = 1_700_000_000_000;
/// Genesis wall clock in microseconds, the unit pools are scheduled in
pub const GENESIS_TIME: u64 = GENESIS_TIME_MS * 1_000;

pub fn alice() -> AccountId {
	1000
}

pub fn bob() -> AccountId {
	2000
}

pub fn charlie() -> AccountId {
	3000
}

pub fn asset_owner() -> AccountId {
	10
}

/// Move the wall clock forward by `micros`, which must be a whole number of milliseconds
pub fn advance_time(micros: u64) {
	let now_ms = pallet_timestamp::Pallet::<Test>::get();
	Timestamp::set_timestamp(now_ms + micros / 1_000);
}

pub fn asset_balance(asset_id: AssetId, who: AccountId) -> Balance {
	<Assets as Inspect<AccountId>>::balance(asset_id, &who)
}

#[derive(Default)]
pub struct TestExt {
	assets: Vec<(AssetId, AccountId, Balance)>,
}

impl TestExt {
	/// Configure asset endowments as (asset id, account, balance)
	pub fn with_assets(mut self, assets: &[(AssetId, AccountId, Balance)]) -> Self {
		self.assets = assets.to_vec();
		self
	}

	pub fn build(self) -> sp_io::TestExternalities {
		let mut ext = frame_system::GenesisConfig::<Test>::default().build_storage().unwrap();

		let assets = vec![
			(STAKE_ASSET_ID, asset_owner(), true, 1),
			(REWARD_ASSET_ID, asset_owner(), true, 1),
			(DUST_ASSET_ID, asset_owner(), true, DUST_MIN_BALANCE),
		];
		let metadata = vec![
			(STAKE_ASSET_ID, b"STAKE".to_vec(), b"STK".to_vec(), 6_u8),
			(REWARD_ASSET_ID, b"REWARD".to_vec(), b"RWD".to_vec(), 6_u8),
			(DUST_ASSET_ID, b"DUST".to_vec(), b"DST".to_vec(), 6_u8),
		];
		pallet_assets::GenesisConfig::<Test> { assets, metadata, accounts: self.assets }
			.assimilate_storage(&mut ext)
			.unwrap();

		let mut ext: sp_io::TestExternalities = ext.into();
		ext.execute_with(|| {
			System::set_block_number(1);
			Timestamp::set_timestamp(GENESIS_TIME_MS);
		});
		ext
	}
}
