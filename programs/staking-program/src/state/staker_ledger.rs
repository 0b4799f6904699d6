use crate::{
    constants::*,
    error::ErrorCode,
    policy::{elapsed_seconds, RewardAccrualPolicy},
    state::StakePool,
    transfer::AssetTransferPort,
};
use anchor_lang::prelude::*;

/// Accounting record for a single deposit.
///
/// A position with `amount == 0` has been released and stays in the ledger
/// as a tombstone so later indices keep their meaning.
#[derive(AnchorSerialize, AnchorDeserialize, InitSpace, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StakePosition {
    pub amount: u64,
    pub deposited_at: i64,
    pub last_accrual_at: i64,
}

impl StakePosition {
    pub fn open(amount: u64, now: i64) -> Self {
        Self {
            amount,
            deposited_at: now,
            last_accrual_at: now,
        }
    }

    pub fn is_active(&self) -> bool {
        self.amount > 0
    }

    pub fn pending_reward(&self, policy: &RewardAccrualPolicy, now: i64) -> u64 {
        if !self.is_active() {
            return 0;
        }
        policy.accrue(self.amount, elapsed_seconds(self.last_accrual_at, now))
    }
}

/// What a release or withdrawal pays out, planned before any tokens move.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settlement {
    pub indices: Vec<u32>,
    pub principal: u64,
    pub reward: u64,
    pub settled_at: i64,
}

impl Settlement {
    pub fn payout(&self) -> Result<u64> {
        Ok(self
            .principal
            .checked_add(self.reward)
            .ok_or(ErrorCode::ArithmeticOverflow)?)
    }
}

/// All stake positions of one owner in one pool, in deposit order.
#[account]
#[derive(InitSpace, Debug, PartialEq, Eq)]
pub struct StakerLedger {
    pub owner: Pubkey,
    pub pool: Pubkey,
    #[max_len(42)] // MAX_POSITIONS
    pub positions: Vec<StakePosition>,
    pub bump: u8,
}

impl StakerLedger {
    pub fn new(owner: Pubkey, pool: Pubkey, bump: u8) -> Self {
        Self {
            owner,
            pool,
            positions: Vec::new(),
            bump,
        }
    }

    pub fn positions(&self) -> &[StakePosition] {
        &self.positions
    }

    pub fn position(&self, index: u32) -> Result<&StakePosition> {
        self.positions
            .get(index as usize)
            .ok_or_else(|| error!(ErrorCode::InvalidIndex))
    }

    pub fn active_principal(&self) -> u64 {
        self.positions.iter().map(|p| p.amount).sum()
    }

    /// Pulls `amount` from the owner into custody and opens a new position.
    /// Returns the index of the new position.
    pub fn deposit<P: AssetTransferPort>(
        &mut self,
        port: &mut P,
        pool: &mut StakePool,
        amount: u64,
        now: i64,
    ) -> Result<u32> {
        require!(amount > 0, ErrorCode::ZeroAmount);
        require!(
            self.positions.len() < MAX_POSITIONS,
            ErrorCode::PositionLimitReached
        );
        let index = u32::try_from(self.positions.len()).map_err(|_| ErrorCode::PositionLimitReached)?;
        let total_staked = pool.staked_after_deposit(amount)?;

        port.transfer_in(&self.owner, amount)?;

        self.positions.push(StakePosition::open(amount, now));
        pool.total_staked = total_staked;
        Ok(index)
    }

    /// Rewards accrued on every active position up to `now`. Does not settle.
    pub fn rewards(&self, policy: &RewardAccrualPolicy, now: i64) -> Result<u64> {
        self.positions.iter().try_fold(0u64, |total, position| {
            total
                .checked_add(position.pending_reward(policy, now))
                .ok_or_else(|| error!(ErrorCode::ArithmeticOverflow))
        })
    }

    /// Plans the release of a single position without touching state.
    pub fn plan_release(&self, pool: &StakePool, index: u32, now: i64) -> Result<Settlement> {
        let position = self.position(index)?;

        let age = elapsed_seconds(position.deposited_at, now);
        let lock = pool.lock_policy();
        if !lock.is_unlocked(age) {
            msg!(
                "Position {} unlocks in {} seconds",
                index,
                lock.remaining(age)
            );
            return err!(ErrorCode::StillLocked);
        }
        require!(position.is_active(), ErrorCode::AlreadyReleased);

        Ok(Settlement {
            indices: vec![index],
            principal: position.amount,
            reward: position.pending_reward(&pool.accrual_policy(), now),
            settled_at: now,
        })
    }

    /// Plans a withdrawal of every active position whose lock has elapsed.
    /// Positions still inside their lock are left out.
    pub fn plan_withdraw_all(&self, pool: &StakePool, now: i64) -> Result<Settlement> {
        let lock = pool.lock_policy();
        let accrual = pool.accrual_policy();
        let mut settlement = Settlement {
            indices: Vec::new(),
            principal: 0,
            reward: 0,
            settled_at: now,
        };

        for (index, position) in self.positions.iter().enumerate() {
            if !position.is_active() {
                continue;
            }
            if !lock.is_unlocked(elapsed_seconds(position.deposited_at, now)) {
                msg!("Skipping position {}: still locked", index);
                continue;
            }

            settlement.principal = settlement
                .principal
                .checked_add(position.amount)
                .ok_or(ErrorCode::ArithmeticOverflow)?;
            settlement.reward = settlement
                .reward
                .checked_add(position.pending_reward(&accrual, now))
                .ok_or(ErrorCode::ArithmeticOverflow)?;
            settlement
                .indices
                .push(u32::try_from(index).map_err(|_| ErrorCode::InvalidIndex)?);
        }

        require!(!settlement.indices.is_empty(), ErrorCode::NothingToWithdraw);
        Ok(settlement)
    }

    /// Releases one unlocked position, paying principal plus accrued reward.
    pub fn release<P: AssetTransferPort>(
        &mut self,
        port: &mut P,
        pool: &mut StakePool,
        index: u32,
        now: i64,
    ) -> Result<Settlement> {
        let settlement = self.plan_release(pool, index, now)?;
        self.settle(port, pool, settlement)
    }

    /// Pays out every unlocked position in a single transfer.
    pub fn withdraw_all<P: AssetTransferPort>(
        &mut self,
        port: &mut P,
        pool: &mut StakePool,
        now: i64,
    ) -> Result<Settlement> {
        let settlement = self.plan_withdraw_all(pool, now)?;
        self.settle(port, pool, settlement)
    }

    fn settle<P: AssetTransferPort>(
        &mut self,
        port: &mut P,
        pool: &mut StakePool,
        settlement: Settlement,
    ) -> Result<Settlement> {
        let payout = settlement.payout()?;
        let totals = pool.totals_after_settlement(&settlement)?;

        port.transfer_out(&self.owner, payout)?;

        for &index in &settlement.indices {
            let position = &mut self.positions[index as usize];
            position.amount = 0;
            position.last_accrual_at = position.last_accrual_at.max(settlement.settled_at);
        }
        pool.apply_totals(totals);
        Ok(settlement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anchor_lang::error::Error;
    use std::collections::HashMap;

    const START: i64 = 1_700_000_000;
    const DAY: i64 = SECONDS_PER_DAY as i64;

    /// Wallet balances plus a custody account, with a switch to reject the
    /// next outbound transfer.
    struct TestPort {
        custody: Pubkey,
        balances: HashMap<Pubkey, u64>,
        reject_outbound: bool,
    }

    impl TestPort {
        fn new() -> Self {
            Self {
                custody: Pubkey::new_unique(),
                balances: HashMap::new(),
                reject_outbound: false,
            }
        }

        fn credit(&mut self, account: Pubkey, amount: u64) {
            *self.balances.entry(account).or_default() += amount;
        }

        fn move_units(&mut self, from: Pubkey, to: Pubkey, amount: u64) -> Result<()> {
            let balance = self.balances.get(&from).copied().unwrap_or(0);
            require!(balance >= amount, ErrorCode::TransferFailed);
            self.balances.insert(from, balance - amount);
            self.credit(to, amount);
            Ok(())
        }
    }

    impl AssetTransferPort for TestPort {
        fn transfer_in(&mut self, from: &Pubkey, amount: u64) -> Result<()> {
            self.move_units(*from, self.custody, amount)
        }

        fn transfer_out(&mut self, to: &Pubkey, amount: u64) -> Result<()> {
            require!(!self.reject_outbound, ErrorCode::TransferFailed);
            self.move_units(self.custody, *to, amount)
        }

        fn balance_of(&self, account: &Pubkey) -> u64 {
            self.balances.get(account).copied().unwrap_or(0)
        }
    }

    struct Fixture {
        port: TestPort,
        pool: StakePool,
        ledger: StakerLedger,
    }

    fn fixture(wallet: u64, reserve: u64) -> Fixture {
        let owner = Pubkey::new_unique();
        let mut port = TestPort::new();
        port.credit(owner, wallet);
        let custody = port.custody;
        port.credit(custody, reserve);

        Fixture {
            port,
            pool: StakePool {
                reward_rate_bps: DEFAULT_REWARD_RATE_BPS,
                lock_duration: DEFAULT_LOCK_DURATION,
                reward_reserve: reserve,
                ..Default::default()
            },
            ledger: StakerLedger::new(owner, Pubkey::new_unique(), 255),
        }
    }

    impl Fixture {
        fn deposit(&mut self, amount: u64, now: i64) -> Result<u32> {
            self.ledger.deposit(&mut self.port, &mut self.pool, amount, now)
        }

        fn release(&mut self, index: u32, now: i64) -> Result<Settlement> {
            self.ledger.release(&mut self.port, &mut self.pool, index, now)
        }

        fn withdraw_all(&mut self, now: i64) -> Result<Settlement> {
            self.ledger.withdraw_all(&mut self.port, &mut self.pool, now)
        }

        fn owner_balance(&self) -> u64 {
            self.port.balance_of(&self.ledger.owner)
        }
    }

    #[test]
    fn account_space_fits_max_positions() {
        assert_eq!(
            StakerLedger::INIT_SPACE,
            32 + 32 + 4 + MAX_POSITIONS * StakePosition::INIT_SPACE + 1
        );
    }

    #[test]
    fn full_positions_view_fits_in_return_data() {
        use anchor_lang::solana_program::program::MAX_RETURN_DATA;

        let positions = vec![StakePosition::open(u64::MAX, i64::MAX); MAX_POSITIONS];
        let mut encoded = Vec::new();
        positions.serialize(&mut encoded).unwrap();

        assert_eq!(encoded.len(), 4 + MAX_POSITIONS * StakePosition::INIT_SPACE);
        assert!(encoded.len() <= MAX_RETURN_DATA);
    }

    #[test]
    fn deposit_opens_a_position_at_now() {
        let mut f = fixture(10_000, 0);

        assert_eq!(f.deposit(1_000, START).unwrap(), 0);
        assert_eq!(f.deposit(250, START + 5).unwrap(), 1);

        assert_eq!(
            f.ledger.positions(),
            &[
                StakePosition {
                    amount: 1_000,
                    deposited_at: START,
                    last_accrual_at: START,
                },
                StakePosition {
                    amount: 250,
                    deposited_at: START + 5,
                    last_accrual_at: START + 5,
                },
            ]
        );
        assert_eq!(f.pool.total_staked, 1_250);
        assert_eq!(f.owner_balance(), 8_750);
        assert_eq!(f.port.balance_of(&f.port.custody), 1_250);
    }

    #[test]
    fn zero_deposit_is_rejected() {
        let mut f = fixture(10_000, 0);

        assert_eq!(f.deposit(0, START).unwrap_err(), Error::from(ErrorCode::ZeroAmount));
        assert!(f.ledger.positions().is_empty());
    }

    #[test]
    fn failed_inbound_transfer_opens_nothing() {
        let mut f = fixture(500, 0);

        assert_eq!(
            f.deposit(501, START).unwrap_err(),
            Error::from(ErrorCode::TransferFailed)
        );
        assert!(f.ledger.positions().is_empty());
        assert_eq!(f.pool.total_staked, 0);
        assert_eq!(f.owner_balance(), 500);
    }

    #[test]
    fn ledger_capacity_is_bounded() {
        let mut f = fixture(MAX_POSITIONS as u64 + 1, 0);
        for i in 0..MAX_POSITIONS {
            assert_eq!(f.deposit(1, START).unwrap(), i as u32);
        }

        assert_eq!(
            f.deposit(1, START).unwrap_err(),
            Error::from(ErrorCode::PositionLimitReached)
        );
        assert_eq!(f.ledger.positions().len(), MAX_POSITIONS);
    }

    #[test]
    fn rewards_grow_with_time_and_start_at_zero() {
        let mut f = fixture(1_000_000, 0);
        f.deposit(1_000_000, START).unwrap();
        let policy = f.pool.accrual_policy();

        let mut previous = f.ledger.rewards(&policy, START).unwrap();
        assert_eq!(previous, 0);
        for day in 1..30 {
            let current = f.ledger.rewards(&policy, START + day * DAY).unwrap();
            assert!(current > previous, "day {day}: {current} <= {previous}");
            previous = current;
        }
    }

    #[test]
    fn rewards_sum_active_positions_only() {
        let mut f = fixture(10_000, 1_000);
        f.deposit(1_000, START).unwrap();
        f.deposit(2_000, START).unwrap();
        let policy = f.pool.accrual_policy();
        let year = START + SECONDS_PER_YEAR as i64;

        assert_eq!(f.ledger.rewards(&policy, year).unwrap(), 300);

        f.release(0, year).unwrap();
        assert_eq!(f.ledger.rewards(&policy, year).unwrap(), 200);
        // Reading rewards never settles.
        assert_eq!(f.ledger.positions()[1].last_accrual_at, START);
    }

    #[test]
    fn release_before_lock_fails_and_keeps_amount() {
        let mut f = fixture(10_000, 1_000);
        f.deposit(1_000, START).unwrap();

        assert_eq!(
            f.release(0, START + 30 * DAY - 1).unwrap_err(),
            Error::from(ErrorCode::StillLocked)
        );
        assert_eq!(f.ledger.positions()[0].amount, 1_000);
    }

    #[test]
    fn release_after_lock_pays_principal_and_reward() {
        let mut f = fixture(10_000, 1_000);
        f.deposit(500, START).unwrap();
        let unlock = START + 30 * DAY;

        let settlement = f.release(0, unlock).unwrap();

        assert_eq!(settlement.principal, 500);
        assert_eq!(settlement.reward, 4);
        assert_eq!(f.owner_balance(), 10_000 - 500 + 504);
        assert_eq!(
            f.ledger.positions()[0],
            StakePosition {
                amount: 0,
                deposited_at: START,
                last_accrual_at: unlock,
            }
        );
        assert_eq!(f.pool.total_staked, 0);
        assert_eq!(f.pool.reward_reserve, 996);
        assert_eq!(f.pool.total_rewards_paid, 4);
    }

    #[test]
    fn second_release_never_pays_twice() {
        let mut f = fixture(10_000, 1_000);
        f.deposit(500, START).unwrap();
        let unlock = START + 30 * DAY;
        f.release(0, unlock).unwrap();
        let balance = f.owner_balance();

        for later in [unlock, unlock + DAY, unlock + 400 * DAY] {
            assert_eq!(
                f.release(0, later).unwrap_err(),
                Error::from(ErrorCode::AlreadyReleased)
            );
        }
        assert_eq!(f.owner_balance(), balance);
    }

    #[test]
    fn release_of_unknown_index_fails() {
        let mut f = fixture(10_000, 0);
        f.deposit(500, START).unwrap();

        assert_eq!(
            f.release(1, START + 365 * DAY).unwrap_err(),
            Error::from(ErrorCode::InvalidIndex)
        );
    }

    #[test]
    fn rejected_payout_leaves_state_unchanged() {
        let mut f = fixture(10_000, 1_000);
        f.deposit(1_000, START).unwrap();
        f.deposit(2_000, START + DAY).unwrap();
        let ledger_before = f.ledger.clone();
        let pool_before = f.pool.clone();
        f.port.reject_outbound = true;

        let later = START + 365 * DAY;
        assert_eq!(f.release(0, later).unwrap_err(), Error::from(ErrorCode::TransferFailed));
        assert_eq!(f.withdraw_all(later).unwrap_err(), Error::from(ErrorCode::TransferFailed));

        assert_eq!(f.ledger, ledger_before);
        assert_eq!(f.pool, pool_before);
    }

    #[test]
    fn short_reserve_blocks_payout_without_side_effects() {
        let mut f = fixture(10_000, 50);
        f.deposit(1_000, START).unwrap();
        let ledger_before = f.ledger.clone();
        let balance = f.owner_balance();

        // 1_000 at 10% for a year needs 100 in the reserve.
        let later = START + 365 * DAY;
        assert_eq!(
            f.release(0, later).unwrap_err(),
            Error::from(ErrorCode::InsufficientRewardReserve)
        );
        assert_eq!(f.ledger, ledger_before);
        assert_eq!(f.owner_balance(), balance);
    }

    #[test]
    fn withdraw_all_skips_locked_positions() {
        let mut f = fixture(10_000, 1_000);
        f.deposit(1_000, START).unwrap();
        f.deposit(400, START + 20 * DAY).unwrap();
        f.deposit(600, START + 40 * DAY).unwrap();
        let now = START + 55 * DAY;

        let settlement = f.withdraw_all(now).unwrap();

        assert_eq!(settlement.indices, vec![0, 1]);
        assert_eq!(settlement.principal, 1_400);
        let positions = f.ledger.positions();
        assert_eq!(positions[0].amount, 0);
        assert_eq!(positions[1].amount, 0);
        assert_eq!(positions[0].last_accrual_at, now);
        assert_eq!(positions[2].amount, 600);
        assert_eq!(positions[2].last_accrual_at, START + 40 * DAY);
        assert_eq!(f.pool.total_staked, 600);
        assert_eq!(f.ledger.active_principal(), 600);
    }

    #[test]
    fn withdraw_all_with_nothing_unlocked_fails() {
        let mut f = fixture(10_000, 1_000);
        assert_eq!(
            f.withdraw_all(START).unwrap_err(),
            Error::from(ErrorCode::NothingToWithdraw)
        );

        f.deposit(1_000, START).unwrap();
        assert_eq!(
            f.withdraw_all(START + DAY).unwrap_err(),
            Error::from(ErrorCode::NothingToWithdraw)
        );

        f.release(0, START + 30 * DAY).unwrap();
        assert_eq!(
            f.withdraw_all(START + 60 * DAY).unwrap_err(),
            Error::from(ErrorCode::NothingToWithdraw)
        );
    }

    #[test]
    fn withdraw_all_pays_rewards_in_one_transfer() {
        let mut f = fixture(10_000, 1_000);
        f.deposit(1_000, START).unwrap();
        let year = START + 365 * DAY;
        let rewards = f.ledger.rewards(&f.pool.accrual_policy(), year).unwrap();
        let balance = f.owner_balance();

        let settlement = f.withdraw_all(year).unwrap();

        assert_eq!(rewards, 100);
        assert_eq!(settlement.payout().unwrap(), 1_100);
        assert_eq!(f.owner_balance(), balance + 1_000 + rewards);
    }

    #[test]
    fn regressing_clock_never_moves_accrual_backward() {
        let mut f = fixture(10_000, 1_000);
        f.deposit(1_000, START).unwrap();
        f.pool.lock_duration = 0;

        let settlement = f.release(0, START - DAY).unwrap();

        assert_eq!(settlement.reward, 0);
        assert_eq!(f.ledger.positions()[0].last_accrual_at, START);
    }
}
