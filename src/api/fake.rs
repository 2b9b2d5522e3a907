//! In-memory backend for tests
//!
//! Keeps accounts, wallets, categories and history in memory and recomputes
//! the summary the way the real backend does, so ledger invariants hold
//! across mutations. Individual endpoints can be made to fail.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use super::wire::{
    BankSyncResponse, LoginRequest, LoginResponse, ManualTransactionRequest, NewCategoryRequest,
    RegisterRequest, RegisterResponse,
};
use super::{AuthApi, LedgerApi};
use crate::crypto::SecureString;
use crate::error::{FinGridError, FinGridResult};
use crate::models::{
    included_balance, Account, AccountId, BudgetSummary, Category, CategoryId, CategorySpend,
    ManualWallet, Money, TransactionId, TransactionRecord, TransactionSource, WalletId,
};

pub(crate) const ACCEPTED_PASSWORD: &str = "secret1";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Endpoint {
    Summary,
    Accounts,
    History,
    Analytics,
    ManualTransaction,
    Categories,
    BankSync,
    Toggle,
    Login,
    Register,
}

struct FakeState {
    accounts: Vec<Account>,
    wallets: Vec<ManualWallet>,
    categories: Vec<Category>,
    history: Vec<TransactionRecord>,
    failing: HashSet<Endpoint>,
    bank_balance_skew: Money,
    register_returns_token: bool,
    next_id: i64,
}

pub(crate) struct FakeBackend {
    state: Mutex<FakeState>,
    calls: AtomicUsize,
}

impl FakeBackend {
    /// Two cards (one excluded), a cash wallet and two categories
    pub(crate) fn new() -> Self {
        let mut savings = Account::new("acc-savings", "Savings", Money::from_minor(50_000));
        savings.is_included_in_total = false;

        let mut food = Category::new(CategoryId::new(1), "Food", Money::from_minor(400_000));
        food.spent = Money::from_minor(125_040);
        let taxi = Category::new(CategoryId::new(2), "Taxi", Money::zero());

        let state = FakeState {
            accounts: vec![
                Account::new("acc-black", "Black", Money::from_minor(120_050)),
                savings,
            ],
            wallets: vec![ManualWallet {
                id: WalletId::new(1),
                name: "Cash".into(),
                balance: Money::from_minor(30_025),
            }],
            categories: vec![food, taxi],
            history: vec![TransactionRecord {
                id: TransactionId::new("tx-1"),
                amount: Money::from_minor(-125_040),
                description: "Groceries".into(),
                timestamp: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
                source: TransactionSource::Bank,
                category_name: "Food".into(),
                category_icon: "cart.fill".into(),
            }],
            failing: HashSet::new(),
            bank_balance_skew: Money::zero(),
            register_returns_token: true,
            next_id: 100,
        };

        Self {
            state: Mutex::new(state),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of endpoint calls made so far
    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn fail(&self, endpoint: Endpoint) {
        self.state.lock().unwrap().failing.insert(endpoint);
    }

    pub(crate) fn heal(&self, endpoint: Endpoint) {
        self.state.lock().unwrap().failing.remove(&endpoint);
    }

    /// Report a bank balance that disagrees with the accounts
    pub(crate) fn skew_bank_balance(&self, skew: Money) {
        self.state.lock().unwrap().bank_balance_skew = skew;
    }

    pub(crate) fn register_without_token(&self) {
        self.state.lock().unwrap().register_returns_token = false;
    }

    pub(crate) fn add_account(&self, account: Account) {
        self.state.lock().unwrap().accounts.push(account);
    }

    pub(crate) fn summary(&self) -> BudgetSummary {
        let state = self.state.lock().unwrap();
        let bank_balance = included_balance(&state.accounts)
            .expect("fake account balances fit in i64")
            + state.bank_balance_skew;
        let manual_balance: Money = state.wallets.iter().map(|w| w.balance).sum();
        BudgetSummary {
            total_capital: bank_balance + manual_balance,
            bank_balance,
            manual_balance,
            categories: state.categories.clone(),
            manual_wallets: state.wallets.clone(),
        }
    }

    fn enter(&self, endpoint: Endpoint) -> FinGridResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.state.lock().unwrap().failing.contains(&endpoint) {
            return Err(FinGridError::Network(format!("{:?} unreachable", endpoint)));
        }
        Ok(())
    }
}

#[async_trait]
impl LedgerApi for FakeBackend {
    async fn fetch_summary(&self) -> FinGridResult<BudgetSummary> {
        self.enter(Endpoint::Summary)?;
        Ok(self.summary())
    }

    async fn fetch_accounts(&self) -> FinGridResult<Vec<Account>> {
        self.enter(Endpoint::Accounts)?;
        Ok(self.state.lock().unwrap().accounts.clone())
    }

    async fn fetch_history(&self) -> FinGridResult<Vec<TransactionRecord>> {
        self.enter(Endpoint::History)?;
        Ok(self.state.lock().unwrap().history.clone())
    }

    async fn fetch_analytics(&self) -> FinGridResult<Vec<CategorySpend>> {
        self.enter(Endpoint::Analytics)?;
        let state = self.state.lock().unwrap();
        Ok(state
            .categories
            .iter()
            .filter(|c| c.spent.is_positive())
            .map(|c| CategorySpend::new(c.name.clone(), c.spent))
            .collect())
    }

    async fn add_manual_transaction(
        &self,
        request: &ManualTransactionRequest,
    ) -> FinGridResult<TransactionRecord> {
        self.enter(Endpoint::ManualTransaction)?;
        let mut state = self.state.lock().unwrap();

        let signed = if request.is_income {
            request.amount
        } else {
            -request.amount
        };
        let wallet = state
            .wallets
            .iter()
            .position(|w| w.id == request.wallet_id)
            .ok_or_else(|| FinGridError::wallet_not_found(request.wallet_id.to_string()))?;
        let category = state
            .categories
            .iter()
            .position(|c| c.id == request.category_id)
            .ok_or_else(|| FinGridError::category_not_found(request.category_id.to_string()))?;

        state.wallets[wallet].balance += signed;
        let category = &mut state.categories[category];
        if !request.is_income {
            category.spent += request.amount;
        }
        let (category_name, category_icon) = (category.name.clone(), category.icon.clone());

        state.next_id += 1;
        let record = TransactionRecord {
            id: TransactionId::new(format!("manual-{}", state.next_id)),
            amount: signed,
            description: request.description.clone(),
            timestamp: Utc::now(),
            source: TransactionSource::Manual,
            category_name,
            category_icon,
        };
        state.history.insert(0, record.clone());
        Ok(record)
    }

    async fn add_category(&self, request: &NewCategoryRequest) -> FinGridResult<Category> {
        self.enter(Endpoint::Categories)?;
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let mut category = Category::new(
            CategoryId::new(state.next_id),
            request.name.clone(),
            request.monthly_limit,
        );
        category.icon = request.icon.clone();
        state.categories.push(category.clone());
        Ok(category)
    }

    async fn sync_bank(&self, _bank_token: &SecureString) -> FinGridResult<BankSyncResponse> {
        self.enter(Endpoint::BankSync)?;
        let state = self.state.lock().unwrap();
        Ok(BankSyncResponse {
            user_name: "Test User".into(),
            accounts_count: state.accounts.len() as u32,
        })
    }

    async fn toggle_inclusion(&self, account_id: &AccountId) -> FinGridResult<Account> {
        self.enter(Endpoint::Toggle)?;
        let mut state = self.state.lock().unwrap();
        let account = state
            .accounts
            .iter_mut()
            .find(|a| &a.id == account_id)
            .ok_or_else(|| FinGridError::account_not_found(account_id.as_str()))?;
        account.is_included_in_total = !account.is_included_in_total;
        Ok(account.clone())
    }
}

#[async_trait]
impl AuthApi for FakeBackend {
    async fn login(&self, request: &LoginRequest<'_>) -> FinGridResult<LoginResponse> {
        self.enter(Endpoint::Login)?;
        if request.password != ACCEPTED_PASSWORD {
            return Err(FinGridError::AuthRejected("Invalid Authentication".into()));
        }
        Ok(LoginResponse {
            is_auth_successful: true,
            token: Some(format!("tok-{}", request.email)),
            error_message: None,
        })
    }

    async fn register(&self, request: &RegisterRequest<'_>) -> FinGridResult<RegisterResponse> {
        self.enter(Endpoint::Register)?;
        let returns_token = self.state.lock().unwrap().register_returns_token;
        Ok(RegisterResponse {
            token: returns_token.then(|| format!("tok-{}", request.email)),
        })
    }
}
