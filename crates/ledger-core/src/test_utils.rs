//! Test utilities for the ledger engine.
//!
//! A three-field entity with its property enum, plus helpers that build
//! ledgers over recording stores. Public so that downstream crates can reuse
//! them in their own tests.

use std::fmt;

use shared_types::{PropertyValue, ResponseCode};

use crate::adapters::RecordingStore;
use crate::domain::{LedgerCheck, NoopCommitInterceptor, Property, PropertyView, TransactionalLedger};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TestEntity {
    pub number: i64,
    pub flag: bool,
    pub name: String,
}

impl TestEntity {
    pub fn new(number: i64, flag: bool, name: &str) -> Self {
        Self {
            number,
            flag,
            name: name.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TestProperty {
    Number,
    Flag,
    Name,
}

impl fmt::Display for TestProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TestProperty::Number => "NUMBER",
            TestProperty::Flag => "FLAG",
            TestProperty::Name => "NAME",
        };
        f.write_str(name)
    }
}

impl Property for TestProperty {
    type Entity = TestEntity;

    const ALL: &'static [Self] = &[TestProperty::Number, TestProperty::Flag, TestProperty::Name];
    const MISSING_ENTITY: ResponseCode = ResponseCode::InvalidAccountId;

    fn get(self, entity: &TestEntity) -> PropertyValue {
        match self {
            TestProperty::Number => PropertyValue::Long(entity.number),
            TestProperty::Flag => PropertyValue::Bool(entity.flag),
            TestProperty::Name => PropertyValue::Text(entity.name.clone()),
        }
    }

    fn set(self, entity: &mut TestEntity, value: PropertyValue) {
        match (self, value) {
            (TestProperty::Number, PropertyValue::Long(v)) => entity.number = v,
            (TestProperty::Flag, PropertyValue::Bool(v)) => entity.flag = v,
            (TestProperty::Name, PropertyValue::Text(v)) => entity.name = v,
            _ => {}
        }
    }

    fn accepts(self, value: &PropertyValue) -> bool {
        matches!(
            (self, value),
            (TestProperty::Number, PropertyValue::Long(_))
                | (TestProperty::Flag, PropertyValue::Bool(_))
                | (TestProperty::Name, PropertyValue::Text(_))
        )
    }
}

pub type TestStore = RecordingStore<u64, TestEntity>;
pub type TestLedger = TransactionalLedger<u64, TestProperty, TestStore, NoopCommitInterceptor>;

/// Ledger over an empty recording store.
pub fn create_test_ledger() -> TestLedger {
    TransactionalLedger::new("test", RecordingStore::new())
}

/// Ledger whose store already holds `entities`; the store's op log starts empty.
pub fn create_seeded_ledger(entities: &[(u64, TestEntity)]) -> TestLedger {
    let mut store = RecordingStore::new();
    for (id, entity) in entities {
        store.seed(*id, entity.clone());
    }
    TransactionalLedger::new("test", store)
}

/// Fails with `InsufficientAccountBalance` when NUMBER would go negative,
/// with `AccountDeleted` when FLAG is set.
pub struct NonNegativeCheck;

impl LedgerCheck<TestProperty> for NonNegativeCheck {
    fn check_using(&self, view: &PropertyView<'_, TestProperty>) -> ResponseCode {
        if view.get_bool(TestProperty::Flag) {
            return ResponseCode::AccountDeleted;
        }
        if view.get_long(TestProperty::Number) < 0 {
            return ResponseCode::InsufficientAccountBalance;
        }
        ResponseCode::Ok
    }
}
