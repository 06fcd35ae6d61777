use std::{collections::HashMap, sync::Arc};

use chrono::NaiveDate;
use engine::{Currency, Money, OperationKind};
use teloxide::types::ChatId;
use tokio::sync::Mutex;

/// Position of a chat inside one of the multi-step dialogues.
///
/// Every variant carries exactly the answers collected so far, so a new
/// dialogue can never observe fields left over from an earlier one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Session {
    AwaitingName,
    AwaitingType,
    AwaitingAmount {
        kind: OperationKind,
    },
    AwaitingDate {
        kind: OperationKind,
        amount: Money,
    },
    AwaitingCurrency,
    AwaitingPeriod {
        currency: Currency,
    },
    AwaitingConvertCurrency,
    AwaitingConvertAmount {
        currency: String,
    },
    AwaitingManageChoice,
    AwaitingNewCurrencyName,
    AwaitingNewCurrencyRate {
        name: String,
    },
    AwaitingCurrencyToDelete,
    AwaitingCurrencyToUpdate,
    AwaitingUpdatedRate {
        name: String,
    },
}

impl Session {
    pub(crate) fn flow(&self) -> Flow {
        match self {
            Session::AwaitingName => Flow::Registration,
            Session::AwaitingType
            | Session::AwaitingAmount { .. }
            | Session::AwaitingDate { .. } => Flow::AddOperation,
            Session::AwaitingCurrency | Session::AwaitingPeriod { .. } => Flow::Report,
            Session::AwaitingConvertCurrency | Session::AwaitingConvertAmount { .. } => {
                Flow::Convert
            }
            Session::AwaitingManageChoice
            | Session::AwaitingNewCurrencyName
            | Session::AwaitingNewCurrencyRate { .. }
            | Session::AwaitingCurrencyToDelete
            | Session::AwaitingCurrencyToUpdate
            | Session::AwaitingUpdatedRate { .. } => Flow::ManageCurrencies,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Flow {
    Registration,
    AddOperation,
    Report,
    Convert,
    ManageCurrencies,
}

impl Flow {
    pub(crate) fn initial(self) -> Session {
        match self {
            Flow::Registration => Session::AwaitingName,
            Flow::AddOperation => Session::AwaitingType,
            Flow::Report => Session::AwaitingCurrency,
            Flow::Convert => Session::AwaitingConvertCurrency,
            Flow::ManageCurrencies => Session::AwaitingManageChoice,
        }
    }

    /// `true` for the dialogues only registered users may open.
    pub(crate) fn needs_registration(self) -> bool {
        matches!(self, Flow::AddOperation | Flow::Report)
    }
}

/// A completed add-operation answer set, ready to persist.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Draft {
    pub kind: OperationKind,
    pub amount: Money,
    pub date: NaiveDate,
}

/// Per-chat dialogue state, kept in memory only.
#[derive(Clone, Default)]
pub(crate) struct SessionStore {
    inner: Arc<Mutex<HashMap<ChatId, Session>>>,
}

impl SessionStore {
    pub(crate) async fn get(&self, chat_id: ChatId) -> Option<Session> {
        let guard = self.inner.lock().await;
        guard.get(&chat_id).cloned()
    }

    pub(crate) async fn set(&self, chat_id: ChatId, session: Session) {
        let mut guard = self.inner.lock().await;
        guard.insert(chat_id, session);
    }

    pub(crate) async fn clear(&self, chat_id: ChatId) {
        let mut guard = self.inner.lock().await;
        guard.remove(&chat_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn store_isolates_chats() {
        let store = SessionStore::default();
        let alice = ChatId(1);
        let bob = ChatId(2);

        store.set(alice, Session::AwaitingType).await;
        assert_eq!(store.get(alice).await, Some(Session::AwaitingType));
        assert_eq!(store.get(bob).await, None);

        store
            .set(
                alice,
                Session::AwaitingAmount {
                    kind: OperationKind::Expense,
                },
            )
            .await;
        store.clear(alice).await;
        assert_eq!(store.get(alice).await, None);
    }

    #[test]
    fn every_state_belongs_to_its_flow() {
        let flows = [
            Flow::Registration,
            Flow::AddOperation,
            Flow::Report,
            Flow::Convert,
            Flow::ManageCurrencies,
        ];
        for flow in flows {
            assert_eq!(flow.initial().flow(), flow);
        }
        let date = Session::AwaitingDate {
            kind: OperationKind::Income,
            amount: Money::new(100),
        };
        assert_eq!(date.flow(), Flow::AddOperation);
        let amount = Session::AwaitingConvertAmount {
            currency: "USD".to_string(),
        };
        assert_eq!(amount.flow(), Flow::Convert);
        let rate = Session::AwaitingUpdatedRate {
            name: "EUR".to_string(),
        };
        assert_eq!(rate.flow(), Flow::ManageCurrencies);
    }

    #[test]
    fn only_bookkeeping_flows_need_registration() {
        assert!(Flow::AddOperation.needs_registration());
        assert!(Flow::Report.needs_registration());
        assert!(!Flow::Registration.needs_registration());
        assert!(!Flow::Convert.needs_registration());
        assert!(!Flow::ManageCurrencies.needs_registration());
    }
}
