//! Отслеживание заказов: ручная проверка оплаты перед закрытием продажи.
//!
//! Жизненный цикл записи:
//!
//! ```text
//! pending_verification ─┬─ verify ──▶ verified  (финальный, isVerified = true)
//! under_review ─────────┴─ reject ──▶ rejected  (финальный)
//! ```
//!
//! Пока запись не финальна, сумму оплаты можно исправить (`updatePayment`),
//! статус при этом не меняется. Клиент только скрывает недоступные действия;
//! окончательную проверку делает сервер.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::common::Identified;
use crate::shared::list_view::{FieldMap, Listable, SortKey};

/// Допуск при сравнении сумм (меньше копейки)
const AMOUNT_EPSILON: f64 = 0.005;

// ============================================================================
// Status
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackingStatus {
    #[default]
    #[serde(alias = "pending_validation")]
    PendingVerification,
    UnderReview,
    Verified,
    Rejected,
}

impl TrackingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrackingStatus::PendingVerification => "pending_verification",
            TrackingStatus::UnderReview => "under_review",
            TrackingStatus::Verified => "verified",
            TrackingStatus::Rejected => "rejected",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            TrackingStatus::PendingVerification => "Ожидает проверки",
            TrackingStatus::UnderReview => "На рассмотрении",
            TrackingStatus::Verified => "Подтверждён",
            TrackingStatus::Rejected => "Отклонён",
        }
    }

    pub fn all() -> Vec<TrackingStatus> {
        vec![
            TrackingStatus::PendingVerification,
            TrackingStatus::UnderReview,
            TrackingStatus::Verified,
            TrackingStatus::Rejected,
        ]
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, TrackingStatus::Verified | TrackingStatus::Rejected)
    }
}

// ============================================================================
// Transitions
// ============================================================================

/// Действия пользователя над записью
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackingAction {
    Verify,
    Reject,
    UpdatePayment,
}

impl TrackingAction {
    pub fn all() -> [TrackingAction; 3] {
        [
            TrackingAction::Verify,
            TrackingAction::Reject,
            TrackingAction::UpdatePayment,
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("заказ {0} уже подтверждён")]
    AlreadyVerified(String),
    #[error("заказ {0} отклонён")]
    AlreadyRejected(String),
}

/// Шаг, который нужно выполнить на сервере при подтверждении
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrackingStep {
    UpdatePayment(f64),
    Verify,
}

// ============================================================================
// Record
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingOrder {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub status: TrackingStatus,
    #[serde(default)]
    pub payment_amount: f64,
    #[serde(default)]
    pub original_payment_amount: Option<f64>,
    #[serde(default)]
    pub payment_type: String,
    #[serde(default)]
    pub driver_name: Option<String>,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub verified_at: Option<String>,
    #[serde(default)]
    pub verified_by: Option<String>,
    #[serde(default)]
    pub validated_at: Option<String>,
    #[serde(default)]
    pub store_id: String,
    #[serde(default)]
    pub rejection_reason: Option<String>,
}

impl TrackingOrder {
    /// Запись закрыта: подтверждена или отклонена
    pub fn is_final(&self) -> bool {
        self.is_verified || self.status == TrackingStatus::Rejected
    }

    fn guard(&self) -> Result<(), TransitionError> {
        if self.is_verified {
            return Err(TransitionError::AlreadyVerified(self.id.clone()));
        }
        if self.status == TrackingStatus::Rejected {
            return Err(TransitionError::AlreadyRejected(self.id.clone()));
        }
        Ok(())
    }

    /// Статус после действия. Все три действия разрешены только для
    /// неподтверждённой и неотклонённой записи.
    pub fn transition(&self, action: TrackingAction) -> Result<TrackingStatus, TransitionError> {
        self.guard()?;
        Ok(match action {
            TrackingAction::Verify => TrackingStatus::Verified,
            TrackingAction::Reject => TrackingStatus::Rejected,
            TrackingAction::UpdatePayment => self.status,
        })
    }

    /// Действия, которые можно показать пользователю
    pub fn available_actions(&self) -> Vec<TrackingAction> {
        TrackingAction::all()
            .into_iter()
            .filter(|action| self.transition(*action).is_ok())
            .collect()
    }

    pub fn can(&self, action: TrackingAction) -> bool {
        self.transition(action).is_ok()
    }

    /// Отличается ли введённая сумма от сохранённой
    pub fn payment_changed(&self, draft: f64) -> bool {
        (draft - self.payment_amount).abs() >= AMOUNT_EPSILON
    }

    /// Сумма изменялась относительно исходной из продажи
    pub fn payment_adjusted(&self) -> bool {
        self.original_payment_amount
            .map(|original| self.payment_changed(original))
            .unwrap_or(false)
    }

    /// Шаги подтверждения: сначала сохранить изменённую сумму, затем подтвердить
    pub fn verification_steps(&self, draft_amount: Option<f64>) -> Vec<TrackingStep> {
        let mut steps = Vec::with_capacity(2);
        if let Some(amount) = draft_amount.filter(|a| self.payment_changed(*a)) {
            steps.push(TrackingStep::UpdatePayment(amount));
        }
        steps.push(TrackingStep::Verify);
        steps
    }
}

impl Identified for TrackingOrder {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Listable for TrackingOrder {
    fn list_fields() -> FieldMap<Self> {
        FieldMap::<Self>::new()
            .search("id", |o| Some(o.id.as_str()))
            .search("customerName", |o| Some(o.customer_name.as_str()))
            .search("driverName", |o| o.driver_name.as_deref())
            .search("paymentType", |o| Some(o.payment_type.as_str()))
            .status(|o| Some(o.status.as_str()))
            .sort("customerName", |o| SortKey::text(&o.customer_name))
            .sort("driverName", |o| SortKey::opt_text(o.driver_name.as_deref()))
            .sort("paymentAmount", |o| SortKey::Number(o.payment_amount))
            .sort("status", |o| SortKey::text(o.status.as_str()))
            .sort("validatedAt", |o| SortKey::date(o.validated_at.as_deref()))
    }
}

// ============================================================================
// DTOs
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectOrderDto {
    pub reason: String,
}

impl RejectOrderDto {
    pub fn validate(&self) -> Result<(), String> {
        if self.reason.trim().is_empty() {
            return Err("Укажите причину отклонения".into());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePaymentDto {
    pub payment_amount: f64,
}

impl UpdatePaymentDto {
    pub fn validate(&self) -> Result<(), String> {
        if !self.payment_amount.is_finite() || self.payment_amount < 0.0 {
            return Err("Сумма оплаты должна быть неотрицательным числом".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn order(status: TrackingStatus, is_verified: bool) -> TrackingOrder {
        TrackingOrder {
            id: "t1".into(),
            customer_name: "Ann".into(),
            status,
            payment_amount: 120.0,
            original_payment_amount: Some(120.0),
            payment_type: "cash".into(),
            driver_name: Some("Max".into()),
            is_verified,
            verified_at: None,
            verified_by: None,
            validated_at: Some("2024-06-01T10:00:00Z".into()),
            store_id: "s1".into(),
            rejection_reason: None,
        }
    }

    #[test]
    fn test_pending_validation_alias() {
        let o: TrackingOrder = serde_json::from_value(json!({
            "_id": "t9",
            "customerName": "Bob",
            "status": "pending_validation",
            "paymentAmount": 50.5
        }))
        .unwrap();
        assert_eq!(o.status, TrackingStatus::PendingVerification);
        assert_eq!(serde_json::to_value(o.status).unwrap(), json!("pending_verification"));
    }

    #[test]
    fn test_open_order_transitions() {
        for status in [TrackingStatus::PendingVerification, TrackingStatus::UnderReview] {
            let o = order(status, false);
            assert_eq!(o.transition(TrackingAction::Verify), Ok(TrackingStatus::Verified));
            assert_eq!(o.transition(TrackingAction::Reject), Ok(TrackingStatus::Rejected));
            assert_eq!(o.transition(TrackingAction::UpdatePayment), Ok(status));
            assert_eq!(o.available_actions().len(), 3);
        }
    }

    #[test]
    fn test_final_orders_expose_no_actions() {
        let verified = order(TrackingStatus::Verified, true);
        assert!(verified.is_final());
        assert!(verified.available_actions().is_empty());
        assert_eq!(
            verified.transition(TrackingAction::Reject),
            Err(TransitionError::AlreadyVerified("t1".into()))
        );

        let rejected = order(TrackingStatus::Rejected, false);
        assert!(rejected.available_actions().is_empty());
        assert!(!rejected.can(TrackingAction::UpdatePayment));

        // Флаг isVerified важнее статуса
        let flagged = order(TrackingStatus::UnderReview, true);
        assert!(flagged.available_actions().is_empty());
    }

    #[test]
    fn test_verification_steps() {
        let o = order(TrackingStatus::PendingVerification, false);
        assert_eq!(o.verification_steps(None), vec![TrackingStep::Verify]);
        assert_eq!(o.verification_steps(Some(120.001)), vec![TrackingStep::Verify]);
        assert_eq!(
            o.verification_steps(Some(99.5)),
            vec![TrackingStep::UpdatePayment(99.5), TrackingStep::Verify]
        );
    }

    #[test]
    fn test_payment_adjusted() {
        let mut o = order(TrackingStatus::UnderReview, false);
        assert!(!o.payment_adjusted());
        o.payment_amount = 100.0;
        assert!(o.payment_adjusted());
    }

    #[test]
    fn test_dto_validation() {
        assert!(RejectOrderDto { reason: "  ".into() }.validate().is_err());
        assert!(RejectOrderDto { reason: "Сумма не совпадает".into() }.validate().is_ok());
        assert!(UpdatePaymentDto { payment_amount: -1.0 }.validate().is_err());
        assert!(UpdatePaymentDto { payment_amount: f64::NAN }.validate().is_err());
        assert!(UpdatePaymentDto { payment_amount: 0.0 }.validate().is_ok());
    }
}
