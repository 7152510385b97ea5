use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    entities::purchases::PurchaseEntity, value_objects::enums::payment_methods::PaymentMethod,
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PurchaseModel {
    pub id: Uuid,
    pub student_id: Uuid,
    pub pass_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub paid_at: Option<DateTime<Utc>>,
    pub payment_method: Option<PaymentMethod>,
    pub cashier_id: Option<Uuid>,
    pub notes: String,
}

impl PurchaseModel {
    pub fn is_paid(&self) -> bool {
        self.paid_at.is_some()
    }
}

impl From<PurchaseEntity> for PurchaseModel {
    fn from(entity: PurchaseEntity) -> Self {
        Self {
            id: entity.id,
            student_id: entity.student_id,
            pass_id: entity.pass_id,
            created_at: entity.created_at,
            paid_at: entity.paid_at,
            payment_method: PaymentMethod::from_str(&entity.payment_method),
            cashier_id: entity.cashier_id,
            notes: entity.notes,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InsertPurchaseModel {
    pub pass_id: Uuid,
    /// One of TBC, BOG, CASH. Supplying it marks the purchase paid on creation.
    pub payment_method: Option<String>,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MarkPurchasePaidModel {
    pub payment_method: Option<String>,
}
