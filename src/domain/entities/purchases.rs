use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::purchases;

#[derive(Debug, Clone, PartialEq, Identifiable, Selectable, Queryable)]
#[diesel(table_name = purchases)]
pub struct PurchaseEntity {
    pub id: Uuid,
    pub student_id: Uuid,
    pub pass_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub paid_at: Option<DateTime<Utc>>,
    pub payment_method: String,
    pub cashier_id: Option<Uuid>,
    pub notes: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = purchases)]
pub struct InsertPurchaseEntity {
    pub student_id: Uuid,
    pub pass_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub paid_at: Option<DateTime<Utc>>,
    pub payment_method: String,
    pub cashier_id: Option<Uuid>,
    pub notes: String,
}

/// Fields written by the one-way unpaid -> paid transition.
#[derive(Debug, Clone, PartialEq, AsChangeset)]
#[diesel(table_name = purchases)]
#[diesel(treat_none_as_null = true)]
pub struct MarkPurchasePaidEntity {
    pub paid_at: Option<DateTime<Utc>>,
    pub payment_method: String,
    pub cashier_id: Option<Uuid>,
}
