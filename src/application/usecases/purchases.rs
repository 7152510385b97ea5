use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    application::usecases::{
        errors::{StudioError, UseCaseResult},
        identity::IdentityResolver,
    },
    domain::{
        entities::purchases::{InsertPurchaseEntity, MarkPurchasePaidEntity, PurchaseEntity},
        repositories::{
            passes::PassRepository, purchases::PurchaseRepository, students::StudentRepository,
            teachers::TeacherRepository,
        },
        value_objects::{
            enums::payment_methods::PaymentMethod,
            iam::AuthSubject,
            purchases::{InsertPurchaseModel, MarkPurchasePaidModel, PurchaseModel},
        },
    },
};

/// Empty input means "no method yet"; anything else must be a known code.
pub fn parse_payment_method(raw: Option<&str>) -> UseCaseResult<Option<PaymentMethod>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(code) => PaymentMethod::from_str(code)
            .map(Some)
            .ok_or_else(|| StudioError::Validation(format!("Invalid payment method: {code}"))),
    }
}

pub struct PurchaseUseCase<Pur, Pas, S, T>
where
    Pur: PurchaseRepository + Send + Sync + 'static,
    Pas: PassRepository + Send + Sync + 'static,
    S: StudentRepository + Send + Sync + 'static,
    T: TeacherRepository + Send + Sync + 'static,
{
    purchase_repo: Arc<Pur>,
    pass_repo: Arc<Pas>,
    student_repo: Arc<S>,
    identity_resolver: Arc<IdentityResolver<T>>,
}

impl<Pur, Pas, S, T> PurchaseUseCase<Pur, Pas, S, T>
where
    Pur: PurchaseRepository + Send + Sync + 'static,
    Pas: PassRepository + Send + Sync + 'static,
    S: StudentRepository + Send + Sync + 'static,
    T: TeacherRepository + Send + Sync + 'static,
{
    pub fn new(
        purchase_repo: Arc<Pur>,
        pass_repo: Arc<Pas>,
        student_repo: Arc<S>,
        identity_resolver: Arc<IdentityResolver<T>>,
    ) -> Self {
        Self {
            purchase_repo,
            pass_repo,
            student_repo,
            identity_resolver,
        }
    }

    /// Records a sale. A supplied payment method settles it on the spot.
    pub async fn add_purchase(
        &self,
        subject: AuthSubject,
        student_id: Uuid,
        insert_purchase_model: InsertPurchaseModel,
    ) -> UseCaseResult<PurchaseModel> {
        let identity = self.identity_resolver.resolve_staff(subject).await?;
        let payment_method = parse_payment_method(insert_purchase_model.payment_method.as_deref())?;

        self.student_repo
            .find_by_id(student_id)
            .await
            .map_err(StudioError::Internal)?
            .ok_or(StudioError::NotFound("student"))?;

        let (dance_pass, group) = self
            .pass_repo
            .find_with_group(insert_purchase_model.pass_id)
            .await
            .map_err(StudioError::Internal)?
            .ok_or(StudioError::NotFound("pass"))?;

        if group.finished_at.is_some() {
            warn!(
                pass_id = %dance_pass.id,
                group_id = %group.id,
                "purchases: pass belongs to a finished group"
            );
            return Err(StudioError::Validation(
                "Passes of finished groups can no longer be sold".to_string(),
            ));
        }

        let now = Utc::now();
        let insert_purchase_entity = InsertPurchaseEntity {
            student_id,
            pass_id: dance_pass.id,
            created_at: now,
            paid_at: payment_method.map(|_| now),
            payment_method: PaymentMethod::to_column(payment_method),
            cashier_id: identity.teacher_id,
            notes: insert_purchase_model.notes.clone(),
        };

        let purchase = self
            .purchase_repo
            .create_purchase(insert_purchase_entity)
            .await
            .map_err(|err| {
                error!(%student_id, db_error = ?err, "purchases: failed to create purchase");
                StudioError::Internal(err)
            })?;

        info!(
            %student_id,
            purchase_id = %purchase.id,
            paid = purchase.paid_at.is_some(),
            "purchases: purchase created"
        );
        Ok(PurchaseModel::from(purchase))
    }

    /// One-way transition to paid. Calling it on a paid purchase changes nothing.
    pub async fn mark_purchase_paid(
        &self,
        subject: AuthSubject,
        purchase_id: Uuid,
        mark_paid_model: MarkPurchasePaidModel,
    ) -> UseCaseResult<PurchaseModel> {
        let identity = self.identity_resolver.resolve_staff(subject).await?;

        let purchase = self.find_purchase(purchase_id).await?;
        if purchase.paid_at.is_some() {
            info!(%purchase_id, "purchases: already paid, nothing to do");
            return Ok(PurchaseModel::from(purchase));
        }

        let payment_method = parse_payment_method(mark_paid_model.payment_method.as_deref())?;
        let mark_paid_entity = MarkPurchasePaidEntity {
            paid_at: Some(Utc::now()),
            payment_method: PaymentMethod::to_column(payment_method),
            cashier_id: identity.teacher_id,
        };

        let changed = self
            .purchase_repo
            .mark_paid_if_unpaid(purchase_id, mark_paid_entity)
            .await
            .map_err(|err| {
                error!(%purchase_id, db_error = ?err, "purchases: failed to mark paid");
                StudioError::Internal(err)
            })?;

        if changed {
            info!(%purchase_id, cashier_id = ?identity.teacher_id, "purchases: marked paid");
        } else {
            info!(%purchase_id, "purchases: paid by a concurrent request, nothing to do");
        }

        let purchase = self.find_purchase(purchase_id).await?;
        Ok(PurchaseModel::from(purchase))
    }

    async fn find_purchase(&self, purchase_id: Uuid) -> UseCaseResult<PurchaseEntity> {
        self.purchase_repo
            .find_by_id(purchase_id)
            .await
            .map_err(|err| {
                error!(%purchase_id, db_error = ?err, "purchases: failed to load purchase");
                StudioError::Internal(err)
            })?
            .ok_or(StudioError::NotFound("purchase"))
    }
}
