use std::sync::Arc;

use tracing::{debug, error};
use uuid::Uuid;

use crate::{
    application::usecases::errors::{StudioError, UseCaseResult},
    domain::{
        repositories::{attendance::AttendanceRepository, purchases::PurchaseRepository},
        value_objects::active_passes::{ActivePassModel, compute_active_passes},
    },
};

/// Remaining lesson credit per paid purchase. Always read from the store, never cached.
pub struct PassCreditUseCase<Pur, A>
where
    Pur: PurchaseRepository + Send + Sync + 'static,
    A: AttendanceRepository + Send + Sync + 'static,
{
    purchase_repo: Arc<Pur>,
    attendance_repo: Arc<A>,
}

impl<Pur, A> PassCreditUseCase<Pur, A>
where
    Pur: PurchaseRepository + Send + Sync + 'static,
    A: AttendanceRepository + Send + Sync + 'static,
{
    pub fn new(purchase_repo: Arc<Pur>, attendance_repo: Arc<A>) -> Self {
        Self {
            purchase_repo,
            attendance_repo,
        }
    }

    pub async fn active_passes(&self, student_id: Uuid) -> UseCaseResult<Vec<ActivePassModel>> {
        let paid_purchases = self
            .purchase_repo
            .list_paid_with_passes(student_id)
            .await
            .map_err(|err| {
                error!(
                    %student_id,
                    db_error = ?err,
                    "pass_credits: failed to load paid purchases"
                );
                StudioError::Internal(err)
            })?;

        if paid_purchases.is_empty() {
            debug!(%student_id, "pass_credits: no paid purchases");
            return Ok(Vec::new());
        }

        let mut group_ids: Vec<Uuid> = paid_purchases
            .iter()
            .map(|(_, dance_pass)| dance_pass.group_id)
            .collect();
        group_ids.sort_unstable();
        group_ids.dedup();

        let pass_visits = self
            .attendance_repo
            .list_pass_visits(student_id, group_ids)
            .await
            .map_err(|err| {
                error!(
                    %student_id,
                    db_error = ?err,
                    "pass_credits: failed to load visits"
                );
                StudioError::Internal(err)
            })?;

        let active = compute_active_passes(paid_purchases, &pass_visits);
        debug!(
            %student_id,
            active_passes = active.len(),
            "pass_credits: computed active passes"
        );

        Ok(active)
    }
}
