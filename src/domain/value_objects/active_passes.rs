use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    entities::{passes::PassEntity, purchases::PurchaseEntity, student_visits::PassVisitRow},
    value_objects::{groups::PassModel, purchases::PurchaseModel},
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActivePassModel {
    pub purchase: PurchaseModel,
    #[serde(rename = "pass")]
    pub dance_pass: PassModel,
    pub remaining_lessons: i64,
    pub visits_used: i64,
}

/// Attended lesson dates per group, sorted so a purchase's window is a suffix.
/// Skipped visits are dropped here and never use up credit.
struct AttendedDates(HashMap<Uuid, Vec<NaiveDate>>);

impl AttendedDates {
    fn new(visits: &[PassVisitRow]) -> Self {
        let mut by_group: HashMap<Uuid, Vec<NaiveDate>> = HashMap::new();
        for visit in visits.iter().filter(|visit| !visit.skipped) {
            by_group.entry(visit.group_id).or_default().push(visit.date);
        }
        for dates in by_group.values_mut() {
            dates.sort_unstable();
        }
        Self(by_group)
    }

    fn count_since(&self, group_id: Uuid, since: NaiveDate) -> i64 {
        self.0.get(&group_id).map_or(0, |dates| {
            let first_counted = dates.partition_point(|date| *date < since);
            (dates.len() - first_counted) as i64
        })
    }
}

/// Derives the student's usable passes from paid purchases and their visits.
/// Only attended (non-skipped) visits count.
///
/// A purchase covers lessons of its pass's group dated on or after the UTC calendar
/// day it was created. Unpaid purchases and exhausted ones (remaining <= 0) are left
/// out. Purchases are evaluated independently, so buying the same pass twice yields
/// two entries that each count the same visits.
pub fn compute_active_passes(
    paid_purchases: Vec<(PurchaseEntity, PassEntity)>,
    visits: &[PassVisitRow],
) -> Vec<ActivePassModel> {
    let attended = AttendedDates::new(visits);

    paid_purchases
        .into_iter()
        .filter(|(purchase, _)| purchase.paid_at.is_some())
        .filter_map(|(purchase, dance_pass)| {
            let since = purchase.created_at.date_naive();
            let visits_used = attended.count_since(dance_pass.group_id, since);
            let remaining_lessons = i64::from(dance_pass.lessons_included) - visits_used;

            (remaining_lessons > 0).then(|| ActivePassModel {
                purchase: PurchaseModel::from(purchase),
                dance_pass: PassModel::from(dance_pass),
                remaining_lessons,
                visits_used,
            })
        })
        .collect()
}
