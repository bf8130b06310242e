//! # Assignment Matcher
//!
//! Picks a partner for an order from a list of candidates. Pure: the order actor fetches
//! the candidates, calls [`select`], and then performs the reservation and ledger append.
//!
//! A partner is eligible when it is active, serves the order's area (exact,
//! case-sensitive label) and holds fewer open assignments than the capacity ceiling.
//! Among eligible partners the lowest load wins, then the highest rating, then the
//! earliest onboarding time, then the lowest id.

use crate::model::{FailureReason, Partner, PartnerId};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Chosen(PartnerId),
    Unavailable(FailureReason),
}

/// Choose a partner for an order in `area`.
///
/// `candidates` may contain anyone; partners outside the area or inactive are ignored.
/// When none is left the reason is [`FailureReason::NoEligiblePartnerInArea`]; when some
/// are left but all are at `capacity`, it is
/// [`FailureReason::AllEligiblePartnersAtCapacity`].
pub fn select(area: &str, candidates: &[Partner], capacity: u32) -> Selection {
    let mut in_area = candidates
        .iter()
        .filter(|p| p.is_active() && p.covers(area))
        .peekable();

    if in_area.peek().is_none() {
        return Selection::Unavailable(FailureReason::NoEligiblePartnerInArea);
    }

    in_area
        .filter(|p| p.current_load < capacity)
        .min_by(|a, b| rank(a, b))
        .map_or(
            Selection::Unavailable(FailureReason::AllEligiblePartnersAtCapacity),
            |p| Selection::Chosen(p.id),
        )
}

/// `Less` means `a` is preferred.
fn rank(a: &Partner, b: &Partner) -> Ordering {
    a.current_load
        .cmp(&b.current_load)
        .then_with(|| b.metrics.rating.total_cmp(&a.metrics.rating))
        .then_with(|| a.created_at.cmp(&b.created_at))
        .then_with(|| a.id.cmp(&b.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Credential, PartnerMetrics, PartnerStatus};
    use chrono::{Duration, TimeZone, Utc};

    fn partner(id: u32, areas: &[&str], load: u32, rating: f32) -> Partner {
        let created_at =
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::hours(id.into());
        Partner {
            id: PartnerId(id),
            name: format!("Partner {id}"),
            email: format!("p{id}@example.com"),
            phone: String::new(),
            credential: Credential::new("x"),
            areas: areas.iter().map(|a| a.to_string()).collect(),
            shift: None,
            status: PartnerStatus::Active,
            current_load: load,
            metrics: PartnerMetrics {
                rating,
                ..PartnerMetrics::default()
            },
            created_at,
            updated_at: created_at,
        }
    }

    #[test]
    fn picks_partner_serving_the_area() {
        let partners = [partner(1, &["North"], 0, 5.0), partner(2, &["South"], 0, 5.0)];
        assert_eq!(select("North", &partners, 3), Selection::Chosen(PartnerId(1)));
        assert_eq!(select("South", &partners, 3), Selection::Chosen(PartnerId(2)));
    }

    #[test]
    fn area_match_is_exact_and_case_sensitive() {
        let partners = [partner(1, &["North"], 0, 5.0)];
        assert_eq!(
            select("north", &partners, 3),
            Selection::Unavailable(FailureReason::NoEligiblePartnerInArea)
        );
        assert_eq!(
            select("North ", &partners, 3),
            Selection::Unavailable(FailureReason::NoEligiblePartnerInArea)
        );
    }

    #[test]
    fn distinguishes_empty_area_from_full_area() {
        let partners = [partner(1, &["North"], 2, 5.0), partner(2, &["North"], 3, 5.0)];
        assert_eq!(
            select("North", &partners, 2),
            Selection::Unavailable(FailureReason::AllEligiblePartnersAtCapacity)
        );
        assert_eq!(
            select("East", &partners, 2),
            Selection::Unavailable(FailureReason::NoEligiblePartnerInArea)
        );
        assert_eq!(
            select("East", &[], 2),
            Selection::Unavailable(FailureReason::NoEligiblePartnerInArea)
        );
    }

    #[test]
    fn inactive_partners_never_count() {
        let mut idle = partner(1, &["North"], 0, 5.0);
        idle.status = PartnerStatus::Inactive;
        assert_eq!(
            select("North", &[idle.clone()], 3),
            Selection::Unavailable(FailureReason::NoEligiblePartnerInArea)
        );

        let busy = partner(2, &["North"], 3, 5.0);
        assert_eq!(
            select("North", &[idle, busy], 3),
            Selection::Unavailable(FailureReason::AllEligiblePartnersAtCapacity)
        );
    }

    #[test]
    fn tie_break_order() {
        // Lowest load first, whatever the rating.
        let partners = [partner(1, &["A"], 1, 5.0), partner(2, &["A"], 0, 1.0)];
        assert_eq!(select("A", &partners, 3), Selection::Chosen(PartnerId(2)));

        // Equal load: highest rating.
        let partners = [partner(1, &["A"], 1, 4.0), partner(2, &["A"], 1, 4.5)];
        assert_eq!(select("A", &partners, 3), Selection::Chosen(PartnerId(2)));

        // Equal load and rating: earliest onboarding.
        let partners = [partner(3, &["A"], 0, 4.0), partner(2, &["A"], 0, 4.0)];
        assert_eq!(select("A", &partners, 3), Selection::Chosen(PartnerId(2)));

        // Everything equal: lowest id.
        let mut twin = partner(9, &["A"], 0, 4.0);
        twin.created_at = partner(4, &["A"], 0, 4.0).created_at;
        let partners = [twin, partner(4, &["A"], 0, 4.0)];
        assert_eq!(select("A", &partners, 3), Selection::Chosen(PartnerId(4)));
    }

    #[test]
    fn selection_ignores_candidate_order() {
        let mut partners = vec![
            partner(1, &["A"], 2, 3.0),
            partner(2, &["A"], 1, 4.0),
            partner(3, &["A"], 1, 4.0),
            partner(4, &["B"], 0, 5.0),
        ];
        let forward = select("A", &partners, 3);
        partners.reverse();
        assert_eq!(select("A", &partners, 3), forward);
        assert_eq!(forward, Selection::Chosen(PartnerId(2)));
    }
}
