//! [`ActorEntity`] implementation for [`Partner`].

use super::actions::{PartnerAction, PartnerActionResult, ReleaseReason};
use super::error::PartnerError;
use crate::clock::Clock;
use crate::model::{
    Partner, PartnerCreate, PartnerFilter, PartnerId, PartnerMetrics, PartnerStatus, PartnerUpdate,
};
use async_trait::async_trait;
use dispatch_actor::ActorEntity;
use std::collections::BTreeSet;
use tracing::debug;

fn validate_areas(areas: &BTreeSet<String>) -> Result<(), PartnerError> {
    if areas.is_empty() {
        return Err(PartnerError::Validation(
            "a partner must serve at least one area".into(),
        ));
    }
    if areas.iter().any(|area| area.trim().is_empty()) {
        return Err(PartnerError::Validation("area labels must not be blank".into()));
    }
    Ok(())
}

fn validate_rating(rating: f32) -> Result<(), PartnerError> {
    if !(0.0..=Partner::MAX_RATING).contains(&rating) {
        return Err(PartnerError::Validation(format!(
            "rating {rating} outside 0..={}",
            Partner::MAX_RATING
        )));
    }
    Ok(())
}

#[async_trait]
impl ActorEntity for Partner {
    type Id = PartnerId;
    type Create = PartnerCreate;
    type Update = PartnerUpdate;
    type Filter = PartnerFilter;
    type Action = PartnerAction;
    type ActionResult = PartnerActionResult;
    type Context = Clock;
    type Error = PartnerError;

    fn from_create_params(
        id: PartnerId,
        params: PartnerCreate,
        clock: &Clock,
    ) -> Result<Self, PartnerError> {
        if params.name.trim().is_empty() {
            return Err(PartnerError::Validation("name must not be empty".into()));
        }
        if !params.email.contains('@') {
            return Err(PartnerError::Validation(format!(
                "'{}' is not an email address",
                params.email
            )));
        }
        validate_areas(&params.areas)?;

        let now = clock();
        Ok(Self {
            id,
            name: params.name,
            email: params.email,
            phone: params.phone,
            credential: params.credential,
            areas: params.areas,
            shift: params.shift,
            status: PartnerStatus::Active,
            current_load: 0,
            metrics: PartnerMetrics::default(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Emails identify partners at login, so they are unique.
    fn conflicts_with(&self, existing: &Self) -> bool {
        self.email.eq_ignore_ascii_case(&existing.email)
    }

    fn matches(&self, filter: &PartnerFilter) -> bool {
        filter.matches(self)
    }

    /// Validates the whole update before applying any field.
    async fn on_update(
        &mut self,
        update: PartnerUpdate,
        clock: &Clock,
    ) -> Result<(), PartnerError> {
        if let Some(areas) = &update.areas {
            validate_areas(areas)?;
        }
        if let Some(rating) = update.rating {
            validate_rating(rating)?;
        }
        if let Some(name) = &update.name {
            if name.trim().is_empty() {
                return Err(PartnerError::Validation("name must not be empty".into()));
            }
        }

        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(phone) = update.phone {
            self.phone = phone;
        }
        if let Some(areas) = update.areas {
            self.areas = areas;
        }
        if let Some(shift) = update.shift {
            self.shift = shift;
        }
        if let Some(rating) = update.rating {
            self.metrics.rating = rating;
        }
        self.updated_at = clock();
        Ok(())
    }

    async fn on_delete(&self, _clock: &Clock) -> Result<(), PartnerError> {
        if self.current_load > 0 {
            return Err(PartnerError::Validation(format!(
                "{} still holds {} open assignment(s)",
                self.id, self.current_load
            )));
        }
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: PartnerAction,
        clock: &Clock,
    ) -> Result<PartnerActionResult, PartnerError> {
        match action {
            PartnerAction::Reserve { capacity } => {
                if !self.is_active() {
                    return Err(PartnerError::Inactive(self.id));
                }
                if self.current_load >= capacity {
                    return Err(PartnerError::AtCapacity {
                        id: self.id,
                        load: self.current_load,
                        capacity,
                    });
                }
                self.current_load += 1;
                self.updated_at = clock();
                debug!(partner = %self.id, load = self.current_load, "Reserved");
                Ok(PartnerActionResult::Reserve(self.current_load))
            }
            PartnerAction::Release(reason) => {
                if self.current_load == 0 {
                    return Err(PartnerError::NoOpenAssignment(self.id));
                }
                self.current_load -= 1;
                match reason {
                    ReleaseReason::Completed => self.metrics.completed_orders += 1,
                    ReleaseReason::Cancelled => self.metrics.cancelled_orders += 1,
                    ReleaseReason::Rollback => {}
                }
                self.updated_at = clock();
                debug!(partner = %self.id, load = self.current_load, ?reason, "Released");
                Ok(PartnerActionResult::Release(self.current_load))
            }
            PartnerAction::SetStatus(status) => {
                self.status = status;
                self.updated_at = clock();
                Ok(PartnerActionResult::SetStatus(self.clone()))
            }
        }
    }
}
