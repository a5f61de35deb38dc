//! Rental agreement service

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        document::{to_document_data, DocumentData},
        log_entry::ActionType,
        rental::{Rental, RentalInput, RENTALS},
    },
    repository::SharedStore,
    session::Session,
};

use super::{contacts::client_name, delete_entity, insert_entity, update_entity};

const ENTITY: &str = "Rental";
const TERMS_NOT_ACKNOWLEDGED: &str = "Please acknowledge all agreement terms before saving.";

#[derive(Clone)]
pub struct RentalsService {
    store: SharedStore,
}

/// Validated document fields; the rate always comes from the plan
fn rental_data(input: &RentalInput) -> AppResult<DocumentData> {
    input.validate()?;
    if !input.all_terms_acknowledged() {
        return Err(AppError::Validation(TERMS_NOT_ACKNOWLEDGED.to_string()));
    }
    if let Some(submitted) = input.monthly_rate {
        if submitted != input.plan.monthly_rate() {
            tracing::debug!(%submitted, plan = %input.plan, "Ignoring submitted monthly rate");
        }
    }

    let mut data = to_document_data(input)?;
    data.insert(
        "monthlyRate".to_string(),
        rust_decimal::serde::float::serialize(
            &input.plan.monthly_rate(),
            serde_json::value::Serializer,
        )?,
    );
    Ok(data)
}

impl RentalsService {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    pub async fn list(&self, session: &Session) -> Vec<Rental> {
        session.mirror().list(RENTALS).await
    }

    pub async fn get(&self, session: &Session, id: &str) -> AppResult<Rental> {
        session.mirror().get(RENTALS, id).await
    }

    pub async fn create(&self, session: &Session, input: RentalInput) -> AppResult<Rental> {
        let contact_name = client_name(session, &input.contact_id).await;
        let rental = session
            .perform(
                ActionType::Create,
                ENTITY,
                async { insert_entity(&self.store, RENTALS, rental_data(&input)?).await },
                |_: &Rental| format!("Created rental for {}", contact_name),
            )
            .await?;

        session
            .toasts
            .success("New Manual Submission", "New rental agreement created.")
            .await;
        Ok(rental)
    }

    pub async fn update(&self, session: &Session, id: &str, input: RentalInput) -> AppResult<Rental> {
        session
            .perform(
                ActionType::Update,
                ENTITY,
                async { update_entity(&self.store, RENTALS, id, rental_data(&input)?).await },
                |r: &Rental| format!("Updated rental {}", r.id),
            )
            .await
    }

    pub async fn delete(&self, session: &Session, id: &str) -> AppResult<()> {
        session.require_admin()?;
        session
            .perform(
                ActionType::Delete,
                ENTITY,
                delete_entity(&self.store, RENTALS, id),
                |_| format!("Deleted rental {}", id),
            )
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{
            contact::ContactInput,
            rental::{RentalPlan, RentalStatus},
        },
        services::tests::{admin_session, fixture, settle},
    };
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn input(contact_id: &str, plan: RentalPlan) -> RentalInput {
        RentalInput {
            contact_id: contact_id.to_string(),
            plan,
            monthly_rate: Some(Decimal::ONE),
            maintenance_option: "Standard".into(),
            delivery_payment_option: "Upfront".into(),
            status: RentalStatus::PendingSignature,
            start_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            rental_property_address: "9 Elm St".into(),
            emergency_contact_full_name: "Kim".into(),
            emergency_contact_relationship: "Sister".into(),
            emergency_contact_address: String::new(),
            emergency_contact_email: String::new(),
            emergency_contact_phone: "555-0101".into(),
            ack_payment_terms: true,
            ack_relocation_terms: true,
            ack_additional_terms: true,
            renter_printed_name: "Bob Renter".into(),
            digital_signature: "Bob Renter".into(),
        }
    }

    #[tokio::test]
    async fn test_rate_comes_from_plan() {
        let (services, store) = fixture().await;
        let session = admin_session(&services).await;

        let rental = services
            .rentals
            .create(&session, input("c1", RentalPlan::TwelveMonthSmart))
            .await
            .unwrap();
        assert_eq!(rental.monthly_rate, Decimal::new(4999, 2));

        let stored = store.get(RENTALS, &rental.id).await.unwrap().unwrap();
        assert_eq!(stored.field("monthlyRate"), Some(&serde_json::json!(49.99)));

        let updated = services
            .rentals
            .update(&session, &rental.id, input("c1", RentalPlan::PremiumAppliance))
            .await
            .unwrap();
        assert_eq!(updated.monthly_rate, Decimal::new(8999, 2));
    }

    #[tokio::test]
    async fn test_every_term_must_be_acknowledged() {
        let (services, _) = fixture().await;
        let session = admin_session(&services).await;

        let mut unsigned = input("c1", RentalPlan::SixMonth);
        unsigned.ack_relocation_terms = false;
        let err = services.rentals.create(&session, unsigned).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg == TERMS_NOT_ACKNOWLEDGED));
    }

    #[tokio::test]
    async fn test_audit_names_the_client() {
        let (services, _) = fixture().await;
        let session = admin_session(&services).await;
        let contact = services
            .contacts
            .create(
                &session,
                ContactInput {
                    full_name: "Bob".into(),
                    email: String::new(),
                    phone: "555".into(),
                    address: String::new(),
                    notes: None,
                },
            )
            .await
            .unwrap();
        settle(session.mirror(), crate::models::contact::CONTACTS, |d| d.len() == 1).await;

        services
            .rentals
            .create(&session, input(&contact.id, RentalPlan::MonthToMonth))
            .await
            .unwrap();

        let logs = crate::models::log_entry::ACTIVITY_LOGS;
        settle(session.mirror(), logs, |docs| {
            docs.iter()
                .any(|d| d.str_field("details") == Some("Created rental for Bob"))
        })
        .await;
    }
}
