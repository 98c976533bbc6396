//! `auxo_contact` data source.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tfkit::{Attribute, DataSource, Diagnostics, Schema, decode, encode};

use crate::api::tf::DiagnoseExt;
use crate::api::tf::dto::ContactDto;
use crate::api::tf::mappers::contact_to_dto;
use crate::domain::Service;

/// Looks up a contact by its exact email address.
pub struct ContactDataSource {
    service: Arc<Service>,
}

impl ContactDataSource {
    #[must_use]
    pub const fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl DataSource for ContactDataSource {
    fn type_name(&self) -> &'static str {
        "contact"
    }

    fn schema(&self) -> Schema {
        Schema::new("A contact person known to AUXO.")
            .attribute(Attribute::string("id").computed().describe("ID of the contact"))
            .attribute(Attribute::string("email").required().describe("Email address of the contact"))
    }

    async fn read(&self, config: Value) -> Result<Value, Diagnostics> {
        let config: ContactDto = decode("contact configuration", config)?;
        let email = config.email.value_or_default();
        let contact = self
            .service
            .find_contact(&email)
            .await
            .diagnose("Unable to find contact")?;
        encode(&contact_to_dto(&contact))
    }
}
