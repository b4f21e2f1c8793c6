//! Service account keys, listed account by account

use super::api::{fetch_items, item_field};
use super::error_handler::handle_list_error;
use super::registry::{self, ResourceDef};
use super::supplier::{read_all, Supplier, SupplierContext};
use crate::error::Result;
use crate::resource::iam::ServiceAccountKey;
use crate::resource::{GoogleResource, Resource, GOOGLE_SERVICE_ACCOUNT};
use async_trait::async_trait;

pub struct ServiceAccountKeySupplier {
    ctx: SupplierContext,
    accounts: &'static ResourceDef,
    def: &'static ResourceDef,
}

impl ServiceAccountKeySupplier {
    pub fn new(ctx: SupplierContext) -> Result<Self> {
        Ok(Self {
            ctx,
            accounts: registry::definition(GOOGLE_SERVICE_ACCOUNT)?,
            def: registry::definition(ServiceAccountKey::TYPE)?,
        })
    }
}

#[async_trait]
impl Supplier for ServiceAccountKeySupplier {
    fn resource_type(&self) -> &'static str {
        ServiceAccountKey::TYPE
    }

    async fn resources(&self) -> Result<Vec<GoogleResource>> {
        let api = self.ctx.api.as_ref();

        let request = self.accounts.list_request(&self.ctx.project, &[]);
        let accounts = match fetch_items(api, &request, self.accounts.paged).await {
            Ok(accounts) => accounts,
            Err(err) => {
                return handle_list_error(
                    err,
                    ServiceAccountKey::TYPE,
                    Some(GOOGLE_SERVICE_ACCOUNT),
                    &self.ctx.alerter,
                )
            },
        };

        let mut args = Vec::new();
        for account in &accounts {
            let email = item_field(account, "email", GOOGLE_SERVICE_ACCOUNT)?;
            let request = self
                .def
                .list_request(&self.ctx.project, &[("serviceAccount", email)]);

            let keys = match fetch_items(api, &request, self.def.paged).await {
                Ok(keys) => keys,
                Err(err) => {
                    return handle_list_error(err, ServiceAccountKey::TYPE, None, &self.ctx.alerter)
                },
            };

            for key in &keys {
                let mut key_args = self.def.read_args(ServiceAccountKey::TYPE, key)?;
                key_args
                    .attributes
                    .insert("serviceAccount".to_string(), email.to_string());
                args.push(key_args);
            }
        }

        read_all::<ServiceAccountKey>(&self.ctx, self.def, args).await
    }
}
