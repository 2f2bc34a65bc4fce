//! Account entity <-> model mapper

use onelink_core::{Account, Snowflake};

use crate::models::AccountModel;

impl From<AccountModel> for Account {
    fn from(model: AccountModel) -> Self {
        Account {
            id: Snowflake::new(model.id),
            email: model.email,
            display_name: model.display_name,
            google_subject: model.google_subject,
            created_at: model.created_at,
        }
    }
}
