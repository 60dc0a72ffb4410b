use sea_orm::{ActiveValue, TransactionTrait, prelude::*};

use crate::{ResultEngine, profiles};

use super::{Engine, with_tx};

impl Engine {
    /// Inserts the caller's profile on first authentication.
    ///
    /// Profiles are owned by the identity provider: an existing row is left
    /// untouched, whatever the provider sends on later requests.
    pub async fn ensure_profile(
        &self,
        id: &str,
        email: &str,
        full_name: Option<&str>,
    ) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let exists = profiles::Entity::find_by_id(id.to_string())
                .one(&db_tx)
                .await?
                .is_some();
            if !exists {
                let profile = profiles::ActiveModel {
                    id: ActiveValue::Set(id.to_string()),
                    email: ActiveValue::Set(email.to_string()),
                    full_name: ActiveValue::Set(full_name.map(ToString::to_string)),
                };
                profile.insert(&db_tx).await?;
                tracing::debug!(user_id = %id, "created profile on first authentication");
            }
            Ok(())
        })
    }
}
