use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set, SqlErr};
use tracing::debug;

use crate::domain::{normalize_email, Account, AccountRepository, NewAccount};
use crate::infrastructure::database::entities::account;
use crate::support::errors::{DomainError, DomainResult, InfraError};

pub struct SeaOrmAccountRepository {
    db: DatabaseConnection,
}

impl SeaOrmAccountRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn account_model_to_domain(model: account::Model) -> Account {
    Account {
        id: model.id,
        name: model.name,
        email: model.email,
        password_hash: model.password_hash,
        created_at: model.created_at,
    }
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    InfraError::Database(e).into()
}

#[async_trait]
impl AccountRepository for SeaOrmAccountRepository {
    async fn create_account(&self, dto: NewAccount) -> DomainResult<Account> {
        let new_account = account::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            name: Set(dto.name),
            email: Set(normalize_email(&dto.email)),
            password_hash: Set(dto.password_hash),
            created_at: Set(Utc::now()),
        };

        let model = new_account.insert(&self.db).await.map_err(|e| {
            if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                DomainError::account_exists()
            } else {
                db_err(e)
            }
        })?;

        debug!(account_id = %model.id, "Account row inserted");
        Ok(account_model_to_domain(model))
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<Account>> {
        let model = account::Entity::find()
            .filter(account::Column::Email.eq(normalize_email(email)))
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(model.map(account_model_to_domain))
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Account>> {
        let model = account::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(model.map(account_model_to_domain))
    }
}
