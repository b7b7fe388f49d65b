use diesel::prelude::*;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::ports::SettingsRepository;
use crate::schema::settings;

use super::models::{NewSettingRow, SettingRow};

pub struct DieselSettingsRepository {
    pool: DbPool,
}

impl DieselSettingsRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl SettingsRepository for DieselSettingsRepository {
    fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = settings::table
            .find(key)
            .select(SettingRow::as_select())
            .first(&mut conn)
            .optional()?;
        Ok(row.map(|r| r.value))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;

        diesel::insert_into(settings::table)
            .values(&NewSettingRow { key, value })
            .on_conflict(settings::key)
            .do_update()
            .set((
                settings::value.eq(value),
                settings::updated_at.eq(diesel::dsl::now),
            ))
            .execute(&mut conn)?;
        Ok(())
    }
}
