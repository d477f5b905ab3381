//! Caregiver profile queries.

use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::db::{Database, SqlValue};
use crate::error::{DbError, DbResult};

/// New profile payload; `inviter_id` is generated when absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewInviter {
    pub inviter_id: Option<String>,
    pub baby_name: Option<String>,
    pub baby_age: Option<String>,
    pub baby_alimentation: Option<String>,
    pub baby_sleep_cycle: Option<String>,
    pub baby_bath_cycle: Option<String>,
    pub baby_meal_cycle: Option<String>,
    #[serde(default)]
    pub is_baby_taking_medicine: bool,
    #[serde(default)]
    pub is_baby_consulting_doctor: bool,
}

/// Partial profile update; only `Some` fields are written.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InviterPatch {
    pub baby_name: Option<String>,
    pub baby_age: Option<String>,
    pub baby_alimentation: Option<String>,
    pub baby_sleep_cycle: Option<String>,
    pub baby_bath_cycle: Option<String>,
    pub baby_meal_cycle: Option<String>,
    pub is_baby_taking_medicine: Option<bool>,
    pub is_baby_consulting_doctor: Option<bool>,
}

impl InviterPatch {
    /// SET clause fragments and aligned params for the provided fields.
    fn set_clauses(&self) -> (Vec<&'static str>, Vec<SqlValue>) {
        let mut columns = Vec::new();
        let mut params = Vec::new();

        let mut text = |column, value: &Option<String>| {
            if let Some(v) = value {
                columns.push(column);
                params.push(SqlValue::from(v.as_str()));
            }
        };
        text("baby_name = ?", &self.baby_name);
        text("baby_age = ?", &self.baby_age);
        text("baby_alimentation = ?", &self.baby_alimentation);
        text("baby_sleep_cycle = ?", &self.baby_sleep_cycle);
        text("baby_bath_cycle = ?", &self.baby_bath_cycle);
        text("baby_meal_cycle = ?", &self.baby_meal_cycle);

        if let Some(v) = self.is_baby_taking_medicine {
            columns.push("is_baby_taking_medicine = ?");
            params.push(v.into());
        }
        if let Some(v) = self.is_baby_consulting_doctor {
            columns.push("is_baby_consulting_doctor = ?");
            params.push(v.into());
        }

        (columns, params)
    }

    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        self.set_clauses().0.is_empty()
    }
}

/// Insert a profile, generating an id when the payload carries none.
/// Returns the profile id.
pub async fn create(db: &Database, profile: &NewInviter) -> DbResult<String> {
    let id = profile
        .inviter_id
        .clone()
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    db.execute(
        "INSERT INTO inviter ( \
             inviter_id, baby_name, baby_age, baby_alimentation, baby_sleep_cycle, \
             baby_bath_cycle, baby_meal_cycle, is_baby_taking_medicine, \
             is_baby_consulting_doctor \
         ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        &[
            id.as_str().into(),
            profile.baby_name.as_deref().into(),
            profile.baby_age.as_deref().into(),
            profile.baby_alimentation.as_deref().into(),
            profile.baby_sleep_cycle.as_deref().into(),
            profile.baby_bath_cycle.as_deref().into(),
            profile.baby_meal_cycle.as_deref().into(),
            profile.is_baby_taking_medicine.into(),
            profile.is_baby_consulting_doctor.into(),
        ],
    )
    .await?;

    Ok(id)
}

/// Apply a partial update; false when the profile does not exist.
/// An all-empty patch is rejected before any statement is built.
pub async fn update(db: &Database, id: &str, patch: &InviterPatch) -> DbResult<bool> {
    let (columns, mut params) = patch.set_clauses();
    if columns.is_empty() {
        return Err(DbError::invalid_input("no profile fields to update"));
    }

    params.push(id.into());
    let sql = format!(
        "UPDATE inviter SET {} WHERE inviter_id = ?",
        columns.join(", ")
    );
    let affected = db.execute(&sql, &params).await?;
    Ok(affected > 0)
}

/// One profile by id, or `None`.
pub async fn by_id(db: &Database, id: &str) -> DbResult<Option<Value>> {
    let rows = db
        .query(
            "SELECT inviter_id, baby_name, baby_age, baby_alimentation, \
                    baby_sleep_cycle, baby_bath_cycle, baby_meal_cycle, \
                    is_baby_taking_medicine, is_baby_consulting_doctor \
             FROM inviter \
             WHERE inviter_id = ?",
            &[id.into()],
        )
        .await?;
    Ok(rows.into_iter().next().map(Value::Object))
}
