use sqlx::{postgres::PgRow, FromRow, Row};

use crate::{
    application::dto::user_dto::UserDTO,
    domain::models::user::{CompanyType, Role},
};

impl FromRow<'_, PgRow> for UserDTO {
    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        let role: String = row.try_get("role")?;
        let company_type: String = row.try_get("company_type")?;
        Ok(UserDTO {
            uid: row.try_get("uid")?,
            email: Some(row.try_get("email")?),
            role: Some(role.parse::<Role>().map_err(|e| sqlx::Error::ColumnDecode {
                index: "role".to_string(),
                source: e.into(),
            })?),
            company_type: Some(company_type.parse::<CompanyType>().map_err(|e| {
                sqlx::Error::ColumnDecode {
                    index: "company_type".to_string(),
                    source: e.into(),
                }
            })?),
            created_at: Some(row.try_get("created_at")?),
        })
    }
}
