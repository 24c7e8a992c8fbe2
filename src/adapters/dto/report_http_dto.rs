use chrono::{Days, NaiveDate, NaiveTime};
use serde::Deserialize;

use crate::{
    application::{dto::report_dto::ReportFilterDTO, error::ApplicationError},
    domain::models::report::DocumentType,
};

#[derive(Debug, Default, Deserialize)]
pub struct ListReportDocumentsQuery {
    /// `excel`, `pdf` or `all`.
    #[serde(rename = "type")]
    pub document_type: Option<String>,
    /// Maintenance date, `YYYY-MM-DD`.
    pub date: Option<String>,
    /// First creation day included, `YYYY-MM-DD`.
    pub from: Option<String>,
    /// Last creation day included, `YYYY-MM-DD`.
    pub to: Option<String>,
    pub search: Option<String>,
    #[serde(rename = "createdBy")]
    pub created_by: Option<String>,
}

fn parse_day(field: &str, value: &str) -> Result<NaiveDate, ApplicationError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| ApplicationError::BadRequest(format!("{} must be a YYYY-MM-DD date", field)))
}

impl TryFrom<ListReportDocumentsQuery> for ReportFilterDTO {
    type Error = ApplicationError;

    fn try_from(query: ListReportDocumentsQuery) -> Result<Self, Self::Error> {
        let non_blank = |value: Option<String>| value.filter(|v| !v.trim().is_empty());

        let document_type = match non_blank(query.document_type) {
            None => None,
            Some(value) if value == "all" => None,
            Some(value) => Some(
                value
                    .parse::<DocumentType>()
                    .map_err(ApplicationError::BadRequest)?,
            ),
        };
        let maintenance_date = non_blank(query.date)
            .map(|d| parse_day("date", &d))
            .transpose()?;
        let created_from = non_blank(query.from)
            .map(|d| parse_day("from", &d))
            .transpose()?
            .map(|day| day.and_time(NaiveTime::MIN).and_utc());
        let created_before = non_blank(query.to)
            .map(|d| parse_day("to", &d))
            .transpose()?
            .and_then(|day| day.checked_add_days(Days::new(1)))
            .map(|day| day.and_time(NaiveTime::MIN).and_utc());

        Ok(ReportFilterDTO {
            created_by: non_blank(query.created_by),
            document_type,
            maintenance_date,
            created_from,
            created_before,
            search: non_blank(query.search),
        })
    }
}
