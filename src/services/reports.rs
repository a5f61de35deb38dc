//! Dashboard counters and period reports, computed from the live mirror

use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime};

use crate::{
    models::{
        contact::CONTACTS,
        document::Document,
        rental::RENTALS,
        repair::REPAIRS,
        report::{DashboardStats, PeriodReport, ReportPeriod},
        submission::SubmissionKind,
        user::USERS,
    },
    session::Session,
};

#[derive(Clone, Default)]
pub struct ReportsService;

/// Calendar date of a stored date string, in local time
fn parse_date(raw: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Local).date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.date());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

/// Whether a date field falls in the period; missing or unparsable dates
/// only count for `All`
pub(crate) fn in_period(raw: Option<&str>, period: ReportPeriod, today: NaiveDate) -> bool {
    if period == ReportPeriod::All {
        return true;
    }
    let Some(date) = raw.and_then(parse_date) else {
        return false;
    };
    match period {
        ReportPeriod::Daily => date == today,
        ReportPeriod::Monthly => date.year() == today.year() && date.month() == today.month(),
        ReportPeriod::Yearly => date.year() == today.year(),
        ReportPeriod::All => true,
    }
}

fn count_in_period(
    documents: &[Document],
    field: &str,
    period: ReportPeriod,
    today: NaiveDate,
) -> usize {
    documents
        .iter()
        .filter(|d| in_period(d.str_field(field), period, today))
        .count()
}

impl ReportsService {
    pub fn new() -> Self {
        Self
    }

    pub async fn dashboard(&self, session: &Session) -> DashboardStats {
        let mirror = session.mirror();
        let rentals = mirror.documents(RENTALS).await;
        let repairs = mirror.documents(REPAIRS).await;

        DashboardStats {
            total_clients: mirror.documents(CONTACTS).await.len(),
            active_rentals: rentals
                .iter()
                .filter(|d| d.str_field("status") == Some("Active"))
                .count(),
            open_repairs: repairs
                .iter()
                .filter(|d| matches!(d.str_field("status"), Some("Open") | Some("In Progress")))
                .count(),
            system_users: mirror.documents(USERS).await.len(),
        }
    }

    pub async fn period_report(&self, session: &Session, period: ReportPeriod) -> PeriodReport {
        self.period_report_on(session, period, Local::now().date_naive())
            .await
    }

    async fn period_report_on(
        &self,
        session: &Session,
        period: ReportPeriod,
        today: NaiveDate,
    ) -> PeriodReport {
        let mirror = session.mirror();
        let contacts = mirror.documents(CONTACTS).await;
        let rentals = mirror.documents(RENTALS).await;
        let repairs = mirror.documents(REPAIRS).await;

        let mut report = PeriodReport {
            period,
            new_contacts: count_in_period(&contacts, "createdAt", period, today),
            new_rentals: count_in_period(&rentals, "startDate", period, today),
            new_repairs: count_in_period(&repairs, "reportedDate", period, today),
            completed_repairs: repairs
                .iter()
                .filter(|d| d.str_field("status") == Some("Completed"))
                .filter(|d| in_period(d.str_field("reportedDate"), period, today))
                .count(),
            ..PeriodReport::default()
        };

        for kind in SubmissionKind::ALL {
            let documents = mirror.documents(kind.collection()).await;
            let count = count_in_period(&documents, kind.timestamp_field(), period, today);
            match kind {
                SubmissionKind::Contact => report.new_site_contacts = count,
                SubmissionKind::Rental => report.new_site_rentals = count,
                SubmissionKind::Repair => report.new_site_repairs = count,
            }
        }
        report
    }
}
