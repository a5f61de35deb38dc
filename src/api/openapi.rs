//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{
    activity, auth, contacts, health, inventory, rentals, repairs, reports, sales, session,
    settings, submissions, users, vendors,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "SpinCity API",
        version = "1.1.0",
        description = "Rental, repair and sales back-office REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html"),
        contact(name = "SpinCity", email = "developer@dtechsoftwares.com")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    modifiers(&BearerAuth),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::register,
        auth::login,
        auth::logout,
        auth::me,
        // Session
        session::status,
        session::activity,
        session::list_toasts,
        session::dismiss_toast,
        session::events,
        session::open_gate,
        session::verify_admin_key,
        // Users
        users::list_users,
        users::get_user,
        users::update_user,
        users::delete_user,
        // Contacts
        contacts::list_contacts,
        contacts::get_contact,
        contacts::create_contact,
        contacts::update_contact,
        contacts::delete_contact,
        // Rentals
        rentals::list_plans,
        rentals::list_rentals,
        rentals::get_rental,
        rentals::create_rental,
        rentals::update_rental,
        rentals::delete_rental,
        // Repairs
        repairs::list_repairs,
        repairs::get_repair,
        repairs::create_repair,
        repairs::update_repair,
        repairs::delete_repair,
        // Inventory
        inventory::list_inventory,
        inventory::list_available,
        inventory::get_item,
        inventory::create_item,
        inventory::update_item,
        inventory::delete_item,
        // Sales
        sales::list_sales,
        sales::get_sale,
        sales::create_sale,
        sales::update_sale,
        sales::delete_sale,
        // Vendors
        vendors::list_vendors,
        vendors::get_vendor,
        vendors::create_vendor,
        vendors::update_vendor,
        vendors::delete_vendor,
        // Activity log
        activity::list_logs,
        activity::delete_log,
        // Website submissions
        submissions::overview,
        submissions::list_submissions,
        submissions::update_status,
        submissions::delete_submission,
        // Reports
        reports::dashboard,
        reports::period_report,
        // Settings
        settings::get_branding,
        settings::get_settings,
        settings::update_app_logo,
        settings::update_splash_logo,
        settings::update_sms_settings,
        settings::update_admin_key,
        settings::update_notification_settings,
    ),
    components(
        schemas(
            // Auth & users
            crate::models::user::Role,
            crate::models::user::User,
            crate::models::user::RegisterUser,
            crate::models::user::LoginRequest,
            crate::models::user::LoginResponse,
            crate::models::user::UpdateUser,
            // Session
            session::ActivityRequest,
            session::OpenGateRequest,
            session::VerifyAdminKeyRequest,
            session::VerifyAdminKeyResponse,
            crate::session::SessionStatus,
            crate::session::EndReason,
            crate::session::inactivity::ActivityEvent,
            crate::session::toast::Toast,
            crate::session::toast::ToastKind,
            // Contacts
            crate::models::contact::Contact,
            crate::models::contact::ContactInput,
            // Rentals
            rentals::PlanPrice,
            crate::models::rental::RentalPlan,
            crate::models::rental::RentalStatus,
            crate::models::rental::Rental,
            crate::models::rental::RentalInput,
            // Repairs
            crate::models::repair::RepairStatus,
            crate::models::repair::Repair,
            crate::models::repair::RepairInput,
            // Inventory
            crate::models::inventory::InventoryStatus,
            crate::models::inventory::InventoryItem,
            crate::models::inventory::InventoryInput,
            // Sales
            crate::models::sale::Sale,
            crate::models::sale::SaleInput,
            // Vendors
            crate::models::vendor::Vendor,
            crate::models::vendor::VendorInput,
            crate::models::vendor::VendorSummary,
            // Activity log
            crate::models::log_entry::ActionType,
            crate::models::log_entry::LogEntry,
            // Website submissions
            crate::models::submission::SubmissionKind,
            crate::models::submission::SubmissionStatus,
            crate::models::submission::SiteContact,
            crate::models::submission::SiteRental,
            crate::models::submission::SiteRepair,
            crate::models::submission::UpdateSubmissionStatus,
            crate::models::submission::SubmissionOverview,
            // Reports
            crate::models::report::ReportPeriod,
            crate::models::report::DashboardStats,
            crate::models::report::PeriodReport,
            // Settings
            settings::Branding,
            crate::models::settings::SettingsView,
            crate::models::settings::SmsSettings,
            crate::models::settings::NotificationSettings,
            crate::models::settings::UpdateLogo,
            crate::models::settings::UpdateAdminKey,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Registration and sign-in"),
        (name = "session", description = "Session status, toasts and admin-key confirmation"),
        (name = "users", description = "User profiles"),
        (name = "contacts", description = "Client records"),
        (name = "rentals", description = "Rental agreements"),
        (name = "repairs", description = "Repair tickets"),
        (name = "inventory", description = "Machine inventory"),
        (name = "sales", description = "Machine sales"),
        (name = "vendors", description = "Suppliers"),
        (name = "activity", description = "Audit log"),
        (name = "submissions", description = "Public website submissions"),
        (name = "reports", description = "Dashboard and period reports"),
        (name = "settings", description = "Application settings")
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            let scheme = HttpBuilder::new()
                .scheme(HttpAuthScheme::Bearer)
                .bearer_format("JWT")
                .build();
            components.add_security_scheme("bearer_auth", SecurityScheme::Http(scheme));
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
