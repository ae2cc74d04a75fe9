use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{header, Client, Method, RequestBuilder};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, info, warn};
use urlencoding::encode;

use super::error::ApiError;
use super::time::format_date;
use super::types::*;
use crate::config::Config;
use crate::schedule::{NewShift, SavedWeek, ScheduleApi, ShiftException, VacationRemoval};
use crate::session::{Session, UserProfile};

/// The employee list comes either bare or wrapped in `data`.
#[derive(Deserialize)]
#[serde(untagged)]
enum EmployeeList {
    Plain(Vec<Employee>),
    Wrapped { data: Vec<Employee> },
}

impl EmployeeList {
    fn into_vec(self) -> Vec<Employee> {
        match self {
            EmployeeList::Plain(list) | EmployeeList::Wrapped { data: list } => list,
        }
    }
}

pub struct ScheduleClient {
    client: Client,
    base_url: String,
    auth_header: String,
    company_id: String,
    employee_id: String,
    branch_id: Option<String>,
}

impl ScheduleClient {
    pub fn new(config: &Config, session: &Session) -> Result<Self, ApiError> {
        if config.api_base_url.trim().is_empty() {
            return Err(ApiError::NotConfigured("API URL"));
        }
        if config.company_id.trim().is_empty() {
            return Err(ApiError::NotConfigured("company"));
        }
        if config.employee_id.trim().is_empty() {
            return Err(ApiError::NotConfigured("employee"));
        }

        let client = Client::builder().build()?;

        Ok(Self {
            client,
            base_url: config.base_url(),
            auth_header: session.bearer(),
            company_id: config.company_id.trim().to_string(),
            employee_id: config.employee_id.trim().to_string(),
            branch_id: config.branch_id.clone().filter(|b| !b.trim().is_empty()),
        })
    }

    pub fn branch_id(&self) -> Option<&str> {
        self.branch_id.as_deref()
    }

    fn company_path(&self) -> String {
        format!("/companies/{}", encode(&self.company_id))
    }

    fn schedules_path(&self) -> Result<String, ApiError> {
        let branch = self.branch_id.as_deref().ok_or(ApiError::NotConfigured("branch"))?;
        Ok(format!("{}/branches/{}/schedules", self.company_path(), encode(branch)))
    }

    fn record_path(&self, schedule_id: &str, tail: &str) -> Result<String, ApiError> {
        Ok(format!("{}/{}/{}", self.schedules_path()?, encode(schedule_id), tail))
    }

    fn request(&self, method: Method, endpoint: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!(%method, %url, "api request");
        self.client
            .request(method, url)
            .header(header::AUTHORIZATION, &self.auth_header)
            .header(header::ACCEPT, "application/json")
    }

    /// Sends the request and returns the raw body of a 2xx response.
    async fn send(&self, request: RequestBuilder) -> Result<String, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if !status.is_success() {
            let err = ApiError::from_body(status, &body);
            warn!(%status, error = %err, "api request failed");
            return Err(err);
        }
        Ok(body)
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        let body = self.send(self.request(Method::GET, endpoint)).await?;
        serde_json::from_str(&body).map_err(|e| {
            warn!(endpoint, error = %e, "unreadable response");
            ApiError::MissingField("body")
        })
    }

    /// Sends a JSON body; the response body is returned unparsed.
    async fn send_json<B: Serialize>(&self, method: Method, endpoint: &str, body: &B) -> Result<String, ApiError> {
        let request = self
            .request(method, endpoint)
            .header(header::CONTENT_TYPE, "application/json")
            .json(body);
        self.send(request).await
    }

    /// Get the signed-in user
    pub async fn fetch_profile(&self) -> Result<UserProfile, ApiError> {
        self.get("/users/me").await
    }

    /// Get the company and employee labels, and the employee's branch unless
    /// one is configured
    pub async fn load_context(&self) -> Result<EmployeeContext, ApiError> {
        let company: Company = self.get(&self.company_path()).await?;
        let employees: EmployeeList = self
            .get(&format!("{}/employees", self.company_path()))
            .await?;
        let employee = employees
            .into_vec()
            .into_iter()
            .find(|e| e.id == self.employee_id);

        if employee.is_none() {
            warn!(employee_id = %self.employee_id, "employee not found in company");
        }

        Ok(EmployeeContext {
            company_name: company.commercial_name,
            employee_name: employee.as_ref().map(Employee::display_name),
            branch_id: self
                .branch_id
                .clone()
                .or_else(|| employee.and_then(|e| e.branch_id)),
        })
    }

    /// Resolves the branch from the employee record when none is set.
    pub async fn connect(mut self) -> Result<(Self, EmployeeContext), ApiError> {
        let context = self.load_context().await?;
        if self.branch_id.is_none() {
            self.branch_id = context.branch_id.clone();
        }
        if self.branch_id.is_none() {
            return Err(ApiError::NotConfigured("branch"));
        }
        info!(
            company = context.company_name.as_deref().unwrap_or("-"),
            employee = context.employee_name.as_deref().unwrap_or("-"),
            branch = self.branch_id.as_deref().unwrap_or("-"),
            "connected"
        );
        Ok((self, context))
    }
}

#[async_trait]
impl ScheduleApi for ScheduleClient {
    /// Get the active schedule for the week starting at `week_start`
    async fn fetch_week(&self, week_start: NaiveDate) -> Result<Option<SavedWeek>, ApiError> {
        let endpoint = format!(
            "{}/user/{}/active?weekStart={}",
            self.schedules_path()?,
            encode(&self.employee_id),
            format_date(week_start)
        );
        let body = self.send(self.request(Method::GET, &endpoint)).await?;
        debug!(week = %week_start, bytes = body.len(), "schedule fetched");
        Ok(ActiveScheduleResponse::decode(&body))
    }

    /// Create a draft schedule record for the employee
    async fn create_draft(&self) -> Result<String, ApiError> {
        let endpoint = format!("{}/draft/{}", self.schedules_path()?, encode(&self.employee_id));
        let body = self
            .send_json(Method::POST, &endpoint, &serde_json::json!({}))
            .await?;
        serde_json::from_str::<CreatedRecord>(&body)
            .map(|record| record.id)
            .map_err(|_| ApiError::MissingField("id"))
    }

    /// Add a recurring shift
    async fn create_shift(&self, schedule_id: &str, shift: &NewShift) -> Result<(), ApiError> {
        let endpoint = self.record_path(schedule_id, "shifts")?;
        self.send_json(Method::POST, &endpoint, &CreateShiftRequest::from(shift))
            .await?;
        Ok(())
    }

    /// Submit scoped shift removals as one batch
    async fn submit_exceptions(&self, schedule_id: &str, exceptions: &[ShiftException]) -> Result<(), ApiError> {
        let endpoint = self.record_path(schedule_id, "exceptions")?;
        self.send_json(Method::POST, &endpoint, &ExceptionBatch::new(exceptions))
            .await?;
        Ok(())
    }

    async fn add_vacation(&self, schedule_id: &str, date: NaiveDate) -> Result<(), ApiError> {
        let endpoint = self.record_path(schedule_id, "vacations")?;
        self.send_json(Method::POST, &endpoint, &VacationRequest::new(date))
            .await?;
        Ok(())
    }

    async fn remove_vacation(&self, schedule_id: &str, removal: &VacationRemoval) -> Result<(), ApiError> {
        let endpoint = self.record_path(schedule_id, "vacations")?;
        self.send_json(Method::DELETE, &endpoint, &VacationDeleteRequest::from(removal))
            .await?;
        Ok(())
    }

    /// Move the record to confirmed status
    async fn confirm(&self, schedule_id: &str) -> Result<(), ApiError> {
        let endpoint = self.record_path(schedule_id, "confirm")?;
        self.send_json(Method::POST, &endpoint, &serde_json::json!({}))
            .await?;
        Ok(())
    }
}
