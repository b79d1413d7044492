//! Customers API
//!
//! REST endpoints for registration, login and profile management.
//! Mounted under `/api/customers`.

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::account::entity::{Account, AccountType};
use crate::auth::{Authenticated, PasswordService, TokenService};
use crate::customer::entity::Customer;
use crate::customer::operations::{
    ChangePasswordCommand, ChangePasswordUseCase, CustomerProfile, DeleteCustomerUseCase,
    FetchCustomerUseCase, LoginCommand, LoginUseCase, RegisterCustomerCommand,
    RegisterCustomerUseCase, UpdateCustomerCommand, UpdateCustomerUseCase,
};
use crate::notification::CustomerNotifier;
use crate::shared::api_common::{ApiResponse, MessageResponse};
use crate::shared::stores::Stores;
use crate::usecase::{ErrorResponse, UseCaseError};

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPayload {
    pub token: String,
    pub account_number: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginPayload {
    pub token: String,
}

/// Customer record as exposed over HTTP; never includes the password hash
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub date_of_birth: NaiveDate,
    #[serde(rename = "nationalID")]
    pub national_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Customer> for CustomerResponse {
    fn from(c: Customer) -> Self {
        Self {
            id: c.id,
            name: c.name,
            email: c.email,
            phone: c.phone,
            address: c.address,
            date_of_birth: c.date_of_birth,
            national_id: c.national_id,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub id: String,
    pub account_number: String,
    pub account_type: AccountType,
    /// Minor currency units
    pub balance: i64,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Account> for AccountResponse {
    fn from(a: Account) -> Self {
        Self {
            id: a.id,
            account_number: a.account_number,
            account_type: a.account_type,
            balance: a.balance,
            is_default: a.is_default,
            created_at: a.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CustomerProfileResponse {
    pub customer: CustomerResponse,
    pub accounts: Vec<AccountResponse>,
}

impl From<CustomerProfile> for CustomerProfileResponse {
    fn from(profile: CustomerProfile) -> Self {
        Self {
            customer: profile.customer.into(),
            accounts: profile.accounts.into_iter().map(Into::into).collect(),
        }
    }
}

/// Customers service state
#[derive(Clone)]
pub struct CustomersState {
    pub register_use_case: Arc<RegisterCustomerUseCase>,
    pub login_use_case: Arc<LoginUseCase>,
    pub update_use_case: Arc<UpdateCustomerUseCase>,
    pub change_password_use_case: Arc<ChangePasswordUseCase>,
    pub delete_use_case: Arc<DeleteCustomerUseCase>,
    pub fetch_use_case: Arc<FetchCustomerUseCase>,
    pub token_service: Arc<TokenService>,
}

impl CustomersState {
    pub fn new(
        stores: &Stores,
        password_service: Arc<PasswordService>,
        token_service: Arc<TokenService>,
        notifier: Arc<dyn CustomerNotifier>,
    ) -> Self {
        Self {
            register_use_case: Arc::new(RegisterCustomerUseCase::new(
                stores.customers.clone(),
                stores.accounts.clone(),
                stores.tokens.clone(),
                password_service.clone(),
                token_service.clone(),
                notifier,
            )),
            login_use_case: Arc::new(LoginUseCase::new(
                stores.customers.clone(),
                stores.tokens.clone(),
                password_service.clone(),
                token_service.clone(),
            )),
            update_use_case: Arc::new(UpdateCustomerUseCase::new(stores.customers.clone())),
            change_password_use_case: Arc::new(ChangePasswordUseCase::new(
                stores.customers.clone(),
                password_service,
            )),
            delete_use_case: Arc::new(DeleteCustomerUseCase::new(
                stores.customers.clone(),
                stores.accounts.clone(),
                stores.tokens.clone(),
            )),
            fetch_use_case: Arc::new(FetchCustomerUseCase::new(
                stores.customers.clone(),
                stores.accounts.clone(),
            )),
            token_service,
        }
    }
}

impl FromRef<CustomersState> for Arc<TokenService> {
    fn from_ref(state: &CustomersState) -> Self {
        state.token_service.clone()
    }
}

/// Register a customer
///
/// Creates the customer, a default savings account and a bearer token.
#[utoipa::path(
    post,
    path = "/register",
    tag = "customers",
    operation_id = "postApiCustomersRegister",
    request_body = RegisterCustomerCommand,
    responses(
        (status = 201, description = "Customer registered", body = ApiResponse<RegisterPayload>),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 409, description = "Email or national ID already registered", body = ErrorResponse)
    )
)]
pub async fn register_customer(
    State(state): State<CustomersState>,
    Json(command): Json<RegisterCustomerCommand>,
) -> Result<(StatusCode, Json<ApiResponse<RegisterPayload>>), UseCaseError> {
    let registration = state.register_use_case.execute(command).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            "Customer registered successfully",
            RegisterPayload {
                token: registration.token,
                account_number: registration.account_number,
            },
        )),
    ))
}

/// Log in with national ID and password
#[utoipa::path(
    post,
    path = "/login",
    tag = "customers",
    operation_id = "postApiCustomersLogin",
    request_body = LoginCommand,
    responses(
        (status = 200, description = "Login successful", body = ApiResponse<LoginPayload>),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 404, description = "Customer not found", body = ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<CustomersState>,
    Json(command): Json<LoginCommand>,
) -> Result<Json<ApiResponse<LoginPayload>>, UseCaseError> {
    let token = state.login_use_case.execute(command).await?;

    Ok(Json(ApiResponse::success("Login successful", LoginPayload { token })))
}

/// Update customer profile fields
#[utoipa::path(
    put,
    path = "/update/{id}",
    tag = "customers",
    operation_id = "putApiCustomersUpdateById",
    params(
        ("id" = String, Path, description = "Customer ID")
    ),
    request_body = UpdateCustomerCommand,
    responses(
        (status = 200, description = "Customer updated", body = ApiResponse<CustomerResponse>),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 404, description = "Customer not found", body = ErrorResponse),
        (status = 409, description = "Email or national ID already registered", body = ErrorResponse)
    )
)]
pub async fn update_customer(
    State(state): State<CustomersState>,
    Path(id): Path<String>,
    Json(command): Json<UpdateCustomerCommand>,
) -> Result<Json<ApiResponse<CustomerResponse>>, UseCaseError> {
    let customer = state.update_use_case.execute(&id, command).await?;

    Ok(Json(ApiResponse::success("Customer updated successfully", customer.into())))
}

/// Change password
#[utoipa::path(
    put,
    path = "/change-password",
    tag = "customers",
    operation_id = "putApiCustomersChangePassword",
    request_body = ChangePasswordCommand,
    responses(
        (status = 200, description = "Password changed", body = MessageResponse),
        (status = 400, description = "Passwords differ or match the current one", body = ErrorResponse),
        (status = 404, description = "Customer not found", body = ErrorResponse)
    )
)]
pub async fn change_password(
    State(state): State<CustomersState>,
    Json(command): Json<ChangePasswordCommand>,
) -> Result<Json<MessageResponse>, UseCaseError> {
    state.change_password_use_case.execute(command).await?;

    Ok(Json(MessageResponse::success("Password changed successfully")))
}

/// Delete a customer with their accounts and token
#[utoipa::path(
    delete,
    path = "/delete/{id}",
    tag = "customers",
    operation_id = "deleteApiCustomersDeleteById",
    params(
        ("id" = String, Path, description = "Customer ID")
    ),
    responses(
        (status = 200, description = "Customer deleted", body = MessageResponse),
        (status = 404, description = "Customer not found", body = ErrorResponse)
    )
)]
pub async fn delete_customer(
    State(state): State<CustomersState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, UseCaseError> {
    state.delete_use_case.execute(&id).await?;

    Ok(Json(MessageResponse::success("Customer deleted successfully")))
}

/// Get a customer and their accounts
#[utoipa::path(
    get,
    path = "/customer/{id}",
    tag = "customers",
    operation_id = "getApiCustomersCustomerById",
    params(
        ("id" = String, Path, description = "Customer ID")
    ),
    responses(
        (status = 200, description = "Customer found", body = ApiResponse<CustomerProfileResponse>),
        (status = 404, description = "Customer not found", body = ErrorResponse)
    )
)]
pub async fn get_customer(
    State(state): State<CustomersState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<CustomerProfileResponse>>, UseCaseError> {
    let profile = state.fetch_use_case.execute(&id).await?;

    Ok(Json(ApiResponse::success("Customer and account details", profile.into())))
}

/// Get the customer identified by the bearer token
#[utoipa::path(
    get,
    path = "/me",
    tag = "customers",
    operation_id = "getApiCustomersMe",
    responses(
        (status = 200, description = "Current customer", body = ApiResponse<CustomerProfileResponse>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Customer no longer exists", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_current_customer(
    State(state): State<CustomersState>,
    auth: Authenticated,
) -> Result<Json<ApiResponse<CustomerProfileResponse>>, UseCaseError> {
    let profile = state.fetch_use_case.execute(&auth.sub).await?;

    Ok(Json(ApiResponse::success("Customer and account details", profile.into())))
}

pub fn customers_router(state: CustomersState) -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(register_customer))
        .routes(routes!(login))
        .routes(routes!(update_customer))
        .routes(routes!(change_password))
        .routes(routes!(delete_customer))
        .routes(routes!(get_customer))
        .routes(routes!(get_current_customer))
        .with_state(state)
}
