//! Admin customer CRUD.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use serde::Deserialize;

use backoffice_core::{CustomerId, CustomerStatus, Permission};

use crate::db::CustomerRepository;
use crate::db::customers::CustomerInput;
use crate::error::AppError;
use crate::middleware::RequireAuth;
use crate::models::Customer;
use crate::state::AppState;

use super::super::ApiResponse;

/// Build the customers router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(get_one).put(update).delete(delete_one))
}

#[derive(Debug, Deserialize)]
struct CustomerBody {
    name: String,
    email: String,
    phone: Option<String>,
    address: Option<String>,
    #[serde(default)]
    status: CustomerStatus,
}

impl CustomerBody {
    fn validate(&self) -> Result<CustomerInput, AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::Validation("Name is required".to_owned()));
        }
        if self.email.trim().is_empty() {
            return Err(AppError::Validation("Email is required".to_owned()));
        }
        Ok(CustomerInput {
            name: self.name.trim().to_owned(),
            email: self.email.trim().to_owned(),
            phone: self.phone.clone(),
            address: self.address.clone(),
            status: self.status,
        })
    }
}

async fn list(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Customer>>>, AppError> {
    user.require(Permission::ManageCustomers)?;
    let customers = CustomerRepository::new(state.pool()).list_all().await?;
    Ok(ApiResponse::ok(customers))
}

async fn get_one(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<Customer>>, AppError> {
    user.require(Permission::ManageCustomers)?;
    let customer = CustomerRepository::new(state.pool())
        .get_by_id(CustomerId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound("Customer".to_owned()))?;
    Ok(ApiResponse::ok(customer))
}

async fn create(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(body): Json<CustomerBody>,
) -> Result<Json<ApiResponse<Customer>>, AppError> {
    user.require(Permission::ManageCustomers)?;
    let input = body.validate()?;
    let customer = CustomerRepository::new(state.pool()).create(&input).await?;
    Ok(ApiResponse::ok(customer))
}

async fn update(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(body): Json<CustomerBody>,
) -> Result<Json<ApiResponse<Customer>>, AppError> {
    user.require(Permission::ManageCustomers)?;
    let input = body.validate()?;
    let customer = CustomerRepository::new(state.pool())
        .update(CustomerId::new(id), &input)
        .await?;
    Ok(ApiResponse::ok(customer))
}

async fn delete_one(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    user.require(Permission::ManageCustomers)?;
    CustomerRepository::new(state.pool())
        .delete(CustomerId::new(id))
        .await?;
    Ok(ApiResponse::message("Customer deleted"))
}
