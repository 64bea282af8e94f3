//! Vehicle registry handlers. Mutation is restricted to hosts and gated
//! on ownership in the service layer.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use fleet_core::domain::{SortDir, SortField, Vehicle, VehicleQuery};
use fleet_core::service::{NewVehicle, VehicleUpdate};
use fleet_shared::dto::{
    CreateVehicleRequest, ListVehiclesParams, UpdateVehicleRequest, VehicleResponse,
};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn vehicle_response(vehicle: &Vehicle) -> VehicleResponse {
    VehicleResponse {
        id: vehicle.id,
        name: vehicle.name.clone(),
        category: vehicle.category.clone(),
        price_per_day: vehicle.price_per_day,
        available: vehicle.available,
        image_url: vehicle.image_url.clone(),
        host_id: vehicle.host_id,
    }
}

fn parse_query(params: ListVehiclesParams) -> AppResult<VehicleQuery> {
    let sort = match (params.sort, params.order) {
        (None, None) => None,
        (None, Some(_)) => {
            return Err(AppError::BadRequest(
                "order requires a sort field".to_string(),
            ));
        }
        (Some(field), order) => {
            let field = SortField::parse(&field).map_err(AppError::from)?;
            let dir = match order {
                Some(o) => SortDir::parse(&o).map_err(AppError::from)?,
                None => SortDir::Asc,
            };
            Some((field, dir))
        }
    };

    let defaults = VehicleQuery::default();
    Ok(VehicleQuery {
        category: params.category,
        min_price: params.min_price,
        max_price: params.max_price,
        sort,
        limit: params.limit.unwrap_or(defaults.limit),
        offset: params.offset.unwrap_or(defaults.offset),
    })
}

/// GET /api/vehicles - public listing.
pub async fn list(
    state: web::Data<AppState>,
    params: web::Query<ListVehiclesParams>,
) -> AppResult<HttpResponse> {
    let query = parse_query(params.into_inner())?;
    let vehicles = state.vehicles.list(query).await?;

    let body: Vec<VehicleResponse> = vehicles.iter().map(vehicle_response).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /api/vehicles/{id}
pub async fn get(state: web::Data<AppState>, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let vehicle = state.vehicles.get(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(vehicle_response(&vehicle)))
}

/// POST /api/vehicles - hosts only.
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CreateVehicleRequest>,
) -> AppResult<HttpResponse> {
    if !identity.is_host() {
        return Err(AppError::Forbidden);
    }
    let req = body.into_inner();

    let vehicle = state
        .vehicles
        .add(
            identity.user_id,
            NewVehicle {
                name: req.name,
                category: req.category,
                price_per_day: req.price_per_day,
                image_url: req.image_url,
            },
        )
        .await?;

    Ok(HttpResponse::Created().json(vehicle_response(&vehicle)))
}

/// PUT /api/vehicles/{id} - owning host only.
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<UpdateVehicleRequest>,
) -> AppResult<HttpResponse> {
    if !identity.is_host() {
        return Err(AppError::Forbidden);
    }
    let req = body.into_inner();

    let vehicle = state
        .vehicles
        .update(
            identity.user_id,
            path.into_inner(),
            VehicleUpdate {
                name: req.name,
                category: req.category,
                price_per_day: req.price_per_day,
                available: req.available,
                image_url: req.image_url,
            },
        )
        .await?;

    Ok(HttpResponse::Ok().json(vehicle_response(&vehicle)))
}

/// DELETE /api/vehicles/{id} - owning host only.
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    if !identity.is_host() {
        return Err(AppError::Forbidden);
    }

    state
        .vehicles
        .delete(identity.user_id, path.into_inner())
        .await?;

    Ok(HttpResponse::NoContent().finish())
}
