//! Export Handlers

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Datelike, Utc};
use http::HeaderValue;
use serde::Deserialize;
use shared::util::{day_bounds_millis, month_bounds_millis};

use super::DELETED_ORDERS_HEADER;
use crate::core::ServerState;
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

/// GET /api/admin/export/orders?year=&month= - XLSX of one month, default current
pub async fn export_orders(
    State(state): State<ServerState>,
    Query(query): Query<ExportQuery>,
) -> AppResult<Response> {
    let now = Utc::now();
    let year = query.year.unwrap_or(now.year());
    let month = query.month.unwrap_or(now.month());
    let (start, end) = month_bounds_millis(year, month).ok_or_else(|| {
        AppError::validation("Invalid period")
            .with_detail("year", year)
            .with_detail("month", month)
    })?;

    let orders = state.orders().find_created_between(start, end).await?;
    let document = state.reports.render_report(
        &format!("Orders {:02}.{}", month, year),
        &format!("orders_{}_{:02}", year, month),
        &orders,
    )?;

    tracing::info!(year, month, orders = orders.len(), "Monthly export rendered");
    Ok(document.into_response())
}

/// POST /api/admin/export/daily-and-clear
///
/// Renders today's (UTC) orders, then deletes exactly those orders. A render
/// failure deletes nothing.
pub async fn daily_and_clear(State(state): State<ServerState>) -> AppResult<Response> {
    let now = Utc::now();
    let (start, end) = day_bounds_millis(now.timestamp_millis());
    let orders = state.orders().find_created_between(start, end).await?;

    let day = DateTime::<Utc>::from_timestamp_millis(start).unwrap_or(now);
    let document = state
        .reports
        .render_report(
            &format!("Daily report {}", day.format("%d.%m.%Y")),
            &format!("daily_report_{}", day.format("%Y%m%d")),
            &orders,
        )
        .map_err(|e| {
            tracing::error!(error = %e, "Daily export failed, no orders deleted");
            AppError::from(e)
        })?;

    let deleted = state.engine.purge(&orders).await?;
    tracing::warn!(deleted, "Daily orders exported and cleared");

    let mut response = document.into_response();
    response
        .headers_mut()
        .insert(DELETED_ORDERS_HEADER, HeaderValue::from(deleted));
    Ok(response)
}
