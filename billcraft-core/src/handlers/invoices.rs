use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use axum::Extension;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::calc::{self, InvoiceTotals, LineAmounts};
use crate::error::AppError;
use crate::models::invoice::{
    CreateInvoice, Invoice, InvoiceItemInput, InvoiceResponse, UpdateInvoice,
};
use crate::pdf::{self, RenderedInvoice};
use crate::store;
use crate::AppState;

/// GET /api/invoices
pub async fn list_invoices(
    State(state): State<AppState>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
) -> Result<Json<Vec<Invoice>>, AppError> {
    let invoices = store::invoices::list_invoices(&state.db, user_id).await?;
    Ok(Json(invoices))
}

/// GET /api/invoices/:id
pub async fn get_invoice(
    State(state): State<AppState>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<InvoiceResponse>, AppError> {
    let (invoice, items) = store::invoices::get_invoice(&state.db, user_id, id)
        .await?
        .ok_or(AppError::NotFound("invoice"))?;

    let client = match invoice.client_id {
        Some(client_id) => store::clients::get_client(&state.db, user_id, client_id).await?,
        None => None,
    };

    Ok(Json(InvoiceResponse {
        invoice,
        items,
        client,
    }))
}

/// POST /api/invoices
pub async fn create_invoice(
    State(state): State<AppState>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    Json(input): Json<CreateInvoice>,
) -> Result<(StatusCode, Json<InvoiceResponse>), AppError> {
    if input.items.is_empty() {
        return Err(AppError::Validation(
            "An invoice needs at least one line item".to_string(),
        ));
    }

    let (invoice, items) = store::invoices::create_invoice(&state.db, user_id, input).await?;
    info!(
        "Created invoice {} ({}) for user {}",
        invoice.id, invoice.invoice_number, user_id
    );
    Ok((
        StatusCode::CREATED,
        Json(InvoiceResponse {
            invoice,
            items,
            client: None,
        }),
    ))
}

/// PUT /api/invoices/:id
pub async fn update_invoice(
    State(state): State<AppState>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateInvoice>,
) -> Result<Json<InvoiceResponse>, AppError> {
    if matches!(&input.items, Some(items) if items.is_empty()) {
        return Err(AppError::Validation(
            "An invoice needs at least one line item".to_string(),
        ));
    }

    let (invoice, items) = store::invoices::update_invoice(&state.db, user_id, id, input)
        .await?
        .ok_or(AppError::NotFound("invoice"))?;
    Ok(Json(InvoiceResponse {
        invoice,
        items,
        client: None,
    }))
}

/// DELETE /api/invoices/:id
pub async fn delete_invoice(
    State(state): State<AppState>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let deleted = store::invoices::delete_invoice(&state.db, user_id, id).await?;
    if !deleted {
        return Err(AppError::NotFound("invoice"));
    }
    info!("Deleted invoice {} for user {}", id, user_id);
    Ok(StatusCode::NO_CONTENT)
}

/// Draft snapshot for recomputing totals without persisting.
#[derive(Debug, Deserialize)]
pub struct TotalsRequest {
    #[serde(default)]
    pub items: Vec<InvoiceItemInput>,
    #[serde(default)]
    pub tax_rate: Decimal,
    #[serde(default)]
    pub additional_discount: Decimal,
}

/// POST /api/invoices/totals
///
/// Pure recomputation endpoint the invoice form calls on edits. Does
/// not validate ranges; garbage in, garbage out.
pub async fn compute_totals(Json(request): Json<TotalsRequest>) -> Json<InvoiceTotals> {
    let amounts: Vec<LineAmounts> = request.items.iter().map(LineAmounts::from).collect();
    Json(calc::compute_totals(
        &amounts,
        request.tax_rate,
        request.additional_discount,
    ))
}

/// Renders the invoice through the one shared path used by both
/// preview and download, so their content is identical by
/// construction.
async fn render_invoice(
    state: &AppState,
    user_id: Uuid,
    id: Uuid,
) -> Result<RenderedInvoice, AppError> {
    let (invoice, items) = store::invoices::get_invoice(&state.db, user_id, id)
        .await?
        .ok_or(AppError::NotFound("invoice"))?;

    let client = match invoice.client_id {
        Some(client_id) => store::clients::get_client(&state.db, user_id, client_id).await?,
        None => None,
    };

    let profile = store::profile::get_profile(&state.db, user_id)
        .await?
        .unwrap_or_else(|| crate::models::Profile::placeholder(user_id));

    let amounts: Vec<LineAmounts> = items.iter().map(LineAmounts::from).collect();
    let totals = calc::compute_totals(&amounts, invoice.tax_rate, invoice.additional_discount);

    let rendered = pdf::render_invoice(&invoice, &items, &totals, client.as_ref(), &profile)?;
    Ok(rendered)
}

/// GET /api/invoices/:id/pdf
///
/// Inline preview: the document as a data URI.
pub async fn preview_pdf(
    State(state): State<AppState>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let rendered = render_invoice(&state, user_id, id).await?;
    Ok(Json(serde_json::json!({
        "data_uri": rendered.data_uri(),
        "filename": rendered.filename,
        "pages": rendered.pages,
    })))
}

/// GET /api/invoices/:id/pdf/download
///
/// Same document as the preview, delivered as a named attachment.
pub async fn download_pdf(
    State(state): State<AppState>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let rendered = render_invoice(&state, user_id, id).await?;
    info!("Rendered invoice {} as {}", id, rendered.filename);

    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", rendered.filename),
        ),
    ];
    Ok((headers, rendered.bytes).into_response())
}
